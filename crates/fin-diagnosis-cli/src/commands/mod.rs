pub mod diagnosis;
pub mod scoring;
