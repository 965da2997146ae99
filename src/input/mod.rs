//! Input processing module
//! Handles file detection, text extraction, candidate collection and staging

pub mod file_detector;
pub mod text_extractor;
pub mod manager;
pub mod staging;
