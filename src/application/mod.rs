pub mod error;
pub mod error_classifier;
pub mod services;
