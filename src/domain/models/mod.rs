pub mod file;
pub mod preview;
pub mod result;
