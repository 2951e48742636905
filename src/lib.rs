//! Client for a remote PII masking service: select an image, preview it,
//! submit it, and show the masked result next to the original.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod services;
