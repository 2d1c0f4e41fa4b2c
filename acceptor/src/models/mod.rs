//! Request outcome and upstream response models.
//! This module contains the structs and enums exchanged with the identity providers and returned to callers.

mod outcome; // Authentication decision
mod responses; // API response models
mod sts; // GCP and AWS STS payloads

// Re-export all models for easier access
pub use outcome::*;
pub use responses::*;
pub use sts::*;
