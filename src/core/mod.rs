/*!
 * Core Module
 * Configuration, constants and error handling
 */

pub mod config;
pub mod errors;
pub mod limits;

// Re-export for convenience
pub use config::{CanConfig, KeyKind};
pub use errors::{CanError, CanResult};
