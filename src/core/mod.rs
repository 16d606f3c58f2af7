/*!
 * Core Module
 * Errors, limits and configuration shared by every layer
 */

pub mod config;
pub mod errors;
pub mod limits;

pub use config::IoConfig;
pub use errors::{VfsError, VfsResult};
