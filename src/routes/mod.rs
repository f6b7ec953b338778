//! API route handlers
//!
//! Routes are organized by functionality:
//!
//! - `health`: Liveness status
//! - `upload`: Multipart upload of a file plus its metadata
//! - `files`: Listing and deleting catalog records
//! - `categories`: The fixed category list
//!
//! Static serving of `/uploads` and the SPA fallback are wired directly from
//! `tower-http` services in `server.rs`.

pub mod categories;
pub mod files;
pub mod health;
pub mod upload;

use crate::error::ServerError;

/// 405 handler for known paths hit with an unsupported method
pub async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}
