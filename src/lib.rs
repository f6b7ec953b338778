//! HTML Card Server - upload and metadata catalog for HTML files
//!
//! This crate provides a small HTTP service behind the HTML card viewer
//! frontend. Clients upload HTML files with descriptive metadata; the server
//! writes the file to the upload directory and keeps an index of records in a
//! flat JSON file.
//!
//! # Features
//!
//! - **Uploads**: Multipart upload with title, description, category, tags,
//!   author and version
//! - **Catalog**: File-backed record store, rewritten atomically on every change
//! - **Frontend**: Static asset serving with SPA fallback
//! - **Middleware**: Permissive CORS, request ID tracking, structured logging,
//!   compression, request timeout
//! - **Configuration**: Environment variables, `.env` and optional config file
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::init_tracing(&config.log_level);
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `POST /api/upload` - Upload a file (`htmlFile` part) with metadata
//! - `GET /api/files` - List records, newest first
//! - `DELETE /api/files/{filename}` - Delete a file and its record
//! - `GET /api/categories` - Fixed category list
//! - `GET /api/health` - Liveness status
//! - `GET /uploads/{filename}` - Stored file bytes
//! - `GET /*` - Frontend assets, falling back to the index document

pub mod categories;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;
pub mod types;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, init_tracing, start_server};
pub use state::ServerState;
pub use store::{CatalogStore, StoreError};
pub use types::{Category, FileRecord, UploadMetadata};
