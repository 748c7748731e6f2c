//! `fms-client` — authenticated access to the FMS dispatch API.
//!
//! # Architecture
//!
//! ```text
//! UpstreamRequest   ← owned description of one call (method, url, query, body)
//!     │
//!     ▼
//! FmsClient::call   ← attaches cached credentials, retries once on 401/403
//!     │
//!     ▼
//! typed endpoints   ← list_tasks / list_files / upload_file / complete_task /
//!                     cancel_task / revert_linehaul, one parsing contract each
//! ```
//!
//! Credentials live inside the client instance. There is no process-wide
//! token state; share the client behind an `Arc` instead.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use fms_client::FmsClient;
//! use fms_core::config::Config;
//!
//! let client = FmsClient::new(Config::load(None)?)?;
//! for task in client.list_tasks("B01KJY").await? {
//!     println!("{} {}", task.task_type(), task.status_text());
//! }
//! ```

pub mod api;
pub mod client;
pub mod clock;
pub mod credentials;
pub mod error;
pub mod request;


pub use client::FmsClient;
pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::Credentials;
pub use error::ClientError;
pub use request::{RequestBody, UpstreamRequest};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClientError>;
