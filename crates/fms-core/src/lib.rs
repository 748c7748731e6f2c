pub mod checkin;
pub mod config;
pub mod error;
pub mod file_match;
pub mod files;
pub mod task;
pub mod types;
pub mod value;

pub use error::{FmsError, Result};
