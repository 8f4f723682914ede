//! Filesystem backend for daylog day documents.
//!
//! A journal directory holds:
//! - `.daylog/config.yml`: Journal configuration
//! - `days/YYYY-MM-DD.log`: One plain-text bullet log per day

pub mod config;
pub mod error;
pub mod journal;

pub use config::JournalConfig;
pub use error::{FsError, Result};
pub use journal::Journal;
