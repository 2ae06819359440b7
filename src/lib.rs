//! Charfinder: find Unicode characters by the words in their names
//!
//! A query is one or more words; a character matches when its name (including
//! the optional alternate name from the character database) contains every
//! word, regardless of order, case, or hyphenation.

pub mod config;
pub mod provider;
pub mod query;
pub mod records;
pub mod web;

pub use config::Settings;
pub use provider::{AcquisitionError, DatabaseProvider, ProviderState};
pub use query::Query;
pub use records::{Record, ScanError};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the character database, under the user's home directory by
/// default
pub const DATABASE_FILE_NAME: &str = "UnicodeData.txt";
