//! adaptify-sources: Question sources and configuration.
//!
//! Implements the `QuestionSource` trait for TOML question banks and a mock,
//! and loads `adaptify.toml`.

pub mod bank;
pub mod config;
pub mod error;
pub mod mock;

pub use bank::{load_bank, BankSource, QuestionBank};
pub use config::{load_config, load_config_from, AdaptifyConfig};
pub use error::SourceError;
pub use mock::MockQuestionSource;
