//! Recovery log adapters.

mod json_file_log;

pub use json_file_log::JsonFileRecoveryLog;
