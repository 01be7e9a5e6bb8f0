//! Application services.

pub mod harness;

pub use harness::{DEVELOPER_CONFIG_FILE, Harness};
