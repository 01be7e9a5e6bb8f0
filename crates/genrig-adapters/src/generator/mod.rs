//! Generator adapters.
//!
//! - [`ProcessGenerator`]: an external generator binary
//! - [`InProcessGenerator`]: a Rust function standing in for the entry point

mod in_process;
mod process;

pub use in_process::InProcessGenerator;
pub use process::ProcessGenerator;
