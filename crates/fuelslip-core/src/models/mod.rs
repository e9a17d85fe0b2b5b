//! Data models shared by the library and the CLI.

pub mod config;
pub mod receipt;
