pub mod common;
pub mod completions;
pub mod config;
pub mod import;
pub mod list;
pub mod request;
