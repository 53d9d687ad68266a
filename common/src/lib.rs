pub mod config;
pub mod file_utils;

pub use config::*;
pub use file_utils::*;
