pub mod config;
pub mod decimal;
pub mod error;
pub mod log;
pub mod tron;
