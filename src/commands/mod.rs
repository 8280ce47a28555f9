pub mod chat;
pub mod completions;
pub mod config;
pub mod personalities;
pub mod prompt;
