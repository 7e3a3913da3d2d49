pub mod config;
mod config_env;
pub mod gemini;
pub mod models;
pub mod sessions;
