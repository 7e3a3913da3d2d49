mod client;
mod response;

pub use client::{GeminiClient, GeminiError};
pub use response::{GenerationResult, Source};
