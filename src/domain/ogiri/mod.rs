pub mod client;
pub mod dto;
pub mod examples;
pub mod handler;
pub mod page;
pub mod parser;
pub mod prompt;
mod retry;
mod service;

pub use client::{CompletionClient, OpenAiClient, SharedCompletionClient};
pub use examples::{ExampleRecord, ExampleStore};
pub use service::{Generation, OgiriService};
