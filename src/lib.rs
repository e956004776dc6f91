pub mod brochure;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod filter;
pub mod llm;
pub mod output;
pub mod parsers;
pub mod prompts;
pub mod results;
pub mod summary;
pub mod utils;

// Re-export commonly used types for convenience
pub use brochure::BrochureGenerator;
pub use config::{ApiKey, DigestConfig, FetchConfig, FetchMode};
pub use error::{BrochureError, ConfigError, FetchError, LlmError};
pub use llm::{ChatModel, ChatRequest, CompletionSettings, Message, OpenAiClient};
pub use results::{Page, RelevantLink};
pub use summary::Summarizer;
