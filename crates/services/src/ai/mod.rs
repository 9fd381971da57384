pub mod anthropic;
pub mod prompt;

pub use anthropic::{AnthropicWordGenerator, WordGeneratorConfig};
