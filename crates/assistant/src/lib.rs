//! Natural-language transaction parsing backed by Gemini.
//!
//! The assistant turns free text like "spent 250 on groceries at SM
//! yesterday" into a structured transaction draft, and suggests a category
//! for a bare description. It talks to the Gemini `generateContent` endpoint
//! and post-processes the model's answer defensively: fenced or chatty
//! output is tolerated, and a category the model invents falls back to the
//! caller's catch-all with zero confidence.

pub use error::AssistantError;
pub use gemini::{Assistant, AssistantConfig, DEFAULT_MODEL};
pub use parse::{CategoryOption, CategorySuggestion, ParsedKind, ParsedTransaction};

mod error;
mod gemini;
mod parse;
mod prompt;

type ResultAssistant<T> = Result<T, AssistantError>;
