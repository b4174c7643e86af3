pub mod explanations;
pub mod intent_parser;
pub mod knowledge;
pub mod normalizer;
pub mod providers;
pub mod query_mapper;
pub mod recommendations;

pub use intent_parser::IntentParser;
pub use providers::{GeminiOracle, LanguageOracle};
