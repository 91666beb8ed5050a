pub mod anonymize;
pub mod config;
pub mod dataset;
pub mod demographics;
pub mod error;
pub mod evaluate;
pub mod evidence;
pub mod llm;
pub mod parse;
pub mod relationships;
pub mod report;
pub mod scoring;
pub mod transcript;
pub mod types;

pub use error::{Error, Result};
