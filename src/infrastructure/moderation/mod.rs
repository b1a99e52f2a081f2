pub mod config;
pub mod engine;
pub mod openai_provider;
pub mod provider;
