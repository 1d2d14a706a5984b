//! AI client module for LLM integration via OpenRouter.
//!
//! This module provides:
//! - `AiClient` trait for abstracting AI providers
//! - `CachingAiClient` implementation with disk-based caching
//! - `FakeAiClient` for tests
//! - Configuration via environment variables
//! - Prompt templates plus the two AI flows built on them: food image
//!   identification and recipe suggestion
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! - `OPENROUTER_API_KEY` (required): Your OpenRouter API key
//! - `DISHCOVERY_AI_MODEL` (optional): Model name, e.g., "openai/gpt-4o-mini"
//! - `DISHCOVERY_AI_BASE_URL` (optional): API base URL
//! - `DISHCOVERY_AI_CACHE_DIR` (optional): Cache directory path
//! - `DISHCOVERY_AI_OFFLINE` (optional): Set to "true" to use cache only
//! - `DISHCOVERY_AI_RATE_LIMIT_MS` (optional): Delay between requests in ms
//!
//! # Example
//!
//! ```ignore
//! use dishcovery_core::ai::{AiClient, CachingAiClient, ChatMessage, ChatRequest};
//!
//! let client = CachingAiClient::from_env()?;
//!
//! let request = ChatRequest {
//!     messages: vec![ChatMessage::user("Hello!")],
//!     ..Default::default()
//! };
//!
//! let response = client.complete("test", request).await?;
//! println!("Response: {}", response.content);
//! ```

mod cache;
mod client;
mod config;
mod fake;
pub mod food_image;
pub mod prompts;
pub mod recipe_suggest;
mod types;

pub use cache::{AiCache, CacheKey, CachedAiResponse};
pub use client::{AiClient, AiError, CachingAiClient};
pub use config::{AiConfig, ConfigError};
pub use fake::FakeAiClient;
pub use food_image::{identify_food_image, FoodImageOutcome, FoodImageResult, RejectedImageKind};
pub use recipe_suggest::{
    suggest_recipes, AdditionalIngredient, PantryItem, Recipe, RecipeSuggestions,
};
pub use types::{ChatMessage, ChatRequest, ChatResponse, ImageData, Role, Usage};
