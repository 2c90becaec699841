//! Wayfinder - conversational trip-planning assistant
//!
//! An LLM-driven agent core that classifies free-text messages as on/off
//! topic, extracts place-search and route-planning intent, accumulates trip
//! facts across turns, and orchestrates calls against a routing service and
//! a places-search service.
//!
//! # Core concepts
//!
//! - **One turn, one reply**: every user message produces exactly one
//!   assistant reply, under every failure mode
//! - **Durable trip state**: facts merge field-by-field across turns and are
//!   never silently dropped
//! - **Bounded re-entry**: a completed tool call re-enters the pipeline
//!   exactly once; a tool result can never trigger another tool call
//! - **Total parsing**: raw model output always reduces to a JSON object or
//!   a clarification, never a crash
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait, OpenRouter implementation, response parser
//! - [`prompts`] - embedded stage prompt templates and loader
//! - [`pipeline`] - the per-turn decision machine
//! - [`tools`] - route/places service clients and the invocation adapter
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface
//! - [`repl`] - interactive chat session

pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod repl;
pub mod tools;

// Re-export commonly used types
pub use config::{AgentConfig, Config, LlmConfig, ServiceEndpoint};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenRouterClient, create_client, extract_json};
pub use pipeline::TurnEngine;
pub use prompts::{PromptContext, PromptLoader, PromptStage};
pub use repl::ChatSession;
pub use tools::{
    HttpPlacesService, HttpRouteService, PlacesResponse, PlacesService, RouteResponse, RouteService, ServiceError,
    ToolAdapter, ToolOutcome,
};
