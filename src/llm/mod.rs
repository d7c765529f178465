//! Gemini chat integration
//!
//! This module owns everything between the Controller and the hosted model:
//!
//! - **config**: model id, endpoint, credential and persona
//! - **prompts**: the persona system instruction and the seeded greeting
//! - **session**: the single conversation history sent with every request
//! - **gateway**: the `ResponseGateway` seam and its Gemini REST implementation
//! - **pipeline**: a worker thread that serializes gateway calls
//!
//! # Usage
//!
//! ```rust,ignore
//! use habu::llm::{GatewayConfig, GatewayPipeline, GeminiGateway};
//!
//! let gateway = GeminiGateway::new(GatewayConfig::new(api_key))?;
//! let pipeline = GatewayPipeline::new(Box::new(gateway));
//! let handle = pipeline.handle();
//! pipeline.start_worker()?;
//! ```

pub mod config;
pub mod gateway;
pub mod pipeline;
pub mod prompts;
pub mod session;

pub use config::GatewayConfig;
pub use gateway::{GatewayError, GeminiGateway, ResponseGateway};
pub use pipeline::{GatewayCommand, GatewayEvent, GatewayHandle, GatewayPipeline};
pub use prompts::{GREETING, SYSTEM_INSTRUCTION};
pub use session::{ChatSession, ChatTurn, TurnRole};
