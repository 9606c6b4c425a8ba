//! Kort - YouTube Video Summarization
//!
//! Fetch transcripts for one or more YouTube videos and condense them into a
//! single AI-written digest.
//!
//! The name "Kort" comes from the Norwegian/Scandinavian word for "short."
//!
//! # Overview
//!
//! Kort allows you to:
//! - Summarize up to 5 YouTube videos in one request
//! - Run a small HTTP API with per-IP rate limiting
//! - Keep partial results: one broken video never sinks the batch
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `video` - URL resolution, transcript and title retrieval
//! - `summary` - Prompt assembly and the generation client
//! - `pipeline` - Batch validation, concurrent fan-out, response assembly
//! - `rate_limit` - Fixed-window per-identity rate limiting
//! - `server` - HTTP API boundary
//!
//! # Example
//!
//! ```rust,no_run
//! use kort::config::Settings;
//! use kort::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::new(&settings);
//!
//!     let urls = vec!["https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()];
//!     match pipeline.run(&urls).await {
//!         Ok(output) => println!("{}", output.summary),
//!         Err(failure) => eprintln!("{}", failure.error),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod pipeline;
pub mod rate_limit;
pub mod server;
pub mod summary;
pub mod video;

pub use error::{KortError, Result};
