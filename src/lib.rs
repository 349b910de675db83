//! # Ice Breaker
//!
//! Given a person's name, finds their social profiles and writes a short
//! biography with a couple of interesting facts.
//!
//! This library provides:
//! - A lookup agent that resolves a name to a LinkedIn or Twitter/X profile URL
//!   by letting an LLM drive a single web-search tool
//! - Profile and post normalization ahead of prompting
//! - A summary generator over the normalized profile
//! - An HTTP API and a minimal front end
//!
//! ## Flow
//!
//! 1. Receive a name via the API
//! 2. Resolve the LinkedIn profile URL with the lookup agent
//! 3. Fetch the raw profile (fixture or Proxycurl) and normalize it
//! 4. Summarize the normalized profile with one greedy LLM call
//! 5. Return the summary plus the raw profile picture URL
//!
//! ## Example
//!
//! ```rust,ignore
//! use icebreaker::{config::Config, pipeline::IceBreaker};
//!
//! let config = Config::from_env()?;
//! let ice_breaker = IceBreaker::from_config(&config)?;
//! let result = ice_breaker.ice_break_with("Eden Marco").await?;
//! println!("{}", result.summary);
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod profile;
pub mod summary;
pub mod tools;
pub mod twitter;

pub use config::Config;
pub use pipeline::IceBreaker;
