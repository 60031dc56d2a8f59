//! Shortkeep - an owner-scoped URL shortener
//!
//! Short ids map to target URLs. Anyone may follow a link; only the caller
//! that created it may list or delete it. Uniqueness and ownership are
//! enforced by conditional store operations, never by read-then-write.
//!
//! # Architecture
//! - `storage`: record store trait, SeaORM and in-memory backends
//! - `services`: the four shortened URL operations
//! - `api`: HTTP handlers and middleware
//! - `config`: static configuration and CLI arguments
//! - `runtime`: startup, shutdown and the server mode
//! - `system`: logging

pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
