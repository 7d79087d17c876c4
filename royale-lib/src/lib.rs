//! Clash Royale API client library
//!
//! A Rust client for the official Clash Royale API (`api.clashroyale.com/v1`) and the
//! RoyaleAPI community mirror, usable in blocking or non-blocking mode with optional
//! response caching and a local rate-limit guard.

pub mod api;
pub mod cache;
pub mod clock;
pub mod error;
pub mod model;
pub mod rate_limit;
pub mod response;
pub mod tag;
pub mod transport;

mod client;
mod config;

pub use api::ApiVariant;
pub use api::Execute;
pub use api::Request;
pub use client::*;
pub use config::*;
pub use error::Error;
pub use response::CacheStatus;
pub use response::Response;
pub use tag::Tag;
