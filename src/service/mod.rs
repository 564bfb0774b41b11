//! Collector agent API
//!
//! - `HttpSessionService` - reqwest client implementing the shell's service traits

mod client;

pub use client::*;
