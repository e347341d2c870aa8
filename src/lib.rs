//! A buffer-oriented TLS 1.0/1.1/1.2 record-layer engine.
//!
//! This crate implements the part of a TLS stack that sits below the
//! handshake: parsing and building records, switching between the null,
//! CBC+HMAC and AEAD-GCM codecs at a change-cipher-spec boundary, and
//! caching session parameters for resumption. It does not parse handshake
//! messages, perform key exchange, or verify certificates — those belong
//! to a handshake processor layered on top, the same way BearSSL splits
//! `br_ssl_engine_context` from `br_ssl_client_context`/`br_ssl_server_context`.
//!
//! A host drives an [`engine::Engine`] through four streams
//! (`sendapp`/`recvapp`/`sendrec`/`recvrec`), each exposing a `_buf()` /
//! `_ack(n)` pair, and reacts to [`engine::Engine::current_state`] to know
//! which streams currently have work available.

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod flags;
pub mod primitives;
pub mod record;
pub mod reneg;
pub mod session;
pub mod suites;
pub mod version;

pub use config::{CacheConfig, EngineConfig};
pub use engine::Engine;
pub use error::{EngineError, Result};
