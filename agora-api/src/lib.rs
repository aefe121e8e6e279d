//! # Agora API Server Library
//!
//! Core functionality for the Agora board API server.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder, and the access-token guard
//! - `config`: Configuration management
//! - `error`: Error handling and the response envelope
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
