//! # Stock Data MCP Server
//!
//! A Model Context Protocol (MCP) server giving AI assistants read-only
//! access to a MongoDB collection of company financial records.
//!
//! This crate provides:
//! - **Resources**: the collection as `mongodb://<collection>`, first page of documents
//! - **Tools**: `query_<collection>`, a filtered and bounded find
//! - **Health**: connectivity and collection metadata over HTTP
//!
//! ## Architecture
//!
//! One long-lived store handle is opened at startup and injected into the
//! server; every request performs at most one bounded read through it. Request
//! failures are rendered as text results, so a bad call never ends the session.

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod resources;
pub mod security;
pub mod server;
pub mod shutdown;
pub mod telemetry;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::ServerError;
pub use server::StockDataMcpServer;
