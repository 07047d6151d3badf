//! glif-mcp: glif workflows served as MCP tools.
//!
//! - [`tools`] composes the tool namespace (core, flag-gated groups, saved
//!   bindings, `GLIF_IDS`) and persists saved bindings
//! - [`media`] turns run outputs into content blocks, fetching remote media
//!   under SSRF and size limits
//! - [`api`] talks to the glif API
//! - [`server`] speaks JSON-RPC over stdio

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod server;
pub mod tools;
