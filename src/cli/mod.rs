//! CLI command handling.
//!
//! Provides subcommands for:
//! - Serving tools over stdio (`serve`, the default)
//! - Managing saved glif tools (`tools list`, `tools remove`, `tools reset`, `tools import`)

mod tools;

pub use tools::{ToolsCommand, import_ids, run_tools_command};

use clap::{ColorChoice, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "glif-mcp")]
#[command(about = "MCP server exposing glif workflows as tools")]
#[command(
    long_about = "glif-mcp serves glif workflows to MCP clients over stdio.\nExamples:\n  glif-mcp  # Serve over stdio\n  glif-mcp tools list  # Show saved glif tools"
)]
#[command(version)]
#[command(color = ColorChoice::Auto)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Saved tools file (overrides GLIF_TOOLS_PATH)
    #[arg(long, global = true, env = "GLIF_TOOLS_PATH")]
    pub tools_path: Option<std::path::PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve MCP over stdio (default if no subcommand given)
    #[command(
        about = "Serve MCP over stdio",
        long_about = "Reads JSON-RPC requests from stdin and writes responses to stdout.\nExample: glif-mcp serve"
    )]
    Serve,

    /// Manage saved glif tools
    #[command(
        subcommand,
        about = "Manage saved glif tools",
        long_about = "List, remove, reset, or import saved glif tools.\nExample: glif-mcp tools import clx123,clx456"
    )]
    Tools(ToolsCommand),
}
