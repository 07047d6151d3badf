//! Filesystem locations used before configuration is resolved.

use std::path::PathBuf;

/// Base directory for glif-mcp state (`~/.glif-mcp`).
///
/// Falls back to the current directory when no home directory is known.
pub fn glif_base_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".glif-mcp")
}

/// Load `.env` from the working directory, if present.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Warning: failed to load .env: {e}");
    }
}
