//! Saved tool CLI commands.

use clap::Subcommand;

use crate::api::GlifApi;
use crate::error::StoreError;
use crate::tools::{SavedBinding, SavedToolStore, parse_id_list};

#[derive(Subcommand, Debug, Clone)]
pub enum ToolsCommand {
    /// List saved glif tools
    List {
        /// Print the stored records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a saved glif tool
    Remove {
        /// Tool name to remove
        tool_name: String,
    },

    /// Remove every saved glif tool
    Reset,

    /// Save glifs as tools by id
    Import {
        /// Comma-separated glif ids (defaults to GLIF_IDS)
        ids: Option<String>,
    },
}

/// Run a tools command.
pub async fn run_tools_command(
    cmd: ToolsCommand,
    store: &SavedToolStore,
    api: &dyn GlifApi,
) -> anyhow::Result<()> {
    match cmd {
        ToolsCommand::List { json } => cmd_list(store, json).await,
        ToolsCommand::Remove { tool_name } => {
            if store.remove(&tool_name).await? {
                println!("Removed '{}'", tool_name);
            } else {
                println!("No saved tool named '{}'", tool_name);
            }
            Ok(())
        }
        ToolsCommand::Reset => {
            let count = store.remove_all().await?;
            println!("Removed {} saved tool(s) from {}", count, store.path().display());
            Ok(())
        }
        ToolsCommand::Import { ids } => {
            let raw = match ids {
                Some(ids) => ids,
                None => std::env::var("GLIF_IDS").unwrap_or_default(),
            };
            let ids = parse_id_list(&raw);
            if ids.is_empty() {
                anyhow::bail!("No glif ids given. Pass a comma-separated list or set GLIF_IDS.");
            }
            let count = import_ids(store, api, &ids).await?;
            println!("Imported {} glif tool(s) into {}", count, store.path().display());
            Ok(())
        }
    }
}

async fn cmd_list(store: &SavedToolStore, json: bool) -> anyhow::Result<()> {
    let bindings = store.get_all().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&bindings)?);
        return Ok(());
    }

    if bindings.is_empty() {
        println!("No saved tools in {}", store.path().display());
        return Ok(());
    }

    println!("{:<32} {:<28} NAME", "TOOL", "GLIF ID");
    println!("{}", "-".repeat(80));
    for b in &bindings {
        println!("{:<32} {:<28} {}", b.tool_name, b.id, b.name);
    }
    Ok(())
}

/// Save each id as a tool named after its glif, replacing same-named records.
///
/// Details are looked up concurrently; an id whose lookup fails is still
/// imported under `glif_<id>`.
pub async fn import_ids(
    store: &SavedToolStore,
    api: &dyn GlifApi,
    ids: &[String],
) -> Result<usize, StoreError> {
    let lookups = futures::future::join_all(ids.iter().map(|id| api.get_details(id))).await;

    let bindings = ids
        .iter()
        .zip(lookups)
        .map(|(id, lookup)| match lookup {
            Ok(details) => {
                let glif = details.glif;
                SavedBinding::new(
                    id,
                    glif.name.clone(),
                    glif.name,
                    glif.description.unwrap_or_default(),
                )
            }
            Err(e) => {
                tracing::warn!(glif_id = %id, "Importing without details: {}", e);
                SavedBinding::new(id, "", id, "")
            }
        })
        .collect();

    store.import(bindings).await
}
