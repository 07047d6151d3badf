//! Composes the tool namespace served to clients.
//!
//! Four sources feed one namespace: the always-on core tools, optional tool
//! groups gated by [`ToolsConfig`] flags, saved bindings from the
//! [`SavedToolStore`], and glif ids from `GLIF_IDS`. Every request builds a
//! fresh [`Snapshot`] from the current flags and store contents, and both
//! listing and dispatch read that one snapshot, so a hidden tool is never
//! callable and a listed tool is never unreachable.
//!
//! Listing order is core, active groups, saved, env ids. Dispatch precedence
//! is core, saved, env ids, groups. When two sources produce the same name,
//! only the entry that wins dispatch is listed.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::config::{ToolsConfig, ToolsConfigProvider};
use crate::error::DispatchError;
use crate::media::ContentBlock;
use crate::tools::bound::BoundGlifTool;
use crate::tools::builtin;
use crate::tools::runner::GlifRunner;
use crate::tools::store::SavedToolStore;
use crate::tools::tool::{Tool, ToolDefinition};

/// A named set of tools switched on and off together.
pub struct ToolGroup {
    pub name: &'static str,
    /// Evaluated against the current flags on every request.
    pub is_active: fn(&ToolsConfig) -> bool,
    pub tools: Vec<Arc<dyn Tool>>,
}

impl ToolGroup {
    pub fn new(
        name: &'static str,
        is_active: fn(&ToolsConfig) -> bool,
        tools: Vec<Arc<dyn Tool>>,
    ) -> Self {
        Self {
            name,
            is_active,
            tools,
        }
    }
}

/// Where a tool came from. Declaration order is dispatch precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Source {
    Core,
    Saved,
    EnvId,
    Group(usize),
}

struct SnapshotEntry {
    source: Source,
    origin: &'static str,
    tool: Arc<dyn Tool>,
}

/// The namespace as of one request.
struct Snapshot {
    /// In listing order.
    entries: Vec<SnapshotEntry>,
    /// Tool name to the index of the entry that dispatches for it.
    winners: HashMap<String, usize>,
}

impl Snapshot {
    fn new(entries: Vec<SnapshotEntry>) -> Self {
        let mut winners: HashMap<String, usize> = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match winners.entry(entry.tool.name().to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
                Entry::Occupied(mut slot) => {
                    if entry.source < entries[*slot.get()].source {
                        slot.insert(index);
                    }
                }
            }
        }
        Self { entries, winners }
    }

    fn resolve(&self, name: &str) -> Option<&SnapshotEntry> {
        self.winners.get(name).map(|&index| &self.entries[index])
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        let mut out = Vec::with_capacity(self.winners.len());
        for (index, entry) in self.entries.iter().enumerate() {
            let name = entry.tool.name();
            let winner = self.winners[name];
            if winner == index {
                out.push(entry.tool.definition());
            } else {
                tracing::warn!(
                    tool = %name,
                    shadowed = entry.origin,
                    kept = self.entries[winner].origin,
                    "Duplicate tool name, listing only the entry that handles calls"
                );
            }
        }
        out
    }
}

/// Registry serving `tools/list` and `tools/call`.
pub struct ToolRegistry {
    core: Vec<Arc<dyn Tool>>,
    groups: Vec<ToolGroup>,
    runner: Arc<GlifRunner>,
    store: Arc<SavedToolStore>,
    config: ToolsConfigProvider,
}

impl ToolRegistry {
    /// Registry with the built-in core tools and optional groups.
    pub fn new(
        runner: Arc<GlifRunner>,
        store: Arc<SavedToolStore>,
        config: ToolsConfigProvider,
    ) -> Self {
        let core = builtin::core_tools(&runner);
        let groups = builtin::optional_groups(&runner, &store);
        Self::with_tools(core, groups, runner, store, config)
    }

    /// Registry with caller-supplied core tools and groups.
    pub fn with_tools(
        core: Vec<Arc<dyn Tool>>,
        groups: Vec<ToolGroup>,
        runner: Arc<GlifRunner>,
        store: Arc<SavedToolStore>,
        config: ToolsConfigProvider,
    ) -> Self {
        Self {
            core,
            groups,
            runner,
            store,
            config,
        }
    }

    /// Names of all declared groups, active or not.
    pub fn group_names(&self) -> Vec<&'static str> {
        self.groups.iter().map(|g| g.name).collect()
    }

    /// Current tool listing. Names are unique.
    pub async fn list(&self) -> Vec<ToolDefinition> {
        let snapshot = self.snapshot(true).await;
        let definitions = snapshot.definitions();
        tracing::debug!(count = definitions.len(), "Listed tools");
        definitions
    }

    /// Call the tool registered under `name`.
    pub async fn dispatch(
        &self,
        name: &str,
        args: serde_json::Value,
    ) -> Result<Vec<ContentBlock>, DispatchError> {
        let snapshot = self.snapshot(false).await;
        let Some(entry) = snapshot.resolve(name) else {
            tracing::debug!(tool = %name, "Unknown tool");
            return Err(DispatchError::MethodNotFound(name.to_string()));
        };

        tracing::info!(tool = %name, source = entry.origin, "Calling tool");
        match entry.tool.execute(args).await {
            Ok(blocks) => Ok(blocks),
            Err(e) => {
                tracing::warn!(tool = %name, "Tool call failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Build the namespace for the current flags and store contents.
    ///
    /// Env-id descriptions come from the API, which only the listing needs.
    async fn snapshot(&self, describe_env_tools: bool) -> Snapshot {
        let config = (self.config)();
        let mut entries = Vec::new();

        for tool in &self.core {
            entries.push(SnapshotEntry {
                source: Source::Core,
                origin: "core",
                tool: Arc::clone(tool),
            });
        }

        for (index, group) in self.groups.iter().enumerate() {
            if !(group.is_active)(&config) {
                continue;
            }
            for tool in &group.tools {
                entries.push(SnapshotEntry {
                    source: Source::Group(index),
                    origin: group.name,
                    tool: Arc::clone(tool),
                });
            }
        }

        if config.saved_tools {
            for binding in self.store.get_all().await {
                entries.push(SnapshotEntry {
                    source: Source::Saved,
                    origin: "saved",
                    tool: Arc::new(BoundGlifTool::saved(&binding, Arc::clone(&self.runner))),
                });
            }
        }

        for tool in self.env_tools(&config.glif_ids, describe_env_tools).await {
            entries.push(SnapshotEntry {
                source: Source::EnvId,
                origin: "env",
                tool,
            });
        }

        Snapshot::new(entries)
    }

    async fn env_tools(&self, ids: &[String], describe: bool) -> Vec<Arc<dyn Tool>> {
        let glifs = if describe {
            let api = self.runner.api();
            futures::future::join_all(ids.iter().map(|id| async move {
                match api.get_details(id).await {
                    Ok(details) => Some(details.glif),
                    Err(e) => {
                        tracing::warn!(glif_id = %id, "Could not describe glif tool: {}", e);
                        None
                    }
                }
            }))
            .await
        } else {
            vec![None; ids.len()]
        };

        ids.iter()
            .zip(glifs)
            .map(|(id, glif)| {
                Arc::new(BoundGlifTool::from_env_id(
                    id,
                    glif.as_ref(),
                    Arc::clone(&self.runner),
                )) as Arc<dyn Tool>
            })
            .collect()
    }
}
