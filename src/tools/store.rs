//! Saved tool bindings persisted as a JSON array.
//!
//! The file is human-editable, so reads are forgiving: a missing file or one
//! that does not parse reads as empty, and individual records are coerced
//! into shape (names sanitized, timestamps repaired). Writes are strict and
//! atomic: the new array goes to a temporary sibling that is then renamed
//! over the original, so the last durable state always parses.
//!
//! Read-modify-write cycles are serialized within the process. Separate
//! processes sharing one file still race, last writer wins.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::config::ENV_TOOL_PREFIX;
use crate::error::StoreError;
use crate::tools::sanitize::sanitize_tool_name;

/// A user-created shortcut from a tool name to a glif.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBinding {
    /// Glif id run when the tool is called.
    pub id: String,
    /// Dispatch name; always satisfies the tool name grammar once stored.
    pub tool_name: String,
    /// Display name.
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl SavedBinding {
    pub fn new(
        id: impl Into<String>,
        tool_name: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            name: name.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}

/// Sanitized tool name, falling back to `glif_<id>` when nothing survives.
pub fn resolve_tool_name(raw: &str, id: &str) -> String {
    let name = sanitize_tool_name(raw);
    if name.is_empty() {
        sanitize_tool_name(&format!("{ENV_TOOL_PREFIX}{id}"))
    } else {
        name
    }
}

/// Split a comma-separated id list: trimmed, empties dropped, first
/// occurrence kept.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.to_string()))
        .map(str::to_string)
        .collect()
}

/// JSON-file store of [`SavedBinding`]s.
pub struct SavedToolStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SavedToolStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All saved bindings in file order. Never fails.
    pub async fn get_all(&self) -> Vec<SavedBinding> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Could not read saved tools: {}", e);
                return Vec::new();
            }
        };

        match decode_bindings(&raw) {
            Ok(bindings) => bindings,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Saved tools file is not a JSON array, treating as empty: {}",
                    e
                );
                Vec::new()
            }
        }
    }

    /// Insert or replace (by tool name) a binding. Returns what was stored.
    pub async fn save(&self, binding: SavedBinding) -> Result<SavedBinding, StoreError> {
        let binding = normalize(binding)?;

        let _guard = self.write_lock.lock().await;
        let mut all = self.get_all().await;
        upsert(&mut all, binding.clone());
        self.write(&all).await?;

        tracing::info!(tool = %binding.tool_name, glif_id = %binding.id, "Saved glif tool");
        Ok(binding)
    }

    /// Delete the binding with this tool name. Returns whether one existed.
    pub async fn remove(&self, tool_name: &str) -> Result<bool, StoreError> {
        let target = sanitize_tool_name(tool_name);

        let _guard = self.write_lock.lock().await;
        let mut all = self.get_all().await;
        let before = all.len();
        all.retain(|b| b.tool_name != target && b.tool_name != tool_name);
        if all.len() == before {
            return Ok(false);
        }
        self.write(&all).await?;

        tracing::info!(tool = %target, "Removed glif tool");
        Ok(true)
    }

    /// Delete every binding. Returns how many there were.
    pub async fn remove_all(&self) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        let count = self.get_all().await.len();
        self.write(&[]).await?;

        tracing::info!(count, "Removed all glif tools");
        Ok(count)
    }

    /// Bulk upsert. Imported records replace stored ones with the same tool
    /// name; within the batch the first record for a name wins.
    pub async fn import(&self, bindings: Vec<SavedBinding>) -> Result<usize, StoreError> {
        let mut seen = HashSet::new();
        let mut incoming = Vec::with_capacity(bindings.len());
        for binding in bindings {
            let binding = normalize(binding)?;
            if seen.insert(binding.tool_name.clone()) {
                incoming.push(binding);
            }
        }
        if incoming.is_empty() {
            return Ok(0);
        }

        let _guard = self.write_lock.lock().await;
        let mut all = self.get_all().await;
        let count = incoming.len();
        for binding in incoming {
            upsert(&mut all, binding);
        }
        self.write(&all).await?;

        tracing::info!(count, "Imported glif tools");
        Ok(count)
    }

    async fn write(&self, bindings: &[SavedBinding]) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let mut json = serde_json::to_string_pretty(bindings)?;
        json.push('\n');

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_err(e));
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "saved-tools.json".to_string());
        self.path
            .with_file_name(format!(".{}.tmp-{}", file_name, std::process::id()))
    }
}

fn upsert(all: &mut Vec<SavedBinding>, binding: SavedBinding) {
    match all.iter_mut().find(|b| b.tool_name == binding.tool_name) {
        Some(existing) => *existing = binding,
        None => all.push(binding),
    }
}

fn normalize(mut binding: SavedBinding) -> Result<SavedBinding, StoreError> {
    binding.id = binding.id.trim().to_string();
    if binding.id.is_empty() {
        return Err(StoreError::InvalidBinding(
            "glif id must not be empty".to_string(),
        ));
    }
    binding.tool_name = resolve_tool_name(&binding.tool_name, &binding.id);
    Ok(binding)
}

/// Decode the file contents. Only a non-array document is an error;
/// unusable records inside the array are skipped.
fn decode_bindings(raw: &str) -> Result<Vec<SavedBinding>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<Value> = serde_json::from_str(raw)?;
    Ok(records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let decoded = decode_record(&record);
            if decoded.is_none() {
                tracing::warn!(index, "Skipping saved tool record without a glif id");
            }
            decoded
        })
        .collect())
}

fn decode_record(record: &Value) -> Option<SavedBinding> {
    let obj = record.as_object()?;
    let id = first_str(obj, &["id", "glifId", "sourceId"])
        .map(str::trim)
        .filter(|id| !id.is_empty())?
        .to_string();
    let name = first_str(obj, &["name", "displayName"])
        .unwrap_or(&id)
        .to_string();
    let raw_tool_name = first_str(obj, &["toolName"]).unwrap_or(&name);

    Some(SavedBinding {
        tool_name: resolve_tool_name(raw_tool_name, &id),
        description: first_str(obj, &["description"])
            .unwrap_or_default()
            .to_string(),
        created_at: coerce_timestamp(obj.get("createdAt")),
        name,
        id,
    })
}

fn first_str<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_str))
}

/// Accept RFC 3339 strings or epoch milliseconds; anything else becomes now.
fn coerce_timestamp(value: Option<&Value>) -> DateTime<Utc> {
    let parsed = match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                s.trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(DateTime::from_timestamp_millis)
            }),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };
    parsed.unwrap_or_else(Utc::now)
}
