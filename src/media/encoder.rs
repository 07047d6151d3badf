//! Turns a glif run output into MCP content blocks.

use std::sync::Arc;

use thiserror::Error;

use crate::media::content::ContentBlock;
use crate::media::fetch::MediaFetcher;
use crate::media::mime::{MediaKind, MediaUrl, file_name};

/// Text returned when a run produced nothing usable.
pub const NO_OUTPUT_MESSAGE: &str = "No output received";

/// Output of a workflow run, consumed once per call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPayload {
    pub value: Option<String>,
    pub type_tag: Option<String>,
}

impl OutputPayload {
    pub fn new(value: Option<String>, type_tag: Option<String>) -> Self {
        Self { value, type_tag }
    }
}

/// Classification failures. Never escape [`MediaEncoder::encode`].
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("expected {expected} media but URL points to {found}")]
    KindMismatch { expected: MediaKind, found: MediaKind },
}

/// Encodes run outputs, inlining remote media through a [`MediaFetcher`].
pub struct MediaEncoder {
    fetcher: Arc<dyn MediaFetcher>,
}

impl MediaEncoder {
    pub fn new(fetcher: Arc<dyn MediaFetcher>) -> Self {
        Self { fetcher }
    }

    /// Encode an output. Always returns at least one block.
    pub async fn encode(&self, output: &OutputPayload) -> Vec<ContentBlock> {
        let (Some(value), Some(tag)) = (
            output.value.as_deref().filter(|v| !v.is_empty()),
            output.type_tag.as_deref().filter(|t| !t.trim().is_empty()),
        ) else {
            return vec![ContentBlock::text(NO_OUTPUT_MESSAGE)];
        };

        match self.classify(value, &tag.trim().to_uppercase()).await {
            Ok(blocks) => blocks,
            Err(e) => {
                tracing::warn!(output_type = %tag, "Falling back to raw output: {}", e);
                vec![ContentBlock::text(format!(
                    "⚠️ Could not process {tag} output ({e}). Raw value: {value}"
                ))]
            }
        }
    }

    async fn classify(&self, value: &str, tag: &str) -> Result<Vec<ContentBlock>, EncodeError> {
        match tag {
            "IMAGE" => self.encode_media(value, MediaKind::Image).await,
            "AUDIO" => self.encode_media(value, MediaKind::Audio).await,
            "VIDEO" => self.encode_media(value, MediaKind::Video).await,
            // JSON and HTML pass through untouched so structured payloads
            // reach the client byte for byte.
            _ => Ok(vec![ContentBlock::text(value)]),
        }
    }

    async fn encode_media(
        &self,
        value: &str,
        expected: MediaKind,
    ) -> Result<Vec<ContentBlock>, EncodeError> {
        let Some(media) = MediaUrl::parse(value) else {
            return Ok(vec![ContentBlock::text(format!(
                "[{}] {}",
                expected.label(),
                value
            ))]);
        };
        if media.kind != expected {
            return Err(EncodeError::KindMismatch {
                expected,
                found: media.kind,
            });
        }

        let uri = value.trim().to_string();
        let mut blocks = vec![ContentBlock::ResourceLink {
            uri: uri.clone(),
            name: file_name(&media.url)
                .map(str::to_string)
                .unwrap_or_else(|| format!("generated-{expected}")),
            mime_type: media.mime_type.to_string(),
            description: Some(format!("Generated {expected}")),
        }];

        match expected {
            MediaKind::Image => {
                if let Some(data) = self.inline(&uri).await {
                    blocks.push(ContentBlock::Image {
                        data,
                        mime_type: media.mime_type.to_string(),
                    });
                }
                blocks.push(ContentBlock::text(format!("![Generated Image]({uri})")));
            }
            MediaKind::Audio => {
                if let Some(data) = self.inline(&uri).await {
                    blocks.push(ContentBlock::Audio {
                        data,
                        mime_type: media.mime_type.to_string(),
                    });
                }
                blocks.push(ContentBlock::text(format!("🎵 Generated Audio: {uri}")));
            }
            // MCP has no inline video block.
            MediaKind::Video => {
                blocks.push(ContentBlock::text(format!("🎬 Generated Video: {uri}")));
            }
        }

        Ok(blocks)
    }

    /// Best-effort inline data; a failed fetch drops only this block.
    async fn inline(&self, url: &str) -> Option<String> {
        match self.fetcher.fetch_base64(url).await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(%url, "Could not inline media: {}", e);
                None
            }
        }
    }
}
