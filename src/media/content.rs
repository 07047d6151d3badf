//! MCP content blocks returned from tool calls.

use serde::{Deserialize, Serialize};

/// One self-describing unit of tool output.
///
/// Serialized with a `type` discriminator, matching the MCP wire shape.
/// Base64 payloads are built per call and dropped with the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    Audio {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    ResourceLink {
        uri: String,
        name: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The text payload, if this is a text block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_block_wire_shape() {
        let json = serde_json::to_value(ContentBlock::text("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "text": "hi"}));
    }

    #[test]
    fn test_resource_link_wire_shape() {
        let block = ContentBlock::ResourceLink {
            uri: "https://example.com/a.png".to_string(),
            name: "a.png".to_string(),
            mime_type: "image/png".to_string(),
            description: None,
        };
        let json = serde_json::to_value(block).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "resource_link",
                "uri": "https://example.com/a.png",
                "name": "a.png",
                "mimeType": "image/png"
            })
        );
    }

    #[test]
    fn test_image_block_uses_camel_case_mime() {
        let block = ContentBlock::Image {
            data: "AAAA".to_string(),
            mime_type: "image/gif".to_string(),
        };
        let json = serde_json::to_value(block).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["mimeType"], "image/gif");
    }
}
