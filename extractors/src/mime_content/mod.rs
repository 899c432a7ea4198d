use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html";

/// Gmail sends base64url bodies, sometimes without trailing padding.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// One node of a message's MIME tree, in the shape the Gmail API returns it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub part_id: Option<String>,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub body: Option<MessagePartBody>,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePartBody {
    #[serde(default)]
    pub attachment_id: Option<String>,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub data: Option<String>,
}

impl MessagePart {
    /// Leaf part whose body is `content`, base64url encoded the way Gmail does it.
    #[cfg(any(test, feature = "test-support"))]
    pub fn leaf(mime_type: &str, content: &str) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            body: Some(MessagePartBody {
                attachment_id: None,
                size: content.len() as i64,
                data: Some(base64::engine::general_purpose::URL_SAFE.encode(content)),
            }),
            ..Default::default()
        }
    }

    /// Container part such as `multipart/alternative`.
    #[cfg(any(test, feature = "test-support"))]
    pub fn multipart(mime_type: &str, parts: Vec<MessagePart>) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            parts,
            ..Default::default()
        }
    }

    /// Decoded body text, if this node carries a non-empty, decodable payload.
    pub fn decoded_body(&self) -> Option<String> {
        let data = self.body.as_ref()?.data.as_deref()?;
        if data.is_empty() {
            return None;
        }

        let bytes = BASE64URL.decode(data).ok()?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Returns the first readable body in the tree, or an empty string.
///
/// Each node is checked before its children, and on a single node plain text
/// wins over HTML.
pub fn extract_message_content(part: &MessagePart) -> String {
    for mime_type in [TEXT_PLAIN, TEXT_HTML] {
        if part.mime_type == mime_type {
            if let Some(content) = part.decoded_body() {
                return content;
            }
        }
    }

    part.parts
        .iter()
        .map(extract_message_content)
        .find(|content| !content.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_leaf() {
        let part = MessagePart::leaf(TEXT_PLAIN, "Rs. 250 on 01-02-24");
        assert_eq!(extract_message_content(&part), "Rs. 250 on 01-02-24");
    }

    #[test]
    fn test_html_only_tree() {
        let part = MessagePart::multipart(
            "multipart/mixed",
            vec![MessagePart::leaf(TEXT_HTML, "<p>Rs. 1,234.50 on 05-03-24</p>")],
        );
        assert_eq!(
            extract_message_content(&part),
            "<p>Rs. 1,234.50 on 05-03-24</p>"
        );
    }

    #[test]
    fn test_first_readable_child_wins() {
        let part = MessagePart::multipart(
            "multipart/alternative",
            vec![
                MessagePart::leaf(TEXT_HTML, "<b>html version</b>"),
                MessagePart::leaf(TEXT_PLAIN, "plain version"),
            ],
        );
        assert_eq!(extract_message_content(&part), "<b>html version</b>");
    }

    #[test]
    fn test_nested_parts_and_attachments() {
        let attachment = MessagePart {
            mime_type: "application/pdf".to_string(),
            filename: Some("statement.pdf".to_string()),
            body: Some(MessagePartBody {
                attachment_id: Some("att-1".to_string()),
                size: 2048,
                data: None,
            }),
            ..Default::default()
        };
        let part = MessagePart::multipart(
            "multipart/mixed",
            vec![
                attachment,
                MessagePart::multipart(
                    "multipart/alternative",
                    vec![MessagePart::leaf(TEXT_PLAIN, "deep body")],
                ),
            ],
        );
        assert_eq!(extract_message_content(&part), "deep body");
    }

    #[test]
    fn test_undecodable_body_falls_through_to_children() {
        let mut part = MessagePart::multipart(
            TEXT_PLAIN,
            vec![MessagePart::leaf(TEXT_HTML, "<i>fallback</i>")],
        );
        part.body = Some(MessagePartBody {
            data: Some("***not base64***".to_string()),
            ..Default::default()
        });
        assert_eq!(extract_message_content(&part), "<i>fallback</i>");
    }

    #[test]
    fn test_no_readable_content() {
        let part = MessagePart::multipart(
            "multipart/mixed",
            vec![MessagePart {
                mime_type: "image/png".to_string(),
                ..Default::default()
            }],
        );
        assert_eq!(extract_message_content(&part), "");
    }

    #[test]
    fn test_unpadded_gmail_payload() {
        let json = r#"{
            "partId": "",
            "mimeType": "text/plain",
            "filename": "",
            "body": { "size": 2, "data": "aGk" }
        }"#;
        let part: MessagePart = serde_json::from_str(json).unwrap();
        assert_eq!(extract_message_content(&part), "hi");
    }
}
