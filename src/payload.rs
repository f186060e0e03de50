//! Key-publish / reply payload classification, applied to plaintext after
//! AEAD success.
//!
//! A plaintext beginning with `{` is speculatively parsed as JSON: a
//! `{"type":"key-publish"}` object collapses to the "no message" sentinel
//! (it is not a user-visible chat message); a `{"text": ...}` object
//! carries optional reply context; anything else is treated as plain UTF-8
//! text with no reply context.

use serde_json::Value;

/// Reply previews are truncated to this many UTF-8 bytes (77 bytes of
/// content + a 3-byte "…" marker = 80) before being embedded by the sender.
pub const REPLY_PREVIEW_MAX_BYTES: usize = 80;
const REPLY_PREVIEW_CONTENT_BYTES: usize = 77;
const ELLIPSIS: &str = "…";

/// A decrypted chat payload, or the sentinel meaning "this plaintext is
/// protocol bookkeeping, not a message for the user".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecryptedPayload {
    Message {
        text: String,
        reply_to_id: Option<String>,
        reply_to_preview: Option<String>,
    },
    NoMessage,
}

/// Classify AEAD-decrypted plaintext per §4.M.
pub fn classify(plaintext: &[u8]) -> DecryptedPayload {
    if plaintext.first() == Some(&b'{') {
        if let Ok(text) = std::str::from_utf8(plaintext) {
            if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(text) {
                if obj.get("type").and_then(Value::as_str) == Some("key-publish") {
                    return DecryptedPayload::NoMessage;
                }
                if let Some(msg_text) = obj.get("text").and_then(Value::as_str) {
                    let (reply_to_id, reply_to_preview) = obj
                        .get("replyTo")
                        .and_then(Value::as_object)
                        .map(|reply| {
                            (
                                reply.get("txid").and_then(Value::as_str).map(str::to_string),
                                reply
                                    .get("preview")
                                    .and_then(Value::as_str)
                                    .map(str::to_string),
                            )
                        })
                        .unwrap_or((None, None));
                    return DecryptedPayload::Message {
                        text: msg_text.to_string(),
                        reply_to_id,
                        reply_to_preview,
                    };
                }
            }
        }
    }

    DecryptedPayload::Message {
        text: String::from_utf8_lossy(plaintext).into_owned(),
        reply_to_id: None,
        reply_to_preview: None,
    }
}

/// Truncate a reply preview to [`REPLY_PREVIEW_MAX_BYTES`] UTF-8 bytes
/// (77 content bytes + "…") before it is embedded into an outbound
/// payload. Truncation happens at a UTF-8 char boundary at or before byte
/// 77; grapheme-cluster-safe truncation is left to callers per §9.
pub fn truncate_reply_preview(text: &str) -> String {
    if text.len() <= REPLY_PREVIEW_MAX_BYTES {
        return text.to_string();
    }
    let mut cut = REPLY_PREVIEW_CONTENT_BYTES;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut truncated = text[..cut].to_string();
    truncated.push_str(ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_publish_collapses_to_no_message() {
        let result = classify(br#"{"type":"key-publish"}"#);
        assert_eq!(result, DecryptedPayload::NoMessage);
    }

    #[test]
    fn plain_text_json_with_reply_context() {
        let result = classify(
            br#"{"text":"hi there","replyTo":{"txid":"ABC123","preview":"earlier msg"}}"#,
        );
        match result {
            DecryptedPayload::Message {
                text,
                reply_to_id,
                reply_to_preview,
            } => {
                assert_eq!(text, "hi there");
                assert_eq!(reply_to_id.as_deref(), Some("ABC123"));
                assert_eq!(reply_to_preview.as_deref(), Some("earlier msg"));
            }
            DecryptedPayload::NoMessage => panic!("expected a message"),
        }
    }

    #[test]
    fn non_json_plaintext_is_plain_text() {
        let result = classify(b"just plain text");
        assert_eq!(
            result,
            DecryptedPayload::Message {
                text: "just plain text".to_string(),
                reply_to_id: None,
                reply_to_preview: None,
            }
        );
    }

    #[test]
    fn json_looking_object_without_text_field_falls_back_to_raw_utf8() {
        let bytes = br#"{"foo":"bar"}"#;
        let result = classify(bytes);
        assert_eq!(
            result,
            DecryptedPayload::Message {
                text: String::from_utf8_lossy(bytes).into_owned(),
                reply_to_id: None,
                reply_to_preview: None,
            }
        );
    }

    #[test]
    fn reply_preview_truncates_to_80_bytes() {
        let long = "a".repeat(200);
        let truncated = truncate_reply_preview(&long);
        assert_eq!(truncated.len(), REPLY_PREVIEW_CONTENT_BYTES + ELLIPSIS.len());
        assert!(truncated.ends_with(ELLIPSIS));
    }

    #[test]
    fn short_reply_preview_is_untouched() {
        assert_eq!(truncate_reply_preview("short"), "short");
    }
}
