//! PSK exchange URI codec:
//! `algochat-psk://v1?addr=<percent-encoded>&psk=<base64url>[&label=<percent-encoded>]`.
//!
//! Designed to be trivially encodable as a QR code — a textual carrier for
//! out-of-band PSK sharing, nothing more.

use base64::{engine::general_purpose, Engine as _};

use crate::error::AlgoChatError;

const SCHEME_PREFIX: &str = "algochat-psk://v1?";
const PSK_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PSKExchange {
    pub addr: String,
    pub psk: [u8; PSK_LEN],
    pub label: Option<String>,
}

/// Encode a PSK exchange URI.
pub fn create(addr: &str, psk: &[u8; PSK_LEN], label: Option<&str>) -> String {
    let mut uri = String::from(SCHEME_PREFIX);
    uri.push_str("addr=");
    uri.push_str(&percent_encode(addr));
    uri.push_str("&psk=");
    uri.push_str(&general_purpose::URL_SAFE_NO_PAD.encode(psk));
    if let Some(label) = label {
        uri.push_str("&label=");
        uri.push_str(&percent_encode(label));
    }
    uri
}

/// Parse a PSK exchange URI, rejecting anything that doesn't carry both
/// `addr` and a 32-byte `psk`. Unknown query parameters are ignored.
pub fn parse(uri: &str) -> Result<PSKExchange, AlgoChatError> {
    let query = uri.strip_prefix(SCHEME_PREFIX).ok_or_else(|| {
        AlgoChatError::PSKExchangeURIInvalid("missing algochat-psk://v1 scheme prefix".into())
    })?;

    let mut addr: Option<String> = None;
    let mut psk_field: Option<String> = None;
    let mut label: Option<String> = None;

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "addr" => addr = Some(percent_decode(value)?),
            "psk" => psk_field = Some(value.to_string()),
            "label" => label = Some(percent_decode(value)?),
            _ => {} // unknown parameters are ignored on parse
        }
    }

    let addr = addr.ok_or_else(|| AlgoChatError::PSKExchangeURIInvalid("missing addr".into()))?;
    let psk_field =
        psk_field.ok_or_else(|| AlgoChatError::PSKExchangeURIInvalid("missing psk".into()))?;

    let psk_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(psk_field.as_bytes())
        .map_err(|e| AlgoChatError::PSKExchangeURIInvalid(format!("invalid base64url psk: {e}")))?;
    if psk_bytes.len() != PSK_LEN {
        return Err(AlgoChatError::PSKExchangeURIInvalid(format!(
            "psk must decode to {PSK_LEN} bytes, got {}",
            psk_bytes.len()
        )));
    }
    let mut psk = [0u8; PSK_LEN];
    psk.copy_from_slice(&psk_bytes);

    Ok(PSKExchange { addr, psk, label })
}

/// Percent-encode everything outside `[A-Za-z0-9._~-]`, the URI-safe set
/// this format actually needs (no dependency on the `url`/`percent-encoding`
/// crates for a three-field query string).
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'~' | b'-' => {
                out.push(*byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn percent_decode(input: &str) -> Result<String, AlgoChatError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input
                .get(i + 1..i + 3)
                .ok_or_else(|| AlgoChatError::PSKExchangeURIInvalid("truncated percent-escape".into()))?;
            let value = u8::from_str_radix(hex, 16)
                .map_err(|_| AlgoChatError::PSKExchangeURIInvalid("invalid percent-escape".into()))?;
            out.push(value);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out)
        .map_err(|_| AlgoChatError::PSKExchangeURIInvalid("invalid UTF-8 after percent-decoding".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_with_label() {
        let psk = [0x42u8; 32];
        let uri = create("ALGOADDR123", &psk, Some("my phone"));
        let parsed = parse(&uri).unwrap();
        assert_eq!(parsed.addr, "ALGOADDR123");
        assert_eq!(parsed.psk, psk);
        assert_eq!(parsed.label.as_deref(), Some("my phone"));
    }

    #[test]
    fn round_trip_without_label() {
        let psk = [0x11u8; 32];
        let uri = create("ALGOADDR456", &psk, None);
        let parsed = parse(&uri).unwrap();
        assert_eq!(parsed.label, None);
    }

    #[test]
    fn rejects_missing_scheme() {
        assert!(parse("not-a-uri").is_err());
    }

    #[test]
    fn rejects_wrong_length_psk() {
        let uri = format!(
            "{SCHEME_PREFIX}addr=A&psk={}",
            general_purpose::URL_SAFE_NO_PAD.encode([1u8; 16])
        );
        assert!(parse(&uri).is_err());
    }

    #[test]
    fn unknown_query_params_are_ignored() {
        let psk = [7u8; 32];
        let uri = format!(
            "{SCHEME_PREFIX}addr=A&foo=bar&psk={}",
            general_purpose::URL_SAFE_NO_PAD.encode(psk)
        );
        let parsed = parse(&uri).unwrap();
        assert_eq!(parsed.addr, "A");
    }
}
