use crate::types::{RelayUrl, Tag};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Why an invoice's metadata did not yield a usable zap request.
///
/// None of these are fatal to the payment loop; the payment is consumed and
/// the checkpoint still advances.
#[derive(Error, Debug)]
pub enum RequestError {
    /// The invoice description was not json at all
    #[error("description is not parsable json: {0}")]
    UnparsableDescription(#[from] serde_json::Error),

    /// The description parsed but carried no zap request note
    #[error("no zap request note found in description")]
    NoRequestNote,

    /// The note's tags field is absent or not an array of string-arrays
    #[error("request note tags are missing or malformed")]
    MalformedTags,

    /// The note carried no tags at all
    #[error("request note has no tags")]
    EmptyTags,

    /// None, or more than one, p tag: the payee would be ambiguous
    #[error("expected exactly one p tag, found {0}")]
    PayeeArity(usize),

    /// More than one e tag: the referenced note would be ambiguous
    #[error("expected zero or one e tags, found {0}")]
    EventArity(usize),

    /// The relays tag is required
    #[error("no relays tag found")]
    MissingRelays,
}

/// A validated zap request (kind 9734), extracted from paid invoice metadata.
///
/// Construction succeeds only after the arity checks pass, so holders can rely
/// on exactly one payee and at most one referenced note.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ZapRequest {
    /// The content the payer attached, carried over into the receipt
    pub content: String,

    /// The single p tag naming the payee, verbatim from the request
    pub p_tag: Tag,

    /// The optional e tag naming the zapped note, verbatim from the request
    pub e_tag: Option<Tag>,

    /// The relays the payer asked the receipt to be broadcast to.
    /// May be empty, in which case no broadcast happens.
    pub relays: Vec<RelayUrl>,
}

impl ZapRequest {
    /// Extract and validate a zap request from an invoice's description.
    ///
    /// `label` is only used in diagnostics. Every abort is logged with the
    /// label and the offending field before the error is returned.
    pub fn from_invoice_description(
        label: &str,
        description: &str,
    ) -> Result<ZapRequest, RequestError> {
        match Self::extract(description) {
            Ok(req) => Ok(req),
            Err(e) => {
                warn!("skipping invoice {}: {}", label, e);
                Err(e)
            }
        }
    }

    fn extract(description: &str) -> Result<ZapRequest, RequestError> {
        let parsed: Value = serde_json::from_str(description)?;
        let note = resolve_request_note(&parsed).ok_or(RequestError::NoRequestNote)?;

        let tags: Vec<Tag> = match note.get("tags") {
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|_| RequestError::MalformedTags)?
            }
            None => return Err(RequestError::MalformedTags),
        };
        if tags.is_empty() {
            return Err(RequestError::EmptyTags);
        }

        // Exactly one payee
        let ptags: Vec<&Tag> = tags
            .iter()
            .filter(|t| t.tagname() == "p" && t.len() >= 2)
            .collect();
        if ptags.len() != 1 {
            return Err(RequestError::PayeeArity(ptags.len()));
        }

        // At most one referenced note
        let etags: Vec<&Tag> = tags.iter().filter(|t| t.tagname() == "e").collect();
        if etags.len() > 1 {
            return Err(RequestError::EventArity(etags.len()));
        }

        let relays_tag = tags
            .iter()
            .find(|t| t.tagname() == "relays")
            .ok_or(RequestError::MissingRelays)?;

        let mut relays: Vec<RelayUrl> = Vec::new();
        if let Some(entries) = relays_tag.relay_entries() {
            for entry in entries {
                match RelayUrl::new_validated(entry) {
                    Ok(url) => relays.push(url),
                    Err(e) => debug!("dropping relay entry {}: {}", entry, e),
                }
            }
        }

        let content = note
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();

        Ok(ZapRequest {
            content,
            p_tag: (*ptags[0]).clone(),
            e_tag: etags.first().map(|t| (*t).clone()),
            relays,
        })
    }
}

/// Locate the zap request note inside parsed invoice metadata.
///
/// The note is either the metadata itself (modern encoding, `kind` 9734) or
/// the value of an `["application/nostr", <note>]` pair in a metadata
/// tag-pair list (legacy encoding).
fn resolve_request_note(parsed: &Value) -> Option<&Value> {
    if parsed.get("kind").and_then(Value::as_u64) == Some(9734) {
        return Some(parsed);
    }

    if let Some(list) = parsed.as_array() {
        for entry in list {
            if let Some(pair) = entry.as_array() {
                if pair.len() >= 2 && pair[0].as_str() == Some("application/nostr") {
                    return Some(&pair[1]);
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod test {
    use super::*;

    const PAYEE: &str = "ee11a5dff40c19a555f41fe42b48f00e618c91225622ae37b6c2bb67b76c4e49";
    const NOTE_ID: &str = "5df64b33303d62afc799bdc36d178c07b2e1f0d824f31b7dc812219440affab6";

    fn direct_description() -> String {
        format!(
            r#"{{"kind":9734,"content":"gm","tags":[["p","{}"],["relays","wss://r1.example"]]}}"#,
            PAYEE
        )
    }

    #[test]
    fn test_direct_encoding() {
        let req = ZapRequest::from_invoice_description("inv1", &direct_description()).unwrap();
        assert_eq!(req.content, "gm");
        assert_eq!(req.p_tag, Tag::new(&["p", PAYEE]));
        assert!(req.e_tag.is_none());
        assert_eq!(req.relays, vec![RelayUrl("wss://r1.example".to_owned())]);
    }

    #[test]
    fn test_legacy_encoding_resolves_identically() {
        let legacy = format!(r#"[["application/nostr", {}]]"#, direct_description());
        let direct = ZapRequest::from_invoice_description("inv1", &direct_description()).unwrap();
        let from_legacy = ZapRequest::from_invoice_description("inv1", &legacy).unwrap();
        assert_eq!(direct, from_legacy);
    }

    #[test]
    fn test_unparsable_description() {
        let err = ZapRequest::from_invoice_description("inv1", "not json").unwrap_err();
        assert!(matches!(err, RequestError::UnparsableDescription(_)));
    }

    #[test]
    fn test_no_request_note() {
        let err = ZapRequest::from_invoice_description("inv1", r#"{"kind":1}"#).unwrap_err();
        assert!(matches!(err, RequestError::NoRequestNote));

        let err =
            ZapRequest::from_invoice_description("inv1", r#"[["text/plain","hi"]]"#).unwrap_err();
        assert!(matches!(err, RequestError::NoRequestNote));
    }

    #[test]
    fn test_missing_and_empty_tags() {
        let err =
            ZapRequest::from_invoice_description("inv1", r#"{"kind":9734}"#).unwrap_err();
        assert!(matches!(err, RequestError::MalformedTags));

        let err = ZapRequest::from_invoice_description("inv1", r#"{"kind":9734,"tags":[]}"#)
            .unwrap_err();
        assert!(matches!(err, RequestError::EmptyTags));
    }

    #[test]
    fn test_p_tag_arity() {
        let none = r#"{"kind":9734,"tags":[["relays","wss://r1.example"]]}"#;
        let err = ZapRequest::from_invoice_description("inv1", none).unwrap_err();
        assert!(matches!(err, RequestError::PayeeArity(0)));

        let two = format!(
            r#"{{"kind":9734,"tags":[["p","{0}"],["p","{0}"],["relays"]]}}"#,
            PAYEE
        );
        let err = ZapRequest::from_invoice_description("inv1", &two).unwrap_err();
        assert!(matches!(err, RequestError::PayeeArity(2)));

        // a short p tag does not count as a payee
        let short = r#"{"kind":9734,"tags":[["p"],["relays"]]}"#;
        let err = ZapRequest::from_invoice_description("inv1", short).unwrap_err();
        assert!(matches!(err, RequestError::PayeeArity(0)));
    }

    #[test]
    fn test_e_tag_arity() {
        let two = format!(
            r#"{{"kind":9734,"tags":[["p","{0}"],["e","{1}"],["e","{1}"],["relays"]]}}"#,
            PAYEE, NOTE_ID
        );
        let err = ZapRequest::from_invoice_description("inv1", &two).unwrap_err();
        assert!(matches!(err, RequestError::EventArity(2)));

        let one = format!(
            r#"{{"kind":9734,"tags":[["p","{0}"],["e","{1}"],["relays"]]}}"#,
            PAYEE, NOTE_ID
        );
        let req = ZapRequest::from_invoice_description("inv1", &one).unwrap();
        assert_eq!(req.e_tag, Some(Tag::new(&["e", NOTE_ID])));
    }

    #[test]
    fn test_relays_required_and_filtered() {
        let missing = format!(r#"{{"kind":9734,"tags":[["p","{}"]]}}"#, PAYEE);
        let err = ZapRequest::from_invoice_description("inv1", &missing).unwrap_err();
        assert!(matches!(err, RequestError::MissingRelays));

        let mixed = format!(
            r#"{{"kind":9734,"tags":[["p","{}"],["relays","wss://good.example","https://bad.example","junk"]]}}"#,
            PAYEE
        );
        let req = ZapRequest::from_invoice_description("inv1", &mixed).unwrap();
        assert_eq!(req.relays, vec![RelayUrl("wss://good.example".to_owned())]);

        // empty relay list is legal
        let empty = format!(r#"{{"kind":9734,"tags":[["p","{}"],["relays"]]}}"#, PAYEE);
        let req = ZapRequest::from_invoice_description("inv1", &empty).unwrap();
        assert!(req.relays.is_empty());
    }
}
