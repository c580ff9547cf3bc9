use crate::types::{Id, PublicKey};
use crate::Error;
use serde::{Deserialize, Serialize};

/// A tag on an Event
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tag(Vec<String>);

impl Tag {
    const EMPTY_STRING: &'static str = "";

    /// Create a new tag
    pub fn new(fields: &[&str]) -> Tag {
        Tag(fields.iter().map(|f| (*f).to_owned()).collect())
    }

    /// Number of string fields in the tag
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tag has no fields at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the string at the given index
    pub fn get_index(&self, index: usize) -> &str {
        if self.len() > index {
            &self.0[index]
        } else {
            Self::EMPTY_STRING
        }
    }

    /// Get the tag name for the tag (the first string in the array)
    pub fn tagname(&self) -> &str {
        self.get_index(0)
    }

    /// Get the tag value (index 1, after the tag name)
    pub fn value(&self) -> &str {
        self.get_index(1)
    }

    /// Create a "p" tag referring to a payee
    pub fn new_pubkey(pubkey: PublicKey) -> Tag {
        Tag(vec!["p".to_owned(), pubkey.as_hex_string()])
    }

    /// Parse a "p" tag
    /// `['p', <pubkeyhex>, ...]`
    pub fn parse_pubkey(&self) -> Result<PublicKey, Error> {
        if self.len() < 2 || self.get_index(0) != "p" {
            return Err(Error::InvalidPublicKey);
        }
        PublicKey::try_from_hex_string(self.get_index(1))
    }

    /// Create an "e" tag referring to another event
    pub fn new_event(id: Id) -> Tag {
        Tag(vec!["e".to_owned(), id.as_hex_string()])
    }

    /// Parse an "e" tag
    /// `['e', <idhex>, ...]`
    pub fn parse_event(&self) -> Result<Id, Error> {
        if self.len() < 2 || self.get_index(0) != "e" {
            return Err(Error::InvalidId);
        }
        Id::try_from_hex_string(self.get_index(1))
    }

    /// Create a "bolt11" tag carrying the paid invoice string
    pub fn new_bolt11(bolt11: &str) -> Tag {
        Tag(vec!["bolt11".to_owned(), bolt11.to_owned()])
    }

    /// Create a "description" tag carrying the raw invoice metadata json
    pub fn new_description(description: &str) -> Tag {
        Tag(vec!["description".to_owned(), description.to_owned()])
    }

    /// Create a "preimage" tag carrying the payment preimage
    pub fn new_preimage(preimage: &str) -> Tag {
        Tag(vec!["preimage".to_owned(), preimage.to_owned()])
    }

    /// Get the entries of a "relays" tag (everything after the tag name)
    ///
    /// Returns None if this is not a relays tag.
    pub fn relay_entries(&self) -> Option<&[String]> {
        if self.tagname() == "relays" {
            self.0.get(1..)
        } else {
            None
        }
    }

    // Mock data for testing
    #[allow(dead_code)]
    pub(crate) fn mock() -> Tag {
        Tag(vec!["e".to_string(), Id::mock().as_hex_string()])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    test_serde! {Tag, test_tag_serde}

    #[test]
    fn test_tag_p_roundtrip() {
        let pubkey = PublicKey::mock();
        let tag = Tag::new_pubkey(pubkey);
        assert_eq!(tag.tagname(), "p");
        assert_eq!(tag.parse_pubkey().unwrap(), pubkey);
    }

    #[test]
    fn test_tag_e_roundtrip() {
        let id = Id::mock();
        let tag = Tag::new_event(id);
        assert_eq!(tag.parse_event().unwrap(), id);
        assert!(Tag::new(&["p", "beef"]).parse_event().is_err());
    }

    #[test]
    fn test_relay_entries() {
        let tag = Tag::new(&["relays", "wss://a.example", "wss://b.example"]);
        let entries = tag.relay_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(Tag::new(&["p", "beef"]).relay_entries().is_none());

        let bare = Tag::new(&["relays"]);
        assert_eq!(bare.relay_entries().unwrap().len(), 0);
    }
}
