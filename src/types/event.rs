use crate::types::{EventKind, Id, KeyPair, PublicKey, Signature, Tag, Unixtime};
use crate::Error;
use serde::{Deserialize, Serialize};

/// The main event type
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Event {
    /// The Id of the event, generated as a SHA256 of the inner event data
    pub id: Id,

    /// The public key of the actor who created the event
    pub pubkey: PublicKey,

    /// The (unverified) time at which the event was created
    pub created_at: Unixtime,

    /// The kind of event
    pub kind: EventKind,

    /// The signature of the event, which cryptographically verifies that the holder of
    /// the PrivateKey matching the event's PublicKey generated (or authorized) this event.
    /// The signature is taken over the id field only, but the id field is taken over
    /// the rest of the event data.
    pub sig: Signature,

    /// The content of the event
    pub content: String,

    /// A set of tags that apply to the event
    pub tags: Vec<Tag>,
}

macro_rules! serialize_inner_event {
    ($pubkey:expr, $created_at:expr, $kind:expr, $tags:expr,
     $content:expr) => {{
        format!(
            "[0,{},{},{},{},{}]",
            serde_json::to_string($pubkey)?,
            serde_json::to_string($created_at)?,
            serde_json::to_string($kind)?,
            serde_json::to_string($tags)?,
            serde_json::to_string($content)?
        )
    }};
}

/// Data used to construct an event
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PreEvent {
    /// The public key of the actor who is creating the event
    pub pubkey: PublicKey,
    /// The time at which the event was created
    pub created_at: Unixtime,
    /// The kind of event
    pub kind: EventKind,
    /// A set of tags that apply to the event
    pub tags: Vec<Tag>,
    /// The content of the event
    pub content: String,
}

impl PreEvent {
    /// Generate an Id from this PreEvent for use in an Event
    pub fn hash(&self) -> Result<Id, Error> {
        use secp256k1::hashes::Hash;

        let serialized: String = serialize_inner_event!(
            &self.pubkey,
            &self.created_at,
            &self.kind,
            &self.tags,
            &self.content
        );

        let hash = secp256k1::hashes::sha256::Hash::hash(serialized.as_bytes());
        let id: [u8; 32] = hash.to_byte_array();
        Ok(Id(id))
    }

    /// Hash and sign into a full Event
    pub fn sign(self, keypair: &KeyPair) -> Result<Event, Error> {
        let id = self.hash()?;
        let sig = keypair.privkey.sign_id(id)?;
        Ok(Event {
            id,
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
            sig,
        })
    }
}

impl Event {
    /// Check the validity of an event. This is useful if you deserialize an event
    /// from the network. If you create an event by signing a PreEvent it should
    /// already be trustworthy.
    pub fn verify(&self) -> Result<(), Error> {
        use secp256k1::hashes::Hash;

        let serialized: String = serialize_inner_event!(
            &self.pubkey,
            &self.created_at,
            &self.kind,
            &self.tags,
            &self.content
        );

        let hash = secp256k1::hashes::sha256::Hash::hash(serialized.as_bytes());
        let id: [u8; 32] = hash.to_byte_array();
        if id != self.id.0 {
            return Err(Error::HashMismatch);
        }

        self.pubkey.verify_id(self.id, &self.sig)
    }

    // Mock data for testing
    #[allow(dead_code)]
    pub(crate) fn mock() -> Event {
        let keypair = KeyPair::from_private_key(crate::PrivateKey::mock());
        let pre = PreEvent {
            pubkey: keypair.pubkey,
            created_at: Unixtime::mock(),
            kind: EventKind::mock(),
            tags: vec![Tag::mock(), Tag::mock()],
            content: "This is a test".to_string(),
        };
        pre.sign(&keypair).unwrap()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::PrivateKey;

    test_serde! {Event, test_event_serde}

    #[test]
    fn test_event_sign_and_verify() {
        let keypair = KeyPair::from_private_key(PrivateKey::mock());
        let preevent = PreEvent {
            pubkey: keypair.pubkey,
            created_at: Unixtime::mock(),
            kind: EventKind::ZapReceipt,
            tags: vec![Tag::new_event(Id::mock())],
            content: "Hello World!".to_string(),
        };
        let mut event = preevent.sign(&keypair).unwrap();

        assert!(event.verify().is_ok());

        // Now make sure it fails when the message has been modified
        event.content = "I'm changing this message".to_string();
        let result = event.verify();
        assert!(result.is_err());

        // Change it back
        event.content = "Hello World!".to_string();
        let result = event.verify();
        assert!(result.is_ok());

        // Tweak the id only
        event.id = Id([
            0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
            24, 25, 26, 27, 28, 29, 30, 31,
        ]);
        let result = event.verify();
        assert!(result.is_err());
    }

    #[test]
    fn test_hash_is_deterministic() {
        let keypair = KeyPair::from_private_key(PrivateKey::mock());
        let preevent = PreEvent {
            pubkey: keypair.pubkey,
            created_at: Unixtime(1700000000),
            kind: EventKind::ZapReceipt,
            tags: vec![Tag::new_pubkey(keypair.pubkey)],
            content: "gm".to_string(),
        };
        assert_eq!(
            preevent.hash().unwrap(),
            preevent.clone().hash().unwrap()
        );
    }
}
