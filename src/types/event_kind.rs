use serde::de::Error as DeError;
use serde::de::{Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A kind of Event
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// Pre-payment zap request note (NIP-57, kind 9734)
    ZapRequest,

    /// Post-payment zap receipt note (NIP-57, kind 9735)
    ZapReceipt,

    /// Something else
    Other(u32),
}

impl From<u32> for EventKind {
    fn from(u: u32) -> Self {
        match u {
            9734 => EventKind::ZapRequest,
            9735 => EventKind::ZapReceipt,
            x => EventKind::Other(x),
        }
    }
}

impl From<EventKind> for u32 {
    fn from(e: EventKind) -> u32 {
        match e {
            EventKind::ZapRequest => 9734,
            EventKind::ZapReceipt => 9735,
            EventKind::Other(u) => u,
        }
    }
}

impl EventKind {
    // Mock data for testing
    #[allow(dead_code)]
    pub(crate) fn mock() -> EventKind {
        EventKind::ZapReceipt
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(u32::from(*self))
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_u32(EventKindVisitor)
    }
}

struct EventKindVisitor;

impl Visitor<'_> for EventKindVisitor {
    type Value = EventKind;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an unsigned number that matches a known event kind")
    }

    fn visit_u64<E>(self, v: u64) -> Result<EventKind, E>
    where
        E: DeError,
    {
        let u = u32::try_from(v).map_err(|e| DeError::custom(format!("{}", e)))?;
        Ok(From::from(u))
    }
}
