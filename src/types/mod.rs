mod client_message;
mod event;
mod event_kind;
mod id;
mod private_key;
mod public_key;
mod relay_message;
mod signature;
mod tag;
mod unixtime;
mod url;

pub use self::url::RelayUrl;
pub use client_message::ClientMessage;
pub use event::{Event, PreEvent};
pub use event_kind::EventKind;
pub use id::Id;
pub use private_key::{KeyPair, PrivateKey};
pub use public_key::PublicKey;
pub use relay_message::{RelayMessage, Why};
pub use signature::Signature;
pub use tag::Tag;
pub use unixtime::Unixtime;
