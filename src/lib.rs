//! cln-zapd bridges Core Lightning invoice payments to nostr zap receipts.
//!
//! When an invoice that carries an embedded zap request (kind 9734) is paid,
//! the daemon builds a signed zap receipt (kind 9735) and publishes it to the
//! relays the payer asked for, each relay on its own acknowledgment/timeout
//! budget.

#![deny(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    unused_results,
    unused_lifetimes,
    unused_labels,
    unused_extern_crates,
    non_ascii_idents,
    keyword_idents,
    deprecated_in_future,
    unstable_features,
    single_use_lifetimes,
    unreachable_pub,
    missing_docs,
    missing_copy_implementations
)]
#![deny(clippy::string_slice)]

mod error;
pub use error::Error;

#[cfg(test)]
macro_rules! test_serde {
    ($t:ty, $fnname:ident) => {
        #[test]
        fn $fnname() {
            let a = <$t>::mock();
            let x = serde_json::to_string(&a).unwrap();
            println!("{}", x);
            let b = serde_json::from_str(&x).unwrap();
            assert_eq!(a, b);
        }
    };
}

mod types;
pub use types::{
    ClientMessage, Event, EventKind, Id, KeyPair, PreEvent, PrivateKey, PublicKey, RelayMessage,
    RelayUrl, Signature, Tag, Unixtime, Why,
};

mod request;
pub use request::{RequestError, ZapRequest};

mod receipt;
pub use receipt::build_zap_receipt;

mod client;
pub use client::RelayConnection;

mod broadcast;
pub use broadcast::{broadcast, RelayOutcome, DEFAULT_RELAY_TIMEOUT};

mod checkpoint;
pub use checkpoint::CheckpointFile;

mod lightning;
pub use lightning::{ClnCli, Invoice, LightningNode};

mod daemon;
pub use daemon::{StepOutcome, Zapper};
