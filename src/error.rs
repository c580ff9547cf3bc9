use thiserror::Error;

/// Errors that can occur in the cln-zapd crate
#[derive(Error, Debug)]
pub enum Error {
    /// Bech32 decode error
    #[error("Bech32 Error: {0}")]
    Bech32Decode(#[from] bech32::DecodeError),

    /// Bech32 encode error
    #[error("Bech32 Error: {0}")]
    Bech32Encode(#[from] bech32::EncodeError),

    /// Bech32 HRP error
    #[error("Bech32 Error: {0}")]
    Bech32Hrp(#[from] bech32::primitives::hrp::Error),

    /// Checkpoint file could not be written
    #[error("Checkpoint write failed: {0}")]
    CheckpointWrite(std::io::Error),

    /// Disconnected
    #[error("Disconnected")]
    Disconnected,

    /// The payment feed handed back an empty or unusable invoice
    #[error("Payment feed returned an empty or invalid invoice")]
    EmptyPaymentFeed,

    /// A hash mismatch verification error
    #[error("Hash Mismatch")]
    HashMismatch,

    /// Hex string decoding error
    #[error("Hex Decode Error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// HTTP error
    #[error("HTTP: {0}")]
    Http(#[from] http::Error),

    /// Invalid event Id
    #[error("Invalid event Id")]
    InvalidId,

    /// Invalid Private Key
    #[error("Invalid Private Key")]
    InvalidPrivateKey,

    /// Invalid public key
    #[error("Invalid Public Key")]
    InvalidPublicKey,

    /// Invalid URI
    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),

    /// Invalid URL Scheme
    #[error("Invalid URL Scheme: \"{0}\"")]
    InvalidUrlScheme(String),

    /// Missing URL Authority
    #[error("Missing URL Authority")]
    InvalidUrlMissingAuthority,

    /// Missing URL Scheme
    #[error("Missing URL Scheme")]
    InvalidUrlMissingScheme,

    /// I/O error
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    /// Key or Signature error
    #[error("Key or Signature Error: {0}")]
    KeyOrSignature(#[from] secp256k1::Error),

    /// The lightning node RPC call failed
    #[error("Lightning RPC error: {0}")]
    LightningRpc(String),

    /// Serialization error
    #[error("JSON (de)serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Timeout
    #[error("Timeout")]
    TimedOut,

    /// Timeout
    #[error("Timeout: {0}")]
    Timeout(#[from] tokio::time::error::Elapsed),

    /// Websocket error
    #[error("Websocket error: {0}")]
    Websocket(#[from] tungstenite::Error),

    /// Websocket Connection Failed
    #[error("Websocket connection failed: {0}")]
    WebsocketConnectionFailed(http::StatusCode),

    /// Wrong bech32 human-readable part
    #[error("Wrong Bech32 Kind: Expected {0} found {1}")]
    WrongBech32(String, String),

    /// Wrong length hex string
    #[error("Wrong length hex string")]
    WrongLengthHexString,
}
