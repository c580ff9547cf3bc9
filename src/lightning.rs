use crate::Error;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// A Core Lightning invoice, as returned by `listinvoices`/`waitanyinvoice`.
///
/// Owned by the node; read-only to this daemon. Unknown fields are ignored.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Invoice {
    /// The invoice label
    #[serde(default)]
    pub label: String,

    /// The bolt11 invoice string
    #[serde(default)]
    pub bolt11: Option<String>,

    /// The invoice description; for zaps this is json metadata carrying the request note
    #[serde(default)]
    pub description: Option<String>,

    /// The payment preimage, present once the invoice is paid
    #[serde(default)]
    pub payment_preimage: Option<String>,

    /// When the invoice was paid (unix seconds)
    #[serde(default)]
    pub paid_at: Option<u64>,

    /// The node's monotonic payment index for this invoice
    #[serde(default)]
    pub pay_index: Option<u64>,

    /// Invoice status: unpaid, paid, or expired
    #[serde(default)]
    pub status: Option<String>,
}

impl Invoice {
    /// Whether the node's payment feed handed us something we can work with
    pub fn is_usable(&self) -> bool {
        !self.label.is_empty() && self.bolt11.is_some()
    }
}

/// The slice of the Lightning node's RPC surface this daemon consumes.
#[async_trait]
pub trait LightningNode {
    /// Look up an invoice by label, if it exists
    async fn invoice_by_label(&self, label: &str) -> Result<Option<Invoice>, Error>;

    /// Suspend until a payment at or after the given index arrives
    async fn wait_payment_at_or_after(&self, index: u64) -> Result<Invoice, Error>;
}

/// A `LightningNode` that shells out to `lightning-cli`.
#[derive(Clone, Debug)]
pub struct ClnCli {
    cli: PathBuf,
    lightning_dir: Option<PathBuf>,
}

impl ClnCli {
    /// Create a new cli-backed node handle
    pub fn new(cli: PathBuf, lightning_dir: Option<PathBuf>) -> ClnCli {
        ClnCli { cli, lightning_dir }
    }

    async fn call(&self, method: &str, params: &[(&str, String)]) -> Result<Value, Error> {
        let mut command = Command::new(&self.cli);
        if let Some(ref dir) = self.lightning_dir {
            let _ = command.arg(format!("--lightning-dir={}", dir.display()));
        }
        let _ = command.arg("-k").arg(method);
        for (key, value) in params {
            let _ = command.arg(format!("{}={}", key, value));
        }
        debug!("lightning-cli {} {:?}", method, params);

        let output = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::LightningRpc(format!(
                "{} failed: {}",
                method,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

#[async_trait]
impl LightningNode for ClnCli {
    async fn invoice_by_label(&self, label: &str) -> Result<Option<Invoice>, Error> {
        let reply = self
            .call("listinvoices", &[("label", label.to_owned())])
            .await?;
        let invoices = match reply.get("invoices").and_then(Value::as_array) {
            Some(list) => list,
            None => {
                return Err(Error::LightningRpc(
                    "listinvoices reply missing invoices array".to_string(),
                ))
            }
        };
        match invoices.first() {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    async fn wait_payment_at_or_after(&self, index: u64) -> Result<Invoice, Error> {
        // waitanyinvoice takes the last *consumed* index and returns the next
        // one after it
        let lastpay_index = index.saturating_sub(1);
        let reply = self
            .call(
                "waitanyinvoice",
                &[("lastpay_index", lastpay_index.to_string())],
            )
            .await?;
        Ok(serde_json::from_value(reply)?)
    }
}
