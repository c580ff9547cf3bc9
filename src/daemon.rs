use crate::broadcast::{broadcast, RelayOutcome};
use crate::checkpoint::CheckpointFile;
use crate::lightning::{Invoice, LightningNode};
use crate::receipt::build_zap_receipt;
use crate::request::ZapRequest;
use crate::types::{Event, KeyPair};
use crate::Error;
use std::time::Duration;
use tracing::{info, warn};

/// What a single payment cycle did
#[derive(Debug)]
pub enum StepOutcome {
    /// A receipt was built and signed; outcomes are one per requested relay
    Published {
        /// The signed zap receipt
        receipt: Event,
        /// Per-relay acknowledgment results
        outcomes: Vec<RelayOutcome>,
    },

    /// The invoice carried no valid zap request; the payment is consumed anyway
    Skipped,
}

/// The daemon context: keypair, node handle, checkpoint store and settings,
/// built once at startup and driving the payment loop.
#[allow(missing_debug_implementations)]
pub struct Zapper<N: LightningNode> {
    keypair: KeyPair,
    node: N,
    checkpoint: CheckpointFile,
    relay_timeout: Duration,
}

impl<N: LightningNode> Zapper<N> {
    /// Create the daemon context
    pub fn new(
        keypair: KeyPair,
        node: N,
        checkpoint: CheckpointFile,
        relay_timeout: Duration,
    ) -> Zapper<N> {
        Zapper {
            keypair,
            node,
            checkpoint,
            relay_timeout,
        }
    }

    /// Run the payment loop forever.
    ///
    /// Only returns on a fatal condition; the caller owns the decision of how
    /// each error kind maps to a process exit.
    pub async fn run(&self) -> Result<(), Error> {
        let mut index = self.checkpoint.load().await;
        info!("waiting for payments at or after index {}", index);

        loop {
            let invoice = self.node.wait_payment_at_or_after(index).await?;
            if !invoice.is_usable() {
                // a misbehaving feed would otherwise spin here forever
                return Err(Error::EmptyPaymentFeed);
            }

            match self.step(&invoice).await? {
                StepOutcome::Published { receipt, outcomes } => {
                    let accepted = outcomes.iter().filter(|o| o.ok).count();
                    info!(
                        "published receipt {} for {} to {}/{} relays",
                        receipt.id.as_hex_string(),
                        invoice.label,
                        accepted,
                        outcomes.len()
                    );
                }
                StepOutcome::Skipped => {}
            }

            index = match invoice.pay_index {
                Some(pay_index) => pay_index + 1,
                None => index + 1,
            };
            self.checkpoint.store(index).await?;
        }
    }

    /// Process one paid invoice: extract, build, sign, broadcast.
    ///
    /// Extractor aborts are benign (`Skipped`); anything else that fails here
    /// is an error for the driver to treat as fatal.
    pub async fn step(&self, invoice: &Invoice) -> Result<StepOutcome, Error> {
        let description = invoice.description.as_deref().unwrap_or("");
        let request = match ZapRequest::from_invoice_description(&invoice.label, description) {
            Ok(request) => request,
            Err(_) => return Ok(StepOutcome::Skipped),
        };

        let receipt = build_zap_receipt(&self.keypair, invoice, &request)?;
        let outcomes = broadcast(&request.relays, &receipt, self.relay_timeout).await;

        Ok(StepOutcome::Published { receipt, outcomes })
    }

    /// Process a single invoice by label and stop.
    ///
    /// This is the legacy one-shot path: look the invoice up, require it to be
    /// paid, and run one processing cycle without touching the checkpoint.
    pub async fn process_label(&self, label: &str) -> Result<StepOutcome, Error> {
        let invoice = match self.node.invoice_by_label(label).await? {
            Some(invoice) => invoice,
            None => {
                warn!("could not find invoice {}", label);
                return Ok(StepOutcome::Skipped);
            }
        };

        if invoice.status.as_deref() != Some("paid") {
            warn!("invoice {} is not paid, nothing to do", label);
            return Ok(StepOutcome::Skipped);
        }

        self.step(&invoice).await
    }
}
