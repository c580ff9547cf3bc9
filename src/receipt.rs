use crate::lightning::Invoice;
use crate::request::ZapRequest;
use crate::types::{Event, EventKind, KeyPair, PreEvent, Tag, Unixtime};
use crate::Error;

/// Build and sign a zap receipt (kind 9735) for a paid invoice.
///
/// The construction is pure: given the same request, invoice and keypair it
/// reproduces the same event id and signature. Tag order is fixed as
/// `p`, optional `e`, `bolt11`, `description`, `preimage`, and the payer's
/// content is carried over unchanged.
pub fn build_zap_receipt(
    keypair: &KeyPair,
    invoice: &Invoice,
    request: &ZapRequest,
) -> Result<Event, Error> {
    let created_at = match invoice.paid_at {
        Some(t) => Unixtime(t as i64),
        // only hit via the by-label path, where the node may omit paid_at
        None => Unixtime::now(),
    };

    let mut tags: Vec<Tag> = vec![request.p_tag.clone()];
    if let Some(ref e_tag) = request.e_tag {
        tags.push(e_tag.clone());
    }
    tags.push(Tag::new_bolt11(invoice.bolt11.as_deref().unwrap_or("")));
    // the description goes in raw, exactly as the invoice carried it
    tags.push(Tag::new_description(
        invoice.description.as_deref().unwrap_or(""),
    ));
    tags.push(Tag::new_preimage(
        invoice.payment_preimage.as_deref().unwrap_or(""),
    ));

    let pre = PreEvent {
        pubkey: keypair.pubkey,
        created_at,
        kind: EventKind::ZapReceipt,
        tags,
        content: request.content.clone(),
    };

    pre.sign(keypair)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::PrivateKey;

    const PAYEE: &str = "ee11a5dff40c19a555f41fe42b48f00e618c91225622ae37b6c2bb67b76c4e49";

    fn paid_invoice() -> Invoice {
        Invoice {
            label: "inv1".to_string(),
            bolt11: Some("lnbc100n1fake".to_string()),
            description: Some(format!(
                r#"{{"kind":9734,"content":"gm","tags":[["p","{}"],["relays","wss://r1.example"]]}}"#,
                PAYEE
            )),
            payment_preimage: Some("00".repeat(32)),
            paid_at: Some(1700000000),
            pay_index: Some(7),
            status: Some("paid".to_string()),
        }
    }

    fn request_for(invoice: &Invoice) -> ZapRequest {
        ZapRequest::from_invoice_description(
            &invoice.label,
            invoice.description.as_deref().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_receipt_tag_order_and_content() {
        let keypair = KeyPair::from_private_key(PrivateKey::generate());
        let invoice = paid_invoice();
        let request = request_for(&invoice);

        let receipt = build_zap_receipt(&keypair, &invoice, &request).unwrap();

        assert_eq!(receipt.kind, EventKind::ZapReceipt);
        assert_eq!(receipt.created_at, Unixtime(1700000000));
        assert_eq!(receipt.pubkey, keypair.pubkey);
        assert_eq!(receipt.content, "gm");

        assert_eq!(receipt.tags.len(), 4);
        assert_eq!(receipt.tags[0], Tag::new(&["p", PAYEE]));
        assert_eq!(receipt.tags[1].tagname(), "bolt11");
        assert_eq!(receipt.tags[1].value(), "lnbc100n1fake");
        assert_eq!(receipt.tags[2].tagname(), "description");
        assert_eq!(
            receipt.tags[2].value(),
            invoice.description.as_deref().unwrap()
        );
        assert_eq!(receipt.tags[3].tagname(), "preimage");
    }

    #[test]
    fn test_receipt_includes_e_tag_after_p_tag() {
        let keypair = KeyPair::from_private_key(PrivateKey::generate());
        let mut invoice = paid_invoice();
        let note_id = "5df64b33303d62afc799bdc36d178c07b2e1f0d824f31b7dc812219440affab6";
        invoice.description = Some(format!(
            r#"{{"kind":9734,"tags":[["p","{}"],["e","{}"],["relays"]]}}"#,
            PAYEE, note_id
        ));
        let request = request_for(&invoice);

        let receipt = build_zap_receipt(&keypair, &invoice, &request).unwrap();

        assert_eq!(receipt.tags[0].tagname(), "p");
        assert_eq!(receipt.tags[1], Tag::new(&["e", note_id]));
        assert_eq!(receipt.tags[2].tagname(), "bolt11");
    }

    #[test]
    fn test_receipt_is_deterministic() {
        let keypair = KeyPair::from_private_key(PrivateKey::generate());
        let invoice = paid_invoice();
        let request = request_for(&invoice);

        let a = build_zap_receipt(&keypair, &invoice, &request).unwrap();
        let b = build_zap_receipt(&keypair, &invoice, &request).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.sig, b.sig);
    }

    #[test]
    fn test_receipt_verifies() {
        let keypair = KeyPair::from_private_key(PrivateKey::generate());
        let invoice = paid_invoice();
        let request = request_for(&invoice);

        let receipt = build_zap_receipt(&keypair, &invoice, &request).unwrap();
        assert!(receipt.verify().is_ok());
    }
}
