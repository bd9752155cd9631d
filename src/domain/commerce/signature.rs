//! Razorpay signature verification.
//!
//! Two signatures are in play:
//!
//! - checkout confirmation: hex `HMAC-SHA256(key_secret, "{order_id}|{payment_id}")`
//! - webhooks: hex `HMAC-SHA256(webhook_secret, raw_body)` in `x-razorpay-signature`
//!
//! Both are compared in constant time against the exact lowercase hex
//! digest; the supplied value is not trimmed or case-folded.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::razorpay_event::RazorpayEvent;
use super::webhook_errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Verifies the signature returned by Razorpay Checkout after payment.
#[derive(Clone)]
pub struct PaymentSignatureVerifier {
    key_secret: String,
}

impl PaymentSignatureVerifier {
    pub fn new(key_secret: impl Into<String>) -> Self {
        Self {
            key_secret: key_secret.into(),
        }
    }

    /// Checks `signature` against `HMAC(key_secret, order_id|payment_id)`.
    pub fn verify(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), WebhookError> {
        let message = format!("{}|{}", order_id, payment_id);
        let expected = sign_hex(&self.key_secret, message.as_bytes());
        if constant_time_compare(expected.as_bytes(), signature.as_bytes()) {
            Ok(())
        } else {
            Err(WebhookError::InvalidSignature)
        }
    }
}

/// Verifies webhook deliveries before their payload is trusted.
#[derive(Clone)]
pub struct WebhookSignatureVerifier {
    secret: String,
}

impl WebhookSignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verifies the raw body against the header, then parses the event.
    ///
    /// The payload is not parsed unless the signature matches.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<RazorpayEvent, WebhookError> {
        let expected = sign_hex(&self.secret, payload);
        if !constant_time_compare(expected.as_bytes(), signature_header.as_bytes()) {
            return Err(WebhookError::InvalidSignature);
        }

        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }
}

fn compute_hmac(secret: &str, message: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Hex HMAC-SHA256 of `message`, for building signed fixtures.
pub fn sign_hex(secret: &str, message: &[u8]) -> String {
    hex::encode(compute_hmac(secret, message))
}

/// Checkout signature for an order/payment pair, for building signed fixtures.
pub fn sign_payment(key_secret: &str, order_id: &str, payment_id: &str) -> String {
    sign_hex(key_secret, format!("{}|{}", order_id, payment_id).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEY_SECRET: &str = "rzp_key_secret_for_tests";
    const WEBHOOK_SECRET: &str = "whsec_razorpay_tests";

    // ══════════════════════════════════════════════════════════════
    // Payment Signature Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn valid_payment_signature_verifies() {
        let verifier = PaymentSignatureVerifier::new(KEY_SECRET);
        let sig = sign_payment(KEY_SECRET, "order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f");
        assert!(verifier
            .verify("order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f", &sig)
            .is_ok());
    }

    #[test]
    fn swapped_ids_fail() {
        let verifier = PaymentSignatureVerifier::new(KEY_SECRET);
        let sig = sign_payment(KEY_SECRET, "order_a", "pay_b");
        assert!(matches!(
            verifier.verify("pay_b", "order_a", &sig),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn non_hex_signature_fails() {
        let verifier = PaymentSignatureVerifier::new(KEY_SECRET);
        assert!(matches!(
            verifier.verify("order_a", "pay_b", "not-hex"),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn uppercased_or_padded_signature_fails() {
        let verifier = PaymentSignatureVerifier::new(KEY_SECRET);
        let sig = sign_payment(KEY_SECRET, "order_abc", "pay_xyz");
        let letter = sig.find(|c: char| c.is_ascii_alphabetic()).unwrap();
        let mut upper = sig.clone();
        upper.replace_range(letter..letter + 1, &sig[letter..letter + 1].to_uppercase());

        assert!(verifier.verify("order_abc", "pay_xyz", &upper).is_err());
        assert!(verifier.verify("order_abc", "pay_xyz", &format!("{} ", sig)).is_err());
        assert!(verifier.verify("order_abc", "pay_xyz", &format!(" {}", sig)).is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let verifier = PaymentSignatureVerifier::new("another_secret");
        let sig = sign_payment(KEY_SECRET, "order_a", "pay_b");
        assert!(verifier.verify("order_a", "pay_b", &sig).is_err());
    }

    // ══════════════════════════════════════════════════════════════
    // Webhook Signature Tests
    // ══════════════════════════════════════════════════════════════

    fn captured_payload() -> String {
        serde_json::json!({
            "entity": "event",
            "account_id": "acc_BFQ7uQEaa7j2z7",
            "event": "payment.captured",
            "contains": ["payment"],
            "payload": {
                "payment": {
                    "entity": {
                        "id": "pay_DESlfW9H8K9uqM",
                        "entity": "payment",
                        "amount": 49900,
                        "currency": "INR",
                        "status": "captured",
                        "order_id": "order_DESlLckIVRkHWj"
                    }
                }
            },
            "created_at": 1567674606
        })
        .to_string()
    }

    #[test]
    fn valid_webhook_parses() {
        let verifier = WebhookSignatureVerifier::new(WEBHOOK_SECRET);
        let payload = captured_payload();
        let sig = sign_hex(WEBHOOK_SECRET, payload.as_bytes());

        let event = verifier.verify_and_parse(payload.as_bytes(), &sig).unwrap();

        assert_eq!(event.event, "payment.captured");
        assert_eq!(event.payment().unwrap().id, "pay_DESlfW9H8K9uqM");
    }

    #[test]
    fn tampered_webhook_body_fails() {
        let verifier = WebhookSignatureVerifier::new(WEBHOOK_SECRET);
        let payload = captured_payload();
        let sig = sign_hex(WEBHOOK_SECRET, payload.as_bytes());
        let tampered = payload.replace("49900", "100");

        assert!(matches!(
            verifier.verify_and_parse(tampered.as_bytes(), &sig),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn webhook_header_with_whitespace_fails() {
        let verifier = WebhookSignatureVerifier::new(WEBHOOK_SECRET);
        let payload = captured_payload();
        let sig = sign_hex(WEBHOOK_SECRET, payload.as_bytes());

        assert!(matches!(
            verifier.verify_and_parse(payload.as_bytes(), &format!("{}\n", sig)),
            Err(WebhookError::InvalidSignature)
        ));
        assert!(verifier
            .verify_and_parse(payload.as_bytes(), &sig.to_uppercase())
            .is_err());
    }

    #[test]
    fn signed_garbage_is_parse_error() {
        let verifier = WebhookSignatureVerifier::new(WEBHOOK_SECRET);
        let payload = b"not json";
        let sig = sign_hex(WEBHOOK_SECRET, payload);
        assert!(matches!(
            verifier.verify_and_parse(payload, &sig),
            Err(WebhookError::ParseError(_))
        ));
    }

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
        assert!(constant_time_compare(&[], &[]));
    }

    // ══════════════════════════════════════════════════════════════
    // Properties
    // ══════════════════════════════════════════════════════════════

    /// Replaces the byte at `index` with a different byte from `alphabet`,
    /// starting the search at `pick`.
    fn mutate(value: &str, index: usize, pick: usize, alphabet: &[u8]) -> String {
        let mut bytes = value.as_bytes().to_vec();
        let i = index % bytes.len();
        let current = bytes[i];
        let replacement = (0..alphabet.len())
            .map(|offset| alphabet[(pick + offset) % alphabet.len()])
            .find(|b| *b != current)
            .unwrap();
        bytes[i] = replacement;
        String::from_utf8(bytes).unwrap()
    }

    const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";
    const SIGNATURE_ALPHABET: &[u8] = b"0123456789abcdefABCDEF \t\n";

    proptest! {
        #[test]
        fn genuine_signature_always_verifies(
            order in "order_[A-Za-z0-9]{8,16}",
            payment in "pay_[A-Za-z0-9]{8,16}",
        ) {
            let verifier = PaymentSignatureVerifier::new(KEY_SECRET);
            let sig = sign_payment(KEY_SECRET, &order, &payment);
            prop_assert!(verifier.verify(&order, &payment, &sig).is_ok());
        }

        #[test]
        fn any_single_byte_change_fails(
            order in "order_[A-Za-z0-9]{8,16}",
            payment in "pay_[A-Za-z0-9]{8,16}",
            index in 0usize..64,
            pick in 0usize..64,
            target in 0u8..4,
        ) {
            let verifier = PaymentSignatureVerifier::new(KEY_SECRET);
            let sig = sign_payment(KEY_SECRET, &order, &payment);
            let result = match target {
                0 => verifier.verify(&mutate(&order, index, pick, ID_ALPHABET), &payment, &sig),
                1 => verifier.verify(&order, &mutate(&payment, index, pick, ID_ALPHABET), &sig),
                2 => verifier.verify(&order, &payment, &mutate(&sig, index, pick, SIGNATURE_ALPHABET)),
                _ => {
                    let extra = SIGNATURE_ALPHABET[pick % SIGNATURE_ALPHABET.len()] as char;
                    verifier.verify(&order, &payment, &format!("{}{}", sig, extra))
                }
            };
            prop_assert!(matches!(result, Err(WebhookError::InvalidSignature)));
        }
    }
}
