use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use super::BookingNotifier;
use crate::models::BookingEvent;

pub const SIGNATURE_HEADER: &str = "X-Staybook-Signature";

/// Posts each booking event as JSON to a stakeholder endpoint.
pub struct WebhookNotifier {
    url: String,
    secret: Option<String>,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String, secret: Option<String>) -> Self {
        Self {
            url,
            secret,
            client: reqwest::Client::new(),
        }
    }
}

/// base64(HMAC-SHA1(secret, body)), sent so receivers can verify the sender.
pub fn sign_payload(secret: &str, body: &[u8]) -> anyhow::Result<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("invalid webhook secret: {e}"))?;
    mac.update(body);
    let result = mac.finalize().into_bytes();
    Ok(base64::engine::general_purpose::STANDARD.encode(result))
}

#[async_trait]
impl BookingNotifier for WebhookNotifier {
    async fn notify(&self, event: &BookingEvent) -> anyhow::Result<()> {
        let body = serde_json::to_vec(event).context("failed to encode booking event")?;

        let mut request = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(secret) = &self.secret {
            request = request.header(SIGNATURE_HEADER, sign_payload(secret, &body)?);
        }

        request
            .body(body)
            .send()
            .await
            .context("failed to deliver booking webhook")?
            .error_for_status()
            .context("booking webhook returned error")?;

        tracing::debug!(event_id = event.id, url = %self.url, "booking webhook delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_deterministic() {
        let a = sign_payload("s3cret", b"{\"id\":1}").unwrap();
        let b = sign_payload("s3cret", b"{\"id\":1}").unwrap();
        assert_eq!(a, b);
        // SHA-1 digest is 20 bytes, 28 chars in padded base64
        assert_eq!(a.len(), 28);
    }

    #[test]
    fn test_signature_depends_on_secret_and_body() {
        let base = sign_payload("s3cret", b"payload").unwrap();
        assert_ne!(base, sign_payload("other", b"payload").unwrap());
        assert_ne!(base, sign_payload("s3cret", b"payload2").unwrap());
    }

    #[test]
    fn test_known_vector() {
        // RFC 2202 test case 2
        let sig = sign_payload("Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(sig, "7/zfauXrL6LSdBbV8YTfnCWafHk=");
    }
}
