//! Email dispatch through the site backend.

use std::time::Duration;

use saltaget_core::config::EndpointsConfig;

use crate::error::ContactError;
use crate::form::ContactForm;

const SEND_EMAIL_PATH: &str = "/email/send_email";

/// Posts validated contact forms to `{site_base_url}/email/send_email`.
#[derive(Debug, Clone)]
pub struct ContactClient {
    client: reqwest::Client,
    base_url: String,
}

impl ContactClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ContactError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContactError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the configured site endpoint.
    pub fn from_config(endpoints: &EndpointsConfig) -> Result<Self, ContactError> {
        Self::new(
            endpoints.site_base_url.clone(),
            Duration::from_secs(endpoints.request_timeout_secs),
        )
    }

    /// Validate and send the form.
    ///
    /// Nothing is sent when validation fails. On success the backend's
    /// payload is returned untouched.
    pub async fn send(&self, form: &ContactForm) -> Result<serde_json::Value, ContactError> {
        form.validate().map_err(ContactError::Invalid)?;

        let url = format!("{}{}", self.base_url, SEND_EMAIL_PATH);
        tracing::info!(%url, "Sending contact form");

        let resp = self
            .client
            .post(&url)
            .json(&form.to_request())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Contact form delivery failed");
                ContactError::Delivery {
                    detail: e.to_string(),
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Contact form rejected");
            return Err(ContactError::Delivery {
                detail: format!("backend returned HTTP {}", status.as_u16()),
            });
        }

        // The payload is opaque; an empty or non-JSON body still means sent.
        let body = resp.text().await.map_err(|e| ContactError::Delivery {
            detail: e.to_string(),
        })?;
        let payload = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
        tracing::debug!(?payload, "Contact form accepted");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn form() -> ContactForm {
        ContactForm {
            full_name: "Ana Gómez".into(),
            email: "ana@example.com".into(),
            cellphone: "3875550000".into(),
            issue: "Sitio web".into(),
            reason: "Quiero cotizar una landing".into(),
        }
    }

    fn client_for(server: &MockServer) -> ContactClient {
        ContactClient::new(server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_send_posts_all_fields() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/email/send_email").json_body(json!({
                    "issue": "Sitio web",
                    "email": "ana@example.com",
                    "cellphone": "3875550000",
                    "full_name": "Ana Gómez",
                    "reason": "Quiero cotizar una landing"
                }));
                then.status(200).json_body(json!({"message": "sent"}));
            })
            .await;

        let payload = client_for(&server).send(&form()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(payload, json!({"message": "sent"}));
    }

    #[tokio::test]
    async fn test_send_accepts_non_json_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/email/send_email");
                then.status(200).body("ok");
            })
            .await;

        let payload = client_for(&server).send(&form()).await.unwrap();
        assert_eq!(payload, json!("ok"));
    }

    #[tokio::test]
    async fn test_invalid_form_not_sent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/email/send_email");
                then.status(200);
            })
            .await;

        let bad = ContactForm {
            email: "not-an-email".into(),
            ..form()
        };
        let err = client_for(&server).send(&bad).await.unwrap_err();

        assert!(matches!(err, ContactError::Invalid(_)));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_server_error_is_delivery_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/email/send_email");
                then.status(500);
            })
            .await;

        let err = client_for(&server).send(&form()).await.unwrap_err();
        match &err {
            ContactError::Delivery { detail } => assert!(detail.contains("500")),
            other => panic!("expected delivery error, got {other:?}"),
        }
        assert_eq!(err.to_string(), crate::FAILURE_ALERT);
    }
}
