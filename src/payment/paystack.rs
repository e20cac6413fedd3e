//! Paystack REST client
//!
//! - `POST {base_url}/transaction/initialize`
//! - `GET  {base_url}/transaction/verify/{reference}`
//!
//! Every call carries the secret key as a bearer token and is bounded by the
//! configured timeout. Error bodies from Paystack are logged, never returned.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{GatewayError, InitializedPayment, PaymentGateway, PaymentStatus, VerifiedPayment};
use crate::config::PaystackConfig;

#[derive(Debug, Serialize)]
struct InitializeBody<'a> {
    email: &'a str,
    amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
}

/// Paystack response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    authorization_url: String,
    access_code: String,
    reference: String,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    status: String,
    amount: i64,
    reference: String,
}

fn parse_initialize(body: &str) -> Result<InitializedPayment, GatewayError> {
    let env: Envelope<InitializeData> = serde_json::from_str(body)
        .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
    if !env.status {
        return Err(GatewayError::InvalidResponse(env.message));
    }
    let data = env
        .data
        .ok_or_else(|| GatewayError::InvalidResponse("missing data".into()))?;
    Ok(InitializedPayment {
        authorization_url: data.authorization_url,
        access_code: data.access_code,
        reference: data.reference,
    })
}

fn parse_verify(body: &str) -> Result<VerifiedPayment, GatewayError> {
    let env: Envelope<VerifyData> = serde_json::from_str(body)
        .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
    if !env.status {
        return Err(GatewayError::InvalidResponse(env.message));
    }
    let data = env
        .data
        .ok_or_else(|| GatewayError::InvalidResponse("missing data".into()))?;
    let status = match data.status.as_str() {
        "success" => PaymentStatus::Success,
        "failed" => PaymentStatus::Failed,
        _ => PaymentStatus::Other,
    };
    Ok(VerifiedPayment {
        reference: data.reference,
        status,
        amount_minor: data.amount,
    })
}

fn map_reqwest_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Network(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct PaystackClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
    callback_url: Option<String>,
}

impl PaystackClient {
    pub fn new(config: &PaystackConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
            callback_url: config.callback_url.clone(),
        })
    }

    async fn read_body(&self, resp: reqwest::Response) -> Result<String, GatewayError> {
        let status = resp.status();
        let body = resp.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %body, "Paystack returned error");
            return Err(GatewayError::Http {
                status: status.as_u16(),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl PaymentGateway for PaystackClient {
    fn name(&self) -> &'static str {
        "paystack"
    }

    async fn initialize(
        &self,
        email: &str,
        amount_minor: i64,
    ) -> Result<InitializedPayment, GatewayError> {
        let url = format!("{}/transaction/initialize", self.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&InitializeBody {
                email,
                amount: amount_minor,
                callback_url: self.callback_url.as_deref(),
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let body = self.read_body(resp).await?;
        parse_initialize(&body)
    }

    async fn verify(&self, reference: &str) -> Result<VerifiedPayment, GatewayError> {
        let url = format!("{}/transaction/verify/{}", self.base_url, reference);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let body = self.read_body(resp).await?;
        parse_verify(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verify_success() {
        let body = r#"{
            "status": true,
            "message": "Verification successful",
            "data": {"status": "success", "amount": 50000, "reference": "ref123", "currency": "NGN"}
        }"#;
        let v = parse_verify(body).unwrap();
        assert_eq!(v.status, PaymentStatus::Success);
        assert_eq!(v.amount_minor, 50000);
        assert_eq!(v.reference, "ref123");
    }

    #[test]
    fn test_parse_verify_abandoned() {
        let body = r#"{"status": true, "message": "ok",
            "data": {"status": "abandoned", "amount": 50000, "reference": "r"}}"#;
        assert_eq!(parse_verify(body).unwrap().status, PaymentStatus::Other);
    }

    #[test]
    fn test_parse_verify_envelope_false() {
        let body = r#"{"status": false, "message": "Transaction reference not found"}"#;
        assert!(matches!(
            parse_verify(body),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_verify_garbage() {
        assert!(matches!(
            parse_verify("<html>"),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_initialize() {
        let body = r#"{"status": true, "message": "Authorization URL created",
            "data": {"authorization_url": "https://checkout.paystack.com/abc",
                     "access_code": "abc", "reference": "ref-1"}}"#;
        let p = parse_initialize(body).unwrap();
        assert_eq!(p.reference, "ref-1");
        assert_eq!(p.authorization_url, "https://checkout.paystack.com/abc");
    }

    #[tokio::test]
    async fn test_unreachable_host_fails_closed() {
        let client = PaystackClient::new(&PaystackConfig {
            base_url: "http://127.0.0.1:9".into(),
            secret_key: "sk_test".into(),
            timeout_ms: 500,
            callback_url: None,
        })
        .unwrap();
        let res = client.verify("ref").await;
        assert!(matches!(
            res,
            Err(GatewayError::Network(_)) | Err(GatewayError::Timeout)
        ));
    }
}
