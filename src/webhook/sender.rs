//! Outbound webhook delivery.
//!
//! One POST per call: either a pure JSON request, or multipart form data
//! carrying an encoded PNG and the serialized payload. No retry, no backoff;
//! the caller decides what a failed delivery means.

use std::{collections::HashMap, time::Duration};

use reqwest::{
    header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
    multipart::{Form, Part},
};
use serde_json::Value;
use tracing::debug;

use crate::{Result, config::DEFAULT_USER_AGENT};

/// A single outbound webhook request.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    /// Target endpoint.
    pub url: String,
    /// PNG-encoded image for the multipart branch.
    pub image_png: Option<Vec<u8>>,
    /// JSON payload; sent as the body (JSON branch) or as the `payload`
    /// form field (multipart branch).
    pub payload: Value,
    /// Caller-supplied headers.
    pub headers: HeaderMap,
    /// Request timeout.
    pub timeout: Duration,
    /// Send only JSON, without the image.
    pub send_as_json: bool,
}

/// What came back from the endpoint.
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    /// Whether the endpoint accepted the request (status below 400).
    pub success: bool,
    pub status_code: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
}

pub struct WebhookSender {
    client: reqwest::Client,
    user_agent: String,
}

impl WebhookSender {
    pub fn new() -> Self {
        Self::with_user_agent(DEFAULT_USER_AGENT.to_string())
    }

    pub fn with_user_agent(user_agent: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_agent,
        }
    }

    /// Deliver one webhook request.
    ///
    /// Transport failures (connect, timeout) surface as `Err`; HTTP error
    /// statuses come back as an unsuccessful [`DeliveryReport`].
    pub async fn send(
        &self,
        request: WebhookRequest,
    ) -> Result<DeliveryReport> {
        let mut headers = request.headers;
        self.apply_default_headers(&mut headers);

        let builder = if request.send_as_json {
            debug!(url = %request.url, "sending JSON webhook request");
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

            self.client.post(&request.url).headers(headers).json(&request.payload)
        } else {
            let mut form = Form::new();

            if let Some(png) = request.image_png {
                debug!(size = png.len(), "attaching image.png to multipart form");
                let part = Part::bytes(png).file_name("image.png").mime_str("image/png")?;
                form = form.part("image", part);
            }

            if !payload_is_empty(&request.payload) {
                form = form.text("payload", serde_json::to_string(&request.payload)?);
            }

            debug!(url = %request.url, "sending multipart webhook request");
            self.client.post(&request.url).headers(headers).multipart(form)
        };

        let response = builder.timeout(request.timeout).send().await?;

        let status_code = response.status().as_u16();
        let headers: HashMap<String, String> = response.headers().iter().map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string())).collect();
        let body = response.text().await?;

        debug!(status_code, "webhook response received");

        Ok(DeliveryReport {
            success: status_code < 400,
            status_code,
            body,
            headers,
        })
    }

    fn apply_default_headers(
        &self,
        headers: &mut HeaderMap,
    ) {
        if !headers.contains_key(USER_AGENT) {
            if let Ok(value) = self.user_agent.parse() {
                headers.insert(USER_AGENT, value);
            }
        }
    }
}

impl Default for WebhookSender {
    fn default() -> Self {
        Self::new()
    }
}

fn payload_is_empty(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
