//! HTTP origin
//!
//! Performs the outbound request a descriptor describes and returns the response
//! body. Like the request library the web app used before, a completed exchange
//! is a success whatever its status code; only transport failures and unusable
//! descriptors are errors.

use async_trait::async_trait;
use cache_system::{Origin, RequestDescriptor};
use config::OriginConfig;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpOriginError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request descriptor has no url")]
    MissingUrl,

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("invalid header {name}: value must be a string, number or boolean")]
    InvalidHeader { name: String },
}

/// Origin fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpOrigin {
    client: reqwest::Client,
}

impl HttpOrigin {
    pub fn new(config: &OriginConfig) -> Result<Self, HttpOriginError> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_millis(config.timeout_ms));
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an already configured client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<reqwest::RequestBuilder, HttpOriginError> {
        let url = descriptor.url().ok_or(HttpOriginError::MissingUrl)?;
        let method = parse_method(descriptor.method())?;

        let mut request = self.client.request(method, url);

        if let Some(headers) = descriptor.headers() {
            for (name, value) in headers {
                let value = scalar_text(value).ok_or_else(|| HttpOriginError::InvalidHeader {
                    name: name.clone(),
                })?;
                request = request.header(name.as_str(), value);
            }
        }

        if let Some(query) = descriptor.query() {
            let pairs: Vec<(&str, String)> = query
                .iter()
                .filter_map(|(name, value)| scalar_text(value).map(|text| (name.as_str(), text)))
                .collect();
            request = request.query(&pairs);
        }

        if let Some(json) = descriptor.json() {
            request = request.json(json);
        } else if let Some(body) = descriptor.body() {
            request = request.body(body.to_string());
        }

        if let Some(timeout_ms) = descriptor.timeout_ms() {
            request = request.timeout(Duration::from_millis(timeout_ms));
        }

        Ok(request)
    }
}

#[async_trait]
impl Origin for HttpOrigin {
    type Output = String;
    type Error = HttpOriginError;

    async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<String, HttpOriginError> {
        let response = self.build_request(descriptor)?.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %response.url(), "origin answered with non-success status");
        }

        Ok(response.text().await?)
    }
}

/// Method names are case-insensitive; a missing method means GET
fn parse_method(method: Option<&str>) -> Result<Method, HttpOriginError> {
    match method {
        None => Ok(Method::GET),
        Some(name) => Method::from_bytes(name.to_ascii_uppercase().as_bytes())
            .map_err(|_| HttpOriginError::InvalidMethod(name.to_string())),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn origin() -> HttpOrigin {
        HttpOrigin::new(&OriginConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method(None).unwrap(), Method::GET);
        assert_eq!(parse_method(Some("get")).unwrap(), Method::GET);
        assert_eq!(parse_method(Some("Post")).unwrap(), Method::POST);
        assert!(matches!(
            parse_method(Some("not a method")),
            Err(HttpOriginError::InvalidMethod(_))
        ));
    }

    #[test]
    fn test_build_request_from_descriptor() {
        let descriptor = RequestDescriptor::new()
            .with_method("post")
            .with_url("https://registry.example/-/search")
            .with_header("accept", "application/json")
            .with_query("text", "cache")
            .with_json(json!({"size": 20}));

        let request = origin().build_request(&descriptor).unwrap().build().unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://registry.example/-/search?text=cache"
        );
        assert_eq!(request.headers()["accept"], "application/json");
        assert_eq!(
            request.body().and_then(|body| body.as_bytes()),
            Some(br#"{"size":20}"#.as_slice())
        );
    }

    #[test]
    fn test_missing_url_rejected() {
        let descriptor = RequestDescriptor::new().with_method("get");
        assert!(matches!(
            origin().build_request(&descriptor),
            Err(HttpOriginError::MissingUrl)
        ));
    }

    #[test]
    fn test_non_scalar_header_rejected() {
        let descriptor = RequestDescriptor::get("https://x.example/")
            .with_field("headers", json!({"x-list": [1, 2]}));
        assert!(matches!(
            origin().build_request(&descriptor),
            Err(HttpOriginError::InvalidHeader { .. })
        ));
    }
}
