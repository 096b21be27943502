// Copyright (c) 2025 - Cowboy AI, Inc.
//! APIC REST client
//!
//! ```text
//! POST /api/aaaLogin.json   {"aaaUser": {"attributes": {"name", "pwd"}}}
//!   -> imdata[0].aaaLogin.attributes.token
//! GET  /api/<path>          Cookie: APIC-cookie=<token>
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderValue, COOKIE};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{ClientError, ClientResult, FabricClient};
use crate::config::FabricConfig;

/// Session cookie carrying the login token
pub const SESSION_COOKIE: &str = "APIC-cookie";

pub struct ApicClient {
    name: String,
    base_url: String,
    username: String,
    password: String,
    client: Client,
    token: Option<String>,
}

impl ApicClient {
    pub fn new(config: &FabricConfig) -> ClientResult<Self> {
        if config.username.is_empty() {
            return Err(ClientError::Configuration(format!(
                "no username configured for fabric {}",
                config.name
            )));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name: config.name.clone(),
            base_url: config.apic_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            client,
            token: None,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl FabricClient for ApicClient {
    async fn login(&mut self) -> ClientResult<()> {
        info!("Logging in to APIC {} at {}", self.name, self.base_url);

        let body = json!({
            "aaaUser": {
                "attributes": { "name": self.username, "pwd": self.password }
            }
        });
        let response = self
            .client
            .post(self.url("aaaLogin.json"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Http(format!("APIC login request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Authentication(status.as_u16()));
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: "aaaLogin.json".to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Http(format!("Failed to read login response: {}", e)))?;
        let payload: Value = serde_json::from_str(&text)?;
        let token = login_token(&payload).ok_or(ClientError::Authentication(status.as_u16()))?;

        self.token = Some(token.to_string());
        info!("Logged in to APIC {}", self.name);
        Ok(())
    }

    async fn get(&self, path: &str) -> ClientResult<Value> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        let cookie = HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE, token))
            .map_err(|e| ClientError::Configuration(format!("Invalid session token: {}", e)))?;

        debug!("GET {} from {}", path, self.name);
        let response = self
            .client
            .get(self.url(path))
            .header(COOKIE, cookie)
            .send()
            .await
            .map_err(|e| ClientError::Http(format!("APIC request {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Http(format!("Failed to read response for {}: {}", path, e)))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn login_token(payload: &Value) -> Option<&str> {
    payload["imdata"][0]["aaaLogin"]["attributes"]["token"]
        .as_str()
        .filter(|token| !token.is_empty())
}
