// HTTP client for the engine REST API

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{engine_ws, ChannelHandle, ChannelSink, Transport};
use crate::config::Config;
use crate::error::TransportError;
use crate::model::{Command, HealthStatus, StatusSnapshot};

/// Real transport: reqwest for pulls and commands, tungstenite for push.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    status_url: String,
    command_url: String,
    health_url: String,
    push_url: String,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            status_url: config.status_url(),
            command_url: config.command_url(),
            health_url: config.health_url(),
            push_url: config.push_url(),
        })
    }

    pub fn push_url(&self) -> &str {
        &self.push_url
    }

    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(TransportError::Http(response.status().as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_status(&self) -> Result<StatusSnapshot, TransportError> {
        let value = self.get_json(&self.status_url).await?;
        Ok(StatusSnapshot::from_value(value)?)
    }

    async fn fetch_health(&self) -> Result<HealthStatus, TransportError> {
        let value = self.get_json(&self.health_url).await?;

        // The engine wraps replies as {data, error, timestamp}.
        if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
            if !error.is_empty() {
                return Err(TransportError::Decode(format!("engine reported: {}", error)));
            }
        }
        let body = match value.get("data") {
            Some(data) if data.is_object() => data.clone(),
            _ => value,
        };
        Ok(serde_json::from_value(body)?)
    }

    async fn send(&self, command: &Command) -> Result<(), TransportError> {
        debug!("POST {} type={}", self.command_url, command.command_type());

        let response = self
            .client
            .post(&self.command_url)
            .json(&command.to_body())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::Http(response.status().as_u16()));
        }

        Ok(())
    }

    fn connect(&self, sink: ChannelSink) -> ChannelHandle {
        engine_ws::spawn_push_channel(self.push_url.clone(), sink)
    }
}
