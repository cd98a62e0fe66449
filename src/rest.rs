use anyhow::{Context as _, Result};
use reqwest::Client;

use crate::{
    sensor::Reading,
    sink::{Sink, SinkError, TableName},
};

/// Inserts rows through a PostgREST endpoint (`{base_url}/rest/v1/{table}`),
/// authenticated with a project API key.
#[derive(Debug, Clone)]
pub struct RestSink {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestSink {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn endpoint(&self, table: &TableName) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

impl Sink for RestSink {
    async fn insert(&self, table: &TableName, reading: &Reading) -> Result<(), SinkError> {
        let response = self
            .client
            .post(self.endpoint(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(reading)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected { status, body });
        }

        Ok(())
    }
}
