use std::{fmt, str::FromStr, time::Duration};

use anyhow::{Error, bail};

use crate::{db::PgSink, rest::RestSink, sensor::Reading};

/// A table identifier safe to splice into SQL and URL paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TableName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            bail!("table name is empty");
        };

        if !(first.is_ascii_alphabetic() || first == '_')
            || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            bail!("invalid table name: {}", s);
        }

        Ok(TableName(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("insert timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("insert rejected with status {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Destination for readings: one attempt per call, no retries.
#[allow(async_fn_in_trait)]
pub trait Sink {
    async fn insert(&self, table: &TableName, reading: &Reading) -> Result<(), SinkError>;
}

#[derive(Debug)]
pub enum Backend {
    Postgres(PgSink),
    Rest(RestSink),
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Postgres(_) => "PostgreSQL",
            Backend::Rest(_) => "REST",
        }
    }
}

impl Sink for Backend {
    async fn insert(&self, table: &TableName, reading: &Reading) -> Result<(), SinkError> {
        match self {
            Backend::Postgres(sink) => sink.insert(table, reading).await,
            Backend::Rest(sink) => sink.insert(table, reading).await,
        }
    }
}
