use std::{future::Future, time::Duration};

use log::{debug, warn};
use tokio::{sync::mpsc, time::timeout};

use crate::{
    parser::LineParser,
    report::Reporter,
    sensor::Reading,
    sink::{Sink, SinkError, TableName},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// The line did not complete a reading.
    Pending,
    Sent,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    Interrupted,
    SourceClosed,
}

/// Drives parser and sink for one serial session.
pub struct Bridge<S, R> {
    parser: LineParser,
    sink: S,
    reporter: R,
    table: TableName,
    insert_timeout: Duration,
    sent: u64,
    failed: u64,
}

impl<S: Sink, R: Reporter> Bridge<S, R> {
    pub fn new(sink: S, reporter: R, table: TableName, insert_timeout: Duration) -> Self {
        Self {
            parser: LineParser::new(),
            sink,
            reporter,
            table,
            insert_timeout,
            sent: 0,
            failed: 0,
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub async fn handle_line(&mut self, line: &str) -> LineOutcome {
        let Some(reading) = self.parser.feed(line) else {
            return LineOutcome::Pending;
        };

        match self.insert(&reading).await {
            Ok(()) => {
                self.sent += 1;
                self.reporter.reading_sent(self.sent, &reading);
                LineOutcome::Sent
            }
            Err(err) => {
                self.failed += 1;
                warn!("failed to insert reading into {}: {err}", self.table);
                self.reporter.insert_failed(&reading, &err);
                LineOutcome::Failed
            }
        }
    }

    async fn insert(&self, reading: &Reading) -> Result<(), SinkError> {
        timeout(self.insert_timeout, self.sink.insert(&self.table, reading))
            .await
            .map_err(|_| SinkError::Timeout(self.insert_timeout))?
    }

    /// Processes lines until `shutdown` resolves or the sender side is dropped.
    pub async fn run<F: Future>(
        &mut self,
        lines: &mut mpsc::Receiver<String>,
        shutdown: F,
    ) -> Stop {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("shutdown requested");
                    return Stop::Interrupted;
                }
                line = lines.recv() => match line {
                    Some(line) => {
                        self.handle_line(&line).await;
                    }
                    None => return Stop::SourceClosed,
                },
            }
        }
    }
}
