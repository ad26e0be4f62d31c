//! Streaming CSV-to-task import.
//!
//! # Responsibilities
//! - Consume an uploaded CSV body chunk by chunk
//! - Turn each valid `title,description` row into a create-task call
//! - Stream one `{success, data, error?}` outcome line per row back
//!
//! # Design Decisions
//! - Rows invoke the create handler directly in-process; the import never
//!   re-enters the service over the network
//! - Submissions run in a bounded task group (semaphore + JoinSet) and
//!   are joined before the outcome stream closes; outcome order follows
//!   completion order, not input order
//! - Splitting is per chunk: the first line of each chunk is treated as
//!   the CSV header, and a row split across two chunks is dropped or
//!   truncated. Correct only while the header starts its own chunk.
//! - A failed row reports `success: false` and never aborts the stream

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::StreamExt;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

use crate::store::Datastore;
use crate::tasks::handlers::create_task;

/// Per-row import result.
#[derive(Debug, Clone, Serialize)]
pub struct RowOutcome {
    pub success: bool,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One parsed data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub title: String,
    pub description: String,
}

/// Runs one CSV import request.
pub struct CsvImporter {
    store: Arc<Datastore>,
    max_in_flight: usize,
}

impl CsvImporter {
    pub fn new(store: Arc<Datastore>, max_in_flight: usize) -> Self {
        Self {
            store,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Consume the request body and answer with a stream of outcome
    /// lines (one JSON object per row, newline-delimited).
    pub fn run(self, body: Body) -> Response {
        let (tx, rx) = mpsc::channel::<RowOutcome>(64);

        tokio::spawn(self.consume(body, tx));

        let stream = futures_util::stream::unfold(rx, |mut rx| async move {
            let outcome = rx.recv().await?;
            let mut line = serde_json::to_string(&outcome)
                .unwrap_or_else(|_| String::from(r#"{"success":false}"#));
            line.push('\n');
            Some((Ok::<_, std::convert::Infallible>(Bytes::from(line)), rx))
        });

        (
            [(header::CONTENT_TYPE, "application/x-ndjson")],
            Body::from_stream(stream),
        )
            .into_response()
    }

    async fn consume(self, body: Body, tx: mpsc::Sender<RowOutcome>) {
        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut submissions = JoinSet::new();

        let mut chunks = body.into_data_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    tracing::warn!(error = %err, "csv body read failed mid-stream");
                    break;
                }
            };
            let text = String::from_utf8_lossy(&chunk);
            for row in parse_rows(&text) {
                let Ok(permit) = semaphore.clone().acquire_owned().await else {
                    break;
                };
                submissions.spawn(submit_row(self.store.clone(), tx.clone(), permit, row));
            }
        }

        // Every in-flight submission finishes before tx drops and the
        // outcome stream closes.
        while submissions.join_next().await.is_some() {}
    }
}

/// Split one body chunk into creation payloads.
///
/// The first line of the chunk is skipped as the CSV header. Blank lines
/// and lines without exactly two comma-separated fields are skipped; the
/// two fields are trimmed.
pub fn parse_rows(chunk: &str) -> Vec<CsvRow> {
    chunk
        .split('\n')
        .skip(1)
        .filter_map(|line| {
            if line.trim().is_empty() {
                return None;
            }
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 2 {
                return None;
            }
            Some(CsvRow {
                title: fields[0].trim().to_string(),
                description: fields[1].trim().to_string(),
            })
        })
        .collect()
}

async fn submit_row(
    store: Arc<Datastore>,
    tx: mpsc::Sender<RowOutcome>,
    _permit: OwnedSemaphorePermit,
    row: CsvRow,
) {
    let payload = json!({"title": row.title, "description": row.description});
    let status = create_task(&store, &payload).await.status();

    let outcome = if status == StatusCode::CREATED {
        RowOutcome {
            success: true,
            data: payload,
            error: None,
        }
    } else {
        RowOutcome {
            success: false,
            data: payload,
            error: Some(format!("create failed with status {status}")),
        }
    };
    let _ = tx.send(outcome).await;
}
