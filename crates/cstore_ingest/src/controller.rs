use std::sync::Arc;
use std::time::Duration;

use cstore_backend::{ColumnStore, MetadataStore, Schema, ShardEntry};
use cstore_types::{BinaryRecord, DatasetRef};
use tokio::sync::mpsc;

use crate::{ChunkedColumns, IngesterEvent, IngesterMessage, IngesterState};

/// Bounded wait for a stop signal to drain already-queued writes before a hard terminate.
/// Chosen to match the specification's "e.g. 3 s" example window.
const GRACEFUL_STOP_WINDOW: Duration = Duration::from_secs(3);

const MAILBOX_CAPACITY: usize = 64;

/// A handle to a running ingester controller's mailbox.
///
/// The controller itself runs as a detached task; `IngesterHandle` only owns the sending half
/// of its inbound channel; dropping it without sending `Stop` lets the task keep running until
/// its receiver is dropped too.
pub struct IngesterHandle {
    sender: mpsc::Sender<IngesterMessage>,
}

impl IngesterHandle {
    pub async fn send(&self, message: IngesterMessage) -> Result<(), mpsc::error::SendError<IngesterMessage>> {
        self.sender.send(message).await
    }

    pub async fn chunked_columns(&self, chunk: ChunkedColumns) -> Result<(), mpsc::error::SendError<IngesterMessage>> {
        self.send(IngesterMessage::ChunkedColumns(chunk)).await
    }

    pub async fn stop(&self) -> Result<(), mpsc::error::SendError<IngesterMessage>> {
        self.send(IngesterMessage::Stop).await
    }
}

/// Spawns a controller for `(dataset, partition, columns)`: runs startup validation, then —
/// on success — loops accepting [`IngesterMessage`]s until stopped. Returns immediately; the
/// first event on the returned receiver is always either a rejection or `GoodToGo`.
pub fn spawn<M, C>(
    dataset: DatasetRef,
    partition: BinaryRecord,
    columns: Vec<String>,
    metadata: Arc<M>,
    column_store: Arc<C>,
) -> (IngesterHandle, mpsc::Receiver<IngesterEvent>)
where
    M: MetadataStore + 'static,
    C: ColumnStore + 'static,
{
    let (msg_tx, msg_rx) = mpsc::channel(MAILBOX_CAPACITY);
    let (evt_tx, evt_rx) = mpsc::channel(MAILBOX_CAPACITY);
    tokio::spawn(run(dataset, partition, columns, metadata, column_store, msg_rx, evt_tx));
    (IngesterHandle { sender: msg_tx }, evt_rx)
}

async fn run<M, C>(
    dataset: DatasetRef,
    partition: BinaryRecord,
    columns: Vec<String>,
    metadata: Arc<M>,
    column_store: Arc<C>,
    mut msg_rx: mpsc::Receiver<IngesterMessage>,
    evt_tx: mpsc::Sender<IngesterEvent>,
) where
    M: MetadataStore,
    C: ColumnStore,
{
    if let Err(rejection) = validate_startup(&dataset, &partition, &columns, metadata.as_ref()).await {
        tracing::info!(?dataset, state = ?IngesterState::Rejected, ?rejection, "ingester rejected at startup");
        let _ = evt_tx.send(rejection).await;
        return;
    }
    tracing::debug!(?dataset, state = ?IngesterState::Ready, "ingester validated, ready to accept writes");
    let _ = evt_tx
        .send(IngesterEvent::GoodToGo {
            dataset: dataset.clone(),
            partition: partition.clone(),
        })
        .await;

    while let Some(message) = msg_rx.recv().await {
        match message {
            IngesterMessage::ChunkedColumns(chunk) => {
                handle_chunk(&dataset, &partition, chunk, column_store.as_ref(), metadata.as_ref(), &evt_tx).await;
            }
            IngesterMessage::Stop => {
                drain_with_bounded_wait(&mut msg_rx, &dataset, &partition, column_store.as_ref(), metadata.as_ref(), &evt_tx)
                    .await;
                break;
            }
        }
    }
    tracing::debug!(?dataset, state = ?IngesterState::Stopped, "ingester stopped");
}

/// Startup validation per the specification's four steps. Never returns an error that doesn't
/// map to one of the three terminal rejection events.
async fn validate_startup<M: MetadataStore>(
    dataset: &DatasetRef,
    partition: &BinaryRecord,
    columns: &[String],
    metadata: &M,
) -> Result<Schema, IngesterEvent> {
    if columns.is_empty() {
        return Err(IngesterEvent::NoDatasetColumns(dataset.clone()));
    }
    if metadata.get_dataset(dataset).await.is_err() {
        return Err(IngesterEvent::NoDatasetColumns(dataset.clone()));
    }
    let schema = metadata
        .get_schema(dataset, 0)
        .await
        .map_err(|_| IngesterEvent::NoDatasetColumns(dataset.clone()))?;
    if schema.is_empty() {
        return Err(IngesterEvent::NoDatasetColumns(dataset.clone()));
    }

    metadata
        .get_partition(dataset, partition)
        .await
        .map_err(|_| IngesterEvent::NotFound)?;

    let missing: Vec<String> = columns.iter().filter(|c| !schema.contains_key(c.as_str())).cloned().collect();
    if !missing.is_empty() {
        return Err(IngesterEvent::UndefinedColumns(dataset.clone(), missing));
    }
    Ok(schema)
}

/// Validates and persists one chunk. Never mutates `shardVersions` on a failed write — the
/// metadata-store update only happens after `write_chunk` has succeeded.
async fn handle_chunk<M: MetadataStore, C: ColumnStore>(
    dataset: &DatasetRef,
    partition: &BinaryRecord,
    chunk: ChunkedColumns,
    column_store: &C,
    metadata: &M,
    evt_tx: &mpsc::Sender<IngesterEvent>,
) {
    let ChunkedColumns {
        version,
        first_row_id,
        last_row_id,
        acknowledged_row_id,
        columns,
    } = chunk;

    if version < 0 || first_row_id > last_row_id {
        let _ = evt_tx
            .send(IngesterEvent::ShardingError(dataset.clone(), partition.clone(), acknowledged_row_id))
            .await;
        return;
    }

    let write_result = column_store
        .write_chunk(dataset, partition, version, columns.into_iter().collect(), first_row_id, last_row_id)
        .await;

    let event = match write_result {
        Err(_) => IngesterEvent::ShardingError(dataset.clone(), partition.clone(), acknowledged_row_id),
        Ok(_info) => {
            let entry = ShardEntry {
                version,
                first_row_id,
                last_row_id,
                acknowledged_row_id,
            };
            match metadata.update_partition_shards(dataset, partition, entry).await {
                Ok(()) => IngesterEvent::Ack(dataset.clone(), partition.clone(), acknowledged_row_id),
                Err(_) => IngesterEvent::ShardingError(dataset.clone(), partition.clone(), acknowledged_row_id),
            }
        }
    };
    let _ = evt_tx.send(event).await;
}

/// Drains the mailbox for up to [`GRACEFUL_STOP_WINDOW`], fully processing (and acknowledging)
/// any chunk that arrives within the window; once the window elapses, returns immediately and
/// any chunk still queued receives no acknowledgement.
async fn drain_with_bounded_wait<M: MetadataStore, C: ColumnStore>(
    msg_rx: &mut mpsc::Receiver<IngesterMessage>,
    dataset: &DatasetRef,
    partition: &BinaryRecord,
    column_store: &C,
    metadata: &M,
    evt_tx: &mpsc::Sender<IngesterEvent>,
) {
    let deadline = tokio::time::Instant::now() + GRACEFUL_STOP_WINDOW;
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            tracing::warn!(?dataset, "ingester stop window elapsed, forcing terminate with pending work");
            return;
        }
        match tokio::time::timeout(remaining, msg_rx.recv()).await {
            Ok(Some(IngesterMessage::ChunkedColumns(chunk))) => {
                handle_chunk(dataset, partition, chunk, column_store, metadata, evt_tx).await;
            }
            Ok(Some(IngesterMessage::Stop)) => continue,
            Ok(None) | Err(_) => return,
        }
    }
}
