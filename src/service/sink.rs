//! Calculation sinks.
//!
//! Implementations of [`CalculationSink`] for logging and for asynchronous
//! hand-off through a bounded tokio channel.

use std::fmt::Display;
use std::future::Future;

use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::calculation::CalculationSink;
use crate::models::CalculationRecord;

/// Channel capacity used when the caller has no better figure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Logs every record at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl CalculationSink for TracingSink {
    fn offer(&self, record: CalculationRecord) {
        info!(
            record_id = %record.record_id,
            locality = %record.locality_id,
            gross_monthly_salary = %record.gross_monthly_salary,
            monthly_total_tax = %record.monthly_total_tax,
            net_monthly_salary = %record.net_monthly_salary,
            "Calculation recorded"
        );
    }
}

/// Hands records to a bounded tokio channel for asynchronous processing.
///
/// When the channel is full the record is dropped with a `warn!` rather
/// than queued, so a slow consumer never grows memory or blocks a
/// calculation.
///
/// # Example
///
/// ```
/// use tax_engine::service::{ChannelSink, DEFAULT_CHANNEL_CAPACITY};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (sink, handle) = ChannelSink::spawn(DEFAULT_CHANNEL_CAPACITY, |record| async move {
///     println!("stored {}", record.record_id);
///     Ok::<(), std::io::Error>(())
/// });
/// drop(sink);
/// handle.await.unwrap();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<CalculationRecord>,
}

impl ChannelSink {
    /// Creates a sink and the receiving end of a channel holding at most
    /// `capacity` records.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> (Self, Receiver<CalculationRecord>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Creates a sink whose records are passed to `write` on a background task.
    ///
    /// Write failures are logged at `warn` and the record is dropped. The task
    /// finishes once every clone of the sink has been dropped. Must be called
    /// from within a tokio runtime.
    pub fn spawn<F, Fut, E>(capacity: usize, mut write: F) -> (Self, JoinHandle<()>)
    where
        F: FnMut(CalculationRecord) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let (sink, mut receiver) = Self::new(capacity);
        let handle = tokio::spawn(async move {
            while let Some(record) = receiver.recv().await {
                let record_id = record.record_id;
                if let Err(error) = write(record).await {
                    warn!(%record_id, %error, "Failed to write calculation record");
                }
            }
        });
        (sink, handle)
    }
}

impl CalculationSink for ChannelSink {
    fn offer(&self, record: CalculationRecord) {
        match self.sender.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(record)) => {
                warn!(
                    record_id = %record.record_id,
                    "Calculation record dropped, channel full"
                );
            }
            Err(TrySendError::Closed(record)) => {
                warn!(
                    record_id = %record.record_id,
                    "Calculation record dropped, receiver closed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocalityId;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    fn record(gross: i64) -> CalculationRecord {
        CalculationRecord {
            record_id: Uuid::new_v4(),
            locality_id: LocalityId::new("stockholm"),
            gross_monthly_salary: Decimal::new(gross, 0),
            monthly_total_tax: Decimal::ZERO,
            net_monthly_salary: Decimal::new(gross, 0),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_tracing_sink_accepts_records() {
        TracingSink.offer(record(30000));
    }

    #[tokio::test]
    async fn test_channel_sink_delivers_in_order() {
        let (sink, mut receiver) = ChannelSink::new(DEFAULT_CHANNEL_CAPACITY);

        sink.offer(record(1));
        sink.offer(record(2));
        drop(sink);

        assert_eq!(receiver.recv().await.unwrap().gross_monthly_salary, Decimal::ONE);
        assert_eq!(receiver.recv().await.unwrap().gross_monthly_salary, Decimal::new(2, 0));
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_offer_after_receiver_closed_does_not_panic() {
        let (sink, receiver) = ChannelSink::new(DEFAULT_CHANNEL_CAPACITY);
        drop(receiver);
        sink.offer(record(1));
    }

    #[test]
    fn test_full_channel_drops_record_without_blocking() {
        let (sink, mut receiver) = ChannelSink::new(1);

        sink.offer(record(1));
        sink.offer(record(2));

        assert_eq!(receiver.try_recv().unwrap().gross_monthly_salary, Decimal::ONE);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_full_channel_accepts_again_after_drain() {
        let (sink, mut receiver) = ChannelSink::new(1);

        sink.offer(record(1));
        sink.offer(record(2));
        receiver.try_recv().unwrap();
        sink.offer(record(3));

        assert_eq!(receiver.try_recv().unwrap().gross_monthly_salary, Decimal::new(3, 0));
    }

    #[tokio::test]
    async fn test_spawned_writer_receives_records() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let store = written.clone();

        let (sink, handle) = ChannelSink::spawn(16, move |record: CalculationRecord| {
            let store = store.clone();
            async move {
                store.lock().unwrap().push(record.gross_monthly_salary);
                Ok::<(), String>(())
            }
        });

        sink.offer(record(100));
        sink.offer(record(200));
        drop(sink);
        handle.await.unwrap();

        assert_eq!(
            *written.lock().unwrap(),
            vec![Decimal::new(100, 0), Decimal::new(200, 0)]
        );
    }

    #[tokio::test]
    async fn test_spawned_writer_errors_are_swallowed() {
        let attempts = Arc::new(Mutex::new(0u32));
        let counter = attempts.clone();

        let (sink, handle) = ChannelSink::spawn(16, move |_record: CalculationRecord| {
            let counter = counter.clone();
            async move {
                *counter.lock().unwrap() += 1;
                Err::<(), _>("storage unavailable")
            }
        });

        sink.offer(record(1));
        sink.offer(record(2));
        drop(sink);

        assert!(handle.await.is_ok());
        assert_eq!(*attempts.lock().unwrap(), 2);
    }
}
