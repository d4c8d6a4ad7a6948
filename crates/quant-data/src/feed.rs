//! Line sources feeding a subscription.
//!
//! A backtest replays an archive file line by line. A live feed receives
//! lines pushed by whatever owns the network connection, through a bounded
//! channel.

use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tracing::debug;

use quant_core::error::DataError;
use quant_core::types::SourceLocator;

/// Default capacity of a live feed's channel.
pub const DEFAULT_LIVE_CAPACITY: usize = 1024;

/// Anything that yields raw record lines in arrival order.
#[async_trait]
pub trait LineSource: Send {
    /// Next line, or `None` once the source is exhausted.
    async fn next_line(&mut self) -> Result<Option<String>, DataError>;

    /// Where the lines come from.
    fn locator(&self) -> &SourceLocator;
}

/// Replays an archive file.
pub struct FileReplay {
    locator: SourceLocator,
    lines: Lines<BufReader<File>>,
    read: u64,
}

impl FileReplay {
    /// Open the archive at `locator`.
    ///
    /// URLs and missing files are reported as `SourceUnavailable`.
    pub async fn open(locator: SourceLocator) -> Result<Self, DataError> {
        if locator.is_url() {
            return Err(DataError::SourceUnavailable {
                locator: locator.to_string(),
                reason: "not a file path".to_string(),
            });
        }

        let file = File::open(Path::new(locator.as_str()))
            .await
            .map_err(|e| DataError::SourceUnavailable {
                locator: locator.to_string(),
                reason: e.to_string(),
            })?;

        debug!(locator = %locator, "Opened archive");
        Ok(Self {
            locator,
            lines: BufReader::new(file).lines(),
            read: 0,
        })
    }

    /// Lines returned so far.
    pub fn lines_read(&self) -> u64 {
        self.read
    }
}

#[async_trait]
impl LineSource for FileReplay {
    async fn next_line(&mut self) -> Result<Option<String>, DataError> {
        let line = self.lines.next_line().await?;
        if line.is_some() {
            self.read += 1;
        }
        Ok(line)
    }

    fn locator(&self) -> &SourceLocator {
        &self.locator
    }
}

/// Receiving half of a live line feed.
pub struct LiveFeed {
    locator: SourceLocator,
    receiver: mpsc::Receiver<String>,
}

/// Sending half of a live line feed.
#[derive(Clone)]
pub struct LiveFeedSender {
    locator: SourceLocator,
    sender: mpsc::Sender<String>,
}

impl LiveFeed {
    /// Create a connected sender/feed pair for `locator`.
    pub fn channel(locator: SourceLocator, capacity: usize) -> (LiveFeedSender, LiveFeed) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            LiveFeedSender {
                locator: locator.clone(),
                sender,
            },
            LiveFeed { locator, receiver },
        )
    }
}

#[async_trait]
impl LineSource for LiveFeed {
    /// Waits for the next pushed line. The feed ends when every sender has
    /// been dropped.
    async fn next_line(&mut self) -> Result<Option<String>, DataError> {
        Ok(self.receiver.recv().await)
    }

    fn locator(&self) -> &SourceLocator {
        &self.locator
    }
}

impl LiveFeedSender {
    /// Push one line, waiting for room in the channel.
    pub async fn send(&self, line: impl Into<String>) -> Result<(), DataError> {
        self.sender
            .send(line.into())
            .await
            .map_err(|_| DataError::FeedClosed(self.locator.to_string()))
    }

    /// Check if the receiving side is gone.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_file_replay_reads_lines_in_order() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "first").unwrap();
        writeln!(file, "second").unwrap();

        let locator = SourceLocator::new(file.path().to_string_lossy().to_string());
        let mut replay = FileReplay::open(locator).await.unwrap();

        assert_eq!(replay.next_line().await.unwrap().as_deref(), Some("first"));
        assert_eq!(replay.next_line().await.unwrap().as_deref(), Some("second"));
        assert_eq!(replay.next_line().await.unwrap(), None);
        assert_eq!(replay.lines_read(), 2);
    }

    #[tokio::test]
    async fn test_file_replay_missing_file() {
        let result = FileReplay::open(SourceLocator::new("/no/such/archive.csv")).await;
        assert!(matches!(result, Err(DataError::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_file_replay_rejects_url() {
        let result = FileReplay::open(SourceLocator::new("wss://host/trade/SPY")).await;
        assert!(matches!(result, Err(DataError::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_live_feed_ends_when_senders_drop() {
        let (sender, mut feed) = LiveFeed::channel(SourceLocator::new("wss://host/trade/SPY"), 4);

        sender.send("a").await.unwrap();
        drop(sender);

        assert_eq!(feed.next_line().await.unwrap().as_deref(), Some("a"));
        assert_eq!(feed.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_live_sender_reports_closed_feed() {
        let (sender, feed) = LiveFeed::channel(SourceLocator::new("wss://host/trade/SPY"), 4);
        drop(feed);

        assert!(sender.is_closed());
        assert!(matches!(
            sender.send("a").await,
            Err(DataError::FeedClosed(_))
        ));
    }
}
