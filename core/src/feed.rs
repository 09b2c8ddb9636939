//! Status text sources.
//!
//! A feed pushes the full current status text into a channel every time it
//! changes. Consumers never see diffs.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One status text per input line (stdin, a pipe, a socket).
pub struct LineFeed<R> {
    reader: R,
}

impl<R> LineFeed<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Forward non-blank lines until EOF or until the receiver goes away.
    pub fn start(self, tx: mpsc::Sender<String>) -> JoinHandle<()> {
        let mut lines = self.reader.lines();
        tokio::spawn(async move {
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let text = line.trim_end_matches('\r');
                        if text.trim().is_empty() {
                            continue;
                        }
                        if tx.send(text.to_string()).await.is_err() {
                            debug!(target: "feed", "Receiver closed; stopping line feed");
                            break;
                        }
                    }
                    Ok(None) => {
                        info!(target: "feed", "Line feed reached end of input");
                        break;
                    }
                    Err(e) => {
                        warn!(target: "feed", error = %e, "Failed to read status line");
                        break;
                    }
                }
            }
        })
    }
}

/// Polls a file holding the status text and reports each new content.
pub struct FileWatchFeed {
    path: PathBuf,
    poll_interval: Duration,
}

impl FileWatchFeed {
    pub fn new(path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            path: path.into(),
            poll_interval,
        }
    }

    /// Send the trimmed file contents whenever the file is rewritten.
    ///
    /// A rewrite is a new modification time or new text, so the same message
    /// written twice is reported twice.
    pub fn start(self, tx: mpsc::Sender<String>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.poll_interval);
            let mut last: Option<(Option<SystemTime>, String)> = None;
            info!(target: "feed", path = ?self.path, "Watching status file");

            loop {
                ticker.tick().await;
                let modified = match tokio::fs::metadata(&self.path).await {
                    Ok(meta) => meta.modified().ok(),
                    Err(e) => {
                        debug!(target: "feed", path = ?self.path, error = %e, "Status file not readable");
                        continue;
                    }
                };
                let text = match tokio::fs::read_to_string(&self.path).await {
                    Ok(s) => s.trim().to_string(),
                    Err(e) => {
                        debug!(target: "feed", path = ?self.path, error = %e, "Status file not readable");
                        continue;
                    }
                };

                let seen = (modified, text);
                if last.as_ref() == Some(&seen) {
                    continue;
                }
                let text = seen.1.clone();
                last = Some(seen);
                // A cleared status bar is a change, but not one worth sending
                if text.is_empty() {
                    continue;
                }

                if tx.send(text).await.is_err() {
                    debug!(target: "feed", "Receiver closed; stopping file feed");
                    break;
                }
            }
        })
    }
}
