//! Append-only sinks for human-readable progress lines.
//!
//! The pipeline reports progress only through a sink handed to it by the
//! caller. A bounded channel sink lets a foreground loop poll and drain
//! lines produced on a worker thread.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError};
use std::sync::Mutex;

/// Destination for progress lines.
pub trait LogSink: Send + Sync {
    /// Append one line.
    fn append(&self, line: &str);
}

/// Sink that keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines appended so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn append(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// Sink that forwards lines to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeSink;

impl LogSink for FacadeSink {
    fn append(&self, line: &str) {
        log::info!("{}", line);
    }
}

/// Producer half of a bounded log queue.
///
/// `append` blocks while the queue is full, and silently drops lines once
/// the drain has been dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: SyncSender<String>,
}

impl LogSink for ChannelSink {
    fn append(&self, line: &str) {
        if self.sender.send(line.to_string()).is_err() {
            log::debug!("Log drain closed, dropping line: {}", line);
        }
    }
}

/// Consumer half of a bounded log queue.
#[derive(Debug)]
pub struct LogDrain {
    receiver: Receiver<String>,
}

impl LogDrain {
    /// Take every line currently queued without blocking.
    pub fn drain(&self) -> Vec<String> {
        let mut lines = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(line) => lines.push(line),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        lines
    }
}

/// Create a bounded log queue holding at most `capacity` pending lines.
pub fn log_channel(capacity: usize) -> (ChannelSink, LogDrain) {
    let (sender, receiver) = mpsc::sync_channel(capacity.max(1));
    (ChannelSink { sender }, LogDrain { receiver })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.append("one");
        sink.append("two");
        assert_eq!(sink.lines(), vec!["one", "two"]);
    }

    #[test]
    fn test_channel_drains_fully() {
        let (sink, drain) = log_channel(8);
        sink.append("a");
        sink.append("b");

        assert_eq!(drain.drain(), vec!["a", "b"]);
        assert!(drain.drain().is_empty());
    }

    #[test]
    fn test_channel_across_threads() {
        let (sink, drain) = log_channel(4);
        let worker = thread::spawn(move || {
            for i in 0..20 {
                sink.append(&format!("line {}", i));
            }
        });

        let mut received = Vec::new();
        while received.len() < 20 {
            received.extend(drain.drain());
            thread::yield_now();
        }
        worker.join().unwrap();

        assert_eq!(received.first().map(String::as_str), Some("line 0"));
        assert_eq!(received.last().map(String::as_str), Some("line 19"));
    }

    #[test]
    fn test_channel_after_drain_dropped() {
        let (sink, drain) = log_channel(1);
        drop(drain);
        sink.append("nobody listening");
    }
}
