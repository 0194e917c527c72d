use crate::event::LifecycleEvent;
use reqwest::blocking::{Client, Response};
use reqwest::header::AUTHORIZATION;
use std::io::{BufRead, BufReader};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Delay before re-dialing a dropped event stream.
pub const RECONNECT_DELAY_SECS: u64 = 5;

/// Signal delivered by the event-stream consumption loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    /// The stream (re)connected. Whatever happened while disconnected is
    /// unknown, so the consumer must reconcile from scratch.
    Opened,
    /// One lifecycle event, in delivery order.
    Event(LifecycleEvent),
}

/// Reconnecting source of platform lifecycle events, consumed by a single
/// pull loop. Implementations own their reconnect policy.
pub trait EventSource {
    /// Blocks for the next signal; None once the source is exhausted.
    fn next_signal(&mut self) -> Option<StreamSignal>;
}

/// Errors surfaced while dialing the event stream.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("event stream connect failed: {0}")]
    Connect(String),
    #[error("event stream returned status {0}")]
    Status(u16),
}

/// Blocking HTTP event source reading newline-delimited JSON events.
///
/// Dial failures and dropped connections are retried forever with a fixed
/// delay; each successful (re)dial yields `Opened` before any event.
/// Malformed payload lines are skipped, never fatal.
pub struct HttpEventSource {
    client: Client,
    events_url: String,
    auth: String,
    reader: Option<BufReader<Response>>,
    reconnect_delay: Duration,
}

impl HttpEventSource {
    pub fn new(events_url: impl Into<String>, auth: impl Into<String>) -> Result<Self, StreamError> {
        let events_url = events_url.into();
        if events_url.trim().is_empty() {
            return Err(StreamError::Connect(
                "events URL must not be empty".to_string(),
            ));
        }
        let client = Client::builder()
            .build()
            .map_err(|err| StreamError::Connect(format!("http client build failed: {err}")))?;
        Ok(Self {
            client,
            events_url,
            auth: auth.into(),
            reader: None,
            reconnect_delay: Duration::from_secs(RECONNECT_DELAY_SECS),
        })
    }

    fn dial(&mut self) -> Result<(), StreamError> {
        let response = self
            .client
            .get(&self.events_url)
            .header(AUTHORIZATION, &self.auth)
            .send()
            .map_err(|err| StreamError::Connect(err.to_string()))?;
        if !response.status().is_success() {
            return Err(StreamError::Status(response.status().as_u16()));
        }
        self.reader = Some(BufReader::new(response));
        Ok(())
    }
}

impl EventSource for HttpEventSource {
    fn next_signal(&mut self) -> Option<StreamSignal> {
        loop {
            let reader = match self.reader.as_mut() {
                Some(reader) => reader,
                None => {
                    if self.dial().is_err() {
                        thread::sleep(self.reconnect_delay);
                        continue;
                    }
                    return Some(StreamSignal::Opened);
                }
            };
            let mut line = String::new();
            match reader.read_line(&mut line) {
                // EOF or transport error: drop the connection and re-dial.
                Ok(0) | Err(_) => {
                    self.reader = None;
                    thread::sleep(self.reconnect_delay);
                }
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match LifecycleEvent::from_json(trimmed) {
                        Ok(event) => return Some(StreamSignal::Event(event)),
                        Err(_) => continue,
                    }
                }
            }
        }
    }
}
