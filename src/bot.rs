//! Interfaces to the services commands act on: chat replies, source
//! resolution, downloads, and the playback queue.

use std::fmt;

use crate::value::Timestamp;

/// A chat message as received from the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub author: String,
    pub channel: String,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(author: &str, channel: &str, content: &str) -> Self {
        Self {
            author: author.to_string(),
            channel: channel.to_string(),
            content: content.to_string(),
        }
    }
}

/// Where a download should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The shared song cache.
    Cache,
    /// The join theme of the given user.
    Theme(String),
}

/// Everything a downloader needs to fetch and trim one song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub query: String,
    pub uri: String,
    pub start: Option<Timestamp>,
    pub stop: Option<Timestamp>,
    pub destination: Destination,
    /// Re-download even when a cached copy exists.
    pub force: bool,
}

/// A downloaded song ready for the playback queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRequest {
    pub query: String,
    pub uri: String,
    pub start: Option<Timestamp>,
    pub stop: Option<Timestamp>,
    /// Channel to announce playback in.
    pub channel: Option<String>,
}

impl fmt::Display for SongRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.uri)?;
        if self.start.is_some() || self.stop.is_some() {
            let start = self.start.map(|t| t.to_string()).unwrap_or_default();
            let stop = self.stop.map(|t| t.to_string()).unwrap_or_default();
            write!(f, " [{start}-{stop}]")?;
        }
        Ok(())
    }
}

/// The services a running bot exposes to commands.
///
/// Methods are fire-and-forget from the interpreter's point of view;
/// an implementation is free to hand the work to its own threads.
pub trait Bot {
    /// Send `text` to `channel`.
    fn respond(&mut self, channel: &str, text: &str);

    /// Turn free text or a URL into a playable URI.
    fn resolve_uri(&mut self, query: &str) -> Option<String>;

    /// Fetch and trim audio. `None` when no downloader succeeded.
    fn download(&mut self, request: &DownloadRequest) -> Option<SongRequest>;

    fn queue_song(&mut self, song: SongRequest);

    /// Skip the song that is currently playing.
    fn skip(&mut self);

    /// Clear the queue and stop playback.
    fn stop(&mut self);

    /// Songs waiting to be played, in order.
    fn queued(&self) -> Vec<SongRequest>;
}
