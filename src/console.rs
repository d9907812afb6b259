//! A [`Bot`] for the terminal: replies are written out, downloads are
//! planned but not fetched, and the queue lives in memory.

use std::collections::VecDeque;
use std::io::{self, Write};

use tracing::{info, warn};

use crate::bot::{Bot, Destination, DownloadRequest, SongRequest};
use crate::config::Config;

pub struct ConsoleBot<W: Write = io::Stdout> {
    config: Config,
    out: W,
    queue: VecDeque<SongRequest>,
}

impl ConsoleBot {
    /// Bot that replies on standard output.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_writer(config, io::stdout())
    }
}

impl<W: Write> ConsoleBot<W> {
    #[must_use]
    pub fn with_writer(config: Config, out: W) -> Self {
        Self {
            config,
            out,
            queue: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    fn write_line(&mut self, channel: &str, text: &str) {
        if let Err(e) = writeln!(self.out, "#{channel}: {text}").and_then(|()| self.out.flush()) {
            warn!(channel = %channel, error = %e, "could not write reply");
        }
    }
}

fn is_url(query: &str) -> bool {
    query.starts_with("https://") || query.starts_with("http://")
}

impl<W: Write> Bot for ConsoleBot<W> {
    fn respond(&mut self, channel: &str, text: &str) {
        self.write_line(channel, text);
    }

    fn resolve_uri(&mut self, query: &str) -> Option<String> {
        if is_url(query) {
            Some(query.to_string())
        } else {
            warn!(query = %query, "no search backend, only urls resolve");
            None
        }
    }

    fn download(&mut self, request: &DownloadRequest) -> Option<SongRequest> {
        let path = match &request.destination {
            Destination::Cache => {
                self.config
                    .download_path(&request.uri, request.start, request.stop)
            }
            Destination::Theme(author) => self.config.theme_path(author),
        };
        info!(uri = %request.uri, path = %path.display(), force = request.force, "download planned");
        Some(SongRequest {
            query: request.query.clone(),
            uri: request.uri.clone(),
            start: request.start,
            stop: request.stop,
            channel: None,
        })
    }

    fn queue_song(&mut self, song: SongRequest) {
        let channel = song
            .channel
            .clone()
            .unwrap_or_else(|| self.config.channel.clone());
        self.write_line(&channel, &format!("Queued {song}"));
        self.queue.push_back(song);
    }

    fn skip(&mut self) {
        if let Some(song) = self.queue.pop_front() {
            info!(uri = %song.uri, "skipped");
        }
    }

    fn stop(&mut self) {
        self.queue.clear();
    }

    fn queued(&self) -> Vec<SongRequest> {
        self.queue.iter().cloned().collect()
    }
}
