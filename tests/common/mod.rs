#![allow(dead_code)]

use std::collections::HashMap;

use announcer::{
    Bot, Command, DownloadRequest, Error, Message, Registry, SongRequest, Value, parse, run_line,
};

/// A bot that records everything commands ask of it.
#[derive(Debug, Default)]
pub struct RecordingBot {
    pub replies: Vec<(String, String)>,
    pub downloads: Vec<DownloadRequest>,
    pub queue: Vec<SongRequest>,
    pub skips: usize,
    pub stops: usize,
    /// Free-text queries that resolve; URLs always resolve to themselves.
    pub searches: HashMap<String, String>,
    pub fail_downloads: bool,
}

impl RecordingBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: &str, uri: &str) -> Self {
        self.searches.insert(query.to_string(), uri.to_string());
        self
    }

    /// Text of every reply, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.replies.iter().map(|(_, text)| text.as_str()).collect()
    }
}

impl Bot for RecordingBot {
    fn respond(&mut self, channel: &str, text: &str) {
        self.replies.push((channel.to_string(), text.to_string()));
    }

    fn resolve_uri(&mut self, query: &str) -> Option<String> {
        if query.starts_with("https://") || query.starts_with("http://") {
            return Some(query.to_string());
        }
        self.searches.get(query).cloned()
    }

    fn download(&mut self, request: &DownloadRequest) -> Option<SongRequest> {
        self.downloads.push(request.clone());
        if self.fail_downloads {
            return None;
        }
        Some(SongRequest {
            query: request.query.clone(),
            uri: request.uri.clone(),
            start: request.start,
            stop: request.stop,
            channel: None,
        })
    }

    fn queue_song(&mut self, song: SongRequest) {
        self.queue.push(song);
    }

    fn skip(&mut self) {
        self.skips += 1;
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.queue.clear();
    }

    fn queued(&self) -> Vec<SongRequest> {
        self.queue.clone()
    }
}

pub fn registry() -> Registry {
    Registry::with_builtins().expect("builtins register")
}

pub fn message(content: &str) -> Message {
    Message::new("alice", "general", content)
}

/// Run one line as if `alice` had sent it to `#general`.
pub fn run(registry: &Registry, bot: &mut RecordingBot, line: &str) -> Result<Value, Error> {
    run_line(registry, bot, &message(line), line)
}

/// Render a parsed line, parse the rendering, and assert both trees match.
pub fn assert_reparse(line: &str) {
    let command = parse(line).unwrap_or_else(|e| panic!("failed to parse {line:?}: {e}"));
    let rendered = command.to_string();
    let reparsed: Command = parse(&rendered).unwrap_or_else(|e| {
        panic!(
            "failed to re-parse rendered output: {e}\n\
             --- input ---\n{line}\n--- rendered ---\n{rendered}"
        )
    });
    assert_eq!(
        command, reparsed,
        "re-parse mismatch\n--- input ---\n{line}\n--- rendered ---\n{rendered}"
    );
    assert_eq!(rendered, reparsed.to_string());
}
