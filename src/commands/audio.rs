use tracing::{info, warn};

use crate::Error;
use crate::bot::{Destination, DownloadRequest};
use crate::registry::{Descriptor, Handler, Invocation};
use crate::signature::{Bindings, Kind, Parameter};
use crate::value::Value;

const SONG_PARAMS: &str = ":param payload: Url or Youtube query for the song.\n\
                           :param start: (Optional) Start timestamp within the song.\n\
                           :param stop: (Optional) End timestamp within the song.";

pub fn descriptors() -> Vec<Descriptor> {
    vec![
        song(&["play", "Play", "плаъ", "πλαυ", "playing"], play)
            .doc(&format!("Add a song to the queue.\n\n{SONG_PARAMS}")),
        song(&["download", "dl"], download)
            .doc(&format!("Download a song to the cache.\n\n{SONG_PARAMS}")),
        song(&["settheme", "set_theme"], set_theme).doc(&format!(
            "Set the join theme for the sending user.\n\n{SONG_PARAMS}"
        )),
        Descriptor::new(&["search", "find"], search)
            .doc(
                "Returns the url a song query resolves to.\n\n\
                 :param payload: Url or Youtube query for the song.",
            )
            .param(Parameter::required("payload", &[Kind::String])),
        Descriptor::new(&["queue", "q", "яуеуе"], queue).doc("Print all songs in the queue."),
        Descriptor::new(&["next", "Next", "skip", "Skip", "маняк"], next)
            .doc("Skip the current song."),
        Descriptor::new(&["stop", "dilyankata"], stop).doc("Clear the queue and stop playing."),
    ]
}

fn song(aliases: &[&str], handler: Handler) -> Descriptor {
    Descriptor::new(aliases, handler)
        .param(Parameter::required("payload", &[Kind::String]))
        .param(Parameter::optional("start", &[Kind::Timestamp]))
        .param(Parameter::optional("stop", &[Kind::Timestamp]))
}

/// Resolve the payload and describe the download, or `None` when the
/// query resolves to nothing.
fn resolve_request(
    invocation: &mut Invocation<'_>,
    bindings: &Bindings,
    destination: Destination,
    force: bool,
) -> Result<Option<DownloadRequest>, Error> {
    let query = bindings.text("payload")?;
    let Some(uri) = invocation.bot.resolve_uri(query) else {
        warn!(query = %query, "no source found");
        return Ok(None);
    };
    Ok(Some(DownloadRequest {
        query: query.to_string(),
        uri,
        start: bindings.timestamp("start")?,
        stop: bindings.timestamp("stop")?,
        destination,
        force,
    }))
}

fn play(invocation: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let Some(request) = resolve_request(invocation, bindings, Destination::Cache, false)? else {
        invocation.respond("No source found - skipping song");
        return Ok(None);
    };
    match invocation.bot.download(&request) {
        Some(mut song) => {
            song.channel = Some(invocation.message.channel.clone());
            info!(uri = %song.uri, "queueing song");
            invocation.bot.queue_song(song);
        }
        None => {
            warn!(uri = %request.uri, "download unsuccessful");
            invocation.respond("Download failed - skipping song");
        }
    }
    Ok(None)
}

fn download(invocation: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let Some(request) = resolve_request(invocation, bindings, Destination::Cache, true)? else {
        invocation.respond("No source found");
        return Ok(None);
    };
    if invocation.bot.download(&request).is_none() {
        warn!(uri = %request.uri, "download unsuccessful");
        invocation.respond("Download failed");
    }
    Ok(None)
}

fn set_theme(invocation: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let author = invocation.message.author.clone();
    let destination = Destination::Theme(author.clone());
    let Some(request) = resolve_request(invocation, bindings, destination, true)? else {
        warn!(author = %author, "could not set theme");
        return Ok(None);
    };
    info!(author = %author, uri = %request.uri, "setting theme");
    if invocation.bot.download(&request).is_none() {
        warn!(author = %author, "theme download unsuccessful");
    }
    Ok(None)
}

fn search(invocation: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let query = bindings.text("payload")?;
    Ok(invocation.bot.resolve_uri(query).map(Value::String))
}

fn queue(invocation: &mut Invocation<'_>, _: &Bindings) -> Result<Option<Value>, Error> {
    let songs = invocation.bot.queued();
    let content = if songs.is_empty() {
        "Queue is empty.".to_string()
    } else {
        songs
            .iter()
            .enumerate()
            .map(|(idx, song)| format!("{idx}: {song}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    invocation.respond(&format!("```{content}```"));
    Ok(None)
}

fn next(invocation: &mut Invocation<'_>, _: &Bindings) -> Result<Option<Value>, Error> {
    invocation.bot.skip();
    Ok(None)
}

fn stop(invocation: &mut Invocation<'_>, _: &Bindings) -> Result<Option<Value>, Error> {
    invocation.bot.stop();
    Ok(None)
}
