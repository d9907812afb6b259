//! Built-in commands run against a recording bot.

mod common;

use announcer::{Destination, Error, Timestamp, TypeErrorKind, Value};
use common::{RecordingBot, registry, run};

// -----------------------------------------------------------
// Audio.
// -----------------------------------------------------------

#[test]
fn play_queues_url() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    run(&registry, &mut bot, "play https://example.com/a").unwrap();

    assert_eq!(bot.downloads.len(), 1);
    assert_eq!(bot.downloads[0].destination, Destination::Cache);
    assert!(!bot.downloads[0].force);
    assert_eq!(bot.queue.len(), 1);
    assert_eq!(bot.queue[0].uri, "https://example.com/a");
    assert_eq!(bot.queue[0].channel.as_deref(), Some("general"));
    assert!(bot.replies.is_empty());
}

#[test]
fn play_resolves_free_text() {
    let registry = registry();
    let mut bot = RecordingBot::new().with_search("never gonna", "https://example.com/rick");
    run(&registry, &mut bot, "πλαυ[start=0:43] never gonna").unwrap();

    assert_eq!(bot.queue.len(), 1);
    assert_eq!(bot.queue[0].query, "never gonna");
    assert_eq!(bot.queue[0].uri, "https://example.com/rick");
    assert_eq!(bot.queue[0].start, Some(Timestamp::from_seconds(43)));
    assert_eq!(bot.queue[0].stop, None);
}

#[test]
fn play_without_source() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    let result = run(&registry, &mut bot, "play something obscure").unwrap();
    assert_eq!(result, Value::Null);
    assert_eq!(bot.texts(), vec!["No source found - skipping song"]);
    assert!(bot.downloads.is_empty());
}

#[test]
fn play_failed_download() {
    let registry = registry();
    let mut bot = RecordingBot {
        fail_downloads: true,
        ..RecordingBot::new()
    };
    run(&registry, &mut bot, "play https://example.com/a").unwrap();
    assert_eq!(bot.texts(), vec!["Download failed - skipping song"]);
    assert!(bot.queue.is_empty());
}

#[test]
fn play_requires_payload() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    let err = run(&registry, &mut bot, "play[start=0:10]").expect_err("no payload");
    assert!(matches!(
        err,
        Error::Type(ref e) if e.kind == TypeErrorKind::MissingParameter { parameter: "payload".into() }
    ));
}

#[test]
fn download_forces_and_does_not_queue() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    run(&registry, &mut bot, "dl https://example.com/a").unwrap();
    assert_eq!(bot.downloads.len(), 1);
    assert!(bot.downloads[0].force);
    assert!(bot.queue.is_empty());
}

#[test]
fn settheme_targets_the_author() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    run(&registry, &mut bot, "set_theme[stop=0:15] https://example.com/intro").unwrap();
    assert_eq!(bot.downloads.len(), 1);
    assert_eq!(
        bot.downloads[0].destination,
        Destination::Theme("alice".to_string())
    );
    assert_eq!(bot.downloads[0].stop, Some(Timestamp::from_seconds(15)));
    assert!(bot.queue.is_empty());
}

#[test]
fn search_returns_uri_or_null() {
    let registry = registry();
    let mut bot = RecordingBot::new().with_search("lofi", "https://example.com/lofi");
    assert_eq!(
        run(&registry, &mut bot, "find lofi").unwrap(),
        Value::String("https://example.com/lofi".into())
    );
    assert_eq!(run(&registry, &mut bot, "search jazz").unwrap(), Value::Null);
}

#[test]
fn queue_listing() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    run(&registry, &mut bot, "queue").unwrap();
    run(&registry, &mut bot, "play[start=0:10] https://example.com/a").unwrap();
    run(&registry, &mut bot, "play https://example.com/b").unwrap();
    run(&registry, &mut bot, "q").unwrap();
    assert_eq!(
        bot.texts(),
        vec![
            "```Queue is empty.```",
            "```0: `https://example.com/a` [00:10-]\n1: `https://example.com/b````",
        ]
    );
}

#[test]
fn skip_and_stop() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    run(&registry, &mut bot, "play https://example.com/a").unwrap();
    for line in ["next", "Skip", "маняк"] {
        run(&registry, &mut bot, line).unwrap();
    }
    assert_eq!(bot.skips, 3);
    run(&registry, &mut bot, "dilyankata").unwrap();
    assert_eq!(bot.stops, 1);
    assert!(bot.queue.is_empty());
}

// -----------------------------------------------------------
// Meta.
// -----------------------------------------------------------

#[test]
fn ass_prints_result() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    let result = run(&registry, &mut bot, "ass add[1, 2]").unwrap();
    assert_eq!(result, Value::Null);
    assert_eq!(bot.texts(), vec!["Command result: 3"]);
}

#[test]
fn ass_stays_quiet_for_null() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    run(&registry, &mut bot, "ass skip").unwrap();
    assert!(bot.replies.is_empty());
    assert_eq!(bot.skips, 1);
}

#[test]
fn ass_reports_errors() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    run(&registry, &mut bot, "ass add[1").unwrap();
    run(&registry, &mut bot, "ass div[1]").unwrap();
    assert_eq!(
        bot.texts(),
        vec![
            "```Could not run command:\n    SyntaxError: open bracket not closed at 3..4```",
            "```Could not run command:\n    TypeError: mandatory parameter `b` not specified```",
        ]
    );
}

#[test]
fn ass_nesting_is_bounded() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    let line = format!("{}add[1, 2]", "ass ".repeat(5000));
    run(&registry, &mut bot, &line).unwrap();
    let texts = bot.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with(
        "```Could not run command:\n    SyntaxError: nested too deeply at 0.."
    ));
}

#[test]
fn parse_returns_canonical_form() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    assert_eq!(
        run(&registry, &mut bot, "parse play[start=0:10] some song").unwrap(),
        Value::String(r#"play[start=00:10, payload="some song"]"#.into())
    );
}

#[test]
fn parse_propagates_syntax_errors() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    let err = run(&registry, &mut bot, "parse play[").expect_err("unclosed");
    assert_eq!(err.label(), "SyntaxError");
}

#[test]
fn print_responds_with_result() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    run(&registry, &mut bot, "print mul[6, 7]").unwrap();
    assert_eq!(bot.texts(), vec!["42"]);
}

#[test]
fn help_lists_commands() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    run(&registry, &mut bot, "help").unwrap();
    let reply = bot.texts()[0];
    assert!(reply.starts_with(
        "```Announcer has the following commands:\n - ass\n - parse\n - print\n - help, halp, хелп, халп\n"
    ));
    assert!(reply.contains("\n - add, sum\n"));
    assert!(reply.ends_with(" - mod```"));
}

#[test]
fn help_for_one_command() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    run(&registry, &mut bot, "хелп[div]").unwrap();
    run(&registry, &mut bot, "halp[name=banana]").unwrap();
    let texts = bot.texts();
    assert!(texts[0].starts_with("```Aliases: div\nSignature: [a: Number, b: Number]\n\nDivides"));
    assert!(texts[0].ends_with("```"));
    assert_eq!(texts[1], "```Unknown command `banana````");
}

// -----------------------------------------------------------
// Fun.
// -----------------------------------------------------------

#[test]
fn dumb_insults() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    run(&registry, &mut bot, "мамкамуипрасе[who=\"the build\", howdumb=incredibly]").unwrap();
    assert_eq!(bot.texts(), vec!["the build is incredibly dumb"]);
}

#[test]
fn apricot_posts_a_meme() {
    let registry = registry();
    let mut bot = RecordingBot::new();
    run(&registry, &mut bot, "apricot").unwrap();
    assert_eq!(bot.replies.len(), 1);
    assert!(bot.texts()[0].starts_with("https://"));
}
