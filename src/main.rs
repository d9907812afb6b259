//! CLI tool to parse, evaluate, and chat with the command language.

use std::io::{self, BufRead};
use std::process::ExitCode;

use announcer::{Config, ConsoleBot, Message, Registry, Value, handle_message, parse, run_line};
use tracing_subscriber::EnvFilter;

fn usage() -> ExitCode {
    eprintln!("Usage: announcer <command> [line]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  parse <line>  Print the canonical form of a command line");
    eprintln!("  eval <line>   Run a command line and print its result");
    eprintln!("  chat          Treat each line of stdin as a chat message");
    eprintln!("  commands      List the available commands");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  announcer parse 'play[start=0:10] some song'");
    eprintln!("  announcer eval 'add[1, mul[2, 3]]'");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "announcer=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        return usage();
    }

    let registry = match Registry::with_builtins() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: invalid command registry: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = Config::from_env();
    let author = std::env::var("USER").unwrap_or_else(|_| "console".to_string());

    let command = args[1].as_str();
    let line = args[2..].join(" ");

    match command {
        "parse" | "eval" if line.trim().is_empty() => {
            eprintln!("Error: no command line given");
            ExitCode::from(2)
        }
        "parse" => match parse(&line) {
            Ok(parsed) => {
                println!("{parsed}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("SyntaxError: {e}");
                ExitCode::FAILURE
            }
        },
        "eval" => {
            let message = Message::new(&author, &config.channel, &line);
            let mut bot = ConsoleBot::new(config);
            match run_line(&registry, &mut bot, &message, &line) {
                Ok(Value::Null) => ExitCode::SUCCESS,
                Ok(result) => {
                    println!("{result}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}: {e}", e.label());
                    ExitCode::FAILURE
                }
            }
        }
        "chat" => {
            let channel = config.channel.clone();
            let mut bot = ConsoleBot::new(config);
            let mut had_error = false;
            for content in io::stdin().lock().lines() {
                let content = match content {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("stdin: {e}");
                        return ExitCode::FAILURE;
                    }
                };
                let message = Message::new(&author, &channel, &content);
                let outcomes = handle_message(&registry, &mut bot, &message);
                had_error |= outcomes.iter().any(Result::is_err);
            }
            if had_error {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        "commands" => {
            for descriptor in registry.descriptors() {
                println!("{}\n", descriptor.help().format());
            }
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {command}");
            ExitCode::from(2)
        }
    }
}
