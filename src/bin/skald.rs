//! skald — one-shot CLI for the suggestion pipeline
//!
//! Runs a single correct/translate/expand request against the configured
//! provider. Intended for trying out provider settings before wiring the
//! pipeline into a host.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use skald::client::AssistClient;
use skald::config::{Settings, TomlConfig};
use skald::providers::prompts::{self, Direction};
use skald::providers::test_connection;
use skald::transport::{HttpTransport, SystemClock};

/// Skald suggestion pipeline CLI
#[derive(Parser)]
#[command(name = "skald")]
#[command(version)]
#[command(about = "Inline AI suggestion pipeline CLI")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "SKALD_CONFIG", default_value = "skald.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Probe the configured provider with a minimal request
    Test,

    /// Correct grammar/spelling/punctuation
    Correct {
        /// Text to correct (or omit to read from stdin)
        text: Option<String>,
    },

    /// Translate between Chinese and English
    Translate {
        /// Text to translate (or omit to read from stdin)
        text: Option<String>,
        /// Direction: zh-en or en-zh
        #[arg(short, long, default_value = "zh-en")]
        direction: String,
    },

    /// Expand text while keeping its meaning and style
    Expand {
        /// Text to expand (or omit to read from stdin)
        text: Option<String>,
        /// Target expansion ratio
        #[arg(short, long, default_value_t = 2.0)]
        ratio: f32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::from_reader(&TomlConfig::from_path(&args.config)?);
    let transport = Rc::new(HttpTransport::new());

    let user_prompt = match &args.command {
        Command::Test => {
            let ok = test_connection(transport.as_ref(), &settings.provider);
            println!("{}", if ok { "connection ok" } else { "connection failed" });
            return if ok { Ok(()) } else { Err("provider unreachable".into()) };
        }
        Command::Correct { text } => prompts::correction_prompt(&read_text(text.as_deref())?),
        Command::Translate { text, direction } => {
            let direction = match direction.as_str() {
                "zh-en" => Direction::ZhToEn,
                "en-zh" => Direction::EnToZh,
                other => return Err(format!("unknown direction: {other}").into()),
            };
            prompts::translation_prompt(&read_text(text.as_deref())?, direction)
        }
        Command::Expand { text, ratio } => {
            prompts::expansion_prompt(&read_text(text.as_deref())?, *ratio)
        }
    };

    let client = AssistClient::new(transport, Rc::new(SystemClock), &settings.cache);
    let mut failure = None;
    client.chat(&settings.provider, "", &user_prompt, |outcome| match outcome {
        Ok(text) => println!("{text}"),
        Err(err) => failure = Some(err),
    });
    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Use the positional argument, or read stdin when piped.
fn read_text(arg: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(text) = arg {
        return Ok(text.to_string());
    }
    if io::stdin().is_terminal() {
        return Err("no text given and stdin is a terminal".into());
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim_end().to_string())
}
