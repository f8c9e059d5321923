//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod model_list;
pub mod persona_list;
pub mod say;
pub mod status;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::model_list::list_models;
use crate::cli::persona_list::list_personas;
use crate::cli::say::run_say;
use crate::cli::status::check_status;
use crate::core::config::defaults::{BASE_URL_ENV, CONFIG_KEYS};
use crate::core::config::{Config, Overrides, Settings};
use crate::core::persona::Persona;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_tracing, LogTarget};

#[derive(Parser, Debug)]
#[command(name = "localchat")]
#[command(version)]
#[command(about = "A terminal chat interface for a local OpenAI-compatible inference server")]
#[command(
    long_about = "localchat is a terminal chat interface for a locally hosted inference server \
that speaks the OpenAI chat completions API (LM Studio, llama.cpp server, Ollama and similar).\n\n\
Environment Variables:\n\
  LOCALCHAT_BASE_URL  Server root URL (defaults to http://localhost:1234)\n\
  RUST_LOG            Log filter used together with --log\n\n\
Controls:\n\
  Enter             Send the message\n\
  Esc               Abort the pending request\n\
  Tab               Switch persona\n\
  Ctrl+N            Start a new chat\n\
  Up/Down/PgUp/PgDn Scroll the conversation\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server root URL, overriding config and environment
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Model name sent with each request
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Persona used for the system message
    #[arg(short = 'p', long, global = true, value_name = "PERSONA", value_parser = parse_persona)]
    pub persona: Option<Persona>,

    /// Write debug logs to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// Message text (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Check whether the inference server is reachable
    Status,
    /// List models reported by the inference server
    Models,
    /// List available personas
    Personas,
    /// Set a configuration value, or print the configuration without arguments
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

fn parse_persona(value: &str) -> Result<Persona, String> {
    value.parse()
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            persona: self.persona,
        }
    }
}

fn resolve_settings(config: &Config, args: &Args) -> Settings {
    let env_base_url = std::env::var(BASE_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty());
    config.resolve(env_base_url, &args.overrides())
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let code = runtime.block_on(async_main())?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

async fn async_main() -> Result<i32, Box<dyn Error>> {
    let mut args = Args::parse();
    let command = args.command.take().unwrap_or(Commands::Chat);

    let target = match command {
        Commands::Chat => LogTarget::Interactive,
        _ => LogTarget::Command,
    };
    init_tracing(args.log.as_deref(), target)?;

    let config = Config::load()?;
    let settings = resolve_settings(&config, &args);

    match command {
        Commands::Chat => {
            run_chat(settings).await?;
            Ok(0)
        }
        Commands::Say { prompt } => run_say(prompt, &settings).await,
        Commands::Status => Ok(check_status(&settings).await),
        Commands::Models => {
            list_models(&settings).await?;
            Ok(0)
        }
        Commands::Personas => {
            list_personas(settings.persona);
            Ok(0)
        }
        Commands::Set { key, value } => {
            let Some(key) = key else {
                config.print_all();
                return Ok(0);
            };
            if value.is_empty() {
                eprintln!("⚠️  Missing value for {key}. Valid keys: {}", CONFIG_KEYS.join(", "));
                return Ok(1);
            }
            let mut config = config;
            let value = value.join(" ");
            match config.set_value(&key, &value) {
                Ok(()) => {
                    config.save()?;
                    println!("✅ Set {key} to: {value}");
                    Ok(0)
                }
                Err(err) => {
                    eprintln!("❌ {err}");
                    Ok(1)
                }
            }
        }
        Commands::Unset { key } => {
            let mut config = config;
            match config.unset_value(&key) {
                Ok(()) => {
                    config.save()?;
                    println!("✅ Unset {key}");
                    Ok(0)
                }
                Err(err) => {
                    eprintln!("❌ {err}");
                    Ok(1)
                }
            }
        }
    }
}
