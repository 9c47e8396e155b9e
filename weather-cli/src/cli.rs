use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use tokio::sync::watch;
use weather_core::{
    Config, LookupMachine, LookupOutcome, LookupState, SearchBar, config::API_KEY_ENV,
    provider_from_config,
};

use crate::render::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-lookup", version, about = "Current weather for a location")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Look up the current weather for one location.
    Show {
        /// Location name, passed to the provider as typed.
        location: String,
    },

    /// Prompt for locations until Esc is pressed.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure().map(|()| ExitCode::SUCCESS),
            Command::Show { location } => {
                let machine = machine_from_config()?;
                let mut rx = machine.subscribe();

                machine.submit_location(location);
                let state = follow(&mut rx).await?;

                Ok(match state.outcome {
                    LookupOutcome::Failed(_) => ExitCode::FAILURE,
                    _ => ExitCode::SUCCESS,
                })
            }
            Command::Interactive => interactive().await.map(|()| ExitCode::SUCCESS),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    if std::env::var_os(API_KEY_ENV).is_some() {
        println!("Note: {API_KEY_ENV} is set and takes precedence over the stored key.");
    }

    Ok(())
}

fn machine_from_config() -> anyhow::Result<LookupMachine> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    Ok(LookupMachine::with_transition_window(provider, config.transition_window()))
}

async fn interactive() -> anyhow::Result<()> {
    let machine = machine_from_config()?;
    let mut rx = machine.subscribe();

    let submitter = machine.clone();
    let mut bar = SearchBar::new(move |query| submitter.submit_location(query));

    loop {
        let initial = bar.text().to_string();
        let line = tokio::task::spawn_blocking(move || {
            Text::new("Location:")
                .with_placeholder("Enter your location")
                .with_initial_value(&initial)
                .prompt_skippable()
        })
        .await??;

        let Some(line) = line else {
            break;
        };

        bar.set_text(line);
        bar.submit();
        follow(&mut rx).await?;
    }

    Ok(())
}

/// Print every state change until the lookup has settled and its transition
/// window has closed.
async fn follow(rx: &mut watch::Receiver<LookupState>) -> anyhow::Result<LookupState> {
    loop {
        rx.changed().await.context("Lookup state channel closed")?;
        let state = rx.borrow_and_update().clone();

        let frame = render(&state);
        if !frame.is_empty() {
            println!("{frame}");
        }

        if state.outcome.is_settled() && !state.submitted {
            return Ok(state);
        }
    }
}
