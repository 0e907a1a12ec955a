use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use weather_core::{
    Config, LoadOutcome, LocationQuery, VisualCrossingClient, WeatherClient,
    WeatherPresenter,
};

use crate::terminal::TerminalView;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default location.
    Configure,

    /// Show weather once. Without a location, the default location is used.
    Show {
        /// Address or location name, e.g. "London,UK".
        location: Option<String>,
    },

    /// Show the default location, then keep prompting for new ones.
    Interactive,

    /// Print the raw report for a location as JSON.
    Fetch {
        /// Address or location name.
        location: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location } => show(location).await,
            Command::Interactive => interactive().await,
            Command::Fetch { location } => fetch(&location).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("Visual Crossing API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    cfg.set_api_key(api_key);

    let location = Text::new("Default location:")
        .with_default(cfg.default_location().as_str())
        .prompt()
        .context("Failed to read default location")?;
    cfg.set_default_location(&location);

    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn presenter(cfg: &Config) -> anyhow::Result<WeatherPresenter<VisualCrossingClient, TerminalView>> {
    let client = VisualCrossingClient::new(cfg.client_config()?);
    Ok(WeatherPresenter::new(client, TerminalView::new())
        .with_default_location(cfg.default_location()))
}

async fn show(location: Option<String>) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let presenter = presenter(&cfg)?;

    let outcome = match location {
        Some(raw) => {
            presenter.view().set_input(&raw);
            presenter.submit().await
        }
        None => presenter.load_initial().await,
    };

    match outcome {
        LoadOutcome::Rendered => {
            presenter.view().print_panel();
            Ok(())
        }
        LoadOutcome::Skipped => bail!("Please enter a location"),
        LoadOutcome::Failed | LoadOutcome::Superseded => bail!("No weather data to show"),
    }
}

async fn interactive() -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let presenter = presenter(&cfg)?;

    if presenter.load_initial().await == LoadOutcome::Rendered {
        presenter.view().print_panel();
    }

    loop {
        let input = match Text::new("Location:").with_help_message("Esc to quit").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read location"),
        };

        presenter.view().set_input(&input);
        match presenter.submit().await {
            LoadOutcome::Rendered => presenter.view().print_panel(),
            LoadOutcome::Skipped => println!("Please enter a location"),
            LoadOutcome::Failed | LoadOutcome::Superseded => {}
        }
    }

    Ok(())
}

async fn fetch(raw: &str) -> anyhow::Result<()> {
    let Some(location) = LocationQuery::parse(raw) else {
        bail!("Please enter a location");
    };

    let cfg = Config::load()?;
    let client = VisualCrossingClient::new(cfg.client_config()?);
    let report = client
        .fetch(&location)
        .await
        .with_context(|| format!("Failed to fetch weather for {location}"))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
