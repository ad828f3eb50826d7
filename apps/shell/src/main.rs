mod cli;

use crate::cli::{Cli, Command};
use anyhow::{Context, anyhow};
use arcade::icons::{self, IconProvider, Session, format_icon_name};
use arcade::kernel::config::load_app_config;
use arcade_logger::Logger;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{debug, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = load_app_config(cli.config.as_ref()).context("Loading configuration")?;
    cli.sprite.apply(&mut config);

    let _logger = Logger::from_config(env!("CARGO_PKG_NAME"), &config.logging)?;
    debug!(?cli, "Starting");

    let mut out = io::stdout().lock();
    if let Command::Format { text } = &cli.command {
        writeln!(out, "{}", format_icon_name(&text.join(" ")))?;
        return Ok(ExitCode::SUCCESS);
    }

    let provider = load(&config.icons).await?;
    let resolver = provider.resolver();

    match cli.command {
        Command::List { search } => {
            for name in resolver.search(search.as_deref().unwrap_or_default()) {
                writeln!(out, "{name}")?;
            }
        },
        Command::Check { name } => {
            if !resolver.exists(&name) {
                warn!(name, "Icon not found in sprite");
                return Ok(ExitCode::FAILURE);
            }
            writeln!(out, "{name}")?;
        },
        Command::Render(args) => {
            let request = args.request();
            let view = provider.renderer().render(&request);
            if !view.is_present() {
                warn!(name = request.name(), "Icon not found in sprite; the reference renders empty");
            }
            writeln!(out, "{}", view.to_markup())?;
            if args.snippet {
                writeln!(out, "{}", request.usage_snippet())?;
            }
        },
        Command::Format { .. } => {},
    }

    Ok(ExitCode::SUCCESS)
}

async fn load(config: &arcade::domain::config::IconsConfig) -> anyhow::Result<IconProvider> {
    let provider = icons::mount(Session::new(), config)?;
    if provider.readiness().subscribe().wait_ready().await {
        return Ok(provider);
    }

    let state = provider.readiness().current();
    Err(state.error().map_or_else(|| anyhow!("Sprite load was cancelled"), |e| anyhow!("{e}")))
}
