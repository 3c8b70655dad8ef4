use std::io;

use ac_core::config::ConvertConfig;
use anyhow::{Context, Result};
use clap::Parser;

pub mod cli;
pub mod shell;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, puis les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config)?;
    log::debug!("config : {config:?}");

    // 4. Charger l'image
    let image = ac_source::load_image(&cli.image)
        .with_context(|| format!("Chargement de {} impossible", cli.image.display()))?;

    // 5. Shell interactif (ou conversion unique)
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = shell::Shell::new(image, &config, stdin.lock(), stdout.lock());
    log::info!(
        "{} caractères, résolution {}, sortie {}",
        shell.index().len(),
        shell.resolution(),
        shell.sink_name()
    );

    if cli.once {
        shell.execute(shell::Command::AsciiArt)?;
        return Ok(());
    }
    shell.run()
}

fn resolve_config(cli: &cli::Cli) -> Result<ConvertConfig> {
    if cli.config.exists() {
        ac_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(ConvertConfig::default())
    }
}
