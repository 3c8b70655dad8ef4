use std::path::PathBuf;

use ac_core::config::{ConvertConfig, OutputKind};
use clap::Parser;

/// tilescii — Tile-based ASCII art converter.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image à convertir (PNG, JPEG, BMP, GIF).
    pub image: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Caractères initiaux (remplace le charset de la config).
    #[arg(long)]
    pub charset: Option<String>,

    /// Résolution initiale, en caractères par ligne.
    #[arg(short, long)]
    pub resolution: Option<u32>,

    /// Inverser la correspondance clair/sombre.
    #[arg(long, default_value_t = false)]
    pub reverse: bool,

    /// Sortie initiale : console ou html.
    #[arg(long)]
    pub output: Option<String>,

    /// Convertir une fois et quitter, sans shell interactif.
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply the command-line overrides on top of `config`.
    ///
    /// # Errors
    /// Returns an error if `--output` names an unknown sink.
    pub fn apply_overrides(&self, config: &mut ConvertConfig) -> anyhow::Result<()> {
        if let Some(ref charset) = self.charset {
            config.charset.clone_from(charset);
        }
        if let Some(res) = self.resolution {
            config.resolution = res;
        }
        if self.reverse {
            config.reverse = true;
        }
        if let Some(ref output) = self.output {
            config.output = parse_output(output)
                .ok_or_else(|| anyhow::anyhow!("Sortie inconnue '{output}' (console | html)"))?;
        }
        config.sanitize();
        Ok(())
    }
}

/// `console` / `html` → [`OutputKind`].
#[must_use]
pub fn parse_output(s: &str) -> Option<OutputKind> {
    match s {
        "console" => Some(OutputKind::Console),
        "html" => Some(OutputKind::Html),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_fields() {
        let cli = Cli::parse_from([
            "tilescii",
            "cat.png",
            "--charset",
            " .#",
            "-r",
            "12",
            "--reverse",
            "--output",
            "html",
        ]);
        let mut config = ConvertConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config.charset, " .#");
        assert_eq!(config.resolution, 8);
        assert!(config.reverse);
        assert_eq!(config.output, OutputKind::Html);
    }

    #[test]
    fn unknown_output_is_rejected() {
        let cli = Cli::parse_from(["tilescii", "cat.png", "--output", "pdf"]);
        let mut config = ConvertConfig::default();
        assert!(cli.apply_overrides(&mut config).is_err());
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = Cli::parse_from(["tilescii", "cat.png"]);
        let mut config = ConvertConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config, ConvertConfig::default());
        assert!(!cli.once);
    }
}
