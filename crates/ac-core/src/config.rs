use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{CHARSET_DIGITS, is_printable};
use crate::error::CoreError;

/// Destination du rendu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum OutputKind {
    /// Texte sur la sortie standard.
    #[default]
    Console,
    /// Document HTML à police fixe.
    Html,
}

/// Configuration de conversion, chargée depuis TOML.
///
/// Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use ac_core::config::ConvertConfig;
/// let config = ConvertConfig::default();
/// assert_eq!(config.resolution, 2);
/// assert_eq!(config.charset, "0123456789");
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ConvertConfig {
    /// Caractères enregistrés au démarrage.
    pub charset: String,
    /// Nombre de caractères par ligne (puissance de deux).
    pub resolution: u32,
    /// Inverser la correspondance clair/sombre.
    pub reverse: bool,
    /// Sortie initiale.
    pub output: OutputKind,
    /// Fichier écrit par la sortie HTML.
    pub html_path: PathBuf,
    /// Police déclarée dans le document HTML.
    pub html_font: String,
    /// Calcul des tuiles en parallèle (rayon).
    pub parallel: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            charset: CHARSET_DIGITS.to_string(),
            resolution: 2,
            reverse: false,
            output: OutputKind::Console,
            html_path: PathBuf::from("out.html"),
            html_font: "Courier New".to_string(),
            parallel: true,
        }
    }
}

impl ConvertConfig {
    /// Force les champs dans leurs plages valides.
    ///
    /// The resolution is rounded down to a power of two (minimum 1) and
    /// non-printable charset characters are dropped.
    ///
    /// # Example
    /// ```
    /// use ac_core::config::ConvertConfig;
    /// let mut c = ConvertConfig { resolution: 100, charset: "ab\ncé".into(), ..Default::default() };
    /// c.sanitize();
    /// assert_eq!(c.resolution, 64);
    /// assert_eq!(c.charset, "abc");
    /// ```
    pub fn sanitize(&mut self) {
        if !self.resolution.is_power_of_two() {
            let fixed = match self.resolution {
                0 => 1,
                r => 1 << (31 - r.leading_zeros()),
            };
            log::warn!(
                "Résolution {} n'est pas une puissance de deux, utilisation de {fixed}",
                self.resolution
            );
            self.resolution = fixed;
        }
        if self.charset.chars().any(|c| !is_printable(c)) {
            log::warn!("Caractères non imprimables retirés du charset");
            self.charset.retain(is_printable);
        }
        if self.html_font.trim().is_empty() {
            self.html_font = Self::default().html_font;
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    convert: Option<ConvertSection>,
}

/// Convert section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct ConvertSection {
    charset: Option<String>,
    resolution: Option<u32>,
    reverse: Option<bool>,
    output: Option<OutputKind>,
    html_path: Option<PathBuf>,
    html_font: Option<String>,
    parallel: Option<bool>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns [`CoreError::FileNotFound`] if `path` does not exist, an I/O
/// error if it cannot be read, and [`CoreError::Config`] if it cannot be parsed.
///
/// # Example
/// ```no_run
/// use ac_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ConvertConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CoreError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Impossible de lire {}", path.display()));
        }
    };
    parse_config(&content).with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns [`CoreError::Config`] if the text is not valid TOML for this schema.
///
/// # Example
/// ```
/// use ac_core::config::{parse_config, OutputKind};
/// let c = parse_config("[convert]\noutput = \"Html\"\n").unwrap();
/// assert_eq!(c.output, OutputKind::Html);
/// assert_eq!(c.resolution, 2);
/// ```
pub fn parse_config(content: &str) -> Result<ConvertConfig> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| CoreError::Config(e.message().to_string()))?;
    let mut config = ConvertConfig::default();

    if let Some(c) = file.convert {
        if let Some(v) = c.charset {
            config.charset = v;
        }
        if let Some(v) = c.resolution {
            config.resolution = v;
        }
        if let Some(v) = c.reverse {
            config.reverse = v;
        }
        if let Some(v) = c.output {
            config.output = v;
        }
        if let Some(v) = c.html_path {
            config.html_path = v;
        }
        if let Some(v) = c.html_font {
            config.html_font = v;
        }
        if let Some(v) = c.parallel {
            config.parallel = v;
        }
    }

    config.sanitize();
    Ok(config)
}
