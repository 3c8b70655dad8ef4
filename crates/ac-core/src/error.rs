use std::path::PathBuf;

use thiserror::Error;

/// Erreurs de chargement et de construction d'images ou de configuration.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The TOML config does not match the `[convert]` schema.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Image or config path does not exist.
    #[error("Fichier introuvable : {}", .path.display())]
    FileNotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// Bytes that no enabled decoder accepts.
    #[error("Format d'image non supporté ({format}) : {reason}")]
    UnsupportedFormat {
        /// Extension or sniffed format, `inconnu` if neither is known.
        format: String,
        /// Decoder message.
        reason: String,
    },

    /// Zero width or height, or a pixel buffer of the wrong length.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// A pixel row does not match the width of the first row.
    #[error("Ligne {row} de longueur {len}, attendu {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Its length.
        len: usize,
        /// Length of row 0.
        expected: usize,
    },
}
