use std::path::Path;

use ac_core::error::CoreError;
use ac_core::frame::Image;
use anyhow::{Context, Result};
use image::ImageError;

/// Charge une image depuis le disque (PNG, JPEG, BMP, GIF).
///
/// Alpha is dropped; each call yields a new [`Image`] instance.
///
/// # Errors
/// Returns [`CoreError::FileNotFound`] for a missing path,
/// [`CoreError::UnsupportedFormat`] if no decoder accepts the file, and an
/// I/O error if it cannot be read.
///
/// # Example
/// ```no_run
/// use ac_source::image::load_image;
/// use std::path::Path;
/// let img = load_image(Path::new("board.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<Image> {
    if !path.exists() {
        return Err(CoreError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let img = image::open(path).map_err(|e| match e {
        ImageError::IoError(io) => {
            anyhow::Error::from(io).context(format!("Impossible de lire {}", path.display()))
        }
        other => {
            let format = path
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("inconnu")
                .to_ascii_lowercase();
            unsupported(format, &other)
        }
    })?;
    let image = from_dynamic(&img)
        .with_context(|| format!("Image vide : {}", path.display()))?;
    log::info!(
        "Image chargée : {} ({}×{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Décode une image encodée en mémoire.
///
/// # Errors
/// Returns [`CoreError::UnsupportedFormat`] if the bytes are not a supported
/// image.
pub fn decode_image(bytes: &[u8]) -> Result<Image> {
    let img = image::load_from_memory(bytes).map_err(|e| {
        let format = image::guess_format(bytes)
            .map_or_else(|_| "inconnu".to_string(), |f| format!("{f:?}").to_ascii_lowercase());
        unsupported(format, &e)
    })?;
    from_dynamic(&img)
}

fn unsupported(format: String, err: &ImageError) -> anyhow::Error {
    log::debug!("décodage refusé ({format}) : {err}");
    CoreError::UnsupportedFormat {
        format,
        reason: err.to_string(),
    }
    .into()
}

fn from_dynamic(img: &image::DynamicImage) -> Result<Image> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Image::from_raw_rgb(width, height, rgb.as_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::frame::Rgb;
    use image::{ImageBuffer, Rgba};

    fn write_png(path: &Path) {
        let buf = ImageBuffer::from_fn(3, 2, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255u8, 255, 255, 255])
            } else {
                Rgba([10u8, 20, 30, 0])
            }
        });
        buf.save(path).unwrap();
    }

    #[test]
    fn loads_png_and_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("check.png");
        write_png(&path);

        let img = load_image(&path).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.pixel(0, 0), Rgb::WHITE);
        assert_eq!(img.pixel(1, 0), Rgb::new(10, 20, 30));
    }

    #[test]
    fn each_load_is_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        write_png(&path);
        let a = load_image(&path).unwrap();
        let b = load_image(&path).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.png");
        let err = load_image(&path).unwrap_err();
        assert!(err.to_string().contains("nope.png"));
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::FileNotFound { path: p }) if *p == path
        ));
    }

    #[test]
    fn undecodable_file_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.PNG");
        std::fs::write(&path, b"plain text, no pixels").unwrap();
        let err = load_image(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::UnsupportedFormat { format, .. }) if format == "png"
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode_image(b"not an image").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::UnsupportedFormat { format, .. }) if format == "inconnu"
        ));
    }
}
