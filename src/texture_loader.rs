use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use exif::{In, Reader, Tag, Value};
use raylib::prelude::*;
use tracing::warn;

use crate::deck::Deck;

/// Textures for the deck's declared media, keyed by slide id. Missing or
/// unreadable files are logged and skipped; the slide renders without them.
pub struct MediaStore {
    figures: HashMap<u32, Texture2D>,
    backdrops: HashMap<u32, Texture2D>,
}

impl MediaStore {
    pub fn load(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        deck: &Deck,
        assets_dir: &Path,
    ) -> Self {
        let mut figures = HashMap::new();
        let mut backdrops = HashMap::new();
        for slide in deck.slides() {
            if let Some(path) = &slide.figure {
                match load_texture_oriented(rl, thread, &assets_dir.join(path)) {
                    Ok(texture) => {
                        figures.insert(slide.id, texture);
                    }
                    Err(e) => warn!(slide = slide.id, "figure not loaded: {e:#}"),
                }
            }
            if let Some(path) = &slide.backdrop {
                match load_texture_oriented(rl, thread, &assets_dir.join(path)) {
                    Ok(texture) => {
                        backdrops.insert(slide.id, texture);
                    }
                    Err(e) => warn!(slide = slide.id, "backdrop not loaded: {e:#}"),
                }
            }
        }
        Self { figures, backdrops }
    }

    pub fn figure(&self, slide_id: u32) -> Option<&Texture2D> {
        self.figures.get(&slide_id)
    }

    pub fn backdrop(&self, slide_id: u32) -> Option<&Texture2D> {
        self.backdrops.get(&slide_id)
    }
}

/// EXIF orientation values that only need rotations (flips are ignored).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Orientation {
    Upright,
    Rotate180,
    Rotate90Cw,
    Rotate90Ccw,
}

pub fn orientation_from_exif(bytes: &[u8]) -> Orientation {
    let Ok(exif) = Reader::new().read_from_container(&mut Cursor::new(bytes)) else {
        return Orientation::Upright;
    };
    let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) else {
        return Orientation::Upright;
    };
    match &field.value {
        Value::Short(values) => match values.first() {
            Some(3) => Orientation::Rotate180,
            Some(6) => Orientation::Rotate90Cw,
            Some(8) => Orientation::Rotate90Ccw,
            _ => Orientation::Upright,
        },
        _ => Orientation::Upright,
    }
}

/// Read an image file, honor its EXIF rotation (JPEG only carries one), and
/// upload it as a texture.
pub fn load_texture_oriented(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    path: &Path,
) -> Result<Texture2D> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let orientation = if ext == "jpg" || ext == "jpeg" {
        orientation_from_exif(&bytes)
    } else {
        Orientation::Upright
    };

    let mut image = Image::load_image_from_mem(&format!(".{ext}"), &bytes)
        .map_err(|e| anyhow::anyhow!("decoding {}: {e}", path.display()))?;
    match orientation {
        Orientation::Upright => {}
        Orientation::Rotate180 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        Orientation::Rotate90Cw => image.rotate_cw(),
        Orientation::Rotate90Ccw => image.rotate_ccw(),
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| anyhow::anyhow!("uploading {}: {e}", path.display()))?;
    Ok(texture)
}

/// Best-effort MIME type for the inline-image API, from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_read_as_upright() {
        assert_eq!(orientation_from_exif(b"not an image"), Orientation::Upright);
        assert_eq!(orientation_from_exif(&[]), Orientation::Upright);
    }

    #[test]
    fn mime_falls_back_for_unknown_extensions() {
        assert_eq!(mime_for_path(Path::new("fig.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("fig.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("fig.tiff")), "application/octet-stream");
        assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
    }
}
