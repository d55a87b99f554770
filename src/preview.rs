//! Decoding image bytes into something egui can upload as a texture.

use egui::ColorImage;

/// Decode `bytes`, shrinking to fit within `max_side` pixels when given.
pub fn decode(bytes: &[u8], max_side: Option<u32>) -> Result<ColorImage, image::ImageError> {
    let mut img = image::load_from_memory(bytes)?;
    if let Some(side) = max_side {
        if img.width() > side || img.height() > side {
            img = img.thumbnail(side, side);
        }
    }
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageOutputFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_at_full_size() {
        let image = decode(&png(4, 3), None).unwrap();
        assert_eq!(image.size, [4, 3]);
    }

    #[test]
    fn shrinks_large_images() {
        let image = decode(&png(400, 200), Some(100)).unwrap();
        assert_eq!(image.size, [100, 50]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode(b"definitely not an image", None).is_err());
    }
}
