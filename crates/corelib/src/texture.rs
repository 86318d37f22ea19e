//! CPU-side texture images.

use crate::error::{CoreError, CoreResult};

/// Tightly packed RGBA8 image, rows top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    pub const BYTES_PER_PIXEL: usize = 4;

    pub fn new_rgba8(width: u32, height: u32, rgba: Vec<u8>) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidTexture(format!("empty image {width}x{height}")));
        }
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if rgba.len() != expected {
            return Err(CoreError::InvalidTexture(format!(
                "{width}x{height} RGBA8 needs {expected} bytes, got {}",
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// 1x1 image of one colour.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        let p = self.rgba.get(i..i + Self::BYTES_PER_PIXEL)?;
        Some([p[0], p[1], p[2], p[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_must_match_buffer() {
        assert!(TextureData::new_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            TextureData::new_rgba8(2, 2, vec![0; 12]),
            Err(CoreError::InvalidTexture(_))
        ));
        assert!(TextureData::new_rgba8(0, 4, Vec::new()).is_err());
    }

    #[test]
    fn pixels_are_row_major() {
        let tex = TextureData::new_rgba8(
            2,
            2,
            vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4],
        )
        .unwrap();
        assert_eq!(tex.pixel(1, 0), Some([2; 4]));
        assert_eq!(tex.pixel(0, 1), Some([3; 4]));
        assert_eq!(tex.pixel(2, 0), None);
        assert_eq!(TextureData::solid([255; 4]).pixel(0, 0), Some([255; 4]));
    }
}
