//! Texture decoding into the RGBA8 layout the renderer uploads.

use anyhow::{Result, anyhow};
use corelib::texture::TextureData;
use gltf::image::{Data as ImageData, Format};
use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};

/// Converts an image decoded by the glTF importer to RGBA8.
pub fn from_gltf(data: ImageData) -> Result<TextureData> {
    let ImageData {
        pixels,
        format,
        width,
        height,
    } = data;
    let mismatch = format!("{format:?} pixel buffer does not match {width}x{height}");
    let img = match format {
        Format::R8 => ImageBuffer::<Luma<u8>, _>::from_raw(width, height, pixels)
            .map(DynamicImage::ImageLuma8),
        Format::R8G8 => ImageBuffer::<LumaA<u8>, _>::from_raw(width, height, pixels)
            .map(DynamicImage::ImageLumaA8),
        Format::R8G8B8 => ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, pixels)
            .map(DynamicImage::ImageRgb8),
        Format::R8G8B8A8 => ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, pixels)
            .map(DynamicImage::ImageRgba8),
        Format::R16 => ImageBuffer::<Luma<u16>, _>::from_raw(width, height, ne_u16(&pixels))
            .map(DynamicImage::ImageLuma16),
        Format::R16G16 => ImageBuffer::<LumaA<u16>, _>::from_raw(width, height, ne_u16(&pixels))
            .map(DynamicImage::ImageLumaA16),
        Format::R16G16B16 => ImageBuffer::<Rgb<u16>, _>::from_raw(width, height, ne_u16(&pixels))
            .map(DynamicImage::ImageRgb16),
        Format::R16G16B16A16 => {
            ImageBuffer::<Rgba<u16>, _>::from_raw(width, height, ne_u16(&pixels))
                .map(DynamicImage::ImageRgba16)
        }
        Format::R32G32B32FLOAT => {
            ImageBuffer::<Rgb<f32>, _>::from_raw(width, height, ne_f32(&pixels))
                .map(DynamicImage::ImageRgb32F)
        }
        Format::R32G32B32A32FLOAT => {
            ImageBuffer::<Rgba<f32>, _>::from_raw(width, height, ne_f32(&pixels))
                .map(DynamicImage::ImageRgba32F)
        }
    }
    .ok_or_else(|| anyhow!(mismatch))?;
    to_texture(img)
}

fn to_texture(img: DynamicImage) -> Result<TextureData> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(TextureData::new_rgba8(width, height, rgba.into_raw())?)
}

// The importer hands wider channels over as native-endian bytes.
fn ne_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_ne_bytes([c[0], c[1]]))
        .collect()
}

fn ne_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_gains_opaque_alpha() {
        let tex = from_gltf(ImageData {
            pixels: vec![255, 0, 0, 0, 255, 0],
            format: Format::R8G8B8,
            width: 2,
            height: 1,
        })
        .unwrap();
        assert_eq!((tex.width, tex.height), (2, 1));
        assert_eq!(tex.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(tex.pixel(1, 0), Some([0, 255, 0, 255]));
    }

    #[test]
    fn grey_expands_to_all_channels() {
        let tex = from_gltf(ImageData {
            pixels: vec![7],
            format: Format::R8,
            width: 1,
            height: 1,
        })
        .unwrap();
        assert_eq!(tex.pixel(0, 0), Some([7, 7, 7, 255]));
    }

    #[test]
    fn short_pixel_buffer_is_an_error() {
        let err = from_gltf(ImageData {
            pixels: vec![0; 5],
            format: Format::R8G8B8A8,
            width: 2,
            height: 1,
        })
        .unwrap_err();
        assert!(err.to_string().contains("2x1"), "{err}");
    }
}
