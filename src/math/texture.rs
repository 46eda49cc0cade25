use crate::error::{TerrainError, TerrainResult};
use bevy::{prelude::*, render::render_resource::TextureFormat};
use image::{DynamicImage, RgbImage};
use std::{path::Path, sync::Arc};

/// An RGB8 image that can be sampled on the CPU the same way the shaders sample
/// the terrain textures: normalized channels, bilinear filtering, clamp-to-edge
/// addressing and texel centers at `(i + 0.5) / size`.
#[derive(Clone, Debug)]
pub struct TexelImage {
    width: u32,
    height: u32,
    texels: Vec<[u8; 3]>,
}

impl TexelImage {
    pub fn new(width: u32, height: u32, texels: Vec<[u8; 3]>) -> TerrainResult<Self> {
        if width == 0 || height == 0 || texels.len() != width as usize * height as usize {
            return Err(TerrainError::TexelCount {
                len: texels.len(),
                width,
                height,
            });
        }

        Ok(Self {
            width,
            height,
            texels,
        })
    }

    pub fn from_rgb8(image: &RgbImage) -> TerrainResult<Self> {
        let texels = image.pixels().map(|pixel| pixel.0).collect();
        Self::new(image.width(), image.height(), texels)
    }

    pub fn from_dynamic(image: &DynamicImage) -> TerrainResult<Self> {
        Self::from_rgb8(&image.to_rgb8())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> TerrainResult<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TerrainError::Image {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;

        Self::from_dynamic(&image)
    }

    /// Copies the red, green and blue channels of a loaded Bevy image.
    pub fn from_bevy_image(image: &Image) -> TerrainResult<Self> {
        let format = image.texture_descriptor.format;

        let pixel_size = match format {
            TextureFormat::Rgba8Unorm
            | TextureFormat::Rgba8UnormSrgb
            | TextureFormat::Bgra8Unorm
            | TextureFormat::Bgra8UnormSrgb => 4,
            _ => return Err(TerrainError::UnsupportedFormat { format }),
        };
        let swizzle = matches!(
            format,
            TextureFormat::Bgra8Unorm | TextureFormat::Bgra8UnormSrgb
        );

        let texels = image
            .data
            .chunks_exact(pixel_size)
            .map(|pixel| {
                if swizzle {
                    [pixel[2], pixel[1], pixel[0]]
                } else {
                    [pixel[0], pixel[1], pixel[2]]
                }
            })
            .collect();

        Self::new(image.width(), image.height(), texels)
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Returns the normalized texel, clamping the coordinate to the image.
    pub fn texel(&self, x: i64, y: i64) -> Vec3 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let [r, g, b] = self.texels[x + y * self.width as usize];

        Vec3::new(r as f32, g as f32, b as f32) / 255.0
    }

    /// Bilinearly filters the image at the texture coordinate.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        let size = self.size().as_vec2();
        // Anything beyond one texel outside of the image samples the edge, this keeps
        // the texel indices finite for huge or infinite coordinates.
        let position = (uv * size - 0.5).clamp(Vec2::splat(-1.0), size);
        let base = position.floor();
        let t = position - base;
        let (x, y) = (base.x as i64, base.y as i64);

        let top = self.texel(x, y).lerp(self.texel(x + 1, y), t.x);
        let bottom = self.texel(x, y + 1).lerp(self.texel(x + 1, y + 1), t.x);

        top.lerp(bottom, t.y)
    }
}
