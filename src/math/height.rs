use crate::{config::WorldBounds, error::TerrainResult, math::TexelImage};
use bevy::prelude::*;
use std::path::Path;

/// Maps a terrain position to the height of the terrain at that position.
pub trait HeightSampler {
    fn sample(&self, position: Vec2) -> f32;
}

impl<F: Fn(Vec2) -> f32> HeightSampler for F {
    #[inline]
    fn sample(&self, position: Vec2) -> f32 {
        self(position)
    }
}

/// Decodes a 16 bit height stored in the red (high byte) and green (low byte) channel.
///
/// The channels are expected in the form the sampler returns them,
/// which is normalized to `[0,1]` for 8 bit textures.
#[inline]
pub fn decode_height(r: f32, g: f32) -> f32 {
    (r * 255.0 + g) * 255.0
}

/// A height image covering the world bounds.
#[derive(Clone, Debug)]
pub struct HeightField {
    image: TexelImage,
    bounds: WorldBounds,
}

impl HeightField {
    pub fn new(image: TexelImage, bounds: WorldBounds) -> Self {
        Self { image, bounds }
    }

    pub fn open<P: AsRef<Path>>(path: P, bounds: WorldBounds) -> TerrainResult<Self> {
        Ok(Self::new(TexelImage::open(path)?, bounds))
    }

    pub fn from_bevy_image(image: &Image, bounds: WorldBounds) -> TerrainResult<Self> {
        Ok(Self::new(TexelImage::from_bevy_image(image)?, bounds))
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }
}

impl HeightSampler for HeightField {
    fn sample(&self, position: Vec2) -> f32 {
        let texel = self.image.sample(self.bounds.normalize(position));
        decode_height(texel.x, texel.y)
    }
}
