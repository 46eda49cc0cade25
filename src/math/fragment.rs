use crate::{config::WorldBounds, math::TexelImage};
use bevy::prelude::*;

/// GLSL/WGSL `step`: one if `value >= edge`, zero otherwise.
#[inline]
pub fn step(edge: f32, value: f32) -> f32 {
    if value >= edge {
        1.0
    } else {
        0.0
    }
}

/// One inside the world bounds (inclusive), zero outside of them.
pub fn boundary_mask(position: Vec2, bounds: &WorldBounds) -> f32 {
    let upper = step(-bounds.max, -position.x) * step(-bounds.max, -position.y);
    let lower = step(bounds.min, position.x) * step(bounds.min, position.y);

    upper * lower
}

/// CPU reference of the terrain fragment shader.
pub struct FragmentStage<'a> {
    pub overlay: &'a TexelImage,
    pub bounds: WorldBounds,
}

impl<'a> FragmentStage<'a> {
    pub fn new(overlay: &'a TexelImage, bounds: WorldBounds) -> Self {
        Self { overlay, bounds }
    }

    /// Samples the overlay at the terrain position and masks everything outside the bounds.
    pub fn shade(&self, position: Vec2) -> Vec4 {
        let color = self.overlay.sample(self.bounds.normalize(position));
        color.extend(boundary_mask(position, &self.bounds))
    }
}
