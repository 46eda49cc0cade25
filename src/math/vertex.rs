use crate::{
    config::TerrainConfig,
    layout::TileDescriptor,
    math::{calculate_morph, morph_position, HeightSampler, MORPH_REGION, TILE_RESOLUTION},
};
use bevy::prelude::*;

/// The result of the vertex stage for a single vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexOutput {
    pub clip_position: Vec4,
    /// The snapped and morphed position with the terrain height in `z`.
    pub terrain_position: Vec3,
    pub morph_factor: f32,
}

/// CPU reference of the terrain vertex shader.
pub struct VertexStage<'a, S: HeightSampler> {
    pub tile_resolution: f32,
    pub morph_region: f32,
    pub sampler: &'a S,
}

impl<'a, S: HeightSampler> VertexStage<'a, S> {
    pub fn new(sampler: &'a S) -> Self {
        Self {
            tile_resolution: TILE_RESOLUTION,
            morph_region: MORPH_REGION,
            sampler,
        }
    }

    pub fn from_config(config: &TerrainConfig, sampler: &'a S) -> Self {
        Self {
            tile_resolution: config.tile_resolution,
            morph_region: config.morph_region,
            sampler,
        }
    }

    /// The morph factor and the snapped terrain position of a vertex.
    pub fn ground_position(
        &self,
        local: Vec2,
        tile: &TileDescriptor,
        global_offset: Vec3,
    ) -> (Vec2, f32) {
        let morph_factor = calculate_morph(local, tile.edge_flags, self.morph_region);

        let position = tile.scale * local + tile.offset + global_offset.truncate();
        let grid = tile.scale / self.tile_resolution;

        (morph_position(position, grid, morph_factor), morph_factor)
    }

    pub fn run(
        &self,
        local: Vec2,
        tile: &TileDescriptor,
        global_offset: Vec3,
        projection: Mat4,
        model_view: Mat4,
    ) -> VertexOutput {
        let (position, morph_factor) = self.ground_position(local, tile, global_offset);
        let terrain_position = position.extend(self.sampler.sample(position));

        VertexOutput {
            clip_position: projection * model_view * terrain_position.extend(1.0),
            terrain_position,
            morph_factor,
        }
    }
}
