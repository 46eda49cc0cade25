use crate::{
    config::TerrainConfig, debug::DebugTerrain, layout::TileDescriptor, shaders::TERRAIN_SHADER,
};
use bevy::{
    pbr::{MaterialPipeline, MaterialPipelineKey},
    prelude::*,
    render::{
        mesh::MeshVertexBufferLayoutRef,
        render_resource::{
            AsBindGroup, RenderPipelineDescriptor, ShaderDefVal, ShaderRef, ShaderType,
            SpecializedMeshPipelineError,
        },
    },
};

bitflags::bitflags! {
    /// Debug views compiled into the terrain shader.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct TerrainDebugFlags: u32 {
        const NONE       = 0;
        const SHOW_MORPH = 1 << 0;
        const SHOW_LOD   = 1 << 1;
    }
}

impl TerrainDebugFlags {
    pub fn from_debug(debug: &DebugTerrain) -> Self {
        let mut key = TerrainDebugFlags::NONE;

        if debug.show_morph {
            key |= TerrainDebugFlags::SHOW_MORPH;
        }
        if debug.show_lod {
            key |= TerrainDebugFlags::SHOW_LOD;
        }

        key
    }

    pub fn shader_defs(&self) -> Vec<ShaderDefVal> {
        let mut shader_defs = Vec::new();

        if self.contains(TerrainDebugFlags::SHOW_MORPH) {
            shader_defs.push("SHOW_MORPH".into());
        }
        if self.contains(TerrainDebugFlags::SHOW_LOD) {
            shader_defs.push("SHOW_LOD".into());
        }

        shader_defs
    }
}

/// The per tile parameters of the terrain shader.
#[derive(Clone, Copy, Debug, Default, PartialEq, ShaderType)]
pub struct TileUniform {
    pub tile_offset: Vec2,
    pub scale: f32,
    pub edge_morph: u32,
    pub global_offset: Vec3,
    pub tile_resolution: f32,
    pub morph_region: f32,
    pub bounds_min: f32,
    pub bounds_max: f32,
    pub level: u32,
}

impl TileUniform {
    pub fn new(tile: &TileDescriptor, config: &TerrainConfig) -> Self {
        Self {
            tile_offset: tile.offset,
            scale: tile.scale,
            edge_morph: tile.edge_flags.bits(),
            global_offset: Vec3::ZERO,
            tile_resolution: config.tile_resolution,
            morph_region: config.morph_region,
            bounds_min: config.bounds.min,
            bounds_max: config.bounds.max,
            level: tile.level,
        }
    }
}

/// The material of a single terrain tile.
///
/// All tiles of a terrain share the same textures and differ only in their uniform.
#[derive(Asset, AsBindGroup, TypePath, Clone, Debug)]
#[bind_group_data(TerrainDebugFlags)]
pub struct TileMaterial {
    #[uniform(0)]
    pub tile: TileUniform,
    #[texture(1)]
    #[sampler(2)]
    pub height: Handle<Image>,
    #[texture(3)]
    #[sampler(4)]
    pub overlay: Handle<Image>,
    pub debug: TerrainDebugFlags,
}

impl TileMaterial {
    pub fn new(
        tile: &TileDescriptor,
        config: &TerrainConfig,
        height: Handle<Image>,
        overlay: Handle<Image>,
    ) -> Self {
        Self {
            tile: TileUniform::new(tile, config),
            height,
            overlay,
            debug: TerrainDebugFlags::NONE,
        }
    }
}

impl From<&TileMaterial> for TerrainDebugFlags {
    fn from(material: &TileMaterial) -> Self {
        material.debug
    }
}

impl Material for TileMaterial {
    fn vertex_shader() -> ShaderRef {
        TERRAIN_SHADER.into()
    }

    fn fragment_shader() -> ShaderRef {
        TERRAIN_SHADER.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout
            .0
            .get_layout(&[Mesh::ATTRIBUTE_POSITION.at_shader_location(0)])?;
        descriptor.vertex.buffers = vec![vertex_layout];

        let shader_defs = key.bind_group_data.shader_defs();
        descriptor.vertex.shader_defs.extend(shader_defs.clone());
        if let Some(fragment) = descriptor.fragment.as_mut() {
            fragment.shader_defs.extend(shader_defs);
        }

        Ok(())
    }
}
