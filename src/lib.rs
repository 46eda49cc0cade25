//! This crate renders large height-field terrains with a geometry clipmap.
//!
//! # Layout
//! The terrain is built from square tiles that share one grid mesh.
//! Four tiles of the finest scale surround the center and every further level adds a
//! ring of twelve tiles, twice as large as the ring inside of it.
//! This way the vertex density falls off with the distance to the viewer, while the
//! number of tiles only grows linearly with the covered area's doubling steps.
//! See the [`layout`] module for more information.
//!
//! # Shading
//! Each vertex is snapped to the grid of its level, so that the terrain does not
//! swim while the viewer moves.
//! Along the outer edges of a ring the vertices blend towards the grid of the coarser
//! ring, which hides the seams between levels.
//! The height is decoded from the red and green channels of the height texture and
//! the color is taken from an overlay texture, both covering the same world bounds.
//! The [`math`] module mirrors these stages on the CPU.

pub mod config;
pub mod debug;
pub mod error;
pub mod layout;
pub mod math;
pub mod plugin;
pub mod render;
pub mod shaders;
pub mod spawn;
pub mod terrain;
pub mod tile;

pub mod prelude {
    pub use crate::{
        config::{TerrainConfig, WorldBounds},
        debug::{DebugTerrain, TerrainDebugPlugin},
        error::{ConfigError, TerrainError, TerrainResult},
        layout::{EdgeFlags, TileDescriptor, TileLayout},
        math::{FragmentStage, HeightField, HeightSampler, TexelImage, VertexStage},
        plugin::TerrainPlugin,
        render::terrain_material::{TerrainDebugFlags, TileMaterial},
        spawn::SpawnTerrainCommandsExt,
        terrain::{
            AddTile, GlobalOffset, Terrain, TerrainHeightField, TerrainLoadFailed, TerrainTile,
            TerrainTiles, TerrainViewer,
        },
        tile::TileGeometry,
    };
}
