//! CPU implementations of the terrain shader stages.
//!
//! These mirror `shaders/terrain.wgsl` operation by operation and are used for
//! height queries on the CPU as well as for testing the morphing scheme.

mod fragment;
mod height;
mod morph;
mod texture;
mod vertex;

pub use fragment::{boundary_mask, step, FragmentStage};
pub use height::{decode_height, HeightField, HeightSampler};
pub use morph::{calculate_morph, morph_position, snap_to_grid, MORPH_REGION, TILE_RESOLUTION};
pub use texture::TexelImage;
pub use vertex::{VertexOutput, VertexStage};
