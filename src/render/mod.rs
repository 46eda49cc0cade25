//! The material drawing the terrain tiles.
//!
//! Every tile is a copy of the same unit grid mesh. The vertex shader places it in the
//! clipmap, snaps it to the grid of its level and morphs the outer band of each ring
//! towards the next coarser grid, so neighbouring rings meet without cracks.

pub mod terrain_material;
