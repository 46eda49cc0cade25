use crate::layout::EdgeFlags;
use bevy::prelude::*;

/// The default width of the morph band along a flagged edge, relative to the tile size.
pub const MORPH_REGION: f32 = 0.3;

/// The default number of grid cells per tile side.
pub const TILE_RESOLUTION: f32 = 250.0;

/// Computes how far a vertex at the local tile position `p` morphs towards the
/// coarser grid.
///
/// Inside the band of width `morph_region` along a flagged edge the factor ramps
/// linearly from zero at the inner border of the band to one at the edge.
/// Overlapping bands of a corner tile take the maximum.
pub fn calculate_morph(p: Vec2, edges: EdgeFlags, morph_region: f32) -> f32 {
    let ramp = |distance: f32| 1.0 - (distance / morph_region).clamp(0.0, 1.0);

    let bands = [
        (EdgeFlags::TOP, 1.0 - p.y),
        (EdgeFlags::LEFT, p.x),
        (EdgeFlags::BOTTOM, p.y),
        (EdgeFlags::RIGHT, 1.0 - p.x),
    ];

    bands
        .into_iter()
        .filter(|&(edge, distance)| edges.contains(edge) && distance <= morph_region)
        .map(|(_, distance)| ramp(distance))
        .fold(0.0, f32::max)
}

/// Snaps the position to the lattice with the spacing `grid`.
#[inline]
pub fn snap_to_grid(position: Vec2, grid: f32) -> Vec2 {
    (position / grid).floor() * grid
}

/// Snaps a terrain position onto the grid of the tile and blends it towards the
/// grid of the next coarser level by the morph factor.
///
/// The position has to be snapped first, so that both lattices are derived from the
/// same vertex and shared edges of neighbouring tiles stay identical.
pub fn morph_position(position: Vec2, grid: f32, morph_factor: f32) -> Vec2 {
    let position = snap_to_grid(position, grid);

    if morph_factor > 0.0 {
        let coarse = snap_to_grid(position, 2.0 * grid);
        position.lerp(coarse, morph_factor)
    } else {
        position
    }
}
