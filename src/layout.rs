//! The concentric tile layout of the clipmap.
//!
//! The terrain is covered by four center tiles of the finest scale, which are
//! surrounded by `levels` rings of twelve tiles each.
//! Every ring doubles the tile scale of the previous one.
//!
//! ```text
//!  +---+---+---+---+
//!  |TL | T | T |TR |
//!  +---+---+---+---+
//!  | L |       | R |
//!  +---+  2s   +---+
//!  | L |       | R |
//!  +---+---+---+---+
//!  |BL | B | B |BR |
//!  +---+---+---+---+
//! ```
//!
//! The edges of a ring tile that face the next, coarser ring are flagged, so that the
//! vertex stage can morph them onto the coarser grid and avoid cracks.

use crate::config::TerrainConfig;
use bevy::prelude::*;

bitflags::bitflags! {
    /// The borders of a tile that touch a tile of the next coarser level.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct EdgeFlags: u32 {
        const NONE   = 0;
        const TOP    = 1 << 0;
        const LEFT   = 1 << 1;
        const BOTTOM = 1 << 2;
        const RIGHT  = 1 << 3;
    }
}

/// The placement of a single tile in terrain space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileDescriptor {
    /// The corner of the tile with the smallest coordinates.
    pub offset: Vec2,
    /// The edge length of the tile.
    pub scale: f32,
    pub edge_flags: EdgeFlags,
    /// The doubling step of the scale, zero for the center tiles and the first ring.
    pub level: u32,
}

impl TileDescriptor {
    pub fn new(x: f32, y: f32, scale: f32, edge_flags: EdgeFlags, level: u32) -> Self {
        Self {
            offset: Vec2::new(x, y),
            scale,
            edge_flags,
            level,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.offset, self.offset + self.scale)
    }
}

/// Plans the tiles of a terrain.
pub struct TileLayout;

impl TileLayout {
    pub const CENTER_TILES: usize = 4;
    pub const RING_TILES: usize = 12;

    #[inline]
    pub fn initial_scale(world_width: f32, levels: u32) -> f32 {
        world_width / 2.0_f32.powi(levels as i32)
    }

    #[inline]
    pub fn tile_count(levels: u32) -> usize {
        Self::CENTER_TILES + Self::RING_TILES * levels as usize
    }

    pub fn from_config(config: &TerrainConfig) -> Vec<TileDescriptor> {
        Self::plan(config.world_width, config.levels)
    }

    /// Enumerates the center tiles followed by the twelve tiles of every ring.
    pub fn plan(world_width: f32, levels: u32) -> Vec<TileDescriptor> {
        let initial_scale = Self::initial_scale(world_width, levels);
        let s = initial_scale;

        let mut tiles = Vec::with_capacity(Self::tile_count(levels));

        tiles.extend([
            TileDescriptor::new(-s, -s, s, EdgeFlags::NONE, 0),
            TileDescriptor::new(-s, 0.0, s, EdgeFlags::NONE, 0),
            TileDescriptor::new(0.0, 0.0, s, EdgeFlags::NONE, 0),
            TileDescriptor::new(0.0, -s, s, EdgeFlags::NONE, 0),
        ]);

        // Iterating over the level count keeps the tile count exact,
        // even if doubling the scale would overflow.
        for level in 0..levels {
            let s = initial_scale * 2.0_f32.powi(level as i32);
            tiles.extend(Self::ring(s, level));
        }

        tiles
    }

    fn ring(s: f32, level: u32) -> [TileDescriptor; Self::RING_TILES] {
        use EdgeFlags as E;

        [
            TileDescriptor::new(-2.0 * s, -2.0 * s, s, E::BOTTOM | E::LEFT, level),
            TileDescriptor::new(-2.0 * s, -s, s, E::LEFT, level),
            TileDescriptor::new(-2.0 * s, 0.0, s, E::LEFT, level),
            TileDescriptor::new(-2.0 * s, s, s, E::TOP | E::LEFT, level),
            TileDescriptor::new(-s, -2.0 * s, s, E::BOTTOM, level),
            TileDescriptor::new(-s, s, s, E::TOP, level),
            TileDescriptor::new(0.0, -2.0 * s, s, E::BOTTOM, level),
            TileDescriptor::new(0.0, s, s, E::TOP, level),
            TileDescriptor::new(s, -2.0 * s, s, E::BOTTOM | E::RIGHT, level),
            TileDescriptor::new(s, -s, s, E::RIGHT, level),
            TileDescriptor::new(s, 0.0, s, E::RIGHT, level),
            TileDescriptor::new(s, s, s, E::TOP | E::RIGHT, level),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_count_matches_levels() {
        for levels in 0..10 {
            let tiles = TileLayout::plan(1024.0, levels);

            assert_eq!(tiles.len(), 4 + 12 * levels as usize);
            assert_eq!(tiles.len(), TileLayout::tile_count(levels));
        }
    }

    #[test]
    fn tile_count_survives_scale_overflow() {
        assert_eq!(TileLayout::plan(1024.0, 300).len(), 4 + 12 * 300);
    }

    #[test]
    fn scales_are_power_of_two_multiples() {
        let levels = 6;
        let tiles = TileLayout::plan(1024.0, levels);
        let initial_scale = TileLayout::initial_scale(1024.0, levels);

        for tile in &tiles {
            let factor = tile.scale / initial_scale;
            assert_eq!(factor, 2.0_f32.powi(tile.level as i32));
        }

        for (level, ring) in tiles[4..].chunks(12).enumerate() {
            let scale = initial_scale * 2.0_f32.powi(level as i32);
            assert!(ring.iter().all(|tile| tile.scale == scale));
            assert!(ring.iter().all(|tile| tile.level == level as u32));
        }

        assert_eq!(tiles.last().unwrap().scale, 512.0);
    }

    #[test]
    fn ring_edge_flags() {
        let tiles = TileLayout::plan(1024.0, 6);

        assert!(tiles[..4]
            .iter()
            .all(|tile| tile.edge_flags == EdgeFlags::NONE));

        for ring in tiles[4..].chunks(12) {
            let corners = ring
                .iter()
                .filter(|tile| tile.edge_flags.bits().count_ones() == 2)
                .count();
            let sides = ring
                .iter()
                .filter(|tile| tile.edge_flags.bits().count_ones() == 1)
                .count();

            assert_eq!(corners, 4);
            assert_eq!(sides, 8);
        }
    }

    #[test]
    fn flags_face_outwards() {
        for tile in &TileLayout::plan(1024.0, 4)[4..] {
            let center = tile.rect().center();
            let outer = 2.0 * tile.scale;
            let flags = tile.edge_flags;

            assert_eq!(flags.contains(EdgeFlags::TOP), tile.rect().max.y == outer);
            assert_eq!(flags.contains(EdgeFlags::BOTTOM), tile.rect().min.y == -outer);
            assert_eq!(flags.contains(EdgeFlags::RIGHT), tile.rect().max.x == outer);
            assert_eq!(flags.contains(EdgeFlags::LEFT), tile.rect().min.x == -outer);
            assert!(center.abs().max_element() > tile.scale);
        }
    }

    #[test]
    fn tiles_cover_the_world_without_overlap() {
        let world_width = 1024.0;
        let tiles = TileLayout::plan(world_width, 5);

        for (i, a) in tiles.iter().enumerate() {
            for b in &tiles[i + 1..] {
                assert!(a.rect().intersect(b.rect()).is_empty());
            }
        }

        let area: f32 = tiles.iter().map(|tile| tile.scale * tile.scale).sum();
        assert_eq!(area, (2.0 * world_width) * (2.0 * world_width));
    }

    #[test]
    fn single_level_layout() {
        let tiles = TileLayout::plan(1024.0, 1);

        assert_eq!(TileLayout::initial_scale(1024.0, 1), 512.0);
        assert_eq!(tiles.len(), 16);

        for tile in &tiles[..4] {
            assert_eq!(tile.scale, 512.0);
            assert_eq!(tile.edge_flags, EdgeFlags::NONE);
        }

        let expected = [
            ((-1024.0, -1024.0), EdgeFlags::BOTTOM | EdgeFlags::LEFT),
            ((-1024.0, -512.0), EdgeFlags::LEFT),
            ((-1024.0, 0.0), EdgeFlags::LEFT),
            ((-1024.0, 512.0), EdgeFlags::TOP | EdgeFlags::LEFT),
            ((-512.0, -1024.0), EdgeFlags::BOTTOM),
            ((-512.0, 512.0), EdgeFlags::TOP),
            ((0.0, -1024.0), EdgeFlags::BOTTOM),
            ((0.0, 512.0), EdgeFlags::TOP),
            ((512.0, -1024.0), EdgeFlags::BOTTOM | EdgeFlags::RIGHT),
            ((512.0, -512.0), EdgeFlags::RIGHT),
            ((512.0, 0.0), EdgeFlags::RIGHT),
            ((512.0, 512.0), EdgeFlags::TOP | EdgeFlags::RIGHT),
        ];

        for (tile, ((x, y), flags)) in tiles[4..].iter().zip(expected) {
            assert_eq!(tile.offset, Vec2::new(x, y));
            assert_eq!(tile.scale, 512.0);
            assert_eq!(tile.edge_flags, flags);
        }
    }
}
