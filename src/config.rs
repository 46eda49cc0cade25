use crate::error::ConfigError;
use anyhow::{Context, Result};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// The square region of terrain space covered by the height and overlay images.
///
/// Terrain positions are mapped into texture coordinates relative to these bounds
/// and fragments outside of them are masked out.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    pub min: f32,
    pub max: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min: -2000.0,
            max: 2000.0,
        }
    }
}

impl WorldBounds {
    #[inline]
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Maps a terrain position to the `[0,1]²` texture coordinate used for the height
    /// and overlay lookups.
    #[inline]
    pub fn normalize(&self, position: Vec2) -> Vec2 {
        (position - self.min) / self.size()
    }

    /// Whether the position lies inside the bounds, both ends inclusive.
    #[inline]
    pub fn contains(&self, position: Vec2) -> bool {
        position.cmpge(Vec2::splat(self.min)).all() && position.cmple(Vec2::splat(self.max)).all()
    }
}

/// Describes the layout and appearance of a clipmap terrain.
///
/// Can be loaded as an asset from `*.terrain.ron` files.
/// Missing fields fall back to their defaults.
#[derive(Asset, TypePath, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// The edge length of the finest ring of four tiles times `2^levels`.
    pub world_width: f32,
    /// The number of rings around the center tiles, each one twice as coarse as the last.
    pub levels: u32,
    /// The number of cells per side of the shared tile mesh.
    pub resolution: u32,
    /// The number of grid cells per tile side, that vertices are snapped to.
    pub tile_resolution: f32,
    /// The width of the band along a morphing edge, relative to the tile size.
    pub morph_region: f32,
    pub bounds: WorldBounds,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            world_width: 1024.0,
            levels: 6,
            resolution: 128,
            tile_resolution: 250.0,
            morph_region: 0.3,
            bounds: default(),
        }
    }
}

impl TerrainConfig {
    pub const MAX_RESOLUTION: u32 = 4096;

    #[inline]
    pub fn initial_scale(&self) -> f32 {
        self.world_width / 2.0_f32.powi(self.levels as i32)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world_width.is_finite() && self.world_width > 0.0) {
            return Err(ConfigError::WorldWidth {
                world_width: self.world_width,
            });
        }
        if self.levels == 0 {
            return Err(ConfigError::NoLevels);
        }
        if !self.initial_scale().is_normal() {
            return Err(ConfigError::ScaleUnderflow {
                world_width: self.world_width,
                levels: self.levels,
            });
        }
        if !(1..=Self::MAX_RESOLUTION).contains(&self.resolution) {
            return Err(ConfigError::Resolution {
                resolution: self.resolution,
                max: Self::MAX_RESOLUTION,
            });
        }
        if !(self.tile_resolution.is_finite() && self.tile_resolution > 0.0) {
            return Err(ConfigError::TileResolution {
                tile_resolution: self.tile_resolution,
            });
        }
        if !(self.morph_region > 0.0 && self.morph_region <= 1.0) {
            return Err(ConfigError::MorphRegion {
                morph_region: self.morph_region,
            });
        }
        if !(self.bounds.size().is_finite() && self.bounds.size() > 0.0) {
            return Err(ConfigError::Bounds {
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }

        Ok(())
    }

    /// Parses and validates a config in the RON format.
    pub fn from_ron(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source).context("malformed terrain config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read the terrain config {}", path.display()))?;
        Self::from_ron(&source)
    }

    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TerrainConfig::default();

        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.initial_scale(), 16.0);
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let invalid = [
            (
                TerrainConfig {
                    world_width: 0.0,
                    ..default()
                },
                ConfigError::WorldWidth { world_width: 0.0 },
            ),
            (
                TerrainConfig {
                    world_width: -1024.0,
                    ..default()
                },
                ConfigError::WorldWidth {
                    world_width: -1024.0,
                },
            ),
            (
                TerrainConfig {
                    levels: 0,
                    ..default()
                },
                ConfigError::NoLevels,
            ),
            (
                TerrainConfig {
                    levels: 200,
                    ..default()
                },
                ConfigError::ScaleUnderflow {
                    world_width: 1024.0,
                    levels: 200,
                },
            ),
            (
                TerrainConfig {
                    resolution: 0,
                    ..default()
                },
                ConfigError::Resolution {
                    resolution: 0,
                    max: TerrainConfig::MAX_RESOLUTION,
                },
            ),
            (
                TerrainConfig {
                    tile_resolution: 0.0,
                    ..default()
                },
                ConfigError::TileResolution {
                    tile_resolution: 0.0,
                },
            ),
            (
                TerrainConfig {
                    morph_region: 1.5,
                    ..default()
                },
                ConfigError::MorphRegion { morph_region: 1.5 },
            ),
            (
                TerrainConfig {
                    bounds: WorldBounds {
                        min: 10.0,
                        max: 10.0,
                    },
                    ..default()
                },
                ConfigError::Bounds {
                    min: 10.0,
                    max: 10.0,
                },
            ),
        ];

        for (config, error) in invalid {
            assert_eq!(config.validate(), Err(error));
        }
    }

    #[test]
    fn nan_width_is_rejected() {
        let config = TerrainConfig {
            world_width: f32::NAN,
            ..default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::WorldWidth { .. })
        ));
    }

    #[test]
    fn parses_partial_ron() {
        let config = TerrainConfig::from_ron("(world_width: 4096.0, levels: 3)").unwrap();

        assert_eq!(config.world_width, 4096.0);
        assert_eq!(config.levels, 3);
        assert_eq!(config.resolution, 128);
        assert_eq!(config.bounds, WorldBounds::default());
    }

    #[test]
    fn ron_round_trip() {
        let config = TerrainConfig {
            levels: 4,
            morph_region: 0.25,
            ..default()
        };

        let source = config.to_ron().unwrap();

        assert_eq!(TerrainConfig::from_ron(&source).unwrap(), config);
    }

    #[test]
    fn loads_the_demo_config() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/terrains/basic.terrain.ron");
        let config = TerrainConfig::load_file(path).unwrap();

        assert_eq!(config.bounds.size(), 2048.0);
        assert!(TerrainConfig::load_file("missing.terrain.ron").is_err());
    }

    #[test]
    fn invalid_ron_config_is_an_error() {
        assert!(TerrainConfig::from_ron("(levels: 0)").is_err());
        assert!(TerrainConfig::from_ron("(levels: \"six\")").is_err());
    }

    #[test]
    fn bounds_are_inclusive() {
        let bounds = WorldBounds::default();

        assert!(bounds.contains(Vec2::new(2000.0, -2000.0)));
        assert!(!bounds.contains(Vec2::new(2000.1, 0.0)));
        assert_eq!(bounds.normalize(Vec2::new(-2000.0, 0.0)), Vec2::new(0.0, 0.5));
    }
}
