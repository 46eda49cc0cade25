use bevy::{asset::AssetLoadError, render::render_resource::TextureFormat};
use std::{path::PathBuf, sync::Arc};
use thiserror::Error;

/// A terrain configuration that would produce degenerate tiles.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("the world width has to be positive and finite, got {world_width}")]
    WorldWidth { world_width: f32 },
    #[error("at least one level of detail is required")]
    NoLevels,
    #[error("{levels} levels shrink the tiles of a world with width {world_width} to nothing")]
    ScaleUnderflow { world_width: f32, levels: u32 },
    #[error("the tile mesh resolution has to lie in 1..={max}, got {resolution}")]
    Resolution { resolution: u32, max: u32 },
    #[error("the tile resolution has to be positive and finite, got {tile_resolution}")]
    TileResolution { tile_resolution: f32 },
    #[error("the morph region has to lie in (0, 1], got {morph_region}")]
    MorphRegion { morph_region: f32 },
    #[error("the world bounds [{min}, {max}] are empty")]
    Bounds { min: f32, max: f32 },
}

#[derive(Error, Debug, Clone)]
pub enum TerrainError {
    #[error("invalid terrain configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read the image {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: Arc<image::ImageError>,
    },
    #[error("failed to load the terrain asset {asset}")]
    Asset {
        asset: String,
        #[source]
        source: Arc<AssetLoadError>,
    },
    #[error("the terrain asset {asset} is loaded but missing from its collection")]
    MissingAsset { asset: String },
    #[error("images with the format {format:?} can not be sampled on the CPU")]
    UnsupportedFormat { format: TextureFormat },
    #[error("{len} texels do not fill a {width}x{height} image")]
    TexelCount { len: usize, width: u32, height: u32 },
}

pub type TerrainResult<T> = Result<T, TerrainError>;
