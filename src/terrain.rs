//! The terrain entity and the tiles it owns.
//!
//! A [`Terrain`] entity references its config and textures.
//! Once they are loaded, [`TerrainTiles`] is built from the planned layout and every
//! tile is spawned as a child entity, sharing one mesh and carrying its own
//! [`TileMaterial`].

use crate::{
    config::TerrainConfig,
    debug::DebugTerrain,
    error::{TerrainError, TerrainResult},
    layout::{TileDescriptor, TileLayout},
    math::{HeightField, HeightSampler},
    render::terrain_material::{TerrainDebugFlags, TileMaterial},
    tile::TileGeometry,
};
use bevy::{
    asset::AssetPath,
    image::{ImageLoaderSettings, ImageSampler},
    pbr::NotShadowCaster,
    prelude::*,
    render::view::NoFrustumCulling,
};
use derive_more::derive::From;
use std::f32::consts::FRAC_PI_2;

/// Rotates the Z-up terrain space into the Y-up world.
pub fn z_up_transform() -> Transform {
    Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2))
}

/// A clipmap terrain.
///
/// The tiles are spawned as children of this entity once all assets are loaded.
#[derive(Component, Clone, Debug)]
#[require(Transform(z_up_transform), Visibility, GlobalOffset)]
pub struct Terrain {
    pub config: Handle<TerrainConfig>,
    /// An RGB image storing the height as `(r * 255 + g) * 255`.
    /// Has to be loaded without sRGB conversion.
    pub height: Handle<Image>,
    pub overlay: Handle<Image>,
}

impl Terrain {
    pub fn new(
        config: Handle<TerrainConfig>,
        height: Handle<Image>,
        overlay: Handle<Image>,
    ) -> Self {
        Self {
            config,
            height,
            overlay,
        }
    }

    /// Loads the config and both textures, the height image with linear encoding.
    pub fn load<'a>(
        asset_server: &AssetServer,
        config: impl Into<AssetPath<'a>>,
        height: impl Into<AssetPath<'a>>,
        overlay: impl Into<AssetPath<'a>>,
    ) -> Self {
        Self {
            config: asset_server.load(config),
            height: load_height_image(asset_server, height),
            overlay: asset_server.load(overlay),
        }
    }
}

pub fn load_height_image<'a>(
    asset_server: &AssetServer,
    path: impl Into<AssetPath<'a>>,
) -> Handle<Image> {
    asset_server.load_with_settings(path, |settings: &mut ImageLoaderSettings| {
        settings.is_srgb = false;
        settings.sampler = ImageSampler::linear();
    })
}

/// The translation applied to every tile of the terrain, in terrain space.
///
/// Moving it slides the clipmap over the height field, e.g. to keep it centered
/// under the viewer. The `z` component is unused.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Deref, DerefMut, From)]
pub struct GlobalOffset(pub Vec3);

/// A camera the terrains are centered under.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct TerrainViewer {
    /// The terrain height below the viewer, in terrain space.
    pub height_under_viewer: f32,
}

/// Marks a tile entity with its placement.
#[derive(Component, Clone, Copy, Debug, Deref, From)]
pub struct TerrainTile(pub TileDescriptor);

/// The CPU copy of the height field of a terrain.
#[derive(Component, Clone, Debug, Deref)]
pub struct TerrainHeightField(pub HeightField);

impl TerrainHeightField {
    /// The terrain height at a terrain space position, clamped to the border
    /// outside of the world bounds.
    pub fn height_at(&self, position: Vec2) -> f32 {
        self.0.sample(position)
    }
}

/// Marks a terrain that failed to load and will not be retried.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct TerrainFailed;

/// Sent when a terrain could not be constructed.
#[derive(Event, Clone, Debug)]
pub struct TerrainLoadFailed {
    pub terrain: Entity,
    pub error: TerrainError,
}

/// The capability of adding a drawable tile to a scene.
pub trait AddTile {
    fn add_tile(
        &mut self,
        mesh: Handle<Mesh>,
        material: Handle<TileMaterial>,
        descriptor: TileDescriptor,
    );
}

impl AddTile for ChildBuilder<'_> {
    fn add_tile(
        &mut self,
        mesh: Handle<Mesh>,
        material: Handle<TileMaterial>,
        descriptor: TileDescriptor,
    ) {
        // The vertex stage moves the vertices away from the unit square,
        // so the mesh bounds are meaningless for culling.
        self.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            TerrainTile(descriptor),
            NoFrustumCulling,
            NotShadowCaster,
        ));
    }
}

/// A tile of the terrain and its material.
#[derive(Clone, Debug)]
pub struct TileInstance {
    pub descriptor: TileDescriptor,
    pub material: Handle<TileMaterial>,
}

/// The shared mesh and the materials of all tiles of a terrain.
#[derive(Component, Clone, Debug)]
pub struct TerrainTiles {
    pub mesh: Handle<Mesh>,
    pub tiles: Vec<TileInstance>,
}

impl TerrainTiles {
    pub fn new(
        config: &TerrainConfig,
        height: Handle<Image>,
        overlay: Handle<Image>,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<TileMaterial>,
    ) -> TerrainResult<Self> {
        config.validate()?;

        let mesh = meshes.add(TileGeometry::new(config.resolution).to_mesh());

        let tiles = TileLayout::from_config(config)
            .into_iter()
            .map(|descriptor| TileInstance {
                descriptor,
                material: materials.add(TileMaterial::new(
                    &descriptor,
                    config,
                    height.clone(),
                    overlay.clone(),
                )),
            })
            .collect();

        Ok(Self { mesh, tiles })
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn spawn(&self, scene: &mut impl AddTile) {
        for tile in &self.tiles {
            scene.add_tile(self.mesh.clone(), tile.material.clone(), tile.descriptor);
        }
    }
}

/// Centers the terrains under the viewer by moving their global offset.
pub(crate) fn follow_viewers(
    viewers: Query<&GlobalTransform, With<TerrainViewer>>,
    mut terrains: Query<(&GlobalTransform, &mut GlobalOffset), With<Terrain>>,
) {
    let Some(viewer) = viewers.iter().next() else {
        return;
    };

    for (terrain_transform, mut offset) in &mut terrains {
        let local = terrain_transform
            .affine()
            .inverse()
            .transform_point3(viewer.translation());

        offset.set_if_neq(GlobalOffset(local.truncate().extend(0.0)));
    }
}

/// Samples the terrain height below the viewer.
pub(crate) fn update_height_under_viewer(
    mut viewers: Query<(&GlobalTransform, &mut TerrainViewer)>,
    terrains: Query<(&GlobalTransform, &TerrainHeightField), With<Terrain>>,
) {
    let Some((terrain_transform, height_field)) = terrains.iter().next() else {
        return;
    };

    for (viewer_transform, mut viewer) in &mut viewers {
        let local = terrain_transform
            .affine()
            .inverse()
            .transform_point3(viewer_transform.translation());

        viewer.height_under_viewer = height_field.height_at(local.truncate());
    }
}

/// Passes the global offset and the debug views to the tile materials,
/// after the offset was written for the frame.
pub(crate) fn sync_tile_uniforms(
    debug: Option<Res<DebugTerrain>>,
    mut materials: ResMut<Assets<TileMaterial>>,
    terrains: Query<(Ref<TerrainTiles>, Ref<GlobalOffset>)>,
) {
    let debug_changed = debug.as_ref().is_some_and(|debug| debug.is_changed());
    let flags = debug
        .as_deref()
        .map(TerrainDebugFlags::from_debug)
        .unwrap_or_default();

    for (tiles, offset) in &terrains {
        if !(debug_changed || tiles.is_added() || offset.is_changed()) {
            continue;
        }

        for tile in &tiles.tiles {
            if let Some(material) = materials.get_mut(&tile.material) {
                material.tile.global_offset = offset.0;
                material.debug = flags;
            }
        }
    }
}
