use crate::{
    config::TerrainConfig,
    error::{TerrainError, TerrainResult},
    math::HeightField,
    render::terrain_material::TileMaterial,
    terrain::{Terrain, TerrainFailed, TerrainHeightField, TerrainLoadFailed, TerrainTiles},
};
use bevy::{
    asset::{AssetPath, LoadState, UntypedAssetId},
    prelude::*,
};

pub trait SpawnTerrainCommandsExt {
    /// Spawns a terrain, whose tiles are created once its config and textures are loaded.
    fn spawn_terrain<'a>(
        &mut self,
        config: impl Into<AssetPath<'a>>,
        height: impl Into<AssetPath<'a>>,
        overlay: impl Into<AssetPath<'a>>,
    ) -> Entity;
}

impl SpawnTerrainCommandsExt for Commands<'_, '_> {
    fn spawn_terrain<'a>(
        &mut self,
        config: impl Into<AssetPath<'a>>,
        height: impl Into<AssetPath<'a>>,
        overlay: impl Into<AssetPath<'a>>,
    ) -> Entity {
        let config = config.into().into_owned();
        let height = height.into().into_owned();
        let overlay = overlay.into().into_owned();

        let entity = self.spawn_empty().id();

        self.queue(move |world: &mut World| {
            let terrain = Terrain::load(world.resource::<AssetServer>(), config, height, overlay);
            world.entity_mut(entity).insert(terrain);
        });

        entity
    }
}

/// Builds the tiles of every terrain whose assets finished loading.
pub(crate) fn spawn_terrain_tiles(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<TerrainConfig>>,
    images: Res<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<TileMaterial>>,
    mut failures: EventWriter<TerrainLoadFailed>,
    terrains: Query<(Entity, &Terrain), (Without<TerrainTiles>, Without<TerrainFailed>)>,
) {
    for (entity, terrain) in &terrains {
        let result = match loaded_assets(&asset_server, terrain) {
            Ok(false) => continue,
            Ok(true) => configs
                .get(&terrain.config)
                .ok_or_else(|| TerrainError::MissingAsset {
                    asset: asset_name(&asset_server, terrain.config.id().untyped()),
                })
                .and_then(|config| {
                    TerrainTiles::new(
                        config,
                        terrain.height.clone(),
                        terrain.overlay.clone(),
                        &mut meshes,
                        &mut materials,
                    )
                    .map(|tiles| (config, tiles))
                }),
            Err(error) => Err(error),
        };

        let (config, tiles) = match result {
            Ok(value) => value,
            Err(error) => {
                error!("Failed to construct the terrain {entity}: {error}");
                commands.entity(entity).insert(TerrainFailed);
                failures.send(TerrainLoadFailed {
                    terrain: entity,
                    error,
                });
                continue;
            }
        };

        let mut entity_commands = commands.entity(entity);

        match images
            .get(&terrain.height)
            .map(|image| HeightField::from_bevy_image(image, config.bounds))
        {
            Some(Ok(height_field)) => {
                entity_commands.insert(TerrainHeightField(height_field));
            }
            Some(Err(error)) => {
                warn!("The height of the terrain {entity} can not be queried: {error}");
            }
            None => {}
        }

        info!(
            "Spawning {} tiles for the terrain {entity} ({} levels).",
            tiles.len(),
            config.levels
        );

        entity_commands.with_children(|parent| tiles.spawn(parent));
        entity_commands.insert(tiles);
    }
}

fn asset_name(asset_server: &AssetServer, id: UntypedAssetId) -> String {
    asset_server
        .get_path(id)
        .map(|path| path.to_string())
        .unwrap_or_else(|| format!("{id:?}"))
}

/// Whether all assets of the terrain are loaded, or the first load failure.
fn loaded_assets(asset_server: &AssetServer, terrain: &Terrain) -> TerrainResult<bool> {
    let ids = [
        terrain.config.id().untyped(),
        terrain.height.id().untyped(),
        terrain.overlay.id().untyped(),
    ];

    let mut loaded = true;

    for id in ids {
        match asset_server.get_load_state(id) {
            Some(LoadState::Failed(source)) => {
                return Err(TerrainError::Asset {
                    asset: asset_name(asset_server, id),
                    source,
                })
            }
            Some(LoadState::Loaded) => {}
            // Assets added directly to `Assets` have no load state.
            None => {}
            Some(_) => loaded = false,
        }
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TileLayout;
    use bevy::asset::AssetPlugin;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<TerrainConfig>()
            .init_asset::<Image>()
            .init_asset::<Mesh>()
            .init_asset::<TileMaterial>()
            .add_event::<TerrainLoadFailed>()
            .add_systems(Update, spawn_terrain_tiles);
        app
    }

    fn add_terrain(app: &mut App, config: TerrainConfig) -> Entity {
        let world = app.world_mut();
        let config = world.resource_mut::<Assets<TerrainConfig>>().add(config);
        let mut images = world.resource_mut::<Assets<Image>>();
        let height = images.add(Image::default());
        let overlay = images.add(Image::default());

        world.spawn(Terrain::new(config, height, overlay)).id()
    }

    #[test]
    fn spawns_tiles_once_assets_are_available() {
        let mut app = app();
        let terrain = add_terrain(
            &mut app,
            TerrainConfig {
                levels: 2,
                resolution: 4,
                ..default()
            },
        );

        app.update();
        app.update();

        let world = app.world();
        let tiles = world.get::<TerrainTiles>(terrain).unwrap();
        assert_eq!(tiles.len(), TileLayout::tile_count(2));
        assert_eq!(
            world.get::<Children>(terrain).unwrap().len(),
            TileLayout::tile_count(2)
        );
        assert!(world.get::<TerrainHeightField>(terrain).is_some());
        assert!(world.get::<TerrainFailed>(terrain).is_none());
    }

    #[test]
    fn reports_invalid_configs_once() {
        let mut app = app();
        let terrain = add_terrain(
            &mut app,
            TerrainConfig {
                levels: 0,
                ..default()
            },
        );

        app.update();

        let world = app.world();
        assert!(world.get::<TerrainFailed>(terrain).is_some());
        assert!(world.get::<TerrainTiles>(terrain).is_none());

        let failures = world
            .resource::<Events<TerrainLoadFailed>>()
            .iter_current_update_events()
            .collect::<Vec<_>>();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].terrain, terrain);
        assert!(matches!(failures[0].error, TerrainError::Config(_)));

        app.update();

        assert!(app.world().get::<TerrainTiles>(terrain).is_none());
    }
}
