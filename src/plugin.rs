use crate::{
    config::TerrainConfig,
    debug::DebugTerrain,
    render::terrain_material::TileMaterial,
    shaders::load_terrain_shaders,
    spawn::spawn_terrain_tiles,
    terrain::{follow_viewers, sync_tile_uniforms, update_height_under_viewer, TerrainLoadFailed},
};
use bevy::{prelude::*, transform::TransformSystem};
use bevy_common_assets::ron::RonAssetPlugin;

/// The plugin for the clipmap terrain renderer.
///
/// Loads `*.terrain.ron` configs, spawns the tiles of every [`Terrain`](crate::terrain::Terrain)
/// and keeps the clipmap centered under the [`TerrainViewer`](crate::terrain::TerrainViewer).
pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            RonAssetPlugin::<TerrainConfig>::new(&["terrain.ron"]),
            MaterialPlugin::<TileMaterial>::default(),
        ))
        .init_resource::<DebugTerrain>()
        .add_event::<TerrainLoadFailed>()
        .add_systems(Update, spawn_terrain_tiles)
        .add_systems(
            PostUpdate,
            (follow_viewers, update_height_under_viewer, sync_tile_uniforms)
                .chain()
                .after(TransformSystem::TransformPropagate),
        );
    }

    fn finish(&self, app: &mut App) {
        load_terrain_shaders(app);
    }
}
