//! Contains a debug resource and systems controlling it to visualize the morph factors
//! and LOD rings of the terrain.

use bevy::prelude::*;

/// Adds the terrain debug config and the keyboard controls toggling it.
pub struct TerrainDebugPlugin;

impl Plugin for TerrainDebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugTerrain>()
            .add_systems(Update, toggle_debug);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Resource)]
pub struct DebugTerrain {
    /// Tints vertices by how far they morph towards the coarser grid.
    pub show_morph: bool,
    /// Tints every ring of tiles with its own color.
    pub show_lod: bool,
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

pub fn toggle_debug(input: Res<ButtonInput<KeyCode>>, mut debug_terrain: ResMut<DebugTerrain>) {
    if input.just_pressed(KeyCode::KeyM) {
        debug_terrain.show_morph = !debug_terrain.show_morph;
        let state = on_off(debug_terrain.show_morph);
        info!("Toggled the morph view {state}.");
    }
    if input.just_pressed(KeyCode::KeyL) {
        debug_terrain.show_lod = !debug_terrain.show_lod;
        let state = on_off(debug_terrain.show_lod);
        info!("Toggled the lod view {state}.");
    }
}
