use bevy::{asset::embedded_asset, prelude::*};

pub const TERRAIN_SHADER: &str = "embedded://bevy_clipmap_terrain/shaders/terrain.wgsl";

/// Keeps the embedded shaders loaded for the lifetime of the app.
#[derive(Default, Resource)]
pub(crate) struct InternalShaders(Vec<Handle<Shader>>);

impl InternalShaders {
    pub(crate) fn load(app: &mut App, shaders: &[&'static str]) {
        let mut shaders = shaders
            .iter()
            .map(|&shader| app.world_mut().resource_mut::<AssetServer>().load(shader))
            .collect::<Vec<_>>();

        let mut internal_shaders = app.world_mut().resource_mut::<InternalShaders>();
        internal_shaders.0.append(&mut shaders);
    }
}

pub(crate) fn load_terrain_shaders(app: &mut App) {
    embedded_asset!(app, "terrain.wgsl");

    app.init_resource::<InternalShaders>();
    InternalShaders::load(app, &[TERRAIN_SHADER]);
}
