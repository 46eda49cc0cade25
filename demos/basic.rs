use bevy::prelude::*;
use bevy_clipmap_terrain::prelude::*;

const CONFIG: &str = "terrains/basic.terrain.ron";
const HEIGHT: &str = "terrains/height.png";
const OVERLAY: &str = "terrains/overlay.png";

const SPEED: f32 = 60.0;

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, TerrainPlugin, TerrainDebugPlugin))
        .add_systems(Startup, setup)
        .add_systems(Update, (fly_camera, report_failures))
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn_terrain(CONFIG, HEIGHT, OVERLAY);

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 80.0, 0.0).looking_at(Vec3::new(0.0, 0.0, -200.0), Vec3::Y),
        TerrainViewer::default(),
    ));
}

fn fly_camera(
    time: Res<Time>,
    input: Res<ButtonInput<KeyCode>>,
    mut cameras: Query<(&mut Transform, &TerrainViewer)>,
) {
    let Ok((mut transform, viewer)) = cameras.get_single_mut() else {
        return;
    };

    let mut direction = Vec3::ZERO;
    if input.pressed(KeyCode::KeyW) {
        direction += *transform.forward();
    }
    if input.pressed(KeyCode::KeyS) {
        direction -= *transform.forward();
    }
    if input.pressed(KeyCode::KeyA) {
        direction -= *transform.right();
    }
    if input.pressed(KeyCode::KeyD) {
        direction += *transform.right();
    }
    direction.y = 0.0;

    transform.translation += direction.normalize_or_zero() * SPEED * time.delta_secs();

    if input.pressed(KeyCode::KeyQ) {
        transform.rotate_y(time.delta_secs());
    }
    if input.pressed(KeyCode::KeyE) {
        transform.rotate_y(-time.delta_secs());
    }

    // keep the camera above the ground
    let ground = viewer.height_under_viewer + 20.0;
    if transform.translation.y < ground {
        transform.translation.y = ground;
    }
}

fn report_failures(mut failures: EventReader<TerrainLoadFailed>, mut exit: EventWriter<AppExit>) {
    for failure in failures.read() {
        error!("{}", failure.error);
        exit.send(AppExit::error());
    }
}
