use bevy::math::primitives::Rectangle;
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved, PrimaryWindow, WindowResized};

use crate::config::{Preset, WaterEffectConfig};
use crate::rendering::{
    BackdropParams, WaterMaterial, WaterMaterialPlugin, WaterUniform, create_backdrop_image,
    create_field_image, upload_field,
};
use crate::simulation::{FieldMapping, PointerTracker, WaveSimulator};

const FALLBACK_WINDOW_SIZE: Vec2 = Vec2::new(1280.0, 720.0);

const PRESET_KEYS: [(KeyCode, Preset); 4] = [
    (KeyCode::Digit1, Preset::Minimal),
    (KeyCode::Digit2, Preset::Heavy),
    (KeyCode::Digit3, Preset::Calm),
    (KeyCode::Digit4, Preset::Breathing),
];

/// Drives the wave field from the pointer and composites it over a backdrop
///
/// Expects a [`WaterEffectConfig`] resource; the default preset is used when
/// none was inserted.
pub struct WaterEffectPlugin;

impl Plugin for WaterEffectPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(WaterMaterialPlugin)
            .init_resource::<WaterEffectConfig>()
            .init_resource::<WaveSimulator>()
            .init_resource::<PointerTracker>()
            .add_systems(Startup, setup_water_effect)
            .add_systems(
                Update,
                (
                    track_pointer,
                    handle_window_resize,
                    switch_presets,
                    advance_wave_field,
                    publish_field,
                )
                    .chain(),
            );
    }
}

/// Handles to the assets the compositor reads each frame.
#[derive(Resource, Debug, Clone)]
pub struct WaterDisplay {
    pub field_image: Handle<Image>,
    pub material: Handle<WaterMaterial>,
}

/// The full-window quad the water is drawn on.
#[derive(Component)]
pub struct WaterSurface;

fn setup_water_effect(
    mut commands: Commands,
    config: Res<WaterEffectConfig>,
    window: Query<&Window, With<PrimaryWindow>>,
    mut simulator: ResMut<WaveSimulator>,
    mut images: ResMut<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<WaterMaterial>>,
) {
    commands.spawn(Camera2d);

    let window_size = window.single().map(Window::size).unwrap_or(FALLBACK_WINDOW_SIZE);
    let grid_size = config.grid_size(window_size).max(UVec2::ONE);
    if let Err(err) = simulator.initialize(grid_size.x, grid_size.y, config.simulation.clone()) {
        warn!("failed to initialize wave field: {err}");
    }

    let field_image = images.add(create_field_image(grid_size));
    let backdrop = images.add(create_backdrop_image(&BackdropParams::default()));
    let material = materials.add(WaterMaterial {
        field_texture: field_image.clone(),
        backdrop_texture: backdrop,
        settings: WaterUniform::from(&config.compositor),
    });

    commands.spawn((
        Mesh2d(meshes.add(Rectangle::new(1.0, 1.0))),
        MeshMaterial2d(material.clone()),
        Transform::from_scale(window_size.extend(1.0)),
        WaterSurface,
    ));
    commands.insert_resource(WaterDisplay {
        field_image,
        material,
    });

    info!(
        "water effect running with the {} preset on a {}x{} grid (press Space for controls)",
        config.preset, grid_size.x, grid_size.y
    );
}

fn track_pointer(
    mut moved: EventReader<CursorMoved>,
    mut left: EventReader<CursorLeft>,
    mut tracker: ResMut<PointerTracker>,
) {
    for event in moved.read() {
        tracker.record(event.position);
    }
    if left.read().last().is_some() {
        tracker.clear();
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_window_resize(
    mut resized: EventReader<WindowResized>,
    primary: Query<Entity, With<PrimaryWindow>>,
    config: Res<WaterEffectConfig>,
    display: Option<Res<WaterDisplay>>,
    mut simulator: ResMut<WaveSimulator>,
    mut tracker: ResMut<PointerTracker>,
    mut images: ResMut<Assets<Image>>,
    mut surface: Query<&mut Transform, With<WaterSurface>>,
) {
    let Some(event) = resized
        .read()
        .filter(|event| primary.contains(event.window))
        .last()
    else {
        return;
    };

    let window_size = Vec2::new(event.width, event.height);
    let grid_size = config.grid_size(window_size);
    if grid_size.x == 0 || grid_size.y == 0 {
        debug!("ignoring resize to an empty grid ({window_size})");
        return;
    }

    if let Ok(mut transform) = surface.single_mut() {
        transform.scale = window_size.extend(1.0);
    }

    if simulator.dimensions().ok() == Some(grid_size) {
        return;
    }
    if let Err(err) = simulator.resize(grid_size.x, grid_size.y) {
        warn!("failed to resize wave field: {err}");
        return;
    }
    tracker.forget_motion();

    if let Some(display) = display
        && let Some(image) = images.get_mut(&display.field_image)
    {
        *image = create_field_image(grid_size);
    }
}

fn switch_presets(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut config: ResMut<WaterEffectConfig>,
    mut simulator: ResMut<WaveSimulator>,
) {
    for (key, preset) in PRESET_KEYS {
        if keyboard_input.just_pressed(key) {
            config.apply_preset(preset);
            simulator.set_parameters(config.simulation.clone());
            info!("switched to the {preset} preset");
        }
    }

    if keyboard_input.just_pressed(KeyCode::KeyR) {
        match simulator.reset() {
            Ok(()) => info!("wave field reset"),
            Err(err) => warn!("failed to reset wave field: {err}"),
        }
    }

    if keyboard_input.just_pressed(KeyCode::Space) {
        let params = simulator.parameters();
        info!("Water Properties ({} preset):", config.preset);
        info!(
            "  Diffusion: {:.2}  Integration: {:.2}",
            params.diffusion, params.integration_scale
        );
        info!(
            "  Damping: velocity {:.4}, pressure {:.4}",
            params.velocity_damping, params.pressure_damping
        );
        info!(
            "  Disturbance: radius {:.3}, strength {:.3}, {:?} drive",
            params.disturbance_radius, params.disturbance_strength, params.drive
        );
        info!("Controls: 1=minimal, 2=heavy, 3=calm, 4=breathing, R=reset, Space=this help");
    }
}

fn advance_wave_field(
    window: Query<&Window, With<PrimaryWindow>>,
    mut simulator: ResMut<WaveSimulator>,
    mut tracker: ResMut<PointerTracker>,
) {
    let Ok(grid_size) = simulator.dimensions() else {
        return;
    };
    let window_size = window
        .single()
        .map(Window::size)
        .unwrap_or(grid_size.as_vec2());

    let drive = simulator.parameters().drive;
    let disturbance = tracker.take_disturbance(drive, &FieldMapping::new(window_size, grid_size));
    if let Err(err) = simulator.step(disturbance) {
        warn!("wave field step failed: {err}");
    }
}

/// Copy the current field into the texture and refresh the material so the
/// new frame is picked up.
fn publish_field(
    simulator: Res<WaveSimulator>,
    config: Res<WaterEffectConfig>,
    display: Option<Res<WaterDisplay>>,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<WaterMaterial>>,
) {
    let (Some(display), Ok(field)) = (display, simulator.current_field()) else {
        return;
    };

    if let Some(image) = images.get_mut(&display.field_image)
        && !upload_field(field, image)
    {
        debug!("field texture size lags the simulation, skipping upload");
    }
    if let Some(material) = materials.get_mut(&display.material) {
        material.settings = WaterUniform::from(&config.compositor);
    }
}
