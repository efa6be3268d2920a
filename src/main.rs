use bevy::prelude::*;
use water_distortion::{WaterEffectConfig, WaterEffectPlugin};

fn main() {
    // Optional argument: a preset name or a JSON config path
    let config = match std::env::args().nth(1) {
        Some(arg) => WaterEffectConfig::from_arg(&arg),
        None => Ok(WaterEffectConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("water_distortion: {err}");
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Water Distortion".into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(config)
        .add_plugins(WaterEffectPlugin)
        .run();
}
