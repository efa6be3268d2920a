use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::render_resource::{AsBindGroup, ShaderRef, ShaderType};
use bevy::sprite::{Material2d, Material2dPlugin};
use serde::{Deserialize, Serialize};

/// How the compositor turns the field into distortion and light
///
/// Heights are measured upward from the bottom of the viewport in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorSettings {
    /// Scale from field gradient to backdrop UV offset.
    pub distortion_strength: f32,
    /// Distortion ramps in between these heights; disabled unless end > start.
    pub fade: [f32; 2],
    pub turbulence_amplitude: f32,
    pub turbulence_frequency: [f32; 2],
    pub turbulence_speed: [f32; 2],
    /// Multiplier on elapsed seconds for every animated term.
    pub time_scale: f32,
    /// Horizontal weight of the gradient in the lighting normal.
    pub normal_tilt: f32,
    pub normal_height: f32,
    pub specular_power: f32,
    pub specular_intensity: f32,
    pub highlight_color: [f32; 3],
    /// Brightness multiplier at the bottom and top of the viewport.
    pub depth_tone: [f32; 2],
    pub shimmer_amplitude: f32,
    pub shimmer_frequency: f32,
    pub shimmer_speed: f32,
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self::minimal()
    }
}

impl CompositorSettings {
    /// Plain refraction with a sharp white highlight.
    pub fn minimal() -> Self {
        Self {
            distortion_strength: 0.2,
            fade: [0.0, 0.0],
            turbulence_amplitude: 0.0,
            turbulence_frequency: [0.0, 0.0],
            turbulence_speed: [0.0, 0.0],
            time_scale: 1.0,
            normal_tilt: 1.0,
            normal_height: 0.2,
            specular_power: 60.0,
            specular_intensity: 1.0,
            highlight_color: [1.0, 1.0, 1.0],
            depth_tone: [1.0, 1.0],
            shimmer_amplitude: 0.0,
            shimmer_frequency: 0.0,
            shimmer_speed: 0.0,
        }
    }

    pub fn heavy() -> Self {
        Self {
            distortion_strength: 0.22,
            fade: [0.1, 0.9],
            turbulence_amplitude: 0.015,
            turbulence_frequency: [10.0, 8.0],
            turbulence_speed: [0.8, 0.7],
            time_scale: 0.25,
            normal_tilt: 2.0,
            normal_height: 0.6,
            specular_power: 50.0,
            specular_intensity: 1.0,
            highlight_color: [0.9, 0.92, 0.95],
            depth_tone: [1.05, 0.92],
            shimmer_amplitude: 0.03,
            shimmer_frequency: 3.0,
            shimmer_speed: 0.5,
        }
    }

    pub fn calm() -> Self {
        Self {
            distortion_strength: 0.12,
            fade: [0.15, 0.85],
            turbulence_amplitude: 0.0,
            turbulence_frequency: [0.0, 0.0],
            turbulence_speed: [0.0, 0.0],
            time_scale: 1.0,
            normal_tilt: 1.5,
            normal_height: 0.4,
            specular_power: 40.0,
            specular_intensity: 0.6,
            highlight_color: [0.85, 0.88, 0.92],
            depth_tone: [1.02, 0.95],
            shimmer_amplitude: 0.03,
            shimmer_frequency: 3.0,
            shimmer_speed: 0.0,
        }
    }

    pub fn breathing() -> Self {
        Self {
            turbulence_amplitude: 0.01,
            turbulence_frequency: [8.0, 8.0],
            turbulence_speed: [1.0, 1.0],
            time_scale: 0.4,
            shimmer_amplitude: 0.02,
            shimmer_frequency: 2.0,
            shimmer_speed: 0.5,
            ..Self::calm()
        }
    }
}

/// Uniform block read by `water_distortion.wgsl`; field order matches the shader.
#[derive(ShaderType, Debug, Clone, Default)]
pub struct WaterUniform {
    pub distortion_strength: f32,
    pub fade: Vec2,
    pub turbulence_amplitude: f32,
    pub turbulence_frequency: Vec2,
    pub turbulence_speed: Vec2,
    pub time_scale: f32,
    pub normal_tilt: f32,
    pub normal_height: f32,
    pub specular_power: f32,
    pub specular_intensity: f32,
    pub highlight_color: LinearRgba,
    pub depth_tone: Vec2,
    pub shimmer_amplitude: f32,
    pub shimmer_frequency: f32,
    pub shimmer_speed: f32,
}

impl From<&CompositorSettings> for WaterUniform {
    fn from(settings: &CompositorSettings) -> Self {
        let [r, g, b] = settings.highlight_color;
        Self {
            distortion_strength: settings.distortion_strength,
            fade: Vec2::from_array(settings.fade),
            turbulence_amplitude: settings.turbulence_amplitude,
            turbulence_frequency: Vec2::from_array(settings.turbulence_frequency),
            turbulence_speed: Vec2::from_array(settings.turbulence_speed),
            time_scale: settings.time_scale,
            normal_tilt: settings.normal_tilt,
            normal_height: settings.normal_height,
            specular_power: settings.specular_power,
            specular_intensity: settings.specular_intensity,
            highlight_color: LinearRgba::rgb(r, g, b),
            depth_tone: Vec2::from_array(settings.depth_tone),
            shimmer_amplitude: settings.shimmer_amplitude,
            shimmer_frequency: settings.shimmer_frequency,
            shimmer_speed: settings.shimmer_speed,
        }
    }
}

/// Composites the wave field over a backdrop: refraction offset plus specular.
#[derive(AsBindGroup, Debug, Clone, Asset, TypePath)]
pub struct WaterMaterial {
    #[texture(0, sample_type = "float", filterable = false)]
    #[sampler(1, sampler_type = "non_filtering")]
    pub field_texture: Handle<Image>,

    #[texture(2)]
    #[sampler(3)]
    pub backdrop_texture: Handle<Image>,

    #[uniform(4)]
    pub settings: WaterUniform,
}

impl Material2d for WaterMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/water_distortion.wgsl".into()
    }
}

/// Plugin for the water compositing material
pub struct WaterMaterialPlugin;

impl Plugin for WaterMaterialPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(Material2dPlugin::<WaterMaterial>::default());
    }
}
