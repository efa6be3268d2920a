use bevy::image::{ImageAddressMode, ImageFilterMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Parameters for the procedural riverbed the water is drawn over
#[derive(Clone, Debug)]
pub struct BackdropParams {
    pub width: u32,
    pub height: u32,
    /// Noise features across the image width.
    pub scale: f32,
    pub octaves: usize,
    pub seed: u32,
}

impl Default for BackdropParams {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            scale: 6.0,
            octaves: 5,
            seed: 7,
        }
    }
}

const DEEP: Vec3 = Vec3::new(0.05, 0.22, 0.30);
const SHALLOW: Vec3 = Vec3::new(0.18, 0.52, 0.55);
const PEBBLE: Vec3 = Vec3::new(0.72, 0.64, 0.48);

/// Generate sRGB RGBA8 pixels, row 0 at the top.
pub fn generate_backdrop_pixels(params: &BackdropParams) -> Vec<u8> {
    let fbm = Fbm::<Perlin>::new(params.seed).set_octaves(params.octaves);
    // Second field for the pebbles, decorrelated by seed
    let pebbles = Fbm::<Perlin>::new(params.seed.wrapping_add(1))
        .set_octaves(2)
        .set_frequency(4.0);

    let aspect = params.height as f32 / params.width.max(1) as f32;
    let mut pixels = Vec::with_capacity((params.width * params.height * 4) as usize);

    for y in 0..params.height {
        for x in 0..params.width {
            let u = x as f32 / params.width as f32 * params.scale;
            let v = y as f32 / params.height as f32 * params.scale * aspect;
            let point = [u as f64, v as f64];

            let depth = (fbm.get(point) as f32 * 0.5 + 0.5).clamp(0.0, 1.0);
            let pebble = (pebbles.get(point) as f32).max(0.0).powf(0.6);

            // Darker toward the bottom of the image
            let vertical = 1.0 - 0.35 * (y as f32 / params.height as f32);
            let water = DEEP.lerp(SHALLOW, depth) * vertical;
            let color = water.lerp(PEBBLE, pebble * 0.6);

            pixels.extend_from_slice(&[
                (color.x.clamp(0.0, 1.0) * 255.0) as u8,
                (color.y.clamp(0.0, 1.0) * 255.0) as u8,
                (color.z.clamp(0.0, 1.0) * 255.0) as u8,
                255,
            ]);
        }
    }

    pixels
}

/// Create the backdrop texture. Mirrored addressing keeps distorted lookups
/// near the edges on-image.
pub fn create_backdrop_image(params: &BackdropParams) -> Image {
    let mut image = Image::new(
        Extent3d {
            width: params.width,
            height: params.height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        generate_backdrop_pixels(params),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );

    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::MirrorRepeat,
        address_mode_v: ImageAddressMode::MirrorRepeat,
        mag_filter: ImageFilterMode::Linear,
        min_filter: ImageFilterMode::Linear,
        ..default()
    });

    image
}
