use bevy::image::ImageSampler;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};

use crate::simulation::{BYTES_PER_CELL, Field};

/// Texture format matching the four `f32` field channels.
pub const FIELD_TEXTURE_FORMAT: TextureFormat = TextureFormat::Rgba32Float;

/// Create a zeroed field texture of the given grid size.
///
/// The data stays in the main world so it can be rewritten every frame.
/// 32-bit float textures are not filterable, so sampling is nearest.
pub fn create_field_image(size: UVec2) -> Image {
    let mut image = Image::new(
        Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        vec![0u8; size.x as usize * size.y as usize * BYTES_PER_CELL],
        FIELD_TEXTURE_FORMAT,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::nearest();
    image.texture_descriptor.usage = TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST;
    image
}

/// Copy the field into `image`. Returns false when the sizes disagree,
/// e.g. for the frame between a resize and the texture swap.
pub fn upload_field(field: &Field, image: &mut Image) -> bool {
    if image.size() != field.dimensions() {
        return false;
    }
    field.write_rgba_f32_bytes(image.data.get_or_insert_with(Vec::new));
    true
}
