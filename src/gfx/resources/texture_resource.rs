//! Texture resource management for wgpu
//!
//! Provides GPU textures for the depth buffer and for registry images, plus
//! the bind groups that pair two image textures with a sampler.

use std::collections::HashMap;

use crate::{
    gfx::resources::texture_registry::{ImageData, TextureRegistry},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
    },
};

/// GPU texture resource containing texture, view, and sampler
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface configuration
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads RGBA8 pixels and their mip chain into a repeating, linearly
    /// filtered texture
    pub fn create_from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &ImageData,
        label: &str,
    ) -> Self {
        let levels = image.mip_chain();

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in (0u32..).zip(&levels) {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level.rgba,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level.width),
                    rows_per_image: Some(level.height),
                },
                wgpu::Extent3d {
                    width: level.width,
                    height: level.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// Slots bound at texture bindings 0 and 1 of group 2
pub type SlotPair = (Option<usize>, Option<usize>);

/// GPU copies of every registry slot and the bind groups that pair them
pub struct TextureBindings {
    layout: BindGroupLayoutWithDesc,
    /// Indexed by registry slot; `None` where the image exceeds device limits
    textures: Vec<Option<TextureResource>>,
    fallback: TextureResource,
    cache: HashMap<SlotPair, wgpu::BindGroup>,
}

impl TextureBindings {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, registry: &TextureRegistry) -> Self {
        let layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Texture Pair Bind Group");

        let max_dimension = device.limits().max_texture_dimension_2d;
        let textures = registry
            .slots()
            .iter()
            .map(|slot| {
                if slot.image.width > max_dimension || slot.image.height > max_dimension {
                    log::warn!(
                        "Texture '{}' is {}x{}, larger than the device limit of {}",
                        slot.tag,
                        slot.image.width,
                        slot.image.height,
                        max_dimension
                    );
                    return None;
                }
                Some(TextureResource::create_from_image(
                    device,
                    queue,
                    &slot.image,
                    &slot.tag,
                ))
            })
            .collect();
        let fallback =
            TextureResource::create_from_image(device, queue, &ImageData::white(), "white fallback");

        Self {
            layout,
            textures,
            fallback,
            cache: HashMap::new(),
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout.layout
    }

    fn resolve(&self, slot: Option<usize>) -> &TextureResource {
        slot.and_then(|index| self.textures.get(index))
            .and_then(Option::as_ref)
            .unwrap_or(&self.fallback)
    }

    /// Creates bind groups for any pairs not seen before
    pub fn prepare(&mut self, device: &wgpu::Device, pairs: impl IntoIterator<Item = SlotPair>) {
        for pair in pairs {
            if self.cache.contains_key(&pair) {
                continue;
            }
            let first = self.resolve(pair.0);
            let second = self.resolve(pair.1);
            let bind_group = BindGroupBuilder::new(&self.layout)
                .texture(&first.view)
                .texture(&second.view)
                .sampler(&first.sampler)
                .create(device, &format!("Textures {:?}", pair));
            log::debug!("Created texture bind group for slots {:?}", pair);
            self.cache.insert(pair, bind_group);
        }
    }

    pub fn bind_group(&self, pair: SlotPair) -> Option<&wgpu::BindGroup> {
        self.cache.get(&pair)
    }
}
