//! WGPU-based rendering engine for the clock scene
//!
//! Owns the surface, device and every GPU resource the scene needs: the global
//! camera and light uniforms, one dynamic uniform slot per draw call, texture
//! pair bind groups and the primitive meshes.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::{
    error::RenderError,
    gfx::{
        camera::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            lights::SceneLights,
            texture_registry::TextureRegistry,
            texture_resource::{TextureBindings, TextureResource},
        },
        scene::{
            draw_list::{DrawCall, DrawUniform},
            mesh::{DrawMesh, MeshLibrary},
        },
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::DynamicUniformBuffer,
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

/// Name the scene pipeline is registered under
pub const SCENE_PIPELINE: &str = "Scene";

const SCENE_SHADER: &str = include_str!("shaders/scene.wgsl");

/// Draw slots allocated up front; the buffer grows past this on demand
const INITIAL_DRAW_CAPACITY: usize = 32;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,

    draw_layout: BindGroupLayoutWithDesc,
    draw_uniforms: DynamicUniformBuffer<DrawUniform>,
    draw_bind_group: wgpu::BindGroup,

    texture_bindings: TextureBindings,
    meshes: MeshLibrary,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Uploads every texture in `textures`, builds the primitive meshes and
    /// compiles the scene pipeline.
    ///
    /// # Errors
    /// Fails when no surface, adapter or device can be obtained, or when the
    /// scene pipeline cannot be created.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        textures: &TextureRegistry,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: device_limits(&adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| RenderError::Pipeline("surface reports no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let draw_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_dynamic::<DrawUniform>())
            .create(&device, "Draw Bind Group");
        let draw_uniforms = DynamicUniformBuffer::new(&device, INITIAL_DRAW_CAPACITY);
        let draw_bind_group = Self::create_draw_bind_group(&device, &draw_layout, &draw_uniforms);

        let texture_bindings = TextureBindings::new(&device, &queue, textures);
        let meshes = MeshLibrary::new(&device);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("scene.wgsl", SCENE_SHADER);
        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            PipelineConfig::default_with_shader("scene.wgsl")
                .with_label("Scene Pipeline")
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    draw_layout.layout.clone(),
                    texture_bindings.layout().clone(),
                ])
                // planes are seen from both sides
                .with_cull_mode(None)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_alpha_blended_target(format),
        );
        pipeline_manager.create_all_pipelines()?;

        let stats = pipeline_manager.get_stats();
        log::info!(
            "Render engine ready: {}x{} {:?}, {} pipelines, {} shaders, {} textures",
            config.width,
            config.height,
            format,
            stats.total_pipelines,
            stats.loaded_shaders,
            textures.len()
        );

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            draw_layout,
            draw_uniforms,
            draw_bind_group,
            texture_bindings,
            meshes,
        })
    }

    fn create_draw_bind_group(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        uniforms: &DynamicUniformBuffer<DrawUniform>,
    ) -> wgpu::BindGroup {
        BindGroupBuilder::new(layout)
            .resource(uniforms.binding_resource())
            .create(device, "Draw Bind Group")
    }

    /// Uploads per-draw uniforms and makes sure every texture pair has a bind group
    fn prepare_draws(&mut self, draws: &[DrawCall]) {
        let uniforms: Vec<DrawUniform> = draws.iter().map(DrawCall::uniform).collect();
        if self
            .draw_uniforms
            .write_all(&self.device, &self.queue, &uniforms)
        {
            self.draw_bind_group =
                Self::create_draw_bind_group(&self.device, &self.draw_layout, &self.draw_uniforms);
        }

        self.texture_bindings.prepare(
            &self.device,
            draws.iter().map(|draw| draw.state.texture.slots()),
        );
    }

    /// Renders one frame of draw calls with an optional UI overlay
    ///
    /// # Arguments
    /// * `draws` - Draw calls in submission order
    /// * `ui_callback` - Optional function that records UI passes onto the frame
    ///
    /// # Errors
    /// Returns the surface error when no frame could be acquired. `Lost` and
    /// `Outdated` surfaces are reconfigured before returning.
    pub fn render_frame<F>(
        &mut self,
        draws: &[DrawCall],
        ui_callback: Option<F>,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("Surface {:?}, reconfiguring", err);
                self.surface.configure(&self.device, &self.config);
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.prepare_draws(draws);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let (Some(pipeline), Some(globals)) = (
                self.pipeline_manager.get_pipeline(SCENE_PIPELINE),
                self.global_bindings.bind_group(),
            ) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, globals, &[]);

                for (index, draw) in draws.iter().enumerate() {
                    let Some(mesh) = self.meshes.get(draw.mesh) else {
                        log::warn!("No mesh uploaded for {:?}", draw.mesh);
                        continue;
                    };
                    let Some(textures) = self.texture_bindings.bind_group(draw.state.texture.slots())
                    else {
                        continue;
                    };

                    render_pass.set_bind_group(
                        1,
                        &self.draw_bind_group,
                        &[self.draw_uniforms.offset(index)],
                    );
                    render_pass.set_bind_group(2, textures, &[]);
                    render_pass.draw_mesh(mesh);
                }
            } else {
                log::error!("Scene pipeline is not available, skipping scene pass");
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Updates the camera and light uniforms for the next frame
    pub fn update(&mut self, camera_uniform: &CameraUniform, lights: &SceneLights) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform, lights);
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        log::debug!("Resized surface to {}x{}", width, height);
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    ///
    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// Downlevel limits, except for the texture size the adapter actually supports.
/// Scene textures may exceed the downlevel 2048 cap.
fn device_limits(adapter_limits: &wgpu::Limits) -> wgpu::Limits {
    wgpu::Limits {
        max_texture_dimension_2d: adapter_limits.max_texture_dimension_2d,
        ..wgpu::Limits::downlevel_defaults()
    }
}
