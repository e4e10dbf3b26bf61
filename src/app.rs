use anyhow::Context;
use std::{sync::Arc, time::Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowAttributes},
};

use crate::{
    config::ViewerConfig,
    gfx::{
        rendering::RenderEngine,
        scene::Scene,
        ui::{panel, OverlayStatus, UiManager},
    },
};

type UiPass<'a> = Box<
    dyn FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView) + 'a,
>;

/// The interactive clock scene viewer
pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    last_frame: Option<Instant>,
    /// Raw device motion drives mouse look while the cursor is grabbed
    cursor_grabbed: bool,
    error: Option<anyhow::Error>,
}

impl ViewerApp {
    /// Validates `config`, loads the scene textures and creates the event loop
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let scene = Scene::prepare(&config);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                last_frame: None,
                cursor_grabbed: false,
                error: None,
            },
        })
    }

    /// Runs until the window is closed or Escape is pressed
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop failed")?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_config = &self.config.window;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(window_config.title.clone())
                    .with_inner_size(PhysicalSize::new(window_config.width, window_config.height)),
            )
            .context("failed to create window")?;
        let window = Arc::new(window);

        self.grab_cursor(&window);

        let PhysicalSize { width, height } = window.inner_size();
        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);

        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            &self.scene.textures,
        ))?;

        if self.config.overlay.enabled {
            self.ui_manager = Some(UiManager::new(
                renderer.device(),
                renderer.queue(),
                renderer.surface_format(),
                &window,
            ));
        }

        self.render_engine = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn grab_cursor(&mut self, window: &Window) {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                self.cursor_grabbed = true;
                window.set_cursor_visible(false);
            }
            Err(err) => log::warn!("Could not grab the cursor: {}", err),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(render_engine), Some(window)) = (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return;
        };

        let now = Instant::now();
        let delta_time = self
            .last_frame
            .replace(now)
            .map_or(0.0, |last| (now - last).as_secs_f32());

        self.scene.update(delta_time);
        render_engine.update(&self.scene.camera_manager.uniform(), &self.scene.lights);

        let draws = self.scene.record_frame();
        log::trace!(
            "Frame {:.2} ms, {} draw calls",
            delta_time * 1000.0,
            draws.len()
        );

        let ui_pass: Option<UiPass> = self.ui_manager.as_mut().map(|ui_manager| {
            let status = OverlayStatus::new(
                &self.scene.camera_manager.camera,
                self.scene.camera_manager.controller.speed,
                draws.len(),
            );
            let window = window.clone();
            Box::new(
                move |device: &wgpu::Device,
                      queue: &wgpu::Queue,
                      encoder: &mut wgpu::CommandEncoder,
                      view: &wgpu::TextureView| {
                    ui_manager.draw(device, queue, encoder, &window, view, |ui| {
                        panel::status(ui, &status)
                    });
                },
            ) as UiPass
        });

        match render_engine.render_frame(&draws, ui_pass) {
            Ok(()) => {}
            // the engine has already reconfigured the surface
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {}
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow::anyhow!("GPU out of memory"));
            }
            Err(err) => log::warn!("Dropped frame: {}", err),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.initialize(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                log::info!("Exiting");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.scene.camera_manager.process_keyboard_event(&event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if !self.cursor_grabbed {
                    self.scene
                        .camera_manager
                        .process_cursor_position(position.x, position.y);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scene.camera_manager.process_scroll(&delta);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if !self.cursor_grabbed {
            return;
        }
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.scene.camera_manager.process_mouse_motion(dx, dy);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
