use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{WindowAttributes, WindowId};

use crate::anim::AnimationDriver;
use crate::error::{OverlayError, OverlayResult};
use crate::io::{self, HeightmapSource};
use crate::mesh::GridMesh;
use crate::params::ParameterSet;
use crate::render::{Camera, Renderer};
use crate::settings::Settings;
use crate::style::{StyleSource, Stylesheet};
use crate::terrain::HeightmapImage;

/// Events delivered to the event loop from other threads.
#[derive(Debug)]
pub enum AppEvent {
    HeightmapLoaded {
        source: HeightmapSource,
        result: OverlayResult<HeightmapImage>,
    },
}

/// Everything that requires the window to exist.
struct GpuState {
    renderer: Renderer,
    driver: AnimationDriver<Stylesheet>,
}

/// Top-level application state.
pub struct App {
    gpu: Option<GpuState>,
    settings: Settings,
    mesh: GridMesh,
    proxy: EventLoopProxy<AppEvent>,
    modifiers: ModifiersState,
    /// Time origin for `ParameterSet::time`, set when the loop starts.
    started: Option<Instant>,
    /// Heightmap that finished loading before the GPU was ready.
    pending_heightmap: Option<HeightmapImage>,
    /// Fatal startup error, reported by `main` after the loop exits.
    fatal: Option<OverlayError>,
}

impl App {
    pub fn new(settings: Settings, mesh: GridMesh, proxy: EventLoopProxy<AppEvent>) -> Self {
        let mut app = Self {
            gpu: None,
            settings,
            mesh,
            proxy,
            modifiers: ModifiersState::empty(),
            started: None,
            pending_heightmap: None,
            fatal: None,
        };

        match app.settings.heightmap.source.clone() {
            Some(source) => app.load_heightmap(HeightmapSource::parse(&source)),
            None => log::warn!("no heightmap source configured; rendering flat"),
        }

        app
    }

    pub fn take_fatal_error(&mut self) -> Option<OverlayError> {
        self.fatal.take()
    }

    fn load_heightmap(&self, source: HeightmapSource) {
        let proxy = self.proxy.clone();
        let spawned = io::spawn_loader(source, move |source, result| {
            // The loop is gone if the window closed mid-download.
            let _ = proxy.send_event(AppEvent::HeightmapLoaded { source, result });
        });
        if let Err(e) = spawned {
            log::error!("could not start heightmap loader: {e}");
        }
    }

    fn create_gpu(&self, event_loop: &ActiveEventLoop) -> OverlayResult<GpuState> {
        let attrs = WindowAttributes::default()
            .with_title("terrawire")
            .with_inner_size(winit::dpi::LogicalSize::new(1280u32, 720u32));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let mut renderer = pollster::block_on(Renderer::new(window.clone(), &self.mesh))?;

        let style = Stylesheet::from_settings(&self.settings.style);
        renderer.bg_color = style.background();

        let size = window.inner_size();
        let camera = Camera::new(&self.settings.camera, size.width, size.height);
        let params = ParameterSet::from_settings(&self.settings.shader);
        let driver = AnimationDriver::new(params, camera, style);

        Ok(GpuState { renderer, driver })
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::KeyT) => self.cycle_theme(),
            PhysicalKey::Code(KeyCode::KeyO) if self.modifiers.control_key() => self.open_heightmap(),
            _ => {}
        }
    }

    fn cycle_theme(&mut self) {
        let Some(gpu) = &mut self.gpu else { return };
        let style = gpu.driver.style_mut();
        if let Some(name) = style.cycle() {
            log::info!("switched to theme {name}");
        }
        gpu.renderer.bg_color = style.background();
        self.settings.style.active_theme = style.active_index();
        self.settings.save();
    }

    fn open_heightmap(&mut self) {
        let file = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .set_title("Open Heightmap")
            .pick_file();

        if let Some(path) = file {
            self.load_heightmap(HeightmapSource::Path(path));
        }
    }

    fn apply_heightmap(&mut self, image: HeightmapImage) {
        let (lo, hi) = image.elevation_range(self.settings.shader.height_scale);
        log::info!("heightmap {}x{}, mesh-space elevation {lo:.4}..{hi:.4}", image.width, image.height);
        match &mut self.gpu {
            Some(gpu) => bind_heightmap(&mut gpu.renderer, &image),
            None => self.pending_heightmap = Some(image),
        }
    }
}

fn bind_heightmap(renderer: &mut Renderer, image: &HeightmapImage) {
    if let Err(e) = renderer.set_heightmap(image) {
        log::warn!("heightmap not bound, keeping current elevation: {e}");
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        let mut gpu = match self.create_gpu(event_loop) {
            Ok(gpu) => gpu,
            Err(e) => {
                self.fatal = Some(e);
                event_loop.exit();
                return;
            }
        };

        if let Some(image) = self.pending_heightmap.take() {
            bind_heightmap(&mut gpu.renderer, &image);
        }

        self.started = Some(Instant::now());
        gpu.driver.start(&gpu.renderer);
        self.gpu = Some(gpu);
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::HeightmapLoaded { source, result: Ok(image) } => {
                log::info!("loaded heightmap from {source}");
                self.apply_heightmap(image);
            }
            AppEvent::HeightmapLoaded { source, result: Err(e) } => {
                log::warn!("heightmap from {source} unavailable, keeping current elevation: {e}");
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput { event: key, .. } => {
                if key.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    event_loop.exit();
                } else {
                    self.handle_key(key);
                }
            }
            WindowEvent::Resized(new_size) => {
                let Some(gpu) = &mut self.gpu else { return };
                gpu.driver.resize(new_size.width, new_size.height, &mut gpu.renderer);
            }
            WindowEvent::RedrawRequested => {
                let Some(gpu) = &mut self.gpu else { return };
                let elapsed = self.started.map(|t| t.elapsed()).unwrap_or_default();
                gpu.driver.tick(elapsed, &mut gpu.renderer);
            }
            _ => {}
        }
    }
}
