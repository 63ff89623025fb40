use std::sync::Arc;

use crate::anim::FrameTarget;
use crate::error::OverlayResult;
use crate::mesh::GridMesh;
use crate::params::ParameterSet;
use crate::render::camera::Camera;
use crate::render::grid::GridRenderer;
use crate::render::heightmap::HeightmapTexture;
use crate::render::vertex::{GridVertex, OverlayUniforms};
use crate::style::srgb_to_linear;
use crate::terrain::HeightmapImage;

/// Requested MSAA level for the wireframe; lowered if the surface format
/// cannot do it.
const REQUESTED_SAMPLE_COUNT: u32 = 4;

pub struct Renderer {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_format: wgpu::TextureFormat,
    pub config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    // Multisampled color target, resolved into the swapchain image.
    msaa_view: Option<wgpu::TextureView>,
    window: Arc<winit::window::Window>,

    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    overlay_pipeline: wgpu::RenderPipeline,
    grid: GridRenderer,

    heightmap_layout: wgpu::BindGroupLayout,
    // Sea-level placeholder until a heightmap has loaded.
    heightmap: HeightmapTexture,

    pub bg_color: [f32; 3],
}

impl Renderer {
    pub async fn new(window: Arc<winit::window::Window>, mesh: &GridMesh) -> OverlayResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            // Fifo paces the frame loop to the display refresh.
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = choose_sample_count(
            REQUESTED_SAMPLE_COUNT,
            &supported_sample_counts(&adapter, surface_format),
        );
        let msaa_view = create_msaa_view(&device, &config, sample_count);
        log::info!("surface {surface_format:?}, {sample_count}x MSAA");

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("overlay_uniform"),
            size: std::mem::size_of::<OverlayUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("overlay_bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("overlay_bg"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let heightmap_layout = HeightmapTexture::bind_group_layout(&device);
        let heightmap = HeightmapTexture::placeholder(&device, &queue, &heightmap_layout)?;

        let overlay_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("overlay_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/overlay.wgsl").into()),
        });

        let overlay_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("overlay_pipeline_layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &heightmap_layout],
            push_constant_ranges: &[],
        });

        let overlay_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("overlay_pipeline"),
            layout: Some(&overlay_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &overlay_shader,
                entry_point: Some("vs_main"),
                buffers: &[GridVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &overlay_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            // Translucent overlay: every segment blends, none occlude.
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let grid = GridRenderer::new(&device, mesh)?;

        Ok(Self {
            device,
            queue,
            surface,
            surface_format,
            config,
            sample_count,
            msaa_view,
            window,
            uniform_buffer,
            uniform_bind_group,
            overlay_pipeline,
            grid,
            heightmap_layout,
            heightmap,
            bg_color: [0.0, 0.0, 0.0],
        })
    }

    /// Replace the bound heightmap. Takes effect on the next frame. On error
    /// the current heightmap stays bound.
    pub fn set_heightmap(&mut self, image: &HeightmapImage) -> OverlayResult<()> {
        self.heightmap = HeightmapTexture::upload(
            &self.device,
            &self.queue,
            &self.heightmap_layout,
            image,
            "heightmap_texture",
        )?;
        log::info!("bound {}x{} heightmap", self.heightmap.width, self.heightmap.height);
        Ok(())
    }

    fn uniforms(&self, params: &ParameterSet, camera: &Camera) -> OverlayUniforms {
        let color = self.output_color(params.color);
        OverlayUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            color: [color[0], color[1], color[2], params.opacity],
            time: params.time,
            height_scale: params.height_scale,
            amplitude: params.amplitude,
            frequency: params.frequency,
            speed: params.speed,
            _pad: [0.0; 3],
        }
    }

    /// Style colors are sRGB; an sRGB surface expects linear values.
    fn output_color(&self, color: [f32; 3]) -> [f32; 3] {
        if self.surface_format.is_srgb() {
            color.map(srgb_to_linear)
        } else {
            color
        }
    }

    fn draw(&mut self, params: &ParameterSet, camera: &Camera) {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e) => {
                match surface_recovery(&e) {
                    SurfaceRecovery::Reconfigure => {
                        let size = self.window.inner_size();
                        self.resize(size.width, size.height);
                    }
                    SurfaceRecovery::Skip(level) => log::log!(level, "skipping frame: {e}"),
                }
                return;
            }
        };

        let uniforms = self.uniforms(params, camera);
        self.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bg = self.output_color(self.bg_color);
        let mut encoder = self.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor { label: Some("overlay_encoder") },
        );
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.msaa_view.as_ref().unwrap_or(&view),
                    resolve_target: self.msaa_view.as_ref().map(|_| &view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg[0] as f64,
                            g: bg[1] as f64,
                            b: bg[2] as f64,
                            a: 1.0,
                        }),
                        store: if self.msaa_view.is_some() {
                            wgpu::StoreOp::Discard
                        } else {
                            wgpu::StoreOp::Store
                        },
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(&self.overlay_pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_bind_group(1, &self.heightmap.bind_group, &[]);
            self.grid.draw(&mut pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

impl FrameTarget for Renderer {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.msaa_view = create_msaa_view(&self.device, &self.config, self.sample_count);
        log::debug!("surface resized to {width}x{height}");
    }

    fn render(&mut self, params: &ParameterSet, camera: &Camera) {
        self.draw(params, camera);
    }

    fn request_frame(&self) {
        self.window.request_redraw();
    }
}

/// What to do with a frame whose swapchain image could not be acquired.
#[derive(Debug, PartialEq, Eq)]
enum SurfaceRecovery {
    Reconfigure,
    Skip(log::Level),
}

fn surface_recovery(error: &wgpu::SurfaceError) -> SurfaceRecovery {
    match error {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
        // Fifo acquisition times out routinely while the window is hidden.
        wgpu::SurfaceError::Timeout => SurfaceRecovery::Skip(log::Level::Debug),
        wgpu::SurfaceError::OutOfMemory => SurfaceRecovery::Skip(log::Level::Error),
        _ => SurfaceRecovery::Skip(log::Level::Warn),
    }
}

fn supported_sample_counts(adapter: &wgpu::Adapter, format: wgpu::TextureFormat) -> Vec<u32> {
    let flags = adapter.get_texture_format_features(format).flags;
    let mut counts = vec![1];
    counts.extend([2, 4, 8, 16].into_iter().filter(|&n| flags.sample_count_supported(n)));
    counts
}

fn choose_sample_count(requested: u32, allowed: &[u32]) -> u32 {
    if allowed.contains(&requested) {
        return requested;
    }
    allowed
        .iter()
        .copied()
        .filter(|&n| n <= requested)
        .max()
        .unwrap_or(1)
}

fn create_msaa_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("overlay_msaa"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}
