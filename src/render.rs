use crate::constants::{BACKDROP_BOTTOM, BACKDROP_TOP, FOVY_RADIANS, Z_FAR, Z_NEAR};
use crate::core::CameraPose;
use glam::{Mat4, Vec3};
use web_sys as web;

mod backdrop;
mod helpers;
mod particles;

use backdrop::{create_backdrop_resources, BackdropResources, BackdropUniforms};
pub use particles::ParticleInstance;
use particles::{create_particle_resources, CameraUniforms, ParticleResources};

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    backdrop: BackdropResources,
    particles: ParticleResources,
    width: u32,
    height: u32,
    time_accum: f32,
    camera: CameraPose,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        initial_instances: usize,
    ) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {:?}", e))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let backdrop = create_backdrop_resources(&device, format);
        let particles = create_particle_resources(&device, format, initial_instances);
        log::info!(
            "[gpu] ready {}x{} {:?}, {} instances",
            width,
            height,
            format,
            initial_instances
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            backdrop,
            particles,
            width,
            height,
            time_accum: 0.0,
            camera: CameraPose {
                position: Vec3::new(0.0, 0.0, 30.0),
                look_at: Vec3::ZERO,
            },
        })
    }

    pub fn set_camera(&mut self, pose: CameraPose) {
        self.camera = pose;
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn camera_uniforms(&self) -> CameraUniforms {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        let view = Mat4::look_at_rh(self.camera.position, self.camera.look_at, Vec3::Y);
        let proj = Mat4::perspective_rh(FOVY_RADIANS, aspect, Z_NEAR, Z_FAR);
        // Rows of the view rotation are the camera basis in world space.
        let right = view.row(0).truncate().extend(0.0);
        let up = view.row(1).truncate().extend(0.0);
        CameraUniforms {
            view_proj: (proj * view).to_cols_array_2d(),
            right: right.to_array(),
            up: up.to_array(),
        }
    }

    pub fn render(
        &mut self,
        dt_sec: f32,
        progress: f32,
        instances: &[ParticleInstance],
    ) -> Result<(), wgpu::SurfaceError> {
        self.time_accum += dt_sec.max(0.0);
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let b = BackdropUniforms {
            resolution: [self.width as f32, self.height as f32],
            time: self.time_accum,
            progress,
            top: BACKDROP_TOP,
            bottom: BACKDROP_BOTTOM,
        };
        self.queue
            .write_buffer(&self.backdrop.uniform_buffer, 0, bytemuck::bytes_of(&b));
        let cam = self.camera_uniforms();
        self.queue
            .write_buffer(&self.particles.camera_buffer, 0, bytemuck::bytes_of(&cam));
        self.particles.upload(&self.device, &self.queue, instances);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.backdrop.pipeline);
            rpass.set_bind_group(0, &self.backdrop.bind_group, &[]);
            rpass.draw(0..3, 0..1);

            if !instances.is_empty() {
                rpass.set_pipeline(&self.particles.pipeline);
                rpass.set_bind_group(0, &self.particles.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.particles.instance_buffer.slice(..));
                rpass.draw(0..6, 0..instances.len() as u32);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Pack visible particles into instance records, reusing `out`'s allocation.
pub fn pack_instances(
    src: impl Iterator<Item = (Vec3, f32, [f32; 4])>,
    out: &mut Vec<ParticleInstance>,
) {
    out.clear();
    out.extend(src.map(|(p, size, color)| ParticleInstance {
        pos_size: [p.x, p.y, p.z, size],
        color,
    }));
}
