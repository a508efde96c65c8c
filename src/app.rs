// src/app.rs

use glam::DVec2;
use winit::window::Window;

use shape2d::render::WGSL_SHADER_SOURCE;
use shape2d::{Renderer, Rgb, Shape};

/// Demo state: a wgpu surface plus a handful of shapes drifting around the
/// window and bouncing off its edges.
pub struct ShapeApp {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    renderer: Renderer,
    shapes: Vec<Shape>,
}

fn demo_shapes() -> Vec<Shape> {
    let mut shapes = Vec::new();

    shapes.push(
        Shape::circle(DVec2::new(200.0, 200.0), 60.0)
            .with_color(Rgb(220, 60, 60))
            .with_velocity(DVec2::new(120.0, 80.0)),
    );

    if let Ok(rect) = Shape::rectangle([DVec2::new(400.0, 300.0), DVec2::new(520.0, 380.0)]) {
        shapes.push(
            rect.with_color(Rgb(60, 180, 90))
                .with_velocity(DVec2::new(-90.0, 140.0))
                .with_angular_velocity(0.8),
        );
    }

    if let Ok(hexagon) = Shape::regular_polygon(DVec2::new(700.0, 200.0), 70.0, 6, 0.0) {
        shapes.push(
            hexagon
                .with_color(Rgb(90, 110, 230))
                .with_velocity(DVec2::new(60.0, -100.0))
                .with_angular_velocity(-0.5),
        );
    }

    // A boolean combination: two overlapping circles fused into one shape.
    let left = Shape::circle(DVec2::new(480.0, 540.0), 50.0).with_color(Rgb(230, 200, 60));
    let right = Shape::circle(DVec2::new(540.0, 540.0), 50.0);
    let mut fused = left.union(&right);
    fused.set_velocity(DVec2::new(80.0, -60.0));
    shapes.push(fused);

    shapes
}

impl ShapeApp {
    pub async fn new(window: std::sync::Arc<Window>) -> Self {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone()).unwrap();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap();
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    label: None,
                },
                None,
            )
            .await
            .unwrap();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = Renderer::new(
            &device,
            config.format,
            WGSL_SHADER_SOURCE,
            size.width as f32,
            size.height as f32,
        );

        Self {
            surface,
            device,
            queue,
            config,
            size,
            renderer,
            shapes: demo_shapes(),
        }
    }

    pub fn get_size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn update(&mut self, dt: f64) {
        let bounds = DVec2::new(self.size.width as f64, self.size.height as f64);
        for shape in &mut self.shapes {
            shape.update(dt);

            let center = shape.center();
            let radius = shape.radius();
            let mut velocity = shape.velocity();
            if (center.x - radius < 0.0 && velocity.x < 0.0)
                || (center.x + radius > bounds.x && velocity.x > 0.0)
            {
                velocity.x = -velocity.x;
            }
            if (center.y - radius < 0.0 && velocity.y < 0.0)
                || (center.y + radius > bounds.y && velocity.y > 0.0)
            {
                velocity.y = -velocity.y;
            }
            shape.set_velocity(velocity);
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output_texture = self.surface.get_current_texture()?;
        let view = output_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Command Encoder"),
            });

        self.renderer.begin_frame();
        for shape in &self.shapes {
            shape.draw(&mut self.renderer);
        }
        self.renderer.finish_frame(
            &self.queue,
            &mut encoder,
            &view,
            self.size.width as f32,
            self.size.height as f32,
            wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.1,
                a: 1.0,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output_texture.present();
        Ok(())
    }
}
