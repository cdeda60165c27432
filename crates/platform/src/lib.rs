//! Platform layer: windowing, event loop and presentation.
//!
//! The renderer produces frames on the CPU; this crate's only GPU work is
//! getting those pixels onto the screen. Packed 0xAARRGGBB is BGRA8 in
//! memory on little-endian, so a finished frame is uploaded byte-for-byte
//! into the swapchain texture with `write_texture` (no quad, no shader).

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use renderer::Framebuffer;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// Per-frame callback the application hands to [`run`].
///
/// `render` returns the finished framebuffer for the current window size;
/// `resize` is called before the next `render` whenever the window size
/// changes (including the initial size).
pub trait FrameHook {
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;
    fn render(&mut self, dt: f32) -> Result<&Framebuffer>;
}

/// Swapchain wrapper that presents CPU frames.
struct SurfaceBlit {
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
    /// Surface is RGBA rather than BGRA: swap channels on upload.
    swizzle: bool,
    scratch: Vec<u8>,
}

impl SurfaceBlit {
    async fn new(window: Arc<Window>) -> Result<Self> {
        let PhysicalSize { width, height } = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface: wgpu::Surface<'static> = instance
            .create_surface(window)
            .context("create_surface failed")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Perun3D Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("request_device failed")?;

        // Prefer a format we can copy packed ARGB into without conversion.
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| *f == wgpu::TextureFormat::Bgra8Unorm)
            .or_else(|| {
                caps.formats
                    .iter()
                    .copied()
                    .find(|f| *f == wgpu::TextureFormat::Rgba8Unorm)
            })
            .ok_or_else(|| anyhow!("surface supports neither BGRA8 nor RGBA8: {:?}", caps.formats))?;
        let swizzle = format == wgpu::TextureFormat::Rgba8Unorm;
        log::info!("Surface format: {:?} (swizzle={})", format, swizzle);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            swizzle,
            scratch: Vec::new(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Upload one finished frame and present it.
    fn blit(&mut self, fb: &Framebuffer) -> Result<(), wgpu::SurfaceError> {
        let (w, h) = (fb.width(), fb.height());
        if w != self.surface_config.width || h != self.surface_config.height {
            // Transient mismatch mid-resize: drop the frame.
            log::debug!(
                "frame {}x{} vs surface {}x{}, skipping",
                w,
                h,
                self.surface_config.width,
                self.surface_config.height
            );
            return Ok(());
        }

        let frame = self.surface.get_current_texture()?;
        let bytes = if self.swizzle {
            self.scratch.clear();
            self.scratch.extend(
                fb.color_bytes()
                    .chunks_exact(4)
                    .flat_map(|px| [px[2], px[1], px[0], px[3]]),
            );
            &self.scratch
        } else {
            fb.color_bytes()
        };

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &frame.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );
        // Empty submit flushes the queued copy.
        self.queue.submit(std::iter::empty());
        frame.present();
        Ok(())
    }

    fn is_surface_lost(err: &wgpu::SurfaceError) -> bool {
        matches!(
            err,
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated
        )
    }

    fn recreate_surface(&mut self) {
        self.resize(self.surface_config.width, self.surface_config.height);
    }
}

/// Once-a-second FPS log, enabled with `--show-fps`.
struct FpsCounter {
    frames: u32,
    since: Instant,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            since: Instant::now(),
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let elapsed = self.since.elapsed();
        if elapsed >= Duration::from_secs(1) {
            log::info!("FPS: {:.1}", self.frames as f64 / elapsed.as_secs_f64());
            self.frames = 0;
            self.since = Instant::now();
        }
    }
}

struct App {
    title: String,
    width: u32,
    height: u32,
    hook: Box<dyn FrameHook>,
    window: Option<Arc<Window>>,
    gpu: Option<SurfaceBlit>,
    last_frame: Instant,
    fps: Option<FpsCounter>,
    /// First error from the hook or the GPU; ends the loop, returned by `run`.
    error: Option<anyhow::Error>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.width, self.height));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                return self.fail(event_loop, anyhow!("failed to create window: {e}"));
            }
        };

        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        match pollster::block_on(SurfaceBlit::new(window.clone())) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => return self.fail(event_loop, e),
        }
        if let Err(e) = self.hook.resize(size.width.max(1), size.height.max(1)) {
            return self.fail(event_loop, e);
        }

        self.window = Some(window);
        self.last_frame = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Resized: {}x{}", new_size.width, new_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                if let Err(e) = self
                    .hook
                    .resize(new_size.width.max(1), new_size.height.max(1))
                {
                    self.fail(event_loop, e);
                }
            }
            WindowEvent::RedrawRequested => {
                let (Some(gpu), Some(window)) = (&mut self.gpu, &self.window) else {
                    return;
                };

                let now = Instant::now();
                let dt = (now - self.last_frame).as_secs_f32();
                self.last_frame = now;

                let fb = match self.hook.render(dt) {
                    Ok(fb) => fb,
                    Err(e) => return self.fail(event_loop, e),
                };
                match gpu.blit(fb) {
                    Ok(()) => {}
                    Err(e) if SurfaceBlit::is_surface_lost(&e) => {
                        log::warn!("Surface lost/outdated, reconfiguring.");
                        gpu.recreate_surface();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        return self.fail(event_loop, anyhow!("surface out of memory"));
                    }
                    Err(e) => log::warn!("Present error: {e:?}"),
                }

                if let Some(fps) = &mut self.fps {
                    fps.tick();
                }
                window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open a window of the given size and drive `hook` until it is closed.
pub fn run(title: &str, width: u32, height: u32, show_fps: bool, hook: Box<dyn FrameHook>) -> Result<()> {
    let event_loop: EventLoop<()> = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        title: title.to_owned(),
        width,
        height,
        hook,
        window: None,
        gpu: None,
        last_frame: Instant::now(),
        fps: show_fps.then(FpsCounter::new),
        error: None,
    };
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("event loop error: {e:?}"))?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
