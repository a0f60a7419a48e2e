use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, Sender};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use winit::window::{Window, WindowBuilder};

use tracing::{error, info, warn};

use engine::GradientParameters;

use crate::gpu::GpuState;
use crate::runtime::{AnimationDriver, RenderPolicy, TimeSample};
use crate::types::RendererConfig;

/// Commands delivered to the event-loop thread through the winit proxy.
/// They land between redraws, so each tick sees one coherent parameter
/// snapshot.
#[derive(Debug, Clone)]
enum EngineCommand {
    UpdateParameters(GradientParameters),
    Shutdown,
}

/// Owns the window thread and the channel into its event loop.
///
/// Each `WindowRuntime` is a fully isolated renderer instance: its own
/// window, GPU resources, and time accumulator. Dropping it (or calling
/// [`WindowRuntime::shutdown`]) tears the instance down.
pub struct WindowRuntime {
    proxy: EventLoopProxy<EngineCommand>,
    join_handle: Option<JoinHandle<Result<()>>>,
}

impl WindowRuntime {
    pub fn spawn(config: RendererConfig) -> Result<Self> {
        let (ready_tx, ready_rx) = bounded(1);
        let handle = thread::Builder::new()
            .name("meshfall-window".into())
            .spawn(move || run_window_thread(config, ready_tx))
            .map_err(|err| anyhow!("failed to spawn window thread: {err}"))?;

        let proxy = ready_rx
            .recv()
            .map_err(|err| anyhow!("window thread failed to initialise: {err}"))??;

        Ok(Self {
            proxy,
            join_handle: Some(handle),
        })
    }

    /// Replaces the parameter snapshot used from the next tick onwards.
    pub fn update_parameters(&self, parameters: GradientParameters) -> Result<()> {
        self.proxy
            .send_event(EngineCommand::UpdateParameters(parameters))
            .map_err(|err| anyhow!(err))
    }

    pub fn shutdown(mut self) -> Result<()> {
        if let Some(handle) = self.join_handle.take() {
            let _ = self.proxy.send_event(EngineCommand::Shutdown);
            handle
                .join()
                .map_err(|err| anyhow!("window thread panicked: {err:?}"))??;
        }
        Ok(())
    }

    /// Blocks until the window closes (user close or shutdown command).
    pub fn join(mut self) -> Result<()> {
        if let Some(handle) = self.join_handle.take() {
            handle
                .join()
                .map_err(|err| anyhow!("window thread panicked: {err:?}"))??;
        }
        Ok(())
    }
}

impl Drop for WindowRuntime {
    fn drop(&mut self) {
        if let Some(handle) = self.join_handle.take() {
            let _ = self.proxy.send_event(EngineCommand::Shutdown);
            let _ = handle.join();
        }
    }
}

/// GPU state plus the live parameter snapshot for one window.
struct WindowState {
    window: Arc<Window>,
    gpu: GpuState,
    parameters: GradientParameters,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let parameters = config.parameters.clone().sanitized();
        let gpu = GpuState::new(window.as_ref(), size, &parameters)?;
        Ok(Self {
            window,
            gpu,
            parameters,
        })
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn set_parameters(&mut self, parameters: GradientParameters) {
        self.parameters = parameters.sanitized();
        self.gpu.set_parameters(&self.parameters);
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    fn render_frame(&mut self, sample: TimeSample) -> Result<(), wgpu::SurfaceError> {
        // The compositor can resize the surface between events; pick the
        // change up here so the frame never renders against a stale size.
        let current = self.window.inner_size();
        if current != self.gpu.size() {
            self.gpu.resize(current);
        }
        self.gpu.render(sample)
    }
}

fn run_window_thread(
    config: RendererConfig,
    ready_tx: Sender<Result<EventLoopProxy<EngineCommand>, anyhow::Error>>,
) -> Result<()> {
    let mut builder = EventLoopBuilder::<EngineCommand>::with_user_event();
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        use winit::platform::wayland::EventLoopBuilderExtWayland;
        EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    }

    #[cfg(any(
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
    }
    let event_loop = builder
        .build()
        .map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let proxy = event_loop.create_proxy();

    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let mut state = match WindowState::new(window.clone(), &config) {
        Ok(state) => state,
        Err(err) => {
            let wrapped = anyhow!("failed to initialise renderer: {err}");
            let message = wrapped.to_string();
            let _ = ready_tx.send(Err(anyhow!(message)));
            return Err(wrapped);
        }
    };

    // A software rasterizer only shows the static gradient, so the policy
    // degrades to a single still frame regardless of what was requested.
    let effective_policy = if state.gpu.is_static() {
        match config.policy {
            RenderPolicy::Still { time } => RenderPolicy::Still { time },
            RenderPolicy::Animate { .. } => RenderPolicy::Still { time: 0.0 },
        }
    } else {
        config.policy
    };

    let speed = f64::from(state.parameters.animation_speed);
    let mut driver = AnimationDriver::new(effective_policy, speed);
    driver.start();
    if driver.wants_next_frame() {
        state.window().request_redraw();
    }

    let _ = ready_tx.send(Ok(proxy.clone()));
    info!(
        width = window_size.width,
        height = window_size.height,
        "window renderer started"
    );

    let mut result = Ok(());
    let run_result = event_loop.run(move |event, elwt| {
        match event {
            Event::UserEvent(command) => match command {
                EngineCommand::UpdateParameters(parameters) => {
                    state.set_parameters(parameters);
                    driver.set_speed(f64::from(state.parameters.animation_speed));
                }
                EngineCommand::Shutdown => {
                    driver.stop();
                    elwt.exit();
                }
            },
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        driver.stop();
                        elwt.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        state.resize(new_size);
                        // A held still frame is re-rendered at the new size.
                        driver.invalidate_still();
                    }
                    WindowEvent::RedrawRequested => {
                        // A redraw that fires after stop() gets no sample and
                        // is discarded.
                        let Some(sample) = driver.begin_tick() else {
                            return;
                        };
                        match state.render_frame(sample) {
                            Ok(()) => {
                                driver.mark_submitted(Instant::now());
                            }
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                state.resize(state.window.inner_size());
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                error!("surface out of memory; exiting");
                                driver.stop();
                                elwt.exit();
                            }
                            Err(wgpu::SurfaceError::Timeout) => {
                                warn!("surface timeout; retrying next frame");
                            }
                            Err(other) => {
                                warn!("surface error: {other:?}; retrying next frame");
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                if driver.wants_next_frame() && driver.ready_for_frame(now) {
                    state.window().request_redraw();
                    elwt.set_control_flow(ControlFlow::Wait);
                } else if let Some(deadline) = driver.next_deadline() {
                    elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                } else {
                    elwt.set_control_flow(ControlFlow::Wait);
                }
            }
            _ => {}
        }
    });

    if let Err(err) = run_result {
        result = Err(anyhow!("window event loop error: {err}"));
    }

    result
}
