use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use uniforms::UniformRegistry;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::window::{Window, WindowBuilder};

use crate::engine::{RenderSurface, SurfaceSize};
use crate::gpu::WgpuBackend;
use crate::orchestrator::{FrameOrchestrator, FrameStatus};
use crate::runtime::{time_source_for_policy, FrameScheduler};
use crate::scene::SceneObject;
use crate::types::RendererConfig;

/// Pixels of trackpad scroll treated as one wheel line.
const PIXELS_PER_LINE: f32 = 40.0;

/// A winit window viewed as a render surface.
#[derive(Clone)]
pub struct WindowSurface {
    window: Arc<Window>,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Arc<Window> {
        self.window.clone()
    }

    fn logical_offset(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let logical = position.to_logical::<f32>(self.window.scale_factor());
        Vec2::new(logical.x, logical.y)
    }
}

impl RenderSurface for WindowSurface {
    fn layout_size(&self) -> SurfaceSize {
        let logical = self
            .window
            .inner_size()
            .to_logical::<f32>(self.window.scale_factor());
        SurfaceSize::new(logical.width, logical.height)
    }

    fn pixel_ratio(&self) -> f32 {
        self.window.scale_factor() as f32
    }
}

/// Opens a window and runs the frame loop until it closes or a frame fails.
pub fn run_window(
    config: RendererConfig,
    registry: UniformRegistry,
    objects: Vec<SceneObject>,
) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let (width, height) = config.surface_size;
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(LogicalSize::new(width, height))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let mut orchestrator = FrameOrchestrator::with_time_source(
        WgpuBackend::new(config.antialiasing),
        registry,
        config.orchestrator.clone(),
        time_source_for_policy(&config.policy),
    );
    for object in objects {
        orchestrator.add_object(object);
    }
    orchestrator
        .initialize(WindowSurface::new(window.clone()))
        .context("failed to attach renderer to window")?;
    tracing::info!(
        width,
        height,
        passes = orchestrator.scene().len(),
        uniforms = orchestrator.uniforms().len(),
        "stage window ready"
    );

    let frame_loop = orchestrator.frame_loop();
    let mut scheduler = FrameScheduler::new(config.policy.clone());
    let failure: Rc<RefCell<Option<anyhow::Error>>> = Rc::default();
    let loop_failure = failure.clone();
    window.request_redraw();

    let run_result = event_loop.run(move |event, elwt| {
        let stop = |err: anyhow::Error, elwt: &EventLoopWindowTarget<()>| {
            tracing::error!("stopping frame loop: {err:#}");
            loop_failure.borrow_mut().get_or_insert(err);
            elwt.exit();
        };

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    frame_loop.cancel();
                    elwt.exit();
                }
                WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                    match orchestrator.on_resize() {
                        Ok(_) => scheduler.invalidate(),
                        Err(err) => stop(err.into(), elwt),
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let Some(offset) = orchestrator
                        .surface()
                        .map(|surface| surface.logical_offset(position))
                    else {
                        return;
                    };
                    match orchestrator.on_pointer_move(offset) {
                        Ok(_) => scheduler.invalidate(),
                        Err(err) => stop(err.into(), elwt),
                    }
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => {
                    if let Err(err) = orchestrator.on_pointer_button(state == ElementState::Pressed)
                    {
                        stop(err.into(), elwt);
                    }
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let lines = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(position) => {
                            position.y as f32 / PIXELS_PER_LINE
                        }
                    };
                    match orchestrator.on_scroll(lines) {
                        Ok(()) => scheduler.invalidate(),
                        Err(err) => stop(err.into(), elwt),
                    }
                }
                WindowEvent::RedrawRequested => match orchestrator.animate() {
                    Ok(FrameStatus::Rendered) => {
                        scheduler.mark_rendered(Instant::now());
                        if orchestrator.needs_redraw() {
                            scheduler.invalidate();
                        }
                    }
                    Ok(FrameStatus::Stopped) => elwt.exit(),
                    Err(err) => stop(err.into(), elwt),
                },
                _ => {}
            },
            Event::AboutToWait => {
                if frame_loop.is_cancelled() {
                    elwt.exit();
                    return;
                }
                let now = Instant::now();
                if scheduler.ready_for_frame(now) {
                    window.request_redraw();
                    elwt.set_control_flow(ControlFlow::Wait);
                } else if let Some(deadline) = scheduler.next_deadline() {
                    tracing::trace!(
                        deadline_ms = deadline.saturating_duration_since(now).as_millis(),
                        "scheduler: waiting until next frame"
                    );
                    elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                } else {
                    elwt.set_control_flow(ControlFlow::Wait);
                }
            }
            Event::LoopExiting => orchestrator.dispose(),
            _ => {}
        }
    });

    if let Some(err) = failure.borrow_mut().take() {
        return Err(err);
    }
    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}
