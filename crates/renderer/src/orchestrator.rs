use std::time::Instant;

use glam::Vec2;
use uniforms::{UniformError, UniformRegistry};

use crate::camera::PerspectiveCamera;
use crate::controls::OrbitControls;
use crate::engine::{RenderBackend, RenderSurface, SurfaceSize};
use crate::pointer::{PointerPosition, PointerState};
use crate::runtime::{BoxedTimeSource, FrameLoopHandle, SystemTimeSource};
use crate::scene::{ObjectId, Scene, SceneObject};
use crate::types::OrchestratorConfig;

/// One-way attachment state of a [`FrameOrchestrator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Attached,
    Disposed,
}

/// Outcome of a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Rendered,
    /// The frame loop was cancelled; nothing was drawn.
    Stopped,
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("orchestrator is not attached to a surface")]
    NotAttached,
    #[error("orchestrator is already attached to a surface")]
    AlreadyAttached,
    #[error("orchestrator has been disposed")]
    Disposed,
    #[error(transparent)]
    Uniform(#[from] UniformError),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

struct Attachment<S> {
    surface: S,
    controls: Option<OrbitControls>,
}

/// Drives a render backend from host events and keeps the uniform registry
/// in step with the clock, the surface size and the pointer.
pub struct FrameOrchestrator<B: RenderBackend> {
    backend: B,
    scene: Scene,
    camera: PerspectiveCamera,
    clock: BoxedTimeSource,
    registry: UniformRegistry,
    config: OrchestratorConfig,
    pointer: PointerState,
    attachment: Option<Attachment<B::Surface>>,
    lifecycle: Lifecycle,
    frame_loop: FrameLoopHandle,
    last_seconds: Option<f32>,
    /// Wall-clock time of the previous tick; drives control damping.
    last_frame: Option<Instant>,
}

impl<B: RenderBackend> FrameOrchestrator<B> {
    pub fn new(backend: B, registry: UniformRegistry, config: OrchestratorConfig) -> Self {
        Self::with_time_source(backend, registry, config, Box::new(SystemTimeSource::new()))
    }

    pub fn with_time_source(
        backend: B,
        registry: UniformRegistry,
        config: OrchestratorConfig,
        clock: BoxedTimeSource,
    ) -> Self {
        let settings = config.camera;
        let camera = PerspectiveCamera::new(settings.fov_degrees, 1.0, settings.near, settings.far);
        Self {
            backend,
            scene: Scene::new(),
            camera,
            clock,
            registry,
            config,
            pointer: PointerState::default(),
            attachment: None,
            lifecycle: Lifecycle::Uninitialized,
            frame_loop: FrameLoopHandle::new(),
            last_seconds: None,
            last_frame: None,
        }
    }

    /// Binds `surface` and prepares the camera, registry and backend for frames.
    ///
    /// On failure nothing stays bound, the registry and camera are untouched
    /// and the orchestrator remains uninitialized.
    pub fn initialize(&mut self, surface: B::Surface) -> Result<(), OrchestratorError> {
        match self.lifecycle {
            Lifecycle::Uninitialized => {}
            Lifecycle::Attached => return Err(OrchestratorError::AlreadyAttached),
            Lifecycle::Disposed => return Err(OrchestratorError::Disposed),
        }

        let size = surface.layout_size();
        self.backend.set_pixel_ratio(surface.pixel_ratio());
        self.backend.set_size(size);
        self.backend.attach(&surface)?;
        if let Err(err) = self.push_size(size) {
            self.backend.detach();
            return Err(err);
        }

        let settings = self.config.camera;
        self.camera.set_position(settings.position);
        self.camera.look_at(settings.target);
        let controls = settings
            .orbit_controls
            .then(|| OrbitControls::from_camera(&self.camera));

        self.clock.reset();
        self.last_seconds = None;
        self.last_frame = None;
        self.attachment = Some(Attachment {
            surface,
            controls,
        });
        self.lifecycle = Lifecycle::Attached;
        tracing::debug!(
            width = size.width,
            height = size.height,
            orbit = settings.orbit_controls,
            "orchestrator attached"
        );
        Ok(())
    }

    /// Re-reads the surface layout box and propagates it.
    pub fn on_resize(&mut self) -> Result<SurfaceSize, OrchestratorError> {
        self.ensure_attached()?;
        let Some(attachment) = self.attachment.as_ref() else {
            return Err(OrchestratorError::NotAttached);
        };
        let size = attachment.surface.layout_size();
        let pixel_ratio = attachment.surface.pixel_ratio();

        self.backend.set_pixel_ratio(pixel_ratio);
        self.apply_size(size)?;
        tracing::debug!(width = size.width, height = size.height, "surface resized");
        Ok(size)
    }

    /// Records a pointer move given as an offset from the surface's top-left corner.
    ///
    /// The offset is normalized against the surface's current layout box, so
    /// a move that arrives before a pending resize still lands correctly.
    pub fn on_pointer_move(&mut self, offset: Vec2) -> Result<PointerPosition, OrchestratorError> {
        self.ensure_attached()?;
        let Some(attachment) = self.attachment.as_mut() else {
            return Err(OrchestratorError::NotAttached);
        };
        let size = attachment.surface.layout_size();
        let position = PointerPosition::from_offset(offset, size);
        let bindings = &self.config.bindings;
        self.registry
            .set(&bindings.pointer, position.in_space(bindings.pointer_space))?;

        self.pointer.handle_moved(position);
        let drag = self.pointer.take_drag_delta();
        if let Some(controls) = attachment.controls.as_mut() {
            if drag != Vec2::ZERO {
                controls.rotate(drag, size.height);
            }
        }
        tracing::trace!(x = offset.x, y = offset.y, "pointer moved");
        Ok(position)
    }

    pub fn on_pointer_button(&mut self, pressed: bool) -> Result<(), OrchestratorError> {
        self.ensure_attached()?;
        self.pointer.handle_button(pressed);
        Ok(())
    }

    /// Wheel input; positive values zoom towards the orbit target.
    pub fn on_scroll(&mut self, delta: f32) -> Result<(), OrchestratorError> {
        self.ensure_attached()?;
        if let Some(controls) = self
            .attachment
            .as_mut()
            .and_then(|attachment| attachment.controls.as_mut())
        {
            controls.zoom(delta);
        }
        Ok(())
    }

    /// Pushes the clock into the registry, advances controls and renders once.
    pub fn tick(&mut self) -> Result<(), OrchestratorError> {
        self.ensure_attached()?;
        let sample = self.clock.sample();
        let delta = self
            .last_seconds
            .map_or(0.0, |last| (sample.seconds - last).max(0.0));
        self.last_seconds = Some(sample.seconds);
        let now = Instant::now();
        let frame_dt = self
            .last_frame
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.last_frame = Some(now);

        let bindings = &self.config.bindings;
        self.registry.set(&bindings.time, sample.seconds)?;
        if let Some(name) = bindings.time_delta.as_deref() {
            self.registry.set(name, delta)?;
        }
        if let Some(name) = bindings.frame.as_deref() {
            let frame = i32::try_from(sample.frame_index).unwrap_or(i32::MAX);
            self.registry.set(name, frame)?;
        }

        if let Some(controls) = self
            .attachment
            .as_mut()
            .and_then(|attachment| attachment.controls.as_mut())
        {
            controls.update(&mut self.camera, frame_dt);
        }

        self.backend
            .render(&self.scene, &self.camera, self.registry.get_all())?;
        tracing::trace!(
            time = sample.seconds,
            frame = sample.frame_index,
            "frame rendered"
        );
        Ok(())
    }

    /// Scheduled frame callback; stops without rendering once the loop is cancelled.
    pub fn animate(&mut self) -> Result<FrameStatus, OrchestratorError> {
        if self.frame_loop.is_cancelled() {
            return Ok(FrameStatus::Stopped);
        }
        self.tick()?;
        Ok(FrameStatus::Rendered)
    }

    /// Releases everything `initialize` set up. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.backend.dispose();
        self.scene.clear();
        self.pointer.clear();
        if self.attachment.take().is_some() {
            self.backend.detach();
        }
        self.lifecycle = Lifecycle::Disposed;
        self.frame_loop.cancel();
        tracing::debug!("orchestrator disposed");
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        self.scene.add(object)
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        self.scene.remove(id)
    }

    pub fn object_by_name(&self, name: &str) -> Option<(ObjectId, &SceneObject)> {
        self.scene.object_by_name(name)
    }

    pub fn object_by_id(&self, id: ObjectId) -> Option<&SceneObject> {
        self.scene.object_by_id(id)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn uniforms(&self) -> &UniformRegistry {
        &self.registry
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Cancellation token shared with whoever schedules [`Self::animate`].
    pub fn frame_loop(&self) -> FrameLoopHandle {
        self.frame_loop.clone()
    }

    pub fn surface(&self) -> Option<&B::Surface> {
        self.attachment.as_ref().map(|attachment| &attachment.surface)
    }

    /// True while orbit controls still have queued rotation to apply.
    pub fn needs_redraw(&self) -> bool {
        self.attachment
            .as_ref()
            .and_then(|attachment| attachment.controls.as_ref())
            .is_some_and(OrbitControls::is_settling)
    }

    fn ensure_attached(&self) -> Result<(), OrchestratorError> {
        match self.lifecycle {
            Lifecycle::Attached => Ok(()),
            Lifecycle::Uninitialized => Err(OrchestratorError::NotAttached),
            Lifecycle::Disposed => Err(OrchestratorError::Disposed),
        }
    }

    fn apply_size(&mut self, size: SurfaceSize) -> Result<(), OrchestratorError> {
        self.push_size(size)?;
        self.backend.set_size(size);
        Ok(())
    }

    /// Writes the resolution binding and camera aspect; nothing changes if the write fails.
    fn push_size(&mut self, size: SurfaceSize) -> Result<(), OrchestratorError> {
        self.registry.set(
            &self.config.bindings.resolution,
            Vec2::new(size.width, size.height),
        )?;
        self.camera.aspect = size.aspect();
        self.camera.update_projection_matrix();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use anyhow::anyhow;
    use glam::Vec3;
    use uniforms::{UniformEntry, UniformMap, UniformValue};

    use super::*;
    use crate::pointer::PointerSpace;
    use crate::runtime::{FixedTimeSource, TimeSample, TimeSource};

    #[derive(Default)]
    struct Recording {
        pixel_ratio: Option<f32>,
        sizes: Vec<SurfaceSize>,
        attached: bool,
        detached: bool,
        disposed: bool,
        renders: Vec<RenderedFrame>,
        fail_attach: bool,
    }

    struct RenderedFrame {
        objects: usize,
        time: Option<f32>,
        aspect: f32,
        camera_position: Vec3,
    }

    #[derive(Clone, Default)]
    struct RecordingBackend {
        log: Rc<RefCell<Recording>>,
    }

    impl RenderBackend for RecordingBackend {
        type Surface = FakeSurface;

        fn set_pixel_ratio(&mut self, ratio: f32) {
            self.log.borrow_mut().pixel_ratio = Some(ratio);
        }

        fn set_size(&mut self, size: SurfaceSize) {
            self.log.borrow_mut().sizes.push(size);
        }

        fn attach(&mut self, _surface: &FakeSurface) -> anyhow::Result<()> {
            let mut log = self.log.borrow_mut();
            if log.fail_attach {
                return Err(anyhow!("no adapter"));
            }
            log.attached = true;
            Ok(())
        }

        fn detach(&mut self) {
            let mut log = self.log.borrow_mut();
            log.attached = false;
            log.detached = true;
        }

        fn render(
            &mut self,
            scene: &Scene,
            camera: &PerspectiveCamera,
            uniforms: &UniformMap,
        ) -> anyhow::Result<()> {
            let time = uniforms
                .get("u_time")
                .and_then(|entry| entry.value().as_scalar());
            self.log.borrow_mut().renders.push(RenderedFrame {
                objects: scene.len(),
                time,
                aspect: camera.aspect,
                camera_position: camera.position(),
            });
            Ok(())
        }

        fn dispose(&mut self) {
            self.log.borrow_mut().disposed = true;
        }
    }

    #[derive(Clone)]
    struct FakeSurface {
        size: Rc<Cell<SurfaceSize>>,
        ratio: f32,
    }

    impl FakeSurface {
        fn new(width: f32, height: f32) -> Self {
            Self {
                size: Rc::new(Cell::new(SurfaceSize::new(width, height))),
                ratio: 2.0,
            }
        }
    }

    impl RenderSurface for FakeSurface {
        fn layout_size(&self) -> SurfaceSize {
            self.size.get()
        }

        fn pixel_ratio(&self) -> f32 {
            self.ratio
        }
    }

    struct ScriptedClock {
        times: Vec<f32>,
        frame: u64,
    }

    impl TimeSource for ScriptedClock {
        fn reset(&mut self) {
            self.frame = 0;
        }

        fn sample(&mut self) -> TimeSample {
            let index = (self.frame as usize).min(self.times.len() - 1);
            let sample = TimeSample::new(self.times[index], self.frame);
            self.frame += 1;
            sample
        }
    }

    fn registry() -> UniformRegistry {
        UniformRegistry::from_entries([
            ("u_time", UniformEntry::of(0.0_f32)),
            ("u_resolution", UniformEntry::of(Vec2::ZERO)),
            ("u_mouse", UniformEntry::of(Vec2::ZERO)),
        ])
        .unwrap()
    }

    fn orchestrator(
        config: OrchestratorConfig,
    ) -> (FrameOrchestrator<RecordingBackend>, Rc<RefCell<Recording>>) {
        let backend = RecordingBackend::default();
        let log = backend.log.clone();
        let orchestrator = FrameOrchestrator::with_time_source(
            backend,
            registry(),
            config,
            Box::new(FixedTimeSource::new(1.5)),
        );
        (orchestrator, log)
    }

    fn vec2(orchestrator: &FrameOrchestrator<RecordingBackend>, name: &str) -> Option<Vec2> {
        orchestrator.uniforms().get(name).ok().and_then(UniformValue::as_vec2)
    }

    #[test]
    fn attach_tick_and_pointer_feed_the_registry() {
        let (mut orchestrator, log) = orchestrator(OrchestratorConfig::default());
        orchestrator.add_object(SceneObject::shader_pass("backdrop", ""));
        orchestrator.initialize(FakeSurface::new(800.0, 600.0)).unwrap();

        assert_eq!(orchestrator.lifecycle(), Lifecycle::Attached);
        assert_eq!(vec2(&orchestrator, "u_resolution"), Some(Vec2::new(800.0, 600.0)));
        assert!((orchestrator.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(orchestrator.camera().position(), Vec3::splat(5.0));
        assert_eq!(log.borrow().pixel_ratio, Some(2.0));
        assert!(log.borrow().attached);

        orchestrator.tick().unwrap();
        assert_eq!(
            orchestrator.uniforms().get("u_time").unwrap().as_scalar(),
            Some(1.5)
        );

        let position = orchestrator.on_pointer_move(Vec2::new(400.0, 300.0)).unwrap();
        assert_eq!(position.device, Vec2::ZERO);
        assert_eq!(vec2(&orchestrator, "u_mouse"), Some(Vec2::new(0.5, 0.5)));

        let log = log.borrow();
        assert_eq!(log.renders.len(), 1);
        assert_eq!(log.renders[0].objects, 1);
        assert_eq!(log.renders[0].time, Some(1.5));
    }

    #[test]
    fn pointer_updates_mutate_the_bound_vector_in_place() {
        let (mut orchestrator, _) = orchestrator(OrchestratorConfig::default());
        orchestrator.initialize(FakeSurface::new(200.0, 100.0)).unwrap();
        let held = orchestrator.uniforms().get("u_mouse").unwrap().clone();

        orchestrator.on_pointer_move(Vec2::new(50.0, 25.0)).unwrap();
        assert_eq!(held.as_vec2(), Some(Vec2::new(0.25, 0.25)));
        assert!(orchestrator
            .uniforms()
            .get("u_mouse")
            .unwrap()
            .shares_storage(&held));
    }

    #[test]
    fn pointer_space_is_a_deployment_setting() {
        let mut config = OrchestratorConfig::default();
        config.bindings.pointer_space = PointerSpace::Device;
        let (mut device, _) = orchestrator(config);
        device.initialize(FakeSurface::new(800.0, 600.0)).unwrap();
        device.on_pointer_move(Vec2::new(0.0, 600.0)).unwrap();
        assert_eq!(vec2(&device, "u_mouse"), Some(Vec2::new(-1.0, -1.0)));

        let mut config = OrchestratorConfig::default();
        config.bindings.pointer_space = PointerSpace::Raw;
        let (mut raw, _) = orchestrator(config);
        raw.initialize(FakeSurface::new(800.0, 600.0)).unwrap();
        raw.on_pointer_move(Vec2::new(12.0, 34.0)).unwrap();
        assert_eq!(vec2(&raw, "u_mouse"), Some(Vec2::new(12.0, 34.0)));
    }

    #[test]
    fn pointer_uses_the_current_layout_box_before_resize_is_handled() {
        let (mut orchestrator, _) = orchestrator(OrchestratorConfig::default());
        let surface = FakeSurface::new(800.0, 600.0);
        let handle = surface.size.clone();
        orchestrator.initialize(surface).unwrap();

        handle.set(SurfaceSize::new(400.0, 300.0));
        let position = orchestrator.on_pointer_move(Vec2::new(200.0, 150.0)).unwrap();
        assert_eq!(position.normalized, Vec2::new(0.5, 0.5));
        assert_eq!(vec2(&orchestrator, "u_mouse"), Some(Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn resize_repeats_the_size_propagation() {
        let (mut orchestrator, log) = orchestrator(OrchestratorConfig::default());
        let surface = FakeSurface::new(800.0, 600.0);
        let handle = surface.size.clone();
        orchestrator.initialize(surface).unwrap();

        handle.set(SurfaceSize::new(1000.0, 500.0));
        let size = orchestrator.on_resize().unwrap();
        assert_eq!(size, SurfaceSize::new(1000.0, 500.0));
        assert_eq!(vec2(&orchestrator, "u_resolution"), Some(Vec2::new(1000.0, 500.0)));
        assert_eq!(orchestrator.camera().aspect, 2.0);

        orchestrator.on_resize().unwrap();
        assert_eq!(vec2(&orchestrator, "u_resolution"), Some(Vec2::new(1000.0, 500.0)));
        assert_eq!(log.borrow().sizes.last(), Some(&SurfaceSize::new(1000.0, 500.0)));

        orchestrator.on_pointer_move(Vec2::new(500.0, 250.0)).unwrap();
        assert_eq!(vec2(&orchestrator, "u_mouse"), Some(Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn detached_orchestrator_ignores_events() {
        let (mut orchestrator, log) = orchestrator(OrchestratorConfig::default());
        assert!(matches!(orchestrator.tick(), Err(OrchestratorError::NotAttached)));
        assert!(matches!(
            orchestrator.on_pointer_move(Vec2::ONE),
            Err(OrchestratorError::NotAttached)
        ));
        assert!(matches!(orchestrator.on_resize(), Err(OrchestratorError::NotAttached)));
        assert!(log.borrow().renders.is_empty());
        assert_eq!(vec2(&orchestrator, "u_mouse"), Some(Vec2::ZERO));
    }

    #[test]
    fn failed_attach_leaves_nothing_bound() {
        let (mut orchestrator, log) = orchestrator(OrchestratorConfig::default());
        log.borrow_mut().fail_attach = true;
        let err = orchestrator.initialize(FakeSurface::new(800.0, 600.0)).unwrap_err();
        assert!(matches!(err, OrchestratorError::Backend(_)));
        assert_eq!(orchestrator.lifecycle(), Lifecycle::Uninitialized);
        assert!(orchestrator.surface().is_none());
        assert_eq!(vec2(&orchestrator, "u_resolution"), Some(Vec2::ZERO));
        assert_eq!(orchestrator.camera().aspect, 1.0);

        log.borrow_mut().fail_attach = false;
        orchestrator.initialize(FakeSurface::new(800.0, 600.0)).unwrap();
        assert!(matches!(
            orchestrator.initialize(FakeSurface::new(1.0, 1.0)),
            Err(OrchestratorError::AlreadyAttached)
        ));
    }

    #[test]
    fn missing_resolution_binding_detaches_again() {
        let backend = RecordingBackend::default();
        let log = backend.log.clone();
        let registry =
            UniformRegistry::from_entries([("u_time", UniformEntry::of(0.0_f32))]).unwrap();
        let mut orchestrator =
            FrameOrchestrator::new(backend, registry, OrchestratorConfig::default());

        let err = orchestrator.initialize(FakeSurface::new(800.0, 600.0)).unwrap_err();
        assert!(matches!(err, OrchestratorError::Uniform(UniformError::UnknownParameter(_))));
        assert_eq!(orchestrator.lifecycle(), Lifecycle::Uninitialized);
        assert_eq!(orchestrator.camera().aspect, 1.0);
        assert!(log.borrow().detached);
        assert!(!log.borrow().attached);
    }

    #[test]
    fn missing_binding_surfaces_the_registry_error() {
        let backend = RecordingBackend::default();
        let registry =
            UniformRegistry::from_entries([("u_resolution", UniformEntry::of(Vec2::ZERO))]).unwrap();
        let mut orchestrator =
            FrameOrchestrator::new(backend, registry, OrchestratorConfig::default());
        orchestrator.initialize(FakeSurface::new(10.0, 10.0)).unwrap();
        let err = orchestrator.tick().unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Uniform(UniformError::UnknownParameter(ref name)) if name == "u_time"
        ));
    }

    #[test]
    fn optional_delta_and_frame_bindings() {
        let mut config = OrchestratorConfig::default();
        config.bindings.time_delta = Some("u_delta".into());
        config.bindings.frame = Some("u_frame".into());
        let registry = UniformRegistry::from_entries([
            ("u_time", UniformEntry::of(0.0_f32)),
            ("u_delta", UniformEntry::of(0.0_f32)),
            ("u_frame", UniformEntry::of(0_i32)),
            ("u_resolution", UniformEntry::of(Vec2::ZERO)),
            ("u_mouse", UniformEntry::of(Vec2::ZERO)),
        ])
        .unwrap();
        let clock = ScriptedClock {
            times: vec![1.0, 1.25],
            frame: 0,
        };
        let mut orchestrator = FrameOrchestrator::with_time_source(
            RecordingBackend::default(),
            registry,
            config,
            Box::new(clock),
        );
        orchestrator.initialize(FakeSurface::new(10.0, 10.0)).unwrap();

        orchestrator.tick().unwrap();
        assert_eq!(orchestrator.uniforms().get("u_delta").unwrap().as_scalar(), Some(0.0));
        assert_eq!(orchestrator.uniforms().get("u_frame").unwrap().as_integer(), Some(0));

        orchestrator.tick().unwrap();
        assert_eq!(orchestrator.uniforms().get("u_delta").unwrap().as_scalar(), Some(0.25));
        assert_eq!(orchestrator.uniforms().get("u_frame").unwrap().as_integer(), Some(1));
    }

    #[test]
    fn cancelled_frame_loop_stops_rendering() {
        let (mut orchestrator, log) = orchestrator(OrchestratorConfig::default());
        orchestrator.initialize(FakeSurface::new(800.0, 600.0)).unwrap();
        assert_eq!(orchestrator.animate().unwrap(), FrameStatus::Rendered);

        orchestrator.frame_loop().cancel();
        assert_eq!(orchestrator.animate().unwrap(), FrameStatus::Stopped);
        assert_eq!(log.borrow().renders.len(), 1);
    }

    #[test]
    fn dispose_tears_down_and_rejects_reuse() {
        let (mut orchestrator, log) = orchestrator(OrchestratorConfig::default());
        let id = orchestrator.add_object(SceneObject::shader_pass("backdrop", ""));
        orchestrator.initialize(FakeSurface::new(800.0, 600.0)).unwrap();
        let frame_loop = orchestrator.frame_loop();

        orchestrator.dispose();
        assert_eq!(orchestrator.lifecycle(), Lifecycle::Disposed);
        assert!(frame_loop.is_cancelled());
        assert!(orchestrator.object_by_id(id).is_none());
        assert!(orchestrator.surface().is_none());
        {
            let log = log.borrow();
            assert!(log.disposed);
            assert!(log.detached);
            assert!(!log.attached);
        }

        assert!(matches!(orchestrator.tick(), Err(OrchestratorError::Disposed)));
        assert!(matches!(orchestrator.on_resize(), Err(OrchestratorError::Disposed)));
        assert!(matches!(
            orchestrator.on_pointer_move(Vec2::ONE),
            Err(OrchestratorError::Disposed)
        ));
        assert!(matches!(
            orchestrator.initialize(FakeSurface::new(800.0, 600.0)),
            Err(OrchestratorError::Disposed)
        ));
        assert_eq!(orchestrator.animate().unwrap(), FrameStatus::Stopped);
        assert!(log.borrow().renders.is_empty());
    }

    #[test]
    fn orbit_drag_moves_the_camera() {
        let mut config = OrchestratorConfig::default();
        config.camera.orbit_controls = true;
        let (mut orchestrator, log) = orchestrator(config);
        orchestrator.initialize(FakeSurface::new(800.0, 600.0)).unwrap();

        orchestrator.on_pointer_move(Vec2::new(100.0, 100.0)).unwrap();
        orchestrator.on_pointer_button(true).unwrap();
        orchestrator.on_pointer_move(Vec2::new(300.0, 100.0)).unwrap();
        orchestrator.on_pointer_button(false).unwrap();
        orchestrator.on_scroll(2.0).unwrap();

        assert!(orchestrator.needs_redraw());

        // The uniform clock is fixed; rotation follows wall-clock frame time.
        orchestrator.tick().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(50));
        orchestrator.tick().unwrap();
        let log = log.borrow();
        let first = log.renders[0].camera_position;
        let second = log.renders[1].camera_position;
        assert!((first.length() - Vec3::splat(5.0).length()).abs() > 1e-3);
        assert!((second.normalize() - first.normalize()).length() > 1e-2);
        assert!((second.y - first.y).abs() < 1e-3);
        assert_eq!(log.renders[1].aspect, 800.0 / 600.0);
    }

    #[test]
    fn scene_pass_through() {
        let (mut orchestrator, _) = orchestrator(OrchestratorConfig::default());
        let id = orchestrator.add_object(SceneObject::shader_pass("overlay", ""));
        assert_eq!(orchestrator.object_by_name("overlay").map(|(found, _)| found), Some(id));
        assert_eq!(orchestrator.remove_object(id).map(|object| object.name), Some("overlay".into()));
        assert!(orchestrator.scene().is_empty());
    }
}
