use crate::core::{CameraPath, CameraRig, ParticleSystems, SceneTimeline};
use crate::dom;
use crate::overlay::TextLayer;
use crate::overlay2d::Overlay2d;
use crate::render::{self, GpuState, ParticleInstance};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything the animation frame touches. Progress is read, never written.
pub struct FrameContext<'a> {
    pub progress: Rc<Cell<f32>>,
    pub visual: SceneTimeline,
    pub overlay_timeline: SceneTimeline,
    pub path: CameraPath,
    pub rig: CameraRig,
    pub compact: bool,
    pub max_pixel_ratio: f64,

    pub systems: ParticleSystems,
    pub instances: Vec<ParticleInstance>,
    pub gl_canvas: web::HtmlCanvasElement,
    pub gpu: Option<GpuState<'a>>,

    pub overlay: Overlay2d,
    pub text: TextLayer,

    pub started: Instant,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        let time_sec = (now - self.started).as_secs_f32();
        let progress = self.progress.get();

        let target = self.path.pose_at(progress, self.compact);
        let pose = self.rig.step(target, self.path.is_title(progress));

        if let Some(g) = &mut self.gpu {
            self.systems.update(progress, &self.visual, time_sec);
            render::pack_instances(self.systems.visible_instances(), &mut self.instances);
            g.set_camera(pose);
            dom::sync_canvas_backing_size(&self.gl_canvas, self.max_pixel_ratio);
            g.resize_if_needed(self.gl_canvas.width(), self.gl_canvas.height());
            if let Err(e) = g.render(dt_sec, progress, &self.instances) {
                log::error!("[gpu] render error: {:?}", e);
            }
        }

        // Resize rebuilds overlay geometry before it draws again.
        if dom::sync_canvas_backing_size(self.overlay.canvas(), self.max_pixel_ratio) {
            self.overlay.resize();
        }
        self.overlay.frame(progress, &self.overlay_timeline);
        self.text.update(progress, &self.visual);
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    initial_instances: usize,
) -> Option<GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match GpuState::new(leaked_canvas, initial_instances).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::warn!("[gpu] WebGPU unavailable, using static backdrop: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
