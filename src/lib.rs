#![cfg(target_arch = "wasm32")]
use crate::core::{
    AudioConfigTable, CameraPath, CameraRig, GranularEngine, OverlayState, ParticleSystems,
    RenderQuality, SceneTimeline, TouchTuning,
};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod overlay;
mod overlay2d;
mod render;

use constants::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("scroll-narrative starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Visual tuning can be switched with `?tuning=alternate` for side-by-side review.
fn visual_timeline(window: &web::Window) -> anyhow::Result<SceneTimeline> {
    let alternate = window
        .location()
        .search()
        .map(|s| s.contains("tuning=alternate"))
        .unwrap_or(false);
    if alternate {
        log::info!("[timeline] alternate visual tuning");
        Ok(SceneTimeline::visual_alternate()?)
    } else {
        Ok(SceneTimeline::visual()?)
    }
}

fn wire_audio_toggle(document: &web::Document, driver: Rc<RefCell<audio::AudioDriver>>) {
    overlay::update_audio_toggle(document, driver.borrow().state(), false);
    let doc = document.clone();
    dom::add_click_listener(document, AUDIO_TOGGLE_ID, move || {
        let Ok(mut d) = driver.try_borrow_mut() else {
            return;
        };
        d.toggle();
        overlay::update_audio_toggle(&doc, d.state(), d.is_disabled());
    });
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let compact = dom::detect_compact(&window);
    let quality = RenderQuality::for_device(compact);
    log::info!(
        "[timeline] compact={} particle_scale={}",
        compact,
        quality.particle_scale
    );

    let visual = visual_timeline(&window)?;
    let overlay_timeline = SceneTimeline::overlay()?;
    let audio_timeline = SceneTimeline::audio()?;
    let path = CameraPath::narrative()?;
    let table = AudioConfigTable::narrative()?;

    // Single writer: the progress source below.
    let progress = Rc::new(Cell::new(0.0_f32));

    let engine = GranularEngine::new(
        audio::WebAudioPlatform,
        table,
        audio_timeline,
        quality,
        GRAIN_SEED,
    );
    let driver = audio::AudioDriver::new(engine);
    wire_audio_toggle(&document, driver.clone());
    events::wire_pagehide(&window, driver.clone());
    events::wire_progress_source(&window, progress.clone(), Some(driver));
    // Mouse and trackpad users keep native scrolling.
    if dom::has_coarse_pointer(&window) {
        events::wire_touch_momentum(&window, TouchTuning::default());
        log::info!("[init] touch momentum enabled");
    }

    let gl_canvas = dom::canvas_by_id(&document, GL_CANVAS_ID)?;
    let overlay_canvas = dom::canvas_by_id(&document, OVERLAY_CANVAS_ID)?;
    dom::sync_canvas_backing_size(&gl_canvas, quality.max_pixel_ratio);
    dom::sync_canvas_backing_size(&overlay_canvas, quality.max_pixel_ratio);

    let systems = ParticleSystems::new(&quality, PARTICLE_SEED);
    let total = systems.total_particles();
    let gpu = frame::init_gpu(&gl_canvas, total).await;
    if gpu.is_none() {
        dom::apply_fallback_background(&gl_canvas);
    }

    let state = OverlayState::new(
        &quality,
        overlay_canvas.width() as f32,
        overlay_canvas.height() as f32,
    );
    let now = Instant::now();
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        progress,
        visual,
        overlay_timeline,
        path,
        rig: CameraRig::new(),
        compact,
        max_pixel_ratio: quality.max_pixel_ratio,
        systems,
        instances: Vec::with_capacity(total),
        gl_canvas,
        gpu,
        overlay: overlay2d::Overlay2d::new(overlay_canvas, state),
        text: overlay::TextLayer::new(&document),
        started: now,
        last_instant: now,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
