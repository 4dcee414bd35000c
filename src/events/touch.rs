use super::add_listener;
use crate::core::{TouchMomentum, TouchTuning, FRAME_MS_60HZ};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn first_touch_y(ev: &web::Event) -> Option<f32> {
    let ev = ev.dyn_ref::<web::TouchEvent>()?;
    let touch = ev.touches().get(0).or_else(|| ev.changed_touches().get(0))?;
    Some(touch.client_y() as f32)
}

fn scroll_by(dy: f32) {
    if let Some(w) = web::window() {
        w.scroll_by_with_x_and_y(0.0, dy as f64);
    }
}

/// Drive the page's scroll position from touch drags with a friction glide
/// after release. Progress is still read back from the native scroll.
pub fn wire_touch_momentum(window: &web::Window, tuning: TouchTuning) {
    let momentum = Rc::new(RefCell::new(TouchMomentum::new(tuning)));
    let gliding = Rc::new(Cell::new(false));
    let last_step = Rc::new(Cell::new(Instant::now()));

    // Self-rescheduling glide loop, stopped when momentum runs out.
    let glide: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    {
        let glide_next = glide.clone();
        let momentum = momentum.clone();
        let gliding = gliding.clone();
        let last_step = last_step.clone();
        *glide.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let now = Instant::now();
            let dt_ms = (now - last_step.get()).as_secs_f64() * 1000.0;
            last_step.set(now);
            let step = momentum
                .borrow_mut()
                .step((dt_ms / FRAME_MS_60HZ) as f32);
            match step {
                Some(dy) => {
                    scroll_by(dy);
                    if let (Some(w), Some(cb)) = (web::window(), glide_next.borrow().as_ref()) {
                        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
                    }
                }
                None => {
                    gliding.set(false);
                    log::debug!("[touch] glide stopped");
                }
            }
        }) as Box<dyn FnMut()>));
    }

    let on_start = {
        let momentum = momentum.clone();
        Closure::wrap(Box::new(move |ev: web::Event| {
            if let Some(y) = first_touch_y(&ev) {
                momentum.borrow_mut().touch_start(y, Instant::now());
            }
        }) as Box<dyn FnMut(web::Event)>)
    };
    let on_move = {
        let momentum = momentum.clone();
        Closure::wrap(Box::new(move |ev: web::Event| {
            let Some(y) = first_touch_y(&ev) else {
                return;
            };
            ev.prevent_default();
            let dy = momentum.borrow_mut().touch_move(y, Instant::now());
            if dy != 0.0 {
                scroll_by(dy);
            }
        }) as Box<dyn FnMut(web::Event)>)
    };
    let on_end = {
        let momentum = momentum.clone();
        let glide = glide.clone();
        Closure::wrap(Box::new(move |_ev: web::Event| {
            momentum.borrow_mut().touch_end(Instant::now());
            if !momentum.borrow().is_gliding() || gliding.get() {
                return;
            }
            gliding.set(true);
            last_step.set(Instant::now());
            if let (Some(w), Some(cb)) = (web::window(), glide.borrow().as_ref()) {
                _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }) as Box<dyn FnMut(web::Event)>)
    };

    add_listener(window, "touchstart", true, &on_start);
    // Non-passive so the native scroll can be suppressed.
    add_listener(window, "touchmove", false, &on_move);
    add_listener(window, "touchend", true, &on_end);
    add_listener(window, "touchcancel", true, &on_end);
    on_start.forget();
    on_move.forget();
    on_end.forget();
}
