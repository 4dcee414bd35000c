use super::add_listener;
use crate::audio::AudioDriver;
use crate::core::{scroll_progress, ProgressTracker};
use crate::dom;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// The only writer of the shared progress value. Scroll and resize events
/// are coalesced to one read of the scroll position per animation frame.
pub fn wire_progress_source(
    window: &web::Window,
    progress: Rc<Cell<f32>>,
    audio: Option<Rc<RefCell<AudioDriver>>>,
) {
    let tracker = Rc::new(RefCell::new(ProgressTracker::default()));

    let publish = {
        let tracker = tracker.clone();
        move |raw: f32, from_frame: bool| {
            let published = {
                let mut t = tracker.borrow_mut();
                if from_frame {
                    t.on_frame(raw)
                } else {
                    t.publish(raw)
                }
            };
            if let Some(p) = published {
                progress.set(p);
                log::debug!("[progress] {:.4}", p);
                if let Some(a) = audio.as_ref() {
                    if let Ok(mut a) = a.try_borrow_mut() {
                        a.set_progress(p);
                    }
                }
            }
        }
    };
    let read_raw = || {
        web::window()
            .and_then(|w| dom::scroll_metrics(&w))
            .map(|(top, height, viewport)| scroll_progress(top, height, viewport))
            .unwrap_or(0.0)
    };

    // Initial sample always publishes.
    publish(read_raw(), false);

    let on_frame: Rc<Closure<dyn FnMut()>> = Rc::new(Closure::wrap(Box::new(move || {
        publish(read_raw(), true);
    }) as Box<dyn FnMut()>));

    let on_event = {
        let tracker = tracker.clone();
        let on_frame = on_frame.clone();
        Closure::wrap(Box::new(move |_ev: web::Event| {
            if !tracker.borrow_mut().request_frame() {
                return;
            }
            if let Some(w) = web::window() {
                _ = w.request_animation_frame((*on_frame).as_ref().unchecked_ref());
            }
        }) as Box<dyn FnMut(web::Event)>)
    };
    add_listener(window, "scroll", true, &on_event);
    add_listener(window, "resize", true, &on_event);
    on_event.forget();
}
