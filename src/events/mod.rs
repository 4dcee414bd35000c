pub mod scroll;
pub mod touch;

pub use scroll::wire_progress_source;
pub use touch::wire_touch_momentum;

use crate::audio::AudioDriver;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub(crate) fn add_listener(
    target: &web::EventTarget,
    event: &str,
    passive: bool,
    closure: &Closure<dyn FnMut(web::Event)>,
) {
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(passive);
    if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &opts,
    ) {
        log::error!("listener {} error: {:?}", event, e);
    }
}

/// Release audio synchronously when the page goes away.
pub fn wire_pagehide(window: &web::Window, audio: Rc<RefCell<AudioDriver>>) {
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        if let Ok(mut a) = audio.try_borrow_mut() {
            a.force_stop();
        }
    }) as Box<dyn FnMut(web::Event)>);
    add_listener(window, "pagehide", false, &closure);
    closure.forget();
}
