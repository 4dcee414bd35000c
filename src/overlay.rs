use crate::constants::*;
use crate::core::ease::local_progress;
use crate::core::{
    outro_fade, EngineState, SceneId, SceneTimeline, SCROLL_HINT_FADE_END, TITLE_FADE_END,
};
use crate::dom;
use web_sys as web;

/// Cached handles to the text layer: title, scene captions, scroll hint,
/// progress bar, outro veil. Missing elements are skipped every frame.
pub struct TextLayer {
    title: Option<web::HtmlElement>,
    hint: Option<web::HtmlElement>,
    bar: Option<web::HtmlElement>,
    veil: Option<web::HtmlElement>,
    captions: Vec<(SceneId, web::HtmlElement)>,
    last_progress: f32,
}

impl TextLayer {
    pub fn new(document: &web::Document) -> Self {
        let captions = SceneId::ALL
            .iter()
            .filter_map(|id| dom::html_element(document, id.caption_id()).map(|el| (*id, el)))
            .collect::<Vec<_>>();
        if captions.len() < SceneId::COUNT {
            log::warn!(
                "[overlay] {} of {} captions present",
                captions.len(),
                SceneId::COUNT
            );
        }
        Self {
            title: dom::html_element(document, TITLE_ID),
            hint: dom::html_element(document, SCROLL_HINT_ID),
            bar: dom::html_element(document, PROGRESS_BAR_ID),
            veil: dom::html_element(document, OUTRO_VEIL_ID),
            captions,
            last_progress: -1.0,
        }
    }

    /// Fade captions on the visual timeline. Skipped when progress is unchanged.
    pub fn update(&mut self, progress: f32, timeline: &SceneTimeline) {
        if (progress - self.last_progress).abs() < 1e-5 {
            return;
        }
        self.last_progress = progress;
        if let Some(el) = &self.title {
            dom::set_opacity(el, 1.0 - local_progress(progress, 0.0, TITLE_FADE_END));
        }
        if let Some(el) = &self.hint {
            dom::set_opacity(el, 1.0 - local_progress(progress, 0.0, SCROLL_HINT_FADE_END));
        }
        if let Some(el) = &self.bar {
            _ = el
                .style()
                .set_property("width", &format!("{:.2}%", progress * 100.0));
        }
        if let Some(el) = &self.veil {
            dom::set_opacity(el, outro_fade(progress));
        }
        for (id, el) in &self.captions {
            dom::set_opacity(el, timeline.visibility(*id, progress));
        }
    }
}

/// Reflect engine state on the sound toggle.
pub fn update_audio_toggle(document: &web::Document, state: EngineState, disabled: bool) {
    if let Some(el) = document.get_element_by_id(AUDIO_TOGGLE_ID) {
        let (label, pressed) = if disabled {
            (AUDIO_LABEL_UNAVAILABLE, "false")
        } else {
            match state {
                EngineState::Starting | EngineState::Playing => (AUDIO_LABEL_ON, "true"),
                EngineState::Stopping | EngineState::Idle => (AUDIO_LABEL_OFF, "false"),
            }
        };
        el.set_text_content(Some(label));
        _ = el.set_attribute("aria-pressed", pressed);
        let cl = el.class_list();
        if disabled {
            _ = cl.add_1("inert");
        } else {
            _ = cl.remove_1("inert");
        }
    }
}
