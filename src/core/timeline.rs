use super::constants::{
    AUDIO_TRANSITION_WIDTH, MAX_TRANSITION_WIDTH, OUTRO_FADE_START, OVERLAY_TRANSITION_WIDTH,
    VISUAL_TRANSITION_WIDTH,
};
use super::ease::{clamp01, local_progress};
use super::scene::SceneId;
use smallvec::{smallvec, SmallVec};

/// Outro veil opacity; 0 until `OUTRO_FADE_START`, exactly 1 at the end.
#[inline]
pub fn outro_fade(progress: f32) -> f32 {
    local_progress(progress, OUTRO_FADE_START, 1.0)
}

/// Half-open interval `[enter_at, exit_at)` of global progress during which a
/// scene is on stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneWindow {
    pub id: SceneId,
    pub enter_at: f32,
    pub exit_at: f32,
}

impl SceneWindow {
    pub const fn new(id: SceneId, enter_at: f32, exit_at: f32) -> Self {
        Self {
            id,
            enter_at,
            exit_at,
        }
    }

    #[inline]
    pub fn span(&self) -> f32 {
        self.exit_at - self.enter_at
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TimelineError {
    #[error("timeline has no windows")]
    Empty,
    #[error("transition width {0} is outside (0, {}]", MAX_TRANSITION_WIDTH)]
    BadTransitionWidth(f32),
    #[error("window {0:?} exits at or before it enters")]
    EmptyWindow(SceneId),
    #[error("window {0:?} enters before the window preceding it")]
    Unordered(SceneId),
    #[error("gap of {gap:.3} before {id:?} exceeds the transition width")]
    Gap { id: SceneId, gap: f32 },
    #[error("{id:?} overlaps its predecessor by {overlap:.3}, more than the transition width")]
    Overlap { id: SceneId, overlap: f32 },
    #[error("last window exits at {0:.3}; timeline must reach the end of the page")]
    ShortTail(f32),
}

/// Result of resolving a progress value against a timeline: one active scene,
/// or the active scene blending towards its successor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneBlend {
    pub scene: SceneId,
    pub next: Option<SceneId>,
    /// 0 on the stable zone, rising monotonically to 1 across the band.
    pub blend: f32,
}

impl SceneBlend {
    fn stable(scene: SceneId) -> Self {
        Self {
            scene,
            next: None,
            blend: 0.0,
        }
    }

    #[inline]
    pub fn is_transition(&self) -> bool {
        self.next.is_some()
    }

    /// Whichever of the two scenes carries the larger weight.
    pub fn dominant(&self) -> SceneId {
        match self.next {
            Some(next) if self.blend >= 0.5 => next,
            _ => self.scene,
        }
    }

    /// Per-scene weights summing to 1.
    pub fn weights(&self) -> SmallVec<[(SceneId, f32); 2]> {
        match self.next {
            Some(next) => smallvec![(self.scene, 1.0 - self.blend), (next, self.blend)],
            None => smallvec![(self.scene, 1.0)],
        }
    }
}

/// Declarative table of scene windows. Consumers (camera, particles, overlay,
/// audio) each own one, so their boundaries can be staggered independently.
#[derive(Clone, Debug)]
pub struct SceneTimeline {
    windows: Vec<SceneWindow>,
    transition_width: f32,
}

impl SceneTimeline {
    pub fn new(windows: Vec<SceneWindow>, transition_width: f32) -> Result<Self, TimelineError> {
        if windows.is_empty() {
            return Err(TimelineError::Empty);
        }
        if !(transition_width > 0.0 && transition_width <= MAX_TRANSITION_WIDTH) {
            return Err(TimelineError::BadTransitionWidth(transition_width));
        }
        for (i, w) in windows.iter().enumerate() {
            if w.exit_at <= w.enter_at {
                return Err(TimelineError::EmptyWindow(w.id));
            }
            if i == 0 {
                continue;
            }
            let prev = &windows[i - 1];
            if w.enter_at < prev.enter_at {
                return Err(TimelineError::Unordered(w.id));
            }
            let gap = w.enter_at - prev.exit_at;
            if gap > transition_width + 1e-6 {
                return Err(TimelineError::Gap { id: w.id, gap });
            }
            // Neighbours may share at most one transition band.
            let overlap = prev.exit_at - w.enter_at;
            if overlap > transition_width + 1e-6 {
                return Err(TimelineError::Overlap { id: w.id, overlap });
            }
        }
        let last_exit = windows[windows.len() - 1].exit_at;
        if last_exit < 1.0 - transition_width {
            return Err(TimelineError::ShortTail(last_exit));
        }
        Ok(Self {
            windows,
            transition_width,
        })
    }

    /// Canonical visual timeline (camera, particles, captions).
    pub fn visual() -> Result<Self, TimelineError> {
        Self::new(
            vec![
                SceneWindow::new(SceneId::Inventory, 0.03, 0.20),
                SceneWindow::new(SceneId::Decision, 0.18, 0.38),
                SceneWindow::new(SceneId::Assembly, 0.36, 0.56),
                SceneWindow::new(SceneId::Verification, 0.54, 0.76),
                SceneWindow::new(SceneId::Outcome, 0.74, 1.0),
            ],
            VISUAL_TRANSITION_WIDTH,
        )
    }

    /// Alternate tuning with a longer Decision window and wider bands. Kept as
    /// data; the canonical choreography uses [`SceneTimeline::visual`].
    pub fn visual_alternate() -> Result<Self, TimelineError> {
        Self::new(
            vec![
                SceneWindow::new(SceneId::Inventory, 0.03, 0.18),
                SceneWindow::new(SceneId::Decision, 0.14, 0.42),
                SceneWindow::new(SceneId::Assembly, 0.38, 0.58),
                SceneWindow::new(SceneId::Verification, 0.54, 0.78),
                SceneWindow::new(SceneId::Outcome, 0.74, 1.0),
            ],
            0.04,
        )
    }

    /// Gating for the 2D overlay, trailing the 3D scene slightly.
    pub fn overlay() -> Result<Self, TimelineError> {
        Self::new(
            vec![
                SceneWindow::new(SceneId::Inventory, 0.04, 0.19),
                SceneWindow::new(SceneId::Decision, 0.17, 0.37),
                SceneWindow::new(SceneId::Assembly, 0.35, 0.55),
                SceneWindow::new(SceneId::Verification, 0.53, 0.75),
                SceneWindow::new(SceneId::Outcome, 0.73, 1.0),
            ],
            OVERLAY_TRANSITION_WIDTH,
        )
    }

    /// Audio choreography: leads the visuals in and lags them out.
    pub fn audio() -> Result<Self, TimelineError> {
        Self::new(
            vec![
                SceneWindow::new(SceneId::Inventory, 0.0, 0.21),
                SceneWindow::new(SceneId::Decision, 0.18, 0.40),
                SceneWindow::new(SceneId::Assembly, 0.37, 0.58),
                SceneWindow::new(SceneId::Verification, 0.55, 0.78),
                SceneWindow::new(SceneId::Outcome, 0.75, 1.0),
            ],
            AUDIO_TRANSITION_WIDTH,
        )
    }

    #[inline]
    pub fn windows(&self) -> &[SceneWindow] {
        &self.windows
    }

    #[inline]
    pub fn transition_width(&self) -> f32 {
        self.transition_width
    }

    pub fn window(&self, id: SceneId) -> Option<&SceneWindow> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn resolve(&self, progress: f32) -> SceneBlend {
        let p = clamp01(progress);
        let width = self.transition_width;
        let first = &self.windows[0];
        if p < first.enter_at {
            return SceneBlend::stable(first.id);
        }
        for (i, w) in self.windows.iter().enumerate() {
            let band_start = w.exit_at - width;
            if p < band_start {
                return SceneBlend::stable(w.id);
            }
            if p < w.exit_at {
                return match self.windows.get(i + 1) {
                    Some(next) if p >= next.enter_at => SceneBlend {
                        scene: w.id,
                        next: Some(next.id),
                        blend: clamp01((p - band_start) / width),
                    },
                    _ => SceneBlend::stable(w.id),
                };
            }
        }
        SceneBlend::stable(self.windows[self.windows.len() - 1].id)
    }

    /// Progress through a scene's own window, clamped to [0,1]. Scenes absent
    /// from this timeline report 0.
    pub fn local_progress(&self, id: SceneId, progress: f32) -> f32 {
        match self.window(id) {
            Some(w) => local_progress(clamp01(progress), w.enter_at, w.exit_at),
            None => 0.0,
        }
    }

    /// Group opacity for a scene: fades in across the band after it enters
    /// and out across the band before it exits. The last scene holds through
    /// the end of the page.
    pub fn visibility(&self, id: SceneId, progress: f32) -> f32 {
        let p = clamp01(progress);
        let Some(idx) = self.windows.iter().position(|w| w.id == id) else {
            return 0.0;
        };
        let w = &self.windows[idx];
        let is_last = idx + 1 == self.windows.len();
        if p < w.enter_at || (p >= w.exit_at && !is_last) {
            return 0.0;
        }
        let fade_in = clamp01((p - w.enter_at) / self.transition_width);
        let fade_out = if is_last {
            1.0
        } else {
            clamp01((w.exit_at - p) / self.transition_width)
        };
        fade_in.min(fade_out)
    }
}
