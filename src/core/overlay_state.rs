use super::constants::TREE_DEPTH;
use super::counters::RadialCounters;
use super::decision_tree::DecisionTree;
use super::quality::RenderQuality;
use super::reveal_grid::{Frontier, RevealGrid};
use super::scene::SceneId;
use super::streams::StreamRain;
use super::timeline::SceneTimeline;
use smallvec::SmallVec;

const STREAM_SEED: u64 = 0x5EED_0003;

/// A scene routine to draw this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayLayer {
    pub scene: SceneId,
    pub local: f32,
    pub opacity: f32,
}

/// Persistent per-scene draw state for the 2D overlay. Each routine receives
/// its own piece by `&mut`; nothing lives in closures.
#[derive(Clone, Debug)]
pub struct OverlayState {
    pub width: f32,
    pub height: f32,
    pub frame: u64,
    pub inventory: RevealGrid,
    pub decision: DecisionTree,
    pub assembly: StreamRain,
    pub verification: RevealGrid,
    pub outcome: RadialCounters,
    active: [bool; SceneId::COUNT],
}

impl OverlayState {
    pub fn new(quality: &RenderQuality, width: f32, height: f32) -> Self {
        let vc = quality.verification_cols;
        let vr = quality.verification_rows;
        Self {
            width,
            height,
            frame: 0,
            inventory: RevealGrid::new(
                quality.inventory_cols,
                quality.inventory_rows,
                Frontier::Sweep,
                width,
                height,
            ),
            decision: DecisionTree::build(TREE_DEPTH, width, height),
            assembly: StreamRain::new(width, height, quality.stream_blocks_per_column, STREAM_SEED),
            verification: RevealGrid::new(vc, vr, RevealGrid::centred_ripple(vc, vr), width, height),
            outcome: RadialCounters::new(width, height),
            active: [false; SceneId::COUNT],
        }
    }

    /// Rebuild every piece of geometry for a new canvas size, dropping all
    /// reveal progress. Must run before the next draw.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.inventory.resize(width, height);
        self.decision = DecisionTree::build(TREE_DEPTH, width, height);
        self.assembly.resize(width, height);
        self.verification.resize(width, height);
        self.outcome.resize(width, height);
        self.active = [false; SceneId::COUNT];
    }

    /// Reset one scene's state, as on re-entry.
    pub fn reset_scene(&mut self, scene: SceneId) {
        match scene {
            SceneId::Inventory => self.inventory.reset(),
            SceneId::Decision => {}
            SceneId::Assembly => self.assembly.reset(self.width, self.height),
            SceneId::Verification => self.verification.reset(),
            SceneId::Outcome => {}
        }
    }

    #[inline]
    pub fn is_active(&self, scene: SceneId) -> bool {
        self.active[scene.index()]
    }

    /// Advance the frame counter, gate scenes on `timeline`, reset scenes on
    /// re-entry and step the state of every visible scene. Returns the layers
    /// to draw, in timeline order.
    pub fn advance(&mut self, progress: f32, timeline: &SceneTimeline) -> SmallVec<[OverlayLayer; 2]> {
        self.frame = self.frame.wrapping_add(1);
        let mut layers = SmallVec::new();
        for scene in SceneId::ALL {
            let opacity = timeline.visibility(scene, progress);
            let visible = opacity > 0.0;
            let was = self.active[scene.index()];
            if visible && !was {
                log::debug!("[overlay] enter {}", scene.name());
                self.reset_scene(scene);
            }
            self.active[scene.index()] = visible;
            if !visible {
                continue;
            }
            let local = timeline.local_progress(scene, progress);
            match scene {
                SceneId::Inventory => self.inventory.update(local, self.frame),
                SceneId::Verification => self.verification.update(local, self.frame),
                SceneId::Assembly => self.assembly.step(),
                SceneId::Decision | SceneId::Outcome => {}
            }
            layers.push(OverlayLayer {
                scene,
                local,
                opacity,
            });
        }
        layers
    }
}
