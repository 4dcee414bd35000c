use super::audio_config::{AudioConfigTable, SceneAudioConfig};
use super::grain::{next_interval_ms, plan_grain, GrainSpec};
use super::quality::RenderQuality;
use super::scene::SceneId;
use super::timeline::SceneTimeline;
use rand::prelude::*;

pub const MASTER_LEVEL: f32 = 0.8;
pub const FADE_IN_MS: f64 = 1200.0;
pub const FADE_OUT_MS: f64 = 600.0;
// Teardown waits slightly past the ramp so the graph is silent when closed.
const TEARDOWN_MARGIN_MS: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Starting,
    Playing,
    Stopping,
}

/// Deferred work the engine asks its scheduler to hand back later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineTask {
    FadeInComplete,
    SpawnGrain,
    FadeOutComplete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CancelToken(pub u64);

/// Single-threaded timer source. A task handed to `schedule_after` comes back
/// through [`GranularEngine::on_task`] unless its token is cancelled first.
pub trait Scheduler {
    fn schedule_after(&mut self, delay_ms: f64, task: EngineTask) -> CancelToken;
    fn cancel(&mut self, token: CancelToken);
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("audio graph construction failed: {0}")]
    Graph(String),
}

/// A built playback graph: shared noise buffer, bandpass, dry/reverb split and
/// master gain. Lives for exactly one playback session.
pub trait AudioGraph {
    /// Length of the shared noise buffer.
    fn buffer_seconds(&self) -> f64;
    /// Ramp master gain from wherever it currently is to `target`.
    fn ramp_master(&mut self, target: f32, seconds: f64);
    /// Push filter and reverb parameters into the shared nodes.
    fn apply_config(&mut self, config: &SceneAudioConfig);
    fn play_grain(&mut self, grain: &GrainSpec);
    /// Disconnect and release everything.
    fn close(self)
    where
        Self: Sized;
}

pub trait AudioPlatform {
    type Graph: AudioGraph;
    fn open(&mut self) -> Result<Self::Graph, AudioError>;
}

/// Granular texture engine: `Idle → Starting → Playing → Stopping → Idle`.
pub struct GranularEngine<P: AudioPlatform> {
    platform: P,
    graph: Option<P::Graph>,
    state: EngineState,
    disabled: bool,
    table: AudioConfigTable,
    timeline: SceneTimeline,
    quality: RenderQuality,
    progress: f32,
    active: SceneAudioConfig,
    dominant: SceneId,
    grain_timer: Option<CancelToken>,
    phase_timer: Option<CancelToken>,
    rng: StdRng,
    grains_spawned: u64,
}

impl<P: AudioPlatform> GranularEngine<P> {
    pub fn new(
        platform: P,
        table: AudioConfigTable,
        timeline: SceneTimeline,
        quality: RenderQuality,
        seed: u64,
    ) -> Self {
        let (active, dominant) = table.at(&timeline, 0.0);
        Self {
            platform,
            graph: None,
            state: EngineState::Idle,
            disabled: false,
            table,
            timeline,
            quality,
            progress: 0.0,
            active,
            dominant,
            grain_timer: None,
            phase_timer: None,
            rng: StdRng::seed_from_u64(seed),
            grains_spawned: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// True once graph construction has failed; further starts are inert.
    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[inline]
    pub fn is_audible(&self) -> bool {
        matches!(self.state, EngineState::Starting | EngineState::Playing)
    }

    #[inline]
    pub fn has_graph(&self) -> bool {
        self.graph.is_some()
    }

    #[inline]
    pub fn grains_spawned(&self) -> u64 {
        self.grains_spawned
    }

    #[inline]
    pub fn active_config(&self) -> &SceneAudioConfig {
        &self.active
    }

    #[inline]
    pub fn dominant_scene(&self) -> SceneId {
        self.dominant
    }

    /// Recompute the blended config and push it into the shared nodes. Grain
    /// parameters pick it up at the next spawn.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = progress;
        let (active, dominant) = self.table.at(&self.timeline, progress);
        self.active = active;
        self.dominant = dominant;
        if let Some(graph) = self.graph.as_mut() {
            graph.apply_config(&self.active);
        }
    }

    /// User-gesture entry point. Returns true if a new session began.
    pub fn start(&mut self, sched: &mut impl Scheduler) -> bool {
        if self.disabled {
            return false;
        }
        match self.state {
            EngineState::Starting | EngineState::Playing => return false,
            EngineState::Stopping => {
                // A new start rebuilds from scratch.
                self.cancel_timers(sched);
                self.teardown();
            }
            EngineState::Idle => {}
        }
        let mut graph = match self.platform.open() {
            Ok(g) => g,
            Err(e) => {
                log::warn!("[audio] disabled: {}", e);
                self.disabled = true;
                return false;
            }
        };
        graph.apply_config(&self.active);
        graph.ramp_master(MASTER_LEVEL, FADE_IN_MS / 1000.0);
        self.graph = Some(graph);
        self.phase_timer = Some(sched.schedule_after(FADE_IN_MS, EngineTask::FadeInComplete));
        self.state = EngineState::Starting;
        log::info!("[audio] starting at progress {:.3}", self.progress);
        true
    }

    /// Fade out and tear down once silent. The grain chain stops immediately.
    pub fn stop(&mut self, sched: &mut impl Scheduler) {
        if !self.is_audible() {
            return;
        }
        self.cancel_timers(sched);
        if let Some(graph) = self.graph.as_mut() {
            graph.ramp_master(0.0, FADE_OUT_MS / 1000.0);
        }
        self.phase_timer = Some(sched.schedule_after(
            FADE_OUT_MS + TEARDOWN_MARGIN_MS,
            EngineTask::FadeOutComplete,
        ));
        self.state = EngineState::Stopping;
        log::info!("[audio] stopping after {} grains", self.grains_spawned);
    }

    pub fn toggle(&mut self, sched: &mut impl Scheduler) {
        if self.is_audible() {
            self.stop(sched);
        } else {
            self.start(sched);
        }
    }

    /// Synchronous release regardless of fade state (unmount, page hide).
    pub fn force_stop(&mut self, sched: &mut impl Scheduler) {
        self.cancel_timers(sched);
        self.teardown();
        self.state = EngineState::Idle;
    }

    /// Deliver a task that came due. Tasks that no longer match the current
    /// state are dropped.
    pub fn on_task(&mut self, task: EngineTask, sched: &mut impl Scheduler) {
        match (task, self.state) {
            (EngineTask::FadeInComplete, EngineState::Starting) => {
                self.phase_timer = None;
                self.state = EngineState::Playing;
                self.spawn_and_reschedule(sched);
            }
            (EngineTask::SpawnGrain, EngineState::Playing) => {
                self.grain_timer = None;
                self.spawn_and_reschedule(sched);
            }
            (EngineTask::FadeOutComplete, EngineState::Stopping) => {
                self.phase_timer = None;
                self.teardown();
                self.state = EngineState::Idle;
                log::info!("[audio] idle");
            }
            (task, state) => {
                log::debug!("[audio] dropping stale {:?} in {:?}", task, state);
            }
        }
    }

    fn spawn_and_reschedule(&mut self, sched: &mut impl Scheduler) {
        if let Some(graph) = self.graph.as_mut() {
            let split = self.dominant == SceneId::Decision;
            let grain = plan_grain(&self.active, split, graph.buffer_seconds(), &mut self.rng);
            graph.play_grain(&grain);
            self.grains_spawned += 1;
        }
        let density = self.quality.cap_density(self.active.density);
        let delay = next_interval_ms(density, &mut self.rng);
        self.grain_timer = Some(sched.schedule_after(delay, EngineTask::SpawnGrain));
    }

    fn cancel_timers(&mut self, sched: &mut impl Scheduler) {
        if let Some(t) = self.grain_timer.take() {
            sched.cancel(t);
        }
        if let Some(t) = self.phase_timer.take() {
            sched.cancel(t);
        }
    }

    fn teardown(&mut self) {
        if let Some(graph) = self.graph.take() {
            graph.close();
        }
    }
}
