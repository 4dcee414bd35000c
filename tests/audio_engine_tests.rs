// Host-side tests for the granular engine state machine, driven by a
// recording graph and a virtual-clock scheduler.

#![allow(dead_code)]
mod core {
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod ease {
        include!("../src/core/ease.rs");
    }
    pub mod scene {
        include!("../src/core/scene.rs");
    }
    pub mod timeline {
        include!("../src/core/timeline.rs");
    }
    pub mod quality {
        include!("../src/core/quality.rs");
    }
    pub mod audio_config {
        include!("../src/core/audio_config.rs");
    }
    pub mod grain {
        include!("../src/core/grain.rs");
    }
    pub mod engine {
        include!("../src/core/engine.rs");
    }
}

use crate::core::audio_config::*;
use crate::core::constants::GRAIN_JITTER;
use crate::core::engine::*;
use crate::core::grain::*;
use crate::core::quality::RenderQuality;
use crate::core::scene::SceneId;
use crate::core::timeline::SceneTimeline;
use rand::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default, Debug)]
struct Log {
    opens: usize,
    closes: usize,
    ramps: Vec<f32>,
    configs: Vec<SceneAudioConfig>,
    grains: Vec<GrainSpec>,
    master_at_close: Vec<f32>,
}

struct FakeGraph {
    log: Rc<RefCell<Log>>,
    master: f32,
}

impl AudioGraph for FakeGraph {
    fn buffer_seconds(&self) -> f64 {
        2.0
    }
    fn ramp_master(&mut self, target: f32, _seconds: f64) {
        self.master = target;
        self.log.borrow_mut().ramps.push(target);
    }
    fn apply_config(&mut self, config: &SceneAudioConfig) {
        self.log.borrow_mut().configs.push(*config);
    }
    fn play_grain(&mut self, grain: &GrainSpec) {
        self.log.borrow_mut().grains.push(*grain);
    }
    fn close(self) {
        let mut log = self.log.borrow_mut();
        log.closes += 1;
        log.master_at_close.push(self.master);
    }
}

struct FakePlatform {
    log: Rc<RefCell<Log>>,
    fail: bool,
}

impl AudioPlatform for FakePlatform {
    type Graph = FakeGraph;
    fn open(&mut self) -> Result<FakeGraph, AudioError> {
        if self.fail {
            return Err(AudioError::Unavailable("no output device".into()));
        }
        self.log.borrow_mut().opens += 1;
        Ok(FakeGraph {
            log: self.log.clone(),
            master: 0.0,
        })
    }
}

/// Virtual clock: tasks fire in due order when time is advanced.
#[derive(Default)]
struct ManualScheduler {
    now: f64,
    next_id: u64,
    pending: Vec<(f64, CancelToken, EngineTask)>,
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&mut self, delay_ms: f64, task: EngineTask) -> CancelToken {
        self.next_id += 1;
        let token = CancelToken(self.next_id);
        self.pending.push((self.now + delay_ms, token, task));
        token
    }
    fn cancel(&mut self, token: CancelToken) {
        self.pending.retain(|(_, t, _)| *t != token);
    }
}

impl ManualScheduler {
    fn pop_due(&mut self, until: f64) -> Option<(f64, EngineTask)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (at, _, _))| *at <= until)
            .min_by(|a, b| a.1 .0.total_cmp(&b.1 .0))
            .map(|(i, _)| i)?;
        let (at, _, task) = self.pending.remove(idx);
        Some((at, task))
    }

    fn run_until(&mut self, until: f64, engine: &mut GranularEngine<FakePlatform>) {
        while let Some((at, task)) = self.pop_due(until) {
            self.now = at;
            engine.on_task(task, self);
        }
        self.now = until;
    }
}

fn engine(fail: bool) -> (GranularEngine<FakePlatform>, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let platform = FakePlatform {
        log: log.clone(),
        fail,
    };
    let e = GranularEngine::new(
        platform,
        AudioConfigTable::narrative().unwrap(),
        SceneTimeline::audio().unwrap(),
        RenderQuality::FULL,
        7,
    );
    (e, log)
}

#[test]
fn start_then_immediate_stop_spawns_nothing() {
    let (mut e, log) = engine(false);
    let mut s = ManualScheduler::default();
    assert!(e.start(&mut s));
    assert_eq!(e.state(), EngineState::Starting);
    e.stop(&mut s);
    assert_eq!(e.state(), EngineState::Stopping);
    s.run_until(10_000.0, &mut e);
    assert_eq!(e.state(), EngineState::Idle);
    assert!(!e.has_graph());
    let log = log.borrow();
    assert!(log.grains.is_empty());
    assert_eq!(log.closes, 1);
    assert_eq!(log.master_at_close, vec![0.0]);
    assert_eq!(*log.ramps.last().unwrap(), 0.0);
}

#[test]
fn grains_follow_fade_in_and_stop_on_stop() {
    let (mut e, log) = engine(false);
    let mut s = ManualScheduler::default();
    e.start(&mut s);
    s.run_until(FADE_IN_MS - 1.0, &mut e);
    assert_eq!(e.state(), EngineState::Starting);
    assert!(log.borrow().grains.is_empty());
    s.run_until(FADE_IN_MS + 2000.0, &mut e);
    assert_eq!(e.state(), EngineState::Playing);
    let spawned = log.borrow().grains.len();
    assert!(spawned > 5);
    assert_eq!(e.grains_spawned(), spawned as u64);
    e.stop(&mut s);
    s.run_until(20_000.0, &mut e);
    assert_eq!(log.borrow().grains.len(), spawned);
    assert!(s.pending.is_empty());
}

#[test]
fn next_grain_uses_new_scene_config() {
    let (mut e, log) = engine(false);
    let table = AudioConfigTable::narrative().unwrap();
    let mut s = ManualScheduler::default();
    e.set_progress(0.40);
    assert_eq!(*e.active_config(), *table.get(SceneId::Assembly));
    e.start(&mut s);
    s.run_until(FADE_IN_MS + 500.0, &mut e);
    e.set_progress(0.60);
    let verification = *table.get(SceneId::Verification);
    assert_eq!(*e.active_config(), verification);
    assert_eq!(*log.borrow().configs.last().unwrap(), verification);
    let before = log.borrow().grains.len();
    s.run_until(FADE_IN_MS + 1500.0, &mut e);
    let log = log.borrow();
    assert!(log.grains.len() > before);
    for g in &log.grains[before..] {
        assert_eq!(g.envelope.peak, verification.amplitude);
        assert!(g.pitch >= verification.pitch_min && g.pitch < verification.pitch_max);
    }
}

#[test]
fn decision_grains_are_hard_panned() {
    let (mut e, log) = engine(false);
    let mut s = ManualScheduler::default();
    e.set_progress(0.30);
    assert_eq!(e.dominant_scene(), SceneId::Decision);
    e.start(&mut s);
    s.run_until(FADE_IN_MS + 2000.0, &mut e);
    let log = log.borrow();
    assert!(!log.grains.is_empty());
    assert!(log.grains.iter().all(|g| g.pan == -1.0 || g.pan == 1.0));
}

#[test]
fn open_failure_disables_audio() {
    let (mut e, log) = engine(true);
    let mut s = ManualScheduler::default();
    assert!(!e.start(&mut s));
    assert!(e.is_disabled());
    assert_eq!(e.state(), EngineState::Idle);
    e.toggle(&mut s);
    assert!(!e.start(&mut s));
    assert_eq!(e.state(), EngineState::Idle);
    assert!(s.pending.is_empty());
    assert_eq!(log.borrow().opens, 0);
}

#[test]
fn force_stop_releases_immediately() {
    let (mut e, log) = engine(false);
    let mut s = ManualScheduler::default();
    e.start(&mut s);
    s.run_until(FADE_IN_MS + 300.0, &mut e);
    e.force_stop(&mut s);
    assert_eq!(e.state(), EngineState::Idle);
    assert!(!e.has_graph());
    assert!(s.pending.is_empty());
    assert_eq!(log.borrow().closes, 1);
    // Idempotent.
    e.force_stop(&mut s);
    assert_eq!(log.borrow().closes, 1);
}

#[test]
fn restart_while_stopping_rebuilds_graph() {
    let (mut e, log) = engine(false);
    let mut s = ManualScheduler::default();
    e.start(&mut s);
    s.run_until(FADE_IN_MS + 100.0, &mut e);
    e.stop(&mut s);
    s.run_until(FADE_IN_MS + 200.0, &mut e);
    assert_eq!(e.state(), EngineState::Stopping);
    assert!(e.start(&mut s));
    assert_eq!(e.state(), EngineState::Starting);
    {
        let log = log.borrow();
        assert_eq!(log.opens, 2);
        assert_eq!(log.closes, 1);
    }
    // The old fade-out must not tear down the new session.
    s.run_until(FADE_IN_MS * 3.0, &mut e);
    assert_eq!(e.state(), EngineState::Playing);
    assert!(e.has_graph());
    assert_eq!(log.borrow().closes, 1);
}

#[test]
fn stale_tasks_are_ignored() {
    let (mut e, log) = engine(false);
    let mut s = ManualScheduler::default();
    e.on_task(EngineTask::SpawnGrain, &mut s);
    e.on_task(EngineTask::FadeOutComplete, &mut s);
    e.on_task(EngineTask::FadeInComplete, &mut s);
    assert_eq!(e.state(), EngineState::Idle);
    assert!(s.pending.is_empty());
    e.start(&mut s);
    e.on_task(EngineTask::FadeOutComplete, &mut s);
    assert_eq!(e.state(), EngineState::Starting);
    assert!(log.borrow().grains.is_empty());
}

#[test]
fn envelope_is_a_trapezoid() {
    let env = Envelope::trapezoid(0.04, 0.5);
    assert!((env.duration() - 0.04).abs() < 1e-12);
    assert_eq!(env.gain_at(0.0), 0.0);
    assert_eq!(env.gain_at(env.duration()), 0.0);
    assert_eq!(env.gain_at(env.attack + env.sustain * 0.5), 0.5);
    assert!((env.gain_at(env.attack * 0.5) - 0.25).abs() < 1e-5);
    let release_mid = env.attack + env.sustain + env.release * 0.5;
    assert!((env.gain_at(release_mid) - 0.25).abs() < 1e-5);
}

#[test]
fn grain_intervals_jitter_within_bounds() {
    let mut rng = StdRng::seed_from_u64(99);
    let base = 1000.0 / 20.0;
    for _ in 0..1000 {
        let d = next_interval_ms(20.0, &mut rng);
        assert!(d >= base * (1.0 - GRAIN_JITTER) - 1e-9);
        assert!(d <= base * (1.0 + GRAIN_JITTER) + 1e-9);
    }
}

#[test]
fn grain_plan_stays_inside_buffer() {
    let table = AudioConfigTable::narrative().unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    for id in SceneId::ALL {
        let cfg = table.get(id);
        for _ in 0..200 {
            let g = plan_grain(cfg, false, 2.0, &mut rng);
            let read = g.envelope.duration() * g.pitch as f64;
            assert!(g.offset_sec >= 0.0 && g.offset_sec + read <= 2.0);
            assert!(g.pan.abs() <= cfg.pan_spread);
        }
    }
}

#[test]
fn noise_buffer_is_deterministic_and_bounded() {
    let a = noise_buffer(4096, 11);
    assert_eq!(a, noise_buffer(4096, 11));
    assert_ne!(a, noise_buffer(4096, 12));
    assert!(a.iter().all(|x| (-1.0..=1.0).contains(x)));
    let [l, r] = impulse_response(8000.0, 0.5);
    assert_eq!(l.len(), 4000);
    assert_ne!(l, r);
    assert!(l[3999].abs() < l.iter().take(100).fold(0.0f32, |m, x| m.max(x.abs())));
}

#[test]
fn config_table_must_cover_every_scene() {
    let mut map = narrative_configs();
    map.remove(&SceneId::Outcome);
    assert_eq!(
        AudioConfigTable::from_map(&map).unwrap_err(),
        AudioConfigError::Missing(SceneId::Outcome)
    );
    let table = AudioConfigTable::narrative().unwrap();
    let tl = SceneTimeline::audio().unwrap();
    let (cfg, dom) = table.at(&tl, 0.0);
    assert_eq!(dom, SceneId::Inventory);
    assert_eq!(cfg, *table.get(SceneId::Inventory));
}
