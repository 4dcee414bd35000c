use crate::constants::NOISE_SEED;
use crate::core::grain::{impulse_response, noise_buffer, GrainSpec};
use crate::core::{
    AudioError, AudioGraph, AudioPlatform, CancelToken, EngineState, EngineTask, GranularEngine,
    SceneAudioConfig, Scheduler, IMPULSE_SECONDS, NOISE_BUFFER_SECONDS,
};
use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

// Time constant for filter and reverb moves between configs.
const PARAM_GLIDE_SEC: f64 = 0.08;

fn graph_err(what: &str, e: wasm_bindgen::JsValue) -> AudioError {
    AudioError::Graph(format!("{}: {:?}", what, e))
}

fn create_gain(ctx: &web::AudioContext, value: f32, label: &str) -> Result<web::GainNode, AudioError> {
    let g = web::GainNode::new(ctx).map_err(|e| graph_err(label, e))?;
    g.gain().set_value(value);
    Ok(g)
}

/// Opens a fresh `AudioContext` per playback session.
#[derive(Default)]
pub struct WebAudioPlatform;

impl AudioPlatform for WebAudioPlatform {
    type Graph = WebAudioGraph;

    fn open(&mut self) -> Result<WebAudioGraph, AudioError> {
        let ctx = web::AudioContext::new()
            .map_err(|e| AudioError::Unavailable(format!("{:?}", e)))?;
        // Called from the toggle's click handler, so resume is allowed.
        _ = ctx.resume();
        let sr = ctx.sample_rate();

        let len = (sr * NOISE_BUFFER_SECONDS) as u32;
        let noise = ctx
            .create_buffer(1, len, sr)
            .map_err(|e| graph_err("noise buffer", e))?;
        let mut samples = noise_buffer(len as usize, NOISE_SEED);
        noise
            .copy_to_channel(&mut samples, 0)
            .map_err(|e| graph_err("noise copy", e))?;

        let filter = web::BiquadFilterNode::new(&ctx).map_err(|e| graph_err("filter", e))?;
        filter.set_type(web::BiquadFilterType::Bandpass);

        let reverb = web::ConvolverNode::new(&ctx).map_err(|e| graph_err("convolver", e))?;
        reverb.set_normalize(true);
        let ir_channels = impulse_response(sr, IMPULSE_SECONDS);
        let ir_len = ir_channels[0].len() as u32;
        let ir = ctx
            .create_buffer(2, ir_len, sr)
            .map_err(|e| graph_err("impulse buffer", e))?;
        for (ch, mut data) in ir_channels.into_iter().enumerate() {
            _ = ir.copy_to_channel(&mut data, ch as i32);
        }
        reverb.set_buffer(Some(&ir));

        let dry = create_gain(&ctx, 1.0, "dry")?;
        let wet = create_gain(&ctx, 0.0, "wet")?;
        let master = create_gain(&ctx, 0.0, "master")?;

        // grain -> filter -> {dry, reverb -> wet} -> master -> out
        _ = filter.connect_with_audio_node(&dry);
        _ = filter.connect_with_audio_node(&reverb);
        _ = reverb.connect_with_audio_node(&wet);
        _ = dry.connect_with_audio_node(&master);
        _ = wet.connect_with_audio_node(&master);
        _ = master.connect_with_audio_node(&ctx.destination());

        log::info!("[audio] graph ready at {} Hz", sr);
        Ok(WebAudioGraph {
            ctx,
            noise,
            filter,
            reverb,
            dry,
            wet,
            master,
            buffer_seconds: len as f64 / sr as f64,
        })
    }
}

pub struct WebAudioGraph {
    ctx: web::AudioContext,
    noise: web::AudioBuffer,
    filter: web::BiquadFilterNode,
    reverb: web::ConvolverNode,
    dry: web::GainNode,
    wet: web::GainNode,
    master: web::GainNode,
    buffer_seconds: f64,
}

impl WebAudioGraph {
    fn build_grain(
        &self,
        grain: &GrainSpec,
    ) -> Result<(web::AudioBufferSourceNode, web::GainNode, web::StereoPannerNode), wasm_bindgen::JsValue>
    {
        let src = web::AudioBufferSourceNode::new(&self.ctx)?;
        src.set_buffer(Some(&self.noise));
        src.playback_rate().set_value(grain.pitch);
        let env = web::GainNode::new(&self.ctx)?;
        let pan = web::StereoPannerNode::new(&self.ctx)?;
        pan.pan().set_value(grain.pan.clamp(-1.0, 1.0));
        src.connect_with_audio_node(&env)?;
        env.connect_with_audio_node(&pan)?;
        pan.connect_with_audio_node(&self.filter)?;
        Ok((src, env, pan))
    }
}

impl AudioGraph for WebAudioGraph {
    fn buffer_seconds(&self) -> f64 {
        self.buffer_seconds
    }

    fn ramp_master(&mut self, target: f32, seconds: f64) {
        let now = self.ctx.current_time();
        let p = self.master.gain();
        let current = p.value();
        _ = p.cancel_scheduled_values(now);
        _ = p.set_value_at_time(current, now);
        _ = p.linear_ramp_to_value_at_time(target, now + seconds.max(0.0));
    }

    fn apply_config(&mut self, config: &SceneAudioConfig) {
        let now = self.ctx.current_time();
        let mix = config.reverb_mix.clamp(0.0, 1.0);
        _ = self
            .filter
            .frequency()
            .set_target_at_time(config.filter_hz, now, PARAM_GLIDE_SEC);
        _ = self
            .filter
            .q()
            .set_target_at_time(config.filter_q, now, PARAM_GLIDE_SEC);
        _ = self
            .dry
            .gain()
            .set_target_at_time(1.0 - mix, now, PARAM_GLIDE_SEC);
        _ = self.wet.gain().set_target_at_time(mix, now, PARAM_GLIDE_SEC);
    }

    fn play_grain(&mut self, grain: &GrainSpec) {
        let (src, env, pan) = match self.build_grain(grain) {
            Ok(nodes) => nodes,
            Err(e) => {
                log::debug!("[audio] grain dropped: {:?}", e);
                return;
            }
        };
        let e = grain.envelope;
        let t0 = self.ctx.current_time() + 0.005;
        let g = env.gain();
        _ = g.set_value_at_time(0.0, t0);
        _ = g.linear_ramp_to_value_at_time(e.peak, t0 + e.attack);
        _ = g.set_value_at_time(e.peak, t0 + e.attack + e.sustain);
        _ = g.linear_ramp_to_value_at_time(0.0, t0 + e.duration());

        let (src_end, env_end, pan_end) = (src.clone(), env.clone(), pan.clone());
        let on_ended = Closure::once_into_js(move || {
            _ = src_end.disconnect();
            _ = env_end.disconnect();
            _ = pan_end.disconnect();
        });
        src.set_onended(Some(on_ended.unchecked_ref()));
        _ = src.start_with_when_and_grain_offset(t0, grain.offset_sec);
        _ = src.stop_with_when(t0 + e.duration() + 0.01);
    }

    fn close(self) {
        _ = self.master.disconnect();
        _ = self.wet.disconnect();
        _ = self.dry.disconnect();
        _ = self.reverb.disconnect();
        _ = self.filter.disconnect();
        _ = self.ctx.close();
        log::info!("[audio] graph closed");
    }
}

/// `setTimeout`-backed scheduler. Due tasks are routed back into the owning
/// driver; cancelled ones are cleared on the browser side.
pub struct TimerScheduler {
    owner: Weak<RefCell<AudioDriver>>,
    handles: FnvHashMap<u64, i32>,
    next_id: u64,
}

impl TimerScheduler {
    fn new(owner: Weak<RefCell<AudioDriver>>) -> Self {
        Self {
            owner,
            handles: FnvHashMap::default(),
            next_id: 1,
        }
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.handles.len()
    }
}

impl Scheduler for TimerScheduler {
    fn schedule_after(&mut self, delay_ms: f64, task: EngineTask) -> CancelToken {
        let id = self.next_id;
        self.next_id += 1;
        let token = CancelToken(id);
        let Some(window) = web::window() else {
            return token;
        };
        let owner = self.owner.clone();
        let cb = Closure::once_into_js(move || {
            let Some(driver) = owner.upgrade() else {
                return;
            };
            match driver.try_borrow_mut() {
                Ok(mut d) => d.fire(token, task),
                Err(_) => log::warn!("[audio] {:?} fired while driver busy", task),
            };
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.unchecked_ref(),
            delay_ms.max(0.0).round() as i32,
        ) {
            Ok(handle) => {
                self.handles.insert(id, handle);
            }
            Err(e) => log::error!("[audio] setTimeout failed: {:?}", e),
        }
        token
    }

    fn cancel(&mut self, token: CancelToken) {
        if let Some(handle) = self.handles.remove(&token.0) {
            if let Some(window) = web::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }
}

/// Engine plus the timers it runs on, shared by the toggle, scroll and
/// pagehide handlers.
pub struct AudioDriver {
    engine: GranularEngine<WebAudioPlatform>,
    timers: TimerScheduler,
}

impl AudioDriver {
    pub fn new(engine: GranularEngine<WebAudioPlatform>) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|weak| {
            RefCell::new(Self {
                engine,
                timers: TimerScheduler::new(weak.clone()),
            })
        })
    }

    fn fire(&mut self, token: CancelToken, task: EngineTask) {
        // A missing handle means the timer was cancelled after it was queued.
        if self.timers.handles.remove(&token.0).is_none() {
            return;
        }
        self.engine.on_task(task, &mut self.timers);
    }

    pub fn toggle(&mut self) {
        self.engine.toggle(&mut self.timers);
    }

    pub fn force_stop(&mut self) {
        self.engine.force_stop(&mut self.timers);
        log::debug!("[audio] force stop, {} timers left", self.timers.pending());
    }

    pub fn set_progress(&mut self, progress: f32) {
        self.engine.set_progress(progress);
    }

    #[inline]
    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.engine.is_disabled()
    }
}
