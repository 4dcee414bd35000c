use super::ease::{clamp01, lerp};
use super::scene::SceneId;
use super::timeline::{SceneBlend, SceneTimeline};
use fnv::FnvHashMap;

/// Synthesis parameters for one scene. Values are sound-design data, tuned by
/// ear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneAudioConfig {
    /// Grains per second.
    pub density: f32,
    pub grain_ms: f32,
    /// Playback-rate range for grain pitch.
    pub pitch_min: f32,
    pub pitch_max: f32,
    /// 0 = centred, 1 = full stereo width.
    pub pan_spread: f32,
    pub amplitude: f32,
    pub filter_hz: f32,
    pub filter_q: f32,
    pub reverb_mix: f32,
}

impl SceneAudioConfig {
    pub fn lerp(&self, other: &SceneAudioConfig, t: f32) -> SceneAudioConfig {
        let t = clamp01(t);
        SceneAudioConfig {
            density: lerp(self.density, other.density, t),
            grain_ms: lerp(self.grain_ms, other.grain_ms, t),
            pitch_min: lerp(self.pitch_min, other.pitch_min, t),
            pitch_max: lerp(self.pitch_max, other.pitch_max, t),
            pan_spread: lerp(self.pan_spread, other.pan_spread, t),
            amplitude: lerp(self.amplitude, other.amplitude, t),
            filter_hz: lerp(self.filter_hz, other.filter_hz, t),
            filter_q: lerp(self.filter_q, other.filter_q, t),
            reverb_mix: lerp(self.reverb_mix, other.reverb_mix, t),
        }
    }

    #[inline]
    pub fn pitch_mid(&self) -> f32 {
        (self.pitch_min + self.pitch_max) * 0.5
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AudioConfigError {
    #[error("no audio config for scene {0:?}")]
    Missing(SceneId),
}

/// Total mapping from scene to config, checked once at construction so
/// lookups can never miss.
#[derive(Clone, Debug)]
pub struct AudioConfigTable {
    configs: [SceneAudioConfig; SceneId::COUNT],
}

impl AudioConfigTable {
    pub fn from_map(map: &FnvHashMap<SceneId, SceneAudioConfig>) -> Result<Self, AudioConfigError> {
        let mut configs = [DEFAULT_CONFIG; SceneId::COUNT];
        for id in SceneId::ALL {
            configs[id.index()] = *map.get(&id).ok_or(AudioConfigError::Missing(id))?;
        }
        Ok(Self { configs })
    }

    pub fn narrative() -> Result<Self, AudioConfigError> {
        Self::from_map(&narrative_configs())
    }

    #[inline]
    pub fn get(&self, id: SceneId) -> &SceneAudioConfig {
        &self.configs[id.index()]
    }

    pub fn blended(&self, blend: &SceneBlend) -> SceneAudioConfig {
        let a = self.get(blend.scene);
        match blend.next {
            Some(next) => a.lerp(self.get(next), blend.blend),
            None => *a,
        }
    }

    /// Config in effect at `progress` together with the dominant scene.
    pub fn at(&self, timeline: &SceneTimeline, progress: f32) -> (SceneAudioConfig, SceneId) {
        let blend = timeline.resolve(progress);
        (self.blended(&blend), blend.dominant())
    }
}

const DEFAULT_CONFIG: SceneAudioConfig = SceneAudioConfig {
    density: 12.0,
    grain_ms: 30.0,
    pitch_min: 0.8,
    pitch_max: 1.2,
    pan_spread: 0.5,
    amplitude: 0.35,
    filter_hz: 1200.0,
    filter_q: 2.0,
    reverb_mix: 0.35,
};

pub fn narrative_configs() -> FnvHashMap<SceneId, SceneAudioConfig> {
    let mut map = FnvHashMap::default();
    map.insert(
        SceneId::Inventory,
        SceneAudioConfig {
            density: 14.0,
            grain_ms: 30.0,
            pitch_min: 0.8,
            pitch_max: 1.25,
            pan_spread: 0.6,
            amplitude: 0.32,
            filter_hz: 900.0,
            filter_q: 2.0,
            reverb_mix: 0.3,
        },
    );
    map.insert(
        SceneId::Decision,
        SceneAudioConfig {
            density: 10.0,
            grain_ms: 40.0,
            pitch_min: 0.6,
            pitch_max: 1.6,
            pan_spread: 1.0,
            amplitude: 0.38,
            filter_hz: 1400.0,
            filter_q: 3.0,
            reverb_mix: 0.45,
        },
    );
    map.insert(
        SceneId::Assembly,
        SceneAudioConfig {
            density: 28.0,
            grain_ms: 18.0,
            pitch_min: 1.0,
            pitch_max: 2.0,
            pan_spread: 0.8,
            amplitude: 0.26,
            filter_hz: 2400.0,
            filter_q: 4.0,
            reverb_mix: 0.25,
        },
    );
    map.insert(
        SceneId::Verification,
        SceneAudioConfig {
            density: 20.0,
            grain_ms: 25.0,
            pitch_min: 0.9,
            pitch_max: 1.4,
            pan_spread: 0.5,
            amplitude: 0.3,
            filter_hz: 1800.0,
            filter_q: 6.0,
            reverb_mix: 0.4,
        },
    );
    map.insert(
        SceneId::Outcome,
        SceneAudioConfig {
            density: 8.0,
            grain_ms: 45.0,
            pitch_min: 0.5,
            pitch_max: 0.9,
            pan_spread: 0.9,
            amplitude: 0.4,
            filter_hz: 600.0,
            filter_q: 1.5,
            reverb_mix: 0.65,
        },
    );
    map
}
