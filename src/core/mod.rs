pub mod audio_config;
pub mod camera_path;
pub mod constants;
pub mod counters;
pub mod decision_tree;
pub mod ease;
pub mod engine;
pub mod grain;
pub mod overlay_state;
pub mod particles;
pub mod progress;
pub mod quality;
pub mod reveal_grid;
pub mod scene;
pub mod streams;
pub mod timeline;

pub use audio_config::*;
pub use camera_path::*;
pub use constants::*;
pub use engine::*;
pub use overlay_state::*;
pub use particles::*;
pub use progress::*;
pub use quality::*;
pub use scene::*;
pub use timeline::*;

// Shaders bundled as string constants
pub static PARTICLES_WGSL: &str = include_str!("../../shaders/particles.wgsl");
pub static BACKDROP_WGSL: &str = include_str!("../../shaders/backdrop.wgsl");
