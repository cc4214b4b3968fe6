use std::time::{SystemTime, UNIX_EPOCH};

use host::SessionConfig;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::reconcile::{
    self, DialogueAnimationHandle, DialogueAnimationManager, TeammateHandle, TeammateManager,
};
use super::settings;

pub(crate) struct AppWiring {
    pub(crate) config: SessionConfig,
    pub(crate) animation: DialogueAnimationManager,
    pub(crate) teammate: TeammateManager,
    pub(crate) animation_handle: DialogueAnimationHandle,
    pub(crate) teammate_handle: TeammateHandle,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Warden Startup ===");

    let settings = settings::load_from_env();
    let seed = settings.rng_seed.unwrap_or_else(seed_from_clock);
    debug!(seed, "animation_rng_seeded");

    let (animation, animation_handle) = reconcile::dialogue_animation_manager(seed);
    animation_handle.set_enabled(settings.animation_enabled);
    let (teammate, teammate_handle) = reconcile::teammate_manager();
    teammate_handle.set_enabled(settings.teammate_enabled);

    let config = SessionConfig {
        max_frames: settings.demo_frames,
        ..SessionConfig::default()
    };

    AppWiring {
        config,
        animation,
        teammate,
        animation_handle,
        teammate_handle,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0x5eed_cafe)
}
