use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use host::{
    ActorDirectory, ActorId, FrameSink, HostFrame, PackageId, PackageRegistry, ScriptEvent,
    TaskContext,
};
use tracing::{debug, warn};

pub(crate) const ANIMATION_SCAN_INTERVAL: Duration = Duration::from_millis(2000);
pub(crate) const TEAMMATE_SCAN_INTERVAL: Duration = Duration::from_millis(1000);
pub(crate) const PLAYER_DIALOGUE_PACKAGE: &str = "PlayerDialoguePackage";
pub(crate) const NPC_DIALOGUE_PACKAGE: &str = "NpcDialoguePackage";
pub(crate) const IDLE_EVENT_NAMES: [&str; 4] = [
    "IdleDialogueTalking01",
    "IdleDialogueTalking02",
    "IdleDialogueTalking03",
    "IdleDialogueTalking04",
];
const IDLE_WINDOW_MIN_SECONDS: f32 = 3.0;
const IDLE_WINDOW_MAX_SECONDS: f32 = 6.0;
pub(crate) const EVENT_NEW_TEAMMATE: &str = "Warden_NewTeammateDetected";
pub(crate) const EVENT_TEAMMATE_REMOVED: &str = "Warden_TeammateRemoved";

include!("throttle.rs");
include!("dialogue.rs");
include!("teammate.rs");

static TRACKER_LOCK_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn lock_or_recover<'a, T>(lock: &'a Mutex<T>, tracker: &'static str) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            if TRACKER_LOCK_POISON_WARNED
                .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                warn!(tracker, "tracker lock poisoned; recovered inner value");
            }
            poisoned.into_inner()
        }
    }
}

pub(crate) fn dialogue_animation_manager(
    seed: u64,
) -> (DialogueAnimationManager, DialogueAnimationHandle) {
    let handle = DialogueAnimationHandle {
        enabled: Arc::new(AtomicBool::new(true)),
        tracker: Arc::new(Mutex::new(AnimationTracker::new(seed))),
    };
    let manager = DialogueAnimationManager {
        handle: handle.clone(),
        gate: ThrottleGate::new(ANIMATION_SCAN_INTERVAL),
    };
    (manager, handle)
}

pub(crate) fn teammate_manager() -> (TeammateManager, TeammateHandle) {
    let handle = TeammateHandle {
        enabled: Arc::new(AtomicBool::new(true)),
        tracker: Arc::new(Mutex::new(TeammateTracker::default())),
    };
    let manager = TeammateManager {
        handle: handle.clone(),
        gate: ThrottleGate::new(TEAMMATE_SCAN_INTERVAL),
    };
    (manager, handle)
}
