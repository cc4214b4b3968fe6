#[derive(Debug)]
struct AnimationTracker {
    rng: fastrand::Rng,
    player_dialogue: Option<PackageId>,
    npc_dialogue: Option<PackageId>,
    // Actors with an idle animation in flight, by expiry time.
    in_flight: HashMap<ActorId, Instant>,
    packages_missing_warned: bool,
}

impl AnimationTracker {
    fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            player_dialogue: None,
            npc_dialogue: None,
            in_flight: HashMap::new(),
            packages_missing_warned: false,
        }
    }

    /// Resolves and memoizes the dialogue packages. Once resolved an id is
    /// never re-queried; unresolved names are retried on every accepted
    /// tick. Returns false when neither resolves, which skips the scan.
    fn resolve_packages(&mut self, packages: &PackageRegistry) -> bool {
        if self.player_dialogue.is_none() {
            self.player_dialogue = packages.package_id_by_name(PLAYER_DIALOGUE_PACKAGE);
        }
        if self.npc_dialogue.is_none() {
            self.npc_dialogue = packages.package_id_by_name(NPC_DIALOGUE_PACKAGE);
        }
        let resolved = self.player_dialogue.is_some() || self.npc_dialogue.is_some();
        if !resolved && !self.packages_missing_warned {
            self.packages_missing_warned = true;
            warn!(
                player_package = PLAYER_DIALOGUE_PACKAGE,
                npc_package = NPC_DIALOGUE_PACKAGE,
                "dialogue_packages_unresolved_scan_skipped"
            );
        }
        resolved
    }

    fn is_dialogue_package(&self, package: Option<PackageId>) -> bool {
        match package {
            Some(id) => self.player_dialogue == Some(id) || self.npc_dialogue == Some(id),
            None => false,
        }
    }

    fn sweep_expired(&mut self, now: Instant) {
        self.in_flight.retain(|_, expiry| *expiry > now);
    }

    fn idle_window(&mut self) -> Duration {
        let span = IDLE_WINDOW_MAX_SECONDS - IDLE_WINDOW_MIN_SECONDS;
        Duration::from_secs_f32(IDLE_WINDOW_MIN_SECONDS + self.rng.f32() * span)
    }

    /// One full reconciliation: expiry sweep, then a walk of the
    /// high-process list triggering at most one idle gesture per actor in
    /// dialogue. Runs inside a deferred task with the tracker lock held,
    /// so the whole tick is atomic with respect to other invocations.
    fn reconcile(&mut self, ctx: &mut TaskContext<'_>) {
        if !self.resolve_packages(ctx.packages) {
            return;
        }
        self.sweep_expired(ctx.now);

        let candidates: Vec<ActorId> = ctx.actors.high_process().to_vec();
        for id in candidates {
            let Some(actor) = ctx.actors.find_actor(id) else {
                continue;
            };
            if !actor.loaded || actor.in_combat || actor.dead {
                continue;
            }
            if !self.is_dialogue_package(actor.package) {
                // Left dialogue before its window expired.
                self.in_flight.remove(&id);
                continue;
            }
            if self.in_flight.contains_key(&id) {
                continue;
            }

            let event = IDLE_EVENT_NAMES[self.rng.usize(..IDLE_EVENT_NAMES.len())];
            let expiry = ctx.now + self.idle_window();
            if let Some(actor) = ctx.actors.find_actor_mut(id) {
                actor.notify_animation_event(event);
            }
            self.in_flight.insert(id, expiry);
            debug!(actor = id.0, event, "idle_animation_triggered");
        }
    }
}

/// Clone-able control surface for the dialogue animation loop, shared
/// between the frame sink and the scripting layer.
#[derive(Clone)]
pub(crate) struct DialogueAnimationHandle {
    enabled: Arc<AtomicBool>,
    tracker: Arc<Mutex<AnimationTracker>>,
}

impl DialogueAnimationHandle {
    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn lock_tracker(&self) -> MutexGuard<'_, AnimationTracker> {
        lock_or_recover(&self.tracker, "animation_tracker")
    }

    fn run_deferred(&self, ctx: &mut TaskContext<'_>) {
        self.lock_tracker().reconcile(ctx);
    }

    #[cfg(test)]
    fn in_flight_count(&self) -> usize {
        self.lock_tracker().in_flight.len()
    }
}

pub(crate) struct DialogueAnimationManager {
    handle: DialogueAnimationHandle,
    gate: ThrottleGate,
}

impl FrameSink for DialogueAnimationManager {
    fn on_frame(&mut self, frame: &HostFrame<'_>) {
        if !self.handle.is_enabled() {
            return;
        }
        if !self.gate.accept(frame.now) {
            return;
        }
        let handle = self.handle.clone();
        frame.tasks.submit(Box::new(move |ctx| handle.run_deferred(ctx)));
    }
}
