// The known set can outlive a long session: a teammate that de-teams
// while unloaded stays tracked until next observed loaded with the flag
// clear. clear_tracking is the reset for new-game/load boundaries.
#[derive(Debug, Default)]
struct TeammateTracker {
    known: HashSet<ActorId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TeammateTransition {
    Appeared,
    Removed,
}

/// Clone-able control surface for the teammate loop. The count and clear
/// operations work whether or not the loop is enabled.
#[derive(Clone)]
pub(crate) struct TeammateHandle {
    enabled: Arc<AtomicBool>,
    tracker: Arc<Mutex<TeammateTracker>>,
}

impl TeammateHandle {
    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub(crate) fn tracked_count(&self) -> usize {
        self.lock_tracker().known.len()
    }

    pub(crate) fn clear_tracking(&self) {
        let mut tracker = self.lock_tracker();
        let dropped = tracker.known.len();
        tracker.known.clear();
        debug!(dropped, "teammate_tracking_cleared");
    }

    fn lock_tracker(&self) -> MutexGuard<'_, TeammateTracker> {
        lock_or_recover(&self.tracker, "teammate_tracker")
    }

    /// Scan, classify and apply the set update in one lock acquisition, so
    /// any reader of the known set sees fully-pre-diff or fully-post-diff
    /// state, never partial.
    fn diff_against_directory(
        &self,
        actors: &ActorDirectory,
    ) -> Vec<(ActorId, TeammateTransition)> {
        let player = actors.player();
        let mut observed: HashSet<ActorId> = HashSet::new();
        for id in actors
            .high_process()
            .iter()
            .chain(actors.middle_high_process())
        {
            let id = *id;
            if Some(id) == player {
                continue;
            }
            let Some(actor) = actors.find_actor(id) else {
                continue;
            };
            if actor.teammate {
                observed.insert(id);
            }
        }

        let mut tracker = self.lock_tracker();
        let mut transitions = Vec::new();
        for id in &observed {
            if !tracker.known.contains(id) {
                transitions.push((*id, TeammateTransition::Appeared));
            }
        }
        for id in &tracker.known {
            if observed.contains(id) {
                continue;
            }
            match actors.find_actor(*id) {
                Some(actor) if actor.loaded && !actor.teammate => {
                    transitions.push((*id, TeammateTransition::Removed));
                }
                // Stale or unloaded: absence is not departure.
                _ => {}
            }
        }
        for (id, transition) in &transitions {
            match transition {
                TeammateTransition::Appeared => {
                    tracker.known.insert(*id);
                }
                TeammateTransition::Removed => {
                    tracker.known.remove(id);
                }
            }
        }
        transitions
    }
}

fn dispatch_transition(ctx: &mut TaskContext<'_>, id: ActorId, transition: TeammateTransition) {
    // The actor may have despawned between classification and dispatch.
    if ctx.actors.find_actor(id).is_none() {
        debug!(actor = id.0, "transition_actor_stale_skipped");
        return;
    }
    let name = match transition {
        TeammateTransition::Appeared => EVENT_NEW_TEAMMATE,
        TeammateTransition::Removed => EVENT_TEAMMATE_REMOVED,
    };
    debug!(actor = id.0, event = name, "teammate_transition");
    ctx.events.emit(ScriptEvent {
        name: name.to_string(),
        numeric_arg: id.0 as f64,
        string_arg: String::new(),
        sender: Some(id),
    });
}

pub(crate) struct TeammateManager {
    handle: TeammateHandle,
    gate: ThrottleGate,
}

impl FrameSink for TeammateManager {
    fn on_frame(&mut self, frame: &HostFrame<'_>) {
        // Disabled means a pure no-op: no lock, no state mutation.
        if !self.handle.is_enabled() {
            return;
        }
        if !self.gate.accept(frame.now) {
            return;
        }
        let transitions = self.handle.diff_against_directory(frame.actors);
        for (id, transition) in transitions {
            frame
                .tasks
                .submit(Box::new(move |ctx| dispatch_transition(ctx, id, transition)));
        }
    }
}
