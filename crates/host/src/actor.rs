use serde::Serialize;
use tracing::trace;

use crate::packages::PackageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ActorId(pub u64);

/// Simulation priority bucket an actor is currently processed in. The
/// directory keeps one ordered list per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessLevel {
    High,
    MiddleHigh,
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    /// Whether the actor currently has 3D loaded (rendered/simulated).
    pub loaded: bool,
    pub in_combat: bool,
    pub dead: bool,
    pub teammate: bool,
    /// The behavior package currently driving the actor, if any.
    pub package: Option<PackageId>,
    animation_events: Vec<String>,
}

impl Actor {
    /// Delivers a named animation event to the actor's behavior layer. The
    /// event name is opaque to the host; it is recorded on the actor so
    /// consumers can observe what was played.
    pub fn notify_animation_event(&mut self, event: &str) {
        trace!(actor = self.id.0, event, "animation_event");
        self.animation_events.push(event.to_string());
    }

    pub fn animation_events(&self) -> &[String] {
        &self.animation_events
    }
}

#[derive(Debug, Default)]
struct ActorIdAllocator {
    next: u64,
}

impl ActorIdAllocator {
    fn allocate(&mut self) -> ActorId {
        let id = ActorId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Live actor population owned by the host. Lookups by id return `None`
/// for despawned actors; callers treat that as an expected race, not an
/// error.
#[derive(Debug, Default)]
pub struct ActorDirectory {
    allocator: ActorIdAllocator,
    actors: Vec<Actor>,
    high_process: Vec<ActorId>,
    middle_high_process: Vec<ActorId>,
    player: Option<ActorId>,
}

impl ActorDirectory {
    /// Spawns a loaded actor with default flags and no process-list
    /// membership.
    pub fn spawn(&mut self, name: &str) -> ActorId {
        let id = self.allocator.allocate();
        self.actors.push(Actor {
            id,
            name: name.to_string(),
            loaded: true,
            in_combat: false,
            dead: false,
            teammate: false,
            package: None,
            animation_events: Vec::new(),
        });
        id
    }

    pub fn despawn(&mut self, id: ActorId) -> bool {
        let before = self.actors.len();
        self.actors.retain(|actor| actor.id != id);
        if self.actors.len() == before {
            return false;
        }
        self.high_process.retain(|entry| *entry != id);
        self.middle_high_process.retain(|entry| *entry != id);
        if self.player == Some(id) {
            self.player = None;
        }
        true
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn find_actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    pub fn find_actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| actor.id == id)
    }

    pub fn set_player(&mut self, player: Option<ActorId>) {
        self.player = player;
    }

    pub fn player(&self) -> Option<ActorId> {
        self.player
    }

    /// Moves the actor to the given process list, or drops it from both
    /// when `level` is `None`. Returns false for stale ids.
    pub fn set_process_level(&mut self, id: ActorId, level: Option<ProcessLevel>) -> bool {
        if self.find_actor(id).is_none() {
            return false;
        }
        self.high_process.retain(|entry| *entry != id);
        self.middle_high_process.retain(|entry| *entry != id);
        match level {
            Some(ProcessLevel::High) => self.high_process.push(id),
            Some(ProcessLevel::MiddleHigh) => self.middle_high_process.push(id),
            None => {}
        }
        true
    }

    pub fn high_process(&self) -> &[ActorId] {
        &self.high_process
    }

    pub fn middle_high_process(&self) -> &[ActorId] {
        &self.middle_high_process
    }
}
