use serde::Serialize;
use tracing::trace;

use crate::actor::ActorId;

/// A fire-and-forget named event broadcast to the scripting layer. No
/// acknowledgment is observed by the sender.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptEvent {
    pub name: String,
    pub numeric_arg: f64,
    pub string_arg: String,
    pub sender: Option<ActorId>,
}

#[derive(Debug, Default)]
pub struct ScriptEventBus {
    pending: Vec<ScriptEvent>,
    total_emitted: u64,
}

impl ScriptEventBus {
    pub fn emit(&mut self, event: ScriptEvent) {
        trace!(
            name = %event.name,
            numeric_arg = event.numeric_arg,
            sender = event.sender.map(|id| id.0),
            "script_event"
        );
        self.total_emitted = self.total_emitted.saturating_add(1);
        self.pending.push(event);
    }

    /// Events emitted since the last drain, in emission order.
    pub fn events(&self) -> &[ScriptEvent] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<ScriptEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn total_emitted(&self) -> u64 {
        self.total_emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str, numeric_arg: f64) -> ScriptEvent {
        ScriptEvent {
            name: name.to_string(),
            numeric_arg,
            string_arg: String::new(),
            sender: None,
        }
    }

    #[test]
    fn emit_preserves_order() {
        let mut bus = ScriptEventBus::default();
        bus.emit(event("First", 1.0));
        bus.emit(event("Second", 2.0));

        let names: Vec<&str> = bus.events().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[test]
    fn drain_empties_pending_but_keeps_total() {
        let mut bus = ScriptEventBus::default();
        bus.emit(event("First", 1.0));
        bus.emit(event("Second", 2.0));

        let drained = bus.drain();
        assert_eq!(drained.len(), 2);
        assert!(bus.events().is_empty());
        assert_eq!(bus.total_emitted(), 2);

        bus.emit(event("Third", 3.0));
        assert_eq!(bus.total_emitted(), 3);
    }
}
