use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use tracing::warn;

use crate::actor::ActorDirectory;
use crate::events::ScriptEventBus;
use crate::packages::PackageRegistry;

static TASK_QUEUE_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_task_queue_poison_once(operation: &'static str) {
    if TASK_QUEUE_POISON_WARNED
        .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
    {
        warn!(operation, "task queue lock poisoned; recovered inner value");
    }
}

/// Mutation-safe view of the host handed to deferred tasks when the queue
/// is drained. Tasks are the only place host state is mutated.
pub struct TaskContext<'a> {
    pub now: Instant,
    pub actors: &'a mut ActorDirectory,
    pub packages: &'a PackageRegistry,
    pub events: &'a mut ScriptEventBus,
}

pub type DeferredTask = Box<dyn FnOnce(&mut TaskContext<'_>) + Send>;

/// One-way FIFO submission queue. Submitters get no completion signal;
/// the session drains and runs pending tasks once per frame.
#[derive(Default)]
pub struct TaskQueue {
    pending: Mutex<Vec<DeferredTask>>,
}

impl TaskQueue {
    pub fn submit(&self, task: DeferredTask) {
        match self.pending.lock() {
            Ok(mut guard) => guard.push(task),
            Err(poisoned) => {
                warn_task_queue_poison_once("submit");
                poisoned.into_inner().push(task);
            }
        }
    }

    pub fn drain(&self) -> Vec<DeferredTask> {
        match self.pending.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => {
                warn_task_queue_poison_once("drain");
                std::mem::take(&mut *poisoned.into_inner())
            }
        }
    }

    pub fn pending_count(&self) -> usize {
        match self.pending.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => {
                warn_task_queue_poison_once("pending_count");
                poisoned.into_inner().len()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ScriptEvent;

    fn run_all(queue: &TaskQueue) -> Vec<String> {
        let mut actors = ActorDirectory::default();
        let packages = PackageRegistry::default();
        let mut events = ScriptEventBus::default();
        let mut ctx = TaskContext {
            now: Instant::now(),
            actors: &mut actors,
            packages: &packages,
            events: &mut events,
        };
        for task in queue.drain() {
            task(&mut ctx);
        }
        ctx.events.drain().into_iter().map(|event| event.name).collect()
    }

    fn emit_task(name: &'static str) -> DeferredTask {
        Box::new(move |ctx| {
            ctx.events.emit(ScriptEvent {
                name: name.to_string(),
                numeric_arg: 0.0,
                string_arg: String::new(),
                sender: None,
            });
        })
    }

    #[test]
    fn drain_runs_tasks_in_submission_order() {
        let queue = TaskQueue::default();
        queue.submit(emit_task("first"));
        queue.submit(emit_task("second"));
        queue.submit(emit_task("third"));
        assert_eq!(queue.pending_count(), 3);

        assert_eq!(run_all(&queue), ["first", "second", "third"]);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn drain_on_empty_queue_is_empty() {
        let queue = TaskQueue::default();
        assert!(queue.drain().is_empty());
    }
}
