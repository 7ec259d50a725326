use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// Interval between countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Tick,
    AutoAdvance,
    RetryPrompt,
}

/// Ownership token for a scheduled task. Not `Clone`: cancelling consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct TaskHandle {
    id: u64,
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// A task that came due during `Scheduler::pop_due`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: u64,
    pub task: Task,
    pub due: Instant,
}

#[derive(Debug)]
struct Scheduled {
    id: u64,
    task: Task,
    due: Instant,
    period: Option<Duration>,
}

/// Cooperative task queue. Nothing fires unless the owner polls it.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    tasks: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_once(&mut self, task: Task, due: Instant) -> TaskHandle {
        self.insert(task, due, None)
    }

    pub fn schedule_repeating(
        &mut self,
        task: Task,
        first_due: Instant,
        period: Duration,
    ) -> TaskHandle {
        self.insert(task, first_due, Some(period))
    }

    fn insert(&mut self, task: Task, due: Instant, period: Option<Duration>) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        trace!(id, ?task, ?period, "task scheduled");
        self.tasks.push(Scheduled {
            id,
            task,
            due,
            period,
        });
        TaskHandle { id }
    }

    /// Removes the task. Returns false if it had already fired (one-shot) or was never here.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != handle.id);
        let removed = self.tasks.len() != before;
        if removed {
            trace!(id = handle.id, "task cancelled");
        }
        removed
    }

    /// Cancels whatever handle the slot holds and leaves it empty
    pub fn cancel_slot(&mut self, slot: &mut Option<TaskHandle>) -> bool {
        match slot.take() {
            Some(handle) => self.cancel(handle),
            None => false,
        }
    }

    pub fn is_scheduled(&self, handle: &TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.id == handle.id)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn pending_of(&self, task: Task) -> usize {
        self.tasks.iter().filter(|t| t.task == task).count()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.iter().map(|t| t.due).min()
    }

    /// Takes the earliest task due at or before `now`. Repeating tasks are pushed one period out.
    pub fn pop_due(&mut self, now: Instant) -> Option<Fired> {
        let pos = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(pos, _)| pos)?;

        let entry = &mut self.tasks[pos];
        let fired = Fired {
            id: entry.id,
            task: entry.task,
            due: entry.due,
        };

        let period = entry.period;
        match period {
            Some(period) => entry.due += period,
            None => {
                self.tasks.swap_remove(pos);
            }
        }

        trace!(id = fired.id, task = ?fired.task, "task fired");
        Some(fired)
    }
}

/// The once-per-second tick source. At most one is ever scheduled.
#[derive(Debug, Default)]
pub struct Countdown {
    handle: Option<TaskHandle>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts ticking one interval from `now`, replacing any tick source already running
    pub fn start(&mut self, scheduler: &mut Scheduler, now: Instant) {
        if self.stop(scheduler) {
            debug!("countdown restarted while running; previous tick source discarded");
        }
        self.handle = Some(scheduler.schedule_repeating(
            Task::Tick,
            now + TICK_INTERVAL,
            TICK_INTERVAL,
        ));
    }

    pub fn stop(&mut self, scheduler: &mut Scheduler) -> bool {
        scheduler.cancel_slot(&mut self.handle)
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Whether a fired task came from this countdown's current tick source
    pub fn owns(&self, fired: &Fired) -> bool {
        self.handle.as_ref().is_some_and(|h| h.id() == fired.id)
    }
}
