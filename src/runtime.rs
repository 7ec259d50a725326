use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Longest the loop blocks when nothing is scheduled; also the redraw cadence
pub const TICK_RATE_MS: u64 = 100;

const IDLE_WAIT: Duration = Duration::from_millis(TICK_RATE_MS);

/// What woke the event loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// Nothing arrived before the wait ran out
    Timeout,
}

pub trait InputSource {
    /// Waits at most `timeout` for input. `Ok(None)` means the wait ran out.
    fn next_input(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>>;
}

/// Reads the controlling terminal directly
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn next_input(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>> {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if !event::poll(left)? {
                return Ok(None);
            }
            match event::read()? {
                // release/repeat events would double-type on some terminals
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(Some(AppEvent::Key(key)))
                }
                Event::Resize(_, _) => return Ok(Some(AppEvent::Resize)),
                _ => {}
            }
        }
    }
}

/// Replays queued input without a terminal and records every wait it was asked for
#[derive(Debug, Default)]
pub struct ScriptedInput {
    queue: VecDeque<AppEvent>,
    waits: Vec<Duration>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: AppEvent) {
        self.queue.push_back(event);
    }

    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }
}

impl InputSource for ScriptedInput {
    fn next_input(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>> {
        self.waits.push(timeout);
        Ok(self.queue.pop_front())
    }
}

/// How long the loop may block at `now` without running a scheduled task late
pub fn wait_budget(now: Instant, next_due: Option<Instant>) -> Duration {
    match next_due {
        Some(due) => due.saturating_duration_since(now).min(IDLE_WAIT),
        None => IDLE_WAIT,
    }
}

/// Pulls one event at a time, waking in time for the next scheduled task
#[derive(Debug)]
pub struct Pump<S: InputSource> {
    source: S,
}

impl<S: InputSource> Pump<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn next(&mut self, now: Instant, next_due: Option<Instant>) -> io::Result<AppEvent> {
        let budget = wait_budget(now, next_due);
        Ok(self.source.next_input(budget)?.unwrap_or(AppEvent::Timeout))
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
