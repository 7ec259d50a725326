use std::fmt;
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{PassageCatalog, Tier};
use crate::diff::CharClass;
use crate::scorer::StatsSnapshot;
use crate::session::Session;
use crate::timer::{Countdown, Fired, Scheduler, Task, TaskHandle};

/// Pause between finishing a passage and the next one appearing
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_secs(1);
/// Pause between the countdown running out and the retry prompt
pub const RETRY_PROMPT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    /// Passage fully typed; waiting out the grace delay before advancing
    Completed,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Tick { elapsed: u32 },
    Expired,
    RetryPrompt,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Accepted,
    /// First input of the session; the countdown is now running
    Started,
    Completed,
    Locked,
}

/// Opaque style identifier chosen by the front-end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Font(String);

impl Font {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("cinzel")
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Font {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Everything a front-end needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    pub passage: &'a str,
    pub input: &'a str,
    pub classes: Vec<CharClass>,
    pub stats: StatsSnapshot,
    pub remaining_secs: u32,
    pub low_time: bool,
    pub input_locked: bool,
    pub retry_prompt: bool,
    pub phase: Phase,
    pub tier: Tier,
    pub font: &'a Font,
}

/// Drives sessions through idle, running, completion and expiry
#[derive(Debug)]
pub struct Lifecycle<R: Rng = StdRng> {
    catalog: PassageCatalog,
    rng: R,
    session: Session,
    scheduler: Scheduler,
    countdown: Countdown,
    advance: Option<TaskHandle>,
    retry: Option<TaskHandle>,
    prompt_open: bool,
    phase: Phase,
    font: Font,
    /// Fired but not yet handed out by `poll`
    backlog: Vec<LifecycleEvent>,
}

impl Lifecycle<StdRng> {
    pub fn new(catalog: PassageCatalog, tier: Tier, font: Font) -> Self {
        Self::with_rng(catalog, tier, font, StdRng::from_entropy())
    }
}

impl<R: Rng> Lifecycle<R> {
    pub fn with_rng(catalog: PassageCatalog, tier: Tier, font: Font, mut rng: R) -> Self {
        let session = Session::start(&catalog, tier, &mut rng);
        info!(%tier, passage_len = session.passage().chars().count(), "session started");
        Self {
            catalog,
            rng,
            session,
            scheduler: Scheduler::new(),
            countdown: Countdown::new(),
            advance: None,
            retry: None,
            prompt_open: false,
            phase: Phase::Idle,
            font,
            backlog: Vec::new(),
        }
    }

    /// Forwards the full input text after a keystroke
    pub fn on_input(&mut self, text: &str, now: Instant) -> InputOutcome {
        // anything already due happened before this keystroke
        self.catch_up(now);
        if self.input_locked() {
            debug!(phase = ?self.phase, "input ignored while locked");
            return InputOutcome::Locked;
        }

        let started = self.session.apply_input(text, now);
        if started {
            self.countdown.start(&mut self.scheduler, now);
            self.phase = Phase::Running;
            info!(limit = self.session.time_limit_secs(), "countdown started");
        }

        if self.session.is_complete() {
            self.countdown.stop(&mut self.scheduler);
            self.advance = Some(
                self.scheduler
                    .schedule_once(Task::AutoAdvance, now + AUTO_ADVANCE_DELAY),
            );
            self.phase = Phase::Completed;
            let stats = self.session.stats();
            info!(wpm = stats.wpm, accuracy = stats.accuracy, "passage completed");
            return InputOutcome::Completed;
        }

        if started {
            InputOutcome::Started
        } else {
            InputOutcome::Accepted
        }
    }

    /// Fires every task due at `now`, in due order, and returns the events since the last poll
    pub fn poll(&mut self, now: Instant) -> Vec<LifecycleEvent> {
        self.catch_up(now);
        std::mem::take(&mut self.backlog)
    }

    /// Fires every task due at `now`, keeping the events for the next `poll`
    pub fn catch_up(&mut self, now: Instant) {
        while let Some(fired) = self.scheduler.pop_due(now) {
            match fired.task {
                Task::Tick => self.on_tick(&fired),
                Task::RetryPrompt => {
                    if take_if_owned(&mut self.retry, &fired) {
                        self.prompt_open = true;
                        info!("retry prompt issued");
                        self.backlog.push(LifecycleEvent::RetryPrompt);
                    }
                }
                Task::AutoAdvance => {
                    if take_if_owned(&mut self.advance, &fired) {
                        self.reset_session(self.session.tier());
                        self.backlog.push(LifecycleEvent::Advanced);
                    }
                }
            }
        }
    }

    fn on_tick(&mut self, fired: &Fired) {
        if !self.countdown.owns(fired) {
            debug!(id = fired.id, "stale tick dropped");
            return;
        }

        let elapsed = self.session.advance_second();
        self.backlog.push(LifecycleEvent::Tick { elapsed });

        if self.session.has_expired() {
            self.countdown.stop(&mut self.scheduler);
            self.retry = Some(
                self.scheduler
                    .schedule_once(Task::RetryPrompt, fired.due + RETRY_PROMPT_DELAY),
            );
            self.phase = Phase::Expired;
            let stats = self.session.stats();
            info!(
                elapsed,
                wpm = stats.wpm,
                accuracy = stats.accuracy,
                "time expired"
            );
            self.backlog.push(LifecycleEvent::Expired);
        }
    }

    /// Answer to the retry prompt. Both answers start a fresh session.
    pub fn answer_retry(&mut self, retry: bool) -> bool {
        if self.phase != Phase::Expired || !self.prompt_open {
            return false;
        }
        info!(retry, "retry prompt answered");
        self.reset_session(self.session.tier());
        true
    }

    /// Escape: clears input and stops the clock, keeping the passage
    pub fn cancel(&mut self) {
        self.stop_all();
        self.session.cancel();
        self.phase = Phase::Idle;
        info!("session cancelled");
    }

    pub fn new_text(&mut self) {
        self.reset_session(self.session.tier());
    }

    pub fn select_tier(&mut self, tier: Tier) {
        info!(%tier, "tier selected");
        self.reset_session(tier);
    }

    pub fn select_font(&mut self, font: Font) {
        info!(%font, "font selected");
        self.font = font;
    }

    fn reset_session(&mut self, tier: Tier) {
        self.stop_all();
        self.session = Session::start(&self.catalog, tier, &mut self.rng);
        self.phase = Phase::Idle;
        info!(%tier, passage_len = self.session.passage().chars().count(), "session started");
    }

    fn stop_all(&mut self) {
        self.countdown.stop(&mut self.scheduler);
        self.scheduler.cancel_slot(&mut self.advance);
        self.scheduler.cancel_slot(&mut self.retry);
        self.prompt_open = false;
    }

    pub fn input_locked(&self) -> bool {
        matches!(self.phase, Phase::Expired | Phase::Completed)
    }

    pub fn view(&self) -> View<'_> {
        View {
            passage: self.session.passage(),
            input: self.session.input(),
            classes: self.session.classify(),
            stats: self.session.stats(),
            remaining_secs: self.session.remaining_secs(),
            low_time: self.phase == Phase::Running && self.session.is_low_time(),
            input_locked: self.input_locked(),
            retry_prompt: self.prompt_open,
            phase: self.phase,
            tier: self.session.tier(),
            font: &self.font,
        }
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn tier(&self) -> Tier {
        self.session.tier()
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn retry_prompt_open(&self) -> bool {
        self.prompt_open
    }
}

fn take_if_owned(slot: &mut Option<TaskHandle>, fired: &Fired) -> bool {
    if slot.as_ref().is_some_and(|h| h.id() == fired.id) {
        *slot = None;
        true
    } else {
        false
    }
}
