use std::time::Instant;

use rand::Rng;

use crate::catalog::{PassageCatalog, Tier};
use crate::diff::{classify, CharClass};
use crate::scorer::{compute_stats, StatsSnapshot};

/// Remaining seconds at or below which the timer display switches to low-time mode
pub const LOW_TIME_SECS: u32 = 5;

/// One attempt at one passage. Replaced wholesale on every new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    tier: Tier,
    passage: String,
    input: String,
    typing_started: bool,
    started_at: Option<Instant>,
    elapsed_secs: u32,
    time_limit_secs: u32,
}

impl Session {
    pub fn start<R: Rng + ?Sized>(catalog: &PassageCatalog, tier: Tier, rng: &mut R) -> Self {
        Self::with_passage(tier, catalog.select_passage(tier, rng))
    }

    pub fn with_passage(tier: Tier, passage: impl Into<String>) -> Self {
        Self {
            tier,
            passage: passage.into(),
            input: String::new(),
            typing_started: false,
            started_at: None,
            elapsed_secs: 0,
            time_limit_secs: tier.time_limit_secs(),
        }
    }

    /// Replaces the input. Returns true when this call started the session.
    pub fn apply_input(&mut self, text: &str, now: Instant) -> bool {
        self.input.clear();
        self.input.push_str(text);

        if self.typing_started {
            return false;
        }
        self.typing_started = true;
        self.started_at = Some(now);
        true
    }

    pub fn is_complete(&self) -> bool {
        self.input.chars().count() == self.passage.chars().count()
    }

    /// Back to a clean slate on the same passage
    pub fn cancel(&mut self) {
        self.input.clear();
        self.typing_started = false;
        self.started_at = None;
        self.elapsed_secs = 0;
    }

    pub fn advance_second(&mut self) -> u32 {
        self.elapsed_secs += 1;
        self.elapsed_secs
    }

    pub fn has_expired(&self) -> bool {
        self.elapsed_secs >= self.time_limit_secs
    }

    pub fn stats(&self) -> StatsSnapshot {
        compute_stats(
            &self.passage,
            &self.input,
            self.elapsed_secs,
            self.time_limit_secs,
        )
    }

    pub fn classify(&self) -> Vec<CharClass> {
        classify(&self.passage, &self.input)
    }

    pub fn remaining_secs(&self) -> u32 {
        self.time_limit_secs.saturating_sub(self.elapsed_secs)
    }

    pub fn is_low_time(&self) -> bool {
        self.typing_started && self.remaining_secs() <= LOW_TIME_SECS
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn passage(&self) -> &str {
        &self.passage
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn typing_started(&self) -> bool {
        self.typing_started
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }
}
