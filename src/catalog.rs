use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Difficulty bucket selecting both the passage pool and the countdown length
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    pub fn time_limit_secs(self) -> u32 {
        match self {
            Tier::Easy => 15,
            Tier::Medium => 30,
            Tier::Hard => 60,
        }
    }

    /// Cycles easy -> medium -> hard -> easy
    pub fn next(self) -> Tier {
        match self {
            Tier::Easy => Tier::Medium,
            Tier::Medium => Tier::Hard,
            Tier::Hard => Tier::Easy,
        }
    }

    fn index(self) -> usize {
        match self {
            Tier::Easy => 0,
            Tier::Medium => 1,
            Tier::Hard => 2,
        }
    }
}

pub fn time_limit(tier: Tier) -> u32 {
    tier.time_limit_secs()
}

const EASY: [&str; 5] = [
    "The ghost whispers softly.",
    "Mist floats through ancient halls.",
    "Secrets sleep in forgotten tombs.",
    "Time stands still in the void.",
    "Spirits dance among the stars.",
];

const MEDIUM: [&str; 5] = [
    "The ancient spirits whisper through the misty veil of forgotten realms.",
    "Green particles drift silently through the cosmic void of endless night.",
    "Typing fast requires focus and the ability to maintain steady rhythm.",
    "Haunted by memories but driven by dreams the ghosts watch over us all.",
    "Every keystroke echoes through the digital realm creating waves of change.",
];

const HARD: [&str; 5] = [
    "The ancient spirits whisper through the misty veil of forgotten realms where time stands still and secrets sleep in eternal slumber beneath the stars.",
    "In the depths of cosmic space green particles drift silently illuminating the void with their ethereal glow carrying whispers of civilizations long lost to time.",
    "Typing fast and accurately requires consistent practice focused attention and the ability to maintain rhythm while avoiding mistakes that slow your progress dramatically.",
    "Haunted by the echoes of the past but driven by visions of the future the spectral guardians watch over the threshold where technology and mysticism intertwine eternally.",
    "Every keystroke resonates through the digital void creating ripples that shape the fabric of code and imagination beyond the boundaries of ordinary perception.",
];

/// Static passage pools, one per tier. Every pool is non-empty once constructed.
#[derive(Debug, Clone)]
pub struct PassageCatalog {
    pools: [Vec<String>; 3],
}

impl PassageCatalog {
    pub fn new(
        easy: Vec<String>,
        medium: Vec<String>,
        hard: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            pools: [easy, medium, hard],
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in passage set
    pub fn builtin() -> Self {
        let owned = |texts: &[&str]| texts.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        Self {
            pools: [owned(&EASY), owned(&MEDIUM), owned(&HARD)],
        }
    }

    /// Every tier needs at least one non-empty passage
    pub fn validate(&self) -> Result<(), CatalogError> {
        for tier in Tier::ALL {
            let pool = self.passages(tier);
            if pool.is_empty() {
                return Err(CatalogError::EmptyTier(tier));
            }
            if pool.iter().any(|p| p.is_empty()) {
                return Err(CatalogError::EmptyPassage(tier));
            }
        }
        Ok(())
    }

    pub fn passages(&self, tier: Tier) -> &[String] {
        &self.pools[tier.index()]
    }

    /// Uniformly random pick from the tier's pool
    pub fn select_passage<R: Rng + ?Sized>(&self, tier: Tier, rng: &mut R) -> &str {
        let pool = self.passages(tier);
        &pool[rng.gen_range(0..pool.len())]
    }
}

impl Default for PassageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
