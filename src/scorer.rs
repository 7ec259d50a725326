/// Characters per canonical word
pub const CHARS_PER_WORD: f64 = 5.0;

/// Live result of a session at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub wpm: u32,
    pub accuracy: u8,
    pub remaining_secs: u32,
}

/// Count of positions where input matches the reference, bounded by the shorter text
pub fn correct_count(reference: &str, input: &str) -> usize {
    reference
        .chars()
        .zip(input.chars())
        .filter(|(expected, typed)| expected == typed)
        .count()
}

pub fn compute_stats(
    reference: &str,
    input: &str,
    elapsed_secs: u32,
    time_limit_secs: u32,
) -> StatsSnapshot {
    let typed = input.chars().count();

    let wpm = if elapsed_secs > 0 {
        let minutes = elapsed_secs as f64 / 60.0;
        ((typed as f64 / CHARS_PER_WORD) / minutes).round() as u32
    } else {
        0
    };

    // an untyped session reads as perfectly accurate
    let accuracy = if typed > 0 {
        (100.0 * correct_count(reference, input) as f64 / typed as f64).round() as u8
    } else {
        100
    };

    StatsSnapshot {
        wpm,
        accuracy,
        remaining_secs: time_limit_secs.saturating_sub(elapsed_secs),
    }
}
