//! Suspicion scoring -- keyword signals, aggregate score, verdict.
//!
//! ```text
//! score = file_created * |file events|
//!       + process_spawned * |process events|
//!       + sum(signal.weight)
//! ```
//!
//! With the default weights and rule table this is
//! `5 * files + 10 * processes + 20 * signals`. All weights are unsigned,
//! so adding an event or signal can only raise the score.

pub mod rules;
pub mod weights;

pub use rules::{default_rules, RiskRule};
pub use weights::ScoreWeights;

use crate::types::{FileSystemEvent, ProcessEvent, SuspicionSignal, Verdict};

/// Match every process event against every rule.
///
/// One signal per (process, rule, keyword) hit. Name and command line are
/// lowercased; the command line is space-joined.
pub fn score_signals(process_events: &[ProcessEvent], rules: &[RiskRule]) -> Vec<SuspicionSignal> {
    let mut signals = Vec::new();

    for event in process_events {
        let name = event.name.to_lowercase();
        let cmdline = event.cmdline.join(" ").to_lowercase();

        for rule in rules {
            for keyword in rule.matches(&name, &cmdline) {
                signals.push(SuspicionSignal {
                    category: rule.category.clone(),
                    keyword: keyword.to_string(),
                    weight: rule.weight,
                    process: event.identity(),
                });
            }
        }
    }

    signals
}

/// Aggregate risk score. Saturates instead of overflowing.
pub fn aggregate(
    file_events: &[FileSystemEvent],
    process_events: &[ProcessEvent],
    signals: &[SuspicionSignal],
    weights: &ScoreWeights,
) -> u32 {
    let files = weighted(file_events.len(), weights.file_created);
    let processes = weighted(process_events.len(), weights.process_spawned);
    let keywords = signals
        .iter()
        .fold(0u32, |acc, s| acc.saturating_add(s.weight));

    files.saturating_add(processes).saturating_add(keywords)
}

/// Verdict for a score.
pub const fn classify(score: u32) -> Verdict {
    Verdict::from_score(score)
}

fn weighted(count: usize, weight: u32) -> u32 {
    u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(weight)
}
