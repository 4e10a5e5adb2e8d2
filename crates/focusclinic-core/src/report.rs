//! Human-readable session reporting.
//!
//! Remaining time decomposes into whole minutes and whole seconds, with
//! "minute"/"second" singular exactly when the value is 1.

use std::time::Duration;

use crate::session::SessionSummary;

fn minutes_word(n: u64) -> &'static str {
    if n == 1 {
        "minute"
    } else {
        "minutes"
    }
}

fn seconds_word(n: u64) -> &'static str {
    if n == 1 {
        "second"
    } else {
        "seconds"
    }
}

/// Whole minutes left.
pub fn minutes_remaining(remaining: Duration) -> u64 {
    remaining.as_secs() / 60
}

/// Whole seconds left past the minute.
pub fn seconds_remaining(remaining: Duration) -> u64 {
    remaining.as_secs() % 60
}

/// "There is N minute(s) and M second(s) remaining before you will <verb>."
pub fn remaining_phrase(remaining: Duration, next_label: &str) -> String {
    let minutes = minutes_remaining(remaining);
    let seconds = seconds_remaining(remaining);
    format!(
        "There is {} {} and {} {} remaining before you will {}.",
        minutes,
        minutes_word(minutes),
        seconds,
        seconds_word(seconds),
        next_label,
    )
}

/// Per-kind time-spent breakdown for the current session.
pub fn time_spent_report(summary: &SessionSummary) -> String {
    let line = |label: &str, totals: crate::session::PhaseTotals, minutes_each: u64| {
        format!(
            "{}: {} minutes ({} x {}-minute sessions)",
            label, totals.total_minutes, totals.count, minutes_each
        )
    };
    let focus_each = per_session_minutes(summary.focus);
    let meditation_each = per_session_minutes(summary.meditation);
    let rest_each = per_session_minutes(summary.rest);
    format!(
        "Time Spent\n\n{}\n{}\n{}",
        line("Focusing", summary.focus, focus_each),
        line("Meditating", summary.meditation, meditation_each),
        line("Resting", summary.rest, rest_each),
    )
}

/// Remaining-time phrase plus the time-spent breakdown.
pub fn time_details(remaining: Duration, next_label: &str, summary: &SessionSummary) -> String {
    format!(
        "{}\n\n{}",
        remaining_phrase(remaining, next_label),
        time_spent_report(summary),
    )
}

fn per_session_minutes(totals: crate::session::PhaseTotals) -> u64 {
    if totals.count == 0 {
        0
    } else {
        totals.total_minutes / u64::from(totals.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PhaseTotals;

    #[test]
    fn decomposes_into_whole_minutes_and_seconds() {
        let d = Duration::from_secs(2 * 60 + 35);
        assert_eq!(minutes_remaining(d), 2);
        assert_eq!(seconds_remaining(d), 35);

        // Sub-second remainders floor away.
        let d = Duration::from_millis(61_900);
        assert_eq!(minutes_remaining(d), 1);
        assert_eq!(seconds_remaining(d), 1);
    }

    #[test]
    fn singular_forms_apply_exactly_at_one() {
        let phrase = remaining_phrase(Duration::from_secs(61), "meditate");
        assert_eq!(
            phrase,
            "There is 1 minute and 1 second remaining before you will meditate."
        );
    }

    #[test]
    fn plural_forms_apply_otherwise() {
        let phrase = remaining_phrase(Duration::from_secs(0), "rest");
        assert_eq!(
            phrase,
            "There is 0 minutes and 0 seconds remaining before you will rest."
        );

        let phrase = remaining_phrase(Duration::from_secs(49 * 60 + 59), "focus");
        assert_eq!(
            phrase,
            "There is 49 minutes and 59 seconds remaining before you will focus."
        );
    }

    #[test]
    fn time_spent_lists_each_kind() {
        let summary = SessionSummary {
            focus: PhaseTotals { count: 2, total_minutes: 100 },
            meditation: PhaseTotals { count: 2, total_minutes: 20 },
            rest: PhaseTotals { count: 1, total_minutes: 30 },
        };
        let report = time_spent_report(&summary);
        assert!(report.contains("Focusing: 100 minutes (2 x 50-minute sessions)"));
        assert!(report.contains("Meditating: 20 minutes (2 x 10-minute sessions)"));
        assert!(report.contains("Resting: 30 minutes (1 x 30-minute sessions)"));
    }
}
