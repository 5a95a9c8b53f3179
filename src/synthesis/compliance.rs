//! Compliance annotation.
//!
//! Attaches solver analytics to published rows and derives the cycle-wide
//! summary. Analytics are de-duplicated by name before either step so the
//! per-row status and the summary always agree.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::{
    ComplianceSummary, OverallCompliance, PublishedRow, ReportedCompliance, ReviewFlag,
    RowAnalytics, RowStatus, StaffAnalytics,
};

/// Overall value the solver uses for a passing roster.
const REPORTED_PASS: &str = "pass";

/// Collapses analytics entries sharing a name.
///
/// The last entry for a name wins; it takes the position of that name's first
/// entry.
pub fn dedupe_analytics(analytics: &[StaffAnalytics]) -> Vec<StaffAnalytics> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut unique: Vec<StaffAnalytics> = Vec::with_capacity(analytics.len());

    for entry in analytics {
        match position.get(entry.name.as_str()) {
            Some(&index) => unique[index] = entry.clone(),
            None => {
                position.insert(entry.name.as_str(), unique.len());
                unique.push(entry.clone());
            }
        }
    }

    unique
}

/// Derives the cycle-wide compliance summary.
///
/// The verdict is `Pass` iff no entry is non-compliant; otherwise `Warn`
/// with the non-compliant names in analytics order.
///
/// # Example
///
/// ```
/// use roster_audit::models::{OverallCompliance, StaffAnalytics};
/// use roster_audit::synthesis::summarize;
///
/// let analytics = vec![
///     StaffAnalytics::compliant("Amy"),
///     StaffAnalytics::non_compliant("Zoe", vec![]),
/// ];
///
/// let summary = summarize(&analytics);
/// assert_eq!(summary.overall, OverallCompliance::Warn);
/// assert_eq!(summary.warnings, vec!["Zoe".to_string()]);
/// ```
pub fn summarize(analytics: &[StaffAnalytics]) -> ComplianceSummary {
    let warnings: Vec<String> = dedupe_analytics(analytics)
        .into_iter()
        .filter(|entry| !entry.compliant)
        .map(|entry| entry.name)
        .collect();

    if warnings.is_empty() {
        ComplianceSummary::pass()
    } else {
        ComplianceSummary {
            overall: OverallCompliance::Warn,
            warnings,
        }
    }
}

/// Reviewer flags for one analytics entry.
pub fn review_flags(entry: &StaffAnalytics) -> Vec<ReviewFlag> {
    let mut flags = Vec::new();

    if !entry.has_two_day_break {
        flags.push(ReviewFlag::NeedsTwoDayBreak);
    }
    if !entry.rest_breaches.is_empty() {
        flags.push(ReviewFlag::TurnaroundBreaches {
            count: entry.rest_breaches.len(),
        });
    }
    flags.extend(
        entry
            .notes
            .iter()
            .map(|text| ReviewFlag::Note { text: text.clone() }),
    );

    flags
}

/// Attaches analytics to rows by exact name and derives the summary.
///
/// Row order is preserved. Rows without a matching entry keep the explicit
/// missing marker.
pub fn annotate(
    rows: Vec<PublishedRow>,
    analytics: &[StaffAnalytics],
) -> (Vec<PublishedRow>, ComplianceSummary) {
    let unique = dedupe_analytics(analytics);
    let by_name: HashMap<&str, &StaffAnalytics> = unique
        .iter()
        .map(|entry| (entry.name.as_str(), entry))
        .collect();

    let mut unmatched = 0usize;
    let rows: Vec<PublishedRow> = rows
        .into_iter()
        .map(|row| match by_name.get(row.name.as_str()) {
            Some(entry) => PublishedRow {
                status: if entry.compliant {
                    RowStatus::Pass
                } else {
                    RowStatus::Review
                },
                review_flags: review_flags(entry),
                analytics: RowAnalytics::Attached((*entry).clone()),
                ..row
            },
            None => {
                unmatched += 1;
                PublishedRow {
                    status: RowStatus::NoAnalytics,
                    review_flags: Vec::new(),
                    analytics: RowAnalytics::Missing,
                    ..row
                }
            }
        })
        .collect();

    let summary = summarize(&unique);

    debug!(
        rows = rows.len(),
        unmatched,
        warnings = summary.warnings.len(),
        "Compliance annotated"
    );

    (rows, summary)
}

/// Compares the solver's own verdict against the derived summary.
///
/// The derived summary is authoritative; a disagreement is only logged.
/// Returns true when the two agree or the solver reported nothing.
pub fn reconcile_reported(
    reported: Option<&ReportedCompliance>,
    derived: &ComplianceSummary,
) -> bool {
    let Some(overall) = reported.and_then(|r| r.overall.as_deref()) else {
        return true;
    };

    let reported_pass = overall.trim().eq_ignore_ascii_case(REPORTED_PASS);
    let derived_pass = derived.overall == OverallCompliance::Pass;

    if reported_pass != derived_pass {
        warn!(
            reported = overall,
            derived = ?derived.overall,
            warnings = derived.warnings.len(),
            "Solver compliance verdict disagrees with analytics"
        );
        return false;
    }

    true
}
