//! Row validation with separately reported warnings.
//!
//! The resolver silently ignores anything it cannot use. Callers that need to
//! tell "no availability" apart from "bad data" run rows through
//! [`validate_rows`] first: every row either becomes a typed rule or a
//! [`RuleWarning`], and the batch never fails as a whole.

use serde::Serialize;

use crate::rule::{AvailabilityRow, AvailabilityRule, RuleDefect};

/// A row that was rejected or accepted with a caveat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleWarning {
    /// Position of the row in the input.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub defect: RuleDefect,
}

/// Typed rules plus the warnings collected while producing them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleReport {
    #[serde(skip)]
    pub rules: Vec<AvailabilityRule>,
    pub warnings: Vec<RuleWarning>,
}

impl RuleReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Warnings for rows that were dropped (as opposed to kept with a caveat).
    pub fn rejected(&self) -> impl Iterator<Item = &RuleWarning> {
        self.warnings
            .iter()
            .filter(|w| !matches!(w.defect, RuleDefect::NarrowWindow { .. }))
    }
}

/// Convert rows into typed rules, collecting a warning for each defect.
///
/// Inactive rows are kept (the resolver skips them). Rules whose window is
/// narrower than one `granularity_minutes` step are kept with a
/// [`RuleDefect::NarrowWindow`] warning since they can never yield a slot.
pub fn validate_rows(rows: &[AvailabilityRow], granularity_minutes: u32) -> RuleReport {
    validate(rows, None, granularity_minutes)
}

/// Like [`validate_rows`], but also rejects rows owned by a different provider.
///
/// Rows with an empty `providerId` are adopted by `provider_id`.
pub fn validate_rows_for(
    provider_id: &str,
    rows: &[AvailabilityRow],
    granularity_minutes: u32,
) -> RuleReport {
    validate(rows, Some(provider_id), granularity_minutes)
}

fn validate(rows: &[AvailabilityRow], owner: Option<&str>, granularity_minutes: u32) -> RuleReport {
    let mut report = RuleReport::default();

    for (index, row) in rows.iter().enumerate() {
        let mut warn = |defect: RuleDefect| {
            tracing::warn!(index, rule_id = ?row.id, %defect, "availability rule warning");
            report.warnings.push(RuleWarning {
                index,
                rule_id: row.id.clone(),
                defect,
            });
        };

        if let Some(owner) = owner {
            if !row.provider_id.is_empty() && row.provider_id != owner {
                warn(RuleDefect::ForeignProvider(row.provider_id.clone()));
                continue;
            }
        }

        let mut rule = match AvailabilityRule::try_from(row.clone()) {
            Ok(rule) => rule,
            Err(defect) => {
                warn(defect);
                continue;
            }
        };

        let window_minutes = rule.window_minutes();
        if granularity_minutes > 0 && window_minutes < i64::from(granularity_minutes) {
            warn(RuleDefect::NarrowWindow {
                window_minutes,
                granularity_minutes,
            });
        }

        if let Some(owner) = owner {
            if rule.provider_id.is_empty() {
                rule.provider_id = owner.to_string();
            }
        }
        report.rules.push(rule);
    }

    report
}
