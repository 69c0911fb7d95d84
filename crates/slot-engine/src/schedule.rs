//! A provider's full rule set together with the time zone it is declared in.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::rule::{AvailabilityRow, AvailabilityRule};
use crate::validate::{validate_rows, validate_rows_for, RuleWarning};

/// All availability rules for one provider.
///
/// Rule times are wall-clock times in `timezone`; "today" for the provider is
/// computed in that zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSchedule {
    pub provider_id: String,
    pub timezone: Tz,
    /// Appointment length for this provider. Overrides the resolver config.
    pub session_minutes: Option<u32>,
    pub rules: Vec<AvailabilityRule>,
}

/// Serialized schedule document: `{"providerId", "timezone", "rules": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDocument {
    #[serde(default, alias = "provider_id")]
    pub provider_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, alias = "session_minutes", skip_serializing_if = "Option::is_none")]
    pub session_minutes: Option<u32>,
    #[serde(default)]
    pub rules: Vec<AvailabilityRow>,
}

/// Input accepted by [`ProviderSchedule::from_json`]: either a full document
/// or the bare row array the persistence layer returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ScheduleInput {
    Document(ScheduleDocument),
    Rows(Vec<AvailabilityRow>),
}

/// A parsed schedule and the warnings for rows that were dropped or flagged.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleReport {
    pub schedule: ProviderSchedule,
    pub warnings: Vec<RuleWarning>,
}

/// Parse an IANA zone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

impl ProviderSchedule {
    pub fn new(provider_id: impl Into<String>, timezone: Tz, rules: Vec<AvailabilityRule>) -> Self {
        Self {
            provider_id: provider_id.into(),
            timezone,
            session_minutes: None,
            rules,
        }
    }

    pub fn with_session_minutes(mut self, minutes: u32) -> Self {
        self.session_minutes = Some(minutes);
        self
    }

    /// Build a schedule from a document, validating every row.
    ///
    /// Only an unknown time zone or a zero session length is an error;
    /// defective rows become warnings.
    pub fn from_document(doc: ScheduleDocument, granularity_minutes: u32) -> Result<ScheduleReport> {
        let timezone = match doc.timezone.as_deref() {
            Some(name) if !name.trim().is_empty() => parse_timezone(name.trim())?,
            _ => Tz::UTC,
        };
        if doc.session_minutes == Some(0) {
            return Err(SlotError::InvalidConfig(
                "sessionMinutes must be positive".to_string(),
            ));
        }

        let report = if doc.provider_id.is_empty() {
            validate_rows(&doc.rules, granularity_minutes)
        } else {
            validate_rows_for(&doc.provider_id, &doc.rules, granularity_minutes)
        };

        tracing::debug!(
            provider_id = %doc.provider_id,
            timezone = timezone.name(),
            rules = report.rules.len(),
            warnings = report.warnings.len(),
            "loaded provider schedule"
        );

        Ok(ScheduleReport {
            schedule: Self {
                provider_id: doc.provider_id,
                timezone,
                session_minutes: doc.session_minutes,
                rules: report.rules,
            },
            warnings: report.warnings,
        })
    }

    /// Parse a schedule document or a bare array of rule rows.
    pub fn from_json(json: &str, granularity_minutes: u32) -> Result<ScheduleReport> {
        let doc = match serde_json::from_str::<ScheduleInput>(json)? {
            ScheduleInput::Document(doc) => doc,
            ScheduleInput::Rows(rules) => ScheduleDocument {
                provider_id: String::new(),
                timezone: None,
                session_minutes: None,
                rules,
            },
        };
        Self::from_document(doc, granularity_minutes)
    }

    /// Render back into the serialized document form.
    pub fn to_document(&self) -> ScheduleDocument {
        ScheduleDocument {
            provider_id: self.provider_id.clone(),
            timezone: Some(self.timezone.name().to_string()),
            session_minutes: self.session_minutes,
            rules: self.rules.iter().map(AvailabilityRow::from).collect(),
        }
    }
}
