//! Server-side filter for the "matches to report" list.

use chrono::{Days, NaiveDate};
use serde_json::{json, Value};

use crate::types::{AgeCategory, Gender, MatchStatus, Record};

/// Default window start, relative to today.
pub const DEFAULT_DAYS_BACK: u64 = 7;
/// Default window end, relative to today.
pub const DEFAULT_DAYS_AHEAD: u64 = 365;

/// Statuses the portal's own UI pre-selects.
pub const DEFAULT_STATUSES: [MatchStatus; 3] = [
    MatchStatus::Interrupted,
    MatchStatus::Postponed,
    MatchStatus::Cancelled,
];
pub const DEFAULT_AGE_CATEGORIES: [AgeCategory; 5] = AgeCategory::ALL;
pub const DEFAULT_GENDERS: [Gender; 3] = [Gender::Female, Gender::Male, Gender::Mixed];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-range criteria forwarded in the `filter` member of a match list call.
///
/// Only fields that were set are serialized by [`MatchListQuery::to_filter`].
/// [`MatchListQuery::to_payload`] fills every unset field with the portal
/// defaults instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchListQuery {
    /// First match date (`datumFran`).
    pub date_from: Option<NaiveDate>,
    /// Last match date (`datumTill`).
    pub date_to: Option<NaiveDate>,
    /// Date interpretation (`datumTyp`): 0 relative, 1 fixed.
    pub date_type: Option<i64>,
    /// Saved-date marker (`sparadDatum`).
    pub saved_date: Option<NaiveDate>,
}

impl MatchListQuery {
    pub fn with_date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn with_date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn with_date_type(mut self, date_type: i64) -> Self {
        self.date_type = Some(date_type);
        self
    }

    pub fn with_saved_date(mut self, date: NaiveDate) -> Self {
        self.saved_date = Some(date);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The configured fields only, keyed by portal field name.
    pub fn to_filter(&self) -> Record {
        let mut filter = Record::new();
        if let Some(date) = self.date_from {
            filter.insert("datumFran".into(), format_date(date));
        }
        if let Some(date) = self.date_to {
            filter.insert("datumTill".into(), format_date(date));
        }
        if let Some(date_type) = self.date_type {
            filter.insert("datumTyp".into(), json!(date_type));
        }
        if let Some(date) = self.saved_date {
            filter.insert("sparadDatum".into(), format_date(date));
        }
        filter
    }

    /// Full request body: the portal defaults overlaid with the configured fields.
    ///
    /// Defaults cover one week back through a year ahead, today as saved date,
    /// and the status, age and gender codes the portal UI sends.
    pub fn to_payload(&self, today: NaiveDate) -> Value {
        let from = today
            .checked_sub_days(Days::new(DEFAULT_DAYS_BACK))
            .unwrap_or(today);
        let to = today
            .checked_add_days(Days::new(DEFAULT_DAYS_AHEAD))
            .unwrap_or(today);

        let mut filter = Record::new();
        filter.insert("datumFran".into(), format_date(from));
        filter.insert("datumTill".into(), format_date(to));
        filter.insert("datumTyp".into(), json!(0));
        filter.insert("typ".into(), json!("alla"));
        filter.insert(
            "status".into(),
            json!(DEFAULT_STATUSES.iter().map(|s| s.code()).collect::<Vec<_>>()),
        );
        filter.insert(
            "alderskategori".into(),
            json!(DEFAULT_AGE_CATEGORIES
                .iter()
                .map(|c| c.code())
                .collect::<Vec<_>>()),
        );
        filter.insert(
            "kon".into(),
            json!(DEFAULT_GENDERS.iter().map(|g| g.code()).collect::<Vec<_>>()),
        );
        filter.insert("sparadDatum".into(), format_date(today));
        filter.extend(self.to_filter());

        json!({ "filter": filter })
    }
}

fn format_date(date: NaiveDate) -> Value {
    Value::String(date.format(DATE_FORMAT).to_string())
}
