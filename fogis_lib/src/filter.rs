//! Match list filtering: date range sent to the portal, code sets applied locally.
//!
//! The portal only narrows the match list by date. Status, age category,
//! gender and football type are filtered on the returned records, each field
//! independently, and a match has to pass every configured field.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;

use chrono::NaiveDate;
use fogis_api::types::{AgeCategory, FootballType, Gender, MatchStatus};
use fogis_api::MatchListQuery;
use serde_json::Value;

use crate::client::FogisClient;
use crate::error::FogisError;
use crate::validation::{validate_date, validate_date_type};

/// Include and exclude sets for one match field. Include wins when both are set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldFilter<T: Eq + Hash> {
    pub include: Option<HashSet<T>>,
    pub exclude: Option<HashSet<T>>,
}

impl<T: Eq + Hash> Default for FieldFilter<T> {
    fn default() -> Self {
        Self {
            include: None,
            exclude: None,
        }
    }
}

impl<T: Eq + Hash> FieldFilter<T> {
    pub fn is_unset(&self) -> bool {
        self.include.is_none() && self.exclude.is_none()
    }

    /// Whether a match carrying `values` for this field is kept.
    fn keeps(&self, values: &[T]) -> bool {
        if let Some(include) = &self.include {
            return values.iter().any(|v| include.contains(v));
        }
        if let Some(exclude) = &self.exclude {
            return !values.iter().any(|v| exclude.contains(v));
        }
        true
    }
}

/// Unvalidated filter settings. Every value is taken as text and checked in
/// [`MatchListFilter::build`], so typed codes and raw portal values can be
/// mixed freely.
#[derive(Clone, Debug, Default)]
pub struct MatchListFilter {
    start_date: Option<String>,
    end_date: Option<String>,
    date_type: Option<String>,
    saved_date: Option<String>,
    include_statuses: Option<Vec<String>>,
    exclude_statuses: Option<Vec<String>>,
    include_age_categories: Option<Vec<String>>,
    exclude_age_categories: Option<Vec<String>>,
    include_genders: Option<Vec<String>>,
    exclude_genders: Option<Vec<String>>,
    include_football_types: Option<Vec<String>>,
    exclude_football_types: Option<Vec<String>>,
}

fn strings<I, V>(values: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = V>,
    V: ToString,
{
    Some(values.into_iter().map(|v| v.to_string()).collect())
}

impl MatchListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(mut self, date: impl ToString) -> Self {
        self.start_date = Some(date.to_string());
        self
    }

    pub fn end_date(mut self, date: impl ToString) -> Self {
        self.end_date = Some(date.to_string());
        self
    }

    /// 0 for a relative range, 1 for fixed dates.
    pub fn date_type(mut self, date_type: impl ToString) -> Self {
        self.date_type = Some(date_type.to_string());
        self
    }

    pub fn saved_date(mut self, date: impl ToString) -> Self {
        self.saved_date = Some(date.to_string());
        self
    }

    pub fn include_statuses(mut self, v: impl IntoIterator<Item = impl ToString>) -> Self {
        self.include_statuses = strings(v);
        self
    }

    pub fn exclude_statuses(mut self, v: impl IntoIterator<Item = impl ToString>) -> Self {
        self.exclude_statuses = strings(v);
        self
    }

    pub fn include_age_categories(mut self, v: impl IntoIterator<Item = impl ToString>) -> Self {
        self.include_age_categories = strings(v);
        self
    }

    pub fn exclude_age_categories(mut self, v: impl IntoIterator<Item = impl ToString>) -> Self {
        self.exclude_age_categories = strings(v);
        self
    }

    pub fn include_genders(mut self, v: impl IntoIterator<Item = impl ToString>) -> Self {
        self.include_genders = strings(v);
        self
    }

    pub fn exclude_genders(mut self, v: impl IntoIterator<Item = impl ToString>) -> Self {
        self.exclude_genders = strings(v);
        self
    }

    pub fn include_football_types(mut self, v: impl IntoIterator<Item = impl ToString>) -> Self {
        self.include_football_types = strings(v);
        self
    }

    pub fn exclude_football_types(mut self, v: impl IntoIterator<Item = impl ToString>) -> Self {
        self.exclude_football_types = strings(v);
        self
    }

    /// Validates every setting and returns the filter.
    ///
    /// All problems are collected into one [`FogisError::InvalidFilter`]
    /// instead of stopping at the first.
    pub fn build(&self) -> Result<MatchFilter, FogisError> {
        let mut problems = Vec::new();

        let start = parse_date(&self.start_date, "start date", &mut problems);
        let end = parse_date(&self.end_date, "end date", &mut problems);
        let saved = parse_date(&self.saved_date, "saved date", &mut problems);
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                problems.push(format!("start date {} is after end date {}", start, end));
            }
        }
        let date_type = self
            .date_type
            .as_deref()
            .and_then(|raw| match validate_date_type(raw) {
                Ok(n) => Some(n),
                Err(e) => {
                    problems.push(input_message(e));
                    None
                }
            });

        let statuses = FieldFilter {
            include: parse_codes::<MatchStatus>(&self.include_statuses, "status", &mut problems),
            exclude: parse_codes::<MatchStatus>(&self.exclude_statuses, "status", &mut problems),
        };
        let age_categories = FieldFilter {
            include: parse_codes::<AgeCategory>(
                &self.include_age_categories,
                "age category",
                &mut problems,
            ),
            exclude: parse_codes::<AgeCategory>(
                &self.exclude_age_categories,
                "age category",
                &mut problems,
            ),
        };
        let genders = FieldFilter {
            include: parse_codes::<Gender>(&self.include_genders, "gender", &mut problems),
            exclude: parse_codes::<Gender>(&self.exclude_genders, "gender", &mut problems),
        };
        let football_types = FieldFilter {
            include: parse_codes::<FootballType>(
                &self.include_football_types,
                "football type",
                &mut problems,
            ),
            exclude: parse_codes::<FootballType>(
                &self.exclude_football_types,
                "football type",
                &mut problems,
            ),
        };

        if !problems.is_empty() {
            tracing::error!("Invalid match list filter: {}", problems.join("; "));
            return Err(FogisError::InvalidFilter(problems));
        }

        let mut query = MatchListQuery::default();
        query.date_from = start;
        query.date_to = end;
        query.date_type = date_type;
        query.saved_date = saved;

        Ok(MatchFilter {
            query,
            statuses,
            age_categories,
            genders,
            football_types,
        })
    }
}

fn input_message(err: FogisError) -> String {
    match err {
        FogisError::InvalidInput(msg) => msg,
        other => other.to_string(),
    }
}

fn parse_date(raw: &Option<String>, label: &str, problems: &mut Vec<String>) -> Option<NaiveDate> {
    let raw = raw.as_deref()?;
    match validate_date(raw) {
        Ok(date) => Some(date),
        Err(e) => {
            problems.push(format!("{}: {}", label, input_message(e)));
            None
        }
    }
}

fn parse_codes<T>(
    raw: &Option<Vec<String>>,
    label: &str,
    problems: &mut Vec<String>,
) -> Option<HashSet<T>>
where
    T: FromStr + Eq + Hash,
{
    let raw = raw.as_ref()?;
    let mut codes = HashSet::new();
    for value in raw {
        match value.parse::<T>() {
            Ok(code) => {
                codes.insert(code);
            }
            Err(_) => problems.push(format!("unknown {} '{}'", label, value)),
        }
    }
    Some(codes)
}

/// A validated, immutable match list filter.
#[derive(Clone, Debug, Default)]
pub struct MatchFilter {
    query: MatchListQuery,
    pub statuses: FieldFilter<MatchStatus>,
    pub age_categories: FieldFilter<AgeCategory>,
    pub genders: FieldFilter<Gender>,
    pub football_types: FieldFilter<FootballType>,
}

impl MatchFilter {
    /// The date fields to send to the portal. Only configured fields are set.
    pub fn server_filter(&self) -> &MatchListQuery {
        &self.query
    }

    /// Keeps the matches that pass every configured field.
    pub fn filter_matches(&self, matches: &[Value]) -> Vec<Value> {
        matches
            .iter()
            .filter(|m| self.matches(m))
            .cloned()
            .collect()
    }

    fn matches(&self, record: &Value) -> bool {
        let age_categories = code_of(
            record,
            "tavlingAlderskategori",
            AgeCategory::ALL,
            AgeCategory::code,
        );
        let genders = code_of(record, "tavlingKonId", Gender::ALL, Gender::code);
        let football_types = code_of(
            record,
            "fotbollstypid",
            FootballType::ALL,
            FootballType::code,
        );
        self.statuses.keeps(&match_statuses(record))
            && self.age_categories.keeps(&age_categories)
            && self.genders.keeps(&genders)
            && self.football_types.keeps(&football_types)
    }

    /// Fetches the match list for the configured dates and filters it locally.
    pub async fn fetch_filtered_matches(
        &self,
        client: &FogisClient,
    ) -> Result<Vec<Value>, FogisError> {
        let matches = client.fetch_matches_list(Some(&self.query)).await?;
        if matches.is_empty() {
            tracing::debug!("No matches returned, nothing to filter");
            return Ok(matches);
        }
        let filtered = self.filter_matches(&matches);
        tracing::debug!("Kept {} of {} matches", filtered.len(), matches.len());
        Ok(filtered)
    }
}

/// Statuses of a match record, read from its flags. A final result counts as
/// completed; a match with no flag set has not started.
pub fn match_statuses(record: &Value) -> Vec<MatchStatus> {
    let flag = |key: &str| record.get(key).and_then(Value::as_bool).unwrap_or(false);
    let mut statuses = Vec::new();
    if flag("installd") {
        statuses.push(MatchStatus::Cancelled);
    }
    if flag("avbruten") {
        statuses.push(MatchStatus::Interrupted);
    }
    if flag("uppskjuten") {
        statuses.push(MatchStatus::Postponed);
    }
    if flag("arslutresultat") {
        statuses.push(MatchStatus::Completed);
    }
    if statuses.is_empty() {
        statuses.push(MatchStatus::NotStarted);
    }
    statuses
}

fn code_of<T: Copy, const N: usize>(
    record: &Value,
    key: &str,
    all: [T; N],
    code: fn(&T) -> i64,
) -> Vec<T> {
    let raw = match record.get(key) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    raw.and_then(|n| all.into_iter().find(|v| code(v) == n))
        .into_iter()
        .collect()
}

impl Display for MatchFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(from) = self.query.date_from {
            parts.push(format!("from {}", from));
        }
        if let Some(to) = self.query.date_to {
            parts.push(format!("to {}", to));
        }
        for (label, unset) in [
            ("status", self.statuses.is_unset()),
            ("age", self.age_categories.is_unset()),
            ("gender", self.genders.is_unset()),
            ("football type", self.football_types.is_unset()),
        ] {
            if !unset {
                parts.push(label.to_string());
            }
        }
        if parts.is_empty() {
            write!(f, "no filter")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}
