//! Code tables used by the match list: status, age category, gender and football type.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Match status. On match records the status is spread over boolean flags
/// (`installd`, `avbruten`, `uppskjuten`, `arslutresultat`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    #[serde(rename = "avbruten")]
    Interrupted,
    #[serde(rename = "uppskjuten")]
    Postponed,
    #[serde(rename = "installd")]
    Cancelled,
    /// Implied by a final result being recorded.
    #[serde(rename = "genomford")]
    Completed,
    #[serde(rename = "ej_startad")]
    NotStarted,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 5] = [
        MatchStatus::Interrupted,
        MatchStatus::Postponed,
        MatchStatus::Cancelled,
        MatchStatus::Completed,
        MatchStatus::NotStarted,
    ];

    /// The portal's value for this status.
    pub fn code(&self) -> &'static str {
        match self {
            MatchStatus::Interrupted => "avbruten",
            MatchStatus::Postponed => "uppskjuten",
            MatchStatus::Cancelled => "installd",
            MatchStatus::Completed => "genomford",
            MatchStatus::NotStarted => "ej_startad",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            MatchStatus::Interrupted => "interrupted",
            MatchStatus::Postponed => "postponed",
            MatchStatus::Cancelled => "cancelled",
            MatchStatus::Completed => "completed",
            MatchStatus::NotStarted => "not_started",
        }
    }
}
impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
/// Accepts the portal value (`installd`) or the English name (`cancelled`),
/// case-insensitively.
impl FromStr for MatchStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('-', "_");
        MatchStatus::ALL
            .into_iter()
            .find(|status| status.code() == needle || status.english() == needle)
            .ok_or(())
    }
}

/// Competition age category (`tavlingAlderskategori`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgeCategory {
    Undefined = 1,
    Children = 2,
    Youth = 3,
    Senior = 4,
    Veterans = 5,
}

impl AgeCategory {
    pub const ALL: [AgeCategory; 5] = [
        AgeCategory::Undefined,
        AgeCategory::Children,
        AgeCategory::Youth,
        AgeCategory::Senior,
        AgeCategory::Veterans,
    ];

    pub fn code(&self) -> i64 {
        *self as i64
    }

    fn name(&self) -> &'static str {
        match self {
            AgeCategory::Undefined => "undefined",
            AgeCategory::Children => "children",
            AgeCategory::Youth => "youth",
            AgeCategory::Senior => "senior",
            AgeCategory::Veterans => "veterans",
        }
    }
}
impl std::fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
impl FromStr for AgeCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s, &AgeCategory::ALL, AgeCategory::code, AgeCategory::name)
    }
}

/// Competition gender (`tavlingKonId`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gender {
    Male = 2,
    Female = 3,
    Mixed = 4,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Mixed];

    pub fn code(&self) -> i64 {
        *self as i64
    }

    fn name(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Mixed => "mixed",
        }
    }
}
impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s, &Gender::ALL, Gender::code, Gender::name)
    }
}

/// Football type (`fotbollstypid`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FootballType {
    Football = 1,
    Futsal = 2,
}

impl FootballType {
    pub const ALL: [FootballType; 2] = [FootballType::Football, FootballType::Futsal];

    pub fn code(&self) -> i64 {
        *self as i64
    }

    fn name(&self) -> &'static str {
        match self {
            FootballType::Football => "football",
            FootballType::Futsal => "futsal",
        }
    }
}
impl std::fmt::Display for FootballType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
impl FromStr for FootballType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(
            s,
            &FootballType::ALL,
            FootballType::code,
            FootballType::name,
        )
    }
}

/// Numeric code tables accept either the number or the English name.
fn parse_code<T: Copy>(
    s: &str,
    all: &[T],
    code: fn(&T) -> i64,
    name: fn(&T) -> &'static str,
) -> Result<T, ()> {
    let needle = s.trim().to_lowercase();
    if let Ok(n) = needle.parse::<i64>() {
        return all.iter().copied().find(|v| code(v) == n).ok_or(());
    }
    all.iter().copied().find(|v| name(v) == needle).ok_or(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_portal_and_english_names() {
        assert_eq!(
            "installd".parse::<MatchStatus>(),
            Ok(MatchStatus::Cancelled)
        );
        assert_eq!(
            "Cancelled".parse::<MatchStatus>(),
            Ok(MatchStatus::Cancelled)
        );
        assert_eq!(
            "not-started".parse::<MatchStatus>(),
            Ok(MatchStatus::NotStarted)
        );
        assert!("finished".parse::<MatchStatus>().is_err());
    }

    #[test]
    fn numeric_codes_parse_by_number_or_name() {
        assert_eq!("4".parse::<AgeCategory>(), Ok(AgeCategory::Senior));
        assert_eq!("youth".parse::<AgeCategory>(), Ok(AgeCategory::Youth));
        assert!("9".parse::<AgeCategory>().is_err());
        assert_eq!("3".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("MIXED".parse::<Gender>(), Ok(Gender::Mixed));
        assert!("1".parse::<Gender>().is_err());
        assert_eq!("futsal".parse::<FootballType>(), Ok(FootballType::Futsal));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for status in MatchStatus::ALL {
            assert_eq!(status.to_string().parse::<MatchStatus>(), Ok(status));
        }
        for age in AgeCategory::ALL {
            assert_eq!(age.to_string().parse::<AgeCategory>(), Ok(age));
        }
    }
}
