use fogis_lib::types::{is_goal_event, EventType};
use serde_json::Value;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "Match ID")]
    match_id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Home")]
    home: String,
    #[tabled(rename = "Away")]
    away: String,
    #[tabled(rename = "Venue")]
    venue: String,
    #[tabled(rename = "Competition")]
    competition: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct PersonRow {
    #[tabled(rename = "Team")]
    team: String,
    #[tabled(rename = "No")]
    number: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Event ID")]
    event_id: String,
    #[tabled(rename = "Minute")]
    minute: String,
    #[tabled(rename = "Type")]
    event_type: String,
    #[tabled(rename = "Team")]
    team: String,
    #[tabled(rename = "Player")]
    player: String,
    #[tabled(rename = "Goal")]
    goal: bool,
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Result")]
    kind: String,
    #[tabled(rename = "Home")]
    home: String,
    #[tabled(rename = "Away")]
    away: String,
}

#[derive(Tabled)]
struct EventTypeRow {
    #[tabled(rename = "Code")]
    code: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Goal")]
    goal: bool,
    #[tabled(rename = "Control")]
    control: bool,
}

// -- Row builders --

/// Renders a record field as text. Missing and null become empty.
fn text(record: &Value, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn first_text(record: &Value, keys: &[&str]) -> String {
    keys.iter()
        .map(|k| text(record, k))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn status_label(record: &Value) -> String {
    fogis_lib::filter::match_statuses(record)
        .iter()
        .map(|s| s.code())
        .collect::<Vec<_>>()
        .join(",")
}

fn build_match_rows(matches: &[Value]) -> Vec<MatchRow> {
    matches
        .iter()
        .map(|m| MatchRow {
            match_id: text(m, "matchid"),
            date: first_text(m, &["speldatum", "datum"]),
            time: first_text(m, &["tid", "avsparkstid"]),
            home: first_text(m, &["lag1namn", "hemmalag"]),
            away: first_text(m, &["lag2namn", "bortalag"]),
            venue: text(m, "anlaggningnamn"),
            competition: text(m, "tavlingnamn"),
            status: status_label(m),
        })
        .collect()
}

/// People lists come as an object of arrays (one per team or role group) or
/// as a bare array.
fn people(data: &Value) -> Vec<&Value> {
    match data {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().filter_map(Value::as_array).flatten().collect(),
        _ => Vec::new(),
    }
}

fn build_person_rows(data: &Value) -> Vec<PersonRow> {
    people(data)
        .into_iter()
        .map(|p| {
            let mut role = first_text(p, &["lagrollnamn", "domarrollnamn", "roll"]);
            if p.get("lagkapten").and_then(Value::as_bool).unwrap_or(false) {
                role = "Captain".to_string();
            } else if role.is_empty()
                && p.get("ersattare").and_then(Value::as_bool).unwrap_or(false)
            {
                role = "Substitute".to_string();
            }
            PersonRow {
                team: first_text(p, &["matchlagnamn", "lagnamn"]),
                number: text(p, "trojnummer"),
                name: format!("{} {}", text(p, "fornamn"), text(p, "efternamn"))
                    .trim()
                    .to_string(),
                role,
            }
        })
        .collect()
}

fn build_event_rows(events: &[Value]) -> Vec<EventRow> {
    events
        .iter()
        .map(|e| EventRow {
            event_id: text(e, "matchhandelseid"),
            minute: first_text(e, &["matchminut", "minut"]),
            event_type: first_text(e, &["matchhandelsetypnamn", "handelsekod"]),
            team: first_text(e, &["matchlagnamn", "lagid"]),
            player: text(e, "spelarenamn"),
            goal: is_goal_event(e),
        })
        .collect()
}

fn build_result_rows(results: &[Value]) -> Vec<ResultRow> {
    results
        .iter()
        .map(|r| ResultRow {
            kind: first_text(r, &["matchresultattypnamn", "matchresultattypid"]),
            home: first_text(r, &["matchlag1mal", "hemmamal"]),
            away: first_text(r, &["matchlag2mal", "bortamal"]),
        })
        .collect()
}

fn build_event_type_rows(types: &[EventType]) -> Vec<EventTypeRow> {
    types
        .iter()
        .map(|t| EventTypeRow {
            code: t.code,
            name: t.name.to_string(),
            goal: t.goal,
            control: t.control_event,
        })
        .collect()
}

// -- Table output --

pub fn print_matches_table(matches: &[Value]) {
    println!("{}", Table::new(build_match_rows(matches)));
}

pub fn print_people_table(data: &Value) {
    println!("{}", Table::new(build_person_rows(data)));
}

pub fn print_events_table(events: &[Value]) {
    println!("{}", Table::new(build_event_rows(events)));
}

pub fn print_results_table(results: &[Value]) {
    println!("{}", Table::new(build_result_rows(results)));
}

pub fn print_event_types_table(types: &[EventType]) {
    println!("{}", Table::new(build_event_type_rows(types)));
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fogis_lib::types::EVENT_TYPES;
    use serde_json::json;

    fn load_matches_fixture() -> Vec<Value> {
        let json_str = include_str!("../../fogis_lib/tests/fixtures/match_list.json");
        let body: Value = serde_json::from_str(json_str).unwrap();
        fogis_lib::Payload::from_envelope(body).into_value()["matchlista"]
            .as_array()
            .unwrap()
            .clone()
    }

    #[test]
    fn match_rows_from_fixture() {
        let rows = build_match_rows(&load_matches_fixture());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].match_id, "6169105");
        assert_eq!(rows[0].home, "IK Kongahälla");
        assert_eq!(rows[0].status, "ej_startad");
        assert_eq!(rows[1].status, "installd");
        assert_eq!(rows[2].status, "genomford");
    }

    #[test]
    fn person_rows_flatten_team_lists() {
        let data = json!({
            "hemmalag": [{"fornamn": "Anna", "efternamn": "Berg", "trojnummer": 10,
                          "matchlagnamn": "Lindome GIF", "lagkapten": true}],
            "bortalag": [{"fornamn": "Sara", "efternamn": "Ek", "trojnummer": 1,
                          "matchlagnamn": "Kungsbacka DFF", "ersattare": true}]
        });
        let rows = build_person_rows(&data);
        assert_eq!(rows.len(), 2);
        let captain = rows.iter().find(|r| r.name == "Anna Berg").unwrap();
        assert_eq!(captain.role, "Captain");
        assert_eq!(captain.number, "10");
        let sub = rows.iter().find(|r| r.name == "Sara Ek").unwrap();
        assert_eq!(sub.role, "Substitute");
    }

    #[test]
    fn event_rows_mark_goals() {
        let events = vec![
            json!({"matchhandelseid": 1, "matchhandelsetypid": 6, "matchhandelsetypnamn": "Spelmål",
                   "matchminut": 12, "matchlagnamn": "Onsala BK"}),
            json!({"matchhandelseid": 2, "matchhandelsetypid": 20, "matchhandelsetypnamn": "Varning",
                   "matchminut": 40}),
        ];
        let rows = build_event_rows(&events);
        assert!(rows[0].goal);
        assert!(!rows[1].goal);
        assert_eq!(rows[0].minute, "12");
        assert_eq!(rows[1].event_type, "Varning");
    }

    #[test]
    fn result_rows_read_team_goals() {
        let rows = build_result_rows(&[json!({
            "matchresultattypnamn": "Slutresultat", "matchlag1mal": 2, "matchlag2mal": 1
        })]);
        assert_eq!(rows[0].kind, "Slutresultat");
        assert_eq!((rows[0].home.as_str(), rows[0].away.as_str()), ("2", "1"));
    }

    #[test]
    fn event_type_rows_cover_catalogue() {
        let rows = build_event_type_rows(EVENT_TYPES);
        assert_eq!(rows.len(), EVENT_TYPES.len());
        assert!(rows.iter().any(|r| r.code == 23 && r.control));
    }

    #[test]
    fn text_renders_missing_as_empty() {
        let record = json!({"a": null, "b": 5, "c": "x"});
        assert_eq!(text(&record, "a"), "");
        assert_eq!(text(&record, "b"), "5");
        assert_eq!(text(&record, "c"), "x");
        assert_eq!(text(&record, "missing"), "");
    }
}
