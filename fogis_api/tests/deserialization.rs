use fogis_api::types::{is_goal_event, AgeCategory, FootballType, Gender};
use fogis_api::Payload;
use serde_json::{json, Value};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn decode_encoded_match_list() {
    let body: Value = serde_json::from_str(&load_fixture("match_list.json")).unwrap();
    let Payload::Object(record) = Payload::from_envelope(body) else {
        panic!("match list should decode to an object");
    };
    let matches = record["matchlista"].as_array().unwrap();
    assert_eq!(matches.len(), 3);

    let first = &matches[0];
    assert_eq!(first["matchid"], 6169105);
    assert_eq!(first["lag1namn"], "IK Kongahälla");
    assert_eq!(first["tavlingAlderskategori"], AgeCategory::Senior.code());
    assert_eq!(first["tavlingKonId"], Gender::Male.code());
    assert_eq!(first["fotbollstypid"], FootballType::Football.code());

    assert_eq!(matches[1]["installd"], true);
    assert_eq!(matches[2]["fotbollstypid"], FootballType::Futsal.code());
}

#[test]
fn decode_event_list_and_goal_flags() {
    let body = json!({
        "d": "[{\"matchhandelseid\":1,\"handelsekod\":6,\"minut\":12},\
               {\"matchhandelseid\":2,\"handelsekod\":20,\"minut\":30},\
               {\"matchhandelseid\":3,\"handelsekod\":15,\"minut\":77,\"mal\":true}]"
    });
    let Payload::List(events) = Payload::from_envelope(body) else {
        panic!("event list should decode to a list");
    };
    let goals: Vec<i64> = events
        .iter()
        .filter(|e| is_goal_event(e))
        .filter_map(|e| e["matchhandelseid"].as_i64())
        .collect();
    assert_eq!(goals, vec![1, 3]);
}

#[test]
fn decode_plain_text_acknowledgement() {
    assert_eq!(
        Payload::from_envelope(json!({"d": "Sparat"})),
        Payload::Text("Sparat".to_string())
    );
}
