//! Match event codes (`handelsekod`) understood by the reporting endpoints.

use serde::Serialize;
use serde_json::Value;

/// One entry of the event-type catalogue.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventType {
    pub code: i64,
    pub name: &'static str,
    /// Whether reporting this event changes the score.
    pub goal: bool,
    /// Period start/end and full time markers.
    pub control_event: bool,
}

const fn event(code: i64, name: &'static str, goal: bool, control_event: bool) -> EventType {
    EventType {
        code,
        name,
        goal,
        control_event,
    }
}

pub const EVENT_TYPES: &[EventType] = &[
    // Goals
    event(6, "Regular Goal", true, false),
    event(39, "Header Goal", true, false),
    event(28, "Corner Goal", true, false),
    event(29, "Free Kick Goal", true, false),
    event(15, "Own Goal", true, false),
    event(14, "Penalty Goal", true, false),
    // Penalties
    event(18, "Penalty Missing Goal", false, false),
    event(19, "Penalty Save", false, false),
    event(26, "Penalty Hitting the Frame", false, false),
    // Cards
    event(20, "Yellow Card", false, false),
    event(8, "Red Card (Denying Goal Opportunity)", false, false),
    event(9, "Red Card (Other Reasons)", false, false),
    // Other
    event(17, "Substitution", false, false),
    // Control events
    event(31, "Period Start", false, true),
    event(32, "Period End", false, true),
    event(23, "Match Slut", false, true),
];

/// Looks up an event code in the catalogue.
pub fn event_type(code: i64) -> Option<&'static EventType> {
    EVENT_TYPES.iter().find(|e| e.code == code)
}

/// Whether a fetched event record is a goal.
///
/// Uses the record's own `mal` flag when present, otherwise the catalogue
/// entry for its event code. Reported events carry the code as
/// `handelsekod`, fetched ones as `matchhandelsetypid`.
pub fn is_goal_event(event: &Value) -> bool {
    if let Some(flag) = event.get("mal").and_then(Value::as_bool) {
        return flag;
    }
    event
        .get("handelsekod")
        .or_else(|| event.get("matchhandelsetypid"))
        .and_then(Value::as_i64)
        .and_then(event_type)
        .map(|e| e.goal)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalogue_lookup() {
        assert_eq!(event_type(6).map(|e| e.name), Some("Regular Goal"));
        assert!(event_type(23).is_some_and(|e| e.control_event));
        assert!(event_type(1000).is_none());
        assert_eq!(EVENT_TYPES.iter().filter(|e| e.goal).count(), 6);
    }

    #[test]
    fn goal_flag_prefers_record_value() {
        assert!(is_goal_event(&json!({"handelsekod": 6})));
        assert!(!is_goal_event(&json!({"handelsekod": 20})));
        assert!(!is_goal_event(&json!({"handelsekod": 6, "mal": false})));
        assert!(is_goal_event(&json!({"mal": true})));
        assert!(is_goal_event(&json!({"matchhandelsetypid": 14})));
        assert!(!is_goal_event(&json!({})));
    }
}
