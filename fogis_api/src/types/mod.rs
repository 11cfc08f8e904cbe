mod codes;
pub use self::codes::{AgeCategory, FootballType, Gender, MatchStatus};

mod event;
pub use self::event::{event_type, is_goal_event, EventType, EVENT_TYPES};

mod payload;
pub use self::payload::{Payload, Record, Shape};
