mod match_list;
pub use self::match_list::{
    MatchListQuery, DEFAULT_AGE_CATEGORIES, DEFAULT_DAYS_AHEAD, DEFAULT_DAYS_BACK,
    DEFAULT_GENDERS, DEFAULT_STATUSES,
};
