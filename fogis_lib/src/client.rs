//! One method per portal capability, on top of the RPC transport.

use chrono::NaiveDate;
use fogis_api::{
    ClientConfig, Credentials, Endpoint, ErrorKind, MatchListQuery, Method, Payload, Record,
    RpcTransport, SessionToken, Shape,
};
use serde_json::{json, Value};

use crate::error::FogisError;
use crate::validation::{coerce_integer_fields, require_fields, IdInput};

const EVENT_REQUIRED: &[&str] = &["matchid", "handelsekod", "minut", "lagid"];
const EVENT_INTEGERS: &[&str] = &[
    "matchid",
    "handelsekod",
    "minut",
    "lagid",
    "personid",
    "assisterandeid",
    "period",
    "resultatHemma",
    "resultatBorta",
];

const RESULT_REQUIRED: &[&str] = &["matchid", "hemmamal", "bortamal"];
const RESULT_INTEGERS: &[&str] = &[
    "matchid",
    "hemmamal",
    "bortamal",
    "halvtidHemmamal",
    "halvtidBortamal",
];

// The portal identifies the team by `lagid` on this endpoint.
const OFFICIAL_ACTION_REQUIRED: &[&str] =
    &["matchid", "lagid", "personid", "matchlagledaretypid"];
const OFFICIAL_ACTION_INTEGERS: &[&str] = &[
    "matchid",
    "lagid",
    "personid",
    "matchlagledaretypid",
    "minut",
];

/// Result records come back either as one object or as a list of periods.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    Single(Record),
    Many(Vec<Value>),
}

/// Referee-portal client exposing the match reporting operations.
///
/// Every read is a fresh round trip; nothing is cached locally. Write
/// operations check required fields and coerce identifiers to integers
/// before any request is made, and every response is checked against the
/// shape its endpoint is contracted to return.
pub struct FogisClient {
    transport: RpcTransport,
}

impl FogisClient {
    /// Creates a client that logs in on first use.
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self, FogisError> {
        Ok(Self::from_transport(RpcTransport::new(config, credentials)?))
    }

    /// Creates a client from saved session cookies, without credentials.
    pub fn with_token(config: ClientConfig, token: SessionToken) -> Result<Self, FogisError> {
        Ok(Self::from_transport(RpcTransport::with_token(config, token)?))
    }

    pub fn from_transport(transport: RpcTransport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &RpcTransport {
        &self.transport
    }

    /// Logs in now instead of on the first call. A no-op when a session is held.
    pub async fn login(&self) -> Result<SessionToken, FogisError> {
        Ok(self.transport.login().await?)
    }

    /// Cookies of the current session, for reuse by a later client.
    pub async fn session_token(&self) -> Option<SessionToken> {
        let token = self.transport.token().await;
        if token.is_some() {
            tracing::debug!("Returning current session cookies");
        } else {
            tracing::debug!("No cookies available to return");
        }
        token
    }

    /// Checks the held cookies against the portal with one cheap request.
    ///
    /// Returns false without a request when no session is held, and false
    /// when that request fails with a login or request error. A malformed
    /// response is still an error.
    pub async fn validate_session(&self) -> Result<bool, FogisError> {
        if self.transport.token().await.is_none() {
            tracing::debug!("No cookies available to validate");
            return Ok(false);
        }
        tracing::debug!("Validating session cookies");
        let endpoint = Endpoint::MatchList;
        match self
            .transport
            .call(&endpoint.path(), None, Method::Get)
            .await
        {
            Ok(_) => {
                tracing::debug!("Session cookies are valid");
                Ok(true)
            }
            Err(e) if matches!(e.kind(), ErrorKind::Login | ErrorKind::Request) => {
                tracing::info!("Session cookies are no longer valid: {}", e);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn request(&self, endpoint: Endpoint, payload: Value) -> Result<Payload, FogisError> {
        let payload = self
            .transport
            .call(&endpoint.path(), Some(&payload), Method::Post)
            .await?;
        let expected = endpoint.expected_shape();
        if !expected.accepts(&payload) {
            tracing::error!(
                "Expected {} response from {} but got {}",
                expected,
                endpoint,
                payload.kind_name()
            );
            return Err(unexpected(endpoint, expected, &payload));
        }
        Ok(payload)
    }

    async fn request_object(
        &self,
        endpoint: Endpoint,
        payload: Value,
    ) -> Result<Record, FogisError> {
        match self.request(endpoint, payload).await? {
            Payload::Object(record) => Ok(record),
            other => Err(unexpected(endpoint, Shape::Object, &other)),
        }
    }

    async fn request_list(
        &self,
        endpoint: Endpoint,
        payload: Value,
    ) -> Result<Vec<Value>, FogisError> {
        match self.request(endpoint, payload).await? {
            Payload::List(items) => Ok(items),
            other => Err(unexpected(endpoint, Shape::List, &other)),
        }
    }

    /// Fetches the matches assigned to the logged-in referee.
    ///
    /// Unset fields of `query` are filled with the portal defaults (see
    /// [`MatchListQuery::to_payload`]), relative to today's local date.
    pub async fn fetch_matches_list(
        &self,
        query: Option<&MatchListQuery>,
    ) -> Result<Vec<Value>, FogisError> {
        let today = chrono::Local::now().date_naive();
        self.fetch_matches_list_on(query, today).await
    }

    /// Like [`FogisClient::fetch_matches_list`] with an explicit "today".
    pub async fn fetch_matches_list_on(
        &self,
        query: Option<&MatchListQuery>,
        today: NaiveDate,
    ) -> Result<Vec<Value>, FogisError> {
        let endpoint = Endpoint::MatchList;
        let payload = query.cloned().unwrap_or_default().to_payload(today);
        let record = self.request_object(endpoint, payload).await?;

        let list = record.get("matchlista").or_else(|| record.get("matcher"));
        match list {
            Some(Value::Array(matches)) => {
                tracing::debug!("Fetched {} matches", matches.len());
                Ok(matches.clone())
            }
            None | Some(Value::Null) => {
                tracing::debug!("Match list response has no matches");
                Ok(Vec::new())
            }
            Some(other) => Err(unexpected(endpoint, Shape::List, &Payload::from(other.clone()))),
        }
    }

    /// Fetches one match record.
    pub async fn fetch_match(&self, match_id: impl Into<IdInput>) -> Result<Record, FogisError> {
        let match_id = match_id.into().resolve("matchid")?;
        self.request_object(Endpoint::Match, json!({ "matchid": match_id }))
            .await
    }

    /// Fetches both teams' players for a match.
    pub async fn fetch_match_players(
        &self,
        match_id: impl Into<IdInput>,
    ) -> Result<Record, FogisError> {
        let match_id = match_id.into().resolve("matchid")?;
        self.request_object(Endpoint::MatchPlayers, json!({ "matchid": match_id }))
            .await
    }

    /// Fetches team and referee officials for a match.
    pub async fn fetch_match_officials(
        &self,
        match_id: impl Into<IdInput>,
    ) -> Result<Record, FogisError> {
        let match_id = match_id.into().resolve("matchid")?;
        self.request_object(Endpoint::MatchOfficials, json!({ "matchid": match_id }))
            .await
    }

    pub async fn fetch_match_events(
        &self,
        match_id: impl Into<IdInput>,
    ) -> Result<Vec<Value>, FogisError> {
        let match_id = match_id.into().resolve("matchid")?;
        self.request_list(Endpoint::MatchEvents, json!({ "matchid": match_id }))
            .await
    }

    /// Fetches the players of one team in a match.
    ///
    /// A bare list answer is wrapped as `{"spelare": [...]}` so callers always
    /// get the object form.
    pub async fn fetch_team_players(
        &self,
        team_id: impl Into<IdInput>,
    ) -> Result<Record, FogisError> {
        let team_id = team_id.into().resolve("matchlagid")?;
        let endpoint = Endpoint::TeamPlayers;
        match self
            .request(endpoint, json!({ "matchlagid": team_id }))
            .await?
        {
            Payload::Object(record) => Ok(record),
            Payload::List(players) => {
                let mut record = Record::new();
                record.insert("spelare".into(), Value::Array(players));
                Ok(record)
            }
            other => Err(unexpected(endpoint, Shape::ObjectOrList, &other)),
        }
    }

    pub async fn fetch_team_officials(
        &self,
        team_id: impl Into<IdInput>,
    ) -> Result<Vec<Value>, FogisError> {
        let team_id = team_id.into().resolve("matchlagid")?;
        self.request_list(Endpoint::TeamOfficials, json!({ "matchlagid": team_id }))
            .await
    }

    pub async fn fetch_match_result(
        &self,
        match_id: impl Into<IdInput>,
    ) -> Result<MatchResult, FogisError> {
        let match_id = match_id.into().resolve("matchid")?;
        let endpoint = Endpoint::MatchResult;
        match self.request(endpoint, json!({ "matchid": match_id })).await? {
            Payload::Object(record) => Ok(MatchResult::Single(record)),
            Payload::List(items) => Ok(MatchResult::Many(items)),
            other => Err(unexpected(endpoint, Shape::ObjectOrList, &other)),
        }
    }

    /// Reports a match event (goal, card, substitution, period marker...).
    ///
    /// Requires `matchid`, `handelsekod`, `minut` and `lagid`. Identifier and
    /// score fields given as numeric strings are sent as integers.
    pub async fn report_match_event(&self, event: Record) -> Result<Record, FogisError> {
        let event = prepare_write(event, EVENT_REQUIRED, EVENT_INTEGERS, "event")?;
        tracing::info!(
            "Reporting event {} for match {}",
            event["handelsekod"],
            event["matchid"]
        );
        self.request_object(Endpoint::ReportEvent, Value::Object(event))
            .await
    }

    /// Reports full-time and optionally half-time scores.
    pub async fn report_match_result(&self, result: Record) -> Result<Record, FogisError> {
        let result = prepare_write(result, RESULT_REQUIRED, RESULT_INTEGERS, "result")?;
        tracing::info!(
            "Reporting result {}-{} for match {}",
            result["hemmamal"],
            result["bortamal"],
            result["matchid"]
        );
        self.request_object(Endpoint::ReportResult, Value::Object(result))
            .await
    }

    /// Reports a disciplinary action against a team official.
    pub async fn report_team_official_action(&self, action: Record) -> Result<Record, FogisError> {
        let action = prepare_write(
            action,
            OFFICIAL_ACTION_REQUIRED,
            OFFICIAL_ACTION_INTEGERS,
            "action",
        )?;
        tracing::info!(
            "Reporting action for official {} in match {}",
            action["personid"],
            action["matchid"]
        );
        self.request_object(Endpoint::ReportTeamOfficialAction, Value::Object(action))
            .await
    }

    /// Deletes one event. Returns whether the portal acknowledged it.
    pub async fn delete_match_event(
        &self,
        event_id: impl Into<IdInput>,
    ) -> Result<bool, FogisError> {
        let event_id = event_id.into().resolve("matchhandelseid")?;
        let endpoint = Endpoint::DeleteEvent;
        let payload = self
            .request(endpoint, json!({ "matchhandelseid": event_id }))
            .await?;
        let deleted = acknowledged(&payload);
        if deleted {
            tracing::info!("Deleted event {}", event_id);
        } else {
            tracing::warn!(
                "Failed to delete event {} ({} response)",
                event_id,
                payload.kind_name()
            );
        }
        Ok(deleted)
    }

    /// Removes every event of a match in one call.
    pub async fn clear_match_events(
        &self,
        match_id: impl Into<IdInput>,
    ) -> Result<bool, FogisError> {
        let match_id = match_id.into().resolve("matchid")?;
        tracing::info!("Clearing all events for match {}", match_id);
        let payload = self
            .request(Endpoint::ClearEvents, json!({ "matchid": match_id }))
            .await?;
        let cleared = acknowledged(&payload);
        if !cleared {
            tracing::warn!("Failed to clear events for match {}", match_id);
        }
        Ok(cleared)
    }

    /// Approves the referee report, the final step of reporting a match.
    pub async fn mark_reporting_finished(
        &self,
        match_id: impl Into<IdInput>,
    ) -> Result<Record, FogisError> {
        let match_id = match match_id.into() {
            IdInput::Text(s) if s.trim().is_empty() => {
                return Err(FogisError::InvalidInput("match_id cannot be empty".to_string()));
            }
            other => other.resolve("matchid")?,
        };
        if match_id == 0 {
            return Err(FogisError::InvalidInput("match_id cannot be empty".to_string()));
        }

        tracing::info!("Marking match {} reporting as finished", match_id);
        let record = self
            .request_object(
                Endpoint::MarkReportingFinished,
                json!({ "matchid": match_id }),
            )
            .await?;
        if record.get("success").is_some_and(is_truthy) {
            tracing::info!("Match {} reporting marked as finished", match_id);
        } else {
            tracing::warn!("Portal did not confirm match {} as finished", match_id);
        }
        Ok(record)
    }
}

fn prepare_write(
    mut data: Record,
    required: &[&str],
    integers: &[&str],
    what: &str,
) -> Result<Record, FogisError> {
    require_fields(&data, required, what)?;
    coerce_integer_fields(&mut data, integers)?;
    Ok(data)
}

fn unexpected(endpoint: Endpoint, expected: Shape, found: &Payload) -> FogisError {
    FogisError::UnexpectedShape {
        endpoint: endpoint.method_name(),
        expected,
        found: found.kind_name(),
    }
}

/// An empty body is success; a status object reports its `success` member.
fn acknowledged(payload: &Payload) -> bool {
    match payload {
        Payload::Empty => true,
        Payload::Object(record) => record.get("success").is_some_and(is_truthy),
        _ => false,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
