//! Page methods exposed by the portal and the response shape each one produces.

use crate::types::Shape;

const MATCH_PAGE: &str = "MatchWebMetoder.aspx";

/// HTTP verb used for a page-method call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    Get,
    #[default]
    Post,
}

/// Every page method the client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    MatchList,
    Match,
    MatchPlayers,
    MatchOfficials,
    MatchEvents,
    TeamPlayers,
    TeamOfficials,
    MatchResult,
    ReportEvent,
    ReportResult,
    ReportTeamOfficialAction,
    DeleteEvent,
    ClearEvents,
    MarkReportingFinished,
}

impl Endpoint {
    /// Name of the server-side page method.
    pub fn method_name(&self) -> &'static str {
        match self {
            Endpoint::MatchList => "GetMatcherAttRapportera",
            Endpoint::Match => "GetMatch",
            Endpoint::MatchPlayers => "GetMatchdeltagareLista",
            Endpoint::MatchOfficials => "GetMatchfunktionarerLista",
            Endpoint::MatchEvents => "GetMatchhandelselista",
            Endpoint::TeamPlayers => "GetMatchdeltagareListaForMatchlag",
            Endpoint::TeamOfficials => "GetMatchlagledareListaForMatchlag",
            Endpoint::MatchResult => "GetMatchresultatlista",
            Endpoint::ReportEvent => "SparaMatchhandelse",
            Endpoint::ReportResult => "SparaMatchresultatLista",
            Endpoint::ReportTeamOfficialAction => "SparaMatchlagledare",
            Endpoint::DeleteEvent => "RaderaMatchhandelse",
            Endpoint::ClearEvents => "ClearMatchEvents",
            Endpoint::MarkReportingFinished => "SparaMatchGodkannDomarrapport",
        }
    }

    /// Path relative to the portal base URL, e.g. `/MatchWebMetoder.aspx/GetMatch`.
    pub fn path(&self) -> String {
        format!("/{}/{}", MATCH_PAGE, self.method_name())
    }

    /// The payload shape this endpoint is contracted to return.
    pub fn expected_shape(&self) -> Shape {
        match self {
            Endpoint::MatchList
            | Endpoint::Match
            | Endpoint::MatchPlayers
            | Endpoint::MatchOfficials
            | Endpoint::ReportEvent
            | Endpoint::ReportResult
            | Endpoint::ReportTeamOfficialAction
            | Endpoint::MarkReportingFinished => Shape::Object,
            Endpoint::MatchEvents | Endpoint::TeamOfficials => Shape::List,
            Endpoint::TeamPlayers | Endpoint::MatchResult => Shape::ObjectOrList,
            Endpoint::DeleteEvent | Endpoint::ClearEvents => Shape::Acknowledgement,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.method_name())
    }
}
