//! WebForms login flow: scrape the login form, post credentials, capture cookies.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE, LOCATION, ORIGIN, REFERER};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{
    config::ClientConfig,
    session::{is_cleared, AuthState, Credentials, SessionToken, AUTH_COOKIE, CONSENT_COOKIE},
    Error,
};

const LOGIN_PATH: &str = "/Login.aspx?ReturnUrl=%2fmdk%2f";
const VIEWSTATE: &str = "__VIEWSTATE";
const EVENTVALIDATION: &str = "__EVENTVALIDATION";

const USERNAME_FIELD: &str = "ctl00$MainContent$UserName";
const PASSWORD_FIELD: &str = "ctl00$MainContent$Password";
const SUBMIT_FIELD: &str = "ctl00$MainContent$LoginButton";
const SUBMIT_VALUE: &str = "Logga in";

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,\
     image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Performs the portal's HTML form login.
///
/// Each call to [`Authenticator::authenticate`] is a single attempt: GET the
/// login page, POST the hidden WebForms state back together with the
/// credentials, and accept the result only when the portal answers with a
/// redirect that sets the authentication cookie. The HTTP client passed in
/// must not follow redirects, otherwise the cookie on the 302 is lost.
pub struct Authenticator {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Authenticator {
    pub fn new(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    /// Runs the login flow, recording progress in `state`.
    ///
    /// On success `state` ends as [`AuthState::Authenticated`] and the full
    /// cookie set is returned. On any failure it ends as [`AuthState::Failed`]
    /// and no cookies are handed out.
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
        state: &mut AuthState,
    ) -> Result<SessionToken, Error> {
        let result = self.login(credentials, state).await;
        *state = match result {
            Ok(_) => AuthState::Authenticated,
            Err(_) => AuthState::Failed,
        };
        result
    }

    async fn login(
        &self,
        credentials: &Credentials,
        state: &mut AuthState,
    ) -> Result<SessionToken, Error> {
        let login_url = self.config.url(LOGIN_PATH);
        let mut cookies = SessionToken::new();

        *state = AuthState::FetchingLoginForm;
        tracing::debug!("Fetching login page");
        let resp = self
            .http
            .get(&login_url)
            .headers(self.form_headers())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Login page request failed: {}", e);
                Error::request("login page request failed", e)
            })?;
        cookies.absorb(&resp);
        let status = resp.status();
        let html = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read login page: {}", e);
            Error::request("failed to read login page", e)
        })?;
        if !status.is_success() {
            tracing::error!("Login page returned status {}", status);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&html),
            });
        }

        let hidden_fields = parse_login_form(&html)?;
        if !cookies.contains(CONSENT_COOKIE.0) {
            cookies.insert(CONSENT_COOKIE.0, CONSENT_COOKIE.1);
        }

        *state = AuthState::SubmittingCredentials;
        let mut form = hidden_fields;
        form.push((USERNAME_FIELD.to_string(), credentials.username.clone()));
        form.push((PASSWORD_FIELD.to_string(), credentials.password.clone()));
        form.push((SUBMIT_FIELD.to_string(), SUBMIT_VALUE.to_string()));

        tracing::debug!("Submitting login form");
        let resp = self
            .http
            .post(&login_url)
            .headers(self.form_headers())
            .header(COOKIE, cookies.cookie_header())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Login request failed: {}", e);
                Error::request("login request failed", e)
            })?;

        let status = resp.status();
        let auth_cookie_set = resp
            .cookies()
            .any(|c| c.name() == AUTH_COOKIE && !is_cleared(&c));
        cookies.absorb(&resp);
        if !(status.is_redirection() && auth_cookie_set) {
            tracing::error!(
                "Login failed: invalid credentials or session issue (status {})",
                status.as_u16()
            );
            return Err(Error::Login(format!(
                "invalid credentials or session issue (status {})",
                status.as_u16()
            )));
        }

        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|val| val.to_str().ok())
            .map(str::to_string);
        if let Some(location) = location {
            self.follow_redirect(&location, &mut cookies).await?;
        }

        tracing::info!("Login successful");
        Ok(cookies)
    }

    /// Completes the portal-side session setup by visiting the redirect target.
    async fn follow_redirect(
        &self,
        location: &str,
        cookies: &mut SessionToken,
    ) -> Result<(), Error> {
        let target = resolve_redirect(&self.config.base_url, location)?;
        tracing::debug!("Following redirect to {}", target);
        let mut request = self.http.get(target.clone()).headers(self.form_headers());
        if target.origin().ascii_serialization() == self.config.origin() {
            request = request.header(COOKIE, cookies.cookie_header());
        } else {
            tracing::warn!("Login redirect leaves the portal, not sending session cookies");
        }
        let resp = request.send().await.map_err(|e| {
            tracing::error!("Redirect after login failed: {}", e);
            Error::request("redirect after login failed", e)
        })?;
        cookies.absorb(&resp);

        let status = resp.status();
        if !(status.is_success() || status.is_redirection()) {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("Redirect after login returned status {}", status);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
        Ok(())
    }

    fn form_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(HTML_ACCEPT));
        if let Ok(origin) = HeaderValue::from_str(&self.config.origin()) {
            headers.insert(ORIGIN, origin);
        }
        if let Ok(referer) = HeaderValue::from_str(&self.config.url(LOGIN_PATH)) {
            headers.insert(REFERER, referer);
        }
        headers
    }
}

/// Extracts the hidden WebForms fields that have to be echoed back on login.
///
/// Looks for `form#aspnetForm`, then any form. A page without a form is
/// still accepted when it carries both `__VIEWSTATE` and `__EVENTVALIDATION`.
pub fn parse_login_form(html: &str) -> Result<Vec<(String, String)>, Error> {
    let document = Html::parse_document(html);
    let aspnet_form = selector("form#aspnetForm")?;
    let any_form = selector("form")?;
    let form = document
        .select(&aspnet_form)
        .next()
        .or_else(|| document.select(&any_form).next());

    let hidden = selector("input[type=\"hidden\"]")?;
    let inputs: Vec<ElementRef> = match form {
        Some(form) => form.select(&hidden).collect(),
        None => document.select(&hidden).collect(),
    };

    let mut fields: Vec<(String, String)> = Vec::new();
    for input in inputs {
        let Some(name) = input.value().attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        let value = input.value().attr("value").unwrap_or_default();
        fields.push((name.to_string(), value.to_string()));
    }

    let document_field = |name: &str| -> Option<String> {
        let css = format!("input[name=\"{}\"]", name);
        let sel = Selector::parse(&css).ok()?;
        document
            .select(&sel)
            .next()
            .map(|el| el.value().attr("value").unwrap_or_default().to_string())
    };
    let viewstate = document_field(VIEWSTATE);
    let eventvalidation = document_field(EVENTVALIDATION);

    if form.is_none() && (viewstate.is_none() || eventvalidation.is_none()) {
        tracing::error!("Login failed: could not find login form");
        return Err(Error::Login("could not find login form".to_string()));
    }

    for (name, value) in [(VIEWSTATE, viewstate), (EVENTVALIDATION, eventvalidation)] {
        if let Some(value) = value {
            if !fields.iter().any(|(n, _)| n == name) {
                fields.push((name.to_string(), value));
            }
        }
    }

    Ok(fields)
}

fn selector(css: &'static str) -> Result<Selector, Error> {
    Selector::parse(css).map_err(|e| Error::Login(format!("bad selector {}: {}", css, e)))
}

/// Resolves the `Location` of the login redirect against the portal base.
///
/// The portal sometimes answers with a doubled `/mdk/mdk/` prefix; it is
/// collapsed before joining.
fn resolve_redirect(base_url: &str, location: &str) -> Result<Url, Error> {
    let location = if location.starts_with("/mdk/mdk/") {
        location.replacen("/mdk/mdk/", "/mdk/", 1)
    } else {
        location.to_string()
    };
    let base = Url::parse(&format!("{}/", base_url)).map_err(|e| Error::Request {
        message: format!("invalid base URL {}: {}", base_url, e),
        source: None,
    })?;
    base.join(&location).map_err(|e| Error::Request {
        message: format!("invalid redirect location {}: {}", location, e),
        source: None,
    })
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_PAGE: &str = r#"<html><body>
        <form method="post" action="./Login.aspx?ReturnUrl=%2fmdk%2f" id="aspnetForm">
          <input type="hidden" name="__VIEWSTATE" id="__VIEWSTATE" value="vs-token" />
          <input type="hidden" name="__VIEWSTATEGENERATOR" value="C2EE9ABB" />
          <input type="hidden" name="__EVENTVALIDATION" value="ev-token" />
          <input type="text" name="ctl00$MainContent$UserName" />
          <input type="password" name="ctl00$MainContent$Password" />
        </form></body></html>"#;

    #[test]
    fn parse_form_collects_hidden_fields_only() {
        let fields = parse_login_form(LOGIN_PAGE).unwrap();
        assert_eq!(
            fields,
            vec![
                ("__VIEWSTATE".to_string(), "vs-token".to_string()),
                ("__VIEWSTATEGENERATOR".to_string(), "C2EE9ABB".to_string()),
                ("__EVENTVALIDATION".to_string(), "ev-token".to_string()),
            ]
        );
    }

    #[test]
    fn parse_form_without_form_tag_uses_state_inputs() {
        let html = r#"<div>
            <input type="hidden" name="__VIEWSTATE" value="a" />
            <input type="hidden" name="__EVENTVALIDATION" value="b" />
        </div>"#;
        let fields = parse_login_form(html).unwrap();
        assert!(fields.contains(&("__VIEWSTATE".to_string(), "a".to_string())));
        assert!(fields.contains(&("__EVENTVALIDATION".to_string(), "b".to_string())));
    }

    #[test]
    fn parse_form_missing_everything_is_login_error() {
        let err = parse_login_form("<html><body><p>Maintenance</p></body></html>").unwrap_err();
        assert!(matches!(err, Error::Login(ref msg) if msg.contains("could not find login form")));
    }

    #[test]
    fn parse_form_hidden_input_without_value_is_empty() {
        let html = r#"<form><input type="hidden" name="__EVENTTARGET" /></form>"#;
        let fields = parse_login_form(html).unwrap();
        assert_eq!(fields, vec![("__EVENTTARGET".to_string(), String::new())]);
    }

    #[test]
    fn redirect_doubled_prefix_is_collapsed() {
        let url = resolve_redirect(
            "https://fogis.svenskfotboll.se/mdk",
            "/mdk/mdk/Default.aspx",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://fogis.svenskfotboll.se/mdk/Default.aspx"
        );
    }

    #[test]
    fn redirect_relative_and_absolute_locations() {
        let base = "http://127.0.0.1:9000/mdk";
        let resolve = |location| resolve_redirect(base, location).unwrap().to_string();
        assert_eq!(resolve("/mdk/"), "http://127.0.0.1:9000/mdk/");
        assert_eq!(resolve("https://other.example/x"), "https://other.example/x");
    }

    #[test]
    fn truncate_long_bodies() {
        let body = "x".repeat(2500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
        assert_eq!(out.len(), 2000 + "...[truncated]".len());
    }
}
