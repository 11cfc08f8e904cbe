use fogis_api::{
    AuthState, ClientConfig, Credentials, Error, ErrorKind, RpcTransport, SessionToken,
    AUTH_COOKIE, SESSION_COOKIE,
};
use wiremock::matchers::{body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::default().with_base_url(&format!("{}/mdk", server.uri()))
}

async fn mount_login_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/mdk/Login.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "ASP.NET_SessionId=sess123; path=/; HttpOnly")
                .set_body_string(load_fixture("login_page.html")),
        )
        .mount(server)
        .await;
}

async fn mount_portal_home(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/mdk/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Start</html>"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_success_returns_auth_cookie() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;
    mount_portal_home(&server).await;

    Mock::given(method("POST"))
        .and(path("/mdk/Login.aspx"))
        .and(body_string_contains("__VIEWSTATE=vs-token"))
        .and(body_string_contains("__EVENTVALIDATION=ev-token"))
        .and(body_string_contains("ctl00%24MainContent%24UserName=referee"))
        .and(body_string_contains("ctl00%24MainContent%24Password=secret"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/mdk/")
                .insert_header(
                    "Set-Cookie",
                    "FogisMobilDomarKlient.ASPXAUTH=auth456; path=/; HttpOnly",
                ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport =
        RpcTransport::new(config_for(&server), Credentials::new("referee", "secret")).unwrap();
    let token = transport.login().await.unwrap();

    assert_eq!(token.get(AUTH_COOKIE), Some("auth456"));
    assert_eq!(token.get(SESSION_COOKIE), Some("sess123"));
    assert!(token.is_authenticated());
    assert_eq!(transport.state().await, AuthState::Authenticated);
    assert_eq!(transport.token().await, Some(token));
}

#[tokio::test]
async fn login_is_not_repeated_once_authenticated() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;
    mount_portal_home(&server).await;

    Mock::given(method("POST"))
        .and(path("/mdk/Login.aspx"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/mdk/")
                .insert_header(
                    "Set-Cookie",
                    "FogisMobilDomarKlient.ASPXAUTH=auth456; path=/",
                ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport =
        RpcTransport::new(config_for(&server), Credentials::new("referee", "secret")).unwrap();
    let first = transport.login().await.unwrap();
    let second = transport.login().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn rejected_credentials_leave_no_token() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;

    // The portal re-renders the form with 200 on a bad password.
    Mock::given(method("POST"))
        .and(path("/mdk/Login.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("login_page.html")))
        .mount(&server)
        .await;

    let transport =
        RpcTransport::new(config_for(&server), Credentials::new("referee", "wrong")).unwrap();
    let err = transport.login().await.unwrap_err();

    assert!(matches!(err, Error::Login(_)));
    assert_eq!(err.kind(), ErrorKind::Login);
    assert!(transport.token().await.is_none());
    assert_eq!(transport.state().await, AuthState::Failed);
}

#[tokio::test]
async fn redirect_without_auth_cookie_is_rejected() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/mdk/Login.aspx"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/mdk/Login.aspx"))
        .mount(&server)
        .await;

    let transport =
        RpcTransport::new(config_for(&server), Credentials::new("referee", "secret")).unwrap();
    let err = transport.login().await.unwrap_err();
    assert!(matches!(err, Error::Login(ref msg) if msg.contains("302")));
    assert!(transport.token().await.is_none());
}

#[tokio::test]
async fn missing_login_form_fails_before_posting() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mdk/Login.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><p>Underhåll</p></html>"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mdk/Login.aspx"))
        .respond_with(ResponseTemplate::new(302))
        .expect(0)
        .mount(&server)
        .await;

    let transport =
        RpcTransport::new(config_for(&server), Credentials::new("referee", "secret")).unwrap();
    let err = transport.login().await.unwrap_err();
    assert!(matches!(err, Error::Login(ref msg) if msg.contains("could not find login form")));
}

#[tokio::test]
async fn login_page_server_error_is_request_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mdk/Login.aspx"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let transport =
        RpcTransport::new(config_for(&server), Credentials::new("referee", "secret")).unwrap();
    let err = transport.login().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    assert_eq!(err.kind(), ErrorKind::Request);
}

#[tokio::test]
async fn unreachable_portal_is_request_error() {
    let config = ClientConfig::default().with_base_url("http://127.0.0.1:9/mdk");
    let transport = RpcTransport::new(config, Credentials::new("referee", "secret")).unwrap();

    let err = transport.login().await.unwrap_err();
    assert!(matches!(err, Error::Request { source: Some(_), .. }));
    assert_eq!(err.kind(), ErrorKind::Request);
    assert_eq!(transport.state().await, AuthState::Failed);
}

#[tokio::test]
async fn supplied_token_skips_login() {
    let config = ClientConfig::default().with_base_url("http://127.0.0.1:9/mdk");
    let token: SessionToken = [(AUTH_COOKIE, "saved"), (SESSION_COOKIE, "s1")]
        .into_iter()
        .collect();
    let transport = RpcTransport::with_token(config, token.clone()).unwrap();

    assert_eq!(transport.state().await, AuthState::Authenticated);
    assert_eq!(transport.login().await.unwrap(), token);
}

#[tokio::test]
async fn redirect_clearing_auth_cookie_is_rejected() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/mdk/Login.aspx"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/mdk/Login.aspx")
                .insert_header(
                    "Set-Cookie",
                    "FogisMobilDomarKlient.ASPXAUTH=; expires=Thu, 01-Jan-1970 00:00:00 GMT",
                ),
        )
        .mount(&server)
        .await;

    let transport =
        RpcTransport::new(config_for(&server), Credentials::new("referee", "wrong")).unwrap();
    let err = transport.login().await.unwrap_err();

    assert!(matches!(err, Error::Login(_)));
    assert!(transport.token().await.is_none());
    assert_eq!(transport.state().await, AuthState::Failed);
}

#[tokio::test]
async fn auth_cookie_with_zero_max_age_is_rejected() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/mdk/Login.aspx"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/mdk/")
                .insert_header(
                    "Set-Cookie",
                    "FogisMobilDomarKlient.ASPXAUTH=stale; Max-Age=0; path=/",
                ),
        )
        .mount(&server)
        .await;

    let transport =
        RpcTransport::new(config_for(&server), Credentials::new("referee", "secret")).unwrap();
    let err = transport.login().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Login);
    assert!(transport.token().await.is_none());
}

#[tokio::test]
async fn cookies_stay_on_the_portal_when_redirected_elsewhere() {
    let server = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    mount_login_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/mdk/Login.aspx"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/landing", elsewhere.uri()))
                .insert_header(
                    "Set-Cookie",
                    "FogisMobilDomarKlient.ASPXAUTH=auth456; path=/",
                ),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&elsewhere)
        .await;

    let transport =
        RpcTransport::new(config_for(&server), Credentials::new("referee", "secret")).unwrap();
    let token = transport.login().await.unwrap();
    assert_eq!(token.get(AUTH_COOKIE), Some("auth456"));

    let requests = elsewhere.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("cookie").is_none());
}

#[tokio::test]
async fn redirect_on_the_portal_carries_session_cookies() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/mdk/Login.aspx"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/mdk/")
                .insert_header(
                    "Set-Cookie",
                    "FogisMobilDomarKlient.ASPXAUTH=auth456; path=/",
                ),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mdk/"))
        .and(header_regex("cookie", "FogisMobilDomarKlient.ASPXAUTH=auth456"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let transport =
        RpcTransport::new(config_for(&server), Credentials::new("referee", "secret")).unwrap();
    transport.login().await.unwrap();
}
