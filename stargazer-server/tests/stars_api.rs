use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use stargazer_core::{PrometheusStarMetrics, GithubCredential, StarResolver};
use stargazer_model::{RepoStars, StarsResponse};
use stargazer_server::{
    AppState,
    infra::config::{Config, GithubConfig},
    routes::create_router,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

async fn github_stub() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/kubernetes/kubernetes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "stargazers_count": 112_000 })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/istio/istio"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "stargazers_count": 35_000 })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

fn app(github: &MockServer, token: Option<&str>) -> (TestServer, AppState) {
    let config = Config {
        github: GithubConfig {
            api_url: github.uri(),
            token: token.map(GithubCredential::new),
        },
        ..Config::default()
    };
    let state = AppState::from_config(&config).expect("state");
    let server =
        TestServer::new(create_router(state.clone())).expect("test server");
    (server, state)
}

#[tokio::test]
async fn stars_resolves_batch_in_order() {
    let github = github_stub().await;
    let (server, state) = app(&github, None);

    let response = server
        .post("/stars")
        .json(&json!({
            "repos": [
                { "name": "istio/istio" },
                { "name": "kuberneteskubernetes" },
                { "name": "kubernetes/kubernetes" },
                { "name": "owner/ghost" },
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: StarsResponse = response.json();
    assert_eq!(
        body.repos,
        vec![
            RepoStars::success("istio/istio", 35_000),
            RepoStars::failure(
                "kuberneteskubernetes",
                "received invalid identifier: kuberneteskubernetes"
            ),
            RepoStars::success("kubernetes/kubernetes", 112_000),
            RepoStars::failure("owner/ghost", "resource not found: owner/ghost"),
        ]
    );

    let snapshot = state.metrics().snapshot();
    assert_eq!(snapshot.stars_requests_all, 1);
    assert_eq!(snapshot.stars_requests_ok, 1);
    assert_eq!(snapshot.upstream_requests_all, 3);
    assert_eq!(snapshot.upstream_requests_ok, 2);
}

#[tokio::test]
async fn stars_rows_use_wire_field_names() {
    let github = github_stub().await;
    let (server, _) = app(&github, None);

    let response = server
        .post("/stars")
        .json(&json!({ "repos": [{ "name": "istio/istio" }, { "name": "bad" }] }))
        .await;

    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "repos": [
                { "name": "istio/istio", "Stars": 35_000, "Error": "<nil>" },
                {
                    "name": "bad",
                    "Stars": -1,
                    "Error": "received invalid identifier: bad"
                },
            ]
        })
    );
}

#[tokio::test]
async fn empty_batch_returns_empty_list() {
    let github = github_stub().await;
    let (server, state) = app(&github, None);

    let response = server.post("/stars").json(&json!({ "repos": [] })).await;

    response.assert_status_ok();
    response.assert_json(&json!({ "repos": [] }));
    assert_eq!(state.metrics().snapshot().upstream_requests_all, 0);
}

#[tokio::test]
async fn missing_names_fail_individually() {
    let github = github_stub().await;
    let (server, _) = app(&github, None);

    let response = server.post("/stars").json(&json!({ "repos": [{}] })).await;

    response.assert_status_ok();
    let body: StarsResponse = response.json();
    assert_eq!(
        body.repos,
        vec![RepoStars::failure("", "received invalid identifier: ")]
    );
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let github = github_stub().await;
    let (server, state) = app(&github, None);

    let response = server
        .post("/stars")
        .text("{\"repos\": [")
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_text("Malformed Request.\n");
    let snapshot = state.metrics().snapshot();
    assert_eq!(snapshot.stars_requests_all, 1);
    assert_eq!(snapshot.stars_requests_ok, 0);
}

#[tokio::test]
async fn wrong_method_on_stars_is_not_found() {
    let github = github_stub().await;
    let (server, state) = app(&github, None);

    let response = server.get("/stars").expect_failure().await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_text("Method is not supported.\n");
    assert_eq!(state.metrics().snapshot().stars_requests_all, 1);
}

#[tokio::test]
async fn health_reports_green() {
    let github = github_stub().await;
    let (server, _) = app(&github, None);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "green");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn health_rejects_post() {
    let github = github_stub().await;
    let (server, _) = app(&github, None);

    let response = server.post("/health").expect_failure().await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_text("Method is not supported.\n");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let github = github_stub().await;
    let (server, _) = app(&github, None);

    let response = server.get("/stars/extra").expect_failure().await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_text("404 not found.\n");
}

#[tokio::test]
async fn metrics_exposes_counters() {
    let github = github_stub().await;
    let (server, _) = app(&github, None);

    server
        .post("/stars")
        .json(&json!({ "repos": [{ "name": "istio/istio" }] }))
        .await
        .assert_status_ok();

    let response = server.get("/metrics").await;

    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert_eq!(
        content_type.to_str().unwrap(),
        "text/plain; version=0.0.4; charset=utf-8"
    );
    let text = response.text();
    for series in [
        "api_requests_stars_all 1",
        "api_requests_stars_200 1",
        "api_requests_github_all 1",
        "api_requests_github_200 1",
    ] {
        assert!(
            text.lines().any(|line| line == series),
            "missing `{series}` in:\n{text}"
        );
    }
    assert!(text.contains("# TYPE api_requests_stars_all counter"));
}

#[tokio::test]
async fn configured_token_reaches_upstream() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/istio/istio"))
        .and(header("authorization", "token s3cret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "stargazers_count": 9 })),
        )
        .expect(1)
        .mount(&github)
        .await;
    let (server, _) = app(&github, Some("s3cret"));

    let response = server
        .post("/stars")
        .json(&json!({ "repos": [{ "name": "istio/istio" }] }))
        .await;

    let body: StarsResponse = response.json();
    assert_eq!(body.repos, vec![RepoStars::success("istio/istio", 9)]);
}

/// Resolver that answers every identifier with the same count.
struct Fixed(u64);

#[async_trait]
impl StarResolver for Fixed {
    async fn resolve(&self, _repo: &str) -> stargazer_core::Result<u64> {
        Ok(self.0)
    }
}

#[tokio::test]
async fn state_can_wrap_custom_resolver() {
    let state = AppState::with_resolver(
        &Config::default(),
        Arc::new(Fixed(7)),
        Arc::new(PrometheusStarMetrics::new()),
    );
    let server = TestServer::new(create_router(state)).expect("test server");

    let body: StarsResponse = server
        .post("/stars")
        .json(&json!({ "repos": [{ "name": "a/b" }] }))
        .await
        .json();

    assert_eq!(body.repos, vec![RepoStars::success("a/b", 7)]);
}
