use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use debate_timer_back::{
    config::AppConfig,
    routes,
    state::{AppState, Capability, ManualClock, SessionGrants},
};
use serde_json::{Value, json};
use tower::ServiceExt;

const T0: f64 = 1_700_000_000.0;

struct Harness {
    app: Router,
    clock: Arc<ManualClock>,
}

impl Harness {
    fn new(config: AppConfig) -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let state = AppState::with_parts(config, clock.clone(), Arc::new(SessionGrants));
        Self {
            app: routes::router(state),
            clock,
        }
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        session: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = session {
            builder = builder.header("x-session-id", id);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn open_session(&self) -> String {
        let (status, body) = self.call("POST", "/sessions", None, None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_owned()
    }

    async fn start(&self, session: &str, format: &str) -> Value {
        let (status, body) = self
            .call(
                "POST",
                "/timer/start",
                Some(session),
                Some(json!({ "format": format })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body
    }

    async fn command(&self, session: &str, uri: &str, body: Option<Value>) -> Value {
        let (status, body) = self.call("POST", uri, Some(session), body).await;
        assert_eq!(status, StatusCode::OK, "{uri}: {body}");
        assert!(body.get("timer").is_none(), "{uri} returned timer values");
        body
    }

    async fn status(&self, session: &str) -> Value {
        let (status, body) = self.call("GET", "/timer/status", Some(session), None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body
    }
}

#[tokio::test]
async fn healthcheck_and_catalog_are_public() {
    let harness = Harness::new(AppConfig::default());

    let (status, body) = harness.call("GET", "/healthcheck", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = harness.call("GET", "/formats", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let formats = body.as_array().unwrap();
    assert_eq!(formats.len(), 3);
    assert_eq!(formats[0]["id"], "ceda");
    assert_eq!(formats[0]["steps"].as_array().unwrap().len(), 11);
}

#[tokio::test]
async fn timer_routes_require_a_known_session() {
    let harness = Harness::new(AppConfig::default());

    let (status, _) = harness.call("GET", "/timer/status", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = harness
        .call("GET", "/timer/status", Some("not-a-uuid"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = harness
        .call(
            "GET",
            "/timer/status",
            Some("6f1c2a3e-0000-4000-8000-000000000000"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn fresh_session_reports_inactive_status() {
    let harness = Harness::new(AppConfig::default());
    let session = harness.open_session().await;

    assert_eq!(harness.status(&session).await, json!({ "active": false }));

    let (status, _) = harness
        .call("POST", "/timer/toggle", Some(&session), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn commands_acknowledge_and_status_reports_clocks() {
    let harness = Harness::new(AppConfig::default());
    let session = harness.open_session().await;

    let ack = harness.start(&session, "ceda").await;
    assert_eq!(ack, json!({ "message": "format started" }));

    let started = harness.status(&session).await;
    assert_eq!(started["step"], 0);
    assert_eq!(started["timer"]["clock"]["time_str"], "04:00");
    assert_eq!(started["is_running"], false);

    let ack = harness.command(&session, "/timer/toggle", None).await;
    assert_eq!(ack, json!({ "message": "toggled" }));
    harness.clock.advance(65.5);

    let status = harness.status(&session).await;
    assert_eq!(status["is_running"], true);
    assert_eq!(status["timer"]["clock"]["remaining_secs"], 174);
    assert_eq!(status["timer"]["clock"]["time_str"], "02:54");

    harness.command(&session, "/timer/toggle", None).await;
    harness.clock.advance(30.0);
    let paused = harness.status(&session).await;
    assert_eq!(paused["is_running"], false);
    assert_eq!(paused["timer"]["clock"]["remaining_secs"], 174);
}

#[tokio::test]
async fn step_navigation_validates_and_clamps() {
    let harness = Harness::new(AppConfig::default());
    let session = harness.open_session().await;
    harness.start(&session, "ceda").await;

    let (status, body) = harness
        .call(
            "POST",
            "/timer/step",
            Some(&session),
            Some(json!({ "step": 11 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    harness.command(&session, "/timer/previous", None).await;
    assert_eq!(harness.status(&session).await["step"], 0);

    harness
        .command(&session, "/timer/step", Some(json!({ "step": 10 })))
        .await;
    assert_eq!(harness.status(&session).await["step_name"], "Pros Closing");

    harness.command(&session, "/timer/next", None).await;
    assert_eq!(harness.status(&session).await["step"], 10);
}

#[tokio::test]
async fn switch_turn_outside_free_debate_conflicts() {
    let harness = Harness::new(AppConfig::default());
    let session = harness.open_session().await;
    harness.start(&session, "ceda").await;

    let (status, _) = harness
        .call("POST", "/timer/switch-turn", Some(&session), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn free_debate_turn_expires_to_the_other_side() {
    let harness = Harness::new(AppConfig::default());
    let session = harness.open_session().await;
    harness.start(&session, "free_debate").await;

    harness
        .command(&session, "/timer/step", Some(json!({ "step": 2 })))
        .await;
    let body = harness.status(&session).await;
    assert_eq!(body["timer"]["type"], "free_debate");
    assert_eq!(body["timer"]["turn"], "pros");

    harness.command(&session, "/timer/toggle", None).await;
    harness.clock.advance(125.0);

    let status = harness.status(&session).await;
    assert_eq!(status["timer"]["turn"], "cons");
    assert_eq!(status["timer"]["pros"]["is_running"], false);
    assert_eq!(status["timer"]["cons"]["is_running"], true);
    assert_eq!(status["timer"]["pros"]["remaining_secs"], 535);
    assert_eq!(status["timer"]["turn_clock"]["remaining_secs"], 120);
}

#[tokio::test]
async fn pause_after_unread_turn_expiry_pauses_the_speaking_side() {
    let harness = Harness::new(AppConfig::default());
    let session = harness.open_session().await;
    harness.start(&session, "free_debate").await;
    harness
        .command(&session, "/timer/step", Some(json!({ "step": 2 })))
        .await;

    harness.command(&session, "/timer/toggle", None).await;
    harness.clock.advance(130.0);
    harness.command(&session, "/timer/toggle", None).await;

    let status = harness.status(&session).await;
    assert_eq!(status["timer"]["turn"], "pros");
    assert_eq!(status["timer"]["pros"]["is_running"], false);
    assert_eq!(status["timer"]["pros"]["remaining_secs"], 530);
    assert_eq!(status["timer"]["cons"]["is_running"], false);
    assert_eq!(status["timer"]["turn_clock"]["is_running"], false);
}

#[tokio::test]
async fn deliberation_overlay_spends_budget_then_clears() {
    let harness = Harness::new(AppConfig::default());
    let session = harness.open_session().await;
    harness.start(&session, "ceda").await;

    harness
        .command(&session, "/timer/step", Some(json!({ "step": 1 })))
        .await;
    let body = harness.status(&session).await;
    assert_eq!(body["deliberation"]["chance_for"], "cons");
    assert_eq!(body["deliberation"]["remaining"]["cons"], 120);

    let ack = harness
        .command(
            &session,
            "/timer/deliberation",
            Some(json!({ "side": "cons", "seconds": 60 })),
        )
        .await;
    assert_eq!(ack["message"], "deliberation started");
    let body = harness.status(&session).await;
    assert_eq!(body["timer"]["type"], "deliberation");
    assert_eq!(body["timer"]["clock"]["time_str"], "01:00");

    let (status, _) = harness
        .call(
            "POST",
            "/timer/deliberation",
            Some(&session),
            Some(json!({ "side": "cons", "seconds": 120 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    harness.clock.advance(61.0);
    let status = harness.status(&session).await;
    assert_eq!(status["timer"]["type"], "sequence");
    assert_eq!(status["deliberation"]["remaining"]["cons"], 60);
}

#[tokio::test]
async fn custom_duration_applies_only_to_the_custom_step() {
    let harness = Harness::new(AppConfig::default());
    let session = harness.open_session().await;
    harness.start(&session, "general").await;

    let (status, _) = harness
        .call(
            "POST",
            "/timer/custom-duration",
            Some(&session),
            Some(json!({ "minutes": 2, "seconds": 30 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    harness
        .command(&session, "/timer/step", Some(json!({ "step": 10 })))
        .await;

    let (status, _) = harness
        .call(
            "POST",
            "/timer/custom-duration",
            Some(&session),
            Some(json!({ "minutes": 2, "seconds": 75 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    harness
        .command(
            &session,
            "/timer/custom-duration",
            Some(json!({ "minutes": 2, "seconds": 30 })),
        )
        .await;
    let body = harness.status(&session).await;
    assert_eq!(body["timer"]["clock"]["time_str"], "02:30");
}

#[tokio::test]
async fn formats_outside_the_grants_are_forbidden() {
    let harness = Harness::new(AppConfig::with_grants([Capability::GeneralTimer]));
    let session = harness.open_session().await;

    let (status, _) = harness
        .call(
            "POST",
            "/timer/start",
            Some(&session),
            Some(json!({ "format": "ceda" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    harness.start(&session, "general").await;
}

#[tokio::test]
async fn closed_session_is_no_longer_accepted() {
    let harness = Harness::new(AppConfig::default());
    let session = harness.open_session().await;

    let (status, _) = harness
        .call("DELETE", "/sessions/current", Some(&session), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = harness
        .call("GET", "/timer/status", Some(&session), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
