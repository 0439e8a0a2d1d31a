mod common;

use std::sync::Arc;

use asistencia_tui::api::{ApiClient, CheckIn, Period};
use asistencia_tui::error::ApiError;
use asistencia_tui::session::{AuthSession, Role};
use axum::http::Method;
use chrono::NaiveDate;
use common::{spawn_backend, Backend};

fn as_admin(client: &ApiClient) -> ApiClient {
    client.with_session(Arc::new(AuthSession {
        token: "tok-admin".into(),
        username: "admin".into(),
        role: Role::Admin,
        persona_id: Some(1),
    }))
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn login_builds_session_from_response() {
    let backend = Backend::default();
    let client = spawn_backend(backend.clone()).await;

    let session = client.login(" lider ", "secreto").await.unwrap();
    assert_eq!(session.token, "tok-lider");
    assert_eq!(session.username, "lider");
    assert_eq!(session.role, Role::Leader);
    assert_eq!(session.persona_id, Some(30));

    let admin = client.login("admin", "secreto").await.unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(admin.token, "tok-admin");

    let sent = backend.find(Method::POST, "/auth/login").unwrap();
    assert_eq!(sent.body["username"], "lider");
    assert!(sent.auth.is_none());
}

#[tokio::test]
async fn bad_credentials_and_blank_fields() {
    let backend = Backend::default();
    let client = spawn_backend(backend.clone()).await;

    let err = client.login("lider", "nope").await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);

    let err = client.login("  ", "secreto").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn calls_carry_the_bearer_token() {
    let backend = Backend::default();
    let api = as_admin(&spawn_backend(backend.clone()).await);

    let periods: Option<Vec<Period>> = api.get("/periodos").await.unwrap();
    let periods = periods.unwrap_or_default();
    assert_eq!(periods.len(), 2);
    assert_eq!(periods[1].starts_on, Some(day(2023, 8, 1)));

    let body = serde_json::json!({"idPeriodo": 10, "nombre": "2024-II"});
    let created: Option<Period> = api.send_json(Method::POST, "/periodos", &body).await.unwrap();
    assert_eq!(created.map(|p| p.name), Some("2024-II".to_string()));
    api.delete("/periodos/1").await.unwrap();

    let requests = backend.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests
        .iter()
        .all(|r| r.auth.as_deref() == Some("Bearer tok-admin")));
}

#[tokio::test]
async fn backend_message_reaches_the_error() {
    let api = as_admin(&spawn_backend(Backend::default()).await);

    let err = api.delete("/periodos/9").await.unwrap_err();
    assert_eq!(err.to_string(), "El periodo tiene eventos asociados");
    assert_eq!(
        err.banner("Error al eliminar"),
        "Error al eliminar: El periodo tiene eventos asociados"
    );

    let missing = api.get::<serde_json::Value>("/nada").await.unwrap_err();
    assert!(matches!(missing, ApiError::Status { status: 404, .. }));
}

#[tokio::test]
async fn missing_or_expired_token_is_unauthorized() {
    let client = spawn_backend(Backend::default()).await;
    let err = client.my_sessions().await.unwrap_err();
    assert!(err.is_unauthorized());

    let expired = client.with_session(Arc::new(AuthSession {
        token: "expired".into(),
        username: "x".into(),
        role: Role::Member,
        persona_id: None,
    }));
    let err = expired
        .get::<Option<Vec<Period>>>("/periodos")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn sessions_by_date_and_null_lists() {
    let backend = Backend::default();
    let api = as_admin(&spawn_backend(backend.clone()).await);

    let sessions = api.sessions_on(day(2024, 6, 2)).await.unwrap();
    assert_eq!(sessions[0].date, Some(day(2024, 6, 2)));
    let sent = backend
        .find(Method::GET, "/eventos-especificos/fecha")
        .unwrap();
    assert_eq!(sent.query.as_deref(), Some("fecha=2024-06-02"));

    assert!(api.my_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn profile_is_read_and_saved_by_id() {
    let backend = Backend::default();
    let api = as_admin(&spawn_backend(backend.clone()).await);

    let mut profile = api.my_profile().await.unwrap();
    assert_eq!(profile.id, 30);
    assert_eq!(profile.birth_date, Some(day(2001, 3, 4)));
    assert!(!profile.is_guest());

    profile.phone = Some("999111222".into());
    let saved = api.update_profile(&profile).await.unwrap();
    assert_eq!(saved.and_then(|p| p.phone).as_deref(), Some("999111222"));
    let sent = backend.find(Method::PUT, "/personas/30").unwrap();
    assert_eq!(sent.body["nombreCompleto"], "Ana Torres");
    assert_eq!(sent.body["fechaNacimiento"], "2001-03-04");

    profile.full_name = "  ".into();
    let err = api.update_profile(&profile).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(backend.requests().len(), 2);
}

#[tokio::test]
async fn qr_and_check_in() {
    let backend = Backend::default();
    let api = as_admin(&spawn_backend(backend.clone()).await);

    let code = api.generate_qr(5, 30).await.unwrap();
    assert_eq!(code.location(), Some("Aula 3"));
    assert!(code.payload_text().unwrap().contains("\"sesion\":5"));

    api.register_attendance(&CheckIn {
        session_id: 5,
        persona_id: 40,
        latitude: Some(-12.05),
        longitude: None,
    })
    .await
    .unwrap();
    let sent = backend
        .find(Method::POST, "/asistencias/registrar-qr")
        .unwrap();
    assert_eq!(sent.body["eventoEspecificoId"], 5);
    assert_eq!(sent.body["personaId"], 40);
    assert_eq!(sent.body["longitud"], serde_json::Value::Null);
}

#[tokio::test]
async fn candidates_and_leaders_pass_their_filters() {
    let backend = Backend::default();
    let api = as_admin(&spawn_backend(backend.clone()).await);

    let candidates = api.available_candidates(2, Some("3")).await.unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].student_code.as_deref(), Some("2021"));

    let leaders = api.available_leaders(Some(4)).await.unwrap();
    assert_eq!(leaders[0].persona_id, 31);

    let requests = backend.requests();
    assert_eq!(requests[0].query.as_deref(), Some("ciclo=3"));
    assert_eq!(requests[1].query.as_deref(), Some("excludeGrupoPequenoId=4"));
}

#[tokio::test]
async fn dashboard_counts_today_only() {
    let api = as_admin(&spawn_backend(Backend::default()).await);
    let stats = api.dashboard_stats(day(2024, 5, 6)).await;
    assert_eq!(stats.people, 3);
    assert_eq!(stats.enrollments, 2);
    assert_eq!(stats.active_events, 1);
    assert_eq!(stats.attendance_today, 2);
}

#[tokio::test]
async fn dashboard_zeroes_on_any_failure() {
    let backend = Backend {
        fail_dashboard: true,
        ..Backend::default()
    };
    let api = as_admin(&spawn_backend(backend).await);
    let stats = api.dashboard_stats(day(2024, 5, 6)).await;
    assert_eq!(stats, Default::default());
}
