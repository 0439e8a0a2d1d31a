#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use asistencia_tui::api::ApiClient;
use asistencia_tui::config::ApiConfig;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

/// One request as the stub backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub auth: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct Backend {
    pub log: Arc<Mutex<Vec<Recorded>>>,
    pub fail_dashboard: bool,
}

impl Backend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn find(&self, method: Method, path: &str) -> Option<Recorded> {
        self.requests()
            .into_iter()
            .find(|r| r.method == method && r.path == path)
    }
}

/// Starts the stub on an ephemeral port and returns a client pointed at it.
pub async fn spawn_backend(backend: Backend) -> ApiClient {
    let router = Router::new().fallback(handle).with_state(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    ApiClient::new(&ApiConfig {
        api_url: format!("http://{addr}"),
        timeout_secs: 5,
    })
    .unwrap()
}

fn session(id: i64, name: &str, date: &str, parent: i64) -> Value {
    json!({
        "idEventoEspecifico": id,
        "nombreSesion": name,
        "fecha": date,
        "horaInicio": "18:00:00",
        "horaFin": "20:00:00",
        "eventoGeneralId": parent,
        "eventoGeneralNombre": format!("Evento {parent}"),
        "lugar": "Aula 3",
        "estado": "PROGRAMADO"
    })
}

fn today_param(query: Option<&str>) -> String {
    query
        .and_then(|q| q.split('&').find_map(|kv| kv.strip_prefix("fecha=")))
        .unwrap_or("2024-05-06")
        .to_string()
}

async fn handle(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let query = uri.query().map(str::to_string);
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    backend.log.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: query.clone(),
        auth: auth.clone(),
        body: body.clone(),
    });

    if path == "/auth/login" {
        return match (body["username"].as_str(), body["password"].as_str()) {
            (Some("lider"), Some("secreto")) => Json(json!({
                "token": "tok-lider",
                "rol": "ROLE_LIDER",
                "personaId": 30
            }))
            .into_response(),
            (Some("admin"), Some("secreto")) => Json(json!({
                "accessToken": "tok-admin",
                "username": "admin",
                "nombreRol": "ADMIN",
                "personaId": 1
            }))
            .into_response(),
            _ => StatusCode::UNAUTHORIZED.into_response(),
        };
    }

    match auth.as_deref() {
        None | Some("Bearer expired") => return StatusCode::UNAUTHORIZED.into_response(),
        Some(_) => {}
    }

    if backend.fail_dashboard && path == "/matriculas" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "fallo"})),
        )
            .into_response();
    }

    match (method.as_str(), path.as_str()) {
        ("GET", "/periodos") => Json(json!([
            {"idPeriodo": 1, "nombre": "2024-I", "fechaInicio": "2024-03-01", "fechaFin": "2024-07-31", "estado": "ACTIVO"},
            {"idPeriodo": 9, "nombre": "2023-II", "fechaInicio": [2023, 8, 1], "fechaFin": [2023, 12, 15], "estado": "INACTIVO"}
        ]))
        .into_response(),
        ("POST", "/periodos") => (StatusCode::CREATED, Json(body)).into_response(),
        ("PUT", "/periodos/1") => Json(body).into_response(),
        ("DELETE", "/periodos/1") => StatusCode::NO_CONTENT.into_response(),
        ("DELETE", "/periodos/9") => (
            StatusCode::CONFLICT,
            Json(json!({"message": "El periodo tiene eventos asociados"})),
        )
            .into_response(),
        ("GET", "/eventos-generales") => Json(json!([
            {"idEventoGeneral": 7, "nombre": "Retiro", "fechaInicio": "2024-05-01", "fechaFin": "2024-05-31"}
        ]))
        .into_response(),
        ("GET", "/grupos-generales") | ("GET", "/programas") | ("GET", "/roles") => {
            Json(json!([])).into_response()
        }
        ("GET", "/users/lideres-disponibles") => Json(json!([
            {"idPersona": 31, "nombreCompleto": "Pedro Gil", "codigoEstudiante": "20201"}
        ]))
        .into_response(),
        ("GET", "/eventos-especificos") => Json(json!([
            session(1, "Apertura", "2024-05-06", 7),
            session(2, "Cierre", "2024-05-31T00:00:00", 8)
        ]))
        .into_response(),
        ("GET", "/eventos-especificos/fecha") => {
            let day = today_param(query.as_deref());
            Json(json!([session(5, "Oración", &day, 7)])).into_response()
        }
        ("GET", "/eventos-especificos/mis-sesiones") => Json(Value::Null).into_response(),
        ("GET", "/asistencias/generar-qr/5/lider/30") => Json(json!({
            "qrData": {"sesion": 5, "lugar": "Aula 3"},
            "expiraEn": "2024-05-06T20:15:00"
        }))
        .into_response(),
        ("POST", "/asistencias/registrar-qr") => {
            Json(json!({"mensaje": "Asistencia registrada"})).into_response()
        }
        ("GET", "/grupos-pequenos/disponibles/2") => Json(json!([
            {"idPersona": 50, "nombreCompleto": "Lucía Paz", "codigoEstudiante": "2021"},
            {"idPersona": 51, "nombreCompleto": "Mario Rey"}
        ]))
        .into_response(),
        ("GET", "/personas/my-profile") => Json(json!({
            "idPersona": 30,
            "nombreCompleto": "Ana Torres",
            "documento": "70112233",
            "correoInstitucional": "ana@uni.edu",
            "codigoEstudiante": "2020",
            "fechaNacimiento": [2001, 3, 4]
        }))
        .into_response(),
        ("PUT", "/personas/30") => Json(body).into_response(),
        ("GET", "/personas") => Json(json!([{}, {}, {}])).into_response(),
        ("GET", "/matriculas") => Json(json!([{}, {}])).into_response(),
        ("GET", "/eventos-generales/activos") => Json(json!([{}])).into_response(),
        ("GET", "/asistencias") => Json(json!([
            {"idAsistencia": 1, "fechaHoraRegistro": "2024-05-06T18:02:00"},
            {"idAsistencia": 2, "fechaHoraRegistro": "2024-05-06T18:10:00"},
            {"idAsistencia": 3, "fechaHoraRegistro": "2024-05-05T18:10:00"}
        ]))
        .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "No encontrado"})),
        )
            .into_response(),
    }
}
