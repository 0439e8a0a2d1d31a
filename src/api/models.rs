use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::wire;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(rename = "idPeriodo")]
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "fechaInicio", default, deserialize_with = "wire::date_opt")]
    pub starts_on: Option<NaiveDate>,
    #[serde(rename = "fechaFin", default, deserialize_with = "wire::date_opt")]
    pub ends_on: Option<NaiveDate>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(rename = "idPrograma")]
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: String,
}

/// "Grupo general": the roster umbrella nested under a parent event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralGroup {
    #[serde(rename = "idGrupoGeneral")]
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "eventoGeneralId", default)]
    pub parent_id: Option<i64>,
    #[serde(rename = "eventoGeneralNombre", default)]
    pub parent_name: Option<String>,
    #[serde(rename = "periodoNombre", default)]
    pub period_name: Option<String>,
    #[serde(rename = "cantidadGruposPequenos", default)]
    pub small_group_count: Option<u32>,
    #[serde(rename = "totalParticipantes", default)]
    pub member_count: Option<u32>,
}

/// "Grupo pequeño": a capacity-bounded roster led by one leader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmallGroup {
    #[serde(rename = "idGrupoPequeno")]
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "grupoGeneralId", default)]
    pub general_group_id: Option<i64>,
    #[serde(rename = "grupoGeneralNombre", default)]
    pub general_group_name: Option<String>,
    #[serde(rename = "liderId", default)]
    pub leader_id: Option<i64>,
    #[serde(rename = "liderNombre", default)]
    pub leader_name: Option<String>,
    #[serde(rename = "liderCodigo", default)]
    pub leader_code: Option<String>,
    #[serde(rename = "capacidadMaxima", default = "default_capacity")]
    pub capacity: u32,
    #[serde(rename = "participantesActuales", default)]
    pub member_count: u32,
}

pub const DEFAULT_CAPACITY: u32 = 20;

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

impl SmallGroup {
    pub fn is_full(&self) -> bool {
        self.member_count >= self.capacity
    }

    /// Fill level in percent, capped at 100.
    pub fn fill_percent(&self) -> u16 {
        if self.capacity == 0 {
            return 100;
        }
        ((self.member_count as u64 * 100) / self.capacity as u64).min(100) as u16
    }
}

/// Enrollment of a person in a small group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    #[serde(rename = "idGrupoParticipante")]
    pub id: i64,
    #[serde(rename = "grupoPequenoId", default)]
    pub small_group_id: Option<i64>,
    #[serde(rename = "personaId", default)]
    pub persona_id: Option<i64>,
    #[serde(rename = "nombreCompleto", default)]
    pub full_name: Option<String>,
    #[serde(rename = "codigoEstudiante", default)]
    pub student_code: Option<String>,
    #[serde(rename = "correo", default)]
    pub email: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
}

impl GroupMember {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("ACTIVO")
    }
}

/// A person the backend reports as eligible for a group, or as an available leader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "idPersona")]
    pub persona_id: i64,
    #[serde(rename = "nombreCompleto", default)]
    pub full_name: String,
    #[serde(rename = "codigoEstudiante", default)]
    pub student_code: Option<String>,
    #[serde(rename = "correo", default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "idUsuario")]
    pub id: i64,
    #[serde(rename = "user", default)]
    pub username: String,
    #[serde(rename = "nombreCompleto", default)]
    pub full_name: Option<String>,
    #[serde(rename = "documento", default)]
    pub document: Option<String>,
    #[serde(rename = "correo", default)]
    pub email: Option<String>,
    #[serde(rename = "nombreRol", alias = "rol", default)]
    pub role: Option<String>,
    #[serde(rename = "tipoPersona", default)]
    pub person_type: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
}

/// The logged-in person's own record (`/personas/my-profile`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "idPersona")]
    pub id: i64,
    #[serde(rename = "nombreCompleto", default)]
    pub full_name: String,
    #[serde(rename = "documento", default)]
    pub document: Option<String>,
    #[serde(rename = "correo", default)]
    pub email: Option<String>,
    #[serde(rename = "celular", default)]
    pub phone: Option<String>,
    #[serde(rename = "correoInstitucional", default)]
    pub institutional_email: Option<String>,
    #[serde(rename = "codigoEstudiante", default)]
    pub student_code: Option<String>,
    #[serde(rename = "pais", default)]
    pub country: Option<String>,
    #[serde(rename = "religion", default)]
    pub religion: Option<String>,
    #[serde(rename = "fechaNacimiento", default, deserialize_with = "wire::date_opt")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "tipoPersona", default)]
    pub person_type: Option<String>,
}

impl Profile {
    /// Guests have no institutional email or student code to edit.
    pub fn is_guest(&self) -> bool {
        self.person_type.as_deref() == Some("INVITADO")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleInfo {
    #[serde(rename = "idRol", default)]
    pub id: Option<i64>,
    #[serde(rename = "nombreRol", alias = "nombre")]
    pub name: String,
}

/// Row of the participants listing (`/users/integrantes`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(rename = "idUsuario")]
    pub id: i64,
    #[serde(rename = "nombreCompleto", default)]
    pub full_name: Option<String>,
    #[serde(rename = "codigoEstudiante", default)]
    pub student_code: Option<String>,
    #[serde(rename = "documento", default)]
    pub document: Option<String>,
    #[serde(rename = "correo", default)]
    pub email: Option<String>,
    #[serde(rename = "periodo", default)]
    pub period: Option<String>,
    #[serde(rename = "tipoPersona", default)]
    pub person_type: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
}

/// Payload of `POST /eventos-especificos/recurrencia`.
///
/// `weekdays` uses the Sunday-is-0 numbering the backend expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurrenceRule {
    #[serde(rename = "idEventoGeneral")]
    pub parent_id: i64,
    #[serde(rename = "nombreSesion")]
    pub name: String,
    #[serde(rename = "fechaInicioRecurrencia")]
    pub from: NaiveDate,
    #[serde(rename = "fechaFinRecurrencia")]
    pub until: NaiveDate,
    #[serde(rename = "diasSemana")]
    pub weekdays: Vec<u8>,
    #[serde(rename = "horaInicio", serialize_with = "serialize_time")]
    pub start: NaiveTime,
    #[serde(rename = "horaFin", serialize_with = "serialize_time")]
    pub end: NaiveTime,
    #[serde(rename = "toleranciaMinutos")]
    pub tolerance_minutes: u32,
    #[serde(rename = "lugar", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl RecurrenceRule {
    pub fn validate(&self) -> Result<(), String> {
        if self.weekdays.is_empty() {
            return Err("Seleccione al menos un día de la semana".to_string());
        }
        if self.weekdays.iter().any(|d| *d > 6) {
            return Err("Día de la semana inválido".to_string());
        }
        if self.from > self.until {
            return Err("La fecha de inicio debe ser anterior a la fecha de fin".to_string());
        }
        if self.start >= self.end {
            return Err("La hora de inicio debe ser anterior a la hora de fin".to_string());
        }
        Ok(())
    }
}

pub fn serialize_time<S: serde::Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.format("%H:%M").to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken", alias = "jwt")]
    pub token: String,
    #[serde(default, alias = "user")]
    pub username: Option<String>,
    #[serde(default, alias = "rol", alias = "nombreRol")]
    pub role: Option<String>,
    #[serde(default, rename = "personaId")]
    pub persona_id: Option<i64>,
}

/// Whatever the backend hands back when a leader asks for a session's QR.
///
/// `qrData` is either a plain token or an object describing the session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QrCode {
    #[serde(rename = "qrData", alias = "token", default)]
    pub payload: Option<Value>,
    #[serde(rename = "qrImageBase64", default)]
    pub image_base64: Option<String>,
    #[serde(rename = "expiraEn", alias = "fechaExpiracion", default)]
    pub expires_at: Option<String>,
}

impl QrCode {
    /// Text members can type or paste in place of scanning.
    pub fn payload_text(&self) -> Option<String> {
        match self.payload.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.payload.as_ref()?.get("lugar")?.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckIn {
    #[serde(rename = "eventoEspecificoId")]
    pub session_id: i64,
    #[serde(rename = "personaId")]
    pub persona_id: i64,
    #[serde(rename = "latitud")]
    pub latitude: Option<f64>,
    #[serde(rename = "longitud")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Attendance {
    #[serde(rename = "idAsistencia", default)]
    pub id: Option<i64>,
    #[serde(rename = "fechaHoraRegistro", default)]
    pub registered_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub people: usize,
    pub enrollments: usize,
    pub active_events: usize,
    pub attendance_today: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule() -> RecurrenceRule {
        RecurrenceRule {
            parent_id: 1,
            name: "Clase".into(),
            from: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            until: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            weekdays: vec![1, 3, 5],
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            tolerance_minutes: 15,
            location: None,
        }
    }

    #[test]
    fn recurrence_serializes_with_backend_names() {
        let value = serde_json::to_value(rule()).unwrap();
        assert_eq!(value["fechaInicioRecurrencia"], json!("2024-03-01"));
        assert_eq!(value["diasSemana"], json!([1, 3, 5]));
        assert_eq!(value["horaInicio"], json!("09:00"));
        assert!(value.get("lugar").is_none());
    }

    #[test]
    fn recurrence_validation() {
        assert!(rule().validate().is_ok());

        let mut empty = rule();
        empty.weekdays.clear();
        assert!(empty.validate().is_err());

        let mut backwards = rule();
        backwards.until = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(backwards.validate().is_err());

        let mut inverted = rule();
        inverted.end = inverted.start;
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn small_group_capacity() {
        let group: SmallGroup = serde_json::from_value(json!({
            "idGrupoPequeno": 2,
            "nombre": "Jóvenes",
            "participantesActuales": 20
        }))
        .unwrap();
        assert_eq!(group.capacity, DEFAULT_CAPACITY);
        assert!(group.is_full());
        assert_eq!(group.fill_percent(), 100);
    }

    #[test]
    fn login_response_accepts_aliases() {
        let login: LoginResponse = serde_json::from_value(json!({
            "accessToken": "t0k",
            "rol": "LIDER",
            "personaId": 5
        }))
        .unwrap();
        assert_eq!(login.token, "t0k");
        assert_eq!(login.role.as_deref(), Some("LIDER"));
        assert_eq!(login.persona_id, Some(5));
    }

    #[test]
    fn qr_payload_may_be_an_object() {
        let qr: QrCode = serde_json::from_value(json!({
            "qrData": {"eventoId": 7, "lugar": "Aula 3"},
            "qrImageBase64": "data:image/png;base64,AAAA"
        }))
        .unwrap();
        assert_eq!(qr.location(), Some("Aula 3"));
        assert!(qr.payload_text().unwrap().contains("\"eventoId\":7"));

        let plain: QrCode = serde_json::from_value(json!({"token": "abc"})).unwrap();
        assert_eq!(plain.payload_text().as_deref(), Some("abc"));
        assert_eq!(plain.location(), None);
    }
}
