use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::api::wire;

/// Lifecycle of a single session as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[serde(rename = "PROGRAMADO", alias = "ACTIVO")]
    Scheduled,
    #[serde(rename = "EN_CURSO", alias = "EN_PROCESO")]
    InProgress,
    #[serde(rename = "FINALIZADO")]
    Finished,
    #[serde(rename = "CANCELADO")]
    Cancelled,
}

impl SessionStatus {
    pub const ALL: [SessionStatus; 4] = [
        SessionStatus::Scheduled,
        SessionStatus::InProgress,
        SessionStatus::Finished,
        SessionStatus::Cancelled,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "PROGRAMADO",
            SessionStatus::InProgress => "EN_CURSO",
            SessionStatus::Finished => "FINALIZADO",
            SessionStatus::Cancelled => "CANCELADO",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "Programado",
            SessionStatus::InProgress => "En curso",
            SessionStatus::Finished => "Finalizado",
            SessionStatus::Cancelled => "Cancelado",
        }
    }
}

/// A dated occurrence ("evento específico") belonging to a parent event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "idEventoEspecifico")]
    pub id: i64,
    #[serde(rename = "nombreSesion", default)]
    pub name: String,
    #[serde(rename = "fecha", default, deserialize_with = "wire::date_opt")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "horaInicio", default, deserialize_with = "wire::time_opt")]
    pub start: Option<NaiveTime>,
    #[serde(rename = "horaFin", default, deserialize_with = "wire::time_opt")]
    pub end: Option<NaiveTime>,
    #[serde(rename = "eventoGeneralId", default)]
    pub parent_id: Option<i64>,
    #[serde(rename = "eventoGeneralNombre", default)]
    pub parent_name: Option<String>,
    #[serde(rename = "lugar", default)]
    pub location: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "toleranciaMinutos", default)]
    pub tolerance_minutes: Option<u32>,
    #[serde(rename = "estado", default, deserialize_with = "wire::lenient")]
    pub status: Option<SessionStatus>,
}

impl Session {
    pub fn time_range_display(&self) -> String {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))
            }
            (Some(start), None) => start.format("%H:%M").to_string(),
            _ => "--:--".to_string(),
        }
    }

    /// Tolerance shown to users; the backend applies 15 minutes when unset.
    pub fn tolerance_or_default(&self) -> u32 {
        self.tolerance_minutes.unwrap_or(15)
    }

    pub fn status_or_default(&self) -> SessionStatus {
        self.status.unwrap_or(SessionStatus::Scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_session_with_datetime_date() {
        let session: Session = serde_json::from_value(json!({
            "idEventoEspecifico": 7,
            "nombreSesion": "Clase 1",
            "fecha": "2024-02-15T00:00:00",
            "horaInicio": "09:00:00",
            "horaFin": "10:30",
            "eventoGeneralId": 3,
            "toleranciaMinutos": 10,
            "estado": "FINALIZADO"
        }))
        .unwrap();

        assert_eq!(session.date, NaiveDate::from_ymd_opt(2024, 2, 15));
        assert_eq!(session.time_range_display(), "09:00 - 10:30");
        assert_eq!(session.status, Some(SessionStatus::Finished));
        assert_eq!(session.parent_id, Some(3));
    }

    #[test]
    fn missing_or_unknown_fields_fall_back() {
        let session: Session = serde_json::from_value(json!({
            "idEventoEspecifico": 1,
            "fecha": null,
            "estado": "ARCHIVADO"
        }))
        .unwrap();

        assert!(session.date.is_none());
        assert!(session.status.is_none());
        assert_eq!(session.status_or_default(), SessionStatus::Scheduled);
        assert_eq!(session.tolerance_or_default(), 15);
        assert_eq!(session.time_range_display(), "--:--");
    }

    #[test]
    fn legacy_active_status_reads_as_scheduled() {
        let status: SessionStatus = serde_json::from_value(json!("ACTIVO")).unwrap();
        assert_eq!(status, SessionStatus::Scheduled);
    }
}
