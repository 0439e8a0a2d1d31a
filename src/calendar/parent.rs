use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::wire;

/// Top-level event ("evento general") that owns a date range and groups sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentEvent {
    #[serde(rename = "idEventoGeneral")]
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "lugar", default)]
    pub location: Option<String>,
    #[serde(rename = "fechaInicio", default, deserialize_with = "wire::date_opt")]
    pub starts_on: Option<NaiveDate>,
    #[serde(rename = "fechaFin", default, deserialize_with = "wire::date_opt")]
    pub ends_on: Option<NaiveDate>,
    #[serde(rename = "periodoId", default)]
    pub period_id: Option<i64>,
    #[serde(rename = "periodoNombre", default)]
    pub period_name: Option<String>,
    #[serde(rename = "programaId", default)]
    pub program_id: Option<i64>,
    #[serde(rename = "programaNombre", default)]
    pub program_name: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
}

impl ParentEvent {
    pub fn range_display(&self) -> String {
        let fmt = |d: Option<NaiveDate>| {
            d.map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "?".to_string())
        };
        format!("{} - {}", fmt(self.starts_on), fmt(self.ends_on))
    }
}
