use thiserror::Error;

/// Failures surfaced by calls to the attendance backend and by form checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("No se pudo conectar con el servidor")]
    Connect(String),

    #[error("Sesión expirada o no autorizada, vuelva a iniciar sesión")]
    Unauthorized,

    #[error("{}", status_detail(.status, .reason, .message))]
    Status {
        status: u16,
        reason: String,
        message: Option<String>,
    },

    #[error("Respuesta inesperada del servidor: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("Error de configuración: {0}")]
    Config(String),
}

fn status_detail(status: &u16, reason: &str, message: &Option<String>) -> String {
    match message {
        Some(message) if !message.trim().is_empty() => message.clone(),
        _ if reason.is_empty() => format!("Error {status}"),
        _ => format!("Error {status}: {reason}"),
    }
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Prefixes the readable message with the action that failed.
    pub fn banner(&self, action: &str) -> String {
        format!("{action}: {self}")
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Picks the best message out of an error body: `message`, then `mensaje`, then `error`.
    pub fn message_from_body(body: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        ["message", "mensaje", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ApiError::Connect(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                message: None,
            }
        } else {
            ApiError::Connect(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_message_wins() {
        let err = ApiError::Status {
            status: 400,
            reason: "Bad Request".into(),
            message: ApiError::message_from_body(r#"{"message":"El grupo está lleno"}"#),
        };
        assert_eq!(err.to_string(), "El grupo está lleno");
        assert_eq!(
            err.banner("Error al agregar participante"),
            "Error al agregar participante: El grupo está lleno"
        );
    }

    #[test]
    fn mensaje_key_is_understood() {
        let message = ApiError::message_from_body(r#"{"mensaje":"Ya registraste tu asistencia"}"#);
        assert_eq!(message.as_deref(), Some("Ya registraste tu asistencia"));
    }

    #[test]
    fn falls_back_to_status_text() {
        let err = ApiError::Status {
            status: 500,
            reason: "Internal Server Error".into(),
            message: ApiError::message_from_body("<html>boom</html>"),
        };
        assert_eq!(err.to_string(), "Error 500: Internal Server Error");

        let bare = ApiError::Status {
            status: 599,
            reason: String::new(),
            message: Some("  ".into()),
        };
        assert_eq!(bare.to_string(), "Error 599");
    }

    #[test]
    fn connect_has_generic_wording() {
        let err = ApiError::Connect("tcp refused".into());
        assert_eq!(err.to_string(), "No se pudo conectar con el servidor");
    }
}
