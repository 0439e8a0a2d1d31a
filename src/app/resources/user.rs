use reqwest::Method;
use serde_json::{json, Value};

use crate::api::endpoints::USERS;
use crate::api::User;
use crate::app::form::{Choice, Field, FormState};
use crate::app::page::CrudPage;
use crate::app::record::{haystack, or_dash, status_choices, Editable, Lookups, Record, Submission};
use crate::app::Pages;
use crate::session::{AuthSession, Role};

const MEMBER_ROLE: &str = "INTEGRANTE";
const GUEST: &str = "INVITADO";

fn person_types() -> Vec<Choice> {
    vec![Choice::new(GUEST, "Invitado"), Choice::new("ESTUDIANTE", "Estudiante")]
}

/// Used when `/roles` has not loaded.
fn fallback_roles() -> Vec<Choice> {
    [Role::SuperAdmin, Role::Admin, Role::Leader, Role::Member]
        .iter()
        .map(|r| Choice::new(r.wire_name(), r.wire_name()))
        .collect()
}

impl Record for User {
    const TITLE: &'static str = "Usuarios";
    const COLUMNS: &'static [(&'static str, u16)] = &[
        ("Usuario", 14),
        ("Nombre", 24),
        ("Documento", 12),
        ("Correo", 22),
        ("Rol", 12),
        ("Tipo", 10),
        ("Estado", 8),
    ];
    const FACETS: &'static [&'static str] = &["Rol", "Estado"];

    fn list_path(_session: &AuthSession) -> String {
        format!("/{USERS}")
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> String {
        self.username.clone()
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            or_dash(self.full_name.as_deref()),
            or_dash(self.document.as_deref()),
            or_dash(self.email.as_deref()),
            or_dash(self.role.as_deref()),
            or_dash(self.person_type.as_deref()),
            or_dash(self.status.as_deref()),
        ]
    }

    fn search_text(&self) -> String {
        haystack([
            Some(self.username.as_str()),
            self.full_name.as_deref(),
            self.document.as_deref(),
            self.email.as_deref(),
            self.role.as_deref(),
        ])
    }

    fn facet(&self, index: usize) -> Option<String> {
        match index {
            0 => self.role.clone(),
            1 => self.status.clone(),
            _ => None,
        }
    }

    fn delete_path(&self) -> Option<String> {
        Some(format!("/{USERS}/{}", self.id))
    }

    fn check_delete(&self, session: &AuthSession) -> Result<(), String> {
        if session.role != Role::SuperAdmin {
            return Err("Solo un SUPERADMIN puede eliminar usuarios".to_string());
        }
        if session.is_self(&self.username) {
            return Err("No puedes eliminar tu propio usuario".to_string());
        }
        Ok(())
    }

    fn page(pages: &Pages) -> &CrudPage<Self> {
        &pages.users
    }

    fn page_mut(pages: &mut Pages) -> &mut CrudPage<Self> {
        &mut pages.users
    }
}

impl Editable for User {
    fn form(existing: Option<&Self>, lookups: &Lookups) -> FormState {
        let roles = match lookups.role_choices() {
            roles if roles.is_empty() => fallback_roles(),
            roles => roles,
        };
        let role = existing.and_then(|u| u.role.clone()).unwrap_or_default();
        let (title, password) = match existing {
            Some(_) => (
                "Editar usuario",
                Field::secret("clave", "Nueva contraseña (opcional)"),
            ),
            None => ("Nuevo usuario", Field::secret("clave", "Contraseña").required()),
        };

        FormState::new(title)
            .editing(existing.map(|u| u.id))
            .field(
                Field::text("user", "Usuario")
                    .required()
                    .value(existing.map(|u| u.username.clone()).unwrap_or_default()),
            )
            .field(password)
            .field(
                Field::text("nombreCompleto", "Nombre completo")
                    .required()
                    .value(existing.and_then(|u| u.full_name.clone()).unwrap_or_default()),
            )
            .field(
                Field::text("documento", "Documento")
                    .value(existing.and_then(|u| u.document.clone()).unwrap_or_default()),
            )
            .field(
                Field::text("correo", "Correo")
                    .value(existing.and_then(|u| u.email.clone()).unwrap_or_default()),
            )
            .field(Field::choice("nombreRol", "Rol", roles).required().value(role.clone()))
            .field(
                Field::choice("tipoPersona", "Tipo de persona", person_types())
                    .hidden(role != MEMBER_ROLE)
                    .value(
                        existing
                            .and_then(|u| u.person_type.clone())
                            .unwrap_or_else(|| GUEST.to_string()),
                    ),
            )
            .field(
                Field::choice("estado", "Estado", status_choices()).value(
                    existing
                        .and_then(|u| u.status.clone())
                        .unwrap_or_else(|| "ACTIVO".to_string()),
                ),
            )
    }

    fn on_change(form: &mut FormState, key: &str, _lookups: &Lookups) {
        if key == "nombreRol" {
            let is_member = form.get("nombreRol") == MEMBER_ROLE;
            form.set_hidden("tipoPersona", !is_member);
        }
    }

    fn submission(form: &FormState) -> Result<Submission, String> {
        let role = form.get("nombreRol").to_string();
        let person_type = if role == MEMBER_ROLE {
            form.text("tipoPersona").unwrap_or_else(|| GUEST.to_string())
        } else {
            GUEST.to_string()
        };
        let mut body = json!({
            "user": form.get("user").trim(),
            "estado": form.text("estado").unwrap_or_else(|| "ACTIVO".to_string()),
            "nombreCompleto": form.get("nombreCompleto").trim(),
            "documento": form.text("documento"),
            "correo": form.text("correo"),
            "tipoPersona": person_type,
        });
        let password = form.get("clave");

        match form.editing {
            Some(id) => {
                body["nombreRol"] = Value::from(role);
                if !password.is_empty() {
                    body["clave"] = Value::from(password);
                }
                Ok(Submission {
                    method: Method::PUT,
                    path: format!("/{USERS}/{id}"),
                    body,
                    success: "Usuario actualizado exitosamente".to_string(),
                })
            }
            None => {
                if password.is_empty() {
                    return Err("La contraseña es obligatoria".to_string());
                }
                body["rol"] = Value::from(role);
                body["clave"] = Value::from(password);
                Ok(Submission {
                    method: Method::POST,
                    path: format!("/{USERS}/create-with-role"),
                    body,
                    success: "Usuario creado exitosamente".to_string(),
                })
            }
        }
    }
}
