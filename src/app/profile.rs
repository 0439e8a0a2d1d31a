use super::form::{Field, FormState};
use super::generation::{Generation, Ticket};
use crate::api::Profile;

/// Default person type when the backend leaves it empty.
const DEFAULT_PERSON_TYPE: &str = "ESTUDIANTE";

#[derive(Debug, Default)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub loading: bool,
    generation: Generation,
}

impl ProfileState {
    pub fn begin_load(&mut self) -> Ticket {
        self.loading = true;
        self.generation.advance()
    }

    pub fn finish_load(&mut self, ticket: Ticket, profile: Profile) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.profile = Some(profile);
        self.loading = false;
        true
    }

    pub fn fail_load(&mut self, ticket: Ticket) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.loading = false;
        true
    }

    pub fn reset(&mut self) {
        self.profile = None;
        self.loading = false;
        self.generation.invalidate();
    }
}

/// Edit form for the caller's own data. Guests do not see the institutional fields.
pub fn profile_form(profile: &Profile) -> FormState {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let guest = profile.is_guest();
    FormState::new("Editar perfil")
        .editing(Some(profile.id))
        .field(
            Field::text("nombreCompleto", "Nombre completo")
                .required()
                .value(profile.full_name.clone()),
        )
        .field(Field::text("documento", "Documento").value(text(&profile.document)))
        .field(Field::text("correo", "Correo").value(text(&profile.email)))
        .field(Field::text("celular", "Celular").value(text(&profile.phone)))
        .field(
            Field::text("correoInstitucional", "Correo institucional")
                .value(text(&profile.institutional_email))
                .hidden(guest),
        )
        .field(
            Field::text("codigoEstudiante", "Código de estudiante")
                .value(text(&profile.student_code))
                .hidden(guest),
        )
        .field(Field::text("pais", "País").value(text(&profile.country)))
        .field(Field::text("religion", "Religión").value(text(&profile.religion)))
        .field(
            Field::date("fechaNacimiento", "Fecha de nacimiento").value(
                profile
                    .birth_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ),
        )
}

/// Applies the form on top of `current`. Hidden fields keep their stored value.
pub fn profile_from_form(form: &FormState, current: &Profile) -> Result<Profile, String> {
    let full_name = form
        .text("nombreCompleto")
        .ok_or_else(|| "Nombre completo es obligatorio".to_string())?;
    let mut profile = Profile {
        full_name,
        document: form.text("documento"),
        email: form.text("correo"),
        phone: form.text("celular"),
        country: form.text("pais"),
        religion: form.text("religion"),
        birth_date: form.date("fechaNacimiento")?,
        person_type: current
            .person_type
            .clone()
            .or_else(|| Some(DEFAULT_PERSON_TYPE.to_string())),
        ..current.clone()
    };
    if !current.is_guest() {
        profile.institutional_email = form.text("correoInstitucional");
        profile.student_code = form.text("codigoEstudiante");
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn profile(person_type: Option<&str>) -> Profile {
        serde_json::from_value(json!({
            "idPersona": 30,
            "nombreCompleto": "Ana Torres",
            "correoInstitucional": "ana@uni.edu",
            "codigoEstudiante": "2020",
            "fechaNacimiento": "2001-03-04T00:00:00",
            "tipoPersona": person_type
        }))
        .unwrap()
    }

    #[test]
    fn guests_keep_institutional_fields() {
        let current = profile(Some("INVITADO"));
        let mut form = profile_form(&current);
        assert!(form
            .visible()
            .all(|(_, f)| f.key != "correoInstitucional" && f.key != "codigoEstudiante"));

        form.set("codigoEstudiante", "9999");
        form.set("celular", "999111222");
        let updated = profile_from_form(&form, &current).unwrap();
        assert_eq!(updated.student_code.as_deref(), Some("2020"));
        assert_eq!(updated.phone.as_deref(), Some("999111222"));
        assert_eq!(updated.person_type.as_deref(), Some("INVITADO"));
    }

    #[test]
    fn students_edit_everything_and_type_defaults() {
        let current = profile(None);
        let mut form = profile_form(&current);
        assert_eq!(form.get("fechaNacimiento"), "2001-03-04");

        form.set("codigoEstudiante", "2021");
        form.set("fechaNacimiento", "2001-03-05");
        let updated = profile_from_form(&form, &current).unwrap();
        assert_eq!(updated.id, 30);
        assert_eq!(updated.student_code.as_deref(), Some("2021"));
        assert_eq!(updated.birth_date, NaiveDate::from_ymd_opt(2001, 3, 5));
        assert_eq!(updated.person_type.as_deref(), Some("ESTUDIANTE"));

        form.set("fechaNacimiento", "ayer");
        assert!(profile_from_form(&form, &current).is_err());
    }

    #[test]
    fn stale_profile_is_dropped() {
        let mut state = ProfileState::default();
        let old = state.begin_load();
        let new = state.begin_load();
        assert!(!state.finish_load(old, profile(None)));
        assert!(state.loading);
        assert!(state.finish_load(new, profile(Some("INVITADO"))));
        assert!(state.profile.as_ref().is_some_and(Profile::is_guest));

        let ticket = state.begin_load();
        state.reset();
        assert!(!state.fail_load(ticket));
        assert!(state.profile.is_none());
    }
}
