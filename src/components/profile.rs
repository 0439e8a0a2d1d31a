use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::api::Profile;
use crate::app::profile::ProfileState;
use crate::theme;

pub struct ProfileView;

impl ProfileView {
    pub fn render(frame: &mut Frame, area: Rect, state: &ProfileState) {
        let theme = theme::current();
        let block = Block::default()
            .title(" Mi perfil ")
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let lines = match &state.profile {
            Some(profile) => profile_lines(profile),
            None if state.loading => vec![Line::styled("Cargando perfil...", theme.dim)],
            None => vec![Line::styled(
                "No se pudo cargar la información del perfil.",
                theme.dim,
            )],
        };
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
            area,
        );
    }
}

fn profile_lines(profile: &Profile) -> Vec<Line<'static>> {
    let theme = theme::current();
    let row = |label: &str, value: Option<String>| {
        Line::from(vec![
            Span::styled(format!("{label:<22}"), theme.dim),
            Span::raw(value.unwrap_or_else(|| "-".to_string())),
        ])
    };

    let mut lines = vec![
        Line::styled(profile.full_name.clone(), theme.header),
        Line::default(),
        row("Documento", profile.document.clone()),
        row("Correo", profile.email.clone()),
        row("Celular", profile.phone.clone()),
    ];
    if !profile.is_guest() {
        lines.push(row("Correo institucional", profile.institutional_email.clone()));
        lines.push(row("Código de estudiante", profile.student_code.clone()));
    }
    lines.extend([
        row("País", profile.country.clone()),
        row("Religión", profile.religion.clone()),
        row(
            "Fecha de nacimiento",
            profile.birth_date.map(|d| d.format("%d/%m/%Y").to_string()),
        ),
        row("Tipo", profile.person_type.clone()),
        Line::default(),
        Line::styled("e: Editar", theme.dim),
    ]);
    lines
}
