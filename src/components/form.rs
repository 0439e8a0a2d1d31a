use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::form::{Field, FieldKind, FormState};
use crate::theme;

use super::centered;

const LABEL_WIDTH: usize = 22;

pub struct FormView;

impl FormView {
    pub fn render(frame: &mut Frame, area: Rect, state: &FormState) {
        let theme = theme::current();
        let visible: Vec<(usize, &Field)> = state.visible().collect();

        let form_h = (visible.len() as u16 + 6).min(area.height);
        let form_area = centered(area, 72, form_h);
        frame.render_widget(Clear, form_area);

        let block = Block::default()
            .title(format!(" {} ", state.title))
            .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(visible.len() as u16),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

        let fields = Layout::vertical(vec![Constraint::Length(1); visible.len()]).split(rows[0]);
        for ((index, field), row) in visible.iter().zip(fields.iter()) {
            render_field(frame, *row, field, *index == state.active);
        }

        let footer = if state.submitting {
            Line::from(Span::styled("Guardando...", theme.dim))
        } else if let Some(error) = &state.error {
            Line::from(Span::styled(error.clone(), theme.error))
        } else {
            help_line(state.active_field())
        };
        frame.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), rows[2]);
    }
}

fn help_line(active: Option<&Field>) -> Line<'static> {
    let dim = theme::current().dim;
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled("Tab", bold),
        Span::styled(":Siguiente ", dim),
        Span::styled("Enter", bold),
        Span::styled(":Guardar ", dim),
        Span::styled("Esc", bold),
        Span::styled(":Cancelar ", dim),
    ];
    match active.map(|f| &f.kind) {
        Some(FieldKind::Choice(_)) => {
            spans.push(Span::styled("←/→", bold));
            spans.push(Span::styled(":Elegir", dim));
        }
        Some(FieldKind::Toggle) => {
            spans.push(Span::styled("Espacio", bold));
            spans.push(Span::styled(":Marcar", dim));
        }
        Some(FieldKind::Weekdays) => {
            spans.push(Span::styled("0-6", bold));
            spans.push(Span::styled(":Dom..Sáb", dim));
        }
        Some(FieldKind::Date) => spans.push(Span::styled("AAAA-MM-DD", dim)),
        Some(FieldKind::Time) => spans.push(Span::styled("HH:MM", dim)),
        _ => {}
    }
    Line::from(spans)
}

fn render_field(frame: &mut Frame, area: Rect, field: &Field, active: bool) {
    let theme = theme::current();
    let marker = if field.required { "*" } else { "" };
    let label = format!("{}{marker}:", field.label);
    let cursor = match (&field.kind, active) {
        (FieldKind::Toggle | FieldKind::Choice(_) | FieldKind::Weekdays, _) | (_, false) => "",
        _ => "_",
    };
    let style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let spans = vec![
        Span::styled(format!("{label:<LABEL_WIDTH$}"), theme.dim),
        Span::styled(format!("{}{cursor}", field.display()), style),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
