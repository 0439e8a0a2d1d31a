use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::LoginForm;
use crate::theme;

use super::centered;

pub struct LoginView;

impl LoginView {
    pub fn render(frame: &mut Frame, area: Rect, login: &LoginForm) {
        let theme = theme::current();
        let popup = centered(area, 48, 11);

        let block = Block::default()
            .title(" Sistema de Asistencia ")
            .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new("Inicia sesión para continuar").style(theme.dim),
            rows[0],
        );
        render_input(frame, rows[2], "Usuario:", &login.username, !login.on_password);
        let masked = "*".repeat(login.password.chars().count());
        render_input(frame, rows[3], "Contraseña:", &masked, login.on_password);

        let footer = if login.busy {
            Line::from(Span::styled("Iniciando sesión...", theme.dim))
        } else if let Some(error) = &login.error {
            Line::from(Span::styled(error.clone(), theme.error))
        } else {
            Line::from(vec![
                Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(":Campo ", theme.dim),
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(":Ingresar ", theme.dim),
                Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(":Salir", theme.dim),
            ])
        };
        frame.render_widget(Paragraph::new(footer), rows[4]);
    }
}

fn render_input(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };
    let style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let line = Line::from(vec![
        Span::styled(format!("{label:<13}"), theme::current().dim),
        Span::styled(format!("{value}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
