use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::DashboardStats;
use crate::theme;

pub struct DashboardView;

impl DashboardView {
    pub fn render(frame: &mut Frame, area: Rect, stats: Option<&DashboardStats>, username: &str) {
        let theme = theme::current();
        let rows = Layout::vertical([Constraint::Length(2), Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Bienvenido, ", theme.dim),
                Span::styled(username.to_string(), theme.header),
            ])),
            rows[0],
        );

        let cards = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(rows[1]);
        let value = |n: fn(&DashboardStats) -> usize| {
            stats.map_or_else(|| "...".to_string(), |s| n(s).to_string())
        };
        let entries = [
            ("Personas", value(|s| s.people), Color::Cyan),
            ("Matrículas", value(|s| s.enrollments), Color::Green),
            ("Eventos activos", value(|s| s.active_events), Color::Yellow),
            ("Asistencias hoy", value(|s| s.attendance_today), Color::Magenta),
        ];
        for ((label, number, color), card) in entries.into_iter().zip(cards.iter()) {
            let block = Block::default()
                .title(format!(" {label} "))
                .title_style(theme.header)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color));
            frame.render_widget(
                Paragraph::new(Span::styled(
                    number,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center)
                .block(block),
                *card,
            );
        }
    }
}
