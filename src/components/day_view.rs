use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::calendar::{ColorAssignment, Session};
use crate::theme;

use super::month_view::month_name;

const WEEKDAYS: [&str; 7] = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado", "Domingo"];

pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {} de {} de {}",
        WEEKDAYS[date.weekday().num_days_from_monday() as usize],
        date.day(),
        month_name(date.month()).to_lowercase(),
        date.year()
    )
}

pub struct DayView;

impl DayView {
    /// Sessions of `date`; the one at `selected` gets its details below the list.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        sessions: &[&Session],
        colors: &ColorAssignment,
        selected: usize,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 34 {
            format!(" {} ", long_date(date))
        } else {
            format!(" {} ", date.format("%d/%m/%Y"))
        };
        let count = match sessions.len() {
            0 => String::new(),
            1 => " 1 sesión ".to_string(),
            n => format!(" {n} sesiones "),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(count, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if sessions.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("No hay sesiones programadas").style(theme.dim),
                inner,
            );
            return;
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);
        let parts = Layout::vertical([Constraint::Min(3), Constraint::Length(7)]).split(inner);

        let inner_w = inner.width as usize;
        let items: Vec<ListItem> = sessions
            .iter()
            .map(|s| format_session(s, colors, inner_w))
            .collect();
        let mut state = ListState::default().with_selected(Some(selected.min(sessions.len() - 1)));
        let list = List::new(items).highlight_style(theme.highlight);
        frame.render_stateful_widget(list, parts[0], &mut state);

        if let Some(session) = sessions.get(selected) {
            frame.render_widget(
                Paragraph::new(detail_lines(session, colors)).wrap(Wrap { trim: true }),
                parts[1],
            );
        }
    }
}

fn format_session(session: &Session, colors: &ColorAssignment, max_width: usize) -> ListItem<'static> {
    let indicator = Span::styled("  ", Style::default().bg(colors.color_for(session.parent_id)));
    let time = format!(" {} ", session.time_range_display());
    let mut spans = vec![
        indicator,
        Span::styled(time.clone(), Style::default().add_modifier(Modifier::DIM)),
        Span::raw(session.name.clone()),
    ];

    let used = 2 + time.len() + session.name.len();
    if let Some(location) = session.location.as_deref().filter(|l| !l.is_empty()) {
        if used + 3 + location.len() <= max_width {
            spans.push(Span::styled(format!(" @ {location}"), theme::current().dim));
        }
    }
    ListItem::new(Line::from(spans))
}

fn detail_lines(session: &Session, colors: &ColorAssignment) -> Vec<Line<'static>> {
    let dim = theme::current().dim;
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label}: "), dim),
            Span::raw(value),
        ])
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("  ", Style::default().bg(colors.color_for(session.parent_id))),
        Span::styled(
            format!(" {}", session.parent_name.clone().unwrap_or_else(|| "Sin evento general".into())),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ])];
    lines.push(row("Horario", session.time_range_display()));
    lines.push(row("Tolerancia", format!("{} min", session.tolerance_or_default())));
    lines.push(row("Estado", session.status_or_default().label().to_string()));
    if let Some(location) = session.location.as_deref().filter(|l| !l.is_empty()) {
        lines.push(row("Lugar", location.to_string()));
    }
    if let Some(description) = session.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(row("Descripción", description.to_string()));
    }
    lines
}
