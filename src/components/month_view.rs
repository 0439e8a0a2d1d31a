use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::{CalendarDay, ColorAssignment};
use crate::theme;

const DAY_NAMES: [&str; 7] = ["Lun", "Mar", "Mié", "Jue", "Vie", "Sáb", "Dom"];

const MONTH_NAMES: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto", "Septiembre",
    "Octubre", "Noviembre", "Diciembre",
];

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

pub struct MonthView;

impl MonthView {
    /// Draws the six-week grid. Each day shows one colored dot per session, up to
    /// what fits, and a `+n` when some are left out.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        grid: &[CalendarDay<'_>],
        selected: NaiveDate,
        today: NaiveDate,
        colors: &ColorAssignment,
    ) {
        let theme = theme::current();
        let block = Block::default()
            .title(format!(
                " {title}: {} {} ",
                month_name(selected.month()),
                selected.year()
            ))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let cell_w = (inner.width / 7).max(4) as usize;

        let header: Vec<Span> = DAY_NAMES
            .iter()
            .map(|d| Span::styled(format!("{d:^cell_w$}"), theme.header))
            .collect();

        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(std::iter::repeat_n(Constraint::Length(1), 6));
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(Line::from(header)), rows[0]);

        for (week_index, week) in grid.chunks(7).enumerate() {
            let cells: Vec<Span> = week
                .iter()
                .flat_map(|day| day_cell(day, cell_w, selected, today, colors))
                .collect();
            if let Some(row) = rows.get(week_index + 1) {
                frame.render_widget(Paragraph::new(Line::from(cells)), *row);
            }
        }
    }
}

fn day_cell(
    day: &CalendarDay<'_>,
    width: usize,
    selected: NaiveDate,
    today: NaiveDate,
    colors: &ColorAssignment,
) -> Vec<Span<'static>> {
    let theme = theme::current();
    let number_style = if day.date == selected {
        theme.selected.add_modifier(Modifier::BOLD)
    } else if day.date == today {
        theme.today
    } else if !day.is_current_month {
        theme.dim
    } else {
        Style::default()
    };

    let number = format!("{:>3}", day.date.day());
    let room = width.saturating_sub(number.len() + 1);
    let mut spans = vec![Span::styled(number, number_style), Span::raw(" ")];

    let shown = if day.sessions.len() > room {
        room.saturating_sub(2)
    } else {
        day.sessions.len()
    };
    for session in day.sessions.iter().take(shown) {
        spans.push(Span::styled(
            "●",
            Style::default().fg(colors.color_for(session.parent_id)),
        ));
    }
    let mut used = shown;
    let hidden = day.sessions.len() - shown;
    if hidden > 0 {
        let more = format!("+{hidden}");
        used += more.chars().count();
        spans.push(Span::styled(more, theme.dim));
    }
    spans.push(Span::raw(" ".repeat(room.saturating_sub(used))));
    spans
}

/// One line per parent event that has sessions this month.
pub fn legend_lines(
    grid: &[CalendarDay<'_>],
    colors: &ColorAssignment,
) -> Vec<Line<'static>> {
    let mut seen: Vec<(Option<i64>, String)> = Vec::new();
    for session in grid
        .iter()
        .filter(|d| d.is_current_month)
        .flat_map(|d| d.sessions.iter())
    {
        if !seen.iter().any(|(id, _)| *id == session.parent_id) {
            let name = session
                .parent_name
                .clone()
                .unwrap_or_else(|| "Sin evento general".to_string());
            seen.push((session.parent_id, name));
        }
    }
    seen.into_iter()
        .map(|(id, name)| {
            Line::from(vec![
                Span::styled("● ", Style::default().fg(colors.color_for(id))),
                Span::raw(name),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{assign_colors, month_grid, Session};
    use serde_json::json;

    #[test]
    fn spanish_month_names() {
        assert_eq!(month_name(1), "Enero");
        assert_eq!(month_name(12), "Diciembre");
        assert_eq!(month_name(13), "?");
    }

    #[test]
    fn legend_lists_each_parent_once() {
        let sessions: Vec<Session> = [(1, 7), (2, 7), (3, 8)]
            .into_iter()
            .map(|(id, parent)| {
                serde_json::from_value(json!({
                    "idEventoEspecifico": id,
                    "nombreSesion": "S",
                    "fecha": "2024-03-05",
                    "eventoGeneralId": parent,
                    "eventoGeneralNombre": format!("Evento {parent}")
                }))
                .unwrap()
            })
            .collect();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let grid = month_grid(date, &sessions);
        let legend = legend_lines(&grid, &assign_colors(&[]));
        assert_eq!(legend.len(), 2);
    }
}
