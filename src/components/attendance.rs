use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::attendance::{CheckInState, QrView, SessionList, TodayState};
use crate::theme;

use super::day_view::long_date;

pub struct TodayView;

impl TodayView {
    /// Leader's sessions for today, with the generated QR on the right.
    pub fn render(frame: &mut Frame, area: Rect, today: chrono::NaiveDate, state: &TodayState) {
        let columns =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);
        render_sessions(
            frame,
            columns[0],
            &format!(" Sesiones de hoy: {} ", long_date(today)),
            &state.list,
            |_| None,
        );
        render_qr(frame, columns[1], state.qr.as_ref());
    }
}

pub struct CheckInView;

impl CheckInView {
    pub fn render(frame: &mut Frame, area: Rect, today: chrono::NaiveDate, state: &CheckInState) {
        render_sessions(
            frame,
            area,
            &format!(" Mis sesiones de hoy: {} ", long_date(today)),
            &state.list,
            |id| state.is_registered(id).then_some("✔ registrada"),
        );
    }
}

fn render_sessions(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    list: &SessionList,
    mark: impl Fn(i64) -> Option<&'static str>,
) {
    let theme = theme::current();
    let block = Block::default()
        .title(title.to_string())
        .title_style(theme.header)
        .borders(Borders::ALL)
        .border_style(theme.border);

    if list.sessions.is_empty() {
        let message = if list.loading {
            "Cargando..."
        } else {
            "No tienes sesiones programadas para hoy"
        };
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(message).style(theme.dim), inner);
        return;
    }

    let items: Vec<ListItem> = list
        .sessions
        .iter()
        .map(|s| {
            let mut spans = vec![
                Span::styled(
                    format!("{} ", s.time_range_display()),
                    Style::default().add_modifier(Modifier::DIM),
                ),
                Span::raw(s.name.clone()),
            ];
            if let Some(location) = s.location.as_deref().filter(|l| !l.is_empty()) {
                spans.push(Span::styled(format!(" @ {location}"), theme.dim));
            }
            if let Some(text) = mark(s.id) {
                spans.push(Span::styled(format!("  {text}"), Style::default().fg(Color::Green)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(list.selected));
    let widget = List::new(items)
        .block(block)
        .highlight_style(theme.highlight)
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(widget, area, &mut state);
}

fn render_qr(frame: &mut Frame, area: Rect, qr: Option<&QrView>) {
    let theme = theme::current();
    let block = Block::default()
        .title(" Código QR ")
        .title_style(theme.header)
        .borders(Borders::ALL)
        .border_style(theme.border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(view) = qr else {
        frame.render_widget(
            Paragraph::new("Selecciona una sesión y pulsa g para generar su código QR")
                .style(theme.dim)
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            view.session_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    match &view.code {
        None => lines.push(Line::from(Span::styled("Generando código...", theme.dim))),
        Some(code) => {
            if let Some(location) = code.location() {
                lines.push(Line::from(vec![
                    Span::styled("Lugar: ", theme.dim),
                    Span::raw(location.to_string()),
                ]));
            }
            if let Some(expires) = &code.expires_at {
                lines.push(Line::from(vec![
                    Span::styled("Expira: ", theme.dim),
                    Span::raw(expires.clone()),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Código:", theme.dim)));
            lines.push(Line::from(Span::styled(
                code.payload_text().unwrap_or_else(|| "(sin datos)".to_string()),
                Style::default().fg(Color::Cyan),
            )));
            if code.image_base64.is_some() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "La imagen del código está disponible en la aplicación web",
                    theme.dim,
                )));
            }
        }
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
