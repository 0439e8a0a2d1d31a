use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState},
    Frame,
};

use crate::app::members::{MembersFocus, MembersPanel};
use crate::theme;

use super::centered;

pub struct MembersView;

impl MembersView {
    pub fn render(frame: &mut Frame, area: Rect, panel: &MembersPanel) {
        let theme = theme::current();
        let popup = centered(area, area.width.saturating_sub(4), area.height.saturating_sub(2));
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" Participantes de {} ", panel.group.name))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).split(inner);

        let capacity = panel.group.capacity.max(1) as f64;
        let ratio = (panel.members.len() as f64 / capacity).min(1.0);
        let gauge_color = if panel.is_full() { Color::Red } else { Color::Green };
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(gauge_color))
                .ratio(ratio)
                .label(panel.capacity_label()),
            rows[0],
        );

        let columns =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[1]);

        let members: Vec<ListItem> = panel
            .members
            .iter()
            .map(|m| {
                person_item(
                    m.full_name.as_deref().unwrap_or("Sin nombre"),
                    m.student_code.as_deref(),
                    m.email.as_deref(),
                )
            })
            .collect();
        let members_title = if panel.loading {
            " Miembros (cargando...) ".to_string()
        } else {
            format!(" Miembros ({}) ", panel.members.len())
        };
        render_list(
            frame,
            columns[0],
            members_title,
            members,
            panel.selected_member,
            panel.focus == MembersFocus::Members,
            "Sin participantes",
        );

        let candidates: Vec<ListItem> = panel
            .candidates
            .iter()
            .map(|c| person_item(&c.full_name, c.student_code.as_deref(), c.email.as_deref()))
            .collect();
        render_list(
            frame,
            columns[1],
            format!(" Disponibles: {} ", panel.cycle_label()),
            candidates,
            panel.selected_candidate,
            panel.focus == MembersFocus::Candidates,
            "No hay participantes disponibles",
        );
    }
}

fn person_item(name: &str, code: Option<&str>, email: Option<&str>) -> ListItem<'static> {
    let dim = theme::current().dim;
    let mut spans = vec![Span::raw(name.to_string())];
    if let Some(code) = code.filter(|c| !c.is_empty()) {
        spans.push(Span::styled(format!(" ({code})"), dim));
    }
    if let Some(email) = email.filter(|e| !e.is_empty()) {
        spans.push(Span::styled(format!(" {email}"), dim));
    }
    ListItem::new(Line::from(spans))
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: String,
    items: Vec<ListItem<'static>>,
    selected: usize,
    focused: bool,
    empty: &'static str,
) {
    let theme = theme::current();
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        theme.border
    };
    let block = Block::default()
        .title(title)
        .title_style(theme.header.add_modifier(if focused { Modifier::UNDERLINED } else { Modifier::empty() }))
        .borders(Borders::ALL)
        .border_style(border);

    if items.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(ratatui::widgets::Paragraph::new(empty).style(theme.dim), inner);
        return;
    }

    let mut state = ListState::default().with_selected(focused.then_some(selected));
    let list = List::new(items)
        .block(block)
        .highlight_style(theme.highlight)
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(list, area, &mut state);
}
