use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, InputMode, Screen};
use crate::components::{
    self, dialog, month_view, CheckInView, DashboardView, DayView, FormView, LoginView,
    MembersView, MonthView, ProfileView, RecordTable, StatusBar, TodayView,
};
use crate::theme;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if area.width < 40 || area.height < 12 {
        too_small(frame, area);
        return;
    }

    if !app.is_logged_in() {
        LoginView::render(frame, area, &app.login);
        return;
    }

    let layout = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_menu(frame, layout[0], app);
    render_screen(frame, layout[1], app);

    if let Some(panel) = &app.members {
        MembersView::render(frame, layout[1], panel);
    }
    if let Some(form) = &app.form {
        FormView::render(frame, area, &form.state);
    }
    if let Some(pending) = &app.confirm {
        dialog::render_confirm(frame, area, pending);
    }
    if app.show_help {
        dialog::render_help(frame, area, app.menu());
    }

    StatusBar::render(frame, layout[2], app);
}

fn render_menu(frame: &mut Frame, area: Rect, app: &App) {
    let theme = theme::current();
    let menu = app.menu();
    let titles: Vec<Line> = menu
        .iter()
        .enumerate()
        .map(|(i, s)| Line::from(format!("{} {}", (i + 1) % 10, s.title())))
        .collect();
    let selected = menu.iter().position(|s| *s == app.screen);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(theme.dim)
        .highlight_style(theme.header.add_modifier(Modifier::REVERSED))
        .divider(Span::styled("|", theme.dim));
    frame.render_widget(tabs, area);
}

fn render_screen(frame: &mut Frame, area: Rect, app: &App) {
    let searching = app.input_mode == InputMode::Search;
    match app.screen {
        Screen::Dashboard => {
            let username = app.session.as_ref().map_or("", |s| s.username.as_str());
            DashboardView::render(frame, area, app.dashboard.as_ref(), username);
        }
        Screen::Calendar => render_calendar(frame, area, app),
        Screen::Today => TodayView::render(frame, area, app.today, &app.today_view),
        Screen::CheckIn => CheckInView::render(frame, area, app.today, &app.check_in),
        Screen::Profile => ProfileView::render(frame, area, &app.profile),
        Screen::Periods => RecordTable::render(frame, area, &app.pages.periods, searching),
        Screen::ParentEvents => RecordTable::render(frame, area, &app.pages.parent_events, searching),
        Screen::GeneralGroups => {
            RecordTable::render(frame, area, &app.pages.general_groups, searching)
        }
        Screen::SmallGroups => RecordTable::render(frame, area, &app.pages.small_groups, searching),
        Screen::Sessions => RecordTable::render(frame, area, &app.pages.sessions, searching),
        Screen::Users => RecordTable::render(frame, area, &app.pages.users, searching),
        Screen::Participants => RecordTable::render(frame, area, &app.pages.participants, searching),
    }
}

/// Month grid with the legend under it; the selected day on the right when wide enough.
fn render_calendar(frame: &mut Frame, area: Rect, app: &App) {
    let calendar = &app.calendar;
    let colors = app.colors();
    let grid = calendar.grid();
    let day_sessions = calendar.day_sessions();
    let title = if calendar.loading {
        "Cargando"
    } else {
        calendar.source.title()
    };

    let (month_area, day_area) = if area.width < 80 {
        let parts = Layout::vertical([Constraint::Length(10), Constraint::Min(4)]).split(area);
        (parts[0], parts[1])
    } else {
        let parts = Layout::horizontal([Constraint::Percentage(55), Constraint::Min(30)]).split(area);
        (parts[0], parts[1])
    };

    let legend = month_view::legend_lines(&grid, &colors);
    let month_parts = if legend.is_empty() || area.width < 80 {
        vec![month_area]
    } else {
        Layout::vertical([Constraint::Length(9), Constraint::Min(3)])
            .split(month_area)
            .to_vec()
    };

    MonthView::render(
        frame,
        month_parts[0],
        title,
        &grid,
        calendar.selected,
        app.today,
        &colors,
    );
    if let Some(legend_area) = month_parts.get(1) {
        let block = Block::default()
            .title(" Eventos generales ")
            .title_style(theme::current().header)
            .borders(Borders::ALL)
            .border_style(theme::current().border);
        frame.render_widget(
            Paragraph::new(legend).wrap(Wrap { trim: true }).block(block),
            *legend_area,
        );
    }

    DayView::render(
        frame,
        day_area,
        calendar.selected,
        &day_sessions,
        &colors,
        calendar.day_scroll,
    );
}

fn too_small(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new("La terminal es demasiado pequeña")
            .style(Style::default().add_modifier(Modifier::BOLD)),
        components::centered(area, 32, 1),
    );
}
