use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode, Screen};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    if !app.is_logged_in() {
        handle_login_input(app, key.code);
        return;
    }

    // Help overlay takes priority
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            app.show_help = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_input(app, key.code),
        InputMode::Search => handle_search_input(app, key.code),
        InputMode::Form => handle_form_input(app, key.code),
        InputMode::Confirm => handle_confirm_input(app, key.code),
        InputMode::Members => handle_members_input(app, key.code),
    }
}

fn handle_login_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.running = false,
        KeyCode::Enter => {
            if app.login.on_password {
                app.submit_login();
            } else {
                app.login.toggle_field();
            }
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.login.toggle_field(),
        KeyCode::Backspace => app.login.backspace(),
        KeyCode::Char(c) => app.login.input_char(c),
        _ => {}
    }
}

fn handle_normal_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        KeyCode::Esc => {
            app.dismiss_banner();
            app.close_qr();
            return;
        }
        KeyCode::Tab => {
            app.next_screen();
            return;
        }
        KeyCode::BackTab => {
            app.prev_screen();
            return;
        }
        KeyCode::Char('r') => {
            app.refresh();
            return;
        }
        KeyCode::Char('L') => {
            app.logout();
            return;
        }
        KeyCode::Char(c @ '0'..='9') => {
            // '0' is the tenth entry
            let index = c.to_digit(10).map_or(0, |d| (d as usize + 9) % 10);
            if let Some(screen) = app.menu().get(index).copied() {
                app.go_to(screen);
            }
            return;
        }
        _ => {}
    }

    match app.screen {
        Screen::Calendar => handle_calendar_input(app, code),
        Screen::Today => match code {
            KeyCode::Down | KeyCode::Char('j') => app.today_view.list.select_next(),
            KeyCode::Up | KeyCode::Char('k') => app.today_view.list.select_prev(),
            KeyCode::Char('g') | KeyCode::Enter => app.generate_qr(),
            _ => {}
        },
        Screen::CheckIn => match code {
            KeyCode::Down | KeyCode::Char('j') => app.check_in.list.select_next(),
            KeyCode::Up | KeyCode::Char('k') => app.check_in.list.select_prev(),
            KeyCode::Enter => app.open_check_in(),
            _ => {}
        },
        Screen::Profile => {
            if matches!(code, KeyCode::Char('e') | KeyCode::Enter) {
                app.open_edit();
            }
        }
        screen if screen.is_list() => handle_list_input(app, code),
        _ => {}
    }
}

fn handle_calendar_input(app: &mut App, code: KeyCode) {
    let calendar = &mut app.calendar;
    match code {
        KeyCode::Left | KeyCode::Char('h') => calendar.move_days(-1),
        KeyCode::Right | KeyCode::Char('l') => calendar.move_days(1),
        KeyCode::Down | KeyCode::Char('j') => calendar.move_days(7),
        KeyCode::Up | KeyCode::Char('k') => calendar.move_days(-7),
        KeyCode::Char('J') => calendar.scroll_down(),
        KeyCode::Char('K') => calendar.scroll_up(),
        KeyCode::Char('[') => calendar.move_months(-1),
        KeyCode::Char(']') => calendar.move_months(1),
        KeyCode::Char('t') => calendar.select(app.today),
        _ => {}
    }
}

fn handle_list_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Char('/') => app.input_mode = InputMode::Search,
        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('F') => app.next_facet(),
        KeyCode::Char('c') => {
            app.clear_search();
            app.clear_filters();
        }
        KeyCode::Char('n') => app.open_create(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('m') => app.open_members(),
        _ => {}
    }
}

fn handle_search_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.clear_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) => app.search_input(c),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => app.form_next(),
        KeyCode::BackTab | KeyCode::Up => app.form_prev(),
        KeyCode::Left => app.form_cycle(false),
        KeyCode::Right => app.form_cycle(true),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) => app.form_input(c),
        _ => {}
    }
}

fn handle_confirm_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('y') => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

fn handle_members_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_members(),
        KeyCode::Tab | KeyCode::BackTab => {
            if let Some(panel) = app.members.as_mut() {
                panel.toggle_focus();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(panel) = app.members.as_mut() {
                panel.select_next();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(panel) = app.members.as_mut() {
                panel.select_prev();
            }
        }
        KeyCode::Char('a') | KeyCode::Enter => app.add_selected_candidate(),
        KeyCode::Char('x') | KeyCode::Delete => app.remove_selected_member(),
        KeyCode::Char('c') => app.members_next_cycle(),
        _ => {}
    }
}
