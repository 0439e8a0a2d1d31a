pub mod attendance;
pub mod calendar;
pub mod form;
pub mod generation;
pub mod members;
pub mod page;
pub mod profile;
pub mod record;
mod resources;
pub mod tasks;

use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::endpoints::PARENT_EVENTS;
use crate::api::{
    ApiClient, Candidate, DashboardStats, GeneralGroup, Participant, Period, Profile, SmallGroup,
    User,
};
use crate::calendar::{assign_colors, ColorAssignment, ParentEvent, Session};
use crate::error::{ApiError, ApiResult};
use crate::session::{AuthSession, Role, SessionStore};

use attendance::{check_in_form, check_in_from_form, CheckInState, TodayState};
use calendar::{CalendarSource, CalendarState};
use form::FormState;
use generation::{Generation, Ticket};
use members::MembersPanel;
use page::{Banner, CrudPage};
use profile::{profile_form, profile_from_form, ProfileState};
use record::{leader_choices, Editable, Lookups, Record};
use tasks::Tasks;

/// Runs `$body` with `$r` bound to the record type listed on `$screen`.
macro_rules! for_record {
    ($screen:expr, |$r:ident| $body:expr, $otherwise:expr) => {
        match $screen {
            Screen::Periods => {
                type $r = Period;
                $body
            }
            Screen::ParentEvents => {
                type $r = ParentEvent;
                $body
            }
            Screen::GeneralGroups => {
                type $r = GeneralGroup;
                $body
            }
            Screen::SmallGroups => {
                type $r = SmallGroup;
                $body
            }
            Screen::Sessions => {
                type $r = Session;
                $body
            }
            Screen::Users => {
                type $r = User;
                $body
            }
            Screen::Participants => {
                type $r = Participant;
                $body
            }
            _ => $otherwise,
        }
    };
}

/// Like `for_record!`, restricted to pages with a create/edit form.
macro_rules! for_editable {
    ($screen:expr, |$r:ident| $body:expr, $otherwise:expr) => {
        match $screen {
            Screen::Periods => {
                type $r = Period;
                $body
            }
            Screen::ParentEvents => {
                type $r = ParentEvent;
                $body
            }
            Screen::GeneralGroups => {
                type $r = GeneralGroup;
                $body
            }
            Screen::SmallGroups => {
                type $r = SmallGroup;
                $body
            }
            Screen::Sessions => {
                type $r = Session;
                $body
            }
            Screen::Users => {
                type $r = User;
                $body
            }
            _ => $otherwise,
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Calendar,
    Sessions,
    Periods,
    ParentEvents,
    GeneralGroups,
    SmallGroups,
    Users,
    Participants,
    Today,
    CheckIn,
    Profile,
}

const ADMIN_MENU: [Screen; 10] = [
    Screen::Dashboard,
    Screen::Calendar,
    Screen::Sessions,
    Screen::Periods,
    Screen::ParentEvents,
    Screen::GeneralGroups,
    Screen::SmallGroups,
    Screen::Users,
    Screen::Participants,
    Screen::Profile,
];
const LEADER_MENU: [Screen; 4] = [
    Screen::Today,
    Screen::Calendar,
    Screen::SmallGroups,
    Screen::Profile,
];
const MEMBER_MENU: [Screen; 3] = [Screen::Calendar, Screen::CheckIn, Screen::Profile];

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Inicio",
            Screen::Calendar => "Calendario",
            Screen::Sessions => Session::TITLE,
            Screen::Periods => Period::TITLE,
            Screen::ParentEvents => ParentEvent::TITLE,
            Screen::GeneralGroups => GeneralGroup::TITLE,
            Screen::SmallGroups => SmallGroup::TITLE,
            Screen::Users => User::TITLE,
            Screen::Participants => Participant::TITLE,
            Screen::Today => "Sesiones de hoy",
            Screen::CheckIn => "Registrar asistencia",
            Screen::Profile => "Mi perfil",
        }
    }

    /// Screens reachable by `role`, in menu order. The first one is home.
    pub fn menu(role: Role) -> &'static [Screen] {
        match role {
            Role::SuperAdmin | Role::Admin => &ADMIN_MENU,
            Role::Leader => &LEADER_MENU,
            Role::Member => &MEMBER_MENU,
        }
    }

    pub fn home(role: Role) -> Screen {
        Self::menu(role)[0]
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Screen::Periods
                | Screen::ParentEvents
                | Screen::GeneralGroups
                | Screen::SmallGroups
                | Screen::Sessions
                | Screen::Users
                | Screen::Participants
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
    Confirm,
    Members,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Record(Screen),
    CheckIn,
    Profile,
}

pub struct ActiveForm {
    pub target: FormTarget,
    pub state: FormState,
}

pub struct PendingDelete {
    pub screen: Screen,
    pub path: String,
    pub label: String,
}

#[derive(Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub on_password: bool,
    pub error: Option<String>,
    pub busy: bool,
    generation: Generation,
}

impl LoginForm {
    pub fn input_char(&mut self, c: char) {
        if self.on_password {
            self.password.push(c);
        } else {
            self.username.push(c);
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if self.on_password {
            self.password.pop();
        } else {
            self.username.pop();
        }
    }

    pub fn toggle_field(&mut self) {
        self.on_password = !self.on_password;
    }

    /// Clears everything but the username and drops a login still in flight.
    fn reset(&mut self) {
        self.password.clear();
        self.on_password = false;
        self.error = None;
        self.busy = false;
        self.generation.invalidate();
    }
}

/// One list per management page.
#[derive(Default)]
pub struct Pages {
    pub periods: CrudPage<Period>,
    pub parent_events: CrudPage<ParentEvent>,
    pub general_groups: CrudPage<GeneralGroup>,
    pub small_groups: CrudPage<SmallGroup>,
    pub sessions: CrudPage<Session>,
    pub users: CrudPage<User>,
    pub participants: CrudPage<Participant>,
}

impl Pages {
    fn reset(&mut self) {
        self.periods.reset();
        self.parent_events.reset();
        self.general_groups.reset();
        self.small_groups.reset();
        self.sessions.reset();
        self.users.reset();
        self.participants.reset();
    }
}

pub struct App {
    pub running: bool,
    pub today: NaiveDate,
    pub session: Option<Arc<AuthSession>>,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub login: LoginForm,
    pub pages: Pages,
    pub lookups: Lookups,
    pub calendar: CalendarState,
    pub dashboard: Option<DashboardStats>,
    pub today_view: TodayState,
    pub check_in: CheckInState,
    pub profile: ProfileState,
    pub members: Option<MembersPanel>,
    pub form: Option<ActiveForm>,
    pub confirm: Option<PendingDelete>,
    pub banner: Option<Banner>,
    pub show_help: bool,
    dashboard_generation: Generation,
    client: ApiClient,
    api: ApiClient,
    store: Option<SessionStore>,
    tasks: Tasks,
}

impl App {
    /// `client` must not carry a session; a stored one is restored from `store`.
    pub fn new(client: ApiClient, store: Option<SessionStore>, tasks: Tasks) -> Self {
        let today = Local::now().date_naive();
        let restored = store.as_ref().and_then(SessionStore::load);

        let mut app = Self {
            running: true,
            today,
            session: None,
            screen: Screen::Calendar,
            input_mode: InputMode::Normal,
            login: LoginForm::default(),
            pages: Pages::default(),
            lookups: Lookups::default(),
            calendar: CalendarState::new(today, CalendarSource::Mine),
            dashboard: None,
            today_view: TodayState::default(),
            check_in: CheckInState::default(),
            profile: ProfileState::default(),
            members: None,
            form: None,
            confirm: None,
            banner: None,
            show_help: false,
            dashboard_generation: Generation::default(),
            api: client.without_session(),
            client,
            store,
            tasks,
        };

        if let Some(session) = restored {
            info!(user = %session.username, "restoring saved session");
            app.start_session(session);
        }
        app
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.role)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn menu(&self) -> &'static [Screen] {
        self.role().map(Screen::menu).unwrap_or_default()
    }

    /// Parent event colors, recomputed from the current list.
    pub fn colors(&self) -> ColorAssignment {
        assign_colors(&self.lookups.parent_events)
    }

    // ── update loop ──

    /// Applies finished requests and expires the banner. Called once per frame.
    pub fn tick(&mut self, now: Instant) {
        for update in self.tasks.drain() {
            update(self);
        }
        if self.banner.as_ref().is_some_and(|b| b.is_expired_at(now)) {
            self.banner = None;
        }
    }

    /// Waits for the next finished request and applies it.
    pub async fn apply_next(&mut self) -> bool {
        match self.tasks.next().await {
            Some(update) => {
                update(self);
                true
            }
            None => false,
        }
    }

    fn report(&mut self, err: &ApiError, action: &str) {
        if err.is_unauthorized() {
            self.expire_session();
            return;
        }
        warn!(error = %err, action, "request failed");
        self.banner = Some(Banner::error(err.banner(action)));
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    // ── session ──

    pub fn submit_login(&mut self) {
        if self.login.busy {
            return;
        }
        let username = self.login.username.clone();
        let password = self.login.password.clone();
        let ticket = self.login.generation.advance();
        self.login.busy = true;
        self.login.error = None;

        let api = self.client.without_session();
        self.tasks.spawn(
            async move { api.login(&username, &password).await },
            move |app, result| app.apply_login(ticket, result),
        );
    }

    fn apply_login(&mut self, ticket: Ticket, result: ApiResult<AuthSession>) {
        if !self.login.generation.is_current(ticket) {
            return;
        }
        self.login.busy = false;
        match result {
            Ok(session) => {
                if let Some(store) = &self.store {
                    if let Err(err) = store.save(&session) {
                        warn!(error = %err, "could not persist session");
                    }
                }
                self.login.password.clear();
                self.start_session(session);
            }
            Err(ApiError::Unauthorized) => {
                self.login.error = Some("Usuario o contraseña incorrectos".to_string());
            }
            Err(err) => self.login.error = Some(err.to_string()),
        }
    }

    pub fn start_session(&mut self, session: AuthSession) {
        let session = Arc::new(session);
        let role = session.role;
        info!(user = %session.username, role = role.wire_name(), "session started");

        self.api = self.client.with_session(Arc::clone(&session));
        self.session = Some(session);
        self.calendar.reset(self.today, CalendarSource::for_role(role));
        self.screen = Screen::home(role);
        self.input_mode = InputMode::Normal;
        self.load_lookups();
        self.refresh();
    }

    pub fn logout(&mut self) {
        if let Some(store) = &self.store {
            store.clear();
        }
        self.end_session();
        info!("logged out");
    }

    fn expire_session(&mut self) {
        self.logout();
        self.login.error = Some(ApiError::Unauthorized.to_string());
    }

    fn end_session(&mut self) {
        self.session = None;
        self.api = self.client.without_session();
        self.pages.reset();
        self.lookups.clear();
        self.calendar.reset(self.today, CalendarSource::Mine);
        self.dashboard = None;
        self.dashboard_generation.invalidate();
        self.today_view.reset();
        self.check_in.reset();
        self.profile.reset();
        self.members = None;
        self.form = None;
        self.confirm = None;
        self.banner = None;
        self.input_mode = InputMode::Normal;
        self.login.reset();
    }

    // ── navigation ──

    pub fn go_to(&mut self, screen: Screen) {
        if !self.menu().contains(&screen) || screen == self.screen {
            return;
        }
        self.leave_screen();
        self.screen = screen;
        self.refresh();
    }

    pub fn next_screen(&mut self) {
        self.step_screen(1);
    }

    pub fn prev_screen(&mut self) {
        let len = self.menu().len();
        self.step_screen(len.saturating_sub(1));
    }

    fn step_screen(&mut self, by: usize) {
        let menu = self.menu();
        if menu.is_empty() {
            return;
        }
        let current = menu.iter().position(|s| *s == self.screen).unwrap_or(0);
        self.go_to(menu[(current + by) % menu.len()]);
    }

    /// Drops requests that belong to the screen being left.
    fn leave_screen(&mut self) {
        self.banner = None;
        self.members = None;
        self.input_mode = InputMode::Normal;
        match self.screen {
            Screen::Dashboard => self.dashboard_generation.invalidate(),
            Screen::Today => self.today_view.close_qr(),
            _ => {}
        }
    }

    pub fn refresh(&mut self) {
        self.load_screen(self.screen);
    }

    fn load_screen(&mut self, screen: Screen) {
        if self.session.is_none() {
            return;
        }
        match screen {
            Screen::Dashboard => self.load_dashboard(),
            Screen::Calendar => self.load_calendar(),
            Screen::Today => self.load_today(),
            Screen::CheckIn => self.load_check_in(),
            Screen::Profile => self.load_profile(),
            other => for_record!(other, |R| self.load_page::<R>(), ()),
        }
    }

    // ── lists ──

    pub fn load_page<R: Record>(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let ticket = R::page_mut(&mut self.pages).begin_load();
        let path = R::list_path(&session);
        let api = self.api.clone();
        debug!(path = %path, "loading list");
        self.tasks.spawn(
            async move {
                api.get::<Option<Vec<R>>>(&path)
                    .await
                    .map(Option::unwrap_or_default)
            },
            move |app, result| app.apply_page::<R>(ticket, result),
        );
    }

    fn apply_page<R: Record>(&mut self, ticket: Ticket, result: ApiResult<Vec<R>>) {
        match result {
            Ok(items) => {
                if R::page_mut(&mut self.pages).finish_load(ticket, items) {
                    R::share(&R::page(&self.pages).items, &mut self.lookups);
                }
            }
            Err(err) => {
                if R::page_mut(&mut self.pages).fail_load(ticket) {
                    self.report(&err, &format!("Error al cargar {}", R::TITLE.to_lowercase()));
                }
            }
        }
    }

    /// Reference data the admin forms pick from.
    fn load_lookups(&mut self) {
        if !self.role().is_some_and(|r| r.is_admin()) {
            return;
        }
        self.load_page::<ParentEvent>();
        self.load_page::<Period>();
        self.load_page::<GeneralGroup>();

        let ticket = self.lookups.ticket();
        let api = self.api.clone();
        self.tasks.spawn(async move { api.programs().await }, move |app, result| {
            if !app.lookups.accepts(ticket) {
                return;
            }
            match result {
                Ok(programs) => app.lookups.programs = programs,
                Err(err) => warn!(error = %err, "programs unavailable"),
            }
        });
        let api = self.api.clone();
        self.tasks.spawn(async move { api.roles().await }, move |app, result| {
            if !app.lookups.accepts(ticket) {
                return;
            }
            match result {
                Ok(roles) => app.lookups.roles = roles,
                Err(err) => warn!(error = %err, "roles unavailable"),
            }
        });
        self.load_leaders(None);
    }

    /// Leaders free to take a group; `keep` is the group being edited.
    fn load_leaders(&mut self, keep: Option<i64>) {
        let ticket = self.lookups.ticket();
        let api = self.api.clone();
        self.tasks.spawn(
            async move { api.available_leaders(keep).await },
            move |app, result| {
                if !app.lookups.accepts(ticket) {
                    return;
                }
                match result {
                    Ok(leaders) => app.apply_leaders(keep, leaders),
                    Err(err) => warn!(error = %err, "available leaders unavailable"),
                }
            },
        );
    }

    fn apply_leaders(&mut self, keep: Option<i64>, leaders: Vec<Candidate>) {
        if let Some(active) = self.form.as_mut() {
            let editing_this = active.target == FormTarget::Record(Screen::SmallGroups)
                && active.state.editing == keep;
            if editing_this {
                let current = active.state.get("liderId").to_string();
                let mut choices = leader_choices(&leaders);
                if !current.is_empty() && !choices.iter().any(|c| c.value == current) {
                    if let Some(form::FieldKind::Choice(old)) = active
                        .state
                        .fields
                        .iter()
                        .find(|f| f.key == "liderId")
                        .map(|f| &f.kind)
                    {
                        choices.extend(old.iter().filter(|c| c.value == current).cloned());
                    }
                }
                active.state.set_choices("liderId", choices);
            }
        }
        if keep.is_none() {
            self.lookups.leaders = leaders;
        }
    }

    pub fn select_next(&mut self) {
        for_record!(self.screen, |R| R::page_mut(&mut self.pages).select_next(), ())
    }

    pub fn select_prev(&mut self) {
        for_record!(self.screen, |R| R::page_mut(&mut self.pages).select_prev(), ())
    }

    pub fn search_input(&mut self, c: char) {
        for_record!(self.screen, |R| R::page_mut(&mut self.pages).push_search(c), ())
    }

    pub fn search_backspace(&mut self) {
        for_record!(self.screen, |R| R::page_mut(&mut self.pages).pop_search(), ())
    }

    pub fn clear_search(&mut self) {
        for_record!(self.screen, |R| R::page_mut(&mut self.pages).clear_search(), ())
    }

    pub fn cycle_filter(&mut self) {
        for_record!(self.screen, |R| R::page_mut(&mut self.pages).cycle_filter(), ())
    }

    pub fn next_facet(&mut self) {
        for_record!(self.screen, |R| R::page_mut(&mut self.pages).next_facet(), ())
    }

    pub fn clear_filters(&mut self) {
        for_record!(self.screen, |R| R::page_mut(&mut self.pages).clear_filters(), ())
    }

    // ── create / edit ──

    pub fn open_create(&mut self) {
        for_editable!(self.screen, |R| self.open_form::<R>(false), ())
    }

    pub fn open_edit(&mut self) {
        if self.screen == Screen::Profile {
            self.open_profile_form();
            return;
        }
        for_editable!(self.screen, |R| self.open_form::<R>(true), ())
    }

    fn open_form<R: Editable>(&mut self, edit: bool) {
        let Some(session) = self.session.clone() else {
            return;
        };
        if !R::can_edit(&session) {
            self.banner = Some(Banner::error(format!(
                "No tienes permisos para modificar {}",
                R::TITLE.to_lowercase()
            )));
            return;
        }
        let existing = if edit {
            match R::page(&self.pages).selected_item() {
                Some(item) => Some(item.clone()),
                None => return,
            }
        } else {
            None
        };
        let state = R::form(existing.as_ref(), &self.lookups);
        let editing = state.editing;
        self.form = Some(ActiveForm {
            target: FormTarget::Record(self.screen),
            state,
        });
        self.input_mode = InputMode::Form;
        if self.screen == Screen::SmallGroups {
            self.load_leaders(editing);
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.input_mode = if self.members.is_some() {
            InputMode::Members
        } else {
            InputMode::Normal
        };
    }

    pub fn form_input(&mut self, c: char) {
        let changed = self.form.as_mut().and_then(|f| f.state.input_char(c));
        self.after_form_change(changed);
    }

    pub fn form_backspace(&mut self) {
        let changed = self.form.as_mut().and_then(|f| f.state.backspace());
        self.after_form_change(changed);
    }

    pub fn form_cycle(&mut self, forward: bool) {
        let changed = self.form.as_mut().and_then(|f| f.state.cycle(forward));
        self.after_form_change(changed);
    }

    pub fn form_next(&mut self) {
        if let Some(active) = self.form.as_mut() {
            active.state.next();
        }
    }

    pub fn form_prev(&mut self) {
        if let Some(active) = self.form.as_mut() {
            active.state.prev();
        }
    }

    fn after_form_change(&mut self, changed: Option<&'static str>) {
        let (Some(key), Some(active)) = (changed, self.form.as_mut()) else {
            return;
        };
        active.state.error = None;
        if let FormTarget::Record(screen) = active.target {
            for_editable!(
                screen,
                |R| R::on_change(&mut active.state, key, &self.lookups),
                ()
            )
        }
    }

    pub fn submit_form(&mut self) {
        let Some(target) = self.form.as_ref().map(|f| f.target) else {
            return;
        };
        match target {
            FormTarget::Record(screen) => for_editable!(screen, |R| self.submit_record::<R>(), ()),
            FormTarget::CheckIn => self.submit_check_in(),
            FormTarget::Profile => self.submit_profile(),
        }
    }

    fn submit_record<R: Editable>(&mut self) {
        let Some(active) = self.form.as_mut() else {
            return;
        };
        if active.state.submitting {
            return;
        }
        if let Some(label) = active.state.missing_required() {
            active.state.error = Some(format!("{label} es obligatorio"));
            return;
        }
        let submission = match R::submission(&active.state) {
            Ok(submission) => submission,
            Err(message) => {
                active.state.error = Some(message);
                return;
            }
        };
        active.state.submitting = true;
        active.state.error = None;
        let action = if active.state.is_edit() {
            "Error al actualizar"
        } else {
            "Error al guardar"
        };

        let api = self.api.clone();
        debug!(method = %submission.method, path = %submission.path, "submitting form");
        self.tasks.spawn(
            async move {
                api.send_json::<_, Option<Value>>(
                    submission.method.clone(),
                    &submission.path,
                    &submission.body,
                )
                .await
                .map(|_| submission.success)
            },
            move |app, result| app.apply_submit::<R>(result, action),
        );
    }

    fn apply_submit<R: Editable>(&mut self, result: ApiResult<String>, action: &str) {
        match result {
            Ok(success) => {
                info!(page = R::TITLE, "saved");
                self.close_form();
                self.banner = Some(Banner::success(success));
                self.load_page::<R>();
            }
            Err(err) if err.is_unauthorized() => self.expire_session(),
            Err(err) => {
                warn!(error = %err, page = R::TITLE, "save failed");
                match self.form.as_mut() {
                    Some(active) => {
                        active.state.submitting = false;
                        active.state.error = Some(err.banner(action));
                    }
                    None => self.banner = Some(Banner::error(err.banner(action))),
                }
            }
        }
    }

    // ── delete ──

    pub fn request_delete(&mut self) {
        for_record!(self.screen, |R| self.request_delete_of::<R>(), ())
    }

    fn request_delete_of<R: Record>(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let Some(item) = R::page(&self.pages).selected_item() else {
            return;
        };
        let Some(path) = item.delete_path() else {
            self.banner = Some(Banner::error("Este listado es de solo lectura"));
            return;
        };
        if let Err(message) = item.check_delete(&session) {
            self.banner = Some(Banner::error(message));
            return;
        }
        self.confirm = Some(PendingDelete {
            screen: self.screen,
            path,
            label: item.label(),
        });
        self.input_mode = InputMode::Confirm;
    }

    pub fn cancel_delete(&mut self) {
        self.confirm = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn confirm_delete(&mut self) {
        let Some(pending) = self.confirm.take() else {
            return;
        };
        self.input_mode = InputMode::Normal;
        let api = self.api.clone();
        let screen = pending.screen;
        self.tasks.spawn(
            async move { api.delete(&pending.path).await.map(|_| pending.label) },
            move |app, result| match result {
                Ok(label) => {
                    info!(label = %label, "deleted");
                    app.banner = Some(Banner::success(format!("\"{label}\" eliminado exitosamente")));
                    if app.screen == screen {
                        app.load_screen(screen);
                    }
                }
                Err(err) => app.report(&err, "Error al eliminar"),
            },
        );
    }

    // ── dashboard ──

    fn load_dashboard(&mut self) {
        let ticket = self.dashboard_generation.advance();
        let api = self.api.clone();
        let today = self.today;
        self.tasks.spawn(
            async move { api.dashboard_stats(today).await },
            move |app, stats| {
                if app.dashboard_generation.is_current(ticket) {
                    app.dashboard = Some(stats);
                }
            },
        );
    }

    // ── calendar ──

    fn load_calendar(&mut self) {
        let ticket = self.calendar.begin_load();
        let path = self.calendar.source.path();
        let api = self.api.clone();
        self.tasks.spawn(
            async move {
                api.get::<Option<Vec<Session>>>(&path)
                    .await
                    .map(Option::unwrap_or_default)
            },
            move |app, result| match result {
                Ok(sessions) => {
                    app.calendar.finish_load(ticket, sessions);
                }
                Err(err) => {
                    if app.calendar.fail_load(ticket) {
                        app.report(&err, "Error al cargar el calendario");
                    }
                }
            },
        );

        if self.lookups.parent_events.is_empty() {
            // Colors only; members may not be allowed to list parent events.
            let ticket = self.lookups.ticket();
            let api = self.api.clone();
            let path = format!("/{PARENT_EVENTS}");
            self.tasks.spawn(
                async move {
                    api.get::<Option<Vec<ParentEvent>>>(&path)
                        .await
                        .map(Option::unwrap_or_default)
                },
                move |app, result| {
                    if !app.lookups.accepts(ticket) {
                        return;
                    }
                    match result {
                        Ok(events) => app.lookups.parent_events = events,
                        Err(err) => {
                            warn!(error = %err, "parent events unavailable, using fallback colors")
                        }
                    }
                },
            );
        }
    }

    // ── leader: today's sessions and QR ──

    fn load_today(&mut self) {
        let ticket = self.today_view.list.begin_load();
        let api = self.api.clone();
        let today = self.today;
        self.tasks.spawn(
            async move { api.sessions_on(today).await },
            move |app, result| match result {
                Ok(sessions) => {
                    app.today_view.list.finish_load(ticket, sessions, today);
                }
                Err(err) => {
                    if app.today_view.list.fail_load(ticket) {
                        app.report(&err, "Error al cargar las sesiones de hoy");
                    }
                }
            },
        );
    }

    pub fn generate_qr(&mut self) {
        let Some(session) = self.today_view.list.selected_session().cloned() else {
            return;
        };
        let Some(leader_id) = self.session.as_ref().and_then(|s| s.persona_id) else {
            self.banner = Some(Banner::error(
                "No se pudo identificar tu ID de líder. Vuelve a iniciar sesión.",
            ));
            return;
        };
        let ticket = self.today_view.begin_qr(&session);
        let api = self.api.clone();
        self.tasks.spawn(
            async move { api.generate_qr(session.id, leader_id).await },
            move |app, result| match result {
                Ok(code) => {
                    app.today_view.finish_qr(ticket, code);
                }
                Err(err) => {
                    if app.today_view.fail_qr(ticket) {
                        app.report(&err, "No se pudo generar el QR");
                    }
                }
            },
        );
    }

    pub fn close_qr(&mut self) {
        self.today_view.close_qr();
    }

    // ── member: check-in ──

    fn load_check_in(&mut self) {
        let ticket = self.check_in.list.begin_load();
        let api = self.api.clone();
        let today = self.today;
        self.tasks.spawn(
            async move { api.my_sessions().await },
            move |app, result| match result {
                Ok(sessions) => {
                    app.check_in.list.finish_load(ticket, sessions, today);
                }
                Err(err) => {
                    if app.check_in.list.fail_load(ticket) {
                        app.report(&err, "Error al cargar tus sesiones");
                    }
                }
            },
        );
    }

    pub fn open_check_in(&mut self) {
        let Some(session) = self.check_in.list.selected_session() else {
            return;
        };
        if self.check_in.is_registered(session.id) {
            self.banner = Some(Banner::error("Ya registraste tu asistencia en esta sesión"));
            return;
        }
        self.form = Some(ActiveForm {
            target: FormTarget::CheckIn,
            state: check_in_form(session),
        });
        self.input_mode = InputMode::Form;
    }

    fn submit_check_in(&mut self) {
        let persona_id = self.session.as_ref().and_then(|s| s.persona_id);
        let Some(active) = self.form.as_mut() else {
            return;
        };
        if active.state.submitting {
            return;
        }
        let Some(persona_id) = persona_id else {
            active.state.error = Some("No se pudo identificar tu usuario. Vuelve a iniciar sesión.".to_string());
            return;
        };
        let check_in = match check_in_from_form(&active.state, persona_id) {
            Ok(check_in) => check_in,
            Err(message) => {
                active.state.error = Some(message);
                return;
            }
        };
        active.state.submitting = true;

        let api = self.api.clone();
        let session_id = check_in.session_id;
        self.tasks.spawn(
            async move { api.register_attendance(&check_in).await },
            move |app, result| match result {
                Ok(()) => {
                    app.check_in.registered.insert(session_id);
                    app.close_form();
                    app.banner = Some(Banner::success("Asistencia registrada exitosamente"));
                }
                Err(err) if err.is_unauthorized() => app.expire_session(),
                Err(err) => match app.form.as_mut() {
                    Some(active) => {
                        active.state.submitting = false;
                        active.state.error = Some(err.banner("Error al registrar la asistencia"));
                    }
                    None => app.report(&err, "Error al registrar la asistencia"),
                },
            },
        );
    }

    // ── own profile ──

    fn load_profile(&mut self) {
        let ticket = self.profile.begin_load();
        let api = self.api.clone();
        self.tasks.spawn(
            async move { api.my_profile().await },
            move |app, result| match result {
                Ok(profile) => {
                    app.profile.finish_load(ticket, profile);
                }
                Err(err) => {
                    if app.profile.fail_load(ticket) {
                        app.report(&err, "Error al cargar el perfil");
                    }
                }
            },
        );
    }

    fn open_profile_form(&mut self) {
        let Some(profile) = self.profile.profile.as_ref() else {
            return;
        };
        self.form = Some(ActiveForm {
            target: FormTarget::Profile,
            state: profile_form(profile),
        });
        self.input_mode = InputMode::Form;
    }

    fn submit_profile(&mut self) {
        let Some(current) = self.profile.profile.as_ref() else {
            return;
        };
        let Some(active) = self.form.as_mut() else {
            return;
        };
        if active.state.submitting {
            return;
        }
        if let Some(label) = active.state.missing_required() {
            active.state.error = Some(format!("{label} es obligatorio"));
            return;
        }
        let updated = match profile_from_form(&active.state, current) {
            Ok(profile) => profile,
            Err(message) => {
                active.state.error = Some(message);
                return;
            }
        };
        active.state.submitting = true;
        active.state.error = None;

        let api = self.api.clone();
        self.tasks.spawn(
            async move {
                let stored = api.update_profile(&updated).await?;
                Ok::<Profile, ApiError>(stored.unwrap_or(updated))
            },
            move |app, result| match result {
                Ok(profile) => {
                    info!(persona = profile.id, "profile updated");
                    app.profile.profile = Some(profile);
                    app.close_form();
                    app.banner = Some(Banner::success("Perfil actualizado exitosamente"));
                }
                Err(err) if err.is_unauthorized() => app.expire_session(),
                Err(err) => match app.form.as_mut() {
                    Some(active) => {
                        active.state.submitting = false;
                        active.state.error = Some(err.banner("Error al actualizar el perfil"));
                    }
                    None => app.report(&err, "Error al actualizar el perfil"),
                },
            },
        );
    }

    // ── small group members ──

    pub fn open_members(&mut self) {
        if self.screen != Screen::SmallGroups {
            return;
        }
        let Some(group) = self.pages.small_groups.selected_item().cloned() else {
            return;
        };
        self.members = Some(MembersPanel::new(group));
        self.input_mode = InputMode::Members;
        self.load_members();
        self.load_candidates();
    }

    pub fn close_members(&mut self) {
        self.members = None;
        self.input_mode = InputMode::Normal;
        self.load_page::<SmallGroup>();
    }

    fn load_members(&mut self) {
        let Some(panel) = self.members.as_mut() else {
            return;
        };
        let ticket = panel.begin_members_load();
        let group_id = panel.group.id;
        let api = self.api.clone();
        self.tasks.spawn(
            async move { api.group_members(group_id).await },
            move |app, result| {
                let Some(panel) = app.members.as_mut().filter(|p| p.group.id == group_id) else {
                    return;
                };
                match result {
                    Ok(members) => {
                        panel.finish_members(ticket, members);
                    }
                    Err(err) => {
                        if panel.fail_members(ticket) {
                            app.report(&err, "Error al cargar los participantes");
                        }
                    }
                }
            },
        );
    }

    fn load_candidates(&mut self) {
        let Some(panel) = self.members.as_mut() else {
            return;
        };
        let Some(general_group_id) = panel.group.general_group_id else {
            panel.candidates.clear();
            return;
        };
        let ticket = panel.begin_candidates_load();
        let group_id = panel.group.id;
        let cycle = panel.cycle;
        let api = self.api.clone();
        self.tasks.spawn(
            async move { api.available_candidates(general_group_id, cycle).await },
            move |app, result| {
                let Some(panel) = app.members.as_mut().filter(|p| p.group.id == group_id) else {
                    return;
                };
                match result {
                    Ok(candidates) => {
                        panel.finish_candidates(ticket, candidates);
                    }
                    Err(err) => {
                        if panel.fail_candidates(ticket) {
                            app.report(&err, "Error al cargar participantes disponibles");
                        }
                    }
                }
            },
        );
    }

    pub fn members_next_cycle(&mut self) {
        if let Some(panel) = self.members.as_mut() {
            panel.next_cycle();
        }
        self.load_candidates();
    }

    pub fn add_selected_candidate(&mut self) {
        let Some(panel) = self.members.as_ref() else {
            return;
        };
        let candidate = match panel.candidate_to_add() {
            Ok(candidate) => candidate.clone(),
            Err(message) => {
                self.banner = Some(Banner::error(message));
                return;
            }
        };
        let group_id = panel.group.id;
        let api = self.api.clone();
        self.tasks.spawn(
            async move { api.add_member(group_id, candidate.persona_id).await },
            move |app, result| match result {
                Ok(()) => {
                    app.banner = Some(Banner::success(format!(
                        "{} agregado al grupo",
                        candidate.full_name
                    )));
                    app.load_members();
                    app.load_candidates();
                }
                Err(err) => app.report(&err, "Error al agregar participante"),
            },
        );
    }

    pub fn remove_selected_member(&mut self) {
        let Some(member) = self.members.as_ref().and_then(|p| p.selected_member()).cloned() else {
            return;
        };
        let api = self.api.clone();
        self.tasks.spawn(
            async move { api.remove_member(member.id).await },
            move |app, result| match result {
                Ok(()) => {
                    app.banner = Some(Banner::success("Participante removido del grupo"));
                    app.load_members();
                    app.load_candidates();
                }
                Err(err) => app.report(&err, "Error al remover participante"),
            },
        );
    }
}
