//! Application state for the TUI.
//!
//! `App` never performs I/O. Actions and events mutate it and yield the
//! [`Command`]s the event loop should run.

use crate::config::TuiConfig;
use crate::events::TuiEvent;
use crate::form::{AccountForm, SearchField, SearchForm, TextField};
use crate::keys::{map_key, Action, KeyMode};
use crate::nav::View;
use crate::notifications::{Notification, NotificationLevel};
use crate::persistence::{ClientState, StoredAuth};
use crate::tasks::Command;
use crate::theme::{Theme, ThemeMode};
use chrono::{DateTime, Utc};
use tripmate_core::{
    export_file_name, parse_activity_time, session_json, share_text, ActivityKind, AuthToken,
    ItineraryId, NavigationContext, NewItinerary, PlanEdit, Route, SavedItinerary, TripDate,
    TripSession,
};
use tripmate_planner::{
    AccountSession, CustomizationEngine, CustomizeOutcome, PlannerResult, PlanningSession,
    SessionState,
};

pub const LOGIN_TO_SAVE: &str = "Please log in to save your trip.";
pub const LOGIN_TO_VIEW: &str = "Please log in to view your trips.";
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const WAIT_FOR_UPDATE: &str = "Please wait for the current update to finish.";

/// Source of the calendar date used for trip defaults and date checks.
pub type Clock = fn() -> TripDate;

/// Today's date in UTC, the calendar the planning backend works in.
pub fn utc_today() -> TripDate {
    Utc::now().date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddField {
    #[default]
    Time,
    Kind,
}

/// Modal for adding an activity to the selected day.
#[derive(Debug, Clone)]
pub struct AddActivityForm {
    pub day_index: usize,
    pub time: TextField,
    pub kind: ActivityKind,
    pub focus: AddField,
    pub error: Option<String>,
}

impl AddActivityForm {
    pub fn new(day_index: usize) -> Self {
        Self {
            day_index,
            time: TextField::new("12:00"),
            kind: ActivityKind::Attraction,
            focus: AddField::Time,
            error: None,
        }
    }

    fn previous_kind(&mut self) {
        let all = ActivityKind::all();
        let i = all.iter().position(|k| *k == self.kind).unwrap_or(0);
        self.kind = all[(i + all.len() - 1) % all.len()];
    }
}

#[derive(Debug, Clone)]
pub enum TripModal {
    Add(AddActivityForm),
    Share(String),
}

#[derive(Debug, Clone, Default)]
pub struct TripViewState {
    pub day: usize,
    pub activity: usize,
    pub modal: Option<TripModal>,
    pub saving: bool,
    pub saved: Option<ItineraryId>,
}

#[derive(Debug, Clone)]
pub enum TripsModal {
    Rename { id: ItineraryId, field: TextField },
    ConfirmDelete { id: ItineraryId, title: String },
}

#[derive(Debug, Clone, Default)]
pub struct TripsViewState {
    pub items: Vec<SavedItinerary>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub modal: Option<TripsModal>,
}

impl TripsViewState {
    pub fn selected_item(&self) -> Option<&SavedItinerary> {
        self.items.get(self.selected)
    }

    fn clamp(&mut self) {
        if self.items.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.items.len() {
            self.selected = self.items.len() - 1;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DetailViewState {
    pub id: Option<ItineraryId>,
    pub record: Option<SavedItinerary>,
    pub loading: bool,
    pub error: Option<String>,
    pub share: Option<String>,
}

pub struct App {
    pub config: TuiConfig,
    pub theme_mode: ThemeMode,
    pub theme: Theme,
    pub route: Route,
    pub auth: Option<StoredAuth>,
    pub navigation: Option<NavigationContext>,
    pub planning: PlanningSession,
    pub engine: CustomizationEngine,
    pub search: SearchForm,
    pub trip_view: TripViewState,
    pub trips_view: TripsViewState,
    pub detail_view: DetailViewState,
    pub login: AccountForm,
    pub register: AccountForm,
    pub notifications: Vec<Notification>,
    pub help_visible: bool,
    pub should_quit: bool,
    clock: Clock,
}

impl App {
    pub fn new(config: TuiConfig, stored: ClientState, clock: Clock) -> Self {
        let theme_mode = stored.theme.unwrap_or(config.theme.default);
        Self {
            theme: Theme::for_mode(theme_mode),
            theme_mode,
            config,
            route: Route::Search,
            auth: stored.auth,
            navigation: None,
            planning: PlanningSession::new(),
            engine: CustomizationEngine::new(),
            search: SearchForm::default(),
            trip_view: TripViewState::default(),
            trips_view: TripsViewState::default(),
            detail_view: DetailViewState::default(),
            login: AccountForm::login(),
            register: AccountForm::register(),
            notifications: Vec::new(),
            help_visible: false,
            should_quit: false,
            clock,
        }
    }

    /// Read on every use so a long-running client follows the date change.
    pub fn today(&self) -> TripDate {
        (self.clock)()
    }

    /// Commands for the first frame: token check, then the initial route.
    pub fn startup(&mut self, initial: Route) -> Vec<Command> {
        let mut commands = Vec::new();
        if let Some(token) = self.token() {
            commands.push(Command::VerifyToken(token));
        }
        commands.extend(self.navigate(initial));
        commands
    }

    pub fn view(&self) -> View {
        View::for_route(&self.route)
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.auth.as_ref().map(|auth| auth.token.clone())
    }

    pub fn client_state(&self) -> ClientState {
        ClientState {
            auth: self.auth.clone(),
            theme: Some(self.theme_mode),
            last_route: Some(self.route.path()),
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        let notification = Notification::new(level, message);
        tracing::debug!(level = notification.level.label(), message = %notification.message, "notification");
        self.notifications.push(notification);
    }

    pub fn prune_notifications(&mut self, now: DateTime<Utc>) {
        self.notifications.retain(|n| !n.is_expired(now));
    }

    /// Whether printable keys currently type into a field.
    pub fn key_mode(&self) -> KeyMode {
        if self.help_visible {
            return KeyMode::Normal;
        }
        match self.view() {
            View::Search if self.search.focus.is_text() => KeyMode::Text,
            View::Search => KeyMode::Normal,
            View::Login | View::Register => KeyMode::Text,
            View::Trip => match &self.trip_view.modal {
                Some(TripModal::Add(form)) if form.focus == AddField::Time => KeyMode::Text,
                _ => KeyMode::Normal,
            },
            View::MyTrips => match &self.trips_view.modal {
                Some(TripsModal::Rename { .. }) => KeyMode::Text,
                _ => KeyMode::Normal,
            },
            View::TripDetail => KeyMode::Normal,
        }
    }

    pub fn navigate(&mut self, route: Route) -> Vec<Command> {
        if route.requires_auth() && self.auth.is_none() {
            self.notify(NotificationLevel::Warning, LOGIN_TO_VIEW);
            return self.navigate(Route::Login);
        }

        let mut commands = Vec::new();
        let leaving_trip = matches!(self.route, Route::Trip { .. });
        if leaving_trip && !matches!(route, Route::Trip { .. }) {
            self.planning.reset();
            commands.push(Command::CancelGeneration);
        }
        tracing::debug!(from = %self.route.path(), to = %route.path(), "navigate");
        self.route = route.clone();
        self.help_visible = false;

        match route {
            Route::Search => {
                self.search.error = None;
            }
            Route::Trip { slug } => {
                self.trip_view = TripViewState::default();
                let today = self.today();
                if let Some(ticket) = self.planning.enter(Some(&slug), self.navigation.as_ref(), today) {
                    commands.push(Command::Generate(ticket));
                }
            }
            Route::MyTrips => {
                self.trips_view.loading = true;
                self.trips_view.error = None;
                self.trips_view.modal = None;
                if let Some(token) = self.token() {
                    commands.push(Command::LoadTrips(token));
                }
            }
            Route::TripDetail { id } => {
                self.detail_view = DetailViewState {
                    id: Some(id),
                    loading: true,
                    ..DetailViewState::default()
                };
                if let Some(token) = self.token() {
                    commands.push(Command::LoadTrip { token, id });
                }
            }
            Route::Login => self.login = AccountForm::login(),
            Route::Register => self.register = AccountForm::register(),
        }
        commands.push(Command::PersistState);
        commands
    }

    pub fn handle_event(&mut self, event: TuiEvent) -> Vec<Command> {
        match event {
            TuiEvent::Input(key) => match map_key(key, self.key_mode()) {
                Some(action) => self.handle_action(action),
                None => Vec::new(),
            },
            TuiEvent::Tick => {
                self.prune_notifications(Utc::now());
                Vec::new()
            }
            TuiEvent::Resize { .. } => Vec::new(),
            TuiEvent::Progress { epoch, stage } => {
                self.planning.record_progress(epoch, stage);
                Vec::new()
            }
            TuiEvent::Generated { ticket, result } => {
                if self.planning.settle(&ticket, result) {
                    self.trip_view.day = 0;
                    self.trip_view.activity = 0;
                    self.trip_view.saved = None;
                }
                Vec::new()
            }
            TuiEvent::Customized { pending, result } => {
                match self.engine.finish(&mut self.planning, pending, result) {
                    Ok(CustomizeOutcome::Applied) => {
                        self.clamp_trip_cursor();
                        self.trip_view.saved = None;
                        self.notify(NotificationLevel::Success, "Itinerary updated");
                    }
                    Ok(CustomizeOutcome::Stale) => {}
                    Err(err) => self.notify(NotificationLevel::Error, err.to_string()),
                }
                Vec::new()
            }
            TuiEvent::Saved(result) => {
                self.trip_view.saving = false;
                match result {
                    Ok(record) => {
                        self.trip_view.saved = Some(record.id);
                        self.notify(
                            NotificationLevel::Success,
                            format!("Saved \"{}\" to My Trips", record.display_title()),
                        );
                    }
                    Err(err) => self.notify(NotificationLevel::Error, err.to_string()),
                }
                Vec::new()
            }
            TuiEvent::TripsLoaded(result) => {
                self.trips_view.loading = false;
                match result {
                    Ok(items) => {
                        self.trips_view.items = items;
                        self.trips_view.error = None;
                        self.trips_view.clamp();
                    }
                    Err(err) => self.trips_view.error = Some(err.to_string()),
                }
                Vec::new()
            }
            TuiEvent::TripLoaded { id, result } => {
                if self.detail_view.id != Some(id) {
                    return Vec::new();
                }
                self.detail_view.loading = false;
                match result {
                    Ok(record) => self.detail_view.record = Some(record),
                    Err(err) => self.detail_view.error = Some(err.to_string()),
                }
                Vec::new()
            }
            TuiEvent::Renamed(result) => {
                match result {
                    Ok(record) => {
                        let title = record.display_title().to_string();
                        if let Some(item) = self.trips_view.items.iter_mut().find(|i| i.id == record.id) {
                            *item = record;
                        }
                        self.notify(NotificationLevel::Success, format!("Renamed to \"{}\"", title));
                    }
                    Err(err) => self.notify(NotificationLevel::Error, err.to_string()),
                }
                Vec::new()
            }
            TuiEvent::Deleted { id, result } => {
                match result {
                    Ok(()) => {
                        self.trips_view.items.retain(|i| i.id != id);
                        self.trips_view.clamp();
                        self.notify(NotificationLevel::Success, "Trip deleted");
                    }
                    Err(err) => self.notify(NotificationLevel::Error, err.to_string()),
                }
                Vec::new()
            }
            TuiEvent::LoggedIn(result) => self.on_logged_in(result),
            TuiEvent::Verified(result) => match result {
                Ok(user) => {
                    if let Some(auth) = self.auth.as_mut() {
                        auth.user = Some(user);
                    }
                    vec![Command::PersistState]
                }
                Err(err) => {
                    tracing::info!(error = %err, "stored credential rejected; logging out");
                    self.auth = None;
                    self.notify(NotificationLevel::Warning, SESSION_EXPIRED);
                    if self.route.requires_auth() {
                        self.navigate(Route::Login)
                    } else {
                        vec![Command::PersistState]
                    }
                }
            },
            TuiEvent::Exported(result) => {
                match result {
                    Ok(path) => {
                        self.notify(NotificationLevel::Success, format!("Exported to {}", path.display()))
                    }
                    Err(message) => self.notify(NotificationLevel::Error, message),
                }
                Vec::new()
            }
        }
    }

    fn on_logged_in(&mut self, result: PlannerResult<AccountSession>) -> Vec<Command> {
        match result {
            Ok(session) => {
                let name = session.user.username.clone();
                self.auth = Some(StoredAuth {
                    token: session.token,
                    user: Some(session.user),
                });
                self.login = AccountForm::login();
                self.register = AccountForm::register();
                self.notify(NotificationLevel::Success, format!("Welcome, {}", name));
                self.navigate(Route::Search)
            }
            Err(err) => {
                let form = if self.view() == View::Register {
                    &mut self.register
                } else {
                    &mut self.login
                };
                form.submitting = false;
                form.error = Some(err.to_string());
                Vec::new()
            }
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Vec<Command> {
        if self.help_visible {
            if matches!(action, Action::Help | Action::Cancel | Action::Confirm) {
                self.help_visible = false;
            } else if action == Action::Quit {
                self.should_quit = true;
            }
            return Vec::new();
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return Vec::new();
            }
            Action::Help => {
                self.help_visible = true;
                return Vec::new();
            }
            Action::ToggleTheme => {
                self.theme_mode = self.theme_mode.toggled();
                self.theme = Theme::for_mode(self.theme_mode);
                return vec![Command::PersistState];
            }
            Action::GoSearch => return self.navigate(Route::Search),
            Action::GoMyTrips => return self.navigate(Route::MyTrips),
            Action::GoLogin => return self.navigate(Route::Login),
            Action::GoRegister => return self.navigate(Route::Register),
            Action::Logout => return self.logout(),
            _ => {}
        }

        match self.view() {
            View::Search => self.search_action(action),
            View::Trip => self.trip_action(action),
            View::MyTrips => self.trips_action(action),
            View::TripDetail => self.detail_action(action),
            View::Login | View::Register => self.account_action(action),
        }
    }

    fn logout(&mut self) -> Vec<Command> {
        if self.auth.take().is_none() {
            return Vec::new();
        }
        self.trips_view = TripsViewState::default();
        self.detail_view = DetailViewState::default();
        self.notify(NotificationLevel::Info, "Logged out");
        tracing::info!("logged out");
        self.navigate(Route::Search)
    }

    fn search_action(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::NextField => self.search.focus = self.search.focus.next(),
            Action::PrevField => self.search.focus = self.search.focus.previous(),
            Action::MoveDown if self.search.focus != SearchField::Interests => {
                self.search.focus = self.search.focus.next()
            }
            Action::MoveUp => self.search.focus = self.search.focus.previous(),
            Action::MoveLeft if self.search.focus == SearchField::Interests => {
                self.search.move_interest(-1)
            }
            Action::MoveRight if self.search.focus == SearchField::Interests => {
                self.search.move_interest(1)
            }
            Action::Toggle => self.search.toggle_interest(),
            Action::Input(c) => {
                if let Some(field) = self.search.focused_field() {
                    field.push(c);
                }
            }
            Action::Backspace => {
                if let Some(field) = self.search.focused_field() {
                    field.backspace();
                }
            }
            Action::Cancel if self.search.focus.is_text() => {
                self.search.focus = SearchField::Interests;
            }
            Action::Confirm => return self.submit_search(),
            _ => {}
        }
        Vec::new()
    }

    fn submit_search(&mut self) -> Vec<Command> {
        match self.search.to_context(self.today()) {
            Ok(context) => {
                let slug = context.slug();
                if slug.is_empty() {
                    self.search.error = Some("Please use letters or numbers in the destination.".to_string());
                    return Vec::new();
                }
                self.search.error = None;
                self.navigation = Some(context);
                self.navigate(Route::Trip { slug })
            }
            Err(message) => {
                self.search.error = Some(message);
                Vec::new()
            }
        }
    }

    fn trip_action(&mut self, action: Action) -> Vec<Command> {
        match self.trip_view.modal.take() {
            Some(TripModal::Share(text)) => {
                if !matches!(action, Action::Cancel | Action::Confirm | Action::Share) {
                    self.trip_view.modal = Some(TripModal::Share(text));
                }
                return Vec::new();
            }
            Some(TripModal::Add(form)) => return self.add_modal_action(form, action),
            None => {}
        }

        let (ready, failed) = match self.planning.state() {
            SessionState::Ready(_) => (true, false),
            SessionState::Failed(_) => (false, true),
            _ => (false, false),
        };
        if !ready {
            let leave = action == Action::Cancel || (failed && action == Action::Confirm);
            return if leave {
                self.navigate(Route::Search)
            } else {
                Vec::new()
            };
        }

        match action {
            Action::MoveUp => self.move_activity(-1),
            Action::MoveDown => self.move_activity(1),
            Action::MoveLeft => self.move_day(-1),
            Action::MoveRight => self.move_day(1),
            Action::Replace => {
                let (day, activity) = (self.trip_view.day, self.trip_view.activity);
                let current = self
                    .planning
                    .trip()
                    .and_then(|t| t.plan.activity(day, activity))
                    .map(|a| a.kind());
                let Some(hint) = current else {
                    self.notify(NotificationLevel::Info, "No activity selected");
                    return Vec::new();
                };
                return self.begin_edit(PlanEdit::Replace {
                    day_index: day,
                    activity_index: activity,
                    activity_type: Some(hint),
                });
            }
            Action::Delete => {
                let (day, activity) = (self.trip_view.day, self.trip_view.activity);
                if self.planning.trip().and_then(|t| t.plan.activity(day, activity)).is_none() {
                    self.notify(NotificationLevel::Info, "No activity selected");
                    return Vec::new();
                }
                return self.begin_edit(PlanEdit::Remove {
                    day_index: day,
                    activity_index: activity,
                });
            }
            Action::Add => {
                if self.engine.is_customizing() {
                    self.notify(NotificationLevel::Info, WAIT_FOR_UPDATE);
                } else {
                    self.trip_view.modal = Some(TripModal::Add(AddActivityForm::new(self.trip_view.day)));
                }
            }
            Action::Save => return self.save_trip(),
            Action::Export => {
                if let Some(trip) = self.planning.trip().cloned() {
                    return self.export(&trip);
                }
            }
            Action::Share => {
                if let Some(trip) = self.planning.trip() {
                    self.trip_view.modal = Some(TripModal::Share(share_text(trip)));
                }
            }
            Action::Cancel => return self.navigate(Route::Search),
            _ => {}
        }
        Vec::new()
    }

    fn add_modal_action(&mut self, mut form: AddActivityForm, action: Action) -> Vec<Command> {
        match action {
            Action::Cancel => return Vec::new(),
            Action::NextField | Action::PrevField | Action::MoveUp | Action::MoveDown => {
                form.focus = match form.focus {
                    AddField::Time => AddField::Kind,
                    AddField::Kind => AddField::Time,
                };
            }
            Action::Input(c) if form.focus == AddField::Time => form.time.push(c),
            Action::Backspace if form.focus == AddField::Time => form.time.backspace(),
            Action::MoveRight | Action::Toggle if form.focus == AddField::Kind => {
                form.kind = form.kind.next()
            }
            Action::MoveLeft if form.focus == AddField::Kind => form.previous_kind(),
            Action::Confirm => match parse_activity_time(&form.time.value) {
                Ok(time) => {
                    return self.begin_edit(PlanEdit::Add {
                        day_index: form.day_index,
                        activity_type: form.kind,
                        activity_time: time,
                    });
                }
                Err(err) => form.error = Some(err.to_string()),
            },
            _ => {}
        }
        self.trip_view.modal = Some(TripModal::Add(form));
        Vec::new()
    }

    fn begin_edit(&mut self, edit: PlanEdit) -> Vec<Command> {
        if self.engine.is_customizing() {
            self.notify(NotificationLevel::Info, WAIT_FOR_UPDATE);
            return Vec::new();
        }
        match self.engine.begin(&self.planning, edit) {
            Ok(pending) => vec![Command::Customize(pending)],
            Err(err) => {
                self.notify(NotificationLevel::Error, err.to_string());
                Vec::new()
            }
        }
    }

    fn save_trip(&mut self) -> Vec<Command> {
        let Some(token) = self.token() else {
            self.notify(NotificationLevel::Warning, LOGIN_TO_SAVE);
            return Vec::new();
        };
        if self.trip_view.saving {
            return Vec::new();
        }
        let Some(trip) = self.planning.trip() else {
            return Vec::new();
        };
        let record = NewItinerary::from_session(trip, None);
        self.trip_view.saving = true;
        vec![Command::SaveTrip { token, record }]
    }

    fn export(&mut self, trip: &TripSession) -> Vec<Command> {
        match session_json(trip) {
            Ok(contents) => {
                let path = self.config.export_dir.join(export_file_name(&trip.destination));
                vec![Command::Export { path, contents }]
            }
            Err(err) => {
                self.notify(NotificationLevel::Error, format!("Export failed: {}", err));
                Vec::new()
            }
        }
    }

    /// Move through activities in reading order, crossing day boundaries.
    fn move_activity(&mut self, delta: isize) {
        let Some(trip) = self.planning.trip() else {
            return;
        };
        let positions: Vec<(usize, usize)> = trip
            .plan
            .days()
            .iter()
            .enumerate()
            .flat_map(|(d, day)| (0..day.activities.len()).map(move |a| (d, a)))
            .collect();
        if positions.is_empty() {
            return;
        }
        let current = positions
            .iter()
            .position(|p| *p == (self.trip_view.day, self.trip_view.activity))
            .unwrap_or(0);
        let target = (current as isize + delta).clamp(0, positions.len() as isize - 1) as usize;
        let (day, activity) = positions[target];
        self.trip_view.day = day;
        self.trip_view.activity = activity;
    }

    fn move_day(&mut self, delta: isize) {
        let Some(trip) = self.planning.trip() else {
            return;
        };
        if trip.plan.is_empty() {
            return;
        }
        let last = trip.plan.len() as isize - 1;
        self.trip_view.day = (self.trip_view.day as isize + delta).clamp(0, last) as usize;
        self.trip_view.activity = 0;
    }

    fn clamp_trip_cursor(&mut self) {
        let Some(trip) = self.planning.trip() else {
            return;
        };
        let days = trip.plan.days();
        if days.is_empty() {
            self.trip_view.day = 0;
            self.trip_view.activity = 0;
            return;
        }
        self.trip_view.day = self.trip_view.day.min(days.len() - 1);
        let count = days[self.trip_view.day].activities.len();
        self.trip_view.activity = self.trip_view.activity.min(count.saturating_sub(1));
    }

    fn trips_action(&mut self, action: Action) -> Vec<Command> {
        if let Some(modal) = self.trips_view.modal.take() {
            return self.trips_modal_action(modal, action);
        }
        match action {
            Action::MoveUp => self.trips_view.selected = self.trips_view.selected.saturating_sub(1),
            Action::MoveDown => {
                if self.trips_view.selected + 1 < self.trips_view.items.len() {
                    self.trips_view.selected += 1;
                }
            }
            Action::Confirm => {
                if let Some(item) = self.trips_view.selected_item() {
                    let id = item.id;
                    return self.navigate(Route::TripDetail { id });
                }
            }
            Action::Rename => {
                if let Some(item) = self.trips_view.selected_item() {
                    self.trips_view.modal = Some(TripsModal::Rename {
                        id: item.id,
                        field: TextField::new(item.display_title()),
                    });
                }
            }
            Action::Delete => {
                if let Some(item) = self.trips_view.selected_item() {
                    self.trips_view.modal = Some(TripsModal::ConfirmDelete {
                        id: item.id,
                        title: item.display_title().to_string(),
                    });
                }
            }
            Action::Refresh => return self.navigate(Route::MyTrips),
            Action::Cancel => return self.navigate(Route::Search),
            _ => {}
        }
        Vec::new()
    }

    fn trips_modal_action(&mut self, modal: TripsModal, action: Action) -> Vec<Command> {
        match modal {
            TripsModal::Rename { id, mut field } => match action {
                Action::Cancel => Vec::new(),
                Action::Input(c) => {
                    field.push(c);
                    self.trips_view.modal = Some(TripsModal::Rename { id, field });
                    Vec::new()
                }
                Action::Backspace => {
                    field.backspace();
                    self.trips_view.modal = Some(TripsModal::Rename { id, field });
                    Vec::new()
                }
                Action::Confirm => {
                    let title = field.value.trim().to_string();
                    if title.is_empty() {
                        self.notify(NotificationLevel::Warning, "Title cannot be empty");
                        self.trips_view.modal = Some(TripsModal::Rename { id, field });
                        return Vec::new();
                    }
                    let unchanged = self
                        .trips_view
                        .items
                        .iter()
                        .any(|item| item.id == id && item.display_title() == title);
                    if unchanged {
                        return Vec::new();
                    }
                    match self.token() {
                        Some(token) => vec![Command::RenameTrip { token, id, title }],
                        None => self.navigate(Route::Login),
                    }
                }
                _ => {
                    self.trips_view.modal = Some(TripsModal::Rename { id, field });
                    Vec::new()
                }
            },
            TripsModal::ConfirmDelete { id, title } => match action {
                Action::Confirm => match self.token() {
                    Some(token) => vec![Command::DeleteTrip { token, id }],
                    None => self.navigate(Route::Login),
                },
                Action::Cancel => Vec::new(),
                _ => {
                    self.trips_view.modal = Some(TripsModal::ConfirmDelete { id, title });
                    Vec::new()
                }
            },
        }
    }

    fn detail_action(&mut self, action: Action) -> Vec<Command> {
        if self.detail_view.share.is_some() {
            if matches!(action, Action::Cancel | Action::Confirm | Action::Share) {
                self.detail_view.share = None;
            }
            return Vec::new();
        }
        match action {
            Action::Export => {
                if let Some(record) = &self.detail_view.record {
                    let session = record.to_session();
                    return self.export(&session);
                }
            }
            Action::Share => {
                if let Some(record) = &self.detail_view.record {
                    self.detail_view.share = Some(share_text(&record.to_session()));
                }
            }
            Action::Refresh => {
                if let Some(id) = self.detail_view.id {
                    return self.navigate(Route::TripDetail { id });
                }
            }
            Action::Cancel => return self.navigate(Route::MyTrips),
            _ => {}
        }
        Vec::new()
    }

    fn account_action(&mut self, action: Action) -> Vec<Command> {
        let registering = self.view() == View::Register;
        let form = if registering {
            &mut self.register
        } else {
            &mut self.login
        };
        match action {
            Action::NextField | Action::MoveDown => form.next(),
            Action::PrevField | Action::MoveUp => form.previous(),
            Action::Input(c) => form.focused_field().push(c),
            Action::Backspace => form.focused_field().backspace(),
            Action::Cancel => return self.navigate(Route::Search),
            Action::Confirm => {
                if form.submitting {
                    return Vec::new();
                }
                if let Err(message) = form.check() {
                    form.error = Some(message);
                    return Vec::new();
                }
                form.error = None;
                form.submitting = true;
                let username = form.username.value.clone();
                let password = form.password.value.clone();
                return if registering {
                    vec![Command::Register {
                        username,
                        password,
                        email: form.email.value.clone(),
                    }]
                } else {
                    vec![Command::Login { username, password }]
                };
            }
            _ => {}
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;
    use chrono::NaiveTime;
    use tripmate_core::Itinerary;
    use tripmate_planner::ServiceError;
    use tripmate_test_utils::fixtures;

    fn config() -> TuiConfig {
        TuiConfig {
            api_base_url: "http://localhost:8000".to_string(),
            auth_scheme: "Token".to_string(),
            request_timeout_ms: 30_000,
            progress_interval_ms: 1_200,
            tick_rate_ms: 250,
            state_path: "tmp/tripmate-state.json".into(),
            log_path: "tmp/tripmate.log".into(),
            export_dir: "tmp/exports".into(),
            theme: ThemeConfig {
                default: ThemeMode::Light,
            },
        }
    }

    fn app() -> App {
        App::new(config(), ClientState::default(), fixtures::today)
    }

    fn generate_ticket(commands: Vec<Command>) -> Option<tripmate_planner::GenerationTicket> {
        commands.into_iter().find_map(|c| match c {
            Command::Generate(ticket) => Some(ticket),
            _ => None,
        })
    }

    fn customize_pending(commands: Vec<Command>) -> Option<tripmate_planner::PendingCustomization> {
        commands.into_iter().find_map(|c| match c {
            Command::Customize(pending) => Some(pending),
            _ => None,
        })
    }

    fn ready_app() -> App {
        let mut app = app();
        app.navigation = Some(NavigationContext::new("Tokyo"));
        let ticket = generate_ticket(app.navigate(Route::Trip {
            slug: "tokyo".to_string(),
        }))
        .unwrap();
        app.handle_event(TuiEvent::Generated {
            ticket,
            result: Ok(fixtures::sample_session("Tokyo")),
        });
        assert!(app.planning.trip().is_some());
        app
    }

    fn last_message(app: &App) -> &str {
        app.notifications.last().map(|n| n.message.as_str()).unwrap_or("")
    }

    #[test]
    fn mismatched_context_issues_no_request() {
        let mut app = app();
        app.navigation = Some(NavigationContext::new("Paris"));
        let commands = app.navigate(Route::Trip {
            slug: "rome".to_string(),
        });
        assert!(generate_ticket(commands).is_none());
        match app.planning.state() {
            SessionState::Failed(failure) => assert_eq!(failure.reason(), "Destination mismatch"),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn progress_reports_for_old_epochs_are_ignored() {
        let mut app = app();
        let first = generate_ticket(app.navigate(Route::Trip {
            slug: "lisbon".to_string(),
        }))
        .unwrap();
        let second = generate_ticket(app.navigate(Route::Trip {
            slug: "lisbon".to_string(),
        }))
        .unwrap();
        assert!(second.epoch > first.epoch);

        app.handle_event(TuiEvent::Progress {
            epoch: first.epoch,
            stage: 2,
        });
        assert_eq!(app.planning.stage(), Some(0));
        app.handle_event(TuiEvent::Progress {
            epoch: second.epoch,
            stage: 1,
        });
        assert_eq!(app.planning.stage(), Some(1));

        app.handle_event(TuiEvent::Generated {
            ticket: first,
            result: Ok(fixtures::sample_session("Lisbon")),
        });
        assert!(app.planning.is_requesting());
    }

    #[test]
    fn second_edit_is_refused_while_one_is_in_flight() {
        let mut app = ready_app();
        assert!(customize_pending(app.handle_action(Action::Delete)).is_some());
        assert!(app.engine.is_customizing());

        assert!(app.handle_action(Action::Replace).is_empty());
        assert_eq!(last_message(&app), WAIT_FOR_UPDATE);
        assert!(app.handle_action(Action::Add).is_empty());
        assert!(app.trip_view.modal.is_none());
    }

    #[test]
    fn failed_edit_keeps_plan_and_reports_reason() {
        let mut app = ready_app();
        let before = app.planning.trip().unwrap().plan.clone();
        let pending = customize_pending(app.handle_action(Action::Delete)).unwrap();
        app.handle_event(TuiEvent::Customized {
            pending,
            result: Err(ServiceError::rejected(503, "Planner is busy")),
        });
        assert_eq!(app.planning.trip().unwrap().plan, before);
        assert!(!app.engine.is_customizing());
        assert_eq!(last_message(&app), "Planner is busy");
    }

    #[test]
    fn edit_result_after_reentry_is_dropped() {
        let mut app = ready_app();
        let pending = customize_pending(app.handle_action(Action::Delete)).unwrap();

        let ticket = generate_ticket(app.navigate(Route::Trip {
            slug: "tokyo".to_string(),
        }))
        .unwrap();
        app.handle_event(TuiEvent::Generated {
            ticket,
            result: Ok(fixtures::sample_session("Tokyo")),
        });
        app.handle_event(TuiEvent::Customized {
            pending,
            result: Ok(Itinerary::default()),
        });

        assert_eq!(app.planning.trip().unwrap().plan, fixtures::sample_plan());
        assert!(!app.engine.is_customizing());
    }

    #[test]
    fn applied_edit_clamps_cursor() {
        let mut app = ready_app();
        app.handle_action(Action::MoveDown);
        assert_eq!((app.trip_view.day, app.trip_view.activity), (0, 1));
        let pending = customize_pending(app.handle_action(Action::Delete)).unwrap();
        let mut plan = fixtures::sample_plan().into_days();
        plan[0].activities.pop();
        app.handle_event(TuiEvent::Customized {
            pending,
            result: Ok(Itinerary::new(plan)),
        });
        assert_eq!((app.trip_view.day, app.trip_view.activity), (0, 0));
        assert_eq!(app.planning.trip().unwrap().plan.activity_count(), 2);
    }

    #[test]
    fn cursor_moves_across_days_and_stops_at_ends() {
        let mut app = ready_app();
        app.handle_action(Action::MoveDown);
        app.handle_action(Action::MoveDown);
        assert_eq!((app.trip_view.day, app.trip_view.activity), (1, 0));
        app.handle_action(Action::MoveDown);
        assert_eq!((app.trip_view.day, app.trip_view.activity), (1, 0));
        app.handle_action(Action::MoveUp);
        assert_eq!((app.trip_view.day, app.trip_view.activity), (0, 1));
        app.handle_action(Action::MoveLeft);
        assert_eq!((app.trip_view.day, app.trip_view.activity), (0, 0));
    }

    #[test]
    fn add_modal_builds_add_edit() {
        let mut app = ready_app();
        app.handle_action(Action::Add);
        assert_eq!(app.key_mode(), KeyMode::Text);
        app.handle_action(Action::NextField);
        assert_eq!(app.key_mode(), KeyMode::Normal);
        app.handle_action(Action::MoveRight);

        let pending = customize_pending(app.handle_action(Action::Confirm)).unwrap();
        assert_eq!(
            pending.edit,
            PlanEdit::Add {
                day_index: 0,
                activity_type: ActivityKind::Food,
                activity_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            }
        );
        assert!(app.trip_view.modal.is_none());
    }

    #[test]
    fn add_modal_rejects_bad_time() {
        let mut app = ready_app();
        app.handle_action(Action::Add);
        app.handle_action(Action::Input('x'));
        assert!(app.handle_action(Action::Confirm).is_empty());
        match &app.trip_view.modal {
            Some(TripModal::Add(form)) => assert!(form.error.is_some()),
            other => panic!("expected add modal, got {:?}", other),
        }
        assert!(!app.engine.is_customizing());
    }

    #[test]
    fn save_requires_login() {
        let mut app = ready_app();
        assert!(app.handle_action(Action::Save).is_empty());
        assert_eq!(last_message(&app), LOGIN_TO_SAVE);
    }

    #[test]
    fn rename_to_same_title_sends_nothing() {
        let mut app = app();
        app.auth = Some(StoredAuth {
            token: AuthToken::new("abc123"),
            user: None,
        });
        app.navigate(Route::MyTrips);
        app.trips_view.loading = false;
        app.trips_view.items = vec![SavedItinerary {
            id: 4,
            title: "Kyoto Autumn".to_string(),
            destination: "Kyoto".to_string(),
            start_date: None,
            end_date: None,
            interests: Vec::new(),
            notes: String::new(),
            plan: fixtures::sample_plan(),
            created_at: None,
            updated_at: None,
        }];

        app.handle_action(Action::Rename);
        app.handle_action(Action::Input(' '));
        assert!(app.handle_action(Action::Confirm).is_empty());
        assert!(app.trips_view.modal.is_none());

        app.handle_action(Action::Rename);
        app.handle_action(Action::Input('!'));
        match app.handle_action(Action::Confirm).as_slice() {
            [Command::RenameTrip { id, title, .. }] => {
                assert_eq!(*id, 4);
                assert_eq!(title, "Kyoto Autumn!");
            }
            other => panic!("unexpected commands {:?}", other),
        }
    }

    #[test]
    fn save_with_login_snapshots_trip() {
        let mut app = ready_app();
        app.auth = Some(StoredAuth {
            token: AuthToken::new("abc123"),
            user: None,
        });
        let commands = app.handle_action(Action::Save);
        match commands.as_slice() {
            [Command::SaveTrip { token, record }] => {
                assert_eq!(token.expose(), "abc123");
                assert_eq!(record.title, "Tokyo Trip");
                assert_eq!(record.plan, fixtures::sample_plan());
            }
            other => panic!("unexpected commands {:?}", other),
        }
        assert!(app.handle_action(Action::Save).is_empty());
    }

    #[test]
    fn export_targets_export_dir() {
        let mut app = ready_app();
        match app.handle_action(Action::Export).as_slice() {
            [Command::Export { path, contents }] => {
                assert!(path.ends_with("tmp/exports/tripmate-Tokyo.json"));
                assert!(contents.contains("\"destination\": \"Tokyo\""));
            }
            other => panic!("unexpected commands {:?}", other),
        }
    }

    #[test]
    fn export_of_slashed_destination_stays_in_export_dir() {
        let mut app = app();
        app.navigation = Some(NavigationContext::new("AC/DC"));
        let ticket = generate_ticket(app.navigate(Route::Trip {
            slug: "acdc".to_string(),
        }))
        .unwrap();
        app.handle_event(TuiEvent::Generated {
            ticket,
            result: Ok(fixtures::sample_session("AC/DC")),
        });
        match app.handle_action(Action::Export).as_slice() {
            [Command::Export { path, .. }] => {
                assert_eq!(path.parent(), Some(app.config.export_dir.as_path()));
                assert!(path.ends_with("tripmate-AC_DC.json"));
            }
            other => panic!("unexpected commands {:?}", other),
        }
    }

    #[test]
    fn protected_routes_redirect_to_login() {
        let mut app = app();
        app.navigate(Route::MyTrips);
        assert_eq!(app.route, Route::Login);
        assert_eq!(last_message(&app), LOGIN_TO_VIEW);
    }

    #[test]
    fn leaving_trip_page_cancels_generation() {
        let mut app = app();
        app.navigate(Route::Trip {
            slug: "oslo".to_string(),
        });
        let commands = app.handle_action(Action::Cancel);
        assert!(commands.contains(&Command::CancelGeneration));
        assert_eq!(app.route, Route::Search);
        assert!(matches!(app.planning.state(), SessionState::Idle));
    }

    #[test]
    fn logout_clears_credential() {
        let mut app = app();
        app.auth = Some(StoredAuth {
            token: AuthToken::new("abc123"),
            user: None,
        });
        let commands = app.handle_action(Action::Logout);
        assert!(commands.contains(&Command::PersistState));
        assert!(app.auth.is_none());
        assert_eq!(app.client_state().auth, None);
    }

    #[test]
    fn help_overlay_swallows_actions() {
        let mut app = ready_app();
        app.handle_action(Action::Help);
        assert!(app.handle_action(Action::Delete).is_empty());
        assert!(!app.engine.is_customizing());
        app.handle_action(Action::Cancel);
        assert!(!app.help_visible);
    }

    #[test]
    fn theme_toggle_is_persisted() {
        let mut app = app();
        let commands = app.handle_action(Action::ToggleTheme);
        assert_eq!(commands, vec![Command::PersistState]);
        assert_eq!(app.client_state().theme, Some(ThemeMode::Dark));
        assert_eq!(app.theme, Theme::dark());
    }

    #[test]
    fn search_submit_validates_then_navigates() {
        let mut app = app();
        assert!(app.handle_action(Action::Confirm).is_empty());
        assert_eq!(app.search.error.as_deref(), Some("Please enter a destination."));

        for c in "New York".chars() {
            app.handle_action(Action::Input(c));
        }
        let ticket = generate_ticket(app.handle_action(Action::Confirm)).unwrap();
        assert_eq!(
            app.route,
            Route::Trip {
                slug: "new-york".to_string()
            }
        );
        assert_eq!(ticket.query.destination, "New York");
        assert_eq!(ticket.query.start_date, fixtures::today());
    }

    thread_local! {
        static DAYS_AHEAD: std::cell::Cell<i64> = const { std::cell::Cell::new(0) };
    }

    fn shifted_today() -> TripDate {
        fixtures::today() + chrono::Duration::days(DAYS_AHEAD.with(|d| d.get()))
    }

    #[test]
    fn dates_follow_the_clock_across_midnight() {
        let mut app = App::new(config(), ClientState::default(), shifted_today);
        let ticket = generate_ticket(app.navigate(Route::Trip {
            slug: "new-york".to_string(),
        }))
        .unwrap();
        assert_eq!(ticket.query.start_date, fixtures::today());

        app.navigate(Route::Search);
        DAYS_AHEAD.with(|d| d.set(1));
        let tomorrow = fixtures::today() + chrono::Duration::days(1);
        assert_eq!(app.today(), tomorrow);

        let ticket = generate_ticket(app.navigate(Route::Trip {
            slug: "new-york".to_string(),
        }))
        .unwrap();
        assert_eq!(ticket.query.start_date, tomorrow);
        assert_eq!(ticket.query.end_date, tomorrow);

        app.navigate(Route::Search);
        app.search.destination = TextField::new("Lisbon");
        app.search.start_date = TextField::new(fixtures::today().format("%Y-%m-%d").to_string());
        assert!(app.handle_action(Action::Confirm).is_empty());
        assert_eq!(app.search.error.as_deref(), Some("Start date cannot be in the past"));
        assert_eq!(app.route, Route::Search);
    }
}
