//! End-to-end flows: the app, the task runner and in-memory services.

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tripmate_core::{ActivityKind, NavigationContext, Route, TripSession};
use tripmate_planner::SessionState;
use tripmate_test_utils::assertions::{activity_names, assert_failed, assert_ready};
use tripmate_test_utils::{fixtures, MemoryItineraryStore, MockFailure, MockIdentity, MockPlanningService};
use tripmate_tui::config::{ThemeConfig, TuiConfig};
use tripmate_tui::events::TuiEvent;
use tripmate_tui::keys::Action;
use tripmate_tui::persistence::{ClientState, StoredAuth};
use tripmate_tui::state::{App, TripsModal, LOGIN_TO_SAVE, SESSION_EXPIRED, WAIT_FOR_UPDATE};
use tripmate_tui::tasks::{Command, TaskRunner};
use tripmate_tui::theme::ThemeMode;

fn config(dir: &TempDir) -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:8000".to_string(),
        auth_scheme: "Token".to_string(),
        request_timeout_ms: 30_000,
        progress_interval_ms: 1_200,
        tick_rate_ms: 250,
        state_path: dir.path().join("state.json"),
        log_path: dir.path().join("tripmate.log"),
        export_dir: dir.path().join("exports"),
        theme: ThemeConfig {
            default: ThemeMode::Light,
        },
    }
}

struct Harness {
    app: App,
    runner: TaskRunner,
    events: mpsc::Receiver<TuiEvent>,
    planning: Arc<MockPlanningService>,
    store: Arc<MemoryItineraryStore>,
    identity: Arc<MockIdentity>,
    dir: TempDir,
}

impl Harness {
    fn new(planning: MockPlanningService, identity: MockIdentity, stored: ClientState) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let planning = Arc::new(planning);
        let store = Arc::new(MemoryItineraryStore::new(MockIdentity::token_for("ana")));
        let identity = Arc::new(identity);
        let (tx, events) = mpsc::channel(256);
        let runner = TaskRunner::new(
            planning.clone(),
            store.clone(),
            identity.clone(),
            tx,
            config.progress_interval(),
        );
        let app = App::new(config, stored, fixtures::today);
        Self {
            app,
            runner,
            events,
            planning,
            store,
            identity,
            dir,
        }
    }

    fn basic() -> Self {
        Self::new(MockPlanningService::new(), MockIdentity::new(), ClientState::default())
    }

    fn logged_in() -> Self {
        let stored = ClientState {
            auth: Some(StoredAuth {
                token: MockIdentity::token_for("ana"),
                user: None,
            }),
            ..ClientState::default()
        };
        Self::new(
            MockPlanningService::new(),
            MockIdentity::new().with_user("ana", "secret"),
            stored,
        )
    }

    fn run(&mut self, commands: Vec<Command>) {
        for command in commands {
            if command != Command::PersistState {
                self.runner.run(command);
            }
        }
    }

    fn press(&mut self, action: Action) {
        let commands = self.app.handle_action(action);
        self.run(commands);
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(Action::Input(c));
        }
    }

    fn go(&mut self, route: Route) {
        let commands = self.app.navigate(route);
        self.run(commands);
    }

    /// Feed events back until nothing arrives for a while. Under paused
    /// time the wait resolves as soon as every task is parked.
    async fn settle(&mut self) {
        while let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_secs(60), self.events.recv()).await
        {
            let commands = self.app.handle_event(event);
            self.run(commands);
        }
    }

    async fn next_event(&mut self) -> TuiEvent {
        tokio::time::timeout(Duration::from_secs(60), self.events.recv())
            .await
            .expect("event before timeout")
            .expect("channel open")
    }

    fn last_message(&self) -> String {
        self.app
            .notifications
            .last()
            .map(|n| n.message.clone())
            .unwrap_or_default()
    }

    async fn ready_trip(&mut self, destination: &str) {
        self.type_text(destination);
        self.press(Action::Confirm);
        self.settle().await;
        assert_ready(self.app.planning.state());
    }
}

#[tokio::test(start_paused = true)]
async fn search_generates_itinerary() {
    let mut h = Harness::basic();
    h.type_text("New York");
    h.press(Action::NextField);
    h.press(Action::NextField);
    h.press(Action::NextField);
    h.press(Action::Toggle);
    h.press(Action::Confirm);
    assert!(h.app.planning.is_requesting());

    h.settle().await;
    let trip = assert_ready(h.app.planning.state());
    assert_eq!(trip.destination, "New York");

    let queries = h.planning.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].start_date, fixtures::today());
    assert_eq!(queries[0].end_date, fixtures::today());
    assert_eq!(queries[0].interests, vec!["history".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn deep_link_recovers_destination_from_slug() {
    let mut h = Harness::basic();
    let commands = h.app.startup(Route::parse("/trip/rio-de-janeiro"));
    h.run(commands);
    h.settle().await;

    let trip = assert_ready(h.app.planning.state());
    assert_eq!(trip.destination, "Rio De Janeiro");
    assert_eq!(h.planning.create_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn mismatched_context_never_calls_the_service() {
    let mut h = Harness::basic();
    h.app.navigation = Some(NavigationContext::new("Paris"));
    h.go(Route::Trip {
        slug: "rome".to_string(),
    });
    h.settle().await;

    let failure = assert_failed(h.app.planning.state());
    assert_eq!(failure.reason(), "Destination mismatch");
    assert_eq!(h.planning.create_calls(), 0);

    h.press(Action::Confirm);
    assert_eq!(h.app.route, Route::Search);
}

#[tokio::test(start_paused = true)]
async fn generation_failure_surfaces_server_reason() {
    let planning = MockPlanningService::new();
    planning.push_trip(Err(MockFailure::new(400, "Unknown destination")));
    let mut h = Harness::new(planning, MockIdentity::new(), ClientState::default());
    h.go(Route::Trip {
        slug: "atlantis".to_string(),
    });
    h.settle().await;

    assert_eq!(assert_failed(h.app.planning.state()).reason(), "Unknown destination");
}

#[tokio::test(start_paused = true)]
async fn loading_stages_advance_while_waiting() {
    let planning = MockPlanningService::new().with_delay(Duration::from_millis(3_000));
    let mut h = Harness::new(planning, MockIdentity::new(), ClientState::default());
    h.go(Route::Trip {
        slug: "kyoto".to_string(),
    });
    assert_eq!(h.app.planning.stage(), Some(0));

    let event = h.next_event().await;
    assert!(matches!(event, TuiEvent::Progress { stage: 1, .. }));
    h.app.handle_event(event);
    assert_eq!(h.app.planning.stage(), Some(1));

    h.settle().await;
    assert_ready(h.app.planning.state());
}

#[tokio::test(start_paused = true)]
async fn leaving_trip_page_drops_pending_generation() {
    let planning = MockPlanningService::new().with_delay(Duration::from_secs(5));
    let mut h = Harness::new(planning, MockIdentity::new(), ClientState::default());
    h.go(Route::Trip {
        slug: "oslo".to_string(),
    });
    h.press(Action::Cancel);
    h.settle().await;

    assert_eq!(h.app.route, Route::Search);
    assert!(matches!(h.app.planning.state(), SessionState::Idle));
}

#[tokio::test(start_paused = true)]
async fn remove_replaces_whole_plan() {
    let mut h = Harness::basic();
    h.ready_trip("Tokyo").await;

    h.press(Action::MoveDown);
    h.press(Action::Delete);
    assert!(h.app.engine.is_customizing());
    h.press(Action::Replace);
    assert_eq!(h.last_message(), WAIT_FOR_UPDATE);

    h.settle().await;
    let trip = assert_ready(h.app.planning.state());
    assert_eq!(
        activity_names(&trip.plan),
        vec![vec!["Arrive at Haneda"], vec!["Tsukiji Outer Market"]]
    );
    assert_eq!(h.planning.customize_calls(), 1);
    assert!(!h.app.engine.is_customizing());
}

#[tokio::test(start_paused = true)]
async fn replace_sends_current_kind_as_hint() {
    let mut h = Harness::basic();
    h.ready_trip("Tokyo").await;

    h.press(Action::MoveDown);
    h.press(Action::MoveDown);
    h.press(Action::Replace);
    h.settle().await;

    let requests = h.planning.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].day_index, 1);
    assert_eq!(requests[0].activity_index, Some(0));
    assert_eq!(requests[0].activity_type, Some(ActivityKind::Food));
    let trip = assert_ready(h.app.planning.state());
    assert_eq!(activity_names(&trip.plan)[1], vec!["Alternative Food"]);
}

#[tokio::test(start_paused = true)]
async fn add_activity_through_modal() {
    let mut h = Harness::basic();
    h.ready_trip("Tokyo").await;

    h.press(Action::Add);
    for _ in 0..5 {
        h.press(Action::Backspace);
    }
    h.type_text("18:30");
    h.press(Action::NextField);
    h.press(Action::MoveRight);
    h.press(Action::MoveRight);
    h.press(Action::Confirm);
    h.settle().await;

    let requests = h.planning.requests();
    let request = &requests[0];
    assert_eq!(request.activity_time.as_deref(), Some("18:30"));
    assert_eq!(request.activity_type, Some(ActivityKind::Hotel));
    let trip = assert_ready(h.app.planning.state());
    assert_eq!(activity_names(&trip.plan)[0].last().map(String::as_str), Some("New Hotel"));
}

#[tokio::test(start_paused = true)]
async fn failed_edit_leaves_plan_untouched() {
    let planning = MockPlanningService::new();
    planning.push_plan(Err(MockFailure::bare(500)));
    let mut h = Harness::new(planning, MockIdentity::new(), ClientState::default());
    h.ready_trip("Tokyo").await;

    h.press(Action::Delete);
    h.settle().await;

    let trip = assert_ready(h.app.planning.state());
    assert_eq!(trip.plan, fixtures::sample_plan());
    assert_eq!(h.last_message(), "Failed to customize");
    assert!(!h.app.engine.is_customizing());
}

#[tokio::test(start_paused = true)]
async fn saving_needs_an_account() {
    let mut h = Harness::basic();
    h.ready_trip("Tokyo").await;
    h.press(Action::Save);
    h.settle().await;

    assert_eq!(h.last_message(), LOGIN_TO_SAVE);
    assert_eq!(h.store.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn save_list_rename_delete() {
    let mut h = Harness::logged_in();
    h.ready_trip("Tokyo").await;

    h.press(Action::Save);
    h.settle().await;
    assert_eq!(h.app.trip_view.saved, Some(1));
    assert_eq!(h.store.records()[0].title, "Tokyo Trip");

    h.press(Action::GoMyTrips);
    h.settle().await;
    assert_eq!(h.app.trips_view.items.len(), 1);

    h.press(Action::Rename);
    assert!(matches!(h.app.trips_view.modal, Some(TripsModal::Rename { .. })));
    for _ in 0.."Tokyo Trip".len() {
        h.press(Action::Backspace);
    }
    h.type_text("Autumn in Tokyo");
    h.press(Action::Confirm);
    h.settle().await;
    assert_eq!(h.app.trips_view.items[0].title, "Autumn in Tokyo");
    assert_eq!(h.store.records()[0].title, "Autumn in Tokyo");

    h.press(Action::Confirm);
    h.settle().await;
    let record = h.app.detail_view.record.clone().expect("detail loaded");
    assert_eq!(record.plan, fixtures::sample_plan());

    h.press(Action::Cancel);
    h.settle().await;
    h.press(Action::Delete);
    h.press(Action::Confirm);
    h.settle().await;
    assert!(h.app.trips_view.items.is_empty());
    assert!(h.store.records().is_empty());
}

#[tokio::test(start_paused = true)]
async fn store_rejection_is_shown_on_list() {
    let mut h = Harness::logged_in();
    h.store.fail_next(MockFailure::bare(500));
    h.press(Action::GoMyTrips);
    h.settle().await;

    assert_eq!(h.app.trips_view.error.as_deref(), Some("Failed to load itineraries"));
}

#[tokio::test(start_paused = true)]
async fn login_stores_credential() {
    let mut h = Harness::new(
        MockPlanningService::new(),
        MockIdentity::new().with_user("ana", "secret"),
        ClientState::default(),
    );
    h.press(Action::GoLogin);
    h.type_text(" ana ");
    h.press(Action::NextField);
    h.type_text("secret");
    h.press(Action::Confirm);
    h.settle().await;

    let auth = h.app.client_state().auth.expect("logged in");
    assert_eq!(auth.token, MockIdentity::token_for("ana"));
    assert_eq!(auth.user.map(|u| u.username), Some("ana".to_string()));
    assert_eq!(h.app.route, Route::Search);
}

#[tokio::test(start_paused = true)]
async fn login_rejection_is_shown_on_form() {
    let mut h = Harness::new(
        MockPlanningService::new(),
        MockIdentity::new().with_user("ana", "secret"),
        ClientState::default(),
    );
    h.press(Action::GoLogin);
    h.type_text("ana");
    h.press(Action::NextField);
    h.type_text("wrong");
    h.press(Action::Confirm);
    h.settle().await;

    assert!(h.app.auth.is_none());
    assert_eq!(
        h.app.login.error.as_deref(),
        Some("Unable to log in with provided credentials.")
    );
    assert!(!h.app.login.submitting);
}

#[tokio::test(start_paused = true)]
async fn register_logs_straight_in() {
    let mut h = Harness::basic();
    h.press(Action::GoRegister);
    h.type_text("ben");
    h.press(Action::NextField);
    h.type_text("ben@example.com");
    h.press(Action::NextField);
    h.type_text("hunter2");
    h.press(Action::Confirm);
    h.settle().await;

    assert_eq!(h.app.token(), Some(MockIdentity::token_for("ben")));
}

#[tokio::test(start_paused = true)]
async fn revoked_credential_logs_out_at_startup() {
    let mut h = Harness::logged_in();
    h.identity.revoke(&MockIdentity::token_for("ana"));
    let commands = h.app.startup(Route::MyTrips);
    h.run(commands);
    h.settle().await;

    assert!(h.app.auth.is_none());
    assert_eq!(h.app.route, Route::Login);
    assert!(h.app.notifications.iter().any(|n| n.message == SESSION_EXPIRED));
}

#[tokio::test(start_paused = true)]
async fn valid_credential_loads_profile() {
    let mut h = Harness::logged_in();
    let commands = h.app.startup(Route::Search);
    h.run(commands);
    h.settle().await;

    let user = h.app.auth.as_ref().and_then(|a| a.user.clone()).expect("profile");
    assert_eq!(user.username, "ana");
    assert_eq!(h.app.token(), Some(MockIdentity::token_for("ana")));
}

#[tokio::test]
async fn export_writes_session_json() {
    let mut h = Harness::basic();
    h.app.navigation = Some(NavigationContext::new("New York"));
    let commands = h.app.navigate(Route::Trip {
        slug: "new-york".to_string(),
    });
    h.run(commands);
    while h.app.planning.trip().is_none() {
        let event = h.next_event().await;
        h.app.handle_event(event);
    }

    h.press(Action::Export);
    let event = h.next_event().await;
    h.app.handle_event(event);

    let path = h.dir.path().join("exports").join("tripmate-New-York.json");
    let written = std::fs::read_to_string(&path).unwrap();
    let session: TripSession = serde_json::from_str(&written).unwrap();
    assert_eq!(session.destination, "New York");
    assert!(h.last_message().starts_with("Exported to"));
}
