//! Background work requested by the app.
//!
//! The app never awaits the network itself. It returns [`Command`]s; the
//! runner spawns one task per command and every task reports back on the
//! event channel, so state is only ever touched on the event loop.

use crate::events::TuiEvent;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tripmate_core::{AuthToken, ItineraryId, NewItinerary};
use tripmate_planner::{
    with_progress, AccountAdapter, GenerationTicket, IdentityService, ItineraryStore,
    PendingCustomization, PersistenceAdapter, PlanningService,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Generate(GenerationTicket),
    /// Stop the outstanding generation call, if any.
    CancelGeneration,
    Customize(PendingCustomization),
    SaveTrip {
        token: AuthToken,
        record: NewItinerary,
    },
    LoadTrips(AuthToken),
    LoadTrip {
        token: AuthToken,
        id: ItineraryId,
    },
    RenameTrip {
        token: AuthToken,
        id: ItineraryId,
        title: String,
    },
    DeleteTrip {
        token: AuthToken,
        id: ItineraryId,
    },
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        password: String,
        email: String,
    },
    VerifyToken(AuthToken),
    Export {
        path: PathBuf,
        contents: String,
    },
    /// Write the client state file. Handled by the event loop, not spawned.
    PersistState,
}

pub struct TaskRunner {
    planning: Arc<dyn PlanningService>,
    store: Arc<dyn ItineraryStore>,
    identity: Arc<dyn IdentityService>,
    sender: mpsc::Sender<TuiEvent>,
    progress_period: Duration,
    generation: Option<JoinHandle<()>>,
}

impl TaskRunner {
    pub fn new(
        planning: Arc<dyn PlanningService>,
        store: Arc<dyn ItineraryStore>,
        identity: Arc<dyn IdentityService>,
        sender: mpsc::Sender<TuiEvent>,
        progress_period: Duration,
    ) -> Self {
        Self {
            planning,
            store,
            identity,
            sender,
            progress_period,
            generation: None,
        }
    }

    pub fn run(&mut self, command: Command) {
        match command {
            Command::Generate(ticket) => self.generate(ticket),
            Command::CancelGeneration => {
                if let Some(handle) = self.generation.take() {
                    tracing::debug!("cancelling generation task");
                    handle.abort();
                }
            }
            Command::Customize(pending) => {
                let service = Arc::clone(&self.planning);
                self.spawn(async move {
                    let result = service.customize_trip(&pending.request).await;
                    TuiEvent::Customized { pending, result }
                });
            }
            Command::SaveTrip { token, record } => {
                let store = Arc::clone(&self.store);
                self.spawn(async move {
                    let adapter = PersistenceAdapter::new(store.as_ref(), &token);
                    TuiEvent::Saved(adapter.create(&record).await)
                });
            }
            Command::LoadTrips(token) => {
                let store = Arc::clone(&self.store);
                self.spawn(async move {
                    let adapter = PersistenceAdapter::new(store.as_ref(), &token);
                    TuiEvent::TripsLoaded(adapter.list().await)
                });
            }
            Command::LoadTrip { token, id } => {
                let store = Arc::clone(&self.store);
                self.spawn(async move {
                    let adapter = PersistenceAdapter::new(store.as_ref(), &token);
                    TuiEvent::TripLoaded {
                        id,
                        result: adapter.get(id).await,
                    }
                });
            }
            Command::RenameTrip { token, id, title } => {
                let store = Arc::clone(&self.store);
                self.spawn(async move {
                    let adapter = PersistenceAdapter::new(store.as_ref(), &token);
                    TuiEvent::Renamed(adapter.rename(id, &title).await)
                });
            }
            Command::DeleteTrip { token, id } => {
                let store = Arc::clone(&self.store);
                self.spawn(async move {
                    let adapter = PersistenceAdapter::new(store.as_ref(), &token);
                    TuiEvent::Deleted {
                        id,
                        result: adapter.delete(id).await,
                    }
                });
            }
            Command::Login { username, password } => {
                let identity = Arc::clone(&self.identity);
                self.spawn(async move {
                    let accounts = AccountAdapter::new(identity.as_ref());
                    TuiEvent::LoggedIn(accounts.login(&username, &password).await)
                });
            }
            Command::Register {
                username,
                password,
                email,
            } => {
                let identity = Arc::clone(&self.identity);
                self.spawn(async move {
                    let accounts = AccountAdapter::new(identity.as_ref());
                    TuiEvent::LoggedIn(accounts.register(&username, &password, &email).await)
                });
            }
            Command::VerifyToken(token) => {
                let identity = Arc::clone(&self.identity);
                self.spawn(async move {
                    let accounts = AccountAdapter::new(identity.as_ref());
                    TuiEvent::Verified(accounts.verify(&token).await)
                });
            }
            Command::Export { path, contents } => {
                self.spawn(async move { TuiEvent::Exported(write_export(path, contents).await) });
            }
            Command::PersistState => {}
        }
    }

    fn generate(&mut self, ticket: GenerationTicket) {
        if let Some(previous) = self.generation.take() {
            previous.abort();
        }
        let service = Arc::clone(&self.planning);
        let sender = self.sender.clone();
        let period = self.progress_period;
        self.generation = Some(tokio::spawn(async move {
            let epoch = ticket.epoch;
            let progress = sender.clone();
            let result = with_progress(service.create_trip(&ticket.query), period, move |stage| {
                let _ = progress.try_send(TuiEvent::Progress { epoch, stage });
            })
            .await;
            let _ = sender.send(TuiEvent::Generated { ticket, result }).await;
        }));
    }

    fn spawn<F>(&self, work: F)
    where
        F: std::future::Future<Output = TuiEvent> + Send + 'static,
    {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let event = work.await;
            if sender.send(event).await.is_err() {
                tracing::debug!("event loop gone; dropping task result");
            }
        });
    }
}

async fn write_export(path: PathBuf, contents: String) -> Result<PathBuf, String> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("Export failed: {}", e))?;
    }
    tokio::fs::write(&path, contents)
        .await
        .map_err(|e| format!("Export failed: {}", e))?;
    tracing::info!(path = %path.display(), "itinerary exported");
    Ok(path)
}
