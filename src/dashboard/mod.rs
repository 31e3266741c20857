/// Dashboard stats consumer.
///
/// Fetches the pre-aggregated statistics payload for the signed-in user,
/// derives presentation-ready values from it and exposes them as a
/// [`DashboardState`].
///
/// # Lifecycle
///
/// A [`DashboardMount`] stands for one mounted dashboard view. Mounting
/// issues the single fetch; the payload lives in the mount's state until it
/// is unmounted, and is never persisted or cached. A result delivered after
/// unmount is dropped.
///
/// # Failure
///
/// Every fetch failure (network, non-2xx, malformed body, missing token)
/// becomes [`DashboardState::Failed`]. Nothing is retried; the presentation
/// layer may call [`DashboardMount::refresh`] on user request.
///
/// ```rust,ignore
/// let client = DashboardClient::new(&ClientOptions::new("http://localhost:8000"));
/// let auth = AuthContext::new(StaticToken::new(token));
/// let mut mount = DashboardMount::new(&client, &auth);
/// match mount.mount() {
///     DashboardState::Loaded(view) => println!("{}", view.greeting),
///     _ => println!("Failed to load data"),
/// }
/// ```
use serde::Serialize;

pub mod chart;
pub mod client;
pub mod derive;
pub mod error;
pub mod findings;
pub mod stats;
pub mod view;

pub use client::{ClientOptions, DashboardClient};
pub use error::FetchError;
pub use stats::DashboardStats;
pub use view::DashboardView;

use crate::auth::AuthContext;

/// Message shown for the terminal failure state.
pub const FAILED_MESSAGE: &str = "Failed to load data";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// What a dashboard view currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardState {
    Loading,
    Loaded(DashboardView),
    Failed,
}

impl DashboardState {
    /// Map a fetch outcome to the state it produces.
    pub fn from_outcome(outcome: Result<DashboardStats, FetchError>, auth: &AuthContext) -> Self {
        match outcome {
            Ok(stats) => Self::Loaded(DashboardView::build(&stats, auth)),
            Err(_) => Self::Failed,
        }
    }

    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            Self::Loaded(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

// ---------------------------------------------------------------------------
// Mount
// ---------------------------------------------------------------------------

/// One mounted dashboard view instance.
#[derive(Debug)]
pub struct DashboardMount<'a> {
    client: &'a DashboardClient,
    auth: &'a AuthContext,
    state: DashboardState,
    mounted: bool,
}

impl<'a> DashboardMount<'a> {
    pub fn new(client: &'a DashboardClient, auth: &'a AuthContext) -> Self {
        Self {
            client,
            auth,
            state: DashboardState::Loading,
            mounted: false,
        }
    }

    /// Mount the view and perform its fetch. Mounting twice is a no-op.
    pub fn mount(&mut self) -> &DashboardState {
        if !self.mounted {
            self.mounted = true;
            self.refresh();
        }
        &self.state
    }

    /// Re-fetch on explicit request from the presentation layer.
    pub fn refresh(&mut self) -> &DashboardState {
        if !self.mounted {
            return &self.state;
        }
        self.state = DashboardState::Loading;
        let outcome = self.client.fetch(self.auth);
        self.complete(outcome);
        &self.state
    }

    /// Deliver a fetch outcome. Ignored once the view is unmounted.
    pub fn complete(&mut self, outcome: Result<DashboardStats, FetchError>) {
        if !self.mounted {
            return;
        }
        self.state = DashboardState::from_outcome(outcome, self.auth);
    }

    /// Tear the view down, discarding its payload.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.state = DashboardState::Loading;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }
}

/// Mount a view, fetch once, and return the resulting state.
pub fn load(client: &DashboardClient, auth: &AuthContext) -> DashboardState {
    let mut mount = DashboardMount::new(client, auth);
    mount.mount().clone()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
