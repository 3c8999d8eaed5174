//! Scenario state and runtime/server initialisation for the review app BDD
//! tests.

use std::cell::RefCell;
use std::rc::Rc;

use review_app_sync::{PullRequestEvent, ReconcileOutcome, ReviewAppError};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Shared runtime wrapper that can be stored in rstest-bdd Slot.
#[derive(Clone)]
pub(crate) struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    pub(crate) fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub(crate) fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

#[derive(ScenarioState, Default)]
pub(crate) struct ReviewAppState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) event: Slot<PullRequestEvent>,
    pub(crate) outcome: Slot<ReconcileOutcome>,
    pub(crate) outputs: Slot<Vec<(String, String)>>,
    pub(crate) error: Slot<ReviewAppError>,
}

/// Ensures the runtime and server are initialised in `ReviewAppState`.
pub(crate) fn ensure_runtime_and_server(
    state: &ReviewAppState,
) -> Result<SharedRuntime, ReviewAppError> {
    if state.runtime.with_ref(|_| ()).is_none() {
        let runtime = Runtime::new().map_err(|error| ReviewAppError::Io {
            message: format!("failed to create Tokio runtime: {error}"),
        })?;
        state.runtime.set(SharedRuntime::new(runtime));
    }

    let shared_runtime = state.runtime.get().ok_or_else(|| ReviewAppError::Api {
        message: "runtime not initialised after set".to_owned(),
    })?;

    if state.server.with_ref(|_| ()).is_none() {
        state.server.set(shared_runtime.block_on(MockServer::start()));
    }

    Ok(shared_runtime)
}
