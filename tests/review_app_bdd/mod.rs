//! Support code for the review app reconciliation BDD tests.

mod harness;
mod state;

pub(crate) use harness::{
    PIPELINE_ID, app_json, build_json, event_payload, mount, review_app_json, run_reconciliation,
};
pub(crate) use state::{ReviewAppState, ensure_runtime_and_server};
