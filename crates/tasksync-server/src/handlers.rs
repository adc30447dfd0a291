//! Endpoint handlers

use crate::reject::store_rejection;
use serde::Deserialize;
use std::sync::Arc;
use tasksync_model::api::{EchoResponse, SyncResponse, DEFAULT_ECHO_PAYLOAD};
use tasksync_model::{Patch, StoreState, TaskId};
use tasksync_store::Store;
use warp::{Rejection, Reply};

/// Query string of the liveness probe
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EchoQuery {
    payload: Option<String>,
}

pub(crate) fn echo(query: EchoQuery) -> impl Reply {
    let payload = query
        .payload
        .unwrap_or_else(|| DEFAULT_ECHO_PAYLOAD.to_string());
    warp::reply::json(&EchoResponse::new(payload))
}

pub(crate) async fn get_state(store: Arc<Store>) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&store.get_state().await))
}

/// `POST /db`: replace everything, echo the accepted document
pub(crate) async fn replace_state(
    state: StoreState,
    store: Arc<Store>,
) -> Result<impl Reply, Rejection> {
    store
        .replace_state(state.clone())
        .await
        .map_err(store_rejection)?;
    Ok(warp::reply::json(&state))
}

/// `POST /sync`: merge the batch, answer with the committed state
pub(crate) async fn sync(patches: Vec<Patch>, store: Arc<Store>) -> Result<impl Reply, Rejection> {
    let outcome = store
        .apply_patches(&patches)
        .await
        .map_err(store_rejection)?;

    for rejection in &outcome.report.rejected {
        tracing::warn!(%rejection, "patch skipped");
    }

    Ok(warp::reply::json(&SyncResponse::new(
        outcome.state,
        outcome.report.rejected,
    )))
}

pub(crate) async fn get_task(id: String, store: Arc<Store>) -> Result<impl Reply, Rejection> {
    let task = store
        .get_task_by_id(&TaskId::from(id))
        .await
        .map_err(store_rejection)?;
    Ok(warp::reply::json(&task))
}
