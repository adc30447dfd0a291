//! Route table
//!
//! ```text
//! GET  /, /hello        liveness echo
//! GET  /db, /all        whole state
//! POST /db              replace whole state
//! POST /sync            merge a patch batch
//! GET  /db/todos/{id}   one task
//! ```

use crate::handlers::{self, EchoQuery};
use crate::reject::handle_rejection;
use std::convert::Infallible;
use std::sync::Arc;
use tasksync_store::Store;
use warp::{Filter, Reply};

fn with_store(store: Arc<Store>) -> impl Filter<Extract = (Arc<Store>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&store))
}

fn request_log() -> warp::log::Log<impl Fn(warp::log::Info<'_>) + Copy> {
    warp::log::custom(|info: warp::log::Info<'_>| {
        tracing::info!(
            target: "tasksync::http",
            method = %info.method(),
            path = info.path(),
            status = info.status().as_u16(),
            elapsed = ?info.elapsed(),
            "request"
        );
    })
}

/// Complete HTTP surface over `store`
///
/// Paths are matched before methods so that an unknown path is a 404 and a
/// known path with the wrong method is a 405.
///
/// Every rejection is recovered into an `{error, message}` body, so the
/// returned filter never fails.
pub fn routes(
    store: Arc<Store>,
    body_limit: u64,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let echo = warp::path::end()
        .or(warp::path("hello").and(warp::path::end()))
        .unify()
        .and(warp::get())
        .and(warp::query::<EchoQuery>())
        .map(handlers::echo);

    let db_path = warp::path("db")
        .or(warp::path("all"))
        .unify()
        .and(warp::path::end());

    let get_state = db_path
        .and(warp::get())
        .and(with_store(Arc::clone(&store)))
        .and_then(handlers::get_state);

    let replace_state = warp::path("db")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(body_limit))
        .and(warp::body::json())
        .and(with_store(Arc::clone(&store)))
        .and_then(handlers::replace_state);

    let sync = warp::path("sync")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(body_limit))
        .and(warp::body::json())
        .and(with_store(Arc::clone(&store)))
        .and_then(handlers::sync);

    let get_task = warp::path!("db" / "todos" / String)
        .and(warp::get())
        .and(with_store(store))
        .and_then(handlers::get_task);

    echo.or(get_state)
        .or(replace_state)
        .or(sync)
        .or(get_task)
        .recover(handle_rejection)
        .with(request_log())
}
