pub mod v1;

use crate::server::Server;
use std::sync::Arc;
use warp::Filter;

/// Full HTTP surface: `/health` plus everything under `/api/v1`.
pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible> + Clone {
    let health = warp::path!("health")
        .and(warp::get())
        .and_then(v1::health);

    let api_v1 = warp::path("api")
        .and(warp::path("v1"))
        .and(v1::routes(server));

    health
        .or(api_v1)
        .recover(v1::recover_error)
        .with(warp::trace::request())
}
