use super::error::*;
use super::handler;
use crate::application_port::AuthService;
use crate::domain_model::UserId;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    friend_routes(server.clone()).or(wishlist_routes(server))
}

fn friend_routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let auth = || with_verification(server.auth_service.clone());
    let service = || with(server.friendship_service.clone());

    let count = warp::path!("friend" / "num")
        .and(warp::get())
        .and(auth())
        .and(service())
        .and_then(handler::friend_count);

    let list = warp::path!("friend" / "list")
        .and(warp::get())
        .and(auth())
        .and(service())
        .and_then(handler::friend_list);

    let check = warp::path!("friend" / "check")
        .and(warp::get())
        .and(warp::query::<handler::CheckFriendQuery>())
        .and(auth())
        .and(service())
        .and_then(handler::check_friendship);

    let invite = warp::path!("friend" / "invite")
        .and(warp::post())
        .and(auth())
        .and(json_body())
        .and(service())
        .and_then(handler::send_invitation);

    let accept = warp::path!("friend" / "invite" / "accept" / String)
        .and(warp::post())
        .and(auth())
        .and(service())
        .and_then(handler::accept_invitation);

    let refuse = warp::path!("friend" / "invite" / "refuse" / String)
        .and(warp::post())
        .and(auth())
        .and(service())
        .and_then(handler::refuse_invitation);

    let received = warp::path!("friend" / "invite" / "list" / "received")
        .and(warp::get())
        .and(auth())
        .and(service())
        .and_then(handler::received_invitations);

    let sent = warp::path!("friend" / "invite" / "list" / "sent")
        .and(warp::get())
        .and(auth())
        .and(service())
        .and_then(handler::sent_invitations);

    let remove = warp::path!("friend" / "delete")
        .and(warp::post())
        .and(auth())
        .and(json_body())
        .and(service())
        .and_then(handler::remove_friend);

    count
        .or(list)
        .or(check)
        .or(invite)
        .or(accept)
        .or(refuse)
        .or(received)
        .or(sent)
        .or(remove)
}

fn wishlist_routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let auth = || with_verification(server.auth_service.clone());
    let service = || with(server.wishlist_service.clone());

    let list = warp::path!("wishlist")
        .and(warp::get())
        .and(auth())
        .and(service())
        .and_then(handler::wishlist);

    let size = warp::path!("wishlist" / "size")
        .and(warp::get())
        .and(auth())
        .and(service())
        .and_then(handler::wishlist_size);

    let check = warp::path!("wishlist" / "check")
        .and(warp::get())
        .and(warp::query::<handler::CheckWishlistQuery>())
        .and(auth())
        .and(service())
        .and_then(handler::is_in_wishlist);

    let add = warp::path!("wishlist")
        .and(warp::post())
        .and(auth())
        .and(json_body())
        .and(service())
        .and_then(handler::add_to_wishlist);

    let sort = warp::path!("wishlist" / "sort")
        .and(warp::post())
        .and(auth())
        .and(json_body())
        .and(service())
        .and_then(handler::sort_wishlist);

    let remove = warp::path!("wishlist" / String)
        .and(warp::delete())
        .and(auth())
        .and(service())
        .and_then(handler::remove_from_wishlist);

    list.or(size).or(check).or(add).or(sort).or(remove)
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_verification(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (UserId,), Error = warp::Rejection> + Clone {
    warp::header::<String>(http::header::AUTHORIZATION.as_ref()).and_then(move |token: String| {
        let auth_service = auth_service.clone();
        async move {
            if let Some(token) = token.strip_prefix("Bearer ") {
                let user_id = auth_service
                    .verify_token(token.trim())
                    .await
                    .map_err(ApiError::from)
                    .map_err(reject::custom)?;
                Ok(user_id)
            } else {
                Err(reject::custom(ApiError::from(
                    crate::application_port::AuthError::TokenInvalid,
                )))
            }
        }
    })
}
