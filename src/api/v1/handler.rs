use super::error::*;
use crate::application_port::*;
use crate::domain_model::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            code: StatusCode::OK.as_u16(),
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn err(code: StatusCode, message: impl Into<String>) -> Self {
        ApiResponse {
            code: code.as_u16(),
            message: message.into(),
            data: None,
        }
    }
}

fn reply<T: Serialize>(data: T) -> warp::reply::Json {
    warp::reply::json(&ApiResponse::ok(data))
}

fn parse_path_id<T: FromStr>(raw: &str, what: &str) -> Result<T, warp::Rejection> {
    raw.parse::<T>()
        .map_err(|_| reject::custom(ApiError::validation(format!("invalid {what}: {raw:?}"))))
}

pub async fn health() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(reply("ok"))
}

// region friend

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendCountResponse {
    pub count: u64,
}

pub async fn friend_count(
    user_id: UserId,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let count = friendship_service
        .friend_count(user_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(FriendCountResponse { count }))
}

pub async fn friend_list(
    user_id: UserId,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let friends = friendship_service
        .friend_list(user_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(friends))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFriendQuery {
    pub friend_id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFriendResponse {
    pub is_friend: bool,
}

pub async fn check_friendship(
    query: CheckFriendQuery,
    user_id: UserId,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let is_friend = friendship_service
        .check_friendship(user_id, UserId(query.friend_id))
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(CheckFriendResponse { is_friend }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub receiver_id: u64,
}

pub async fn send_invitation(
    user_id: UserId,
    body: InviteRequest,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let invitation = friendship_service
        .send_invitation(user_id, UserId(body.receiver_id))
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(invitation))
}

pub async fn accept_invitation(
    raw_id: String,
    user_id: UserId,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let id: InvitationId = parse_path_id(&raw_id, "invitation id")?;
    let invitation = friendship_service
        .accept_invitation(id, user_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(invitation))
}

pub async fn refuse_invitation(
    raw_id: String,
    user_id: UserId,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let id: InvitationId = parse_path_id(&raw_id, "invitation id")?;
    let invitation = friendship_service
        .refuse_invitation(id, user_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(invitation))
}

pub async fn received_invitations(
    user_id: UserId,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let invitations = friendship_service
        .received_invitations(user_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(invitations))
}

pub async fn sent_invitations(
    user_id: UserId,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let invitations = friendship_service
        .sent_invitations(user_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(invitations))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFriendRequest {
    pub friend_id: u64,
}

pub async fn remove_friend(
    user_id: UserId,
    body: RemoveFriendRequest,
    friendship_service: Arc<dyn FriendshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    friendship_service
        .remove_friend(user_id, UserId(body.friend_id))
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(()))
}

// endregion

// region wishlist

pub async fn wishlist(
    user_id: UserId,
    wishlist_service: Arc<dyn WishlistService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let entries = wishlist_service
        .wishlist(user_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(entries))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistSizeResponse {
    pub size: u64,
}

pub async fn wishlist_size(
    user_id: UserId,
    wishlist_service: Arc<dyn WishlistService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let size = wishlist_service
        .wishlist_size(user_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(WishlistSizeResponse { size }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckWishlistQuery {
    pub app_id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckWishlistResponse {
    pub in_wishlist: bool,
}

pub async fn is_in_wishlist(
    query: CheckWishlistQuery,
    user_id: UserId,
    wishlist_service: Arc<dyn WishlistService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let in_wishlist = wishlist_service
        .is_in_wishlist(user_id, AppId(query.app_id))
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(CheckWishlistResponse { in_wishlist }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWishlistRequest {
    pub app_id: u64,
}

pub async fn add_to_wishlist(
    user_id: UserId,
    body: AddWishlistRequest,
    wishlist_service: Arc<dyn WishlistService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    wishlist_service
        .add_to_wishlist(user_id, AppId(body.app_id))
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(()))
}

pub async fn remove_from_wishlist(
    raw_app_id: String,
    user_id: UserId,
    wishlist_service: Arc<dyn WishlistService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let app_id: AppId = parse_path_id(&raw_app_id, "app id")?;
    wishlist_service
        .remove_from_wishlist(user_id, app_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(()))
}

#[derive(Debug, Deserialize)]
pub struct SortWishlistRequest {
    pub items: Vec<SortItem>,
}

pub async fn sort_wishlist(
    user_id: UserId,
    body: SortWishlistRequest,
    wishlist_service: Arc<dyn WishlistService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    wishlist_service
        .sort_wishlist(user_id, body.items)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(reply(()))
}

// endregion
