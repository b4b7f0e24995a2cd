use affinity::api;
use affinity::server::Server;
use affinity::settings::*;
use serde_json::{Value, json};
use std::sync::Arc;
use warp::Filter;
use warp::test::RequestBuilder;

fn fake_settings() -> Settings {
    Settings {
        auth: Auth {
            backend: "fake".to_string(),
        },
        catalog: Catalog {
            backend: "fake".to_string(),
        },
        http: Http {
            address: "127.0.0.1:0".to_string(),
            cert_path: None,
            key_path: None,
        },
        log: Log {
            filter: "warn".to_string(),
            ansi: false,
        },
        store: Store {
            backend: "fake".to_string(),
            mysql_dsn: None,
            max_connections: 1,
        },
    }
}

async fn app() -> impl Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible> + Clone
{
    let server = Server::try_new(&fake_settings()).await.unwrap();
    api::routes(Arc::new(server))
}

fn as_user(builder: RequestBuilder, user: u64) -> RequestBuilder {
    builder.header("authorization", format!("Bearer fake-access-token:{user}"))
}

fn get(path: &str, user: u64) -> RequestBuilder {
    as_user(warp::test::request().method("GET").path(path), user)
}

fn post(path: &str, user: u64, body: &Value) -> RequestBuilder {
    as_user(warp::test::request().method("POST").path(path), user).json(body)
}

async fn call<F>(filter: &F, request: RequestBuilder) -> (u16, Value)
where
    F: Filter + 'static,
    F::Extract: warp::Reply + Send,
{
    let response = request.reply(filter).await;
    let status = response.status().as_u16();
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    (status, body)
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = app().await;

    let (status, body) = call(&app, warp::test::request().path("/health")).await;

    assert_eq!(status, 200);
    assert_eq!(body["code"], 200);
    assert_eq!(body["data"], "ok");
}

#[tokio::test]
async fn missing_or_bad_token_is_unauthorized() {
    let app = app().await;

    let (status, body) = call(&app, warp::test::request().path("/api/v1/friend/num")).await;
    assert_eq!(status, 401);
    assert_eq!(body["code"], 401);

    let bad = warp::test::request()
        .path("/api/v1/wishlist")
        .header("authorization", "Bearer not-a-token");
    let (status, _) = call(&app, bad).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = app().await;

    let (status, body) = call(&app, get("/api/v1/nothing/here", 1)).await;

    assert_eq!(status, 404);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn wrong_method_on_known_route_is_not_found() {
    let app = app().await;

    let put = as_user(
        warp::test::request().method("PUT").path("/api/v1/friend/num"),
        1,
    );
    let (status, body) = call(&app, put).await;

    assert_eq!(status, 404);
    assert_eq!(body["message"], "route not found");
}

#[tokio::test]
async fn invitation_flow_over_http() {
    let app = app().await;

    let (status, body) = call(
        &app,
        post("/api/v1/friend/invite", 1, &json!({ "receiverId": 2 })),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["data"]["status"], "pending");
    let id = body["data"]["id"].as_u64().unwrap();

    let (_, received) = call(&app, get("/api/v1/friend/invite/list/received", 2)).await;
    assert_eq!(received["data"].as_array().unwrap().len(), 1);
    let (_, sent) = call(&app, get("/api/v1/friend/invite/list/sent", 1)).await;
    assert_eq!(sent["data"][0]["receiver"], 2);

    let (status, _) = call(
        &app,
        post(&format!("/api/v1/friend/invite/accept/{id}"), 1, &json!({})),
    )
    .await;
    assert_eq!(status, 401);

    let (status, body) = call(
        &app,
        post(&format!("/api/v1/friend/invite/accept/{id}"), 2, &json!({})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "accepted");

    let (_, count) = call(&app, get("/api/v1/friend/num", 1)).await;
    assert_eq!(count["data"]["count"], 1);
    let (_, check) = call(&app, get("/api/v1/friend/check?friendId=1", 2)).await;
    assert_eq!(check["data"]["isFriend"], true);
    let (_, list) = call(&app, get("/api/v1/friend/list", 2)).await;
    assert_eq!(list["data"][0]["userId"], 1);

    let (status, _) = call(
        &app,
        post(&format!("/api/v1/friend/invite/accept/{id}"), 2, &json!({})),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn business_rule_violations_are_bad_requests() {
    let app = app().await;

    let (status, _) = call(
        &app,
        post("/api/v1/friend/invite", 3, &json!({ "receiverId": 3 })),
    )
    .await;
    assert_eq!(status, 400);

    let (status, body) = call(
        &app,
        post("/api/v1/friend/delete", 3, &json!({ "friendId": 4 })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], 400);

    let (status, _) = call(
        &app,
        post("/api/v1/friend/invite/refuse/99", 3, &json!({})),
    )
    .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn malformed_input_is_rejected() {
    let app = app().await;

    let (status, _) = call(
        &app,
        post("/api/v1/friend/invite/accept/abc", 1, &json!({})),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = call(
        &app,
        post("/api/v1/friend/invite", 1, &json!({ "receiver": "two" })),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = call(&app, get("/api/v1/wishlist/check?appId=x", 1)).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn wishlist_flow_over_http() {
    let app = app().await;

    for app_id in [2, 4, 1] {
        let (status, body) =
            call(&app, post("/api/v1/wishlist", 7, &json!({ "appId": app_id }))).await;
        assert_eq!(status, 200, "{body}");
    }
    let (_, size) = call(&app, get("/api/v1/wishlist/size", 7)).await;
    assert_eq!(size["data"]["size"], 3);

    let batch = json!({ "items": [
        { "appId": 1, "sortOrder": 0 },
        { "appId": 2, "sortOrder": 1 },
        { "appId": 4, "sortOrder": 2 },
    ]});
    let (status, _) = call(&app, post("/api/v1/wishlist/sort", 7, &batch)).await;
    assert_eq!(status, 200);

    let (_, list) = call(&app, get("/api/v1/wishlist", 7)).await;
    let order: Vec<u64> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["appId"].as_u64().unwrap())
        .collect();
    assert_eq!(order, vec![1, 2, 4]);

    let delete = as_user(
        warp::test::request().method("DELETE").path("/api/v1/wishlist/2"),
        7,
    );
    let (status, _) = call(&app, delete).await;
    assert_eq!(status, 200);

    let (_, check) = call(&app, get("/api/v1/wishlist/check?appId=2", 7)).await;
    assert_eq!(check["data"]["inWishlist"], false);
}

#[tokio::test]
async fn wishlist_errors_map_to_codes() {
    let app = app().await;

    let (status, _) = call(&app, post("/api/v1/wishlist", 7, &json!({ "appId": 999 }))).await;
    assert_eq!(status, 404);

    let (status, _) = call(&app, post("/api/v1/wishlist/sort", 7, &json!({ "items": [] }))).await;
    assert_eq!(status, 400);

    let batch = json!({ "items": [{ "appId": 3, "sortOrder": 0 }] });
    let (status, body) = call(&app, post("/api/v1/wishlist/sort", 7, &batch)).await;
    assert_eq!(status, 404);
    assert!(body["data"].is_null());
}
