use super::*;
use axum::{routing::get, Json, Router};
use serde_json::json;
use shared::rest::{Post, User};
use tokio::net::TcpListener;

async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn user_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "username": name.to_lowercase(),
        "email": format!("{}@example.com", name.to_lowercase()),
        "phone": "1-770-736-8031",
        "website": "example.org",
        "address": {"street": "Kulas Light", "suite": "Apt. 556", "city": "Gwenborough", "zipcode": "92998-3874"},
        "company": {"name": "Romaguera-Crona", "catchPhrase": "Multi-layered client-server neural-net", "bs": "harness real-time e-markets"}
    })
}

fn post_json(id: u64, user_id: u64) -> Value {
    json!({"userId": user_id, "id": id, "title": format!("post {id}"), "body": "quia et suscipit"})
}

#[tokio::test]
async fn joined_plan_decodes_every_resource() {
    let router = Router::new()
        .route("/users", get(|| async { Json(json!([user_json(1, "Leanne")])) }))
        .route(
            "/posts",
            get(|| async { Json(json!([post_json(1, 1), post_json(2, 1)])) }),
        );
    let base = spawn_server(router).await;
    let client = RestClient::new(&base);

    let plan = FetchPlan::new(vec![
        ResourceSpec::new("posts", client.posts_url()),
        ResourceSpec::new("users", client.users_url()),
    ]);
    let data = client.execute(&plan).await.expect("plan succeeds");

    let posts: Vec<Post> = data.decode("posts").expect("posts decode");
    let users: Vec<User> = data.decode("users").expect("users decode");
    assert_eq!(posts.len(), 2);
    assert_eq!(users.len(), 1);
    assert_eq!(posts[0].user_id, users[0].id);
}

#[tokio::test]
async fn any_failed_resource_collapses_the_plan() {
    let router = Router::new()
        .route("/users", get(|| async { Json(json!([user_json(1, "Leanne")])) }))
        .route(
            "/posts",
            get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    let base = spawn_server(router).await;
    let client = RestClient::new(&base);

    let plan = FetchPlan::new(vec![
        ResourceSpec::new("posts", client.posts_url()),
        ResourceSpec::new("users", client.users_url()),
    ]);
    let err = client.execute(&plan).await.expect_err("plan collapses");
    assert_eq!(err.key(), "posts");
    assert!(matches!(
        err,
        TransportError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            ..
        }
    ));
}

#[tokio::test]
async fn first_failure_in_plan_order_is_reported() {
    let router = Router::new()
        .route(
            "/a",
            get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "a down") }),
        )
        .route(
            "/b",
            get(|| async { (axum::http::StatusCode::NOT_FOUND, "b missing") }),
        );
    let base = spawn_server(router).await;
    let client = RestClient::new(&base);

    let plan = FetchPlan::new(vec![
        ResourceSpec::new("a", format!("{base}/a")),
        ResourceSpec::new("b", format!("{base}/b")),
    ]);
    let err = client.execute(&plan).await.expect_err("plan collapses");
    assert_eq!(err.key(), "a");
}

#[tokio::test]
async fn unreachable_endpoint_surfaces_as_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    drop(listener);

    let client = RestClient::new(&base);
    let plan = FetchPlan::new(vec![ResourceSpec::new("users", client.users_url())]);
    let err = client.execute(&plan).await.expect_err("connect fails");
    assert!(matches!(err, TransportError::Request { key: "users", .. }));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let router = Router::new().route("/users", get(|| async { "<html>not json</html>" }));
    let base = spawn_server(router).await;
    let client = RestClient::new(&base);

    let plan = FetchPlan::new(vec![ResourceSpec::new("users", client.users_url())]);
    let err = client.execute(&plan).await.expect_err("decode fails");
    assert!(matches!(err, TransportError::Decode { key: "users", .. }));
}

#[tokio::test]
async fn plan_data_reports_missing_and_misshapen_keys() {
    let router = Router::new().route("/posts", get(|| async { Json(json!([post_json(1, 1)])) }));
    let base = spawn_server(router).await;
    let client = RestClient::new(&base);

    let plan = FetchPlan::new(vec![ResourceSpec::new("posts", client.posts_url())]);
    let data = client.execute(&plan).await.expect("plan succeeds");

    let missing = data.decode::<Vec<Post>>("users").expect_err("missing key");
    assert!(matches!(missing, TransportError::MissingResource { key: "users" }));

    let misshapen = data.decode::<Vec<User>>("posts").expect_err("wrong shape");
    assert!(matches!(misshapen, TransportError::Shape { key: "posts", .. }));
}

#[test]
fn url_builders_cover_the_resource_tree() {
    let client = RestClient::new("https://api.example.com/");
    assert_eq!(client.users_url(), "https://api.example.com/users");
    assert_eq!(client.user_url(7), "https://api.example.com/users/7");
    assert_eq!(client.user_posts_url(7), "https://api.example.com/users/7/posts");
    assert_eq!(client.post_url(3), "https://api.example.com/posts/3");
    assert_eq!(client.post_comments_url(3), "https://api.example.com/posts/3/comments");
    assert_eq!(client.comment_url(9), "https://api.example.com/comments/9");
}
