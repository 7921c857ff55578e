//! HTTP 接口集成测试 / HTTP API integration tests

use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};

use v_chat::conf::VisibilityConfig;
use v_chat::router;
use v_chat::server::{cors_headers, ChatServer};
use v_chat::storage::MemoryStore;

fn chat_server() -> Arc<ChatServer> {
    Arc::new(ChatServer::new(
        Arc::new(MemoryStore::new()),
        VisibilityConfig::default(),
    ))
}

macro_rules! chat_app {
    ($server:expr) => {
        test::init_service(
            App::new()
                .wrap(cors_headers())
                .app_data(web::Data::new($server.clone()))
                .configure(router::configure),
        )
        .await
    };
}

fn join(name: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/participants")
        .set_json(json!({ "name": name }))
}

fn send(from: &str, to: &str, text: &str, kind: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/messages")
        .insert_header(("user", from))
        .set_json(json!({ "to": to, "text": text, "type": kind }))
}

fn texts(messages: &Value) -> Vec<String> {
    messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| format!("{}>{}:{}", m["from"], m["to"], m["text"]).replace('"', ""))
        .collect()
}

#[actix_web::test]
async fn test_private_message_reaches_only_its_parties() {
    let server = chat_server();
    let app = chat_app!(server);

    for name in ["Alice", "Bob", "Carol"] {
        let resp = test::call_service(&app, join(name).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
    let resp = test::call_service(&app, send("Alice", "Bob", "oi", "private_message").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let bob: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/messages")
            .insert_header(("user", "Bob"))
            .to_request(),
    )
    .await;
    assert_eq!(
        texts(&bob),
        vec![
            "Alice>Todos:entra na sala...",
            "Bob>Todos:entra na sala...",
            "Carol>Todos:entra na sala...",
            "Alice>Bob:oi",
        ]
    );
    let private = &bob.as_array().unwrap()[3];
    assert_eq!(private["type"], "private_message");
    assert_eq!(private["time"].as_str().unwrap().len(), 8);

    let carol: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/messages")
            .insert_header(("user", "Carol"))
            .to_request(),
    )
    .await;
    assert_eq!(carol.as_array().unwrap().len(), 3);
    assert!(!texts(&carol).iter().any(|t| t.ends_with(":oi")));

    // 发送者自己也能看到 / the sender sees it as well
    let alice: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/messages")
            .insert_header(("user", "Alice"))
            .to_request(),
    )
    .await;
    assert_eq!(alice.as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_registration_errors() {
    let server = chat_server();
    let app = chat_app!(server);

    let resp = test::call_service(&app, join("Alice").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, join(" Alice ").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["error"]["message"].as_str().unwrap().contains("Alice"));

    let resp = test::call_service(&app, join("   ").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/participants")
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/participants")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let list: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/participants").to_request(),
    )
    .await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Alice");
    assert!(list[0]["lastStatus"].as_i64().unwrap() > 0);
}

#[actix_web::test]
async fn test_message_submission_errors() {
    let server = chat_server();
    let app = chat_app!(server);
    test::call_service(&app, join("Alice").to_request()).await;

    for req in [
        send("Mallory", "Todos", "hi", "message"),
        send("Alice", "Todos", "hi", "status"),
        send("Alice", "Todos", "", "message"),
        send("Alice", "", "hi", "message"),
        test::TestRequest::post()
            .uri("/messages")
            .set_json(json!({ "to": "Todos", "text": "hi", "type": "message" })),
    ] {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    let all: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/messages")
            .insert_header(("user", "Alice"))
            .to_request(),
    )
    .await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_status_heartbeat() {
    let server = chat_server();
    let app = chat_app!(server);
    test::call_service(&app, join("Alice").to_request()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/status")
            .insert_header(("user", "Alice"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/status")
            .insert_header(("user", "Ghost"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, test::TestRequest::post().uri("/status").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // 心跳不产生消息 / heartbeats produce no messages
    let all: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/messages").to_request(),
    )
    .await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_limit_keeps_most_recent() {
    let server = chat_server();
    let app = chat_app!(server);
    test::call_service(&app, join("Alice").to_request()).await;
    for text in ["one", "two", "three"] {
        test::call_service(&app, send("Alice", "Todos", text, "message").to_request()).await;
    }

    let get = |query: &str| {
        test::TestRequest::get()
            .uri(&format!("/messages{}", query))
            .insert_header(("user", "Alice"))
            .to_request()
    };

    let last_two: Value = test::call_and_read_body_json(&app, get("?limit=2")).await;
    assert_eq!(
        texts(&last_two),
        vec!["Alice>Todos:two", "Alice>Todos:three"]
    );

    for query in ["", "?limit=abc", "?limit=0", "?limit=-3", "?limit=100"] {
        let all: Value = test::call_and_read_body_json(&app, get(query)).await;
        assert_eq!(all.as_array().unwrap().len(), 4, "query {:?}", query);
    }
}

#[actix_web::test]
async fn test_cors_preflight_and_headers() {
    let server = chat_server();
    let app = chat_app!(server);

    let resp = test::call_service(
        &app,
        test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/messages")
            .to_request(),
    )
    .await;
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );

    let resp = test::call_service(&app, test::TestRequest::get().uri("/participants").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("access-control-allow-origin"));
}
