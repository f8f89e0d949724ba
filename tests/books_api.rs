//! End-to-end tests for the book catalog API over a real socket.

use std::collections::HashSet;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use bookshelf::http_server::{HttpServer, HttpServerConfig};
use bookshelf::storage::{BookStore, FileStore, MemoryStore};

struct TestServer {
    base: String,
    client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    async fn start(store: Arc<dyn BookStore>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = HttpServer::new(HttpServerConfig::default(), "test", store);
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve(listener, async move {
            let _ = rx.await;
        }));

        Self {
            base: format!("http://{}", addr),
            client: reqwest::Client::new(),
            shutdown: Some(tx),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn post(&self, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(self.url("/api/books"))
            .json(&body)
            .send()
            .await
            .unwrap();
        (resp.status(), resp.json().await.unwrap())
    }

    async fn put(&self, id: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .put(self.url(&format!("/api/books/{}", id)))
            .json(&body)
            .send()
            .await
            .unwrap();
        (resp.status(), resp.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        (resp.status(), resp.json().await.unwrap())
    }

    async fn delete(&self, id: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .delete(self.url(&format!("/api/books/{}", id)))
            .send()
            .await
            .unwrap();
        (resp.status(), resp.json().await.unwrap())
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

async fn memory_server() -> TestServer {
    TestServer::start(Arc::new(MemoryStore::new())).await
}

async fn seed_shelf(server: &TestServer) {
    for (title, author, year) in [
        ("1984", "George Orwell", 1949),
        ("Pride and Prejudice", "Jane Austen", 1813),
        ("The Catcher in the Rye", "J.D. Salinger", 1951),
        ("Lord of the Flies", "William Golding", 1954),
        ("Animal Farm", "George Orwell", 1945),
    ] {
        let (status, _) = server
            .post(json!({"title": title, "author": author, "publishedYear": year}))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

fn titles(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_book_lifecycle() {
    let server = memory_server().await;

    let (status, created) = server
        .post(json!({"title": "1984", "author": "George Orwell", "publishedYear": 1949}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "1984");
    assert_eq!(created["publishedYear"], 1949);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, list) = server.get("/api/books?year=1949").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], id.as_str());

    let (status, updated) = server
        .put(
            &id,
            json!({"title": "Nineteen Eighty-Four", "author": "George Orwell", "publishedYear": 1949}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["title"], "Nineteen Eighty-Four");

    let (status, fetched) = server.get(&format!("/api/books/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);

    let (status, deleted) = server.delete(&id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Book deleted");
    assert_eq!(deleted["deletedBook"], updated);

    let (status, body) = server.get(&format!("/api/books/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");

    let (status, body) = server.delete(&id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");

    server.stop().await;
}

#[tokio::test]
async fn test_create_rejects_missing_fields() {
    let server = memory_server().await;

    for body in [
        json!({"author": "George Orwell", "publishedYear": 1949}),
        json!({"title": "1984", "publishedYear": 1949}),
        json!({"title": "1984", "author": "George Orwell"}),
        json!({"title": "", "author": "George Orwell", "publishedYear": 1949}),
        json!({"title": "1984", "author": "George Orwell", "publishedYear": 0}),
    ] {
        let (status, err) = server.post(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], "Title, author, and publishedYear are required");
    }

    let (_, list) = server.get("/api/books").await;
    assert!(list.as_array().unwrap().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn test_create_rejects_invalid_years() {
    let server = memory_server().await;

    for year in [json!("abc"), json!(-5), json!("1949"), json!(1949.5)] {
        let (status, err) = server
            .post(json!({"title": "1984", "author": "George Orwell", "publishedYear": year}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "year {}", year);
        assert_eq!(err["error"], "publishedYear must be a valid positive number");
    }

    server.stop().await;
}

#[tokio::test]
async fn test_invalid_identifier_is_400_on_every_route() {
    let server = memory_server().await;
    let book = json!({"title": "1984", "author": "George Orwell", "publishedYear": 1949});

    let (status, err) = server.get("/api/books/not-an-id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Invalid book ID format");

    let (status, err) = server.put("not-an-id", book).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Invalid book ID format");

    let (status, err) = server.delete("not-an-id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Invalid book ID format");

    server.stop().await;
}

#[tokio::test]
async fn test_list_filters() {
    let server = memory_server().await;
    seed_shelf(&server).await;

    let (_, all) = server.get("/api/books").await;
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (_, orwell) = server.get("/api/books?author=orwell").await;
    assert_eq!(titles(&orwell), vec!["1984", "Animal Farm"]);

    let (_, by_year) = server.get("/api/books?year=1813").await;
    assert_eq!(titles(&by_year), vec!["Pride and Prejudice"]);

    let (_, search) = server.get("/api/books?search=the").await;
    assert_eq!(
        titles(&search),
        vec!["The Catcher in the Rye", "Lord of the Flies"]
    );

    let (_, combined) = server.get("/api/books?author=orwell&search=farm").await;
    assert_eq!(titles(&combined), vec!["Animal Farm"]);

    let (_, dotted) = server.get("/api/books?author=J.D.").await;
    assert_eq!(titles(&dotted), vec!["The Catcher in the Rye"]);

    let (status, unmatchable) = server.get("/api/books?year=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert!(unmatchable.as_array().unwrap().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn test_health_and_unknown_routes() {
    let server = memory_server().await;

    let (status, health) = server.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "OK");
    assert_eq!(health["environment"], "test");
    assert!(health["timestamp"].as_str().unwrap().ends_with('Z'));

    let (status, body) = server.get("/api/publishers").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");

    server.stop().await;
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempfile::TempDir::new().unwrap();

    let store: Arc<dyn BookStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let server = TestServer::start(store.clone()).await;
    let (_, kept) = server
        .post(json!({"title": "1984", "author": "George Orwell", "publishedYear": 1949}))
        .await;
    let (_, dropped) = server
        .post(json!({"title": "Animal Farm", "author": "George Orwell", "publishedYear": 1945}))
        .await;
    server
        .delete(dropped["id"].as_str().unwrap())
        .await;
    server.stop().await;
    store.close().unwrap();
    drop(store);

    let store: Arc<dyn BookStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let server = TestServer::start(store).await;
    let (_, list) = server.get("/api/books").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0], kept);
    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_distinct_ids() {
    let server = memory_server().await;

    let mut tasks = Vec::new();
    for i in 0..16 {
        let client = server.client.clone();
        let url = server.url("/api/books");
        tasks.push(tokio::spawn(async move {
            let resp = client
                .post(url)
                .json(&json!({"title": format!("Volume {}", i), "author": "Anon", "publishedYear": 1900 + i}))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
            let book: Value = resp.json().await.unwrap();
            book["id"].as_str().unwrap().to_string()
        }));
    }

    let mut ids = HashSet::new();
    for task in tasks {
        ids.insert(task.await.unwrap());
    }
    assert_eq!(ids.len(), 16);

    let (_, list) = server.get("/api/books").await;
    assert_eq!(list.as_array().unwrap().len(), 16);

    server.stop().await;
}

#[tokio::test]
async fn test_unrouted_verbs_are_json_404() {
    let server = memory_server().await;

    let resp = server
        .client
        .patch(server.url("/api/books"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Route not found");

    let resp = server
        .client
        .delete(server.url("/api/books"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = server
        .client
        .post(server.url("/api/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    server.stop().await;
}

#[tokio::test]
async fn test_malformed_json_is_400_on_create_and_replace() {
    let server = memory_server().await;
    let (_, created) = server
        .post(json!({"title": "1984", "author": "George Orwell", "publishedYear": 1949}))
        .await;
    let id = created["id"].as_str().unwrap();

    for (method, path) in [
        (reqwest::Method::POST, "/api/books".to_string()),
        (reqwest::Method::PUT, format!("/api/books/{}", id)),
    ] {
        let resp = server
            .client
            .request(method.clone(), server.url(&path))
            .header("content-type", "application/json")
            .body("{\"title\": \"1984\",")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{} {}", method, path);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    let (_, fetched) = server.get(&format!("/api/books/{}", id)).await;
    assert_eq!(fetched, created);

    server.stop().await;
}
