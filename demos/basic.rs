//! Minimal wicket example: a JSON endpoint, a cookie-gated echo, and a
//! directory of static files.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -i -X POST http://localhost:3000/notes -d '{"msg":"hi"}'
//!   curl -i -X POST http://localhost:3000/notes -b 'pass=letmein' -d '{"msg":"hi"}'
//!   curl -i http://localhost:3000/file/Cargo.toml
//!   curl -i http://localhost:3000/old-users

use serde::Deserialize;
use wicket::middleware::RequireCookie;
use wicket::{Rejection, Request, Response, Router, Server, StaticFiles, health, redirect};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let gate = RequireCookie::new("pass", "letmein");
    let files = StaticFiles::new(".");

    let app = Router::new()
        .get("/users/{id}", get_user)
        .post("/notes", gate.wrap(create_note))
        .get("/file/{name}", files.handler("name"))
        .get("/old-users", redirect::see_other("/users/1"))
        .get("/healthz", health::liveness);

    if let Err(e) = Server::bind(([0, 0, 0, 0], 3000).into()).serve(app).await {
        eprintln!("server error: {e}");
    }
}

// GET /users/{id}
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::to_json(&serde_json::json!({ "id": id, "name": "alice" }))
}

#[derive(Deserialize)]
struct Note {
    msg: String,
}

// POST /notes, only with the right cookie. Bad JSON is a 400 via `?`.
async fn create_note(req: Request) -> Result<String, Rejection> {
    let note: Note = req.json()?;
    Ok(format!("stored: {}", note.msg))
}
