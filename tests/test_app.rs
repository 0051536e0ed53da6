use bytes::Bytes;
use http::header::COOKIE;
use tempfile::TempDir;
use wicket::{Config, Response, Router, app};

const SECRET: &str = "1234567890";

fn setup(guard_echo: bool) -> (Router, TempDir) {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("pic.jpeg"), [0xffu8, 0xd8, 0xff, 0xe0]).unwrap();
    let config = Config {
        static_root: root.path().to_path_buf(),
        secret: SECRET.to_owned(),
        guard_echo,
        ..Config::default()
    };
    (app::router(&config), root)
}

fn req(method: &str, uri: &str) -> http::request::Builder {
    http::Request::builder().method(method).uri(uri)
}

async fn send(app: &Router, builder: http::request::Builder, body: &str) -> Response {
    app.handle(builder.body(Bytes::from(body.to_owned())).unwrap()).await
}

#[tokio::test]
async fn test_project_info_echoes_path_and_query() {
    let (app, _root) = setup(false);
    for (p, i) in [("112", "99"), ("abc", "x y"), ("0", "")] {
        let uri = format!("/project/{p}/info?invoiceID={}", i.replace(' ', "%20"));
        let res = send(&app, req("GET", &uri), "").await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.header("content-type"), Some("application/json"));

        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(json["projectID"], p);
        assert_eq!(json["invoiceID"], i);
    }
}

#[tokio::test]
async fn test_redirect_is_303_and_target_serves_200() {
    let (app, _root) = setup(false);
    let res = send(&app, req("GET", "/redirect"), "").await;
    assert_eq!(res.status_code(), 303);

    let location = res.header("location").unwrap().to_owned();
    let followed = send(&app, req("GET", &location), "").await;
    assert_eq!(followed.status_code(), 200);
}

#[tokio::test]
async fn test_headers_without_cookie_is_401() {
    let (app, _root) = setup(false);
    let res = send(&app, req("GET", "/headers"), "").await;
    assert_eq!(res.status_code(), 401);
    assert_eq!(res.header("xauth"), None);
}

#[tokio::test]
async fn test_headers_with_wrong_cookie_is_401() {
    let (app, _root) = setup(false);
    let res = send(&app, req("GET", "/headers").header(COOKIE, "pass=nonono"), "").await;
    assert_eq!(res.status_code(), 401);
}

#[tokio::test]
async fn test_headers_with_secret_is_200_with_xauth() {
    let (app, _root) = setup(false);
    let res = send(&app, req("GET", "/headers").header(COOKIE, format!("pass={SECRET}")), "").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("xauth"), Some("secret"));
}

#[tokio::test]
async fn test_head_headers_with_secret_is_200_and_empty() {
    let (app, _root) = setup(false);
    let res = send(&app, req("HEAD", "/headers").header(COOKIE, format!("pass={SECRET}")), "").await;
    assert_eq!(res.status_code(), 200);
    assert!(res.body().is_empty());
    assert_eq!(res.header("xauth"), Some("secret"));

    let res = send(&app, req("HEAD", "/headers"), "").await;
    assert_eq!(res.status_code(), 401);
}

#[tokio::test]
async fn test_post_headers_echoes_msg() {
    let (app, _root) = setup(false);
    for msg in ["Hello", "", "ünïcödé", "line\nbreak", "{\"nested\":true}"] {
        let body = serde_json::json!({ "msg": msg }).to_string();
        let res = send(&app, req("POST", "/headers?projectID=112"), &body).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), msg.as_bytes());
    }
}

#[tokio::test]
async fn test_post_headers_bad_bodies_are_400() {
    let (app, _root) = setup(false);
    for body in ["", "not json", "{\"other\":\"x\"}", "\"Hello\""] {
        let res = send(&app, req("POST", "/headers"), body).await;
        assert_eq!(res.status_code(), 400, "{body:?}");
    }
}

#[tokio::test]
async fn test_guard_echo_gates_post() {
    let (app, _root) = setup(true);
    let body = r#"{"msg":"Hello"}"#;

    let res = send(&app, req("POST", "/headers"), body).await;
    assert_eq!(res.status_code(), 401);

    let res = send(&app, req("POST", "/headers").header(COOKIE, format!("pass={SECRET}")), body).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.body(), b"Hello");
    assert_eq!(res.header("xauth"), Some("secret"));
}

#[tokio::test]
async fn test_file_is_served_with_content_type() {
    let (app, _root) = setup(false);
    let res = send(&app, req("GET", "/file/pic.jpeg"), "").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("content-type"), Some("image/jpeg"));
    assert_eq!(res.body(), &[0xff, 0xd8, 0xff, 0xe0]);
}

#[tokio::test]
async fn test_file_traversal_and_missing_are_404() {
    let (app, _root) = setup(false);
    for uri in ["/file/../secret", "/file/..%2Fsecret", "/file/%2Fetc%2Fpasswd", "/file/nope.jpeg"] {
        let res = send(&app, req("GET", uri), "").await;
        assert_eq!(res.status_code(), 404, "{uri}");
    }
}

#[tokio::test]
async fn test_inline_is_hello_regardless_of_input() {
    let (app, _root) = setup(false);
    let res = send(&app, req("GET", "/inline"), "").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.body(), b"Hello");

    let noisy = req("GET", "/inline?a=1&b")
        .header(COOKIE, "pass=nonono")
        .header("x-anything", "y");
    let res = send(&app, noisy, "").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.body(), b"Hello");
}

#[tokio::test]
async fn test_unknown_path_and_wrong_method_are_404() {
    let (app, _root) = setup(false);
    assert_eq!(send(&app, req("GET", "/nope"), "").await.status_code(), 404);
    assert_eq!(send(&app, req("POST", "/inline"), "").await.status_code(), 404);
    assert_eq!(send(&app, req("PUT", "/headers"), "").await.status_code(), 404);
}

#[tokio::test]
async fn test_healthz() {
    let (app, _root) = setup(false);
    let res = send(&app, req("GET", "/healthz"), "").await;
    assert_eq!(res.body(), b"ok");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_do_not_share_auth_state() {
    let (app, _root) = setup(false);
    let app = std::sync::Arc::new(app);

    let mut handles = Vec::new();
    for n in 0..64 {
        let app = std::sync::Arc::clone(&app);
        handles.push(tokio::spawn(async move {
            let authorized = n % 2 == 0;
            let cookie = if authorized { format!("pass={SECRET}") } else { "pass=nonono".to_owned() };
            let res = send(&app, req("GET", "/headers").header(COOKIE, cookie), "").await;
            (authorized, res.status_code(), res.header("xauth").is_some())
        }));
    }

    for handle in handles {
        let (authorized, status, stamped) = handle.await.unwrap();
        if authorized {
            assert_eq!((status, stamped), (200, true));
        } else {
            assert_eq!((status, stamped), (401, false));
        }
    }
}
