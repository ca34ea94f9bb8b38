mod common;

use tollgate::middleware::HandlerExt;
use tollgate::static_files::{file_server, file_server_subdir, try_file_server_subdir};
use tollgate::{Mux, Request, StatusCode, respond};

use common::{captured_log, fixtures};

#[tokio::test]
async fn serves_files_under_a_prefix() {
    let handler = file_server_subdir(fixtures(), "public", "/static/");

    let readme = respond(&handler, Request::get("/static/docs/readme.txt")).await;
    assert_eq!(readme.status_code(), StatusCode::OK);
    assert_eq!(readme.body(), b"readme\n");
    assert_eq!(readme.header("content-type"), Some("text/plain"));

    let root = respond(&handler, Request::get("/static/")).await;
    assert_eq!(root.body(), b"<h1>public</h1>\n");
}

#[tokio::test]
async fn directory_urls_under_the_root_prefix_are_hidden() {
    let handler = file_server(fixtures(), "");

    let listing = respond(&handler, Request::get("/public/docs/")).await;
    assert_eq!(listing.status_code(), StatusCode::NOT_FOUND);

    let file = respond(&handler, Request::get("/public/docs/readme.txt")).await;
    assert_eq!(file.status_code(), StatusCode::OK);
}

#[test]
#[should_panic(expected = "cannot resolve `nope`")]
fn nonexistent_subdirectory_fails_at_construction() {
    let _ = file_server_subdir(fixtures(), "nope", "/static/");
}

#[test]
fn nonexistent_subdirectory_error_is_returned() {
    assert!(try_file_server_subdir(fixtures(), "nope", "/").is_err());
}

#[tokio::test]
async fn mounted_in_a_mux_behind_the_logger() {
    let (log, lines) = captured_log();
    let app = Mux::new()
        .handle("/static/", file_server_subdir(fixtures(), "public", "/static/"))
        .with(log);

    let ok = respond(&app, Request::get("/static/index.html")).await;
    assert_eq!(ok.status_code(), StatusCode::OK);

    let hidden = respond(&app, Request::get("/static/x/static/")).await;
    assert_eq!(hidden.status_code(), StatusCode::NOT_FOUND);

    let lines = lines.lock().unwrap();
    assert!(lines[0].contains("HTTP GET /static/index.html - 200 "), "{}", lines[0]);
    assert!(lines[1].contains("HTTP GET /static/x/static/ - 404 "), "{}", lines[1]);
}
