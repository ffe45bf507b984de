use framecast::files::StaticFiles;
use framecast::http::request::Method;
use framecast::http::response::StatusCode;

fn fixture_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("viewer.html"), b"<html>viewer</html>").unwrap();
    std::fs::create_dir(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets/app.js"), b"console.log('hi')").unwrap();
    dir
}

#[tokio::test]
async fn test_get_existing_file() {
    let root = fixture_root();
    let files = StaticFiles::new(root.path().to_path_buf());

    let resp = files.respond(&Method::GET, "/viewer.html").await;

    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.body, b"<html>viewer</html>".to_vec());
    assert_eq!(resp.headers.get("Content-Length").unwrap(), "19");
}

#[tokio::test]
async fn test_get_nested_file() {
    let root = fixture_root();
    let files = StaticFiles::new(root.path().to_path_buf());

    let resp = files.respond(&Method::GET, "/assets/app.js").await;

    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.body, b"console.log('hi')".to_vec());
}

#[tokio::test]
async fn test_head_reports_length_without_body() {
    let root = fixture_root();
    let files = StaticFiles::new(root.path().to_path_buf());

    let resp = files.respond(&Method::HEAD, "/viewer.html").await;

    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.headers.get("Content-Length").unwrap(), "19");
    assert!(resp.body.is_empty());
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let root = fixture_root();
    let files = StaticFiles::new(root.path().to_path_buf());

    let resp = files.respond(&Method::GET, "/nope.html").await;

    assert_eq!(resp.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_directory_is_forbidden() {
    let root = fixture_root();
    let files = StaticFiles::new(root.path().to_path_buf());

    let resp = files.respond(&Method::GET, "/assets").await;
    assert_eq!(resp.status, StatusCode::Forbidden);

    // The root itself is a directory too
    let resp = files.respond(&Method::GET, "/").await;
    assert_eq!(resp.status, StatusCode::Forbidden);
}

#[tokio::test]
async fn test_traversal_is_forbidden() {
    let root = fixture_root();
    let files = StaticFiles::new(root.path().to_path_buf());

    let resp = files.respond(&Method::GET, "/../etc/passwd").await;
    assert_eq!(resp.status, StatusCode::Forbidden);

    let resp = files.respond(&Method::GET, "/assets/../../secret").await;
    assert_eq!(resp.status, StatusCode::Forbidden);
}

#[tokio::test]
async fn test_other_methods_not_allowed() {
    let root = fixture_root();
    let files = StaticFiles::new(root.path().to_path_buf());

    for method in [Method::POST, Method::PUT, Method::DELETE] {
        let resp = files.respond(&method, "/viewer.html").await;
        assert_eq!(resp.status, StatusCode::MethodNotAllowed);
    }
}
