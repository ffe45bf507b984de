use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::http::request::Method;
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Serves GET and HEAD requests for regular files under a fixed document
/// root.
///
/// Deliberately minimal: no directory listing, no MIME detection, no cache
/// headers, no range requests. The viewer page and a handful of assets are
/// all this ever serves.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Answers one request. Infallible from the connection's point of view:
    /// every filesystem problem maps to a status code.
    pub async fn respond(&self, method: &Method, path: &str) -> Response {
        let head = match method {
            Method::GET => false,
            Method::HEAD => true,
            _ => return Response::method_not_allowed(),
        };

        let Some(file_path) = self.resolve(path) else {
            debug!(path, "rejecting path outside html root");
            return Response::forbidden();
        };
        debug!(file = %file_path.display(), "serving file request");

        let meta = match tokio::fs::metadata(&file_path).await {
            Ok(meta) => meta,
            Err(e) => {
                debug!(file = %file_path.display(), error = %e, "file stat failed");
                return match e.kind() {
                    ErrorKind::PermissionDenied => Response::forbidden(),
                    ErrorKind::NotFound => Response::not_found(),
                    _ => Response::internal_error(),
                };
            }
        };

        if !meta.is_file() {
            debug!(file = %file_path.display(), "not a regular file");
            return Response::forbidden();
        }

        if head {
            return ResponseBuilder::new(StatusCode::Ok)
                .header("Content-Length", meta.len().to_string())
                .build();
        }

        match tokio::fs::read(&file_path).await {
            Ok(contents) => Response::ok(contents),
            Err(e) => {
                debug!(file = %file_path.display(), error = %e, "failed reading file contents");
                Response::internal_error()
            }
        }
    }

    /// Joins the request path under the root. Any `..` segment is refused:
    /// the document root is a jail.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        for component in relative.components() {
            if matches!(component, Component::ParentDir) {
                return None;
            }
        }
        Some(self.root.join(relative))
    }
}
