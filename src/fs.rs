//! Static file responder.
//!
//! Serves files from one directory, the virtual root. A name is resolved in
//! two passes: first lexically (no `..`, no absolute paths), then on disk
//! (the canonical path must still sit under the canonical root, which
//! catches symlinks pointing outside). A name failing either pass is simply
//! not found.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use tokio::io::AsyncReadExt;

use crate::error::Rejection;
use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;

const DEFAULT_MAX_BYTES: u64 = 16 * 1024 * 1024;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Serves files under `root`.
///
/// ```rust,no_run
/// use wicket::{Router, StaticFiles};
///
/// let files = StaticFiles::new("public");
/// let app = Router::new().get("/file/{name}", files.handler("name"));
/// ```
#[derive(Clone, Debug)]
pub struct StaticFiles {
    root: PathBuf,
    max_bytes: u64,
    timeout: Duration,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), max_bytes: DEFAULT_MAX_BYTES, timeout: DEFAULT_TIMEOUT }
    }

    /// Files larger than this are refused with 413.
    pub fn max_bytes(mut self, max: u64) -> Self {
        self.max_bytes = max;
        self
    }

    /// Lookups and reads that take longer than this are abandoned with 408.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `name` and returns it with a content type guessed from its
    /// extension.
    pub async fn serve(&self, name: &str) -> Result<Response, Rejection> {
        let relative = sanitize(name).ok_or(Rejection::NotFound)?;
        let lookup = async {
            let path = self.resolve(&relative).await?;
            let body = self.read(&path).await?;
            Ok::<_, Rejection>((path, body))
        };

        let (path, body) = tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| Rejection::Timeout)??;

        let mime = mime_guess::from_path(&path).first_or_octet_stream();
        Ok(Response::builder().bytes(mime.as_ref(), body))
    }

    /// Handler serving the file named by path parameter `param`.
    pub fn handler(&self, param: &'static str) -> impl Handler + use<> {
        let files = Arc::new(self.clone());
        move |req: Request| {
            let files = Arc::clone(&files);
            async move {
                let name = req.param(param).unwrap_or_default();
                files.serve(name).await
            }
        }
    }

    async fn resolve(&self, relative: &Path) -> Result<PathBuf, Rejection> {
        let root = tokio::fs::canonicalize(&self.root).await.map_err(io_rejection)?;
        let path = tokio::fs::canonicalize(root.join(relative)).await.map_err(io_rejection)?;
        if !path.starts_with(&root) {
            return Err(Rejection::NotFound);
        }
        Ok(path)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, Rejection> {
        let file = tokio::fs::File::open(path).await.map_err(io_rejection)?;
        let meta = file.metadata().await.map_err(io_rejection)?;
        if !meta.is_file() {
            return Err(Rejection::NotFound);
        }
        if meta.len() > self.max_bytes {
            return Err(Rejection::PayloadTooLarge);
        }

        // The file may grow between the metadata call and the read; never
        // take more than the limit plus one byte to detect that.
        let mut body = Vec::with_capacity(meta.len() as usize);
        file.take(self.max_bytes + 1).read_to_end(&mut body).await.map_err(io_rejection)?;
        if body.len() as u64 > self.max_bytes {
            return Err(Rejection::PayloadTooLarge);
        }
        Ok(body)
    }
}

/// Percent-decodes `name` and turns it into a path that cannot leave the
/// root. `None` for anything suspicious.
fn sanitize(name: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(name).decode_utf8().ok()?;
    if decoded.contains('\0') || decoded.contains('\\') {
        return None;
    }

    let mut out = PathBuf::new();
    for component in Path::new(&*decoded).components() {
        match component {
            Component::Normal(segment) => out.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!out.as_os_str().is_empty()).then_some(out)
}

fn io_rejection(e: io::Error) -> Rejection {
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Rejection::NotFound,
        _ => Rejection::Internal(format!("static file: {e}")),
    }
}
