//! HTTP/1.1 server and graceful shutdown.
//!
//! One tokio task per connection, hyper's HTTP/1 state machine inside it.
//! Each request's body is read in full before routing, bounded in both size
//! and time, so a slow or oversized upload becomes a 408 or 413 instead of a
//! stuck task.
//!
//! On SIGTERM or Ctrl-C the server:
//! 1. stops accepting,
//! 2. asks every open connection to finish its current request and close,
//! 3. waits for those connection tasks, then returns from [`Server::serve`].

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{Error, Rejection};
use crate::response::IntoResponse;
use crate::router::Router;

const DEFAULT_MAX_BODY: usize = 1024 * 1024;
const DEFAULT_BODY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug)]
struct Limits {
    max_body_bytes: usize,
    body_timeout: Duration,
}

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
    limits: Limits,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    pub fn bind(addr: SocketAddr) -> Self {
        Self {
            addr,
            limits: Limits { max_body_bytes: DEFAULT_MAX_BODY, body_timeout: DEFAULT_BODY_TIMEOUT },
        }
    }

    /// Bind address and request limits taken from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::bind(config.bind)
            .max_body_bytes(config.max_body_bytes)
            .body_timeout(config.body_timeout())
    }

    /// Request bodies above this many bytes are answered with 413.
    pub fn max_body_bytes(mut self, max: usize) -> Self {
        self.limits.max_body_bytes = max;
        self
    }

    /// Headers and body must arrive within this long; a late body is
    /// answered with 408.
    pub fn body_timeout(mut self, timeout: Duration) -> Self {
        self.limits.body_timeout = timeout;
        self
    }

    /// Binds, then serves `router` until SIGTERM or Ctrl-C and a full drain.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve_with_shutdown(listener, router, shutdown_signal()).await
    }

    /// Serves `router` on an already-bound listener until `shutdown`
    /// resolves, then drains in-flight connections.
    pub async fn serve_with_shutdown(
        self,
        listener: TcpListener,
        router: Router,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let router = Arc::new(router);
        let limits = self.limits;

        info!(addr = %listener.local_addr()?, "wicket listening");

        let mut tasks = tokio::task::JoinSet::new();
        let (drain_tx, drain_rx) = watch::channel(false);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Checked first so a pending shutdown wins over queued accepts.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let mut drain = drain_rx.clone();
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { dispatch(&router, limits, req, peer).await }
                        });

                        let conn = http1::Builder::new()
                            .timer(TokioTimer::new())
                            .header_read_timeout(limits.body_timeout)
                            .serve_connection(io, svc);
                        tokio::pin!(conn);

                        tokio::select! {
                            res = conn.as_mut() => {
                                if let Err(e) = res {
                                    error!(%peer, "connection error: {e}");
                                }
                                return;
                            }
                            _ = drain.changed() => conn.as_mut().graceful_shutdown(),
                        }

                        if let Err(e) = conn.await {
                            error!(%peer, "connection error during drain: {e}");
                        }
                    });
                }

                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        let _ = drain_tx.send(true);
        while tasks.join_next().await.is_some() {}

        info!("wicket stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Reads the body, routes, and logs one request.
///
/// Never fails: every problem is already a response by the time it gets here.
async fn dispatch(
    router: &Router,
    limits: Limits,
    req: hyper::Request<Incoming>,
    peer: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let method = parts.method.clone();
    let path = parts.uri.path().to_owned();

    let response = match read_body(body, limits).await {
        Ok(bytes) => router.dispatch(parts, bytes).await,
        Err(rejection) => rejection.into_response(),
    };

    info!(
        %peer,
        %method,
        path = %path,
        status = response.status_code(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "request"
    );
    Ok(response.into_http())
}

async fn read_body(body: Incoming, limits: Limits) -> Result<Bytes, Rejection> {
    let limited = Limited::new(body, limits.max_body_bytes);
    match tokio::time::timeout(limits.body_timeout, limited.collect()).await {
        Err(_) => Err(Rejection::Timeout),
        Ok(Ok(collected)) => Ok(collected.to_bytes()),
        Ok(Err(e)) if e.is::<LengthLimitError>() => Err(Rejection::PayloadTooLarge),
        Ok(Err(e)) => Err(Rejection::BadRequest(e.to_string())),
    }
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on SIGTERM (Unix) or Ctrl-C, whichever comes first.
///
/// A signal handler that cannot be installed is logged and that arm never
/// fires; the other one still can.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => { s.recv().await; }
            Err(e) => {
                error!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}
