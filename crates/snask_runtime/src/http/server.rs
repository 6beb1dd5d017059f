use std::io::{self, ErrorKind, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use snask_core::Value;

use super::request::{Request, read_request};
use super::response::Response;
use super::router::{handler_name, resolve_route};
use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::errors::ServeError;

/// Maps raw requests to responses using a route table and the callback
/// registry. Holds no connection state.
pub struct HttpService<'a> {
    routes: Value,
    dispatcher: &'a Dispatcher,
}

impl<'a> HttpService<'a> {
    pub fn new(routes: Value, dispatcher: &'a Dispatcher) -> Result<Self, ServeError> {
        if !routes.is_object() {
            return Err(ServeError::RoutesNotObject(routes.type_name()));
        }
        Ok(Self { routes, dispatcher })
    }

    /// Handles one buffered request. Malformed request lines get 400 before
    /// any routing happens.
    pub fn handle(&self, raw: &[u8]) -> Response {
        match Request::parse(raw) {
            Ok(req) => self.respond(&req),
            Err(e) => {
                log::debug!("rejecting request: {e}");
                Response::bad_request()
            }
        }
    }

    pub fn respond(&self, req: &Request) -> Response {
        let Some(mut value) = resolve_route(&self.routes, req.method, &req.path) else {
            return Response::not_found();
        };
        if let Some(name) = handler_name(&value) {
            value = self.dispatcher.call5(
                &name,
                &Value::str(req.method.as_str()),
                &Value::str(req.path.as_str()),
                &Value::str(req.query.as_str()),
                &Value::str(req.body.as_str()),
                &Value::str(req.cookie_header()),
            );
        }
        Response::from_route_value(&value)
    }
}

/// Accept loop strategy. The service itself is connection-agnostic, so a
/// concurrent loop only has to replace this.
pub trait ConnectionLoop {
    /// Runs until the listener fails or the configured request limit is
    /// reached. Returns the number of connections handled.
    fn run(&self, listener: &TcpListener, service: &HttpService<'_>) -> Result<usize, ServeError>;
}

/// Consecutive failed accepts after which the listener is considered broken.
const MAX_ACCEPT_FAILURES: u32 = 32;
const ACCEPT_BACKOFF: Duration = Duration::from_millis(10);

/// Errors that mean the listener itself is unusable.
fn accept_error_is_fatal(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::InvalidInput | ErrorKind::NotConnected | ErrorKind::Unsupported
    )
}

/// One connection at a time: read the whole request, write the whole
/// response, close, then accept the next.
pub struct SequentialLoop {
    pub max_request_bytes: usize,
    pub max_requests: Option<usize>,
}

impl SequentialLoop {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            max_request_bytes: config.max_request_bytes,
            max_requests: config.max_requests,
        }
    }

    fn serve_one(&self, mut stream: TcpStream, service: &HttpService<'_>) {
        let started = Instant::now();
        let raw = match read_request(&mut stream, self.max_request_bytes) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("failed to read request: {e}");
                return;
            }
        };
        let resp = service.handle(&raw);
        let line = raw.split(|&b| b == b'\n').next().unwrap_or_default();
        log::info!(
            "{} -> {} ({} bytes, {:?})",
            String::from_utf8_lossy(line).trim_end(),
            resp.status,
            resp.body.len(),
            started.elapsed()
        );
        if let Err(e) = stream.write_all(&resp.to_bytes()) {
            log::warn!("failed to write response: {e}");
        }
        let _ = stream.flush();
    }

    /// Feeds accepted connections to `handle`. Per-connection accept
    /// failures are logged and skipped; a fatal error, or too many failures
    /// in a row, ends the loop.
    fn drive<S>(
        &self,
        incoming: impl Iterator<Item = io::Result<S>>,
        mut handle: impl FnMut(S),
    ) -> Result<usize, ServeError> {
        let mut handled = 0usize;
        let mut failures = 0u32;
        for stream in incoming {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) if accept_error_is_fatal(&e) => return Err(ServeError::Accept(e)),
                Err(e) => {
                    failures += 1;
                    if failures >= MAX_ACCEPT_FAILURES {
                        return Err(ServeError::Accept(e));
                    }
                    log::warn!("accept failed: {e}");
                    thread::sleep(ACCEPT_BACKOFF);
                    continue;
                }
            };
            failures = 0;
            handle(stream);
            handled += 1;
            if self.max_requests.is_some_and(|max| handled >= max) {
                break;
            }
        }
        Ok(handled)
    }
}

impl ConnectionLoop for SequentialLoop {
    fn run(&self, listener: &TcpListener, service: &HttpService<'_>) -> Result<usize, ServeError> {
        self.drive(listener.incoming(), |stream| self.serve_one(stream, service))
    }
}

/// Binds `config.addr()` and serves `routes` sequentially.
pub fn serve(
    config: &ServerConfig,
    routes: Value,
    dispatcher: &Dispatcher,
) -> Result<usize, ServeError> {
    let service = HttpService::new(routes, dispatcher)?;
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).map_err(|source| ServeError::Bind {
        addr: addr.clone(),
        source,
    })?;
    log::info!("listening on {addr}");
    SequentialLoop::from_config(config).run(&listener, &service)
}

/// Serves on an already bound listener. `config.host` and `config.port` are
/// ignored.
pub fn serve_listener(
    listener: &TcpListener,
    config: &ServerConfig,
    routes: Value,
    dispatcher: &Dispatcher,
) -> Result<usize, ServeError> {
    let service = HttpService::new(routes, dispatcher)?;
    SequentialLoop::from_config(config).run(listener, &service)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(max_requests: Option<usize>) -> SequentialLoop {
        SequentialLoop {
            max_request_bytes: 1024,
            max_requests,
        }
    }

    #[test]
    fn transient_accept_errors_are_skipped() {
        let incoming = vec![
            Ok(1),
            Err(io::Error::from(ErrorKind::ConnectionAborted)),
            Err(io::Error::from(ErrorKind::ConnectionReset)),
            Ok(2),
            Ok(3),
        ];
        let mut seen = Vec::new();
        let handled = seq(Some(3))
            .drive(incoming.into_iter(), |n| seen.push(n))
            .unwrap();
        assert_eq!(handled, 3);
        assert_eq!(seen, [1, 2, 3]);
    }

    #[test]
    fn fatal_accept_error_ends_the_loop() {
        let incoming = vec![Ok(1), Err(io::Error::from(ErrorKind::InvalidInput)), Ok(2)];
        let mut seen = Vec::new();
        let err = seq(None)
            .drive(incoming.into_iter(), |n| seen.push(n))
            .unwrap_err();
        assert!(matches!(err, ServeError::Accept(_)));
        assert_eq!(seen, [1]);
    }

    #[test]
    fn repeated_accept_failures_give_up() {
        let incoming = (0..MAX_ACCEPT_FAILURES)
            .map(|_| Err::<u8, _>(io::Error::from(ErrorKind::ConnectionAborted)));
        assert!(seq(None).drive(incoming, |_| {}).is_err());
    }
}
