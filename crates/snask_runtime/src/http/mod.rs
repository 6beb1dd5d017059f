//! Embedded HTTP service.
//!
//! A route table (an object keyed by `"METHOD path"` or `"path"`) maps each
//! request to a route value. Handler routes call back into compiled code
//! through the [`Dispatcher`](crate::dispatch::Dispatcher); the resulting
//! value is turned into a response by [`Response::from_route_value`].

mod lookup;
mod request;
mod response;
mod router;
mod server;

pub use lookup::{cookie_get, query_get};
pub use request::{Method, Request, RequestError, find_header_end, read_request};
pub use response::{Response, reason_phrase};
pub use router::{HANDLER_KEY, handler_name, resolve_route};
pub use server::{ConnectionLoop, HttpService, SequentialLoop, serve, serve_listener};
