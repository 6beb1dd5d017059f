//! Runtime error types and common message constants.

use std::io;

use thiserror::Error;

use crate::dispatch::CallKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("callback {symbol} is registered as {registered}, cannot register it as {requested}")]
    ArityConflict {
        symbol: String,
        registered: CallKind,
        requested: CallKind,
    },
    #[error("invalid callback name {0:?}")]
    InvalidName(String),
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),
    #[error("route table must be an object, got {0}")]
    RoutesNotObject(&'static str),
}

pub mod messages {
    pub const NOT_FOUND: &str = "Not Found";
    pub const BAD_REQUEST: &str = "Bad Request";
    pub const NOT_A_STRING: &str = "Not a string";
    pub const NOT_A_NUMBER: &str = "Not a number";
    pub const NOT_AN_OBJECT: &str = "Not an object";
    pub const BAD_ARGUMENTS: &str = "Bad arguments";
    pub const UNKNOWN_BUILTIN: &str = "Unknown builtin";
}
