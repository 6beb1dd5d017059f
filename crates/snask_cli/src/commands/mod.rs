pub(crate) mod common;
pub(crate) mod json;
pub(crate) mod serve;
