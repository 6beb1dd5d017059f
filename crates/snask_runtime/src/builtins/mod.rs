pub(super) mod common;
pub(super) mod core;
pub(super) mod conversion;
pub(super) mod math;
pub(super) mod fs;
pub(super) mod path;
pub(super) mod system;
pub(super) mod json;
pub(super) mod http;
pub(super) mod thread;

pub use self::core::*;
pub use conversion::*;
pub use math::*;
pub use fs::*;
pub use path::*;
pub use system::*;
pub use json::*;
pub use http::*;
pub use thread::*;
