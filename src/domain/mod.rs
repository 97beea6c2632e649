//! Domain models for TMS Core

pub mod common;
pub mod context;
pub mod locale;
pub mod translation;
pub mod user;

pub use common::StringUuid;
pub use context::*;
pub use locale::*;
pub use translation::*;
pub use user::*;
