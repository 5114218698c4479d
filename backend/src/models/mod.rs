//! Data models shared across database access, the propagation engine and API handlers.

pub mod holiday;
pub mod leave_request;
pub mod request;
pub mod settings;
pub mod work_from_home;
