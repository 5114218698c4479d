pub mod company_settings;
pub mod holiday;
pub mod leave_allocation;
pub mod leave_request;
pub mod memory;
pub mod repository;
mod request_span;
pub mod transaction;
pub mod work_from_home;

pub use memory::InMemoryCalendarStore;
pub use repository::*;
pub use transaction::PgUnitOfWork;
