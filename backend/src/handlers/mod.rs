pub mod holidays;

pub use holidays::router as holiday_routes;
