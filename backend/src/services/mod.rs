pub mod holiday;
pub mod leave_adjuster;
pub mod propagation;
pub mod validator;
pub mod wfh_adjuster;
pub mod working_day;

pub use holiday::{HolidayMutation, HolidayService, HolidayServiceTrait, HolidayWorkflow};
pub use propagation::{HolidayChange, HolidayPropagator, PropagationReport};
pub use working_day::WorkingCalendar;
