use std::sync::Arc;

use crate::{config::Config, services::holiday::HolidayServiceTrait};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub holiday_service: Arc<dyn HolidayServiceTrait>,
}

impl AppState {
    pub fn new(config: Config, holiday_service: Arc<dyn HolidayServiceTrait>) -> Self {
        Self {
            config,
            holiday_service,
        }
    }
}
