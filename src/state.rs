use std::sync::Arc;
use crate::domain::ports::{EmployeeRepository, FacilityRepository, RequestRepository};
use crate::domain::services::employee_cache::EmployeeIdCache;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub employee_repo: Arc<dyn EmployeeRepository>,
    pub facility_repo: Arc<dyn FacilityRepository>,
    pub request_repo: Arc<dyn RequestRepository>,
    pub employee_cache: Arc<EmployeeIdCache>,
}

impl AppState {
    pub fn new(
        config: Config,
        employee_repo: Arc<dyn EmployeeRepository>,
        facility_repo: Arc<dyn FacilityRepository>,
        request_repo: Arc<dyn RequestRepository>,
    ) -> Self {
        let employee_cache = Arc::new(EmployeeIdCache::new(employee_repo.clone()));
        Self {
            config,
            employee_repo,
            facility_repo,
            request_repo,
            employee_cache,
        }
    }
}
