use std::sync::Arc;

use adapter::event::TracingEventPublisher;
use adapter::repository::booking::BookingRepositoryImpl;
use adapter::repository::coach::CoachRateRepositoryImpl;
use adapter::repository::facility::FacilityRepositoryImpl;
use adapter::{database::ConnectionPool, repository::health::HealthCheckRepositoryImpl};
use kernel::event::EventPublisher;
use kernel::repository::booking::BookingRepository;
use kernel::repository::coach::CoachRateRepository;
use kernel::repository::facility::FacilityRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::service::booking::BookingService;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    facility_repository: Arc<dyn FacilityRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    booking_service: Arc<BookingService>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let facility_repository: Arc<dyn FacilityRepository> =
            Arc::new(FacilityRepositoryImpl::new(pool.clone()));
        let booking_repository: Arc<dyn BookingRepository> =
            Arc::new(BookingRepositoryImpl::new(pool.clone()));
        let coach_rate_repository: Arc<dyn CoachRateRepository> =
            Arc::new(CoachRateRepositoryImpl::new(pool.clone()));
        let event_publisher: Arc<dyn EventPublisher> = Arc::new(TracingEventPublisher);
        let booking_service = Arc::new(BookingService::new(
            booking_repository.clone(),
            facility_repository.clone(),
            coach_rate_repository,
            event_publisher,
        ));
        Self {
            health_check_repository,
            facility_repository,
            booking_repository,
            booking_service,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn facility_repository(&self) -> Arc<dyn FacilityRepository> {
        self.facility_repository.clone()
    }

    pub fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking_repository.clone()
    }

    pub fn booking_service(&self) -> Arc<BookingService> {
        self.booking_service.clone()
    }
}
