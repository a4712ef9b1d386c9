use agenda_core::errors::TimeResult;
use agenda_core::models::{
    appointment::{
        Appointment, AppointmentStatus, NewAppointment, ReservationOutcome, ScheduledAppointment,
    },
    profile::{ClientProfile, ProfessionalProfile},
    schedule::{ScheduleOverride, WorkScheduleBlock},
    service::Service,
};
use agenda_core::store::{AppointmentStore, ProfileStore, ScheduleStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

// Mock store for testing
mock! {
    pub BookingStore {}

    #[async_trait]
    impl ScheduleStore for BookingStore {
        async fn work_blocks(&self, professional_id: Uuid) -> TimeResult<Vec<WorkScheduleBlock>>;

        async fn overrides(&self, professional_id: Uuid) -> TimeResult<Vec<ScheduleOverride>>;
    }

    #[async_trait]
    impl AppointmentStore for BookingStore {
        async fn appointments_between(
            &self,
            professional_id: Uuid,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> TimeResult<Vec<ScheduledAppointment>>;

        async fn insert_if_free(&self, appointment: NewAppointment) -> TimeResult<ReservationOutcome>;

        async fn appointment(&self, id: Uuid) -> TimeResult<Option<Appointment>>;

        async fn update_status(
            &self,
            id: Uuid,
            from: AppointmentStatus,
            to: AppointmentStatus,
        ) -> TimeResult<Option<Appointment>>;

        async fn appointments_for_professional(
            &self,
            professional_id: Uuid,
            status: Option<AppointmentStatus>,
        ) -> TimeResult<Vec<Appointment>>;

        async fn appointments_for_client(&self, client_id: Uuid) -> TimeResult<Vec<Appointment>>;
    }

    #[async_trait]
    impl ProfileStore for BookingStore {
        async fn service(&self, id: Uuid) -> TimeResult<Option<Service>>;

        async fn professional(&self, id: Uuid) -> TimeResult<Option<ProfessionalProfile>>;

        async fn client(&self, id: Uuid) -> TimeResult<Option<ClientProfile>>;
    }
}
