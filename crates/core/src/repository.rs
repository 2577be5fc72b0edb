//! Persistence seams of the booking core.
//!
//! Implementations live in `chairbook-db`. Every method reports storage
//! failures as `BookingError::Backend` or `BookingError::Timeout`; "not
//! found" is an `Ok(None)` so callers decide which entity is missing.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::BookingResult;
use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::schedule::{Barber, BarberSchedule, ShopHours};
use crate::models::service::Service;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn get_barber(&self, barber_id: Uuid) -> BookingResult<Option<Barber>>;

    async fn get_shop_hours(&self, barbershop_id: Uuid) -> BookingResult<Option<ShopHours>>;

    /// Replaces the weekly hours of a barber. Returns `None` for an unknown barber.
    async fn update_barber_schedule(
        &self,
        barber_id: Uuid,
        schedule: &BarberSchedule,
    ) -> BookingResult<Option<Barber>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn get_service(&self, id: Uuid) -> BookingResult<Option<Service>>;

    async fn create_service(&self, service: &Service) -> BookingResult<Service>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn get_appointment(&self, id: Uuid) -> BookingResult<Option<Appointment>>;

    /// Appointments of a barber on a date whose status is in `statuses`,
    /// ordered by start time.
    async fn list_for_barber_on_date(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
        statuses: &[AppointmentStatus],
    ) -> BookingResult<Vec<Appointment>>;

    /// All appointments of a client, any status, ordered by date and start time.
    async fn list_for_client(&self, client_id: Uuid) -> BookingResult<Vec<Appointment>>;

    /// Inserts a new appointment.
    ///
    /// Must be atomic with respect to the no-overlap invariant: if a pending
    /// or confirmed appointment of the same barber on the same date
    /// intersects the new one at write time, nothing is written and
    /// `BookingError::SlotUnavailable` is returned.
    async fn insert_appointment(&self, appointment: &Appointment) -> BookingResult<Appointment>;

    /// Writes `appointment` only if the stored version still equals
    /// `appointment.version`, and returns the stored copy with the next
    /// version. Returns `None` when the row is missing or another write
    /// landed since it was read.
    async fn update_appointment(
        &self,
        appointment: &Appointment,
    ) -> BookingResult<Option<Appointment>>;
}
