//! Postgres implementation of the booking repositories.

use async_trait::async_trait;
use chairbook_core::errors::{BookingError, BookingResult};
use chairbook_core::models::appointment::{Appointment, AppointmentStatus};
use chairbook_core::models::schedule::{Barber, BarberSchedule, ShopHours};
use chairbook_core::models::service::Service;
use chairbook_core::repository::{AppointmentRepository, ScheduleRepository, ServiceRepository};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::DbPool;
use crate::repositories::{appointment, schedule, service};

/// SQLSTATE raised when an exclusion constraint rejects a row.
const EXCLUSION_VIOLATION: &str = "23P01";
/// SQLSTATE raised when `statement_timeout` cancels a query.
const QUERY_CANCELED: &str = "57014";

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Maps a storage failure onto the booking error taxonomy.
pub fn classify(error: eyre::Report) -> BookingError {
    let code = match error.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::PoolTimedOut) => {
            return BookingError::Timeout(
                "Timed out waiting for a database connection".to_string(),
            );
        }
        Some(sqlx::Error::Database(db_error)) => db_error.code().map(|code| code.into_owned()),
        _ => None,
    };

    match code.as_deref() {
        Some(EXCLUSION_VIOLATION) => BookingError::SlotUnavailable(
            "The requested interval overlaps an existing appointment".to_string(),
        ),
        Some(QUERY_CANCELED) => BookingError::Timeout("Database statement timed out".to_string()),
        _ => BookingError::Backend(error),
    }
}

#[async_trait]
impl ScheduleRepository for PgStore {
    async fn get_barber(&self, barber_id: Uuid) -> BookingResult<Option<Barber>> {
        let barber = schedule::get_barber_by_id(&self.pool, barber_id)
            .await
            .map_err(classify)?;
        Ok(barber.map(Barber::from))
    }

    async fn get_shop_hours(&self, barbershop_id: Uuid) -> BookingResult<Option<ShopHours>> {
        let barbershop = schedule::get_barbershop_by_id(&self.pool, barbershop_id)
            .await
            .map_err(classify)?;
        Ok(barbershop.map(|shop| shop.opening_hours.0))
    }

    async fn update_barber_schedule(
        &self,
        barber_id: Uuid,
        working_hours: &BarberSchedule,
    ) -> BookingResult<Option<Barber>> {
        let barber = schedule::update_barber_working_hours(&self.pool, barber_id, working_hours)
            .await
            .map_err(classify)?;
        Ok(barber.map(Barber::from))
    }
}

#[async_trait]
impl ServiceRepository for PgStore {
    async fn get_service(&self, id: Uuid) -> BookingResult<Option<Service>> {
        let row = service::get_service_by_id(&self.pool, id)
            .await
            .map_err(classify)?;
        row.map(Service::try_from).transpose().map_err(BookingError::Backend)
    }

    async fn create_service(&self, new_service: &Service) -> BookingResult<Service> {
        let row = service::create_service(&self.pool, new_service)
            .await
            .map_err(classify)?;
        Service::try_from(row).map_err(BookingError::Backend)
    }
}

#[async_trait]
impl AppointmentRepository for PgStore {
    async fn get_appointment(&self, id: Uuid) -> BookingResult<Option<Appointment>> {
        let row = appointment::get_appointment_by_id(&self.pool, id)
            .await
            .map_err(classify)?;
        row.map(Appointment::try_from)
            .transpose()
            .map_err(BookingError::Backend)
    }

    async fn list_for_barber_on_date(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
        statuses: &[AppointmentStatus],
    ) -> BookingResult<Vec<Appointment>> {
        let rows =
            appointment::get_appointments_by_barber_and_date(&self.pool, barber_id, date, statuses)
                .await
                .map_err(classify)?;
        rows.into_iter()
            .map(Appointment::try_from)
            .collect::<eyre::Result<Vec<_>>>()
            .map_err(BookingError::Backend)
    }

    async fn list_for_client(&self, client_id: Uuid) -> BookingResult<Vec<Appointment>> {
        let rows = appointment::get_appointments_by_client_id(&self.pool, client_id)
            .await
            .map_err(classify)?;
        rows.into_iter()
            .map(Appointment::try_from)
            .collect::<eyre::Result<Vec<_>>>()
            .map_err(BookingError::Backend)
    }

    async fn insert_appointment(
        &self,
        new_appointment: &Appointment,
    ) -> BookingResult<Appointment> {
        let row = appointment::create_appointment(&self.pool, new_appointment)
            .await
            .map_err(classify)?;
        Appointment::try_from(row).map_err(BookingError::Backend)
    }

    async fn update_appointment(
        &self,
        changed: &Appointment,
    ) -> BookingResult<Option<Appointment>> {
        let row = appointment::update_appointment(&self.pool, changed)
            .await
            .map_err(classify)?;
        row.map(Appointment::try_from)
            .transpose()
            .map_err(BookingError::Backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::eyre;

    #[test]
    fn test_classify_pool_timeout_as_timeout() {
        let error = classify(eyre::Report::new(sqlx::Error::PoolTimedOut));
        assert!(matches!(error, BookingError::Timeout(_)));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_classify_other_errors_as_backend() {
        let error = classify(eyre::Report::new(sqlx::Error::RowNotFound));
        assert!(matches!(error, BookingError::Backend(_)));

        let error = classify(eyre!("connection reset"));
        assert!(matches!(error, BookingError::Backend(_)));
    }
}
