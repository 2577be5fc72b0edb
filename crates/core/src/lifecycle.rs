//! # Appointment Lifecycle Manager
//!
//! Owns appointment creation and the status state machine
//! (`pending -> confirmed -> completed`, `pending | confirmed -> cancelled`).
//!
//! Creation re-reads the barber's live bookings and rejects any overlap
//! before inserting. The repository insert is itself atomic with respect to
//! overlap, so two concurrent bookings of the same interval cannot both
//! succeed even when they pass the first check together.
//!
//! Every change is compare-and-set on the row version; when another writer
//! gets there first the change is re-evaluated against the fresh row.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use eyre::eyre;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::agenda::{Agenda, build_agenda};
use crate::clock::Clock;
use crate::errors::{BookingError, BookingResult};
use crate::models::appointment::{
    Appointment, AppointmentStatus, CreateAppointmentRequest, LifecycleAction, PaymentStatus,
    UpdateAppointmentRequest,
};
use crate::models::service::validate_service_duration;
use crate::repository::{AppointmentRepository, ServiceRepository};
use crate::time::TimeRange;

/// Attempts at a compare-and-set write before giving up with a retryable error.
const MAX_WRITE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct AppointmentManager {
    appointments: Arc<dyn AppointmentRepository>,
    services: Arc<dyn ServiceRepository>,
    clock: Arc<dyn Clock>,
}

impl AppointmentManager {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        services: Arc<dyn ServiceRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            appointments,
            services,
            clock,
        }
    }

    /// Books a new `pending` appointment for `client_id`.
    ///
    /// # Errors
    ///
    /// * `BookingError::NotFound` - the service does not exist
    /// * `BookingError::InvalidInput` - inactive service, service of another
    ///   shop, or an interval that would run past midnight
    /// * `BookingError::SlotUnavailable` - the interval overlaps a pending or
    ///   confirmed appointment of the barber
    pub async fn create(
        &self,
        client_id: Uuid,
        request: CreateAppointmentRequest,
    ) -> BookingResult<Appointment> {
        let service = self
            .services
            .get_service(request.service_id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Service with ID {} not found", request.service_id))
            })?;

        if !service.is_active {
            return Err(BookingError::InvalidInput(format!(
                "Service {} is no longer offered",
                service.id
            )));
        }
        if service.barbershop_id != request.barbershop_id {
            return Err(BookingError::InvalidInput(format!(
                "Service {} is not offered by barbershop {}",
                service.id, request.barbershop_id
            )));
        }

        let duration = validate_service_duration(service.duration_minutes)?;
        let end_time = request
            .start_time
            .checked_add_minutes(duration)
            .ok_or_else(|| {
                BookingError::InvalidInput(format!(
                    "A {duration} minute service starting at {} runs past midnight",
                    request.start_time
                ))
            })?;
        let requested = TimeRange::new(request.start_time, end_time)?;

        let existing = self
            .appointments
            .list_for_barber_on_date(
                request.barber_id,
                request.appointment_date,
                &AppointmentStatus::ACTIVE,
            )
            .await?;

        if let Some(conflict) = existing
            .iter()
            .find(|a| a.status.holds_slot() && a.time_range().overlaps(&requested))
        {
            warn!(
                "Rejected booking: barber={}, date={}, requested={}, \
                 conflicts with appointment {} ({})",
                request.barber_id,
                request.appointment_date,
                requested,
                conflict.id,
                conflict.time_range()
            );
            return Err(slot_unavailable(request.barber_id, request.appointment_date, &requested));
        }

        let now = self.clock.now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            barbershop_id: request.barbershop_id,
            barber_id: request.barber_id,
            client_id,
            service_id: service.id,
            appointment_date: request.appointment_date,
            start_time: requested.start,
            end_time: requested.end,
            status: AppointmentStatus::Pending,
            payment_status: PaymentStatus::Pending,
            total_price_cents: service.price_cents,
            notes: request.notes,
            cancellation_reason: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
            version: 0,
        };

        let stored = self.appointments.insert_appointment(&appointment).await?;
        info!(
            "Appointment created: id={}, barber={}, date={}, time={}",
            stored.id,
            stored.barber_id,
            stored.appointment_date,
            stored.time_range()
        );
        Ok(stored)
    }

    pub async fn get(&self, id: Uuid) -> BookingResult<Appointment> {
        self.appointments
            .get_appointment(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))
    }

    /// `pending -> confirmed`.
    pub async fn confirm(&self, id: Uuid) -> BookingResult<Appointment> {
        self.transition(id, LifecycleAction::Confirm, None).await
    }

    /// `confirmed -> completed`.
    pub async fn complete(&self, id: Uuid) -> BookingResult<Appointment> {
        self.transition(id, LifecycleAction::Complete, None).await
    }

    /// `pending | confirmed -> cancelled`. The interval is released for new
    /// bookings.
    pub async fn cancel(&self, id: Uuid, reason: Option<String>) -> BookingResult<Appointment> {
        self.transition(id, LifecycleAction::Cancel, reason).await
    }

    /// Changes notes or payment status; never the lifecycle status.
    pub async fn update(
        &self,
        id: Uuid,
        changes: UpdateAppointmentRequest,
    ) -> BookingResult<Appointment> {
        let updated = self
            .write_with_retry(id, |current, now| {
                let mut next = current.clone();
                if let Some(notes) = &changes.notes {
                    next.notes = notes.clone();
                }
                if let Some(payment_status) = changes.payment_status {
                    next.payment_status = payment_status;
                }
                next.updated_at = now;
                Ok(next)
            })
            .await?;

        debug!("Appointment updated: id={}", updated.id);
        Ok(updated)
    }

    /// Today / upcoming / history views of a client's appointments.
    pub async fn client_agenda(&self, client_id: Uuid) -> BookingResult<Agenda> {
        let appointments = self.appointments.list_for_client(client_id).await?;
        Ok(build_agenda(appointments, self.clock.today()))
    }

    /// Every appointment of a barber on a date, in any status, by start time.
    pub async fn barber_day(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
    ) -> BookingResult<Vec<Appointment>> {
        const ALL: [AppointmentStatus; 4] = [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ];

        let mut appointments = self
            .appointments
            .list_for_barber_on_date(barber_id, date, &ALL)
            .await?;
        appointments.sort_by_key(|a| (a.start_time, a.created_at));
        Ok(appointments)
    }

    async fn transition(
        &self,
        id: Uuid,
        action: LifecycleAction,
        reason: Option<String>,
    ) -> BookingResult<Appointment> {
        let updated = self
            .write_with_retry(id, |current, now| {
                let mut next = current.clone();
                next.status = current.status.apply(action)?;
                next.updated_at = now;
                if action == LifecycleAction::Cancel {
                    next.cancellation_reason = reason.clone();
                    next.cancelled_at = Some(now);
                }
                Ok(next)
            })
            .await?;

        info!(
            "Appointment {}: id={}, status={}",
            action.as_str(),
            updated.id,
            updated.status
        );
        Ok(updated)
    }

    /// Reads the row, derives the next state with `change`, and writes it
    /// conditioned on the version that was read. Any write in between makes
    /// the store refuse, and `change` runs again on the fresh row.
    async fn write_with_retry<F>(&self, id: Uuid, change: F) -> BookingResult<Appointment>
    where
        F: Fn(&Appointment, DateTime<Utc>) -> BookingResult<Appointment>,
    {
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let current = self.get(id).await?;
            let next = change(&current, self.clock.now())?;

            if let Some(stored) = self
                .appointments
                .update_appointment(&next)
                .await?
            {
                return Ok(stored);
            }
            debug!("Appointment {} changed concurrently, re-reading", id);
        }

        Err(BookingError::Backend(eyre!(
            "Appointment {} kept changing during update",
            id
        )))
    }
}

fn slot_unavailable(barber_id: Uuid, date: NaiveDate, requested: &TimeRange) -> BookingError {
    BookingError::SlotUnavailable(format!(
        "Barber {} is already booked on {} during {}",
        barber_id, date, requested
    ))
}
