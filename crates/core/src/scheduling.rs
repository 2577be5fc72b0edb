//! Data-loading side of availability plus schedule and service administration.
//!
//! [`SchedulingService`] fetches everything the pure engine in
//! [`crate::availability`] needs through the repositories, so every answer
//! reflects the latest persisted bookings.

use std::sync::Arc;

use chrono::{NaiveDate, Timelike};
use tracing::{debug, info};
use uuid::Uuid;

use crate::availability::compute_available_slots;
use crate::clock::Clock;
use crate::errors::{BookingError, BookingResult};
use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::schedule::{Barber, BarberSchedule};
use crate::models::service::{CreateServiceRequest, Service};
use crate::repository::{AppointmentRepository, ScheduleRepository, ServiceRepository};
use crate::time::{MINUTES_PER_HOUR, TimeOfDay, TimeRange};

#[derive(Clone)]
pub struct SchedulingService {
    schedules: Arc<dyn ScheduleRepository>,
    services: Arc<dyn ServiceRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    clock: Arc<dyn Clock>,
}

impl SchedulingService {
    pub fn new(
        schedules: Arc<dyn ScheduleRepository>,
        services: Arc<dyn ServiceRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            schedules,
            services,
            appointments,
            clock,
        }
    }

    /// Bookable start times of `service_id` with `barber_id` on `date`.
    ///
    /// Past dates have no slots; on today's date only start times later than
    /// the current minute are offered. A retired service, or one belonging to
    /// another barbershop, is rejected the same way booking it would be.
    pub async fn available_slots(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
        service_id: Uuid,
    ) -> BookingResult<Vec<TimeOfDay>> {
        let barber = self.barber(barber_id).await?;
        let service = self.service(service_id).await?;
        if !service.is_active {
            return Err(BookingError::InvalidInput(format!(
                "Service {} is no longer offered",
                service_id
            )));
        }
        if service.barbershop_id != barber.barbershop_id {
            return Err(BookingError::InvalidInput(format!(
                "Service {} is not offered by barbershop {}",
                service_id, barber.barbershop_id
            )));
        }
        let shop_hours = self
            .schedules
            .get_shop_hours(barber.barbershop_id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!(
                    "Barbershop with ID {} not found",
                    barber.barbershop_id
                ))
            })?;

        let now = self.clock.local_now();
        if date < now.date() || !barber.is_active {
            return Ok(Vec::new());
        }

        let booked: Vec<TimeRange> = self
            .appointments
            .list_for_barber_on_date(barber_id, date, &AppointmentStatus::ACTIVE)
            .await?
            .iter()
            .filter(|a| a.status.holds_slot())
            .map(Appointment::time_range)
            .collect();

        let mut slots = compute_available_slots(
            date,
            &barber.working_hours,
            &shop_hours,
            &booked,
            service.duration_minutes,
        )?;

        if date == now.date() {
            let current_minute = now.hour() * MINUTES_PER_HOUR + now.minute();
            slots.retain(|slot| slot.minutes() > current_minute);
        }

        debug!(
            "Computed availability: barber={}, date={}, service={}, booked={}, slots={}",
            barber_id,
            date,
            service_id,
            booked.len(),
            slots.len()
        );
        Ok(slots)
    }

    pub async fn barber_schedule(&self, barber_id: Uuid) -> BookingResult<BarberSchedule> {
        Ok(self.barber(barber_id).await?.working_hours)
    }

    /// Replaces a barber's weekly hours after checking each day is ordered
    /// and non-overlapping.
    pub async fn update_barber_schedule(
        &self,
        barber_id: Uuid,
        schedule: BarberSchedule,
    ) -> BookingResult<Barber> {
        schedule.validate()?;

        let barber = self
            .schedules
            .update_barber_schedule(barber_id, &schedule)
            .await?
            .ok_or_else(|| barber_not_found(barber_id))?;

        info!("Barber schedule updated: barber={}", barber_id);
        Ok(barber)
    }

    pub async fn create_service(
        &self,
        barbershop_id: Uuid,
        request: CreateServiceRequest,
    ) -> BookingResult<Service> {
        let service = Service::new(barbershop_id, request)?;
        let stored = self.services.create_service(&service).await?;

        info!(
            "Service created: id={}, barbershop={}, duration={}min",
            stored.id, stored.barbershop_id, stored.duration_minutes
        );
        Ok(stored)
    }

    pub async fn service(&self, id: Uuid) -> BookingResult<Service> {
        self.services
            .get_service(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Service with ID {} not found", id)))
    }

    async fn barber(&self, barber_id: Uuid) -> BookingResult<Barber> {
        self.schedules
            .get_barber(barber_id)
            .await?
            .ok_or_else(|| barber_not_found(barber_id))
    }
}

fn barber_not_found(barber_id: Uuid) -> BookingError {
    BookingError::NotFound(format!("Barber with ID {} not found", barber_id))
}
