//! In-process implementation of the booking repositories.
//!
//! All state sits behind a single `RwLock`, so the overlap check and the
//! insert of a new appointment happen under one write guard and concurrent
//! bookings of the same interval are serialized.

use std::collections::HashMap;

use async_trait::async_trait;
use chairbook_core::errors::{BookingError, BookingResult};
use chairbook_core::models::appointment::{Appointment, AppointmentStatus};
use chairbook_core::models::schedule::{Barber, BarberSchedule, Barbershop, ShopHours};
use chairbook_core::models::service::Service;
use chairbook_core::repository::{AppointmentRepository, ScheduleRepository, ServiceRepository};
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct State {
    barbershops: HashMap<Uuid, Barbershop>,
    barbers: HashMap<Uuid, Barber>,
    services: HashMap<Uuid, Service>,
    appointments: HashMap<Uuid, Appointment>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_barbershop(&self, name: &str, opening_hours: ShopHours) -> Barbershop {
        let barbershop = Barbershop {
            id: Uuid::new_v4(),
            name: name.to_string(),
            opening_hours,
        };
        self.state
            .write()
            .await
            .barbershops
            .insert(barbershop.id, barbershop.clone());
        barbershop
    }

    pub async fn add_barber(
        &self,
        barbershop_id: Uuid,
        name: &str,
        working_hours: BarberSchedule,
    ) -> Barber {
        let barber = Barber {
            id: Uuid::new_v4(),
            barbershop_id,
            name: name.to_string(),
            working_hours,
            is_active: true,
        };
        self.state
            .write()
            .await
            .barbers
            .insert(barber.id, barber.clone());
        barber
    }

    pub async fn set_barber_active(&self, barber_id: Uuid, is_active: bool) {
        if let Some(barber) = self.state.write().await.barbers.get_mut(&barber_id) {
            barber.is_active = is_active;
        }
    }
}

fn sorted_by_start(mut appointments: Vec<Appointment>) -> Vec<Appointment> {
    appointments.sort_by_key(|a| (a.appointment_date, a.start_time));
    appointments
}

#[async_trait]
impl ScheduleRepository for InMemoryStore {
    async fn get_barber(&self, barber_id: Uuid) -> BookingResult<Option<Barber>> {
        Ok(self.state.read().await.barbers.get(&barber_id).cloned())
    }

    async fn get_shop_hours(&self, barbershop_id: Uuid) -> BookingResult<Option<ShopHours>> {
        let state = self.state.read().await;
        Ok(state
            .barbershops
            .get(&barbershop_id)
            .map(|shop| shop.opening_hours.clone()))
    }

    async fn update_barber_schedule(
        &self,
        barber_id: Uuid,
        working_hours: &BarberSchedule,
    ) -> BookingResult<Option<Barber>> {
        let mut state = self.state.write().await;
        Ok(state.barbers.get_mut(&barber_id).map(|barber| {
            barber.working_hours = working_hours.clone();
            barber.clone()
        }))
    }
}

#[async_trait]
impl ServiceRepository for InMemoryStore {
    async fn get_service(&self, id: Uuid) -> BookingResult<Option<Service>> {
        Ok(self.state.read().await.services.get(&id).cloned())
    }

    async fn create_service(&self, service: &Service) -> BookingResult<Service> {
        let mut state = self.state.write().await;
        if !state.barbershops.contains_key(&service.barbershop_id) {
            return Err(BookingError::NotFound(format!(
                "Barbershop with ID {} not found",
                service.barbershop_id
            )));
        }
        state.services.insert(service.id, service.clone());
        Ok(service.clone())
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryStore {
    async fn get_appointment(&self, id: Uuid) -> BookingResult<Option<Appointment>> {
        Ok(self.state.read().await.appointments.get(&id).cloned())
    }

    async fn list_for_barber_on_date(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
        statuses: &[AppointmentStatus],
    ) -> BookingResult<Vec<Appointment>> {
        let state = self.state.read().await;
        let matching = state
            .appointments
            .values()
            .filter(|a| {
                a.barber_id == barber_id
                    && a.appointment_date == date
                    && statuses.contains(&a.status)
            })
            .cloned()
            .collect();
        Ok(sorted_by_start(matching))
    }

    async fn list_for_client(&self, client_id: Uuid) -> BookingResult<Vec<Appointment>> {
        let state = self.state.read().await;
        let matching = state
            .appointments
            .values()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect();
        Ok(sorted_by_start(matching))
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> BookingResult<Appointment> {
        let mut state = self.state.write().await;

        if let Some(existing) = state
            .appointments
            .values()
            .find(|existing| existing.conflicts_with(appointment))
        {
            tracing::debug!(
                "Rejecting appointment {}: overlaps {} ({})",
                appointment.id,
                existing.id,
                existing.time_range()
            );
            return Err(BookingError::SlotUnavailable(format!(
                "Barber {} is already booked at {} on {}",
                appointment.barber_id,
                existing.time_range(),
                appointment.appointment_date
            )));
        }

        state
            .appointments
            .insert(appointment.id, appointment.clone());
        Ok(appointment.clone())
    }

    async fn update_appointment(
        &self,
        appointment: &Appointment,
    ) -> BookingResult<Option<Appointment>> {
        let mut state = self.state.write().await;
        match state.appointments.get_mut(&appointment.id) {
            Some(stored) if stored.version == appointment.version => {
                let mut next = appointment.clone();
                next.version += 1;
                *stored = next.clone();
                Ok(Some(next))
            }
            _ => Ok(None),
        }
    }
}
