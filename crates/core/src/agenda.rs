use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::appointment::Appointment;

/// Appointments split into the views shown to clients and barbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    /// Dated today, any status, earliest first.
    pub today: Vec<Appointment>,
    /// Dated after today and still pending or confirmed, soonest first.
    pub upcoming: Vec<Appointment>,
    /// Dated before today, or later but already completed/cancelled; newest first.
    pub history: Vec<Appointment>,
}

pub fn build_agenda(appointments: Vec<Appointment>, today: NaiveDate) -> Agenda {
    let mut agenda = Agenda::default();

    for appointment in appointments {
        if appointment.appointment_date == today {
            agenda.today.push(appointment);
        } else if appointment.appointment_date > today && appointment.status.holds_slot() {
            agenda.upcoming.push(appointment);
        } else {
            agenda.history.push(appointment);
        }
    }

    agenda.today.sort_by_key(|a| a.start_time);
    agenda
        .upcoming
        .sort_by_key(|a| (a.appointment_date, a.start_time));
    agenda
        .history
        .sort_by_key(|a| Reverse((a.appointment_date, a.start_time)));
    agenda
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::models::appointment::{AppointmentStatus, PaymentStatus};
    use crate::time::TimeOfDay;

    fn appointment(day: u32, start: &str, status: AppointmentStatus) -> Appointment {
        let start_time: TimeOfDay = start.parse().unwrap();
        Appointment {
            id: Uuid::new_v4(),
            barbershop_id: Uuid::nil(),
            barber_id: Uuid::nil(),
            client_id: Uuid::nil(),
            service_id: Uuid::nil(),
            appointment_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            start_time,
            end_time: start_time.checked_add_minutes(30).unwrap(),
            status,
            payment_status: PaymentStatus::Pending,
            total_price_cents: 0,
            notes: None,
            cancellation_reason: None,
            cancelled_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 0,
        }
    }

    #[test]
    fn splits_and_orders_views() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let later_today = appointment(10, "15:00", AppointmentStatus::Pending);
        let earlier_today = appointment(10, "09:00", AppointmentStatus::Completed);
        let next_week = appointment(17, "10:00", AppointmentStatus::Confirmed);
        let tomorrow = appointment(11, "10:00", AppointmentStatus::Pending);
        let cancelled_future = appointment(12, "10:00", AppointmentStatus::Cancelled);
        let last_week = appointment(3, "10:00", AppointmentStatus::Completed);

        let agenda = build_agenda(
            vec![
                later_today.clone(),
                next_week.clone(),
                last_week.clone(),
                earlier_today.clone(),
                tomorrow.clone(),
                cancelled_future.clone(),
            ],
            today,
        );

        assert_eq!(agenda.today, vec![earlier_today, later_today]);
        assert_eq!(agenda.upcoming, vec![tomorrow, next_week]);
        assert_eq!(agenda.history, vec![cancelled_future, last_week]);
    }
}
