use crate::models::DbAppointment;
use chairbook_core::models::appointment::{Appointment, AppointmentStatus};
use chrono::{NaiveDate, NaiveTime};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const APPOINTMENT_COLUMNS: &str = r#"
    id, barbershop_id, barber_id, client_id, service_id, appointment_date,
    start_time, end_time, status, payment_status, total_price_cents, notes,
    cancellation_reason, cancelled_at, created_at, updated_at, version
"#;

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    tracing::debug!("Getting appointment by id: {}", id);

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn get_appointments_by_barber_and_date(
    pool: &Pool<Postgres>,
    barber_id: Uuid,
    date: NaiveDate,
    statuses: &[AppointmentStatus],
) -> Result<Vec<DbAppointment>> {
    let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE barber_id = $1 AND appointment_date = $2 AND status = ANY($3)
        ORDER BY start_time ASC
        "#
    ))
    .bind(barber_id)
    .bind(date)
    .bind(statuses)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn get_appointments_by_client_id(
    pool: &Pool<Postgres>,
    client_id: Uuid,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE client_id = $1
        ORDER BY appointment_date ASC, start_time ASC
        "#
    ))
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Inserts a new appointment. Overlaps with active bookings are rejected by
/// the `no_double_booking` exclusion constraint, not by this function.
pub async fn create_appointment(
    pool: &Pool<Postgres>,
    appointment: &Appointment,
) -> Result<DbAppointment> {
    tracing::debug!(
        "Creating appointment: id={}, barber_id={}, date={}, start={}, end={}",
        appointment.id,
        appointment.barber_id,
        appointment.appointment_date,
        appointment.start_time,
        appointment.end_time
    );

    let created = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments ({APPOINTMENT_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(appointment.id)
    .bind(appointment.barbershop_id)
    .bind(appointment.barber_id)
    .bind(appointment.client_id)
    .bind(appointment.service_id)
    .bind(appointment.appointment_date)
    .bind(NaiveTime::from(appointment.start_time))
    .bind(NaiveTime::from(appointment.end_time))
    .bind(appointment.status.as_str())
    .bind(appointment.payment_status.as_str())
    .bind(appointment.total_price_cents)
    .bind(appointment.notes.as_deref())
    .bind(appointment.cancellation_reason.as_deref())
    .bind(appointment.cancelled_at)
    .bind(appointment.created_at)
    .bind(appointment.updated_at)
    .bind(appointment.version)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

/// Overwrites the mutable columns of an appointment and bumps its version,
/// guarded by the version the caller read. Returns `None` if the row is gone
/// or another write landed in the meantime.
pub async fn update_appointment(
    pool: &Pool<Postgres>,
    appointment: &Appointment,
) -> Result<Option<DbAppointment>> {
    let updated = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = $3,
            payment_status = $4,
            notes = $5,
            cancellation_reason = $6,
            cancelled_at = $7,
            updated_at = $8,
            version = version + 1
        WHERE id = $1 AND version = $2
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(appointment.id)
    .bind(appointment.version)
    .bind(appointment.status.as_str())
    .bind(appointment.payment_status.as_str())
    .bind(appointment.notes.as_deref())
    .bind(appointment.cancellation_reason.as_deref())
    .bind(appointment.cancelled_at)
    .bind(appointment.updated_at)
    .fetch_optional(pool)
    .await?;

    if updated.is_none() {
        tracing::debug!(
            "Appointment {} was not updated: missing or no longer at version {}",
            appointment.id,
            appointment.version
        );
    }

    Ok(updated)
}
