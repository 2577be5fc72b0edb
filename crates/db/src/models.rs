use chairbook_core::models::appointment::Appointment;
use chairbook_core::models::schedule::{Barber, BarberSchedule, ShopHours};
use chairbook_core::models::service::{Service, validate_service_duration};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBarbershop {
    pub id: Uuid,
    pub name: String,
    pub opening_hours: Json<ShopHours>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBarber {
    pub id: Uuid,
    pub barbershop_id: Uuid,
    pub name: String,
    pub working_hours: Json<BarberSchedule>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub barbershop_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub barbershop_id: Uuid,
    pub barber_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub payment_status: String,
    pub total_price_cents: i64,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

impl From<DbBarber> for Barber {
    fn from(row: DbBarber) -> Self {
        Barber {
            id: row.id,
            barbershop_id: row.barbershop_id,
            name: row.name,
            working_hours: row.working_hours.0,
            is_active: row.is_active,
        }
    }
}

impl TryFrom<DbService> for Service {
    type Error = eyre::Report;

    fn try_from(row: DbService) -> Result<Self> {
        let duration_minutes = validate_service_duration(row.duration_minutes)
            .wrap_err_with(|| format!("Stored service {} has an invalid duration", row.id))?;

        Ok(Service {
            id: row.id,
            barbershop_id: row.barbershop_id,
            name: row.name,
            duration_minutes,
            price_cents: row.price_cents,
            is_active: row.is_active,
        })
    }
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = eyre::Report;

    fn try_from(row: DbAppointment) -> Result<Self> {
        let context = || format!("Stored appointment {} is malformed", row.id);

        Ok(Appointment {
            id: row.id,
            barbershop_id: row.barbershop_id,
            barber_id: row.barber_id,
            client_id: row.client_id,
            service_id: row.service_id,
            appointment_date: row.appointment_date,
            start_time: row.start_time.try_into().wrap_err_with(context)?,
            end_time: row.end_time.try_into().wrap_err_with(context)?,
            status: row.status.parse().wrap_err_with(context)?,
            payment_status: row.payment_status.parse().wrap_err_with(context)?,
            total_price_cents: row.total_price_cents,
            notes: row.notes,
            cancellation_reason: row.cancellation_reason,
            cancelled_at: row.cancelled_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            version: row.version,
        })
    }
}
