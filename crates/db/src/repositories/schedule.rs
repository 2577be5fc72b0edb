use crate::models::{DbBarber, DbBarbershop};
use chairbook_core::models::schedule::BarberSchedule;
use eyre::Result;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_barbershop_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbBarbershop>> {
    let barbershop = sqlx::query_as::<_, DbBarbershop>(
        r#"
        SELECT id, name, opening_hours, created_at
        FROM barbershops
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(barbershop)
}

pub async fn get_barber_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBarber>> {
    tracing::debug!("Getting barber by id: {}", id);

    let barber = sqlx::query_as::<_, DbBarber>(
        r#"
        SELECT id, barbershop_id, name, working_hours, is_active, created_at
        FROM barbers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if barber.is_none() {
        tracing::debug!("Barber not found: id={}", id);
    }

    Ok(barber)
}

pub async fn update_barber_working_hours(
    pool: &Pool<Postgres>,
    id: Uuid,
    working_hours: &BarberSchedule,
) -> Result<Option<DbBarber>> {
    let barber = sqlx::query_as::<_, DbBarber>(
        r#"
        UPDATE barbers
        SET working_hours = $2
        WHERE id = $1
        RETURNING id, barbershop_id, name, working_hours, is_active, created_at
        "#,
    )
    .bind(id)
    .bind(Json(working_hours))
    .fetch_optional(pool)
    .await?;

    Ok(barber)
}
