use crate::models::DbService;
use chairbook_core::models::service::Service;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_service(pool: &Pool<Postgres>, service: &Service) -> Result<DbService> {
    tracing::debug!(
        "Creating service: id={}, barbershop_id={}, name={}, duration={}",
        service.id, service.barbershop_id, service.name, service.duration_minutes
    );

    let duration_minutes = i32::try_from(service.duration_minutes)?;

    let created = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (id, barbershop_id, name, duration_minutes, price_cents, is_active)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, barbershop_id, name, duration_minutes, price_cents, is_active, created_at
        "#,
    )
    .bind(service.id)
    .bind(service.barbershop_id)
    .bind(&service.name)
    .bind(duration_minutes)
    .bind(service.price_cents)
    .bind(service.is_active)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, barbershop_id, name, duration_minutes, price_cents, is_active, created_at
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}
