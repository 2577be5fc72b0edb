//! Runs against a real Postgres when `DATABASE_URL` is set; otherwise every
//! test returns early.

use std::env;
use std::sync::Arc;

use chairbook_core::clock::FixedClock;
use chairbook_core::errors::BookingError;
use chairbook_core::lifecycle::AppointmentManager;
use chairbook_core::models::appointment::{AppointmentStatus, CreateAppointmentRequest};
use chairbook_core::models::schedule::{BarberSchedule, DayOfWeek, OpeningHours, ShopHours};
use chairbook_core::models::service::Service;
use chairbook_core::repository::{AppointmentRepository, ServiceRepository};
use chairbook_core::time::{TimeOfDay, TimeRange};
use chairbook_db::schema::initialize_database;
use chairbook_db::store::PgStore;
use chairbook_db::{DbPool, PoolSettings, create_pool};
use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use sqlx::types::Json;
use uuid::Uuid;

fn t(raw: &str) -> TimeOfDay {
    raw.parse().unwrap()
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

async fn connect() -> Option<DbPool> {
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return None;
    };
    Some(create_pool(&url, &PoolSettings::default()).await.unwrap())
}

struct Seeded {
    store: Arc<PgStore>,
    barbershop_id: Uuid,
    barber_id: Uuid,
    service_id: Uuid,
}

/// Fresh shop, barber and service so repeated runs never collide.
async fn seed(pool: &DbPool) -> Seeded {
    let opening = ShopHours::new().with_day(
        DayOfWeek::Monday,
        Some(OpeningHours::new(t("09:00"), t("18:00")).unwrap()),
    );
    let (barbershop_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO barbershops (name, opening_hours) VALUES ($1, $2) RETURNING id",
    )
    .bind("Main Street Cuts")
    .bind(Json(opening))
    .fetch_one(pool)
    .await
    .unwrap();

    let working = BarberSchedule::new().with_day(
        DayOfWeek::Monday,
        vec![TimeRange::new(t("09:00"), t("17:00")).unwrap()],
    );
    let (barber_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO barbers (barbershop_id, name, working_hours) \
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(barbershop_id)
    .bind("Sam")
    .bind(Json(working))
    .fetch_one(pool)
    .await
    .unwrap();

    let store = Arc::new(PgStore::new(pool.clone()));
    let service = store
        .create_service(&Service {
            id: Uuid::new_v4(),
            barbershop_id,
            name: "Haircut".to_string(),
            duration_minutes: 30,
            price_cents: 3000,
            is_active: true,
        })
        .await
        .unwrap();

    Seeded {
        store,
        barbershop_id,
        barber_id,
        service_id: service.id,
    }
}

fn manager(seeded: &Seeded) -> AppointmentManager {
    let now = NaiveDateTime::parse_from_str("2024-06-01 12:00", "%Y-%m-%d %H:%M").unwrap();
    AppointmentManager::new(
        seeded.store.clone(),
        seeded.store.clone(),
        Arc::new(FixedClock::at(now)),
    )
}

fn request(seeded: &Seeded, start: &str) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        barbershop_id: seeded.barbershop_id,
        barber_id: seeded.barber_id,
        service_id: seeded.service_id,
        appointment_date: monday(),
        start_time: t(start),
        notes: None,
    }
}

#[test_log::test(tokio::test)]
async fn test_schema_bootstrap_is_idempotent() {
    let Some(pool) = connect().await else {
        return;
    };

    initialize_database(&pool).await.unwrap();
    initialize_database(&pool).await.unwrap();

    let (indexes,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM pg_indexes WHERE indexname IN \
         ('idx_barbers_barbershop_id', 'idx_services_barbershop_id', \
          'idx_appointments_barber_date', 'idx_appointments_client_id')",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(indexes, 4);
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
async fn test_store_enforces_overlap_and_versions() {
    let Some(pool) = connect().await else {
        return;
    };
    initialize_database(&pool).await.unwrap();
    let seeded = seed(&pool).await;
    let manager = manager(&seeded);

    let (first, second) = tokio::join!(
        manager.create(Uuid::new_v4(), request(&seeded, "10:00")),
        manager.create(Uuid::new_v4(), request(&seeded, "10:15")),
    );
    let booked: Vec<_> = [first, second]
        .into_iter()
        .filter_map(|result| match result {
            Ok(appointment) => Some(appointment),
            Err(BookingError::SlotUnavailable(_)) => None,
            Err(other) => panic!("unexpected booking failure: {other}"),
        })
        .collect();
    assert_eq!(booked.len(), 1);
    let kept = &booked[0];

    // Skipping the manager's own check leaves the exclusion constraint.
    let mut overlapping = kept.clone();
    overlapping.id = Uuid::new_v4();
    let err = seeded
        .store
        .insert_appointment(&overlapping)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::SlotUnavailable(_)));

    let cancelled = manager.cancel(kept.id, None).await.unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert_eq!(cancelled.version, kept.version + 1);

    let stale = seeded.store.update_appointment(kept).await.unwrap();
    assert!(stale.is_none());
    let stored = seeded.store.get_appointment(kept.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AppointmentStatus::Cancelled);

    let rebooked = manager
        .create(Uuid::new_v4(), request(&seeded, kept.start_time.to_string().as_str()))
        .await
        .unwrap();
    assert_eq!(rebooked.status, AppointmentStatus::Pending);
}
