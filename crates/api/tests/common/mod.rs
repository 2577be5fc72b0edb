use std::sync::Arc;

use axum_test::TestServer;
use chairbook_api::{ApiState, build_router};
use chairbook_core::clock::FixedClock;
use chairbook_core::models::schedule::{BarberSchedule, DayOfWeek, OpeningHours, ShopHours};
use chairbook_core::models::service::Service;
use chairbook_core::repository::ServiceRepository;
use chairbook_core::time::{TimeOfDay, TimeRange};
use chairbook_db::memory::InMemoryStore;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

/// Saturday 2024-06-01, 08:00 at the shop.
pub const NOW: &str = "2024-06-01 08:00";
/// The Monday after `NOW`.
pub const MONDAY: &str = "2024-06-03";

#[allow(dead_code)]
pub struct TestEnv {
    pub app: TestServer,
    pub store: Arc<InMemoryStore>,
    pub barbershop_id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Uuid,
}

pub fn t(raw: &str) -> TimeOfDay {
    raw.parse().unwrap()
}

#[allow(dead_code)]
pub fn monday() -> NaiveDate {
    NaiveDate::parse_from_str(MONDAY, "%Y-%m-%d").unwrap()
}

impl TestEnv {
    /// A shop open 09:00-18:00 Monday to Saturday, one barber working
    /// 09:00-12:00 and 13:00-17:00 on Mondays, and a 30 minute haircut.
    ///
    /// # Panics
    /// Panics if building the test server fails
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());

        let mut hours = ShopHours::new();
        for day in DayOfWeek::ALL {
            let open = (day != DayOfWeek::Sunday)
                .then(|| OpeningHours::new(t("09:00"), t("18:00")).unwrap());
            hours = hours.with_day(day, open);
        }
        let shop = store.add_barbershop("Main Street Cuts", hours).await;

        let barber = store
            .add_barber(
                shop.id,
                "Sam",
                BarberSchedule::new().with_day(
                    DayOfWeek::Monday,
                    vec![
                        TimeRange::new(t("09:00"), t("12:00")).unwrap(),
                        TimeRange::new(t("13:00"), t("17:00")).unwrap(),
                    ],
                ),
            )
            .await;

        let service = Service {
            id: Uuid::new_v4(),
            barbershop_id: shop.id,
            name: "Haircut".to_string(),
            duration_minutes: 30,
            price_cents: 2500,
            is_active: true,
        };
        store.create_service(&service).await.unwrap();

        let now = NaiveDateTime::parse_from_str(NOW, "%Y-%m-%d %H:%M").unwrap();
        let state = ApiState::from_store(store.clone(), Arc::new(FixedClock::at(now)));
        let app = TestServer::new(build_router(Arc::new(state))).unwrap();

        TestEnv {
            app,
            store,
            barbershop_id: shop.id,
            barber_id: barber.id,
            service_id: service.id,
        }
    }
}
