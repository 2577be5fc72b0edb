use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Needed to mix `=` on UUID with `&&` on ranges in one exclusion constraint
    sqlx::query("CREATE EXTENSION IF NOT EXISTS btree_gist;")
        .execute(pool)
        .await?;

    // Create barbershops table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS barbershops (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            opening_hours JSONB NOT NULL DEFAULT '{}'::jsonb,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create barbers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS barbers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            barbershop_id UUID NOT NULL REFERENCES barbershops(id),
            name VARCHAR(255) NOT NULL,
            working_hours JSONB NOT NULL DEFAULT '{}'::jsonb,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            barbershop_id UUID NOT NULL REFERENCES barbershops(id),
            name VARCHAR(255) NOT NULL,
            duration_minutes INTEGER NOT NULL,
            price_cents BIGINT NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_duration CHECK (duration_minutes > 0 AND duration_minutes % 15 = 0),
            CONSTRAINT valid_price CHECK (price_cents >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table. The exclusion constraint is what makes
    // concurrent bookings of the same barber interval mutually exclusive.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            barbershop_id UUID NOT NULL REFERENCES barbershops(id),
            barber_id UUID NOT NULL REFERENCES barbers(id),
            client_id UUID NOT NULL,
            service_id UUID NOT NULL REFERENCES services(id),
            appointment_date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            payment_status VARCHAR(16) NOT NULL DEFAULT 'pending',
            total_price_cents BIGINT NOT NULL,
            notes TEXT NULL,
            cancellation_reason TEXT NULL,
            cancelled_at TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            version BIGINT NOT NULL DEFAULT 0,
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT valid_status
                CHECK (status IN ('pending', 'confirmed', 'completed', 'cancelled')),
            CONSTRAINT valid_payment_status
                CHECK (payment_status IN ('pending', 'paid', 'refunded')),
            CONSTRAINT no_double_booking EXCLUDE USING gist (
                barber_id WITH =,
                tsrange(appointment_date + start_time, appointment_date + end_time, '[)') WITH &&
            ) WHERE (status IN ('pending', 'confirmed'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Tables created before optimistic versioning lack the column
    sqlx::query(
        "ALTER TABLE appointments ADD COLUMN IF NOT EXISTS version BIGINT NOT NULL DEFAULT 0;",
    )
    .execute(pool)
    .await?;

    // Create indexes. A prepared statement holds a single command, so each
    // index is its own query.
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_barbers_barbershop_id ON barbers(barbershop_id);",
        "CREATE INDEX IF NOT EXISTS idx_services_barbershop_id ON services(barbershop_id);",
        "CREATE INDEX IF NOT EXISTS idx_appointments_barber_date \
         ON appointments(barber_id, appointment_date);",
        "CREATE INDEX IF NOT EXISTS idx_appointments_client_id ON appointments(client_id);",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
