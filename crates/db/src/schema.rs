use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create locales table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS locales (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            address VARCHAR(255) NULL,
            phone VARCHAR(64) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create profiles table (clients and professionals)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id UUID PRIMARY KEY,
            full_name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            role VARCHAR(32) NOT NULL DEFAULT 'cliente',
            local_id UUID NULL REFERENCES locales(id),
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
            professional_id UUID NULL REFERENCES profiles(id),
            local_id UUID NULL REFERENCES locales(id),
            name VARCHAR(255) NOT NULL,
            duration_minutes INTEGER NOT NULL,
            price_cents BIGINT NOT NULL DEFAULT 0,
            CONSTRAINT positive_duration CHECK (duration_minutes > 0),
            CONSTRAINT single_owner CHECK ((professional_id IS NULL) <> (local_id IS NULL))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create work_schedules table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS work_schedules (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            professional_id UUID NOT NULL REFERENCES profiles(id),
            day_of_week SMALLINT NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            CONSTRAINT valid_day_of_week CHECK (day_of_week BETWEEN 0 AND 6),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create schedule_overrides table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedule_overrides (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            professional_id UUID NOT NULL REFERENCES profiles(id),
            override_date DATE NOT NULL,
            start_time TIME NULL,
            end_time TIME NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            professional_id UUID NOT NULL REFERENCES profiles(id),
            client_id UUID NULL REFERENCES profiles(id),
            guest_name VARCHAR(255) NULL,
            guest_email VARCHAR(255) NULL,
            guest_phone VARCHAR(64) NULL,
            service_id UUID NOT NULL REFERENCES services(id),
            appointment_time TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'agendada',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (status IN ('agendada', 'confirmada', 'completada', 'cancelada')),
            CONSTRAINT has_client CHECK (client_id IS NOT NULL OR guest_email IS NOT NULL)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes; several statements, so this goes through the simple query protocol
    pool.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_profiles_local_id ON profiles(local_id);
        CREATE INDEX IF NOT EXISTS idx_services_professional_id ON services(professional_id);
        CREATE INDEX IF NOT EXISTS idx_services_local_id ON services(local_id);
        CREATE INDEX IF NOT EXISTS idx_work_schedules_professional_day ON work_schedules(professional_id, day_of_week);
        CREATE INDEX IF NOT EXISTS idx_schedule_overrides_professional_date ON schedule_overrides(professional_id, override_date);
        CREATE INDEX IF NOT EXISTS idx_appointments_professional_time ON appointments(professional_id, appointment_time);
        CREATE INDEX IF NOT EXISTS idx_appointments_client_id ON appointments(client_id);
        "#,
    )
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
