use crate::models::{DbLocale, DbProfile, DbService};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub const ROLE_PROFESSIONAL: &str = "profesional";
pub const ROLE_CLIENT: &str = "cliente";

pub async fn get_profile_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbProfile>> {
    let profile = sqlx::query_as::<_, DbProfile>(
        r#"
        SELECT id, full_name, email, role, local_id
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn get_locale_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbLocale>> {
    let locale = sqlx::query_as::<_, DbLocale>(
        r#"
        SELECT id, name, address, phone
        FROM locales
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(locale)
}

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, professional_id, local_id, name, duration_minutes, price_cents
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn create_profile(
    pool: &Pool<Postgres>,
    full_name: &str,
    email: &str,
    role: &str,
    local_id: Option<Uuid>,
) -> Result<DbProfile> {
    let profile = sqlx::query_as::<_, DbProfile>(
        r#"
        INSERT INTO profiles (id, full_name, email, role, local_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, full_name, email, role, local_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(full_name)
    .bind(email)
    .bind(role)
    .bind(local_id)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

pub async fn create_service(
    pool: &Pool<Postgres>,
    professional_id: Uuid,
    name: &str,
    duration_minutes: i32,
    price_cents: i64,
) -> Result<DbService> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (id, professional_id, local_id, name, duration_minutes, price_cents)
        VALUES ($1, $2, NULL, $3, $4, $5)
        RETURNING id, professional_id, local_id, name, duration_minutes, price_cents
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(professional_id)
    .bind(name)
    .bind(duration_minutes)
    .bind(price_cents)
    .fetch_one(pool)
    .await?;

    Ok(service)
}
