use crate::models::{DbAppointment, DbScheduledAppointment};
use agenda_core::models::appointment::{ClientIdentity, NewAppointment};
use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};
use sqlx::{Pool, Postgres};
use std::time::Duration;
use uuid::Uuid;

const APPOINTMENT_COLUMNS: &str = "a.id, a.professional_id, a.client_id, a.guest_name, a.guest_email, \
     a.guest_phone, a.service_id, a.appointment_time, a.status, a.created_at";

pub async fn get_appointments_between(
    pool: &Pool<Postgres>,
    professional_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DbScheduledAppointment>> {
    let query = format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}, s.duration_minutes
        FROM appointments a
        JOIN services s ON s.id = a.service_id
        WHERE a.professional_id = $1
          AND a.appointment_time >= $2
          AND a.appointment_time < $3
        ORDER BY a.appointment_time ASC
        "#
    );
    let appointments = sqlx::query_as::<_, DbScheduledAppointment>(&query)
        .bind(professional_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

    Ok(appointments)
}

/// Inserts the appointment unless a live appointment of the same
/// professional overlaps `[start, start + duration)`.
///
/// The check and the insert share one transaction that holds a
/// transaction-scoped advisory lock keyed on the professional, so
/// reservations for the same professional run one at a time while other
/// professionals are unaffected. Waiting for that lock is capped by
/// `lock_timeout`. Returns `None` when the slot is taken.
pub async fn insert_appointment_if_free(
    pool: &Pool<Postgres>,
    appointment: &NewAppointment,
    lock_timeout: Duration,
) -> Result<Option<DbAppointment>> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT set_config('lock_timeout', $1, true)")
        .bind(lock_timeout_setting(lock_timeout))
        .execute(&mut *tx)
        .await
        .wrap_err("Failed to set the reservation lock timeout")?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind(appointment.professional_id.to_string())
        .execute(&mut *tx)
        .await
        .wrap_err("Failed to acquire the professional's booking lock")?;

    let taken = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM appointments a
            JOIN services s ON s.id = a.service_id
            WHERE a.professional_id = $1
              AND a.status <> 'cancelada'
              AND a.appointment_time < $3
              AND a.appointment_time + make_interval(mins => s.duration_minutes) > $2
        )
        "#,
    )
    .bind(appointment.professional_id)
    .bind(appointment.appointment_time)
    .bind(appointment.end_time())
    .fetch_one(&mut *tx)
    .await?;

    if taken {
        tx.rollback().await?;
        return Ok(None);
    }

    let (client_id, guest) = match &appointment.client {
        ClientIdentity::Registered { client_id } => (Some(*client_id), None),
        ClientIdentity::Guest(guest) => (None, Some(guest)),
    };

    let inserted = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (
            id, professional_id, client_id, guest_name, guest_email, guest_phone,
            service_id, appointment_time, status, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'agendada', $9)
        RETURNING id, professional_id, client_id, guest_name, guest_email, guest_phone,
                  service_id, appointment_time, status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(appointment.professional_id)
    .bind(client_id)
    .bind(guest.map(|g| g.name.as_str()))
    .bind(guest.map(|g| g.email.as_str()))
    .bind(guest.map(|g| g.phone.as_str()))
    .bind(appointment.service_id)
    .bind(appointment.appointment_time)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some(inserted))
}

pub async fn get_appointment_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAppointment>> {
    let query = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments a WHERE a.id = $1");
    let appointment = sqlx::query_as::<_, DbAppointment>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(appointment)
}

/// Conditional status update: only rows still in `from` are changed.
pub async fn update_appointment_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    from: &str,
    to: &str,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = $3
        WHERE id = $1 AND status = $2
        RETURNING id, professional_id, client_id, guest_name, guest_email, guest_phone,
                  service_id, appointment_time, status, created_at
        "#,
    )
    .bind(id)
    .bind(from)
    .bind(to)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn get_appointments_by_professional_id(
    pool: &Pool<Postgres>,
    professional_id: Uuid,
    status: Option<&str>,
) -> Result<Vec<DbAppointment>> {
    let query = format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments a
        WHERE a.professional_id = $1
          AND ($2::text IS NULL OR a.status = $2)
        ORDER BY a.appointment_time ASC
        "#
    );
    let appointments = sqlx::query_as::<_, DbAppointment>(&query)
        .bind(professional_id)
        .bind(status)
        .fetch_all(pool)
        .await?;

    Ok(appointments)
}

pub async fn get_appointments_by_client_id(
    pool: &Pool<Postgres>,
    client_id: Uuid,
) -> Result<Vec<DbAppointment>> {
    let query = format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments a
        WHERE a.client_id = $1
        ORDER BY a.appointment_time DESC
        "#
    );
    let appointments = sqlx::query_as::<_, DbAppointment>(&query)
        .bind(client_id)
        .fetch_all(pool)
        .await?;

    Ok(appointments)
}

/// Postgres `lock_timeout` value for `timeout`, in whole milliseconds.
///
/// Rounds up to at least `1ms`, since `0` disables the timeout.
pub fn lock_timeout_setting(timeout: Duration) -> String {
    format!("{}ms", timeout.as_millis().max(1))
}
