use crate::models::{DbScheduleOverride, DbWorkSchedule};
use chrono::{NaiveDate, NaiveTime};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_work_schedules_by_professional_id(
    pool: &Pool<Postgres>,
    professional_id: Uuid,
) -> Result<Vec<DbWorkSchedule>> {
    let schedules = sqlx::query_as::<_, DbWorkSchedule>(
        r#"
        SELECT id, professional_id, day_of_week, start_time, end_time
        FROM work_schedules
        WHERE professional_id = $1
        ORDER BY day_of_week ASC, start_time ASC
        "#,
    )
    .bind(professional_id)
    .fetch_all(pool)
    .await?;

    Ok(schedules)
}

pub async fn get_overrides_by_professional_id(
    pool: &Pool<Postgres>,
    professional_id: Uuid,
) -> Result<Vec<DbScheduleOverride>> {
    let overrides = sqlx::query_as::<_, DbScheduleOverride>(
        r#"
        SELECT id, professional_id, override_date, start_time, end_time
        FROM schedule_overrides
        WHERE professional_id = $1
        ORDER BY override_date ASC
        "#,
    )
    .bind(professional_id)
    .fetch_all(pool)
    .await?;

    Ok(overrides)
}

pub async fn create_work_schedule(
    pool: &Pool<Postgres>,
    professional_id: Uuid,
    day_of_week: i16,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<DbWorkSchedule> {
    let schedule = sqlx::query_as::<_, DbWorkSchedule>(
        r#"
        INSERT INTO work_schedules (id, professional_id, day_of_week, start_time, end_time)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, professional_id, day_of_week, start_time, end_time
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(professional_id)
    .bind(day_of_week)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(pool)
    .await?;

    Ok(schedule)
}

pub async fn create_override(
    pool: &Pool<Postgres>,
    professional_id: Uuid,
    override_date: NaiveDate,
) -> Result<DbScheduleOverride> {
    let schedule_override = sqlx::query_as::<_, DbScheduleOverride>(
        r#"
        INSERT INTO schedule_overrides (id, professional_id, override_date, start_time, end_time)
        VALUES ($1, $2, $3, NULL, NULL)
        RETURNING id, professional_id, override_date, start_time, end_time
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(professional_id)
    .bind(override_date)
    .fetch_one(pool)
    .await?;

    Ok(schedule_override)
}
