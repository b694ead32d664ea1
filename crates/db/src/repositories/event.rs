use crate::db_error;
use crate::models::DbEvent;
use chrono::{DateTime, Utc};
use slotswap_core::coordinator;
use slotswap_core::errors::{SlotError, SlotResult};
use slotswap_core::models::event::Status;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_event(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    title: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> SlotResult<DbEvent> {
    coordinator::validate_time_range(start_time, end_time)?;

    let event_id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating event: event_id={}, user_id={}, title={}",
        event_id,
        user_id,
        title
    );

    // New events always start BUSY; only the owner may offer them later.
    let event = sqlx::query_as::<_, DbEvent>(
        r#"
        INSERT INTO events (event_id, user_id, title, start_time, end_time, status, created_at)
        VALUES ($1, $2, $3, $4, $5, 'BUSY', $6)
        RETURNING event_id, user_id, title, start_time, end_time, status, created_at
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .bind(title)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(db_error)?;

    tracing::debug!("Event created successfully: event_id={}", event_id);
    Ok(event)
}

pub async fn get_event_by_id(pool: &Pool<Postgres>, event_id: Uuid) -> SlotResult<Option<DbEvent>> {
    let event = sqlx::query_as::<_, DbEvent>(
        r#"
        SELECT event_id, user_id, title, start_time, end_time, status, created_at
        FROM events
        WHERE event_id = $1
        "#,
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error)?;

    Ok(event)
}

pub async fn get_events_by_owner(pool: &Pool<Postgres>, user_id: Uuid) -> SlotResult<Vec<DbEvent>> {
    let events = sqlx::query_as::<_, DbEvent>(
        r#"
        SELECT event_id, user_id, title, start_time, end_time, status, created_at
        FROM events
        WHERE user_id = $1
        ORDER BY start_time
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(events)
}

/// Lists other users' events currently offered for exchange.
pub async fn get_swappable_events_excluding(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> SlotResult<Vec<DbEvent>> {
    let events = sqlx::query_as::<_, DbEvent>(
        r#"
        SELECT event_id, user_id, title, start_time, end_time, status, created_at
        FROM events
        WHERE status = 'SWAPPABLE' AND user_id <> $1
        ORDER BY start_time
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(events)
}

/// Applies an owner-requested BUSY/SWAPPABLE toggle.
///
/// The event row is locked for the duration of the transition so a swap
/// request landing at the same moment observes the committed status.
pub async fn mark_event(
    pool: &Pool<Postgres>,
    event_id: Uuid,
    actor: Uuid,
    requested: Status,
) -> SlotResult<DbEvent> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let event = sqlx::query_as::<_, DbEvent>(
        r#"
        SELECT event_id, user_id, title, start_time, end_time, status, created_at
        FROM events
        WHERE event_id = $1
        FOR UPDATE
        "#,
    )
    .bind(event_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_error)?
    .ok_or_else(|| SlotError::NotFound(format!("Event with ID {} not found", event_id)))?;

    let next = coordinator::mark(&event.slot_ref()?, actor, requested)?;

    let updated = sqlx::query_as::<_, DbEvent>(
        r#"
        UPDATE events
        SET status = $2
        WHERE event_id = $1
        RETURNING event_id, user_id, title, start_time, end_time, status, created_at
        "#,
    )
    .bind(event_id)
    .bind(next.to_string())
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;

    tracing::debug!("Event {} marked {}", event_id, next);
    Ok(updated)
}

/// Edits an event's title and time range. Owner only; status is untouched.
pub async fn update_event(
    pool: &Pool<Postgres>,
    actor: Uuid,
    event_id: Uuid,
    title: Option<&str>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
) -> SlotResult<DbEvent> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let event = sqlx::query_as::<_, DbEvent>(
        r#"
        SELECT event_id, user_id, title, start_time, end_time, status, created_at
        FROM events
        WHERE event_id = $1
        FOR UPDATE
        "#,
    )
    .bind(event_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_error)?
    .ok_or_else(|| SlotError::NotFound(format!("Event with ID {} not found", event_id)))?;

    if event.user_id != actor {
        return Err(SlotError::Forbidden(format!(
            "user {} does not own event {}",
            actor, event_id
        )));
    }

    let title = title.unwrap_or(&event.title);
    let start_time = start_time.unwrap_or(event.start_time);
    let end_time = end_time.unwrap_or(event.end_time);
    coordinator::validate_time_range(start_time, end_time)?;

    let updated = sqlx::query_as::<_, DbEvent>(
        r#"
        UPDATE events
        SET title = $2, start_time = $3, end_time = $4
        WHERE event_id = $1
        RETURNING event_id, user_id, title, start_time, end_time, status, created_at
        "#,
    )
    .bind(event_id)
    .bind(title)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;

    Ok(updated)
}
