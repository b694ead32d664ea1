use crate::db_error;
use crate::models::{DbEvent, DbSwapRequest, DbSwapRequestDetail};
use chrono::Utc;
use slotswap_core::coordinator::{self, SwapResolution};
use slotswap_core::errors::{SlotError, SlotResult};
use slotswap_core::models::event::Status;
use slotswap_core::models::swap::SwapStatus;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

/// Loads both events of a swap under row locks.
///
/// The two rows are locked in event-id order so concurrent swaps touching the
/// same pair acquire locks consistently instead of deadlocking.
async fn lock_event_pair(
    tx: &mut Transaction<'_, Postgres>,
    offered_event_id: Uuid,
    target_event_id: Uuid,
) -> SlotResult<(DbEvent, DbEvent)> {
    let rows = sqlx::query_as::<_, DbEvent>(
        r#"
        SELECT event_id, user_id, title, start_time, end_time, status, created_at
        FROM events
        WHERE event_id IN ($1, $2)
        ORDER BY event_id
        FOR UPDATE
        "#,
    )
    .bind(offered_event_id)
    .bind(target_event_id)
    .fetch_all(&mut **tx)
    .await
    .map_err(db_error)?;

    let mut offered = None;
    let mut target = None;
    for row in rows {
        if row.event_id == offered_event_id {
            offered = Some(row);
        } else if row.event_id == target_event_id {
            target = Some(row);
        }
    }

    let offered = offered.ok_or_else(|| {
        SlotError::NotFound(format!("Event with ID {} not found", offered_event_id))
    })?;
    let target = target.ok_or_else(|| {
        SlotError::NotFound(format!("Event with ID {} not found", target_event_id))
    })?;

    Ok((offered, target))
}

async fn apply_resolution(
    tx: &mut Transaction<'_, Postgres>,
    request_id: Uuid,
    offered_event_id: Uuid,
    target_event_id: Uuid,
    resolution: &SwapResolution,
) -> SlotResult<()> {
    sqlx::query(
        r#"
        UPDATE events
        SET user_id = $2, status = $3
        WHERE event_id = $1
        "#,
    )
    .bind(offered_event_id)
    .bind(resolution.offered_owner_id)
    .bind(resolution.event_status.to_string())
    .execute(&mut **tx)
    .await
    .map_err(db_error)?;

    sqlx::query(
        r#"
        UPDATE events
        SET user_id = $2, status = $3
        WHERE event_id = $1
        "#,
    )
    .bind(target_event_id)
    .bind(resolution.target_owner_id)
    .bind(resolution.event_status.to_string())
    .execute(&mut **tx)
    .await
    .map_err(db_error)?;

    sqlx::query(
        r#"
        UPDATE swap_requests
        SET status = $2
        WHERE request_id = $1
        "#,
    )
    .bind(request_id)
    .bind(resolution.request_status.to_string())
    .execute(&mut **tx)
    .await
    .map_err(db_error)?;

    Ok(())
}

/// Creates a swap request and locks both events as SWAP_PENDING, all in one
/// transaction.
pub async fn place_swap_request(
    pool: &Pool<Postgres>,
    actor: Uuid,
    offered_event_id: Uuid,
    target_event_id: Uuid,
) -> SlotResult<DbSwapRequest> {
    if offered_event_id == target_event_id {
        return Err(SlotError::Validation(
            "an event cannot be swapped against itself".to_string(),
        ));
    }

    let mut tx = pool.begin().await.map_err(db_error)?;

    let (offered, target) = lock_event_pair(&mut tx, offered_event_id, target_event_id).await?;
    coordinator::request_swap(&offered.slot_ref()?, &target.slot_ref()?, actor)?;

    let request_id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Placing swap request: request_id={}, offered={}, target={}",
        request_id,
        offered_event_id,
        target_event_id
    );

    let request = sqlx::query_as::<_, DbSwapRequest>(
        r#"
        INSERT INTO swap_requests
            (request_id, requestor_id, target_user_id, offered_event_id, target_event_id, status, created_at)
        VALUES ($1, $2, $3, $4, $5, 'SWAP_PENDING', $6)
        RETURNING request_id, requestor_id, target_user_id, offered_event_id, target_event_id,
                  status, created_at
        "#,
    )
    .bind(request_id)
    .bind(actor)
    .bind(target.user_id)
    .bind(offered_event_id)
    .bind(target_event_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => SlotError::InvalidState(
            "a swap request for this event pair is already pending".to_string(),
        ),
        _ => db_error(e),
    })?;

    sqlx::query(
        r#"
        UPDATE events
        SET status = $3
        WHERE event_id IN ($1, $2)
        "#,
    )
    .bind(offered_event_id)
    .bind(target_event_id)
    .bind(Status::SwapPending.to_string())
    .execute(&mut *tx)
    .await
    .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;

    tracing::debug!("Swap request placed: request_id={}", request_id);
    Ok(request)
}

async fn lock_request(
    tx: &mut Transaction<'_, Postgres>,
    request_id: Uuid,
) -> SlotResult<DbSwapRequest> {
    sqlx::query_as::<_, DbSwapRequest>(
        r#"
        SELECT request_id, requestor_id, target_user_id, offered_event_id, target_event_id,
               status, created_at
        FROM swap_requests
        WHERE request_id = $1
        FOR UPDATE
        "#,
    )
    .bind(request_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_error)?
    .ok_or_else(|| SlotError::NotFound(format!("Swap request with ID {} not found", request_id)))
}

/// Accepts or rejects a pending swap request.
///
/// The request row and both event rows are locked before the coordinator rule
/// runs, so a concurrent second resolution (or a mark/request racing it) sees
/// the committed terminal state and fails with InvalidState rather than
/// re-applying the ownership exchange.
pub async fn process_swap_request(
    pool: &Pool<Postgres>,
    actor: Uuid,
    request_id: Uuid,
    accept: bool,
) -> SlotResult<SwapStatus> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let request = lock_request(&mut tx, request_id).await?;
    let (offered, target) =
        lock_event_pair(&mut tx, request.offered_event_id, request.target_event_id).await?;

    let resolution = coordinator::resolve_swap(
        request.status()?,
        &offered.slot_ref()?,
        &target.slot_ref()?,
        actor,
        accept,
    )?;

    apply_resolution(
        &mut tx,
        request_id,
        request.offered_event_id,
        request.target_event_id,
        &resolution,
    )
    .await?;

    tx.commit().await.map_err(db_error)?;

    tracing::debug!(
        "Swap request {} resolved as {}",
        request_id,
        resolution.request_status
    );
    Ok(resolution.request_status)
}

/// Withdraws a pending swap request on behalf of its requestor, releasing
/// both events back to SWAPPABLE.
pub async fn cancel_swap_request(
    pool: &Pool<Postgres>,
    actor: Uuid,
    request_id: Uuid,
) -> SlotResult<SwapStatus> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let request = lock_request(&mut tx, request_id).await?;
    let (offered, target) =
        lock_event_pair(&mut tx, request.offered_event_id, request.target_event_id).await?;

    let resolution = coordinator::cancel_swap(
        request.status()?,
        request.requestor_id,
        &offered.slot_ref()?,
        &target.slot_ref()?,
        actor,
    )?;

    apply_resolution(
        &mut tx,
        request_id,
        request.offered_event_id,
        request.target_event_id,
        &resolution,
    )
    .await?;

    tx.commit().await.map_err(db_error)?;

    tracing::debug!("Swap request {} cancelled", request_id);
    Ok(resolution.request_status)
}

/// Pending requests made against the given user's events, newest first.
pub async fn get_incoming_requests(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> SlotResult<Vec<DbSwapRequestDetail>> {
    let requests = sqlx::query_as::<_, DbSwapRequestDetail>(
        r#"
        SELECT sr.request_id, sr.requestor_id, sr.target_user_id,
               sr.offered_event_id, sr.target_event_id, sr.status, sr.created_at,
               oe.title AS offered_title, oe.start_time AS offered_start_time,
               oe.end_time AS offered_end_time,
               te.title AS target_title, te.start_time AS target_start_time,
               te.end_time AS target_end_time
        FROM swap_requests sr
        JOIN events oe ON oe.event_id = sr.offered_event_id
        JOIN events te ON te.event_id = sr.target_event_id
        WHERE sr.target_user_id = $1 AND sr.status = 'SWAP_PENDING'
        ORDER BY sr.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(requests)
}

/// Pending requests the given user has placed, newest first.
pub async fn get_outgoing_requests(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> SlotResult<Vec<DbSwapRequestDetail>> {
    let requests = sqlx::query_as::<_, DbSwapRequestDetail>(
        r#"
        SELECT sr.request_id, sr.requestor_id, sr.target_user_id,
               sr.offered_event_id, sr.target_event_id, sr.status, sr.created_at,
               oe.title AS offered_title, oe.start_time AS offered_start_time,
               oe.end_time AS offered_end_time,
               te.title AS target_title, te.start_time AS target_start_time,
               te.end_time AS target_end_time
        FROM swap_requests sr
        JOIN events oe ON oe.event_id = sr.offered_event_id
        JOIN events te ON te.event_id = sr.target_event_id
        WHERE sr.requestor_id = $1 AND sr.status = 'SWAP_PENDING'
        ORDER BY sr.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(requests)
}
