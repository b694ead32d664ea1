use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create events table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            event_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id),
            title VARCHAR(255) NOT NULL,
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'BUSY',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT valid_status CHECK (status IN ('BUSY', 'SWAPPABLE', 'SWAP_PENDING'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create swap_requests table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS swap_requests (
            request_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            requestor_id UUID NOT NULL REFERENCES users(id),
            target_user_id UUID NOT NULL REFERENCES users(id),
            offered_event_id UUID NOT NULL REFERENCES events(event_id),
            target_event_id UUID NOT NULL REFERENCES events(event_id),
            status VARCHAR(32) NOT NULL DEFAULT 'SWAP_PENDING',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_swap_status
                CHECK (status IN ('SWAP_PENDING', 'ACCEPTED', 'REJECTED', 'CANCELLED')),
            CONSTRAINT distinct_events CHECK (offered_event_id <> target_event_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_events_user_id ON events(user_id);
        CREATE INDEX IF NOT EXISTS idx_events_status ON events(status);
        CREATE INDEX IF NOT EXISTS idx_swap_requests_target_user_id ON swap_requests(target_user_id);
        CREATE INDEX IF NOT EXISTS idx_swap_requests_requestor_id ON swap_requests(requestor_id);
        CREATE INDEX IF NOT EXISTS idx_swap_requests_status ON swap_requests(status);
        "#,
    )
    .execute(pool)
    .await?;

    // At most one live request per (offered, target) pair
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_swap_requests_pending_pair
        ON swap_requests(offered_event_id, target_event_id)
        WHERE status = 'SWAP_PENDING';
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
