use chrono::{DateTime, Utc};
use mockall::mock;
use slotswap_core::errors::SlotResult;
use slotswap_core::models::event::Status;
use slotswap_core::models::swap::SwapStatus;
use uuid::Uuid;

use crate::models::{DbEvent, DbSwapRequest, DbSwapRequestDetail, DbUser};

// Mock repositories for testing
mock! {
    pub UserRepo {
        pub async fn create_user(
            &self,
            name: &'static str,
            email: &'static str,
            password_hash: &'static str,
        ) -> SlotResult<DbUser>;

        pub async fn get_user_by_email(
            &self,
            email: &'static str,
        ) -> SlotResult<Option<DbUser>>;

        pub async fn get_user_by_id(
            &self,
            id: Uuid,
        ) -> SlotResult<Option<DbUser>>;
    }
}

mock! {
    pub EventRepo {
        pub async fn create_event(
            &self,
            user_id: Uuid,
            title: &'static str,
            start_time: DateTime<Utc>,
            end_time: DateTime<Utc>,
        ) -> SlotResult<DbEvent>;

        pub async fn get_event_by_id(
            &self,
            event_id: Uuid,
        ) -> SlotResult<Option<DbEvent>>;

        pub async fn get_events_by_owner(
            &self,
            user_id: Uuid,
        ) -> SlotResult<Vec<DbEvent>>;

        pub async fn get_swappable_events_excluding(
            &self,
            user_id: Uuid,
        ) -> SlotResult<Vec<DbEvent>>;

        pub async fn mark_event(
            &self,
            event_id: Uuid,
            actor: Uuid,
            requested: Status,
        ) -> SlotResult<DbEvent>;

        pub async fn update_event(
            &self,
            actor: Uuid,
            event_id: Uuid,
            title: Option<&'static str>,
            start_time: Option<DateTime<Utc>>,
            end_time: Option<DateTime<Utc>>,
        ) -> SlotResult<DbEvent>;
    }
}

mock! {
    pub SwapRepo {
        pub async fn place_swap_request(
            &self,
            actor: Uuid,
            offered_event_id: Uuid,
            target_event_id: Uuid,
        ) -> SlotResult<DbSwapRequest>;

        pub async fn process_swap_request(
            &self,
            actor: Uuid,
            request_id: Uuid,
            accept: bool,
        ) -> SlotResult<SwapStatus>;

        pub async fn cancel_swap_request(
            &self,
            actor: Uuid,
            request_id: Uuid,
        ) -> SlotResult<SwapStatus>;

        pub async fn get_incoming_requests(
            &self,
            user_id: Uuid,
        ) -> SlotResult<Vec<DbSwapRequestDetail>>;

        pub async fn get_outgoing_requests(
            &self,
            user_id: Uuid,
        ) -> SlotResult<Vec<DbSwapRequestDetail>>;
    }
}
