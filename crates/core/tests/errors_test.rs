use std::error::Error;
use slotswap_core::errors::{SlotError, SlotResult};

#[test]
fn test_slot_error_display() {
    let not_found = SlotError::NotFound("Event not found".to_string());
    let validation = SlotError::Validation("Invalid input".to_string());
    let unauthenticated = SlotError::Unauthenticated("Invalid token".to_string());
    let forbidden = SlotError::Forbidden("Not the owner".to_string());
    let invalid_state = SlotError::InvalidState("Event is SWAP_PENDING".to_string());
    let self_swap = SlotError::SelfSwap("Same owner".to_string());
    let database = SlotError::Database(eyre::eyre!("Database connection failed"));
    let internal = SlotError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(not_found.to_string(), "Resource not found: Event not found");
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(
        unauthenticated.to_string(),
        "Authentication error: Invalid token"
    );
    assert_eq!(forbidden.to_string(), "Forbidden: Not the owner");
    assert_eq!(
        invalid_state.to_string(),
        "Invalid state: Event is SWAP_PENDING"
    );
    assert_eq!(self_swap.to_string(), "Self swap: Same owner");
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let slot_error = SlotError::Internal(Box::new(io_error));

    assert!(slot_error.source().is_some());
}

#[test]
fn test_slot_result() {
    let result: SlotResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: SlotResult<i32> = Err(SlotError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_trait_implementation() {
    let eyre_error = eyre::eyre!("Database error");
    let slot_error = SlotError::Database(eyre_error);

    assert!(slot_error.to_string().contains("Database error"));
}

#[test]
fn test_box_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let boxed_error: Box<dyn Error + Send + Sync> = Box::new(io_error);
    let slot_error = SlotError::Internal(boxed_error);

    assert!(slot_error.to_string().contains("IO error"));
}
