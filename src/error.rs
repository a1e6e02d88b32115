use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize, PartialEq, Eq)]
pub enum MoimError {
    /// Group with given ID not found
    #[error("Group {0} not found")]
    GroupNotFound(String),

    /// User with given ID not found
    #[error("User {0} not found")]
    UserNotFound(String),

    /// User holds no approved membership in the group
    #[error("User {0} is not a group member")]
    UserNotMember(String),

    /// User already has an assignment (approved or pending) in the group
    #[error("User {0} is already a group member")]
    AlreadyGroupMember(String),

    /// User has no pending join request
    #[error("User {0} has no pending join request")]
    NotPending(String),

    /// Actor lacks the permission required for the action
    #[error("User {0} is not authorized to {1}")]
    NotAuthorized(String, String),

    /// Owner must transfer ownership before leaving
    #[error("Owner cannot leave the group")]
    OwnerCannotLeave,

    /// Cannot remove the last member of a group
    #[error("Cannot remove last group member")]
    CannotRemoveLastMember,

    /// Withdrawal exceeds the account balance
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    /// Deposit or withdrawal amount is zero
    #[error("Amount must be greater than 0")]
    InvalidAmount,

    /// A data invariant was violated while building a value
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Snapshot document could not be read or parsed
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Bearer token missing, malformed or rejected
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}
