use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::MoimError;
use crate::models::{ManagementType, Role};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub user_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ApproveJoinRequest {
    pub user_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct ApproveJoinResponse {
    pub entry_fee: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct ChangeRolesRequest {
    pub user_id: String,
    pub roles: Vec<Role>,
}

#[derive(Serialize, ToSchema)]
pub struct ChangeRolesResponse {
    pub roles: Vec<Role>,
}

#[derive(Deserialize, ToSchema)]
pub struct TransferOwnershipRequest {
    pub new_owner_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AmountRequest {
    pub amount: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct ChangeManagementTypeRequest {
    pub management_type: ManagementType,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveGroupResponse {
    pub refund: u64,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for MoimError to implement IntoResponse
#[derive(Debug)]
pub struct ApiError(pub MoimError);

impl From<MoimError> for ApiError {
    fn from(err: MoimError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            MoimError::GroupNotFound(_) | MoimError::UserNotFound(_) => StatusCode::NOT_FOUND,
            MoimError::UserNotMember(_) | MoimError::NotAuthorized(..) | MoimError::OwnerCannotLeave => {
                StatusCode::FORBIDDEN
            }
            MoimError::AlreadyGroupMember(_) | MoimError::NotPending(_) => StatusCode::CONFLICT,
            MoimError::CannotRemoveLastMember
            | MoimError::InsufficientBalance { .. }
            | MoimError::InvalidAmount
            | MoimError::InvariantViolation(_)
            | MoimError::InvalidSnapshot(_) => StatusCode::BAD_REQUEST,
            MoimError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            MoimError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}
