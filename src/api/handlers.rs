use crate::{
    api::{models::*, openapi::ApiDoc},
    auth::jwt::{Claims, JwtService},
    error::MoimError,
    ledger::{AccountLedger, AccountView},
    logger::{AuditLogger, in_memory::InMemoryAuditLogger},
    models::{AuditLogEntry, GroupSummary, MemberView, Permission, RoleSet},
    resolver::{RoleResolver, RoleTable, RoleView},
    service::GroupService,
    storage::{AccountStore, GroupStore, in_memory::InMemoryStorage},
};
use axum::{
    Extension, Json, Router,
    extract::{Path, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
};
use log::debug;
use std::sync::Arc;
use tokio::sync::RwLock;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub struct AppState {
    pub storage: RwLock<InMemoryStorage>,
    pub audit_logger: RwLock<InMemoryAuditLogger>,
    pub table: RoleTable,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(storage: InMemoryStorage, jwt_secret: String) -> Arc<Self> {
        Arc::new(AppState {
            storage: RwLock::new(storage),
            audit_logger: RwLock::new(InMemoryAuditLogger::new()),
            table: RoleTable::standard(),
            jwt: JwtService::new(jwt_secret),
        })
    }
}

// Runs one mutation with exclusive access to the store and audit log.
async fn with_service<T>(
    state: &AppState,
    op: impl FnOnce(&mut GroupService<'_>) -> Result<T, MoimError>,
) -> Result<T, ApiError> {
    let mut storage = state.storage.write().await;
    let mut audit_logger = state.audit_logger.write().await;
    let mut service = GroupService::with_table(&mut *storage, &mut *audit_logger, state.table.clone());
    Ok(op(&mut service)?)
}

// Middleware to validate JWT
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| MoimError::InvalidToken("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| MoimError::InvalidToken("Invalid Authorization header".to_string()))?;

    let claims = state.jwt.validate_token(token)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn api_routes(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route("/groups", get(list_my_groups))
        .route("/groups/{group_id}", get(get_group))
        .route("/groups/{group_id}/members", get(list_members))
        .route("/groups/{group_id}/my-role", get(get_my_role))
        .route("/groups/{group_id}/account", get(get_account))
        .route("/groups/{group_id}/join", post(request_join))
        .route("/groups/{group_id}/approve", post(approve_join))
        .route("/groups/{group_id}/roles", post(change_roles))
        .route("/groups/{group_id}/ownership", post(transfer_ownership))
        .route("/groups/{group_id}/deposit", post(deposit))
        .route("/groups/{group_id}/withdraw", post(withdraw))
        .route("/groups/{group_id}/leave", post(leave_group))
        .route("/groups/{group_id}/management-type", post(change_management_type))
        .route("/groups/{group_id}/audits", get(get_group_audits))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/login", post(login))
        .merge(protected_routes)
        .with_state(state)
}

/// Full application: API under `/api` plus the Swagger UI.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "OK" }))
        .nest("/api", api_routes(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if state.storage.read().await.get_user(&req.user_id).is_none() {
        return Err(MoimError::UserNotFound(req.user_id).into());
    }
    let token = state.jwt.generate_token(&req.user_id)?;
    Ok(Json(LoginResponse { token }))
}

#[utoipa::path(
    get,
    path = "/api/groups",
    responses(
        (status = 200, description = "Groups of the current user", body = [GroupSummary])
    ),
    security(("Bearer" = []))
)]
pub async fn list_my_groups(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<GroupSummary>>, ApiError> {
    let groups = with_service(&state, |s| Ok(s.my_groups(&claims.sub))).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group summary", body = GroupSummary),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn get_group(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupSummary>, ApiError> {
    let group = with_service(&state, |s| s.group(&claims.sub, &group_id)).await?;
    Ok(Json(group))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/members",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Members with their badges", body = [MemberView]),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<MemberView>>, ApiError> {
    let members = with_service(&state, |s| s.members(&claims.sub, &group_id)).await?;
    Ok(Json(members))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/my-role",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Role of the current user", body = RoleView),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn get_my_role(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
) -> Result<Json<RoleView>, ApiError> {
    let storage = state.storage.read().await;
    let view = RoleResolver::new(&*storage, &state.table, &claims.sub).my_role(&group_id)?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/account",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Account figures", body = AccountView),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
) -> Result<Json<AccountView>, ApiError> {
    let storage = state.storage.read().await;
    RoleResolver::new(&*storage, &state.table, &claims.sub).try_approved_role_set(&group_id)?;
    let account = storage
        .account(&group_id)
        .ok_or_else(|| MoimError::GroupNotFound(group_id.clone()))?;
    debug!("Serving account of group {} to {}", group_id, claims.sub);
    Ok(Json(AccountLedger::account_view(&account)))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/join",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 202, description = "Join request recorded"),
        (status = 409, description = "Already a member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn request_join(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    with_service(&state, |s| s.request_join(&claims.sub, &group_id)).await?;
    Ok(StatusCode::ACCEPTED)
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/approve",
    params(("group_id" = String, Path, description = "Group ID")),
    request_body = ApproveJoinRequest,
    responses(
        (status = 200, description = "Member approved", body = ApproveJoinResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 409, description = "No pending request", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn approve_join(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
    Json(req): Json<ApproveJoinRequest>,
) -> Result<Json<ApproveJoinResponse>, ApiError> {
    let entry_fee =
        with_service(&state, |s| s.approve_join(&claims.sub, &group_id, &req.user_id)).await?;
    Ok(Json(ApproveJoinResponse { entry_fee }))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/roles",
    params(("group_id" = String, Path, description = "Group ID")),
    request_body = ChangeRolesRequest,
    responses(
        (status = 200, description = "Roles updated", body = ChangeRolesResponse),
        (status = 400, description = "Invalid role combination", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn change_roles(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
    Json(req): Json<ChangeRolesRequest>,
) -> Result<Json<ChangeRolesResponse>, ApiError> {
    let roles = RoleSet::new(req.roles)?;
    let roles =
        with_service(&state, |s| s.change_roles(&claims.sub, &group_id, &req.user_id, roles)).await?;
    Ok(Json(ChangeRolesResponse {
        roles: roles.to_vec(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/ownership",
    params(("group_id" = String, Path, description = "Group ID")),
    request_body = TransferOwnershipRequest,
    responses(
        (status = 204, description = "Ownership transferred"),
        (status = 403, description = "Not authorized", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn transfer_ownership(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
    Json(req): Json<TransferOwnershipRequest>,
) -> Result<StatusCode, ApiError> {
    with_service(&state, |s| {
        s.transfer_ownership(&claims.sub, &group_id, &req.new_owner_id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/deposit",
    params(("group_id" = String, Path, description = "Group ID")),
    request_body = AmountRequest,
    responses(
        (status = 200, description = "Deposit recorded", body = AccountView),
        (status = 400, description = "Invalid amount", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
    Json(req): Json<AmountRequest>,
) -> Result<Json<AccountView>, ApiError> {
    let view = with_service(&state, |s| s.deposit(&claims.sub, &group_id, req.amount)).await?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/withdraw",
    params(("group_id" = String, Path, description = "Group ID")),
    request_body = AmountRequest,
    responses(
        (status = 200, description = "Withdrawal recorded", body = AccountView),
        (status = 400, description = "Insufficient balance", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
    Json(req): Json<AmountRequest>,
) -> Result<Json<AccountView>, ApiError> {
    let view = with_service(&state, |s| s.withdraw(&claims.sub, &group_id, req.amount)).await?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/leave",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Left the group", body = LeaveGroupResponse),
        (status = 403, description = "Owner cannot leave", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn leave_group(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
) -> Result<Json<LeaveGroupResponse>, ApiError> {
    let refund = with_service(&state, |s| s.leave_group(&claims.sub, &group_id)).await?;
    Ok(Json(LeaveGroupResponse { refund }))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/management-type",
    params(("group_id" = String, Path, description = "Group ID")),
    request_body = ChangeManagementTypeRequest,
    responses(
        (status = 200, description = "Management type changed", body = AccountView),
        (status = 403, description = "Not authorized", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn change_management_type(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
    Json(req): Json<ChangeManagementTypeRequest>,
) -> Result<Json<AccountView>, ApiError> {
    let view = with_service(&state, |s| {
        s.change_management_type(&claims.sub, &group_id, req.management_type)
    })
    .await?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/audits",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Audit trail of the group", body = [AuditLogEntry]),
        (status = 403, description = "Not authorized", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn get_group_audits(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<AuditLogEntry>>, ApiError> {
    {
        let storage = state.storage.read().await;
        RoleResolver::new(&*storage, &state.table, &claims.sub)
            .require(&group_id, Permission::ManageGroup)?;
    }
    let entries = state.audit_logger.read().await.entries_for_group(&group_id);
    Ok(Json(entries))
}
