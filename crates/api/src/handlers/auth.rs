//! Handlers for the `/auth` resource (login, refresh, logout).

use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use jacms_core::error::CoreError;
use jacms_core::types::DbId;
use jacms_db::models::security_event::{CreateSecurityEvent, EVENT_LOGIN_FAILED};
use jacms_db::models::session::CreateSession;
use jacms_db::models::user::{User, UserInfo};
use jacms_db::repositories::{RoleRepo, SecurityEventRepo, SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Consecutive failed logins before the account is locked.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Lock duration after too many failed logins.
const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with username + password. Failed attempts are counted,
/// lock the account after [`MAX_FAILED_ATTEMPTS`] and are recorded as
/// security events.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let user_agent = user_agent(&headers);

    let Some(user) = UserRepo::find_by_username(&state.pool, input.username.trim()).await? else {
        record_failed_login(&state, None, &input.username, user_agent.as_deref()).await?;
        return Err(invalid_credentials());
    };

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failed = UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if failed >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, failed, "Account locked after failed logins");
        }
        record_failed_login(&state, Some(user.id), &user.username, user_agent.as_deref()).await?;
        return Err(invalid_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let response = create_auth_response(&state, &user, user_agent).await?;
    tracing::info!(user_id = user.id, role = %response.user.role, "User logged in");

    Ok(Json(DataResponse::new(response)))
}

/// POST /api/auth/refresh
///
/// Exchange a refresh token for a new token pair. The presented token is
/// revoked (rotation).
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user, user_agent(&headers)).await?;
    Ok(Json(DataResponse::new(response)))
}

/// POST /api/auth/logout
///
/// Revoke every session of the caller. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn record_failed_login(
    state: &AppState,
    user_id: Option<DbId>,
    username: &str,
    user_agent: Option<&str>,
) -> AppResult<()> {
    let event = CreateSecurityEvent {
        event_type: EVENT_LOGIN_FAILED.to_string(),
        severity: None,
        user_id,
        ip_address: None,
        user_agent: user_agent.map(str::to_string),
        description: format!("Failed login for '{username}'"),
        metadata: None,
    };
    SecurityEventRepo::create(&state.pool, &event, "medium").await?;
    Ok(())
}

/// Issue a token pair, persist the session and build the response.
async fn create_auth_response(
    state: &AppState,
    user: &User,
    user_agent: Option<String>,
) -> AppResult<AuthResponse> {
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    let access_token = generate_access_token(user.id, &role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let session_input = CreateSession {
        user_id: user.id,
        refresh_token_hash: refresh_hash,
        expires_at: state.config.jwt.refresh_expires_at(Utc::now()),
        user_agent,
        ip_address: None,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_ttl_secs(),
        user: UserInfo {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role,
        },
    })
}
