// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User account endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header::LOCATION, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use super::extract::{is_json_content_type, JsonBody};
use crate::auth::Auth;
use crate::error::{ApiError, ErrorEnvelope};
use crate::models::{AccountResponse, CreateAccountRequest, UpdateAccountRequest};
use crate::service::{PatchError, ProfilePatch};
use crate::state::AppState;

const SELF_PATH: &str = "/v1/user/self";

const EMPTY_UPDATE_MESSAGE: &str = "Request body must contain at least one field to update";
const INVALID_JSON_MESSAGE: &str = "Invalid JSON format";

/// Register a new account.
///
/// Public. The new account is verified immediately.
#[utoipa::path(
    post,
    path = "/v1/user",
    tag = "Users",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse,
            headers(("Location" = String, description = "Always /v1/user/self"))),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 409, description = "Username already registered", body = ErrorEnvelope),
        (status = 415, description = "Body is not JSON", body = ErrorEnvelope),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_account = request.validate()?;
    let account = state.users().register(new_account).await?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, SELF_PATH)],
        Json(AccountResponse::from(&account)),
    ))
}

/// Get the authenticated user's account.
#[utoipa::path(
    get,
    path = "/v1/user/self",
    tag = "Users",
    security(("basic" = [])),
    responses(
        (status = 200, description = "Account details", body = AccountResponse),
        (status = 401, description = "Missing or invalid credentials", body = ErrorEnvelope),
        (status = 403, description = "Account not verified", body = ErrorEnvelope),
        (status = 404, description = "Account not found", body = ErrorEnvelope),
    )
)]
pub async fn get_self(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.users().find_by_username(&user.username)?;
    Ok(Json(AccountResponse::from(&account)))
}

/// Update the authenticated user's first name, last name or password.
///
/// Any other field in the body rejects the whole request.
#[utoipa::path(
    put,
    path = "/v1/user/self",
    tag = "Users",
    security(("basic" = [])),
    request_body = UpdateAccountRequest,
    responses(
        (status = 204, description = "Account updated"),
        (status = 400, description = "Invalid JSON, empty object or disallowed field", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credentials", body = ErrorEnvelope),
        (status = 403, description = "Account not verified", body = ErrorEnvelope),
        (status = 404, description = "Account not found", body = ErrorEnvelope),
        (status = 413, description = "Body larger than 2 MB", body = ErrorEnvelope),
        (status = 415, description = "Body is not JSON", body = ErrorEnvelope),
    )
)]
pub async fn update_self(
    State(state): State<AppState>,
    Auth(user): Auth,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, ApiError> {
    let patch = parse_update(&headers, body)?;

    let users = state.users();
    let account = users.find_by_username(&user.username)?;
    users.update_profile(account, patch).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Turn a raw update request into a [`ProfilePatch`], checking content type,
/// body size, JSON shape, emptiness and the field allow-list in that order.
fn parse_update(
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<ProfilePatch, ApiError> {
    if !is_json_content_type(headers) {
        return Err(ApiError::unsupported_media_type());
    }
    let body = body?;

    let object = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(object)) => object,
        _ => return Err(ApiError::bad_request(INVALID_JSON_MESSAGE)),
    };
    if object.is_empty() {
        return Err(ApiError::bad_request(EMPTY_UPDATE_MESSAGE));
    }

    ProfilePatch::from_json_object(&object).map_err(|e| match e {
        PatchError::DisallowedField(_) => ApiError::bad_request(e.to_string()),
        PatchError::InvalidValue => ApiError::bad_request(INVALID_JSON_MESSAGE),
    })
}

/// Answer for methods a user route does not serve.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
