//! Users API handlers.
//!
//! ```text
//! POST   /api/v1/users {"username":"ada","email":"ada@example.com","password":"..."}
//! GET    /api/v1/users?skip=0&limit=100
//! GET    /api/v1/users/{id}
//! PUT    /api/v1/users/{id} {"email":"ada@analytical.engine"}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    EmailAddress, Error, NewUser, PlainPassword, User, UserChanges, UserId, UserValidationError,
    Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::PageQuery;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_uuid};

const ID: FieldName = FieldName::new("id");
const USERNAME: FieldName = FieldName::new("username");
const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "correct horse battery")]
    pub password: String,
}

/// Request body for `PUT /api/v1/users/{id}`; absent fields are unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User representation returned to clients. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
        }
    }
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match &err {
        UserValidationError::EmptyUsername => (USERNAME, "empty_username"),
        UserValidationError::UsernameTooShort { .. } => (USERNAME, "username_too_short"),
        UserValidationError::UsernameTooLong { .. } => (USERNAME, "username_too_long"),
        UserValidationError::UsernameInvalidCharacters => {
            (USERNAME, "username_invalid_characters")
        }
        UserValidationError::EmptyEmail => (EMAIL, "empty_email"),
        UserValidationError::EmailTooLong { .. } => (EMAIL, "email_too_long"),
        UserValidationError::InvalidEmail => (EMAIL, "invalid_email"),
        UserValidationError::PasswordTooShort { .. } => (PASSWORD, "password_too_short"),
        UserValidationError::PasswordTooLong { .. } => (PASSWORD, "password_too_long"),
        UserValidationError::EmptyPasswordHash => (PASSWORD, "invalid_password"),
    };
    invalid_field_error(field, code, err)
}

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    parse_uuid(raw, ID).map(UserId::from_uuid)
}

fn parse_new_user(payload: CreateUserRequest) -> Result<NewUser, Error> {
    Ok(NewUser {
        username: Username::new(&payload.username).map_err(map_user_validation_error)?,
        email: EmailAddress::new(&payload.email).map_err(map_user_validation_error)?,
        password: PlainPassword::new(&payload.password).map_err(map_user_validation_error)?,
    })
}

fn parse_user_changes(payload: UpdateUserRequest) -> Result<UserChanges, Error> {
    Ok(UserChanges {
        username: payload
            .username
            .map(Username::new)
            .transpose()
            .map_err(map_user_validation_error)?,
        email: payload
            .email
            .map(EmailAddress::new)
            .transpose()
            .map_err(map_user_validation_error)?,
        password: payload
            .password
            .as_deref()
            .map(PlainPassword::new)
            .transpose()
            .map_err(map_user_validation_error)?,
    })
}

/// Register a user.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use room_booker::inbound::http::users::create_user;
///
/// let app = App::new().service(create_user);
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username or email already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_new_user(payload.into_inner())?;
    let user = state.users.create(request).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// List users in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users_query.list(query.page()).await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_user_id(&path)?;
    let user = state.users_query.get(&id).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Partially update a user.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 409, description = "Username or email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_user_id(&path)?;
    let changes = parse_user_changes(payload.into_inner())?;
    let user = state.users.update(&id, changes).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Delete a user that no booking references.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 409, description = "User still has bookings", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    state.users.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
