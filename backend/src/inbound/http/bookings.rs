//! Bookings API handlers.
//!
//! ```text
//! POST   /api/v1/bookings {"roomId":"...","userId":"...","startTime":"2026-03-02T09:00:00Z","endTime":"2026-03-02T10:00:00Z"}
//! GET    /api/v1/bookings?roomId=...&userId=...&skip=0&limit=100
//! GET    /api/v1/bookings/{id}
//! PUT    /api/v1/bookings/{id} {"endTime":"2026-03-02T11:00:00Z"}
//! DELETE /api/v1/bookings/{id}
//! ```
//!
//! Overlapping bookings for one room are accepted; no scheduling checks run.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Booking, BookingChanges, BookingFilter, BookingId, BookingPurpose, BookingValidationError,
    Capacity, Error, NewBooking, PageRequest, RoomId, RoomValidationError, TimeSlot, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, parse_optional_rfc3339_timestamp, parse_optional_uuid,
    parse_rfc3339_timestamp, parse_uuid,
};

const ID: FieldName = FieldName::new("id");
const ROOM_ID: FieldName = FieldName::new("roomId");
const USER_ID: FieldName = FieldName::new("userId");
const START_TIME: FieldName = FieldName::new("startTime");
const END_TIME: FieldName = FieldName::new("endTime");
const PURPOSE: FieldName = FieldName::new("purpose");
const REQUIRED_CAPACITY: FieldName = FieldName::new("requiredCapacity");

/// Request body for `POST /api/v1/bookings`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[schema(example = "9b2d8f1c-3c1e-4a57-9a7e-0a4f6f1d2c3b")]
    pub room_id: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
    /// RFC 3339 timestamp with offset.
    #[schema(example = "2026-03-02T09:00:00Z")]
    pub start_time: String,
    /// RFC 3339 timestamp with offset; must be after `startTime`.
    #[schema(example = "2026-03-02T10:00:00Z")]
    pub end_time: String,
    #[schema(example = "Sprint planning")]
    pub purpose: Option<String>,
    /// Minimum room capacity the booking needs.
    #[schema(example = 6, minimum = 1, maximum = 10000)]
    pub required_capacity: Option<i64>,
}

/// Request body for `PUT /api/v1/bookings/{id}`.
///
/// Absent fields are unchanged; an empty `purpose` clears it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub room_id: Option<String>,
    pub user_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub purpose: Option<String>,
    #[schema(minimum = 1, maximum = 10000)]
    pub required_capacity: Option<i64>,
}

/// Booking representation returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: Option<String>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id().to_string(),
            room_id: booking.room_id().to_string(),
            user_id: booking.user_id().to_string(),
            start_time: booking.slot().start(),
            end_time: booking.slot().end(),
            purpose: booking.purpose().map(|p| p.as_ref().to_owned()),
        }
    }
}

/// Filter and pagination parameters for `GET /api/v1/bookings`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookingListQuery {
    /// Only bookings for this room.
    pub room_id: Option<String>,
    /// Only bookings made by this user.
    pub user_id: Option<String>,
    /// Number of items to skip.
    #[param(minimum = 0)]
    pub skip: Option<u32>,
    /// Maximum number of items to return (default and maximum 100).
    #[param(minimum = 1, maximum = 100)]
    pub limit: Option<u32>,
}

fn map_booking_validation_error(err: BookingValidationError) -> Error {
    let (field, code) = match &err {
        BookingValidationError::StartNotBeforeEnd => (END_TIME, "invalid_time_slot"),
        BookingValidationError::PurposeTooLong { .. } => (PURPOSE, "purpose_too_long"),
    };
    invalid_field_error(field, code, err)
}

fn map_capacity_error(err: RoomValidationError) -> Error {
    invalid_field_error(REQUIRED_CAPACITY, "capacity_out_of_range", err)
}

fn parse_booking_id(raw: &str) -> Result<BookingId, Error> {
    parse_uuid(raw, ID).map(BookingId::from_uuid)
}

fn parse_required_capacity(raw: Option<i64>) -> Result<Option<Capacity>, Error> {
    raw.map(Capacity::new).transpose().map_err(map_capacity_error)
}

fn parse_new_booking(payload: CreateBookingRequest) -> Result<NewBooking, Error> {
    let room_id = RoomId::from_uuid(parse_uuid(&payload.room_id, ROOM_ID)?);
    let user_id = UserId::from_uuid(parse_uuid(&payload.user_id, USER_ID)?);
    let start = parse_rfc3339_timestamp(&payload.start_time, START_TIME)?;
    let end = parse_rfc3339_timestamp(&payload.end_time, END_TIME)?;
    let slot = TimeSlot::new(start, end).map_err(map_booking_validation_error)?;
    let purpose = match payload.purpose {
        Some(raw) => BookingPurpose::parse(raw).map_err(map_booking_validation_error)?,
        None => None,
    };
    Ok(NewBooking {
        room_id,
        user_id,
        slot,
        purpose,
        required_capacity: parse_required_capacity(payload.required_capacity)?,
    })
}

fn parse_booking_changes(payload: UpdateBookingRequest) -> Result<BookingChanges, Error> {
    Ok(BookingChanges {
        room_id: parse_optional_uuid(payload.room_id.as_deref(), ROOM_ID)?.map(RoomId::from_uuid),
        user_id: parse_optional_uuid(payload.user_id.as_deref(), USER_ID)?.map(UserId::from_uuid),
        start: parse_optional_rfc3339_timestamp(payload.start_time.as_deref(), START_TIME)?,
        end: parse_optional_rfc3339_timestamp(payload.end_time.as_deref(), END_TIME)?,
        purpose: payload
            .purpose
            .map(BookingPurpose::parse)
            .transpose()
            .map_err(map_booking_validation_error)?,
        required_capacity: parse_required_capacity(payload.required_capacity)?,
    })
}

fn parse_list_query(query: &BookingListQuery) -> Result<(BookingFilter, PageRequest), Error> {
    let filter = BookingFilter {
        room_id: parse_optional_uuid(query.room_id.as_deref(), ROOM_ID)?.map(RoomId::from_uuid),
        user_id: parse_optional_uuid(query.user_id.as_deref(), USER_ID)?.map(UserId::from_uuid),
    };
    Ok((filter, PageRequest::new(query.skip, query.limit)))
}

/// Book a room for a user.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid request or insufficient capacity", body = ErrorSchema),
        (status = 404, description = "Room or user not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    payload: web::Json<CreateBookingRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_new_booking(payload.into_inner())?;
    let booking = state.bookings.create(request).await?;
    Ok(HttpResponse::Created().json(BookingResponse::from(booking)))
}

/// List bookings ordered by start time, optionally filtered by room or user.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    params(BookingListQuery),
    responses(
        (status = 200, description = "Bookings", body = [BookingResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listBookings"
)]
#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    query: web::Query<BookingListQuery>,
) -> ApiResult<web::Json<Vec<BookingResponse>>> {
    let (filter, page) = parse_list_query(&query)?;
    let bookings = state.bookings_query.list(filter, page).await?;
    Ok(web::Json(
        bookings.into_iter().map(BookingResponse::from).collect(),
    ))
}

/// Fetch one booking.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Booking identifier (UUID)")),
    responses(
        (status = 200, description = "Booking", body = BookingResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Booking not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/bookings/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingResponse>> {
    let id = parse_booking_id(&path)?;
    let booking = state.bookings_query.get(&id).await?;
    Ok(web::Json(BookingResponse::from(booking)))
}

/// Partially update a booking.
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Booking identifier (UUID)")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Updated booking", body = BookingResponse),
        (status = 400, description = "Invalid request or insufficient capacity", body = ErrorSchema),
        (status = 404, description = "Booking, room, or user not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "updateBooking"
)]
#[put("/bookings/{id}")]
pub async fn update_booking(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateBookingRequest>,
) -> ApiResult<web::Json<BookingResponse>> {
    let id = parse_booking_id(&path)?;
    let changes = parse_booking_changes(payload.into_inner())?;
    let booking = state.bookings.update(&id, changes).await?;
    Ok(web::Json(BookingResponse::from(booking)))
}

/// Cancel a booking.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Booking identifier (UUID)")),
    responses(
        (status = 204, description = "Booking deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Booking not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "deleteBooking"
)]
#[delete("/bookings/{id}")]
pub async fn delete_booking(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_booking_id(&path)?;
    state.bookings.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
