//! Rooms API handlers.
//!
//! ```text
//! POST   /api/v1/rooms {"name":"Boardroom","capacity":12,"location":"Floor 3"}
//! GET    /api/v1/rooms?skip=0&limit=100
//! GET    /api/v1/rooms/{id}
//! PUT    /api/v1/rooms/{id} {"capacity":16}
//! DELETE /api/v1/rooms/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Capacity, Error, NewRoom, Room, RoomChanges, RoomId, RoomLocation, RoomName,
    RoomValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::PageQuery;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_uuid};

const ID: FieldName = FieldName::new("id");
const NAME: FieldName = FieldName::new("name");
const CAPACITY: FieldName = FieldName::new("capacity");
const LOCATION: FieldName = FieldName::new("location");

/// Request body for `POST /api/v1/rooms`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[schema(example = "Boardroom")]
    pub name: String,
    #[schema(example = 12, minimum = 1, maximum = 10000)]
    pub capacity: i64,
    #[schema(example = "Floor 3")]
    pub location: Option<String>,
}

/// Request body for `PUT /api/v1/rooms/{id}`.
///
/// Absent fields are unchanged; an empty `location` clears it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
    pub name: Option<String>,
    #[schema(minimum = 1, maximum = 10000)]
    pub capacity: Option<i64>,
    pub location: Option<String>,
}

/// Room representation returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    #[schema(example = "9b2d8f1c-3c1e-4a57-9a7e-0a4f6f1d2c3b")]
    pub id: String,
    #[schema(example = "Boardroom")]
    pub name: String,
    #[schema(example = 12)]
    pub capacity: i32,
    #[schema(example = "Floor 3")]
    pub location: Option<String>,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id().to_string(),
            name: room.name().as_ref().to_owned(),
            capacity: room.capacity().get(),
            location: room.location().map(|l| l.as_ref().to_owned()),
        }
    }
}

fn map_room_validation_error(err: RoomValidationError) -> Error {
    let (field, code) = match &err {
        RoomValidationError::EmptyName => (NAME, "empty_name"),
        RoomValidationError::NameTooLong { .. } => (NAME, "name_too_long"),
        RoomValidationError::CapacityOutOfRange { .. } => (CAPACITY, "capacity_out_of_range"),
        RoomValidationError::LocationTooLong { .. } => (LOCATION, "location_too_long"),
    };
    invalid_field_error(field, code, err)
}

fn parse_room_id(raw: &str) -> Result<RoomId, Error> {
    parse_uuid(raw, ID).map(RoomId::from_uuid)
}

fn parse_new_room(payload: CreateRoomRequest) -> Result<NewRoom, Error> {
    let location = match payload.location {
        Some(raw) => RoomLocation::parse(raw).map_err(map_room_validation_error)?,
        None => None,
    };
    Ok(NewRoom {
        name: RoomName::new(&payload.name).map_err(map_room_validation_error)?,
        capacity: Capacity::new(payload.capacity).map_err(map_room_validation_error)?,
        location,
    })
}

fn parse_room_changes(payload: UpdateRoomRequest) -> Result<RoomChanges, Error> {
    Ok(RoomChanges {
        name: payload
            .name
            .map(RoomName::new)
            .transpose()
            .map_err(map_room_validation_error)?,
        capacity: payload
            .capacity
            .map(Capacity::new)
            .transpose()
            .map_err(map_room_validation_error)?,
        location: payload
            .location
            .map(RoomLocation::parse)
            .transpose()
            .map_err(map_room_validation_error)?,
    })
}

/// Create a room.
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = RoomResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "createRoom"
)]
#[post("/rooms")]
pub async fn create_room(
    state: web::Data<HttpState>,
    payload: web::Json<CreateRoomRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_new_room(payload.into_inner())?;
    let room = state.rooms.create(request).await?;
    Ok(HttpResponse::Created().json(RoomResponse::from(room)))
}

/// List rooms in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    params(PageQuery),
    responses(
        (status = 200, description = "Rooms", body = [RoomResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "listRooms"
)]
#[get("/rooms")]
pub async fn list_rooms(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<RoomResponse>>> {
    let rooms = state.rooms_query.list(query.page()).await?;
    Ok(web::Json(rooms.into_iter().map(RoomResponse::from).collect()))
}

/// Fetch one room.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}",
    params(("id" = String, Path, description = "Room identifier (UUID)")),
    responses(
        (status = 200, description = "Room", body = RoomResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Room not found", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "getRoom"
)]
#[get("/rooms/{id}")]
pub async fn get_room(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RoomResponse>> {
    let id = parse_room_id(&path)?;
    let room = state.rooms_query.get(&id).await?;
    Ok(web::Json(RoomResponse::from(room)))
}

/// Partially update a room.
#[utoipa::path(
    put,
    path = "/api/v1/rooms/{id}",
    params(("id" = String, Path, description = "Room identifier (UUID)")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Updated room", body = RoomResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Room not found", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "updateRoom"
)]
#[put("/rooms/{id}")]
pub async fn update_room(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateRoomRequest>,
) -> ApiResult<web::Json<RoomResponse>> {
    let id = parse_room_id(&path)?;
    let changes = parse_room_changes(payload.into_inner())?;
    let room = state.rooms.update(&id, changes).await?;
    Ok(web::Json(RoomResponse::from(room)))
}

/// Delete a room that no booking references.
#[utoipa::path(
    delete,
    path = "/api/v1/rooms/{id}",
    params(("id" = String, Path, description = "Room identifier (UUID)")),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Room not found", body = ErrorSchema),
        (status = 409, description = "Room still has bookings", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "deleteRoom"
)]
#[delete("/rooms/{id}")]
pub async fn delete_room(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_room_id(&path)?;
    state.rooms.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
