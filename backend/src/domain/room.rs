//! Room data model.

use std::fmt;

use super::RoomId;

/// Maximum allowed length for a room name.
pub const ROOM_NAME_MAX: usize = 100;
/// Maximum allowed length for a room location.
pub const ROOM_LOCATION_MAX: usize = 200;
/// Smallest permitted room capacity.
pub const CAPACITY_MIN: i64 = 1;
/// Largest permitted room capacity.
pub const CAPACITY_MAX: i64 = 10_000;

/// Validation errors returned by the room value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomValidationError {
    EmptyName,
    NameTooLong { max: usize },
    CapacityOutOfRange { min: i64, max: i64 },
    LocationTooLong { max: usize },
}

impl fmt::Display for RoomValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "room name must not be empty"),
            Self::NameTooLong { max } => write!(f, "room name must be at most {max} characters"),
            Self::CapacityOutOfRange { min, max } => {
                write!(f, "capacity must be between {min} and {max}")
            }
            Self::LocationTooLong { max } => {
                write!(f, "location must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for RoomValidationError {}

/// Human readable room name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomName(String);

impl RoomName {
    /// Validate and construct a [`RoomName`]; surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RoomValidationError> {
        let name = raw.as_ref().trim();
        if name.is_empty() {
            return Err(RoomValidationError::EmptyName);
        }
        if name.chars().count() > ROOM_NAME_MAX {
            return Err(RoomValidationError::NameTooLong {
                max: ROOM_NAME_MAX,
            });
        }
        Ok(Self(name.to_owned()))
    }
}

impl AsRef<str> for RoomName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Number of people a room seats.
///
/// # Examples
/// ```
/// use room_booker::domain::Capacity;
///
/// assert_eq!(Capacity::new(12).expect("valid capacity").get(), 12);
/// assert!(Capacity::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Capacity(i32);

impl Capacity {
    /// Validate a capacity in the range [`CAPACITY_MIN`]..=[`CAPACITY_MAX`].
    pub fn new(value: i64) -> Result<Self, RoomValidationError> {
        let out_of_range = RoomValidationError::CapacityOutOfRange {
            min: CAPACITY_MIN,
            max: CAPACITY_MAX,
        };
        if !(CAPACITY_MIN..=CAPACITY_MAX).contains(&value) {
            return Err(out_of_range);
        }
        i32::try_from(value).map(Self).map_err(|_| out_of_range)
    }

    /// Seat count.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Free-form room location such as a floor or building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLocation(String);

impl RoomLocation {
    /// Validate a location; blank input yields `None`.
    pub fn parse(raw: impl AsRef<str>) -> Result<Option<Self>, RoomValidationError> {
        let location = raw.as_ref().trim();
        if location.is_empty() {
            return Ok(None);
        }
        if location.chars().count() > ROOM_LOCATION_MAX {
            return Err(RoomValidationError::LocationTooLong {
                max: ROOM_LOCATION_MAX,
            });
        }
        Ok(Some(Self(location.to_owned())))
    }
}

impl AsRef<str> for RoomLocation {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Bookable room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    name: RoomName,
    capacity: Capacity,
    location: Option<RoomLocation>,
}

impl Room {
    /// Build a [`Room`] from validated components.
    #[must_use]
    pub fn new(
        id: RoomId,
        name: RoomName,
        capacity: Capacity,
        location: Option<RoomLocation>,
    ) -> Self {
        Self {
            id,
            name,
            capacity,
            location,
        }
    }

    #[must_use]
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &RoomName {
        &self.name
    }

    #[must_use]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    #[must_use]
    pub fn location(&self) -> Option<&RoomLocation> {
        self.location.as_ref()
    }

    /// Apply partial changes, keeping fields the caller left unspecified.
    #[must_use]
    pub fn apply(self, changes: RoomChanges) -> Self {
        Self {
            id: self.id,
            name: changes.name.unwrap_or(self.name),
            capacity: changes.capacity.unwrap_or(self.capacity),
            location: changes.location.unwrap_or(self.location),
        }
    }
}

/// Creation request for a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub name: RoomName,
    pub capacity: Capacity,
    pub location: Option<RoomLocation>,
}

/// Partial update of a room.
///
/// `location` is doubly optional: `None` keeps the stored value while
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomChanges {
    pub name: Option<RoomName>,
    pub capacity: Option<Capacity>,
    pub location: Option<Option<RoomLocation>>,
}
