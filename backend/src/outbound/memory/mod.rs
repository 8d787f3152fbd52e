//! In-process repositories backed by a shared mutex-guarded store.
//!
//! Used when no database URL is configured and by the HTTP test harness.
//! The three repositories share one [`InMemoryStore`] so that booking
//! references and delete restrictions behave like the PostgreSQL schema:
//! usernames and emails are unique, and bookings must point at an existing
//! room and user.
//!
//! Vectors keep insertion order, which doubles as creation order for list
//! queries.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    BookingPersistenceError, BookingReference, BookingRepository, RoomPersistenceError,
    RoomRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{Booking, BookingFilter, BookingId, PageRequest, Room, RoomId, User, UserId};

#[derive(Debug, Default)]
struct StoreState {
    users: Vec<User>,
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
}

impl StoreState {
    fn has_room(&self, id: &RoomId) -> bool {
        self.rooms.iter().any(|room| room.id() == id)
    }

    fn has_user(&self, id: &UserId) -> bool {
        self.users.iter().any(|user| user.id() == id)
    }

    fn check_references(&self, booking: &Booking) -> Result<(), BookingPersistenceError> {
        if !self.has_room(booking.room_id()) {
            return Err(BookingPersistenceError::missing_reference(
                BookingReference::Room,
            ));
        }
        if !self.has_user(booking.user_id()) {
            return Err(BookingPersistenceError::missing_reference(
                BookingReference::User,
            ));
        }
        Ok(())
    }

    fn check_user_unique(&self, candidate: &User) -> Result<(), UserPersistenceError> {
        let others = self.users.iter().filter(|user| user.id() != candidate.id());
        for user in others {
            if user.username() == candidate.username() {
                return Err(UserPersistenceError::duplicate_username());
            }
            if user.email() == candidate.email() {
                return Err(UserPersistenceError::duplicate_email());
            }
        }
        Ok(())
    }
}

/// Shared state behind the in-memory repositories.
///
/// Cloning is cheap; clones observe the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repositories for all three entities sharing this store.
    #[must_use]
    pub fn repositories(
        &self,
    ) -> (
        InMemoryUserRepository,
        InMemoryRoomRepository,
        InMemoryBookingRepository,
    ) {
        (
            InMemoryUserRepository::new(self.clone()),
            InMemoryRoomRepository::new(self.clone()),
            InMemoryBookingRepository::new(self.clone()),
        )
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // Every mutation completes before the guard drops, so a poisoned
        // lock still holds consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn page_of<T: Clone>(items: impl Iterator<Item = T>, page: PageRequest) -> Vec<T> {
    items
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}

fn replace<T>(items: &mut [T], matches: impl Fn(&T) -> bool, value: T) -> bool {
    match items.iter_mut().find(|item| matches(item)) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

fn remove<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !matches(item));
    items.len() != before
}

/// In-memory implementation of [`UserRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

impl InMemoryUserRepository {
    /// Create a repository over `store`.
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.store.lock();
        state.check_user_unique(user)?;
        state.users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.store.lock();
        state.check_user_unique(user)?;
        if replace(&mut state.users, |u| u.id() == user.id(), user.clone()) {
            Ok(())
        } else {
            Err(UserPersistenceError::not_found())
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        let mut state = self.store.lock();
        if state.bookings.iter().any(|b| b.user_id() == id) {
            return Err(UserPersistenceError::still_referenced());
        }
        if remove(&mut state.users, |u| u.id() == id) {
            Ok(())
        } else {
            Err(UserPersistenceError::not_found())
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.store.lock();
        Ok(state.users.iter().find(|u| u.id() == id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.store.lock();
        Ok(page_of(state.users.iter().cloned(), page))
    }

    async fn has_bookings(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let state = self.store.lock();
        Ok(state.bookings.iter().any(|b| b.user_id() == id))
    }
}

/// In-memory implementation of [`RoomRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryRoomRepository {
    store: InMemoryStore,
}

impl InMemoryRoomRepository {
    /// Create a repository over `store`.
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn insert(&self, room: &Room) -> Result<(), RoomPersistenceError> {
        self.store.lock().rooms.push(room.clone());
        Ok(())
    }

    async fn update(&self, room: &Room) -> Result<(), RoomPersistenceError> {
        let mut state = self.store.lock();
        if replace(&mut state.rooms, |r| r.id() == room.id(), room.clone()) {
            Ok(())
        } else {
            Err(RoomPersistenceError::not_found())
        }
    }

    async fn delete(&self, id: &RoomId) -> Result<(), RoomPersistenceError> {
        let mut state = self.store.lock();
        if state.bookings.iter().any(|b| b.room_id() == id) {
            return Err(RoomPersistenceError::still_referenced());
        }
        if remove(&mut state.rooms, |r| r.id() == id) {
            Ok(())
        } else {
            Err(RoomPersistenceError::not_found())
        }
    }

    async fn find_by_id(&self, id: &RoomId) -> Result<Option<Room>, RoomPersistenceError> {
        let state = self.store.lock();
        Ok(state.rooms.iter().find(|r| r.id() == id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Room>, RoomPersistenceError> {
        let state = self.store.lock();
        Ok(page_of(state.rooms.iter().cloned(), page))
    }

    async fn has_bookings(&self, id: &RoomId) -> Result<bool, RoomPersistenceError> {
        let state = self.store.lock();
        Ok(state.bookings.iter().any(|b| b.room_id() == id))
    }
}

/// In-memory implementation of [`BookingRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryBookingRepository {
    store: InMemoryStore,
}

impl InMemoryBookingRepository {
    /// Create a repository over `store`.
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), BookingPersistenceError> {
        let mut state = self.store.lock();
        state.check_references(booking)?;
        state.bookings.push(booking.clone());
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), BookingPersistenceError> {
        let mut state = self.store.lock();
        if !state.bookings.iter().any(|b| b.id() == booking.id()) {
            return Err(BookingPersistenceError::not_found());
        }
        state.check_references(booking)?;
        replace(&mut state.bookings, |b| b.id() == booking.id(), booking.clone());
        Ok(())
    }

    async fn delete(&self, id: &BookingId) -> Result<(), BookingPersistenceError> {
        let mut state = self.store.lock();
        if remove(&mut state.bookings, |b| b.id() == id) {
            Ok(())
        } else {
            Err(BookingPersistenceError::not_found())
        }
    }

    async fn find_by_id(
        &self,
        id: &BookingId,
    ) -> Result<Option<Booking>, BookingPersistenceError> {
        let state = self.store.lock();
        Ok(state.bookings.iter().find(|b| b.id() == id).cloned())
    }

    async fn list(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingPersistenceError> {
        let state = self.store.lock();
        let mut matching: Vec<&Booking> = state
            .bookings
            .iter()
            .filter(|b| filter.matches(b))
            .collect();
        matching.sort_by_key(|b| (b.slot().start(), *b.id().as_uuid()));
        Ok(page_of(matching.into_iter().cloned(), page))
    }
}
