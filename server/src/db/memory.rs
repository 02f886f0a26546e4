//! In-memory repositories for handler tests. Mirrors the constraints the
//! PostgreSQL schema enforces: unique emails and ticket foreign keys.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

use super::{EventRepository, TicketRepository, UserRepository};
use crate::models::{
    Event, EventChanges, EventUpdate, NewEvent, NewUser, ProfileChanges, Ticket, TicketSummary,
    User, UserUpdate,
};
use crate::utils::error::{AppError, AppResult};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    events: Vec<Event>,
    tickets: Vec<Ticket>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket_count(&self) -> usize {
        self.tables.lock().unwrap().tickets.len()
    }

    pub fn user(&self, email: &str) -> Option<User> {
        let tables = self.tables.lock().unwrap();
        tables.users.iter().find(|u| u.email == email).cloned()
    }

    pub fn event(&self, event_id: Uuid) -> Option<Event> {
        let tables = self.tables.lock().unwrap();
        tables.events.iter().find(|e| e.event_id == event_id).cloned()
    }
}

fn duplicate_email() -> AppError {
    AppError::Conflict("A record with the same unique value already exists".into())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(duplicate_email());
        }

        let row = User {
            user_id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            profile_picture: None,
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.user(email))
    }

    async fn update(&self, email: &str, changes: ProfileChanges) -> AppResult<Option<UserUpdate>> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(new_email) = &changes.email {
            if new_email != email && tables.users.iter().any(|u| &u.email == new_email) {
                return Err(duplicate_email());
            }
        }

        let Some(user) = tables.users.iter_mut().find(|u| u.email == email) else {
            return Ok(None);
        };
        let previous_picture = user.profile_picture.clone();

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(picture) = changes.profile_picture {
            user.profile_picture = Some(picture);
        }

        Ok(Some(UserUpdate {
            user: user.clone(),
            previous_picture,
        }))
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Event>> {
        Ok(self.tables.lock().unwrap().events.clone())
    }

    async fn find(&self, event_id: Uuid) -> AppResult<Option<Event>> {
        Ok(self.event(event_id))
    }

    async fn list_by_creator(&self, created_by: &str) -> AppResult<Vec<Event>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .events
            .iter()
            .filter(|e| e.created_by == created_by)
            .cloned()
            .collect())
    }

    async fn create(&self, event: NewEvent) -> AppResult<Event> {
        let row = Event {
            event_id: Uuid::new_v4(),
            title: event.title,
            description: event.description,
            date: event.date,
            time: event.time,
            location: event.location,
            image: event.image,
            created_by: event.created_by,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().events.push(row.clone());
        Ok(row)
    }

    async fn update(&self, event_id: Uuid, changes: EventChanges) -> AppResult<Option<EventUpdate>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(event) = tables.events.iter_mut().find(|e| e.event_id == event_id) else {
            return Ok(None);
        };
        let previous_image = event.image.clone();

        if let Some(title) = changes.title {
            event.title = title;
        }
        if let Some(description) = changes.description {
            event.description = description;
        }
        if let Some(date) = changes.date {
            event.date = date;
        }
        if let Some(time) = changes.time {
            event.time = time;
        }
        if let Some(location) = changes.location {
            event.location = location;
        }
        if let Some(image) = changes.image {
            event.image = Some(image);
        }
        if let Some(created_by) = changes.created_by {
            event.created_by = created_by;
        }

        Ok(Some(EventUpdate {
            event: event.clone(),
            previous_image,
        }))
    }

    async fn delete(&self, event_id: Uuid) -> AppResult<Option<Event>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(index) = tables.events.iter().position(|e| e.event_id == event_id) else {
            return Ok(None);
        };
        tables.tickets.retain(|t| t.event_id != event_id);
        Ok(Some(tables.events.remove(index)))
    }
}

#[async_trait]
impl TicketRepository for MemoryStore {
    async fn create(&self, user_id: Uuid, event_id: Uuid) -> AppResult<Ticket> {
        let mut tables = self.tables.lock().unwrap();
        let user_exists = tables.users.iter().any(|u| u.user_id == user_id);
        let event_exists = tables.events.iter().any(|e| e.event_id == event_id);
        if !user_exists || !event_exists {
            return Err(AppError::ValidationError(
                "Referenced record does not exist".into(),
            ));
        }

        let row = Ticket {
            ticket_id: Uuid::new_v4(),
            user_id,
            event_id,
            status: "booked".into(),
            booked_at: Utc::now(),
        };
        tables.tickets.push(row.clone());
        Ok(row)
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<TicketSummary>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .tickets
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter_map(|t| {
                let event = tables.events.iter().find(|e| e.event_id == t.event_id)?;
                Some(TicketSummary {
                    ticket_id: t.ticket_id,
                    title: event.title.clone(),
                    date: event.date,
                    location: event.location.clone(),
                    status: t.status.clone(),
                })
            })
            .collect())
    }
}
