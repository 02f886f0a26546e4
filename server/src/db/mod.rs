//! Persistence access. Each controller talks to a repository trait; the
//! PostgreSQL implementations share one `PgPool`.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{
    Event, EventChanges, EventUpdate, NewEvent, NewUser, ProfileChanges, Ticket, TicketSummary,
    User, UserUpdate,
};
use crate::utils::error::AppResult;

mod events;
#[cfg(test)]
pub mod memory;
mod tickets;
mod users;

pub use events::PgEventRepository;
pub use tickets::PgTicketRepository;
pub use users::PgUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Apply `changes` to the user with `email`. `None` when no user matched.
    async fn update(&self, email: &str, changes: ProfileChanges) -> AppResult<Option<UserUpdate>>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Event>>;

    async fn find(&self, event_id: Uuid) -> AppResult<Option<Event>>;

    async fn list_by_creator(&self, created_by: &str) -> AppResult<Vec<Event>>;

    async fn create(&self, event: NewEvent) -> AppResult<Event>;

    async fn update(&self, event_id: Uuid, changes: EventChanges) -> AppResult<Option<EventUpdate>>;

    /// Delete and return the removed row.
    async fn delete(&self, event_id: Uuid) -> AppResult<Option<Event>>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, event_id: Uuid) -> AppResult<Ticket>;

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<TicketSummary>>;
}

pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
