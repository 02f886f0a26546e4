use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::db::{
    EventRepository, PgEventRepository, PgTicketRepository, PgUserRepository, TicketRepository,
    UserRepository,
};
use crate::identity::{IdentitySource, TrustedHeaderIdentity};
use crate::storage::UploadStore;

/// Dependencies shared by every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserRepository>,
    pub events: Arc<dyn EventRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub uploads: UploadStore,
    pub identity: Arc<dyn IdentitySource>,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        tickets: Arc<dyn TicketRepository>,
    ) -> Self {
        Self {
            uploads: UploadStore::new(config.upload_dir.clone()),
            identity: Arc::new(TrustedHeaderIdentity::new(&config.caller_id_header)),
            config: Arc::new(config),
            users,
            events,
            tickets,
        }
    }

    pub fn postgres(pool: PgPool, config: Config) -> Self {
        Self::new(
            config,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgEventRepository::new(pool.clone())),
            Arc::new(PgTicketRepository::new(pool)),
        )
    }
}
