//! Shared server state
//!
//! Cheap to clone: every field is a pool, an `Arc` or a path.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{JwtService, hash_password};
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::user;
use crate::services::{ChatBackend, ImageStore, OpenAiChat};

#[derive(Clone)]
pub struct ServerState {
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub chat: Arc<dyn ChatBackend>,
    pub images: ImageStore,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("jwt_service", &self.jwt_service)
            .field("images", &self.images)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    pub fn new(
        db: DbService,
        jwt_service: JwtService,
        chat: Arc<dyn ChatBackend>,
        images: ImageStore,
    ) -> Self {
        Self {
            db,
            jwt_service: Arc::new(jwt_service),
            chat,
            images,
        }
    }

    /// Open the database, build services and seed the admin account
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_url).await?;
        let jwt_service = JwtService::with_config(config.jwt.clone());

        if config.chat.api_key.is_none() {
            tracing::warn!("CHAT_API_KEY not set, chat requests will fail upstream");
        }
        let chat: Arc<dyn ChatBackend> = Arc::new(OpenAiChat::new(config.chat.clone())?);

        let images = ImageStore::new(&config.upload_dir);
        tokio::fs::create_dir_all(images.dir()).await?;

        let state = Self::new(db, jwt_service, chat, images);

        if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
            state.seed_admin(email, password).await?;
        }

        Ok(state)
    }

    async fn seed_admin(&self, email: &str, password: &str) -> Result<()> {
        let hash = hash_password(password).map_err(|e| ServerError::Config(e.to_string()))?;
        let email = email.trim().to_lowercase();
        if user::ensure_admin(self.pool(), &email, &hash).await? {
            tracing::info!(email = %email, "Admin account created");
        } else {
            tracing::info!(email = %email, "Admin account present");
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn chat(&self) -> &dyn ChatBackend {
        self.chat.as_ref()
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }
}
