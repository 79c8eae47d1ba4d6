use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use mealsplit_model::user::User;

use crate::connection::Connection;

/// Name of the snapshot row holding the whole roster.
const ROSTER_SNAPSHOT: &str = "users";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),
    #[error("malformed roster snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[mockall::automock]
#[async_trait]
pub trait RosterRepository: Send + Sync {
    async fn load(&self) -> Result<Vec<User>, StoreError>;
    async fn save(&self, users: Vec<User>) -> Result<(), StoreError>;
}

pub struct RosterRepositoryImpl {
    connection: Connection,
}

impl RosterRepositoryImpl {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl RosterRepository for RosterRepositoryImpl {
    async fn load(&self) -> Result<Vec<User>, StoreError> {
        let mut conn = self.connection.lock().await;
        let row: Option<(String,)> = sqlx::query_as("SELECT body FROM snapshots WHERE name = ?")
            .bind(ROSTER_SNAPSHOT)
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some((body,)) => Ok(serde_json::from_str(&body)?),
            None => {
                debug!("No roster snapshot stored, falling back to the default roster");
                Ok(default_roster())
            }
        }
    }

    async fn save(&self, users: Vec<User>) -> Result<(), StoreError> {
        let body = serde_json::to_string(&users)?;

        debug!("Storing roster snapshot with {} users", users.len());
        let mut conn = self.connection.lock().await;
        sqlx::query("REPLACE INTO snapshots (name, body, saved_at) VALUES (?, ?, ?)")
            .bind(ROSTER_SNAPSHOT)
            .bind(body)
            .bind(Utc::now().timestamp())
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

fn default_roster() -> Vec<User> {
    vec![User::new(1)]
}
