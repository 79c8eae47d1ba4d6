use std::{env, sync::Arc};

use dotenv::dotenv;
use sqlx::{Connection as SqlxConnection, SqliteConnection};
use tokio::sync::{Mutex, MutexGuard};

use crate::roster::StoreError;

const SETUP_QUERY: &str = "PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
CREATE TABLE IF NOT EXISTS snapshots (
    name TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    saved_at INTEGER NOT NULL
);";

#[derive(Clone)]
pub struct Connection {
    inner: Arc<Mutex<SqliteConnection>>,
}

impl Connection {
    pub async fn establish() -> Result<Self, StoreError> {
        dotenv().ok();
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        Self::establish_with_url(&database_url).await
    }

    pub async fn establish_with_url(database_url: &str) -> Result<Self, StoreError> {
        let mut connection = SqliteConnection::connect(database_url).await?;

        sqlx::raw_sql(SETUP_QUERY).execute(&mut connection).await?;

        Ok(Self {
            inner: Arc::new(Mutex::new(connection)),
        })
    }

    pub async fn lock(&self) -> MutexGuard<'_, SqliteConnection> {
        self.inner.lock().await
    }
}
