use std::sync::Arc;

use log::{error, info};
use tokio::{sync::Mutex, task::JoinHandle};

use mealsplit_db::roster::{RosterRepository, StoreError};
use mealsplit_eval::{Evaluation, Evaluator};
use mealsplit_model::{
    allocation::{self, Share},
    user::User,
};

/// Single owner of the in-memory roster and the food-weight expression.
/// Every mutation updates the in-memory list first and then hands a snapshot
/// to a background save task, so callers never wait on the database. The
/// stored snapshot is eventually consistent with the in-memory state.
pub struct Roster {
    users: Mutex<Vec<User>>,
    food_weight: Mutex<String>,
    evaluator: Box<dyn Evaluator>,
    repository: Arc<dyn RosterRepository>,
    pending_saves: Mutex<Vec<JoinHandle<()>>>,
}

impl Roster {
    /// Restores the roster wholesale from the repository.
    pub async fn load(
        repository: Arc<dyn RosterRepository>,
        evaluator: Box<dyn Evaluator>,
    ) -> Result<Self, StoreError> {
        let users = repository.load().await?;
        info!("Restored roster with {} users", users.len());

        Ok(Self {
            users: Mutex::new(users),
            food_weight: Mutex::new(String::new()),
            evaluator,
            repository,
            pending_saves: Mutex::new(Vec::new()),
        })
    }

    pub async fn users(&self) -> Vec<User> {
        self.users.lock().await.clone()
    }

    /// Appends a fresh user with the next id above the current maximum. Ids
    /// freed by deletions are not reused.
    pub async fn add_user(&self) -> User {
        let mut users = self.users.lock().await;
        let next_id = users.iter().map(|user| user.id).max().unwrap_or(0) + 1;
        let user = User::new(next_id);
        users.push(user.clone());
        self.persist(users.clone()).await;
        user
    }

    pub async fn delete_user(&self, id: u32) -> bool {
        let mut users = self.users.lock().await;
        let count_before = users.len();
        users.retain(|user| user.id != id);
        if users.len() == count_before {
            return false;
        }
        self.persist(users.clone()).await;
        true
    }

    pub async fn toggle_selection(&self, id: u32) -> Option<User> {
        let mut users = self.users.lock().await;
        let updated = {
            let user = users.iter_mut().find(|user| user.id == id)?;
            user.selected = !user.selected;
            user.clone()
        };
        self.persist(users.clone()).await;
        Some(updated)
    }

    /// Replaces the matching user with the incoming record. The calorie
    /// total is always rederived from the body stats, never taken from the
    /// caller.
    pub async fn update_user(&self, mut updated: User) -> Option<User> {
        let mut users = self.users.lock().await;
        let slot = users.iter_mut().find(|user| user.id == updated.id)?;
        updated.recompute_total_calories();
        *slot = updated.clone();
        self.persist(users.clone()).await;
        Some(updated)
    }

    pub async fn food_weight(&self) -> String {
        self.food_weight.lock().await.clone()
    }

    pub async fn set_food_weight(&self, expression: String) {
        *self.food_weight.lock().await = expression;
    }

    /// Evaluates the current food-weight expression, collapsing any failure
    /// to zero grams.
    pub async fn evaluated_food_weight(&self) -> f64 {
        let expression = self.food_weight.lock().await;
        self.evaluator.evaluate(expression.as_str()).grams()
    }

    /// Calculator-dialog resolution: the evaluated result rendered as text,
    /// or the literal `Error` when the expression does not evaluate.
    pub fn resolve_food_weight(&self, expression: &str) -> String {
        match self.evaluator.evaluate(expression) {
            Evaluation::Value(value) => value.to_string(),
            Evaluation::Defaulted => "Error".to_string(),
        }
    }

    /// Shares of the evaluated food weight for the currently selected users.
    pub async fn allocate(&self, two_meals: bool) -> Vec<Share> {
        let weight = self.evaluated_food_weight().await;
        let users = self.users.lock().await;
        let selected: Vec<User> = users.iter().filter(|user| user.selected).cloned().collect();
        allocation::allocate(&selected, weight, two_meals)
    }

    /// Waits for every in-flight background save. Mutations never call this;
    /// it exists for shutdown and for tests.
    pub async fn flush(&self) {
        let handles: Vec<JoinHandle<()>> = self.pending_saves.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                error!("Background save task failed: {}", e);
            }
        }
    }

    async fn persist(&self, snapshot: Vec<User>) {
        let repository = self.repository.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = repository.save(snapshot).await {
                error!("Failed to store roster, skipping. {}", e);
            }
        });

        let mut pending = self.pending_saves.lock().await;
        pending.retain(|existing| !existing.is_finished());
        pending.push(handle);
    }
}
