use std::sync::Arc;

use crate::db::Database;

/// Handle to the agent execution subsystem. The gateway treats it as
/// opaque: it is constructed once after the database connection is
/// established and handed to the route groups at init time. Everything
/// it actually runs lives behind the agent route group.
pub struct ExecutionManager {
    db: Arc<Database>,
}

impl ExecutionManager {
    /// Bind the manager to an established database connection.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }
}
