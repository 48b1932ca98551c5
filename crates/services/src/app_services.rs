use std::sync::Arc;

use storage::repository::Storage;
use studio_core::Catalog;

use crate::error::AppServicesError;
use crate::session::SessionManager;
use crate::tutor::{TutorConfig, TutorGates, TutorService};

/// Assembles app-facing services over one storage backend.
pub struct AppServices {
    catalog: Arc<Catalog>,
    session: SessionManager,
    tutor: Arc<TutorService>,
    tutor_gates: Arc<TutorGates>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and restore any saved
    /// session.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        tutor_config: Option<TutorConfig>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(storage, Catalog::builtin(), tutor_config).await)
    }

    /// Build services over an existing storage handle.
    pub async fn from_storage(
        storage: Storage,
        catalog: Catalog,
        tutor_config: Option<TutorConfig>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let mut session = SessionManager::new(Arc::clone(&storage.kv), Arc::clone(&catalog));
        session.initialize().await;

        Self {
            catalog,
            session,
            tutor: Arc::new(TutorService::new(tutor_config)),
            tutor_gates: Arc::new(TutorGates::new()),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    #[must_use]
    pub fn tutor(&self) -> Arc<TutorService> {
        Arc::clone(&self.tutor)
    }

    /// In-flight gates shared by every tutor request made through these services.
    #[must_use]
    pub fn tutor_gates(&self) -> Arc<TutorGates> {
        Arc::clone(&self.tutor_gates)
    }
}
