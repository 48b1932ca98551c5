use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use storage::keys;
use storage::repository::{KeyValueStore, StorageError};
use studio_core::Catalog;
use studio_core::model::{Email, Identity, IdentityError};

use crate::error::SessionError;
use crate::progress_store::ProgressStore;

/// Why a stored session could not be restored.
#[derive(Debug, Error)]
enum RehydrateError {
    #[error("stored session is incomplete")]
    Incomplete,
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Owns the signed-in identity and the progress store bound to it.
///
/// Construct one per application run and call [`SessionManager::initialize`]
/// before rendering anything that depends on the identity.
pub struct SessionManager {
    kv: Arc<dyn KeyValueStore>,
    progress: ProgressStore,
    identity: Option<Identity>,
    token: Option<String>,
    loading: bool,
}

impl SessionManager {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, catalog: Arc<Catalog>) -> Self {
        let progress = ProgressStore::new(Arc::clone(&kv), catalog);
        Self {
            kv,
            progress,
            identity: None,
            token: None,
            loading: true,
        }
    }

    /// Restore the previous session from storage, if there is a complete one.
    ///
    /// Never fails: an incomplete or unreadable session is logged, its
    /// session keys are removed, and the manager stays signed out. Progress
    /// partitions are left alone.
    pub async fn initialize(&mut self) {
        match self.rehydrate().await {
            Ok(true) => info!("session restored"),
            Ok(false) => debug!("no stored session"),
            Err(err) => {
                warn!(error = %err, "discarding stored session");
                self.reset();
                self.clear_session_keys().await;
            }
        }
        self.loading = false;
    }

    async fn rehydrate(&mut self) -> Result<bool, RehydrateError> {
        let token = read_text(self.kv.as_ref(), keys::SESSION_TOKEN).await?;
        let name = read_text(self.kv.as_ref(), keys::SESSION_NAME).await?;
        let email = read_text(self.kv.as_ref(), keys::SESSION_EMAIL).await?;

        let (token, name, email) = match (token, name, email) {
            (Some(token), Some(name), Some(email)) => (token, name, email),
            (None, None, None) => return Ok(false),
            _ => return Err(RehydrateError::Incomplete),
        };

        let email = Email::new(email)?;
        let identity = self.load_identity(name, email).await?;
        let snapshot = self.progress.load_snapshot(identity.email()).await?;

        self.progress.attach(identity.email().clone(), snapshot);
        self.identity = Some(identity);
        self.token = Some(token);
        Ok(true)
    }

    async fn load_identity(&self, name: String, email: Email) -> Result<Identity, StorageError> {
        let photo = read_text(self.kv.as_ref(), &keys::user_photo(email.as_str())).await?;
        let bio = read_text(self.kv.as_ref(), &keys::user_bio(email.as_str())).await?;
        Ok(Identity::new(name, email).with_photo_url(photo).with_bio(bio))
    }

    /// Sign in, loading (or defaulting) the identity's stored progress.
    ///
    /// A non-empty `photo_url` replaces the stored photo; otherwise the
    /// previously stored one is kept.
    ///
    /// The token is written last. If any write fails, every session key is
    /// removed again and the manager is left signed out, so a later
    /// `initialize` never restores a half-written session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Identity` for an empty email, or
    /// `SessionError::Storage` if storage cannot be read or written.
    pub async fn login(
        &mut self,
        name: &str,
        email: &str,
        token: &str,
        photo_url: Option<&str>,
    ) -> Result<(), SessionError> {
        let email = Email::new(email)?;
        let stored = self.load_identity(name.to_owned(), email).await?;
        let photo = photo_url
            .filter(|url| !url.is_empty())
            .map(str::to_owned)
            .or_else(|| stored.photo_url().map(str::to_owned));
        let identity = stored.with_photo_url(photo);
        let snapshot = self.progress.load_snapshot(identity.email()).await?;

        if let Err(err) = self.persist_session(&identity, token).await {
            warn!(error = %err, "sign-in write failed, clearing session keys");
            self.reset();
            self.clear_session_keys().await;
            return Err(err.into());
        }

        self.progress.attach(identity.email().clone(), snapshot);
        info!(initials = identity.initials(), "signed in");
        self.identity = Some(identity);
        self.token = Some(token.to_owned());
        Ok(())
    }

    /// Sign out. Progress partitions stay in storage for the next login.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the session keys cannot be removed;
    /// the in-memory session is cleared regardless.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.reset();
        for key in keys::SESSION_KEYS {
            self.kv.remove(key).await?;
        }
        info!("signed out");
        Ok(())
    }

    /// Update display name and bio, and the photo when one is given.
    ///
    /// `photo_url: None` keeps the current photo; `Some` overwrites it, even
    /// with an empty string. No-op while signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if a write fails.
    pub async fn update_profile(
        &mut self,
        name: &str,
        bio: &str,
        photo_url: Option<&str>,
    ) -> Result<(), SessionError> {
        let Some(identity) = self.identity.as_ref() else {
            return Ok(());
        };
        let email = identity.email().as_str().to_owned();

        self.kv.set(keys::SESSION_NAME, name).await?;
        self.kv.set(&keys::user_bio(&email), bio).await?;
        if let Some(photo) = photo_url {
            self.kv.set(&keys::user_photo(&email), photo).await?;
        }

        if let Some(identity) = self.identity.as_mut() {
            identity.rename(name);
            identity.set_bio(bio);
            if let Some(photo) = photo_url {
                identity.set_photo_url(photo);
            }
        }
        debug!("profile updated");
        Ok(())
    }

    async fn persist_session(&self, identity: &Identity, token: &str) -> Result<(), StorageError> {
        let email = identity.email().as_str();
        if let Some(photo) = identity.photo_url() {
            self.kv.set(&keys::user_photo(email), photo).await?;
        }
        self.kv.set(keys::SESSION_NAME, identity.name()).await?;
        self.kv.set(keys::SESSION_EMAIL, email).await?;
        self.kv.set(keys::SESSION_TOKEN, token).await
    }

    /// Best-effort removal of the session keys; failures are only logged.
    async fn clear_session_keys(&self) {
        for key in keys::SESSION_KEYS {
            if let Err(err) = self.kv.remove(key).await {
                warn!(key, error = %err, "failed to clear session key");
            }
        }
    }

    fn reset(&mut self) {
        self.identity = None;
        self.token = None;
        self.progress.detach();
    }

    #[must_use]
    pub fn current_identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// `true` until [`SessionManager::initialize`] has run.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    /// Mutable access for progress mutations. Binding stays under the
    /// manager's control.
    pub fn progress_mut(&mut self) -> &mut ProgressStore {
        &mut self.progress
    }
}

/// Read a text value; empty strings count as absent.
async fn read_text(kv: &dyn KeyValueStore, key: &str) -> Result<Option<String>, StorageError> {
    Ok(kv.get(key).await?.filter(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryStore;

    use crate::test_support::FailingWrites;

    fn manager(kv: &InMemoryStore) -> SessionManager {
        SessionManager::new(Arc::new(kv.clone()), Arc::new(Catalog::builtin()))
    }

    #[tokio::test]
    async fn starts_loading_and_signed_out() {
        let kv = InMemoryStore::new();
        let mut session = manager(&kv);
        assert!(session.is_loading());

        session.initialize().await;
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
        assert!(!session.progress().is_bound());
    }

    #[tokio::test]
    async fn login_computes_initials_and_persists_session_keys() {
        let kv = InMemoryStore::new();
        let mut session = manager(&kv);
        session.initialize().await;

        session
            .login("ada king lovelace", "ada@studio.dev", "tok-1", None)
            .await
            .unwrap();

        let identity = session.current_identity().unwrap();
        assert_eq!(identity.initials(), "AK");
        assert_eq!(session.token(), Some("tok-1"));
        assert!(session.progress().is_bound());
        assert_eq!(
            kv.get(keys::SESSION_EMAIL).await.unwrap().as_deref(),
            Some("ada@studio.dev")
        );
        assert_eq!(kv.get(&keys::user_photo("ada@studio.dev")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn login_rejects_blank_email() {
        let kv = InMemoryStore::new();
        let mut session = manager(&kv);

        let err = session.login("Nobody", "   ", "tok", None).await.unwrap_err();
        assert!(matches!(err, SessionError::Identity(IdentityError::EmptyEmail)));
        assert!(!session.is_authenticated());
        assert!(kv.is_empty().unwrap());
    }

    #[tokio::test]
    async fn login_keeps_stored_photo_unless_a_new_one_is_given() {
        let kv = InMemoryStore::new();
        kv.set(&keys::user_photo("ada@studio.dev"), "https://img/old.png")
            .await
            .unwrap();
        let mut session = manager(&kv);

        session
            .login("Ada", "ada@studio.dev", "tok", Some(""))
            .await
            .unwrap();
        assert_eq!(
            session.current_identity().unwrap().photo_url(),
            Some("https://img/old.png")
        );

        session
            .login("Ada", "ada@studio.dev", "tok", Some("https://img/new.png"))
            .await
            .unwrap();
        assert_eq!(
            kv.get(&keys::user_photo("ada@studio.dev"))
                .await
                .unwrap()
                .as_deref(),
            Some("https://img/new.png")
        );
    }

    #[tokio::test]
    async fn logout_clears_session_but_keeps_partitions() {
        let kv = InMemoryStore::new();
        let mut session = manager(&kv);
        session
            .login("Ada", "ada@studio.dev", "tok", None)
            .await
            .unwrap();
        session
            .progress_mut()
            .complete_course("ai-integration")
            .await
            .unwrap();

        session.logout().await.unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert_eq!(session.progress().course_progress("ai-integration"), 0);
        for key in keys::SESSION_KEYS {
            assert_eq!(kv.get(key).await.unwrap(), None);
        }

        session
            .login("Ada", "ada@studio.dev", "tok-2", None)
            .await
            .unwrap();
        assert_eq!(session.progress().course_progress("ai-integration"), 100);
    }

    #[tokio::test]
    async fn update_profile_photo_is_tri_state() {
        let kv = InMemoryStore::new();
        let mut session = manager(&kv);
        session
            .login("Ada", "ada@studio.dev", "tok", Some("https://img/a.png"))
            .await
            .unwrap();

        session
            .update_profile("Ada Lovelace", "Analyst", None)
            .await
            .unwrap();
        let identity = session.current_identity().unwrap();
        assert_eq!(identity.photo_url(), Some("https://img/a.png"));
        assert_eq!(identity.initials(), "AL");
        assert_eq!(identity.bio(), Some("Analyst"));

        session
            .update_profile("Ada Lovelace", "Analyst", Some("data:image/png;base64,AAAA"))
            .await
            .unwrap();
        assert_eq!(
            session.current_identity().unwrap().photo_url(),
            Some("data:image/png;base64,AAAA")
        );

        session
            .update_profile("Ada Lovelace", "Analyst", Some(""))
            .await
            .unwrap();
        assert_eq!(session.current_identity().unwrap().photo_url(), Some(""));
        assert_eq!(
            kv.get(&keys::user_photo("ada@studio.dev"))
                .await
                .unwrap()
                .as_deref(),
            Some("")
        );
        assert_eq!(
            kv.get(keys::SESSION_NAME).await.unwrap().as_deref(),
            Some("Ada Lovelace")
        );
    }

    #[tokio::test]
    async fn update_profile_while_signed_out_is_a_no_op() {
        let kv = InMemoryStore::new();
        let mut session = manager(&kv);
        session.update_profile("Ghost", "boo", Some("x")).await.unwrap();
        assert!(kv.is_empty().unwrap());
    }

    #[tokio::test]
    async fn initialize_restores_a_complete_session() {
        let kv = InMemoryStore::new();
        {
            let mut first = manager(&kv);
            first
                .login("Grace Hopper", "grace@studio.dev", "tok", None)
                .await
                .unwrap();
            first
                .update_profile("Grace Hopper", "Admiral", None)
                .await
                .unwrap();
            first
                .progress_mut()
                .toggle_lesson_complete("data-structures", "l1")
                .await
                .unwrap();
        }

        let mut second = manager(&kv);
        second.initialize().await;
        let identity = second.current_identity().unwrap();
        assert_eq!(identity.initials(), "GH");
        assert_eq!(identity.bio(), Some("Admiral"));
        assert_eq!(second.token(), Some("tok"));
        assert_eq!(second.progress().course_progress("data-structures"), 25);
    }

    #[tokio::test]
    async fn initialize_with_token_but_no_identity_signs_out() {
        let kv = InMemoryStore::new();
        kv.set(keys::SESSION_TOKEN, "orphan").await.unwrap();
        kv.set(&keys::user_bio("ada@studio.dev"), "kept").await.unwrap();

        let mut session = manager(&kv);
        session.initialize().await;

        assert!(!session.is_authenticated());
        assert!(!session.is_loading());
        assert_eq!(kv.get(keys::SESSION_TOKEN).await.unwrap(), None);
        assert_eq!(
            kv.get(&keys::user_bio("ada@studio.dev"))
                .await
                .unwrap()
                .as_deref(),
            Some("kept")
        );
    }

    #[tokio::test]
    async fn initialize_treats_blank_email_as_incomplete() {
        let kv = InMemoryStore::new();
        kv.set(keys::SESSION_TOKEN, "tok").await.unwrap();
        kv.set(keys::SESSION_NAME, "Ada").await.unwrap();
        kv.set(keys::SESSION_EMAIL, "").await.unwrap();

        let mut session = manager(&kv);
        session.initialize().await;
        assert!(!session.is_authenticated());
        assert_eq!(kv.get(keys::SESSION_NAME).await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_login_write_leaves_session_signed_out() {
        let kv = InMemoryStore::new();
        let mut session =
            SessionManager::new(Arc::new(FailingWrites::all(kv.clone())), Arc::new(Catalog::builtin()));
        session.initialize().await;

        let err = session
            .login("Ada", "ada@studio.dev", "tok", Some("https://img/a.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)));
        assert!(session.current_identity().is_none());
        assert_eq!(session.token(), None);
        assert!(!session.progress().is_bound());
        assert!(kv.is_empty().unwrap());
    }

    #[tokio::test]
    async fn login_failing_midway_removes_every_session_key() {
        let kv = InMemoryStore::new();
        kv.set(keys::SESSION_TOKEN, "old-tok").await.unwrap();
        kv.set(keys::SESSION_NAME, "Old User").await.unwrap();
        kv.set(keys::SESSION_EMAIL, "old@studio.dev").await.unwrap();

        let failing = FailingWrites::matching(kv.clone(), |key| key == keys::SESSION_EMAIL);
        let mut session = SessionManager::new(Arc::new(failing), Arc::new(Catalog::builtin()));
        let err = session
            .login("Ada", "ada@studio.dev", "new-tok", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)));

        for key in keys::SESSION_KEYS {
            assert_eq!(kv.get(key).await.unwrap(), None);
        }
        let mut restarted = manager(&kv);
        restarted.initialize().await;
        assert!(!restarted.is_authenticated());
    }

    #[tokio::test]
    async fn failed_profile_write_keeps_identity() {
        let kv = InMemoryStore::new();
        let failing = FailingWrites::matching(kv.clone(), |key| {
            key.starts_with("cs-studio-user-bio-")
        });
        let mut session = SessionManager::new(Arc::new(failing), Arc::new(Catalog::builtin()));
        session
            .login("Ada Lovelace", "ada@studio.dev", "tok", Some("https://img/a.png"))
            .await
            .unwrap();

        let err = session
            .update_profile("Grace Hopper", "Admiral", Some("https://img/g.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)));

        let identity = session.current_identity().unwrap();
        assert_eq!(identity.name(), "Ada Lovelace");
        assert_eq!(identity.initials(), "AL");
        assert_eq!(identity.bio(), None);
        assert_eq!(identity.photo_url(), Some("https://img/a.png"));
        assert!(session.is_authenticated());
    }
}
