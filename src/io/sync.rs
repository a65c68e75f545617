use tracing::{info, warn};

use crate::engine::error::CommandError;
use crate::engine::result::CommandResult;
use crate::model::config::SyncConfig;
use crate::model::session::{Identity, Session};
use crate::ops::store::TaskStore;

use super::identity::{IdentityProvider, LocalIdentityProvider};
use super::persistence::PersistenceBridge;
use super::remote::{DirRemoteStore, RemoteError, RemoteStore};

/// Sign-in, sign-out and explicit sync against the remote document store
pub struct SyncService {
    remote: Option<Box<dyn RemoteStore>>,
    provider: Box<dyn IdentityProvider>,
}

impl SyncService {
    pub fn new(remote: Option<Box<dyn RemoteStore>>, provider: Box<dyn IdentityProvider>) -> Self {
        SyncService { remote, provider }
    }

    /// Directory-backed remote when `[sync] remote_dir` is set
    pub fn from_config(config: &SyncConfig) -> Self {
        let remote = config
            .remote_dir
            .as_ref()
            .map(|dir| Box::new(DirRemoteStore::new(dir)) as Box<dyn RemoteStore>);
        SyncService::new(remote, Box::new(LocalIdentityProvider))
    }

    pub fn is_configured(&self) -> bool {
        self.remote.is_some()
    }

    /// Startup hydration for a remembered identity. Blocks until the fetch
    /// completes; a failure leaves local data in place.
    pub fn hydrate_on_start(
        &mut self,
        bridge: &mut PersistenceBridge,
        store: &mut TaskStore,
        session: &mut Session,
    ) -> Vec<CommandResult> {
        let Some(identity) = session.identity.clone() else {
            return Vec::new();
        };
        if self.remote.is_none() {
            warn!(email = %identity.email, "remembered identity but no remote configured");
            return vec![CommandResult::info(RemoteError::NotConfigured.to_string())];
        }
        match self.load_user_data(&identity, bridge, store, session) {
            Ok(result) => vec![result],
            Err(e) => {
                warn!(error = %e, "startup hydration failed, continuing locally");
                vec![CommandResult::info(format!("{} Working locally.", e))]
            }
        }
    }

    /// Sign in, then hydrate from (or seed) the remote document
    pub fn login(
        &mut self,
        email: &str,
        bridge: &mut PersistenceBridge,
        store: &mut TaskStore,
        session: &mut Session,
    ) -> Result<Vec<CommandResult>, CommandError> {
        if self.remote.is_none() {
            return Err(RemoteError::NotConfigured.into());
        }
        let identity = self.provider.sign_in(email)?;
        info!(email = %identity.email, uid = %identity.uid, "signed in");

        let mut results = vec![CommandResult::success(format!(
            "Authentication successful. Identity: {}",
            identity.email
        ))];
        match self.load_user_data(&identity, bridge, store, session) {
            Ok(result) => results.push(result),
            Err(e) => {
                warn!(error = %e, "hydration after login failed");
                results.push(CommandResult::info(e.to_string()));
            }
        }

        // After hydration, which drains dirty flags without scheduling
        session.identity = Some(identity);
        session.mark_dirty();
        Ok(results)
    }

    pub fn logout(&mut self, session: &mut Session) -> CommandResult {
        if let Some(identity) = session.identity.take() {
            info!(email = %identity.email, "signed out");
            session.mark_dirty();
        }
        CommandResult::success("Disconnected from cloud. Returning to local mode.")
    }

    /// Push local state to the remote document
    pub fn sync(&mut self, store: &TaskStore, session: &Session) -> Result<CommandResult, CommandError> {
        let Some(identity) = &session.identity else {
            return Err(CommandError::ExternalUnavailable(
                "Not logged in. Use \"login\" first.".into(),
            ));
        };
        let remote = self.remote.as_mut().ok_or(RemoteError::NotConfigured)?;
        let doc = PersistenceBridge::capture(store, session);
        remote
            .store(&identity.uid, &doc)
            .inspect_err(|e| warn!(error = %e, uid = %identity.uid, "sync failed"))?;
        info!(uid = %identity.uid, tasks = doc.tasks.len(), "synced to remote");
        Ok(CommandResult::success(format!(
            "Cloud sync complete. {} tasks uploaded.",
            doc.tasks.len()
        )))
    }

    fn load_user_data(
        &mut self,
        identity: &Identity,
        bridge: &mut PersistenceBridge,
        store: &mut TaskStore,
        session: &mut Session,
    ) -> Result<CommandResult, RemoteError> {
        let remote = self.remote.as_mut().ok_or(RemoteError::NotConfigured)?;
        match remote.fetch(&identity.uid)? {
            Some(doc) => {
                let count = doc.tasks.len();
                bridge.hydrate(store, session, doc);
                Ok(CommandResult::info(format!("Loaded {} tasks from cloud.", count)))
            }
            None => {
                let doc = PersistenceBridge::capture(store, session);
                remote.store(&identity.uid, &doc)?;
                info!(uid = %identity.uid, "created remote document from local data");
                Ok(CommandResult::success(
                    "Created new cloud profile from local data.",
                ))
            }
        }
    }
}
