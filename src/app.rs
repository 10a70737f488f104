// App state and session handlers.
// Wires settings, credential store, client, and navigator; owns login and logout.

use std::sync::Arc;

use crate::api::operations::ListItems;
use crate::api::{ApiClient, HttpTransport, Operation, Transport};
use crate::cache::QuerySubscription;
use crate::config::Settings;
use crate::credentials::{Credential, CredentialStore, FileCredentialStore};
use crate::error::{Result, TodoError};
use crate::state::{Navigation, Navigator, Route, RouteGuard};

/// Main application state.
pub struct App {
    /// Client shared by every view.
    pub client: ApiClient,
    /// Current route and history.
    pub navigator: Navigator,
    credentials: Arc<dyn CredentialStore>,
}

impl App {
    /// Assemble from explicit parts. Tests pass in-memory stores and fake transports.
    pub fn new(client: ApiClient, credentials: Arc<dyn CredentialStore>) -> Self {
        let navigator = Navigator::new(RouteGuard::new(credentials.clone()));
        Self {
            client,
            navigator,
            credentials,
        }
    }

    /// Build an app talking HTTP with a file-backed credential.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::in_dir(&settings.data_dir));
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(settings.timeout)?);
        let client = ApiClient::new(settings.endpoint()?, transport, credentials.clone());
        Ok(Self::new(client, credentials))
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        self.credentials.is_authenticated()
    }

    /// Log in and store the returned token, then go home.
    ///
    /// On failure the stored credential is left as it was.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Navigation> {
        let token = self.client.login(username, password).await?;
        let credential = Credential::new(token).ok_or_else(|| {
            TodoError::MalformedResponse("login returned an empty token".to_string())
        })?;

        self.credentials.set(&credential)?;
        self.client.policy().on_credential_change(self.client.cache());
        tracing::info!(username, "logged in");

        self.navigator.navigate(Route::Home)
    }

    /// Forget the credential and leave any protected route.
    pub fn logout(&mut self) -> Result<Navigation> {
        self.credentials.clear()?;
        self.client.policy().on_credential_change(self.client.cache());
        tracing::info!("logged out");

        self.navigator.navigate(Route::Home)
    }

    /// Navigate to a path, applying the route guard.
    pub fn open(&mut self, path: &str) -> Result<Navigation> {
        self.navigator.navigate_to(path)
    }

    /// Watch the item list for invalidations.
    pub fn watch_items(&self) -> QuerySubscription {
        self.client.subscribe(ListItems::NAME)
    }
}
