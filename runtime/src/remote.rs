//! HTTP remote for hydration and mirroring

use reqwest::Client;
use todolist_core::environment::{RemoteFuture, RemoteTodos};
use todolist_core::{RemoteError, RemoteTodo, RemoteTodoDraft};

/// Public demo API used when nothing else is configured.
pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com/todos";

/// Remote todo source reached over HTTP.
///
/// `GET {url}` serves the seed collection, `POST {url}` accepts mirrored
/// creates. No timeout or retry is applied.
#[derive(Clone, Debug)]
pub struct HttpRemote {
    client: Client,
    url: String,
}

impl HttpRemote {
    /// Create a remote for the given collection URL
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Collection URL this remote talks to
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get_todos(&self) -> Result<Vec<RemoteTodo>, RemoteError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<RemoteTodo>>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn post_todo(&self, draft: RemoteTodoDraft) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(&self.url)
            .json(&draft)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
            });
        }

        tracing::debug!(status = status.as_u16(), title = %draft.title, "Remote accepted todo");
        Ok(())
    }
}

impl Default for HttpRemote {
    fn default() -> Self {
        Self::new(DEFAULT_REMOTE_URL)
    }
}

impl RemoteTodos for HttpRemote {
    fn fetch_todos(&self) -> RemoteFuture<'_, Vec<RemoteTodo>> {
        Box::pin(self.get_todos())
    }

    fn create_todo(&self, draft: RemoteTodoDraft) -> RemoteFuture<'_, ()> {
        Box::pin(self.post_todo(draft))
    }
}
