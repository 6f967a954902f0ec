use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use common::{CastVoteRequest, NewTeam, NewVotingConfig, Team, UserProfile, VotingConfig};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::{AuthProvider, AuthUser};
use crate::backend::{Backend, BackendError};
use crate::config::ClientConfig;

/// Bearer token plus the identity it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user_id: i32,
    pub username: String,
    pub is_admin: bool,
}

impl From<LoginResponse> for StoredSession {
    fn from(res: LoginResponse) -> Self {
        Self {
            token: res.token,
            user_id: res.user_id,
            username: res.username,
            is_admin: res.is_admin,
        }
    }
}

/// Error payload returned by the server.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    message: String,
}

/// [`Backend`] and [`AuthProvider`] over the server's JSON API.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    session: RwLock<Option<StoredSession>>,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session: RwLock::new(None),
        })
    }

    /// Resume a previously stored session.
    pub fn with_session(self, session: Option<StoredSession>) -> Self {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
        self
    }

    pub fn session(&self) -> Option<StoredSession> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse, BackendError> {
        let body = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let res = self
            .client
            .post(self.url("/auth/register"))
            .json(&body)
            .send()
            .await?;
        decode(check(res).await?).await
    }

    /// Log in and keep the issued token for subsequent calls.
    #[instrument(skip(self, password))]
    pub async fn sign_in(
        &self,
        username: &str,
        password: &str,
    ) -> Result<StoredSession, BackendError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let res = self
            .client
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;
        let login: LoginResponse = decode(check(res).await?).await?;

        let session = StoredSession::from(login);
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        tracing::info!(user_id = session.user_id, "Signed in");
        Ok(session)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session() {
            Some(session) => builder.bearer_auth(session.token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let res = self.authorized(self.client.get(self.url(path))).send().await?;
        decode(check(res).await?).await
    }

    /// Like [`Self::get_json`], but a 404 means "no row".
    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, BackendError> {
        match self.get_json(path).await {
            Ok(value) => Ok(Some(value)),
            Err(BackendError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, BackendError> {
        let res = self
            .authorized(self.client.post(self.url(path)))
            .json(body)
            .send()
            .await?;
        check(res).await
    }
}

/// Map non-success statuses onto [`BackendError`].
async fn check(res: Response) -> Result<Response, BackendError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let text = res.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ApiError>(&text) {
        Ok(body) => (body.code, body.message),
        Err(_) => (String::new(), text),
    };
    tracing::debug!(%status, code = %code, "Request rejected");

    Err(match status {
        StatusCode::UNAUTHORIZED => BackendError::Unauthorized,
        StatusCode::FORBIDDEN => BackendError::Forbidden,
        StatusCode::NOT_FOUND => BackendError::NotFound,
        StatusCode::CONFLICT => BackendError::Conflict(code),
        StatusCode::BAD_REQUEST => BackendError::Validation(message),
        _ => BackendError::Server(format!("{status}: {message}")),
    })
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, BackendError> {
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_teams(&self) -> Result<Vec<Team>, BackendError> {
        self.get_json("/teams").await
    }

    async fn fetch_active_config(&self) -> Result<Option<VotingConfig>, BackendError> {
        self.get_optional("/voting-config/active").await
    }

    async fn fetch_profile(&self, user_id: i32) -> Result<Option<UserProfile>, BackendError> {
        self.get_optional(&format!("/profiles/{user_id}")).await
    }

    async fn insert_vote(&self, user_id: i32, team_id: i32) -> Result<(), BackendError> {
        self.post_json("/votes", &CastVoteRequest { user_id, team_id })
            .await?;
        Ok(())
    }

    async fn insert_team(&self, team: NewTeam) -> Result<Team, BackendError> {
        let res = self.post_json("/teams", &team).await?;
        decode(res).await
    }

    async fn delete_team(&self, team_id: i32) -> Result<(), BackendError> {
        let res = self
            .authorized(self.client.delete(self.url(&format!("/teams/{team_id}"))))
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    async fn create_voting_config(
        &self,
        window: NewVotingConfig,
    ) -> Result<VotingConfig, BackendError> {
        let res = self.post_json("/voting-config", &window).await?;
        decode(res).await
    }

    async fn close_voting_config(&self) -> Result<VotingConfig, BackendError> {
        let res = self
            .post_json("/voting-config/close", &serde_json::json!({}))
            .await?;
        decode(res).await
    }
}

#[async_trait]
impl AuthProvider for HttpBackend {
    fn current_user(&self) -> Option<AuthUser> {
        self.session().map(|s| AuthUser {
            id: s.user_id,
            username: s.username,
        })
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let Some(session) = self.session() else {
            return Ok(());
        };

        let res = self
            .client
            .post(self.url("/auth/logout"))
            .bearer_auth(&session.token)
            .send()
            .await;
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;

        // The token is gone locally either way; report the remote outcome.
        check(res?).await?;
        tracing::info!(user_id = session.user_id, "Signed out");
        Ok(())
    }
}
