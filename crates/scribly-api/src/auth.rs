// Auth endpoints
//
// Login hands back a bearer token plus the user's profile; nothing here
// stores either. Keeping the session is the caller's job.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    Identity, LoginRequest, LoginResponse, PasswordChange, ProfileUpdate, RegisterRequest,
};
use crate::pipeline::ApiRequest;

impl ApiClient {
    /// Exchange username/password for a bearer token.
    ///
    /// `POST /api/auth/login`
    pub async fn login(&self, form: &LoginRequest) -> Result<LoginResponse, Error> {
        debug!(username = %form.username, "logging in");
        self.call(ApiRequest::post("/auth/login").json(form)?).await
    }

    /// Create an account. Does not log in.
    ///
    /// `POST /api/auth/register`
    pub async fn register(&self, form: &RegisterRequest) -> Result<(), Error> {
        debug!(username = %form.username, "registering");
        self.call_unit(ApiRequest::post("/auth/register").json(form)?)
            .await
    }

    /// End the session server-side.
    ///
    /// `POST /api/auth/logout`. Sent silently: a failure here changes
    /// nothing for the client, so observers are not told about it.
    pub async fn logout(&self) -> Result<(), Error> {
        self.call_unit(ApiRequest::post("/auth/logout").silent())
            .await
    }

    /// Fetch the logged-in user's profile.
    ///
    /// `GET /api/auth/profile`
    pub async fn get_profile(&self) -> Result<Identity, Error> {
        self.call(ApiRequest::get("/auth/profile")).await
    }

    /// Update nickname, bio or avatar.
    ///
    /// `PUT /api/auth/profile`. Returns the profile as the server stored it;
    /// servers that answer with no data yield an empty identity.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Identity, Error> {
        let data: Option<Identity> = self
            .call(ApiRequest::put("/auth/profile").json(update)?)
            .await?;
        Ok(data.unwrap_or_default())
    }

    /// `PUT /api/auth/password`
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), Error> {
        self.call_unit(ApiRequest::put("/auth/password").json(change)?)
            .await
    }

    /// Whether `username` is still free.
    ///
    /// `GET /api/auth/check-username?username=...`
    pub async fn check_username(&self, username: &str) -> Result<bool, Error> {
        self.call(ApiRequest::get("/auth/check-username").query("username", username))
            .await
    }
}
