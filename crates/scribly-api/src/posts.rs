// Post endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Page, Post, PostDraft, PostQuery};
use crate::pipeline::ApiRequest;

impl ApiClient {
    /// `GET /api/posts?page=&size=&status=`
    pub async fn list_posts(&self, query: &PostQuery) -> Result<Page<Post>, Error> {
        let req = ApiRequest::get("/posts")
            .query_opt("page", query.page)
            .query_opt("size", query.size)
            .query_opt("status", query.status.as_deref());
        self.call(req).await
    }

    /// `GET /api/posts/{id}`
    pub async fn get_post(&self, id: i64) -> Result<Post, Error> {
        self.call(ApiRequest::get(format!("/posts/{id}"))).await
    }

    /// `POST /api/posts`. Returns whatever the server reports for the new
    /// post (an id or the full object, depending on version).
    pub async fn create_post(&self, draft: &PostDraft) -> Result<serde_json::Value, Error> {
        debug!(title = ?draft.title, "creating post");
        self.call(ApiRequest::post("/posts").json(draft)?).await
    }

    /// `PUT /api/posts/{id}`
    pub async fn update_post(&self, id: i64, draft: &PostDraft) -> Result<(), Error> {
        debug!(id, "updating post");
        self.call_unit(ApiRequest::put(format!("/posts/{id}")).json(draft)?)
            .await
    }

    /// `DELETE /api/posts/{id}`
    pub async fn delete_post(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting post");
        self.call_unit(ApiRequest::delete(format!("/posts/{id}")))
            .await
    }

    /// `PUT /api/posts/{id}/publish`
    pub async fn publish_post(&self, id: i64) -> Result<(), Error> {
        debug!(id, "publishing post");
        self.call_unit(ApiRequest::put(format!("/posts/{id}/publish")))
            .await
    }
}
