// Like endpoints (posts and comments)

use std::collections::HashMap;

use crate::client::ApiClient;
use crate::error::Error;
use crate::pipeline::ApiRequest;

impl ApiClient {
    /// `PUT /api/likes/post/{postId}/toggle`
    pub async fn toggle_post_like(&self, post_id: i64) -> Result<serde_json::Value, Error> {
        self.call(ApiRequest::put(format!("/likes/post/{post_id}/toggle")))
            .await
    }

    /// `GET /api/likes/post/{postId}/check`
    pub async fn check_post_like(&self, post_id: i64) -> Result<bool, Error> {
        self.call(ApiRequest::get(format!("/likes/post/{post_id}/check")))
            .await
    }

    /// `POST /api/likes/posts/batch-check` with a JSON array of ids.
    pub async fn batch_check_post_likes(
        &self,
        post_ids: &[i64],
    ) -> Result<HashMap<i64, bool>, Error> {
        self.call(ApiRequest::post("/likes/posts/batch-check").json(post_ids)?)
            .await
    }

    /// `PUT /api/likes/comment/{commentId}/toggle`
    pub async fn toggle_comment_like(&self, comment_id: i64) -> Result<serde_json::Value, Error> {
        self.call(ApiRequest::put(format!("/likes/comment/{comment_id}/toggle")))
            .await
    }
}
