// Comment endpoints

use serde_json::json;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Comment, CommentDraft, CommentQuery, Page, PageQuery};
use crate::pipeline::ApiRequest;

impl ApiClient {
    /// `POST /api/comments`
    pub async fn create_comment(&self, draft: &CommentDraft) -> Result<serde_json::Value, Error> {
        self.call(ApiRequest::post("/comments").json(draft)?).await
    }

    /// `GET /api/comments/post/{postId}?pageNum=&pageSize=&sortBy=&sortOrder=`
    pub async fn list_post_comments(
        &self,
        post_id: i64,
        query: &CommentQuery,
    ) -> Result<Page<Comment>, Error> {
        let req = ApiRequest::get(format!("/comments/post/{post_id}"))
            .query_opt("pageNum", query.page_num)
            .query_opt("pageSize", query.page_size)
            .query_opt("sortBy", query.sort_by.as_deref())
            .query_opt("sortOrder", query.sort_order.as_deref());
        self.call(req).await
    }

    /// Nested comment tree for a post.
    ///
    /// `GET /api/comments/post/{postId}/tree`
    pub async fn comment_tree(&self, post_id: i64) -> Result<Vec<Comment>, Error> {
        self.call(ApiRequest::get(format!("/comments/post/{post_id}/tree")))
            .await
    }

    /// `PUT /api/comments/{id}` with `{"content": ..., "id": ...}`
    pub async fn update_comment(&self, id: i64, content: &str) -> Result<(), Error> {
        let body = json!({ "content": content, "id": id });
        self.call_unit(ApiRequest::put(format!("/comments/{id}")).json(&body)?)
            .await
    }

    /// `DELETE /api/comments/{id}`
    pub async fn delete_comment(&self, id: i64) -> Result<(), Error> {
        self.call_unit(ApiRequest::delete(format!("/comments/{id}")))
            .await
    }

    /// Comments written by the logged-in user.
    ///
    /// `GET /api/comments/my?pageNum=&pageSize=`
    pub async fn my_comments(&self, query: &PageQuery) -> Result<Page<Comment>, Error> {
        let req = ApiRequest::get("/comments/my")
            .query_opt("pageNum", query.page_num)
            .query_opt("pageSize", query.page_size);
        self.call(req).await
    }

    /// `GET /api/comments/post/{postId}/count`
    pub async fn comment_count(&self, post_id: i64) -> Result<u64, Error> {
        self.call(ApiRequest::get(format!("/comments/post/{post_id}/count")))
            .await
    }
}
