// Favorite and favorite-folder endpoints

use std::collections::HashMap;

use serde_json::json;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    BatchMove, Favorite, FavoriteFolder, FavoriteQuery, FavoriteRequest, FolderDraft, Page,
};
use crate::pipeline::ApiRequest;

impl ApiClient {
    /// `POST /api/favorites`
    pub async fn favorite_post(&self, request: &FavoriteRequest) -> Result<(), Error> {
        self.call_unit(ApiRequest::post("/favorites").json(request)?)
            .await
    }

    /// `DELETE /api/favorites/post/{postId}`
    pub async fn unfavorite_post(&self, post_id: i64) -> Result<(), Error> {
        self.call_unit(ApiRequest::delete(format!("/favorites/post/{post_id}")))
            .await
    }

    /// Flip the favorite state of a post, optionally into a folder.
    ///
    /// `PUT /api/favorites/post/{postId}/toggle?folderId=`
    pub async fn toggle_favorite(
        &self,
        post_id: i64,
        folder_id: Option<i64>,
    ) -> Result<serde_json::Value, Error> {
        let req = ApiRequest::put(format!("/favorites/post/{post_id}/toggle"))
            .query_opt("folderId", folder_id);
        self.call(req).await
    }

    /// `GET /api/favorites/post/{postId}/check`
    pub async fn check_favorite(&self, post_id: i64) -> Result<bool, Error> {
        self.call(ApiRequest::get(format!("/favorites/post/{post_id}/check")))
            .await
    }

    /// Favorite state for several posts at once, keyed by post id.
    ///
    /// `POST /api/favorites/posts/batch-check` with a JSON array of ids.
    pub async fn batch_check_favorites(
        &self,
        post_ids: &[i64],
    ) -> Result<HashMap<i64, bool>, Error> {
        self.call(ApiRequest::post("/favorites/posts/batch-check").json(post_ids)?)
            .await
    }

    /// `GET /api/favorites/my?folderId=&pageNum=&pageSize=&sortBy=&sortOrder=`
    pub async fn my_favorites(&self, query: &FavoriteQuery) -> Result<Page<Favorite>, Error> {
        let req = ApiRequest::get("/favorites/my")
            .query_opt("folderId", query.folder_id)
            .query_opt("pageNum", query.page_num)
            .query_opt("pageSize", query.page_size)
            .query_opt("sortBy", query.sort_by.as_deref())
            .query_opt("sortOrder", query.sort_order.as_deref());
        self.call(req).await
    }

    // ── Folders ──────────────────────────────────────────────────────

    /// `GET /api/favorites/folders/my`
    pub async fn my_folders(&self) -> Result<Vec<FavoriteFolder>, Error> {
        self.call(ApiRequest::get("/favorites/folders/my")).await
    }

    /// `POST /api/favorites/folders`
    pub async fn create_folder(&self, draft: &FolderDraft) -> Result<serde_json::Value, Error> {
        self.call(ApiRequest::post("/favorites/folders").json(draft)?)
            .await
    }

    /// `PUT /api/favorites/folders/{id}`; the body repeats the id.
    pub async fn update_folder(&self, id: i64, draft: &FolderDraft) -> Result<(), Error> {
        let mut body = serde_json::to_value(draft).map_err(Error::Encode)?;
        if let Some(map) = body.as_object_mut() {
            map.insert("id".into(), json!(id));
        }
        self.call_unit(ApiRequest::put(format!("/favorites/folders/{id}")).json(&body)?)
            .await
    }

    /// `DELETE /api/favorites/folders/{id}`
    pub async fn delete_folder(&self, id: i64) -> Result<(), Error> {
        self.call_unit(ApiRequest::delete(format!("/favorites/folders/{id}")))
            .await
    }

    /// `PUT /api/favorites/batch-move`
    pub async fn batch_move_favorites(&self, request: &BatchMove) -> Result<(), Error> {
        self.call_unit(ApiRequest::put("/favorites/batch-move").json(request)?)
            .await
    }
}
