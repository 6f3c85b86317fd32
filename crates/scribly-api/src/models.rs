// Blog API request/response types
//
// Field names follow the server's camelCase JSON. Response types use
// `#[serde(default)]` liberally and keep unmodelled fields in `extra`,
// since the server adds fields without notice.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

type Extra = serde_json::Map<String, serde_json::Value>;

/// Serde adapters for `SecretString` fields that cross the wire.
mod secret {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        secret: &SecretString,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(secret.expose_secret())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<SecretString, D::Error> {
        String::deserialize(deserializer).map(SecretString::from)
    }
}

// ── Identity ────────────────────────────────────────────────────────

/// The current user's profile as the server reports it.
///
/// Also the shape of the cached identity snapshot; every field is optional
/// so partial updates can be expressed with the same type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Identity {
    /// Overlay every field present in `patch`; absent fields keep their
    /// current value.
    pub fn merge(&mut self, patch: Identity) {
        let Identity {
            id,
            username,
            nickname,
            email,
            avatar_url,
            bio,
            extra,
        } = patch;

        if id.is_some() {
            self.id = id;
        }
        if username.is_some() {
            self.username = username;
        }
        if nickname.is_some() {
            self.nickname = nickname;
        }
        if email.is_some() {
            self.email = email;
        }
        if avatar_url.is_some() {
            self.avatar_url = avatar_url;
        }
        if bio.is_some() {
            self.bio = bio;
        }
        self.extra.extend(extra);
    }

    /// Nickname, falling back to the username.
    pub fn display_name(&self) -> Option<&str> {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.username.as_deref())
    }
}

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(serialize_with = "secret::serialize")]
    pub password: SecretString,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// `data` of a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(deserialize_with = "secret::deserialize")]
    pub token: SecretString,
    #[serde(default)]
    pub user_info: Identity,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "secret::serialize")]
    pub password: SecretString,
    #[serde(serialize_with = "secret::serialize")]
    pub confirm_password: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// Fields accepted by `PUT /auth/profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.bio.is_none() && self.avatar_url.is_none()
    }
}

impl From<ProfileUpdate> for Identity {
    fn from(update: ProfileUpdate) -> Self {
        Self {
            nickname: update.nickname,
            bio: update.bio,
            avatar_url: update.avatar_url,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[serde(serialize_with = "secret::serialize")]
    pub old_password: SecretString,
    #[serde(serialize_with = "secret::serialize")]
    pub new_password: SecretString,
    #[serde(serialize_with = "secret::serialize")]
    pub confirm_password: SecretString,
}

// ── Paging ──────────────────────────────────────────────────────────

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new", alias = "list", alias = "items")]
    pub records: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub current: u64,
    #[serde(default)]
    pub pages: u64,
}

/// `pageNum` / `pageSize` paging used by comments and favorites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page_num: Option<u32>,
    pub page_size: Option<u32>,
}

// ── Posts ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Draft/published marker; the server has used both numbers and names.
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub comment_count: Option<u64>,
    #[serde(default)]
    pub favorite_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Filter for `GET /posts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub status: Option<String>,
}

/// Body for creating or updating a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// ── Comments ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub post_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub reply_to_user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub children: Vec<Comment>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    pub post_id: i64,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_user_id: Option<i64>,
}

/// Paging and ordering for a post's comment list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentQuery {
    pub page_num: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

// ── Favorites ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i64,
    #[serde(default)]
    pub post_id: Option<i64>,
    #[serde(default)]
    pub folder_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub post_title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub post_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteQuery {
    pub folder_id: Option<i64>,
    pub page_num: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteFolder {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub favorite_count: Option<u64>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMove {
    pub favorite_ids: Vec<i64>,
    pub target_folder_id: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;

    #[test]
    fn identity_round_trips_without_inventing_fields() {
        let raw = json!({"id": 1, "username": "alice"});
        let identity: Identity = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&identity).unwrap(), raw);
    }

    #[test]
    fn merge_overlays_present_fields_only() {
        let mut identity: Identity =
            serde_json::from_value(json!({"id": 1, "username": "alice", "bio": "hi"})).unwrap();
        let patch: Identity =
            serde_json::from_value(json!({"nickname": "Al", "level": 3})).unwrap();

        identity.merge(patch);

        assert_eq!(
            serde_json::to_value(&identity).unwrap(),
            json!({"id": 1, "username": "alice", "nickname": "Al", "bio": "hi", "level": 3})
        );
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut identity = Identity {
            username: Some("alice".into()),
            ..Identity::default()
        };
        assert_eq!(identity.display_name(), Some("alice"));
        identity.nickname = Some("Al".into());
        assert_eq!(identity.display_name(), Some("Al"));
    }

    #[test]
    fn login_request_sends_password_in_clear_json_only() {
        let req = LoginRequest::new("alice", SecretString::from("pw".to_owned()));
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"username": "alice", "password": "pw"})
        );
        assert!(!format!("{req:?}").contains("pw\""));
    }

    #[test]
    fn login_response_reads_user_info() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "token": "abc",
            "userInfo": {"id": 1, "username": "alice"}
        }))
        .unwrap();
        assert_eq!(resp.token.expose_secret(), "abc");
        assert_eq!(resp.user_info.id, Some(1));
    }

    #[test]
    fn page_accepts_list_alias() {
        let page: Page<Favorite> =
            serde_json::from_value(json!({"list": [{"id": 3, "postId": 9}], "total": 1})).unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].post_id, Some(9));
        assert_eq!(page.total, 1);
    }
}
