// Response envelope
//
// Every JSON response from the blog API is wrapped as
// `{ "code": 200, "message": "...", "data": ... }`. Only `code == 200`
// means the call's effect happened.

use serde::{Deserialize, Serialize};

/// Envelope `code` that marks success.
pub const SUCCESS_CODE: i64 = 200;

/// The server's uniform response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Body shape of non-2xx responses that still carry JSON.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
