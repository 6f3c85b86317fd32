// ── Session configuration ──
//
// Fully resolved settings handed to `Session`. Loading them from files
// and the environment is `scribly-config`'s job.

use scribly_api::TransportConfig;
use url::Url;

use crate::router::RouteTable;

pub const DEFAULT_SITE_TITLE: &str = "Scribly";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Server root, e.g. `http://localhost:8081`.
    pub base_url: Url,
    pub transport: TransportConfig,
    /// Suffix for page titles.
    pub site_title: String,
    pub routes: RouteTable,
}

impl SessionConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            transport: TransportConfig::default(),
            site_title: DEFAULT_SITE_TITLE.into(),
            routes: RouteTable::blog(),
        }
    }
}
