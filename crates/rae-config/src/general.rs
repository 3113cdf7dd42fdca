//! General application configuration.

use rae_core::enums::SortOrder;
use serde::{Deserialize, Serialize};

/// What the project list shows when its first fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Show the bundled sample projects while the cache is empty.
    #[default]
    Sample,
    /// Keep the list empty.
    None,
}

/// Default size of the dashboard activity feed.
const fn default_recent_limit() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub project_fallback: FallbackPolicy,

    /// Initial sort order of list views.
    #[serde(default)]
    pub default_sort: SortOrder,

    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            project_fallback: FallbackPolicy::default(),
            default_sort: SortOrder::default(),
            recent_limit: default_recent_limit(),
        }
    }
}
