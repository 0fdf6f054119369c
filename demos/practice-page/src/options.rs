use serde::{Deserialize, Serialize};
use tether_core::RequestConfig;
use web_time::Duration;

pub const CAT_FACT_URL: &str = "https://catfact.ninja/fact";

/// Knobs for the practice page. Every field has a default, so a partial JSON
/// object (or none at all) is enough.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    pub fact_url: String,
    pub loading_title: String,
    pub loaded_title: String,
    pub title_delay_ms: u64,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            fact_url: CAT_FACT_URL.to_string(),
            loading_title: "Loading...".to_string(),
            loaded_title: "Loaded".to_string(),
            title_delay_ms: 5_000,
        }
    }
}

impl PageOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn title_delay(&self) -> Duration {
        Duration::from_millis(self.title_delay_ms)
    }

    pub fn fact_request(&self) -> RequestConfig {
        RequestConfig::get(&self.fact_url).header("Accept", "application/json")
    }
}
