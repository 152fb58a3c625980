//! Guard configuration loaded from the environment (`.env` is loaded by the gateway).
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | GEMINI_API_KEY / VITE_GEMINI_API_KEY | "" | Provider key; also accepted as a client credential. |
//! | RAKSHA_TEST_KEY | sk_test_123456789 | Well-known test credential. |
//! | RAKSHA_VOICE_MODELS | gemini-2.0-flash-lite-001,gemini-2.0-flash,gemini-1.5-flash | Voice candidates, in priority order. |
//! | RAKSHA_CHAT_MODELS | gemini-2.0-flash-lite,gemini-2.0-flash,gemini-exp-1206 | Chat candidates, in priority order. |
//! | RAKSHA_CHAT_RETRY_PAUSE_MS | 1500 | Pause between the two chat attempts on one candidate. |
//! | RAKSHA_PROVIDER_TIMEOUT_SECS | 30 | Transport timeout per provider call. |
//! | RAKSHA_PROVIDER_BASE_URL | Gemini v1beta | Provider root URL. |
//! | RAKSHA_HISTORY_PATH | ./data/history | Sled directory; `off` disables history. |
//! | RAKSHA_TRANSCRIBE_DELAY_MS | 2000 | Simulated transcription latency. |
//! | RAKSHA_BIND / PORT | 127.0.0.1:3000 | Listen address (PORT only changes the port). |
//! | RAKSHA_MAX_BODY_BYTES | 10485760 | Request body limit. |

use std::path::PathBuf;
use std::time::Duration;

use crate::history::DEFAULT_HISTORY_PATH;
use crate::provider::DEFAULT_BASE_URL;
use crate::validator::KeyAllowList;

pub const DEFAULT_TEST_KEY: &str = "sk_test_123456789";
pub const DEFAULT_VOICE_MODELS: &[&str] = &["gemini-2.0-flash-lite-001", "gemini-2.0-flash", "gemini-1.5-flash"];
pub const DEFAULT_CHAT_MODELS: &[&str] = &["gemini-2.0-flash-lite", "gemini-2.0-flash", "gemini-exp-1206"];
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub provider_api_key: String,
    pub test_key: String,
    pub voice_models: Vec<String>,
    pub chat_models: Vec<String>,
    pub chat_retry_pause: Duration,
    pub provider_timeout: Duration,
    pub provider_base_url: String,
    /// `None` disables history.
    pub history_path: Option<PathBuf>,
    pub transcribe_delay: Duration,
    pub bind_addr: String,
    pub max_body_bytes: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            provider_api_key: String::new(),
            test_key: DEFAULT_TEST_KEY.to_string(),
            voice_models: to_owned_list(DEFAULT_VOICE_MODELS),
            chat_models: to_owned_list(DEFAULT_CHAT_MODELS),
            chat_retry_pause: Duration::from_millis(1500),
            provider_timeout: Duration::from_secs(30),
            provider_base_url: DEFAULT_BASE_URL.to_string(),
            history_path: Some(PathBuf::from(DEFAULT_HISTORY_PATH)),
            transcribe_delay: Duration::from_millis(2000),
            bind_addr: format!("127.0.0.1:{}", DEFAULT_PORT),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl GuardConfig {
    /// Load from environment. Unset or invalid values fall back to the defaults above.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let provider_api_key = env_opt_string("GEMINI_API_KEY")
            .or_else(|| env_opt_string("VITE_GEMINI_API_KEY"))
            .unwrap_or_default();
        let bind_addr = env_opt_string("RAKSHA_BIND").unwrap_or_else(|| {
            let port = env_parse("PORT", DEFAULT_PORT);
            format!("127.0.0.1:{}", port)
        });
        let history_path = match env_opt_string("RAKSHA_HISTORY_PATH") {
            Some(p) if p.eq_ignore_ascii_case("off") => None,
            Some(p) => Some(PathBuf::from(p)),
            None => defaults.history_path,
        };
        Self {
            provider_api_key,
            test_key: env_opt_string("RAKSHA_TEST_KEY").unwrap_or(defaults.test_key),
            voice_models: env_list("RAKSHA_VOICE_MODELS").unwrap_or(defaults.voice_models),
            chat_models: env_list("RAKSHA_CHAT_MODELS").unwrap_or(defaults.chat_models),
            chat_retry_pause: Duration::from_millis(env_parse("RAKSHA_CHAT_RETRY_PAUSE_MS", 1500)),
            provider_timeout: Duration::from_secs(env_parse("RAKSHA_PROVIDER_TIMEOUT_SECS", 30)),
            provider_base_url: env_opt_string("RAKSHA_PROVIDER_BASE_URL")
                .unwrap_or(defaults.provider_base_url),
            history_path,
            transcribe_delay: Duration::from_millis(env_parse("RAKSHA_TRANSCRIBE_DELAY_MS", 2000)),
            bind_addr,
            max_body_bytes: env_parse("RAKSHA_MAX_BODY_BYTES", defaults.max_body_bytes),
        }
    }

    /// The real key plus the test key. An empty real key is dropped.
    pub fn allow_list(&self) -> KeyAllowList {
        KeyAllowList::new([self.provider_api_key.clone(), self.test_key.clone()])
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env_opt_string(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Comma-separated list; order is kept, blanks are dropped.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_list(name: &str) -> Option<Vec<String>> {
    env_opt_string(name)
        .map(|v| parse_list(&v))
        .filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Authorization;

    #[test]
    fn list_keeps_priority_order() {
        assert_eq!(
            parse_list(" b-model , a-model,, c-model "),
            vec!["b-model", "a-model", "c-model"]
        );
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn defaults_match_deployment() {
        let c = GuardConfig::default();
        assert_eq!(c.voice_models[0], "gemini-2.0-flash-lite-001");
        assert_eq!(c.chat_models.len(), 3);
        assert_eq!(c.chat_retry_pause, Duration::from_millis(1500));
        assert_eq!(c.max_body_bytes, 10_485_760);
    }

    #[test]
    fn allow_list_without_real_key_accepts_only_test_key() {
        let c = GuardConfig::default();
        let keys = c.allow_list();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys.authorize(Some(DEFAULT_TEST_KEY)), Authorization::Authorized);
        assert_eq!(keys.authorize(Some("")), Authorization::Unauthorized);
    }

    #[test]
    fn allow_list_includes_real_key() {
        let c = GuardConfig {
            provider_api_key: "AIza-real".into(),
            ..GuardConfig::default()
        };
        assert_eq!(c.allow_list().authorize(Some("AIza-real")), Authorization::Authorized);
    }
}
