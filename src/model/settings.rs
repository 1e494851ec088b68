//! Settings document with API-key redaction
//!
//! `apiKeys` values are never returned unredacted: every read path goes
//! through `masked()`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "empty_object")]
    pub trading: Value,
    #[serde(default = "empty_object")]
    pub security: Value,
    #[serde(default)]
    pub api_keys: BTreeMap<String, String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trading: empty_object(),
            security: empty_object(),
            api_keys: BTreeMap::new(),
            last_updated: None,
        }
    }
}

/// Update allow-list for `PATCH /api/config`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub trading: Option<Value>,
    pub security: Option<Value>,
    pub api_keys: Option<BTreeMap<String, String>>,
}

impl Settings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.trading {
            self.trading = v;
        }
        if let Some(v) = patch.security {
            self.security = v;
        }
        if let Some(v) = patch.api_keys {
            self.api_keys = v;
        }
    }

    /// Copy with every API key value redacted down to its last four chars.
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        for value in masked.api_keys.values_mut() {
            *value = mask_key(value);
        }
        masked
    }
}

fn mask_key(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() > 4 {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_last_four() {
        assert_eq!(mask_key("sk-abcdef123456"), "****3456");
        assert_eq!(mask_key("abcd"), "****");
        assert_eq!(mask_key(""), "****");
    }

    #[test]
    fn test_masked_never_leaks_full_keys() {
        let mut settings = Settings::default();
        settings
            .api_keys
            .insert("kalshi".to_string(), "secret-key-9876".to_string());

        let json = serde_json::to_string(&settings.masked()).unwrap();
        assert!(!json.contains("secret-key-9876"));
        assert!(json.contains("****9876"));
    }

    #[test]
    fn test_patch_merges_sections_independently() {
        let mut settings = Settings::default();
        settings.apply(SettingsPatch {
            trading: Some(serde_json::json!({"enabled": true})),
            ..Default::default()
        });

        assert_eq!(settings.trading["enabled"], true);
        assert_eq!(settings.security, serde_json::json!({}));
    }
}
