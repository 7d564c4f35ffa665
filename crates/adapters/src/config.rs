//! Named construction parameters passed to adapter factories.

use seekr_core::types::JsonMap;

/// Configuration handed to a provider factory at construction time.
///
/// Every knob is optional; factories fall back to documented per-provider
/// defaults. Unknown keys from catalog/credential config land in `extra` so
/// provider-specific settings pass through without schema changes.
#[derive(Debug, Clone, Default)]
pub struct AdapterConfig {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub streaming: bool,
    pub base_url: Option<String>,
    pub extra: JsonMap,
}

impl AdapterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Fold a JSON config object (merged catalog defaults + credential
    /// overrides) into this configuration. Known keys map onto typed fields;
    /// everything else is kept verbatim in `extra`.
    pub fn apply_json(mut self, map: &JsonMap) -> Self {
        for (key, value) in map {
            match key.as_str() {
                "model" => {
                    if let Some(s) = value.as_str() {
                        self.model = Some(s.to_string());
                    }
                }
                "temperature" => {
                    if let Some(f) = value.as_f64() {
                        self.temperature = Some(f as f32);
                    }
                }
                "max_tokens" => {
                    if let Some(n) = value.as_u64() {
                        self.max_tokens = Some(n as u32);
                    }
                }
                "streaming" => {
                    if let Some(b) = value.as_bool() {
                        self.streaming = b;
                    }
                }
                "base_url" => {
                    if let Some(s) = value.as_str() {
                        self.base_url = Some(s.to_string());
                    }
                }
                _ => {
                    self.extra.insert(key.clone(), value.clone());
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn apply_json_maps_known_keys() {
        let map = json!({
            "model": "command-r",
            "temperature": 0.2,
            "max_tokens": 512,
            "streaming": true,
            "custom_knob": "kept"
        });
        let cfg = AdapterConfig::new().apply_json(map.as_object().unwrap());

        assert_eq!(cfg.model.as_deref(), Some("command-r"));
        assert_eq!(cfg.temperature, Some(0.2));
        assert_eq!(cfg.max_tokens, Some(512));
        assert!(cfg.streaming);
        assert_eq!(cfg.extra.get("custom_knob").unwrap(), "kept");
    }

    #[test]
    fn provider_specific_keys_ride_through_extra() {
        let map = json!({ "index_name": "docs", "dimension": 1536 });
        let cfg = AdapterConfig::new().apply_json(map.as_object().unwrap());
        assert_eq!(cfg.extra.get("index_name").unwrap(), "docs");
        assert_eq!(cfg.extra.get("dimension").unwrap(), 1536);
    }

    #[test]
    fn apply_json_overrides_builder_values() {
        let map = json!({ "model": "override" });
        let cfg = AdapterConfig::new()
            .with_model("base")
            .apply_json(map.as_object().unwrap());
        assert_eq!(cfg.model.as_deref(), Some("override"));
    }
}
