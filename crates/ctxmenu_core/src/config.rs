//! Controller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CtxMenuError;

/// Tunables for the menu controller.
///
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Debounce before a hovered row opens its submenu or closes a sibling's.
    pub hover_delay_ms: u64,
    /// Delay of the deferred check that follows every wheel event.
    pub wheel_check_delay_ms: u64,
    /// Vertical nudge for submenus opening downwards.
    pub submenu_offset_down: f64,
    /// Vertical nudge for submenus opening upwards.
    pub submenu_offset_up: f64,
    /// Install the default stylesheet into the document head.
    pub inject_styles: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            hover_delay_ms: 150,
            wheel_check_delay_ms: 0,
            submenu_offset_down: 4.0,
            submenu_offset_up: -12.0,
            inject_styles: true,
        }
    }
}

impl MenuConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, CtxMenuError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, CtxMenuError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the positioning code cannot work with.
    pub fn validate(&self) -> Result<(), CtxMenuError> {
        if !self.submenu_offset_down.is_finite() || !self.submenu_offset_up.is_finite() {
            return Err(CtxMenuError::config("submenu offsets must be finite"));
        }
        Ok(())
    }

    /// Hover debounce as a duration.
    pub fn hover_delay(&self) -> Duration {
        Duration::from_millis(self.hover_delay_ms)
    }

    /// Wheel check delay as a duration.
    pub fn wheel_check_delay(&self) -> Duration {
        Duration::from_millis(self.wheel_check_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_behavior() {
        let config = MenuConfig::default();
        assert_eq!(config.hover_delay(), Duration::from_millis(150));
        assert_eq!(config.wheel_check_delay(), Duration::ZERO);
        assert_eq!(config.submenu_offset_down, 4.0);
        assert_eq!(config.submenu_offset_up, -12.0);
        assert!(config.inject_styles);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MenuConfig::from_json(r#"{ "hover_delay_ms": 300 }"#).unwrap();
        assert_eq!(config.hover_delay_ms, 300);
        assert_eq!(config.submenu_offset_up, -12.0);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = MenuConfig::from_json("{ hover_delay_ms: }").unwrap_err();
        assert_eq!(err.category(), "Config");
    }

    #[test]
    fn json_round_trip() {
        let config = MenuConfig { inject_styles: false, ..Default::default() };
        let json = config.to_json().unwrap();
        assert_eq!(MenuConfig::from_json(&json).unwrap(), config);
    }
}
