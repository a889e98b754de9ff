//! Embeddable widget configuration.
//!
//! [`WidgetConfig`] is the object a host page assigns to
//! `window.CenphiWidgetConfig` before loading the widget script. The script
//! mounts itself into its container as soon as it finds that global, so the
//! snippet produced by [`WidgetConfig::embed_snippet`] is all a host needs.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::testimonial::TestimonialType;

/// Name of the global the widget script reads on load.
pub const GLOBAL_CONFIG_NAME: &str = "CenphiWidgetConfig";

/// Id of the element the widget mounts into.
pub const CONTAINER_ID: &str = "cenphi-widget-root";

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// A plain JavaScript identifier, the only callback form the widget calls.
static JS_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex")
});

// ---------------------------------------------------------------------------
// Parts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetTheme {
    Light,
    Dark,
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Desktop,
    Tablet,
    Mobile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncentiveKind {
    #[default]
    Discount,
    Gift,
    Credit,
    Feature,
    Other,
}

/// Look and copy of the widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WidgetCustomization {
    #[validate(regex(path = *HEX_COLOR, message = "primaryColor must be #rrggbb"))]
    pub primary_color: String,
    #[validate(length(min = 1, max = 120))]
    pub company_name: String,
    #[serde(default)]
    pub position: WidgetPosition,
    #[serde(default)]
    pub theme: WidgetTheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thank_you_message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<String>,
}

/// Reward offered for leaving a testimonial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_incentive"))]
pub struct IncentiveConfig {
    pub enabled: bool,
    #[serde(default, rename = "type")]
    pub kind: IncentiveKind,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_days: Option<u32>,
}

fn validate_incentive(incentive: &IncentiveConfig) -> Result<(), ValidationError> {
    if incentive.enabled && incentive.value.trim().is_empty() {
        return Err(ValidationError::new("incentive_value_required"));
    }
    Ok(())
}

/// Where and on which devices the widget may appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRules {
    #[serde(default)]
    pub excluded_pages: Vec<String>,
    /// When non-empty, only these pages show the widget.
    #[serde(default)]
    pub included_pages: Vec<String>,
    #[serde(default = "enabled")]
    pub mobile_enabled: bool,
    #[serde(default = "enabled")]
    pub tablet_enabled: bool,
    #[serde(default)]
    pub min_time_on_page: u32,
}

impl Default for DisplayRules {
    fn default() -> Self {
        Self {
            excluded_pages: Vec::new(),
            included_pages: Vec::new(),
            mobile_enabled: true,
            tablet_enabled: true,
            min_time_on_page: 0,
        }
    }
}

fn enabled() -> bool {
    true
}

/// When the widget opens by itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTriggers {
    /// Seconds to wait after page load.
    #[serde(default)]
    pub delay: u32,
    #[serde(default)]
    pub exit_intent: bool,
    /// Percentage of the page scrolled.
    #[serde(default)]
    #[validate(range(max = 100))]
    pub scroll_depth: u8,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Global configuration object read by the widget script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[validate(nested)]
    pub customization: WidgetCustomization,
    #[validate(length(min = 1, message = "at least one format is required"))]
    pub formats: Vec<TestimonialType>,
    #[serde(default)]
    #[validate(nested)]
    pub incentives: IncentiveConfig,
    #[serde(default)]
    pub display_rules: DisplayRules,
    #[serde(default)]
    #[validate(nested)]
    pub triggers: WidgetTriggers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(default)]
    pub default_open: bool,
    #[serde(default)]
    pub is_preview: bool,
    /// Name of a host-page global function called when the widget closes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_close: Option<String>,
}

impl WidgetConfig {
    /// Run field validation and fold failures into a [`CoreError`].
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        if let Some(callback) = &self.on_close {
            if !JS_IDENTIFIER.is_match(callback) {
                return Err(CoreError::Validation(format!(
                    "onClose '{callback}' is not a valid function name"
                )));
            }
        }
        Ok(())
    }

    /// Whether the widget should appear on `page` for `device`.
    ///
    /// Exclusions win over inclusions; a page matches a rule when it equals
    /// it or the rule ends in `*` and the page starts with the prefix.
    pub fn should_display(&self, page: &str, device: Device) -> bool {
        let rules = &self.display_rules;
        match device {
            Device::Mobile if !rules.mobile_enabled => return false,
            Device::Tablet if !rules.tablet_enabled => return false,
            _ => {}
        }
        if rules.excluded_pages.iter().any(|r| page_matches(r, page)) {
            return false;
        }
        rules.included_pages.is_empty() || rules.included_pages.iter().any(|r| page_matches(r, page))
    }

    /// HTML snippet that installs the global config and loads the widget.
    pub fn embed_snippet(&self, script_url: &str, stylesheet_url: &str) -> Result<String, CoreError> {
        let json = serde_json::to_string(self)
            .map_err(|e| CoreError::Internal(format!("Failed to encode widget config: {e}")))?;
        // Keep the JSON from closing the surrounding script element.
        let json = json.replace("</", "<\\/");

        Ok(format!(
            "<link rel=\"stylesheet\" href=\"{stylesheet_url}\">\n\
             <div id=\"{CONTAINER_ID}\"></div>\n\
             <script>window.{GLOBAL_CONFIG_NAME} = {json};</script>\n\
             <script src=\"{script_url}\" async></script>"
        ))
    }
}

fn page_matches(rule: &str, page: &str) -> bool {
    match rule.strip_suffix('*') {
        Some(prefix) => page.starts_with(prefix),
        None => rule == page,
    }
}
