//! User-agent classification for click events.
//!
//! Wraps `woothee` and folds its categories into the device buckets shown on
//! the analytics dashboard: `mobile`, `tablet`, `console` and `desktop`.

use woothee::parser::Parser;

/// Device type assigned when nothing more specific can be derived.
pub const DEFAULT_DEVICE_TYPE: &str = "desktop";

const UNKNOWN: &str = "UNKNOWN";

/// Facts derived from a raw `User-Agent` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentInfo {
    pub device_type: String,
    pub browser_name: Option<String>,
    pub os_name: Option<String>,
}

impl Default for UserAgentInfo {
    fn default() -> Self {
        Self {
            device_type: DEFAULT_DEVICE_TYPE.to_string(),
            browser_name: None,
            os_name: None,
        }
    }
}

impl UserAgentInfo {
    /// Classifies a raw user agent. Missing, blank or unrecognised agents
    /// yield the default classification.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|ua| !ua.is_empty()) else {
            return Self::default();
        };

        let Some(result) = Parser::new().parse(raw) else {
            return Self::default();
        };

        Self {
            device_type: device_type(result.category, result.os, raw).to_string(),
            browser_name: known(result.name),
            os_name: known(result.os),
        }
    }
}

fn known(value: &str) -> Option<String> {
    if value.is_empty() || value == UNKNOWN {
        None
    } else {
        Some(value.to_string())
    }
}

fn device_type(category: &str, os: &str, raw: &str) -> &'static str {
    match category {
        "smartphone" | "mobilephone" => {
            if os == "iPad" || (os == "Android" && !raw.contains("Mobile")) {
                "tablet"
            } else {
                "mobile"
            }
        }
        "appliance" => "console",
        _ => DEFAULT_DEVICE_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const SAFARI_IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";

    #[test]
    fn test_missing_user_agent_defaults_to_desktop() {
        let info = UserAgentInfo::parse(None);
        assert_eq!(info.device_type, "desktop");
        assert!(info.browser_name.is_none());
        assert!(info.os_name.is_none());
    }

    #[test]
    fn test_blank_user_agent_defaults_to_desktop() {
        assert_eq!(UserAgentInfo::parse(Some("   ")), UserAgentInfo::default());
    }

    #[test]
    fn test_desktop_chrome() {
        let info = UserAgentInfo::parse(Some(CHROME_WINDOWS));
        assert_eq!(info.device_type, "desktop");
        assert_eq!(info.browser_name.as_deref(), Some("Chrome"));
        assert!(info.os_name.unwrap().starts_with("Windows"));
    }

    #[test]
    fn test_iphone_is_mobile() {
        let info = UserAgentInfo::parse(Some(SAFARI_IPHONE));
        assert_eq!(info.device_type, "mobile");
        assert_eq!(info.browser_name.as_deref(), Some("Safari"));
    }

    #[test]
    fn test_ipad_is_tablet() {
        let info = UserAgentInfo::parse(Some(SAFARI_IPAD));
        assert_eq!(info.device_type, "tablet");
    }

    #[test]
    fn test_gibberish_falls_back_to_desktop() {
        let info = UserAgentInfo::parse(Some("definitely-not-a-browser"));
        assert_eq!(info.device_type, "desktop");
        assert!(info.browser_name.is_none());
    }

    #[test]
    fn test_device_type_mapping() {
        assert_eq!(device_type("smartphone", "Android", "Android 14; Mobile"), "mobile");
        assert_eq!(device_type("smartphone", "Android", "Android 14; SM-X910"), "tablet");
        assert_eq!(device_type("mobilephone", "docomo", "DoCoMo/2.0"), "mobile");
        assert_eq!(device_type("appliance", "PlayStation 4", "PlayStation 4"), "console");
        assert_eq!(device_type("pc", "Linux", "X11; Linux"), "desktop");
        assert_eq!(device_type("crawler", "UNKNOWN", "Googlebot"), "desktop");
        assert_eq!(device_type("UNKNOWN", "UNKNOWN", "x"), "desktop");
    }
}
