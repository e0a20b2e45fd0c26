use std::time::Duration;

use image_util::ImageLimits;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_PLATFORM_NAME: &str = "launchpad";
pub const DEFAULT_PLATFORM_URL: &str = "https://launchpad.fun";

/// Decimals of the quote currency (USDC) used for seed and buy amounts.
pub const DEFAULT_QUOTE_DECIMALS: u8 = 6;
/// Launched tokens are standard 18-decimal ERC20s.
pub const TOKEN_DECIMALS: u8 = 18;

/// Immutable settings shared by every component of the SDK.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub api_url: String,
    pub quote_decimals: u8,
    pub platform_name: String,
    pub platform_url: String,
    pub http_timeout: Duration,
    pub image_limits: ImageLimits,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            quote_decimals: DEFAULT_QUOTE_DECIMALS,
            platform_name: DEFAULT_PLATFORM_NAME.to_string(),
            platform_url: DEFAULT_PLATFORM_URL.to_string(),
            http_timeout: Duration::from_secs(30),
            image_limits: ImageLimits::default(),
        }
    }
}
