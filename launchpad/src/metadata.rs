use alloy::primitives::U256;
use base64::{prelude::BASE64_STANDARD, Engine};
use image_util::ImageInput;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    amount::{format_amount, parse_amount},
    config::SdkConfig,
    error::{Result, SdkError},
};

pub const METADATA_URI_PREFIX: &str = "data:application/json;base64,";

const NAME_LEN: (usize, usize) = (2, 64);
const DESCRIPTION_LEN: (usize, usize) = (5, 500);
const MIN_SEED_AMOUNT: u64 = 20;

static SYMBOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{2,12}$").expect("symbol pattern compiles"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialLinks {
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
}

/// What a caller supplies to launch a token.
#[derive(Debug, Clone)]
pub struct LaunchParams {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub seed_amount: String,
    pub image: Option<ImageInput>,
    pub socials: SocialLinks,
}

/// Launch fields after validation, ready to be embedded in metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLaunch {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub seed_amount: U256,
    /// Canonical decimal form of `seed_amount` sent to the backend.
    pub seed_display: String,
    pub socials: Option<Socials>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
}

impl Socials {
    fn is_empty(&self) -> bool {
        self.website.is_none()
            && self.twitter.is_none()
            && self.telegram.is_none()
            && self.discord.is_none()
    }
}

/// Token metadata. Field order is the serialized key order and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub external_url: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socials: Option<Socials>,
}

impl LaunchMetadata {
    pub fn new(launch: &ValidatedLaunch, image_url: Option<String>, cfg: &SdkConfig) -> Self {
        Self {
            name: launch.name.clone(),
            symbol: launch.symbol.clone(),
            description: launch.description.clone(),
            external_url: cfg.platform_url.clone(),
            platform: cfg.platform_name.clone(),
            image: image_url,
            socials: launch.socials.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_data_uri(&self) -> Result<String> {
        Ok(format!(
            "{}{}",
            METADATA_URI_PREFIX,
            BASE64_STANDARD.encode(self.to_json()?)
        ))
    }
}

/// Decodes a metadata URI back into JSON.
pub fn decode_metadata_uri(uri: &str) -> Result<serde_json::Value> {
    let payload = uri
        .strip_prefix(METADATA_URI_PREFIX)
        .ok_or_else(|| SdkError::validation("metadata uri", "missing data:application/json prefix"))?;
    let json = BASE64_STANDARD
        .decode(payload)
        .map_err(|err| SdkError::validation("metadata uri", err.to_string()))?;
    Ok(serde_json::from_slice(&json)?)
}

/// Validates every textual launch field. Runs before any network call.
pub fn validate_launch(params: &LaunchParams, quote_decimals: u8) -> Result<ValidatedLaunch> {
    let name = params.name.trim();
    check_len("name", name, NAME_LEN)?;

    let symbol = params.symbol.trim();
    if !SYMBOL.is_match(symbol) {
        return Err(SdkError::validation(
            "symbol",
            "must be 2-12 letters or digits",
        ));
    }

    let description = params.description.trim();
    check_len("description", description, DESCRIPTION_LEN)?;

    let seed_amount = parse_amount("seed amount", &params.seed_amount, quote_decimals)?;
    let min_seed = U256::from(MIN_SEED_AMOUNT) * U256::from(10u64).pow(U256::from(quote_decimals));
    if seed_amount < min_seed {
        return Err(SdkError::validation(
            "seed amount",
            format!("must be at least {MIN_SEED_AMOUNT}"),
        ));
    }

    Ok(ValidatedLaunch {
        name: name.to_string(),
        symbol: symbol.to_string(),
        description: description.to_string(),
        seed_amount,
        seed_display: format_amount(seed_amount, quote_decimals)?,
        socials: normalize_socials(&params.socials)?,
    })
}

fn check_len(field: &'static str, value: &str, (min, max): (usize, usize)) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(SdkError::validation(
            field,
            format!("length {len} is outside {min}-{max}"),
        ));
    }
    Ok(())
}

fn normalize_socials(links: &SocialLinks) -> Result<Option<Socials>> {
    let socials = Socials {
        website: normalize_url("website", links.website.as_deref())?,
        twitter: normalize_url("twitter", links.twitter.as_deref())?,
        telegram: normalize_url("telegram", links.telegram.as_deref())?,
        discord: normalize_url("discord", links.discord.as_deref())?,
    };
    Ok((!socials.is_empty()).then_some(socials))
}

fn normalize_url(field: &'static str, value: Option<&str>) -> Result<Option<String>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let url = Url::parse(value).map_err(|source| SdkError::InvalidUrl { field, source })?;
    Ok(Some(url.to_string()))
}
