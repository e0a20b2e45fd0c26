use std::time::Duration;

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use clap::{Args, Parser, Subcommand};
use launchpad_sdk::{
    config::{DEFAULT_API_URL, DEFAULT_PLATFORM_NAME, DEFAULT_PLATFORM_URL, DEFAULT_QUOTE_DECIMALS},
    ImageInput, ImageLimits, LaunchParams, SdkConfig, SocialLinks,
};

#[derive(Parser, Debug)]
#[command(name = "launchpad", version, about = "Launch tokens and trade launchpad markets")]
pub struct Cfg {
    #[arg(long, env = "API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    #[arg(long, env = "RPC_URL", default_value = "http://localhost:8545", global = true)]
    pub rpc_url: String,

    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true, global = true)]
    pub private_key: Option<PrivateKeySigner>,

    #[arg(long, env = "QUOTE_DECIMALS", default_value_t = DEFAULT_QUOTE_DECIMALS, global = true)]
    pub quote_decimals: u8,

    #[arg(long, env = "PLATFORM_NAME", default_value = DEFAULT_PLATFORM_NAME, global = true)]
    pub platform_name: String,

    #[arg(long, env = "PLATFORM_URL", default_value = DEFAULT_PLATFORM_URL, global = true)]
    pub platform_url: String,

    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub http_timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

impl Cfg {
    pub fn sdk_config(&self) -> SdkConfig {
        SdkConfig {
            api_url: self.api_url.clone(),
            quote_decimals: self.quote_decimals,
            platform_name: self.platform_name.clone(),
            platform_url: self.platform_url.clone(),
            http_timeout: Duration::from_secs(self.http_timeout_secs),
            image_limits: ImageLimits::default(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a token with seed liquidity
    Launch(LaunchArgs),
    /// List launched tokens
    Tokens,
    /// Show market details
    Market { market: Address },
    /// Approve USDC and buy tokens
    Buy(TradeArgs),
    /// Approve tokens and sell them for USDC
    Sell(TradeArgs),
    /// Quote a buy without trading
    QuoteBuy {
        #[arg(long)]
        market: Address,
        #[arg(long)]
        usdc_in: String,
    },
    /// Quote a sell without trading
    QuoteSell {
        #[arg(long)]
        market: Address,
        #[arg(long)]
        tokens_in: String,
    },
}

#[derive(Args, Debug)]
pub struct LaunchArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub symbol: String,

    #[arg(long)]
    pub description: String,

    /// Seed liquidity in USDC, at least 20
    #[arg(long)]
    pub seed: String,

    /// Logo path or data:image/...;base64 URL
    #[arg(long)]
    pub image: Option<String>,

    #[arg(long)]
    pub website: Option<String>,

    #[arg(long)]
    pub twitter: Option<String>,

    #[arg(long)]
    pub telegram: Option<String>,

    #[arg(long)]
    pub discord: Option<String>,

    /// Build metadata and intents without signing anything
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl LaunchArgs {
    pub fn params(&self) -> LaunchParams {
        LaunchParams {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            description: self.description.clone(),
            seed_amount: self.seed.clone(),
            image: self.image.as_deref().map(ImageInput::from_arg),
            socials: SocialLinks {
                website: self.website.clone(),
                twitter: self.twitter.clone(),
                telegram: self.telegram.clone(),
                discord: self.discord.clone(),
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct TradeArgs {
    #[arg(long)]
    pub market: Address,

    /// USDC in for buys, tokens in for sells
    #[arg(long)]
    pub amount: String,

    #[arg(long, default_value_t = 100)]
    pub slippage_bps: u32,
}
