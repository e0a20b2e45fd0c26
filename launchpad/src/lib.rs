pub mod action;
pub mod amount;
pub mod backend;
pub mod config;
pub mod error;
pub mod eth_client;
pub mod execution;
pub mod metadata;
pub mod orchestrator;
pub mod sdk;

pub use action::{ActionKind, ActionState, ActionTracker};
pub use backend::{HttpBackend, LaunchBackend, MarketInfo, QuoteResponse, TokenSummary, TransactionIntent};
pub use config::SdkConfig;
pub use error::{Result, SdkError};
pub use execution::{ChainSigner, ExecutionEngine};
pub use image_util::{ImageInput, ImageLimits};
pub use metadata::{LaunchMetadata, LaunchParams, SocialLinks};
pub use orchestrator::{BuyParams, IntentOrchestrator, LaunchPreparation, LaunchReceipt, SellParams, TradeReceipt};
pub use sdk::LaunchpadSdk;
