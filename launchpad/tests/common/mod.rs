#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use alloy::primitives::{address, Address, Bytes, TxHash};
use async_trait::async_trait;
use launchpad_sdk::{
    backend::CreateTokenRequest, ChainSigner, LaunchBackend, LaunchParams, LaunchpadSdk, MarketInfo,
    QuoteResponse, Result, SdkConfig, SdkError, SocialLinks, TokenSummary, TransactionIntent,
};

pub const MARKET: Address = address!("1111111111111111111111111111111111111111");
pub const TOKEN: Address = address!("2222222222222222222222222222222222222222");
pub const USDC: Address = address!("3333333333333333333333333333333333333333");
pub const FACTORY: Address = address!("4444444444444444444444444444444444444444");
pub const CALLER: Address = address!("5555555555555555555555555555555555555555");

/// Ordered record of every backend call and signer step, shared by both fakes.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

pub fn intent(to: Address, description: &str, data: &[u8]) -> TransactionIntent {
    TransactionIntent {
        to,
        data: Bytes::copy_from_slice(data),
        value: "0".to_string(),
        chain_id: 8453,
        description: description.to_string(),
    }
}

pub struct FakeBackend {
    pub log: EventLog,
    pub quote: Option<QuoteResponse>,
    pub fail_action_intent: bool,
}

impl FakeBackend {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            quote: Some(QuoteResponse {
                amount_in: "10".to_string(),
                amount_out: "1000".to_string(),
                fee_paid: "1.5".to_string(),
            }),
            fail_action_intent: false,
        }
    }

    fn rejected(&self) -> SdkError {
        SdkError::Network {
            status: 400,
            message: "market paused".to_string(),
        }
    }
}

#[async_trait]
impl LaunchBackend for FakeBackend {
    async fn list_tokens(&self) -> Result<Vec<TokenSummary>> {
        self.log.push("backend:tokens");
        Ok(vec![])
    }

    async fn market(&self, market: Address) -> Result<MarketInfo> {
        self.log.push(format!("backend:market:{market}"));
        Ok(MarketInfo {
            market_address: market,
            token_address: TOKEN,
            extra: Default::default(),
        })
    }

    async fn quote_buy(&self, _market: Address, usdc_in: &str) -> Result<QuoteResponse> {
        self.log.push(format!("backend:quote_buy:{usdc_in}"));
        self.quote.clone().ok_or(SdkError::Network {
            status: 503,
            message: "quotes unavailable".to_string(),
        })
    }

    async fn quote_sell(&self, _market: Address, tokens_in: &str) -> Result<QuoteResponse> {
        self.log.push(format!("backend:quote_sell:{tokens_in}"));
        self.quote.clone().ok_or(SdkError::Network {
            status: 503,
            message: "quotes unavailable".to_string(),
        })
    }

    async fn upload_image(&self, data_url: &str) -> Result<String> {
        assert!(data_url.starts_with("data:image/png;base64,"));
        self.log.push("backend:upload_image");
        Ok("https://cdn.example/logo.png".to_string())
    }

    async fn approve_seed_intent(&self, amount: &str) -> Result<TransactionIntent> {
        self.log.push(format!("backend:approve_seed:{amount}"));
        Ok(intent(USDC, &format!("approve seed {amount}"), &[0x09, 0x5e]))
    }

    async fn create_token_intent(&self, request: &CreateTokenRequest) -> Result<TransactionIntent> {
        self.log.push(format!("backend:create_token:{}", request.seed_amount));
        Ok(intent(FACTORY, "create token", request.metadata_uri.as_bytes()))
    }

    async fn market_approve_intent(&self, market: Address, amount: &str) -> Result<TransactionIntent> {
        self.log.push(format!("backend:market_approve:{amount}"));
        Ok(intent(USDC, &format!("approve {market} {amount}"), &[0x09, 0x5e]))
    }

    async fn buy_intent(&self, market: Address, usdc_in: &str, slippage_bps: u32) -> Result<TransactionIntent> {
        self.log.push(format!("backend:buy:{usdc_in}:{slippage_bps}"));
        if self.fail_action_intent {
            return Err(self.rejected());
        }
        Ok(intent(market, "buy", &[0xb1]))
    }

    async fn sell_intent(&self, market: Address, tokens_in: &str, slippage_bps: u32) -> Result<TransactionIntent> {
        self.log.push(format!("backend:sell:{tokens_in}:{slippage_bps}"));
        if self.fail_action_intent {
            return Err(self.rejected());
        }
        Ok(intent(market, "sell", &[0x5e]))
    }

    async fn token_approve_intent(&self, token: Address, spender: Address, amount: &str) -> Result<TransactionIntent> {
        self.log.push(format!("backend:token_approve:{token}:{spender}:{amount}"));
        Ok(intent(token, &format!("approve {spender} {amount}"), &[0x09, 0x5e]))
    }
}

/// Signer that hands out sequential hashes and confirms immediately.
pub struct FakeSigner {
    pub log: EventLog,
    pub submitted: Mutex<Vec<TransactionIntent>>,
    /// Report the first transaction as reverted.
    pub revert_first: AtomicBool,
}

impl FakeSigner {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            submitted: Mutex::new(vec![]),
            revert_first: AtomicBool::new(false),
        }
    }

    pub fn submitted(&self) -> Vec<TransactionIntent> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainSigner for FakeSigner {
    fn address(&self) -> Address {
        CALLER
    }

    async fn submit(&self, intent: &TransactionIntent) -> Result<TxHash> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(intent.clone());
        let hash = TxHash::repeat_byte(submitted.len() as u8);
        self.log.push(format!("signer:submit:{}", intent.description));
        Ok(hash)
    }

    async fn wait_for_confirmation(&self, hash: TxHash) -> Result<()> {
        if self.revert_first.load(Ordering::SeqCst) && hash == TxHash::repeat_byte(1) {
            self.log.push(format!("signer:reverted:{hash}"));
            return Err(SdkError::Reverted(hash));
        }
        self.log.push(format!("signer:confirm:{hash}"));
        Ok(())
    }
}

pub struct Harness {
    pub log: EventLog,
    pub signer: Arc<FakeSigner>,
    pub sdk: LaunchpadSdk,
}

pub fn harness_with(backend: FakeBackend, with_signer: bool) -> Harness {
    let log = backend.log.clone();
    let signer = Arc::new(FakeSigner::new(log.clone()));
    let chain_signer = with_signer.then(|| signer.clone() as Arc<dyn ChainSigner>);
    let sdk = LaunchpadSdk::new(SdkConfig::default(), Arc::new(backend), chain_signer);
    Harness { log, signer, sdk }
}

pub fn harness() -> Harness {
    harness_with(FakeBackend::new(EventLog::default()), true)
}

/// Minimal PNG header with the given dimensions.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes
}

pub fn launch_params() -> LaunchParams {
    LaunchParams {
        name: "Moon Cat".to_string(),
        symbol: "MCAT".to_string(),
        description: "A cat that went to the moon".to_string(),
        seed_amount: "25".to_string(),
        image: None,
        socials: SocialLinks {
            website: Some("https://mooncat.xyz".to_string()),
            ..Default::default()
        },
    }
}
