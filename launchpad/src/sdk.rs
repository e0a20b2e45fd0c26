use std::sync::Arc;

use alloy::{primitives::Address, signers::local::PrivateKeySigner};

use crate::{
    backend::{HttpBackend, LaunchBackend, MarketInfo, QuoteResponse, TokenSummary},
    config::SdkConfig,
    error::Result,
    eth_client::EthClient,
    execution::{ChainSigner, ExecutionEngine},
    metadata::LaunchParams,
    orchestrator::{BuyParams, IntentOrchestrator, LaunchPreparation, LaunchReceipt, SellParams, TradeReceipt},
};

/// Entry point: read calls go straight to the backend, writes through the orchestrator.
#[derive(Clone)]
pub struct LaunchpadSdk {
    backend: Arc<dyn LaunchBackend>,
    engine: ExecutionEngine,
    orchestrator: IntentOrchestrator,
}

impl LaunchpadSdk {
    pub fn new(
        cfg: SdkConfig,
        backend: Arc<dyn LaunchBackend>,
        signer: Option<Arc<dyn ChainSigner>>,
    ) -> Self {
        let engine = ExecutionEngine::new(signer);
        let orchestrator = IntentOrchestrator::new(backend.clone(), engine.clone(), cfg);
        Self {
            backend,
            engine,
            orchestrator,
        }
    }

    /// HTTP backend plus, when a key is given, a local-key signer on `rpc_url`.
    pub async fn connect(
        cfg: SdkConfig,
        rpc_url: &str,
        private_key: Option<PrivateKeySigner>,
    ) -> Result<Self> {
        let backend: Arc<dyn LaunchBackend> = Arc::new(HttpBackend::new(&cfg)?);
        let signer = match private_key {
            Some(key) => {
                let client = EthClient::connect(rpc_url, key).await?;
                Some(Arc::new(client) as Arc<dyn ChainSigner>)
            }
            None => None,
        };
        Ok(Self::new(cfg, backend, signer))
    }

    pub fn address(&self) -> Result<Address> {
        self.engine.address()
    }

    pub async fn tokens(&self) -> Result<Vec<TokenSummary>> {
        self.backend.list_tokens().await
    }

    pub async fn market(&self, market: Address) -> Result<MarketInfo> {
        self.backend.market(market).await
    }

    pub async fn quote_buy(&self, market: Address, usdc_in: &str) -> Result<QuoteResponse> {
        self.backend.quote_buy(market, usdc_in.trim()).await
    }

    pub async fn quote_sell(&self, market: Address, tokens_in: &str) -> Result<QuoteResponse> {
        self.backend.quote_sell(market, tokens_in.trim()).await
    }

    pub async fn prepare_launch_token(&self, params: &LaunchParams) -> Result<LaunchPreparation> {
        self.orchestrator.prepare_launch(params).await
    }

    pub async fn launch_token(&self, params: &LaunchParams) -> Result<LaunchReceipt> {
        self.orchestrator.launch(params).await
    }

    pub async fn buy(&self, params: &BuyParams) -> Result<TradeReceipt> {
        self.orchestrator.buy(params).await
    }

    pub async fn sell(&self, params: &SellParams) -> Result<TradeReceipt> {
        self.orchestrator.sell(params).await
    }
}
