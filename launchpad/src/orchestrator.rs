use std::{future::Future, sync::Arc};

use alloy::primitives::{Address, TxHash, U256};
use image_util::normalize;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    action::{ActionKind, ActionState, ActionTracker},
    amount::{cushioned_allowance, format_amount, parse_amount, parse_positive_amount},
    backend::{CreateTokenRequest, LaunchBackend, TransactionIntent},
    config::{SdkConfig, TOKEN_DECIMALS},
    error::{Result, SdkError},
    execution::ExecutionEngine,
    metadata::{validate_launch, LaunchMetadata, LaunchParams},
};

pub const MAX_SLIPPAGE_BPS: u32 = 10_000;

/// Everything needed to launch, fetched but not broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchPreparation {
    pub metadata_uri: String,
    pub image_url: Option<String>,
    pub approve_intent: TransactionIntent,
    pub create_intent: TransactionIntent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchReceipt {
    pub preparation: LaunchPreparation,
    pub approval_hash: TxHash,
    pub create_hash: TxHash,
    pub trace: Vec<ActionState>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReceipt {
    pub kind: ActionKind,
    pub market: Address,
    pub spender: Address,
    pub approve_amount: String,
    pub approval_hash: TxHash,
    pub action_hash: TxHash,
    pub trace: Vec<ActionState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyParams {
    pub market: Address,
    pub usdc_in: String,
    pub slippage_bps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellParams {
    pub market: Address,
    pub tokens_in: String,
    pub slippage_bps: u32,
}

/// Hashes of a completed approve-then-act pair.
struct PairHashes {
    approval: TxHash,
    action: TxHash,
}

/// Fetches intents for write actions and drives them through the engine.
#[derive(Clone)]
pub struct IntentOrchestrator {
    backend: Arc<dyn LaunchBackend>,
    engine: ExecutionEngine,
    cfg: SdkConfig,
}

impl IntentOrchestrator {
    pub fn new(backend: Arc<dyn LaunchBackend>, engine: ExecutionEngine, cfg: SdkConfig) -> Self {
        Self {
            backend,
            engine,
            cfg,
        }
    }

    /// Builds metadata and both launch intents without broadcasting anything.
    pub async fn prepare_launch(&self, params: &LaunchParams) -> Result<LaunchPreparation> {
        let mut tracker = ActionTracker::new(ActionKind::Launch);
        let res = async {
            let preparation = self.prepare_tracked(params, &mut tracker).await?;
            tracker.advance(ActionState::DryRunComplete)?;
            Ok::<_, SdkError>(preparation)
        }
        .await;
        settle(&mut tracker, res)
    }

    /// Prepares the launch, then approves the seed and creates the token.
    pub async fn launch(&self, params: &LaunchParams) -> Result<LaunchReceipt> {
        self.engine.signer()?;
        let mut tracker = ActionTracker::new(ActionKind::Launch);
        let res = async {
            let preparation = self.prepare_tracked(params, &mut tracker).await?;
            let create_intent = preparation.create_intent.clone();
            let hashes = self
                .approve_then_act(&mut tracker, &preparation.approve_intent, || async {
                    Ok(create_intent)
                })
                .await?;
            Ok::<_, SdkError>((preparation, hashes))
        }
        .await;
        let (preparation, hashes) = settle(&mut tracker, res)?;
        Ok(LaunchReceipt {
            preparation,
            approval_hash: hashes.approval,
            create_hash: hashes.action,
            trace: tracker.into_trace(),
        })
    }

    /// Approves `usdc_in` plus a quote-derived cushion to the market, then buys.
    pub async fn buy(&self, params: &BuyParams) -> Result<TradeReceipt> {
        self.engine.signer()?;
        let decimals = self.cfg.quote_decimals;
        let nominal = parse_positive_amount("usdcIn", &params.usdc_in, decimals)?;
        check_slippage(params.slippage_bps)?;
        let usdc_in = format_amount(nominal, decimals)?;

        let mut tracker = ActionTracker::new(ActionKind::Buy);
        let res = async {
            let allowance = self.buy_allowance(params.market, nominal, &usdc_in).await;
            let approve_amount = format_amount(allowance, decimals)?;
            let approve_intent = self
                .backend
                .market_approve_intent(params.market, &approve_amount)
                .await?;
            tracker.advance(ActionState::IntentsPrepared)?;

            let hashes = self
                .approve_then_act(&mut tracker, &approve_intent, || {
                    self.backend
                        .buy_intent(params.market, &usdc_in, params.slippage_bps)
                })
                .await?;
            Ok::<_, SdkError>((approve_amount, hashes))
        }
        .await;
        let (approve_amount, hashes) = settle(&mut tracker, res)?;
        Ok(TradeReceipt {
            kind: ActionKind::Buy,
            market: params.market,
            spender: params.market,
            approve_amount,
            approval_hash: hashes.approval,
            action_hash: hashes.action,
            trace: tracker.into_trace(),
        })
    }

    /// Approves exactly `tokens_in` to the market, then sells.
    pub async fn sell(&self, params: &SellParams) -> Result<TradeReceipt> {
        self.engine.signer()?;
        parse_positive_amount("tokensIn", &params.tokens_in, TOKEN_DECIMALS)?;
        check_slippage(params.slippage_bps)?;
        let tokens_in = params.tokens_in.trim().to_string();

        let mut tracker = ActionTracker::new(ActionKind::Sell);
        let res = async {
            let market = self.backend.market(params.market).await?;
            let approve_intent = self
                .backend
                .token_approve_intent(market.token_address, params.market, &tokens_in)
                .await?;
            tracker.advance(ActionState::IntentsPrepared)?;

            self.approve_then_act(&mut tracker, &approve_intent, || {
                self.backend
                    .sell_intent(params.market, &tokens_in, params.slippage_bps)
            })
            .await
        }
        .await;
        let hashes = settle(&mut tracker, res)?;
        Ok(TradeReceipt {
            kind: ActionKind::Sell,
            market: params.market,
            spender: params.market,
            approve_amount: tokens_in,
            approval_hash: hashes.approval,
            action_hash: hashes.action,
            trace: tracker.into_trace(),
        })
    }

    /// A failed quote is recovered here with an uncushioned allowance.
    async fn buy_allowance(&self, market: Address, nominal: U256, usdc_in: &str) -> U256 {
        let fee = match self.backend.quote_buy(market, usdc_in).await {
            Ok(quote) => parse_amount("feePaid", &quote.fee_paid, self.cfg.quote_decimals),
            Err(err) => Err(err),
        };
        match fee {
            Ok(fee) => cushioned_allowance(nominal, fee),
            Err(err) => {
                warn!("buy quote unavailable, approving nominal amount only: {}", err);
                nominal
            }
        }
    }

    async fn prepare_tracked(
        &self,
        params: &LaunchParams,
        tracker: &mut ActionTracker,
    ) -> Result<LaunchPreparation> {
        let launch = validate_launch(params, self.cfg.quote_decimals)?;
        let image = params
            .image
            .clone()
            .map(|input| normalize(input, &self.cfg.image_limits))
            .transpose()?;

        let image_url = match image {
            Some(asset) => {
                let url = self.backend.upload_image(&asset.data_url()).await?;
                info!("uploaded logo to {}", url);
                Some(url)
            }
            None => None,
        };

        let metadata_uri = LaunchMetadata::new(&launch, image_url.clone(), &self.cfg).to_data_uri()?;
        tracker.advance(ActionState::MetadataBuilt)?;

        let approve_intent = self.backend.approve_seed_intent(&launch.seed_display).await?;
        let create_intent = self
            .backend
            .create_token_intent(&CreateTokenRequest {
                metadata_uri: metadata_uri.clone(),
                seed_amount: launch.seed_display.clone(),
            })
            .await?;
        tracker.advance(ActionState::IntentsPrepared)?;

        Ok(LaunchPreparation {
            metadata_uri,
            image_url,
            approve_intent,
            create_intent,
        })
    }

    /// Runs the approval to confirmation before the action intent is even requested.
    async fn approve_then_act<F, Fut>(
        &self,
        tracker: &mut ActionTracker,
        approve: &TransactionIntent,
        next_intent: F,
    ) -> Result<PairHashes>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TransactionIntent>>,
    {
        let approval = self.engine.submit(approve).await?;
        tracker.advance(ActionState::ApprovalSubmitted { hash: approval })?;
        self.engine.confirm(approval).await?;
        tracker.advance(ActionState::ApprovalConfirmed { hash: approval })?;

        let intent = next_intent().await?;
        let action = self.engine.submit(&intent).await?;
        tracker.advance(ActionState::ActionSubmitted { hash: action })?;
        self.engine.confirm(action).await?;
        tracker.advance(ActionState::ActionConfirmed { hash: action })?;

        Ok(PairHashes { approval, action })
    }
}

fn check_slippage(slippage_bps: u32) -> Result<()> {
    if slippage_bps > MAX_SLIPPAGE_BPS {
        return Err(SdkError::validation(
            "slippageBps",
            format!("{slippage_bps} exceeds {MAX_SLIPPAGE_BPS}"),
        ));
    }
    Ok(())
}

/// Records a failure on the tracker. Once anything was broadcast the error
/// carries the trace and any confirmed approval back to the caller.
fn settle<T>(tracker: &mut ActionTracker, res: Result<T>) -> Result<T> {
    let err = match res {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };
    tracker.fail(&err);
    if !tracker.has_broadcast() {
        return Err(err);
    }
    Err(SdkError::ActionFailed {
        kind: tracker.kind(),
        approval: tracker.approval_hash(),
        trace: tracker.trace().to_vec(),
        source: Box::new(err),
    })
}
