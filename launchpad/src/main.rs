use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use launchpad_sdk::{BuyParams, LaunchpadSdk, SdkError, SellParams};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cfg::{Cfg, Command};

mod cfg;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cfg = Cfg::parse();

    // Logs go to stderr; stdout carries only the JSON result.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cfg).await {
        Ok(data) => {
            println!("{}", envelope(true, data));
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:#}", err);
            println!("{}", envelope(false, failure(&err)));
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: Cfg) -> Result<Value> {
    let sdk = LaunchpadSdk::connect(cfg.sdk_config(), &cfg.rpc_url, cfg.private_key.clone())
        .await
        .context("failed to initialize sdk")?;

    match &cfg.command {
        Command::Launch(args) => {
            let params = args.params();
            if args.dry_run {
                let preparation = sdk.prepare_launch_token(&params).await?;
                with_field(&preparation, "dryRun", json!(true))
            } else {
                let receipt = sdk.launch_token(&params).await?;
                to_object(&receipt)
            }
        }
        Command::Tokens => Ok(json!({ "tokens": sdk.tokens().await? })),
        Command::Market { market } => Ok(json!({ "market": sdk.market(*market).await? })),
        Command::Buy(args) => {
            let receipt = sdk
                .buy(&BuyParams {
                    market: args.market,
                    usdc_in: args.amount.clone(),
                    slippage_bps: args.slippage_bps,
                })
                .await?;
            to_object(&receipt)
        }
        Command::Sell(args) => {
            let receipt = sdk
                .sell(&SellParams {
                    market: args.market,
                    tokens_in: args.amount.clone(),
                    slippage_bps: args.slippage_bps,
                })
                .await?;
            to_object(&receipt)
        }
        Command::QuoteBuy { market, usdc_in } => {
            Ok(json!({ "quote": sdk.quote_buy(*market, usdc_in).await? }))
        }
        Command::QuoteSell { market, tokens_in } => {
            Ok(json!({ "quote": sdk.quote_sell(*market, tokens_in).await? }))
        }
    }
}

fn to_object<T: Serialize>(data: &T) -> Result<Value> {
    serde_json::to_value(data).context("failed to serialize result")
}

fn with_field<T: Serialize>(data: &T, key: &str, value: Value) -> Result<Value> {
    let mut object = to_object(data)?;
    if let Value::Object(map) = &mut object {
        map.insert(key.to_string(), value);
    }
    Ok(object)
}

/// Error message, plus the approval hash and trace when a write action had
/// already broadcast something.
fn failure(err: &anyhow::Error) -> Value {
    let mut out = json!({ "error": format!("{:#}", err) });
    if let Some(SdkError::ActionFailed {
        kind,
        approval,
        trace,
        ..
    }) = err.downcast_ref::<SdkError>()
    {
        out["action"] = json!(kind);
        out["approvalHash"] = json!(approval);
        out["trace"] = json!(trace);
    }
    out
}

/// `{"success": <ok>, ...data}`; non-object data lands under `data`.
fn envelope(success: bool, data: Value) -> Value {
    let mut out = Map::new();
    out.insert("success".to_string(), Value::Bool(success));
    match data {
        Value::Object(map) => out.extend(map),
        other => {
            out.insert("data".to_string(), other);
        }
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_flattens_objects() {
        let out = envelope(true, json!({ "tokens": [] }));
        assert_eq!(out, json!({ "success": true, "tokens": [] }));
    }

    #[test]
    fn test_envelope_failure() {
        let out = envelope(false, json!({ "error": "boom" }));
        assert_eq!(out, json!({ "success": false, "error": "boom" }));
    }

    #[test]
    fn test_failure_reports_leftover_approval() {
        use alloy::primitives::TxHash;
        use launchpad_sdk::{ActionKind, ActionState};

        let approval = TxHash::repeat_byte(1);
        let err = anyhow::Error::new(SdkError::ActionFailed {
            kind: ActionKind::Sell,
            approval: Some(approval),
            trace: vec![
                ActionState::ApprovalConfirmed { hash: approval },
                ActionState::Failed { reason: "market paused".to_string() },
            ],
            source: Box::new(SdkError::Network {
                status: 400,
                message: "market paused".to_string(),
            }),
        });

        let out = failure(&err);
        let message = out["error"].as_str().unwrap();
        assert!(message.contains(&approval.to_string()));
        assert!(message.ends_with("backend returned 400: market paused"));
        assert_eq!(out["action"], "sell");
        assert_eq!(out["approvalHash"], json!(approval));
        assert_eq!(out["trace"][1]["state"], "failed");
    }

    #[test]
    fn test_failure_plain_error() {
        let out = failure(&anyhow::Error::new(SdkError::SignerRequired));
        assert_eq!(out.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_envelope_wraps_scalars() {
        assert_eq!(envelope(true, json!(5)), json!({ "success": true, "data": 5 }));
    }
}
