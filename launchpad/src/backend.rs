use std::str::FromStr;

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::SdkConfig,
    error::{Result, SdkError},
};

/// Unsigned transaction returned by the backend. `data` is forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionIntent {
    pub to: Address,
    pub data: Bytes,
    #[serde(default = "zero_value")]
    pub value: String,
    pub chain_id: u64,
    #[serde(default)]
    pub description: String,
}

fn zero_value() -> String {
    "0".to_string()
}

impl TransactionIntent {
    /// Wei value; accepts decimal or 0x-prefixed hex.
    pub fn value_wei(&self) -> Result<U256> {
        let value = self.value.trim();
        if value.is_empty() {
            return Ok(U256::ZERO);
        }
        U256::from_str(value)
            .map_err(|err| SdkError::validation("intent value", format!("{value:?}: {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub amount_in: String,
    pub amount_out: String,
    pub fee_paid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    pub token_address: Address,
    pub market_address: Address,
    pub name: String,
    pub symbol: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInfo {
    pub market_address: Address,
    pub token_address: Address,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    pub metadata_uri: String,
    pub seed_amount: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct AmountBody<'a> {
    amount: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuyBody<'a> {
    usdc_in: &'a str,
    slippage_bps: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SellBody<'a> {
    tokens_in: &'a str,
    slippage_bps: u32,
}

#[derive(Debug, Serialize)]
struct TokenApproveBody<'a> {
    spender: Address,
    amount: &'a str,
}

#[derive(Debug, Serialize)]
struct ImageBody<'a> {
    image: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageUploaded {
    url: String,
}

/// Everything the SDK asks of the market backend.
#[async_trait]
pub trait LaunchBackend: Send + Sync {
    async fn list_tokens(&self) -> Result<Vec<TokenSummary>>;
    async fn market(&self, market: Address) -> Result<MarketInfo>;
    async fn quote_buy(&self, market: Address, usdc_in: &str) -> Result<QuoteResponse>;
    async fn quote_sell(&self, market: Address, tokens_in: &str) -> Result<QuoteResponse>;

    /// Returns the hosted URL of the uploaded image.
    async fn upload_image(&self, data_url: &str) -> Result<String>;

    async fn approve_seed_intent(&self, amount: &str) -> Result<TransactionIntent>;
    async fn create_token_intent(&self, request: &CreateTokenRequest) -> Result<TransactionIntent>;
    async fn market_approve_intent(&self, market: Address, amount: &str) -> Result<TransactionIntent>;
    async fn buy_intent(
        &self,
        market: Address,
        usdc_in: &str,
        slippage_bps: u32,
    ) -> Result<TransactionIntent>;
    async fn sell_intent(
        &self,
        market: Address,
        tokens_in: &str,
        slippage_bps: u32,
    ) -> Result<TransactionIntent>;
    async fn token_approve_intent(
        &self,
        token: Address,
        spender: Address,
        amount: &str,
    ) -> Result<TransactionIntent>;
}

/// JSON-over-HTTPS client for the market backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    pub fn new(cfg: &SdkConfig) -> Result<Self> {
        let client = Client::builder().timeout(cfg.http_timeout).build()?;
        Ok(Self {
            base_url: cfg.api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        debug!("GET {}", path);
        let res = self.client.get(self.url(path)).query(query).send().await?;
        decode(res).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        debug!("POST {}", path);
        let res = self.client.post(self.url(path)).json(body).send().await?;
        decode(res).await
    }
}

/// Non-2xx responses surface the backend's `{error}` message, else the status text.
async fn decode<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json::<T>().await?);
    }
    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    Err(SdkError::Network {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl LaunchBackend for HttpBackend {
    async fn list_tokens(&self) -> Result<Vec<TokenSummary>> {
        self.get("/tokens", &[]).await
    }

    async fn market(&self, market: Address) -> Result<MarketInfo> {
        self.get(&format!("/markets/{market}"), &[]).await
    }

    async fn quote_buy(&self, market: Address, usdc_in: &str) -> Result<QuoteResponse> {
        self.get(&format!("/markets/{market}/quote/buy"), &[("usdcIn", usdc_in)])
            .await
    }

    async fn quote_sell(&self, market: Address, tokens_in: &str) -> Result<QuoteResponse> {
        self.get(&format!("/markets/{market}/quote/sell"), &[("tokensIn", tokens_in)])
            .await
    }

    async fn upload_image(&self, data_url: &str) -> Result<String> {
        let uploaded: ImageUploaded = self
            .post("/uploads/image", &ImageBody { image: data_url })
            .await?;
        Ok(uploaded.url)
    }

    async fn approve_seed_intent(&self, amount: &str) -> Result<TransactionIntent> {
        self.post("/intents/approve-seed", &AmountBody { amount }).await
    }

    async fn create_token_intent(&self, request: &CreateTokenRequest) -> Result<TransactionIntent> {
        self.post("/intents/create-token", request).await
    }

    async fn market_approve_intent(&self, market: Address, amount: &str) -> Result<TransactionIntent> {
        self.post(&format!("/markets/{market}/intents/approve"), &AmountBody { amount })
            .await
    }

    async fn buy_intent(
        &self,
        market: Address,
        usdc_in: &str,
        slippage_bps: u32,
    ) -> Result<TransactionIntent> {
        self.post(
            &format!("/markets/{market}/intents/buy"),
            &BuyBody {
                usdc_in,
                slippage_bps,
            },
        )
        .await
    }

    async fn sell_intent(
        &self,
        market: Address,
        tokens_in: &str,
        slippage_bps: u32,
    ) -> Result<TransactionIntent> {
        self.post(
            &format!("/markets/{market}/intents/sell"),
            &SellBody {
                tokens_in,
                slippage_bps,
            },
        )
        .await
    }

    async fn token_approve_intent(
        &self,
        token: Address,
        spender: Address,
        amount: &str,
    ) -> Result<TransactionIntent> {
        self.post(
            &format!("/tokens/{token}/intents/approve"),
            &TokenApproveBody { spender, amount },
        )
        .await
    }
}
