use std::sync::Arc;

use alloy::{
    network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
    primitives::{Address, TxHash},
    providers::{PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;
use tracing::debug;

use crate::{
    backend::TransactionIntent,
    error::{Result, SdkError},
    execution::ChainSigner,
};

/// Local-key signer backed by an alloy provider with a wallet filler.
pub struct EthClient {
    pub provider: Arc<dyn Provider + Send + Sync>,
    address: Address,
}

impl EthClient {
    pub async fn connect(rpc_url: &str, signer: PrivateKeySigner) -> Result<Self> {
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect(rpc_url)
            .await
            .map_err(|e| SdkError::Chain(format!("failed to connect provider: {e}")))?;
        Ok(Self {
            provider: Arc::new(provider),
            address,
        })
    }
}

#[async_trait]
impl ChainSigner for EthClient {
    fn address(&self) -> Address {
        self.address
    }

    async fn submit(&self, intent: &TransactionIntent) -> Result<TxHash> {
        let tx = TransactionRequest::default()
            .with_from(self.address)
            .with_to(intent.to)
            .with_input(intent.data.clone())
            .with_value(intent.value_wei()?)
            .with_chain_id(intent.chain_id);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| SdkError::Chain(format!("failed to send transaction: {e}")))?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, hash: TxHash) -> Result<()> {
        debug!("waiting for receipt of {}", hash);
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), hash)
            .get_receipt()
            .await
            .map_err(|e| SdkError::Chain(format!("failed to fetch receipt for {hash}: {e}")))?;
        if !ReceiptResponse::status(&receipt) {
            return Err(SdkError::Reverted(hash));
        }
        Ok(())
    }
}
