use std::sync::Arc;

use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;
use tracing::info;

use crate::{
    backend::TransactionIntent,
    error::{Result, SdkError},
};

/// Signs, broadcasts and watches transactions for one account.
#[async_trait]
pub trait ChainSigner: Send + Sync {
    fn address(&self) -> Address;

    /// Signs and broadcasts the intent, returning its hash without waiting.
    async fn submit(&self, intent: &TransactionIntent) -> Result<TxHash>;

    /// Blocks until the network reports the transaction confirmed.
    async fn wait_for_confirmation(&self, hash: TxHash) -> Result<()>;
}

/// The only component that changes chain state.
///
/// There is no retry or timeout here; both belong to the signer's transport.
#[derive(Clone, Default)]
pub struct ExecutionEngine {
    signer: Option<Arc<dyn ChainSigner>>,
}

impl ExecutionEngine {
    pub fn new(signer: Option<Arc<dyn ChainSigner>>) -> Self {
        Self { signer }
    }

    pub fn signer(&self) -> Result<&Arc<dyn ChainSigner>> {
        self.signer.as_ref().ok_or(SdkError::SignerRequired)
    }

    pub fn address(&self) -> Result<Address> {
        Ok(self.signer()?.address())
    }

    pub async fn submit(&self, intent: &TransactionIntent) -> Result<TxHash> {
        let signer = self.signer()?;
        let hash = signer.submit(intent).await?;
        info!("submitted {:?} tx {}", intent.description, hash);
        Ok(hash)
    }

    pub async fn confirm(&self, hash: TxHash) -> Result<()> {
        self.signer()?.wait_for_confirmation(hash).await?;
        info!("confirmed tx {}", hash);
        Ok(())
    }

    /// Submit then wait for confirmation.
    pub async fn execute(&self, intent: &TransactionIntent) -> Result<TxHash> {
        let hash = self.submit(intent).await?;
        self.confirm(hash).await?;
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_without_signer() {
        let engine = ExecutionEngine::default();
        let intent = TransactionIntent {
            to: Address::ZERO,
            data: Default::default(),
            value: "0".to_string(),
            chain_id: 1,
            description: "noop".to_string(),
        };
        assert!(matches!(engine.execute(&intent).await, Err(SdkError::SignerRequired)));
        assert!(matches!(engine.address(), Err(SdkError::SignerRequired)));
    }
}
