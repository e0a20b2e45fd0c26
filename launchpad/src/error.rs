use alloy::primitives::TxHash;
use image_util::ImageError;

use crate::action::{ActionKind, ActionState, IllegalTransition};

pub type Result<T, E = SdkError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("invalid {field} url: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("image rejected: {0}")]
    Image(#[from] ImageError),

    #[error("backend returned {status}: {message}")]
    Network { status: u16, message: String },

    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("a signer is required for write actions, set PRIVATE_KEY")]
    SignerRequired,

    #[error("chain error: {0}")]
    Chain(String),

    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    IllegalTransition(#[from] IllegalTransition),

    /// A write action failed after at least one of its transactions was broadcast.
    #[error("{kind} failed{}", approval_note(.approval))]
    ActionFailed {
        kind: ActionKind,
        approval: Option<TxHash>,
        trace: Vec<ActionState>,
        #[source]
        source: Box<SdkError>,
    },
}

fn approval_note(approval: &Option<TxHash>) -> String {
    match approval {
        Some(hash) => format!(" after approval {hash} confirmed, allowance stays on chain"),
        None => String::new(),
    }
}

impl SdkError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        SdkError::Validation {
            field,
            message: message.into(),
        }
    }

    /// The error underneath any `ActionFailed` wrapper.
    pub fn root(&self) -> &SdkError {
        match self {
            SdkError::ActionFailed { source, .. } => source.root(),
            other => other,
        }
    }
}
