use solana_sdk::signature::Signature;

/// One submission try. Attempts are independent records; a retry never
/// mutates a prior attempt.
#[derive(Debug, Clone)]
pub struct SwapAttempt {
    pub attempt: u32,
    /// None until the network accepted the submission
    pub signature: Option<Signature>,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Accepted by the RPC node, confirmation pending
    Submitted,
    Failed(String),
}

/// Terminal result of one execution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    Confirmed {
        signature: Signature,
    },
    /// The transaction was accepted but did not confirm before the deadline.
    /// It may still land; callers must surface this, never treat it as
    /// "nothing happened".
    Expired {
        signature: Signature,
    },
    /// Explicit on-chain failure
    Failed {
        signature: Signature,
        reason: String,
    },
    /// Every submission try failed; nothing ever reached the network
    SubmissionExhausted {
        last_error: String,
    },
    /// Execution never started: the transaction could not be built or
    /// signed. Nothing ever reached the network.
    NotSubmitted {
        reason: String,
    },
}

impl SwapOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    /// True when funds may have moved even though no success was observed.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }

    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Self::Confirmed { signature }
            | Self::Expired { signature }
            | Self::Failed { signature, .. } => Some(signature),
            Self::SubmissionExhausted { .. } | Self::NotSubmitted { .. } => None,
        }
    }
}

/// Full account of an execution run: the retry chain plus its outcome.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub attempts: Vec<SwapAttempt>,
    pub outcome: SwapOutcome,
}
