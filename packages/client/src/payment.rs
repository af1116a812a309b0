use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    error::Error,
    provider::{Receipt, TxHash},
};

const INTERRUPTED: &str = "interrupted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentFailure {
    UserRejected,
    Reverted(String),
    /// Any other failure, the reason is kept for diagnostics
    Network(String),
}

impl PaymentFailure {
    pub fn message(&self) -> String {
        match self {
            Self::UserRejected => "Transaction rejected in wallet.".into(),
            Self::Reverted(reason) => format!("Transaction failed: {reason}"),
            Self::Network(_) => "An unknown error occurred during payment.".into(),
        }
    }
}

impl Display for PaymentFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.message())
    }
}

impl From<&Error> for PaymentFailure {
    fn from(value: &Error) -> Self {
        match value {
            Error::UserRejected => Self::UserRejected,
            Error::ContractReverted(reason) => Self::Reverted(reason.clone()),
            other => Self::Network(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaymentPhase {
    #[default]
    Idle,
    /// Waiting for the signer approval
    Confirming,
    /// Approved, waiting for the network to accept it
    Submitting,
    /// Accepted, waiting for the confirmation depth
    Settling { hash: TxHash },
    /// The ledger reports the loan paid, the receipt is missing if it was
    /// learnt from a refresh
    Succeeded { receipt: Option<Receipt> },
    Failed(PaymentFailure),
}

impl PaymentPhase {
    pub const fn in_flight(&self) -> bool {
        matches!(
            self,
            Self::Confirming | Self::Submitting | Self::Settling { .. }
        )
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Confirming => "Confirming",
            Self::Submitting => "Submitting",
            Self::Settling { .. } => "Settling",
            Self::Succeeded { .. } => "Succeeded",
            Self::Failed(_) => "Failed",
        }
    }
}

/// The payment submission state machine
///
/// At most one payment is in flight at any time.
#[derive(Debug, Default)]
pub struct PaymentTracker {
    phase: PaymentPhase,
}

impl PaymentTracker {
    pub const fn phase(&self) -> &PaymentPhase {
        &self.phase
    }

    pub const fn in_flight(&self) -> bool {
        self.phase.in_flight()
    }

    pub fn begin(&mut self) -> Result<(), Error> {
        if self.in_flight() {
            Err(Error::PaymentInFlight)
        } else {
            self.phase = PaymentPhase::Confirming;
            Ok(())
        }
    }

    pub fn submitted(&mut self) -> Result<(), Error> {
        self.transit(
            |phase| matches!(phase, PaymentPhase::Confirming),
            PaymentPhase::Submitting,
        )
    }

    pub fn settling(&mut self, hash: TxHash) -> Result<(), Error> {
        self.transit(
            |phase| matches!(phase, PaymentPhase::Submitting),
            PaymentPhase::Settling { hash },
        )
    }

    pub fn succeed(&mut self, receipt: Receipt) -> Result<(), Error> {
        self.transit(
            |phase| matches!(phase, PaymentPhase::Settling { .. }),
            PaymentPhase::Succeeded {
                receipt: Some(receipt),
            },
        )
    }

    pub fn fail(&mut self, failure: PaymentFailure) -> Result<(), Error> {
        self.transit(PaymentPhase::in_flight, PaymentPhase::Failed(failure))
    }

    /// The user walked away from the signer approval
    pub fn abandon(&mut self) -> Result<(), Error> {
        self.transit(
            |phase| matches!(phase, PaymentPhase::Confirming),
            PaymentPhase::Failed(PaymentFailure::UserRejected),
        )
    }

    /// Finish a payment in flight once the ledger reports the loan paid
    ///
    /// Return whether there was one.
    pub fn reconcile_paid(&mut self) -> bool {
        let in_flight = self.in_flight();
        if in_flight {
            self.phase = PaymentPhase::Succeeded { receipt: None };
        }
        in_flight
    }

    /// Fail a payment left in flight by a dropped submission while the ledger
    /// still reports the loan unpaid
    ///
    /// Return whether there was one.
    pub fn reconcile_unpaid(&mut self) -> bool {
        let in_flight = self.in_flight();
        if in_flight {
            self.phase = PaymentPhase::Failed(PaymentFailure::Network(INTERRUPTED.into()));
        }
        in_flight
    }

    pub fn reset(&mut self) {
        self.phase = PaymentPhase::Idle;
    }

    fn transit<F>(&mut self, allowed: F, to: PaymentPhase) -> Result<(), Error>
    where
        F: FnOnce(&PaymentPhase) -> bool,
    {
        if allowed(&self.phase) {
            self.phase = to;
            Ok(())
        } else {
            Err(Error::InvalidPaymentTransition {
                from: self.phase.name().into(),
                to: to.name(),
            })
        }
    }
}
