//! Repayment schedule shown to the user
//!
//! The ledger enforces a single full repayment only. Interest and the monthly
//! due date are informational and never checked by the ledger.

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{Datelike, Local, Months, NaiveDate};

use crate::ledger::LoanState;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NextPayment {
    PaidInFull,
    Due(NaiveDate),
}

impl NextPayment {
    /// The first day of the month following `today` unless the loan is paid
    pub fn after(today: NaiveDate, state: &LoanState) -> Self {
        if state.paid {
            Self::PaidInFull
        } else {
            Self::Due(
                today
                    .with_day(1)
                    .and_then(|first| first.checked_add_months(Months::new(1)))
                    .unwrap_or(NaiveDate::MAX),
            )
        }
    }

    pub fn from_today(state: &LoanState) -> Self {
        Self::after(Local::now().date_naive(), state)
    }
}

impl Display for NextPayment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::PaidInFull => f.write_str("Paid in Full"),
            Self::Due(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}
