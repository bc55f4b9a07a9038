use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::LedgerSnapshot;
use crate::error::LedgerError;

/// Credit position of a client against its configured limit.
///
/// Balance convention: positive `saldo_actual` is debt owed by the client,
/// so `available = limit - saldo_actual`. A credit balance (negative saldo)
/// raises availability above the limit. Every consumer goes through
/// [`CreditExposure::available_credit`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditExposure {
    pub limit: Decimal,
    pub saldo_actual: Decimal,
    pub available: Decimal,
    /// Share of the limit in use, `None` when the limit is zero.
    pub utilization: Option<Decimal>,
    pub near_limit: bool,
    pub exceeded: bool,
}

impl CreditExposure {
    /// `limit - saldo_actual`, or `Overflow` when the difference leaves the
    /// `Decimal` range.
    pub fn available_credit(
        limit: Decimal,
        saldo_actual: Decimal,
    ) -> Result<Decimal, LedgerError> {
        limit.checked_sub(saldo_actual).ok_or_else(|| {
            LedgerError::Overflow(format!(
                "available credit for limit {limit}, saldo {saldo_actual}"
            ))
        })
    }

    /// Evaluate a snapshot against `limit`. `warning_ratio` is the
    /// utilization (0..=1) at which the position is flagged as near the limit.
    pub fn evaluate(
        limit: Decimal,
        snapshot: &LedgerSnapshot,
        warning_ratio: Decimal,
    ) -> Result<Self, LedgerError> {
        if limit.is_sign_negative() && !limit.is_zero() {
            return Err(LedgerError::InvalidCreditLimit { limit });
        }

        let saldo_actual = snapshot.saldo_actual;
        let available = Self::available_credit(limit, saldo_actual)?;
        let owed = saldo_actual.max(Decimal::ZERO);
        let utilization = if limit.is_zero() {
            None
        } else {
            let ratio = owed.checked_div(limit).ok_or_else(|| {
                LedgerError::Overflow(format!("utilization of {owed} against limit {limit}"))
            })?;
            Some(ratio)
        };
        let exceeded = available < Decimal::ZERO;
        let near_limit = !exceeded && utilization.is_some_and(|u| u >= warning_ratio);

        if exceeded {
            tracing::warn!(%limit, %saldo_actual, "credit limit exceeded");
        }

        Ok(Self {
            limit,
            saldo_actual,
            available,
            utilization,
            near_limit,
            exceeded,
        })
    }
}
