//! Standard private-equity multiples from aggregate totals.
//!
//! DPI, RVPI, TVPI and MOIC all share the same zero-denominator guard: a
//! fund with no paid-in capital yet is a valid, common state, so the
//! multiples are 0 rather than an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Multiple};

/// The four headline multiples together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Multiples {
    pub tvpi: Multiple,
    pub dpi: Multiple,
    pub rvpi: Multiple,
    pub moic: Multiple,
}

/// Distributed to Paid-In: cumulative distributions over paid-in capital.
pub fn dpi(total_distributed: Money, total_invested: Money) -> Multiple {
    if total_invested.is_zero() {
        Decimal::ZERO
    } else {
        total_distributed / total_invested
    }
}

/// Residual Value to Paid-In: current NAV over paid-in capital.
pub fn rvpi(current_nav: Money, total_invested: Money) -> Multiple {
    if total_invested.is_zero() {
        Decimal::ZERO
    } else {
        current_nav / total_invested
    }
}

/// Total Value to Paid-In. Computed as DPI + RVPI so the identity
/// `TVPI == DPI + RVPI` holds exactly, not merely within rounding.
pub fn tvpi(total_distributed: Money, current_nav: Money, total_invested: Money) -> Multiple {
    dpi(total_distributed, total_invested) + rvpi(current_nav, total_invested)
}

/// Multiple on Invested Capital. MOIC is TVPI by convention in this
/// domain.
pub fn moic(total_distributed: Money, current_nav: Money, total_invested: Money) -> Multiple {
    tvpi(total_distributed, current_nav, total_invested)
}

/// All four multiples from the same aggregate totals.
pub fn calculate_multiples(
    total_invested: Money,
    total_distributed: Money,
    current_nav: Money,
) -> Multiples {
    let dpi_val = dpi(total_distributed, total_invested);
    let rvpi_val = rvpi(current_nav, total_invested);
    let tvpi_val = dpi_val + rvpi_val;
    Multiples {
        tvpi: tvpi_val,
        dpi: dpi_val,
        rvpi: rvpi_val,
        moic: tvpi_val,
    }
}
