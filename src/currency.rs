//! USD <-> local currency conversion
//!
//! Conversion is linear in both directions. The same multiplication is used
//! everywhere a local amount is produced, so `to_local(x, r) == x * r` holds
//! bit for bit.

use crate::error::{CostError, Result};

/// Convert a USD amount into local currency
pub fn to_local(amount_usd: f64, exchange_rate: f64) -> Result<f64> {
    check_rate(exchange_rate)?;
    Ok(amount_usd * exchange_rate)
}

/// Convert a local-currency amount back into USD
pub fn to_usd(amount_local: f64, exchange_rate: f64) -> Result<f64> {
    check_rate(exchange_rate)?;
    Ok(amount_local / exchange_rate)
}

fn check_rate(exchange_rate: f64) -> Result<()> {
    if !exchange_rate.is_finite() || exchange_rate <= 0.0 {
        return Err(CostError::InvalidExchangeRate(exchange_rate));
    }
    Ok(())
}
