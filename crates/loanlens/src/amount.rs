//! Fixed-point token amount formatting
//!
//! Loan amounts arrive as raw 18-decimal integers and leave as decimal
//! strings. Formatting trims trailing fractional zeros but always keeps one
//! fractional digit, so one whole token renders as "1.0". Parsing accepts
//! anything formatting can produce and round-trips to the same raw integer.

use ethers::types::U256;

use crate::error::{LensError, LensResult};

/// Decimal places of the native token
pub const TOKEN_DECIMALS: usize = 18;

//-----------------------------------------------------------------------------
// Formatting
//-----------------------------------------------------------------------------

/// Render a raw 18-decimal amount as a decimal string
pub fn format_amount(raw: U256) -> String {
    let scale = U256::exp10(TOKEN_DECIMALS);
    let (whole, frac) = raw.div_mod(scale);

    let mut frac_digits = format!("{:0>width$}", frac.to_string(), width = TOKEN_DECIMALS);
    while frac_digits.len() > 1 && frac_digits.ends_with('0') {
        frac_digits.pop();
    }

    format!("{}.{}", whole, frac_digits)
}

//-----------------------------------------------------------------------------
// Parsing
//-----------------------------------------------------------------------------

/// Parse a decimal string back into a raw 18-decimal amount
///
/// Accepts plain integers ("2"), fractional forms ("1.5", ".5") and the
/// padded forms `format_amount` produces. Rejects empty input, more than 18
/// fractional digits and anything that is not an unsigned decimal.
pub fn parse_amount(text: &str) -> LensResult<U256> {
    let text = text.trim();
    if text.is_empty() {
        return Err(LensError::amount_error("Empty amount string"));
    }

    let (whole, frac) = match text.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (text, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(LensError::amount_error(format!("Invalid amount '{}'", text)));
    }
    if frac.len() > TOKEN_DECIMALS {
        return Err(LensError::amount_error(format!(
            "Amount '{}' has more than {} decimal places",
            text, TOKEN_DECIMALS
        )));
    }

    let whole_part = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole)
            .map_err(|e| LensError::amount_error(format!("Invalid amount '{}': {:?}", text, e)))?
    };

    let frac_part = if frac.is_empty() {
        U256::zero()
    } else {
        let padded = format!("{:0<width$}", frac, width = TOKEN_DECIMALS);
        U256::from_dec_str(&padded)
            .map_err(|e| LensError::amount_error(format!("Invalid amount '{}': {:?}", text, e)))?
    };

    whole_part
        .checked_mul(U256::exp10(TOKEN_DECIMALS))
        .and_then(|scaled| scaled.checked_add(frac_part))
        .ok_or_else(|| LensError::amount_error(format!("Amount '{}' overflows", text)))
}
