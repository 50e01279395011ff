use rust_decimal::Decimal;

/// Monetary amount. Stored with at most [`MONEY_SCALE`] fractional digits.
pub type Money = Decimal;

/// Number of fractional digits a price may carry.
pub const MONEY_SCALE: u32 = 2;

/// Validates a price: non-negative and representable at [`MONEY_SCALE`].
pub fn validate_price(field: &str, value: Money) -> Result<(), String> {
    if value < Decimal::ZERO {
        return Err(format!("{} must be at least 0.", field));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(format!("{} may have at most {} decimal places.", field, MONEY_SCALE));
    }
    Ok(())
}
