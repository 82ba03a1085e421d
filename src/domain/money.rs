//! Monetary types for price and dollar amounts.

use rust_decimal::Decimal;

/// Price of one contract, a probability in `[0, 1]`.
pub type Price = Decimal;

/// Dollar amount.
pub type Usd = Decimal;

/// One hundred, for percentage conversions.
pub(crate) const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_and_usd_are_decimal() {
        let price: Price = dec!(0.45);
        let size: Usd = dec!(1000);

        assert_eq!(price * size, dec!(450.00));
        assert_eq!(HUNDRED, dec!(100));
    }
}
