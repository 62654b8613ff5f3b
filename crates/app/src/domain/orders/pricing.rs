//! Order pricing.
//!
//! Pure calculation from resolved catalog products and validated quantities
//! to per-line amounts and an order total. Prices are captured here, once;
//! they flow unchanged into persistence so later catalog edits cannot
//! retroactively change an order.

use thiserror::Error;

use crate::domain::{
    money::Price,
    orders::models::Quantity,
    products::models::Product,
};

/// One priced order line.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product: Product,
    pub quantity: Quantity,
    /// Line total: unit price × quantity.
    pub amount: Price,
}

/// A priced set of order lines.
#[derive(Debug, Clone)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub total: Price,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The computed amount is zero or does not fit the supported range.
    /// Unreachable for valid catalog prices and quantities.
    #[error("computed order amount is not a valid price")]
    InvalidPrice,
}

/// Price the given lines.
///
/// Deterministic and side-effect free; quantities are already validated to
/// be at least 1 by construction.
///
/// # Errors
///
/// Returns [`PricingError::InvalidPrice`] if a line amount or the total
/// overflows or is not positive.
pub fn price_order(lines: Vec<(Product, Quantity)>) -> Result<PricedOrder, PricingError> {
    let mut total: u64 = 0;
    let mut priced = Vec::with_capacity(lines.len());

    for (product, quantity) in lines {
        let amount = product
            .price
            .minor_units()
            .checked_mul(u64::from(quantity.get()))
            .ok_or(PricingError::InvalidPrice)?;

        total = total
            .checked_add(amount)
            .ok_or(PricingError::InvalidPrice)?;

        priced.push(PricedLine {
            amount: Price::from_minor(amount).map_err(|_| PricingError::InvalidPrice)?,
            product,
            quantity,
        });
    }

    let total = Price::from_minor(total).map_err(|_| PricingError::InvalidPrice)?;

    Ok(PricedOrder {
        lines: priced,
        total,
    })
}
