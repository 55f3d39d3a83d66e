//! Profitability evaluator: cost of capital for a single operation.
//!
//! A shortfall between the operation's input cost and the unit's balance
//! is financed; the loan compounds at the per-tick interest rate over the
//! operation's duration.

use crate::{
    catalog::Operation,
    error::{SimError, SimResult},
    market::Market,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Profit per tick of operation time.
    pub profit_rate:       f64,
    pub profit:            f64,
    /// Balance after paying for inputs, before earnings are credited.
    pub resulting_balance: f64,
}

pub fn evaluate(
    market: &Market,
    op: &Operation,
    interest_rate: f64,
    balance: f64,
) -> SimResult<Evaluation> {
    if op.duration == 0 {
        return Err(SimError::ZeroDuration {
            career:    "<unknown>".into(),
            operation: op.name.clone(),
        });
    }

    let mut cost = 0.0;
    for (resource, qty) in &op.costs {
        cost += market.ask(resource, *qty)?;
    }

    if cost > balance {
        let loan = (cost - balance) * (1.0 + interest_rate).powf(op.duration as f64);
        cost = balance + loan;
    }

    let mut earnings = 0.0;
    for (resource, qty) in &op.products {
        earnings += market.bid(resource, *qty)?;
    }

    let profit = earnings - cost;
    Ok(Evaluation {
        profit_rate: profit / op.duration as f64,
        profit,
        resulting_balance: balance - cost,
    })
}
