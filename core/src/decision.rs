//! Decision policy: greedy, single-step choice of the operation with the
//! best profit rate that the unit can afford and finish before its age
//! limit. Doing nothing is always a candidate.

use crate::{
    catalog::Operation,
    error::SimResult,
    market::Market,
    profitability::evaluate,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision<'a> {
    /// `None` is the no-op.
    pub operation:   Option<&'a Operation>,
    pub profit:      f64,
    pub profit_rate: f64,
}

/// Rate of doing nothing: carrying cost of any debt.
pub fn noop_rate(balance: f64, interest_rate: f64) -> f64 {
    if balance < 0.0 {
        -(-balance * interest_rate)
    } else {
        0.0
    }
}

/// Pick the operation with strictly the highest profit rate.
///
/// Candidates are visited in slice order and only a strictly better rate
/// replaces the incumbent, so for name-sorted slices ties go to the name
/// that sorts first.
pub fn choose<'a>(
    market: &Market,
    operations: &'a [Operation],
    interest_rate: f64,
    balance: f64,
    min_balance: f64,
    max_time: i64,
) -> SimResult<Decision<'a>> {
    let rate = noop_rate(balance, interest_rate);
    let mut best = Decision {
        operation:   None,
        profit:      rate,
        profit_rate: rate,
    };

    for op in operations {
        if i64::try_from(op.duration).map_or(true, |d| d > max_time) {
            continue;
        }
        let eval = evaluate(market, op, interest_rate, balance)?;
        if eval.resulting_balance < min_balance {
            continue;
        }
        if eval.profit_rate > best.profit_rate {
            best = Decision {
                operation:   Some(op),
                profit:      eval.profit,
                profit_rate: eval.profit_rate,
            };
        }
    }

    Ok(best)
}
