//! Market pricing tests: linear and exponential curves.

use econo_core::{
    error::SimError,
    market::{Market, Resource},
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn market() -> Market {
    Market::new()
        .with_resource("grain", Resource::linear(1.0, 0.01))
        .with_resource("steep", Resource::linear(10.0, 1.0))
        .with_resource("gold", Resource::exponential(2.0, 1.1))
}

#[test]
fn linear_ask_rises_by_rate_per_unit_bought() {
    let mut m = market();
    let before = m.ask("grain", 1).unwrap();
    for _ in 0..5 {
        m.buy("grain", 1).unwrap();
    }
    let after = m.ask("grain", 1).unwrap();
    assert!(close(after, before + 5.0 * 0.01), "{after} vs {before} + 0.05");
}

#[test]
fn linear_price_clamps_at_zero() {
    let mut m = Market::new().with_resource("glut", Resource::linear(1.0, 0.5));
    m.sell("glut", 10).unwrap();
    assert_eq!(m.ask("glut", 3).unwrap(), 0.0);
    assert_eq!(m.bid("glut", 3).unwrap(), 0.0);
}

#[test]
fn bid_is_evaluated_one_step_below_delta() {
    let m = market();
    assert_eq!(m.ask("steep", 1).unwrap(), 10.0);
    assert_eq!(m.bid("steep", 1).unwrap(), 9.0);
    assert_eq!(m.ask("steep", 2).unwrap(), 10.0 + 11.0);
    assert_eq!(m.bid("steep", 2).unwrap(), 9.0 + 8.0);
}

#[test]
fn exponential_batch_quote_matches_split_quotes() {
    let batch = market().ask("gold", 5).unwrap();

    let mut m = market();
    let first = m.ask("gold", 2).unwrap();
    m.buy("gold", 2).unwrap();
    let second = m.ask("gold", 3).unwrap();

    assert!(close(batch, first + second), "{batch} vs {first} + {second}");
}

#[test]
fn exponential_bid_batch_matches_split_quotes() {
    let batch = market().bid("gold", 4).unwrap();

    let mut m = market();
    let first = m.bid("gold", 1).unwrap();
    m.sell("gold", 1).unwrap();
    let second = m.bid("gold", 3).unwrap();

    assert!(close(batch, first + second));
}

#[test]
fn exponential_price_stays_positive_when_oversold() {
    let mut m = market();
    m.sell("gold", 200).unwrap();
    let price = m.ask("gold", 1).unwrap();
    assert!(price > 0.0);
    assert!(price < 2.0);
}

#[test]
fn buy_then_sell_restores_delta() {
    let mut m = market();
    m.buy("gold", 3).unwrap();
    let start = m.delta("gold").unwrap();
    m.buy("gold", 7).unwrap();
    m.sell("gold", 7).unwrap();
    assert_eq!(m.delta("gold").unwrap(), start);
}

#[test]
fn zero_quantity_costs_nothing() {
    let m = market();
    for name in ["grain", "steep", "gold"] {
        assert_eq!(m.ask(name, 0).unwrap(), 0.0);
        assert_eq!(m.bid(name, 0).unwrap(), 0.0);
    }
}

#[test]
fn unknown_resource_is_rejected() {
    let mut m = market();
    assert!(matches!(m.ask("silk", 1), Err(SimError::UnknownResource { .. })));
    assert!(matches!(m.bid("silk", 1), Err(SimError::UnknownResource { .. })));
    assert!(matches!(m.buy("silk", 1), Err(SimError::UnknownResource { .. })));
}

#[test]
fn negative_quantity_is_rejected() {
    let mut m = market();
    assert!(matches!(m.ask("grain", -1), Err(SimError::InvalidQuantity { qty: -1, .. })));
    assert!(matches!(m.bid("grain", -2), Err(SimError::InvalidQuantity { .. })));
    assert!(matches!(m.sell("grain", -3), Err(SimError::InvalidQuantity { .. })));
    assert_eq!(m.delta("grain").unwrap(), 0);
}
