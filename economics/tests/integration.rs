use economics::*;
use sys_core::constants::RAM_SYMBOL;
use sys_core::{Asset, Symbol};

fn cur() -> Symbol {
    Symbol::new("CUR", 4).unwrap()
}

fn market() -> ExchangeState {
    ExchangeState::new_ram_market(68_719_476_736, &Asset::new(10_000_000_000_000, cur()))
}

#[test]
fn test_round_trip_loses_value() {
    let mut m = market();

    // Buy with 100.0000 CUR: fee first, then the curve
    let paid = 100_0000;
    let fee = RamPricing::fee(paid);
    assert_eq!(fee, 5_000);
    let bytes = m.convert(&Asset::new(paid - fee, cur()), RAM_SYMBOL).unwrap();
    assert_eq!(bytes.amount, 6_836_907);

    // Sell every byte back: curve first, then the fee
    let gross = m.convert(&bytes, cur()).unwrap().amount;
    let net = gross - RamPricing::fee(gross);
    assert_eq!(gross, 994_999);
    assert_eq!(net, 990_024);
    assert!(net < paid);
}

#[test]
fn test_supply_invariant_across_trades() {
    let mut m = market();
    let initial = m.supply.amount;

    for amount in [1_0000, 250_0000, 7_5000] {
        let bytes = m.convert(&Asset::new(amount, cur()), RAM_SYMBOL).unwrap();
        assert_eq!(m.supply.amount, initial);
        m.convert(&Asset::new(bytes.amount / 2, RAM_SYMBOL), cur()).unwrap();
        assert_eq!(m.supply.amount, initial);
    }
}

#[test]
fn test_price_rises_with_demand() {
    let mut m = market();
    let first = m.convert(&Asset::new(1_000_0000, cur()), RAM_SYMBOL).unwrap();
    let second = m.convert(&Asset::new(1_000_0000, cur()), RAM_SYMBOL).unwrap();
    assert!(second.amount < first.amount);
}

#[test]
fn test_bytes_quote_covers_purchase() {
    let m = market();
    let wanted = 8192;
    let cost = RamPricing::bancor_input(m.ram_reserve(), m.core_reserve(), wanted).unwrap();
    let gross = RamPricing::with_fee(cost);
    assert_eq!(gross, 1197);
    assert!(gross - RamPricing::fee(gross) <= cost);
}
