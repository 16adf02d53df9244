//! Terminal rendering of contract tables

use owo_colors::OwoColorize;

use economics::RamSupply;
use sys_contract::SystemState;
use sys_core::{Asset, MemoryHost, Name, TokenLedger};

use crate::script::StepReport;

const RULE: &str = "═══════════════════════════════════════════════════";

pub fn header(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
    println!("{}", RULE.bright_black());
}

fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<28} {}", format!("{}:", label).bright_black(), value);
}

fn empty(what: &str) {
    println!("  {}", format!("no {}", what).bright_black());
}

pub fn step_reports(reports: &[StepReport]) {
    header("Replay");
    for report in reports {
        match &report.error {
            None => println!(
                "  {} {:>3} {:<22} {}",
                "✓".green(),
                report.index,
                report.label,
                report.at.to_string().bright_black()
            ),
            Some(e) => println!(
                "  {} {:>3} {:<22} {}",
                "✗".red(),
                report.index,
                report.label,
                e.to_string().red()
            ),
        }
    }
    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    println!();
    if failed == 0 {
        println!("  {} steps applied", reports.len().to_string().green());
    } else {
        println!(
            "  {} steps, {} failed",
            reports.len(),
            failed.to_string().red().bold()
        );
    }
}

pub fn global(state: &SystemState) {
    let g = &state.global;
    header("Global State");
    match state.core_symbol {
        Some(symbol) => field("Core symbol", symbol),
        None => field("Core symbol", "not initialized".yellow()),
    }
    field(
        "Activated",
        if g.is_activated() {
            format!("since {}", g.v1.thresh_activated_stake_time).green().to_string()
        } else {
            "no".yellow().to_string()
        },
    );
    field("Total activated stake", g.v1.total_activated_stake);
    field("Max RAM size", g.v1.max_ram_size);
    field("RAM reserved", g.v1.total_ram_bytes_reserved);
    field("RAM stake", g.v1.total_ram_stake);
    field("Per-block bucket", g.v1.perblock_bucket);
    field("Per-vote bucket", g.v1.pervote_bucket);
    field("Unpaid blocks", g.v1.total_unpaid_blocks);
    field("Producer vote weight", format!("{:.4}", g.v1.total_producer_vote_weight));
    field("Schedule size", g.v1.last_producer_schedule_size);
    field("Last name close", g.v1.last_name_close.slot);
    field("Schema revision", g.v2.revision);
}

pub fn market(state: &SystemState) {
    header("RAM Market");
    let Some(market) = &state.market else {
        empty("market");
        return;
    };
    field("Supply", market.supply);
    field("Base (RAM)", market.base.balance);
    field("Quote (core)", market.quote.balance);
}

pub fn ram(state: &SystemState) {
    header("RAM Supply");
    let Some(market) = &state.market else {
        empty("market");
        return;
    };
    let stats = RamSupply::stats(&state.global, market);
    field("Max size", stats.max_ram_size);
    field("Reserved", stats.reserved);
    field("Free", stats.free);
    field("Growth per block", stats.new_ram_per_block);
    field("RAM reserve", stats.ram_reserve);
    field("Core reserve", stats.core_reserve);
}

pub fn resources(state: &SystemState) {
    header("Resources");
    if state.resources.is_empty() {
        return empty("resource rows");
    }
    println!(
        "  {:<13} {:>16} {:>16} {:>16} {:>12}",
        "owner".bold(),
        "net",
        "cpu",
        "vote",
        "ram bytes"
    );
    for r in state.resources.iter() {
        println!(
            "  {:<13} {:>16} {:>16} {:>16} {:>12}",
            r.owner.to_string(),
            r.net_weight.to_string(),
            r.cpu_weight.to_string(),
            r.vote_weight.to_string(),
            r.ram_bytes
        );
    }
}

pub fn delegations(state: &SystemState) {
    header("Delegations");
    if state.delegations.is_empty() {
        return empty("delegations");
    }
    for (_, d) in state.delegations.iter() {
        println!(
            "  {} → {}  net {}  cpu {}  vote {}",
            d.from.to_string().bold(),
            d.to.to_string().bold(),
            d.net_weight,
            d.cpu_weight,
            d.vote_weight
        );
    }
}

pub fn refunds(state: &SystemState) {
    header("Refund Requests");
    if state.refunds.is_empty() {
        return empty("refunds");
    }
    for r in state.refunds.iter() {
        println!(
            "  {:<13} requested {}  net {}  cpu {}  vote {}",
            r.owner.to_string().bold(),
            r.request_time,
            r.net_amount,
            r.cpu_amount,
            r.vote_amount
        );
    }
}

pub fn producers(state: &SystemState) {
    header("Producers");
    if state.voting.producers.is_empty() {
        return empty("producers");
    }
    for (rank, p) in state.voting.producers.iter_by_secondary().enumerate() {
        let status = if p.is_active {
            "active".green().to_string()
        } else {
            "inactive".red().to_string()
        };
        println!(
            "  {:>3}. {:<13} {:>24.4} {:<9} unpaid {:>6}  {}",
            rank + 1,
            p.owner.to_string().bold(),
            p.total_votes,
            status,
            p.unpaid_blocks,
            p.url.bright_black()
        );
    }
}

pub fn voters(state: &SystemState) {
    header("Voters");
    if state.voting.voters.is_empty() {
        return empty("voters");
    }
    for v in state.voting.voters.iter() {
        let target = match v.proxy {
            Some(proxy) => format!("via {}", proxy),
            None => v
                .producers
                .iter()
                .map(Name::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        };
        let proxy_flag = if v.is_proxy { " [proxy]" } else { "" };
        println!(
            "  {:<13}{} staked {:>14}  weight {:.4}  → {}",
            v.owner.to_string().bold(),
            proxy_flag.magenta(),
            v.staked,
            v.last_vote_weight,
            target
        );
    }
}

pub fn bids(state: &SystemState) {
    header("Name Bids");
    if state.auction.bids.is_empty() {
        return empty("bids");
    }
    for b in state.auction.bids.iter_by_secondary() {
        let status = if b.is_open() {
            "open".green().to_string()
        } else {
            "closed".bright_black().to_string()
        };
        println!(
            "  {:<13} {:<13} {:>14} {:<7} last bid {}",
            b.newname.to_string().bold(),
            b.high_bidder.to_string(),
            b.high_bid.abs(),
            status,
            b.last_bid_time
        );
    }
}

/// Core-token balances of the system accounts and every account with a
/// resource row
pub fn balances(state: &SystemState, host: &MemoryHost) {
    header("Balances");
    let Some(core) = state.core_symbol else {
        return empty("core token");
    };
    let mut holders: Vec<Name> = sys_core::constants::SYSTEM_TOKEN_HOLDERS.to_vec();
    holders.extend(state.resources.iter().map(|r| r.owner));
    holders.sort();
    holders.dedup();
    for holder in holders {
        let balance: Asset = host.balance(holder, core);
        println!("  {:<13} {:>20}", holder.to_string(), balance.to_string());
    }
}
