//! Action scripts replayed against an in-memory host

use anyhow::{Context as _, Result};
use chrono::DateTime;
use log::{info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use sys_contract::{Action, ContractError, SystemConfig, SystemContract};
use sys_core::{Asset, Clock, MemoryHost, Name, Symbol, TimePoint, TokenLedger};

/// Host setup applied before the first step
#[derive(Debug, Deserialize)]
pub struct Genesis {
    /// RFC 3339 start time of the host clock
    pub time: String,
    pub token: Symbol,
    #[serde(default)]
    pub balances: BTreeMap<Name, Asset>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Advance { advance_secs: i64 },
    RunDeferred { run_deferred: bool },
    Action(Action),
}

#[derive(Debug, Deserialize)]
pub struct Script {
    pub genesis: Genesis,
    pub steps: Vec<Step>,
}

/// Outcome of one replayed step
#[derive(Debug)]
pub struct StepReport {
    pub index: usize,
    pub label: String,
    pub at: TimePoint,
    pub error: Option<ContractError>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("parsing script")
    }

    /// Fund the genesis accounts and build a contract on top
    pub fn build_contract(&self, config: SystemConfig) -> Result<SystemContract<MemoryHost>> {
        let start = DateTime::parse_from_rfc3339(&self.genesis.time)
            .with_context(|| format!("invalid genesis time {}", self.genesis.time))?;
        let mut host = MemoryHost::at(TimePoint::from_micros(start.timestamp_micros()));
        host.create_token(self.genesis.token);
        for (account, amount) in &self.genesis.balances {
            host.issue(*account, *amount, "genesis")
                .with_context(|| format!("funding {}", account))?;
        }
        Ok(SystemContract::new(host, config))
    }

    /// Run every step. Failed actions are reported and leave no trace.
    pub fn replay(&self, contract: &mut SystemContract<MemoryHost>) -> Vec<StepReport> {
        let mut reports = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            let (label, result) = match step {
                Step::Advance { advance_secs } => {
                    contract.host_mut().advance_secs(*advance_secs);
                    (format!("advance {}s", advance_secs), Ok(()))
                }
                Step::RunDeferred { run_deferred } => {
                    if *run_deferred {
                        match contract.run_deferred() {
                            Ok(count) => (format!("run {} deferred", count), Ok(())),
                            Err(e) => ("run deferred".to_string(), Err(e)),
                        }
                    } else {
                        ("skip deferred".to_string(), Ok(()))
                    }
                }
                Step::Action(action) => (action.name().to_string(), contract.apply(action)),
            };

            match &result {
                Ok(()) => info!("step {} {}: ok", index, label),
                Err(e) => warn!("step {} {}: {}", index, label, e),
            }
            reports.push(StepReport {
                index,
                label,
                at: contract.host().now(),
                error: result.err(),
            });
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO_SCRIPT: &str = include_str!("../demo/script.json");
    const DEMO_CONFIG: &str = include_str!("../demo/config.toml");

    #[test]
    fn test_parse_steps() {
        let script = Script::parse(
            r#"{
                "genesis": {"time": "2020-09-13T12:26:40Z", "token": "4,CUR",
                            "balances": {"alice": "10.0000 CUR"}},
                "steps": [
                    {"advance_secs": 60},
                    {"run_deferred": true},
                    {"action": "refund", "owner": "alice"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(script.steps.len(), 3);
        assert!(matches!(script.steps[0], Step::Advance { advance_secs: 60 }));
        assert!(matches!(script.steps[1], Step::RunDeferred { run_deferred: true }));
        assert!(matches!(script.steps[2], Step::Action(Action::Refund { .. })));
    }

    #[test]
    fn test_genesis_funding() {
        let script = Script::parse(
            r#"{"genesis": {"time": "2020-09-13T12:26:40Z", "token": "4,CUR",
                "balances": {"alice": "10.0000 CUR"}}, "steps": []}"#,
        )
        .unwrap();
        let contract = script.build_contract(SystemConfig::default()).unwrap();
        let cur = Symbol::new("CUR", 4).unwrap();
        assert_eq!(contract.host().balance(Name::constant("alice"), cur).amount, 10_0000);
        assert_eq!(contract.host().supply(&cur).unwrap().amount, 10_0000);
    }

    #[test]
    fn test_demo_replays_cleanly() {
        let config = SystemConfig::from_toml_str(DEMO_CONFIG).unwrap();
        let script = Script::parse(DEMO_SCRIPT).unwrap();
        let mut contract = script.build_contract(config).unwrap();
        let reports = script.replay(&mut contract);

        let failures: Vec<_> = reports.iter().filter(|r| r.error.is_some()).collect();
        assert!(failures.is_empty(), "failed steps: {:?}", failures);
        assert!(contract.state().global.is_activated());
        assert!(!contract.host().proposed_producers().is_empty());

        let cur = Symbol::new("CUR", 4).unwrap();
        assert!(contract.host().balance(Name::constant("bp1"), cur).amount > 100_0000);
        assert!(contract.state().refunds.is_empty());
    }
}
