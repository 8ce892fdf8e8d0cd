//! JSON scenario files and their execution against an in-memory ledger.
//!
//! Amounts and rates are decimal strings so 18-decimal values survive JSON
//! intact; `"all"` selects the whole-balance sentinel.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tide_core::auth::OwnerAuthorizer;
use tide_core::clock::ManualClock;
use tide_core::traits::{Authorizer, Clock};
use tide_core::types::{Amount, HolderId, Rate, Timestamp, TransferAmount};
use tide_ledger::{InterestLedger, LedgerConfig, LedgerEvent, MemoryLedger, RatePolicy};
use tracing::{info, warn};

/// A scripted run: who administers the rate, when the clock starts, and what happens.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Only identity allowed to change the global rate.
    pub admin: HolderId,
    /// Clock value at ledger creation.
    #[serde(default)]
    pub start: Timestamp,
    /// Launch rate; defaults to the ledger default.
    #[serde(default)]
    pub initial_rate: Option<String>,
    #[serde(default)]
    pub policy: RatePolicy,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    SetRate {
        rate: String,
        /// Defaults to the scenario admin.
        #[serde(default)]
        caller: Option<HolderId>,
    },
    Mint {
        to: HolderId,
        amount: String,
    },
    Burn {
        from: HolderId,
        amount: String,
    },
    Transfer {
        from: HolderId,
        to: HolderId,
        amount: String,
    },
    Approve {
        owner: HolderId,
        spender: HolderId,
        amount: String,
    },
    TransferFrom {
        spender: HolderId,
        from: HolderId,
        to: HolderId,
        amount: String,
    },
    Advance {
        secs: u64,
    },
    Settle {
        holder: HolderId,
    },
    Balance {
        holder: HolderId,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetRate { .. } => "set_rate",
            Self::Mint { .. } => "mint",
            Self::Burn { .. } => "burn",
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
            Self::TransferFrom { .. } => "transfer_from",
            Self::Advance { .. } => "advance",
            Self::Settle { .. } => "settle",
            Self::Balance { .. } => "balance",
        }
    }
}

/// What a successful step produced, beyond its events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepResult {
    /// Amount burned, moved, or settled.
    Amount(Amount),
    Balance {
        principal: Amount,
        display: Amount,
        rate: Rate,
    },
}

/// One line of run output.
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub op: &'static str,
    pub at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<StepResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub events: Vec<LedgerEvent>,
}

/// Totals after a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub rejected: usize,
}

impl Scenario {
    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    pub fn config(&self) -> Result<LedgerConfig> {
        let mut config = LedgerConfig::default().with_rate_policy(self.policy);
        if let Some(rate) = &self.initial_rate {
            config.initial_rate = parse_rate(rate)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Execute every step, writing one JSON report line per step to `out`.
    ///
    /// Rejected steps are reported and skipped unless `fail_fast` is set.
    pub fn run<W: Write>(&self, fail_fast: bool, out: &mut W) -> Result<RunSummary> {
        let clock = Arc::new(ManualClock::new(self.start));
        let mut ledger = InterestLedger::in_memory(self.config()?, clock.clone())?;
        let authorizer = OwnerAuthorizer::new(self.admin);
        let mut rejected = 0;

        for (index, step) in self.steps.iter().enumerate() {
            let outcome = self.apply(&mut ledger, &clock, &authorizer, step);
            let (result, error) = match &outcome {
                Ok(result) => (result.clone(), None),
                Err(e) => (None, Some(format!("{e:#}"))),
            };
            let report = StepReport {
                step: index,
                op: step.name(),
                at: clock.now(),
                result,
                error,
                events: ledger.drain_events(),
            };
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;

            if let Err(e) = outcome {
                rejected += 1;
                warn!(step = index, op = step.name(), "step rejected: {e:#}");
                if fail_fast {
                    return Err(e.context(format!("step {index} ({}) rejected", step.name())));
                }
            }
        }

        info!(steps = self.steps.len(), rejected, "scenario complete");
        Ok(RunSummary {
            steps: self.steps.len(),
            rejected,
        })
    }

    fn apply(
        &self,
        ledger: &mut MemoryLedger<Arc<ManualClock>>,
        clock: &ManualClock,
        authorizer: &OwnerAuthorizer,
        step: &Step,
    ) -> Result<Option<StepResult>> {
        let result = match step {
            Step::SetRate { rate, caller } => {
                let caller = caller.unwrap_or(self.admin);
                let admin = authorizer.authorize_rate_admin(&caller)?;
                ledger.set_interest_rate(&admin, parse_rate(rate)?)?;
                None
            }
            Step::Mint { to, amount } => {
                ledger.mint(to, parse_exact(amount)?)?;
                None
            }
            Step::Burn { from, amount } => {
                Some(StepResult::Amount(ledger.burn(from, parse_amount(amount)?)?))
            }
            Step::Transfer { from, to, amount } => Some(StepResult::Amount(ledger.transfer(
                from,
                to,
                parse_amount(amount)?,
            )?)),
            Step::Approve {
                owner,
                spender,
                amount,
            } => {
                let amount = match parse_amount(amount)? {
                    TransferAmount::All => Amount::MAX,
                    TransferAmount::Exact(amount) => amount,
                };
                ledger.approve(owner, spender, amount);
                None
            }
            Step::TransferFrom {
                spender,
                from,
                to,
                amount,
            } => Some(StepResult::Amount(ledger.transfer_from(
                spender,
                from,
                to,
                parse_amount(amount)?,
            )?)),
            Step::Advance { secs } => {
                clock.advance(*secs);
                None
            }
            Step::Settle { holder } => Some(StepResult::Amount(ledger.settle(holder)?)),
            Step::Balance { holder } => Some(StepResult::Balance {
                principal: ledger.principal_balance_of(holder),
                display: ledger.display_balance_of(holder)?,
                rate: ledger.user_interest_rate(holder),
            }),
        };
        Ok(result)
    }
}

fn parse_amount(s: &str) -> Result<TransferAmount> {
    s.parse()
        .with_context(|| format!("invalid amount {s:?}: expected an integer or \"all\""))
}

fn parse_exact(s: &str) -> Result<Amount> {
    match parse_amount(s)? {
        TransferAmount::Exact(amount) => Ok(amount),
        TransferAmount::All => bail!("amount {s:?} must be exact here"),
    }
}

fn parse_rate(s: &str) -> Result<Rate> {
    s.parse()
        .with_context(|| format!("invalid rate {s:?}: expected an integer scaled by 1e18"))
}
