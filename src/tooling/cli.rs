//! CLI Tooling
//!
//! Command-line interface over a sled-backed ledger. Every mutating command is
//! issued on behalf of the identity given with `--as`.

use crate::agent::AgentProfile;
use crate::clock::SystemClock;
use crate::config::{ConfigLoader, LedgerSettings};
use crate::engine::ReputationEngine;
use crate::error::LedgerError;
use crate::ledger::TaskRecord;
use crate::logging::{LogFormat, LogOutput};
use crate::protocol::ProtocolConfig;
use crate::store::SledSlotStore;
use crate::types::Identity;
use crate::vouch::{LockupWithdrawal, StakeVault, VouchReceipt, VouchRecord, VouchStatus};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// repledger - reputation accounting for autonomous agents
#[derive(Parser)]
#[command(name = "repledger")]
#[command(about = "Reputation ledger for autonomous agents with staked vouches")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger store directory (overrides storage.path)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Acting identity: 64 hex characters, or a label hashed into one
    #[arg(long = "as", global = true)]
    pub identity: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Log level or filter directive (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Log destination
    #[arg(long, value_enum, global = true)]
    pub log_output: Option<LogOutput>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the protocol config; the acting identity becomes the authority
    Init {
        #[arg(long)]
        min_stake: Option<u64>,
        #[arg(long)]
        decay_rate: Option<u64>,
        #[arg(long)]
        reward_amount: Option<u64>,
    },
    /// Register the acting identity as an agent
    Register {
        name: String,
        #[arg(long, default_value = "")]
        metadata_uri: String,
    },
    /// Record a completed task for the acting identity
    CompleteTask {
        task_id: String,
        #[arg(long, default_value = "")]
        proof_uri: String,
    },
    /// Stake for (or against) another agent
    Vouch {
        target: String,
        amount: u64,
        /// Record a negative vouch
        #[arg(long)]
        against: bool,
    },
    /// Withdraw the acting identity's stake from a vouch once its lockup expired
    Withdraw { target: String },
    /// Apply one decay cycle to an agent
    Decay { target: String },
    /// Mint staking funds to an account (authority only)
    Fund { owner: String, amount: u64 },
    /// Show an agent profile (defaults to the acting identity)
    Show { identity: Option<String> },
    /// Show a task record
    ShowTask { agent: String, task_id: String },
    /// Show a vouch record and its vault
    ShowVouch { voucher: String, target: String },
    /// Show an account balance (defaults to the acting identity)
    Balance { owner: Option<String> },
    /// Show the protocol config
    Protocol,
    /// Print the effective settings as TOML
    Settings,
    /// Print the identity a label or hex string resolves to
    Identity { value: String },
}

/// Parse an identity argument: 64 hex characters (optionally 0x-prefixed) are
/// taken literally, anything else is hashed as a development label.
pub fn parse_identity(value: &str) -> Result<Identity> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("identity must not be empty"));
    }
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.len() == 64 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return trimmed
            .parse()
            .with_context(|| format!("invalid identity {}", trimmed));
    }
    Ok(Identity::from_label(trimmed))
}

/// CLI context holding the opened ledger
pub struct CliContext {
    engine: ReputationEngine,
    store: Arc<SledSlotStore>,
    settings: LedgerSettings,
    store_path: PathBuf,
    caller: Option<Identity>,
    format: OutputFormat,
}

impl CliContext {
    /// Open the ledger store named by `cli` and `settings`
    pub fn new(cli: &Cli, settings: LedgerSettings) -> Result<Self> {
        let store_path = match &cli.store {
            Some(path) => path.clone(),
            None => settings.storage.resolve_path()?,
        };
        let store = Arc::new(
            SledSlotStore::new(&store_path)
                .with_context(|| format!("failed to open ledger store at {}", store_path.display()))?,
        );
        let engine = ReputationEngine::new(store.clone(), Arc::new(SystemClock::new()));
        let caller = cli.identity.as_deref().map(parse_identity).transpose()?;
        info!(store = %store_path.display(), "Ledger store opened");
        Ok(Self {
            engine,
            store,
            settings,
            store_path,
            caller,
            format: cli.format,
        })
    }

    /// Load settings for `cli`: explicit `--config` file, else the standard sources
    pub fn load_settings(cli: &Cli) -> Result<LedgerSettings> {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        let mut settings = ConfigLoader::resolve(cli.config.as_deref(), &cwd)?;
        if let Some(level) = &cli.log_level {
            settings.logging.level = level.clone();
        }
        if let Some(format) = cli.log_format {
            settings.logging.format = format;
        }
        if let Some(output) = cli.log_output {
            settings.logging.output = output;
        }
        if let Some(file) = &cli.log_file {
            settings.logging.file = Some(file.clone());
        }
        Ok(settings)
    }

    pub fn engine(&self) -> &ReputationEngine {
        &self.engine
    }

    fn caller(&self) -> Result<Identity> {
        self.caller
            .ok_or_else(|| anyhow!("this command needs an acting identity; pass --as <identity>"))
    }

    /// Execute a CLI command and render its output
    pub fn execute(&self, command: &Commands) -> Result<String> {
        let output = self.execute_inner(command)?;
        self.store.flush()?;
        Ok(output)
    }

    fn execute_inner(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::Init {
                min_stake,
                decay_rate,
                reward_amount,
            } => {
                let caller = self.caller()?;
                let mut params = self.settings.protocol.to_params();
                if let Some(v) = min_stake {
                    params.min_stake = *v;
                }
                if let Some(v) = decay_rate {
                    params.decay_rate = *v;
                }
                if let Some(v) = reward_amount {
                    params.reward_amount = *v;
                }
                let config = self.engine.initialize(&caller, params)?;
                self.render(&config, format_protocol)
            }
            Commands::Register { name, metadata_uri } => {
                let caller = self.caller()?;
                let profile = self.engine.register_agent(&caller, name, metadata_uri)?;
                self.render(&profile, format_profile)
            }
            Commands::CompleteTask { task_id, proof_uri } => {
                let caller = self.caller()?;
                self.engine.complete_task(&caller, task_id, proof_uri)?;
                let task = self
                    .engine
                    .query_task(&caller, task_id)?
                    .ok_or_else(|| anyhow!("task {} vanished after commit", task_id))?;
                self.render(&task, format_task)
            }
            Commands::Vouch {
                target,
                amount,
                against,
            } => {
                let caller = self.caller()?;
                let target = parse_identity(target)?;
                let receipt = self.engine.vouch(&caller, &target, *amount, !*against)?;
                self.render(&receipt, format_receipt)
            }
            Commands::Withdraw { target } => {
                let caller = self.caller()?;
                let target = parse_identity(target)?;
                let resolver = LockupWithdrawal {
                    lockup_secs: self.settings.vouch.lockup_secs,
                };
                let record = self
                    .engine
                    .resolve_vouch(&caller, &caller, &target, &resolver)?;
                self.render(&record, |r| format_vouch(r, None))
            }
            Commands::Decay { target } => {
                let caller = self.caller()?;
                let target = parse_identity(target)?;
                let profile = self.engine.decay(&caller, &target)?;
                self.render(&profile, format_profile)
            }
            Commands::Fund { owner, amount } => {
                let caller = self.caller()?;
                let owner = parse_identity(owner)?;
                let balance = self.engine.fund(&caller, &owner, *amount)?;
                self.render(&BalanceView { owner, balance }, format_balance)
            }
            Commands::Show { identity } => {
                let identity = self.identity_or_caller(identity.as_deref())?;
                let profile = self
                    .engine
                    .query_reputation(&identity)?
                    .ok_or_else(|| LedgerError::NotRegistered(identity.to_hex()))?;
                self.render(&profile, format_profile)
            }
            Commands::ShowTask { agent, task_id } => {
                let agent = parse_identity(agent)?;
                let task = self
                    .engine
                    .query_task(&agent, task_id)?
                    .ok_or_else(|| anyhow!("no task {} recorded for {}", task_id, agent))?;
                self.render(&task, format_task)
            }
            Commands::ShowVouch { voucher, target } => {
                let voucher = parse_identity(voucher)?;
                let target = parse_identity(target)?;
                let record = self.engine.query_vouch(&voucher, &target)?.ok_or(
                    LedgerError::VouchNotFound {
                        voucher: voucher.to_hex(),
                        target: target.to_hex(),
                    },
                )?;
                let vault = self.engine.query_vault(&voucher, &target)?;
                let view = VouchView { record, vault };
                self.render(&view, |v| format_vouch(&v.record, v.vault.as_ref()))
            }
            Commands::Balance { owner } => {
                let owner = self.identity_or_caller(owner.as_deref())?;
                let balance = self.engine.balance_of(&owner)?;
                self.render(&BalanceView { owner, balance }, format_balance)
            }
            Commands::Protocol => {
                let config = self.engine.config()?.ok_or(LedgerError::NotInitialized)?;
                self.render(&config, format_protocol)
            }
            Commands::Settings => {
                let mut settings = self.settings.clone();
                settings.storage.path = Some(self.store_path.clone());
                match self.format {
                    OutputFormat::Json => Ok(serde_json::to_string_pretty(&settings)?),
                    OutputFormat::Text => Ok(toml::to_string_pretty(&settings)?),
                }
            }
            Commands::Identity { value } => {
                let identity = parse_identity(value)?;
                match self.format {
                    OutputFormat::Json => Ok(serde_json::to_string_pretty(&identity)?),
                    OutputFormat::Text => Ok(identity.to_hex()),
                }
            }
        }
    }

    fn identity_or_caller(&self, value: Option<&str>) -> Result<Identity> {
        match value {
            Some(v) => parse_identity(v),
            None => self.caller(),
        }
    }

    fn render<T: Serialize>(&self, value: &T, text: impl Fn(&T) -> String) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Text => Ok(text(value)),
        }
    }
}

#[derive(Serialize)]
struct BalanceView {
    owner: Identity,
    balance: u64,
}

#[derive(Serialize)]
struct VouchView {
    record: VouchRecord,
    vault: Option<StakeVault>,
}

fn field_table(rows: Vec<(&str, String)>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    for (field, value) in rows {
        table.add_row(vec![field.to_string(), value]);
    }
    table.to_string()
}

fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

fn format_protocol(config: &ProtocolConfig) -> String {
    field_table(vec![
        ("Authority", config.authority.to_hex()),
        ("Min stake", config.min_stake.to_string()),
        ("Decay rate", config.decay_rate.to_string()),
        ("Reward amount", config.reward_amount.to_string()),
        ("Total agents", config.total_agents.to_string()),
        ("Created", format_timestamp(config.created_at)),
    ])
}

fn format_profile(profile: &AgentProfile) -> String {
    field_table(vec![
        ("Owner", profile.owner.to_hex()),
        ("Name", profile.name.clone()),
        ("Metadata URI", profile.metadata_uri.clone()),
        ("Score", profile.reputation_score.to_string()),
        ("Tier", profile.tier().to_string()),
        ("Tasks", profile.task_count.to_string()),
        (
            "Vouches",
            format!(
                "{} (+{} / -{})",
                profile.vouch_count, profile.positive_vouches, profile.negative_vouches
            ),
        ),
        ("Staked", profile.staked_amount.to_string()),
        ("Last activity", format_timestamp(profile.last_activity)),
        ("Created", format_timestamp(profile.created_at)),
    ])
}

fn format_task(task: &TaskRecord) -> String {
    field_table(vec![
        ("Agent", task.agent.to_hex()),
        ("Task", task.task_id.clone()),
        ("Proof URI", task.proof_uri.clone()),
        ("Earned", task.reputation_earned.to_string()),
        ("Completed", format_timestamp(task.completed_at)),
    ])
}

fn format_status(status: &VouchStatus) -> String {
    match status {
        VouchStatus::Active => "active".to_string(),
        VouchStatus::Resolved {
            disposition,
            resolved_at,
        } => format!("{:?} at {}", disposition, format_timestamp(*resolved_at)),
    }
}

fn format_vouch(record: &VouchRecord, vault: Option<&StakeVault>) -> String {
    let mut rows = vec![
        ("Voucher", record.voucher.to_hex()),
        ("Target", record.target.to_hex()),
        ("Amount", record.amount.to_string()),
        ("Direction", if record.is_positive { "for" } else { "against" }.to_string()),
        ("Score delta", format!("{:+}", record.score_delta)),
        ("Created", format_timestamp(record.created_at)),
        ("Status", format_status(&record.status)),
    ];
    if let Some(vault) = vault {
        rows.push(("Vault balance", vault.balance.to_string()));
    }
    field_table(rows)
}

fn format_receipt(receipt: &VouchReceipt) -> String {
    format!(
        "{}\nTarget score is now {} ({})",
        format_vouch(&receipt.record, Some(&receipt.vault)),
        receipt.target.reputation_score,
        receipt.target.tier()
    )
}

fn format_balance(view: &BalanceView) -> String {
    format!("{} {}", view.owner, view.balance)
}
