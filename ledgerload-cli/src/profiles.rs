use anyhow::bail;
use ledgerload_core::{RunConfig, Workload};
use mock_ledger::LedgerSettings;
use std::num::NonZeroUsize;
use std::time::Duration;

/// A named, self-contained stress-run configuration.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: &'static str,
    pub description: &'static str,
    pub config: RunConfig,
    pub ledger: LedgerSettings,
}

/// Every built-in profile, in the order they run under `--all`.
pub fn catalog() -> Vec<Profile> {
    vec![
        Profile {
            name: "smoke",
            description: "50 registrations at low concurrency, quick sanity check",
            config: RunConfig::new(50, Workload::Register)
                .concurrency(nz(5))
                .batch_delay(Duration::from_millis(50))
                .log_every(25),
            ledger: LedgerSettings::default(),
        },
        Profile {
            name: "register-burst",
            description: "1000 registrations at width 50",
            config: RunConfig::new(1_000, Workload::Register)
                .concurrency(nz(50))
                .batch_delay(Duration::from_millis(100))
                .log_every(200),
            ledger: LedgerSettings::default(),
        },
        Profile {
            name: "update-churn",
            description: "500 ownership updates with create-if-missing fallback",
            config: RunConfig::new(500, Workload::Update)
                .concurrency(nz(25))
                .batch_delay(Duration::from_millis(100))
                .log_every(100),
            ledger: LedgerSettings::default(),
        },
        Profile {
            name: "read-heavy",
            description: "1000 single-record reads",
            config: RunConfig::new(1_000, Workload::Read)
                .concurrency(nz(50))
                .batch_delay(Duration::from_millis(50))
                .log_every(200),
            ledger: LedgerSettings::default(),
        },
        Profile {
            name: "ledger-scan",
            description: "200 full-collection reads",
            config: RunConfig::new(200, Workload::ReadAll)
                .concurrency(nz(10))
                .batch_delay(Duration::from_millis(200))
                .log_every(50),
            ledger: LedgerSettings::default(),
        },
        Profile {
            name: "soak",
            description: "5000 registrations against a flaky ledger",
            config: RunConfig::new(5_000, Workload::Register)
                .concurrency(nz(20))
                .batch_delay(Duration::from_millis(250))
                .log_every(500),
            ledger: LedgerSettings {
                failure_rate: 0.02,
                ..LedgerSettings::default()
            },
        },
    ]
}

/// Look up the named profiles, failing on the first unknown name.
pub fn resolve(names: &[String]) -> anyhow::Result<Vec<Profile>> {
    let catalog = catalog();
    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        match catalog.iter().find(|profile| profile.name == name) {
            Some(profile) => selected.push(profile.clone()),
            None => bail!("unknown profile `{name}`, --list shows the catalog"),
        }
    }
    Ok(selected)
}

fn nz(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("profile concurrency is nonzero")
}
