//! Scenario files
//!
//! A scenario describes a handful of named identities and how they are
//! wired into the stores. Running it introduces every identity through a
//! single behavior.

use nominal::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Duplicate identity name: {0}")]
    DuplicateName(String),

    #[error("Owner {0} is not a declared identity")]
    UnknownOwner(String),

    #[error("Scenario declares no identities")]
    Empty,

    #[error("{count} identities starting at {first} do not fit in the identity range")]
    IdentityRange { first: u64, count: usize },
}

/// Scenario schema
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    pub identities: Vec<IdentityConfig>,

    /// Value of the group-shared greeting
    #[serde(default)]
    pub greeting: Option<String>,

    /// Name of the identity holding the crown
    #[serde(default)]
    pub owner: Option<String>,

    /// Raw value of the first generated identity
    #[serde(default = "default_first_identity")]
    pub first_identity: u64,

    #[serde(skip)]
    source: Option<PathBuf>,
}

fn default_first_identity() -> u64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub name: String,

    /// Subscribe to the greeting
    #[serde(default)]
    pub group: bool,

    #[serde(default)]
    pub pool: Option<PoolChoice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolChoice {
    /// Start a fresh pool
    New,
    /// Join the most recently created pool
    Latest,
}

impl ScenarioConfig {
    /// Load a scenario from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse and validate a scenario
    pub fn from_yaml(contents: &str) -> Result<Self, ScenarioError> {
        let config: ScenarioConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// File this scenario was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.identities.is_empty() {
            return Err(ScenarioError::Empty);
        }

        let mut seen = HashSet::new();
        for identity in &self.identities {
            if !seen.insert(identity.name.as_str()) {
                return Err(ScenarioError::DuplicateName(identity.name.clone()));
            }
        }

        let count = self.identities.len();
        let fits = u64::try_from(count - 1)
            .ok()
            .and_then(|extra| self.first_identity.max(1).checked_add(extra))
            .is_some();
        if !fits {
            return Err(ScenarioError::IdentityRange {
                first: self.first_identity,
                count,
            });
        }

        if let Some(owner) = &self.owner {
            if !seen.contains(owner.as_str()) {
                return Err(ScenarioError::UnknownOwner(owner.clone()));
            }
        }

        Ok(())
    }
}

/// Wire up the scenario and return one introduction line per identity
pub fn run(config: &ScenarioConfig) -> Result<Vec<String>, ScenarioError> {
    let mut factory = IdentityFactory::starting_at(config.first_identity);
    let mut names = KeyedDatum::new();
    let mut greeting = GroupDatum::new(config.greeting.clone().unwrap_or_default());
    let mut crown = SolitaryDatum::new(());
    let mut roster: PooledDatum<Vec<String>> = PooledDatum::new();

    let mut introduce = Behavior::named("introduce", introduce_line);

    for entry in &config.identities {
        let id = factory
            .next_identity()
            .ok_or(ScenarioError::IdentityRange {
                first: config.first_identity,
                count: config.identities.len(),
            })?;
        names.associate(id, entry.name.clone());

        if entry.group && config.greeting.is_some() {
            greeting.subscribe(id);
        }

        if config.owner.as_deref() == Some(entry.name.as_str()) {
            crown.claim(id);
        }

        match entry.pool {
            Some(PoolChoice::New) => {
                roster.create_pool(id, vec![entry.name.clone()]);
            }
            Some(PoolChoice::Latest) => {
                roster.join_latest_pool(id);
                if let Some(members) = roster.resolve_mut(id) {
                    members.push(entry.name.clone());
                }
            }
            None => {}
        }

        debug!(%id, name = %entry.name, "declared identity");
        introduce.subscribe(id);
    }

    info!(
        identities = factory.issued(),
        pools = roster.pool_count(),
        "running scenario"
    );

    let lines = introduce.invoke_all((&names, &greeting, &crown, &roster));
    debug!(metrics = %introduce.metrics().snapshot(), "scenario finished");
    Ok(lines)
}

type Stores<'a> = (
    &'a KeyedDatum<String>,
    &'a GroupDatum<String>,
    &'a SolitaryDatum<()>,
    &'a PooledDatum<Vec<String>>,
);

fn introduce_line(ctx: Dispatch, (names, greeting, crown, roster): Stores<'_>) -> String {
    let name = ctx.resolve(names).map(String::as_str).unwrap_or("?");

    let mut line = match ctx.resolve(greeting) {
        Some(greeting) => format!("{greeting}, {name}"),
        None => name.to_string(),
    };

    if ctx.resolve(crown).is_some() {
        line.push_str(" (crown)");
    }

    if let Some(members) = ctx.resolve(roster) {
        let mates: Vec<&str> = members
            .iter()
            .map(String::as_str)
            .filter(|member| *member != name)
            .collect();
        if !mates.is_empty() {
            line.push_str(&format!(" [with {}]", mates.join(", ")));
        }
    }

    line
}
