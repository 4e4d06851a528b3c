/*
    Ticket - operation budget for non-enclave bindings

    Responsibilities:
    `ticket.rs` defines the configured bound on operations per ticket and the
    per-binding budget that tracks how much of the current ticket is spent.

    Inputs:
    - the configured `max_ops_per_ticket` (-1 = unbounded)
    - one `authorize` call per DHT operation

    Outputs:
    - the ticket the operation runs under
    - requests for fresh tickets when the current one is spent
*/

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::BindingResult;
use super::transport::TicketId;
use crate::config::ConfigError;

/// How many DHT operations one ticket authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum TicketConfig {
    /// A single ticket covers every operation
    #[default]
    Unbounded,
    /// A new ticket is needed after this many operations
    Bounded(NonZeroU64),
}

impl TicketConfig {
    /// Raw value selecting an unbounded budget
    pub const UNBOUNDED_SENTINEL: i64 = -1;

    /// Bounded budget, `None` for zero
    pub fn bounded(max_ops: u64) -> Option<Self> {
        NonZeroU64::new(max_ops).map(TicketConfig::Bounded)
    }

    /// Build from the raw integer form used by config files
    pub fn from_raw(raw: i64) -> Result<Self, ConfigError> {
        if raw == Self::UNBOUNDED_SENTINEL {
            return Ok(TicketConfig::Unbounded);
        }

        match u64::try_from(raw).ok().and_then(Self::bounded) {
            Some(config) => Ok(config),
            None => {
                let reason = if raw == 0 { "zero operations per ticket" } else { "negative bound" };
                Err(ConfigError::InvalidTicketBound { raw: raw.to_string(), reason: reason.into() })
            }
        }
    }

    /// Parse an optional textual setting; absent means unbounded
    pub fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw {
            None => Ok(TicketConfig::Unbounded),
            Some(text) => text.parse(),
        }
    }

    /// Operation bound, `None` when unbounded
    pub fn max_ops(&self) -> Option<u64> {
        match self {
            TicketConfig::Unbounded => None,
            TicketConfig::Bounded(n) => Some(n.get()),
        }
    }

    pub fn as_raw(&self) -> i64 {
        match self {
            TicketConfig::Unbounded => Self::UNBOUNDED_SENTINEL,
            TicketConfig::Bounded(n) => i64::try_from(n.get()).unwrap_or(i64::MAX),
        }
    }
}

impl FromStr for TicketConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::InvalidTicketBound { raw: s.to_string(), reason: e.to_string() }
        })?;
        Self::from_raw(raw)
    }
}

impl TryFrom<i64> for TicketConfig {
    type Error = ConfigError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl From<TicketConfig> for i64 {
    fn from(config: TicketConfig) -> Self {
        config.as_raw()
    }
}

impl fmt::Display for TicketConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketConfig::Unbounded => write!(f, "unbounded"),
            TicketConfig::Bounded(n) => write!(f, "{} ops/ticket", n),
        }
    }
}

/// Tracks use of the current ticket
#[derive(Debug, Clone)]
pub(crate) struct TicketBudget {
    limit: Option<u64>,
    current: Option<TicketId>,
    used: u64,
    acquired: u64,
}

impl TicketBudget {
    pub(crate) fn new(config: TicketConfig) -> Self {
        TicketBudget { limit: config.max_ops(), current: None, used: 0, acquired: 0 }
    }

    fn is_spent(&self) -> bool {
        self.limit.map_or(false, |limit| self.used >= limit)
    }

    /// Charge one operation, calling `issue` for a fresh ticket when needed
    pub(crate) fn authorize<F>(&mut self, issue: F) -> BindingResult<TicketId>
    where
        F: FnOnce(Option<u64>) -> BindingResult<TicketId>,
    {
        let ticket = match self.current {
            Some(ticket) if !self.is_spent() => ticket,
            _ => {
                let ticket = issue(self.limit)?;
                debug!(ticket, limit = ?self.limit, "acquired ticket");
                ::metrics::counter!(crate::metrics::TICKETS_ISSUED).increment(1);
                self.current = Some(ticket);
                self.used = 0;
                self.acquired += 1;
                ticket
            }
        };

        self.used += 1;
        Ok(ticket)
    }

    pub(crate) fn acquired(&self) -> u64 {
        self.acquired
    }

    /// Operations left on the current ticket, `None` when unbounded
    pub(crate) fn remaining(&self) -> Option<u64> {
        match self.current {
            None => self.limit,
            Some(_) => self.limit.map(|limit| limit.saturating_sub(self.used)),
        }
    }
}
