//! All-or-nothing material resolution, and the optimistic preview.
//!
//! `resolve` is the only code path that mutates resource pools. It checks
//! every material against the combined pools before deducting anything, so a
//! shortfall leaves every pool exactly as it was.

use std::collections::BTreeMap;
use std::fmt;

use bevy::log::{debug, error, warn};
use bevy::prelude::Resource;

use crate::agent::AgentId;
use crate::materials::MaterialId;
use crate::pools::{PoolAccess, PoolError, PoolSet};

// =============================================================================
// Shortfall
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub material: MaterialId,
    pub required: u64,
    pub available: u64,
}

impl Shortfall {
    pub fn missing(&self) -> u64 {
        self.required.saturating_sub(self.available)
    }
}

/// Every short material, in material order. Diagnostic only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortfallReport {
    pub agent: Option<AgentId>,
    pub missing: Vec<Shortfall>,
}

impl ShortfallReport {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn total_missing(&self) -> u64 {
        self.missing.iter().map(Shortfall::missing).sum()
    }

    pub fn get(&self, material: &MaterialId) -> Option<&Shortfall> {
        self.missing.iter().find(|s| &s.material == material)
    }
}

impl fmt::Display for ShortfallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing")?;
        for (i, s) in self.missing.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(
                f,
                "{sep}{} x{} (have {}/{})",
                s.material,
                s.missing(),
                s.available,
                s.required
            )?;
        }
        Ok(())
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    Shortfall(ShortfallReport),
    /// A pool refused a deduction its reported availability promised and no
    /// lower-ranked pool could make up the difference. Everything already
    /// taken was refunded except `stranded`, which the pools would not accept
    /// back.
    PoolContract {
        pool: String,
        material: MaterialId,
        error: PoolError,
        stranded: BTreeMap<MaterialId, u64>,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Shortfall(report) => write!(f, "{report}"),
            ResolveError::PoolContract {
                pool,
                material,
                error,
                stranded,
            } => {
                write!(f, "pool '{pool}' broke its contract for {material}: {error}")?;
                write_stranded(f, stranded)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

pub(crate) fn write_stranded(
    f: &mut fmt::Formatter<'_>,
    stranded: &BTreeMap<MaterialId, u64>,
) -> fmt::Result {
    for (i, (material, count)) in stranded.iter().enumerate() {
        let lead = if i == 0 { " (not refunded: " } else { ", " };
        write!(f, "{lead}{material} x{count}")?;
    }
    if !stranded.is_empty() {
        write!(f, ")")?;
    }
    Ok(())
}

// =============================================================================
// CommitTicket
// =============================================================================

/// Proof that materials were secured. Only `resolve` and
/// [`CommitTicket::exempt`] create tickets, and `commit` consumes them.
#[derive(Debug, PartialEq, Eq)]
pub struct CommitTicket {
    agent: AgentId,
    spent: BTreeMap<MaterialId, u64>,
    exempt: bool,
}

impl CommitTicket {
    /// Ticket for an agent in unlimited-resource mode. No pool is charged.
    pub fn exempt(agent: AgentId) -> Self {
        Self {
            agent,
            spent: BTreeMap::new(),
            exempt: true,
        }
    }

    pub fn agent(&self) -> &AgentId {
        &self.agent
    }

    pub fn spent(&self) -> &BTreeMap<MaterialId, u64> {
        &self.spent
    }

    pub fn is_exempt(&self) -> bool {
        self.exempt
    }
}

// =============================================================================
// resolve
// =============================================================================

/// Secure `required` from `pools` on behalf of `agent`.
///
/// Availability is summed across every pool first; if any material is short
/// the call returns `Shortfall` without deducting anything. Otherwise each
/// material is drained from pools in priority order. A pool that refuses is
/// skipped and the remainder is sought further down the chain; if that still
/// leaves a material short, every deduction made so far is refunded.
pub fn resolve(
    required: &BTreeMap<MaterialId, u64>,
    agent: &AgentId,
    pools: &mut PoolSet,
) -> Result<CommitTicket, ResolveError> {
    let missing: Vec<Shortfall> = required
        .iter()
        .filter(|(_, needed)| **needed > 0)
        .filter_map(|(material, needed)| {
            let available = pools.total_available(material);
            (available < *needed).then(|| Shortfall {
                material: material.clone(),
                required: *needed,
                available,
            })
        })
        .collect();
    if !missing.is_empty() {
        debug!("resolve: {} short on {} materials", agent, missing.len());
        return Err(ResolveError::Shortfall(ShortfallReport {
            agent: Some(agent.clone()),
            missing,
        }));
    }

    let mut spent = BTreeMap::new();
    let mut taken: Vec<(usize, MaterialId, u64)> = Vec::new();
    for (material, needed) in required {
        if *needed == 0 {
            continue;
        }
        let mut remaining = *needed;
        let mut refusal: Option<(String, PoolError)> = None;
        for (index, pool) in pools.iter_mut().enumerate() {
            if remaining == 0 {
                break;
            }
            let take = pool.available(material).min(remaining);
            if take == 0 {
                continue;
            }
            match pool.deduct(material, take) {
                Ok(()) => {
                    taken.push((index, material.clone(), take));
                    remaining -= take;
                }
                Err(e) => {
                    warn!(
                        "resolve: pool '{}' refused {} x{} after reporting it available: {}",
                        pool.name(),
                        material,
                        take,
                        e
                    );
                    refusal.get_or_insert_with(|| (pool.name().to_string(), e));
                }
            }
        }
        if remaining > 0 {
            let stranded = roll_back(pools, taken);
            let Some((pool, error)) = refusal else {
                // Availability shrank between the check and the drain.
                return Err(ResolveError::Shortfall(ShortfallReport {
                    agent: Some(agent.clone()),
                    missing: vec![Shortfall {
                        material: material.clone(),
                        required: *needed,
                        available: *needed - remaining,
                    }],
                }));
            };
            error!(
                "resolve: {} still short {} x{} after pool '{}' refused",
                agent, material, remaining, pool
            );
            return Err(ResolveError::PoolContract {
                pool,
                material: material.clone(),
                error,
                stranded,
            });
        }
        spent.insert(material.clone(), *needed);
    }
    Ok(CommitTicket {
        agent: agent.clone(),
        spent,
        exempt: false,
    })
}

/// Refund every deduction in `taken`, newest first. Returns what could not
/// be put back.
fn roll_back(
    pools: &mut PoolSet,
    taken: Vec<(usize, MaterialId, u64)>,
) -> BTreeMap<MaterialId, u64> {
    let mut stranded = BTreeMap::new();
    for (index, material, count) in taken.into_iter().rev() {
        let refunded = match pools.iter_mut().nth(index) {
            Some(pool) => pool.refund(&material, count).map_err(|e| {
                error!(
                    "resolve: pool '{}' would not take back {} x{}: {}",
                    pool.name(),
                    material,
                    count,
                    e
                );
            }),
            None => Err(()),
        };
        if refunded.is_err() {
            *stranded.entry(material).or_insert(0) += count;
        }
    }
    stranded
}

// =============================================================================
// Preview
// =============================================================================

/// Tuning for the optimistic preview.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviewConfig {
    /// Upper bound on the total units a linked remote pool is assumed to
    /// supply. `None` trusts the link for any amount.
    pub remote_optimism_cap: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordability {
    /// Direct pools alone cover everything.
    Affordable,
    /// Covered if the linked remote pools hold what direct pools lack.
    AssumingRemote { assumed: BTreeMap<MaterialId, u64> },
    /// Not coverable even optimistically.
    Unaffordable(ShortfallReport),
}

impl Affordability {
    pub fn is_affordable(&self) -> bool {
        !matches!(self, Affordability::Unaffordable(_))
    }
}

/// Estimate whether `required` is affordable without mutating anything.
///
/// Only `Direct` pools are read. A linked `Remote` pool is assumed to cover
/// the rest, bounded by `config.remote_optimism_cap`. `resolve` remains the
/// authority.
pub fn preview(
    required: &BTreeMap<MaterialId, u64>,
    pools: &PoolSet,
    config: &PreviewConfig,
) -> Affordability {
    let remote_linked = pools
        .iter()
        .any(|p| p.access() == PoolAccess::Remote && p.is_linked());

    let mut missing = Vec::new();
    for (material, needed) in required {
        let direct: u64 = pools
            .iter()
            .filter(|p| p.access() == PoolAccess::Direct)
            .map(|p| p.available(material))
            .fold(0, u64::saturating_add);
        if direct < *needed {
            missing.push(Shortfall {
                material: material.clone(),
                required: *needed,
                available: direct,
            });
        }
    }
    if missing.is_empty() {
        return Affordability::Affordable;
    }

    let report = ShortfallReport {
        agent: None,
        missing,
    };
    let within_cap = config
        .remote_optimism_cap
        .map_or(true, |cap| report.total_missing() <= cap);
    if remote_linked && within_cap {
        let assumed = report
            .missing
            .iter()
            .map(|s| (s.material.clone(), s.missing()))
            .collect();
        return Affordability::AssumingRemote { assumed };
    }
    Affordability::Unaffordable(report)
}
