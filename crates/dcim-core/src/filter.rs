// ── Export filter predicates ──
//
// Applied to materialized devices and flat access rows before emission,
// so the same row dump can serve several narrowed exports.

use chrono::{DateTime, Utc};

use crate::model::{DeviceNode, EntityId};
use crate::rows::AccessLogRow;

/// Filter predicate for device exports.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceFilter {
    All,
    ByTenant(EntityId),
    ByStatus(String),
    /// Every inner filter must match.
    AllOf(Vec<DeviceFilter>),
}

impl DeviceFilter {
    /// Combine optional tenant and status constraints.
    pub fn from_options(tenant: Option<EntityId>, status: Option<String>) -> Self {
        let filters: Vec<Self> = tenant
            .map(Self::ByTenant)
            .into_iter()
            .chain(status.map(Self::ByStatus))
            .collect();
        match filters.len() {
            0 => Self::All,
            1 => filters.into_iter().next().unwrap_or(Self::All),
            _ => Self::AllOf(filters),
        }
    }

    pub fn matches(&self, device: &DeviceNode) -> bool {
        match self {
            Self::All => true,
            Self::ByTenant(id) => device
                .tenant
                .as_ref()
                .and_then(|t| t.id.as_ref())
                .is_some_and(|tid| tid.same_text(id)),
            Self::ByStatus(status) => device.status == *status,
            Self::AllOf(filters) => filters.iter().all(|f| f.matches(device)),
        }
    }
}

/// Filter predicate for access log exports. Time bounds are inclusive
/// and compare against check-in.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessFilter {
    All,
    BySite(EntityId),
    CheckedInFrom(DateTime<Utc>),
    CheckedInUntil(DateTime<Utc>),
    AllOf(Vec<AccessFilter>),
}

impl AccessFilter {
    pub fn from_options(
        site: Option<EntityId>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        let filters: Vec<Self> = site
            .map(Self::BySite)
            .into_iter()
            .chain(from.map(Self::CheckedInFrom))
            .chain(to.map(Self::CheckedInUntil))
            .collect();
        if filters.is_empty() {
            Self::All
        } else {
            Self::AllOf(filters)
        }
    }

    pub fn matches(&self, row: &AccessLogRow) -> bool {
        match self {
            Self::All => true,
            Self::BySite(id) => row
                .site_id
                .as_ref()
                .is_some_and(|sid| sid.same_text(id)),
            Self::CheckedInFrom(at) => row.check_in_at >= *at,
            Self::CheckedInUntil(at) => row.check_in_at <= *at,
            Self::AllOf(filters) => filters.iter().all(|f| f.matches(row)),
        }
    }
}
