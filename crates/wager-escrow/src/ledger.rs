//! # Wager Ledger
//!
//! Store of canonical wager records plus the read model consumed by
//! outer layers: lookup by id and paginated listings by participant and
//! by status. Listings are in creation order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use wager_core::{PartyId, WagerId};

use crate::error::EscrowError;
use crate::wager::{PendingResolution, Wager, WagerStatus};

/// Largest page a listing will return.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Offset/limit window into a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of matching records to skip.
    pub offset: usize,
    /// Maximum records to return; clamped to [`MAX_PAGE_LIMIT`].
    pub limit: usize,
}

impl PageRequest {
    /// A window starting at `offset`.
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    fn effective_limit(&self) -> usize {
        self.limit.min(MAX_PAGE_LIMIT)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 20,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records in this page.
    pub items: Vec<T>,
    /// Total matching records across all pages.
    pub total: usize,
    /// Offset of the next page, if there is one.
    pub next_offset: Option<usize>,
}

/// All wagers ever created.
#[derive(Debug, Default, Clone)]
pub struct WagerLedger {
    wagers: HashMap<WagerId, Wager>,
    order: Vec<WagerId>,
}

impl WagerLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new wager.
    pub fn insert(&mut self, wager: Wager) -> Result<(), EscrowError> {
        if self.wagers.contains_key(&wager.id) {
            return Err(EscrowError::DuplicateWager(wager.id));
        }
        self.order.push(wager.id);
        self.wagers.insert(wager.id, wager);
        Ok(())
    }

    /// Look up a wager.
    pub fn get(&self, id: &WagerId) -> Result<&Wager, EscrowError> {
        self.wagers.get(id).ok_or(EscrowError::UnknownWager(*id))
    }

    /// Look up a wager for mutation.
    pub fn get_mut(&mut self, id: &WagerId) -> Result<&mut Wager, EscrowError> {
        self.wagers.get_mut(id).ok_or(EscrowError::UnknownWager(*id))
    }

    /// The outcome in its challenge window, if any.
    pub fn pending_resolution(
        &self,
        id: &WagerId,
    ) -> Result<Option<&PendingResolution>, EscrowError> {
        Ok(self.get(id)?.pending.as_ref())
    }

    /// Number of wagers recorded.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no wager has been recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Every wager in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Wager> {
        self.order.iter().filter_map(|id| self.wagers.get(id))
    }

    /// Wagers in which `party` is creator, counterpart, or arbitrator.
    pub fn list_by_participant(&self, party: &PartyId, page: PageRequest) -> Page<Wager> {
        self.paginate(|w| w.role_of(party).is_some(), page)
    }

    /// Wagers currently in `status`.
    pub fn list_by_status(&self, status: WagerStatus, page: PageRequest) -> Page<Wager> {
        self.paginate(|w| w.status == status, page)
    }

    fn paginate<F>(&self, matches: F, page: PageRequest) -> Page<Wager>
    where
        F: Fn(&Wager) -> bool,
    {
        let matching: Vec<&Wager> = self.iter().filter(|w| matches(w)).collect();
        let total = matching.len();
        let limit = page.effective_limit();
        let items: Vec<Wager> = matching
            .into_iter()
            .skip(page.offset)
            .take(limit)
            .cloned()
            .collect();
        let end = page.offset.saturating_add(items.len());
        let next_offset = (limit > 0 && end < total).then_some(end);
        Page {
            items,
            total,
            next_offset,
        }
    }
}
