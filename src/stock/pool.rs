// ABOUTME: Shared inventory pool with per-unit locking and delta reservations
// ABOUTME: All-or-nothing check-and-update keyed by order number, safe under concurrent callers

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::error::{Result, StockError};
use super::sku::Sku;
use crate::order::LineItem;

#[derive(Debug, Default)]
struct UnitState {
    available: i64,
    // Committed reservation per order number. Re-reserving replaces the
    // previous value; the pool moves by the delta, never the full amount.
    reserved: HashMap<String, i64>,
}

/// Outcome of a reservation attempt. Insufficiency is an ordinary domain
/// outcome, not a service error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationOutcome {
    Reserved,
    Insufficient(Vec<String>),
}

impl ReservationOutcome {
    pub fn is_reserved(&self) -> bool {
        matches!(self, ReservationOutcome::Reserved)
    }
}

/// Finite stock shared by every task in a run. Each unit is guarded by its
/// own mutex; a reservation locks every unit it touches, in SKU order, for
/// the full check-and-update so concurrent callers never race a stale
/// availability read.
#[derive(Debug)]
pub struct InventoryPool {
    units: BTreeMap<Sku, Mutex<UnitState>>,
}

impl InventoryPool {
    /// Pool seeded with the default stock levels.
    pub fn new() -> Self {
        Self::with_levels(Sku::ALL.iter().map(|sku| (*sku, sku.default_level())))
    }

    /// Pool with explicit levels. Units not mentioned start empty.
    pub fn with_levels(levels: impl IntoIterator<Item = (Sku, i64)>) -> Self {
        let mut units: BTreeMap<Sku, Mutex<UnitState>> = Sku::ALL
            .iter()
            .map(|sku| (*sku, Mutex::new(UnitState::default())))
            .collect();

        for (sku, level) in levels {
            if let Some(unit) = units.get_mut(&sku) {
                if let Ok(state) = unit.get_mut() {
                    state.available = level.max(0);
                }
            }
        }

        Self { units }
    }

    /// Currently available quantity for a unit.
    pub fn available(&self, sku: Sku) -> Result<i64> {
        Ok(self.lock_unit(sku)?.available)
    }

    /// Quantity already committed to an order for a unit.
    pub fn reserved_for(&self, order_number: &str, sku: Sku) -> Result<i64> {
        Ok(self
            .lock_unit(sku)?
            .reserved
            .get(order_number)
            .copied()
            .unwrap_or(0))
    }

    /// Reserve stock for an order's line items.
    ///
    /// Requested quantities are aggregated per unit (non-positive quantities
    /// ignored). For each unit the pool moves by the delta against the
    /// order's previous reservation: an unchanged re-run is a no-op and a
    /// smaller re-run releases the difference. Any shortfall rejects the
    /// whole request with no partial mutation.
    pub fn reserve(
        &self,
        order_number: &str,
        line_items: &[LineItem],
    ) -> Result<ReservationOutcome> {
        let mut requested: BTreeMap<Sku, i64> = BTreeMap::new();
        for item in line_items {
            if item.qty <= 0 {
                continue;
            }
            *requested
                .entry(Sku::from_description(&item.description))
                .or_insert(0) += item.qty;
        }

        if requested.is_empty() {
            return Ok(ReservationOutcome::Reserved);
        }

        // Lock every touched unit in SKU order and hold the guards across
        // the whole check-and-update; sorted acquisition cannot deadlock.
        let mut guards: Vec<(Sku, MutexGuard<'_, UnitState>)> = Vec::new();
        for sku in requested.keys() {
            guards.push((*sku, self.lock_unit(*sku)?));
        }

        let mut plan: Vec<(i64, i64)> = Vec::new();
        let mut shortfalls: Vec<String> = Vec::new();
        for (sku, guard) in &guards {
            let want = requested[sku];
            let prior = guard.reserved.get(order_number).copied().unwrap_or(0);
            let delta = want - prior;
            if delta > guard.available {
                shortfalls.push(format!(
                    "{}(need_delta={},available={})",
                    sku, delta, guard.available
                ));
            }
            plan.push((want, delta));
        }

        if !shortfalls.is_empty() {
            return Ok(ReservationOutcome::Insufficient(shortfalls));
        }

        for ((_, guard), (want, delta)) in guards.iter_mut().zip(plan) {
            guard.available -= delta;
            guard.reserved.insert(order_number.to_string(), want);
        }

        debug!(
            "Reserved stock for order {}: {:?}",
            order_number, requested
        );
        Ok(ReservationOutcome::Reserved)
    }

    fn lock_unit(&self, sku: Sku) -> Result<MutexGuard<'_, UnitState>> {
        let unit = self.units.get(&sku).ok_or_else(|| StockError::UnknownUnit {
            unit: sku.to_string(),
        })?;
        unit.lock().map_err(|_| StockError::LockPoisoned {
            unit: sku.to_string(),
        })
    }
}

impl Default for InventoryPool {
    fn default() -> Self {
        Self::new()
    }
}
