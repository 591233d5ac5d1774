//! Monthly totals and groupings over a set of billing records.
//!
//! Group keys are the raw stored strings: "Chennai" and "chennai " are two
//! different cities here.

use crate::models::{BillingRecord, Category, StatusTier};
use rust_decimal::Decimal;
use serde::Serialize;
use service_core::error::AppError;
use std::collections::BTreeMap;
use thiserror::Error;

/// A sum left the representable `Decimal` range. Only reachable through
/// stored documents written outside this service's amount limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Ledger amounts overflow when summed")]
pub struct AmountOverflow;

impl From<AmountOverflow> for AppError {
    fn from(err: AmountOverflow) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_billed: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_paid: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub outstanding: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CityCollection {
    #[serde(with = "rust_decimal::serde::float")]
    pub billed: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid: Decimal,
}

fn add(acc: Decimal, value: Decimal) -> Result<Decimal, AmountOverflow> {
    acc.checked_add(value).ok_or(AmountOverflow)
}

pub fn totals(records: &[BillingRecord]) -> Result<LedgerTotals, AmountOverflow> {
    let total_billed = records
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| add(acc, r.billed_amount))?;
    let total_paid = records
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| add(acc, r.paid_amount))?;
    Ok(LedgerTotals {
        total_billed,
        total_paid,
        outstanding: total_billed
            .checked_sub(total_paid)
            .ok_or(AmountOverflow)?,
    })
}

pub fn group_by_city(
    records: &[BillingRecord],
) -> Result<BTreeMap<String, CityCollection>, AmountOverflow> {
    let mut groups: BTreeMap<String, CityCollection> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.city.clone()).or_default();
        entry.billed = add(entry.billed, record.billed_amount)?;
        entry.paid = add(entry.paid, record.paid_amount)?;
    }
    Ok(groups)
}

pub fn group_by_category(
    records: &[BillingRecord],
) -> Result<BTreeMap<Category, Decimal>, AmountOverflow> {
    let mut groups: BTreeMap<Category, Decimal> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.category).or_default();
        *entry = add(*entry, record.billed_amount)?;
    }
    Ok(groups)
}

/// Number of records in each tier; every tier is present, possibly zero.
pub fn tier_counts(records: &[BillingRecord]) -> BTreeMap<StatusTier, usize> {
    let mut counts: BTreeMap<StatusTier, usize> =
        StatusTier::ALL.iter().map(|tier| (*tier, 0)).collect();
    for record in records {
        *counts.entry(record.status()).or_default() += 1;
    }
    counts
}

/// Highest debt first. The sort is stable, so ties keep store order.
pub fn sort_by_outstanding(records: &mut [BillingRecord]) {
    records.sort_by(|a, b| b.outstanding().cmp(&a.outstanding()));
}
