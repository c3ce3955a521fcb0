//! Deterministic invoice totals.
//!
//! Totals are a pure function of the inputs and are recomputed from scratch
//! on every change; nothing here is cached or stored alongside the invoice.

use super::TotalsInput;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the tax rate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// One rate applied to the taxable base (installation and discount included).
    #[default]
    InvoiceRate,
    /// Each line item carries its own GST rate, applied to its line amount.
    PerItem,
}

/// How the round-off adjustment is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Use the signed round-off typed by the user.
    #[default]
    Manual,
    /// Derive the round-off that brings the total to the nearest whole unit.
    NearestWhole,
}

/// Tax and rounding configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TotalsPolicy {
    #[serde(default)]
    pub tax_mode: TaxMode,
    #[serde(default)]
    pub rounding: RoundingPolicy,
}

impl TotalsPolicy {
    pub fn new(tax_mode: TaxMode, rounding: RoundingPolicy) -> Self {
        Self { tax_mode, rounding }
    }
}

/// Tax aggregated over all amounts sharing one rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBucket {
    pub rate_percent: Decimal,
    /// Amount the rate was applied to.
    pub taxable: Decimal,
    pub tax: Decimal,
}

/// Totals breakdown. All values are exact; format only for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub installation: Decimal,
    pub discount: Decimal,
    /// `subtotal + installation - discount`.
    pub taxable_base: Decimal,
    pub tax_total: Decimal,
    /// Per-rate tax, ascending by rate.
    pub tax_breakdown: Vec<TaxBucket>,
    pub round_off: Decimal,
    /// `taxable_base + tax_total + round_off`.
    pub final_total: Decimal,
}

/// `a × b`, saturating at the representable range instead of panicking.
pub(super) fn mul_saturating(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or_else(|| {
        log::warn!("Amount overflow in {a} x {b}, saturating");
        a.saturating_mul(b)
    })
}

/// `a + b`, saturating at the representable range instead of panicking.
fn add_saturating(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        log::warn!("Amount overflow in {a} + {b}, saturating");
        a.saturating_add(b)
    })
}

fn sum_saturating(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, add_saturating)
}

fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    mul_saturating(amount, rate) / Decimal::ONE_HUNDRED
}

/// Compute the totals breakdown for `input` under `policy`.
///
/// Never fails: negative quantities, rates, charges and discounts count as
/// zero; only the manual round-off may be negative. Results beyond the
/// `Decimal` range saturate at `Decimal::MAX`/`Decimal::MIN`.
pub fn compute_totals(input: &TotalsInput, policy: &TotalsPolicy) -> Totals {
    let subtotal = sum_saturating(input.items.iter().map(|item| item.line_amount()));
    let installation = input.installation_charge.non_negative();
    let discount = input.discount.non_negative();
    let taxable_base = add_saturating(add_saturating(subtotal, installation), -discount);

    let tax_breakdown = match policy.tax_mode {
        TaxMode::InvoiceRate => {
            let rate = input.tax_percent.non_negative();
            vec![TaxBucket {
                rate_percent: rate.normalize(),
                taxable: taxable_base,
                tax: percent_of(taxable_base, rate),
            }]
        }
        TaxMode::PerItem => {
            let mut buckets: BTreeMap<Decimal, (Decimal, Decimal)> = BTreeMap::new();
            for item in &input.items {
                let rate = item.tax_rate_percent.non_negative().normalize();
                let amount = item.line_amount();
                let entry = buckets.entry(rate).or_default();
                entry.0 = add_saturating(entry.0, amount);
                entry.1 = add_saturating(entry.1, percent_of(amount, rate));
            }
            buckets
                .into_iter()
                .map(|(rate_percent, (taxable, tax))| TaxBucket {
                    rate_percent,
                    taxable,
                    tax,
                })
                .collect()
        }
    };
    let tax_total = sum_saturating(tax_breakdown.iter().map(|bucket| bucket.tax));

    let raw_total = add_saturating(taxable_base, tax_total);
    let round_off = match policy.rounding {
        RoundingPolicy::Manual => input.round_off.value(),
        RoundingPolicy::NearestWhole => {
            let whole = raw_total.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            add_saturating(whole, -raw_total)
        }
    };

    Totals {
        subtotal,
        installation,
        discount,
        taxable_base,
        tax_total,
        tax_breakdown,
        round_off,
        final_total: add_saturating(raw_total, round_off),
    }
}
