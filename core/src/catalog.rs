// core/src/catalog.rs

//! Robux packages on sale and the pricing curve for custom amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

pub const CUSTOM_MIN_ROBUX: u32 = 500;
pub const CUSTOM_MAX_ROBUX: u32 = 50_000;
pub const CUSTOM_STEP: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RobuxPackage {
  pub id: String,
  pub name: String,
  pub robux: u32,
  pub bonus: u32,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub popular: bool,
}

impl RobuxPackage {
  pub fn total_robux(&self) -> u32 {
    self.robux + self.bonus
  }

  /// Product label sent to the gateway, e.g. `"1800 Robux"`.
  pub fn product_name(&self) -> String {
    format!("{} Robux", self.total_robux())
  }
}

struct Tier {
  robux: u32,
  price_cents: i64,
  bonus: u32,
}

/// Fixed packages, ascending. Custom prices are interpolated between them.
static TIERS: [(&str, &str, Tier, bool); 5] = [
  ("pkg-500", "Starter", Tier { robux: 500, price_cents: 1990, bonus: 0 }, false),
  ("pkg-800", "Basic", Tier { robux: 800, price_cents: 2490, bonus: 0 }, false),
  ("pkg-1700", "Popular", Tier { robux: 1700, price_cents: 4990, bonus: 100 }, true),
  ("pkg-4500", "Premium", Tier { robux: 4500, price_cents: 12990, bonus: 300 }, false),
  ("pkg-10000", "Ultimate", Tier { robux: 10000, price_cents: 27990, bonus: 1000 }, false),
];

impl Tier {
  fn price(&self) -> Decimal {
    Decimal::new(self.price_cents, 2)
  }
}

pub fn packages() -> Vec<RobuxPackage> {
  TIERS
    .iter()
    .map(|(id, name, tier, popular)| RobuxPackage {
      id: (*id).to_string(),
      name: (*name).to_string(),
      robux: tier.robux,
      bonus: tier.bonus,
      price: tier.price(),
      popular: *popular,
    })
    .collect()
}

pub fn find_package(id: &str) -> Option<RobuxPackage> {
  packages().into_iter().find(|p| p.id == id)
}

/// Rounds to the nearest `CUSTOM_STEP` and clamps into the custom range.
pub fn normalize_custom_amount(requested: u32) -> u32 {
  let rounded = requested.saturating_add(CUSTOM_STEP / 2) / CUSTOM_STEP * CUSTOM_STEP;
  rounded.clamp(CUSTOM_MIN_ROBUX, CUSTOM_MAX_ROBUX)
}

/// Prices a custom amount on the tier curve.
pub fn custom_package(requested: u32) -> RobuxPackage {
  let robux = normalize_custom_amount(requested);
  RobuxPackage {
    id: format!("custom-{}", robux),
    name: "Personalizado".to_string(),
    robux,
    bonus: interpolate_bonus(robux),
    price: interpolate_price(robux).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    popular: false,
  }
}

fn surrounding_tiers(robux: u32) -> Option<(&'static Tier, &'static Tier)> {
  TIERS
    .windows(2)
    .map(|pair| (&pair[0].2, &pair[1].2))
    .find(|(lower, upper)| robux >= lower.robux && robux <= upper.robux)
}

fn interpolate_price(robux: u32) -> Decimal {
  if let Some((lower, upper)) = surrounding_tiers(robux) {
    let ratio = Decimal::from(robux - lower.robux) / Decimal::from(upper.robux - lower.robux);
    return lower.price() + ratio * (upper.price() - lower.price());
  }

  // Above the top tier the slope of the last two tiers continues.
  let (prev, last) = (&TIERS[TIERS.len() - 2].2, &TIERS[TIERS.len() - 1].2);
  let per_robux = (last.price() - prev.price()) / Decimal::from(last.robux - prev.robux);
  last.price() + Decimal::from(robux.saturating_sub(last.robux)) * per_robux
}

fn interpolate_bonus(robux: u32) -> u32 {
  if let Some((lower, upper)) = surrounding_tiers(robux) {
    return lower.bonus + (robux - lower.robux) * (upper.bonus - lower.bonus) / (upper.robux - lower.robux);
  }

  let last = &TIERS[TIERS.len() - 1].2;
  robux * last.bonus / last.robux
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn fixed_packages_total_base_plus_bonus() {
    let popular = find_package("pkg-1700").unwrap();
    assert!(popular.popular);
    assert_eq!(popular.total_robux(), 1800);
    assert_eq!(popular.product_name(), "1800 Robux");
    assert_eq!(popular.price, dec!(49.90));
    assert_eq!(packages().len(), 5);
  }

  #[test]
  fn custom_amounts_snap_to_step_and_range() {
    assert_eq!(normalize_custom_amount(0), 500);
    assert_eq!(normalize_custom_amount(1249), 1200);
    assert_eq!(normalize_custom_amount(1250), 1300);
    assert_eq!(normalize_custom_amount(999_999), 50_000);
  }

  #[test]
  fn custom_price_on_a_tier_matches_the_tier() {
    let pkg = custom_package(1700);
    assert_eq!(pkg.price, dec!(49.90));
    assert_eq!(pkg.bonus, 100);
    assert_eq!(pkg.id, "custom-1700");
  }

  #[test]
  fn custom_price_interpolates_between_tiers() {
    let pkg = custom_package(1200);
    assert_eq!(pkg.price, dec!(36.01));
    assert_eq!(pkg.bonus, 44);
  }

  #[test]
  fn custom_price_extrapolates_above_the_top_tier() {
    let pkg = custom_package(20_000);
    assert_eq!(pkg.price, dec!(552.63));
    assert_eq!(pkg.bonus, 2000);
  }
}
