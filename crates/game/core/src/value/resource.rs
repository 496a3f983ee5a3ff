//! Fungible resource currencies and the shared resource pool.
//!
//! The world owns exactly one [`ResourceBundle`]; effects are its only
//! writers. Subtraction below zero is an error, never a silent clamp — an
//! insufficient balance on a path that reaches the bundle means a missing
//! `ResourceAtLeast` requirement upstream.

use std::collections::BTreeMap;
use std::fmt;

/// Closed set of fungible currencies.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    Gold,
    Materials,
    Essence,
    Fame,
}

/// A single typed quantity, the unit effects and rewards are expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceUnit {
    pub kind: ResourceKind,
    pub amount: u64,
}

impl ResourceUnit {
    pub const fn new(kind: ResourceKind, amount: u64) -> Self {
        Self { kind, amount }
    }
}

impl fmt::Display for ResourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.kind)
    }
}

/// Errors raised by bundle arithmetic.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("insufficient {kind}: have {available}, need {required}")]
    Insufficient {
        kind: ResourceKind,
        available: u64,
        required: u64,
    },
}

/// Mapping from resource kind to a non-negative amount.
///
/// `add`/`subtract` return new bundles; the stored amounts are only ever
/// replaced wholesale by effect application. Absent kinds read as zero.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceBundle {
    amounts: BTreeMap<ResourceKind, u64>,
}

impl ResourceBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bundle from typed units, summing duplicates.
    pub fn from_units(units: impl IntoIterator<Item = ResourceUnit>) -> Self {
        let mut bundle = Self::new();
        for unit in units {
            *bundle.amounts.entry(unit.kind).or_insert(0) += unit.amount;
        }
        bundle
    }

    pub fn amount(&self, kind: ResourceKind) -> u64 {
        self.amounts.get(&kind).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.values().all(|amount| *amount == 0)
    }

    /// Iterates stored kinds with non-zero amounts in kind order.
    pub fn units(&self) -> impl Iterator<Item = ResourceUnit> + '_ {
        self.amounts
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .map(|(kind, amount)| ResourceUnit::new(*kind, *amount))
    }

    /// Returns a new bundle with `unit` added.
    #[must_use]
    pub fn add(&self, unit: ResourceUnit) -> ResourceBundle {
        let mut next = self.clone();
        *next.amounts.entry(unit.kind).or_insert(0) += unit.amount;
        next
    }

    /// Returns a new bundle with every unit of `other` added.
    #[must_use]
    pub fn add_all(&self, other: &ResourceBundle) -> ResourceBundle {
        other.units().fold(self.clone(), |acc, unit| acc.add(unit))
    }

    /// Returns a new bundle with `unit` removed.
    ///
    /// # Errors
    ///
    /// `ResourceError::Insufficient` if the subtraction would drive the
    /// stored amount negative. The bundle is left untouched in that case.
    pub fn subtract(&self, unit: ResourceUnit) -> Result<ResourceBundle, ResourceError> {
        let available = self.amount(unit.kind);
        let remaining =
            available
                .checked_sub(unit.amount)
                .ok_or(ResourceError::Insufficient {
                    kind: unit.kind,
                    available,
                    required: unit.amount,
                })?;
        let mut next = self.clone();
        next.amounts.insert(unit.kind, remaining);
        Ok(next)
    }

    /// Scales every amount by `factor`, flooring per resource kind.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> ResourceBundle {
        if factor <= 0.0 {
            return ResourceBundle::new();
        }
        let mut next = ResourceBundle::new();
        for unit in self.units() {
            let scaled = (unit.amount as f64 * factor).floor() as u64;
            if scaled > 0 {
                next.amounts.insert(unit.kind, scaled);
            }
        }
        next
    }
}

impl fmt::Display for ResourceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for unit in self.units() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{unit}")?;
            first = false;
        }
        if first {
            write!(f, "empty")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_returns_new_bundle() {
        let bundle = ResourceBundle::new();
        let credited = bundle.add(ResourceUnit::new(ResourceKind::Gold, 10));
        assert_eq!(bundle.amount(ResourceKind::Gold), 0);
        assert_eq!(credited.amount(ResourceKind::Gold), 10);
    }

    #[test]
    fn subtract_below_zero_is_an_error() {
        let bundle = ResourceBundle::from_units([ResourceUnit::new(ResourceKind::Gold, 5)]);
        let err = bundle
            .subtract(ResourceUnit::new(ResourceKind::Gold, 6))
            .unwrap_err();
        assert_eq!(
            err,
            ResourceError::Insufficient {
                kind: ResourceKind::Gold,
                available: 5,
                required: 6,
            }
        );
        // Untouched on failure.
        assert_eq!(bundle.amount(ResourceKind::Gold), 5);
    }

    #[test]
    fn subtract_missing_kind_is_an_error() {
        let bundle = ResourceBundle::new();
        assert!(
            bundle
                .subtract(ResourceUnit::new(ResourceKind::Essence, 1))
                .is_err()
        );
    }

    #[test]
    fn scaled_floors_per_kind() {
        let bundle = ResourceBundle::from_units([
            ResourceUnit::new(ResourceKind::Gold, 3),
            ResourceUnit::new(ResourceKind::Fame, 1),
        ]);
        let scaled = bundle.scaled(1.5);
        assert_eq!(scaled.amount(ResourceKind::Gold), 4);
        assert_eq!(scaled.amount(ResourceKind::Fame), 1);
        assert!(bundle.scaled(0.0).is_empty());
    }
}
