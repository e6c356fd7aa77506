//! Explicit dependency graph between input fields and derived amounts.
//!
//! A [`FieldChange`] marks every derived field that depends on it, directly or
//! through another derived field, as dirty. The service then recomputes dirty
//! fields eagerly or on the next read, depending on [`RecomputePolicy`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Input fields whose modification invalidates derived amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldChange {
    LineQuantity,
    LineUnitPrice,
    LineDiscount,
    LineTaxes,
    /// A line was added or removed
    LineMembership,
    Pricelist,
    Template,
    TemplateInterval,
    TemplateUnit,
}

/// Amounts computed from other fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedField {
    LineSubtotal,
    LineTaxAmount,
    RecurringTotal,
    RecurringTax,
    RecurringAmountTotal,
    RecurringMonthly,
}

/// Something a derived field reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Input(FieldChange),
    Derived(DerivedField),
}

use Dependency::{Derived, Input};

impl DerivedField {
    /// Topological order: every field comes after the fields it reads.
    pub const ALL: [DerivedField; 6] = [
        DerivedField::LineSubtotal,
        DerivedField::LineTaxAmount,
        DerivedField::RecurringTotal,
        DerivedField::RecurringTax,
        DerivedField::RecurringAmountTotal,
        DerivedField::RecurringMonthly,
    ];

    pub fn dependencies(self) -> &'static [Dependency] {
        match self {
            DerivedField::LineSubtotal => &[
                Input(FieldChange::LineQuantity),
                Input(FieldChange::LineUnitPrice),
                Input(FieldChange::LineDiscount),
                Input(FieldChange::LineTaxes),
                Input(FieldChange::Pricelist),
            ],
            DerivedField::LineTaxAmount => &[
                Input(FieldChange::LineQuantity),
                Input(FieldChange::LineUnitPrice),
                Input(FieldChange::LineDiscount),
                Input(FieldChange::LineTaxes),
                Input(FieldChange::Pricelist),
            ],
            DerivedField::RecurringTotal => &[
                Input(FieldChange::LineMembership),
                Input(FieldChange::LineQuantity),
                Derived(DerivedField::LineSubtotal),
            ],
            DerivedField::RecurringTax => &[
                Input(FieldChange::LineMembership),
                Derived(DerivedField::LineTaxAmount),
                Derived(DerivedField::RecurringTotal),
            ],
            DerivedField::RecurringAmountTotal => &[
                Input(FieldChange::LineMembership),
                Derived(DerivedField::RecurringTotal),
                Derived(DerivedField::RecurringTax),
            ],
            DerivedField::RecurringMonthly => &[
                Derived(DerivedField::RecurringTotal),
                Input(FieldChange::Template),
                Input(FieldChange::TemplateInterval),
                Input(FieldChange::TemplateUnit),
            ],
        }
    }

    pub fn is_line_level(self) -> bool {
        matches!(self, DerivedField::LineSubtotal | DerivedField::LineTaxAmount)
    }
}

/// When dirty fields are recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecomputePolicy {
    /// Right after the change is applied
    #[default]
    Eager,
    /// On the next read through the service
    Lazy,
}

/// Set of derived fields awaiting recomputation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtySet {
    fields: BTreeSet<DerivedField>,
}

impl DirtySet {
    /// A set with every derived field marked, used for fresh records.
    pub fn all() -> Self {
        Self {
            fields: DerivedField::ALL.into_iter().collect(),
        }
    }

    /// Marks every field reachable from `change`.
    pub fn mark(&mut self, change: FieldChange) {
        for field in DerivedField::ALL {
            let affected = field.dependencies().iter().any(|dep| match dep {
                Input(input) => *input == change,
                Derived(derived) => self.fields.contains(derived),
            });
            if affected {
                self.fields.insert(field);
            }
        }
    }

    pub fn contains(&self, field: DerivedField) -> bool {
        self.fields.contains(&field)
    }

    pub fn is_clean(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn needs_line_pass(&self) -> bool {
        self.fields.iter().any(|f| f.is_line_level())
    }

    pub fn needs_totals_pass(&self) -> bool {
        self.contains(DerivedField::RecurringTotal)
            || self.contains(DerivedField::RecurringTax)
            || self.contains(DerivedField::RecurringAmountTotal)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = DerivedField> + '_ {
        self.fields.iter().copied()
    }
}
