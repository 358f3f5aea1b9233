//! Per-plan layout tunables with a global fallback
//!
//! The pagination heuristic is driven by a handful of magic numbers that vary
//! between plans. A store holds one global default record and any number of
//! plan overrides; resolution overlays the plan's set fields on the default,
//! field by field.

use crate::Result;
use crate::error::LayoutError;
use crate::grid::WidthTable;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace, warn};

/// Tenant key of a plan
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(String);

impl PlanId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of one tunable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKey {
    MaxColumns,
    ApproximateCharsPerLine,
    ApproximateLinesPerPage,
    MinSplitChars,
    WidthNeeded,
}

impl VariableKey {
    pub const ALL: [VariableKey; 5] = [
        VariableKey::MaxColumns,
        VariableKey::ApproximateCharsPerLine,
        VariableKey::ApproximateLinesPerPage,
        VariableKey::MinSplitChars,
        VariableKey::WidthNeeded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKey::MaxColumns => "max_columns",
            VariableKey::ApproximateCharsPerLine => "approximate_chars_per_line",
            VariableKey::ApproximateLinesPerPage => "approximate_lines_per_page",
            VariableKey::MinSplitChars => "min_split_chars",
            VariableKey::WidthNeeded => "width_needed",
        }
    }
}

impl FromStr for VariableKey {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        VariableKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| LayoutError::UnsupportedVariable(s.to_string()))
    }
}

/// One customization record; every field may be unset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutValues {
    pub max_columns: Option<i64>,
    pub approximate_chars_per_line: Option<i64>,
    pub approximate_lines_per_page: Option<i64>,
    pub min_split_chars: Option<i64>,
    /// Pairs of `[char count threshold | null, width in columns]`. 4 columns is
    /// the full page width, 2 is half of it.
    pub width_needed: Option<Value>,
}

impl LayoutValues {
    /// Read a field as JSON
    pub fn get(&self, key: VariableKey) -> Option<Value> {
        match key {
            VariableKey::MaxColumns => self.max_columns.map(Value::from),
            VariableKey::ApproximateCharsPerLine => self.approximate_chars_per_line.map(Value::from),
            VariableKey::ApproximateLinesPerPage => self.approximate_lines_per_page.map(Value::from),
            VariableKey::MinSplitChars => self.min_split_chars.map(Value::from),
            VariableKey::WidthNeeded => self.width_needed.clone(),
        }
    }

    /// Write a field from JSON; `null` clears it
    pub fn set(&mut self, key: VariableKey, value: Value) -> Result<()> {
        let invalid = |reason: &str| LayoutError::InvalidVariableValue {
            key: key.as_str().to_string(),
            reason: reason.to_string(),
        };

        let slot = match key {
            VariableKey::MaxColumns => &mut self.max_columns,
            VariableKey::ApproximateCharsPerLine => &mut self.approximate_chars_per_line,
            VariableKey::ApproximateLinesPerPage => &mut self.approximate_lines_per_page,
            VariableKey::MinSplitChars => &mut self.min_split_chars,
            VariableKey::WidthNeeded => {
                self.width_needed = match value {
                    Value::Null => None,
                    Value::Array(_) => Some(value),
                    _ => return Err(invalid("expected a list of [chars, columns] pairs")),
                };
                return Ok(());
            }
        };
        *slot = match value {
            Value::Null => None,
            Value::Number(ref n) => Some(n.as_i64().ok_or_else(|| invalid("expected an integer"))?),
            _ => return Err(invalid("expected an integer")),
        };
        Ok(())
    }

    /// Overlay the set fields of `other` onto a copy of `self`.
    ///
    /// A field counts as set when it is present and non-zero (or a non-empty
    /// list), so an override of `0` falls back to the default. Records loaded
    /// with `from_json` are not shape-checked, so a malformed override field
    /// is an error here.
    pub fn overlay(&self, other: &LayoutValues) -> Result<LayoutValues> {
        let mut merged = self.clone();
        for key in VariableKey::ALL {
            if let Some(value) = other.get(key).filter(is_set) {
                trace!("Overriding {} with {}", key.as_str(), value);
                merged.set(key, value)?;
            }
        }
        Ok(merged)
    }

    /// Check every tunable needed by the pagination pass
    pub fn validate(&self) -> Result<LayoutParams> {
        let positive = |key: VariableKey, value: Option<i64>| -> Result<usize> {
            match value {
                Some(v) if v > 0 => Ok(v as usize),
                Some(v) => Err(LayoutError::InvalidCustomization(format!(
                    "{} must be positive, got {}",
                    key.as_str(),
                    v
                ))),
                None => Err(LayoutError::InvalidCustomization(format!(
                    "{} is not set",
                    key.as_str()
                ))),
            }
        };

        let max_columns = positive(VariableKey::MaxColumns, self.max_columns)?;
        if u16::try_from(max_columns).is_err() {
            return Err(LayoutError::InvalidCustomization(format!(
                "max_columns must be at most {}, got {}",
                u16::MAX,
                max_columns
            )));
        }
        let approximate_chars_per_line = positive(
            VariableKey::ApproximateCharsPerLine,
            self.approximate_chars_per_line,
        )?;
        let approximate_lines_per_page = positive(
            VariableKey::ApproximateLinesPerPage,
            self.approximate_lines_per_page,
        )?;
        let min_split_chars = match self.min_split_chars {
            Some(v) if v >= 0 => v as usize,
            Some(v) => {
                return Err(LayoutError::InvalidCustomization(format!(
                    "min_split_chars must not be negative, got {v}"
                )));
            }
            None => {
                return Err(LayoutError::InvalidCustomization(
                    "min_split_chars is not set".to_string(),
                ));
            }
        };
        let width_needed = match &self.width_needed {
            Some(value) => WidthTable::from_json(value, max_columns)?,
            None => {
                return Err(LayoutError::InvalidCustomization(
                    "width_needed is not set".to_string(),
                ));
            }
        };

        Ok(LayoutParams {
            max_columns,
            approximate_chars_per_line,
            approximate_lines_per_page,
            min_split_chars,
            width_needed,
        })
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Fully resolved and checked tunables
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub max_columns: usize,
    pub approximate_chars_per_line: usize,
    pub approximate_lines_per_page: usize,
    pub min_split_chars: usize,
    pub width_needed: WidthTable,
}

/// A stored customization record
#[derive(Debug, Clone, PartialEq)]
pub enum Customization {
    /// Global fallback used for every plan
    Default(LayoutValues),
    /// Partial values for one plan
    TenantOverride { plan: PlanId, values: LayoutValues },
}

#[derive(Debug, Deserialize)]
struct CustomizationRecord {
    #[serde(default)]
    plan: Option<PlanId>,
    #[serde(flatten)]
    values: LayoutValues,
}

impl From<CustomizationRecord> for Customization {
    fn from(record: CustomizationRecord) -> Self {
        match record.plan {
            Some(plan) => Customization::TenantOverride {
                plan,
                values: record.values,
            },
            None => Customization::Default(record.values),
        }
    }
}

/// All customization records, keyed by plan
#[derive(Debug, Clone, Default)]
pub struct CustomizationStore {
    default: Option<LayoutValues>,
    overrides: HashMap<PlanId, LayoutValues>,
}

impl CustomizationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records; a later default replaces an earlier one
    pub fn from_records(records: impl IntoIterator<Item = Customization>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Load records from a JSON list like
    /// `[{"plan": null, "max_columns": 4, ...}, {"plan": "helsinki", ...}]`
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<CustomizationRecord> = serde_json::from_str(json)?;
        debug!("Loaded {} layout customization records", records.len());
        Ok(Self::from_records(records.into_iter().map(Customization::from)))
    }

    /// Insert or replace a record
    pub fn insert(&mut self, record: Customization) {
        match record {
            Customization::Default(values) => {
                if self.default.replace(values).is_some() {
                    warn!("Replacing existing global default layout customization");
                }
            }
            Customization::TenantOverride { plan, values } => {
                self.overrides.insert(plan, values);
            }
        }
    }

    /// The global default record, if any
    pub fn default_values(&self) -> Option<&LayoutValues> {
        self.default.as_ref()
    }

    /// The override record of a plan, if any
    pub fn plan_values(&self, plan: &PlanId) -> Option<&LayoutValues> {
        self.overrides.get(plan)
    }

    /// Effective values for a plan; `None` resolves to the global default
    pub fn resolve(&self, plan: Option<&PlanId>) -> Result<LayoutValues> {
        let fallback = self.default.as_ref().ok_or(LayoutError::MissingDefault)?;
        match plan.and_then(|p| self.overrides.get(p)) {
            Some(values) => fallback.overlay(values),
            None => Ok(fallback.clone()),
        }
    }

    /// Effective value of one tunable for a plan
    pub fn get_plan_variable_with_fallback(
        &self,
        plan: Option<&PlanId>,
        key: &str,
    ) -> Result<Option<Value>> {
        let key: VariableKey = key.parse()?;
        Ok(self.resolve(plan)?.get(key))
    }

    /// Set one tunable on a plan's override record, creating it if needed
    pub fn save_plan_variable(
        &mut self,
        plan: &PlanId,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<&LayoutValues> {
        let key: VariableKey = key.parse()?;
        let mut values = self.overrides.get(plan).cloned().unwrap_or_default();
        values.set(key, value.into())?;
        debug!("Saved {} for plan {}", key.as_str(), plan);
        self.overrides.insert(plan.clone(), values);
        Ok(&self.overrides[plan])
    }

    /// Set many tunables at once on a plan's record or, with `None`, on the
    /// global default. Nothing is written if any key or value is invalid.
    pub fn save_plan_variables(
        &mut self,
        plan: Option<&PlanId>,
        variables: &Map<String, Value>,
    ) -> Result<()> {
        let current = match plan {
            Some(p) => self.overrides.get(p),
            None => self.default.as_ref(),
        };
        let mut values = current.cloned().unwrap_or_default();
        for (key, value) in variables {
            values.set(key.parse()?, value.clone())?;
        }
        match plan {
            Some(p) => {
                self.overrides.insert(p.clone(), values);
            }
            None => self.default = Some(values),
        }
        Ok(())
    }
}
