//! Energy supplier assignments over time

use crate::domain::rules::ValidationError;
use crate::domain::values::{EffectiveDate, GlnNumber};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnergySupplierDetails {
    pub start_of_supply: EffectiveDate,
    pub gln: GlnNumber,
}

impl EnergySupplierDetails {
    pub fn new(start_of_supply: EffectiveDate, gln: GlnNumber) -> Self {
        Self {
            start_of_supply,
            gln,
        }
    }
}

/// Supplier assignments ordered by start of supply. An assignment holds
/// until the next one starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnergySuppliers {
    entries: Vec<EnergySupplierDetails>,
}

impl EnergySuppliers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, details: EnergySupplierDetails) -> Result<(), ValidationError> {
        match self
            .entries
            .binary_search_by(|e| e.start_of_supply.cmp(&details.start_of_supply))
        {
            Ok(_) => Err(ValidationError::DuplicateEnergySupplierStart(
                details.start_of_supply.to_string(),
            )),
            Err(pos) => {
                self.entries.insert(pos, details);
                Ok(())
            }
        }
    }

    /// The supplier responsible at `date`.
    pub fn current_at(&self, date: EffectiveDate) -> Option<&EnergySupplierDetails> {
        self.entries
            .iter()
            .take_while(|e| e.start_of_supply <= date)
            .last()
    }

    /// Assignments starting after `date`.
    pub fn future_at(&self, date: EffectiveDate) -> impl Iterator<Item = &EnergySupplierDetails> {
        self.entries
            .iter()
            .skip_while(move |e| e.start_of_supply <= date)
    }

    pub fn has_supplier_at(&self, date: EffectiveDate) -> bool {
        self.current_at(date).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnergySupplierDetails> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<EnergySupplierDetails>> for EnergySuppliers {
    type Error = ValidationError;

    /// Builds from stored rows; two rows with the same start are an error.
    fn try_from(entries: Vec<EnergySupplierDetails>) -> Result<Self, Self::Error> {
        let mut suppliers = Self::new();
        for details in entries {
            suppliers.add(details)?;
        }
        Ok(suppliers)
    }
}
