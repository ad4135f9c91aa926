use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two simplified gross-receipts schedules a service entity can be
/// taxed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Regime {
    #[serde(rename = "attachment_3")]
    Attachment3,
    #[serde(rename = "attachment_5")]
    Attachment5,
}

impl Regime {
    /// Evaluation order. Earlier entries win ties.
    pub const ALL: [Regime; 2] = [Regime::Attachment3, Regime::Attachment5];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attachment3 => "attachment_3",
            Self::Attachment5 => "attachment_5",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Attachment3 => "Attachment 3",
            Self::Attachment5 => "Attachment 5",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "attachment_3" | "3" => Some(Self::Attachment3),
            "attachment_5" | "5" => Some(Self::Attachment5),
            _ => None,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed set of taxes bundled into a regime's combined rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxComponent {
    /// Employer social-security contribution.
    Cpp,
    /// Municipal service tax.
    Iss,
    /// Social contribution on net profit.
    Csll,
    /// Corporate income tax.
    Irpj,
    /// Federal revenue contribution (COFINS).
    Cofins,
    /// Federal revenue contribution (PIS/PASEP).
    PisPasep,
}

impl TaxComponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpp => "cpp",
            Self::Iss => "iss",
            Self::Csll => "csll",
            Self::Irpj => "irpj",
            Self::Cofins => "cofins",
            Self::PisPasep => "pis_pasep",
        }
    }
}

impl fmt::Display for TaxComponent {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Components still charged when the service is exported. All others are
/// exempt for foreign clients.
pub const EXPORT_COMPONENTS: [TaxComponent; 3] =
    [TaxComponent::Cpp, TaxComponent::Csll, TaxComponent::Irpj];

/// One revenue tier of a regime schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeTaxRow {
    /// Nominal rate applied to gross receipts.
    pub combined_rate: Decimal,

    /// Annual amount subtracted from the nominal tax.
    pub fixed_deduction: Decimal,

    /// Share of the combined rate attributed to each component.
    pub component_rates: BTreeMap<TaxComponent, Decimal>,
}

impl RegimeTaxRow {
    /// Builds a row from component shares given in [`TaxComponent`]
    /// declaration order: cpp, iss, csll, irpj, cofins, pis/pasep.
    pub fn new(
        combined_rate: Decimal,
        fixed_deduction: Decimal,
        components: [Decimal; 6],
    ) -> Self {
        let [cpp, iss, csll, irpj, cofins, pis_pasep] = components;
        let component_rates = BTreeMap::from([
            (TaxComponent::Cpp, cpp),
            (TaxComponent::Iss, iss),
            (TaxComponent::Csll, csll),
            (TaxComponent::Irpj, irpj),
            (TaxComponent::Cofins, cofins),
            (TaxComponent::PisPasep, pis_pasep),
        ]);
        Self {
            combined_rate,
            fixed_deduction,
            component_rates,
        }
    }

    pub fn component_rate(
        &self,
        component: TaxComponent,
    ) -> Option<Decimal> {
        self.component_rates.get(&component).copied()
    }
}

/// Ordered regime rows, index-aligned with the trailing revenue table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegimeTable(Vec<RegimeTaxRow>);

impl RegimeTable {
    pub fn new(rows: Vec<RegimeTaxRow>) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[RegimeTaxRow] {
        &self.0
    }

    pub fn row(
        &self,
        index: usize,
    ) -> Option<&RegimeTaxRow> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn regime_parse_accepts_names_and_numbers() {
        assert_eq!(Regime::parse("attachment_3"), Some(Regime::Attachment3));
        assert_eq!(Regime::parse("5"), Some(Regime::Attachment5));
        assert_eq!(Regime::parse("attachment_4"), None);
    }

    #[test]
    fn regime_order_puts_attachment_3_first() {
        assert_eq!(Regime::ALL[0], Regime::Attachment3);
    }

    #[test]
    fn regime_row_new_maps_components_in_declaration_order() {
        let row = RegimeTaxRow::new(
            dec!(0.06),
            dec!(0),
            [dec!(0.434), dec!(0.335), dec!(0.035), dec!(0.04), dec!(0.128), dec!(0.0278)],
        );

        assert_eq!(row.component_rate(TaxComponent::Cpp), Some(dec!(0.434)));
        assert_eq!(row.component_rate(TaxComponent::Irpj), Some(dec!(0.04)));
        assert_eq!(row.component_rate(TaxComponent::PisPasep), Some(dec!(0.0278)));
    }
}
