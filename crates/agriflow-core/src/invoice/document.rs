//! The quotation / tax invoice document being edited.

use super::{ItemField, LineItem, Totals, TotalsInput, TotalsPolicy, compute_totals};
use serde::{Deserialize, Serialize};

/// Which document is produced from the invoice data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentVariant {
    #[default]
    Quotation,
    TaxInvoice,
}

impl DocumentVariant {
    /// Heading printed at the top of the document.
    pub fn title(self) -> &'static str {
        match self {
            DocumentVariant::Quotation => "QUOTATION",
            DocumentVariant::TaxInvoice => "TAX INVOICE",
        }
    }

    /// Short name used in export filenames.
    pub fn slug(self) -> &'static str {
        match self {
            DocumentVariant::Quotation => "quotation",
            DocumentVariant::TaxInvoice => "taxinvoice",
        }
    }
}

/// Shop letterhead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopHeader {
    pub title: String,
    pub address: String,
    pub distributor: String,
    pub mobile: String,
    pub gstin: String,
}

impl Default for ShopHeader {
    fn default() -> Self {
        Self {
            title: "Gunwant Krushi Seva Kendra".to_string(),
            address: "Itkur, Tq. Kalamb, Dist. Dharashiv".to_string(),
            distributor: "Finolex Plasson Ind. Pvt. Ltd.".to_string(),
            mobile: "8975757606".to_string(),
            gstin: "27AOBPA0712N1ZB".to_string(),
        }
    }
}

/// Unit of the farm area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AreaUnit {
    #[default]
    #[serde(rename = "R")]
    R,
    #[serde(rename = "HA")]
    Ha,
    #[serde(rename = "R/HA")]
    RHa,
}

impl AreaUnit {
    pub fn label(self) -> &'static str {
        match self {
            AreaUnit::R => "R",
            AreaUnit::Ha => "HA",
            AreaUnit::RHa => "R/HA",
        }
    }
}

/// A user-labelled free-text field. Printed only when both parts are filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraField {
    pub label: String,
    pub value: String,
}

impl ExtraField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn is_printable(&self) -> bool {
        !self.label.trim().is_empty() && !self.value.trim().is_empty()
    }
}

/// Invoice number, date and party details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceDetails {
    pub number: String,
    /// Free text, `dd/mm/yyyy` by convention.
    pub date: String,
    pub farmer_name: String,
    pub village: String,
    pub crop: String,
    pub spacing: String,
    pub survey_no: String,
    pub area_value: String,
    pub area_unit: AreaUnit,
    pub extra: [ExtraField; 2],
}

impl Default for InvoiceDetails {
    fn default() -> Self {
        Self {
            number: "113".to_string(),
            date: String::new(),
            farmer_name: String::new(),
            village: String::new(),
            crop: String::new(),
            spacing: "12 m X 12 m".to_string(),
            survey_no: String::new(),
            area_value: String::new(),
            area_unit: AreaUnit::R,
            extra: [ExtraField::new("Application ID", ""), ExtraField::default()],
        }
    }
}

/// Everything printed on a quotation or tax invoice.
///
/// Totals are not stored; call [`InvoiceDocument::totals`] whenever they are
/// needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceDocument {
    pub variant: DocumentVariant,
    pub header: ShopHeader,
    pub details: InvoiceDetails,
    pub totals_input: TotalsInput,
}

impl Default for InvoiceDocument {
    fn default() -> Self {
        Self {
            variant: DocumentVariant::Quotation,
            header: ShopHeader::default(),
            details: InvoiceDetails::default(),
            totals_input: TotalsInput {
                items: vec![
                    LineItem::new("Sprinkler Pipe", "Finolex 3/4\"", 30, 659),
                    LineItem::new("Nozzle / Sprinkler", "Gun Metal", 8, 746),
                ]
                .into(),
                ..TotalsInput::default()
            },
        }
    }
}

impl InvoiceDocument {
    /// An empty document: no items, default header and details.
    pub fn empty() -> Self {
        Self {
            totals_input: TotalsInput::default(),
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[LineItem] {
        self.totals_input.items.as_slice()
    }

    /// Append a row and return its index.
    pub fn add_item(&mut self, item: LineItem) -> usize {
        self.totals_input.items = self.totals_input.items.append(item);
        self.totals_input.items.len() - 1
    }

    /// Remove the row at `index`. Out-of-range indices are ignored.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        let removed = self.totals_input.items.get(index).cloned();
        match self.totals_input.items.remove(index) {
            Some(items) => self.totals_input.items = items,
            None => log::warn!("Ignoring removal of missing item {index}"),
        }
        removed
    }

    /// Edit one field of the row at `index`. Returns `false` if there is no such row.
    pub fn update_item(&mut self, index: usize, field: ItemField, value: &str) -> bool {
        match self.totals_input.items.with_field(index, field, value) {
            Some(items) => {
                self.totals_input.items = items;
                true
            }
            None => false,
        }
    }

    /// Recompute totals from the current inputs.
    pub fn totals(&self, policy: &TotalsPolicy) -> Totals {
        compute_totals(&self.totals_input, policy)
    }

    /// A copy of this document with a different variant.
    pub fn with_variant(&self, variant: DocumentVariant) -> Self {
        Self {
            variant,
            ..self.clone()
        }
    }

    /// Storage key for this document, derived from its number.
    pub fn storage_key(&self) -> String {
        crate::storage::invoice_key(&self.details.number)
    }
}
