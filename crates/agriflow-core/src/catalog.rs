//! Item catalog: products with company and shop rates.
//!
//! Line items can be filled from catalog entries; the catalog is persisted
//! under [`CATALOG_KEY`](crate::storage::CATALOG_KEY).

use crate::invoice::Amount;
use crate::storage::{self, CATALOG_KEY, Storage, StorageError};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Categories and the subcategories offered for each, in display order.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    ("PVC Pipe", &["63 mm 4 kg", "75 mm 4 kg", "90 mm 4 kg", "63 mm 6 kg", "75 mm 6 kg"]),
    ("Lateral", &["20-4-40", "20-2-40", "Plain lateral (class 2)", "Regular lateral"]),
    ("Online Dripper", &["8 LPH", "16 LPH", "4 LPH"]),
    ("Inline Dripper", &["Finodrip", "Finogol", "Plain inline"]),
    ("Filter", &["Screen (63mm)", "Screen (75mm)", "Screen (90mm)", "Disc", "Sand"]),
    ("Valve", &["Control Valve 63mm", "Control Valve 75mm", "Flush Valve 63mm"]),
    ("Accessories", &["Take-up 16mm", "Grommet 16mm", "Joiner 16mm", "End cap 16mm"]),
    ("Fertilizer Unit", &["Venturi 1\"", "Venturi 1.5\"", "Tank 1\"", "Tank 2\""]),
    ("Other", &["Misc"]),
];

/// GST rates a catalog item may carry, in percent.
pub const GST_RATES: [u32; 4] = [0, 5, 12, 18];

/// Subcategories of `category`, or `None` for an unknown category.
pub fn subcategories(category: &str) -> Option<&'static [&'static str]> {
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, subs)| *subs)
}

/// Catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Item name and category are required")]
    MissingNameOrCategory,
    #[error("Company rate must be a number: {0:?}")]
    InvalidCompanyRate(String),
    #[error("Shop rate is required and must be a number: {0:?}")]
    InvalidShopRate(String),
    #[error("GST must be one of 0, 5, 12 or 18: {0:?}")]
    InvalidGst(String),
    #[error("No catalog item at index {0}")]
    NoSuchItem(usize),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// A product the shop sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub size: String,
    /// Company / government rate, if known.
    #[serde(
        default,
        alias = "companyRate",
        deserialize_with = "deserialize_optional_rate",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_rate: Option<Amount>,
    /// Our selling rate.
    #[serde(default, alias = "shopRate")]
    pub shop_rate: Amount,
    #[serde(default, alias = "gst")]
    pub gst_percent: Amount,
}

fn deserialize_optional_rate<'de, D>(deserializer: D) -> Result<Option<Amount>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(other) => Some(serde_json::from_value(other).unwrap_or_default()),
    })
}

impl CatalogItem {
    /// Description used when the item is put on an invoice.
    pub fn label(&self) -> String {
        let sub = self.subcategory.trim();
        if sub.is_empty() || self.name.contains(sub) {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, sub)
        }
    }
}

/// Rates are kept with exactly two decimals.
fn normalize_rate(value: Decimal) -> Amount {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    Amount::new(rounded)
}

/// Text entered in the catalog editor, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogForm {
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub size: String,
    pub company_rate: String,
    pub shop_rate: String,
    pub gst: String,
}

impl Default for CatalogForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            subcategory: String::new(),
            size: String::new(),
            company_rate: String::new(),
            shop_rate: String::new(),
            gst: "5".to_string(),
        }
    }
}

impl CatalogForm {
    /// Pre-fill the form for editing an existing item.
    pub fn from_item(item: &CatalogItem) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            subcategory: item.subcategory.clone(),
            size: item.size.clone(),
            company_rate: item.company_rate.map(|r| r.value().to_string()).unwrap_or_default(),
            shop_rate: item.shop_rate.value().to_string(),
            gst: item.gst_percent.to_string(),
        }
    }

    /// Change the category, clearing a subcategory that does not belong to it.
    pub fn set_category(&mut self, category: &str) {
        self.category = category.to_string();
        let keep = subcategories(category).is_some_and(|subs| subs.contains(&self.subcategory.as_str()));
        if !keep {
            self.subcategory.clear();
        }
    }

    /// Check the form and produce a catalog item with a fresh id.
    pub fn validate(&self) -> CatalogResult<CatalogItem> {
        let name = self.name.trim();
        let category = self.category.trim();
        if name.is_empty() || category.is_empty() {
            return Err(CatalogError::MissingNameOrCategory);
        }

        let company = self.company_rate.trim();
        let company_rate = if company.is_empty() {
            None
        } else {
            let value = Decimal::from_str(company)
                .map_err(|_| CatalogError::InvalidCompanyRate(company.to_string()))?;
            Some(normalize_rate(value))
        };

        let shop = self.shop_rate.trim();
        let shop_rate = Decimal::from_str(shop)
            .map(normalize_rate)
            .map_err(|_| CatalogError::InvalidShopRate(shop.to_string()))?;

        let gst = self.gst.trim();
        let gst_percent = gst
            .parse::<u32>()
            .ok()
            .filter(|rate| GST_RATES.contains(rate))
            .map(|rate| Amount::from(Decimal::from(rate)))
            .ok_or_else(|| CatalogError::InvalidGst(gst.to_string()))?;

        Ok(CatalogItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.to_string(),
            subcategory: self.subcategory.trim().to_string(),
            size: self.size.trim().to_string(),
            company_rate,
            shop_rate,
            gst_percent,
        })
    }
}

/// Sample entries offered by "import sample".
pub fn sample_catalog() -> Vec<CatalogItem> {
    let sample = |name: &str, category: &str, sub: &str, size: &str, company: i64, shop: i64| {
        CatalogItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.to_string(),
            subcategory: sub.to_string(),
            size: size.to_string(),
            company_rate: Some(normalize_rate(Decimal::new(company, 2))),
            shop_rate: normalize_rate(Decimal::new(shop, 2)),
            gst_percent: Amount::from(5),
        }
    };
    vec![
        sample("Finodrip", "Inline Dripper", "Finodrip", "20-4-40", 1000, 1100),
        sample("Finogol", "Inline Dripper", "Finogol", "20-4-40", 1050, 1140),
        sample("Finolex Pipe 75 mm 4 kg", "PVC Pipe", "75 mm 4 kg", "75 mm 4 kg", 38000, 40000),
    ]
}

/// The shop's item catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    /// Validate `form` and append the resulting item.
    pub fn add(&mut self, form: &CatalogForm) -> CatalogResult<&CatalogItem> {
        let item = form.validate()?;
        log::debug!("Adding catalog item {}", item.name);
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Validate `form` and replace the item at `index`, keeping its id.
    pub fn update(&mut self, index: usize, form: &CatalogForm) -> CatalogResult<&CatalogItem> {
        let mut item = form.validate()?;
        let slot = self.items.get_mut(index).ok_or(CatalogError::NoSuchItem(index))?;
        item.id = slot.id;
        *slot = item;
        Ok(&*slot)
    }

    pub fn remove(&mut self, index: usize) -> CatalogResult<CatalogItem> {
        if index >= self.items.len() {
            return Err(CatalogError::NoSuchItem(index));
        }
        Ok(self.items.remove(index))
    }

    /// Append the sample entries.
    pub fn import_sample(&mut self) {
        self.items.extend(sample_catalog());
    }

    /// Load the stored catalog. Nothing stored gives an empty catalog.
    pub async fn load(storage: &dyn Storage) -> Self {
        let catalog: Catalog = storage::load_or_default(storage, CATALOG_KEY).await;
        log::info!("Loaded catalog with {} items", catalog.len());
        catalog
    }

    pub async fn save(&self, storage: &dyn Storage) -> CatalogResult<()> {
        storage::save_json(storage, CATALOG_KEY, self).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::LineItem;
    use crate::storage::MemoryStorage;
    use pollster::block_on;
    use serde_json::json;

    fn pipe_form() -> CatalogForm {
        CatalogForm {
            name: "Finolex Pipe".to_string(),
            category: "PVC Pipe".to_string(),
            subcategory: "63 mm 4 kg".to_string(),
            shop_rate: "380".to_string(),
            ..CatalogForm::default()
        }
    }

    #[test]
    fn test_validate_requires_name_and_category() {
        let mut form = pipe_form();
        form.name = "  ".to_string();
        assert!(matches!(form.validate(), Err(CatalogError::MissingNameOrCategory)));
        let mut form = pipe_form();
        form.category.clear();
        assert!(matches!(form.validate(), Err(CatalogError::MissingNameOrCategory)));
    }

    #[test]
    fn test_validate_rates() {
        let mut form = pipe_form();
        form.shop_rate.clear();
        assert!(matches!(form.validate(), Err(CatalogError::InvalidShopRate(_))));
        form.shop_rate = "abc".to_string();
        assert!(matches!(form.validate(), Err(CatalogError::InvalidShopRate(_))));

        let mut form = pipe_form();
        form.company_rate = "x1".to_string();
        assert!(matches!(form.validate(), Err(CatalogError::InvalidCompanyRate(_))));

        let mut form = pipe_form();
        form.gst = "7".to_string();
        assert!(matches!(form.validate(), Err(CatalogError::InvalidGst(_))));
    }

    #[test]
    fn test_rates_normalized_to_two_decimals() {
        let mut form = pipe_form();
        form.company_rate = "360.456".to_string();
        let item = form.validate().unwrap();
        assert_eq!(item.shop_rate.value().to_string(), "380.00");
        assert_eq!(item.company_rate.unwrap().value().to_string(), "360.46");
        assert_eq!(item.gst_percent, Amount::from(5));
    }

    #[test]
    fn test_set_category_clears_foreign_subcategory() {
        let mut form = pipe_form();
        form.set_category("PVC Pipe");
        assert_eq!(form.subcategory, "63 mm 4 kg");
        form.set_category("Filter");
        assert_eq!(form.subcategory, "");
        form.subcategory = "Disc".to_string();
        form.set_category("Unknown");
        assert_eq!(form.subcategory, "");
    }

    #[test]
    fn test_add_update_remove() {
        let mut catalog = Catalog::new();
        let id = catalog.add(&pipe_form()).unwrap().id;

        let mut form = CatalogForm::from_item(catalog.get(0).unwrap());
        form.shop_rate = "400".to_string();
        let updated = catalog.update(0, &form).unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.shop_rate.value(), Decimal::from(400));

        assert!(matches!(catalog.update(5, &form), Err(CatalogError::NoSuchItem(5))));
        assert!(matches!(catalog.remove(5), Err(CatalogError::NoSuchItem(5))));
        catalog.remove(0).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_import_sample_appends() {
        let mut catalog = Catalog::new();
        catalog.add(&pipe_form()).unwrap();
        catalog.import_sample();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get(1).unwrap().name, "Finodrip");
        assert_eq!(catalog.get(3).unwrap().shop_rate.value().to_string(), "400.00");
    }

    #[test]
    fn test_line_item_from_catalog() {
        let item = sample_catalog().remove(1);
        let line = LineItem::from_catalog(&item);
        assert_eq!(line.description, "Finogol");
        assert_eq!(line.size_label, "20-4-40");
        assert_eq!(line.line_amount(), Decimal::new(1140, 2));
        assert_eq!(line.tax_rate_percent, Amount::from(5));
        assert_eq!(line.catalog_id, Some(item.id));
    }

    #[test]
    fn test_reads_legacy_entries() {
        let catalog: Catalog = serde_json::from_value(json!([{
            "name": "Finodrip",
            "category": "Inline Dripper",
            "subcategory": "Finodrip",
            "size": "20-4-40",
            "companyRate": "",
            "shopRate": "11.00",
            "gst": "5"
        }]))
        .unwrap();
        let item = catalog.get(0).unwrap();
        assert_eq!(item.company_rate, None);
        assert_eq!(item.shop_rate.value(), Decimal::new(1100, 2));
        assert_eq!(item.gst_percent.value(), Decimal::from(5));
    }

    #[test]
    fn test_persistence() {
        let storage = MemoryStorage::new();
        assert!(block_on(Catalog::load(&storage)).is_empty());

        let mut catalog = Catalog::new();
        catalog.import_sample();
        block_on(catalog.save(&storage)).unwrap();
        assert_eq!(block_on(Catalog::load(&storage)), catalog);
    }
}
