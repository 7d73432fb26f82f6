//! Item records, pricing shapes, and their stored representation.
//!
//! An item is priced in exactly one of two shapes: a single flat price, or
//! per-combination tier tables across up to three named variant dimensions.
//! The stored form flattens the shape into `variantTypes`, `price`,
//! `variant1Name`..`variant3Name`, and `variants`; the conversions here are
//! the only place that flattening happens, so the two shapes can never mix.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::fields::{FieldError, Fields, from_field_map, non_empty, prune_fields, to_field_map};
use crate::types::id::{CategoryId, ItemId};

/// Most variant dimensions an item can declare.
pub const MAX_VARIANT_TYPES: u8 = 3;

/// Quantity-banded pricing for one variant combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    /// Lowest quantity the tier covers (inclusive).
    pub min: u32,
    /// Highest quantity the tier covers (inclusive).
    pub max: u32,
    /// Unit price within the band.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Delivery fee for the band.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    /// Loading and unloading fee for the band.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub loading_unloading_fee: Decimal,
}

impl Default for PriceTier {
    /// The tier an editor starts from: quantity band `1..=1`, all amounts
    /// zero.
    fn default() -> Self {
        Self {
            min: 1,
            max: 1,
            price: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            loading_unloading_fee: Decimal::ZERO,
        }
    }
}

impl PriceTier {
    /// Whether two tiers cover overlapping quantity ranges.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

/// One concrete combination of variant values with its tier table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantCombination {
    /// One value per variant dimension, in dimension order.
    pub values: Vec<String>,
    /// Quantity tiers priced for this combination.
    #[serde(default)]
    pub price_tiers: Vec<PriceTier>,
}

impl VariantCombination {
    /// An empty combination spanning `dimensions` variant dimensions.
    #[must_use]
    pub fn empty(dimensions: usize) -> Self {
        Self {
            values: vec![String::new(); dimensions],
            price_tiers: Vec::new(),
        }
    }

    /// Index pairs of tiers whose quantity ranges overlap.
    ///
    /// Overlapping tiers are stored as-is; callers that want to surface
    /// them can use this to find the offending pairs.
    #[must_use]
    pub fn overlapping_tiers(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.price_tiers.iter().enumerate() {
            for (j, b) in self.price_tiers.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

/// How an item is priced.
///
/// Exactly one shape is stored at a time; writing one shape removes every
/// trace of the other from the record.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemPricing {
    /// A single price for the whole item.
    Flat {
        /// The item's price.
        price: Decimal,
    },
    /// Tier tables across named variant dimensions.
    Tiered {
        /// Dimension names, in order (1 to 3 of them).
        variant_names: Vec<String>,
        /// Priced combinations of dimension values.
        combinations: Vec<VariantCombination>,
    },
}

impl ItemPricing {
    /// Number of variant dimensions (0 for flat-priced items).
    #[must_use]
    pub fn variant_types(&self) -> usize {
        match self {
            Self::Flat { .. } => 0,
            Self::Tiered { variant_names, .. } => variant_names.len(),
        }
    }
}

/// A catalogue item.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Store-assigned identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Link to the owning category.
    ///
    /// Records written before category links were stored may lack it; the
    /// engine falls back to `category_name` for those.
    pub category_id: Option<CategoryId>,
    /// Denormalized owning-category name, the de facto grouping key.
    pub category_name: String,
    /// Optional image URL.
    pub image: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Free-form specifications.
    pub specifications: Option<String>,
    /// Free-form return policy.
    pub return_policy: Option<String>,
    /// Vendor name.
    pub vendor: Option<String>,
    /// Whether the item is shown to viewers.
    pub visible: bool,
    /// Pricing shape.
    pub pricing: ItemPricing,
    /// Set once when the record is created.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every save.
    pub updated_at: DateTime<Utc>,
}

/// Stored representation of an item.
///
/// Every field is optional so reads stay tolerant of older records; the
/// conversion to [`Item`] decides what is actually required.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ItemRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) specifications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) return_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) variant_types: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) variant1_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) variant2_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) variant3_name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub(crate) price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) variants: Option<Vec<VariantCombination>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) updated_at: Option<DateTime<Utc>>,
}

impl ItemRecord {
    /// Write `pricing` into the record's flattened shape fields.
    pub(crate) fn set_pricing(&mut self, pricing: &ItemPricing) -> Result<(), FieldError> {
        match pricing {
            ItemPricing::Flat { price } => {
                self.variant_types = Some(0);
                self.price = Some(*price);
            }
            ItemPricing::Tiered {
                variant_names,
                combinations,
            } => {
                let dimensions =
                    u8::try_from(variant_names.len()).map_err(|_| FieldError::Invalid {
                        name: "variantTypes",
                        reason: "too many variant dimensions".to_owned(),
                    })?;
                if dimensions == 0 || dimensions > MAX_VARIANT_TYPES {
                    return Err(FieldError::Invalid {
                        name: "variantTypes",
                        reason: format!("expected 1 to {MAX_VARIANT_TYPES} variant dimensions, got {dimensions}"),
                    });
                }
                self.variant_types = Some(dimensions);
                let mut names = variant_names.iter().cloned();
                self.variant1_name = names.next();
                self.variant2_name = names.next();
                self.variant3_name = names.next();
                self.variants = Some(combinations.clone());
            }
        }
        Ok(())
    }

    /// Read the flattened shape fields back into a pricing value.
    pub(crate) fn take_pricing(&mut self) -> Result<ItemPricing, FieldError> {
        match self.variant_types.unwrap_or(0) {
            0 => Ok(ItemPricing::Flat {
                price: self.price.ok_or(FieldError::Missing { name: "price" })?,
            }),
            dimensions @ 1..=MAX_VARIANT_TYPES => {
                let declared = [
                    self.variant1_name.take(),
                    self.variant2_name.take(),
                    self.variant3_name.take(),
                ];
                let labels = ["variant1Name", "variant2Name", "variant3Name"];
                let mut variant_names = Vec::with_capacity(usize::from(dimensions));
                for (label, name) in labels.into_iter().zip(declared).take(usize::from(dimensions)) {
                    match name {
                        Some(name) if !name.trim().is_empty() => variant_names.push(name),
                        _ => return Err(FieldError::Missing { name: label }),
                    }
                }
                Ok(ItemPricing::Tiered {
                    variant_names,
                    combinations: self.variants.take().unwrap_or_default(),
                })
            }
            other => Err(FieldError::Invalid {
                name: "variantTypes",
                reason: format!("expected 0 to {MAX_VARIANT_TYPES} variant dimensions, got {other}"),
            }),
        }
    }
}

impl Item {
    /// Decode an item from its stored fields.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] if the record is malformed, has no name or
    /// timestamps, declares an out-of-range `variantTypes`, lacks a price
    /// while flat, or lacks a dimension name while tiered.
    pub fn from_fields(id: ItemId, fields: &Fields) -> Result<Self, FieldError> {
        let mut record: ItemRecord = from_field_map(fields)?;
        let pricing = record.take_pricing()?;
        Ok(Self {
            id,
            name: record.name.ok_or(FieldError::Missing { name: "name" })?,
            category_id: record.category_id.filter(|id| !id.is_empty()),
            category_name: record.category_name.unwrap_or_default(),
            image: non_empty(record.image),
            description: non_empty(record.description),
            specifications: non_empty(record.specifications),
            return_policy: non_empty(record.return_policy),
            vendor: non_empty(record.vendor),
            visible: record.visible.unwrap_or(true),
            pricing,
            created_at: record
                .created_at
                .ok_or(FieldError::Missing { name: "createdAt" })?,
            updated_at: record
                .updated_at
                .ok_or(FieldError::Missing { name: "updatedAt" })?,
        })
    }

    /// Encode the item for storage. The ID is never stored as a field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] if the pricing shape is out of range or
    /// serialization fails.
    pub fn to_fields(&self) -> Result<Fields, FieldError> {
        let mut record = ItemRecord {
            name: Some(self.name.clone()),
            category_id: self.category_id.clone(),
            category_name: Some(self.category_name.clone()),
            image: self.image.clone(),
            description: self.description.clone(),
            specifications: self.specifications.clone(),
            return_policy: self.return_policy.clone(),
            vendor: self.vendor.clone(),
            visible: Some(self.visible),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
            ..ItemRecord::default()
        };
        record.set_pricing(&self.pricing)?;
        let mut fields = to_field_map(&record)?;
        prune_fields(&mut fields);
        Ok(fields)
    }

    /// Whether the item belongs to the given category, by ID when the link
    /// is stored and by name otherwise.
    #[must_use]
    pub fn belongs_to(&self, category_id: &CategoryId, category_name: &str) -> bool {
        match &self.category_id {
            Some(id) => id == category_id,
            None => self.category_name == category_name,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields_from(value: serde_json::Value) -> Fields {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn flat_item() -> Item {
        Item {
            id: ItemId::new("i1"),
            name: "OPC 53".to_owned(),
            category_id: Some(CategoryId::new("c1")),
            category_name: "Cement".to_owned(),
            image: None,
            description: Some("53-grade cement".to_owned()),
            specifications: None,
            return_policy: None,
            vendor: None,
            visible: true,
            pricing: ItemPricing::Flat { price: Decimal::from(350) },
            created_at: "2025-03-01T10:00:00Z".parse().unwrap(),
            updated_at: "2025-03-01T10:00:00Z".parse().unwrap(),
        }
    }

    fn tiered_item() -> Item {
        Item {
            pricing: ItemPricing::Tiered {
                variant_names: vec!["Color".to_owned(), "Size".to_owned()],
                combinations: vec![VariantCombination {
                    values: vec!["Red".to_owned(), "L".to_owned()],
                    price_tiers: vec![PriceTier {
                        min: 1,
                        max: 10,
                        price: Decimal::from(100),
                        delivery_fee: Decimal::ZERO,
                        loading_unloading_fee: Decimal::ZERO,
                    }],
                }],
            },
            ..flat_item()
        }
    }

    #[test]
    fn test_flat_fields_have_price_and_no_variant_keys() {
        let fields = flat_item().to_fields().unwrap();

        assert_eq!(fields.get("variantTypes"), Some(&json!(0)));
        assert_eq!(fields.get("price").and_then(serde_json::Value::as_f64), Some(350.0));
        assert!(!fields.contains_key("variants"));
        assert!(!fields.contains_key("variant1Name"));
        assert!(!fields.contains_key("id"));
    }

    #[test]
    fn test_tiered_fields_have_no_price() {
        let fields = tiered_item().to_fields().unwrap();

        assert!(!fields.contains_key("price"));
        assert_eq!(fields.get("variantTypes"), Some(&json!(2)));
        assert_eq!(fields.get("variant1Name"), Some(&json!("Color")));
        assert_eq!(fields.get("variant2Name"), Some(&json!("Size")));
        assert!(!fields.contains_key("variant3Name"));

        let tier = &fields["variants"][0]["priceTiers"][0];
        assert_eq!(tier.get("price").and_then(serde_json::Value::as_f64), Some(100.0));
        assert_eq!(tier.get("deliveryFee").and_then(serde_json::Value::as_f64), Some(0.0));
    }

    #[test]
    fn test_to_fields_prunes_blank_optionals() {
        let mut item = flat_item();
        item.image = Some(String::new());
        let fields = item.to_fields().unwrap();
        assert!(!fields.contains_key("image"));
    }

    #[test]
    fn test_from_fields_flat_requires_price() {
        let fields = fields_from(json!({
            "name": "OPC 53",
            "variantTypes": 0,
            "createdAt": "2025-03-01T10:00:00Z",
            "updatedAt": "2025-03-01T10:00:00Z",
        }));
        let err = Item::from_fields(ItemId::new("i1"), &fields).unwrap_err();
        assert!(matches!(err, FieldError::Missing { name: "price" }));
    }

    #[test]
    fn test_from_fields_missing_variant_types_reads_as_flat() {
        let fields = fields_from(json!({
            "name": "OPC 53",
            "price": 350,
            "createdAt": "2025-03-01T10:00:00Z",
            "updatedAt": "2025-03-01T10:00:00Z",
        }));
        let item = Item::from_fields(ItemId::new("i1"), &fields).unwrap();
        assert_eq!(item.pricing, ItemPricing::Flat { price: Decimal::from(350) });
    }

    #[test]
    fn test_from_fields_tiered_requires_dimension_names() {
        let fields = fields_from(json!({
            "name": "Bricks",
            "variantTypes": 2,
            "variant1Name": "Color",
            "createdAt": "2025-03-01T10:00:00Z",
            "updatedAt": "2025-03-01T10:00:00Z",
        }));
        let err = Item::from_fields(ItemId::new("i1"), &fields).unwrap_err();
        assert!(matches!(err, FieldError::Missing { name: "variant2Name" }));
    }

    #[test]
    fn test_from_fields_rejects_out_of_range_variant_types() {
        let fields = fields_from(json!({
            "name": "Bricks",
            "variantTypes": 7,
            "createdAt": "2025-03-01T10:00:00Z",
            "updatedAt": "2025-03-01T10:00:00Z",
        }));
        let err = Item::from_fields(ItemId::new("i1"), &fields).unwrap_err();
        assert!(matches!(err, FieldError::Invalid { name: "variantTypes", .. }));
    }

    #[test]
    fn test_round_trip_tiered() {
        let original = tiered_item();
        let fields = original.to_fields().unwrap();
        let decoded = Item::from_fields(ItemId::new("i1"), &fields).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_belongs_to_falls_back_to_name() {
        let mut item = flat_item();
        item.category_id = None;
        assert!(item.belongs_to(&CategoryId::new("other"), "Cement"));
        assert!(!item.belongs_to(&CategoryId::new("other"), "Steel"));
    }

    #[test]
    fn test_overlapping_tiers() {
        let combination = VariantCombination {
            values: vec!["Red".to_owned()],
            price_tiers: vec![
                PriceTier { min: 1, max: 10, ..PriceTier::default() },
                PriceTier { min: 5, max: 15, ..PriceTier::default() },
                PriceTier { min: 16, max: 20, ..PriceTier::default() },
            ],
        };
        assert_eq!(combination.overlapping_tiers(), vec![(0, 1)]);
    }
}
