//! Pre-save item editing.
//!
//! An [`ItemDraft`] is the mutable form state an item is edited through
//! before it is written: plain fields, a variant-dimension count, and the
//! combination/tier table that goes with it. Edits are infallible; the
//! single [`validate`](ItemDraft::validate) gate runs before any store
//! call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::fields::{FieldError, Fields, prune_fields, to_field_map};
use crate::types::id::ItemId;
use crate::types::item::{
    Item, ItemPricing, ItemRecord, MAX_VARIANT_TYPES, PriceTier, VariantCombination,
};

/// Errors produced by [`ItemDraft::validate`].
///
/// Messages are worded for direct display to the person editing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The item name is blank.
    #[error("Please enter item name!")]
    MissingName,
    /// The item name is shorter than two characters.
    #[error("Item name must be at least 2 characters!")]
    NameTooShort,
    /// More variant dimensions than the schema supports.
    #[error("Items support at most {MAX_VARIANT_TYPES} variant types!")]
    TooManyVariantTypes,
    /// A flat-priced item has no price.
    #[error("Please enter price!")]
    MissingPrice,
    /// A flat-priced item has a zero or negative price.
    #[error("Price must be greater than 0!")]
    InvalidPrice,
    /// Declared variant dimensions are missing names, listed as
    /// `Variant 1`, `Variant 2`, ...
    #[error("Please enter names for: {}", .0.join(", "))]
    MissingVariantNames(Vec<String>),
}

/// Mutable editing state for an item.
///
/// Drafts also deserialize from JSON files (the CLI's `item save --file`),
/// using the same camelCase field names as stored records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemDraft {
    /// Present when editing an existing item; absent when creating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    /// Display name.
    pub name: String,
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
    /// Number of variant dimensions, 0 to 3. 0 means flat pricing.
    pub variant_types: u8,
    /// Name of the first variant dimension.
    pub variant1_name: String,
    /// Name of the second variant dimension.
    pub variant2_name: String,
    /// Name of the third variant dimension.
    pub variant3_name: String,
    /// Flat price. Kept while variant dimensions are toggled, but only
    /// written when `variant_types` is 0.
    #[serde(skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    /// Priced combinations of dimension values.
    pub variants: Vec<VariantCombination>,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            image: None,
            description: None,
            specifications: None,
            return_policy: None,
            vendor: None,
            visible: true,
            variant_types: 0,
            variant1_name: String::new(),
            variant2_name: String::new(),
            variant3_name: String::new(),
            price: None,
            variants: Vec::new(),
        }
    }
}

impl ItemDraft {
    /// A draft prefilled from an existing item, for editing.
    #[must_use]
    pub fn from_item(item: &Item) -> Self {
        let mut draft = Self {
            id: Some(item.id.clone()),
            name: item.name.clone(),
            image: item.image.clone(),
            description: item.description.clone(),
            specifications: item.specifications.clone(),
            return_policy: item.return_policy.clone(),
            vendor: item.vendor.clone(),
            visible: item.visible,
            ..Self::default()
        };
        match &item.pricing {
            ItemPricing::Flat { price } => {
                draft.price = Some(*price);
            }
            ItemPricing::Tiered {
                variant_names,
                combinations,
            } => {
                draft.variant_types =
                    u8::try_from(variant_names.len().min(usize::from(MAX_VARIANT_TYPES)))
                        .unwrap_or(MAX_VARIANT_TYPES);
                let mut names = variant_names.iter().cloned();
                draft.variant1_name = names.next().unwrap_or_default();
                draft.variant2_name = names.next().unwrap_or_default();
                draft.variant3_name = names.next().unwrap_or_default();
                draft.variants = combinations.clone();
            }
        }
        draft
    }

    /// Change the number of variant dimensions, clamped to 0..=3.
    ///
    /// Every existing combination's value list is resized to match, so no
    /// combination edit is lost while toggling the count back and forth.
    pub fn set_variant_types(&mut self, count: u8) {
        self.variant_types = count.min(MAX_VARIANT_TYPES);
        let dimensions = usize::from(self.variant_types);
        for combination in &mut self.variants {
            combination.values.resize(dimensions, String::new());
        }
    }

    /// Rename a variant dimension (0-based). Dimensions beyond the third
    /// are ignored.
    pub fn set_variant_name(&mut self, dimension: usize, name: impl Into<String>) {
        match dimension {
            0 => self.variant1_name = name.into(),
            1 => self.variant2_name = name.into(),
            2 => self.variant3_name = name.into(),
            _ => {}
        }
    }

    /// Append an empty combination spanning the current dimensions.
    pub fn add_combination(&mut self) {
        self.variants
            .push(VariantCombination::empty(usize::from(self.variant_types)));
    }

    /// Remove a combination. Out-of-range indexes are ignored.
    pub fn remove_combination(&mut self, index: usize) {
        if index < self.variants.len() {
            self.variants.remove(index);
        }
    }

    /// Set one dimension value of one combination. Out-of-range indexes
    /// are ignored.
    pub fn set_value(&mut self, combination: usize, dimension: usize, value: impl Into<String>) {
        if let Some(slot) = self
            .variants
            .get_mut(combination)
            .and_then(|combination| combination.values.get_mut(dimension))
        {
            *slot = value.into();
        }
    }

    /// Append a fresh quantity tier to a combination.
    pub fn add_tier(&mut self, combination: usize) {
        if let Some(combination) = self.variants.get_mut(combination) {
            combination.price_tiers.push(PriceTier::default());
        }
    }

    /// Remove a quantity tier. Out-of-range indexes are ignored.
    pub fn remove_tier(&mut self, combination: usize, tier: usize) {
        if let Some(combination) = self.variants.get_mut(combination) {
            if tier < combination.price_tiers.len() {
                combination.price_tiers.remove(tier);
            }
        }
    }

    /// Mutable access to one tier, for editing its band and amounts.
    pub fn tier_mut(&mut self, combination: usize, tier: usize) -> Option<&mut PriceTier> {
        self.variants.get_mut(combination)?.price_tiers.get_mut(tier)
    }

    /// Whether this draft edits an existing item.
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.id.as_ref().is_some_and(|id| !id.as_str().trim().is_empty())
    }

    /// Check the draft before it is written anywhere.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule: name present and at least two
    /// characters; `variant_types` at most 3; a positive price when flat;
    /// a non-blank name for every declared dimension when tiered (all
    /// missing ones listed in one error).
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if name.chars().count() < 2 {
            return Err(ValidationError::NameTooShort);
        }
        if self.variant_types > MAX_VARIANT_TYPES {
            return Err(ValidationError::TooManyVariantTypes);
        }
        if self.variant_types == 0 {
            let price = self.price.ok_or(ValidationError::MissingPrice)?;
            if price <= Decimal::ZERO {
                return Err(ValidationError::InvalidPrice);
            }
        } else {
            let missing: Vec<String> = self
                .declared_names()
                .enumerate()
                .filter(|(_, name)| name.trim().is_empty())
                .map(|(index, _)| format!("Variant {}", index + 1))
                .collect();
            if !missing.is_empty() {
                return Err(ValidationError::MissingVariantNames(missing));
            }
        }
        Ok(())
    }

    /// Wire fields for creating a record from this draft.
    ///
    /// Only the pricing shape selected by `variant_types` is written, and
    /// blank optional fields are pruned. System fields (category link,
    /// timestamps) are the engine's to add.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Malformed`] if serialization fails.
    pub fn create_fields(&self) -> Result<Fields, FieldError> {
        let mut fields = to_field_map(&self.form_record())?;
        prune_fields(&mut fields);
        Ok(fields)
    }

    /// Wire fields for updating an existing record from this draft.
    ///
    /// Same as [`create_fields`](Self::create_fields), plus `Null` markers
    /// for the keys of the pricing shape the draft moved away from, so the
    /// store removes them. A stale flat price must not survive a switch to
    /// tier pricing, nor tier fields a switch back.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Malformed`] if serialization fails.
    pub fn update_fields(&self) -> Result<Fields, FieldError> {
        let mut fields = self.create_fields()?;
        for key in self.retired_shape_keys() {
            fields.insert((*key).to_owned(), Value::Null);
        }
        Ok(fields)
    }

    fn form_record(&self) -> ItemRecord {
        let mut record = ItemRecord {
            name: Some(self.name.clone()),
            image: self.image.clone(),
            description: self.description.clone(),
            specifications: self.specifications.clone(),
            return_policy: self.return_policy.clone(),
            vendor: self.vendor.clone(),
            visible: Some(self.visible),
            ..ItemRecord::default()
        };
        if self.variant_types == 0 {
            record.variant_types = Some(0);
            record.price = self.price;
        } else {
            record.variant_types = Some(self.variant_types.min(MAX_VARIANT_TYPES));
            let mut names = self.declared_names().map(|name| {
                let trimmed = name.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            });
            record.variant1_name = names.next().flatten();
            record.variant2_name = names.next().flatten();
            record.variant3_name = names.next().flatten();
            record.variants = Some(self.variants.clone());
        }
        record
    }

    fn declared_names(&self) -> impl Iterator<Item = &str> {
        [
            self.variant1_name.as_str(),
            self.variant2_name.as_str(),
            self.variant3_name.as_str(),
        ]
        .into_iter()
        .take(usize::from(self.variant_types.min(MAX_VARIANT_TYPES)))
    }

    const fn retired_shape_keys(&self) -> &'static [&'static str] {
        match self.variant_types {
            0 => &["variants", "variant1Name", "variant2Name", "variant3Name"],
            1 => &["price", "variant2Name", "variant3Name"],
            2 => &["price", "variant3Name"],
            _ => &["price"],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    fn flat_draft(name: &str, price: i64) -> ItemDraft {
        ItemDraft {
            name: name.to_owned(),
            price: Some(Decimal::from(price)),
            ..ItemDraft::default()
        }
    }

    #[test]
    fn test_set_variant_types_resizes_values() {
        let mut draft = ItemDraft::default();
        draft.set_variant_types(2);
        draft.add_combination();
        draft.set_value(0, 0, "Red");
        draft.set_value(0, 1, "L");

        draft.set_variant_types(1);
        assert_eq!(draft.variants[0].values, vec!["Red".to_owned()]);

        draft.set_variant_types(3);
        assert_eq!(
            draft.variants[0].values,
            vec!["Red".to_owned(), String::new(), String::new()]
        );
    }

    #[test]
    fn test_set_variant_types_clamps() {
        let mut draft = ItemDraft::default();
        draft.set_variant_types(9);
        assert_eq!(draft.variant_types, 3);
    }

    #[test]
    fn test_validate_name_rules() {
        let draft = flat_draft("", 10);
        assert_eq!(draft.validate(), Err(ValidationError::MissingName));

        let draft = flat_draft("A", 10);
        assert_eq!(draft.validate(), Err(ValidationError::NameTooShort));
    }

    #[test]
    fn test_validate_price_rules() {
        let mut draft = flat_draft("OPC 53", 350);
        assert_eq!(draft.validate(), Ok(()));

        draft.price = None;
        assert_eq!(draft.validate(), Err(ValidationError::MissingPrice));

        draft.price = Some(Decimal::ZERO);
        assert_eq!(draft.validate(), Err(ValidationError::InvalidPrice));
    }

    #[test]
    fn test_validate_lists_missing_variant_names() {
        let mut draft = flat_draft("Bricks", 10);
        draft.set_variant_types(2);
        draft.set_variant_name(0, "Color");

        let err = draft.validate().unwrap_err();
        assert_eq!(err.to_string(), "Please enter names for: Variant 2");

        draft.set_variant_name(0, "  ");
        let err = draft.validate().unwrap_err();
        assert_eq!(err.to_string(), "Please enter names for: Variant 1, Variant 2");
    }

    #[test]
    fn test_create_fields_flat_shape() {
        let draft = flat_draft("OPC 53", 350);
        let fields = draft.create_fields().unwrap();

        assert_eq!(fields.get("variantTypes"), Some(&json!(0)));
        assert_eq!(
            fields.get("price").and_then(serde_json::Value::as_f64),
            Some(350.0)
        );
        assert_eq!(fields.get("visible"), Some(&json!(true)));
        assert!(!fields.contains_key("variants"));
        assert!(!fields.contains_key("description"));
    }

    #[test]
    fn test_create_fields_tiered_omits_price() {
        let mut draft = flat_draft("Bricks", 10);
        draft.set_variant_types(1);
        draft.set_variant_name(0, " Color ");
        draft.add_combination();

        let fields = draft.create_fields().unwrap();
        assert!(!fields.contains_key("price"));
        assert_eq!(fields.get("variantTypes"), Some(&json!(1)));
        assert_eq!(fields.get("variant1Name"), Some(&json!("Color")));
        assert_eq!(fields.get("variants"), Some(&json!([{ "values": [""], "priceTiers": [] }])));
    }

    #[test]
    fn test_update_fields_retire_flat_price() {
        let mut draft = flat_draft("Bricks", 10);
        draft.id = Some(ItemId::new("i1"));
        draft.set_variant_types(2);
        draft.set_variant_name(0, "Color");
        draft.set_variant_name(1, "Size");

        let fields = draft.update_fields().unwrap();
        assert_eq!(fields.get("price"), Some(&Value::Null));
        assert_eq!(fields.get("variant3Name"), Some(&Value::Null));
        assert_eq!(fields.get("variant1Name"), Some(&json!("Color")));
    }

    #[test]
    fn test_update_fields_retire_tier_keys() {
        let mut draft = flat_draft("OPC 53", 350);
        draft.id = Some(ItemId::new("i1"));

        let fields = draft.update_fields().unwrap();
        assert_eq!(fields.get("variants"), Some(&Value::Null));
        assert_eq!(fields.get("variant1Name"), Some(&Value::Null));
        assert_eq!(
            fields.get("price").and_then(serde_json::Value::as_f64),
            Some(350.0)
        );
    }

    #[test]
    fn test_draft_file_defaults() {
        let draft: ItemDraft =
            serde_json::from_value(json!({ "name": "OPC 53", "price": 350 })).unwrap();

        assert!(draft.visible);
        assert_eq!(draft.variant_types, 0);
        assert_eq!(draft.price, Some(Decimal::from(350)));
        assert!(draft.id.is_none());
    }

    #[test]
    fn test_add_tier_defaults() {
        let mut draft = flat_draft("Bricks", 10);
        draft.set_variant_types(1);
        draft.add_combination();
        draft.add_tier(0);

        let tier = draft.tier_mut(0, 0).unwrap();
        assert_eq!(tier.min, 1);
        assert_eq!(tier.max, 1);
        assert_eq!(tier.price, Decimal::ZERO);
    }

    #[test]
    fn test_is_update() {
        let mut draft = flat_draft("OPC 53", 350);
        assert!(!draft.is_update());

        draft.id = Some(ItemId::new("  "));
        assert!(!draft.is_update());

        draft.id = Some(ItemId::new("i1"));
        assert!(draft.is_update());
    }
}
