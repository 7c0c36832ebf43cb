use log::debug;

use haven_core::{FlatFieldSet, flatten, reconstruct};
use haven_storage::{Gender, GatherMethod, ProductFields, Store};

use crate::error::SessionError;

/// Edit session over one animal product row. The `anim` blob gets the same
/// flat-field treatment as a character's appearance blob.
pub struct ProductSession {
    product_id: Option<i64>,
    animal_id: i64,
    pub name: String,
    pub item: String,
    pub prop: Option<String>,
    pub gather: GatherMethod,
    pub amount: i64,
    pub max_amount: Option<i64>,
    pub lifetime: i64,
    pub tool: Option<String>,
    anim: FlatFieldSet,
    pub chance: i64,
    pub gender: Option<Gender>,
}

impl ProductSession {
    pub fn new(animal_id: i64) -> Self {
        let defaults = ProductFields::default();
        Self {
            product_id: None,
            animal_id,
            name: defaults.name,
            item: defaults.item,
            prop: defaults.prop,
            gather: defaults.gather,
            amount: defaults.amount,
            max_amount: defaults.max_amount,
            lifetime: defaults.lifetime,
            tool: defaults.tool,
            anim: FlatFieldSet::new(),
            chance: defaults.chance,
            gender: defaults.gender,
        }
    }

    pub fn open(store: &impl Store, product_id: i64) -> Result<Self, SessionError> {
        let record = store
            .get_product(product_id)?
            .ok_or(SessionError::ProductNotFound(product_id))?;
        let fields = record.fields;
        Ok(Self {
            product_id: Some(record.product_id),
            animal_id: record.animal_id,
            name: fields.name,
            item: fields.item,
            prop: fields.prop,
            gather: fields.gather,
            amount: fields.amount,
            max_amount: fields.max_amount,
            lifetime: fields.lifetime,
            tool: fields.tool,
            anim: flatten(&fields.anim),
            chance: fields.chance,
            gender: fields.gender,
        })
    }

    pub fn product_id(&self) -> Option<i64> {
        self.product_id
    }

    pub fn animal_id(&self) -> i64 {
        self.animal_id
    }

    pub fn anim(&self) -> &FlatFieldSet {
        &self.anim
    }

    pub fn set_anim_field(&mut self, path: &str, text: &str) {
        self.anim.set(path, text);
    }

    /// Validate and persist; inserts on the first save. A max amount of 0
    /// is stored as unset. Returns the product id.
    pub fn save(&mut self, store: &mut impl Store) -> Result<i64, SessionError> {
        if self.name.trim().is_empty() {
            return Err(SessionError::validation("name", "must not be empty"));
        }
        let fields = ProductFields {
            name: self.name.trim().to_string(),
            item: self.item.trim().to_string(),
            prop: normalize(&self.prop),
            gather: self.gather,
            amount: self.amount,
            max_amount: self.max_amount.filter(|v| *v != 0),
            lifetime: self.lifetime,
            tool: normalize(&self.tool),
            anim: reconstruct(&self.anim),
            chance: self.chance,
            gender: self.gender,
        };

        let product_id = match self.product_id {
            Some(id) => {
                store.update_product(id, &fields)?;
                id
            }
            None => {
                let id = store.insert_product(self.animal_id, &fields)?;
                self.product_id = Some(id);
                id
            }
        };
        debug!("saved product {product_id}");
        Ok(product_id)
    }
}

/// Trim, and treat empty text as unset.
fn normalize(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
