use std::str::FromStr;

use crate::error::StorageError;

/// Row cap shared by the character list and search queries.
pub const CHARACTER_PAGE_LIMIT: u32 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRecord {
    pub charidentifier: i64,
    pub steamname: String,
    pub firstname: String,
    pub lastname: String,
    pub money: f64,
    pub group: String,
    /// Raw appearance blob as persisted; decoded lossily from the column.
    pub skin_player: String,
    /// Raw position blob as persisted; decoded lossily from the column.
    pub coords: String,
}

/// The column set a character save writes. `charidentifier` keys the update
/// and is never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterUpdate {
    pub charidentifier: i64,
    pub money: f64,
    pub group: String,
    pub coords: String,
    pub firstname: String,
    pub lastname: String,
    pub skin_player: String,
}

/// Editable column set of a ranch animal, shared by inserts and updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimalFields {
    pub name: String,
    pub price: i64,
    pub model: String,
    pub m_model: String,
    pub health: i64,
    pub adult_age: i64,
    pub walk_only: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub offset_z: f64,
    pub food: i64,
    pub water: i64,
    pub food_max: i64,
    pub water_max: i64,
    pub kibble: String,
    pub kibble_food: i64,
    pub poop: String,
    pub poop_chance: f64,
    pub die_age: i64,
    pub pregnancy_time: i64,
    pub pregnancy_chance: i64,
    pub no_fuck_time: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimalRecord {
    pub animal_id: i64,
    pub fields: AnimalFields,
}

/// How an animal product is obtained. Persisted as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatherMethod {
    Kill,
    Gather,
    Pickup,
}

impl GatherMethod {
    pub fn code(&self) -> i64 {
        match self {
            Self::Kill => 1,
            Self::Gather => 2,
            Self::Pickup => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, StorageError> {
        match code {
            1 => Ok(Self::Kill),
            2 => Ok(Self::Gather),
            3 => Ok(Self::Pickup),
            _ => Err(StorageError::Serialization(format!(
                "unknown gather code: {code}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kill => "kill",
            Self::Gather => "gather",
            Self::Pickup => "pickup",
        }
    }

    pub fn parse(s: &str) -> Result<Self, StorageError> {
        match s {
            "kill" => Ok(Self::Kill),
            "gather" => Ok(Self::Gather),
            "pickup" => Ok(Self::Pickup),
            _ => Err(StorageError::Serialization(format!(
                "unknown gather method: {s}"
            ))),
        }
    }
}

impl FromStr for GatherMethod {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Product gender restriction. NULL in the column means unrestricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Result<Self, StorageError> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(StorageError::Serialization(format!("unknown gender: {s}"))),
        }
    }
}

impl FromStr for Gender {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Editable column set of an animal product. `anim` is the raw JSON blob;
/// callers edit it through the codec, storage passes it through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub item: String,
    pub prop: Option<String>,
    pub gather: GatherMethod,
    pub amount: i64,
    pub max_amount: Option<i64>,
    pub lifetime: i64,
    pub tool: Option<String>,
    pub anim: String,
    pub chance: i64,
    pub gender: Option<Gender>,
}

impl Default for ProductFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            item: String::new(),
            prop: None,
            gather: GatherMethod::Kill,
            amount: 0,
            max_amount: None,
            lifetime: 0,
            tool: None,
            anim: String::new(),
            chance: 100,
            gender: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub product_id: i64,
    pub animal_id: i64,
    pub fields: ProductFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub item: String,
    pub label: String,
}

/// Synchronous access to the administered tables. Every write is a single
/// parameterized statement, auto-committed.
pub trait Store {
    fn list_characters(&self) -> Result<Vec<CharacterRecord>, StorageError>;

    /// LIKE search over the cast identifier, steam name, first and last name.
    fn search_characters(&self, query: &str) -> Result<Vec<CharacterRecord>, StorageError>;

    fn get_character(
        &self,
        charidentifier: i64,
    ) -> Result<Option<CharacterRecord>, StorageError>;

    fn update_character(&mut self, update: &CharacterUpdate) -> Result<(), StorageError>;

    /// All animals, or a LIKE search over name and both model columns.
    fn list_animals(&self, search: Option<&str>) -> Result<Vec<AnimalRecord>, StorageError>;

    fn get_animal(&self, animal_id: i64) -> Result<Option<AnimalRecord>, StorageError>;

    /// Returns the assigned animal_id.
    fn insert_animal(&mut self, fields: &AnimalFields) -> Result<i64, StorageError>;

    fn update_animal(
        &mut self,
        animal_id: i64,
        fields: &AnimalFields,
    ) -> Result<(), StorageError>;

    fn delete_animal(&mut self, animal_id: i64) -> Result<(), StorageError>;

    fn products_for_animal(&self, animal_id: i64)
        -> Result<Vec<ProductRecord>, StorageError>;

    fn get_product(&self, product_id: i64) -> Result<Option<ProductRecord>, StorageError>;

    /// Returns the assigned product_id.
    fn insert_product(
        &mut self,
        animal_id: i64,
        fields: &ProductFields,
    ) -> Result<i64, StorageError>;

    fn update_product(
        &mut self,
        product_id: i64,
        fields: &ProductFields,
    ) -> Result<(), StorageError>;

    fn delete_product(&mut self, product_id: i64) -> Result<(), StorageError>;

    fn list_items(&self, search: Option<&str>) -> Result<Vec<ItemRecord>, StorageError>;
}
