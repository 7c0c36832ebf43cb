use log::{debug, info};
use rusqlite::Connection;

use crate::error::StorageError;
use crate::traits::{
    AnimalFields, AnimalRecord, CHARACTER_PAGE_LIMIT, CharacterRecord, CharacterUpdate,
    Gender, GatherMethod, ItemRecord, ProductFields, ProductRecord, Store,
};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        info!("opening database at {path}");
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Read a text column as raw bytes and decode lossily; the game writes some
/// of these columns as binary and they may carry invalid UTF-8. NULL reads
/// as the empty string.
fn lossy_text(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<String> {
    let bytes: Option<Vec<u8>> = row.get(idx)?;
    Ok(bytes
        .map(|b| String::from_utf8_lossy(&b).into_owned())
        .unwrap_or_default())
}

/// Lossy decode for columns where NULL is meaningful.
fn opt_lossy_text(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<String>> {
    let bytes: Option<Vec<u8>> = row.get(idx)?;
    Ok(bytes.map(|b| String::from_utf8_lossy(&b).into_owned()))
}

fn read_character(row: &rusqlite::Row) -> rusqlite::Result<CharacterRecord> {
    Ok(CharacterRecord {
        charidentifier: row.get(0)?,
        steamname: lossy_text(row, 1)?,
        firstname: lossy_text(row, 2)?,
        lastname: lossy_text(row, 3)?,
        money: row.get(4)?,
        group: lossy_text(row, 5)?,
        skin_player: lossy_text(row, 6)?,
        coords: lossy_text(row, 7)?,
    })
}

fn read_animal(row: &rusqlite::Row) -> rusqlite::Result<AnimalRecord> {
    Ok(AnimalRecord {
        animal_id: row.get(0)?,
        fields: AnimalFields {
            name: lossy_text(row, 1)?,
            price: row.get(2)?,
            model: lossy_text(row, 3)?,
            m_model: lossy_text(row, 4)?,
            health: row.get(5)?,
            adult_age: row.get(6)?,
            walk_only: row.get(7)?,
            offset_x: row.get(8)?,
            offset_y: row.get(9)?,
            offset_z: row.get(10)?,
            food: row.get(11)?,
            water: row.get(12)?,
            food_max: row.get(13)?,
            water_max: row.get(14)?,
            kibble: lossy_text(row, 15)?,
            kibble_food: row.get(16)?,
            poop: lossy_text(row, 17)?,
            poop_chance: row.get(18)?,
            die_age: row.get(19)?,
            pregnancy_time: row.get(20)?,
            pregnancy_chance: row.get(21)?,
            no_fuck_time: row.get(22)?,
        },
    })
}

fn read_product(row: &rusqlite::Row) -> Result<ProductRecord, StorageError> {
    let gather_code: i64 = row.get(5)?;
    let gender: Option<String> = opt_lossy_text(row, 12)?;
    Ok(ProductRecord {
        product_id: row.get(0)?,
        animal_id: row.get(1)?,
        fields: ProductFields {
            name: lossy_text(row, 2)?,
            item: lossy_text(row, 3)?,
            prop: opt_lossy_text(row, 4)?,
            gather: GatherMethod::from_code(gather_code)?,
            amount: row.get(6)?,
            max_amount: row.get(7)?,
            lifetime: row.get(8)?,
            tool: opt_lossy_text(row, 9)?,
            anim: lossy_text(row, 10)?,
            chance: row.get(11)?,
            gender: gender.as_deref().map(Gender::parse).transpose()?,
        },
    })
}

/// Tunnel a StorageError through rusqlite's error type inside query_map
/// closures that must return rusqlite::Error.
fn tunnel(e: StorageError) -> rusqlite::Error {
    match e {
        StorageError::Sqlite(sq) => sq,
        other => rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Blob,
            Box::new(OpaqueStorageError(other.to_string())),
        ),
    }
}

const CHARACTER_SELECT: &str = "SELECT charidentifier, steamname, firstname, lastname, \
     money, \"group\", skinPlayer, coords FROM characters";

const ANIMAL_SELECT: &str = "SELECT animal_id, name, price, model, m_model, health, adultAge, WalkOnly, \
     offsetX, offsetY, offsetZ, food, water, foodMax, waterMax, kibble, kibbleFood, \
     poop, poopChance, dieAge, pregnancyTime, pregnancyChance, noFuckTime \
     FROM aprts_ranch_config_animals";

const PRODUCT_SELECT: &str = "SELECT product_id, animal_id, name, item, prop, gather, amount, maxAmount, \
     lifetime, tool, anim, chance, gender FROM aprts_ranch_config_animal_products";

impl Store for SqliteStore {
    fn list_characters(&self) -> Result<Vec<CharacterRecord>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "{CHARACTER_SELECT} ORDER BY charidentifier LIMIT ?1"
        ))?;
        let rows = stmt
            .query_map(rusqlite::params![CHARACTER_PAGE_LIMIT], read_character)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!("listed {} characters", rows.len());
        Ok(rows)
    }

    fn search_characters(&self, query: &str) -> Result<Vec<CharacterRecord>, StorageError> {
        let like = format!("%{query}%");
        let mut stmt = self.conn.prepare(&format!(
            "{CHARACTER_SELECT} \
             WHERE CAST(charidentifier AS TEXT) LIKE ?1 \
                OR steamname LIKE ?1 OR firstname LIKE ?1 OR lastname LIKE ?1 \
             ORDER BY charidentifier LIMIT ?2"
        ))?;
        let rows = stmt
            .query_map(rusqlite::params![like, CHARACTER_PAGE_LIMIT], read_character)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!("character search {query:?} matched {} rows", rows.len());
        Ok(rows)
    }

    fn get_character(
        &self,
        charidentifier: i64,
    ) -> Result<Option<CharacterRecord>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CHARACTER_SELECT} WHERE charidentifier = ?1"))?;
        let mut rows = stmt.query_map(rusqlite::params![charidentifier], read_character)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    fn update_character(&mut self, update: &CharacterUpdate) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE characters \
             SET money = ?1, \"group\" = ?2, coords = ?3, firstname = ?4, lastname = ?5, \
                 skinPlayer = ?6 \
             WHERE charidentifier = ?7",
            rusqlite::params![
                update.money,
                update.group,
                update.coords,
                update.firstname,
                update.lastname,
                update.skin_player,
                update.charidentifier,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!(
                "character {}",
                update.charidentifier
            )));
        }
        debug!("updated character {}", update.charidentifier);
        Ok(())
    }

    fn list_animals(&self, search: Option<&str>) -> Result<Vec<AnimalRecord>, StorageError> {
        let rows = match search {
            Some(query) => {
                let like = format!("%{query}%");
                let mut stmt = self.conn.prepare(&format!(
                    "{ANIMAL_SELECT} \
                     WHERE name LIKE ?1 OR model LIKE ?1 OR m_model LIKE ?1 \
                     ORDER BY animal_id"
                ))?;
                let rows = stmt
                    .query_map(rusqlite::params![like], read_animal)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{ANIMAL_SELECT} ORDER BY animal_id"))?;
                let rows = stmt
                    .query_map([], read_animal)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(rows)
    }

    fn get_animal(&self, animal_id: i64) -> Result<Option<AnimalRecord>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ANIMAL_SELECT} WHERE animal_id = ?1"))?;
        let mut rows = stmt.query_map(rusqlite::params![animal_id], read_animal)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    fn insert_animal(&mut self, fields: &AnimalFields) -> Result<i64, StorageError> {
        self.conn.execute(
            "INSERT INTO aprts_ranch_config_animals \
             (name, price, model, m_model, health, adultAge, WalkOnly, \
              offsetX, offsetY, offsetZ, food, water, foodMax, waterMax, \
              kibble, kibbleFood, poop, poopChance, dieAge, pregnancyTime, \
              pregnancyChance, noFuckTime) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, \
                     ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
            rusqlite::params![
                fields.name,
                fields.price,
                fields.model,
                fields.m_model,
                fields.health,
                fields.adult_age,
                fields.walk_only,
                fields.offset_x,
                fields.offset_y,
                fields.offset_z,
                fields.food,
                fields.water,
                fields.food_max,
                fields.water_max,
                fields.kibble,
                fields.kibble_food,
                fields.poop,
                fields.poop_chance,
                fields.die_age,
                fields.pregnancy_time,
                fields.pregnancy_chance,
                fields.no_fuck_time,
            ],
        )?;
        let animal_id = self.conn.last_insert_rowid();
        debug!("inserted animal {animal_id} ({})", fields.name);
        Ok(animal_id)
    }

    fn update_animal(
        &mut self,
        animal_id: i64,
        fields: &AnimalFields,
    ) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE aprts_ranch_config_animals \
             SET name = ?1, price = ?2, model = ?3, m_model = ?4, health = ?5, \
                 adultAge = ?6, WalkOnly = ?7, offsetX = ?8, offsetY = ?9, offsetZ = ?10, \
                 food = ?11, water = ?12, foodMax = ?13, waterMax = ?14, kibble = ?15, \
                 kibbleFood = ?16, poop = ?17, poopChance = ?18, dieAge = ?19, \
                 pregnancyTime = ?20, pregnancyChance = ?21, noFuckTime = ?22 \
             WHERE animal_id = ?23",
            rusqlite::params![
                fields.name,
                fields.price,
                fields.model,
                fields.m_model,
                fields.health,
                fields.adult_age,
                fields.walk_only,
                fields.offset_x,
                fields.offset_y,
                fields.offset_z,
                fields.food,
                fields.water,
                fields.food_max,
                fields.water_max,
                fields.kibble,
                fields.kibble_food,
                fields.poop,
                fields.poop_chance,
                fields.die_age,
                fields.pregnancy_time,
                fields.pregnancy_chance,
                fields.no_fuck_time,
                animal_id,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("animal {animal_id}")));
        }
        Ok(())
    }

    fn delete_animal(&mut self, animal_id: i64) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "DELETE FROM aprts_ranch_config_animals WHERE animal_id = ?1",
            rusqlite::params![animal_id],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("animal {animal_id}")));
        }
        debug!("deleted animal {animal_id}");
        Ok(())
    }

    fn products_for_animal(
        &self,
        animal_id: i64,
    ) -> Result<Vec<ProductRecord>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{PRODUCT_SELECT} WHERE animal_id = ?1 ORDER BY product_id"
            ))?;
        let rows = stmt
            .query_map(rusqlite::params![animal_id], |row| {
                read_product(row).map_err(tunnel)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn get_product(&self, product_id: i64) -> Result<Option<ProductRecord>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT} WHERE product_id = ?1"))?;
        let mut rows = stmt.query_map(rusqlite::params![product_id], |row| {
            read_product(row).map_err(tunnel)
        })?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    fn insert_product(
        &mut self,
        animal_id: i64,
        fields: &ProductFields,
    ) -> Result<i64, StorageError> {
        self.conn.execute(
            "INSERT INTO aprts_ranch_config_animal_products \
             (animal_id, name, item, prop, gather, amount, maxAmount, lifetime, \
              tool, anim, chance, gender) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                animal_id,
                fields.name,
                fields.item,
                fields.prop,
                fields.gather.code(),
                fields.amount,
                fields.max_amount,
                fields.lifetime,
                fields.tool,
                fields.anim,
                fields.chance,
                fields.gender.map(|g| g.as_str()),
            ],
        )?;
        let product_id = self.conn.last_insert_rowid();
        debug!("inserted product {product_id} for animal {animal_id}");
        Ok(product_id)
    }

    fn update_product(
        &mut self,
        product_id: i64,
        fields: &ProductFields,
    ) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE aprts_ranch_config_animal_products \
             SET name = ?1, item = ?2, prop = ?3, gather = ?4, amount = ?5, \
                 maxAmount = ?6, lifetime = ?7, tool = ?8, anim = ?9, chance = ?10, \
                 gender = ?11 \
             WHERE product_id = ?12",
            rusqlite::params![
                fields.name,
                fields.item,
                fields.prop,
                fields.gather.code(),
                fields.amount,
                fields.max_amount,
                fields.lifetime,
                fields.tool,
                fields.anim,
                fields.chance,
                fields.gender.map(|g| g.as_str()),
                product_id,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("product {product_id}")));
        }
        Ok(())
    }

    fn delete_product(&mut self, product_id: i64) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "DELETE FROM aprts_ranch_config_animal_products WHERE product_id = ?1",
            rusqlite::params![product_id],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("product {product_id}")));
        }
        debug!("deleted product {product_id}");
        Ok(())
    }

    fn list_items(&self, search: Option<&str>) -> Result<Vec<ItemRecord>, StorageError> {
        let read_item = |row: &rusqlite::Row| -> rusqlite::Result<ItemRecord> {
            Ok(ItemRecord {
                item: lossy_text(row, 0)?,
                label: lossy_text(row, 1)?,
            })
        };
        let rows = match search {
            Some(query) => {
                let like = format!("%{query}%");
                let mut stmt = self.conn.prepare(
                    "SELECT item, label FROM items \
                     WHERE item LIKE ?1 OR label LIKE ?1 ORDER BY item",
                )?;
                let rows = stmt
                    .query_map(rusqlite::params![like], read_item)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT item, label FROM items ORDER BY item")?;
                let rows = stmt
                    .query_map([], read_item)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(rows)
    }
}

/// Wrapper error type used to tunnel StorageError through rusqlite's error
/// system in query_map closures that must return rusqlite::Error.
#[derive(Debug)]
struct OpaqueStorageError(String);

impl std::fmt::Display for OpaqueStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for OpaqueStorageError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO characters \
                 (charidentifier, steamname, firstname, lastname, money, \"group\", skinPlayer, coords) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    7,
                    "steam_arthur",
                    "Arthur",
                    "Morgan",
                    150.25,
                    "user",
                    r#"{"Beard": 0}"#,
                    r#"{"x": 1.0, "y": 2.0, "z": 3.0}"#,
                ],
            )
            .unwrap();
        store
    }

    #[test]
    fn get_character_reads_all_columns() {
        let store = seeded_store();
        let record = store.get_character(7).unwrap().unwrap();
        assert_eq!(record.steamname, "steam_arthur");
        assert_eq!(record.money, 150.25);
        assert_eq!(record.skin_player, r#"{"Beard": 0}"#);
        assert!(store.get_character(999).unwrap().is_none());
    }

    #[test]
    fn search_matches_identifier_and_names() {
        let store = seeded_store();
        assert_eq!(store.search_characters("Morg").unwrap().len(), 1);
        assert_eq!(store.search_characters("7").unwrap().len(), 1);
        assert_eq!(store.search_characters("nobody").unwrap().len(), 0);
    }

    #[test]
    fn update_character_requires_existing_row() {
        let mut store = seeded_store();
        let update = CharacterUpdate {
            charidentifier: 999,
            money: 0.0,
            group: "user".into(),
            coords: "{}".into(),
            firstname: "x".into(),
            lastname: "y".into(),
            skin_player: "{}".into(),
        };
        assert!(matches!(
            store.update_character(&update),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn animal_insert_assigns_sequential_ids() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let fields = AnimalFields {
            name: "Chicken".into(),
            ..AnimalFields::default()
        };
        let first = store.insert_animal(&fields).unwrap();
        let second = store.insert_animal(&fields).unwrap();
        assert!(second > first);
        assert_eq!(
            store.get_animal(first).unwrap().unwrap().fields.name,
            "Chicken"
        );
    }

    #[test]
    fn product_nullable_columns_round_trip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let animal_id = store.insert_animal(&AnimalFields::default()).unwrap();
        let fields = ProductFields {
            name: "Egg".into(),
            item: "egg".into(),
            gather: GatherMethod::Pickup,
            max_amount: None,
            gender: Some(Gender::Female),
            ..ProductFields::default()
        };
        let product_id = store.insert_product(animal_id, &fields).unwrap();
        let record = store.get_product(product_id).unwrap().unwrap();
        assert_eq!(record.fields.max_amount, None);
        assert_eq!(record.fields.gender, Some(Gender::Female));
        assert_eq!(record.fields.gather, GatherMethod::Pickup);
        assert_eq!(record.fields.prop, None);
    }

    #[test]
    fn deleting_an_animal_cascades_to_products() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let animal_id = store.insert_animal(&AnimalFields::default()).unwrap();
        let product_id = store
            .insert_product(animal_id, &ProductFields::default())
            .unwrap();
        store.delete_animal(animal_id).unwrap();
        assert!(store.get_product(product_id).unwrap().is_none());
    }
}
