use haven_storage::{AnimalFields, ProductFields, SqliteStore, StorageError, Store};

/// In-memory store with seed helpers for tests.
pub struct TestStore {
    pub store: SqliteStore,
}

impl TestStore {
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self {
            store: SqliteStore::open_in_memory()?,
        })
    }

    /// Insert a character row directly. The admin tool never creates
    /// characters; the game server does.
    pub fn seed_character(
        &mut self,
        charidentifier: i64,
        steamname: &str,
        firstname: &str,
        lastname: &str,
        skin_player: &str,
        coords: &str,
    ) -> Result<(), StorageError> {
        self.store.conn().execute(
            "INSERT INTO characters \
             (charidentifier, steamname, firstname, lastname, money, \"group\", skinPlayer, coords) \
             VALUES (?1, ?2, ?3, ?4, 0, 'user', ?5, ?6)",
            rusqlite::params![
                charidentifier,
                steamname,
                firstname,
                lastname,
                skin_player,
                coords
            ],
        )?;
        Ok(())
    }

    pub fn seed_item(&mut self, item: &str, label: &str) -> Result<(), StorageError> {
        self.store.conn().execute(
            "INSERT INTO items (item, label) VALUES (?1, ?2)",
            rusqlite::params![item, label],
        )?;
        Ok(())
    }

    pub fn seed_animal(&mut self, name: &str) -> Result<i64, StorageError> {
        self.store.insert_animal(&AnimalFields {
            name: name.to_string(),
            ..AnimalFields::default()
        })
    }

    pub fn seed_product(
        &mut self,
        animal_id: i64,
        name: &str,
        anim: &str,
    ) -> Result<i64, StorageError> {
        self.store.insert_product(
            animal_id,
            &ProductFields {
                name: name.to_string(),
                anim: anim.to_string(),
                ..ProductFields::default()
            },
        )
    }

    /// Read a character's persisted appearance blob back out.
    pub fn raw_skin(&self, charidentifier: i64) -> Result<String, StorageError> {
        let skin: String = self.store.conn().query_row(
            "SELECT skinPlayer FROM characters WHERE charidentifier = ?1",
            rusqlite::params![charidentifier],
            |row| row.get(0),
        )?;
        Ok(skin)
    }

    /// Read a character's persisted coords column back out.
    pub fn raw_coords(&self, charidentifier: i64) -> Result<String, StorageError> {
        let coords: String = self.store.conn().query_row(
            "SELECT coords FROM characters WHERE charidentifier = ?1",
            rusqlite::params![charidentifier],
            |row| row.get(0),
        )?;
        Ok(coords)
    }
}
