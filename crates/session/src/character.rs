use log::debug;
use serde_json::Value;

use haven_core::{FlatFieldSet, flatten, reconstruct};
use haven_storage::{CharacterUpdate, Store};

use crate::error::SessionError;

/// Named coordinate presets loaded from the safe-coordinates file:
/// preset name -> coordinate object.
pub type SafeCoordMap = serde_json::Map<String, Value>;

/// Edit session over one `characters` row. The appearance blob is held as a
/// flat field set owned by this session.
pub struct CharacterSession {
    charidentifier: i64,
    steamname: String,
    pub money: f64,
    pub group: String,
    pub coords: String,
    pub firstname: String,
    pub lastname: String,
    skin: FlatFieldSet,
}

impl CharacterSession {
    pub fn open(store: &impl Store, charidentifier: i64) -> Result<Self, SessionError> {
        let record = store
            .get_character(charidentifier)?
            .ok_or(SessionError::CharacterNotFound(charidentifier))?;
        debug!("opened character {charidentifier}");
        Ok(Self {
            charidentifier: record.charidentifier,
            steamname: record.steamname,
            money: record.money,
            group: record.group,
            coords: record.coords,
            firstname: record.firstname,
            lastname: record.lastname,
            skin: flatten(&record.skin_player),
        })
    }

    pub fn charidentifier(&self) -> i64 {
        self.charidentifier
    }

    /// Read-only in the editor, shown for identification.
    pub fn steamname(&self) -> &str {
        &self.steamname
    }

    pub fn skin(&self) -> &FlatFieldSet {
        &self.skin
    }

    /// Overwrite one appearance field's text; unknown paths are appended.
    pub fn set_skin_field(&mut self, path: &str, text: &str) {
        self.skin.set(path, text);
    }

    /// Fill the coords text from a named preset.
    pub fn apply_preset(
        &mut self,
        name: &str,
        presets: &SafeCoordMap,
    ) -> Result<(), SessionError> {
        let coords = presets
            .get(name)
            .ok_or_else(|| SessionError::UnknownPreset(name.to_string()))?;
        self.coords = coords.to_string();
        Ok(())
    }

    /// Validate and persist. Validation failures block the save before
    /// storage is touched; on any failure the session keeps its state so
    /// the save can be retried.
    pub fn save(&self, store: &mut impl Store) -> Result<(), SessionError> {
        let coords = self.coords.trim();
        if serde_json::from_str::<Value>(coords).is_err() {
            return Err(SessionError::validation("coords", "not valid JSON"));
        }

        let update = CharacterUpdate {
            charidentifier: self.charidentifier,
            money: self.money,
            group: self.group.trim().to_string(),
            coords: coords.to_string(),
            firstname: self.firstname.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            skin_player: reconstruct(&self.skin),
        };
        store.update_character(&update)?;
        debug!("saved character {}", self.charidentifier);
        Ok(())
    }
}
