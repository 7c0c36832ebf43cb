use log::debug;

use haven_storage::{AnimalFields, Store};

use crate::error::SessionError;

/// Edit session over one ranch animal row. A fresh session has no id until
/// the first save assigns one.
pub struct AnimalSession {
    animal_id: Option<i64>,
    pub fields: AnimalFields,
}

impl AnimalSession {
    pub fn new() -> Self {
        Self {
            animal_id: None,
            fields: AnimalFields::default(),
        }
    }

    pub fn open(store: &impl Store, animal_id: i64) -> Result<Self, SessionError> {
        let record = store
            .get_animal(animal_id)?
            .ok_or(SessionError::AnimalNotFound(animal_id))?;
        Ok(Self {
            animal_id: Some(record.animal_id),
            fields: record.fields,
        })
    }

    pub fn animal_id(&self) -> Option<i64> {
        self.animal_id
    }

    /// Validate and persist; inserts on the first save and records the
    /// assigned id on the session. Returns the animal id.
    pub fn save(&mut self, store: &mut impl Store) -> Result<i64, SessionError> {
        if self.fields.name.trim().is_empty() {
            return Err(SessionError::validation("name", "must not be empty"));
        }
        let mut fields = self.fields.clone();
        fields.name = fields.name.trim().to_string();
        fields.model = fields.model.trim().to_string();
        fields.m_model = fields.m_model.trim().to_string();
        fields.kibble = fields.kibble.trim().to_string();
        fields.poop = fields.poop.trim().to_string();

        let animal_id = match self.animal_id {
            Some(id) => {
                store.update_animal(id, &fields)?;
                id
            }
            None => {
                let id = store.insert_animal(&fields)?;
                self.animal_id = Some(id);
                id
            }
        };
        debug!("saved animal {animal_id}");
        Ok(animal_id)
    }
}

impl Default for AnimalSession {
    fn default() -> Self {
        Self::new()
    }
}
