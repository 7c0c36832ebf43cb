use haven_harness::TestStore;
use haven_session::{AnimalSession, ProductSession, SessionError};
use haven_storage::{Gender, GatherMethod, Store};
use serde_json::json;

// ============================================================================
// Animals
// ============================================================================

#[test]
fn first_save_inserts_and_assigns_an_id() -> Result<(), Box<dyn std::error::Error>> {
    let mut harness = TestStore::new()?;

    let mut session = AnimalSession::new();
    assert_eq!(session.animal_id(), None);
    session.fields.name = "Chicken".to_string();
    session.fields.price = 25;
    session.fields.model = "a_c_chicken_01".to_string();

    let animal_id = session.save(&mut harness.store)?;
    assert_eq!(session.animal_id(), Some(animal_id));

    let record = harness.store.get_animal(animal_id)?.unwrap();
    assert_eq!(record.fields.name, "Chicken");
    assert_eq!(record.fields.price, 25);
    Ok(())
}

#[test]
fn second_save_updates_in_place() -> Result<(), Box<dyn std::error::Error>> {
    let mut harness = TestStore::new()?;
    let animal_id = harness.seed_animal("Goat")?;

    let mut session = AnimalSession::open(&harness.store, animal_id)?;
    session.fields.health = 150;
    session.fields.walk_only = true;
    let saved_id = session.save(&mut harness.store)?;
    assert_eq!(saved_id, animal_id);

    let record = harness.store.get_animal(animal_id)?.unwrap();
    assert_eq!(record.fields.health, 150);
    assert!(record.fields.walk_only);
    assert_eq!(harness.store.list_animals(None)?.len(), 1);
    Ok(())
}

#[test]
fn empty_name_blocks_the_save() -> Result<(), Box<dyn std::error::Error>> {
    let mut harness = TestStore::new()?;
    let mut session = AnimalSession::new();
    session.fields.name = "   ".to_string();

    match session.save(&mut harness.store) {
        Err(SessionError::Validation { field, .. }) => assert_eq!(field, "name"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(harness.store.list_animals(None)?.is_empty());
    Ok(())
}

#[test]
fn animal_search_matches_models() -> Result<(), Box<dyn std::error::Error>> {
    let mut harness = TestStore::new()?;
    harness.seed_animal("Chicken")?;
    let mut session = AnimalSession::new();
    session.fields.name = "Pig".to_string();
    session.fields.m_model = "a_c_pig_01".to_string();
    session.save(&mut harness.store)?;

    assert_eq!(harness.store.list_animals(Some("pig_01"))?.len(), 1);
    assert_eq!(harness.store.list_animals(Some("Chick"))?.len(), 1);
    assert_eq!(harness.store.list_animals(Some("horse"))?.len(), 0);
    Ok(())
}

// ============================================================================
// Products
// ============================================================================

#[test]
fn product_anim_fields_round_trip_through_the_codec()
-> Result<(), Box<dyn std::error::Error>> {
    let mut harness = TestStore::new()?;
    let animal_id = harness.seed_animal("Chicken")?;

    let mut session = ProductSession::new(animal_id);
    session.name = "Egg".to_string();
    session.item = "consumable_egg".to_string();
    session.gather = GatherMethod::Pickup;
    session.set_anim_field("dict", "amb_creatures_bird");
    session.set_anim_field("name", "pickup_low");
    session.set_anim_field("time", "4000");
    let product_id = session.save(&mut harness.store)?;

    // The persisted blob carries inferred types, not display text.
    let record = harness.store.get_product(product_id)?.unwrap();
    let anim: serde_json::Value = serde_json::from_str(&record.fields.anim)?;
    assert_eq!(
        anim,
        json!({"dict": "amb_creatures_bird", "name": "pickup_low", "time": 4000})
    );

    // Reopening flattens it back to the same editable surface.
    let reopened = ProductSession::open(&harness.store, product_id)?;
    assert_eq!(reopened.anim().get("dict"), Some("amb_creatures_bird"));
    assert_eq!(reopened.anim().get("time"), Some("4000"));
    Ok(())
}

#[test]
fn max_amount_zero_is_stored_as_unset() -> Result<(), Box<dyn std::error::Error>> {
    let mut harness = TestStore::new()?;
    let animal_id = harness.seed_animal("Cow")?;

    let mut session = ProductSession::new(animal_id);
    session.name = "Milk".to_string();
    session.max_amount = Some(0);
    let product_id = session.save(&mut harness.store)?;

    let record = harness.store.get_product(product_id)?.unwrap();
    assert_eq!(record.fields.max_amount, None);
    Ok(())
}

#[test]
fn gather_and_gender_codes_persist() -> Result<(), Box<dyn std::error::Error>> {
    let mut harness = TestStore::new()?;
    let animal_id = harness.seed_animal("Cow")?;

    let mut session = ProductSession::new(animal_id);
    session.name = "Milk".to_string();
    session.gather = GatherMethod::Gather;
    session.gender = Some(Gender::Female);
    session.tool = Some("bucket".to_string());
    let product_id = session.save(&mut harness.store)?;

    let record = harness.store.get_product(product_id)?.unwrap();
    assert_eq!(record.fields.gather, GatherMethod::Gather);
    assert_eq!(record.fields.gender, Some(Gender::Female));
    assert_eq!(record.fields.tool.as_deref(), Some("bucket"));
    Ok(())
}

#[test]
fn blank_optional_texts_are_stored_as_null() -> Result<(), Box<dyn std::error::Error>> {
    let mut harness = TestStore::new()?;
    let animal_id = harness.seed_animal("Cow")?;

    let mut session = ProductSession::new(animal_id);
    session.name = "Hide".to_string();
    session.prop = Some("   ".to_string());
    session.tool = Some(String::new());
    let product_id = session.save(&mut harness.store)?;

    let record = harness.store.get_product(product_id)?.unwrap();
    assert_eq!(record.fields.prop, None);
    assert_eq!(record.fields.tool, None);
    Ok(())
}

#[test]
fn products_list_and_delete() -> Result<(), Box<dyn std::error::Error>> {
    let mut harness = TestStore::new()?;
    let animal_id = harness.seed_animal("Chicken")?;
    let first = harness.seed_product(animal_id, "Egg", "{}")?;
    let second = harness.seed_product(animal_id, "Feather", "{}")?;

    let products = harness.store.products_for_animal(animal_id)?;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].product_id, first);

    harness.store.delete_product(first)?;
    assert_eq!(harness.store.products_for_animal(animal_id)?.len(), 1);
    assert_eq!(
        harness.store.products_for_animal(animal_id)?[0].product_id,
        second
    );
    Ok(())
}

#[test]
fn opening_a_missing_product_fails() -> Result<(), Box<dyn std::error::Error>> {
    let harness = TestStore::new()?;
    assert!(matches!(
        ProductSession::open(&harness.store, 42),
        Err(SessionError::ProductNotFound(42))
    ));
    Ok(())
}

// ============================================================================
// Item lookup
// ============================================================================

#[test]
fn item_lookup_filters_by_fragment() -> Result<(), Box<dyn std::error::Error>> {
    let mut harness = TestStore::new()?;
    harness.seed_item("consumable_egg", "Egg")?;
    harness.seed_item("bucket", "Milking Bucket")?;

    assert_eq!(harness.store.list_items(None)?.len(), 2);
    let hits = harness.store.list_items(Some("egg"))?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].item, "consumable_egg");
    Ok(())
}
