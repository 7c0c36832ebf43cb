use haven_core::{DisplayNode, FlatFieldSet};
use haven_storage::{AnimalRecord, CharacterRecord, ItemRecord, ProductRecord};

pub fn print_character_row(record: &CharacterRecord) {
    println!(
        "[{}] {} - {} {} (money={})",
        record.charidentifier,
        record.steamname,
        record.firstname,
        record.lastname,
        record.money
    );
}

pub fn print_animal_row(record: &AnimalRecord) {
    println!(
        "[{}] {} (model={}, m_model={})",
        record.animal_id, record.fields.name, record.fields.model, record.fields.m_model
    );
}

pub fn print_product_row(record: &ProductRecord) {
    println!(
        "[{}] {} item={} gather={} chance={}",
        record.product_id,
        record.fields.name,
        record.fields.item,
        record.fields.gather.as_str(),
        record.fields.chance
    );
}

pub fn print_item_row(record: &ItemRecord) {
    println!("{} - {}", record.item, record.label);
}

/// Print the editable surface of a blob, one `path = text` line each.
pub fn print_fields(fields: &FlatFieldSet) {
    if fields.is_empty() {
        println!("  (empty)");
        return;
    }
    for entry in fields {
        println!("  {} = {}", entry.path, entry.text);
    }
}

pub fn print_tree(node: &DisplayNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match &node.text {
        Some(text) => println!("{indent}{}: {text}", node.label),
        None => {
            println!("{indent}{}:", node.label);
            for child in &node.children {
                print_tree(child, depth + 1);
            }
        }
    }
}
