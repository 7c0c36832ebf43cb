//! Binary entrypoint for the haven-admin CLI.
//!
//! Commands mirror the editor's screens one-to-one:
//! - `characters` / `character show|set` - the character list and editor
//! - `animals` / `animal show|add|set|delete` - ranch animal management
//! - `products` / `product show|add|set|delete` - animal product management
//! - `items` - the inventory item lookup

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

mod config;
mod render;

use haven_core::{flatten, tree};
use haven_session::{AnimalSession, CharacterSession, ProductSession};
use haven_storage::{AnimalFields, Gender, GatherMethod, SqliteStore, Store};

#[derive(Parser)]
#[command(name = "haven-admin")]
#[command(about = "Administration tool for the game server database")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "configmain.json", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List characters, optionally filtered
    Characters {
        /// Match against identifier, steam name, first or last name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Inspect or edit a single character
    #[command(subcommand)]
    Character(CharacterCmd),
    /// List ranch animals, optionally filtered
    Animals {
        /// Match against name and model columns
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Inspect or edit a single ranch animal
    #[command(subcommand)]
    Animal(AnimalCmd),
    /// List products configured for an animal
    Products { animal_id: i64 },
    /// Inspect or edit a single animal product
    #[command(subcommand)]
    Product(ProductCmd),
    /// List inventory items, optionally filtered
    Items {
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum CharacterCmd {
    /// Show a character's fields and appearance
    Show {
        charidentifier: i64,
        /// Render the appearance blob as a tree instead of flat fields
        #[arg(long)]
        tree: bool,
    },
    /// Edit fields and save
    Set {
        charidentifier: i64,
        #[arg(long)]
        money: Option<f64>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        firstname: Option<String>,
        #[arg(long)]
        lastname: Option<String>,
        /// Position as a JSON object
        #[arg(long)]
        coords: Option<String>,
        /// Fill coords from a named safecoords preset
        #[arg(long)]
        preset: Option<String>,
        /// Appearance field edit, PATH=TEXT (repeatable)
        #[arg(long = "skin", value_name = "PATH=TEXT")]
        skin: Vec<String>,
    },
}

#[derive(Args)]
struct AnimalArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<i64>,
    /// Female model
    #[arg(long)]
    model: Option<String>,
    /// Male model
    #[arg(long)]
    m_model: Option<String>,
    #[arg(long)]
    health: Option<i64>,
    #[arg(long)]
    adult_age: Option<i64>,
    #[arg(long)]
    walk_only: Option<bool>,
    #[arg(long)]
    offset_x: Option<f64>,
    #[arg(long)]
    offset_y: Option<f64>,
    #[arg(long)]
    offset_z: Option<f64>,
    #[arg(long)]
    food: Option<i64>,
    #[arg(long)]
    water: Option<i64>,
    #[arg(long)]
    food_max: Option<i64>,
    #[arg(long)]
    water_max: Option<i64>,
    #[arg(long)]
    kibble: Option<String>,
    #[arg(long)]
    kibble_food: Option<i64>,
    #[arg(long)]
    poop: Option<String>,
    #[arg(long)]
    poop_chance: Option<f64>,
    #[arg(long)]
    die_age: Option<i64>,
    #[arg(long)]
    pregnancy_time: Option<i64>,
    #[arg(long)]
    pregnancy_chance: Option<i64>,
    #[arg(long)]
    no_fuck_time: Option<i64>,
}

#[derive(Subcommand)]
enum AnimalCmd {
    /// Show an animal and its configured products
    Show { animal_id: i64 },
    /// Create a new animal
    Add {
        #[command(flatten)]
        args: AnimalArgs,
    },
    /// Edit an existing animal
    Set {
        animal_id: i64,
        #[command(flatten)]
        args: AnimalArgs,
    },
    /// Delete an animal (its products go with it)
    Delete { animal_id: i64 },
}

#[derive(Args)]
struct ProductArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    item: Option<String>,
    #[arg(long)]
    prop: Option<String>,
    /// kill, gather or pickup
    #[arg(long)]
    gather: Option<String>,
    #[arg(long)]
    amount: Option<i64>,
    /// 0 clears the cap
    #[arg(long)]
    max_amount: Option<i64>,
    #[arg(long)]
    lifetime: Option<i64>,
    #[arg(long)]
    tool: Option<String>,
    #[arg(long)]
    chance: Option<i64>,
    /// male, female or none
    #[arg(long)]
    gender: Option<String>,
    /// Animation field edit, PATH=TEXT (repeatable)
    #[arg(long = "anim", value_name = "PATH=TEXT")]
    anim: Vec<String>,
}

#[derive(Subcommand)]
enum ProductCmd {
    /// Show a product including its animation fields
    Show { product_id: i64 },
    /// Create a new product for an animal
    Add {
        animal_id: i64,
        #[command(flatten)]
        args: ProductArgs,
    },
    /// Edit an existing product
    Set {
        product_id: i64,
        #[command(flatten)]
        args: ProductArgs,
    },
    /// Delete a product
    Delete { product_id: i64 },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let app_config = config::AppConfig::load(&cli.config)?;
    let mut store = SqliteStore::open(&app_config.database.path)?;

    match cli.command {
        Commands::Characters { search } => {
            let rows = match search.as_deref() {
                Some(query) => store.search_characters(query)?,
                None => store.list_characters()?,
            };
            for record in &rows {
                render::print_character_row(record);
            }
            println!("{} character(s)", rows.len());
        }

        Commands::Character(CharacterCmd::Show {
            charidentifier,
            tree: as_tree,
        }) => {
            let record = store
                .get_character(charidentifier)?
                .with_context(|| format!("character {charidentifier} not found"))?;
            render::print_character_row(&record);
            println!("group: {}", record.group);
            println!("coords: {}", record.coords);
            if as_tree {
                let doc = serde_json::from_str(&record.skin_player)
                    .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()));
                render::print_tree(&tree::project("skinPlayer", &doc), 0);
            } else {
                println!("skinPlayer:");
                render::print_fields(&flatten(&record.skin_player));
            }
        }

        Commands::Character(CharacterCmd::Set {
            charidentifier,
            money,
            group,
            firstname,
            lastname,
            coords,
            preset,
            skin,
        }) => {
            let mut session = CharacterSession::open(&store, charidentifier)?;
            if let Some(v) = money {
                session.money = v;
            }
            if let Some(v) = group {
                session.group = v;
            }
            if let Some(v) = firstname {
                session.firstname = v;
            }
            if let Some(v) = lastname {
                session.lastname = v;
            }
            if let Some(v) = coords {
                session.coords = v;
            }
            if let Some(name) = preset {
                let presets = config::load_safecoords(&app_config.safecoords);
                session.apply_preset(&name, &presets)?;
            }
            for edit in &skin {
                let (path, text) = parse_field_edit(edit)?;
                session.set_skin_field(path, text);
            }
            session.save(&mut store)?;
            println!("saved character {charidentifier}");
        }

        Commands::Animals { search } => {
            let rows = store.list_animals(search.as_deref())?;
            for record in &rows {
                render::print_animal_row(record);
            }
            println!("{} animal(s)", rows.len());
        }

        Commands::Animal(AnimalCmd::Show { animal_id }) => {
            let record = store
                .get_animal(animal_id)?
                .with_context(|| format!("animal {animal_id} not found"))?;
            render::print_animal_row(&record);
            let f = &record.fields;
            println!(
                "price={} health={} adultAge={} walkOnly={}",
                f.price, f.health, f.adult_age, f.walk_only
            );
            println!(
                "offset=({}, {}, {}) food={}/{} water={}/{}",
                f.offset_x, f.offset_y, f.offset_z, f.food, f.food_max, f.water, f.water_max
            );
            println!(
                "kibble={} (food {}) poop={} (chance {})",
                f.kibble, f.kibble_food, f.poop, f.poop_chance
            );
            println!(
                "dieAge={} pregnancy={}/{}% noFuckTime={}",
                f.die_age, f.pregnancy_time, f.pregnancy_chance, f.no_fuck_time
            );
            let products = store.products_for_animal(animal_id)?;
            println!("{} product(s):", products.len());
            for product in &products {
                render::print_product_row(product);
            }
        }

        Commands::Animal(AnimalCmd::Add { args }) => {
            let mut session = AnimalSession::new();
            apply_animal_args(&mut session.fields, args);
            let animal_id = session.save(&mut store)?;
            println!("created animal {animal_id}");
        }

        Commands::Animal(AnimalCmd::Set { animal_id, args }) => {
            let mut session = AnimalSession::open(&store, animal_id)?;
            apply_animal_args(&mut session.fields, args);
            session.save(&mut store)?;
            println!("saved animal {animal_id}");
        }

        Commands::Animal(AnimalCmd::Delete { animal_id }) => {
            store.delete_animal(animal_id)?;
            println!("deleted animal {animal_id}");
        }

        Commands::Products { animal_id } => {
            let rows = store.products_for_animal(animal_id)?;
            for record in &rows {
                render::print_product_row(record);
            }
            println!("{} product(s)", rows.len());
        }

        Commands::Product(ProductCmd::Show { product_id }) => {
            let session = ProductSession::open(&store, product_id)?;
            println!(
                "[{product_id}] {} (animal {})",
                session.name,
                session.animal_id()
            );
            println!(
                "item={} prop={} tool={}",
                session.item,
                session.prop.as_deref().unwrap_or("-"),
                session.tool.as_deref().unwrap_or("-")
            );
            println!(
                "gather={} amount={} maxAmount={} lifetime={} chance={} gender={}",
                session.gather.as_str(),
                session.amount,
                session
                    .max_amount
                    .map_or_else(|| "-".to_string(), |v| v.to_string()),
                session.lifetime,
                session.chance,
                session.gender.map_or("-", |g| g.as_str())
            );
            println!("anim:");
            render::print_fields(session.anim());
        }

        Commands::Product(ProductCmd::Add { animal_id, args }) => {
            let mut session = ProductSession::new(animal_id);
            apply_product_args(&mut session, args)?;
            let product_id = session.save(&mut store)?;
            println!("created product {product_id}");
        }

        Commands::Product(ProductCmd::Set { product_id, args }) => {
            let mut session = ProductSession::open(&store, product_id)?;
            apply_product_args(&mut session, args)?;
            session.save(&mut store)?;
            println!("saved product {product_id}");
        }

        Commands::Product(ProductCmd::Delete { product_id }) => {
            store.delete_product(product_id)?;
            println!("deleted product {product_id}");
        }

        Commands::Items { search } => {
            let rows = store.list_items(search.as_deref())?;
            for record in &rows {
                render::print_item_row(record);
            }
            println!("{} item(s)", rows.len());
        }
    }

    Ok(())
}

fn parse_field_edit(edit: &str) -> Result<(&str, &str)> {
    match edit.split_once('=') {
        Some((path, text)) if !path.is_empty() => Ok((path, text)),
        _ => bail!("expected PATH=TEXT, got {edit:?}"),
    }
}

fn apply_animal_args(fields: &mut AnimalFields, args: AnimalArgs) {
    if let Some(v) = args.name {
        fields.name = v;
    }
    if let Some(v) = args.price {
        fields.price = v;
    }
    if let Some(v) = args.model {
        fields.model = v;
    }
    if let Some(v) = args.m_model {
        fields.m_model = v;
    }
    if let Some(v) = args.health {
        fields.health = v;
    }
    if let Some(v) = args.adult_age {
        fields.adult_age = v;
    }
    if let Some(v) = args.walk_only {
        fields.walk_only = v;
    }
    if let Some(v) = args.offset_x {
        fields.offset_x = v;
    }
    if let Some(v) = args.offset_y {
        fields.offset_y = v;
    }
    if let Some(v) = args.offset_z {
        fields.offset_z = v;
    }
    if let Some(v) = args.food {
        fields.food = v;
    }
    if let Some(v) = args.water {
        fields.water = v;
    }
    if let Some(v) = args.food_max {
        fields.food_max = v;
    }
    if let Some(v) = args.water_max {
        fields.water_max = v;
    }
    if let Some(v) = args.kibble {
        fields.kibble = v;
    }
    if let Some(v) = args.kibble_food {
        fields.kibble_food = v;
    }
    if let Some(v) = args.poop {
        fields.poop = v;
    }
    if let Some(v) = args.poop_chance {
        fields.poop_chance = v;
    }
    if let Some(v) = args.die_age {
        fields.die_age = v;
    }
    if let Some(v) = args.pregnancy_time {
        fields.pregnancy_time = v;
    }
    if let Some(v) = args.pregnancy_chance {
        fields.pregnancy_chance = v;
    }
    if let Some(v) = args.no_fuck_time {
        fields.no_fuck_time = v;
    }
}

fn apply_product_args(session: &mut ProductSession, args: ProductArgs) -> Result<()> {
    if let Some(v) = args.name {
        session.name = v;
    }
    if let Some(v) = args.item {
        session.item = v;
    }
    if let Some(v) = args.prop {
        session.prop = Some(v);
    }
    if let Some(v) = args.gather {
        session.gather = GatherMethod::parse(&v)?;
    }
    if let Some(v) = args.amount {
        session.amount = v;
    }
    if let Some(v) = args.max_amount {
        session.max_amount = Some(v);
    }
    if let Some(v) = args.lifetime {
        session.lifetime = v;
    }
    if let Some(v) = args.tool {
        session.tool = Some(v);
    }
    if let Some(v) = args.chance {
        session.chance = v;
    }
    if let Some(v) = args.gender {
        session.gender = match v.as_str() {
            "none" => None,
            other => Some(Gender::parse(other)?),
        };
    }
    for edit in &args.anim {
        let (path, text) = parse_field_edit(edit)?;
        session.set_anim_field(path, text);
    }
    Ok(())
}
