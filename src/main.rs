//! carddb - card catalog command line tool
//!
//! Builds the XML card database from oracle text files, inspects it and
//! renders card images.

use anyhow::{bail, Context};
use card_catalog::{
    logging::LoggingConfig,
    settings::{sort_key_path, TomlSettings},
    CardStore, ImageSize,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "carddb")]
#[command(about = "Card catalog - build, inspect and render the card database", long_about = None)]
struct Cli {
    /// Settings file (sort keys, image and database paths)
    #[arg(long, global = true, default_value = "carddb.toml")]
    settings: PathBuf,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format: pretty or json
    #[arg(long, global = true, default_value = "pretty")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import every <SET>_<Name>.txt oracle file in a directory and save the database
    Import {
        /// Directory containing oracle text files
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Database file to write
        #[arg(long, short = 'o', value_name = "XML")]
        output: PathBuf,
    },

    /// Print set and card counts of a database
    Info {
        #[arg(value_name = "XML")]
        database: PathBuf,
    },

    /// Print one card's attributes
    Show {
        #[arg(value_name = "XML")]
        database: PathBuf,

        /// Card name
        name: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Render a card image to a file
    Render {
        #[arg(value_name = "XML")]
        database: PathBuf,

        /// Card name (empty for the card back)
        name: String,

        /// Image directory (default: paths/pics from settings)
        #[arg(long, value_name = "DIR")]
        pics: Option<PathBuf>,

        /// Image file extension (default: paths/picsext from settings)
        #[arg(long)]
        ext: Option<String>,

        #[arg(long, default_value_t = 250)]
        width: u32,

        #[arg(long, default_value_t = 350)]
        height: u32,

        /// Output image file (format from extension)
        #[arg(long, short = 'o', value_name = "FILE")]
        output: PathBuf,
    },

    /// Persist a set's sort key (lower keys are preferred for artwork)
    SortKey {
        /// Set short name
        set: String,

        value: u32,
    },
}

fn open_store(settings: &Path) -> anyhow::Result<CardStore> {
    let settings = TomlSettings::open(settings)
        .with_context(|| format!("failed to open settings {}", settings.display()))?;
    Ok(CardStore::new(Box::new(settings)))
}

fn load_store(settings: &Path, database: &Path) -> anyhow::Result<CardStore> {
    let settings = TomlSettings::open(settings)
        .with_context(|| format!("failed to open settings {}", settings.display()))?;
    CardStore::open(Box::new(settings), database)
        .with_context(|| format!("failed to load {}", database.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    LoggingConfig {
        level: cli.log_level.clone(),
        format: cli.log_format.clone(),
    }
    .init();

    match cli.command {
        Commands::Import { dir, output } => {
            let mut store = open_store(&cli.settings)?;
            let cards = store
                .import_all_from_directory(&dir)
                .with_context(|| format!("failed to read {}", dir.display()))?;
            store
                .save_to_file(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "Imported {cards} cards in {} sets into {}",
                store.set_count(),
                output.display()
            );
        }
        Commands::Info { database } => {
            let store = load_store(&cli.settings, &database)?;
            println!("{} cards in {} sets", store.card_count(), store.set_count());

            let mut sets: Vec<_> = store.sets().map(|(_, s)| s).collect();
            sets.sort_by_key(|s| s.sort_key());
            for set in sets {
                println!(
                    "  [{:>3}] {:<6} {} ({} cards)",
                    set.sort_key(),
                    set.short_name(),
                    set.long_name(),
                    set.cards().len()
                );
            }
        }
        Commands::Show {
            database,
            name,
            json,
        } => {
            let store = load_store(&cli.settings, &database)?;
            let Some(id) = store.find(&name) else {
                bail!("card '{name}' not found in {}", database.display());
            };
            let card = store.card(id);
            let sets = store.set_names(id);

            if json {
                let value = serde_json::json!({
                    "card": card,
                    "main_type": card.main_card_type(),
                    "sets": sets,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", card.name());
                println!("  Cost:  {}", card.mana_cost);
                println!("  Type:  {} ({})", card.card_type, card.main_card_type());
                if !card.power_toughness.is_empty() {
                    println!("  P/T:   {}", card.power_toughness);
                }
                println!("  Row:   {}", card.table_row);
                println!("  Sets:  {}", sets.join(", "));
                for line in card.text.lines() {
                    println!("  | {line}");
                }
            }
        }
        Commands::Render {
            database,
            name,
            pics,
            ext,
            width,
            height,
            output,
        } => {
            let mut store = load_store(&cli.settings, &database)?;
            if let Some(pics) = pics {
                store.set_image_root_path(pics);
            }
            if let Some(ext) = ext {
                store.set_image_extension(&ext);
            }
            let Some(id) = store.find(&name) else {
                bail!("card '{name}' not found in {}", database.display());
            };
            let image = store.card_image(id, ImageSize::new(width, height))?;
            image
                .save(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Wrote {}x{} image to {}", width, height, output.display());
        }
        Commands::SortKey { set, value } => {
            let mut store = open_store(&cli.settings)?;
            let id = store.resolve_set(&set);
            store.set_sort_key(id, value)?;
            println!(
                "{set} sort key = {} (saved to {})",
                store.settings().get_u32(&sort_key_path(&set), 0),
                cli.settings.display()
            );
        }
    }

    Ok(())
}
