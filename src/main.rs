//! Crafting goal planner CLI
//!
//! Goals and stash are kept in a SQLite database; the item catalog is read
//! from JSON on every run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use craft_planner::calculator::{self, format_tree};
use craft_planner::config::{MAX_DEPTH, ResolverConfig};
use craft_planner::{Catalog, Selection, StashToggle, db, load_catalog, resolve, salvage, sample};

#[derive(Parser)]
#[command(name = "craft-planner")]
#[command(about = "Work out the base materials needed for a set of crafting goals")]
struct Cli {
    /// Path to the SQLite database holding goals and stash
    #[arg(short, long, default_value = "craft_planner.db")]
    database: PathBuf,

    /// Item catalog: a JSON file or a directory of JSON files
    #[arg(short, long, default_value = "items.json")]
    catalog: PathBuf,

    /// Recipe expansion depth ceiling
    #[arg(long, default_value_t = MAX_DEPTH)]
    max_depth: usize,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize empty database with schema
    Init,

    /// Write the built-in sample catalog as JSON
    Sample {
        /// Output file
        #[arg(default_value = "items.json")]
        path: PathBuf,
    },

    /// Edit the goal list
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Toggle whether an item is already in the stash
    Stash {
        /// Item ID
        id: String,
    },

    /// Show goals and stash
    Status,

    /// Calculate the materials required for all enabled goals
    Calc {
        /// Show the crafting tree of every goal
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show which goals need an item
    Needs {
        /// Item ID
        id: String,
    },

    /// Show items that salvage or recycle into an item
    Sources {
        /// Item ID
        id: String,
    },

    /// List all items in the catalog
    ListItems,
}

#[derive(Subcommand)]
enum GoalAction {
    /// Add a crafting goal
    Add { id: String },
    /// Remove a crafting goal
    Remove { id: String },
    /// Enable or disable a goal without removing it
    Toggle { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ResolverConfig {
        max_depth: cli.max_depth,
        ..ResolverConfig::default()
    };

    let mut conn = Connection::open(&cli.database)
        .with_context(|| format!("Failed to open database {}", cli.database.display()))?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::Sample { path } => {
            let json = serde_json::to_string_pretty(&sample::sample_items())?;
            fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Sample catalog written to: {}", path.display());
        }

        Commands::Goal { action } => {
            let mut selection = db::load_selection(&conn)?;
            match action {
                GoalAction::Add { id } => {
                    if !open_catalog(&cli.catalog)?.contains(&id) {
                        warn!("'{}' is not in the catalog, adding anyway", id);
                    }
                    if selection.add_goal(&id) {
                        println!("Added goal: {}", id);
                    } else {
                        println!("'{}' is already a goal", id);
                    }
                }
                GoalAction::Remove { id } => {
                    if selection.remove_goal(&id) {
                        println!("Removed goal: {}", id);
                    } else {
                        println!("'{}' is not a goal", id);
                    }
                }
                GoalAction::Toggle { id } => match selection.toggle_disabled(&id) {
                    Some(true) => println!("Disabled goal: {}", id),
                    Some(false) => println!("Enabled goal: {}", id),
                    None => println!("'{}' is not a goal", id),
                },
            }
            db::save_selection(&mut conn, &selection)?;
        }

        Commands::Stash { id } => {
            let mut selection = db::load_selection(&conn)?;
            match selection.toggle_stash(&id) {
                StashToggle::Added => println!("Stashed: {}", id),
                StashToggle::Removed => println!("Removed from stash: {}", id),
                StashToggle::RejectedGoal => println!("'{}' is a goal and cannot be stashed", id),
            }
            db::save_selection(&mut conn, &selection)?;
        }

        Commands::Status => {
            let selection = db::load_selection(&conn)?;
            print_status(&selection);
        }

        Commands::Calc { verbose } => {
            let catalog = open_catalog(&cli.catalog)?;
            let selection = db::load_selection(&conn)?;
            let resolution = resolve(&catalog, &selection, &config);

            if resolution.trees.is_empty() {
                println!("No enabled goals. Add one with 'goal add <id>'.");
                return Ok(());
            }

            if verbose {
                println!("Crafting trees:\n");
                for tree in &resolution.trees {
                    println!("{}", format_tree(tree, &catalog));
                }
            }

            let summary = calculator::summarize(&resolution.trees, &catalog);
            println!("{}", summary);
        }

        Commands::Needs { id } => {
            let catalog = open_catalog(&cli.catalog)?;
            let selection = db::load_selection(&conn)?;
            let resolution = resolve(&catalog, &selection, &config);
            let map = &resolution.reverse_map;

            let usages = map.usages(&id);
            if usages.is_empty() {
                println!("No enabled goal needs '{}'", catalog.display_name(&id));
            } else {
                println!("{} is needed by:", catalog.display_name(&id));
                for usage in usages {
                    let goals: Vec<&str> = usage
                        .goal_item_ids
                        .iter()
                        .map(|g| catalog.display_name(g))
                        .collect();
                    println!("  {:>5}x for {}", usage.quantity, goals.join(", "));
                }
                println!(
                    "Total: {} across {} goals (priority: {:?})",
                    map.total_quantity(&id),
                    map.goal_count(&id),
                    map.priority(&id, &config)
                );
            }
        }

        Commands::Sources { id } => {
            let catalog = open_catalog(&cli.catalog)?;
            let selection = db::load_selection(&conn)?;
            let goal_ids = selection.enabled_goals().cloned().collect();
            let sources = salvage::find_sources(&id, &catalog, &goal_ids);

            if sources.is_empty() {
                println!("Nothing breaks down into '{}'", catalog.display_name(&id));
            } else {
                println!("{} can be obtained from:", catalog.display_name(&id));
                for source in sources {
                    println!("  {} ({})", catalog.display_name(&source.item_id), source.method);
                }
            }
        }

        Commands::ListItems => {
            let catalog = open_catalog(&cli.catalog)?;
            if catalog.is_empty() {
                println!("No items in catalog. Run 'sample' to write a demo catalog.");
            } else {
                println!("{:<24} {:<20} {:<10} {:>7}", "Item", "Type", "Rarity", "Recipe");
                println!("{}", "-".repeat(64));
                for item in catalog.iter() {
                    println!(
                        "{:<24} {:<20} {:<10} {:>7}",
                        item.name,
                        item.item_type,
                        format!("{:?}", item.rarity),
                        if item.has_recipe() { "yes" } else { "-" }
                    );
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("craft_planner={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_catalog(path: &Path) -> Result<Catalog> {
    let (catalog, stats) =
        load_catalog(path).with_context(|| format!("Failed to load catalog {}", path.display()))?;
    tracing::info!("{}", stats);
    Ok(catalog)
}

fn print_status(selection: &Selection) {
    if selection.goals().is_empty() {
        println!("No goals.");
    } else {
        println!("Goals:");
        for goal in selection.goals() {
            let mark = if selection.is_disabled(goal) { " (disabled)" } else { "" };
            println!("  {}{}", goal, mark);
        }
    }

    let mut stash: Vec<_> = selection.stash().iter().collect();
    stash.sort();
    if stash.is_empty() {
        println!("Stash is empty.");
    } else {
        println!("Stash:");
        for id in stash {
            println!("  {}", id);
        }
    }
}
