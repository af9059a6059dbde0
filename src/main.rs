use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use meal_plan_maker_rs::catalog::{import_foods_csv, load_catalog, save_catalog, Catalog, FoodRepository};
use meal_plan_maker_rs::cli::{Cli, Command, FoodsCommand, OutputFormat};
use meal_plan_maker_rs::config::AppConfig;
use meal_plan_maker_rs::error::{PlanError, Result};
use meal_plan_maker_rs::interface::{
    display_food, display_food_list, display_plan_summary, display_report, prompt_food_match,
    prompt_plan_request, prompt_yes_no,
};
use meal_plan_maker_rs::models::{FoodCategory, PlanRequest};
use meal_plan_maker_rs::planner::{generate_plan, PlannerConfig};
use meal_plan_maker_rs::report::{process_plan, write_items_csv};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = AppConfig::load_or_default(cli.config.as_ref())?;
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Plan {
            request,
            date,
            format,
            csv,
        } => cmd_plan(
            cli.catalog.as_deref(),
            config,
            request.as_deref(),
            date,
            format,
            csv.as_deref(),
        ),
        Command::Foods(foods) => cmd_foods(cli.catalog.as_deref(), &config.planner, foods),
        Command::Validate => cmd_validate(cli.catalog.as_deref(), &config.planner),
    }
}

/// Load the catalog file when given, the built-in one otherwise, and bind it
/// to the planner settings.
fn open_catalog(path: Option<&Path>, planner: &PlannerConfig) -> Result<Catalog> {
    let mut catalog = match path {
        Some(p) => {
            info!(path = %p.display(), "loading catalog");
            load_catalog(p)?
        }
        None => Catalog::builtin()?,
    };
    catalog.bind_planner(planner)?;
    Ok(catalog)
}

/// Catalog path for write commands. A missing file starts from the built-in catalog.
fn writable_catalog(path: Option<&Path>, planner: &PlannerConfig) -> Result<(PathBuf, Catalog)> {
    let path = path.ok_or_else(|| {
        PlanError::InvalidInput("this command needs --catalog <FILE> to write to".to_string())
    })?;
    let mut catalog = if path.exists() {
        load_catalog(path)?
    } else {
        info!(path = %path.display(), "catalog file not found, starting from built-in data");
        Catalog::builtin()?
    };
    catalog.bind_planner(planner)?;
    Ok((path.to_path_buf(), catalog))
}

/// Generate a meal plan and print it.
fn cmd_plan(
    catalog_path: Option<&Path>,
    config: AppConfig,
    request_path: Option<&Path>,
    date: Option<String>,
    format: OutputFormat,
    csv_path: Option<&Path>,
) -> Result<()> {
    let catalog = open_catalog(catalog_path, &config.planner)?;

    let request = match request_path {
        Some(p) => PlanRequest::from_json(&fs::read_to_string(p)?)?,
        None => prompt_plan_request(&catalog)?,
    };
    let (profile, goals) = request.validate()?;
    info!(
        patient = %profile.name,
        kcal = goals.total_kcal,
        meals = goals.meal_count,
        "generating plan"
    );

    let record = generate_plan(&catalog, &profile, &goals, &config.planner)?;

    let mut formatter = config.formatter;
    if date.is_some() {
        formatter.date = date;
    }

    match format {
        OutputFormat::Text => {
            let report = process_plan(&record, &formatter)?;
            display_report(&report);
            println!();
            display_plan_summary(&record);
        }
        OutputFormat::Json => {
            let report = process_plan(&record, &formatter)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Record => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    if let Some(path) = csv_path {
        write_items_csv(&record, path)?;
        info!(path = %path.display(), "wrote plan items");
    }

    Ok(())
}

fn cmd_foods(
    catalog_path: Option<&Path>,
    planner: &PlannerConfig,
    command: FoodsCommand,
) -> Result<()> {
    match command {
        FoodsCommand::List { category } => {
            let catalog = open_catalog(catalog_path, planner)?;
            match category {
                Some(tag) => {
                    let category = FoodCategory::parse(&tag).ok_or_else(|| {
                        PlanError::InvalidInput(format!("unknown category '{}'", tag))
                    })?;
                    let foods = catalog.foods().by_category(category);
                    display_food_list(&foods, &format!("Foods: {}", category));
                }
                None => display_food_list(&catalog.list(), "Foods"),
            }
            Ok(())
        }
        FoodsCommand::Show { id } => {
            let catalog = open_catalog(catalog_path, planner)?;
            match catalog.get(&id) {
                Some(food) => display_food(food),
                None => match prompt_food_match(&catalog, &id)? {
                    Some(food) => display_food(food),
                    None => return Err(PlanError::FoodNotFound(id)),
                },
            }
            Ok(())
        }
        FoodsCommand::Import { path } => {
            let (catalog_file, mut catalog) = writable_catalog(catalog_path, planner)?;
            let foods = import_foods_csv(&path)?;

            let (mut added, mut updated) = (0, 0);
            for food in foods {
                match catalog.upsert(food)? {
                    Some(_) => updated += 1,
                    None => added += 1,
                }
            }
            catalog.validate_for(planner)?;
            save_catalog(&catalog_file, &catalog)?;
            println!(
                "Imported {} foods ({} new, {} updated). Catalog saved to {}.",
                added + updated,
                added,
                updated,
                catalog_file.display()
            );
            Ok(())
        }
        FoodsCommand::Delete { id, yes } => {
            let (catalog_file, mut catalog) = writable_catalog(catalog_path, planner)?;
            let name = catalog.require(&id)?.name.clone();

            if !yes && !prompt_yes_no(&format!("Delete '{}' ({})?", name, id), false)? {
                println!("Nothing deleted.");
                return Ok(());
            }

            catalog.delete(&id)?;
            save_catalog(&catalog_file, &catalog)?;
            println!("Deleted {}. Catalog saved to {}.", id, catalog_file.display());
            Ok(())
        }
    }
}

/// Check the catalog for broken references, including the planner's own foods.
fn cmd_validate(catalog_path: Option<&Path>, planner: &PlannerConfig) -> Result<()> {
    let catalog = open_catalog(catalog_path, planner)?;
    println!(
        "Catalog OK: {} foods, {} components.",
        catalog.foods().len(),
        catalog.components().count()
    );
    Ok(())
}
