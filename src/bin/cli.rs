//! MacroFacts CLI
//!
//! Command-line front end for the MacroFacts nutrition tracker:
//! - Sign in and out
//! - Show today's dashboard
//! - Search foods, look up barcodes, create custom foods
//! - Log entries into meals
//! - Manage goals, timezone and theme

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use macrofacts::add_food::AddFoodFlow;
use macrofacts::config::{generate_default_config, Config, LoggingConfig};
use macrofacts::forms::{default_quantity, log_entry_request, AuthForm, AuthMode, CustomFoodForm};
use macrofacts::preview::NutritionPreview;
use macrofacts::theme::detect_system_dark_mode;
use macrofacts::today::DashboardView;
use macrofacts::{
    ApiClient, DebouncedSearch, FileStore, FoodRecord, FoodSource, MealSlot, MeSettings,
    ReqwestTransport, SearchState, ThemeController, UpdateSettingsRequest,
};

type Client = ApiClient<ReqwestTransport, Arc<FileStore>>;

#[derive(Parser)]
#[command(name = "macrofacts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track calories and macros from the terminal")]
#[command(long_about = "MacroFacts client.\nLog meals, search foods and keep an eye on today's calories and macros.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and sign in
    Register {
        username: String,
        /// Password (default: $MACROFACTS_PASSWORD or prompt)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign in and store the session token
    Login {
        username: String,
        /// Password (default: $MACROFACTS_PASSWORD or prompt)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Today's calories, macros and meals
    Today,

    /// Search foods once
    Search {
        query: String,
        #[arg(short, long, default_value = "20")]
        limit: u32,
        /// Cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
    },

    /// Interactive search: each stdin line is a keystroke-level query update
    Find,

    /// Look up a food by barcode
    Barcode {
        code: String,
        /// Show nutrition for this many grams
        #[arg(short, long)]
        grams: Option<f64>,
    },

    /// Log a food into a meal
    Log {
        /// breakfast, lunch, dinner or snacks
        #[arg(short, long, default_value = "breakfast")]
        meal: MealSlot,
        /// Catalog food by barcode
        #[arg(long, conflicts_with = "food_id", required_unless_present = "food_id")]
        barcode: Option<String>,
        /// Custom food by id
        #[arg(long)]
        food_id: Option<String>,
        /// Quantity in grams (default: serving size, else 100)
        #[arg(short, long)]
        grams: Option<f64>,
    },

    /// Create a custom food (values per 100 g), optionally logging it
    Custom {
        name: String,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long, default_value = "0")]
        kcal: f64,
        #[arg(long, default_value = "0")]
        protein: f64,
        #[arg(long, default_value = "0")]
        carbs: f64,
        #[arg(long, default_value = "0")]
        fat: f64,
        #[arg(long, default_value = "0")]
        sugars: f64,
        #[arg(long, default_value = "0")]
        fiber: f64,
        #[arg(long, default_value = "0")]
        salt: f64,
        #[arg(long, default_value = "0")]
        sodium: f64,
        #[arg(long, default_value = "0")]
        saturated_fat: f64,
        #[arg(long, default_value = "0")]
        monounsaturated_fat: f64,
        #[arg(long, default_value = "0")]
        polyunsaturated_fat: f64,
        /// Log the new food into this meal
        #[arg(long)]
        log: Option<MealSlot>,
        /// Grams to log
        #[arg(short, long, default_value = "100")]
        grams: f64,
    },

    /// Show or change goals and timezone
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Show or toggle the color theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        timezone: Option<String>,
        #[arg(long)]
        calories: Option<i64>,
        #[arg(long)]
        protein: Option<i64>,
        #[arg(long)]
        carbs: Option<i64>,
        #[arg(long)]
        fat: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    Show,
    Toggle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging)?;

    let store = Arc::new(FileStore::new(config.storage.data_path()));
    let transport = ReqwestTransport::new(config.api.request_timeout())?;
    let api: Client = ApiClient::new(transport, Arc::clone(&store), config.api.base_url.clone());
    let format = cli.format;

    match cli.command {
        Commands::Register { username, password } => {
            authenticate(&api, AuthMode::Register, username, password).await?;
            println!("Account created. Signed in.");
        }

        Commands::Login { username, password } => {
            authenticate(&api, AuthMode::Login, username, password).await?;
            println!("Signed in.");
        }

        Commands::Logout => {
            api.logout()?;
            println!("Signed out.");
        }

        Commands::Whoami => {
            require_token(&api)?;
            let me = api.me().await?;
            match format {
                OutputFormat::Json => print_json(&me)?,
                OutputFormat::Table => println!("{} ({})", me.username, me.id),
            }
        }

        Commands::Today => {
            require_token(&api)?;
            let settings = match config.device.resolved_timezone() {
                Some(tz) => api.sync_timezone(&tz).await?,
                None => api.get_me_settings().await?,
            };
            let today = api.get_today().await?;
            let view = DashboardView::build(Some(&today), Some(&settings));

            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "date": today.date,
                    "goal": view.goals.calories,
                    "consumed": view.consumed,
                    "remaining": view.remaining,
                    "totals": view.totals,
                    "meals": today.meals,
                    "recentFoods": today.recent_foods,
                }))?,
                OutputFormat::Table => {
                    print_dashboard(&view);
                    if !today.recent_foods.is_empty() {
                        println!();
                        println!("Recent");
                        for recent in &today.recent_foods {
                            print_food_row(&recent.to_food_record());
                        }
                    }
                }
            }
        }

        Commands::Search { query, limit, cursor } => {
            let page = api.search_foods(query.trim(), Some(limit), cursor.as_deref()).await?;
            match format {
                OutputFormat::Json => print_json(&page)?,
                OutputFormat::Table => {
                    if page.items.is_empty() {
                        println!("No results. Try fewer words.");
                    }
                    for food in &page.items {
                        print_food_row(food);
                    }
                    if let Some(next) = page.next_cursor {
                        println!();
                        println!("More: macrofacts search {:?} --cursor {}", query, next);
                    }
                }
            }
        }

        Commands::Find => {
            find(&api, &config, format).await?;
        }

        Commands::Barcode { code, grams } => {
            let food = api.get_food_by_barcode(&code).await?;
            let grams = grams.unwrap_or_else(|| default_quantity(&food) as f64);
            match format {
                OutputFormat::Json => print_json(&food)?,
                OutputFormat::Table => {
                    print_food_row(&food);
                    let preview = NutritionPreview::for_quantity(&food, grams);
                    println!();
                    println!("{}g: {} kcal", grams.round(), preview.kcal);
                    println!("{}", preview.macro_line());
                    println!("{}", preview.detail_line());
                }
            }
        }

        Commands::Log { meal, barcode, food_id, grams } => {
            require_token(&api)?;
            let food = match (barcode, food_id) {
                (Some(code), _) if grams.is_none() => api.get_food_by_barcode(&code).await?,
                (Some(code), _) => {
                    let mut food = FoodRecord::new(code.clone(), FoodSource::Catalog, code.clone());
                    food.barcode = Some(code);
                    food
                }
                (None, Some(id)) => FoodRecord::new(id.clone(), FoodSource::Custom, id),
                (None, None) => bail!("Pass --barcode or --food-id"),
            };

            let mut flow = AddFoodFlow::with_prefill(meal, food);
            if let Some(grams) = grams {
                flow.set_grams(grams);
            }
            let request = match flow.submission() {
                Some(result) => result?,
                None => bail!("Nothing selected"),
            };
            let created = api.create_log_entry(&request).await?;
            println!(
                "Logged {}g into {} ({})",
                request.quantity_g,
                meal.title(),
                created.id
            );
        }

        Commands::Custom {
            name,
            brand,
            kcal,
            protein,
            carbs,
            fat,
            sugars,
            fiber,
            salt,
            sodium,
            saturated_fat,
            monounsaturated_fat,
            polyunsaturated_fat,
            log,
            grams,
        } => {
            require_token(&api)?;
            let form = CustomFoodForm {
                name,
                brand: brand.unwrap_or_default(),
                kcal,
                protein_g: protein,
                carbs_g: carbs,
                fat_g: fat,
                sugars_g: sugars,
                fiber_g: fiber,
                salt_g: salt,
                sodium_g: sodium,
                saturated_fat_g: saturated_fat,
                monounsaturated_fat_g: monounsaturated_fat,
                polyunsaturated_fat_g: polyunsaturated_fat,
            };
            let food = api.create_custom_food(&form.to_request()?).await?;
            println!("Created {} ({})", food.display_name(), food.id);

            if let Some(meal) = log {
                let request = log_entry_request(&food, meal, grams)?;
                api.create_log_entry(&request).await?;
                println!("Logged {}g into {}", request.quantity_g, meal.title());
            }
        }

        Commands::Settings { action } => {
            require_token(&api)?;
            let settings = match action {
                SettingsAction::Show => api.get_me_settings().await?,
                SettingsAction::Set {
                    timezone,
                    calories,
                    protein,
                    carbs,
                    fat,
                } => {
                    let update = UpdateSettingsRequest {
                        timezone,
                        calorie_goal: calories,
                        protein_goal_g: protein,
                        carbs_goal_g: carbs,
                        fat_goal_g: fat,
                    };
                    if update.is_empty() {
                        bail!("Nothing to change. Pass --timezone, --calories, --protein, --carbs or --fat");
                    }
                    api.patch_me_settings(&update).await?
                }
            };
            match format {
                OutputFormat::Json => print_json(&settings)?,
                OutputFormat::Table => print_settings(&settings),
            }
        }

        Commands::Theme { action } => {
            let mut controller = ThemeController::init(Arc::clone(&store), (), detect_system_dark_mode());
            let theme = match action {
                ThemeAction::Show => controller.current(),
                ThemeAction::Toggle => controller.toggle(),
            };
            println!("{} {}", theme.icon(), theme);
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("macrofacts={}", config.level)));

    let writer = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format.as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .with_ansi(config.file.is_none())
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry().with(fmt_layer).with(filter).init();
    Ok(())
}

fn require_token(api: &Client) -> anyhow::Result<()> {
    if !api.tokens().is_present() {
        bail!("Not signed in. Run `macrofacts login <username>` first.");
    }
    Ok(())
}

async fn authenticate(
    api: &Client,
    mode: AuthMode,
    username: String,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password.or_else(|| std::env::var("MACROFACTS_PASSWORD").ok()) {
        Some(password) => password,
        None => prompt("Password: ")?,
    };
    let form = AuthForm {
        mode,
        username,
        password,
    };
    let (username, password) = form.validate()?;
    api.authenticate(mode, &username, &password).await?;
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Feed stdin lines through the debouncer and print every published state
async fn find(api: &Client, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let options = config.search.options();
    let search = DebouncedSearch::new(api.clone(), options);
    let mut updates = search.subscribe();

    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            print_search_state(&state, format, options.min_chars);
        }
    });

    eprintln!("Type to search, one line per update. Ctrl-D to finish.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        search.input(&line);
    }

    // Let the last debounce fire and its request settle
    tokio::time::sleep(options.debounce).await;
    let mut settled = search.subscribe();
    let _ = tokio::time::timeout(
        config.api.request_timeout(),
        settled.wait_for(|s| !s.loading),
    )
    .await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    drop(search);
    printer.abort();
    Ok(())
}

fn print_search_state(state: &SearchState, format: OutputFormat, min_chars: usize) {
    if format == OutputFormat::Json {
        let value = serde_json::json!({
            "query": state.query,
            "loading": state.loading,
            "error": state.error,
            "items": state.items,
        });
        println!("{}", value);
        return;
    }

    if state.loading {
        println!("Searching {:?}…", state.query.trim());
    } else if let Some(error) = &state.error {
        println!("Search failed: {}", error);
    } else if state.is_empty_result(min_chars) {
        println!("No results. Try fewer words.");
    } else if !state.items.is_empty() {
        println!("Results for {:?}", state.query.trim());
        for food in &state.items {
            print_food_row(food);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn num(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn print_food_row(food: &FoodRecord) {
    let id = match food.source {
        FoodSource::Catalog => food.barcode.clone().unwrap_or_else(|| "-".to_string()),
        FoodSource::Custom => food.id.clone(),
    };
    println!(
        "{:<40} {:>5} kcal/100g   P {} · C {} · F {}   [{} {}]",
        truncate(&food.display_name(), 40),
        num(food.kcal_per_100g).round(),
        num(food.protein_per_100g).round(),
        num(food.carbs_per_100g).round(),
        num(food.fat_per_100g).round(),
        food.source.as_str(),
        id
    );
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn bar(fraction: f64, width: usize) -> String {
    let filled = (fraction * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled.min(width)), ".".repeat(width - filled.min(width)))
}

fn print_dashboard(view: &DashboardView) {
    println!("Today · {}", view.date_label());
    println!();
    println!("  {:>6} kcal remaining", view.remaining);
    println!(
        "  Consumed {}   Goal {}   {} {:.0}%",
        view.consumed,
        view.goals.calories.round(),
        bar(view.fraction, 20),
        view.fraction * 100.0
    );
    println!();
    for progress in &view.macros {
        println!(
            "  {:<8} {:>4}/{}g {}",
            progress.label,
            progress.value.round(),
            progress.goal.round(),
            bar(progress.fraction, 20)
        );
    }

    for meal in &view.meals {
        println!();
        println!("{}  ({} kcal)", meal.slot.title(), meal.totals.calories.round());
        if meal.entries.is_empty() {
            println!("  Nothing logged yet.");
            continue;
        }
        for entry in &meal.entries {
            let computed = entry.computed.unwrap_or_default();
            println!(
                "  {:<32} {:>6}g {:>6} kcal   P {} · C {} · F {}",
                truncate(&entry.food.name, 32),
                entry.quantity_g.round(),
                computed.calories.round(),
                computed.protein_g.round(),
                computed.carbs_g.round(),
                computed.fat_g.round()
            );
        }
    }
}

fn print_settings(settings: &MeSettings) {
    println!("{:<12} {}", "Timezone", settings.timezone);
    println!("{:<12} {} kcal", "Calories", settings.calorie_goal);
    println!("{:<12} {} g", "Protein", settings.protein_goal_g);
    println!("{:<12} {} g", "Carbs", settings.carbs_goal_g);
    println!("{:<12} {} g", "Fat", settings.fat_goal_g);
}
