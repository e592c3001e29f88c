//! OMQ - Restaurant menu manager
//!
//! Owners sign in, describe their restaurant and manage dishes within the
//! limits of their plan. Diners browse the public menu and hide dishes by
//! allergen.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use omq_core::{paths, DishType, PlanTier, Quantity};

mod commands;

use commands::App;
use omq_core::table::SortColumn;

/// OMQ - Restaurant Menu Manager
#[derive(Debug, Parser)]
#[command(name = "omq")]
#[command(about = "Manage your restaurant menu and share it with diners", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database file (defaults to ~/.omq/omq.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file (defaults to ~/.omq/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup(CredentialArgs),

    /// Sign in
    Login(CredentialArgs),

    /// Sign out
    Logout,

    /// Describe your restaurant
    Onboard(ProfileArgs),

    /// Manage dishes
    Dishes {
        #[command(subcommand)]
        action: DishCommands,
    },

    /// Show or change the plan
    Subscription {
        #[command(subcommand)]
        action: SubscriptionCommands,
    },

    /// Print the public menu link
    Link,

    /// Profile and account settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },

    /// Browse a restaurant's menu as a diner
    Menu(MenuArgs),

    /// Show what is stored on this device
    Status,
}

#[derive(Debug, Args)]
struct CredentialArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,
}

#[derive(Debug, Args)]
struct ProfileArgs {
    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    restaurant_name: Option<String>,

    /// Restaurant website; pass an empty string to clear it
    #[arg(long)]
    restaurant_url: Option<String>,

    /// Cover image (jpg, jpeg, png or webp, up to 3MB)
    #[arg(long)]
    cover_image: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum DishCommands {
    /// List dishes
    List {
        /// Column to sort by
        #[arg(long)]
        sort: Option<SortColumn>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Print the stored JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a dish
    Add(DishArgs),

    /// Copy a dish
    Duplicate { id: String },

    /// Delete a dish
    Delete { id: String },

    /// Delete several dishes at once
    DeleteSelected {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Debug, Args)]
struct DishArgs {
    #[arg(long, default_value_t)]
    name: String,

    #[arg(long, default_value_t)]
    description: String,

    #[arg(long = "type", default_value_t)]
    dish_type: DishType,

    #[arg(long, default_value_t)]
    ingredients: String,

    /// Comma-separated, e.g. "Gluten, Milk"
    #[arg(long, default_value_t)]
    allergens: String,

    #[arg(long, default_value_t)]
    price: String,

    /// Photo (png or jpeg, up to 3MB)
    #[arg(long)]
    image: Option<PathBuf>,

    #[arg(long, default_value_t)]
    quantity: Quantity,
}

#[derive(Debug, Subcommand)]
enum SubscriptionCommands {
    /// Current plan, usage and the available tiers
    Show {
        /// Also print the pricing table embed snippet
        #[arg(long)]
        embed: bool,
    },

    /// Switch to another plan
    Set { plan: PlanTier },
}

#[derive(Debug, Subcommand)]
enum SettingsCommands {
    /// Show the saved profile
    Show,

    /// Change profile fields
    Update(ProfileArgs),

    /// Sign out and forget the profile
    DeleteAccount {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct MenuArgs {
    restaurant_id: String,

    /// Hide dishes containing this allergen (repeatable)
    #[arg(long = "exclude")]
    exclude: Vec<String>,

    /// Menu section to show
    #[arg(long = "type", default_value_t)]
    dish_type: DishType,

    /// Mark a dish as a favorite (repeatable)
    #[arg(long = "favorite")]
    favorite: Vec<String>,
}

/// Log to ~/.omq/logs/omq.log, or warnings to stderr when that can't be opened
fn init_logging() {
    let log_path = paths::log_file();
    let log_file = std::fs::create_dir_all(paths::logs_dir()).and_then(|_| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
    });

    match log_file {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::INFO.into()),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::WARN.into()),
            )
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let app = App::open(cli.db.as_deref(), cli.config.as_deref())?;
    run(&app, cli.command)
}

fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Signup(args) => app.signup(&args.email, &args.password),
        Commands::Login(args) => app.login(&args.email, &args.password),
        Commands::Logout => app.logout(),
        Commands::Onboard(args) => app.onboard(args),
        Commands::Dishes { action } => match action {
            DishCommands::List { sort, desc, json } => app.list_dishes(sort, desc, json),
            DishCommands::Add(args) => app.add_dish(args),
            DishCommands::Duplicate { id } => app.duplicate_dish(&id),
            DishCommands::Delete { id } => app.delete_dish(&id),
            DishCommands::DeleteSelected { ids } => app.delete_selected(&ids),
        },
        Commands::Subscription { action } => match action {
            SubscriptionCommands::Show { embed } => app.show_subscription(embed),
            SubscriptionCommands::Set { plan } => app.set_plan(plan),
        },
        Commands::Link => app.link(),
        Commands::Settings { action } => match action {
            SettingsCommands::Show => app.show_settings(),
            SettingsCommands::Update(args) => app.update_settings(args),
            SettingsCommands::DeleteAccount { yes } => app.delete_account(yes),
        },
        Commands::Menu(args) => app.menu(args),
        Commands::Status => app.status(),
    }
}
