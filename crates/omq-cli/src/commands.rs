//! Command handlers

use std::path::Path;

use anyhow::{bail, Result};
use chrono::Local;

use omq_core::storage::subscription;
use omq_core::subscription::{plan_overview, PricingTable};
use omq_core::table::{duplicate_hint, SortColumn, Selection, Sorting};
use omq_core::{
    paths, AddOutcome, AppConfig, AuthSession, Credentials, Dish, DishDraft, DishStore,
    DuplicateOutcome, ImageUpload, LocalStorage, MenuView, PlanTier, ProfileForm, ProfileStore,
    DEFAULT_ALLERGENS,
};

use crate::{DishArgs, MenuArgs, ProfileArgs};

/// Loaded config plus the open store
pub struct App {
    config: AppConfig,
    storage: LocalStorage,
}

impl App {
    /// Resolve config and database paths, honoring the CLI overrides
    pub fn open(db: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let config = match config {
            Some(path) => AppConfig::load_from_path(path)?,
            None => AppConfig::load()?,
        };
        let db_path = db
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.database_path());
        tracing::info!("Using database {}", db_path.display());
        let storage = LocalStorage::open(&db_path)?;
        Ok(Self { config, storage })
    }

    fn session(&self) -> AuthSession<'_> {
        AuthSession::new(&self.storage)
    }

    /// Owner commands start here
    fn require_owner(&self) -> Result<()> {
        self.session().require()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn dish_count(&self) -> usize {
        DishStore::load(&self.storage)
            .expect("Failed to load dishes")
            .len()
    }

    // Account

    pub fn signup(&self, email: &str, password: &str) -> Result<()> {
        self.session().signup(&Credentials::new(email, password))?;
        println!("Welcome! You are signed in as {}.", email.trim());
        self.onboarding_hint()
    }

    pub fn login(&self, email: &str, password: &str) -> Result<()> {
        self.session().login(&Credentials::new(email, password))?;
        println!("Signed in as {}.", email.trim());
        self.onboarding_hint()
    }

    pub fn logout(&self) -> Result<()> {
        self.session().logout()?;
        println!("Signed out.");
        Ok(())
    }

    fn onboarding_hint(&self) -> Result<()> {
        if !ProfileStore::new(&self.storage).load()?.is_complete() {
            println!("Next: tell us about your restaurant with `omq onboard`.");
        }
        Ok(())
    }

    // Profile

    pub fn onboard(&self, args: ProfileArgs) -> Result<()> {
        self.require_owner()?;
        let profiles = ProfileStore::new(&self.storage);
        let form = profile_form(ProfileForm::default(), args)?;
        let profile = profiles.save_form(&form)?;
        let link = profiles.share_link(&self.config.origin)?;
        println!("{} is ready.", profile.restaurant_name);
        println!("Share your menu: {}", link);
        Ok(())
    }

    pub fn show_settings(&self) -> Result<()> {
        self.require_owner()?;
        let profile = ProfileStore::new(&self.storage).load()?;
        if !profile.is_complete() {
            println!("No profile yet. Run `omq onboard` first.");
            return Ok(());
        }
        println!("Name:        {}", profile.full_name());
        println!("Restaurant:  {}", profile.restaurant_name);
        println!(
            "Website:     {}",
            profile.restaurant_url.as_deref().unwrap_or("-")
        );
        println!(
            "Cover image: {}",
            profile.cover_image.as_deref().unwrap_or("-")
        );
        if let Some(id) = &profile.restaurant_id {
            println!("Menu id:     {}", id);
        }
        Ok(())
    }

    pub fn update_settings(&self, args: ProfileArgs) -> Result<()> {
        self.require_owner()?;
        let profiles = ProfileStore::new(&self.storage);
        let form = profile_form(ProfileForm::from_profile(&profiles.load()?), args)?;
        profiles.save_form(&form)?;
        println!("Profile updated.");
        Ok(())
    }

    pub fn delete_account(&self, confirmed: bool) -> Result<()> {
        self.require_owner()?;
        if !confirmed {
            bail!("this signs you out and forgets your profile; re-run with --yes to confirm");
        }
        self.session().delete_account()?;
        println!("Account deleted.");
        Ok(())
    }

    pub fn link(&self) -> Result<()> {
        self.require_owner()?;
        let link = ProfileStore::new(&self.storage).share_link(&self.config.origin)?;
        println!("{}", link);
        Ok(())
    }

    // Dishes

    pub fn list_dishes(&self, sort: Option<SortColumn>, desc: bool, json: bool) -> Result<()> {
        self.require_owner()?;
        let store = DishStore::load(&self.storage)?;
        let plan = store.current_plan()?;

        if json {
            println!("{}", serde_json::to_string_pretty(store.dishes())?);
            return Ok(());
        }

        let rows: Vec<&Dish> = match sort {
            Some(column) if desc => Sorting::descending(column).apply(store.dishes()),
            Some(column) => Sorting::ascending(column).apply(store.dishes()),
            None => store.dishes().iter().collect(),
        };

        println!(
            "{} of {} dishes on {}",
            store.len(),
            plan.dish_limit(),
            plan
        );
        if rows.is_empty() {
            println!("No dishes yet. Add one with `omq dishes add`.");
            return Ok(());
        }
        println!();
        println!(
            "{:<36}  {:<24}  {:<12}  {:>8}  {:<11}  {}",
            "Id",
            SortColumn::Name.header(),
            SortColumn::Type.header(),
            SortColumn::Price.header(),
            SortColumn::Quantity.header(),
            SortColumn::CreatedAt.header(),
        );
        for dish in rows {
            println!(
                "{:<36}  {:<24}  {:<12}  {:>8}  {:<11}  {}",
                dish.id,
                dish.name,
                dish.dish_type,
                dish.price,
                dish.quantity,
                dish.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            );
        }
        if store.is_at_limit(plan) {
            println!();
            println!("{}.", duplicate_hint(true));
        }
        Ok(())
    }

    pub fn add_dish(&self, args: DishArgs) -> Result<()> {
        self.require_owner()?;
        let draft = DishDraft {
            name: args.name,
            description: args.description,
            dish_type: args.dish_type,
            ingredients: args.ingredients,
            allergens: args.allergens,
            price: args.price,
            image: args.image.as_deref().map(ImageUpload::from_path).transpose()?,
            quantity: args.quantity,
        };
        let fields = draft.validate()?;

        let mut store = DishStore::load(&self.storage)?;
        let plan = store.current_plan()?;
        match store.add_dish(fields, plan)? {
            AddOutcome::Added(dish) => println!("Added {} ({})", dish.name, dish.id),
            AddOutcome::LimitReached(prompt) => {
                println!("{}", prompt.title());
                println!("{}", prompt);
                suggest_upgrade(plan);
            }
        }
        Ok(())
    }

    pub fn duplicate_dish(&self, id: &str) -> Result<()> {
        self.require_owner()?;
        let mut store = DishStore::load(&self.storage)?;
        let plan = store.current_plan()?;
        match store.duplicate_dish(id, plan)? {
            DuplicateOutcome::Duplicated(dish) => println!("Added {} ({})", dish.name, dish.id),
            DuplicateOutcome::NotFound => bail!("no dish with id {}", id),
            DuplicateOutcome::LimitReached(prompt) => {
                println!("{}", prompt.title());
                println!("{}", prompt);
                suggest_upgrade(plan);
            }
        }
        Ok(())
    }

    pub fn delete_dish(&self, id: &str) -> Result<()> {
        self.require_owner()?;
        let mut store = DishStore::load(&self.storage)?;
        if store.delete_dish(id)? {
            println!("Deleted {}", id);
        } else {
            println!("No dish with id {}; nothing to delete.", id);
        }
        Ok(())
    }

    pub fn delete_selected(&self, ids: &[String]) -> Result<()> {
        self.require_owner()?;
        let mut store = DishStore::load(&self.storage)?;

        let mut selection = selection_of(ids);
        let requested = selection.len();
        selection.retain_existing(store.dishes());

        let removed = store.delete_selected(selection.ids())?;
        println!("Deleted {} of {} selected dishes", removed, requested);
        Ok(())
    }

    // Subscription

    pub fn show_subscription(&self, embed: bool) -> Result<()> {
        self.require_owner()?;
        let store = DishStore::load(&self.storage)?;
        let plan = store.current_plan()?;

        println!("Current plan: {}", plan);
        println!("Dishes: {} of {}", store.len(), plan.dish_limit());
        println!();
        for summary in plan_overview(plan) {
            let marker = if summary.current { "*" } else { " " };
            println!(
                "{} {:<12} up to {} dishes",
                marker, summary.plan, summary.dish_limit
            );
        }

        if embed {
            println!();
            println!(
                "{}",
                PricingTable::from_config(&self.config.pricing_table).embed_html()
            );
        }
        Ok(())
    }

    pub fn set_plan(&self, plan: PlanTier) -> Result<()> {
        self.require_owner()?;
        subscription::set_current_plan(&self.storage, plan)?;
        let store = DishStore::load(&self.storage)?;
        println!("You are now on {}.", plan);
        if store.len() > plan.dish_limit() {
            println!(
                "You have {} dishes; new dishes can be added once you are below {}.",
                store.len(),
                plan.dish_limit()
            );
        }
        Ok(())
    }

    // Diner

    pub fn menu(&self, args: MenuArgs) -> Result<()> {
        let profile = ProfileStore::new(&self.storage).load()?;
        match profile.restaurant_id.as_deref() {
            Some(id) if id == args.restaurant_id => println!("{}", profile.restaurant_name),
            _ => tracing::warn!(
                "Restaurant {} is not the one stored here; showing local dishes",
                args.restaurant_id
            ),
        }

        let mut view = MenuView::new();
        for term in &args.exclude {
            view.exclusions.add_custom(term);
        }
        view.select_type(args.dish_type);
        for id in &args.favorite {
            view.toggle_favorite(id);
        }

        let store = DishStore::load(&self.storage)?;
        let tabs: Vec<String> = view
            .counts_by_type(store.dishes())
            .into_iter()
            .map(|(dish_type, count)| {
                if dish_type == view.selected_type {
                    format!("[{} ({})]", dish_type, count)
                } else {
                    format!("{} ({})", dish_type, count)
                }
            })
            .collect();
        println!("{}", tabs.join("  "));

        if view.exclusions.is_empty() {
            println!(
                "Avoiding an allergen? Try --exclude with one of: {}",
                DEFAULT_ALLERGENS.join(", ")
            );
        } else {
            let terms: Vec<&str> = view.exclusions.iter().collect();
            println!("Hiding dishes with: {}", terms.join(", "));
        }
        println!();

        let visible = view.visible(store.dishes());
        if visible.is_empty() {
            println!("Nothing to show in {}.", view.selected_type);
            return Ok(());
        }
        for dish in visible {
            let star = if view.is_favorite(&dish.id) { "★ " } else { "" };
            println!("{}{} - {} ({})", star, dish.name, dish.price, dish.quantity);
            println!("    {}", dish.description);
            println!("    Ingredients: {}", dish.ingredients);
            println!("    Allergens: {}", dish.allergen_list().join(", "));
        }
        Ok(())
    }

    // Diagnostics

    pub fn status(&self) -> Result<()> {
        let signed_in = if self.session().is_authenticated()? {
            "yes"
        } else {
            "no"
        };
        println!("Signed in: {}", signed_in);
        println!("Plan:      {}", subscription::current_plan(&self.storage)?);
        println!("Logs:      {}", paths::log_file().display());
        let keys = self.storage.keys()?;
        if keys.is_empty() {
            println!("Stored:    nothing");
        } else {
            println!("Stored:    {}", keys.join(", "));
        }
        Ok(())
    }
}

/// Overlay the given flags on a starting form
fn profile_form(mut form: ProfileForm, args: ProfileArgs) -> Result<ProfileForm> {
    if let Some(first_name) = args.first_name {
        form.first_name = first_name;
    }
    if let Some(last_name) = args.last_name {
        form.last_name = last_name;
    }
    if let Some(restaurant_name) = args.restaurant_name {
        form.restaurant_name = restaurant_name;
    }
    if let Some(restaurant_url) = args.restaurant_url {
        form.restaurant_url = restaurant_url;
    }
    if let Some(path) = args.cover_image {
        form.cover_image = Some(ImageUpload::from_path(&path)?);
    }
    Ok(form)
}

/// Selection built from ids given on the command line; repeats count once
fn selection_of(ids: &[String]) -> Selection {
    let mut selection = Selection::new();
    for id in ids {
        if !selection.is_selected(id) {
            selection.toggle(id);
        }
    }
    selection
}

fn suggest_upgrade(plan: PlanTier) {
    if let Some(next) = plan.next() {
        println!(
            "Run `omq subscription set {}` to allow up to {} dishes.",
            next.short_name().to_lowercase(),
            next.dish_limit()
        );
    }
}
