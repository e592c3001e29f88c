//! Application constants and configuration defaults
//!
//! Centralized location for magic numbers and default values

/// Local storage keys
pub mod keys {
    /// JSON array of dishes
    pub const DISHES: &str = "dishes";

    /// Active plan tier display name
    pub const CURRENT_PLAN: &str = "current_plan";

    /// JSON object with the owner's profile
    pub const USER_PROFILE: &str = "user_profile";

    /// Presence gates the owner section
    pub const AUTH_TOKEN: &str = "auth_token";
}

/// Image upload limits shared by the dish and profile forms
pub mod images {
    /// Maximum upload size (3MB)
    pub const MAX_FILE_SIZE: u64 = 3 * 1024 * 1024;

    /// Types accepted for dish photos
    pub const DISH_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg"];

    /// Types accepted for restaurant cover images
    pub const COVER_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];
}

/// Public menu link configuration
pub mod share {
    /// Origin used when the config file doesn't set one
    pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

    /// Path segment preceding the restaurant id
    pub const RESTAURANT_PATH: &str = "restaurant";
}

/// Hosted pricing table defaults
pub mod pricing {
    pub const PUBLISHABLE_KEY: &str = "pk_test_51QLlORHVXxWzIKSKKWp0TIts8zL9GKZl9yQhHXm1bIwVW6WuOeQGe4c0pgWgtEqhjrRtqbnhi72j4myZuloL9ZJH0047V2jlH9";

    pub const PRICING_TABLE_ID: &str = "prctbl_1QLmX7HVXxWzIKSKFCE92GPi";

    pub const SCRIPT_URL: &str = "https://js.stripe.com/v3/pricing-table.js";
}

/// Filesystem layout
pub mod fs {
    /// Config directory name
    pub const CONFIG_DIR_NAME: &str = ".omq";

    /// Database file name inside the config directory
    pub const DATABASE_FILE_NAME: &str = "omq.db";

    /// Config file name inside the config directory
    pub const CONFIG_FILE_NAME: &str = "config.toml";

    /// Logs subdirectory name
    pub const LOGS_DIR_NAME: &str = "logs";

    /// Log file name inside the logs directory
    pub const LOG_FILE_NAME: &str = "omq.log";
}
