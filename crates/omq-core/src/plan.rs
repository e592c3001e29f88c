//! Plan tiers and their dish limits

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Subscription level bounding how many dishes an owner may create
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlanTier {
    #[default]
    #[serde(rename = "OMQ Free")]
    Free,
    #[serde(rename = "OMQ Plus")]
    Plus,
    #[serde(rename = "OMQ Premium")]
    Premium,
}

impl PlanTier {
    /// Lowest to highest
    pub fn all() -> &'static [PlanTier] {
        &[PlanTier::Free, PlanTier::Plus, PlanTier::Premium]
    }

    /// Maximum number of dishes creatable on this tier
    pub fn dish_limit(&self) -> usize {
        match self {
            PlanTier::Free => 5,
            PlanTier::Plus => 25,
            PlanTier::Premium => 150,
        }
    }

    /// Name as persisted under `current_plan`
    pub fn storage_name(&self) -> &'static str {
        match self {
            PlanTier::Free => "OMQ Free",
            PlanTier::Plus => "OMQ Plus",
            PlanTier::Premium => "OMQ Premium",
        }
    }

    /// Name without the product prefix ("Free", "Plus", "Premium")
    pub fn short_name(&self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Plus => "Plus",
            PlanTier::Premium => "Premium",
        }
    }

    /// Resolve a persisted value, falling back to the lowest tier.
    /// Only the exact storage names are recognised.
    pub fn from_stored(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return PlanTier::Free;
        };
        PlanTier::all()
            .iter()
            .copied()
            .find(|p| p.storage_name() == raw)
            .unwrap_or_else(|| {
                tracing::warn!("Unrecognised plan '{}', falling back to {}", raw, PlanTier::Free);
                PlanTier::Free
            })
    }

    /// Whether `count` existing dishes leave room for one more
    pub fn allows(&self, count: usize) -> bool {
        count < self.dish_limit()
    }

    /// Next tier up, if any
    pub fn next(&self) -> Option<PlanTier> {
        match self {
            PlanTier::Free => Some(PlanTier::Plus),
            PlanTier::Plus => Some(PlanTier::Premium),
            PlanTier::Premium => None,
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.storage_name())
    }
}

impl FromStr for PlanTier {
    type Err = String;

    /// Accepts "OMQ Plus" as well as "plus", case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PlanTier::all()
            .iter()
            .copied()
            .find(|p| {
                p.storage_name().to_lowercase() == wanted || p.short_name().to_lowercase() == wanted
            })
            .ok_or_else(|| format!("unknown plan: {}", s))
    }
}

/// Shown when an add or duplicate would exceed the plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradePrompt {
    pub plan: PlanTier,
}

impl UpgradePrompt {
    pub fn new(plan: PlanTier) -> Self {
        Self { plan }
    }

    pub fn title(&self) -> &'static str {
        "Upgrade Your Plan"
    }

    pub fn message(&self) -> String {
        format!(
            "You've reached the limit of {} dishes on the {} plan.",
            self.plan.dish_limit(),
            self.plan.short_name()
        )
    }

    pub fn hint(&self) -> &'static str {
        "Upgrade your plan to add more dishes to your menu."
    }
}

impl fmt::Display for UpgradePrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.message(), self.hint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        assert_eq!(PlanTier::Free.dish_limit(), 5);
        assert_eq!(PlanTier::Plus.dish_limit(), 25);
        assert_eq!(PlanTier::Premium.dish_limit(), 150);
    }

    #[test]
    fn test_allows() {
        assert!(PlanTier::Free.allows(4));
        assert!(!PlanTier::Free.allows(5));
        assert!(!PlanTier::Free.allows(7));
        assert!(PlanTier::Plus.allows(7));
    }

    #[test]
    fn test_from_stored_defaults_to_free() {
        assert_eq!(PlanTier::from_stored(None), PlanTier::Free);
        assert_eq!(PlanTier::from_stored(Some("OMQ Gold")), PlanTier::Free);
        assert_eq!(PlanTier::from_stored(Some("OMQ Premium")), PlanTier::Premium);
    }

    #[test]
    fn test_from_stored_requires_exact_name() {
        assert_eq!(PlanTier::from_stored(Some("plus")), PlanTier::Free);
        assert_eq!(PlanTier::from_stored(Some("omq plus")), PlanTier::Free);
        assert_eq!(PlanTier::from_stored(Some("OMQ Plus")), PlanTier::Plus);
    }

    #[test]
    fn test_parse_accepts_short_names() {
        assert_eq!("plus".parse::<PlanTier>(), Ok(PlanTier::Plus));
        assert_eq!("OMQ PLUS".parse::<PlanTier>(), Ok(PlanTier::Plus));
        assert!("gold".parse::<PlanTier>().is_err());
    }

    #[test]
    fn test_serde_uses_storage_names() {
        assert_eq!(serde_json::to_string(&PlanTier::Plus).unwrap(), "\"OMQ Plus\"");
        let plan: PlanTier = serde_json::from_str("\"OMQ Free\"").unwrap();
        assert_eq!(plan, PlanTier::Free);
    }

    #[test]
    fn test_upgrade_prompt_message() {
        assert_eq!(
            UpgradePrompt::new(PlanTier::Free).message(),
            "You've reached the limit of 5 dishes on the Free plan."
        );
        assert_eq!(
            UpgradePrompt::new(PlanTier::Plus).message(),
            "You've reached the limit of 25 dishes on the Plus plan."
        );
    }
}
