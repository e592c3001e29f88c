//! Subscription page: the hosted pricing table and plan overview

use crate::config::PricingTableConfig;
use crate::constants::pricing;
use crate::plan::PlanTier;

/// Identifiers for the embedded pricing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingTable {
    pub publishable_key: String,
    pub pricing_table_id: String,
    pub script_url: String,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::from_config(&PricingTableConfig::default())
    }
}

impl PricingTable {
    pub fn from_config(config: &PricingTableConfig) -> Self {
        Self {
            publishable_key: config.publishable_key.clone(),
            pricing_table_id: config.pricing_table_id.clone(),
            script_url: pricing::SCRIPT_URL.to_string(),
        }
    }

    /// HTML snippet that loads the script and mounts the table
    pub fn embed_html(&self) -> String {
        format!(
            "<script async src=\"{}\"></script>\n<stripe-pricing-table pricing-table-id=\"{}\" publishable-key=\"{}\"></stripe-pricing-table>",
            escape_attr(&self.script_url),
            escape_attr(&self.pricing_table_id),
            escape_attr(&self.publishable_key),
        )
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// One row of the plan overview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub plan: PlanTier,
    pub dish_limit: usize,
    pub current: bool,
}

/// Every tier, marking the active one
pub fn plan_overview(current: PlanTier) -> Vec<PlanSummary> {
    PlanTier::all()
        .iter()
        .map(|&plan| PlanSummary {
            plan,
            dish_limit: plan.dish_limit(),
            current: plan == current,
        })
        .collect()
}
