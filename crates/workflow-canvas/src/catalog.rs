//! Step and trigger catalog descriptors
//!
//! Catalog content is owned by the embedding application. The canvas only
//! copies descriptor fields into nodes and reads two hints from them: the
//! variant (a `condition` option is a branching primitive) and the optional
//! initial branch count.

use serde::{Deserialize, Serialize};

use crate::constants::labels;
use crate::error::{EditorError, Result};
use crate::types::{NodeVariant, Panel};

/// One selectable step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub variant: NodeVariant,
    /// Short type caption shown by the catalog (not copied into nodes)
    #[serde(default)]
    pub type_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel: Option<Panel>,
    #[serde(default)]
    pub category: String,
    /// Condition branches a switch created from this option starts with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_branch_count: Option<usize>,
}

impl StepOption {
    /// Whether applying this option turns a node into a switch
    pub fn is_branching(&self) -> bool {
        self.variant == NodeVariant::Condition
    }

    /// The option applied to freshly materialized branch targets
    pub fn add_step() -> Self {
        Self {
            id: "add-step".to_string(),
            label: labels::ADD_STEP_TITLE.to_string(),
            description: labels::ADD_STEP_DESCRIPTION.to_string(),
            icon: labels::ADD_STEP_ICON.to_string(),
            variant: NodeVariant::Add,
            type_label: String::new(),
            status: None,
            panel: None,
            category: String::new(),
            initial_branch_count: None,
        }
    }
}

/// A titled group of options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepGroup {
    pub id: String,
    pub title: String,
    pub items: Vec<StepOption>,
}

/// Ordered groups of step options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepCatalog {
    pub groups: Vec<StepGroup>,
}

impl StepCatalog {
    pub fn new(groups: Vec<StepGroup>) -> Self {
        Self { groups }
    }

    /// Parse a catalog from a JSON array of groups
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Iterate over every option in group order
    pub fn options(&self) -> impl Iterator<Item = &StepOption> {
        self.groups.iter().flat_map(|g| g.items.iter())
    }

    pub fn find_option(&self, option_id: &str) -> Option<&StepOption> {
        self.options().find(|o| o.id == option_id)
    }

    /// Find an option or report it as unknown
    pub fn require_option(&self, option_id: &str) -> Result<&StepOption> {
        self.find_option(option_id)
            .ok_or_else(|| EditorError::UnknownOption(option_id.to_string()))
    }

    /// Option for an unconfigured step: the first `add` entry, or the
    /// built-in "Add step" option when the catalog has none
    pub fn default_option(&self) -> StepOption {
        self.options()
            .find(|o| o.variant == NodeVariant::Add)
            .cloned()
            .unwrap_or_else(StepOption::add_step)
    }
}

/// Display fields for the reserved trigger node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDescriptor {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_key: String,
    #[serde(default)]
    pub group_title: String,
}

impl TriggerDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            icon_key: String::new(),
            group_title: String::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the icon key
    pub fn with_icon(mut self, icon_key: impl Into<String>) -> Self {
        self.icon_key = icon_key.into();
        self
    }

    /// Set the catalog group title
    pub fn with_group(mut self, group_title: impl Into<String>) -> Self {
        self.group_title = group_title.into();
        self
    }
}
