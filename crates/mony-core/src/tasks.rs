//! Task-list categorization
//!
//! Board task lists are named freely ("Weekly catchup with client",
//! "Fixing SSO login"). Each name is bucketed into a reporting category by
//! keyword: categories are tried in configuration order and the first one
//! with a keyword contained in the lower-cased name wins.

use serde::Serialize;

use crate::config::MonyConfig;

/// A reporting category and the keywords that select it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCategory {
    pub name: String,
    pub icon: String,
    /// Lower-cased; matched by substring, surrounding spaces included
    pub keywords: Vec<String>,
}

impl TaskCategory {
    pub fn new<K: AsRef<str>>(name: &str, icon: &str, keywords: impl IntoIterator<Item = K>) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

pub struct TaskCategorizer {
    categories: Vec<TaskCategory>,
    fallback: TaskCategory,
}

impl TaskCategorizer {
    pub fn new(categories: Vec<TaskCategory>, fallback: TaskCategory) -> Self {
        Self {
            categories,
            fallback,
        }
    }

    pub fn from_config(config: &MonyConfig) -> Self {
        Self::new(config.task_categories.clone(), config.task_fallback.clone())
    }

    /// Category for a task-list name, or the fallback when nothing matches
    pub fn categorize(&self, task_list_name: &str) -> &TaskCategory {
        let lowered = task_list_name.to_lowercase();
        self.categories
            .iter()
            .find(|c| c.matches(&lowered))
            .unwrap_or(&self.fallback)
    }

    /// Icon for a category name; unknown names get the fallback icon
    pub fn icon_for(&self, category_name: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.name == category_name)
            .map(|c| c.icon.as_str())
            .unwrap_or(&self.fallback.icon)
    }

    pub fn categories(&self) -> &[TaskCategory] {
        &self.categories
    }

    pub fn fallback(&self) -> &TaskCategory {
        &self.fallback
    }
}
