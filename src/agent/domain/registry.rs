//! Category-scoped lookup of agent instances.
//!
//! [`AgentRegistry`] is plain storage: it maps a category and a name to an
//! instance plus status metadata and never acts on the instances it holds.

use super::{AgentDomainError, ParseRegistryStatusError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Availability status of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryStatus {
    /// The instance is available for use.
    Active,
    /// The instance has been set aside and is excluded from active listings.
    Inactive,
}

impl RegistryStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for RegistryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RegistryStatus {
    type Error = ParseRegistryStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseRegistryStatusError(value.to_owned())),
        }
    }
}

/// An instance stored in the registry with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry<T> {
    instance: T,
    status: RegistryStatus,
    registered_at: DateTime<Utc>,
}

impl<T> RegistryEntry<T> {
    /// Returns the stored instance.
    #[must_use]
    pub const fn instance(&self) -> &T {
        &self.instance
    }

    /// Returns the entry status.
    #[must_use]
    pub const fn status(&self) -> RegistryStatus {
        self.status
    }

    /// Returns when the entry was registered.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}

/// Category → name → instance lookup.
#[derive(Debug, Clone)]
pub struct AgentRegistry<T> {
    categories: BTreeMap<String, BTreeMap<String, RegistryEntry<T>>>,
}

impl<T> Default for AgentRegistry<T> {
    fn default() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }
}

impl<T> AgentRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `instance` as an active entry under `category` and `name`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyCategory`] or
    /// [`AgentDomainError::EmptyRegistryName`] for blank keys, and
    /// [`AgentDomainError::DuplicateRegistryEntry`] when the pair is taken.
    pub fn register(
        &mut self,
        category: &str,
        name: &str,
        instance: T,
        clock: &impl Clock,
    ) -> Result<(), AgentDomainError> {
        let category_key = normalize_key(category).ok_or(AgentDomainError::EmptyCategory)?;
        let name_key = normalize_key(name).ok_or(AgentDomainError::EmptyRegistryName)?;

        let entries = self.categories.entry(category_key.clone()).or_default();
        if entries.contains_key(&name_key) {
            return Err(AgentDomainError::DuplicateRegistryEntry {
                category: category_key,
                name: name_key,
            });
        }

        entries.insert(
            name_key,
            RegistryEntry {
                instance,
                status: RegistryStatus::Active,
                registered_at: clock.utc(),
            },
        );
        Ok(())
    }

    /// Returns the entry stored under `category` and `name`.
    #[must_use]
    pub fn entry(&self, category: &str, name: &str) -> Option<&RegistryEntry<T>> {
        self.categories
            .get(category.trim())
            .and_then(|entries| entries.get(name.trim()))
    }

    /// Returns the instance stored under `category` and `name`.
    #[must_use]
    pub fn get(&self, category: &str, name: &str) -> Option<&T> {
        self.entry(category, name).map(RegistryEntry::instance)
    }

    /// Returns the status of the entry stored under `category` and `name`.
    #[must_use]
    pub fn status(&self, category: &str, name: &str) -> Option<RegistryStatus> {
        self.entry(category, name).map(RegistryEntry::status)
    }

    /// Updates an entry status. Returns `false` when no entry exists.
    pub fn set_status(&mut self, category: &str, name: &str, status: RegistryStatus) -> bool {
        let Some(entry) = self
            .categories
            .get_mut(category.trim())
            .and_then(|entries| entries.get_mut(name.trim()))
        else {
            return false;
        };
        entry.status = status;
        true
    }

    /// Removes and returns an instance, pruning the category when it empties.
    pub fn remove(&mut self, category: &str, name: &str) -> Option<T> {
        let category_key = category.trim();
        let entries = self.categories.get_mut(category_key)?;
        let removed = entries.remove(name.trim())?;
        if entries.is_empty() {
            self.categories.remove(category_key);
        }
        Some(removed.instance)
    }

    /// Returns all categories in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Returns the names registered under `category` in sorted order.
    pub fn names_in(&self, category: &str) -> impl Iterator<Item = &str> {
        self.categories
            .get(category.trim())
            .into_iter()
            .flat_map(|entries| entries.keys().map(String::as_str))
    }

    /// Returns the active instances in `category` keyed by name.
    pub fn list_active(&self, category: &str) -> impl Iterator<Item = (&str, &T)> {
        self.categories
            .get(category.trim())
            .into_iter()
            .flat_map(|entries| entries.iter())
            .filter(|(_, entry)| entry.status == RegistryStatus::Active)
            .map(|(name, entry)| (name.as_str(), &entry.instance))
    }

    /// Returns the total number of entries across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    /// Returns whether the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn normalize_key(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
