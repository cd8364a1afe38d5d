//! Change records and the map mutations that produce them.

use std::collections::BTreeMap;

use lumen_common::keys::ACTIVE_THEME_KEY;
use lumen_common::ActiveTheme;

/// One key's transition. `None` means the key was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl StoreChange {
    pub fn is_active_theme_change(&self) -> bool {
        self.key == ACTIVE_THEME_KEY
    }

    /// The newly active theme, if this change touched the active theme key.
    pub fn active_theme(&self) -> Option<ActiveTheme> {
        self.is_active_theme_change()
            .then(|| ActiveTheme::from_stored(self.new_value.as_deref()))
    }
}

/// Apply a bulk set, returning only the keys whose value actually changed.
pub(crate) fn apply_set(
    map: &mut BTreeMap<String, String>,
    entries: Vec<(String, String)>,
) -> Vec<StoreChange> {
    let mut changes = Vec::new();
    for (key, value) in entries {
        let old_value = map.insert(key.clone(), value.clone());
        if old_value.as_deref() != Some(value.as_str()) {
            changes.push(StoreChange {
                key,
                old_value,
                new_value: Some(value),
            });
        }
    }
    changes
}

/// Apply a bulk removal, returning a change per key that existed.
pub(crate) fn apply_remove(
    map: &mut BTreeMap<String, String>,
    keys: &[String],
) -> Vec<StoreChange> {
    keys.iter()
        .filter_map(|key| {
            map.remove(key).map(|old| StoreChange {
                key: key.clone(),
                old_value: Some(old),
                new_value: None,
            })
        })
        .collect()
}

/// Changes that turn `old` into `new`, in key order.
pub(crate) fn diff(
    old: &BTreeMap<String, String>,
    new: &BTreeMap<String, String>,
) -> Vec<StoreChange> {
    let mut changes: Vec<StoreChange> = new
        .iter()
        .filter(|(key, value)| old.get(*key) != Some(*value))
        .map(|(key, value)| StoreChange {
            key: key.clone(),
            old_value: old.get(key).cloned(),
            new_value: Some(value.clone()),
        })
        .chain(
            old.iter()
                .filter(|(key, _)| !new.contains_key(*key))
                .map(|(key, value)| StoreChange {
                    key: key.clone(),
                    old_value: Some(value.clone()),
                    new_value: None,
                }),
        )
        .collect();
    changes.sort_by(|a, b| a.key.cmp(&b.key));
    changes
}
