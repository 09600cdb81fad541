use std::rc::Rc;

use parse_display::Display;
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// Opaque token naming a navigable mode of the application.
///
/// Any string is a valid state; membership in the registry's known-state list
/// is advisory and only affects menu metadata. Comparison is ordinal equality
/// on the token, never display-text semantics.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display)]
#[display("{0}")]
pub struct AppState(Rc<str>);

impl AppState {
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        AppState(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AppState {
    fn from(name: &str) -> Self {
        AppState::new(name)
    }
}
impl From<String> for AppState {
    fn from(name: String) -> Self {
        AppState::new(name)
    }
}

impl Serialize for AppState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}
impl<'de> Deserialize<'de> for AppState {
    fn deserialize<D>(deserializer: D) -> Result<AppState, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(AppState::new)
    }
}

/// Menu display metadata associated with a known state.
///
/// Menu order is the entry's position in the registry's known-state list.
#[derive(Clone, Debug)]
pub struct MenuNavigationState {
    state: AppState,
    label: String,
}

impl MenuNavigationState {
    pub fn new(state: impl Into<AppState>, label: impl Into<String>) -> Self {
        MenuNavigationState {
            state: state.into(),
            label: label.into(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
