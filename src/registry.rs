use crate::{AppState, MenuNavigationState};


/// Ordered list of known states plus the designated startup and default
/// states.
///
/// The list is advisory: transitions to states outside it still proceed, they
/// just carry no menu metadata. Lookup is a linear scan on state equality.
#[derive(Clone, Debug)]
pub struct StateRegistry {
    known_states: Vec<MenuNavigationState>,
    startup_state: AppState,
    default_state: AppState,
}

impl StateRegistry {
    pub fn new(
        known_states: Vec<MenuNavigationState>,
        startup_state: impl Into<AppState>,
        default_state: impl Into<AppState>,
    ) -> Self {
        StateRegistry {
            known_states,
            startup_state: startup_state.into(),
            default_state: default_state.into(),
        }
    }

    pub fn known_states(&self) -> &[MenuNavigationState] {
        &self.known_states
    }

    pub fn startup_state(&self) -> &AppState {
        &self.startup_state
    }

    pub fn default_state(&self) -> &AppState {
        &self.default_state
    }

    /// Index of `state` in the known-state list; `None` when unregistered.
    ///
    /// Used for menu ordering only, never by the transition logic.
    pub fn menu_order_of(&self, state: &AppState) -> Option<usize> {
        self.known_states.iter().position(|m| m.state() == state)
    }

    pub fn menu_entry(&self, state: &AppState) -> Option<&MenuNavigationState> {
        self.known_states.iter().find(|m| m.state() == state)
    }
}
