use std::{cell::RefCell, rc::Rc};

use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    AppStartUpMessage, AppState, AppStateChangedMessage, LifecycleHandler,
    MainPageBindingContextChangeRequestMessage, MainPageChangeRequestMessage,
    MenuNavigationState, Notifier, Page, PageKind, PageLifecycleEvent, StateRegistry,
    Subscription, ViewModel,
};

#[cfg(test)]
mod tests;

/// Produces the page and view-model for one registered state.
///
/// Either constructor may decline by returning `None`; a declined resolution
/// is not an error, the transition simply has no visible effect.
pub struct PageFactory {
    kind: PageKind,
    page: Box<dyn Fn() -> Option<Rc<dyn Page>>>,
    view_model: Box<dyn Fn() -> Option<Rc<dyn ViewModel>>>,
}

impl PageFactory {
    pub fn new(
        kind: PageKind,
        page: impl Fn() -> Option<Rc<dyn Page>> + 'static,
        view_model: impl Fn() -> Option<Rc<dyn ViewModel>> + 'static,
    ) -> Self {
        PageFactory {
            kind,
            page: Box::new(page),
            view_model: Box::new(view_model),
        }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }
}

impl std::fmt::Debug for PageFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFactory")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("state {0} is registered more than once")]
    DuplicateState(AppState),
    #[error("no startup state was designated")]
    MissingStartupState,
    #[error("no default state was designated")]
    MissingDefaultState,
}

#[derive(Default)]
pub struct StateMachineBuilder {
    registrations: Vec<(MenuNavigationState, PageFactory)>,
    startup_state: Option<AppState>,
    default_state: Option<AppState>,
}

impl StateMachineBuilder {
    pub fn new() -> Self {
        StateMachineBuilder::default()
    }

    /// Registers a known state with its menu label and page factory.
    ///
    /// Menu order is registration order.
    pub fn register(
        mut self,
        state: impl Into<AppState>,
        label: impl Into<String>,
        factory: PageFactory,
    ) -> Self {
        self.registrations
            .push((MenuNavigationState::new(state, label), factory));
        self
    }

    pub fn startup_state(mut self, state: impl Into<AppState>) -> Self {
        self.startup_state = Some(state.into());
        self
    }

    pub fn default_state(mut self, state: impl Into<AppState>) -> Self {
        self.default_state = Some(state.into());
        self
    }

    pub fn build(self) -> Result<StateMachine, BuildError> {
        let mut known_states = Vec::with_capacity(self.registrations.len());
        let mut factories = Vec::with_capacity(self.registrations.len());
        for (menu, factory) in self.registrations {
            if known_states
                .iter()
                .any(|m: &MenuNavigationState| m.state() == menu.state())
            {
                return Err(BuildError::DuplicateState(menu.state().clone()));
            }
            factories.push((menu.state().clone(), factory));
            known_states.push(menu);
        }
        let startup_state = self.startup_state.ok_or(BuildError::MissingStartupState)?;
        let default_state = self.default_state.ok_or(BuildError::MissingDefaultState)?;
        Ok(StateMachine {
            registry: StateRegistry::new(known_states, startup_state, default_state),
            factories,
            notifier: Notifier::new(),
            record: RefCell::new(TransitionRecord::default()),
        })
    }
}

/// Options for a single transition request.
#[derive(Copy, Clone, Debug, Default)]
pub struct TransitionOptions {
    /// Apply the transition even when the destination equals the stored
    /// last-applied state.
    pub force: bool,
    /// Carried verbatim into every message this transition publishes; hints
    /// back-stack listeners not to record the change.
    pub prevent_back_stack_push: bool,
}

#[derive(Default)]
struct TransitionRecord {
    state: Option<AppState>,
    page: Option<DisplayedPage>,
}

struct DisplayedPage {
    page: Rc<dyn Page>,
    kind: PageKind,
    // Dropped when the page is next replaced or rebound.
    _lifecycle: Option<Subscription>,
}

/// Application-state navigation controller.
///
/// One long-lived instance owned by the composition root; it holds the
/// last-applied state and the displayed page as owned fields, not globals.
/// Single-threaded by construction: callers serialize transition requests on
/// their UI thread, and the controller never blocks or suspends.
pub struct StateMachine {
    registry: StateRegistry,
    factories: Vec<(AppState, PageFactory)>,
    notifier: Notifier,
    record: RefCell<TransitionRecord>,
}

impl std::fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("state", &self.record.borrow().state)
            .finish_non_exhaustive()
    }
}

impl StateMachine {
    pub fn builder() -> StateMachineBuilder {
        StateMachineBuilder::new()
    }

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// The most recently applied state, `None` before the first transition.
    pub fn current_state(&self) -> Option<AppState> {
        self.record.borrow().state.clone()
    }

    /// The displayed page the controller last requested.
    pub fn current_page(&self) -> Option<Rc<dyn Page>> {
        self.record.borrow().page.as_ref().map(|p| p.page.clone())
    }

    /// Requests a transition to `state`; returns whether it was applied.
    ///
    /// Repeated identical requests are idempotent: the second request is a
    /// no-op with no notification and no factory call.
    pub fn request_transition(&self, state: impl Into<AppState>) -> bool {
        self.request_transition_with(state, TransitionOptions::default())
    }

    pub fn request_transition_with(
        &self,
        state: impl Into<AppState>,
        options: TransitionOptions,
    ) -> bool {
        let state = state.into();
        let previous = {
            let mut record = self.record.borrow_mut();
            if !options.force && record.state.as_ref() == Some(&state) {
                trace!(state = %state, "transition suppressed, state already applied");
                return false;
            }
            // Recorded before any handler runs, so a handler that requests
            // another transition sees the applied state and cannot loop.
            record.state.replace(state.clone())
        };
        debug!(
            state = %state,
            previous = previous.as_ref().map(|s| s.as_str()),
            forced = options.force,
            "applying transition"
        );
        self.notifier
            .publish_app_state_changed(&AppStateChangedMessage {
                previous_state: previous,
                prevent_back_stack_push: options.prevent_back_stack_push,
            });
        self.resolve(&state, options.prevent_back_stack_push);
        true
    }

    /// Publishes the startup notification, then forces a transition to the
    /// startup state. Forcing guarantees the first render even when the
    /// stored state already nominally equals the startup state.
    pub fn go_to_startup_state(&self) {
        self.notifier.publish_app_start_up(&AppStartUpMessage);
        let state = self.registry.startup_state().clone();
        self.request_transition_with(
            state,
            TransitionOptions {
                force: true,
                ..TransitionOptions::default()
            },
        );
    }

    pub fn go_to_default_state(&self) {
        let state = self.registry.default_state().clone();
        self.request_transition_with(
            state,
            TransitionOptions {
                force: true,
                ..TransitionOptions::default()
            },
        );
    }

    fn factory_of(&self, state: &AppState) -> Option<&PageFactory> {
        self.factories.iter().find(|(s, _)| s == state).map(|(_, f)| f)
    }

    // No RefCell borrow is held across a factory call or a publish; both may
    // re-enter the machine.
    fn resolve(&self, state: &AppState, prevent_back_stack_push: bool) {
        let Some(factory) = self.factory_of(state) else {
            debug!(state = %state, "no factory registered, nothing to display");
            return;
        };
        let menu = self.registry.menu_entry(state);
        trace!(
            state = %state,
            kind = %factory.kind,
            menu_label = menu.map(|m| m.label()),
            "resolving page"
        );

        let reusable = {
            let record = self.record.borrow();
            match &record.page {
                Some(displayed) if displayed.kind == factory.kind => Some(displayed.page.clone()),
                _ => None,
            }
        };

        if let Some(page) = reusable {
            let Some(view_model) = (factory.view_model)() else {
                debug!(state = %state, "factory produced no view-model, nothing to bind");
                return;
            };
            let lifecycle = wire_lifecycle(&*page, &view_model);
            self.record.borrow_mut().page = Some(DisplayedPage {
                page,
                kind: factory.kind,
                _lifecycle: lifecycle,
            });
            debug!(state = %state, kind = %factory.kind, "reusing displayed page, rebinding view-model");
            self.notifier
                .publish_binding_context_change(&MainPageBindingContextChangeRequestMessage {
                    new_view_model: view_model,
                    prevent_back_stack_push,
                });
        } else {
            let Some(page) = (factory.page)() else {
                debug!(state = %state, "factory produced no page, nothing to display");
                return;
            };
            let Some(view_model) = (factory.view_model)() else {
                debug!(state = %state, "factory produced no view-model, nothing to display");
                return;
            };
            let lifecycle = wire_lifecycle(&*page, &view_model);
            self.record.borrow_mut().page = Some(DisplayedPage {
                page: page.clone(),
                kind: factory.kind,
                _lifecycle: lifecycle,
            });
            debug!(state = %state, kind = %factory.kind, "requesting page replacement");
            self.notifier
                .publish_main_page_change(&MainPageChangeRequestMessage {
                    new_page: page,
                    prevent_back_stack_push,
                });
        }
    }
}

/// Wires a view-model's lifecycle handler to the page's appearance events.
/// Both sides must opt in; the returned subscription lives in the transition
/// record until the next page swap or rebind.
fn wire_lifecycle(page: &dyn Page, view_model: &Rc<dyn ViewModel>) -> Option<Subscription> {
    let handler: Rc<dyn LifecycleHandler> = view_model.clone().lifecycle_handler()?;
    let events = page.lifecycle_events()?;
    Some(events.subscribe(move |event| match event {
        PageLifecycleEvent::Appearing => handler.on_appearing(),
        PageLifecycleEvent::Disappearing => handler.on_disappearing(),
    }))
}
