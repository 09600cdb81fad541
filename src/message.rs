use std::rc::Rc;

use crate::{AppState, Page, ViewModel};

/// Announces an applied transition.
///
/// `previous_state` is `None` when this is the first transition the machine
/// has applied.
#[derive(Clone, Debug)]
pub struct AppStateChangedMessage {
    pub previous_state: Option<AppState>,
    pub prevent_back_stack_push: bool,
}

/// Announces that the application is entering its startup state.
#[derive(Clone, Copy, Debug, Default)]
pub struct AppStartUpMessage;

/// Asks the UI root to swap the displayed page.
///
/// The controller never mutates the UI tree itself; whichever component owns
/// page display listens for this request.
#[derive(Clone)]
pub struct MainPageChangeRequestMessage {
    pub new_page: Rc<dyn Page>,
    pub prevent_back_stack_push: bool,
}

impl std::fmt::Debug for MainPageChangeRequestMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainPageChangeRequestMessage")
            .field("new_page", &self.new_page.kind())
            .field("prevent_back_stack_push", &self.prevent_back_stack_push)
            .finish()
    }
}

/// Asks the UI root to rebind the displayed page to a new view-model.
#[derive(Clone)]
pub struct MainPageBindingContextChangeRequestMessage {
    pub new_view_model: Rc<dyn ViewModel>,
    pub prevent_back_stack_push: bool,
}

impl std::fmt::Debug for MainPageBindingContextChangeRequestMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainPageBindingContextChangeRequestMessage")
            .field("prevent_back_stack_push", &self.prevent_back_stack_push)
            .finish_non_exhaustive()
    }
}
