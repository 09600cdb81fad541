use std::rc::Rc;

use parse_display::Display;

use crate::EventSource;

/// Value-compared identifier for the concrete page a factory produces.
///
/// Factories declaring the same kind produce interchangeable page shells: a
/// transition between their states keeps the displayed page and only swaps
/// its view-model.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[display("{0}")]
pub struct PageKind(&'static str);

impl PageKind {
    pub const fn new(name: &'static str) -> Self {
        PageKind(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

/// Appearance change reported by a page.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum PageLifecycleEvent {
    Appearing,
    Disappearing,
}

/// A displayable page shell.
pub trait Page: 'static {
    fn kind(&self) -> PageKind;

    /// Pages that report appearance changes expose their event source here.
    fn lifecycle_events(&self) -> Option<&EventSource<PageLifecycleEvent>> {
        None
    }
}

/// State bound to a page as its binding context.
pub trait ViewModel: 'static {
    /// View-models that want page appearance events expose a handler here.
    ///
    /// The wiring to the page happens during resolution, once both objects
    /// exist, and lives until the page is next replaced or rebound.
    fn lifecycle_handler(self: Rc<Self>) -> Option<Rc<dyn LifecycleHandler>> {
        None
    }
}

/// Receives page appearance events.
pub trait LifecycleHandler: 'static {
    fn on_appearing(&self) {}
    fn on_disappearing(&self) {}
}
