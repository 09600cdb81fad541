use std::{cell::RefCell, rc::Rc};

use derive_ex::derive_ex;
use slabmap::SlabMap;

use crate::{
    message::{
        AppStartUpMessage, AppStateChangedMessage, MainPageBindingContextChangeRequestMessage,
        MainPageChangeRequestMessage,
    },
    Subscription,
};


type Handler<M> = Rc<dyn Fn(&M)>;

/// Typed observer registry with synchronous delivery.
///
/// Handlers are invoked in subscription order, on the publishing thread, once
/// per [`publish`](EventSource::publish) call. Delivery goes to the handlers
/// subscribed at the moment of the call; a handler may subscribe, unsubscribe,
/// or publish again while running and the nested changes take effect from the
/// next call on.
#[derive_ex(Clone, bound())]
pub struct EventSource<M: 'static>(Rc<RefCell<Handlers<M>>>);

struct Handlers<M> {
    slots: SlabMap<Handler<M>>,
    order: Vec<usize>,
}

impl<M: 'static> EventSource<M> {
    pub fn new() -> Self {
        EventSource(Rc::new(RefCell::new(Handlers {
            slots: SlabMap::new(),
            order: Vec::new(),
        })))
    }

    /// Registers `f` until the returned [`Subscription`] is dropped.
    pub fn subscribe(&self, f: impl Fn(&M) + 'static) -> Subscription {
        let key = {
            let mut handlers = self.0.borrow_mut();
            let key = handlers.slots.insert(Rc::new(f));
            handlers.order.push(key);
            key
        };
        let weak = Rc::downgrade(&self.0);
        Subscription::on_drop(move || {
            if let Some(handlers) = weak.upgrade() {
                let mut handlers = handlers.borrow_mut();
                handlers.slots.remove(key);
                handlers.order.retain(|&k| k != key);
            }
        })
    }

    /// Delivers `message` to every currently subscribed handler.
    pub fn publish(&self, message: &M) {
        // The registry borrow is released before any handler runs so that
        // re-entrant subscribe/unsubscribe/publish calls do not panic.
        let snapshot: Vec<Handler<M>> = {
            let handlers = self.0.borrow();
            handlers
                .order
                .iter()
                .filter_map(|&key| handlers.slots.get(key).cloned())
                .collect()
        };
        for handler in snapshot {
            handler(message);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.borrow().order.len()
    }
}

impl<M: 'static> Default for EventSource<M> {
    fn default() -> Self {
        EventSource::new()
    }
}

/// Publish/subscribe surface for the controller's fixed message set.
///
/// The four message shapes are a versionless in-process schema; there is no
/// delivery guarantee beyond "fires once per call, to all currently
/// subscribed handlers, no retry". Callers marshal to a UI-affine thread
/// before publishing if they need one.
pub struct Notifier {
    app_state_changed: EventSource<AppStateChangedMessage>,
    app_start_up: EventSource<AppStartUpMessage>,
    main_page_change: EventSource<MainPageChangeRequestMessage>,
    binding_context_change: EventSource<MainPageBindingContextChangeRequestMessage>,
}

impl Notifier {
    pub fn new() -> Self {
        Notifier {
            app_state_changed: EventSource::new(),
            app_start_up: EventSource::new(),
            main_page_change: EventSource::new(),
            binding_context_change: EventSource::new(),
        }
    }

    pub fn subscribe_app_state_changed(
        &self,
        f: impl Fn(&AppStateChangedMessage) + 'static,
    ) -> Subscription {
        self.app_state_changed.subscribe(f)
    }

    pub fn subscribe_app_start_up(
        &self,
        f: impl Fn(&AppStartUpMessage) + 'static,
    ) -> Subscription {
        self.app_start_up.subscribe(f)
    }

    pub fn subscribe_main_page_change(
        &self,
        f: impl Fn(&MainPageChangeRequestMessage) + 'static,
    ) -> Subscription {
        self.main_page_change.subscribe(f)
    }

    pub fn subscribe_binding_context_change(
        &self,
        f: impl Fn(&MainPageBindingContextChangeRequestMessage) + 'static,
    ) -> Subscription {
        self.binding_context_change.subscribe(f)
    }

    pub(crate) fn publish_app_state_changed(&self, message: &AppStateChangedMessage) {
        self.app_state_changed.publish(message);
    }

    pub(crate) fn publish_app_start_up(&self, message: &AppStartUpMessage) {
        self.app_start_up.publish(message);
    }

    pub(crate) fn publish_main_page_change(&self, message: &MainPageChangeRequestMessage) {
        self.main_page_change.publish(message);
    }

    pub(crate) fn publish_binding_context_change(
        &self,
        message: &MainPageBindingContextChangeRequestMessage,
    ) {
        self.binding_context_change.publish(message);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Notifier::new()
    }
}
