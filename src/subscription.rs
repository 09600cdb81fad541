use std::mem::take;


/// Handle that keeps an observer registered; dropping it unsubscribes.
///
/// Observer lifetime is tied to the handle the subscriber owns, so teardown
/// happens with the subscriber's own teardown and never relies on garbage
/// collection or finalizers. Unsubscribing after the event source itself is
/// gone is a no-op.
#[derive(Default)]
#[must_use]
pub struct Subscription(Teardown);

impl Subscription {
    /// A subscription with no teardown.
    pub fn empty() -> Self {
        Subscription(Teardown::Done)
    }

    /// Runs `f` once when the subscription is dropped.
    pub fn on_drop(f: impl FnOnce() + 'static) -> Self {
        Subscription(Teardown::OnDrop(Box::new(f)))
    }

    /// Consumes the handle without running its teardown, leaving the observer
    /// registered for the lifetime of the event source.
    pub fn forget(mut self) {
        self.0 = Teardown::Done;
    }

    /// Unsubscribes now instead of at the end of scope.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        match take(&mut self.0) {
            Teardown::Done => {}
            Teardown::OnDrop(f) => f(),
        }
    }
}

#[derive(Default)]
enum Teardown {
    #[default]
    Done,
    OnDrop(Box<dyn FnOnce() + 'static>),
}
