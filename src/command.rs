use std::{cell::Cell, rc::Rc};

use crate::{EventSource, Observable, Subscription};


/// UI command whose enablement follows the owning view-model's busy and
/// validity flags.
///
/// The command can execute while the view-model is not busy and its input is
/// valid. Enablement changes are announced once per flip, not once per flag
/// write, so bound controls only redraw when the effective value changes.
pub struct Command {
    action: Box<dyn Fn()>,
    busy: Observable<bool>,
    valid: Observable<bool>,
    can_execute_changed: EventSource<bool>,
    _watchers: [Subscription; 2],
}

impl Command {
    /// A command with fresh flags: not busy, valid.
    pub fn new(action: impl Fn() + 'static) -> Self {
        Command::with_flags(Observable::new(false), Observable::new(true), action)
    }

    /// A command sharing the caller's flag cells, typically the view-model's
    /// own busy and validity observables.
    pub fn with_flags(
        busy: Observable<bool>,
        valid: Observable<bool>,
        action: impl Fn() + 'static,
    ) -> Self {
        let can_execute_changed = EventSource::new();
        let last = Rc::new(Cell::new(!busy.get() && valid.get()));
        let watch: Rc<dyn Fn()> = {
            let busy = busy.clone();
            let valid = valid.clone();
            let changed = can_execute_changed.clone();
            Rc::new(move || {
                let now = !busy.get() && valid.get();
                if last.replace(now) != now {
                    changed.publish(&now);
                }
            })
        };
        let watchers = [
            busy.subscribe({
                let watch = watch.clone();
                move |_| watch()
            }),
            valid.subscribe({
                let watch = watch.clone();
                move |_| watch()
            }),
        ];
        Command {
            action: Box::new(action),
            busy,
            valid,
            can_execute_changed,
            _watchers: watchers,
        }
    }

    pub fn can_execute(&self) -> bool {
        !self.busy.get() && self.valid.get()
    }

    /// Runs the action when enabled; reports whether it ran.
    pub fn execute(&self) -> bool {
        if self.can_execute() {
            (self.action)();
            true
        } else {
            false
        }
    }

    /// Calls `f` with the new enablement whenever it flips.
    pub fn subscribe_can_execute(&self, f: impl Fn(&bool) + 'static) -> Subscription {
        self.can_execute_changed.subscribe(f)
    }

    pub fn busy(&self) -> &Observable<bool> {
        &self.busy
    }

    pub fn valid(&self) -> &Observable<bool> {
        &self.valid
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("busy", &self.busy)
            .field("valid", &self.valid)
            .finish_non_exhaustive()
    }
}
