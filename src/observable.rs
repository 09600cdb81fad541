use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

use derive_ex::derive_ex;
use serde::{Deserialize, Serialize};

use crate::{EventSource, Subscription};


/// Shared value cell for view-model fields, with change notification.
///
/// Clones share the same value and subscriber list, so a view-model and the
/// bindings watching it hold the same cell. Setting notifies subscribers
/// synchronously on the calling thread.
#[derive_ex(Clone, bound())]
pub struct Observable<T: 'static> {
    value: Rc<RefCell<T>>,
    changed: EventSource<T>,
}

impl<T: 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Observable {
            value: Rc::new(RefCell::new(value)),
            changed: EventSource::new(),
        }
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.value.borrow()
    }

    /// Replaces the value and notifies subscribers.
    pub fn set(&self, value: T)
    where
        T: Clone,
    {
        *self.value.borrow_mut() = value.clone();
        self.changed.publish(&value);
    }

    /// Replaces the value and notifies only if it actually changed.
    pub fn set_dedup(&self, value: T)
    where
        T: PartialEq + Clone,
    {
        {
            let mut current = self.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value.clone();
        }
        self.changed.publish(&value);
    }

    /// Calls `f` with every newly set value.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        self.changed.subscribe(f)
    }
}

impl<T: Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Observable::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value.try_borrow() {
            Ok(value) => std::fmt::Debug::fmt(&*value, f),
            Err(_) => write!(f, "<borrowed>"),
        }
    }
}

impl<T> Serialize for Observable<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        match self.value.try_borrow() {
            Ok(value) => T::serialize(&*value, serializer),
            Err(_) => Err(serde::ser::Error::custom("borrowed")),
        }
    }
}
impl<'de, T> Deserialize<'de> for Observable<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Observable<T>, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Observable::new)
    }
}
