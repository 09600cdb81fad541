//! An application state navigation controller designed to be used as a
//! foundation for UI shells.
//!
//! The hosting application registers a page factory per named [`AppState`],
//! designates a startup and a default state, and then drives navigation by
//! requesting transitions on the [`StateMachine`]. The machine suppresses
//! redundant transitions, reuses the displayed page when the destination
//! resolves to the same [`PageKind`], and announces every applied transition
//! through a typed [`Notifier`] so menus, back-stack bookkeeping, and the UI
//! root can react without the controller depending on any of them.

mod bus;
mod command;
mod machine;
mod message;
mod observable;
mod page;
mod registry;
mod state;
mod subscription;

pub use bus::*;
pub use command::*;
pub use machine::*;
pub use message::*;
pub use observable::*;
pub use page::*;
pub use registry::*;
pub use state::*;
pub use subscription::*;
