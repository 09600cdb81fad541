use std::rc::Rc;

use assert_call::{call, CallRecorder};

use super::*;
use crate::EventSource;

const LOGIN_PAGE: PageKind = PageKind::new("LoginPage");
const HOME_PAGE: PageKind = PageKind::new("HomePage");

struct StubPage {
    kind: PageKind,
    lifecycle: EventSource<PageLifecycleEvent>,
}
impl StubPage {
    fn new(kind: PageKind) -> Self {
        StubPage {
            kind,
            lifecycle: EventSource::new(),
        }
    }
}
impl Page for StubPage {
    fn kind(&self) -> PageKind {
        self.kind
    }
    fn lifecycle_events(&self) -> Option<&EventSource<PageLifecycleEvent>> {
        Some(&self.lifecycle)
    }
}

struct StubViewModel;
impl ViewModel for StubViewModel {}

struct WatchingViewModel;
impl ViewModel for WatchingViewModel {
    fn lifecycle_handler(self: Rc<Self>) -> Option<Rc<dyn LifecycleHandler>> {
        Some(self)
    }
}
impl LifecycleHandler for WatchingViewModel {
    fn on_appearing(&self) {
        call!("appearing");
    }
    fn on_disappearing(&self) {
        call!("disappearing");
    }
}

fn factory(kind: PageKind, tag: &'static str) -> PageFactory {
    PageFactory::new(
        kind,
        move || {
            call!("page:{tag}");
            Some(Rc::new(StubPage::new(kind)) as Rc<dyn Page>)
        },
        move || {
            call!("vm:{tag}");
            Some(Rc::new(StubViewModel) as Rc<dyn ViewModel>)
        },
    )
}

fn login_home_machine() -> StateMachine {
    StateMachine::builder()
        .register("Login", "Sign in", factory(LOGIN_PAGE, "login"))
        .register("Home", "Home", factory(HOME_PAGE, "home"))
        .startup_state("Login")
        .default_state("Home")
        .build()
        .unwrap()
}

#[test]
fn repeated_transition_resolves_once() {
    let mut cr = CallRecorder::new();
    let machine = login_home_machine();
    let _s = machine
        .notifier()
        .subscribe_app_state_changed(|_| call!("changed"));
    assert!(machine.request_transition("Home"));
    assert!(!machine.request_transition("Home"));
    cr.verify(["changed", "page:home", "vm:home"]);
}

#[test]
fn forced_transition_always_resolves() {
    let mut cr = CallRecorder::new();
    let machine = login_home_machine();
    let _s = machine
        .notifier()
        .subscribe_app_state_changed(|_| call!("changed"));
    assert!(machine.request_transition("Home"));
    let forced = TransitionOptions {
        force: true,
        ..TransitionOptions::default()
    };
    assert!(machine.request_transition_with("Home", forced));
    // The second resolution reuses the page shell, so only the view-model
    // factory runs again.
    cr.verify(["changed", "page:home", "vm:home", "changed", "vm:home"]);
}

#[test]
fn startup_always_renders() {
    let mut cr = CallRecorder::new();
    let machine = login_home_machine();
    let _a = machine
        .notifier()
        .subscribe_app_start_up(|_| call!("startup"));
    let _b = machine
        .notifier()
        .subscribe_app_state_changed(|_| call!("changed"));
    machine.request_transition("Login");
    cr.verify(["changed", "page:login", "vm:login"]);
    // Nominally already in Login, but startup bypasses the guard.
    machine.go_to_startup_state();
    cr.verify(["startup", "changed", "vm:login"]);
    assert_eq!(machine.current_state(), Some(AppState::new("Login")));
}

#[test]
fn default_state_transition_is_forced() {
    let mut cr = CallRecorder::new();
    let machine = login_home_machine();
    machine.request_transition("Home");
    cr.verify(["page:home", "vm:home"]);
    machine.go_to_default_state();
    cr.verify(["vm:home"]);
    assert_eq!(machine.current_state(), Some(AppState::new("Home")));
}

#[test]
fn same_kind_destination_reuses_the_page() {
    let mut cr = CallRecorder::new();
    let machine = StateMachine::builder()
        .register("Inbox", "Inbox", factory(HOME_PAGE, "inbox"))
        .register("Archive", "Archive", factory(HOME_PAGE, "archive"))
        .startup_state("Inbox")
        .default_state("Inbox")
        .build()
        .unwrap();
    let _a = machine
        .notifier()
        .subscribe_main_page_change(|_| call!("page-swap"));
    let _b = machine
        .notifier()
        .subscribe_binding_context_change(|_| call!("rebind"));
    machine.request_transition("Inbox");
    let shown = machine.current_page().unwrap();
    machine.request_transition("Archive");
    cr.verify([
        "page:inbox",
        "vm:inbox",
        "page-swap",
        "vm:archive",
        "rebind",
    ]);
    // Same shell instance, only the binding context was replaced.
    assert!(Rc::ptr_eq(&shown, &machine.current_page().unwrap()));
}

#[test]
fn different_kind_destination_replaces_the_page() {
    let mut cr = CallRecorder::new();
    let machine = login_home_machine();
    let _a = machine
        .notifier()
        .subscribe_main_page_change(|m| call!("page-swap:{}", m.new_page.kind()));
    let _b = machine
        .notifier()
        .subscribe_binding_context_change(|_| call!("rebind"));
    machine.request_transition("Login");
    let login_page = machine.current_page().unwrap();
    machine.request_transition("Home");
    cr.verify([
        "page:login",
        "vm:login",
        "page-swap:LoginPage",
        "page:home",
        "vm:home",
        "page-swap:HomePage",
    ]);
    let home_page = machine.current_page().unwrap();
    assert!(!Rc::ptr_eq(&login_page, &home_page));
    assert_eq!(home_page.kind(), HOME_PAGE);
    // The new page is the comparison target from now on.
    machine.request_transition_with(
        "Home",
        TransitionOptions {
            force: true,
            ..TransitionOptions::default()
        },
    );
    cr.verify(["vm:home", "rebind"]);
    assert!(Rc::ptr_eq(&home_page, &machine.current_page().unwrap()));
}

#[test]
fn unregistered_state_proceeds_without_a_page() {
    let mut cr = CallRecorder::new();
    let machine = login_home_machine();
    let _a = machine
        .notifier()
        .subscribe_app_state_changed(|_| call!("changed"));
    let _b = machine
        .notifier()
        .subscribe_main_page_change(|_| call!("page-swap"));
    assert!(machine.request_transition("Diagnostics"));
    cr.verify("changed");
    assert_eq!(machine.current_state(), Some(AppState::new("Diagnostics")));
    assert!(machine.current_page().is_none());
}

#[test]
fn declined_page_factory_displays_nothing() {
    let mut cr = CallRecorder::new();
    let machine = StateMachine::builder()
        .register(
            "Hidden",
            "Hidden",
            PageFactory::new(
                LOGIN_PAGE,
                || None,
                || Some(Rc::new(StubViewModel) as Rc<dyn ViewModel>),
            ),
        )
        .startup_state("Hidden")
        .default_state("Hidden")
        .build()
        .unwrap();
    let _a = machine
        .notifier()
        .subscribe_main_page_change(|_| call!("page-swap"));
    let _b = machine
        .notifier()
        .subscribe_binding_context_change(|_| call!("rebind"));
    assert!(machine.request_transition("Hidden"));
    cr.verify(());
    assert!(machine.current_page().is_none());
}

#[test]
fn declined_view_model_factory_displays_nothing() {
    let mut cr = CallRecorder::new();
    let machine = StateMachine::builder()
        .register(
            "Hidden",
            "Hidden",
            PageFactory::new(
                LOGIN_PAGE,
                || Some(Rc::new(StubPage::new(LOGIN_PAGE)) as Rc<dyn Page>),
                || None,
            ),
        )
        .startup_state("Hidden")
        .default_state("Hidden")
        .build()
        .unwrap();
    let _a = machine
        .notifier()
        .subscribe_main_page_change(|_| call!("page-swap"));
    assert!(machine.request_transition("Hidden"));
    cr.verify(());
    assert!(machine.current_page().is_none());
}

#[test]
fn handler_requesting_a_transition_sees_the_applied_state() {
    let mut cr = CallRecorder::new();
    let machine = Rc::new(login_home_machine());
    let _s = machine.notifier().subscribe_app_state_changed({
        let machine = machine.clone();
        move |m| {
            // First transition only; the nested request must observe the
            // already-recorded state, so this cannot recurse.
            if m.previous_state.is_none() {
                machine.request_transition("Home");
            }
        }
    });
    machine.request_transition("Login");
    // The nested transition wins the state record; the outer one still
    // finishes its own resolution (nested same-tick ordering is best-effort).
    assert_eq!(machine.current_state(), Some(AppState::new("Home")));
    cr.verify(["page:home", "vm:home", "page:login", "vm:login"]);
}

#[test]
fn lifecycle_wiring_follows_the_displayed_page() {
    let mut cr = CallRecorder::new();
    let login_page = Rc::new(StubPage::new(LOGIN_PAGE));
    let machine = StateMachine::builder()
        .register(
            "Login",
            "Sign in",
            PageFactory::new(
                LOGIN_PAGE,
                {
                    let page = login_page.clone();
                    move || Some(page.clone() as Rc<dyn Page>)
                },
                || Some(Rc::new(WatchingViewModel) as Rc<dyn ViewModel>),
            ),
        )
        .register("Home", "Home", factory(HOME_PAGE, "home"))
        .startup_state("Login")
        .default_state("Home")
        .build()
        .unwrap();

    machine.request_transition("Login");
    login_page.lifecycle.publish(&PageLifecycleEvent::Appearing);
    login_page
        .lifecycle
        .publish(&PageLifecycleEvent::Disappearing);
    cr.verify(["appearing", "disappearing"]);

    // Swapping pages drops the wiring with the transition record.
    machine.request_transition("Home");
    login_page.lifecycle.publish(&PageLifecycleEvent::Appearing);
    cr.verify(["page:home", "vm:home"]);
}

#[test]
fn build_rejects_duplicate_states() {
    let err = StateMachine::builder()
        .register("Login", "Sign in", factory(LOGIN_PAGE, "a"))
        .register("Login", "Sign in again", factory(LOGIN_PAGE, "b"))
        .startup_state("Login")
        .default_state("Login")
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::DuplicateState(AppState::new("Login")));
}

#[test]
fn build_requires_designated_states() {
    let err = StateMachine::builder()
        .register("Login", "Sign in", factory(LOGIN_PAGE, "a"))
        .default_state("Login")
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::MissingStartupState);

    let err = StateMachine::builder()
        .register("Login", "Sign in", factory(LOGIN_PAGE, "a"))
        .startup_state("Login")
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::MissingDefaultState);
}
