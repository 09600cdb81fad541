use rstest::rstest;

use super::*;

#[test]
fn equality_is_ordinal() {
    assert_eq!(AppState::new("Login"), AppState::new("Login"));
    assert_ne!(AppState::new("Login"), AppState::new("login"));
    assert_ne!(AppState::new("Login"), AppState::new("Home"));
}

#[test]
fn display_is_the_token() {
    assert_eq!(AppState::new("Home").to_string(), "Home");
}

#[rstest]
#[case("Login")]
#[case("")]
#[case("state with spaces")]
fn any_string_is_accepted(#[case] name: &str) {
    let state = AppState::new(name);
    assert_eq!(state.as_str(), name);
}

#[test]
fn serde_round_trip() {
    let state = AppState::new("Settings");
    let json = serde_json::to_string(&state).unwrap();
    assert_eq!(json, "\"Settings\"");
    let back: AppState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}

#[test]
fn menu_navigation_state_accessors() {
    let menu = MenuNavigationState::new("Home", "Start page");
    assert_eq!(menu.state(), &AppState::new("Home"));
    assert_eq!(menu.label(), "Start page");
}
