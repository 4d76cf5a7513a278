use super::*;

#[test]
fn select_server_clears_channel() {
    let mut nav = NavState::default();
    nav.select_server(Uuid::new_v4());
    nav.select_channel(Uuid::new_v4());

    let other = Uuid::new_v4();
    nav.select_server(other);
    assert_eq!(nav.selected_server, Some(other));
    assert_eq!(nav.selected_channel, None);
}

#[test]
fn create_channel_requires_selected_server() {
    let mut nav = NavState::default();
    assert!(!nav.open_create_channel());
    assert_eq!(nav.modal, None);

    nav.select_server(Uuid::new_v4());
    assert!(nav.open_create_channel());
    assert_eq!(nav.modal, Some(Modal::CreateChannel));
}

#[test]
fn server_created_closes_modal_and_selects_server() {
    let mut nav = NavState::default();
    nav.select_server(Uuid::new_v4());
    nav.select_channel(Uuid::new_v4());
    nav.open_create_server();

    let created = Uuid::new_v4();
    nav.server_created(created);
    assert_eq!(nav.modal, None);
    assert_eq!(nav.selected_server, Some(created));
    assert_eq!(nav.selected_channel, None);
}

#[test]
fn reset_clears_everything() {
    let mut nav = NavState::default();
    nav.select_server(Uuid::new_v4());
    nav.open_create_server();
    nav.reset();
    assert_eq!(nav, NavState::default());
}
