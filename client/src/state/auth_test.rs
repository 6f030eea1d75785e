use super::*;
use session::SessionCell;

#[test]
fn signal_cell_reads_back_what_was_set() {
    let cell = SignalCell::new(RwSignal::new(SessionState::restoring()));
    assert!(cell.get().loading);

    cell.set(SessionState::signed_out());
    assert_eq!(cell.get(), SessionState::signed_out());
    assert_eq!(cell.signal().get_untracked(), SessionState::signed_out());
}

#[test]
fn context_starts_in_restoring_state() {
    let ctx = SessionContext::new(RwSignal::new(SessionState::restoring()));
    assert!(ctx.loading());
    assert!(!ctx.is_authenticated());
    assert_eq!(ctx.user(), None);
}

#[test]
fn initialize_without_browser_storage_ends_signed_out() {
    let ctx = SessionContext::new(RwSignal::new(SessionState::restoring()));
    let state = ctx.initialize();
    assert_eq!(state, SessionState::signed_out());
    assert!(!ctx.loading());
    assert_eq!(ctx.state_signal().get_untracked(), SessionState::signed_out());
}

#[test]
fn logout_while_signed_out_is_harmless() {
    let ctx = SessionContext::new(RwSignal::new(SessionState::signed_out()));
    ctx.logout();
    assert!(!ctx.is_authenticated());
    assert!(!ctx.has_role(Role::Admin));
}
