//! Session lock and cleanup behaviour around an interrupted menu

use std::fs;
use std::time::Duration;

use telegram_purge::commands::interactive::cleanup;
use telegram_purge::commands::Menu;
use telegram_purge::{ChatKind, Console, SessionLock};
use tempfile::tempdir;
use tokio::io::BufReader;

use super::mock::{chat, MockApi};

#[tokio::test(start_paused = true)]
async fn interrupt_mid_menu_cleans_up_session_files() {
    let temp = tempdir().expect("tempdir");
    let lock_path = temp.path().join("user_session.lock");
    for name in ["user_session.session", "user_session.session-journal"] {
        fs::write(temp.path().join(name), b"x").unwrap();
    }
    fs::write(temp.path().join("keep.txt"), b"x").unwrap();

    let mut lock = SessionLock::acquire(&lock_path).expect("lock");

    // Input that never arrives: the menu sits at its first prompt
    let (_keyboard, stdin) = tokio::io::duplex(64);
    let console = Console::new(BufReader::new(stdin), Vec::new());
    let mut menu = Menu::new(MockApi::new(vec![chat(1, "Alice", ChatKind::User)]), console);

    tokio::select! {
        _ = menu.run() => panic!("menu should still be waiting for input"),
        _ = tokio::time::sleep(Duration::from_secs(5)) => {}
    }

    menu.disconnect().await;
    let mut out = Vec::new();
    let removed = cleanup(&mut lock, temp.path(), "user_session", &mut out);

    assert_eq!(removed, 2);
    assert_eq!(menu.api().disconnects, 1);
    assert!(!lock_path.exists());
    assert!(!temp.path().join("user_session.session").exists());
    assert!(!temp.path().join("user_session.session-journal").exists());
    assert!(temp.path().join("keep.txt").exists());
    assert!(String::from_utf8(menu.console().output().clone())
        .unwrap()
        .contains("Выберите опцию (1-5)"));
}

#[test]
fn cleanup_with_files_already_absent_does_not_fail() {
    let temp = tempdir().expect("tempdir");
    let mut lock = SessionLock::acquire(temp.path().join("user_session.lock")).expect("lock");

    let mut out = Vec::new();
    assert_eq!(cleanup(&mut lock, temp.path(), "user_session", &mut out), 0);
    // A second run after everything is gone is still fine
    assert_eq!(cleanup(&mut lock, temp.path(), "user_session", &mut out), 0);
}
