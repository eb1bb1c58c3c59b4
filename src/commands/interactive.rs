//! Interactive purge session
//!
//! Lock the session, connect and sign in, run the menu until exit or Ctrl+C,
//! then disconnect and remove the session files whatever happened.

use std::io::Write;
use std::path::Path;

use tokio::io::AsyncBufRead;
use tokio::signal;
use tracing::{error, info};

use crate::api::{ChatApi, TelegramApi};
use crate::commands::menu::Menu;
use crate::config::Config;
use crate::console::{Console, StdConsole};
use crate::error::Result;
use crate::session::{open_session, purge_session_artifacts, SessionLock, TelegramClient};

/// How the menu ended
#[derive(Debug)]
pub enum Finish {
    Exited,
    Interrupted,
    Failed(crate::error::Error),
}

/// Drive the menu, stopping early on Ctrl+C.
///
/// An in-flight request is dropped together with the menu future; the client
/// library finishes or fails it on its own.
pub async fn run_menu<A, R, W>(menu: &mut Menu<A, R, W>) -> Finish
where
    A: ChatApi,
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    tokio::select! {
        result = menu.run() => match result {
            Ok(()) => Finish::Exited,
            Err(err) => Finish::Failed(err),
        },
        _ = signal::ctrl_c() => Finish::Interrupted,
    }
}

/// Disconnect and remove session artifacts; never fails.
pub fn cleanup(lock: &mut SessionLock, dir: &Path, prefix: &str, out: &mut impl Write) -> usize {
    let _ = writeln!(out, "🧹 Очистка сессионных файлов...");
    lock.release();
    purge_session_artifacts(dir, prefix, out)
}

pub async fn run(config: Config) -> Result<()> {
    let mut lock = SessionLock::acquire(config.lock_file())?;
    let mut console = StdConsole::stdio();

    console.say("🚀 Запуск клиента Telegram...")?;
    let connected = tokio::select! {
        result = connect(&config, &mut console) => result.map(Some),
        _ = signal::ctrl_c() => Ok(None),
    };

    let outcome = match connected {
        Ok(Some(client)) => {
            let mut menu = Menu::new(TelegramApi::new(client), console);
            let finish = run_menu(&mut menu).await;
            menu.disconnect().await;
            finish
        }
        Ok(None) => Finish::Interrupted,
        Err(err) => Finish::Failed(err),
    };

    let mut stdout = std::io::stdout();
    match &outcome {
        Finish::Exited => info!("Menu exited"),
        Finish::Interrupted => {
            info!("Interrupted by user");
            let _ = writeln!(stdout, "\n\n⚠️ Прерывание пользователем");
        }
        Finish::Failed(err) => {
            error!("Session failed: {}", err);
            let _ = writeln!(stdout, "\n❌ Произошла ошибка: {}", err);
        }
    }

    cleanup(&mut lock, Path::new("."), &config.session_name, &mut stdout);
    Ok(())
}

async fn connect<R, W>(config: &Config, console: &mut Console<R, W>) -> Result<TelegramClient>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    let session = open_session(config)?;
    let client = TelegramClient::connect(session, config.api_id);
    let name = client.authorize(config, console).await?;

    console.say("✅ Успешный вход в аккаунт!")?;
    console.say(format!("👤 Привет, {}!", name))?;
    Ok(client)
}
