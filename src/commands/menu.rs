//! Interactive menu
//!
//! A loop over [`Screen`]; every screen returns the next one. Invalid input
//! re-asks the same question, every finished action goes back to
//! [`Screen::Main`], and end of input behaves like choosing "exit".

use std::io::Write;
use std::ops::RangeInclusive;

use chrono::Utc;
use tokio::io::AsyncBufRead;
use tracing::{info, warn};

use crate::api::ChatApi;
use crate::chat::ChatSummary;
use crate::console::{parse_choice, Choice, Console};
use crate::error::Result;
use crate::purge::{purge_chat, Period};

const RULE: &str = "==================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    ListChats,
    GroupMenu,
    DeleteAllGroups,
    PrivatePeriod,
    PrivateDialog(Period),
    Exit,
}

pub struct Menu<A: ChatApi, R, W> {
    api: A,
    console: Console<R, W>,
    /// Last full dialog listing; the chat selection prompt picks from it
    chats: Option<Vec<ChatSummary<A::Peer>>>,
    /// Groups and channels, listed once and reused by the group workflows
    groups: Option<Vec<ChatSummary<A::Peer>>>,
}

impl<A, R, W> Menu<A, R, W>
where
    A: ChatApi,
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(api: A, console: Console<R, W>) -> Self {
        Self {
            api,
            console,
            chats: None,
            groups: None,
        }
    }

    /// Run until the user exits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        let mut screen = Screen::Main;
        loop {
            screen = match screen {
                Screen::Main => self.main_menu().await?,
                Screen::ListChats => self.list_chats_screen().await?,
                Screen::GroupMenu => self.group_menu().await?,
                Screen::DeleteAllGroups => self.delete_all_groups().await?,
                Screen::PrivatePeriod => self.private_period().await?,
                Screen::PrivateDialog(period) => self.private_dialog(period).await?,
                Screen::Exit => {
                    self.console.say("👋 До свидания!")?;
                    return Ok(());
                }
            };
        }
    }

    pub async fn disconnect(&mut self) {
        self.api.disconnect().await;
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn console(&self) -> &Console<R, W> {
        &self.console
    }

    pub fn chats(&self) -> Option<&[ChatSummary<A::Peer>]> {
        self.chats.as_deref()
    }

    pub fn groups(&self) -> Option<&[ChatSummary<A::Peer>]> {
        self.groups.as_deref()
    }

    pub fn into_parts(self) -> (A, Console<R, W>) {
        (self.api, self.console)
    }

    /// Fetch every dialog and remember it for the selection prompt.
    pub async fn list_all_chats(&mut self) -> Result<Vec<ChatSummary<A::Peer>>> {
        let chats = self.api.list_dialogs().await?;
        info!("Listed {} chats", chats.len());
        self.chats = Some(chats.clone());
        Ok(chats)
    }

    /// Fetch groups and channels; a non-empty result is cached for reuse.
    pub async fn list_groups_and_channels(&mut self) -> Result<Vec<ChatSummary<A::Peer>>> {
        let groups: Vec<_> = self
            .api
            .list_dialogs()
            .await?
            .into_iter()
            .filter(|c| c.kind.is_group_or_channel())
            .collect();
        info!("Listed {} groups and channels", groups.len());
        if !groups.is_empty() {
            self.groups = Some(groups.clone());
        }
        Ok(groups)
    }

    /// Private dialogs with people (bots excluded)
    pub async fn list_private_dialogs(&mut self) -> Result<Vec<ChatSummary<A::Peer>>> {
        Ok(self
            .api
            .list_dialogs()
            .await?
            .into_iter()
            .filter(|c| c.is_private())
            .collect())
    }

    /// Ask until a number inside `range` is entered. `None` means end of input.
    async fn choose(
        &mut self,
        prompt: &str,
        range: RangeInclusive<usize>,
    ) -> Result<Option<usize>> {
        loop {
            let Some(answer) = self.console.prompt(prompt).await? else {
                return Ok(None);
            };
            match parse_choice(&answer, range.clone()) {
                Choice::Number(n) => return Ok(Some(n)),
                Choice::OutOfRange => self.console.say("❌ Неверный выбор.")?,
                Choice::NotANumber => self.console.say("❌ Введите число.")?,
            }
        }
    }

    async fn main_menu(&mut self) -> Result<Screen> {
        self.console.say(format!("\n{}", RULE))?;
        self.console.say("📋 Меню удаления сообщений:")?;
        self.console
            .say("1. Показать все чаты (группы, каналы, личные)")?;
        self.console.say("2. Удалить сообщения в конкретной группе")?;
        self.console.say("3. Удалить сообщения во всех группах")?;
        self.console.say("4. Удалить личные сообщения")?;
        self.console.say("5. Выход")?;
        self.console.say(RULE)?;

        let Some(answer) = self.console.prompt("Выберите опцию (1-5): ").await? else {
            return Ok(Screen::Exit);
        };

        let next = match answer.as_str() {
            "1" => Screen::ListChats,
            "2" => Screen::GroupMenu,
            "3" => Screen::DeleteAllGroups,
            "4" => Screen::PrivatePeriod,
            "5" => Screen::Exit,
            _ => {
                self.console.say("❌ Неверный выбор. Попробуйте снова.")?;
                Screen::Main
            }
        };
        Ok(next)
    }

    async fn list_chats_screen(&mut self) -> Result<Screen> {
        self.console.say("\n🔍 Поиск всех чатов...")?;

        let chats = match self.list_all_chats().await {
            Ok(chats) => chats,
            Err(err) => {
                warn!("Failed to list chats: {}", err);
                self.console.say(format!("❌ Ошибка: {}", err))?;
                return Ok(Screen::Main);
            }
        };

        if chats.is_empty() {
            self.console.say("❌ Чаты не найдены.")?;
            return Ok(Screen::Main);
        }

        self.console
            .say(format!("\n📋 Найдено {} чатов:", chats.len()))?;
        self.console.say(THIN_RULE)?;
        for (i, chat) in chats.iter().enumerate() {
            self.console
                .say(format!("{:3}. {} {}", i + 1, chat.kind.icon(), chat.name))?;
            self.console.say(format!(
                "      Тип: {} | ID: {}",
                chat.kind.label(),
                chat.id
            ))?;
        }
        self.console.say(THIN_RULE)?;

        let prompt = format!(
            "\nВыберите номер чата для удаления сообщений (1-{}) или 0 для возврата: ",
            chats.len()
        );
        match self.choose(&prompt, 0..=chats.len()).await? {
            None => Ok(Screen::Exit),
            Some(0) => Ok(Screen::Main),
            Some(n) => {
                let Some(chat) = self.chats.as_ref().and_then(|c| c.get(n - 1)).cloned() else {
                    return Ok(Screen::Main);
                };
                purge_chat(&mut self.api, &mut self.console, &chat, None, Utc::now()).await?;
                Ok(Screen::Main)
            }
        }
    }

    /// List groups once so the group workflows have something to work on.
    async fn groups_overview(&mut self) -> Result<Screen> {
        self.console.say("🔍 Сначала получите список групп...")?;
        self.console
            .say("\n🔍 Поиск ваших групп и каналов...")?;

        let groups = match self.list_groups_and_channels().await {
            Ok(groups) => groups,
            Err(err) => {
                warn!("Failed to list groups: {}", err);
                self.console.say(format!("❌ Ошибка: {}", err))?;
                return Ok(Screen::Main);
            }
        };

        if groups.is_empty() {
            self.console.say("❌ Группы и каналы не найдены.")?;
            return Ok(Screen::Main);
        }

        self.console
            .say(format!("\n📋 Найдено {} групп/каналов:", groups.len()))?;
        self.console.say(THIN_RULE)?;
        for (i, group) in groups.iter().enumerate() {
            self.console.say(format!(
                "{:2}. {} {}: {}",
                i + 1,
                group.kind.icon(),
                group.kind.label(),
                group.name
            ))?;
            self.console.say(format!("     ID: {}", group.id))?;
        }
        self.console.say(THIN_RULE)?;

        self.console
            .pause("\nНажмите Enter для возврата в главное меню...")
            .await?;
        Ok(Screen::Main)
    }

    async fn group_menu(&mut self) -> Result<Screen> {
        let Some(groups) = self.groups.clone() else {
            return self.groups_overview().await;
        };

        self.console
            .say("\n📋 Выберите группу для удаления сообщений:")?;
        for (i, group) in groups.iter().enumerate() {
            self.console
                .say(format!("{:2}. {} {}", i + 1, group.kind.icon(), group.name))?;
        }
        let back = groups.len() + 1;
        self.console.say(format!("{:2}. 🔙 Назад", back))?;

        let prompt = format!("\nВыберите номер группы (1-{}): ", back);
        match self.choose(&prompt, 1..=back).await? {
            None => Ok(Screen::Exit),
            Some(n) if n == back => Ok(Screen::Main),
            Some(n) => {
                purge_chat(
                    &mut self.api,
                    &mut self.console,
                    &groups[n - 1],
                    None,
                    Utc::now(),
                )
                .await?;
                Ok(Screen::Main)
            }
        }
    }

    async fn delete_all_groups(&mut self) -> Result<Screen> {
        let Some(groups) = self.groups.clone() else {
            return self.groups_overview().await;
        };

        let confirmed = self
            .console
            .confirm(format!(
                "\n⚠️ Вы уверены, что хотите удалить сообщения во всех {} группах?",
                groups.len()
            ))
            .await?;
        if !confirmed {
            self.console.say("❌ Операция отменена.")?;
            return Ok(Screen::Main);
        }

        let mut total_deleted = 0;
        for group in &groups {
            self.console
                .say(format!("\n🔄 Обработка группы: {}", group.name))?;
            total_deleted +=
                purge_chat(&mut self.api, &mut self.console, group, None, Utc::now()).await?;
        }

        info!("Deleted {} messages across {} groups", total_deleted, groups.len());
        self.console.say(format!(
            "\n✅ Завершено! Всего удалено сообщений: {}",
            total_deleted
        ))?;
        Ok(Screen::Main)
    }

    async fn private_period(&mut self) -> Result<Screen> {
        self.console.say("\n📋 Удаление личных сообщений:")?;
        self.console.say("1. За последние 24 часа")?;
        self.console.say("2. За последнюю неделю")?;
        self.console.say("3. За все время")?;
        self.console.say("4. 🔙 Назад")?;

        let Some(answer) = self.console.prompt("\nВыберите период (1-4): ").await? else {
            return Ok(Screen::Exit);
        };

        match parse_choice(&answer, 1..=4) {
            Choice::Number(4) => Ok(Screen::Main),
            Choice::Number(n) => match Period::from_menu(n) {
                Some(period) => Ok(Screen::PrivateDialog(period)),
                None => Ok(Screen::PrivatePeriod),
            },
            _ => {
                self.console.say("❌ Неверный выбор.")?;
                Ok(Screen::PrivatePeriod)
            }
        }
    }

    async fn private_dialog(&mut self, period: Period) -> Result<Screen> {
        self.console.say("\n🔍 Поиск личных диалогов...")?;

        let dialogs = match self.list_private_dialogs().await {
            Ok(dialogs) => dialogs,
            Err(err) => {
                warn!("Failed to list private dialogs: {}", err);
                self.console.say(format!("❌ Ошибка: {}", err))?;
                return Ok(Screen::Main);
            }
        };

        if dialogs.is_empty() {
            self.console.say("❌ Личные диалоги не найдены.")?;
            return Ok(Screen::Main);
        }

        self.console
            .say(format!("📝 Найдено {} личных диалогов", dialogs.len()))?;
        self.console.say("\nВыберите диалог для очистки:")?;
        for (i, chat) in dialogs.iter().enumerate() {
            self.console.say(format!("{:2}. 💬 {}", i + 1, chat.name))?;
        }
        let back = dialogs.len() + 1;
        self.console.say(format!("{:2}. 🔙 Назад", back))?;

        let prompt = format!("\nВыберите номер диалога (1-{}): ", back);
        match self.choose(&prompt, 1..=back).await? {
            None => Ok(Screen::Exit),
            Some(n) if n == back => Ok(Screen::Main),
            Some(n) => {
                purge_chat(
                    &mut self.api,
                    &mut self.console,
                    &dialogs[n - 1],
                    Some(period),
                    Utc::now(),
                )
                .await?;
                Ok(Screen::Main)
            }
        }
    }
}
