//! Shell App
//!
//! Line commands driving the screen controllers the way taps would.

use std::sync::Arc;

use tap_dial_lib::commands;
use tap_dial_lib::dialing::TapOutcome;
use tap_dial_lib::domain::{DomainResult, ValidationError};
use tap_dial_lib::AppState;

use crate::navigation::{Navigator, Route, RouteStack};
use crate::screens::{AddContactScreen, Alert, ContactListScreen, EditContactScreen};

pub const HELP: &str = "\
list                              列出联系人
add <name> <phone> [avatar]       添加联系人
edit <id> <name> <phone> [avatar] 编辑联系人
tap <id>                          点击头像 (两次拨打)
call <id>                         直接拨打
reset                             清空联系人
logs                              最近日志
quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Add { name: String, phone: String, avatar: Option<String> },
    Edit { id: String, name: String, phone: String, avatar: Option<String> },
    Tap(String),
    Call(String),
    Reset,
    Logs,
    Help,
    Quit,
}

impl ShellCommand {
    /// `Ok(None)` for a blank line. Unknown words show the help.
    pub fn parse(line: &str) -> DomainResult<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let mut arg = |name: &'static str| -> DomainResult<String> {
            words
                .next()
                .map(str::to_string)
                .ok_or_else(|| ValidationError::MissingParam(name).into())
        };

        let cmd = match verb.to_lowercase().as_str() {
            "list" | "ls" => ShellCommand::List,
            "add" => ShellCommand::Add {
                name: arg("name")?,
                phone: arg("phone")?,
                avatar: arg("avatar").ok(),
            },
            "edit" => ShellCommand::Edit {
                id: arg("id")?,
                name: arg("name")?,
                phone: arg("phone")?,
                avatar: arg("avatar").ok(),
            },
            "tap" => ShellCommand::Tap(arg("id")?),
            "call" => ShellCommand::Call(arg("id")?),
            "reset" => ShellCommand::Reset,
            "logs" => ShellCommand::Logs,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            _ => ShellCommand::Help,
        };
        Ok(Some(cmd))
    }
}

pub struct App {
    state: Arc<AppState>,
    nav: Arc<RouteStack>,
    list: ContactListScreen,
}

impl App {
    pub fn new(state: Arc<AppState>) -> Self {
        let nav = Arc::new(RouteStack::new());
        let list = ContactListScreen::new(state.clone(), nav.clone());
        Self { state, nav, list }
    }

    pub fn route(&self) -> Route {
        self.nav.current()
    }

    /// Run one command and return the lines to print
    pub async fn run(&mut self, cmd: ShellCommand) -> Vec<String> {
        let mut out = Vec::new();
        match cmd {
            ShellCommand::List => {
                self.list.on_focus().await;
                out.extend(self.render_list());
                out.extend(self.list.take_alert().map(show_alert));
            }
            ShellCommand::Add { name, phone, avatar } => {
                self.nav.push(Route::Add);
                let mut screen = AddContactScreen::new(self.state.clone(), self.nav.clone());
                screen.form.set_name(&name);
                screen.form.set_phone(&phone);
                if let Some(avatar) = avatar {
                    screen.form.set_avatar(&avatar);
                }
                if let Some(error) = screen.form.phone_error() {
                    out.push(error.to_string());
                }
                if let Ok(contact) = screen.save().await {
                    out.push(format!("{} {} ({})", contact.id, contact.name, contact.phone_number));
                } else {
                    screen.cancel();
                }
                out.extend(screen.take_alert().map(show_alert));
            }
            ShellCommand::Edit { id, name, phone, avatar } => {
                self.list.on_focus().await;
                if !self.list.open_edit(&id) {
                    out.push(format!("没有这个联系人: {}", id));
                    return out;
                }
                let route = self.nav.current();
                match EditContactScreen::from_route(self.state.clone(), self.nav.clone(), &route) {
                    Ok(mut screen) => {
                        screen.form.set_name(&name);
                        screen.form.set_phone(&phone);
                        if let Some(avatar) = avatar {
                            screen.form.set_avatar(&avatar);
                        }
                        if screen.save().await.is_err() {
                            screen.cancel();
                        }
                        out.extend(screen.take_alert().map(show_alert));
                    }
                    Err(e) => out.push(e.to_string()),
                }
            }
            ShellCommand::Tap(id) => {
                self.list.on_focus().await;
                match self.list.on_avatar_press(&id).await {
                    Some(TapOutcome::Armed) => out.push("再次点击可以拨打".to_string()),
                    Some(TapOutcome::Superseded) => {}
                    Some(TapOutcome::Dialed { url }) => out.push(format!("已拨打 {}", url)),
                    None => {}
                }
                out.extend(self.list.take_alert().map(show_alert));
            }
            ShellCommand::Call(id) => {
                self.list.on_focus().await;
                if let Some(url) = self.list.on_call_press(&id).await {
                    out.push(format!("已拨打 {}", url));
                }
                out.extend(self.list.take_alert().map(show_alert));
            }
            ShellCommand::Reset => match commands::reset_contacts(&self.state).await {
                Ok(()) => out.push("联系人已清空".to_string()),
                Err(e) => out.push(show_alert(Alert::from_error(&e, "操作失败"))),
            },
            ShellCommand::Logs => out.extend(rolling_logger::recent_logs()),
            ShellCommand::Help => out.push(HELP.to_string()),
            ShellCommand::Quit => {}
        }
        out
    }

    fn render_list(&self) -> Vec<String> {
        let cards = self.list.cards();
        if cards.is_empty() {
            return vec!["暂无联系人".to_string()];
        }
        cards
            .into_iter()
            .map(|c| {
                let badge = if c.new_badge { " [未读]" } else { "" };
                format!("{}  {}  {}{}", c.id, c.name, c.phone_number, badge)
            })
            .collect()
    }
}

fn show_alert(alert: Alert) -> String {
    format!("【{}】{}", alert.title, alert.message)
}
