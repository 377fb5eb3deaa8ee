//! Tap-Dial shell entry point

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use tap_dial_lib::AppState;
use tap_dial_ui::app::{App, ShellCommand, HELP};
use tap_dial_ui::device::{console_services, FixedPermission};

const HOME_VAR: &str = "TAP_DIAL_HOME";
const PERMISSION_VAR: &str = "TAP_DIAL_CALL_PERMISSION";

fn app_dir() -> PathBuf {
    std::env::var_os(HOME_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tap-dial-data"))
}

#[tokio::main]
async fn main() {
    let app_dir = app_dir();

    if let Err(e) = rolling_logger::init_logger(app_dir.join("logs"), "TapDial") {
        eprintln!("Logger unavailable: {}", e);
    }

    let permission = FixedPermission::from_setting(std::env::var(PERMISSION_VAR).ok().as_deref());
    let state = match AppState::init(&app_dir, console_services(permission)).await {
        Ok(state) => Arc::new(state),
        Err(e) => {
            log::error!("App init failed: {}", e);
            eprintln!("无法启动: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(state);
    println!("{}", HELP);
    for line in app.run(ShellCommand::List).await {
        println!("{}", line);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("stdin: {}", e);
                break;
            }
        };

        let cmd = match ShellCommand::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        if cmd == ShellCommand::Quit {
            break;
        }
        for out in app.run(cmd).await {
            println!("{}", out);
        }
    }

    let _ = rolling_logger::info("Shell closed");
}
