use crate::error::{Result, WinwatchError};
use crate::events::WindowDescriptor;
use std::collections::HashMap;
use std::process::Command;
use tracing::debug;

pub struct KdotoolAdapter;

fn build_env_overrides() -> HashMap<String, String> {
    let mut env_vars = HashMap::new();

    if std::env::var("USER").unwrap_or_default() == "root" {
        if let Ok(sudo_user) = std::env::var("SUDO_USER") {
            if let Ok(output) = Command::new("id").args(["-u", &sudo_user]).output() {
                if let Ok(uid_str) = String::from_utf8(output.stdout) {
                    let uid = uid_str.trim();
                    let user_runtime_dir = format!("/run/user/{}", uid);
                    let dbus_address = format!("unix:path={}/bus", user_runtime_dir);

                    debug!("Подставляем переменные окружения для пользователя {}: uid={}", sudo_user, uid);
                    env_vars.insert("DBUS_SESSION_BUS_ADDRESS".to_string(), dbus_address);
                    env_vars.insert("XDG_RUNTIME_DIR".to_string(), user_runtime_dir);
                    env_vars.insert("USER".to_string(), sudo_user);
                }
            }
        }
    }

    if let Ok(display_var) = std::env::var("DISPLAY") {
        env_vars.insert("DISPLAY".to_string(), display_var);
    }

    env_vars
}

impl KdotoolAdapter {
    pub fn new() -> Self {
        Self
    }

    fn create_command(args: &[&str]) -> Command {
        let mut cmd = if let Ok(sudo_user) = std::env::var("SUDO_USER") {
            let mut cmd = Command::new("sudo");
            cmd.args(["-E", "-u", &sudo_user, "kdotool"]);
            cmd.args(args);
            cmd
        } else {
            let mut cmd = Command::new("kdotool");
            cmd.args(args);
            cmd
        };

        // Применяем подстановки переменных окружения (строим на лету без глобального кэша)
        for (key, value) in build_env_overrides() {
            cmd.env(key, value);
        }

        cmd
    }

    fn query(args: &[&str], what: &str) -> Result<String> {
        let output = Self::create_command(args).output()?;
        if !output.status.success() {
            debug!("kdotool {} failed: {}", what, String::from_utf8_lossy(&output.stderr));
            return Err(WinwatchError::Internal(format!("kdotool {} failed", what)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub async fn probe(&self) -> Result<()> {
        debug!("=== Тестируем kdotool ===");

        let window_id = Self::query(&["getactivewindow"], "getactivewindow")?;
        debug!("kdotool получил window_id: '{}'", window_id);

        Self::query(&["getwindowname", &window_id], "getwindowname")?;

        debug!("=== kdotool работает ===");
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<WindowDescriptor> {
        // Идентификатор окна - ключ дедупликации, поэтому обязателен
        let window_id = Self::query(&["getactivewindow"], "getactivewindow")?;
        if window_id.is_empty() {
            return Err(WinwatchError::Internal("kdotool вернул пустой id окна".to_string()));
        }

        let caption = Self::query(&["getwindowname", &window_id], "getwindowname")?;

        // Класс и pid опциональны: без них снимок всё равно пригоден
        let mut descriptor = WindowDescriptor::new(&window_id)
            .with_caption(caption)
            .active(true);

        if let Ok(class) = Self::query(&["getwindowclassname", &window_id], "getwindowclassname") {
            if !class.is_empty() {
                descriptor = descriptor.with_resource_class(class);
            }
        }

        if let Ok(pid_str) = Self::query(&["getwindowpid", &window_id], "getwindowpid") {
            if let Ok(pid) = pid_str.parse::<i32>() {
                descriptor = descriptor.with_pid(pid);
            }
        }

        Ok(descriptor)
    }
}
