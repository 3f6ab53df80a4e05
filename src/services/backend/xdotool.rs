use crate::error::{Result, WinwatchError};
use crate::events::WindowDescriptor;
use std::process::Command;
use tracing::debug;

pub struct XdotoolAdapter;

impl XdotoolAdapter {
    pub fn new() -> Self {
        Self
    }

    fn query(args: &[&str]) -> Result<String> {
        let output = Command::new("xdotool")
            .args(args)
            .output()
            .map_err(|e| {
                debug!("xdotool не найден или не работает: {}", e);
                WinwatchError::Internal(format!("xdotool не найден: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("xdotool вернул ошибку: {}", stderr);
            return Err(WinwatchError::Internal(format!("xdotool вернул ошибку: {}", stderr)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub async fn probe(&self) -> Result<()> {
        let output = Command::new("xdotool").args(["getactivewindow", "getwindowname"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(WinwatchError::Internal("xdotool failed".to_string()))
        }
    }

    pub async fn snapshot(&self) -> Result<WindowDescriptor> {
        debug!("Попытка получить активное окно через xdotool");

        let window_id = Self::query(&["getactivewindow"])?;
        if window_id.is_empty() {
            return Err(WinwatchError::Internal("xdotool вернул пустой id окна".to_string()));
        }

        let caption = Self::query(&["getwindowname", &window_id])?;
        debug!("xdotool получил окно {}: '{}'", window_id, caption);

        let mut descriptor = WindowDescriptor::new(&window_id)
            .with_caption(caption)
            .active(true);

        if let Ok(class) = Self::query(&["getwindowclassname", &window_id]) {
            if !class.is_empty() {
                descriptor = descriptor.with_resource_class(class);
            }
        } else {
            debug!("Не удалось получить класс окна");
        }

        if let Ok(pid_str) = Self::query(&["getwindowpid", &window_id]) {
            if let Ok(pid) = pid_str.parse::<i32>() {
                descriptor = descriptor.with_pid(pid);
            }
        }

        Ok(descriptor)
    }
}
