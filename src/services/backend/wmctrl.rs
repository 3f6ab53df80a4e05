use crate::error::{Result, WinwatchError};
use crate::events::WindowDescriptor;
use std::process::Command;

pub struct WmctrlAdapter;

impl WmctrlAdapter {
    pub fn new() -> Self {
        Self
    }

    pub async fn probe(&self) -> Result<()> {
        let output = Command::new("wmctrl").args(["-lp"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(WinwatchError::Internal("wmctrl failed".to_string()))
        }
    }

    pub async fn snapshot(&self) -> Result<WindowDescriptor> {
        let output = Command::new("wmctrl")
            .args(["-lp"])
            .output()
            .map_err(|e| WinwatchError::Internal(format!("wmctrl не найден: {}", e)))?;

        if !output.status.success() {
            return Err(WinwatchError::Internal("wmctrl вернул ошибку".to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);

        for line in stdout.lines() {
            if line.contains('*') {
                if let Some(descriptor) = Self::parse_active_line(line) {
                    return Ok(descriptor);
                }
            }
        }

        Err(WinwatchError::Internal("Активное окно не найдено".to_string()))
    }

    // Формат `wmctrl -lp`: <id> <рабочий стол> <pid> <хост> <заголовок...>
    fn parse_active_line(line: &str) -> Option<WindowDescriptor> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 5 {
            return None;
        }

        let mut descriptor = WindowDescriptor::new(parts[0])
            .with_caption(parts[4..].join(" "))
            .active(true);

        if let Ok(pid) = parts[2].parse::<i32>() {
            if pid > 0 {
                descriptor = descriptor.with_pid(pid);
            }
        }

        Some(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_active_line() {
        let line = "0x04800005  0 4242   host Inbox — Thunderbird";
        let descriptor = WmctrlAdapter::parse_active_line(line).unwrap();

        assert_eq!(descriptor.handle.as_deref(), Some("0x04800005"));
        assert_eq!(descriptor.caption.as_deref(), Some("Inbox — Thunderbird"));
        assert_eq!(descriptor.pid, Some(4242));
        assert!(descriptor.is_active);
    }

    #[test]
    fn test_parse_rejects_short_line() {
        assert!(WmctrlAdapter::parse_active_line("0x04800005 0 123").is_none());
    }

    #[test]
    fn test_parse_without_pid() {
        // wmctrl без поддержки -p печатает 0 в колонке pid
        let line = "0x02a00007  1 0      host Терминал";
        let descriptor = WmctrlAdapter::parse_active_line(line).unwrap();
        assert_eq!(descriptor.pid, None);
    }
}
