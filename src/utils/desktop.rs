use std::process::Command;

/// Среда рабочего стола, в которой запущен процесс
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Kde,
    Gnome,
    X11Generic,
    WaylandGeneric,
    Unknown,
}

/// Определить среду по переменным сессии с fallback на запущенные процессы
pub fn detect_session() -> SessionKind {
    if let Ok(desktop) = std::env::var("XDG_CURRENT_DESKTOP") {
        if let Some(kind) = classify_desktop(&desktop) {
            return kind;
        }
    }

    if let Ok(session) = std::env::var("XDG_SESSION_TYPE") {
        if let Some(kind) = classify_session_type(&session) {
            return kind;
        }
    }

    // Переменные не выставлены (например, запуск через sudo) - смотрим процессы
    if process_running("kwin") {
        return SessionKind::Kde;
    }
    if process_running("gnome-shell") {
        return SessionKind::Gnome;
    }

    SessionKind::Unknown
}

fn classify_desktop(desktop: &str) -> Option<SessionKind> {
    let desktop = desktop.to_lowercase();
    if desktop.contains("kde") {
        Some(SessionKind::Kde)
    } else if desktop.contains("gnome") {
        Some(SessionKind::Gnome)
    } else {
        None
    }
}

fn classify_session_type(session: &str) -> Option<SessionKind> {
    match session {
        "wayland" => Some(SessionKind::WaylandGeneric),
        "x11" => Some(SessionKind::X11Generic),
        _ => None,
    }
}

fn process_running(name: &str) -> bool {
    Command::new("pgrep")
        .arg("-f")
        .arg(name)
        .output()
        .map(|output| !output.stdout.is_empty())
        .unwrap_or(false)
}

#[allow(dead_code)]
pub fn is_wayland() -> bool {
    std::env::var("WAYLAND_DISPLAY").is_ok()
        && std::env::var("XDG_SESSION_TYPE")
            .unwrap_or_default()
            .to_lowercase()
            .contains("wayland")
}

#[allow(dead_code)]
pub fn is_x11() -> bool {
    std::env::var("WAYLAND_DISPLAY").is_err()
        && std::env::var_os("XDG_SESSION_TYPE").unwrap_or_default() == "x11"
}
