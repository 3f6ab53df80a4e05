use crate::error::{Result, WinwatchError};
use crate::events::WindowDescriptor;
use serde_json::Value;
use std::process::Command;

pub struct SwayAdapter;

impl SwayAdapter {
    pub fn new() -> Self {
        Self
    }

    pub async fn probe(&self) -> Result<()> {
        let output = Command::new("swaymsg").args(["-t", "get_tree"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(WinwatchError::Internal("sway failed".to_string()))
        }
    }

    pub async fn snapshot(&self) -> Result<WindowDescriptor> {
        let output = Command::new("swaymsg")
            .args(["-t", "get_tree"])
            .output()
            .map_err(|e| WinwatchError::Internal(format!("swaymsg не найден: {}", e)))?;

        if !output.status.success() {
            return Err(WinwatchError::Internal("swaymsg вернул ошибку".to_string()));
        }

        let tree: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| WinwatchError::Internal(format!("swaymsg вернул неразбираемый JSON: {}", e)))?;

        Self::find_focused(&tree)
            .and_then(Self::descriptor_from_node)
            .ok_or_else(|| WinwatchError::Internal("Активное окно в Sway не найдено".to_string()))
    }

    /// Обход дерева контейнеров в поисках узла с focused=true
    fn find_focused(node: &Value) -> Option<&Value> {
        let is_container = matches!(
            node.get("type").and_then(Value::as_str),
            Some("con") | Some("floating_con")
        );
        if is_container && node.get("focused").and_then(Value::as_bool) == Some(true) {
            return Some(node);
        }

        for key in ["nodes", "floating_nodes"] {
            if let Some(children) = node.get(key).and_then(Value::as_array) {
                for child in children {
                    if let Some(found) = Self::find_focused(child) {
                        return Some(found);
                    }
                }
            }
        }

        None
    }

    fn descriptor_from_node(node: &Value) -> Option<WindowDescriptor> {
        // Идентификатор контейнера стабилен на время жизни окна
        let id = node.get("id").and_then(Value::as_i64)?;

        let mut descriptor = WindowDescriptor::new(id.to_string()).active(true);

        if let Some(caption) = node.get("name").and_then(Value::as_str) {
            descriptor = descriptor.with_caption(caption);
        }

        // Нативные wayland-окна несут app_id, XWayland - window_properties
        if let Some(app_id) = node.get("app_id").and_then(Value::as_str) {
            descriptor = descriptor.with_resource_class(app_id);
        } else if let Some(properties) = node.get("window_properties") {
            if let Some(class) = properties.get("class").and_then(Value::as_str) {
                descriptor = descriptor.with_resource_class(class);
            }
            if let Some(instance) = properties.get("instance").and_then(Value::as_str) {
                descriptor = descriptor.with_resource_name(instance);
            }
        }

        if let Some(pid) = node.get("pid").and_then(Value::as_i64) {
            descriptor = descriptor.with_pid(pid as i32);
        }

        Some(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_focused_wayland_window() {
        let tree = json!({
            "type": "root",
            "nodes": [{
                "type": "workspace",
                "focused": false,
                "nodes": [{
                    "type": "con",
                    "id": 17,
                    "focused": true,
                    "name": "Inbox",
                    "app_id": "thunderbird",
                    "pid": 4242,
                    "nodes": []
                }]
            }]
        });

        let descriptor = SwayAdapter::find_focused(&tree)
            .and_then(SwayAdapter::descriptor_from_node)
            .unwrap();

        assert_eq!(descriptor.handle.as_deref(), Some("17"));
        assert_eq!(descriptor.caption.as_deref(), Some("Inbox"));
        assert_eq!(descriptor.resource_class.as_deref(), Some("thunderbird"));
        assert_eq!(descriptor.pid, Some(4242));
    }

    #[test]
    fn test_xwayland_window_properties() {
        let node = json!({
            "type": "con",
            "id": 3,
            "focused": true,
            "name": "Терминал",
            "pid": 77,
            "window_properties": { "class": "URxvt", "instance": "urxvt" }
        });

        let descriptor = SwayAdapter::descriptor_from_node(&node).unwrap();
        assert_eq!(descriptor.resource_class.as_deref(), Some("URxvt"));
        assert_eq!(descriptor.resource_name.as_deref(), Some("urxvt"));
    }

    #[test]
    fn test_focused_workspace_is_not_a_window() {
        // Фокус на пустом workspace - активного окна нет
        let tree = json!({
            "type": "root",
            "nodes": [{
                "type": "workspace",
                "focused": true,
                "nodes": []
            }]
        });

        assert!(SwayAdapter::find_focused(&tree).is_none());
    }
}
