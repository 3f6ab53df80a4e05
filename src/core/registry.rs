use crate::error::{Result, WinwatchError};
use crate::events::{WindowDescriptor, WindowIdentity};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

/// Подписка на уведомления об изменениях одного окна
///
/// Создаётся при первом наблюдении идентификатора и живёт до конца процесса:
/// во входящем контракте нет сигнала "окно закрыто", поэтому подписки
/// намеренно никогда не удаляются (reset() существует только для тестов).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    identity: WindowIdentity,
    caption_hook_attached: bool,
}

impl Subscription {
    fn new(identity: WindowIdentity) -> Self {
        // Единственная точка регистрации хука на смену заголовка:
        // повторное наблюдение того же идентификатора сюда не попадает
        Self {
            identity,
            caption_hook_attached: true,
        }
    }

    pub fn identity(&self) -> &WindowIdentity {
        &self.identity
    }

    pub fn caption_hook_attached(&self) -> bool {
        self.caption_hook_attached
    }
}

/// Реестр идентификаторов окон, за которыми ядро уже следит
///
/// Принадлежит ядру и передаётся компонентам по ссылке, а не глобально.
/// Доступ к записи одного идентификатора сериализуется через entry API,
/// поэтому конкурентные observe() по одному окну не создадут две подписки.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    subscriptions: DashMap<WindowIdentity, Subscription>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self {
            subscriptions: DashMap::new(),
        }
    }

    /// Зафиксировать наблюдение окна.
    ///
    /// Возвращает `true`, если идентификатор виден впервые и подписка была
    /// создана, `false` при повторном наблюдении. Дескриптор без пригодного
    /// идентификатора - ошибка `IdentityUnavailable`, состояние не меняется.
    pub fn observe(&self, descriptor: &WindowDescriptor) -> Result<bool> {
        let identity = descriptor
            .identity()
            .ok_or(WinwatchError::IdentityUnavailable)?;

        match self.subscriptions.entry(identity.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(vacant) => {
                debug!("Новая подписка на окно {}", identity);
                vacant.insert(Subscription::new(identity));
                Ok(true)
            }
        }
    }

    pub fn contains(&self, identity: &WindowIdentity) -> bool {
        self.subscriptions.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Сбросить все подписки.
    ///
    /// Нужен для изоляции тестов; в боевом коде не вызывается.
    pub fn reset(&self) {
        self.subscriptions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_creates_subscription() {
        let registry = IdentityRegistry::new();
        let descriptor = WindowDescriptor::new("w1").with_caption("Inbox").active(true);

        assert!(registry.observe(&descriptor).unwrap());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&WindowIdentity::new("w1")));
    }

    #[test]
    fn test_observe_is_idempotent() {
        let registry = IdentityRegistry::new();
        let descriptor = WindowDescriptor::new("w1").with_caption("Inbox");

        assert!(registry.observe(&descriptor).unwrap());
        for _ in 0..5 {
            assert!(!registry.observe(&descriptor).unwrap());
        }

        // Ровно одна подписка, сколько бы раз окно ни наблюдалось
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_caption_change_keeps_identity() {
        let registry = IdentityRegistry::new();
        let before = WindowDescriptor::new("w1").with_caption("Inbox");
        let after = WindowDescriptor::new("w1").with_caption("Drafts");

        assert!(registry.observe(&before).unwrap());
        // Смена заголовка не делает окно "новым"
        assert!(!registry.observe(&after).unwrap());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_identity_unavailable() {
        let registry = IdentityRegistry::new();
        let descriptor = WindowDescriptor::anonymous().with_caption("???");

        let result = registry.observe(&descriptor);
        assert!(matches!(result, Err(WinwatchError::IdentityUnavailable)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_hook_attached_once() {
        let registry = IdentityRegistry::new();
        let descriptor = WindowDescriptor::new("w1");

        registry.observe(&descriptor).unwrap();
        registry.observe(&descriptor).unwrap();

        let subscription = registry
            .subscriptions
            .get(&WindowIdentity::new("w1"))
            .unwrap();
        assert!(subscription.caption_hook_attached());
        assert_eq!(subscription.identity(), &WindowIdentity::new("w1"));
    }

    #[test]
    fn test_reset_clears_subscriptions() {
        let registry = IdentityRegistry::new();
        registry.observe(&WindowDescriptor::new("w1")).unwrap();
        registry.observe(&WindowDescriptor::new("w2")).unwrap();
        assert_eq!(registry.len(), 2);

        registry.reset();
        assert!(registry.is_empty());

        // После сброса окно снова считается новым
        assert!(registry.observe(&WindowDescriptor::new("w1")).unwrap());
    }
}
