use crate::events::WindowDescriptor;

/// Решить, достойно ли наблюдение уведомления.
///
/// Политика:
/// 1. первое наблюдение идентификатора - уведомляем всегда, независимо от
///    активности: потребителю нужна базовая запись по каждому окну;
/// 2. дальше уведомляем только если окно сейчас активно (смена заголовка
///    пришла, пока окно держит фокус);
/// 3. частый шумный случай "свойство изменилось у НЕ сфокусированного окна"
///    подавляется.
pub fn should_notify(descriptor: &WindowDescriptor, is_new_subscription: bool) -> bool {
    if is_new_subscription {
        return true;
    }

    descriptor.is_active
}
