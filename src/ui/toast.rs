use std::collections::VecDeque;

use super::UiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }
}

/// Bounded FIFO of pending toasts. When full, the oldest toast is dropped.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    capacity: usize,
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            toasts: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, toast: Toast) {
        if self.toasts.len() == self.capacity {
            self.toasts.pop_front();
        }
        self.toasts.push_back(toast);
    }

    /// Queue the toast carried by `event`, if any. Returns true when one was
    /// queued.
    pub fn accept(&mut self, event: &UiEvent) -> bool {
        match event {
            UiEvent::Toast(toast) => {
                self.push(toast.clone());
                true
            }
            _ => false,
        }
    }

    pub fn pop(&mut self) -> Option<Toast> {
        self.toasts.pop_front()
    }

    pub fn peek(&self) -> Option<&Toast> {
        self.toasts.front()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_queue_drops_oldest() {
        let mut queue = ToastQueue::new(2);
        queue.push(Toast::error("one"));
        queue.push(Toast::success("two"));
        queue.push(Toast::error("three"));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop().unwrap().message, "two");
        assert_eq!(queue.pop().unwrap().message, "three");
        assert!(queue.is_empty());
    }

    #[test]
    fn accepts_only_toast_events() {
        let mut queue = ToastQueue::new(1);
        assert!(!queue.accept(&UiEvent::CollapseSidebar));
        assert!(queue.accept(&UiEvent::Toast(Toast::error("first"))));
        assert!(queue.accept(&UiEvent::Toast(Toast::error("second"))));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.peek().map(|t| t.message.as_str()), Some("second"));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut queue = ToastQueue::new(0);
        queue.push(Toast::error("kept"));
        assert_eq!(queue.peek().map(|t| t.kind), Some(ToastKind::Error));
    }
}
