//! 订阅表：话题 → 回调列表

use drone_protocol::Envelope;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 原始（未解码）回调
pub type RawCallback = Arc<dyn Fn(&Envelope) + Send + Sync>;

/// 订阅 ID（在同一传输实例内唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct SubscriberTable {
    next_id: AtomicU64,
    topics: RwLock<HashMap<String, Vec<(SubscriptionId, RawCallback)>>>,
}

impl SubscriberTable {
    pub(crate) fn insert(&self, topic: &str, callback: RawCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.topics.write().entry(topic.to_string()).or_default().push((id, callback));
        id
    }

    pub(crate) fn remove(&self, topic: &str, id: SubscriptionId) {
        let mut topics = self.topics.write();
        if let Some(callbacks) = topics.get_mut(topic) {
            callbacks.retain(|(cb_id, _)| *cb_id != id);
            if callbacks.is_empty() {
                topics.remove(topic);
            }
        }
    }

    /// 将消息分发给该话题的所有回调，返回调用次数
    ///
    /// 回调在锁外执行，回调内部可以再订阅/注销。
    pub(crate) fn dispatch(&self, envelope: &Envelope) -> usize {
        let callbacks: Vec<RawCallback> = match self.topics.read().get(&envelope.topic) {
            Some(list) => list.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
            None => return 0,
        };

        for callback in &callbacks {
            callback(envelope);
        }
        callbacks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn envelope(topic: &str) -> Envelope {
        Envelope {
            topic: topic.to_string(),
            type_name: "test".to_string(),
            payload: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_dispatch_only_matching_topic() {
        let table = SubscriberTable::default();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = Arc::clone(&hits);
        table.insert(
            "/a",
            Arc::new(move |_: &Envelope| {
                h.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(table.dispatch(&envelope("/a")), 1);
        assert_eq!(table.dispatch(&envelope("/b")), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_unregisters_single_callback() {
        let table = SubscriberTable::default();
        let first = table.insert("/a", Arc::new(|_: &Envelope| {}));
        let second = table.insert("/a", Arc::new(|_: &Envelope| {}));
        assert_ne!(first, second);

        table.remove("/a", first);
        assert_eq!(table.dispatch(&envelope("/a")), 1);

        table.remove("/a", second);
        assert_eq!(table.dispatch(&envelope("/a")), 0);

        // 未知 ID 静默忽略
        table.remove("/missing", first);
    }
}
