//! 文件选择存储 - 业务能力层
//!
//! 只负责"保存当前选择"，不做扩展名校验（那是提交协议的事）

use crate::models::InputFile;
use crate::workflow::events::{EventBus, WorkflowEvent};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// 当前选择
///
/// 每次选择整体替换；编排器通过 `snapshot()` 只读访问。
pub struct SelectionStore {
    files: Mutex<Arc<[InputFile]>>,
    events: EventBus,
}

impl SelectionStore {
    pub fn new(events: EventBus) -> Self {
        Self {
            files: Mutex::new(Arc::from(Vec::new())),
            events,
        }
    }

    /// 替换当前选择并通知监听者文件数量
    ///
    /// 空选择同样接受。
    pub fn set_selection(&self, files: Vec<InputFile>) {
        let count = files.len();
        *self.files.lock().unwrap_or_else(PoisonError::into_inner) = Arc::from(files);

        debug!("选择已更新: {} 个文件", count);
        self.events.emit(WorkflowEvent::SelectionChanged { count });
    }

    /// 当前选择的不可变快照
    pub fn snapshot(&self) -> Arc<[InputFile]> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new(EventBus::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_replaced_wholesale() {
        let store = SelectionStore::default();
        store.set_selection(vec![InputFile::new("a.txt", "1"), InputFile::new("b.txt", "2")]);
        store.set_selection(vec![InputFile::new("c.png", "3")]);

        let names: Vec<_> = store.snapshot().iter().map(|f| f.name.clone()).collect();
        assert_eq!(names, ["c.png"]);
    }

    #[test]
    fn earlier_snapshot_is_unaffected_by_new_selection() {
        let store = SelectionStore::default();
        store.set_selection(vec![InputFile::new("a.txt", "1")]);
        let before = store.snapshot();

        store.set_selection(vec![]);

        assert_eq!(before.len(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn count_is_signalled_even_for_empty_selection() {
        let events = EventBus::default();
        let mut rx = events.subscribe();
        let store = SelectionStore::new(events);

        store.set_selection(vec![InputFile::new("a.txt", "1"), InputFile::new("b.png", "2")]);
        store.set_selection(vec![]);

        assert_eq!(rx.recv().await.unwrap(), WorkflowEvent::SelectionChanged { count: 2 });
        assert_eq!(rx.recv().await.unwrap(), WorkflowEvent::SelectionChanged { count: 0 });
    }
}
