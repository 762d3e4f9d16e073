//! Shared pop-only task queue

use crate::harvest::WorkItem;
use crate::CoordinationError;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Work items pending for the current run
///
/// The queue is filled once at construction and only ever shrinks. Every
/// worker in the run pops through the same mutex, so no item is handed out
/// twice and an observed empty queue stays empty.
#[derive(Debug)]
pub struct TaskQueue {
    items: Mutex<VecDeque<WorkItem>>,
}

impl TaskQueue {
    pub fn new(items: impl IntoIterator<Item = WorkItem>) -> Self {
        Self {
            items: Mutex::new(items.into_iter().collect()),
        }
    }

    /// Removes and returns the next item, or `None` once drained
    pub fn pop(&self) -> Result<Option<WorkItem>, CoordinationError> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| CoordinationError::Poisoned("task queue"))?;
        Ok(items.pop_front())
    }

    pub fn len(&self) -> Result<usize, CoordinationError> {
        let items = self
            .items
            .lock()
            .map_err(|_| CoordinationError::Poisoned("task queue"))?;
        Ok(items.len())
    }

    pub fn is_empty(&self) -> Result<bool, CoordinationError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn items(ids: &[&str]) -> Vec<WorkItem> {
        ids.iter()
            .map(|id| WorkItem::new(format!("https://example.com/?cid={}", id)))
            .collect()
    }

    #[test]
    fn test_pop_in_order_then_empty() {
        let queue = TaskQueue::new(items(&["A", "B"]));
        assert_eq!(queue.len().unwrap(), 2);

        assert_eq!(queue.pop().unwrap().unwrap().id(), "A");
        assert_eq!(queue.pop().unwrap().unwrap().id(), "B");
        assert!(queue.pop().unwrap().is_none());
        assert!(queue.pop().unwrap().is_none());
        assert!(queue.is_empty().unwrap());
    }

    #[test]
    fn test_concurrent_pops_hand_out_each_item_once() {
        let ids: Vec<String> = (0..1000).map(|i| i.to_string()).collect();
        let queue = Arc::new(TaskQueue::new(
            ids.iter()
                .map(|id| WorkItem::new(format!("https://example.com/?cid={}", id))),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    let mut popped = Vec::new();
                    while let Some(item) = queue.pop().unwrap() {
                        popped.push(item.id().to_string());
                    }
                    popped
                })
            })
            .collect();

        let mut seen = HashSet::new();
        let mut total = 0;
        for handle in handles {
            for id in handle.join().unwrap() {
                total += 1;
                assert!(seen.insert(id), "item handed out twice");
            }
        }

        assert_eq!(total, 1000);
        assert!(queue.is_empty().unwrap());
    }

    #[test]
    fn test_poisoned_queue_is_coordination_error() {
        let queue = Arc::new(TaskQueue::new(items(&["A"])));
        let poisoner = Arc::clone(&queue);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.items.lock().unwrap();
            panic!("poison the queue");
        })
        .join();

        assert!(matches!(
            queue.pop(),
            Err(CoordinationError::Poisoned("task queue"))
        ));
    }
}
