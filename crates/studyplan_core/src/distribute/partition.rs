//! Stable per-subject partitioning of the input item sequence.
//!
//! # Invariants
//! - Queue order equals input order restricted to that subject.
//! - Queues are listed in first-seen subject order.

use crate::model::item::StudyItem;
use std::collections::HashMap;

/// FIFO of same-subject items awaiting a day.
///
/// Items live in an owned slot array; `head` is the read cursor, so popping
/// never shifts or reallocates.
#[derive(Debug)]
pub struct SubjectQueue {
    subject: String,
    slots: Vec<Option<StudyItem>>,
    head: usize,
}

impl SubjectQueue {
    fn new(subject: String) -> Self {
        Self {
            subject,
            slots: Vec::new(),
            head: 0,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.head
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the front item without removing it.
    pub fn peek(&self) -> Option<&StudyItem> {
        self.slots.get(self.head).and_then(Option::as_ref)
    }

    /// Removes and returns the front item.
    pub fn pop_front(&mut self) -> Option<StudyItem> {
        let item = self.slots.get_mut(self.head)?.take()?;
        self.head += 1;
        Some(item)
    }
}

/// All subject queues of one distribution run.
#[derive(Debug, Default)]
pub struct SubjectQueues {
    queues: Vec<SubjectQueue>,
    positions: HashMap<String, usize>,
}

impl SubjectQueues {
    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Number of distinct subjects.
    pub fn subject_count(&self) -> usize {
        self.queues.len()
    }

    /// Items remaining across every queue.
    pub fn total_len(&self) -> usize {
        self.queues.iter().map(SubjectQueue::len).sum()
    }

    /// Subjects in first-seen input order.
    pub fn subjects(&self) -> impl Iterator<Item = &str> + '_ {
        self.queues.iter().map(SubjectQueue::subject)
    }

    pub fn get(&self, subject: &str) -> Option<&SubjectQueue> {
        self.position(subject).map(|position| &self.queues[position])
    }

    /// Queue slot for `subject`, stable for the lifetime of this value.
    pub fn position(&self, subject: &str) -> Option<usize> {
        self.positions.get(subject).copied()
    }

    /// Pops the front item of the queue at `position`.
    pub fn pop_at(&mut self, position: usize) -> Option<StudyItem> {
        self.queues.get_mut(position)?.pop_front()
    }

    /// Pops from the first non-empty queue in first-seen order.
    pub fn pop_first_available(&mut self) -> Option<StudyItem> {
        self.queues
            .iter_mut()
            .find(|queue| !queue.is_empty())
            .and_then(SubjectQueue::pop_front)
    }

    fn push(&mut self, item: StudyItem) {
        let position = match self.positions.get(item.subject.as_str()) {
            Some(position) => *position,
            None => {
                let position = self.queues.len();
                self.queues.push(SubjectQueue::new(item.subject.clone()));
                self.positions.insert(item.subject.clone(), position);
                position
            }
        };
        self.queues[position].slots.push(Some(item));
    }
}

/// Groups `items` into per-subject FIFO queues.
///
/// Existing `day_index` values are carried as-is; the allocator overwrites them.
pub fn partition(items: impl IntoIterator<Item = StudyItem>) -> SubjectQueues {
    let mut queues = SubjectQueues::default();
    for item in items {
        queues.push(item);
    }
    queues
}

#[cfg(test)]
mod tests {
    use super::partition;
    use crate::model::item::StudyItem;

    #[test]
    fn empty_input_yields_no_queues() {
        let queues = partition(Vec::new());
        assert!(queues.is_empty());
        assert_eq!(queues.total_len(), 0);
    }

    #[test]
    fn partition_is_stable_per_subject() {
        let items = vec![
            StudyItem::new("Math", "m1"),
            StudyItem::new("English", "e1"),
            StudyItem::new("Math", "m2"),
            StudyItem::new("English", "e2"),
            StudyItem::new("Math", "m3"),
        ];
        let mut queues = partition(items);

        assert_eq!(queues.subjects().collect::<Vec<_>>(), ["Math", "English"]);
        assert_eq!(queues.get("Math").map(|queue| queue.len()), Some(3));
        assert_eq!(queues.total_len(), 5);

        let math = queues.position("Math").expect("math queue");
        let topics = std::iter::from_fn(|| queues.pop_at(math))
            .map(|item| item.topic)
            .collect::<Vec<_>>();
        assert_eq!(topics, ["m1", "m2", "m3"]);
        assert_eq!(queues.total_len(), 2);
    }

    #[test]
    fn pop_first_available_skips_drained_queues() {
        let mut queues = partition(vec![
            StudyItem::new("Math", "m1"),
            StudyItem::new("Art", "a1"),
        ]);
        assert_eq!(
            queues.pop_first_available().map(|item| item.topic),
            Some("m1".to_string())
        );
        assert_eq!(
            queues.pop_first_available().map(|item| item.topic),
            Some("a1".to_string())
        );
        assert!(queues.pop_first_available().is_none());
        assert_eq!(queues.get("Math").and_then(|queue| queue.peek()), None);
    }
}
