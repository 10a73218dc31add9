use std::cmp::Ordering;
use std::collections::VecDeque;

pub type WidgetBuilder<T, W> = Box<dyn Fn(&T) -> W + Send>;
pub type ItemComparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send>;

/// Ordered list that buffers additions while paused.
///
/// `items` stays sorted by the comparator; a new item goes before the first
/// existing item it does not strictly follow. While paused, additions wait in
/// a FIFO queue and `items` is left untouched.
pub struct PriorityPanel<T, W> {
    items: Vec<(T, W)>,
    pending: VecDeque<T>,
    live: bool,
    builder: WidgetBuilder<T, W>,
    comparator: ItemComparator<T>,
}

impl<T, W> PriorityPanel<T, W> {
    pub fn new(builder: WidgetBuilder<T, W>, comparator: ItemComparator<T>) -> Self {
        Self {
            items: Vec::new(),
            pending: VecDeque::new(),
            live: true,
            builder,
            comparator,
        }
    }

    pub fn add(&mut self, item: T) {
        if self.live {
            self.insert_live(item);
        } else {
            self.pending.push_back(item);
        }
    }

    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.add(item);
        }
    }

    fn insert_live(&mut self, item: T) {
        let position = self
            .items
            .iter()
            .position(|(existing, _)| (self.comparator)(&item, existing) != Ordering::Greater)
            .unwrap_or(self.items.len());
        let widget = (self.builder)(&item);
        self.items.insert(position, (item, widget));
    }

    /// Switching to live drains the pending queue in arrival order.
    pub fn set_live_mode(&mut self, live: bool) {
        self.live = live;
        if live {
            while let Some(item) = self.pending.pop_front() {
                self.insert_live(item);
            }
        }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.pending.clear();
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|(item, _)| item)
    }

    pub fn widget_items(&self) -> impl Iterator<Item = &W> {
        self.items.iter().map(|(_, widget)| widget)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Label for the paused-feed indicator; `None` when nothing is waiting.
    pub fn pending_indicator(&self) -> Option<String> {
        (!self.pending.is_empty()).then(|| format!("{} pending", self.pending.len()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Empty only when nothing is shown and nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.pending.is_empty()
    }
}

impl<T: PartialEq, W> PriorityPanel<T, W> {
    /// Removes a shown or pending item. Returns `false` if it was not present.
    pub fn remove(&mut self, item: &T) -> bool {
        if let Some(index) = self.items.iter().position(|(existing, _)| existing == item) {
            self.items.remove(index);
            return true;
        }
        if let Some(index) = self.pending.iter().position(|pending| pending == item) {
            self.pending.remove(index);
            return true;
        }
        false
    }

    pub fn widget(&self, item: &T) -> Option<&W> {
        self.items
            .iter()
            .find(|(existing, _)| existing == item)
            .map(|(_, widget)| widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Higher `rank` first; ties fall back to insert-at-top.
    fn panel() -> PriorityPanel<(u8, u32), String> {
        PriorityPanel::new(
            Box::new(|item: &(u8, u32)| format!("widget-{}", item.1)),
            Box::new(|a: &(u8, u32), b: &(u8, u32)| b.0.cmp(&a.0)),
        )
    }

    #[test]
    fn inserts_ahead_of_first_item_not_outranking_it() {
        let mut panel = panel();
        panel.add((1, 1));
        panel.add((3, 2));
        panel.add((1, 3));
        panel.add((2, 4));
        let order: Vec<u32> = panel.items().map(|item| item.1).collect();
        assert_eq!(order, vec![2, 4, 3, 1]);
        assert_eq!(panel.widget(&(2, 4)).map(String::as_str), Some("widget-4"));
    }

    #[test]
    fn paused_additions_wait_until_resumed() {
        let mut panel = panel();
        panel.add((1, 1));
        panel.set_live_mode(false);
        panel.add_all([(5, 2), (0, 3)]);
        assert_eq!(panel.len(), 1);
        assert_eq!(panel.pending_indicator().as_deref(), Some("2 pending"));

        assert!(panel.remove(&(0, 3)));
        panel.set_live_mode(true);
        assert_eq!(panel.pending_indicator(), None);
        let order: Vec<u32> = panel.items().map(|item| item.1).collect();
        assert_eq!(order, vec![2, 1]);
        assert!(!panel.remove(&(0, 3)));
    }

    #[test]
    fn empty_means_nothing_shown_and_nothing_pending() {
        let mut panel = panel();
        assert!(panel.is_empty());
        panel.set_live_mode(false);
        panel.add((1, 1));
        assert!(!panel.is_empty());
        panel.clear();
        assert!(panel.is_empty());
    }

    proptest! {
        #[test]
        fn resume_places_every_pending_item_in_order(
            shown in proptest::collection::vec(0u8..5, 0..10),
            paused in proptest::collection::vec(0u8..5, 0..10),
        ) {
            let mut panel = panel();
            let mut next_id = 0u32;
            for rank in shown {
                panel.add((rank, next_id));
                next_id += 1;
            }
            let before: Vec<_> = panel.items().copied().collect();
            panel.set_live_mode(false);
            for rank in &paused {
                panel.add((*rank, next_id));
                next_id += 1;
            }
            let during: Vec<_> = panel.items().copied().collect();
            prop_assert_eq!(&during, &before);

            panel.set_live_mode(true);
            prop_assert_eq!(panel.pending_count(), 0);
            prop_assert_eq!(panel.len(), before.len() + paused.len());
            let ranks: Vec<u8> = panel.items().map(|item| item.0).collect();
            prop_assert!(ranks.windows(2).all(|pair| pair[0] >= pair[1]));
        }
    }
}
