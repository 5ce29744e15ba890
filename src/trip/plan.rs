use crate::trip::item::PlannedItem;
use chrono::NaiveDateTime;

/// All planned items of one trip
///
/// Items live in a Vec so the CSV file keeps insertion order and produces
/// stable diffs when committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripPlan {
    pub(crate) items: Vec<PlannedItem>,
}

impl TripPlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan from already decoded items
    pub fn from_items(items: Vec<PlannedItem>) -> Self {
        Self { items }
    }

    /// All items in insertion order
    pub fn items(&self) -> &[PlannedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the first item with the given title
    pub fn find_by_title(&self, title: &str) -> Option<&PlannedItem> {
        self.items.iter().find(|i| i.title == title)
    }

    /// Find the first item with the given title and return a mutable reference
    pub fn find_by_title_mut(&mut self, title: &str) -> Option<&mut PlannedItem> {
        self.items.iter_mut().find(|i| i.title == title)
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.find_by_title(title).is_some()
    }

    /// Append an item to the end of the plan
    pub fn add(&mut self, item: PlannedItem) {
        self.items.push(item);
    }

    /// Remove the first item with the given title and return it
    pub fn remove_by_title(&mut self, title: &str) -> Option<PlannedItem> {
        let pos = self.items.iter().position(|i| i.title == title)?;
        Some(self.items.remove(pos))
    }

    /// Replace the first item with the given title, keeping its position
    ///
    /// # Returns
    /// The previous item if one was found
    pub fn update(&mut self, title: &str, item: PlannedItem) -> Option<PlannedItem> {
        let slot = self.find_by_title_mut(title)?;
        Some(std::mem::replace(slot, item))
    }

    /// Schedule the first item with the given title at `start`
    ///
    /// # Returns
    /// The scheduled item, or `None` if no item has that title
    pub fn schedule(&mut self, title: &str, start: NaiveDateTime) -> Option<&PlannedItem> {
        let item = self.find_by_title_mut(title)?;
        item.schedule_at(start);
        Some(item)
    }

    /// Take the first item with the given title off the calendar
    pub fn unschedule(&mut self, title: &str) -> Option<&PlannedItem> {
        let item = self.find_by_title_mut(title)?;
        item.unschedule();
        Some(item)
    }
}
