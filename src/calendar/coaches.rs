use std::collections::BTreeMap;

use crate::api::Coach;

/// Selector value meaning "no coach chosen yet"
pub const NO_COACH: i64 = 0;

/// Coach list plus the current selection
#[derive(Debug, Clone, Default)]
pub struct CoachSelector {
    coaches: BTreeMap<i64, Coach>,
    selected: i64,
}

impl CoachSelector {
    /// Replace the list and reset the selection to "none"
    pub fn populate(&mut self, coaches: Vec<Coach>) {
        self.coaches = coaches.into_iter().map(|c| (c.id, c)).collect();
        self.selected = NO_COACH;
    }

    /// Change the selection, returning the full record (`None` for the
    /// sentinel or an id that is not in the list)
    pub fn select(&mut self, id: i64) -> Option<Coach> {
        match self.coaches.get(&id) {
            Some(coach) => {
                self.selected = id;
                Some(coach.clone())
            }
            None => {
                self.selected = NO_COACH;
                None
            }
        }
    }

    pub fn selected(&self) -> Option<&Coach> {
        self.coaches.get(&self.selected)
    }

    pub fn selected_id(&self) -> i64 {
        self.selected
    }

    pub fn coaches(&self) -> impl Iterator<Item = &Coach> {
        self.coaches.values()
    }

    pub fn is_empty(&self) -> bool {
        self.coaches.is_empty()
    }
}
