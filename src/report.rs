use log::info;
use tabled::{Style, Table, Tabled};

use crate::retention::Verdict;

/// The one-line outcome handed back to the scheduler.
pub fn format_report(names: &[String]) -> String {
    if names.is_empty() {
        "There were no indices to delete.".to_string()
    } else {
        format!(
            "Successfully deleted {} indices: {}",
            names.len(),
            names.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionType {
    Delete,
    Keep,
}

#[derive(Tabled)]
pub struct PlannedAction {
    #[tabled(display_with("Self::display_action", args))]
    pub action: ActionType,
    pub index: String,
    pub verdict: String,
}

impl PlannedAction {
    pub fn new(index: &str, verdict: Verdict) -> Self {
        let action = if verdict.deletable() {
            ActionType::Delete
        } else {
            ActionType::Keep
        };

        let verdict = match verdict {
            Verdict::TooOld => "outside retention window (too old)",
            Verdict::TooNew => "ahead of future grace boundary (too new)",
            Verdict::InWindow => "within retention window",
            Verdict::Excluded => "excluded",
            Verdict::Unstamped => "no date stamp",
        };

        Self {
            action,
            index: index.to_string(),
            verdict: verdict.to_string(),
        }
    }

    fn display_action(&self) -> String {
        match self.action {
            ActionType::Delete => "------".to_string(),
            ActionType::Keep => "======".to_string(),
        }
    }

    pub fn print_tabled(actions: &[Self]) {
        let table = Table::new(actions).with(Style::modern()).to_string();
        info!("{}", table);
    }
}
