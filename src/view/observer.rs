use std::fmt;

use crate::processing::SortKey;
use crate::types::Field;

/// Events emitted by the [`super::ViewComposer`] after each recompute.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Filtered {
        base_rows: usize,
        filtered_rows: usize,
    },
    Sorted {
        keys: Vec<SortKey>,
        rows: usize,
    },
    GroupingChanged {
        field: Option<Field>,
    },
    VisibilityChanged {
        visible_columns: usize,
    },
    /// An action referenced something the composer does not know and was dropped.
    Ignored {
        reason: String,
    },
}

/// Observer hook for view events.
pub trait ViewObserver: Send + Sync {
    fn on_event(&self, event: &ViewEvent);
}

/// Logs view events through `tracing` at debug level.
#[derive(Debug, Default)]
pub struct TracingViewObserver;

impl ViewObserver for TracingViewObserver {
    fn on_event(&self, event: &ViewEvent) {
        tracing::debug!(?event, "view event");
    }
}

/// Counters describing the composer's work so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewStats {
    pub base_rows: usize,
    pub filtered_rows: usize,
    pub filter_runs: u64,
    pub sort_runs: u64,
    pub grouping_changes: u64,
    pub visibility_changes: u64,
    pub ignored_actions: u64,
}

impl fmt::Display for ViewStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows={}/{}, filter_runs={}, sort_runs={}, grouping_changes={}, visibility_changes={}, ignored={}",
            self.filtered_rows,
            self.base_rows,
            self.filter_runs,
            self.sort_runs,
            self.grouping_changes,
            self.visibility_changes,
            self.ignored_actions
        )
    }
}
