//! Notifications emitted by the layout store.

/// Event broadcast to subscribers (toast layer, logs, tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEvent {
    /// A widget was placed on the dashboard.
    WidgetAdded {
        /// Widget id.
        id: String,
        /// Catalog title, for display.
        title: String,
    },
    /// A widget was taken off the dashboard.
    WidgetRemoved {
        /// Widget id.
        id: String,
        /// Catalog title, for display.
        title: String,
    },
    /// The layout was replaced by the catalog default.
    LayoutReset,
    /// A snapshot reached storage.
    SaveSucceeded {
        /// Store revision contained in the snapshot.
        revision: u64,
    },
    /// A snapshot could not be stored. Local state is kept.
    SaveFailed {
        /// Store revision contained in the snapshot.
        revision: u64,
        /// Human-readable cause.
        error: String,
    },
}

impl LayoutEvent {
    /// Notification text suitable for a toast.
    pub fn message(&self) -> String {
        match self {
            LayoutEvent::WidgetAdded { title, .. } => format!("Added {title} to the dashboard"),
            LayoutEvent::WidgetRemoved { title, .. } => {
                format!("Removed {title} from the dashboard")
            }
            LayoutEvent::LayoutReset => "Dashboard reset to the default layout".to_string(),
            LayoutEvent::SaveSucceeded { .. } => "Layout saved".to_string(),
            LayoutEvent::SaveFailed { error, .. } => {
                format!("Could not save layout ({error}); changes are kept locally")
            }
        }
    }

    /// Returns `true` for events that should be shown as errors.
    pub fn is_failure(&self) -> bool {
        matches!(self, LayoutEvent::SaveFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_widget_title() {
        let added = LayoutEvent::WidgetAdded {
            id: "win-rate".to_string(),
            title: "Win Rate".to_string(),
        };
        assert_eq!(added.message(), "Added Win Rate to the dashboard");
        let removed = LayoutEvent::WidgetRemoved {
            id: "win-rate".to_string(),
            title: "Win Rate".to_string(),
        };
        assert!(removed.message().contains("Win Rate"));
    }

    #[test]
    fn test_save_failed_is_failure() {
        let failed = LayoutEvent::SaveFailed {
            revision: 3,
            error: "disk full".to_string(),
        };
        assert!(failed.is_failure());
        assert!(failed.message().contains("disk full"));
        assert!(!LayoutEvent::SaveSucceeded { revision: 3 }.is_failure());
        assert!(!LayoutEvent::LayoutReset.is_failure());
    }
}
