//! Built-in widget definitions for the trading analytics dashboard.

use super::{WidgetCategory, WidgetDefinition};

/// Returns the standard widget set in picker order.
pub(super) fn definitions() -> Vec<WidgetDefinition> {
    use WidgetCategory::*;

    vec![
        // Metric cards
        WidgetDefinition::new("total-pnl", "Total P&L", Metrics, 3, 2)
            .with_min(2, 2)
            .requires(&["trades"]),
        WidgetDefinition::new("win-rate", "Win Rate", Metrics, 3, 2)
            .with_min(2, 2)
            .requires(&["trades"]),
        WidgetDefinition::new("profit-factor", "Profit Factor", Metrics, 3, 2)
            .with_min(2, 2)
            .requires(&["trades"]),
        WidgetDefinition::new("avg-win-loss", "Avg Win / Loss", Metrics, 3, 2)
            .with_min(2, 2)
            .requires(&["trades"]),
        WidgetDefinition::new("trade-count", "Trade Count", Metrics, 2, 2)
            .requires(&["trades"]),
        // Charts
        WidgetDefinition::new("equity-curve", "Equity Curve", Charts, 8, 4)
            .with_min(4, 3)
            .requires(&["trades", "balances"]),
        WidgetDefinition::new("daily-pnl", "Daily P&L", Charts, 4, 4)
            .with_min(3, 3)
            .requires(&["trades"]),
        WidgetDefinition::new("pnl-calendar", "P&L Calendar", Charts, 6, 5)
            .with_min(4, 4)
            .with_max(12, 8)
            .requires(&["trades"]),
        WidgetDefinition::new("trade-distribution", "Trade Distribution", Charts, 6, 4)
            .with_min(4, 3)
            .requires(&["trades"]),
        // Tables
        WidgetDefinition::new("recent-trades", "Recent Trades", Tables, 12, 4)
            .with_min(6, 3)
            .requires(&["trades"]),
        // Insights
        WidgetDefinition::new("ai-insights", "AI Insights", Insights, 4, 4)
            .with_min(3, 3)
            .premium()
            .requires(&["trades", "journal"]),
        // Gamification
        WidgetDefinition::new("streak-tracker", "Streak Tracker", Gamification, 4, 2)
            .requires(&["trades", "journal"]),
    ]
}
