//! Navigation state - the dashboard's view machine
//!
//! The dashboard has three layers: the Home overview, a Category deep-dive,
//! and a Detail panel focused on one metric inside a category. The state is
//! an explicit, serializable value passed through callers, never ambient
//! globals, and the transition function is pure so it can be tested on its
//! own and driven from the `/navigate` route.

use serde::{Deserialize, Serialize};

/// Where the dashboard currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ViewState {
    /// The top-level overview.
    Home,
    /// A business category deep-dive.
    Category { name: String },
    /// A single metric inside a category.
    Detail { name: String, metric: String },
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::Home
    }
}

/// Navigation inputs a frontend can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum NavEvent {
    /// Open a category deep-dive (valid from anywhere).
    OpenCategory(String),
    /// Focus one metric; only meaningful once a category is selected.
    FocusMetric(String),
    /// One layer up: Detail -> Category -> Home.
    Back,
    /// Straight back to the overview.
    Reset,
}

impl ViewState {
    /// Apply a navigation event, producing the next state.
    ///
    /// Total over all (state, event) pairs; events that make no sense in the
    /// current state leave it unchanged.
    pub fn apply(self, event: NavEvent) -> ViewState {
        match (self, event) {
            (_, NavEvent::OpenCategory(name)) => ViewState::Category { name },
            (_, NavEvent::Reset) => ViewState::Home,

            (ViewState::Category { name }, NavEvent::FocusMetric(metric)) => {
                ViewState::Detail { name, metric }
            }
            (ViewState::Detail { name, .. }, NavEvent::FocusMetric(metric)) => {
                ViewState::Detail { name, metric }
            }
            (ViewState::Home, NavEvent::FocusMetric(_)) => ViewState::Home,

            (ViewState::Detail { name, .. }, NavEvent::Back) => ViewState::Category { name },
            (ViewState::Category { .. }, NavEvent::Back) => ViewState::Home,
            (ViewState::Home, NavEvent::Back) => ViewState::Home,
        }
    }

    /// The selected category, if any layer below Home is active.
    pub fn category(&self) -> Option<&str> {
        match self {
            ViewState::Home => None,
            ViewState::Category { name } | ViewState::Detail { name, .. } => Some(name),
        }
    }

    /// The focused metric, if a Detail panel is active.
    pub fn metric(&self) -> Option<&str> {
        match self {
            ViewState::Detail { metric, .. } => Some(metric),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> ViewState {
        ViewState::Category { name: name.into() }
    }

    #[test]
    fn test_open_category_from_home() {
        let state = ViewState::Home.apply(NavEvent::OpenCategory("Commercial".into()));
        assert_eq!(state, category("Commercial"));
        assert_eq!(state.category(), Some("Commercial"));
    }

    #[test]
    fn test_focus_then_back_walks_layers() {
        let state = category("Logistics").apply(NavEvent::FocusMetric("Inventory Turnover".into()));
        assert_eq!(state.metric(), Some("Inventory Turnover"));

        let state = state.apply(NavEvent::Back);
        assert_eq!(state, category("Logistics"));

        let state = state.apply(NavEvent::Back);
        assert_eq!(state, ViewState::Home);
    }

    #[test]
    fn test_switch_metric_stays_in_category() {
        let state = ViewState::Detail {
            name: "Workforce".into(),
            metric: "Absenteeism".into(),
        };
        let state = state.apply(NavEvent::FocusMetric("Turnover".into()));
        assert_eq!(state.category(), Some("Workforce"));
        assert_eq!(state.metric(), Some("Turnover"));
    }

    #[test]
    fn test_noop_events_at_home() {
        assert_eq!(ViewState::Home.apply(NavEvent::Back), ViewState::Home);
        assert_eq!(
            ViewState::Home.apply(NavEvent::FocusMetric("Average Ticket".into())),
            ViewState::Home
        );
    }

    #[test]
    fn test_reset_from_anywhere() {
        let deep = ViewState::Detail {
            name: "Commercial".into(),
            metric: "Conversion Rate".into(),
        };
        assert_eq!(deep.apply(NavEvent::Reset), ViewState::Home);
        assert_eq!(category("Workforce").apply(NavEvent::Reset), ViewState::Home);
    }

    #[test]
    fn test_serde_roundtrip() {
        let state = ViewState::Detail {
            name: "Commercial".into(),
            metric: "Market Share by Brand".into(),
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"view\":\"detail\""));

        let back: ViewState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
