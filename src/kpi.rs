//! KPI catalog - business categories, metrics, and chart forms
//!
//! The dashboard exposes a closed set of business categories, each with a
//! fixed list of metrics, and every metric classifies to one of four chart
//! forms. Rendering is a frontend concern; this module is only the data
//! model behind it.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Business units of the retailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Sales, performance and brands
    Commercial,
    /// Productivity and labor cost
    Workforce,
    /// Stock, distribution and freight
    Logistics,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Commercial => "commercial",
            Category::Workforce => "workforce",
            Category::Logistics => "logistics",
        }
    }

    /// Human-facing title used by frontends and the CLI.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Commercial => "Commercial",
            Category::Workforce => "Workforce",
            Category::Logistics => "Logistics",
        }
    }

    pub fn all() -> &'static [Category] {
        &[Category::Commercial, Category::Workforce, Category::Logistics]
    }

    /// The metrics this category exposes, in display order.
    pub fn metrics(&self) -> &'static [&'static str] {
        match self {
            Category::Commercial => &[
                "Sales vs Costs",
                "Market Share by Brand",
                "Average Ticket",
                "Conversion Rate",
            ],
            Category::Workforce => &[
                "Productivity per Seller",
                "Payroll to Sales Ratio",
                "Absenteeism",
                "Turnover",
            ],
            Category::Logistics => &[
                "Inventory Turnover",
                "Distribution Lead Time",
                "Freight over Sales",
                "Stock vs Stockout",
            ],
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "commercial" | "sales" | "retail" => Ok(Category::Commercial),
            "workforce" | "hr" | "people" | "payroll" => Ok(Category::Workforce),
            "logistics" | "supply" | "stock" | "distribution" => Ok(Category::Logistics),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chart form a metric is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Stacked revenue/cost areas
    CostBreakdown,
    /// Donut of share per brand
    ShareDonut,
    /// Stacked stock vs stockout bars
    InventoryBars,
    /// Line against its historical mean
    TrendLine,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::CostBreakdown => "cost_breakdown",
            ChartKind::ShareDonut => "share_donut",
            ChartKind::InventoryBars => "inventory_bars",
            ChartKind::TrendLine => "trend_line",
        }
    }
}

/// Classify a metric to its chart form by keyword.
///
/// Margin and sales metrics break revenue against costs; share metrics get a
/// donut; stock metrics get bars; anything else falls back to a trend line.
pub fn chart_kind(metric: &str) -> ChartKind {
    let m = metric.to_lowercase();
    if m.contains("sales") || m.contains("margin") {
        ChartKind::CostBreakdown
    } else if m.contains("share") || m.contains("brand") {
        ChartKind::ShareDonut
    } else if m.contains("stock") || m.contains("inventory") {
        ChartKind::InventoryBars
    } else {
        ChartKind::TrendLine
    }
}

/// One catalog entry, as served by `/catalog` and printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub category: Category,
    pub title: &'static str,
    pub metrics: Vec<MetricEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricEntry {
    pub name: &'static str,
    pub chart: ChartKind,
}

/// The full catalog, in display order.
pub fn catalog() -> Vec<CatalogEntry> {
    Category::all()
        .iter()
        .map(|&category| CatalogEntry {
            category,
            title: category.title(),
            metrics: category
                .metrics()
                .iter()
                .map(|&name| MetricEntry { name, chart: chart_kind(name) })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in Category::all() {
            let s = category.as_str();
            let parsed: Category = s.parse().unwrap();
            assert_eq!(*category, parsed);
        }
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!(Category::from_str("sales").unwrap(), Category::Commercial);
        assert_eq!(Category::from_str("HR").unwrap(), Category::Workforce);
        assert_eq!(Category::from_str("supply").unwrap(), Category::Logistics);
        assert!(Category::from_str("weather").is_err());
    }

    #[test]
    fn test_chart_dispatch() {
        assert_eq!(chart_kind("Sales vs Costs"), ChartKind::CostBreakdown);
        assert_eq!(chart_kind("Market Share by Brand"), ChartKind::ShareDonut);
        assert_eq!(chart_kind("Stock vs Stockout"), ChartKind::InventoryBars);
        assert_eq!(chart_kind("Inventory Turnover"), ChartKind::InventoryBars);
        assert_eq!(chart_kind("Absenteeism"), ChartKind::TrendLine);
        assert_eq!(chart_kind("Conversion Rate"), ChartKind::TrendLine);
    }

    #[test]
    fn test_catalog_covers_every_category() {
        let entries = catalog();
        assert_eq!(entries.len(), Category::all().len());
        for entry in &entries {
            assert_eq!(entry.metrics.len(), 4);
        }
    }
}
