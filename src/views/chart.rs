//! Price chart of the selected asset

use crate::{
    constants::{DEFAULT_CHART_ASSET, DEFAULT_CHART_DAYS, DEFAULT_CURRENCY},
    store::ViewStateStore,
    types::{ChartData, PricePoint, PriceSeriesQuery},
};
use std::sync::Arc;

/// Rows of the plot area
const CHART_HEIGHT: usize = 10;

/// Maximum columns of the plot area; longer series are averaged into buckets
const CHART_WIDTH: usize = 60;

/// Width of the y-axis label gutter
const AXIS_WIDTH: usize = 12;

/// Line chart of the price series held by the store
///
/// The selected asset is the input of the view: changing it means the
/// series has to be fetched again.
#[derive(Debug)]
pub struct ChartView {
    asset_id: String,
    vs_currency: String,
    days: u32,
    rendered: Option<Arc<[PricePoint]>>,
    output: String,
}

impl Default for ChartView {
    fn default() -> Self {
        Self::new(DEFAULT_CHART_ASSET)
    }
}

impl ChartView {
    pub fn new(asset_id: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            vs_currency: DEFAULT_CURRENCY.to_string(),
            days: DEFAULT_CHART_DAYS,
            rendered: None,
            output: String::new(),
        }
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    /// Changes the selected asset
    ///
    /// # Returns
    /// True if the selection changed and the series must be re-fetched
    pub fn select_asset(&mut self, asset_id: &str) -> bool {
        if self.asset_id == asset_id {
            return false;
        }
        self.asset_id = asset_id.to_string();
        // Title depends on the asset, so force the next refresh.
        self.rendered = None;
        true
    }

    /// Request that feeds this view
    pub fn query(&self) -> PriceSeriesQuery {
        PriceSeriesQuery::new(&self.asset_id, &self.vs_currency, self.days)
    }

    pub fn chart_data(&self, series: &[PricePoint]) -> ChartData {
        ChartData::from_series(&self.asset_id, &self.vs_currency, series)
    }

    /// Re-renders if the store's series changed since the last call
    pub fn refresh(&mut self, store: &ViewStateStore) -> bool {
        let current = store.current_series();
        if let Some(rendered) = &self.rendered {
            if Arc::ptr_eq(rendered, &current) {
                return false;
            }
        }

        self.output = render_line_chart(&self.chart_data(&current), CHART_WIDTH, CHART_HEIGHT);
        self.rendered = Some(current);
        true
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

/// Draws `chart` as text, one `*` per column
pub fn render_line_chart(chart: &ChartData, width: usize, height: usize) -> String {
    let mut lines = vec![chart.title.clone(), chart.dataset_label.clone()];

    if chart.is_empty() || width == 0 || height == 0 {
        lines.push("No data".to_string());
        return lines.join("\n");
    }

    let columns = bucket_averages(&chart.values, width);
    let min = columns.iter().copied().fold(f64::INFINITY, f64::min);
    let max = columns.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let row_of = |value: f64| -> usize {
        if max > min {
            let scaled = (value - min) / (max - min) * (height - 1) as f64;
            (height - 1) - scaled.round() as usize
        } else {
            height / 2
        }
    };

    let mut grid = vec![vec![' '; columns.len()]; height];
    for (col, value) in columns.iter().enumerate() {
        grid[row_of(*value)][col] = '*';
    }

    for (row, cells) in grid.iter().enumerate() {
        let label = if row == 0 {
            format!("{:.2}", max)
        } else if row == height - 1 {
            format!("{:.2}", min)
        } else {
            String::new()
        };
        let line: String = cells.iter().collect();
        lines.push(format!("{:>w$} |{}", label, line.trim_end(), w = AXIS_WIDTH));
    }

    lines.push(format!("{:>w$} +{}", "", "-".repeat(columns.len()), w = AXIS_WIDTH));

    let first = chart.labels.first().cloned().unwrap_or_default();
    let last = chart.labels.last().cloned().unwrap_or_default();
    let axis = if chart.labels.len() > 1 {
        let gap = columns.len().saturating_sub(first.len() + last.len()).max(1);
        format!("{}{}{}", first, " ".repeat(gap), last)
    } else {
        first
    };
    lines.push(format!("{:>w$}  {}", "", axis, w = AXIS_WIDTH));

    lines.join("\n")
}

/// Averages `values` into at most `width` consecutive buckets
fn bucket_averages(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width {
        return values.to_vec();
    }

    (0..width)
        .map(|col| {
            let start = col * values.len() / width;
            let end = ((col + 1) * values.len() / width).max(start + 1);
            let bucket = &values[start..end];
            bucket.iter().sum::<f64>() / bucket.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 86_400_000;
    // 2024-01-01T00:00:00Z
    const START_MS: i64 = 1_704_067_200_000;

    fn week(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint::new(START_MS + i as i64 * DAY_MS, *p))
            .collect()
    }

    #[test]
    fn test_chart_data_labels_and_values() {
        let view = ChartView::new("bitcoin");
        let data = view.chart_data(&week(&[42000.0, 43000.0]));

        assert_eq!(data.title, "Chart of bitcoin");
        assert_eq!(data.labels, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(data.values, vec![42000.0, 43000.0]);
    }

    #[test]
    fn test_render_empty_series() {
        let data = ChartView::new("bitcoin").chart_data(&[]);
        assert_eq!(
            render_line_chart(&data, 60, 10),
            "Chart of bitcoin\nPrice (USD)\nNo data"
        );
    }

    #[test]
    fn test_render_rising_series() {
        let data = ChartView::new("bitcoin").chart_data(&week(&[1.0, 2.0, 3.0]));
        let output = render_line_chart(&data, 60, 3);
        let lines: Vec<&str> = output.lines().collect();

        // title, legend, 3 plot rows, axis, labels
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[2], "        3.00 |  *");
        assert_eq!(lines[3], "             | *");
        assert_eq!(lines[4], "        1.00 |*");
        assert_eq!(lines[5], "             +---");
        assert!(lines[6].trim_start().starts_with("2024-01-01"));
        assert!(lines[6].ends_with("2024-01-03"));
    }

    #[test]
    fn test_render_flat_series() {
        let data = ChartView::new("tether").chart_data(&week(&[1.0, 1.0, 1.0, 1.0]));
        let output = render_line_chart(&data, 60, 5);
        let stars = output.matches('*').count();
        assert_eq!(stars, 4);
    }

    #[test]
    fn test_long_series_is_bucketed() {
        let prices: Vec<f64> = (0..168).map(|h| h as f64).collect();
        let data = ChartView::new("bitcoin").chart_data(&week(&prices));
        let output = render_line_chart(&data, 60, 10);
        assert_eq!(output.matches('*').count(), 60);
    }

    #[test]
    fn test_bucket_averages() {
        assert_eq!(bucket_averages(&[1.0, 3.0, 5.0, 7.0], 2), vec![2.0, 6.0]);
        assert_eq!(bucket_averages(&[1.0, 2.0], 5), vec![1.0, 2.0]);
    }

    #[test]
    fn test_select_asset() {
        let mut view = ChartView::default();
        assert_eq!(view.asset_id(), "bitcoin");

        assert!(!view.select_asset("bitcoin"));
        assert!(view.select_asset("ethereum"));
        assert_eq!(view.query(), PriceSeriesQuery::new("ethereum", "usd", 7));
    }

    #[test]
    fn test_refresh_after_selection_change() {
        let store = ViewStateStore::new();
        store.replace_series(week(&[1.0, 2.0]));
        let mut view = ChartView::new("bitcoin");

        assert!(view.refresh(&store));
        assert!(!view.refresh(&store));

        view.select_asset("ethereum");
        assert!(view.refresh(&store));
        assert!(view.output().starts_with("Chart of ethereum"));
    }
}
