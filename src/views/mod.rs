//! Text views over the view state store

pub mod chart;
pub mod table;

pub use chart::ChartView;
pub use table::TableView;
