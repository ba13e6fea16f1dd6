use crate::constants::{
    CHART_TITLE, CHART_TOP_N, CHART_X_LABEL, CHART_Y_LABEL, LABEL_COLUMN, METRIC_COLUMN,
};
use crate::types::{BarChartSpec, ChartBar, CleanedTable};

/// Chart of the first rows of `table`, in table order.
///
/// No sort by value: the source page is already ranked.
pub fn ranked_chart(table: &CleanedTable) -> BarChartSpec {
    let bars = table
        .head(CHART_TOP_N)
        .iter()
        .map(|row| ChartBar {
            label: row.cell(LABEL_COLUMN).to_string(),
            value: row.cell(METRIC_COLUMN).to_string(),
        })
        .collect();

    BarChartSpec {
        title: CHART_TITLE.to_string(),
        x_label: CHART_X_LABEL.to_string(),
        y_label: CHART_Y_LABEL.to_string(),
        bars,
    }
}
