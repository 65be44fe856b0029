use std::path::Path;
use anyhow::{Context, Result};
use plotly::common::{Mode, Title};
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};
use crate::evolution::EvolutionMatrix;
use crate::model::LandCoverClass;

/// x-axis labels: the row's date, or its file name when the date is unknown.
fn x_labels(matrix: &EvolutionMatrix) -> Vec<String> {
    matrix
        .rows()
        .iter()
        .map(|row| row.date.as_ref().map(|d| d.to_string()).unwrap_or_else(|| row.file_name()))
        .collect()
}

pub fn evolution_plot(matrix: &EvolutionMatrix, series_name: &str) -> Plot {
    let x = x_labels(matrix);
    let mut plot = Plot::new();
    for class in LandCoverClass::ALL {
        let trace = Scatter::new(x.clone(), matrix.class_series(class))
            .mode(Mode::Lines)
            .name(&class.chart_label());
        plot.add_trace(trace);
    }

    let layout = Layout::new()
        .title(Title::new(&format!("Mask evolution - {}", series_name)))
        .x_axis(Axis::new().title(Title::new("Dates")))
        .y_axis(Axis::new().title(Title::new("Class proportion (%)")).range(vec![0.0, 100.0]));
    plot.set_layout(layout);
    plot
}

/// Standalone HTML page of the evolution chart.
pub fn save_evolution_chart<P: AsRef<Path>>(matrix: &EvolutionMatrix, series_name: &str, path: P) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, evolution_plot(matrix, series_name).to_html())
        .with_context(|| format!("Could not write {}", path.display()))
}
