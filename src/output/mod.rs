pub mod chart;
pub mod csv_writer;
pub mod json;
pub mod render;

pub use chart::{evolution_plot, save_evolution_chart};
pub use csv_writer::{save_evolution_csv, write_evolution_csv};
pub use json::{report_to_json, save_report_json};
