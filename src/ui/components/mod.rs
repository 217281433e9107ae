pub mod answer_grid;
pub mod progress_bar;
pub mod stats_panel;
