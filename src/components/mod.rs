pub mod details_panel;
pub mod force_graph;
pub mod toolbar;
