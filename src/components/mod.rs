pub mod detail_panel;
pub mod filter_bar;
pub mod lineage_graph;
pub mod model_columns;
pub mod models_table;
