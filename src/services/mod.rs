pub mod graph_view_state;
