pub mod entity_drawer;
pub mod graph_filters;
pub mod graph_shell;
pub mod network3d_view;
pub mod network_view;
pub mod tiles_view;
