pub mod godoc;
pub mod type_graph;
