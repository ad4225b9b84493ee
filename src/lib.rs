// Modules
pub mod constants;
pub mod data;
pub mod errors;
pub mod objective_functions;
pub mod partition;
pub mod rank;
pub mod utils;

// Individual classes, and functions
pub use data::{Matrix, RowMajorMatrix};
pub use objective_functions::{MultiLabelObjective, RobustWarp};
