// import modules
mod robust_warp;

// make loss functions public
pub use robust_warp::RobustWarp;

pub mod objective;

pub use objective::MultiLabelObjective;
