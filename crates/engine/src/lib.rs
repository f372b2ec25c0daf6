//! Model-averaging engines — cross-model inverse-NRMSE weights, weighted
//! spend contributions, and derived business metrics (CPA, ROI, shares,
//! pseudo R-squared).
//!
//! All stages are pure, synchronous transforms over in-memory row slices.
//! Each call gets fresh inputs and returns fresh outputs, so independent
//! runs are safe to execute concurrently.

pub mod contributions;
pub mod metrics;
pub mod pipeline;
pub mod weights;

pub use contributions::{
    compute_contributions, compute_contributions_with, ContributionRow, ContributionTable,
    JoinDrop, DEFAULT_CI_MULTIPLIER,
};
pub use metrics::{
    adjusted_pseudo_r_squared, calculate_cpa, calculate_roi, contribution_shares,
    pseudo_r_squared, CpaRow, RoiRow, ShareRow,
};
pub use pipeline::ModelAverageReport;
pub use weights::{calculate_weights, verify_weight_sums};
