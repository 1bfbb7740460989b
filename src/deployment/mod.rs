//! Deployment dependency and readiness coordination.
//!
//! Data pipelines are orchestrated as a tree of named deployments. A parent
//! deployment must not start a new run while it, or any transitive
//! sub-deployment, is blocking; flag changes on a parent (deactivation,
//! forced full sync) have to reach the whole subtree. The pure model lives
//! in [`models`]: an OR-fold for blocking, a downward flag propagation, and
//! a name-keyed diff producing only the field changes that actually differ.
//! [`client`] applies those diffs against an orchestration server's REST API
//! as targeted parameter updates.

pub mod client;
pub mod models;

pub use client::{DeploymentInfo, OrchestratorClient};
pub use models::{apply_updates, diff, DeploymentModel, DeploymentUpdate};
