//! Deployment tree model and the pure state-machine operations over it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_true() -> bool {
    true
}

/// One deployment in a tree of orchestrated jobs.
///
/// When `is_blocking` is true, the deployment is blocking the next flow run
/// of its parent. Fields default the way the orchestrator's parameter
/// payloads do: active, not blocking, no full sync, no sub-deployments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentModel {
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub is_blocking: bool,
    #[serde(default)]
    pub full_sync: bool,
    #[serde(default)]
    pub sub_deployments: Vec<DeploymentModel>,
}

impl DeploymentModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            is_blocking: false,
            full_sync: false,
            sub_deployments: Vec::new(),
        }
    }

    /// Whether this deployment or any transitive sub-deployment is blocking.
    pub fn is_blocking_tree(&self) -> bool {
        self.is_blocking || self.sub_deployments.iter().any(DeploymentModel::is_blocking_tree)
    }

    /// Return a copy with `active` and `full_sync` pushed down the tree: a
    /// deactivated parent deactivates its whole subtree, and a parent in
    /// full sync forces full sync on its whole subtree.
    pub fn propagated(&self) -> DeploymentModel {
        let mut out = self.clone();
        out.push_flags();
        out
    }

    fn push_flags(&mut self) {
        for sub in &mut self.sub_deployments {
            sub.active = sub.active && self.active;
            sub.full_sync = sub.full_sync || self.full_sync;
            sub.push_flags();
        }
    }

    /// Find a deployment by name anywhere in the tree.
    pub fn find(&self, name: &str) -> Option<&DeploymentModel> {
        if self.name == name {
            return Some(self);
        }
        self.sub_deployments.iter().find_map(|sub| sub.find(name))
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut DeploymentModel> {
        if self.name == name {
            return Some(self);
        }
        self.sub_deployments.iter_mut().find_map(|sub| sub.find_mut(name))
    }
}

/// Check whether a JSON parameter value has the shape of a deployment model.
pub fn is_deployment_value(value: &Value) -> bool {
    serde_json::from_value::<DeploymentModel>(value.clone()).is_ok()
}

/// Targeted field changes for one named deployment. Only fields whose
/// desired value differs from the remote one are set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentUpdate {
    pub name: String,
    pub active: Option<bool>,
    pub is_blocking: Option<bool>,
    pub full_sync: Option<bool>,
}

impl DeploymentUpdate {
    fn unchanged(name: &str) -> Self {
        Self { name: name.to_string(), active: None, is_blocking: None, full_sync: None }
    }

    /// Full overwrite for a deployment the remote side does not know yet.
    fn full(model: &DeploymentModel) -> Self {
        Self {
            name: model.name.clone(),
            active: Some(model.active),
            is_blocking: Some(model.is_blocking),
            full_sync: Some(model.full_sync),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.is_blocking.is_none() && self.full_sync.is_none()
    }
}

/// Diff a desired deployment tree against the remote one, walking
/// sub-deployments by name. Returns one update per deployment whose flags
/// differ; `diff(x, x)` is empty, which is what makes applying the result
/// idempotent. Sub-deployments the remote side does not have yet get a full
/// update; remote-only sub-deployments are left alone.
pub fn diff(desired: &DeploymentModel, remote: &DeploymentModel) -> Vec<DeploymentUpdate> {
    let mut updates = Vec::new();
    diff_into(desired, remote, &mut updates);
    updates
}

fn diff_into(desired: &DeploymentModel, remote: &DeploymentModel, updates: &mut Vec<DeploymentUpdate>) {
    let mut update = DeploymentUpdate::unchanged(&desired.name);
    if desired.active != remote.active {
        update.active = Some(desired.active);
    }
    if desired.is_blocking != remote.is_blocking {
        update.is_blocking = Some(desired.is_blocking);
    }
    if desired.full_sync != remote.full_sync {
        update.full_sync = Some(desired.full_sync);
    }
    if !update.is_empty() {
        updates.push(update);
    }
    for sub in &desired.sub_deployments {
        match remote.sub_deployments.iter().find(|r| r.name == sub.name) {
            Some(remote_sub) => diff_into(sub, remote_sub, updates),
            None => {
                updates.push(DeploymentUpdate::full(sub));
                for nested in &sub.sub_deployments {
                    collect_full(nested, updates);
                }
            }
        }
    }
}

fn collect_full(model: &DeploymentModel, updates: &mut Vec<DeploymentUpdate>) {
    updates.push(DeploymentUpdate::full(model));
    for sub in &model.sub_deployments {
        collect_full(sub, updates);
    }
}

/// Apply a batch of updates to a deployment tree in place. Updates naming a
/// deployment that is not in the tree are ignored.
pub fn apply_updates(model: &mut DeploymentModel, updates: &[DeploymentUpdate]) {
    for update in updates {
        if let Some(target) = model.find_mut(&update.name) {
            if let Some(active) = update.active {
                target.active = active;
            }
            if let Some(is_blocking) = update.is_blocking {
                target.is_blocking = is_blocking;
            }
            if let Some(full_sync) = update.full_sync {
                target.full_sync = full_sync;
            }
        }
    }
}

/// Graft sub-deployments present in `desired` but missing from `remote`
/// into `remote`, walking matching nodes by name. Field values of nodes the
/// remote tree already has are left untouched; only whole missing subtrees
/// are copied over.
pub fn merge_missing(remote: &mut DeploymentModel, desired: &DeploymentModel) {
    for sub in &desired.sub_deployments {
        match remote.sub_deployments.iter_mut().find(|r| r.name == sub.name) {
            Some(remote_sub) => merge_missing(remote_sub, sub),
            None => remote.sub_deployments.push(sub.clone()),
        }
    }
}
