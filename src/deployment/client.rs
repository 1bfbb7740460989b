//! HTTP client for the orchestration server's deployment API.
//!
//! Deployment coordination state lives in deployment *parameters* on the
//! orchestration server, so every operation here is read-modify-write over
//! a deployment's parameter map. The pure tree logic stays in
//! [`crate::deployment::models`]; this client only moves state across the
//! wire.

use crate::deployment::models::{apply_updates, diff, merge_missing, DeploymentModel, DeploymentUpdate};
use crate::error::{Error, Result};
use log::{info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A deployment as the orchestration server reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Client for one orchestration server.
pub struct OrchestratorClient {
    client: reqwest::Client,
    base_url: String,
}

impl OrchestratorClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self { client, base_url: base_url.into() })
    }

    fn check_status(&self, url: &str, status: reqwest::StatusCode) -> Result<()> {
        if status.as_u16() >= 400 {
            return Err(Error::Orchestrator(format!("request to {} failed: {}", url, status)));
        }
        Ok(())
    }

    /// Read a deployment by its `flow/deployment` name.
    pub async fn read_deployment(&self, name: &str) -> Result<DeploymentInfo> {
        let url = format!("{}/deployments/name/{}", self.base_url, name);
        let response = self.client.get(&url).send().await?;
        self.check_status(&url, response.status())?;
        Ok(response.json().await?)
    }

    /// Read one parameter of a deployment. Returns `None` (with a warning)
    /// when the deployment does not carry that parameter.
    pub async fn read_parameter(&self, name: &str, parameter: &str) -> Result<Option<Value>> {
        info!("Getting current value for parameter {} from deployment {}", parameter, name);
        let deployment = self.read_deployment(name).await?;
        match deployment.parameters.get(parameter) {
            Some(value) => Ok(Some(value.clone())),
            None => {
                warn!("Parameter {} not found in deployment {}", parameter, name);
                Ok(None)
            }
        }
    }

    /// Change parameters of a deployment. Keys the deployment does not
    /// already carry are skipped with a warning rather than added.
    pub async fn change_parameters(&self, name: &str, parameters: Map<String, Value>) -> Result<()> {
        info!("Changing deployment {} parameters", name);
        let mut deployment = self.read_deployment(name).await?;
        for (key, value) in parameters {
            if !deployment.parameters.contains_key(&key) {
                warn!("Parameter {} not found in deployment {}", key, name);
                continue;
            }
            deployment.parameters.insert(key, value);
        }
        let url = format!("{}/deployments/{}", self.base_url, deployment.id);
        let body = serde_json::json!({ "parameters": deployment.parameters });
        let response = self.client.patch(&url).json(&body).send().await?;
        self.check_status(&url, response.status())
    }

    /// Flip the `active` flag of a deployment-model parameter. Returns the
    /// new state.
    pub async fn toggle_parameter_active(&self, name: &str, parameter: &str) -> Result<bool> {
        let value = self.read_parameter(name, parameter).await?.ok_or_else(|| {
            Error::Orchestrator(format!("parameter {} not found in deployment {}", parameter, name))
        })?;
        let mut model: DeploymentModel = serde_json::from_value(value).map_err(|_| {
            Error::Orchestrator(format!(
                "parameter {} of deployment {} is not a valid deployment model",
                parameter, name
            ))
        })?;
        model.active = !model.active;
        let new_state = model.active;
        let mut parameters = Map::new();
        parameters.insert(parameter.to_string(), serde_json::to_value(&model)?);
        self.change_parameters(name, parameters).await?;
        Ok(new_state)
    }

    /// Mark the sub-deployment called `name` as ready (not blocking) or not
    /// ready (blocking) inside an upstream deployment's parameter. The
    /// parameter may hold a single deployment model or a list of them.
    pub async fn set_sub_deployment_ready(
        &self,
        name: &str,
        upstream_name: &str,
        parameter: &str,
        ready: bool,
    ) -> Result<()> {
        info!(
            "Marking deployment {} as {} for updates in upstream deployment {}",
            name,
            if ready { "ready" } else { "not ready" },
            upstream_name
        );
        let value = self.read_parameter(upstream_name, parameter).await?.ok_or_else(|| {
            Error::Orchestrator(format!(
                "parameter {} not found in deployment {}",
                parameter, upstream_name
            ))
        })?;

        let invalid = || {
            Error::Orchestrator(format!(
                "parameter {} of deployment {} is not a valid deployment model",
                parameter, upstream_name
            ))
        };
        let mut found = false;
        let updated = match value {
            Value::Array(items) => {
                let mut models: Vec<DeploymentModel> = items
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| invalid())?;
                for model in &mut models {
                    if model.name == name {
                        model.is_blocking = !ready;
                        found = true;
                        break;
                    }
                }
                serde_json::to_value(&models)?
            }
            value @ Value::Object(_) => {
                let mut model: DeploymentModel =
                    serde_json::from_value(value).map_err(|_| invalid())?;
                if model.name == name {
                    model.is_blocking = !ready;
                    found = true;
                }
                serde_json::to_value(&model)?
            }
            _ => return Err(invalid()),
        };
        if !found {
            return Err(Error::Orchestrator(format!(
                "deployment {} not found in sub-deployments of {}",
                name, upstream_name
            )));
        }
        let mut parameters = Map::new();
        parameters.insert(parameter.to_string(), updated);
        self.change_parameters(upstream_name, parameters).await
    }

    /// Bring the remote deployment tree stored in `parameter` in line with
    /// `desired`: propagate flags down the desired tree, diff against the
    /// remote state, and only write when something actually changed. Returns
    /// the updates that were applied (empty means the remote side was
    /// already up to date).
    pub async fn sync_sub_deployments(
        &self,
        name: &str,
        parameter: &str,
        desired: &DeploymentModel,
    ) -> Result<Vec<DeploymentUpdate>> {
        let value = self.read_parameter(name, parameter).await?.ok_or_else(|| {
            Error::Orchestrator(format!("parameter {} not found in deployment {}", parameter, name))
        })?;
        let mut remote: DeploymentModel = serde_json::from_value(value).map_err(|_| {
            Error::Orchestrator(format!(
                "parameter {} of deployment {} is not a valid deployment model",
                parameter, name
            ))
        })?;

        let desired = desired.propagated();
        let updates = diff(&desired, &remote);
        if updates.is_empty() {
            info!("Deployment {} parameter {} is up to date", name, parameter);
            return Ok(updates);
        }

        merge_missing(&mut remote, &desired);
        apply_updates(&mut remote, &updates);
        let mut parameters = Map::new();
        parameters.insert(parameter.to_string(), serde_json::to_value(&remote)?);
        self.change_parameters(name, parameters).await?;
        Ok(updates)
    }
}
