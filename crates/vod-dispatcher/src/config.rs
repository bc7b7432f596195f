//! Dispatcher configuration, validated before any record is processed.

use crate::error::{DispatchError, DispatchResult};

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub cluster: String,
    pub task_definition: String,
    pub subnets: Vec<String>,
    pub security_group: String,
    /// Container whose environment carries the serialized job
    pub container_name: String,
}

impl DispatcherConfig {
    pub fn from_env() -> DispatchResult<Self> {
        let mut missing = Vec::new();
        let mut require = |name: &str| match std::env::var(name) {
            Ok(v) if !v.is_empty() => Some(v),
            _ => {
                missing.push(name.to_string());
                None
            }
        };

        let cluster = require("ECS_CLUSTER");
        let task_definition = require("TASK_DEFINITION");
        let subnets = require("SUBNETS");
        let security_group = require("SECURITY_GROUP");

        let container_name =
            std::env::var("CONTAINER_NAME").unwrap_or_else(|_| "worker".to_string());

        match (cluster, task_definition, subnets, security_group) {
            (Some(cluster), Some(task_definition), Some(subnets), Some(security_group)) => {
                Ok(Self {
                    cluster,
                    task_definition,
                    subnets: parse_subnets(&subnets)?,
                    security_group,
                    container_name,
                })
            }
            _ => Err(DispatchError::MissingVars(missing)),
        }
    }
}

fn parse_subnets(value: &str) -> DispatchResult<Vec<String>> {
    let subnets: Vec<String> = value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if subnets.is_empty() {
        return Err(DispatchError::NoSubnets);
    }
    Ok(subnets)
}
