//! Task launches against the container scheduler.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ecs::types::{
    AssignPublicIp, AwsVpcConfiguration, ContainerOverride, KeyValuePair, LaunchType,
    NetworkConfiguration, TaskOverride,
};
use tracing::debug;

use vod_models::Job;

use crate::config::DispatcherConfig;
use crate::error::{DispatchError, DispatchResult};

/// Launches one isolated worker execution for a job. Fire-and-forget: the
/// call returns once the scheduler accepts the task, not when it finishes.
#[async_trait]
pub trait TaskLauncher: Send + Sync {
    async fn launch(&self, job: &Job) -> DispatchResult<()>;
}

/// ECS Fargate launcher; the job rides in the worker container's `JOB`
/// environment override.
pub struct EcsLauncher {
    ecs: aws_sdk_ecs::Client,
    config: DispatcherConfig,
}

impl EcsLauncher {
    pub async fn new(config: DispatcherConfig) -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self {
            ecs: aws_sdk_ecs::Client::new(&aws_config),
            config,
        }
    }
}

#[async_trait]
impl TaskLauncher for EcsLauncher {
    async fn launch(&self, job: &Job) -> DispatchResult<()> {
        let vpc = AwsVpcConfiguration::builder()
            .set_subnets(Some(self.config.subnets.clone()))
            .security_groups(&self.config.security_group)
            .assign_public_ip(AssignPublicIp::Enabled)
            .build()
            .map_err(|e| DispatchError::Launch(e.to_string()))?;

        let overrides = TaskOverride::builder()
            .container_overrides(
                ContainerOverride::builder()
                    .name(&self.config.container_name)
                    .environment(
                        KeyValuePair::builder()
                            .name("JOB")
                            .value(serde_json::to_string(job)?)
                            .build(),
                    )
                    .build(),
            )
            .build();

        self.ecs
            .run_task()
            .cluster(&self.config.cluster)
            .task_definition(&self.config.task_definition)
            .launch_type(LaunchType::Fargate)
            .network_configuration(
                NetworkConfiguration::builder()
                    .awsvpc_configuration(vpc)
                    .build(),
            )
            .overrides(overrides)
            .send()
            .await
            .map_err(|e| DispatchError::Launch(e.to_string()))?;

        debug!("Launched worker task for {}", job.input_key);
        Ok(())
    }
}
