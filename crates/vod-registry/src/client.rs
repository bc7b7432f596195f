//! DynamoDB-backed registry lookups.

use std::collections::HashMap;

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::debug;

use vod_models::{sanitize_project_name, ProjectRecord};

use crate::error::{RegistryError, RegistryResult};

/// Read-only client for the projects table.
#[derive(Clone)]
pub struct RegistryClient {
    db: aws_sdk_dynamodb::Client,
    table: String,
}

impl RegistryClient {
    /// Build a client from the ambient AWS environment.
    pub async fn new(table: impl Into<String>) -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self {
            db: aws_sdk_dynamodb::Client::new(&aws_config),
            table: table.into(),
        }
    }

    pub fn with_client(db: aws_sdk_dynamodb::Client, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    /// Resolve the webhook URL for a project identifier.
    ///
    /// Direct keyed read first; on miss, scan records that carry a
    /// human-readable name and match its sanitized form against the
    /// identifier. `Ok(None)` means no webhook is configured, which is a
    /// legitimate no-op for the caller.
    pub async fn get_webhook_url(
        &self,
        project_identifier: &str,
    ) -> RegistryResult<Option<String>> {
        let result = self
            .db
            .get_item()
            .table_name(&self.table)
            .key(
                "project_id",
                AttributeValue::S(project_identifier.to_string()),
            )
            .send()
            .await
            .map_err(|e| RegistryError::get(project_identifier, e))?;

        if let Some(url) = result
            .item()
            .and_then(|item| attr_string(item, "webhook_url"))
        {
            debug!("Direct registry hit for {}", project_identifier);
            return Ok(Some(url));
        }

        let records = self.scan_named_projects().await?;
        Ok(find_webhook_by_name(&records, project_identifier))
    }

    /// All records that carry a project name.
    async fn scan_named_projects(&self) -> RegistryResult<Vec<ProjectRecord>> {
        let mut records = Vec::new();
        let mut start_key = None;

        loop {
            let page = self
                .db
                .scan()
                .table_name(&self.table)
                .filter_expression("attribute_exists(project_name)")
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| RegistryError::Scan(e.to_string()))?;

            if let Some(items) = page.items {
                records.extend(items.iter().map(record_from_item));
            }

            start_key = page.last_evaluated_key;
            if start_key.is_none() {
                break;
            }
        }

        Ok(records)
    }
}

fn attr_string(item: &HashMap<String, AttributeValue>, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).cloned()
}

fn record_from_item(item: &HashMap<String, AttributeValue>) -> ProjectRecord {
    ProjectRecord {
        project_id: attr_string(item, "project_id").unwrap_or_default(),
        project_name: attr_string(item, "project_name"),
        webhook_url: attr_string(item, "webhook_url"),
    }
}

/// First record whose sanitized name equals the identifier, and its URL.
pub fn find_webhook_by_name(records: &[ProjectRecord], identifier: &str) -> Option<String> {
    records
        .iter()
        .find(|r| {
            r.project_name
                .as_deref()
                .map(|name| sanitize_project_name(name) == identifier)
                .unwrap_or(false)
        })
        .and_then(|r| r.webhook_url.clone())
}
