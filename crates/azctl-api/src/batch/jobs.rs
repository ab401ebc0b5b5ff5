//! Job and task operations against the Batch service.

use serde::{Deserialize, Serialize};

use super::BatchClient;
use crate::error::Result;

/// Binds a job to the pool its tasks run on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInformation {
    pub pool_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudJob {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_info: Option<PoolInformation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCreateParams {
    pub id: String,
    pub pool_info: PoolInformation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobListResult {
    #[serde(default)]
    value: Vec<CloudJob>,
}

/// Handler for job operations
pub struct JobHandler {
    client: BatchClient,
}

impl JobHandler {
    pub fn new(client: BatchClient) -> Self {
        Self { client }
    }

    /// Create a job bound to a pool
    pub async fn create(&self, params: &JobCreateParams) -> Result<()> {
        self.client.post_json("/jobs", params).await
    }

    /// Get a job by id
    pub async fn get(&self, job_id: &str) -> Result<CloudJob> {
        self.client.get_json(&format!("/jobs/{}", job_id)).await
    }

    /// List all jobs under the account
    pub async fn list(&self) -> Result<Vec<CloudJob>> {
        let result: JobListResult = self.client.get_json("/jobs").await?;
        Ok(result.value)
    }

    /// Delete a job and its tasks
    pub async fn delete(&self, job_id: &str) -> Result<()> {
        self.client.delete(&format!("/jobs/{}", job_id)).await
    }
}

/// A task as returned by the Batch service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudTask {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_line: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreateParams {
    pub id: String,
    pub command_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskListResult {
    #[serde(default)]
    value: Vec<CloudTask>,
}

/// Handler for task operations within jobs
pub struct TaskHandler {
    client: BatchClient,
}

impl TaskHandler {
    pub fn new(client: BatchClient) -> Self {
        Self { client }
    }

    /// Add a task to a job
    pub async fn create(&self, job_id: &str, params: &TaskCreateParams) -> Result<()> {
        self.client
            .post_json(&format!("/jobs/{}/tasks", job_id), params)
            .await
    }

    /// Get a task by id
    pub async fn get(&self, job_id: &str, task_id: &str) -> Result<CloudTask> {
        self.client
            .get_json(&format!("/jobs/{}/tasks/{}", job_id, task_id))
            .await
    }

    /// List tasks in a job
    pub async fn list(&self, job_id: &str) -> Result<Vec<CloudTask>> {
        let result: TaskListResult = self
            .client
            .get_json(&format!("/jobs/{}/tasks", job_id))
            .await?;
        Ok(result.value)
    }

    /// Delete a task
    pub async fn delete(&self, job_id: &str, task_id: &str) -> Result<()> {
        self.client
            .delete(&format!("/jobs/{}/tasks/{}", job_id, task_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_create_body_uses_pool_info() {
        let params = JobCreateParams {
            id: "job-1".to_string(),
            pool_info: PoolInformation {
                pool_id: "pool-1".to_string(),
            },
            display_name: None,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["poolInfo"]["poolId"], "pool-1");
        assert!(json.get("displayName").is_none());
    }

    #[test]
    fn task_create_body_shape() {
        let params = TaskCreateParams {
            id: "t0".to_string(),
            command_line: "echo hello".to_string(),
            display_name: Some("hello".to_string()),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["commandLine"], "echo hello");
        assert_eq!(json["displayName"], "hello");
    }
}
