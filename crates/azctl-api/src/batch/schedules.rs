//! Job schedule operations against the Batch service.
//!
//! Recurrence intervals cross the wire as ISO 8601 durations (`PT1H30M`),
//! so [`RecurrenceInterval`] carries its own serde implementations.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{BatchClient, PoolInformation};
use crate::error::Result;

/// Time between successive job creations under a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecurrenceInterval {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl RecurrenceInterval {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn hours(hours: u32) -> Self {
        Self::new(hours, 0, 0)
    }

    pub fn minutes(minutes: u32) -> Self {
        Self::new(0, minutes, 0)
    }

    pub fn seconds(seconds: u32) -> Self {
        Self::new(0, 0, seconds)
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

impl fmt::Display for RecurrenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PT")?;
        if self.hours > 0 {
            write!(f, "{}H", self.hours)?;
        }
        if self.minutes > 0 {
            write!(f, "{}M", self.minutes)?;
        }
        // zero durations still need a component per ISO 8601
        if self.seconds > 0 || (self.hours == 0 && self.minutes == 0) {
            write!(f, "{}S", self.seconds)?;
        }
        Ok(())
    }
}

impl Serialize for RecurrenceInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_iso8601_duration(s: &str) -> Option<RecurrenceInterval> {
    let rest = s.strip_prefix("PT")?;
    let mut interval = RecurrenceInterval::default();
    let mut number = String::new();
    let mut saw_component = false;
    for c in rest.chars() {
        if c.is_ascii_digit() {
            number.push(c);
        } else {
            let value: u32 = number.parse().ok()?;
            number.clear();
            match c {
                'H' => interval.hours = value,
                'M' => interval.minutes = value,
                'S' => interval.seconds = value,
                _ => return None,
            }
            saw_component = true;
        }
    }
    if !number.is_empty() || !saw_component {
        return None;
    }
    Some(interval)
}

impl<'de> Deserialize<'de> for RecurrenceInterval {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct DurationVisitor;

        impl Visitor<'_> for DurationVisitor {
            type Value = RecurrenceInterval;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an ISO 8601 time duration such as PT1H30M")
            }

            fn visit_str<E: de::Error>(
                self,
                v: &str,
            ) -> std::result::Result<Self::Value, E> {
                parse_iso8601_duration(v)
                    .ok_or_else(|| E::custom(format!("invalid duration: {}", v)))
            }
        }

        deserializer.deserialize_str(DurationVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_interval: Option<RecurrenceInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_not_run_until: Option<String>,
}

/// Task launched once per recurrence to drive the job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobManagerTask {
    pub id: String,
    pub command_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpecification {
    pub pool_info: PoolInformation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_manager_task: Option<JobManagerTask>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobScheduleCreateParams {
    pub id: String,
    pub schedule: Schedule,
    pub job_specification: JobSpecification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudJobSchedule {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

#[derive(Debug, Deserialize)]
struct JobScheduleListResult {
    #[serde(default)]
    value: Vec<CloudJobSchedule>,
}

/// Handler for job schedule operations
pub struct JobScheduleHandler {
    client: BatchClient,
}

impl JobScheduleHandler {
    pub fn new(client: BatchClient) -> Self {
        Self { client }
    }

    /// Create a job schedule
    pub async fn create(&self, params: &JobScheduleCreateParams) -> Result<()> {
        self.client.post_json("/jobschedules", params).await
    }

    /// Get a job schedule by id
    pub async fn get(&self, schedule_id: &str) -> Result<CloudJobSchedule> {
        self.client
            .get_json(&format!("/jobschedules/{}", schedule_id))
            .await
    }

    /// List all job schedules under the account
    pub async fn list(&self) -> Result<Vec<CloudJobSchedule>> {
        let result: JobScheduleListResult = self.client.get_json("/jobschedules").await?;
        Ok(result.value)
    }

    /// Delete a job schedule
    pub async fn delete(&self, schedule_id: &str) -> Result<()> {
        self.client
            .delete(&format!("/jobschedules/{}", schedule_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn interval_formats_compactly() {
        assert_eq!(RecurrenceInterval::hours(1).to_string(), "PT1H");
        assert_eq!(RecurrenceInterval::minutes(30).to_string(), "PT30M");
        assert_eq!(RecurrenceInterval::seconds(45).to_string(), "PT45S");
        assert_eq!(RecurrenceInterval::new(1, 30, 0).to_string(), "PT1H30M");
        assert_eq!(
            RecurrenceInterval::new(2, 5, 10).to_string(),
            "PT2H5M10S"
        );
    }

    #[test]
    fn zero_interval_still_has_a_component() {
        assert_eq!(RecurrenceInterval::default().to_string(), "PT0S");
    }

    #[test]
    fn interval_parses_back() {
        for text in ["PT1H", "PT30M", "PT45S", "PT1H30M", "PT2H5M10S", "PT0S"] {
            let parsed: RecurrenceInterval =
                serde_json::from_value(serde_json::Value::String(text.to_string())).unwrap();
            assert_eq!(parsed.to_string(), text);
        }
    }

    #[test]
    fn interval_rejects_garbage() {
        for text in ["", "PT", "1H", "PT1X", "PT1"] {
            let result: std::result::Result<RecurrenceInterval, _> =
                serde_json::from_value(serde_json::Value::String(text.to_string()));
            assert!(result.is_err(), "{:?} should not parse", text);
        }
    }

    #[test]
    fn schedule_body_carries_iso_duration() {
        let params = JobScheduleCreateParams {
            id: "sched-1".to_string(),
            schedule: Schedule {
                recurrence_interval: Some(RecurrenceInterval::new(1, 30, 0)),
                do_not_run_until: None,
            },
            job_specification: JobSpecification {
                pool_info: PoolInformation {
                    pool_id: "pool-1".to_string(),
                },
                job_manager_task: Some(JobManagerTask {
                    id: "manager".to_string(),
                    command_line: "hostname".to_string(),
                    display_name: None,
                }),
            },
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["schedule"]["recurrenceInterval"], "PT1H30M");
        assert_eq!(
            json["jobSpecification"]["poolInfo"]["poolId"],
            "pool-1"
        );
    }
}
