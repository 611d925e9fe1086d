use serde::Serialize;
use ts_rs::TS;

// 服务状态
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemInfoResponse {
    pub name: String,
    pub version: String,
    pub environment: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub uptime_seconds: i64,
}
