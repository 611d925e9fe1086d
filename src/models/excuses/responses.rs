use crate::models::common::PaginationInfo;
use crate::models::excuses::entities::ExcuseApplication;
use serde::Serialize;
use ts_rs::TS;

// 请假申请 + 学生与班级名称
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/excuse.ts")]
pub struct ExcuseDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub application: ExcuseApplication,
    pub admission_number: String,
    pub student_name: String,
    pub class_name: String,
    pub reviewer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/excuse.ts")]
pub struct ExcuseListResponse {
    pub items: Vec<ExcuseDetail>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/excuse.ts")]
pub struct ReviewExcuseResponse {
    pub application: ExcuseApplication,
    pub records_excused: u64,
}
