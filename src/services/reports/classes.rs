use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};

use super::ReportService;
use super::chart::rate_bars;
use super::period::report_range;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::requests::{RecordFilter, SessionListQuery},
    classes::requests::ClassListQuery,
    reports::{
        requests::ClassReportParams,
        responses::{ClassReportResponse, ClassReportRow, ClassReportSummary},
    },
};
use crate::services::attendance::rules::attendance_rate;
use crate::services::{Reply, bad_request, internal_error};
use crate::storage::Storage;
use crate::utils::clock::today;

fn overall(rows: &[ClassReportRow]) -> ClassReportSummary {
    let mut summary = ClassReportSummary {
        total_classes: rows.len() as u64,
        ..Default::default()
    };
    for row in rows {
        summary.total_sessions += row.total_sessions;
        summary.total_records += row.total_records;
        summary.total_present += row.present;
        summary.total_absent += row.absent;
        summary.total_late += row.late;
    }
    summary.attendance_rate = attendance_rate(summary.total_present, summary.total_records);
    summary
}

/// 启用班级在范围内的课次与记录统计，出勤率以记录数为分母
pub(super) async fn build_class_report(
    storage: &Arc<dyn Storage>,
    params: &ClassReportParams,
) -> Result<ClassReportResponse, HttpResponse> {
    let (start_date, end_date) =
        report_range(
            params.date_range,
            params.start_date,
            params.end_date,
            today(),
            AppConfig::get().attendance.max_report_days,
        )
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;

    let mut classes = storage
        .list_classes(ClassListQuery {
            instructor_id: params.instructor_id,
            is_active: Some(true),
            ..Default::default()
        })
        .await
        .map_err(|e| internal_error("Failed to generate class report", e))?;
    if let Some(class_id) = params.class_id {
        classes.retain(|c| c.id == class_id);
    }

    let mut instructor_ids: Vec<i64> = classes.iter().filter_map(|c| c.instructor_id).collect();
    instructor_ids.sort_unstable();
    instructor_ids.dedup();
    let names: HashMap<i64, String> = storage
        .list_users_by_ids(&instructor_ids)
        .await
        .map_err(|e| internal_error("Failed to generate class report", e))?
        .into_iter()
        .map(|u| (u.id, u.full_name()))
        .collect();

    let mut rows = Vec::with_capacity(classes.len());
    for class in classes {
        let total_sessions = storage
            .count_sessions(SessionListQuery {
                class_id: Some(class.id),
                date_from: Some(start_date),
                date_to: Some(end_date),
                ..Default::default()
            })
            .await
            .map_err(|e| internal_error("Failed to generate class report", e))?;
        let counts = storage
            .count_records_by_status(RecordFilter {
                class_id: Some(class.id),
                date_from: Some(start_date),
                date_to: Some(end_date),
                ..Default::default()
            })
            .await
            .map_err(|e| internal_error("Failed to generate class report", e))?;
        let student_count = storage
            .count_active_enrollments(class.id)
            .await
            .map_err(|e| internal_error("Failed to generate class report", e))?;

        rows.push(ClassReportRow {
            class_id: class.id,
            instructor_name: class
                .instructor_id
                .and_then(|id| names.get(&id).cloned())
                .unwrap_or_else(|| "N/A".to_string()),
            class_code: class.class_code,
            class_name: class.name,
            student_count,
            total_sessions,
            total_records: counts.total,
            present: counts.present,
            absent: counts.absent,
            late: counts.late,
            attendance_rate: attendance_rate(counts.present, counts.total),
        });
    }

    let chart = (!rows.is_empty()).then(|| {
        rate_bars(
            rows.iter().map(|r| r.class_code.clone()).collect(),
            rows.iter().map(|r| r.attendance_rate).collect(),
            ("#138496", "#17a2b8"),
        )
    });

    Ok(ClassReportResponse {
        start_date,
        end_date,
        summary: overall(&rows),
        rows,
        chart,
    })
}

pub async fn class_report(
    service: &ReportService,
    params: ClassReportParams,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let response = build_class_report(&storage, &params).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Class report generated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, records: u64, present: u64, late: u64) -> ClassReportRow {
        ClassReportRow {
            class_id: 1,
            class_code: code.to_string(),
            class_name: code.to_string(),
            instructor_name: "N/A".to_string(),
            student_count: 0,
            total_sessions: 2,
            total_records: records,
            present,
            absent: records - present - late,
            late,
            attendance_rate: attendance_rate(present, records),
        }
    }

    #[test]
    fn test_overall_uses_record_denominator() {
        let summary = overall(&[row("ICT-1A", 10, 6, 2), row("ELC-2B", 10, 9, 0)]);
        assert_eq!(summary.total_classes, 2);
        assert_eq!(summary.total_sessions, 4);
        assert_eq!(summary.total_present, 15);
        assert_eq!(summary.total_absent, 3);
        assert_eq!(summary.attendance_rate, 75.0);
    }

    #[test]
    fn test_overall_empty() {
        let summary = overall(&[]);
        assert_eq!(summary.total_classes, 0);
        assert_eq!(summary.attendance_rate, 0.0);
    }
}
