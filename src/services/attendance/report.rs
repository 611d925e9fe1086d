//! 考勤筛选与 CSV 导出

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::info;

use super::AttendanceService;
use super::rules::attendance_rate;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        requests::{AttendanceFilterParams, RecordFilter},
        responses::{FilterReportResponse, RecordDetail},
    },
};
use crate::services::reports::period::filter_range;
use crate::services::scope::{Scope, resolve_scope};
use crate::services::{Reply, current_user, error_response, internal_error};
use crate::utils::clock::today;
use crate::utils::export::{CSV_CONTENT_TYPE, Cell, Table, attachment, truncate_chars};

const REMARKS_MAX_CHARS: usize = 50;

/// 按用户范围收窄筛选条件
fn scoped(mut filter: RecordFilter, scope: &Scope) -> RecordFilter {
    match scope {
        Scope::All => {}
        Scope::Instructor(id) => filter.instructor_id = Some(*id),
        Scope::Student { student, .. } => {
            // 没有学籍档案时不返回任何记录
            filter.student_id = Some(student.as_ref().map_or(-1, |s| s.id));
        }
    }
    filter
}

pub async fn filter_report(
    service: &AttendanceService,
    params: AttendanceFilterParams,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let scope = resolve_scope(&storage, &user).await?;

    let today = today();
    let (label, (start_date, end_date)) =
        match filter_range(
            params.date_range.as_deref(),
            params.start_date,
            params.end_date,
            today,
            AppConfig::get().attendance.max_report_days,
        ) {
            Some(range) => (params.date_range.clone().unwrap_or_default(), range),
            None => ("today".to_string(), (today, today)),
        };

    let filter = scoped(
        RecordFilter {
            class_id: params.class_id,
            student_id: params.student_id,
            status: params.status,
            date_from: Some(start_date),
            date_to: Some(end_date),
            ..Default::default()
        },
        &scope,
    );

    let items = storage
        .list_record_details(filter.clone())
        .await
        .map_err(|e| internal_error("Failed to filter attendance", e))?;
    let mut counts = storage
        .count_records_by_status(filter.clone())
        .await
        .map_err(|e| internal_error("Failed to count attendance", e))?;
    // 请假人数按 is_excused 标记统计
    counts.excused = storage
        .count_records_by_status(RecordFilter {
            is_excused: Some(true),
            ..filter
        })
        .await
        .map_err(|e| internal_error("Failed to count attendance", e))?
        .total;

    let response = FilterReportResponse {
        date_range: label,
        start_date,
        end_date,
        attendance_rate: attendance_rate(counts.present, counts.total),
        items,
        counts,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Attendance report generated successfully")))
}

fn csv_table(records: &[RecordDetail], class_codes: &std::collections::HashMap<i64, String>) -> Table {
    let offset = AppConfig::get().school_offset();
    let mut table = Table::new(vec![
        "Date",
        "Class",
        "Admission No",
        "Student Name",
        "Status",
        "Check-in Time",
        "Marked By",
        "Remarks",
    ]);
    for detail in records {
        let check_in = detail
            .record
            .check_in_time
            .map(|at| at.with_timezone(&offset).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        table.push(vec![
            Cell::from(detail.session_date.format("%Y-%m-%d").to_string()),
            Cell::from(
                class_codes
                    .get(&detail.class_id)
                    .cloned()
                    .unwrap_or_else(|| detail.class_name.clone()),
            ),
            Cell::from(detail.admission_number.clone()),
            Cell::from(detail.student_name.clone()),
            Cell::from(detail.record.status.label()),
            Cell::from(check_in),
            Cell::from(detail.marked_by_name.clone().unwrap_or_else(|| "System".to_string())),
            Cell::from(truncate_chars(&detail.record.remarks, REMARKS_MAX_CHARS)),
        ]);
    }
    table
}

pub async fn export_csv(
    service: &AttendanceService,
    params: AttendanceFilterParams,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let scope = resolve_scope(&storage, &user).await?;

    let filter = scoped(
        RecordFilter {
            class_id: params.class_id,
            student_id: params.student_id,
            status: params.status,
            date_from: params.start_date,
            date_to: params.end_date,
            chronological: true,
            limit: Some(AppConfig::get().attendance.export_row_limit),
            ..Default::default()
        },
        &scope,
    );
    let records = storage
        .list_record_details(filter)
        .await
        .map_err(|e| internal_error("Failed to export attendance", e))?;

    let mut class_ids: Vec<i64> = records.iter().map(|r| r.class_id).collect();
    class_ids.sort_unstable();
    class_ids.dedup();
    let class_codes = storage
        .list_classes_by_ids(&class_ids)
        .await
        .map_err(|e| internal_error("Failed to export attendance", e))?
        .into_iter()
        .map(|c| (c.id, c.class_code))
        .collect();

    let body = csv_table(&records, &class_codes).to_csv().map_err(|e| {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ExportFailed,
            format!("Failed to export attendance: {e}"),
        )
    })?;

    info!("用户 {} 导出 {} 条考勤记录", user.username, records.len());
    let filename = format!("attendance_report_{}.csv", today().format("%Y-%m-%d"));
    Ok(attachment(CSV_CONTENT_TYPE, &filename, body))
}
