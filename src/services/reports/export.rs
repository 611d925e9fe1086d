//! 报表导出（CSV / Excel）

use actix_web::{HttpRequest, http::StatusCode};
use tracing::info;

use super::ReportService;
use super::attendance::build_attendance_report;
use super::classes::build_class_report;
use super::students::build_student_report;
use crate::config::AppConfig;
use crate::models::{
    ErrorCode,
    reports::{
        entities::FileFormat,
        requests::{
            AttendanceReportParams, ClassReportParams, ExportKind, ExportReportParams,
            StudentReportParams,
        },
    },
};
use crate::services::{Reply, bad_request, current_user, error_response};
use crate::utils::clock::today;
use crate::utils::export::{
    CSV_CONTENT_TYPE, Cell, Table, XLSX_CONTENT_TYPE, attachment, truncate_chars,
};

async fn build_table(
    service: &ReportService,
    kind: ExportKind,
    params: &ExportReportParams,
    request: &HttpRequest,
) -> Result<Table, actix_web::HttpResponse> {
    let storage = service.get_storage(request)?;
    let table = match kind {
        ExportKind::Attendance => {
            let report_params = AttendanceReportParams {
                date_range: params.date_range,
                start_date: params.start_date,
                end_date: params.end_date,
                group_by: None,
            };
            let (_, records) = build_attendance_report(&storage, &report_params).await?;
            let offset = AppConfig::get().school_offset();
            let mut table = Table::new(vec![
                "Date",
                "Class",
                "Admission No",
                "Student",
                "Status",
                "Check-in Time",
                "Remarks",
            ]);
            let limit = AppConfig::get().attendance.export_row_limit as usize;
            for detail in records.iter().take(limit) {
                table.push(vec![
                    Cell::from(detail.session_date.format("%Y-%m-%d").to_string()),
                    Cell::from(detail.class_name.clone()),
                    Cell::from(detail.admission_number.clone()),
                    Cell::from(detail.student_name.clone()),
                    Cell::from(detail.record.status.label()),
                    Cell::from(
                        detail
                            .record
                            .check_in_time
                            .map(|at| at.with_timezone(&offset).format("%H:%M:%S").to_string())
                            .unwrap_or_else(|| "N/A".to_string()),
                    ),
                    Cell::from(truncate_chars(&detail.record.remarks, 50)),
                ]);
            }
            table
        }
        ExportKind::Student => {
            let report_params = StudentReportParams {
                date_range: params.date_range,
                start_date: params.start_date,
                end_date: params.end_date,
                student_id: params.student_id,
                class_id: params.class_id,
            };
            let report = build_student_report(&storage, &report_params).await?;
            let mut table = Table::new(vec![
                "Admission No",
                "Name",
                "Course",
                "Present",
                "Absent",
                "Late",
                "Attendance Rate %",
            ]);
            for row in report.rows {
                table.push(vec![
                    row.admission_number.into(),
                    row.student_name.into(),
                    row.course.into(),
                    row.present.into(),
                    row.absent.into(),
                    row.late.into(),
                    row.attendance_rate.into(),
                ]);
            }
            table
        }
        ExportKind::Class => {
            let report_params = ClassReportParams {
                date_range: params.date_range,
                start_date: params.start_date,
                end_date: params.end_date,
                class_id: params.class_id,
                instructor_id: params.instructor_id,
            };
            let report = build_class_report(&storage, &report_params).await?;
            let mut table = Table::new(vec![
                "Class Code",
                "Instructor",
                "Sessions",
                "Present",
                "Absent",
                "Late",
                "Attendance Rate %",
            ]);
            for row in report.rows {
                table.push(vec![
                    row.class_code.into(),
                    row.instructor_name.into(),
                    row.total_sessions.into(),
                    row.present.into(),
                    row.absent.into(),
                    row.late.into(),
                    row.attendance_rate.into(),
                ]);
            }
            table
        }
    };
    Ok(table)
}

pub async fn export_report(
    service: &ReportService,
    kind: String,
    params: ExportReportParams,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let kind = kind
        .parse::<ExportKind>()
        .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    if matches!(params.format, FileFormat::Pdf | FileFormat::Html) {
        return Err(bad_request(
            ErrorCode::ExportFormatUnsupported,
            format!("Export format {} is not supported", params.format),
        ));
    }

    let table = build_table(service, kind, &params, request).await?;
    let export_failed = |e| {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ExportFailed,
            format!("Failed to export report: {e}"),
        )
    };
    let date = today().format("%Y-%m-%d");

    info!("用户 {} 导出 {} 报表（{}，{} 行）", user.username, kind, params.format, table.rows.len());
    match params.format {
        FileFormat::Excel => {
            let body = table.to_xlsx("Report").map_err(export_failed)?;
            Ok(attachment(XLSX_CONTENT_TYPE, &format!("{kind}_report_{date}.xlsx"), body))
        }
        _ => {
            let body = table.to_csv().map_err(export_failed)?;
            Ok(attachment(CSV_CONTENT_TYPE, &format!("{kind}_report_{date}.csv"), body))
        }
    }
}
