//! 快速报表：今日概况、按专业的学生人数、本周班级出勤

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use chrono::Duration;

use super::ReportService;
use super::period::week_start;
use super::widgets::{round1, today_attendance};
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::requests::{RecordFilter, SessionListQuery},
    classes::requests::ClassListQuery,
    reports::{
        requests::QuickReportParams,
        responses::{CourseCount, QuickReport, WeeklyClassAttendance},
    },
};
use crate::services::attendance::rules::attendance_rate;
use crate::services::{Reply, bad_request, internal_error};
use crate::storage::Storage;
use crate::utils::clock::today;

async fn today_summary(storage: &Arc<dyn Storage>) -> crate::errors::Result<QuickReport> {
    let counts = today_attendance(storage).await?;
    Ok(QuickReport::Today {
        report_type: "Today's Attendance Summary".to_string(),
        date: today().format("%d/%m/%Y").to_string(),
        total: counts.total,
        present: counts.present,
        absent: counts.absent,
        late: counts.late,
        attendance_rate: attendance_rate(counts.present, counts.total),
    })
}

async fn student_count(storage: &Arc<dyn Storage>) -> crate::errors::Result<QuickReport> {
    let per_course = storage.count_active_students_by_course().await?;
    let course_data = storage
        .list_active_courses()
        .await?
        .into_iter()
        .map(|course| CourseCount {
            count: per_course.get(&course.id).copied().unwrap_or(0),
            course: course.name,
        })
        .collect();
    let stats = storage.student_stats().await?;

    Ok(QuickReport::StudentCount {
        report_type: "Student Count by Course".to_string(),
        date: today().format("%d/%m/%Y").to_string(),
        total_students: stats.active,
        course_data,
    })
}

async fn weekly_classes(storage: &Arc<dyn Storage>) -> crate::errors::Result<QuickReport> {
    let monday = week_start(today());
    let sunday = monday + Duration::days(6);

    let classes = storage
        .list_classes(ClassListQuery {
            is_active: Some(true),
            ..Default::default()
        })
        .await?;
    let mut class_data = Vec::with_capacity(classes.len());
    for class in classes {
        let total_sessions = storage
            .count_sessions(SessionListQuery {
                class_id: Some(class.id),
                date_from: Some(monday),
                date_to: Some(sunday),
                ..Default::default()
            })
            .await?;
        let counts = storage
            .count_records_by_status(RecordFilter {
                class_id: Some(class.id),
                date_from: Some(monday),
                date_to: Some(sunday),
                ..Default::default()
            })
            .await?;
        let rate = if counts.total == 0 {
            0.0
        } else {
            round1(counts.present as f64 / counts.total as f64 * 100.0)
        };
        class_data.push(WeeklyClassAttendance {
            class: class.class_code,
            total_sessions,
            present: counts.present,
            total: counts.total,
            rate,
        });
    }

    Ok(QuickReport::ClassAttendance {
        report_type: "Weekly Class Attendance".to_string(),
        period: format!("{} - {}", monday.format("%d/%m"), sunday.format("%d/%m")),
        class_data,
    })
}

pub async fn quick_report(
    service: &ReportService,
    params: QuickReportParams,
    request: &HttpRequest,
) -> Reply {
    let kind = params.report_type.as_deref().unwrap_or("today");
    let storage = service.get_storage(request)?;
    let report = match kind {
        "today" => today_summary(&storage).await,
        "student_count" => student_count(&storage).await,
        "class_attendance" => weekly_classes(&storage).await,
        other => {
            return Err(bad_request(
                ErrorCode::BadRequest,
                format!("Invalid quick report type: {other}"),
            ));
        }
    }
    .map_err(|e| internal_error("Failed to generate quick report", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(report, "Quick report generated successfully")))
}
