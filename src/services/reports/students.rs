use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};

use super::ReportService;
use super::chart::status_lines;
use super::period::report_range;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::AttendanceStatus,
        requests::{RecordFilter, SessionListQuery},
        responses::RecordDetail,
    },
    reports::{
        requests::StudentReportParams,
        responses::{ChartData, StudentReportResponse, StudentReportRow, StudentReportSummary},
    },
    students::entities::Student,
};
use crate::services::attendance::rules::attendance_rate;
use crate::services::{Reply, bad_request, internal_error, not_found};
use crate::storage::Storage;
use crate::utils::clock::today;

#[derive(Default, Clone, Copy)]
struct Counts {
    present: u64,
    absent: u64,
    late: u64,
}

fn count(records: &[&RecordDetail]) -> Counts {
    records.iter().fold(Counts::default(), |mut c, r| {
        match r.record.status {
            AttendanceStatus::Present => c.present += 1,
            AttendanceStatus::Absent => c.absent += 1,
            AttendanceStatus::Late => c.late += 1,
            _ => {}
        }
        c
    })
}

/// 按天统计出勤、缺勤、迟到；没有记录时不出图
fn daily_chart(
    records: &[RecordDetail],
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> Option<ChartData> {
    if records.is_empty() || start > end {
        return None;
    }
    let days = (end - start).num_days() as usize + 1;
    let mut present = vec![0u64; days];
    let mut absent = vec![0u64; days];
    let mut late = vec![0u64; days];
    for detail in records {
        let offset = (detail.session_date - start).num_days();
        if offset < 0 || offset as usize >= days {
            continue;
        }
        let i = offset as usize;
        match detail.record.status {
            AttendanceStatus::Present => present[i] += 1,
            AttendanceStatus::Absent => absent[i] += 1,
            AttendanceStatus::Late => late[i] += 1,
            _ => {}
        }
    }
    let labels = start
        .iter_days()
        .take(days)
        .map(|day| day.format("%d/%m").to_string())
        .collect();
    Some(status_lines(labels, present, absent, late))
}

async fn report_students(
    storage: &Arc<dyn Storage>,
    params: &StudentReportParams,
) -> Result<Vec<Student>, HttpResponse> {
    if let Some(student_id) = params.student_id {
        let student = storage
            .get_student_by_id(student_id)
            .await
            .map_err(|e| internal_error("Failed to generate student report", e))?
            .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?;
        return Ok(vec![student]);
    }
    let mut students = match params.class_id {
        Some(class_id) => {
            let ids: Vec<i64> = storage
                .list_enrollments_by_class(class_id, false)
                .await
                .map_err(|e| internal_error("Failed to generate student report", e))?
                .into_iter()
                .map(|e| e.student_id)
                .collect();
            storage.list_students_by_ids(&ids).await
        }
        None => storage.list_students(None).await,
    }
    .map_err(|e| internal_error("Failed to generate student report", e))?;
    students.sort_by(|a, b| a.admission_number.cmp(&b.admission_number));
    Ok(students)
}

pub(super) async fn build_student_report(
    storage: &Arc<dyn Storage>,
    params: &StudentReportParams,
) -> Result<StudentReportResponse, HttpResponse> {
    let (start_date, end_date) =
        report_range(
            params.date_range,
            params.start_date,
            params.end_date,
            today(),
            AppConfig::get().attendance.max_report_days,
        )
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;

    let records = storage
        .list_record_details(RecordFilter {
            student_id: params.student_id,
            class_id: params.class_id,
            date_from: Some(start_date),
            date_to: Some(end_date),
            chronological: true,
            ..Default::default()
        })
        .await
        .map_err(|e| internal_error("Failed to generate student report", e))?;

    let total_sessions = storage
        .count_sessions(SessionListQuery {
            class_id: params.class_id,
            date_from: Some(start_date),
            date_to: Some(end_date),
            ..Default::default()
        })
        .await
        .map_err(|e| internal_error("Failed to generate student report", e))?;

    let students = report_students(storage, params).await?;

    let mut course_ids: Vec<i64> = students.iter().filter_map(|s| s.course_id).collect();
    course_ids.sort_unstable();
    course_ids.dedup();
    let courses: HashMap<i64, String> = storage
        .list_courses_by_ids(&course_ids)
        .await
        .map_err(|e| internal_error("Failed to generate student report", e))?
        .into_iter()
        .map(|c| (c.id, c.code))
        .collect();
    let user_ids: Vec<i64> = students.iter().map(|s| s.user_id).collect();
    let names: HashMap<i64, String> = storage
        .list_users_by_ids(&user_ids)
        .await
        .map_err(|e| internal_error("Failed to generate student report", e))?
        .into_iter()
        .map(|u| (u.id, u.full_name()))
        .collect();

    let mut by_student: HashMap<i64, Vec<&RecordDetail>> = HashMap::new();
    for detail in &records {
        by_student.entry(detail.record.student_id).or_default().push(detail);
    }

    let rows = students
        .iter()
        .map(|student| {
            let counts = by_student
                .get(&student.id)
                .map(|r| count(r))
                .unwrap_or_default();
            StudentReportRow {
                student_id: student.id,
                admission_number: student.admission_number.clone(),
                student_name: names.get(&student.user_id).cloned().unwrap_or_default(),
                course: student
                    .course_id
                    .and_then(|id| courses.get(&id).cloned())
                    .unwrap_or_else(|| "N/A".to_string()),
                present: counts.present,
                absent: counts.absent,
                late: counts.late,
                attendance_rate: attendance_rate(counts.present, total_sessions),
            }
        })
        .collect();

    let all: Vec<&RecordDetail> = records.iter().collect();
    let overall = count(&all);
    Ok(StudentReportResponse {
        start_date,
        end_date,
        total_sessions,
        rows,
        summary: StudentReportSummary {
            present: overall.present,
            absent: overall.absent,
            late: overall.late,
            attendance_rate: attendance_rate(overall.present, total_sessions),
        },
        chart: daily_chart(&records, start_date, end_date),
    })
}

pub async fn student_report(
    service: &ReportService,
    params: StudentReportParams,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let response = build_student_report(&storage, &params).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Student report generated successfully")))
}
