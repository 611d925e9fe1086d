use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};

use super::ReportService;
use super::chart::groups_chart;
use super::period::{report_range, time_buckets, time_key};
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{entities::AttendanceStatus, requests::RecordFilter, responses::RecordDetail},
    classes::entities::Class,
    reports::{
        requests::{AttendanceReportParams, GroupBy},
        responses::{AttendanceReportResponse, ReportGroup, ReportSummary},
    },
};
use crate::services::attendance::rules::{attendance_rate, punctuality_rate};
use crate::services::{Reply, bad_request, internal_error};
use crate::storage::Storage;
use crate::utils::clock::today;

fn tally(group: &mut ReportGroup, status: AttendanceStatus) {
    group.total += 1;
    match status {
        AttendanceStatus::Present => group.present += 1,
        AttendanceStatus::Absent => group.absent += 1,
        AttendanceStatus::Late => group.late += 1,
        AttendanceStatus::Excused => group.excused += 1,
        AttendanceStatus::HalfDay => {}
    }
}

pub(super) fn summarize(records: &[RecordDetail]) -> ReportSummary {
    let mut all = ReportGroup::default();
    for detail in records {
        tally(&mut all, detail.record.status);
    }
    ReportSummary {
        total: all.total,
        present: all.present,
        absent: all.absent,
        late: all.late,
        excused: all.excused,
        attendance_rate: attendance_rate(all.present, all.total),
        punctuality_rate: punctuality_rate(all.present, all.late),
    }
}

/// 按出现顺序累加的实体分组
#[derive(Default)]
struct EntityGroups {
    index: HashMap<i64, usize>,
    groups: Vec<ReportGroup>,
}

impl EntityGroups {
    fn entry(&mut self, id: i64, make: impl FnOnce() -> (String, Option<String>)) -> &mut ReportGroup {
        let idx = *self.index.entry(id).or_insert_with(|| {
            let (label, detail) = make();
            self.groups.push(ReportGroup {
                key: id.to_string(),
                label,
                entity_id: Some(id),
                detail,
                ..Default::default()
            });
            self.groups.len() - 1
        });
        &mut self.groups[idx]
    }
}

pub(super) fn group_records(
    group_by: GroupBy,
    records: &[RecordDetail],
    range: (chrono::NaiveDate, chrono::NaiveDate),
    classes: &HashMap<i64, Class>,
    instructor_names: &HashMap<i64, String>,
) -> Vec<ReportGroup> {
    if group_by.is_time_based() {
        let mut buckets = time_buckets(group_by, range.0, range.1);
        let index: HashMap<String, usize> = buckets
            .iter()
            .enumerate()
            .map(|(i, b)| (b.key.clone(), i))
            .collect();
        for detail in records {
            if let Some(i) = time_key(group_by, detail.session_date).and_then(|k| index.get(&k)) {
                tally(&mut buckets[*i], detail.record.status);
            }
        }
        return buckets;
    }

    let mut groups = EntityGroups::default();
    for detail in records {
        let class = classes.get(&detail.class_id);
        let group = match group_by {
            GroupBy::Class => groups.entry(detail.class_id, || {
                let label = class.map_or_else(|| detail.class_name.clone(), |c| c.class_code.clone());
                let instructor = class
                    .and_then(|c| c.instructor_id)
                    .and_then(|id| instructor_names.get(&id).cloned())
                    .unwrap_or_else(|| "N/A".to_string());
                (label, Some(instructor))
            }),
            GroupBy::Instructor => {
                let Some(instructor_id) = class.and_then(|c| c.instructor_id) else {
                    continue;
                };
                groups.entry(instructor_id, || {
                    let name = instructor_names.get(&instructor_id).cloned().unwrap_or_default();
                    (name, None)
                })
            }
            _ => groups.entry(detail.record.student_id, || {
                (detail.student_name.clone(), Some(detail.admission_number.clone()))
            }),
        };
        tally(group, detail.record.status);
    }
    groups.groups
}

/// 记录涉及的班级及其任课教师姓名
pub(super) async fn class_context(
    storage: &Arc<dyn Storage>,
    records: &[RecordDetail],
) -> Result<(HashMap<i64, Class>, HashMap<i64, String>), HttpResponse> {
    let mut class_ids: Vec<i64> = records.iter().map(|r| r.class_id).collect();
    class_ids.sort_unstable();
    class_ids.dedup();
    let classes: HashMap<i64, Class> = storage
        .list_classes_by_ids(&class_ids)
        .await
        .map_err(|e| internal_error("Failed to load classes", e))?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut instructor_ids: Vec<i64> = classes.values().filter_map(|c| c.instructor_id).collect();
    instructor_ids.sort_unstable();
    instructor_ids.dedup();
    let names = storage
        .list_users_by_ids(&instructor_ids)
        .await
        .map_err(|e| internal_error("Failed to load instructors", e))?
        .into_iter()
        .map(|u| (u.id, u.full_name()))
        .collect();
    Ok((classes, names))
}

pub(super) async fn build_attendance_report(
    storage: &Arc<dyn Storage>,
    params: &AttendanceReportParams,
) -> Result<(AttendanceReportResponse, Vec<RecordDetail>), HttpResponse> {
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
            date_from: Some(start_date),
            date_to: Some(end_date),
            chronological: true,
            ..Default::default()
        })
        .await
        .map_err(|e| internal_error("Failed to generate attendance report", e))?;

    let (groups, chart) = match params.group_by {
        Some(group_by) => {
            let (classes, names) = class_context(storage, &records).await?;
            let groups = group_records(group_by, &records, (start_date, end_date), &classes, &names);
            let chart = groups_chart(&groups, group_by.is_time_based());
            (groups, chart)
        }
        None => (Vec::new(), None),
    };

    let response = AttendanceReportResponse {
        start_date,
        end_date,
        group_by: params.group_by,
        groups,
        summary: summarize(&records),
        chart,
    };
    Ok((response, records))
}

pub async fn attendance_report(
    service: &ReportService,
    params: AttendanceReportParams,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let (response, _) = build_attendance_report(&storage, &params).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Attendance report generated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceRecord;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn detail(student_id: i64, class_id: i64, day: u32, status: AttendanceStatus) -> RecordDetail {
        let now = Utc::now();
        RecordDetail {
            record: AttendanceRecord {
                id: student_id * 100 + day as i64,
                session_id: day as i64,
                student_id,
                status,
                check_in_time: None,
                check_out_time: None,
                mark_time: now,
                marked_by: None,
                is_excused: false,
                excuse_reason: String::new(),
                remarks: String::new(),
                late_minutes: 0,
                created_at: now,
                updated_at: now,
            },
            admission_number: format!("TVET2025{student_id:04}"),
            student_name: format!("Student {student_id}"),
            class_id,
            class_name: format!("Class {class_id}"),
            session_date: date(day),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            marked_by_name: None,
        }
    }

    fn records() -> Vec<RecordDetail> {
        vec![
            detail(1, 10, 10, AttendanceStatus::Present),
            detail(2, 10, 10, AttendanceStatus::Late),
            detail(1, 20, 12, AttendanceStatus::Absent),
            detail(2, 20, 12, AttendanceStatus::Excused),
        ]
    }

    #[test]
    fn test_summary() {
        let summary = summarize(&records());
        assert_eq!(summary.total, 4);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.excused, 1);
        assert_eq!(summary.attendance_rate, 25.0);
        assert_eq!(summary.punctuality_rate, 0.0);
    }

    #[test]
    fn test_day_groups_are_prefilled() {
        let groups = group_records(
            GroupBy::Day,
            &records(),
            (date(10), date(13)),
            &HashMap::new(),
            &HashMap::new(),
        );
        assert_eq!(groups.len(), 4);
        assert_eq!((groups[0].present, groups[0].late, groups[0].total), (1, 1, 2));
        assert_eq!(groups[1].total, 0);
        assert_eq!((groups[2].absent, groups[2].excused), (1, 1));
        assert_eq!(groups[3].total, 0);
    }

    #[test]
    fn test_student_groups_keep_first_seen_order() {
        let groups = group_records(
            GroupBy::Student,
            &records(),
            (date(10), date(13)),
            &HashMap::new(),
            &HashMap::new(),
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].entity_id, Some(1));
        assert_eq!(groups[0].detail.as_deref(), Some("TVET20250001"));
        assert_eq!((groups[0].present, groups[0].absent), (1, 1));
        assert_eq!((groups[1].late, groups[1].excused), (1, 1));
    }

    #[test]
    fn test_instructor_groups_skip_unassigned_classes() {
        let groups = group_records(
            GroupBy::Instructor,
            &records(),
            (date(10), date(13)),
            &HashMap::new(),
            &HashMap::new(),
        );
        assert!(groups.is_empty());
    }
}
