//! 班级花名册：本月出勤、准时率与班级概况

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use actix_web::HttpResponse;
use chrono::{Days, NaiveDate};

use crate::models::{
    PaginationInfo,
    attendance::{
        entities::{AttendanceSession, AttendanceStatus, PeriodType, SessionStatus},
        requests::{RecordFilter, SessionListQuery},
    },
    classes::entities::Class,
    students::{
        entities::{Gender, Student},
        requests::ClassRosterQuery,
        responses::{
            ClassRosterItem, ClassRosterResponse, GenderCounts, RosterTrendPoint,
            StudentAttendanceStats,
        },
    },
    users::entities::User,
};
use crate::services::attendance::rules::{
    month_end, month_start, percentage, punctuality_rate, round2, weighted_rate,
};
use crate::services::internal_error;
use crate::storage::Storage;

const RECENT_SESSIONS: u64 = 5;
const TREND_DAYS: u64 = 5;

fn matches_keyword(student: &Student, user: Option<&User>, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    let hit = |field: &str| field.to_lowercase().contains(&keyword);

    hit(&student.admission_number)
        || student.national_id.as_deref().is_some_and(|id| hit(id))
        || user.is_some_and(|u| hit(&u.first_name) || hit(&u.last_name) || hit(&u.email))
}

/// 有出勤记录的学生的平均出勤率与平均准时率
fn class_averages(items: &[ClassRosterItem]) -> (f64, f64) {
    let attended: Vec<&ClassRosterItem> = items
        .iter()
        .filter(|item| item.stats.attendance_rate > 0.0)
        .collect();
    if attended.is_empty() {
        return (0.0, 0.0);
    }

    let n = attended.len() as f64;
    let attendance: f64 = attended.iter().map(|i| i.stats.attendance_rate).sum();
    let punctuality: f64 = attended.iter().map(|i| i.punctuality_rate).sum();
    (round2(attendance / n), round2(punctuality / n))
}

/// 当天已结束课次的出勤人次占应到人次的比例
fn trend_point(date: NaiveDate, completed: &[AttendanceSession], total_students: u64) -> RosterTrendPoint {
    let on_date: Vec<&AttendanceSession> =
        completed.iter().filter(|s| s.session_date == date).collect();
    let rate = (!on_date.is_empty()).then(|| {
        let present: u64 = on_date.iter().map(|s| s.total_present.max(0) as u64).sum();
        percentage(present, total_students * on_date.len() as u64)
    });
    RosterTrendPoint { date, rate }
}

fn gender_counts<'a>(students: impl Iterator<Item = &'a Student>) -> GenderCounts {
    let mut counts = GenderCounts::default();
    for student in students {
        match student.gender {
            Gender::Male => counts.male += 1,
            Gender::Female => counts.female += 1,
            Gender::Other => counts.other += 1,
        }
    }
    counts
}

/// 班级有效选课学生的本月统计与班级概况，`today` 为学校本地日期
pub(crate) async fn build_class_roster(
    storage: &Arc<dyn Storage>,
    class: Class,
    query: &ClassRosterQuery,
    today: NaiveDate,
) -> Result<ClassRosterResponse, HttpResponse> {
    let (from, to) = (month_start(today), month_end(today));

    let enrollments = storage
        .list_enrollments_by_class(class.id, true)
        .await
        .map_err(|e| internal_error("Failed to load enrollments", e))?;
    let student_ids: Vec<i64> = enrollments.iter().map(|e| e.student_id).collect();
    let students: HashMap<i64, Student> = storage
        .list_students_by_ids(&student_ids)
        .await
        .map_err(|e| internal_error("Failed to load students", e))?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();
    let user_ids: Vec<i64> = students.values().map(|s| s.user_id).collect();
    let users: HashMap<i64, User> = storage
        .list_users_by_ids(&user_ids)
        .await
        .map_err(|e| internal_error("Failed to load users", e))?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let keyword = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let mut enrolled: Vec<_> = enrollments
        .into_iter()
        .filter_map(|enrollment| {
            let student = students.get(&enrollment.student_id)?;
            let user = users.get(&student.user_id);
            let keep = keyword.is_none_or(|k| matches_keyword(student, user, k))
                && query.gender.as_ref().is_none_or(|g| *g == student.gender)
                && query.status.as_ref().is_none_or(|s| *s == student.status);
            keep.then_some((enrollment, student, user))
        })
        .collect();
    enrolled.sort_by(|a, b| a.1.admission_number.cmp(&b.1.admission_number));

    let month_sessions = storage
        .list_sessions(
            SessionListQuery {
                class_id: Some(class.id),
                date_from: Some(from),
                date_to: Some(to),
                ascending: true,
                ..Default::default()
            },
            None,
        )
        .await
        .map_err(|e| internal_error("Failed to load sessions", e))?;
    let completed: HashSet<i64> = month_sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed)
        .map(|s| s.id)
        .collect();
    let total_sessions = completed.len() as u64;

    let records = storage
        .list_record_details(RecordFilter {
            class_id: Some(class.id),
            date_from: Some(from),
            date_to: Some(to),
            ..Default::default()
        })
        .await
        .map_err(|e| internal_error("Failed to load attendance records", e))?;
    let mut by_student: HashMap<i64, (StudentAttendanceStats, Option<NaiveDate>)> = HashMap::new();
    for detail in &records {
        let (stats, last_seen) = by_student.entry(detail.record.student_id).or_default();
        let status = detail.record.status;
        if matches!(
            status,
            AttendanceStatus::Present | AttendanceStatus::Late | AttendanceStatus::HalfDay
        ) {
            *last_seen = (*last_seen).max(Some(detail.session_date));
        }
        if !completed.contains(&detail.record.session_id) {
            continue;
        }
        match status {
            AttendanceStatus::Present => stats.present += 1,
            AttendanceStatus::Late => stats.late += 1,
            AttendanceStatus::Absent => stats.absent += 1,
            AttendanceStatus::Excused => stats.excused += 1,
            AttendanceStatus::HalfDay => stats.half_day += 1,
        }
    }

    let summaries: HashMap<i64, _> = storage
        .list_summaries(None, Some(class.id))
        .await
        .map_err(|e| internal_error("Failed to load attendance summaries", e))?
        .into_iter()
        .filter(|s| s.period_type == PeriodType::Monthly && s.period_start == from)
        .map(|s| (s.student_id, s))
        .collect();

    let items: Vec<ClassRosterItem> = enrolled
        .iter()
        .map(|(enrollment, student, user)| {
            let (mut stats, last_attendance_date) =
                by_student.get(&student.id).cloned().unwrap_or_default();
            stats.total_sessions = total_sessions;
            stats.attendance_rate = weighted_rate(stats.present, stats.half_day, total_sessions);
            ClassRosterItem {
                enrollment: enrollment.clone(),
                student_id: student.id,
                admission_number: student.admission_number.clone(),
                student_name: user.map(|u| u.full_name()).unwrap_or_default(),
                gender: student.gender.clone(),
                status: student.status.clone(),
                punctuality_rate: punctuality_rate(stats.present + stats.half_day, stats.late),
                stats,
                last_attendance_date,
                monthly_summary: summaries.get(&student.id).cloned(),
            }
        })
        .collect();

    let total_students = items.len() as u64;
    let (average_attendance, average_punctuality) = class_averages(&items);
    let gender_counts = gender_counts(enrolled.iter().map(|(_, s, _)| *s));

    let today_session = month_sessions
        .iter()
        .find(|s| s.session_date == today && s.status == SessionStatus::Completed);
    let (present_today, late_today, absent_today) = today_session
        .map(|s| (s.total_present, s.total_late, s.total_absent))
        .unwrap_or_default();

    let recent_sessions = storage
        .list_sessions(
            SessionListQuery {
                class_id: Some(class.id),
                status: Some(SessionStatus::Completed),
                ..Default::default()
            },
            Some(RECENT_SESSIONS),
        )
        .await
        .map_err(|e| internal_error("Failed to load sessions", e))?;

    let trend_from = today
        .checked_sub_days(Days::new(TREND_DAYS - 1))
        .unwrap_or(NaiveDate::MIN);
    let trend_sessions = storage
        .list_sessions(
            SessionListQuery {
                class_id: Some(class.id),
                status: Some(SessionStatus::Completed),
                date_from: Some(trend_from),
                date_to: Some(today),
                ..Default::default()
            },
            None,
        )
        .await
        .map_err(|e| internal_error("Failed to load sessions", e))?;
    let trend = (0..TREND_DAYS)
        .map_while(|i| today.checked_sub_days(Days::new(i)))
        .map(|date| trend_point(date, &trend_sessions, total_students))
        .collect();

    let page = query.pagination.page.max(1);
    let size = query.pagination.size.clamp(1, 100);
    let total = items.len() as i64;
    let page_items = items
        .into_iter()
        .skip(((page - 1) * size) as usize)
        .take(size as usize)
        .collect();

    Ok(ClassRosterResponse {
        class,
        month_start: from,
        month_end: to,
        total_students,
        present_today,
        late_today,
        absent_today,
        gender_counts,
        average_attendance,
        average_punctuality,
        recent_sessions,
        trend,
        items: page_items,
        pagination: PaginationInfo {
            page,
            page_size: size,
            total,
            total_pages: (total + size - 1) / size,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::{
        entities::AttendanceMethod,
        requests::{NewSession, RecordWrite},
    };
    use crate::models::students::{entities::EnrollmentType, requests::NewEnrollment};
    use crate::models::users::entities::{AccountStatus, UserType};
    use crate::storage::sea_orm_storage::tests::{
        new_user, seed_class, seed_course, seed_student, storage,
    };

    fn session_on(date: &str, total_present: i32) -> AttendanceSession {
        AttendanceSession {
            id: 0,
            class_id: 1,
            instructor_id: 1,
            session_date: date.parse().unwrap(),
            start_time: "08:00:00".parse().unwrap(),
            end_time: "10:00:00".parse().unwrap(),
            topic_covered: String::new(),
            venue: String::new(),
            attendance_method: AttendanceMethod::Manual,
            qr_code_data: None,
            qr_code_expiry: None,
            status: SessionStatus::Completed,
            total_present,
            total_absent: 0,
            total_late: 0,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            closed_at: None,
        }
    }

    #[test]
    fn test_trend_point_averages_sessions_on_date() {
        let sessions = vec![session_on("2025-03-10", 8), session_on("2025-03-10", 6)];
        let point = trend_point("2025-03-10".parse().unwrap(), &sessions, 10);
        assert_eq!(point.rate, Some(70.0));

        let empty = trend_point("2025-03-09".parse().unwrap(), &sessions, 10);
        assert_eq!(empty.rate, None);
    }

    struct Fixture {
        storage: Arc<dyn Storage>,
        class: Class,
        students: Vec<Student>,
        instructor_id: i64,
    }

    async fn fixture() -> Fixture {
        let storage = storage().await;
        let instructor = storage
            .create_user_impl(new_user("jmwangi", UserType::Instructor, AccountStatus::Approved))
            .await
            .unwrap();
        let course = seed_course(&storage, "CARP").await;
        let class = seed_class(&storage, course.id, "CARP-1", Some(instructor.id)).await;
        let students = vec![
            seed_student(&storage, "achieng", "TVET20250051").await,
            seed_student(&storage, "barasa", "TVET20250052").await,
        ];
        for student in &students {
            storage
                .create_enrollment_impl(NewEnrollment {
                    student_id: student.id,
                    course_id: course.id,
                    class_id: class.id,
                    enrollment_date: "2025-01-06".parse().unwrap(),
                    enrollment_type: EnrollmentType::Regular,
                    remarks: String::new(),
                })
                .await
                .unwrap();
        }

        Fixture {
            storage: Arc::new(storage),
            class,
            students,
            instructor_id: instructor.id,
        }
    }

    /// 建一节课并写入两名学生的状态，`complete` 为真时结课并刷新统计
    async fn held(
        f: &Fixture,
        date: &str,
        statuses: [AttendanceStatus; 2],
        complete: bool,
    ) -> AttendanceSession {
        let session = f
            .storage
            .create_session(NewSession {
                class_id: f.class.id,
                instructor_id: f.instructor_id,
                session_date: date.parse().unwrap(),
                start_time: "08:00:00".parse().unwrap(),
                end_time: "10:00:00".parse().unwrap(),
                topic_covered: "Joinery".to_string(),
                venue: "Workshop".to_string(),
                attendance_method: AttendanceMethod::Manual,
                qr_code_data: None,
                qr_code_expiry: None,
            })
            .await
            .unwrap();
        for (student, status) in f.students.iter().zip(statuses) {
            f.storage
                .save_record(RecordWrite {
                    session_id: session.id,
                    student_id: student.id,
                    status,
                    check_in_time: None,
                    marked_by: Some(f.instructor_id),
                    is_excused: None,
                    remarks: None,
                    late_minutes: 0,
                })
                .await
                .unwrap();
        }
        if complete {
            f.storage.refresh_session_totals(session.id).await.unwrap();
            f.storage
                .update_session_status(session.id, SessionStatus::Completed)
                .await
                .unwrap();
        }
        f.storage.get_session_by_id(session.id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_roster_counts_current_month_only() {
        use AttendanceStatus::*;
        let f = fixture().await;
        held(&f, "2025-02-27", [Present, Present], true).await;
        held(&f, "2025-03-03", [Present, Absent], true).await;
        held(&f, "2025-03-04", [Late, HalfDay], true).await;
        held(&f, "2025-03-05", [Present, Present], true).await;
        // 未结课的课次只影响最近出勤日期
        held(&f, "2025-03-10", [Absent, Present], false).await;

        let today = "2025-03-10".parse().unwrap();
        let roster = build_class_roster(&f.storage, f.class.clone(), &ClassRosterQuery::default(), today)
            .await
            .unwrap();

        assert_eq!(roster.month_start.to_string(), "2025-03-01");
        assert_eq!(roster.total_students, 2);
        let first = &roster.items[0];
        assert_eq!(first.admission_number, "TVET20250051");
        assert_eq!(first.stats.total_sessions, 3);
        assert_eq!((first.stats.present, first.stats.late), (2, 1));
        assert_eq!(first.stats.attendance_rate, 66.67);
        assert_eq!(first.punctuality_rate, 50.0);
        assert_eq!(first.last_attendance_date.map(|d| d.to_string()).as_deref(), Some("2025-03-05"));

        let second = &roster.items[1];
        assert_eq!((second.stats.present, second.stats.half_day), (1, 1));
        assert_eq!(second.stats.attendance_rate, 50.0);
        assert_eq!(second.punctuality_rate, 100.0);
        assert_eq!(second.last_attendance_date.map(|d| d.to_string()).as_deref(), Some("2025-03-10"));

        assert!((roster.average_attendance - 58.33).abs() < 0.02);
        assert_eq!(roster.average_punctuality, 75.0);
        assert_eq!(roster.recent_sessions.len(), 4);
        assert_eq!(roster.recent_sessions[0].session_date.to_string(), "2025-03-05");
        assert_eq!(roster.trend.len(), 5);
        assert_eq!(roster.trend[0].rate, None);
        assert_eq!(roster.trend[4].date.to_string(), "2025-03-06");
    }

    #[tokio::test]
    async fn test_roster_today_and_trend() {
        use AttendanceStatus::*;
        let f = fixture().await;
        held(&f, "2025-03-10", [Present, Late], true).await;
        held(&f, "2025-03-07", [Absent, Present], true).await;

        let today = "2025-03-10".parse().unwrap();
        let roster = build_class_roster(&f.storage, f.class.clone(), &ClassRosterQuery::default(), today)
            .await
            .unwrap();

        assert_eq!((roster.present_today, roster.late_today, roster.absent_today), (1, 1, 0));
        assert_eq!(roster.trend[0].rate, Some(50.0));
        assert_eq!(roster.trend[1].rate, None);
        assert_eq!(roster.trend[3].rate, Some(50.0));
    }

    #[tokio::test]
    async fn test_roster_filters_and_pages() {
        let f = fixture().await;
        let today = "2025-03-10".parse().unwrap();

        let by_number = ClassRosterQuery {
            q: Some("0052".to_string()),
            ..Default::default()
        };
        let roster = build_class_roster(&f.storage, f.class.clone(), &by_number, today)
            .await
            .unwrap();
        assert_eq!(roster.total_students, 1);
        assert_eq!(roster.items[0].student_id, f.students[1].id);

        let mut paged = ClassRosterQuery::default();
        paged.pagination.size = 1;
        paged.pagination.page = 2;
        let roster = build_class_roster(&f.storage, f.class.clone(), &paged, today)
            .await
            .unwrap();
        assert_eq!(roster.items.len(), 1);
        assert_eq!(roster.items[0].admission_number, "TVET20250052");
        assert_eq!(roster.pagination.total, 2);
        assert_eq!(roster.pagination.total_pages, 2);
        assert_eq!(
            roster.gender_counts,
            GenderCounts {
                male: 0,
                female: 2,
                other: 0
            }
        );

        let male = ClassRosterQuery {
            gender: Some(Gender::Male),
            ..Default::default()
        };
        let roster = build_class_roster(&f.storage, f.class.clone(), &male, today)
            .await
            .unwrap();
        assert_eq!(roster.total_students, 0);
        assert!(roster.items.is_empty());
    }
}
