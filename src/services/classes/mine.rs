use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use chrono::NaiveDate;

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::{AttendanceSession, SessionStatus},
        requests::{RecordFilter, SessionListQuery},
    },
    classes::{requests::ClassListQuery, responses::InstructorClassItem},
    students::responses::{StudentClassItem, StudentClassesResponse},
};
use crate::services::attendance::rules::{percentage, round2};
use crate::services::students::get::enrollment_details;
use crate::services::{Reply, current_user, internal_error, not_found};
use crate::storage::Storage;
use crate::utils::clock::today;

/// 今天及以后的第一节课；`scheduled_only` 时跳过已开始或已结束的课次
async fn next_session(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    today: NaiveDate,
    scheduled_only: bool,
) -> Result<Option<AttendanceSession>, HttpResponse> {
    let sessions = storage
        .list_sessions(
            SessionListQuery {
                class_id: Some(class_id),
                status: scheduled_only.then_some(SessionStatus::Scheduled),
                date_from: Some(today),
                ascending: true,
                ..Default::default()
            },
            Some(1),
        )
        .await
        .map_err(|e| internal_error("Failed to load sessions", e))?;
    Ok(sessions.into_iter().next())
}

async fn build_instructor_classes(
    storage: &Arc<dyn Storage>,
    instructor_id: i64,
    today: NaiveDate,
) -> Result<Vec<InstructorClassItem>, HttpResponse> {
    let classes = storage
        .list_classes(ClassListQuery {
            instructor_id: Some(instructor_id),
            is_active: Some(true),
            ..Default::default()
        })
        .await
        .map_err(|e| internal_error("Failed to retrieve classes", e))?;

    let mut items = Vec::with_capacity(classes.len());
    for class in classes {
        let student_count = storage
            .count_active_enrollments(class.id)
            .await
            .map_err(|e| internal_error("Failed to count enrollments", e))?;
        let by_class = SessionListQuery {
            class_id: Some(class.id),
            ..Default::default()
        };
        let total_sessions = storage
            .count_sessions(by_class.clone())
            .await
            .map_err(|e| internal_error("Failed to count sessions", e))?;
        let today_sessions = storage
            .count_sessions(SessionListQuery {
                date_from: Some(today),
                date_to: Some(today),
                ..by_class
            })
            .await
            .map_err(|e| internal_error("Failed to count sessions", e))?;
        let counts = storage
            .count_records_by_status(RecordFilter {
                class_id: Some(class.id),
                ..Default::default()
            })
            .await
            .map_err(|e| internal_error("Failed to count attendance", e))?;

        items.push(InstructorClassItem {
            student_count,
            today_session: today_sessions > 0,
            total_sessions,
            next_session: next_session(storage, class.id, today, false).await?,
            attendance_rate: percentage(counts.present, counts.total),
            class,
        });
    }
    Ok(items)
}

/// 当前教师任教的启用班级、课次概况与出勤率
pub async fn instructor_classes(service: &ClassService, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let items = build_instructor_classes(&storage, user.id, today()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(items, "Classes retrieved successfully")))
}

async fn build_student_classes(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    today: NaiveDate,
) -> Result<StudentClassesResponse, HttpResponse> {
    let details = enrollment_details(storage, student_id, true).await?;

    let mut items = Vec::with_capacity(details.len());
    for detail in details {
        let class_id = detail.enrollment.class_id;
        let counts = storage
            .count_records_by_status(RecordFilter {
                class_id: Some(class_id),
                student_id: Some(student_id),
                ..Default::default()
            })
            .await
            .map_err(|e| internal_error("Failed to count attendance", e))?;

        items.push(StudentClassItem {
            present_count: counts.present,
            late_count: counts.late,
            absent_count: counts.absent,
            attendance_percentage: percentage(counts.present + counts.late, counts.total),
            next_session: next_session(storage, class_id, today, true).await?,
            detail,
        });
    }

    let average_attendance = if items.is_empty() {
        0.0
    } else {
        let total: f64 = items.iter().map(|i| i.attendance_percentage).sum();
        round2(total / items.len() as f64)
    };

    let class_ids: Vec<i64> = items.iter().map(|i| i.detail.enrollment.class_id).collect();
    let upcoming_sessions = if class_ids.is_empty() {
        0
    } else {
        storage
            .count_sessions(SessionListQuery {
                class_ids: Some(class_ids),
                status: Some(SessionStatus::Scheduled),
                date_from: Some(today),
                ..Default::default()
            })
            .await
            .map_err(|e| internal_error("Failed to count sessions", e))?
    };

    Ok(StudentClassesResponse {
        items,
        average_attendance,
        upcoming_sessions,
    })
}

/// 当前学生的有效选课及各班出勤
pub async fn student_classes(service: &ClassService, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let student = storage
        .get_student_by_user_id(user.id)
        .await
        .map_err(|e| internal_error("Failed to load student profile", e))?
        .ok_or_else(|| not_found(ErrorCode::StudentProfileMissing, "Student profile not found"))?;

    let response = build_student_classes(&storage, student.id, today()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Classes retrieved successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::{
        entities::{AttendanceMethod, AttendanceStatus},
        requests::{NewSession, RecordWrite},
    };
    use crate::models::students::{entities::EnrollmentType, requests::NewEnrollment};
    use crate::models::users::entities::{AccountStatus, UserType};
    use crate::storage::sea_orm_storage::tests::{
        new_user, seed_class, seed_course, seed_student, storage,
    };

    struct Fixture {
        storage: Arc<dyn Storage>,
        instructor_id: i64,
        class_id: i64,
        student_id: i64,
    }

    async fn fixture() -> Fixture {
        let storage = storage().await;
        let instructor = storage
            .create_user_impl(new_user("pmutiso", UserType::Instructor, AccountStatus::Approved))
            .await
            .unwrap();
        let course = seed_course(&storage, "HORT").await;
        let class = seed_class(&storage, course.id, "HORT-1", Some(instructor.id)).await;
        let student = seed_student(&storage, "wekesa", "TVET20250061").await;
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

        Fixture {
            storage: Arc::new(storage),
            instructor_id: instructor.id,
            class_id: class.id,
            student_id: student.id,
        }
    }

    async fn session(
        f: &Fixture,
        date: &str,
        start: &str,
        status: SessionStatus,
        attendance: Option<AttendanceStatus>,
    ) -> i64 {
        let session = f
            .storage
            .create_session(NewSession {
                class_id: f.class_id,
                instructor_id: f.instructor_id,
                session_date: date.parse().unwrap(),
                start_time: start.parse().unwrap(),
                end_time: "17:00:00".parse().unwrap(),
                topic_covered: "Propagation".to_string(),
                venue: "Greenhouse".to_string(),
                attendance_method: AttendanceMethod::Manual,
                qr_code_data: None,
                qr_code_expiry: None,
            })
            .await
            .unwrap();
        if let Some(status) = attendance {
            f.storage
                .save_record(RecordWrite {
                    session_id: session.id,
                    student_id: f.student_id,
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
        if status != SessionStatus::Scheduled {
            f.storage
                .update_session_status(session.id, status)
                .await
                .unwrap();
        }
        session.id
    }

    #[tokio::test]
    async fn test_instructor_classes_overview() {
        let f = fixture().await;
        session(
            &f,
            "2025-03-07",
            "08:00:00",
            SessionStatus::Completed,
            Some(AttendanceStatus::Present),
        )
        .await;
        session(
            &f,
            "2025-03-08",
            "08:00:00",
            SessionStatus::Completed,
            Some(AttendanceStatus::Absent),
        )
        .await;
        let upcoming = session(
            &f,
            "2025-03-10",
            "14:00:00",
            SessionStatus::Scheduled,
            None,
        )
        .await;
        session(
            &f,
            "2025-03-12",
            "08:00:00",
            SessionStatus::Scheduled,
            None,
        )
        .await;

        let today = "2025-03-10".parse().unwrap();
        let items = build_instructor_classes(&f.storage, f.instructor_id, today)
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.student_count, 1);
        assert!(item.today_session);
        assert_eq!(item.total_sessions, 4);
        assert_eq!(item.next_session.as_ref().map(|s| s.id), Some(upcoming));
        assert_eq!(item.attendance_rate, 50.0);
    }

    #[tokio::test]
    async fn test_instructor_without_sessions() {
        let f = fixture().await;
        let items = build_instructor_classes(&f.storage, f.instructor_id, "2025-03-10".parse().unwrap())
            .await
            .unwrap();

        let item = &items[0];
        assert!(!item.today_session);
        assert_eq!(item.total_sessions, 0);
        assert!(item.next_session.is_none());
        assert_eq!(item.attendance_rate, 0.0);
    }

    #[tokio::test]
    async fn test_student_classes_counts_and_upcoming() {
        let f = fixture().await;
        session(
            &f,
            "2025-03-05",
            "08:00:00",
            SessionStatus::Completed,
            Some(AttendanceStatus::Present),
        )
        .await;
        session(
            &f,
            "2025-03-06",
            "08:00:00",
            SessionStatus::Completed,
            Some(AttendanceStatus::Late),
        )
        .await;
        session(
            &f,
            "2025-03-07",
            "08:00:00",
            SessionStatus::Completed,
            Some(AttendanceStatus::Absent),
        )
        .await;
        // 今天已开始的课次不算作下一节
        session(
            &f,
            "2025-03-10",
            "08:00:00",
            SessionStatus::Ongoing,
            None,
        )
        .await;
        let next = session(
            &f,
            "2025-03-11",
            "08:00:00",
            SessionStatus::Scheduled,
            None,
        )
        .await;
        session(
            &f,
            "2025-03-12",
            "08:00:00",
            SessionStatus::Scheduled,
            None,
        )
        .await;

        let today = "2025-03-10".parse().unwrap();
        let response = build_student_classes(&f.storage, f.student_id, today)
            .await
            .unwrap();

        assert_eq!(response.items.len(), 1);
        let item = &response.items[0];
        assert_eq!((item.present_count, item.late_count, item.absent_count), (1, 1, 1));
        assert_eq!(item.attendance_percentage, 66.67);
        assert_eq!(item.next_session.as_ref().map(|s| s.id), Some(next));
        assert_eq!(response.average_attendance, 66.67);
        assert_eq!(response.upcoming_sessions, 2);
    }

    #[tokio::test]
    async fn test_student_without_enrollments() {
        let f = fixture().await;
        let enrollment = f
            .storage
            .get_enrollment(f.student_id, f.class_id)
            .await
            .unwrap()
            .unwrap();
        f.storage
            .set_enrollment_active(enrollment.id, false)
            .await
            .unwrap();

        let response = build_student_classes(&f.storage, f.student_id, "2025-03-10".parse().unwrap())
            .await
            .unwrap();
        assert!(response.items.is_empty());
        assert_eq!(response.average_attendance, 0.0);
        assert_eq!(response.upcoming_sessions, 0);
    }
}
