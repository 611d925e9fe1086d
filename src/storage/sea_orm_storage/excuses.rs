use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use super::attendance::mark_records_excused;
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::excuse_applications::{
    ActiveModel, Column, Entity as ExcuseApplications, Model as ExcuseModel,
};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{AttendanceError, Result};
use crate::models::{
    PaginationInfo,
    excuses::{
        entities::{ExcuseApplication, ExcuseStatus},
        requests::{ExcuseListQuery, NewExcuse},
        responses::{ExcuseDetail, ExcuseListResponse, ReviewExcuseResponse},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_excuse_impl(&self, excuse: NewExcuse) -> Result<ExcuseApplication> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(excuse.student_id),
            class_id: Set(excuse.class_id),
            attendance_session_id: Set(excuse.attendance_session_id),
            reason: Set(excuse.reason.trim().to_string()),
            start_date: Set(excuse.start_date.to_string()),
            end_date: Set(excuse.end_date.to_string()),
            status: Set(ExcuseStatus::Pending.to_string()),
            reviewed_by: Set(None),
            review_notes: Set(String::new()),
            reviewed_at: Set(None),
            applied_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("创建请假申请失败: {e}")))?;

        Ok(result.into_excuse())
    }

    pub async fn get_excuse_by_id_impl(&self, id: i64) -> Result<Option<ExcuseApplication>> {
        let result = ExcuseApplications::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询请假申请失败: {e}")))?;

        Ok(result.map(|m| m.into_excuse()))
    }

    pub async fn get_excuse_detail_impl(&self, id: i64) -> Result<Option<ExcuseDetail>> {
        let result = ExcuseApplications::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询请假申请失败: {e}")))?;

        match result {
            Some(model) => Ok(self.build_excuse_details(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn build_excuse_details(&self, models: Vec<ExcuseModel>) -> Result<Vec<ExcuseDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: HashSet<i64> = models.iter().map(|m| m.student_id).collect();
        let students: HashMap<i64, (String, i64)> = Students::find()
            .filter(StudentColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, (s.admission_number, s.user_id)))
            .collect();

        let class_ids: HashSet<i64> = models.iter().map(|m| m.class_id).collect();
        let classes: HashMap<i64, String> = Classes::find()
            .filter(ClassColumn::Id.is_in(class_ids))
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询班级失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let user_ids: Vec<i64> = students
            .values()
            .map(|(_, user_id)| *user_id)
            .chain(models.iter().filter_map(|m| m.reviewed_by))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let names: HashMap<i64, String> = self
            .list_users_by_ids_impl(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.full_name()))
            .collect();

        Ok(models
            .into_iter()
            .map(|model| {
                let (admission_number, student_name) = students
                    .get(&model.student_id)
                    .map(|(number, user_id)| {
                        (number.clone(), names.get(user_id).cloned().unwrap_or_default())
                    })
                    .unwrap_or_default();
                let class_name = classes.get(&model.class_id).cloned().unwrap_or_default();
                let reviewer_name = model.reviewed_by.and_then(|id| names.get(&id).cloned());
                ExcuseDetail {
                    application: model.into_excuse(),
                    admission_number,
                    student_name,
                    class_name,
                    reviewer_name,
                }
            })
            .collect())
    }

    pub async fn list_excuses_with_pagination_impl(
        &self,
        query: ExcuseListQuery,
    ) -> Result<ExcuseListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = ExcuseApplications::find();
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(ref class_ids) = query.class_ids {
            select = select.filter(Column::ClassId.is_in(class_ids.clone()));
        }

        let paginator = select
            .order_by_desc(Column::AppliedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询请假总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询请假页数失败: {e}")))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询请假列表失败: {e}")))?;

        Ok(ExcuseListResponse {
            items: self.build_excuse_details(models).await?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 写入审核结果，批准时在同一事务内标记考勤记录
    ///
    /// 只更新仍处于待审核状态的申请；并发审核中落后的一方得到 `None`。
    pub async fn review_excuse_impl(
        &self,
        id: i64,
        status: ExcuseStatus,
        reviewer_id: i64,
        review_notes: String,
    ) -> Result<Option<ReviewExcuseResponse>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let claimed = ExcuseApplications::update_many()
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::ReviewedBy, Expr::value(reviewer_id))
            .col_expr(Column::ReviewNotes, Expr::value(review_notes))
            .col_expr(Column::ReviewedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(ExcuseStatus::Pending.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("审核请假申请失败: {e}")))?;
        if claimed.rows_affected == 0 {
            return Ok(None);
        }

        let Some(application) = ExcuseApplications::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询请假申请失败: {e}")))?
            .map(|m| m.into_excuse())
        else {
            return Ok(None);
        };

        let records_excused = if status == ExcuseStatus::Approved {
            mark_records_excused(
                &txn,
                application.student_id,
                application.class_id,
                application.start_date,
                application.end_date,
                &application.reason,
            )
            .await?
        } else {
            0
        };

        txn.commit()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("提交审核失败: {e}")))?;

        Ok(Some(ReviewExcuseResponse {
            application,
            records_excused,
        }))
    }

    /// 撤回待审核申请
    pub async fn cancel_excuse_impl(&self, id: i64) -> Result<Option<ExcuseApplication>> {
        let result = ExcuseApplications::update_many()
            .col_expr(
                Column::Status,
                Expr::value(ExcuseStatus::Cancelled.to_string()),
            )
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(ExcuseStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新请假状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_excuse_by_id_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::SeaOrmStorage;
    use super::super::tests::{new_user, seed_class, seed_course, seed_student, storage};
    use crate::models::attendance::entities::{AttendanceMethod, AttendanceStatus};
    use crate::models::attendance::requests::{NewSession, RecordWrite};
    use crate::models::excuses::entities::{ExcuseApplication, ExcuseStatus};
    use crate::models::excuses::requests::{ExcuseListQuery, NewExcuse};
    use crate::models::users::entities::{AccountStatus, UserType};

    struct Seeded {
        storage: SeaOrmStorage,
        reviewer_id: i64,
        student_id: i64,
        session_id: i64,
        excuse: ExcuseApplication,
    }

    /// 一名学生在 2025-05-05 缺勤，并为当天提交了请假申请
    async fn seeded() -> Seeded {
        let storage = storage().await;
        let reviewer = storage
            .create_user_impl(new_user("wanjiru", UserType::Instructor, AccountStatus::Approved))
            .await
            .unwrap();
        let course = seed_course(&storage, "PLMB").await;
        let class = seed_class(&storage, course.id, "PLMB-1", Some(reviewer.id)).await;
        let student = seed_student(&storage, "otieno", "TVET20250021").await;

        let session = storage
            .create_session_impl(NewSession {
                class_id: class.id,
                instructor_id: reviewer.id,
                session_date: "2025-05-05".parse().unwrap(),
                start_time: "08:00:00".parse().unwrap(),
                end_time: "10:00:00".parse().unwrap(),
                topic_covered: "Pipe fitting".to_string(),
                venue: "Workshop".to_string(),
                attendance_method: AttendanceMethod::Manual,
                qr_code_data: None,
                qr_code_expiry: None,
            })
            .await
            .unwrap();
        storage
            .save_record_impl(RecordWrite {
                session_id: session.id,
                student_id: student.id,
                status: AttendanceStatus::Absent,
                check_in_time: None,
                marked_by: Some(reviewer.id),
                is_excused: None,
                remarks: None,
                late_minutes: 0,
            })
            .await
            .unwrap();

        let excuse = storage
            .create_excuse_impl(NewExcuse {
                student_id: student.id,
                class_id: class.id,
                attendance_session_id: Some(session.id),
                reason: "Funeral".to_string(),
                start_date: "2025-05-05".parse().unwrap(),
                end_date: "2025-05-05".parse().unwrap(),
            })
            .await
            .unwrap();

        Seeded {
            storage,
            reviewer_id: reviewer.id,
            student_id: student.id,
            session_id: session.id,
            excuse,
        }
    }

    #[tokio::test]
    async fn test_excuse_review_and_listing() {
        let storage = storage().await;
        let reviewer = storage
            .create_user_impl(new_user("hodmech", UserType::Hod, AccountStatus::Approved))
            .await
            .unwrap();
        let course = seed_course(&storage, "MECH").await;
        let class = seed_class(&storage, course.id, "MECH-2", None).await;
        let other = seed_class(&storage, course.id, "MECH-3", None).await;
        let student = seed_student(&storage, "kiprop", "TVET20250011").await;

        let excuse = storage
            .create_excuse_impl(NewExcuse {
                student_id: student.id,
                class_id: class.id,
                attendance_session_id: None,
                reason: "  Sick leave ".to_string(),
                start_date: "2025-04-01".parse().unwrap(),
                end_date: "2025-04-02".parse().unwrap(),
            })
            .await
            .unwrap();
        assert!(excuse.is_pending());
        assert_eq!(excuse.reason, "Sick leave");

        let reviewed = storage
            .review_excuse_impl(
                excuse.id,
                ExcuseStatus::Approved,
                reviewer.id,
                "Clinic note seen".to_string(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reviewed.application.status, ExcuseStatus::Approved);
        assert!(reviewed.application.reviewed_at.is_some());
        assert_eq!(reviewed.records_excused, 0);

        let detail = storage
            .get_excuse_detail_impl(excuse.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.admission_number, "TVET20250011");
        assert_eq!(detail.class_name, "MECH-2 Class");
        assert_eq!(detail.reviewer_name.as_deref(), Some("hodmech Test"));

        let scoped = storage
            .list_excuses_with_pagination_impl(ExcuseListQuery {
                class_ids: Some(vec![other.id]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(scoped.pagination.total, 0);
    }

    #[tokio::test]
    async fn test_approval_excuses_records_in_range() {
        let s = seeded().await;
        let reviewed = s
            .storage
            .review_excuse_impl(s.excuse.id, ExcuseStatus::Approved, s.reviewer_id, String::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reviewed.records_excused, 1);

        let record = s
            .storage
            .get_record_impl(s.session_id, s.student_id)
            .await
            .unwrap()
            .unwrap();
        assert!(record.is_excused);
        assert_eq!(record.excuse_reason, "Funeral");
    }

    #[tokio::test]
    async fn test_second_review_is_refused() {
        let s = seeded().await;
        s.storage
            .review_excuse_impl(s.excuse.id, ExcuseStatus::Rejected, s.reviewer_id, String::new())
            .await
            .unwrap()
            .unwrap();

        let late = s
            .storage
            .review_excuse_impl(s.excuse.id, ExcuseStatus::Approved, s.reviewer_id, String::new())
            .await
            .unwrap();
        assert!(late.is_none());

        let stored = s.storage.get_excuse_by_id_impl(s.excuse.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ExcuseStatus::Rejected);
        let record = s
            .storage
            .get_record_impl(s.session_id, s.student_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!record.is_excused);
    }

    #[tokio::test]
    async fn test_concurrent_reviews_apply_once() {
        let s = seeded().await;
        let (a, b) = tokio::join!(
            s.storage.review_excuse_impl(
                s.excuse.id,
                ExcuseStatus::Approved,
                s.reviewer_id,
                String::new()
            ),
            s.storage.review_excuse_impl(
                s.excuse.id,
                ExcuseStatus::Rejected,
                s.reviewer_id,
                String::new()
            ),
        );
        let applied = [a.unwrap(), b.unwrap()]
            .into_iter()
            .flatten()
            .count();
        assert_eq!(applied, 1);
    }

    #[tokio::test]
    async fn test_cancel_only_pending() {
        let s = seeded().await;
        let cancelled = s.storage.cancel_excuse_impl(s.excuse.id).await.unwrap().unwrap();
        assert_eq!(cancelled.status, ExcuseStatus::Cancelled);

        assert!(s.storage.cancel_excuse_impl(s.excuse.id).await.unwrap().is_none());
        assert!(
            s.storage
                .review_excuse_impl(s.excuse.id, ExcuseStatus::Approved, s.reviewer_id, String::new())
                .await
                .unwrap()
                .is_none()
        );
    }
}
