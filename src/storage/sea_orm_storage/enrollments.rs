use super::SeaOrmStorage;
use crate::entity::academic_records::{
    ActiveModel as AcademicRecordActiveModel, Column as AcademicRecordColumn,
    Entity as AcademicRecords,
};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::{AttendanceError, Result};
use crate::models::students::{
    entities::{AcademicRecord, Enrollment},
    requests::{CreateAcademicRecordRequest, NewEnrollment},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_enrollment_impl(&self, enrollment: NewEnrollment) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(enrollment.student_id),
            course_id: Set(enrollment.course_id),
            class_id: Set(enrollment.class_id),
            enrollment_date: Set(enrollment.enrollment_date.to_string()),
            enrollment_type: Set(enrollment.enrollment_type.to_string()),
            is_active: Set(true),
            completion_date: Set(None),
            remarks: Set(enrollment.remarks),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("创建选课失败: {e}")))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询选课失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn get_enrollment_impl(
        &self,
        student_id: i64,
        class_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ClassId.eq(class_id))
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询选课失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 停用时写入完成日期，重新启用时清空
    pub async fn set_enrollment_active_impl(
        &self,
        id: i64,
        is_active: bool,
    ) -> Result<Option<Enrollment>> {
        if self.get_enrollment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let completion_date = (!is_active).then(|| crate::utils::clock::today().to_string());
        let model = ActiveModel {
            id: Set(id),
            is_active: Set(is_active),
            completion_date: Set(completion_date),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新选课失败: {e}")))?;

        self.get_enrollment_by_id_impl(id).await
    }

    pub async fn list_enrollments_by_student_impl(
        &self,
        student_id: i64,
        active_only: bool,
    ) -> Result<Vec<Enrollment>> {
        let mut select = Enrollments::find().filter(Column::StudentId.eq(student_id));
        if active_only {
            select = select.filter(Column::IsActive.eq(true));
        }

        let enrollments = select
            .order_by_desc(Column::EnrollmentDate)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询选课列表失败: {e}")))?;

        Ok(enrollments.into_iter().map(|m| m.into_enrollment()).collect())
    }

    pub async fn list_enrollments_by_class_impl(
        &self,
        class_id: i64,
        active_only: bool,
    ) -> Result<Vec<Enrollment>> {
        let mut select = Enrollments::find().filter(Column::ClassId.eq(class_id));
        if active_only {
            select = select.filter(Column::IsActive.eq(true));
        }

        let enrollments = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询选课列表失败: {e}")))?;

        Ok(enrollments.into_iter().map(|m| m.into_enrollment()).collect())
    }

    pub async fn count_active_enrollments_impl(&self, class_id: i64) -> Result<u64> {
        Enrollments::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("统计选课人数失败: {e}")))
    }

    pub async fn create_academic_record_impl(
        &self,
        student_id: i64,
        req: CreateAcademicRecordRequest,
    ) -> Result<AcademicRecord> {
        let now = chrono::Utc::now().timestamp();

        let model = AcademicRecordActiveModel {
            student_id: Set(student_id),
            module_code: Set(req.module_code.trim().to_string()),
            module_name: Set(req.module_name.trim().to_string()),
            grade: Set(req.grade.to_string()),
            score: Set(req.score),
            semester: Set(req.semester),
            academic_year: Set(req.academic_year),
            remarks: Set(req.remarks),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("创建成绩记录失败: {e}")))?;

        Ok(result.into_academic_record())
    }

    pub async fn list_academic_records_impl(&self, student_id: i64) -> Result<Vec<AcademicRecord>> {
        let records = AcademicRecords::find()
            .filter(AcademicRecordColumn::StudentId.eq(student_id))
            .order_by_desc(AcademicRecordColumn::AcademicYear)
            .order_by_asc(AcademicRecordColumn::Semester)
            .order_by_asc(AcademicRecordColumn::ModuleCode)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询成绩记录失败: {e}")))?;

        Ok(records
            .into_iter()
            .map(|m| m.into_academic_record())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{seed_class, seed_course, seed_student, storage};
    use crate::models::students::entities::{EnrollmentType, Grade};
    use crate::models::students::requests::{CreateAcademicRecordRequest, NewEnrollment};

    #[tokio::test]
    async fn test_enrollment_unique_and_deactivate() {
        let storage = storage().await;
        let course = seed_course(&storage, "BLD").await;
        let class = seed_class(&storage, course.id, "BLD-1", None).await;
        let student = seed_student(&storage, "otieno", "TVET20250001").await;

        let new = || NewEnrollment {
            student_id: student.id,
            course_id: course.id,
            class_id: class.id,
            enrollment_date: "2025-09-01".parse().unwrap(),
            enrollment_type: EnrollmentType::Regular,
            remarks: String::new(),
        };

        let enrollment = storage.create_enrollment_impl(new()).await.unwrap();
        assert!(
            storage
                .create_enrollment_impl(new())
                .await
                .unwrap_err()
                .is_unique_violation()
        );
        assert_eq!(storage.count_active_enrollments_impl(class.id).await.unwrap(), 1);

        let inactive = storage
            .set_enrollment_active_impl(enrollment.id, false)
            .await
            .unwrap()
            .unwrap();
        assert!(!inactive.is_active);
        assert!(inactive.completion_date.is_some());
        assert_eq!(storage.count_active_enrollments_impl(class.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_academic_records_ordering() {
        let storage = storage().await;
        let student = seed_student(&storage, "njeri", "TVET20250002").await;
        for (code, year, semester) in [
            ("EE102", "2024/2025", 2),
            ("EE101", "2025/2026", 1),
            ("EE100", "2024/2025", 1),
        ] {
            storage
                .create_academic_record_impl(
                    student.id,
                    CreateAcademicRecordRequest {
                        module_code: code.to_string(),
                        module_name: "Module".to_string(),
                        grade: Grade::B,
                        score: 70.0,
                        semester,
                        academic_year: year.to_string(),
                        remarks: String::new(),
                    },
                )
                .await
                .unwrap();
        }

        let codes: Vec<String> = storage
            .list_academic_records_impl(student.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.module_code)
            .collect();
        assert_eq!(codes, vec!["EE101", "EE100", "EE102"]);
    }
}
