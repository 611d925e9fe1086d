//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod classes;
mod courses;
mod enrollments;
mod excuses;
mod reports;
mod students;
mod users;

use crate::config::AppConfig;
use crate::errors::{AttendanceError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 使用已有连接并执行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        // 外键约束需要显式开启，删除用户时级联删除学生档案
        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AttendanceError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-32000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AttendanceError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| AttendanceError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 推断数据库类型
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite3") || url.ends_with(".sqlite")
        {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
        {
            Ok(url.to_string())
        } else {
            Err(AttendanceError::database_config(format!(
                "无法识别的数据库地址: {url}. 支持 sqlite://、postgres://、mysql:// 或 .db/.sqlite3 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    PaginationInfo,
    attendance::{
        entities::{
            AttendanceRecord, AttendanceSession, AttendanceSummary, PeriodType, SessionStatus,
        },
        requests::{NewSession, RecordFilter, RecordWrite, SessionListQuery, SummaryWrite},
        responses::{RecordDetail, SessionListResponse, StatusCounts},
    },
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    excuses::{
        entities::{ExcuseApplication, ExcuseStatus},
        requests::{ExcuseListQuery, NewExcuse},
        responses::{ExcuseDetail, ExcuseListResponse, ReviewExcuseResponse},
    },
    reports::{
        entities::{DashboardWidget, GeneratedReport, ReportSchedule, ReportTemplate},
        requests::{
            CreateScheduleRequest, CreateTemplateRequest, CreateWidgetRequest, SaveReportRequest,
            SavedReportListQuery, UpdateScheduleRequest, UpdateTemplateRequest,
            UpdateWidgetRequest,
        },
        responses::{SavedReportListResponse, StudentStatsData},
    },
    students::{
        entities::{AcademicRecord, Enrollment, Student, StudentStatus},
        requests::{
            CreateAcademicRecordRequest, NewEnrollment, NewStudent, StudentListQuery,
            UpdateStudentRequest,
        },
        responses::StudentListResponse,
    },
    users::{
        entities::{AccountStatusChange, User, UserType},
        requests::{NewUser, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户管理方法
    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn list_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.list_users_by_ids_impl(ids).await
    }

    async fn list_instructors(&self, active_only: bool) -> Result<Vec<User>> {
        self.list_instructors_impl(active_only).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn set_account_status(
        &self,
        id: i64,
        change: AccountStatusChange,
    ) -> Result<Option<User>> {
        self.set_account_status_impl(id, change).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn count_users_by_type(
        &self,
        user_type: UserType,
        is_active: Option<bool>,
    ) -> Result<u64> {
        self.count_users_by_type_impl(user_type, is_active).await
    }

    // 课程管理方法
    async fn create_course(&self, req: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(req).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn list_courses_by_ids(&self, ids: &[i64]) -> Result<Vec<Course>> {
        self.list_courses_by_ids_impl(ids).await
    }

    async fn list_active_courses(&self) -> Result<Vec<Course>> {
        self.list_active_courses_impl().await
    }

    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    async fn count_classes_by_course(&self, course_id: i64) -> Result<(u64, u64)> {
        self.count_classes_by_course_impl(course_id).await
    }

    // 班级管理方法
    async fn create_class(&self, req: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(req).await
    }

    async fn get_class_by_id(&self, id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(id).await
    }

    async fn get_class_by_code(&self, class_code: &str) -> Result<Option<Class>> {
        self.get_class_by_code_impl(class_code).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn list_classes(&self, query: ClassListQuery) -> Result<Vec<Class>> {
        self.list_classes_impl(query).await
    }

    async fn list_classes_by_ids(&self, ids: &[i64]) -> Result<Vec<Class>> {
        self.list_classes_by_ids_impl(ids).await
    }

    async fn update_class(&self, id: i64, update: UpdateClassRequest) -> Result<Option<Class>> {
        self.update_class_impl(id, update).await
    }

    async fn set_class_instructor(
        &self,
        id: i64,
        instructor_id: Option<i64>,
    ) -> Result<Option<Class>> {
        self.set_class_instructor_impl(id, instructor_id).await
    }

    async fn delete_class(&self, id: i64) -> Result<bool> {
        self.delete_class_impl(id).await
    }

    async fn count_classes(&self, is_active: Option<bool>) -> Result<u64> {
        self.count_classes_impl(is_active).await
    }

    // 学生档案方法
    async fn create_student(&self, student: NewStudent) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn get_student_by_admission_number(&self, number: &str) -> Result<Option<Student>> {
        self.get_student_by_admission_number_impl(number).await
    }

    async fn max_admission_sequence(&self, year_prefix: &str) -> Result<Option<u32>> {
        self.max_admission_sequence_impl(year_prefix).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn list_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>> {
        self.list_students_by_ids_impl(ids).await
    }

    async fn list_students(&self, status: Option<StudentStatus>) -> Result<Vec<Student>> {
        self.list_students_impl(status).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn set_student_status(&self, id: i64, status: StudentStatus) -> Result<Option<Student>> {
        self.set_student_status_impl(id, status).await
    }

    async fn update_last_attendance_date(&self, id: i64, date: chrono::NaiveDate) -> Result<bool> {
        self.update_last_attendance_date_impl(id, date).await
    }

    async fn student_stats(&self) -> Result<StudentStatsData> {
        self.student_stats_impl().await
    }

    async fn count_active_students_by_course(&self) -> Result<HashMap<i64, u64>> {
        self.count_active_students_by_course_impl().await
    }

    // 选课方法
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment> {
        self.create_enrollment_impl(enrollment).await
    }

    async fn get_enrollment(&self, student_id: i64, class_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(student_id, class_id).await
    }

    async fn set_enrollment_active(&self, id: i64, is_active: bool) -> Result<Option<Enrollment>> {
        self.set_enrollment_active_impl(id, is_active).await
    }

    async fn list_enrollments_by_student(
        &self,
        student_id: i64,
        active_only: bool,
    ) -> Result<Vec<Enrollment>> {
        self.list_enrollments_by_student_impl(student_id, active_only).await
    }

    async fn list_enrollments_by_class(
        &self,
        class_id: i64,
        active_only: bool,
    ) -> Result<Vec<Enrollment>> {
        self.list_enrollments_by_class_impl(class_id, active_only).await
    }

    async fn count_active_enrollments(&self, class_id: i64) -> Result<u64> {
        self.count_active_enrollments_impl(class_id).await
    }

    // 成绩方法
    async fn create_academic_record(
        &self,
        student_id: i64,
        req: CreateAcademicRecordRequest,
    ) -> Result<AcademicRecord> {
        self.create_academic_record_impl(student_id, req).await
    }

    async fn list_academic_records(&self, student_id: i64) -> Result<Vec<AcademicRecord>> {
        self.list_academic_records_impl(student_id).await
    }

    // 考勤课次方法
    async fn create_session(&self, session: NewSession) -> Result<AttendanceSession> {
        self.create_session_impl(session).await
    }

    async fn get_session_by_id(&self, id: i64) -> Result<Option<AttendanceSession>> {
        self.get_session_by_id_impl(id).await
    }

    async fn find_session_slot(
        &self,
        class_id: i64,
        session_date: chrono::NaiveDate,
        start_time: chrono::NaiveTime,
    ) -> Result<Option<AttendanceSession>> {
        self.find_session_slot_impl(class_id, session_date, start_time).await
    }

    async fn list_sessions_with_pagination(
        &self,
        query: SessionListQuery,
    ) -> Result<SessionListResponse> {
        self.list_sessions_with_pagination_impl(query).await
    }

    async fn list_sessions(
        &self,
        query: SessionListQuery,
        limit: Option<u64>,
    ) -> Result<Vec<AttendanceSession>> {
        self.list_sessions_impl(query, limit).await
    }

    async fn count_sessions(&self, query: SessionListQuery) -> Result<u64> {
        self.count_sessions_impl(query).await
    }

    async fn update_session_status(
        &self,
        id: i64,
        status: SessionStatus,
    ) -> Result<Option<AttendanceSession>> {
        self.update_session_status_impl(id, status).await
    }

    async fn update_session_qr(
        &self,
        id: i64,
        qr_code_data: &str,
        qr_code_expiry: i64,
    ) -> Result<Option<AttendanceSession>> {
        self.update_session_qr_impl(id, qr_code_data, qr_code_expiry).await
    }

    async fn refresh_session_totals(&self, id: i64) -> Result<Option<AttendanceSession>> {
        self.refresh_session_totals_impl(id).await
    }

    // 考勤记录方法
    async fn create_absent_records(
        &self,
        session_id: i64,
        student_ids: &[i64],
        marked_by: i64,
    ) -> Result<u64> {
        self.create_absent_records_impl(session_id, student_ids, marked_by).await
    }

    async fn get_record_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        self.get_record_by_id_impl(id).await
    }

    async fn get_record(
        &self,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<AttendanceRecord>> {
        self.get_record_impl(session_id, student_id).await
    }

    async fn save_record(&self, write: RecordWrite) -> Result<AttendanceRecord> {
        self.save_record_impl(write).await
    }

    async fn list_record_details(&self, filter: RecordFilter) -> Result<Vec<RecordDetail>> {
        self.list_record_details_impl(filter).await
    }

    async fn list_record_details_page(
        &self,
        filter: RecordFilter,
        page: i64,
        size: i64,
    ) -> Result<(Vec<RecordDetail>, PaginationInfo)> {
        self.list_record_details_page_impl(filter, page, size).await
    }

    async fn count_records_by_status(&self, filter: RecordFilter) -> Result<StatusCounts> {
        self.count_records_by_status_impl(filter).await
    }

    // 周期汇总方法
    async fn save_summary(&self, summary: SummaryWrite) -> Result<AttendanceSummary> {
        self.save_summary_impl(summary).await
    }

    async fn get_summary(
        &self,
        student_id: i64,
        class_id: i64,
        period_type: PeriodType,
        period_start: chrono::NaiveDate,
    ) -> Result<Option<AttendanceSummary>> {
        self.get_summary_impl(student_id, class_id, period_type, period_start).await
    }

    async fn list_summaries(
        &self,
        student_id: Option<i64>,
        class_id: Option<i64>,
    ) -> Result<Vec<AttendanceSummary>> {
        self.list_summaries_impl(student_id, class_id).await
    }

    // 请假申请方法
    async fn create_excuse(&self, excuse: NewExcuse) -> Result<ExcuseApplication> {
        self.create_excuse_impl(excuse).await
    }

    async fn get_excuse_by_id(&self, id: i64) -> Result<Option<ExcuseApplication>> {
        self.get_excuse_by_id_impl(id).await
    }

    async fn get_excuse_detail(&self, id: i64) -> Result<Option<ExcuseDetail>> {
        self.get_excuse_detail_impl(id).await
    }

    async fn list_excuses_with_pagination(
        &self,
        query: ExcuseListQuery,
    ) -> Result<ExcuseListResponse> {
        self.list_excuses_with_pagination_impl(query).await
    }

    async fn review_excuse(
        &self,
        id: i64,
        status: ExcuseStatus,
        reviewer_id: i64,
        review_notes: String,
    ) -> Result<Option<ReviewExcuseResponse>> {
        self.review_excuse_impl(id, status, reviewer_id, review_notes).await
    }

    async fn cancel_excuse(&self, id: i64) -> Result<Option<ExcuseApplication>> {
        self.cancel_excuse_impl(id).await
    }

    // 报表模板方法
    async fn create_report_template(
        &self,
        req: CreateTemplateRequest,
        created_by: i64,
    ) -> Result<ReportTemplate> {
        self.create_report_template_impl(req, created_by).await
    }

    async fn get_report_template(&self, id: i64) -> Result<Option<ReportTemplate>> {
        self.get_report_template_impl(id).await
    }

    async fn list_report_templates(&self, active_only: bool) -> Result<Vec<ReportTemplate>> {
        self.list_report_templates_impl(active_only).await
    }

    async fn update_report_template(
        &self,
        id: i64,
        update: UpdateTemplateRequest,
    ) -> Result<Option<ReportTemplate>> {
        self.update_report_template_impl(id, update).await
    }

    async fn delete_report_template(&self, id: i64) -> Result<bool> {
        self.delete_report_template_impl(id).await
    }

    // 已保存报表方法
    async fn save_generated_report(
        &self,
        req: SaveReportRequest,
        generated_by: i64,
    ) -> Result<GeneratedReport> {
        self.save_generated_report_impl(req, generated_by).await
    }

    async fn get_generated_report(&self, id: i64) -> Result<Option<GeneratedReport>> {
        self.get_generated_report_impl(id).await
    }

    async fn list_generated_reports(
        &self,
        query: SavedReportListQuery,
    ) -> Result<SavedReportListResponse> {
        self.list_generated_reports_impl(query).await
    }

    async fn list_recent_reports(
        &self,
        generated_by: i64,
        limit: u64,
    ) -> Result<Vec<GeneratedReport>> {
        self.list_recent_reports_impl(generated_by, limit).await
    }

    async fn archive_generated_report(&self, id: i64) -> Result<Option<GeneratedReport>> {
        self.archive_generated_report_impl(id).await
    }

    async fn delete_generated_report(&self, id: i64) -> Result<bool> {
        self.delete_generated_report_impl(id).await
    }

    // 首页组件方法
    async fn create_widget(&self, req: CreateWidgetRequest) -> Result<DashboardWidget> {
        self.create_widget_impl(req).await
    }

    async fn get_widget(&self, id: i64) -> Result<Option<DashboardWidget>> {
        self.get_widget_impl(id).await
    }

    async fn list_widgets(&self, active_only: bool) -> Result<Vec<DashboardWidget>> {
        self.list_widgets_impl(active_only).await
    }

    async fn update_widget(
        &self,
        id: i64,
        update: UpdateWidgetRequest,
    ) -> Result<Option<DashboardWidget>> {
        self.update_widget_impl(id, update).await
    }

    async fn delete_widget(&self, id: i64) -> Result<bool> {
        self.delete_widget_impl(id).await
    }

    // 定时报表方法
    async fn create_schedule(
        &self,
        req: CreateScheduleRequest,
        created_by: i64,
        next_run: Option<i64>,
    ) -> Result<ReportSchedule> {
        self.create_schedule_impl(req, created_by, next_run).await
    }

    async fn get_schedule(&self, id: i64) -> Result<Option<ReportSchedule>> {
        self.get_schedule_impl(id).await
    }

    async fn list_schedules(&self) -> Result<Vec<ReportSchedule>> {
        self.list_schedules_impl().await
    }

    async fn update_schedule(
        &self,
        id: i64,
        update: UpdateScheduleRequest,
        next_run: Option<i64>,
    ) -> Result<Option<ReportSchedule>> {
        self.update_schedule_impl(id, update, next_run).await
    }

    async fn delete_schedule(&self, id: i64) -> Result<bool> {
        self.delete_schedule_impl(id).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::SeaOrmStorage;
    use crate::models::{
        classes::{entities::Class, requests::CreateClassRequest},
        courses::{
            entities::{Course, CourseLevel},
            requests::CreateCourseRequest,
        },
        students::{
            entities::{Gender, Student},
            requests::{NewStudent, StudentProfileInput},
        },
        users::{
            entities::{AccountStatus, UserType},
            requests::NewUser,
        },
    };
    use sea_orm::{ConnectOptions, Database};

    pub(crate) async fn storage() -> SeaOrmStorage {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        SeaOrmStorage::from_connection(db).await.unwrap()
    }

    pub(crate) fn new_user(username: &str, user_type: UserType, status: AccountStatus) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{username}@kitui-tvet.ac.ke"),
            password_hash: "hash".to_string(),
            first_name: username.to_string(),
            last_name: "Test".to_string(),
            is_active: status == AccountStatus::Approved,
            user_type,
            phone_number: None,
            department: None,
            account_status: status,
            approved_by: None,
        }
    }

    pub(crate) async fn seed_course(storage: &SeaOrmStorage, code: &str) -> Course {
        storage
            .create_course_impl(CreateCourseRequest {
                code: code.to_string(),
                name: format!("{code} Course"),
                description: String::new(),
                level: CourseLevel::Diploma,
                duration_months: 24,
                department: "Engineering".to_string(),
                is_active: true,
            })
            .await
            .unwrap()
    }

    pub(crate) async fn seed_class(
        storage: &SeaOrmStorage,
        course_id: i64,
        code: &str,
        instructor_id: Option<i64>,
    ) -> Class {
        storage
            .create_class_impl(CreateClassRequest {
                course_id,
                class_code: code.to_string(),
                name: format!("{code} Class"),
                instructor_id,
                academic_year: "2025/2026".to_string(),
                semester: 1,
                start_date: "2025-09-01".parse().unwrap(),
                end_date: "2025-12-19".parse().unwrap(),
                meeting_days: "Mon,Wed".to_string(),
                meeting_time: "08:00".to_string(),
                venue: "Workshop 2".to_string(),
                max_students: 40,
                is_active: true,
            })
            .await
            .unwrap()
    }

    pub(crate) fn profile() -> StudentProfileInput {
        StudentProfileInput {
            admission_number: None,
            national_id: None,
            date_of_birth: "2005-04-12".parse().unwrap(),
            gender: Gender::Female,
            address: String::new(),
            county: None,
            sub_county: String::new(),
            ward: String::new(),
            phone_number_alternative: String::new(),
            emergency_contact_name: String::new(),
            emergency_contact_phone: String::new(),
            emergency_contact_relationship: String::new(),
            year_of_admission: 2025,
            current_class_id: None,
            course_id: None,
            is_boarding: false,
            has_special_needs: false,
            special_needs_description: String::new(),
            parent_name: String::new(),
            parent_phone: String::new(),
            parent_email: String::new(),
            parent_occupation: String::new(),
        }
    }

    pub(crate) async fn seed_student(
        storage: &SeaOrmStorage,
        username: &str,
        admission_number: &str,
    ) -> Student {
        let user = storage
            .create_user_impl(new_user(username, UserType::Student, AccountStatus::Approved))
            .await
            .unwrap();
        storage
            .create_student_impl(NewStudent {
                user_id: user.id,
                admission_number: admission_number.to_string(),
                profile: profile(),
                county: "Kitui".to_string(),
            })
            .await
            .unwrap()
    }

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("attendance.db").unwrap(),
            "sqlite://attendance.db?mode=rwc"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://localhost/att").is_ok());
        assert!(SeaOrmStorage::build_database_url("redis://localhost").is_err());
    }
}
