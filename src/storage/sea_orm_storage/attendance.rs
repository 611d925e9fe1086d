//! 考勤课次、考勤记录与周期汇总

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::attendance_records::{
    ActiveModel as RecordActiveModel, Column as RecordColumn, Entity as AttendanceRecords,
    Model as RecordModel,
};
use crate::entity::attendance_sessions::{
    ActiveModel as SessionActiveModel, Column as SessionColumn, Entity as AttendanceSessions,
};
use crate::entity::attendance_summaries::{
    ActiveModel as SummaryActiveModel, Column as SummaryColumn, Entity as AttendanceSummaries,
};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{AttendanceError, Result};
use crate::models::{
    PaginationInfo,
    attendance::{
        entities::{
            AttendanceRecord, AttendanceSession, AttendanceStatus, AttendanceSummary, PeriodType,
            SessionStatus,
        },
        requests::{NewSession, RecordFilter, RecordWrite, SessionListQuery, SummaryWrite},
        responses::{RecordDetail, SessionListResponse, StatusCounts},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, sea_query::Expr,
};

const TIME_FORMAT: &str = "%H:%M:%S";

fn filtered_sessions(query: &SessionListQuery) -> Select<AttendanceSessions> {
    let mut select = AttendanceSessions::find();

    if let Some(class_id) = query.class_id {
        select = select.filter(SessionColumn::ClassId.eq(class_id));
    }
    if let Some(ref class_ids) = query.class_ids {
        select = select.filter(SessionColumn::ClassId.is_in(class_ids.clone()));
    }
    if let Some(instructor_id) = query.instructor_id {
        select = select.filter(SessionColumn::InstructorId.eq(instructor_id));
    }
    if let Some(ref status) = query.status {
        select = select.filter(SessionColumn::Status.eq(status.to_string()));
    }
    if let Some(from) = query.date_from {
        select = select.filter(SessionColumn::SessionDate.gte(from.to_string()));
    }
    if let Some(to) = query.date_to {
        select = select.filter(SessionColumn::SessionDate.lte(to.to_string()));
    }

    if query.ascending {
        select
            .order_by_asc(SessionColumn::SessionDate)
            .order_by_asc(SessionColumn::StartTime)
    } else {
        select
            .order_by_desc(SessionColumn::SessionDate)
            .order_by_desc(SessionColumn::StartTime)
    }
}

// 记录查询总是关联课次表，日期与班级条件都在课次上
fn filtered_records(filter: &RecordFilter) -> Select<AttendanceRecords> {
    let mut select = AttendanceRecords::find().inner_join(AttendanceSessions);

    if let Some(session_id) = filter.session_id {
        select = select.filter(RecordColumn::SessionId.eq(session_id));
    }
    if let Some(class_id) = filter.class_id {
        select = select.filter(SessionColumn::ClassId.eq(class_id));
    }
    if let Some(ref class_ids) = filter.class_ids {
        select = select.filter(SessionColumn::ClassId.is_in(class_ids.clone()));
    }
    if let Some(instructor_id) = filter.instructor_id {
        select = select.filter(SessionColumn::InstructorId.eq(instructor_id));
    }
    if let Some(student_id) = filter.student_id {
        select = select.filter(RecordColumn::StudentId.eq(student_id));
    }
    if let Some(ref status) = filter.status {
        select = select.filter(RecordColumn::Status.eq(status.to_string()));
    }
    if let Some(from) = filter.date_from {
        select = select.filter(SessionColumn::SessionDate.gte(from.to_string()));
    }
    if let Some(to) = filter.date_to {
        select = select.filter(SessionColumn::SessionDate.lte(to.to_string()));
    }
    if let Some(ref status) = filter.session_status {
        select = select.filter(SessionColumn::Status.eq(status.to_string()));
    }
    if let Some(is_excused) = filter.is_excused {
        select = select.filter(RecordColumn::IsExcused.eq(is_excused));
    }

    select
}

fn ordered_records(filter: &RecordFilter) -> Select<AttendanceRecords> {
    let select = filtered_records(filter);
    if filter.chronological {
        select
            .inner_join(Students)
            .order_by_asc(SessionColumn::SessionDate)
            .order_by_asc(SessionColumn::StartTime)
            .order_by_asc(StudentColumn::AdmissionNumber)
    } else {
        select
            .order_by_desc(SessionColumn::SessionDate)
            .order_by_desc(SessionColumn::StartTime)
            .order_by_desc(RecordColumn::CheckInTime)
            .order_by_asc(RecordColumn::Id)
    }
}

/// 把学生在该班级日期范围内的记录标记为已请假，可在事务内调用
pub(super) async fn mark_records_excused<C: ConnectionTrait>(
    conn: &C,
    student_id: i64,
    class_id: i64,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    reason: &str,
) -> Result<u64> {
    let record_ids: Vec<i64> = filtered_records(&RecordFilter {
        student_id: Some(student_id),
        class_id: Some(class_id),
        date_from: Some(start_date),
        date_to: Some(end_date),
        ..Default::default()
    })
    .select_only()
    .column(RecordColumn::Id)
    .into_tuple()
    .all(conn)
    .await
    .map_err(|e| AttendanceError::database_operation(format!("查询考勤记录失败: {e}")))?;

    if record_ids.is_empty() {
        return Ok(0);
    }

    let result = AttendanceRecords::update_many()
        .col_expr(RecordColumn::IsExcused, Expr::value(true))
        .col_expr(RecordColumn::ExcuseReason, Expr::value(reason.to_string()))
        .col_expr(
            RecordColumn::UpdatedAt,
            Expr::value(chrono::Utc::now().timestamp()),
        )
        .filter(RecordColumn::Id.is_in(record_ids))
        .exec(conn)
        .await
        .map_err(|e| AttendanceError::database_operation(format!("更新请假记录失败: {e}")))?;

    Ok(result.rows_affected)
}

impl SeaOrmStorage {
    pub async fn create_session_impl(&self, session: NewSession) -> Result<AttendanceSession> {
        let now = chrono::Utc::now().timestamp();

        let model = SessionActiveModel {
            class_id: Set(session.class_id),
            instructor_id: Set(session.instructor_id),
            session_date: Set(session.session_date.to_string()),
            start_time: Set(session.start_time.format(TIME_FORMAT).to_string()),
            end_time: Set(session.end_time.format(TIME_FORMAT).to_string()),
            topic_covered: Set(session.topic_covered),
            venue: Set(session.venue),
            attendance_method: Set(session.attendance_method.to_string()),
            qr_code_data: Set(session.qr_code_data),
            qr_code_expiry: Set(session.qr_code_expiry),
            status: Set(SessionStatus::Scheduled.to_string()),
            total_present: Set(0),
            total_absent: Set(0),
            total_late: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            closed_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("创建课次失败: {e}")))?;

        Ok(result.into_session())
    }

    pub async fn get_session_by_id_impl(&self, id: i64) -> Result<Option<AttendanceSession>> {
        let result = AttendanceSessions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课次失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    pub async fn find_session_slot_impl(
        &self,
        class_id: i64,
        session_date: chrono::NaiveDate,
        start_time: chrono::NaiveTime,
    ) -> Result<Option<AttendanceSession>> {
        let result = AttendanceSessions::find()
            .filter(SessionColumn::ClassId.eq(class_id))
            .filter(SessionColumn::SessionDate.eq(session_date.to_string()))
            .filter(SessionColumn::StartTime.eq(start_time.format(TIME_FORMAT).to_string()))
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课次失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    pub async fn list_sessions_with_pagination_impl(
        &self,
        query: SessionListQuery,
    ) -> Result<SessionListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let paginator = filtered_sessions(&query).paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课次总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课次页数失败: {e}")))?;
        let sessions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课次列表失败: {e}")))?;

        Ok(SessionListResponse {
            items: sessions.into_iter().map(|m| m.into_session()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn list_sessions_impl(
        &self,
        query: SessionListQuery,
        limit: Option<u64>,
    ) -> Result<Vec<AttendanceSession>> {
        let sessions = filtered_sessions(&query)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课次列表失败: {e}")))?;

        Ok(sessions.into_iter().map(|m| m.into_session()).collect())
    }

    pub async fn count_sessions_impl(&self, query: SessionListQuery) -> Result<u64> {
        filtered_sessions(&query)
            .count(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("统计课次数量失败: {e}")))
    }

    pub async fn update_session_status_impl(
        &self,
        id: i64,
        status: SessionStatus,
    ) -> Result<Option<AttendanceSession>> {
        if self.get_session_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let mut model = SessionActiveModel {
            id: Set(id),
            status: Set(status.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        if status == SessionStatus::Completed {
            model.closed_at = Set(Some(now));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新课次状态失败: {e}")))?;

        self.get_session_by_id_impl(id).await
    }

    pub async fn update_session_qr_impl(
        &self,
        id: i64,
        qr_code_data: &str,
        qr_code_expiry: i64,
    ) -> Result<Option<AttendanceSession>> {
        if self.get_session_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = SessionActiveModel {
            id: Set(id),
            qr_code_data: Set(Some(qr_code_data.to_string())),
            qr_code_expiry: Set(Some(qr_code_expiry)),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新二维码失败: {e}")))?;

        self.get_session_by_id_impl(id).await
    }

    /// 按记录重新统计出勤、缺勤、迟到人数
    pub async fn refresh_session_totals_impl(
        &self,
        id: i64,
    ) -> Result<Option<AttendanceSession>> {
        if self.get_session_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let counts = self
            .count_records_by_status_impl(RecordFilter {
                session_id: Some(id),
                ..Default::default()
            })
            .await?;

        let model = SessionActiveModel {
            id: Set(id),
            total_present: Set(counts.present as i32),
            total_absent: Set(counts.absent as i32),
            total_late: Set(counts.late as i32),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新课次统计失败: {e}")))?;

        self.get_session_by_id_impl(id).await
    }

    /// 为尚无记录的学生批量创建缺勤记录
    pub async fn create_absent_records_impl(
        &self,
        session_id: i64,
        student_ids: &[i64],
        marked_by: i64,
    ) -> Result<u64> {
        let existing: HashSet<i64> = AttendanceRecords::find()
            .select_only()
            .column(RecordColumn::StudentId)
            .filter(RecordColumn::SessionId.eq(session_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询考勤记录失败: {e}")))?
            .into_iter()
            .collect();

        let now = chrono::Utc::now().timestamp();
        let models: Vec<RecordActiveModel> = student_ids
            .iter()
            .filter(|id| !existing.contains(*id))
            .collect::<HashSet<_>>()
            .into_iter()
            .map(|&student_id| RecordActiveModel {
                session_id: Set(session_id),
                student_id: Set(student_id),
                status: Set(AttendanceStatus::Absent.to_string()),
                check_in_time: Set(None),
                check_out_time: Set(None),
                mark_time: Set(now),
                marked_by: Set(Some(marked_by)),
                is_excused: Set(false),
                excuse_reason: Set(String::new()),
                remarks: Set(String::new()),
                late_minutes: Set(0),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            })
            .collect();

        if models.is_empty() {
            return Ok(0);
        }

        let count = models.len() as u64;
        AttendanceRecords::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("创建考勤记录失败: {e}")))?;

        Ok(count)
    }

    pub async fn get_record_by_id_impl(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        let result = AttendanceRecords::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询考勤记录失败: {e}")))?;

        Ok(result.map(|m| m.into_record()))
    }

    pub async fn get_record_impl(
        &self,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<AttendanceRecord>> {
        let result = AttendanceRecords::find()
            .filter(RecordColumn::SessionId.eq(session_id))
            .filter(RecordColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询考勤记录失败: {e}")))?;

        Ok(result.map(|m| m.into_record()))
    }

    /// 写入考勤记录，不存在则创建
    pub async fn save_record_impl(&self, write: RecordWrite) -> Result<AttendanceRecord> {
        let now = chrono::Utc::now().timestamp();

        let existing = AttendanceRecords::find()
            .filter(RecordColumn::SessionId.eq(write.session_id))
            .filter(RecordColumn::StudentId.eq(write.student_id))
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询考勤记录失败: {e}")))?;

        let result = match existing {
            Some(record) => {
                let mut model = RecordActiveModel {
                    id: Set(record.id),
                    status: Set(write.status.to_string()),
                    mark_time: Set(now),
                    late_minutes: Set(write.late_minutes),
                    updated_at: Set(now),
                    ..Default::default()
                };
                if let Some(check_in) = write.check_in_time {
                    model.check_in_time = Set(Some(check_in));
                }
                if write.marked_by.is_some() {
                    model.marked_by = Set(write.marked_by);
                }
                if let Some(is_excused) = write.is_excused {
                    model.is_excused = Set(is_excused);
                }
                if let Some(remarks) = write.remarks {
                    model.remarks = Set(remarks);
                }
                model.update(&self.db).await
            }
            None => {
                let model = RecordActiveModel {
                    session_id: Set(write.session_id),
                    student_id: Set(write.student_id),
                    status: Set(write.status.to_string()),
                    check_in_time: Set(write.check_in_time),
                    check_out_time: Set(None),
                    mark_time: Set(now),
                    marked_by: Set(write.marked_by),
                    is_excused: Set(write.is_excused.unwrap_or(false)),
                    excuse_reason: Set(String::new()),
                    remarks: Set(write.remarks.unwrap_or_default()),
                    late_minutes: Set(write.late_minutes),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model.insert(&self.db).await
            }
        }
        .map_err(|e| AttendanceError::database_operation(format!("保存考勤记录失败: {e}")))?;

        Ok(result.into_record())
    }

    // 批量补全学生、班级、课次、点名人信息
    async fn build_record_details(&self, records: Vec<RecordModel>) -> Result<Vec<RecordDetail>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let session_ids: HashSet<i64> = records.iter().map(|r| r.session_id).collect();
        let sessions: HashMap<i64, _> = AttendanceSessions::find()
            .filter(SessionColumn::Id.is_in(session_ids))
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课次失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let class_ids: HashSet<i64> = sessions.values().map(|s| s.class_id).collect();
        let classes: HashMap<i64, String> = Classes::find()
            .filter(ClassColumn::Id.is_in(class_ids))
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询班级失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let student_ids: HashSet<i64> = records.iter().map(|r| r.student_id).collect();
        let students: HashMap<i64, _> = Students::find()
            .filter(StudentColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let user_ids: Vec<i64> = students
            .values()
            .map(|s| s.user_id)
            .chain(records.iter().filter_map(|r| r.marked_by))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let names: HashMap<i64, String> = self
            .list_users_by_ids_impl(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.full_name()))
            .collect();

        let details = records
            .into_iter()
            .map(|record| {
                let session = sessions.get(&record.session_id);
                let student = students.get(&record.student_id);
                let class_id = session.map(|s| s.class_id).unwrap_or_default();
                let marked_by_name = record.marked_by.and_then(|id| names.get(&id).cloned());
                let record = record.into_record();
                RecordDetail {
                    admission_number: student
                        .map(|s| s.admission_number.clone())
                        .unwrap_or_default(),
                    student_name: student
                        .and_then(|s| names.get(&s.user_id).cloned())
                        .unwrap_or_default(),
                    class_id,
                    class_name: classes.get(&class_id).cloned().unwrap_or_default(),
                    session_date: session
                        .and_then(|s| s.session_date.parse().ok())
                        .unwrap_or_default(),
                    start_time: session
                        .and_then(|s| s.start_time.parse().ok())
                        .unwrap_or_default(),
                    marked_by_name,
                    record,
                }
            })
            .collect();

        Ok(details)
    }

    pub async fn list_record_details_impl(&self, filter: RecordFilter) -> Result<Vec<RecordDetail>> {
        let records = ordered_records(&filter)
            .limit(filter.limit)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询考勤记录失败: {e}")))?;

        self.build_record_details(records).await
    }

    pub async fn list_record_details_page_impl(
        &self,
        filter: RecordFilter,
        page: i64,
        size: i64,
    ) -> Result<(Vec<RecordDetail>, PaginationInfo)> {
        let page = page.max(1) as u64;
        let size = size.clamp(1, 100) as u64;

        let paginator = ordered_records(&filter).paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询记录总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询记录页数失败: {e}")))?;
        let records = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询考勤记录失败: {e}")))?;

        let items = self.build_record_details(records).await?;
        Ok((
            items,
            PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        ))
    }

    pub async fn count_records_by_status_impl(&self, filter: RecordFilter) -> Result<StatusCounts> {
        let rows: Vec<(String, i64)> = filtered_records(&filter)
            .select_only()
            .column(RecordColumn::Status)
            .column_as(RecordColumn::Id.count(), "count")
            .group_by(RecordColumn::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("统计考勤记录失败: {e}")))?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            let count = count as u64;
            counts.total += count;
            match status.parse::<AttendanceStatus>() {
                Ok(AttendanceStatus::Present) => counts.present += count,
                Ok(AttendanceStatus::Absent) => counts.absent += count,
                Ok(AttendanceStatus::Late) => counts.late += count,
                Ok(AttendanceStatus::Excused) => counts.excused += count,
                Ok(AttendanceStatus::HalfDay) => counts.half_day += count,
                Err(_) => {}
            }
        }

        Ok(counts)
    }

    /// 按唯一键写入周期汇总
    pub async fn save_summary_impl(&self, summary: SummaryWrite) -> Result<AttendanceSummary> {
        let now = chrono::Utc::now().timestamp();

        let existing = AttendanceSummaries::find()
            .filter(SummaryColumn::StudentId.eq(summary.student_id))
            .filter(SummaryColumn::ClassId.eq(summary.class_id))
            .filter(SummaryColumn::PeriodType.eq(summary.period_type.to_string()))
            .filter(SummaryColumn::PeriodStart.eq(summary.period_start.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询考勤汇总失败: {e}")))?;

        let mut model = SummaryActiveModel {
            student_id: Set(summary.student_id),
            class_id: Set(summary.class_id),
            period_type: Set(summary.period_type.to_string()),
            period_start: Set(summary.period_start.to_string()),
            period_end: Set(summary.period_end.to_string()),
            total_sessions: Set(summary.total_sessions),
            present_count: Set(summary.present_count),
            absent_count: Set(summary.absent_count),
            late_count: Set(summary.late_count),
            excused_count: Set(summary.excused_count),
            attendance_rate: Set(summary.attendance_rate),
            punctuality_rate: Set(summary.punctuality_rate),
            previous_period_rate: Set(summary.previous_period_rate),
            trend: Set(summary.trend.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = match existing {
            Some(found) => {
                model.id = Set(found.id);
                model.update(&self.db).await
            }
            None => {
                model.created_at = Set(now);
                model.insert(&self.db).await
            }
        }
        .map_err(|e| AttendanceError::database_operation(format!("保存考勤汇总失败: {e}")))?;

        Ok(result.into_summary())
    }

    pub async fn get_summary_impl(
        &self,
        student_id: i64,
        class_id: i64,
        period_type: PeriodType,
        period_start: chrono::NaiveDate,
    ) -> Result<Option<AttendanceSummary>> {
        let result = AttendanceSummaries::find()
            .filter(SummaryColumn::StudentId.eq(student_id))
            .filter(SummaryColumn::ClassId.eq(class_id))
            .filter(SummaryColumn::PeriodType.eq(period_type.to_string()))
            .filter(SummaryColumn::PeriodStart.eq(period_start.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询考勤汇总失败: {e}")))?;

        Ok(result.map(|m| m.into_summary()))
    }

    pub async fn list_summaries_impl(
        &self,
        student_id: Option<i64>,
        class_id: Option<i64>,
    ) -> Result<Vec<AttendanceSummary>> {
        let mut select = AttendanceSummaries::find();
        if let Some(student_id) = student_id {
            select = select.filter(SummaryColumn::StudentId.eq(student_id));
        }
        if let Some(class_id) = class_id {
            select = select.filter(SummaryColumn::ClassId.eq(class_id));
        }

        let summaries = select
            .order_by_desc(SummaryColumn::PeriodStart)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询考勤汇总失败: {e}")))?;

        Ok(summaries.into_iter().map(|m| m.into_summary()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::SeaOrmStorage;
    use super::super::tests::{new_user, seed_class, seed_course, seed_student, storage};
    use crate::models::attendance::entities::{
        AttendanceMethod, AttendanceSession, AttendanceStatus, PeriodType, SessionStatus, Trend,
    };
    use crate::models::attendance::requests::{
        NewSession, RecordFilter, RecordWrite, SessionListQuery, SummaryWrite,
    };
    use crate::models::students::entities::Student;
    use crate::models::users::entities::{AccountStatus, UserType};

    struct Fixture {
        storage: SeaOrmStorage,
        instructor_id: i64,
        class_id: i64,
        students: Vec<Student>,
    }

    async fn fixture() -> Fixture {
        let storage = storage().await;
        let instructor = storage
            .create_user_impl(new_user("mkioko", UserType::Instructor, AccountStatus::Approved))
            .await
            .unwrap();
        let course = seed_course(&storage, "ELEC").await;
        let class = seed_class(&storage, course.id, "ELEC-1A", Some(instructor.id)).await;
        let students = vec![
            seed_student(&storage, "amina", "TVET20250001").await,
            seed_student(&storage, "brian", "TVET20250002").await,
        ];
        Fixture {
            storage,
            instructor_id: instructor.id,
            class_id: class.id,
            students,
        }
    }

    async fn session(f: &Fixture, date: &str, start: &str) -> AttendanceSession {
        f.storage
            .create_session_impl(NewSession {
                class_id: f.class_id,
                instructor_id: f.instructor_id,
                session_date: date.parse().unwrap(),
                start_time: start.parse().unwrap(),
                end_time: "12:00:00".parse().unwrap(),
                topic_covered: "Wiring".to_string(),
                venue: "Lab 1".to_string(),
                attendance_method: AttendanceMethod::Manual,
                qr_code_data: None,
                qr_code_expiry: None,
            })
            .await
            .unwrap()
    }

    fn write(session_id: i64, student_id: i64, status: AttendanceStatus) -> RecordWrite {
        RecordWrite {
            session_id,
            student_id,
            status,
            check_in_time: None,
            marked_by: None,
            is_excused: None,
            remarks: None,
            late_minutes: 0,
        }
    }

    #[tokio::test]
    async fn test_session_slot_is_unique() {
        let f = fixture().await;
        let s = session(&f, "2025-03-03", "08:00:00").await;
        let found = f
            .storage
            .find_session_slot_impl(f.class_id, s.session_date, s.start_time)
            .await
            .unwrap();
        assert_eq!(found.map(|x| x.id), Some(s.id));
    }

    #[tokio::test]
    async fn test_absent_records_then_totals() {
        let f = fixture().await;
        let s = session(&f, "2025-03-03", "08:00:00").await;
        let ids: Vec<i64> = f.students.iter().map(|s| s.id).collect();

        let created = f
            .storage
            .create_absent_records_impl(s.id, &ids, f.instructor_id)
            .await
            .unwrap();
        assert_eq!(created, 2);
        // 重复调用不会产生重复记录
        assert_eq!(
            f.storage
                .create_absent_records_impl(s.id, &ids, f.instructor_id)
                .await
                .unwrap(),
            0
        );

        let mut late = write(s.id, ids[0], AttendanceStatus::Late);
        late.check_in_time = Some(1_741_000_000);
        late.late_minutes = 12;
        let record = f.storage.save_record_impl(late).await.unwrap();
        assert_eq!(record.late_minutes, 12);
        assert!(record.check_in_time.is_some());

        let session = f
            .storage
            .refresh_session_totals_impl(s.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.total_late, 1);
        assert_eq!(session.total_absent, 1);
        assert_eq!(session.total_present, 0);
    }

    #[tokio::test]
    async fn test_record_details_and_counts() {
        let f = fixture().await;
        let monday = session(&f, "2025-03-03", "08:00:00").await;
        let tuesday = session(&f, "2025-03-04", "08:00:00").await;
        let (a, b) = (f.students[0].id, f.students[1].id);

        for (sid, student, status) in [
            (monday.id, a, AttendanceStatus::Present),
            (monday.id, b, AttendanceStatus::Absent),
            (tuesday.id, a, AttendanceStatus::Present),
            (tuesday.id, b, AttendanceStatus::HalfDay),
        ] {
            f.storage
                .save_record_impl(write(sid, student, status))
                .await
                .unwrap();
        }

        let counts = f
            .storage
            .count_records_by_status_impl(RecordFilter {
                class_id: Some(f.class_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(counts.total, 4);
        assert_eq!(counts.present, 2);
        assert_eq!(counts.half_day, 1);

        let details = f
            .storage
            .list_record_details_impl(RecordFilter {
                date_from: Some("2025-03-04".parse().unwrap()),
                chronological: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].admission_number, "TVET20250001");
        assert_eq!(details[0].class_name, "ELEC-1A Class");
        assert_eq!(details[0].student_name, "amina Test");

        let (page, info) = f
            .storage
            .list_record_details_page_impl(
                RecordFilter {
                    student_id: Some(a),
                    ..Default::default()
                },
                1,
                1,
            )
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(info.total, 2);
        assert_eq!(page[0].session_date.to_string(), "2025-03-04");
    }

    #[tokio::test]
    async fn test_mark_records_excused_within_range() {
        let f = fixture().await;
        let inside = session(&f, "2025-03-03", "08:00:00").await;
        let outside = session(&f, "2025-03-10", "08:00:00").await;
        let student = f.students[0].id;
        for sid in [inside.id, outside.id] {
            f.storage
                .save_record_impl(write(sid, student, AttendanceStatus::Absent))
                .await
                .unwrap();
        }

        let updated = super::mark_records_excused(
            &f.storage.db,
            student,
            f.class_id,
            "2025-03-01".parse().unwrap(),
            "2025-03-05".parse().unwrap(),
            "Hospital visit",
        )
        .await
        .unwrap();
        assert_eq!(updated, 1);

        let record = f
            .storage
            .get_record_impl(inside.id, student)
            .await
            .unwrap()
            .unwrap();
        assert!(record.is_excused);
        assert_eq!(record.excuse_reason, "Hospital visit");
        assert!(
            !f.storage
                .get_record_impl(outside.id, student)
                .await
                .unwrap()
                .unwrap()
                .is_excused
        );
    }

    #[tokio::test]
    async fn test_session_status_and_listing() {
        let f = fixture().await;
        let early = session(&f, "2025-03-03", "08:00:00").await;
        session(&f, "2025-03-05", "08:00:00").await;

        let closed = f
            .storage
            .update_session_status_impl(early.id, SessionStatus::Completed)
            .await
            .unwrap()
            .unwrap();
        assert!(closed.closed_at.is_some());

        let upcoming = f
            .storage
            .list_sessions_impl(
                SessionListQuery {
                    status: Some(SessionStatus::Scheduled),
                    ascending: true,
                    ..Default::default()
                },
                Some(5),
            )
            .await
            .unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].session_date.to_string(), "2025-03-05");

        let mine = f
            .storage
            .count_sessions_impl(SessionListQuery {
                class_ids: Some(vec![]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine, 0);
    }

    #[tokio::test]
    async fn test_summary_upsert() {
        let f = fixture().await;
        let summary = |rate: f64, trend: Trend| SummaryWrite {
            student_id: f.students[0].id,
            class_id: f.class_id,
            period_type: PeriodType::Weekly,
            period_start: "2025-03-03".parse().unwrap(),
            period_end: "2025-03-09".parse().unwrap(),
            total_sessions: 4,
            present_count: 3,
            absent_count: 1,
            late_count: 0,
            excused_count: 0,
            attendance_rate: rate,
            punctuality_rate: 100.0,
            previous_period_rate: None,
            trend,
        };

        let first = f
            .storage
            .save_summary_impl(summary(75.0, Trend::Stable))
            .await
            .unwrap();
        let second = f
            .storage
            .save_summary_impl(summary(80.0, Trend::Up))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.trend, Trend::Up);
        assert_eq!(
            f.storage
                .list_summaries_impl(Some(f.students[0].id), None)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
