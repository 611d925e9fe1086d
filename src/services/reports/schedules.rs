//! 定时报表管理
//!
//! 只保存执行计划并计算下次执行时间，实际生成与投递由外部任务负责。

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::ReportService;
use super::next_run::{Timing, next_run};
use crate::models::{
    ApiResponse, ErrorCode,
    reports::{
        entities::ReportSchedule,
        requests::{CreateScheduleRequest, UpdateScheduleRequest, validate_schedule_timing},
        responses::ScheduleListResponse,
    },
};
use crate::services::{Reply, bad_request, current_user, internal_error, not_found};
use crate::storage::Storage;
use crate::utils::clock::school_now;

fn next_run_timestamp(timing: Timing) -> Option<i64> {
    next_run(timing, school_now()).map(|at| at.timestamp())
}

async fn ensure_template(storage: &Arc<dyn Storage>, template_id: i64) -> Result<(), HttpResponse> {
    storage
        .get_report_template(template_id)
        .await
        .map_err(|e| internal_error("Failed to get template", e))?
        .map(|_| ())
        .ok_or_else(|| not_found(ErrorCode::TemplateNotFound, "Template not found"))
}

async fn load_schedule(storage: &Arc<dyn Storage>, schedule_id: i64) -> Result<ReportSchedule, HttpResponse> {
    storage
        .get_schedule(schedule_id)
        .await
        .map_err(|e| internal_error("Failed to get schedule", e))?
        .ok_or_else(|| not_found(ErrorCode::ScheduleNotFound, "Schedule not found"))
}

/// 更新后的定时参数：请求中给出的字段覆盖现有值
fn merged_timing(existing: &ReportSchedule, update: &UpdateScheduleRequest) -> Timing {
    Timing {
        frequency: update.frequency.unwrap_or(existing.frequency),
        day_of_week: update.day_of_week.or(existing.day_of_week),
        day_of_month: update.day_of_month.or(existing.day_of_month),
        hour: update.hour.unwrap_or(existing.hour),
        minute: update.minute.unwrap_or(existing.minute),
    }
}

pub async fn list_schedules(service: &ReportService, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let items = storage
        .list_schedules()
        .await
        .map_err(|e| internal_error("Failed to list schedules", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ScheduleListResponse { items },
        "Schedules retrieved successfully",
    )))
}

pub async fn get_schedule(service: &ReportService, schedule_id: i64, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let schedule = load_schedule(&storage, schedule_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(schedule, "Schedule retrieved successfully")))
}

pub async fn create_schedule(
    service: &ReportService,
    req: CreateScheduleRequest,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    req.validate()
        .map_err(|msg| bad_request(ErrorCode::ScheduleInvalid, msg))?;

    let storage = service.get_storage(request)?;
    ensure_template(&storage, req.template_id).await?;

    let next = next_run_timestamp(Timing {
        frequency: req.frequency,
        day_of_week: req.day_of_week,
        day_of_month: req.day_of_month,
        hour: req.hour,
        minute: req.minute,
    });
    let schedule = storage
        .create_schedule(req, user.id, next)
        .await
        .map_err(|e| internal_error("Failed to create schedule", e))?;

    info!(
        "用户 {} 创建定时报表 {}（{}），下次执行 {:?}",
        user.username, schedule.name, schedule.frequency, schedule.next_run
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(schedule, "Schedule created successfully")))
}

pub async fn update_schedule(
    service: &ReportService,
    schedule_id: i64,
    update: UpdateScheduleRequest,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let existing = load_schedule(&storage, schedule_id).await?;

    if let Some(name) = &update.name
        && name.trim().is_empty()
    {
        return Err(bad_request(ErrorCode::ScheduleInvalid, "Schedule name is required"));
    }
    if let Some(template_id) = update.template_id {
        ensure_template(&storage, template_id).await?;
    }

    let timing = merged_timing(&existing, &update);
    validate_schedule_timing(
        timing.frequency,
        timing.day_of_week,
        timing.day_of_month,
        timing.hour,
        timing.minute,
    )
    .map_err(|msg| bad_request(ErrorCode::ScheduleInvalid, msg))?;

    let schedule = storage
        .update_schedule(schedule_id, update, next_run_timestamp(timing))
        .await
        .map_err(|e| internal_error("Failed to update schedule", e))?
        .ok_or_else(|| not_found(ErrorCode::ScheduleNotFound, "Schedule not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(schedule, "Schedule updated successfully")))
}

pub async fn delete_schedule(service: &ReportService, schedule_id: i64, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let deleted = storage
        .delete_schedule(schedule_id)
        .await
        .map_err(|e| internal_error("Failed to delete schedule", e))?;
    if !deleted {
        return Err(not_found(ErrorCode::ScheduleNotFound, "Schedule not found"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Schedule deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reports::entities::ScheduleFrequency;
    use chrono::Utc;

    fn schedule() -> ReportSchedule {
        let now = Utc::now();
        ReportSchedule {
            id: 1,
            name: "Weekly summary".to_string(),
            template_id: 1,
            frequency: ScheduleFrequency::Weekly,
            day_of_week: Some(0),
            day_of_month: None,
            hour: 9,
            minute: 0,
            email_recipients: Vec::new(),
            notify_users: Vec::new(),
            output_formats: Vec::new(),
            is_active: true,
            last_run: None,
            next_run: None,
            created_by: Some(1),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_merged_timing_keeps_unchanged_fields() {
        let update = UpdateScheduleRequest {
            hour: Some(17),
            ..Default::default()
        };
        let timing = merged_timing(&schedule(), &update);
        assert_eq!(timing.frequency, ScheduleFrequency::Weekly);
        assert_eq!(timing.day_of_week, Some(0));
        assert_eq!((timing.hour, timing.minute), (17, 0));
    }

    #[test]
    fn test_switch_to_monthly_requires_day_of_month() {
        let update = UpdateScheduleRequest {
            frequency: Some(ScheduleFrequency::Monthly),
            ..Default::default()
        };
        let timing = merged_timing(&schedule(), &update);
        assert!(
            validate_schedule_timing(
                timing.frequency,
                timing.day_of_week,
                timing.day_of_month,
                timing.hour,
                timing.minute,
            )
            .is_err()
        );
    }
}
