//! Chart.js 图表数据

use crate::models::reports::responses::{ChartData, ChartDataset, ReportGroup};
use crate::services::attendance::rules::attendance_rate;

const PRESENT: (&str, &str) = ("#28a745", "rgba(40, 167, 69, 0.1)");
const ABSENT: (&str, &str) = ("#dc3545", "rgba(220, 53, 69, 0.1)");
const LATE: (&str, &str) = ("#ffc107", "rgba(255, 193, 7, 0.1)");

pub fn dataset(label: &str, data: Vec<f64>, (border, background): (&str, &str)) -> ChartDataset {
    ChartDataset {
        label: label.to_string(),
        data,
        border_color: border.to_string(),
        background_color: background.to_string(),
    }
}

/// 时间序列：出勤、缺勤、迟到三条折线
pub fn status_lines(labels: Vec<String>, present: Vec<u64>, absent: Vec<u64>, late: Vec<u64>) -> ChartData {
    let to_f64 = |values: Vec<u64>| values.into_iter().map(|v| v as f64).collect();
    ChartData {
        chart_type: "line".to_string(),
        labels,
        datasets: vec![
            dataset("Present", to_f64(present), PRESENT),
            dataset("Absent", to_f64(absent), ABSENT),
            dataset("Late", to_f64(late), LATE),
        ],
    }
}

/// 分类柱状图：出勤率
pub fn rate_bars(labels: Vec<String>, rates: Vec<f64>, colors: (&str, &str)) -> ChartData {
    ChartData {
        chart_type: "bar".to_string(),
        labels,
        datasets: vec![dataset("Attendance Rate %", rates, colors)],
    }
}

pub fn groups_chart(groups: &[ReportGroup], time_based: bool) -> Option<ChartData> {
    if groups.is_empty() {
        return None;
    }
    let labels = groups.iter().map(|g| g.label.clone()).collect();
    if time_based {
        Some(status_lines(
            labels,
            groups.iter().map(|g| g.present).collect(),
            groups.iter().map(|g| g.absent).collect(),
            groups.iter().map(|g| g.late).collect(),
        ))
    } else {
        let rates = groups
            .iter()
            .map(|g| attendance_rate(g.present, g.total))
            .collect();
        Some(rate_bars(labels, rates, ("#0056b3", "#007bff")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(label: &str, present: u64, total: u64) -> ReportGroup {
        ReportGroup {
            key: label.to_string(),
            label: label.to_string(),
            present,
            absent: total - present,
            total,
            ..Default::default()
        }
    }

    #[test]
    fn test_entity_groups_become_rate_bars() {
        let chart = groups_chart(&[group("ICT-1A", 3, 4), group("ELC-2B", 0, 0)], false).unwrap();
        assert_eq!(chart.chart_type, "bar");
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].data, vec![75.0, 0.0]);
    }

    #[test]
    fn test_time_groups_become_status_lines() {
        let chart = groups_chart(&[group("10/03", 2, 3)], true).unwrap();
        assert_eq!(chart.chart_type, "line");
        let labels: Vec<&str> = chart.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Present", "Absent", "Late"]);
        assert_eq!(chart.datasets[1].data, vec![1.0]);
        assert!(groups_chart(&[], true).is_none());
    }

    #[test]
    fn test_dataset_serializes_camel_case() {
        let json = serde_json::to_value(dataset("Present", vec![1.0], PRESENT)).unwrap();
        assert_eq!(json["borderColor"], "#28a745");
        assert!(json.get("border_color").is_none());
    }
}
