// ==========================================
// 月度均衡排产系统 - 输出表渲染
// ==========================================
// 输出表:
// - programacao:   排产明细（按 ID 顺序）
// - relatorio:     月度报表
// - base_original: 原始输入回显
// - por_mercado:   按市场汇总
// - por_modelo:    按车型汇总
// 列名为下游约定的葡语字段名，不随界面语言变化
// ==========================================

use crate::domain::demand::RawTable;
use crate::domain::schedule::{GlobalSchedule, MonthReport, ScheduledUnit};
use crate::domain::types::YearMonth;
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

pub const SCHEDULE_HEADERS: [&str; 8] = [
    "dt_producao",
    "mes_ano_producao",
    "produto",
    "modelo",
    "ID",
    "mercado",
    "mes_producao",
    "ano_producao",
];

pub const REPORT_HEADERS: [&str; 8] = [
    "mes_ano",
    "dias_uteis",
    "capacidade",
    "necessario",
    "programado",
    "unid_dia_extra",
    "desvio",
    "utilizacao",
];

// ==========================================
// TableKind - 输出表类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Schedule,
    Report,
    RawInput,
    ByMarket,
    ByModel,
}

impl TableKind {
    /// 文件名后缀
    pub fn file_suffix(&self) -> &'static str {
        match self {
            TableKind::Schedule => "programacao",
            TableKind::Report => "relatorio",
            TableKind::RawInput => "base_original",
            TableKind::ByMarket => "por_mercado",
            TableKind::ByModel => "por_modelo",
        }
    }
}

// ==========================================
// Table - 渲染后的二维表
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub kind: TableKind,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

// ==========================================
// ScheduleRow - 排产明细行（JSON 导出用）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub dt_producao: String,
    pub mes_ano_producao: String,
    pub produto: String,
    pub modelo: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub mercado: String,
    pub mes_producao: u32,
    pub ano_producao: i32,
    pub mes_referencia: String,
}

impl ScheduleRow {
    pub fn from_unit(unit: &ScheduledUnit) -> Self {
        let date = unit.event.date;
        Self {
            dt_producao: date.format("%Y-%m-%d").to_string(),
            mes_ano_producao: YearMonth::of(date).label(),
            produto: unit.event.product.clone(),
            modelo: unit.event.model.clone(),
            id: unit.id.clone(),
            mercado: unit.event.market.clone(),
            mes_producao: date.month(),
            ano_producao: date.year(),
            mes_referencia: unit.event.reference_month.label(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.dt_producao.clone(),
            self.mes_ano_producao.clone(),
            self.produto.clone(),
            self.modelo.clone(),
            self.id.clone(),
            self.mercado.clone(),
            self.mes_producao.to_string(),
            self.ano_producao.to_string(),
        ]
    }
}

// ==========================================
// ReportRow - 月度报表行（JSON 导出用）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub mes_ano: String,
    pub dias_uteis: u64,
    pub capacidade: u64,
    pub necessario: u64,
    pub programado: u64,
    pub unid_dia_extra: u64,
    pub desvio: i64,
    pub utilizacao: f64,
}

impl ReportRow {
    pub fn from_report(report: &MonthReport) -> Self {
        Self {
            mes_ano: report.reference_month.label(),
            dias_uteis: report.business_day_count,
            capacidade: report.weekday_capacity,
            necessario: report.demand_total,
            programado: report.scheduled_total,
            unid_dia_extra: report.saturday_units,
            desvio: report.deviation,
            utilizacao: report.utilization,
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.mes_ano.clone(),
            self.dias_uteis.to_string(),
            self.capacidade.to_string(),
            self.necessario.to_string(),
            self.programado.to_string(),
            self.unid_dia_extra.to_string(),
            self.desvio.to_string(),
            format!("{:.4}", self.utilizacao),
        ]
    }
}

// ==========================================
// TableRenderer - 输出表渲染器
// ==========================================
pub struct TableRenderer {
    // 无状态引擎
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {}
    }

    pub fn schedule_rows(&self, schedule: &GlobalSchedule) -> Vec<ScheduleRow> {
        schedule.units().iter().map(ScheduleRow::from_unit).collect()
    }

    pub fn report_rows(&self, reports: &[MonthReport]) -> Vec<ReportRow> {
        reports.iter().map(ReportRow::from_report).collect()
    }

    pub fn schedule_table(&self, schedule: &GlobalSchedule) -> Table {
        Table {
            kind: TableKind::Schedule,
            headers: to_strings(&SCHEDULE_HEADERS),
            rows: self
                .schedule_rows(schedule)
                .iter()
                .map(ScheduleRow::cells)
                .collect(),
        }
    }

    pub fn report_table(&self, reports: &[MonthReport]) -> Table {
        Table {
            kind: TableKind::Report,
            headers: to_strings(&REPORT_HEADERS),
            rows: self
                .report_rows(reports)
                .iter()
                .map(ReportRow::cells)
                .collect(),
        }
    }

    pub fn by_market_table(&self, schedule: &GlobalSchedule) -> Table {
        count_table(TableKind::ByMarket, "mercado", schedule.count_by_market())
    }

    pub fn by_model_table(&self, schedule: &GlobalSchedule) -> Table {
        count_table(TableKind::ByModel, "modelo", schedule.count_by_model())
    }

    /// 原始输入回显（保持源列顺序）
    pub fn raw_table(&self, raw: &RawTable) -> Table {
        Table {
            kind: TableKind::RawInput,
            headers: raw.headers.clone(),
            rows: raw.ordered_rows(),
        }
    }
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_strings(headers: &[&str]) -> Vec<String> {
    headers.iter().map(|h| h.to_string()).collect()
}

fn count_table(kind: TableKind, key_header: &str, counts: BTreeMap<String, u64>) -> Table {
    Table {
        kind,
        headers: vec![key_header.to_string(), "programado".to_string()],
        rows: counts
            .into_iter()
            .map(|(key, count)| vec![key, count.to_string()])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::AllocationEvent;
    use chrono::NaiveDate;

    fn schedule() -> GlobalSchedule {
        let reference_month = YearMonth::new(2026, 7).unwrap();
        let events = vec![
            AllocationEvent {
                date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
                product: "P1".to_string(),
                model: "M1".to_string(),
                market: "CHILE".to_string(),
                reference_month,
            },
            AllocationEvent {
                date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
                product: "P2".to_string(),
                model: "M2".to_string(),
                market: "MERCADO INTERNO".to_string(),
                reference_month,
            },
        ];
        GlobalSchedule::from_events(events, "fila")
    }

    #[test]
    fn test_schedule_table_columns() {
        let table = TableRenderer::new().schedule_table(&schedule());

        assert_eq!(table.headers[0], "dt_producao");
        assert_eq!(
            table.rows[0],
            vec!["2026-06-30", "Jun/2026", "P2", "M2", "fila 1", "MERCADO INTERNO", "6", "2026"]
        );
        assert_eq!(table.rows[1][4], "fila 2");
    }

    #[test]
    fn test_report_table_formats_utilization() {
        let report = MonthReport {
            reference_month: YearMonth::new(2026, 8).unwrap(),
            business_day_count: 21,
            weekday_capacity: 1050,
            demand_total: 1200,
            scheduled_total: 1200,
            saturday_units: 150,
            deviation: 0,
            utilization: 1200.0 / 1050.0,
        };

        let table = TableRenderer::new().report_table(&[report]);
        assert_eq!(
            table.rows[0],
            vec!["Ago/2026", "21", "1050", "1200", "1200", "150", "0", "1.1429"]
        );
    }

    #[test]
    fn test_aggregate_tables_sorted_by_key() {
        let renderer = TableRenderer::new();
        let by_market = renderer.by_market_table(&schedule());
        assert_eq!(by_market.headers, vec!["mercado", "programado"]);
        assert_eq!(by_market.rows[0], vec!["CHILE", "1"]);
        assert_eq!(by_market.rows[1], vec!["MERCADO INTERNO", "1"]);

        let by_model = renderer.by_model_table(&schedule());
        assert_eq!(by_model.rows.len(), 2);
        assert_eq!(by_model.kind.file_suffix(), "por_modelo");
    }
}
