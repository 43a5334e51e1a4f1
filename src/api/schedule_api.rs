// ==========================================
// 月度均衡排产系统 - 排产 API
// ==========================================
// 职责: 串联 导入 → 引擎 → 导出
// 失败策略: 任何错误立即返回,不写出部分结果
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, SchedulerConfig};
use crate::domain::types::YearMonth;
use crate::engine::{BusinessCalendar, DemandAggregator, ScheduleBuilder, ScheduleResult};
use crate::exporter::{ExportSummary, ScheduleExporter, DEFAULT_OUTPUT_NAME};
use crate::importer::{
    DemandImporter, DemandImporterImpl, HolidayParser, ImportError, ImportedDemand,
    DEFAULT_SHEET_NAME,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{info, info_span};
use uuid::Uuid;

// ==========================================
// GenerateRequest - 排产请求
// ==========================================
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub input: PathBuf,
    pub sheet_name: String,
    pub start: YearMonth,
    pub end: YearMonth,
    pub holidays_text: Option<String>,
    pub holidays_file: Option<PathBuf>,
    pub holidays_csv: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub output_name: String,
}

impl GenerateRequest {
    /// 默认周期 2026 年 7 月 - 12 月
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            start: YearMonth { year: 2026, month: 7 },
            end: YearMonth { year: 2026, month: 12 },
            holidays_text: None,
            holidays_file: None,
            holidays_csv: None,
            output_dir: PathBuf::from("."),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}

// ==========================================
// MonthMapping - 月份列诊断
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct MonthMapping {
    pub month: YearMonth,
    pub label: String,
    pub column: Option<String>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthMappingReport {
    pub months: Vec<MonthMapping>,
    pub total_demand: u64,
    pub holidays: Vec<NaiveDate>,
    pub coerced_cells: usize,
}

// ==========================================
// PlanOutcome - 排产结果（未写出）
// ==========================================
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub run_id: String,
    pub config: SchedulerConfig,
    pub horizon: Vec<YearMonth>,
    pub holidays: BTreeSet<NaiveDate>,
    pub imported: ImportedDemand,
    pub result: ScheduleResult,
}

// ==========================================
// GenerateResponse - 排产响应
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub run_id: String,
    pub total_units: usize,
    pub total_saturday_units: u64,
    pub months: usize,
    pub export: ExportSummary,
}

/// 排产 API
pub struct ScheduleApi {
    config_manager: ConfigManager,
}

impl ScheduleApi {
    pub fn new(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    /// 月份区间 → 月份列表
    pub fn horizon(start: YearMonth, end: YearMonth) -> ApiResult<Vec<YearMonth>> {
        if start > end {
            return Err(ImportError::InvalidMonthRange {
                start: start.to_string(),
                end: end.to_string(),
            }
            .into());
        }
        Ok(YearMonth::enumerate(start, end))
    }

    /// 合并三种来源的假日
    pub fn load_holidays(&self, request: &GenerateRequest) -> ApiResult<BTreeSet<NaiveDate>> {
        let parser = HolidayParser::new();
        let mut holidays = BTreeSet::new();

        if let Some(text) = &request.holidays_text {
            holidays.extend(parser.parse_text(text));
        }
        if let Some(path) = &request.holidays_file {
            holidays.extend(parser.parse_text_file(path)?);
        }
        if let Some(path) = &request.holidays_csv {
            holidays.extend(parser.parse_csv_file(path)?);
        }

        let listed: Vec<String> = holidays.iter().map(|d| d.to_string()).collect();
        info!(count = holidays.len(), holidays = %listed.join(", "), "假日加载完成");
        Ok(holidays)
    }

    fn import(&self, request: &GenerateRequest, horizon: &[YearMonth], strict: bool) -> ApiResult<ImportedDemand> {
        if request.input.as_os_str().is_empty() {
            return Err(ApiError::InvalidInput("未指定需求文件".to_string()));
        }
        let importer = DemandImporterImpl::with_options(&request.sheet_name, strict);
        Ok(importer.import_from_file(&request.input, horizon)?)
    }

    /// 仅读取需求并输出月份列映射诊断（不排产）
    pub fn inspect_months(&self, request: &GenerateRequest) -> ApiResult<MonthMappingReport> {
        let config = self.config_manager.load_scheduler_config()?;
        let horizon = Self::horizon(request.start, request.end)?;
        let holidays = self.load_holidays(request)?;
        let imported = self.import(request, &horizon, config.strict_quantities)?;

        let months: Vec<MonthMapping> = imported
            .month_columns
            .iter()
            .map(|(month, column)| MonthMapping {
                month,
                label: month.label(),
                column: column.map(|c| c.to_string()),
                total: imported.month_total(month),
            })
            .collect();
        let total_demand = months
            .iter()
            .fold(0u64, |acc, m| acc.saturating_add(m.total));

        Ok(MonthMappingReport {
            months,
            total_demand,
            holidays: holidays.into_iter().collect(),
            coerced_cells: imported.coerced_cells,
        })
    }

    /// 导入 + 排产（不写出）
    pub fn plan(&self, request: &GenerateRequest) -> ApiResult<PlanOutcome> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("plan", run_id = %run_id);
        let _guard = span.enter();

        let config = self.config_manager.load_scheduler_config()?;
        let horizon = Self::horizon(request.start, request.end)?;
        let holidays = self.load_holidays(request)?;
        let imported = self.import(request, &horizon, config.strict_quantities)?;

        let demand = DemandAggregator::new().aggregate(&imported.rows, &horizon)?;
        let total_demand = horizon
            .iter()
            .fold(0u64, |acc, m| acc.saturating_add(demand.total(*m)));
        info!(
            months = horizon.len(),
            total_demand,
            daily_capacity = config.daily_capacity,
            saturday_cap = config.saturday_cap,
            lookback = config.lookback_business_days,
            "开始排产"
        );

        let calendar = BusinessCalendar::new(holidays.clone());
        let result = ScheduleBuilder::new(&config, &calendar).build(&demand, &horizon)?;

        Ok(PlanOutcome {
            run_id,
            config,
            horizon,
            holidays,
            imported,
            result,
        })
    }

    /// 导入 + 排产 + 写出
    pub fn generate(&self, request: &GenerateRequest) -> ApiResult<GenerateResponse> {
        let outcome = self.plan(request)?;
        let span = info_span!("export", run_id = %outcome.run_id);
        let _guard = span.enter();

        let exporter = ScheduleExporter::new(&request.output_dir, &request.output_name);
        let snapshot = self.config_manager.snapshot_value()?;
        let bundle = exporter.bundle(
            &outcome.run_id,
            snapshot,
            &outcome.result.schedule,
            &outcome.result.reports,
        );
        let export = exporter.write_all(
            &bundle,
            &outcome.result.schedule,
            &outcome.result.reports,
            &outcome.imported.raw,
        )?;

        Ok(GenerateResponse {
            run_id: outcome.run_id,
            total_units: outcome.result.schedule.len(),
            total_saturday_units: outcome.result.total_saturday_units(),
            months: outcome.result.reports.len(),
            export,
        })
    }
}

impl Default for ScheduleApi {
    fn default() -> Self {
        Self::new(ConfigManager::new())
    }
}
