// ==========================================
// 月度均衡排产系统 - 结果写出
// ==========================================
// 输出:
// - <name>_<table>.csv   每张表一个 CSV
// - <name>.json          汇总包（run_id / 配置快照 / 明细 / 报表 / 汇总）
// ==========================================

use crate::domain::demand::RawTable;
use crate::domain::schedule::{GlobalSchedule, MonthReport};
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::tables::{ReportRow, ScheduleRow, Table, TableRenderer};
use chrono::{DateTime, Utc};
use csv::Writer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 默认输出名
pub const DEFAULT_OUTPUT_NAME: &str = "programacao_2S2026_balanceada";

/// 用户给出的输出名中会被去掉的扩展名
const STRIPPED_EXTENSIONS: [&str; 4] = [".xlsx", ".xls", ".csv", ".json"];

/// 规范化输出名: trim,去掉已知扩展名,空值回退默认
pub fn normalize_output_name(name: &str) -> String {
    let trimmed = name.trim();
    let stem = STRIPPED_EXTENSIONS
        .iter()
        .find_map(|ext| {
            let split = trimmed.len().checked_sub(ext.len())?;
            let tail = trimmed.get(split..)?;
            if tail.eq_ignore_ascii_case(ext) {
                trimmed.get(..split)
            } else {
                None
            }
        })
        .unwrap_or(trimmed)
        .trim();

    if stem.is_empty() {
        DEFAULT_OUTPUT_NAME.to_string()
    } else {
        stem.to_string()
    }
}

// ==========================================
// ExportBundle - JSON 汇总包
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ExportBundle {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub config: serde_json::Value,
    pub programacao: Vec<ScheduleRow>,
    pub relatorio: Vec<ReportRow>,
    pub por_mercado: BTreeMap<String, u64>,
    pub por_modelo: BTreeMap<String, u64>,
}

/// 写出结果
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub output_name: String,
    pub files: Vec<PathBuf>,
}

// ==========================================
// ScheduleExporter - 结果写出器
// ==========================================
pub struct ScheduleExporter {
    output_dir: PathBuf,
    output_name: String,
    renderer: TableRenderer,
}

impl ScheduleExporter {
    /// # 参数
    /// - `output_dir`: 输出目录（不存在时创建）
    /// - `output_name`: 输出名（见 normalize_output_name）
    pub fn new(output_dir: impl Into<PathBuf>, output_name: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            output_name: normalize_output_name(output_name),
            renderer: TableRenderer::new(),
        }
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// 组装 JSON 汇总包
    pub fn bundle(
        &self,
        run_id: &str,
        config: serde_json::Value,
        schedule: &GlobalSchedule,
        reports: &[MonthReport],
    ) -> ExportBundle {
        ExportBundle {
            run_id: run_id.to_string(),
            generated_at: Utc::now(),
            config,
            programacao: self.renderer.schedule_rows(schedule),
            relatorio: self.renderer.report_rows(reports),
            por_mercado: schedule.count_by_market(),
            por_modelo: schedule.count_by_model(),
        }
    }

    /// 写出全部表与 JSON 汇总包
    pub fn write_all(
        &self,
        bundle: &ExportBundle,
        schedule: &GlobalSchedule,
        reports: &[MonthReport],
        raw: &RawTable,
    ) -> ExportResult<ExportSummary> {
        fs::create_dir_all(&self.output_dir).map_err(|e| ExportError::OutputDirError {
            path: self.output_dir.display().to_string(),
            message: e.to_string(),
        })?;

        let tables = [
            self.renderer.schedule_table(schedule),
            self.renderer.report_table(reports),
            self.renderer.raw_table(raw),
            self.renderer.by_market_table(schedule),
            self.renderer.by_model_table(schedule),
        ];

        let mut files = Vec::with_capacity(tables.len() + 1);
        for table in &tables {
            let path = self
                .output_dir
                .join(format!("{}_{}.csv", self.output_name, table.kind.file_suffix()));
            write_table(&path, table)?;
            debug!(path = %path.display(), rows = table.rows.len(), "CSV 写出完成");
            files.push(path);
        }

        let json_path = self.output_dir.join(format!("{}.json", self.output_name));
        let file = File::create(&json_path)?;
        serde_json::to_writer_pretty(file, bundle)?;
        files.push(json_path);

        info!(
            output_dir = %self.output_dir.display(),
            output_name = %self.output_name,
            files = files.len(),
            "排产结果写出完成"
        );

        Ok(ExportSummary {
            output_name: self.output_name.clone(),
            files,
        })
    }
}

fn write_table(path: &Path, table: &Table) -> ExportResult<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
