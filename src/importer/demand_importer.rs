// ==========================================
// 月度均衡排产系统 - 需求导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到需求行
// 流程: 解析 → 必需列校验 → 月份列解析 → 数量清洗
// ==========================================

use crate::domain::types::YearMonth;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{DemandImporter, FileParser, ImportedDemand};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

// ==========================================
// DemandImporterImpl - 需求导入器实现
// ==========================================
pub struct DemandImporterImpl {
    file_parser: Box<dyn FileParser>,
    field_mapper: FieldMapper,
}

impl DemandImporterImpl {
    /// 创建导入器
    ///
    /// # 参数
    /// - file_parser: 文件解析器
    /// - field_mapper: 字段映射器
    pub fn new(file_parser: Box<dyn FileParser>, field_mapper: FieldMapper) -> Self {
        Self {
            file_parser,
            field_mapper,
        }
    }

    /// 按工作表名与数量严格性创建默认导入器
    pub fn with_options(sheet_name: &str, strict_quantities: bool) -> Self {
        Self::new(
            Box::new(UniversalFileParser::new(sheet_name)),
            FieldMapper::new(DataCleaner::new(strict_quantities)),
        )
    }
}

impl DemandImporter for DemandImporterImpl {
    #[instrument(skip(self, file_path, months), fields(path = %file_path.display()))]
    fn import_from_file(
        &self,
        file_path: &Path,
        months: &[YearMonth],
    ) -> ImportResult<ImportedDemand> {
        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let raw = self.file_parser.parse_to_raw_table(file_path)?;
        info!(
            columns = raw.headers.len(),
            rows = raw.records.len(),
            "文件解析完成"
        );

        // === 步骤 2: 必需列校验 ===
        debug!("步骤 2: 必需列校验");
        self.field_mapper.validate_schema(&raw)?;

        // === 步骤 3: 月份列解析 ===
        debug!("步骤 3: 月份列解析");
        let month_columns = self.field_mapper.resolve_month_columns(&raw.headers, months);
        for (month, column) in month_columns.iter() {
            match column {
                Some(col) => info!(month = %month, column = col, "月份列映射"),
                None => warn!(month = %month, "未找到月份列,需求按 0 计"),
            }
        }

        // === 步骤 4: 字段映射 + 数量清洗 ===
        debug!("步骤 4: 字段映射与数量清洗");
        let mut rows = Vec::with_capacity(raw.records.len());
        let mut coerced_cells = 0usize;
        for record in &raw.records {
            let (row, coerced) = self.field_mapper.map_to_demand_row(record, &month_columns)?;
            coerced_cells += coerced;
            rows.push(row);
        }

        let imported = ImportedDemand {
            raw,
            rows,
            month_columns,
            coerced_cells,
        };

        for month in months {
            info!(month = %month, total = imported.month_total(*month), "月度需求读取");
        }
        if coerced_cells > 0 {
            warn!(coerced_cells, "存在被归零的异常数量单元格");
        }

        Ok(imported)
    }
}
