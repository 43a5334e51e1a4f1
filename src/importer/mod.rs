// ==========================================
// 月度均衡排产系统 - 导入层
// ==========================================
// 职责: 外部数据导入,向引擎提供已解析的 (年, 月) 需求
// 支持: Excel, CSV; 假日文本 / CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod demand_importer;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod holiday_parser;
pub mod importer_trait;

// 重导出核心类型
pub use data_cleaner::{DataCleaner, ParsedQuantity};
pub use demand_importer::DemandImporterImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, MonthColumnMap, REQUIRED_COLUMNS};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser, DEFAULT_SHEET_NAME};
pub use holiday_parser::HolidayParser;

// 重导出 Trait 接口
pub use importer_trait::{DemandImporter, FileParser, ImportedDemand};
