// ==========================================
// 月度均衡排产系统 - 导出层
// ==========================================
// 职责: 将全局排产序列与月度报表渲染为表格并写出
// 输出: CSV（每表一个文件）+ JSON 汇总包
// ==========================================

pub mod error;
pub mod tables;
pub mod writer;

pub use error::{ExportError, ExportResult};
pub use tables::{ReportRow, ScheduleRow, Table, TableKind, TableRenderer};
pub use writer::{normalize_output_name, ExportBundle, ExportSummary, ScheduleExporter, DEFAULT_OUTPUT_NAME};
