// ==========================================
// 需求导入集成测试
// ==========================================
// 职责: 验证 CSV 需求导入 → 聚合 的完整链路,以及假日文件解析
// ==========================================


use production_leveling_aps::domain::DemandKey;
use production_leveling_aps::engine::DemandAggregator;
use production_leveling_aps::importer::{DemandImporter, DemandImporterImpl, HolidayParser, ImportError};
use std::io::Write;
use test_helpers::*;

const SAMPLE_CSV: &str = "\
MODELO,PRODUTO,MERCADO,JUL/26,Ago/2026,set/26,Observacao
M1,P1,MERCADO INTERNO,10,5,,linha 1
M1,P1,MERCADO INTERNO,4,0,3,duplicada
M2, P2 ,ARGENTINA,7,8,9,
,,,,,,
M1,P3,CHILE,0,0,0,zerada
";

#[test]
fn test_csv_import_then_aggregate() {
    let file = write_demand_csv(SAMPLE_CSV);
    let months = vec![ym(2026, 7), ym(2026, 8), ym(2026, 9)];

    let imported = DemandImporterImpl::with_options("Planilha1", true)
        .import_from_file(file.path(), &months)
        .unwrap();

    // 全空行被跳过
    assert_eq!(imported.rows.len(), 4);
    assert_eq!(imported.raw.records.len(), 4);
    assert_eq!(imported.coerced_cells, 0);
    assert_eq!(imported.month_columns.column(ym(2026, 7)), Some("JUL/26"));
    assert_eq!(imported.month_columns.column(ym(2026, 8)), Some("Ago/2026"));
    assert_eq!(imported.month_total(ym(2026, 7)), 21);

    let demand = DemandAggregator::new().aggregate(&imported.rows, &months).unwrap();

    // 重复键合并; 标识列已 trim; 零需求键保留在输出中
    let jul = demand.lines(ym(2026, 7));
    assert_eq!(jul.len(), 3);
    assert_eq!(jul[0].key, DemandKey::new("P1", DOMESTIC, "M1"));
    assert_eq!(jul[0].monthly_qty, 14);
    assert_eq!(jul[1].key, DemandKey::new("P2", "ARGENTINA", "M2"));
    assert_eq!(jul[1].monthly_qty, 7);
    assert_eq!(jul[2].key, DemandKey::new("P3", "CHILE", "M1"));
    assert_eq!(jul[2].monthly_qty, 0);

    assert_eq!(demand.total(ym(2026, 8)), 13);
    assert_eq!(demand.total(ym(2026, 9)), 12);
}

#[test]
fn test_month_without_column_counts_as_zero() {
    let file = write_demand_csv(SAMPLE_CSV);
    let months = vec![ym(2026, 9), ym(2026, 10)];

    let imported = DemandImporterImpl::with_options("Planilha1", true)
        .import_from_file(file.path(), &months)
        .unwrap();

    assert_eq!(imported.month_columns.missing(), vec![ym(2026, 10)]);
    assert_eq!(imported.month_total(ym(2026, 10)), 0);

    let demand = DemandAggregator::new().aggregate(&imported.rows, &months).unwrap();
    assert_eq!(demand.total(ym(2026, 10)), 0);
    assert!(demand.lines(ym(2026, 10)).iter().all(|l| l.monthly_qty == 0));
}

#[test]
fn test_missing_columns_listed_together() {
    let file = write_demand_csv("PRODUTO,JUL/26\nP1,10\n");

    let err = DemandImporterImpl::with_options("Planilha1", true)
        .import_from_file(file.path(), &[ym(2026, 7)])
        .unwrap_err();

    match err {
        ImportError::MissingRequiredField(cols) => {
            assert_eq!(cols, vec!["MODELO".to_string(), "MERCADO".to_string()]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_fractional_quantity_rejected_in_strict_mode() {
    let file = write_demand_csv("MODELO,PRODUTO,MERCADO,jul/26\nM1,P1,CHILE,2.5\n");

    let err = DemandImporterImpl::with_options("Planilha1", true)
        .import_from_file(file.path(), &[ym(2026, 7)])
        .unwrap_err();
    assert!(matches!(err, ImportError::MalformedQuantity { row: 2, .. }));

    let imported = DemandImporterImpl::with_options("Planilha1", false)
        .import_from_file(file.path(), &[ym(2026, 7)])
        .unwrap();
    assert_eq!(imported.coerced_cells, 1);
    assert_eq!(imported.month_total(ym(2026, 7)), 0);
}

#[test]
fn test_missing_file_reported() {
    let err = DemandImporterImpl::with_options("Planilha1", true)
        .import_from_file(std::path::Path::new("/nao/existe/demanda.csv"), &[ym(2026, 7)])
        .unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));
}

#[test]
fn test_holiday_csv_and_text_file() {
    let parser = HolidayParser::new();

    let mut csv_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(csv_file, "data,descricao\n2026-09-07,Independencia\n12/10/2026,Padroeira\nxx,invalida\n").unwrap();
    csv_file.flush().unwrap();

    let from_csv = parser.parse_csv_file(csv_file.path()).unwrap();
    assert_eq!(
        from_csv.into_iter().collect::<Vec<_>>(),
        vec![date(2026, 9, 7), date(2026, 10, 12)]
    );

    let mut text_file = tempfile::NamedTempFile::new().unwrap();
    write!(text_file, "2026-11-02\n\n2026-12-25; 2026-11-02\n").unwrap();
    text_file.flush().unwrap();

    let from_text = parser.parse_text_file(text_file.path()).unwrap();
    assert_eq!(
        from_text.into_iter().collect::<Vec<_>>(),
        vec![date(2026, 11, 2), date(2026, 12, 25)]
    );
}

#[test]
fn test_holiday_csv_without_data_column_is_empty() {
    let parser = HolidayParser::new();
    let mut csv_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(csv_file, "dia\n2026-09-07\n").unwrap();
    csv_file.flush().unwrap();

    assert!(parser.parse_csv_file(csv_file.path()).unwrap().is_empty());
}
