// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成需求/假日样例 CSV 文件
// 输出: tests/fixtures/datasets/*.csv
// ==========================================

use csv::Writer;
use std::error::Error;
use std::fs::{self, File};

const OUTPUT_DIR: &str = "tests/fixtures/datasets";

// 标识列 + 2026 下半年月份列（葡语缩写）
const CSV_HEADER: &[&str] = &[
    "MODELO", "PRODUTO", "MERCADO", "jul/26", "ago/26", "set/26", "out/26", "nov/26", "dez/26",
];

const MODELS: [&str; 4] = ["ONIX", "TRACKER", "SPIN", "MONTANA"];
const MARKETS: [&str; 4] = ["MERCADO INTERNO", "ARGENTINA", "CHILE", "URUGUAI"];

// 需求记录结构
#[derive(Clone)]
struct DemandRecord {
    model: String,
    product: String,
    market: String,
    quantities: [String; 6],
}

impl DemandRecord {
    fn to_row(&self) -> Vec<String> {
        let mut row = vec![self.model.clone(), self.product.clone(), self.market.clone()];
        row.extend(self.quantities.iter().cloned());
        row
    }
}

// 生成正常需求记录（数量确定性变化）
fn generate_normal_record(index: usize) -> DemandRecord {
    let model = MODELS[index % MODELS.len()];
    let quantities = std::array::from_fn(|month| {
        format!("{}", 5 + (index * 17 + month * 11) % 60)
    });

    DemandRecord {
        model: model.to_string(),
        product: format!("{}-{:03}", model, index + 1),
        market: MARKETS[(index / MODELS.len()) % MARKETS.len()].to_string(),
        quantities,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("开始生成测试数据集...");
    fs::create_dir_all(OUTPUT_DIR)?;

    // 1. 正常数据 (40行)
    generate_normal_data()?;

    // 2. 需要周六加班的数据
    generate_overflow_data()?;

    // 3. 重复键 + 空行 + 缺失月份值
    generate_edge_cases()?;

    // 4. 数量格式错误
    generate_invalid_quantities()?;

    // 5. 缺少必需列
    generate_missing_columns()?;

    // 6. 假日列表
    generate_holidays()?;

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}

fn writer_for(name: &str) -> Result<Writer<File>, Box<dyn Error>> {
    let file = File::create(format!("{}/{}", OUTPUT_DIR, name))?;
    Ok(Writer::from_writer(file))
}

fn generate_normal_data() -> Result<(), Box<dyn Error>> {
    let mut wtr = writer_for("01_normal_demand.csv")?;
    wtr.write_record(CSV_HEADER)?;

    for i in 0..40 {
        wtr.write_record(&generate_normal_record(i).to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 01_normal_demand.csv (40行)");
    Ok(())
}

fn generate_overflow_data() -> Result<(), Box<dyn Error>> {
    let mut wtr = writer_for("02_overflow_demand.csv")?;
    wtr.write_record(CSV_HEADER)?;

    // 8 月 21 个工作日 × 50 = 1050; 合计 1200 → 周六加班 150
    for i in 0..4 {
        let mut record = generate_normal_record(i + 100);
        record.quantities = ["0", "300", "0", "0", "0", "0"].map(String::from);
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 02_overflow_demand.csv (4行，8月需周六)");
    Ok(())
}

fn generate_edge_cases() -> Result<(), Box<dyn Error>> {
    let mut wtr = writer_for("03_edge_cases.csv")?;
    wtr.write_record(CSV_HEADER)?;

    // 同一键拆成两行（聚合时合并）
    let record = generate_normal_record(200);
    wtr.write_record(&record.to_row())?;
    wtr.write_record(&record.to_row())?;

    // 全空行（导入时跳过）
    wtr.write_record(vec![""; CSV_HEADER.len()])?;

    // 部分月份为空（按 0 计）
    let mut sparse = generate_normal_record(201);
    sparse.quantities[1] = "".to_string();
    sparse.quantities[4] = "".to_string();
    wtr.write_record(&sparse.to_row())?;

    // 标识列带空白（导入时 trim）
    let mut padded = generate_normal_record(202);
    padded.product = format!("  {}  ", padded.product);
    wtr.write_record(&padded.to_row())?;

    wtr.flush()?;
    println!("✓ 生成 03_edge_cases.csv (5行，边界情况)");
    Ok(())
}

fn generate_invalid_quantities() -> Result<(), Box<dyn Error>> {
    let mut wtr = writer_for("04_invalid_quantities.csv")?;
    wtr.write_record(CSV_HEADER)?;

    for (i, bad) in ["abc", "2.5", "-3"].iter().enumerate() {
        let mut record = generate_normal_record(i + 300);
        record.quantities[0] = bad.to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 整值浮点写法（合法）
    let mut whole = generate_normal_record(303);
    whole.quantities[0] = "12.0".to_string();
    wtr.write_record(&whole.to_row())?;

    wtr.flush()?;
    println!("✓ 生成 04_invalid_quantities.csv (4行，3个异常数量)");
    Ok(())
}

fn generate_missing_columns() -> Result<(), Box<dyn Error>> {
    let mut wtr = writer_for("05_missing_columns.csv")?;
    wtr.write_record(["PRODUTO", "jul/26"])?;
    wtr.write_record(["ONIX-001", "10"])?;

    wtr.flush()?;
    println!("✓ 生成 05_missing_columns.csv (缺少 MODELO/MERCADO)");
    Ok(())
}

fn generate_holidays() -> Result<(), Box<dyn Error>> {
    let mut wtr = writer_for("06_holidays.csv")?;
    wtr.write_record(["data", "descricao"])?;

    let holidays = [
        ("2026-09-07", "Independencia"),
        ("12/10/2026", "Nossa Senhora Aparecida"),
        ("2026-11-02", "Finados"),
        ("2026-11-20", "Consciencia Negra"),
        ("2026-12-25", "Natal"),
    ];
    for (day, name) in holidays {
        wtr.write_record([day, name])?;
    }

    wtr.flush()?;
    println!("✓ 生成 06_holidays.csv (5个假日)");
    Ok(())
}
