// ==========================================
// 月度均衡排产系统 - 命令行入口
// ==========================================
// 子命令:
// - generate: 导入需求 → 排产 → 写出 CSV/JSON
// - months:   仅输出月份列映射诊断
// 任一错误: 输出提示并以退出码 1 结束
// ==========================================

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use production_leveling_aps::api::{ApiError, GenerateRequest, ScheduleApi};
use production_leveling_aps::config::{config_keys, ConfigManager};
use production_leveling_aps::i18n::{self, t, t_with_args};
use production_leveling_aps::logging::{self, LogFormat};
use production_leveling_aps::YearMonth;
use std::path::PathBuf;

/// 月度均衡排产: 将月度需求按件分配到每日产能
#[derive(Debug, Parser)]
#[command(name = "production-leveling-aps", version, about)]
struct Cli {
    /// 界面语言 (pt-BR / en / zh-CN)
    #[arg(long, global = true, env = "APS_LOCALE", default_value = "pt-BR")]
    locale: String,

    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 生成排产并写出结果
    Generate(GenerateArgs),
    /// 输出月份列映射与各月需求合计（不排产）
    Months(InputArgs),
}

/// 需求输入与周期参数
#[derive(Debug, Args)]
struct InputArgs {
    /// 需求文件 (.xlsx/.xls/.csv)
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Excel 工作表名
    #[arg(long, default_value = "Planilha1")]
    sheet: String,

    /// 起始月份 (YYYY-MM)
    #[arg(long, default_value = "2026-07")]
    start: YearMonth,

    /// 结束月份 (YYYY-MM)
    #[arg(long, default_value = "2026-12")]
    end: YearMonth,

    /// 假日文本（每行一个日期，';' 亦可分隔）
    #[arg(long)]
    holidays_text: Option<String>,

    /// 假日文本文件
    #[arg(long)]
    holidays_file: Option<PathBuf>,

    /// 假日 CSV（读取 data 列）
    #[arg(long)]
    holidays_csv: Option<PathBuf>,

    /// 配置文件 (JSON 键值对)
    #[arg(long, short = 'c', env = "APS_CONFIG")]
    config: Option<PathBuf>,

    /// 异常数量单元格按 0 处理（默认报错）
    #[arg(long)]
    lenient_quantities: bool,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// 工作日日产能
    #[arg(long)]
    daily_capacity: Option<u64>,

    /// 周六产能上限
    #[arg(long)]
    saturday_cap: Option<u64>,

    /// 提前生产的工作日数
    #[arg(long)]
    lookback: Option<u64>,

    /// 单车型日上限（0 表示不限）
    #[arg(long)]
    per_model_cap: Option<u64>,

    /// 输出目录
    #[arg(long, short = 'o', default_value = ".")]
    output_dir: PathBuf,

    /// 输出文件名（扩展名会被去掉）
    #[arg(long, default_value = "programacao_2S2026_balanceada")]
    output_name: String,
}

impl InputArgs {
    fn config_manager(&self) -> Result<ConfigManager> {
        let mut manager = match &self.config {
            Some(path) => ConfigManager::from_file(path)
                .with_context(|| format!("读取配置文件失败: {}", path.display()))?,
            None => ConfigManager::new(),
        };
        if self.lenient_quantities {
            manager.set(config_keys::STRICT_QUANTITIES, "false");
        }
        Ok(manager)
    }

    fn request(&self) -> GenerateRequest {
        let mut request = GenerateRequest::new(self.input.clone());
        request.sheet_name = self.sheet.clone();
        request.start = self.start;
        request.end = self.end;
        request.holidays_text = self.holidays_text.clone();
        request.holidays_file = self.holidays_file.clone();
        request.holidays_csv = self.holidays_csv.clone();
        request
    }
}

impl GenerateArgs {
    fn config_manager(&self) -> Result<ConfigManager> {
        let mut manager = self.input.config_manager()?;
        // 命令行参数覆盖配置文件
        let overrides = [
            (config_keys::DAILY_CAPACITY, self.daily_capacity),
            (config_keys::SATURDAY_CAP, self.saturday_cap),
            (config_keys::LOOKBACK_BUSINESS_DAYS, self.lookback),
            (config_keys::PER_MODEL_DAILY_CAP, self.per_model_cap),
        ];
        for (key, value) in overrides {
            if let Some(v) = value {
                manager.set(key, v.to_string());
            }
        }
        Ok(manager)
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let api = ScheduleApi::new(args.config_manager()?);
    let mut request = args.input.request();
    request.output_dir = args.output_dir.clone();
    request.output_name = args.output_name.clone();

    let response = api.generate(&request)?;

    println!("{}", t_with_args("cli.generate.success", &[("run_id", &response.run_id)]));
    println!(
        "{}",
        t_with_args(
            "cli.generate.units",
            &[
                ("units", &response.total_units.to_string()),
                ("saturday", &response.total_saturday_units.to_string()),
                ("months", &response.months.to_string()),
            ],
        )
    );
    println!(
        "{}",
        t_with_args("cli.generate.files", &[("dir", &args.output_dir.display().to_string())])
    );
    for file in &response.export.files {
        println!("  {}", file.display());
    }
    Ok(())
}

fn run_months(args: InputArgs) -> Result<()> {
    let api = ScheduleApi::new(args.config_manager()?);
    let report = api.inspect_months(&args.request())?;

    println!("{}", t("cli.months.title"));
    for mapping in &report.months {
        let column = mapping
            .column
            .clone()
            .unwrap_or_else(|| t("cli.months.not_found"));
        println!(
            "  {}",
            t_with_args(
                "cli.months.row",
                &[
                    ("label", &mapping.label),
                    ("column", &column),
                    ("total", &mapping.total.to_string()),
                ],
            )
        );
    }
    println!(
        "{}",
        t_with_args("cli.months.total", &[("total", &report.total_demand.to_string())])
    );

    let holidays = if report.holidays.is_empty() {
        t("common.none")
    } else {
        report
            .holidays
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("{}", t_with_args("cli.months.holidays", &[("holidays", &holidays)]));
    if report.coerced_cells > 0 {
        println!(
            "{}",
            t_with_args("cli.months.coerced", &[("count", &report.coerced_cells.to_string())])
        );
    }
    Ok(())
}

fn print_error(err: &anyhow::Error) {
    eprintln!("{}", t_with_args("cli.error", &[("message", &format!("{:#}", err))]));
    if err
        .downcast_ref::<ApiError>()
        .is_some_and(ApiError::is_schema_error)
    {
        eprintln!("{}", t("cli.schema_hint"));
    }
}

fn main() {
    let cli = Cli::parse();

    logging::init_with_format(if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    });
    if !i18n::set_locale(&cli.locale) {
        tracing::warn!(locale = %cli.locale, "不支持的语言,使用默认语言");
    }

    tracing::info!(version = production_leveling_aps::VERSION, "{}", production_leveling_aps::APP_NAME);

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Months(args) => run_months(args),
    };

    if let Err(e) = result {
        print_error(&e);
        std::process::exit(1);
    }
}
