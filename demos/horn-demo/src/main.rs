//! # Horn Demo 应用程序
//!
//! 启动容器，实例化所有喇叭和车辆服务并输出各自的鸣笛结果。

use clap::Parser;
use horn_demo::{component_table, Car, CarService, HornAir, HornDemo, TruckService};
use infrastructure_common::InfrastructureResult;
use infrastructure_composition::{
    ApplicationContext, ContainerBootstrapBuilder, ContainerSettings, LoggingConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{error, info};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "horn-demo")]
#[command(about = "Lorn IoC 喇叭示例")]
struct Args {
    /// 配置文件路径（TOML），不指定时使用 config/ioc.toml（可以不存在）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("启动失败: {}", e);
            eprintln!("horn-demo 启动失败: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> InfrastructureResult<()> {
    let settings = match &args.config {
        Some(path) => ContainerSettings::from_file(path)?,
        None => ContainerSettings::load()?,
    };

    let mut builder = ContainerBootstrapBuilder::new().with_settings(&settings)?;
    if !settings.logging.enabled {
        builder = builder.with_logging(logging_config(&args.log_level));
    }

    let context = builder
        .scan_inventory()
        .with_components(component_table())
        .bootstrap::<HornDemo>()
        .await?;

    report(&context)
}

fn logging_config(level: &str) -> LoggingConfig {
    let level = tracing::Level::from_str(level).unwrap_or(tracing::Level::INFO);
    LoggingConfig {
        level,
        ..LoggingConfig::default()
    }
}

fn report(context: &ApplicationContext) -> InfrastructureResult<()> {
    let summary = context.report();
    info!(
        "已启动 {} 个组件, 耗时 {:?}",
        summary.materialized, summary.elapsed
    );

    let air = context.resolve::<HornAir>()?;
    info!("气喇叭已初始化: {}", air.is_initialized());

    let car = context.resolve::<Car>()?;
    car.odometer().increment();
    println!("Car: {}", car.last_honk().unwrap_or("-"));

    let truck = context.resolve::<TruckService>()?;
    truck.odometer().increment();
    println!("TruckService: {}", truck.last_honk().unwrap_or("-"));

    let car_service = context.resolve::<CarService>()?;
    car_service.odometer().increment();
    println!("CarService: {}", car_service.last_honk().unwrap_or("-"));

    Ok(())
}
