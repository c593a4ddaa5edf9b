//! 직물 물성 예측 CLI

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fabric_props::core::run_batch;
use fabric_props::{DomainPolicy, FabricPredictor, FabricSpecification, PredictorConfig, WeaveType};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(name = "fabric-props", version, about = "직물 사양으로 9가지 물성 예측")]
struct Cli {
    /// JSON 설정 파일
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 아티팩트 디렉토리 (설정 파일보다 우선)
    #[arg(long, global = true, value_name = "DIR")]
    artifacts: Option<PathBuf>,

    /// 학습 도메인 범위 밖 값도 경고만 남기고 예측
    #[arg(long, global = true)]
    pass_through_bounds: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 사양 하나 예측
    Predict(PredictArgs),
    /// CSV 파일 일괄 예측
    Batch {
        #[arg(long, value_name = "CSV")]
        input: PathBuf,
        /// 생략하면 표준 출력
        #[arg(long, value_name = "CSV")]
        output: Option<PathBuf>,
    },
    /// 로드된 아티팩트 정보
    Inspect {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[arg(long, default_value_t = 30.0)]
    warp_count: f64,
    #[arg(long, default_value_t = 20.0)]
    weft_count: f64,
    #[arg(long, default_value_t = 60.0)]
    epi: f64,
    #[arg(long, default_value_t = 55.0)]
    ppi: f64,
    #[arg(long, default_value_t = 200.0)]
    gsm: f64,
    /// Plain, Twill, Satin, Broken Twill, Others
    #[arg(long, default_value = "Plain")]
    weave_type: String,
    /// JSON으로 출력
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ 오류: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let predictor = FabricPredictor::load(&config).with_context(|| {
        format!("아티팩트를 로드할 수 없습니다: {}", config.artifact_dir.display())
    })?;

    match cli.command {
        Command::Predict(args) => handle_predict(&predictor, &args),
        Command::Batch { input, output } => handle_batch(&predictor, &input, output.as_deref()),
        Command::Inspect { json } => handle_inspect(&predictor, json),
    }
}

/// 설정 파일 → CLI 플래그 순으로 덮어쓰기
fn resolve_config(cli: &Cli) -> Result<PredictorConfig> {
    let mut config = match &cli.config {
        Some(path) => PredictorConfig::from_file(path)?,
        None => PredictorConfig::default(),
    };
    if let Some(dir) = &cli.artifacts {
        config.artifact_dir = dir.clone();
    }
    if cli.pass_through_bounds {
        config.domain_policy = DomainPolicy::PassThrough;
    }
    Ok(config)
}

fn handle_predict(predictor: &FabricPredictor, args: &PredictArgs) -> Result<()> {
    let weave_type: WeaveType = args.weave_type.parse()?;
    let spec = FabricSpecification::new(
        args.warp_count,
        args.weft_count,
        args.epi,
        args.ppi,
        args.gsm,
        weave_type,
    );

    let prediction = predictor
        .predict_properties(&spec)
        .context("예측 실패")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
    } else {
        print!("{prediction}");
    }
    Ok(())
}

fn handle_batch(
    predictor: &FabricPredictor,
    input: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let reader = File::open(input)
        .with_context(|| format!("입력 파일을 열 수 없습니다: {}", input.display()))?;
    let reader = BufReader::new(reader);

    let report = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("출력 파일을 만들 수 없습니다: {}", path.display()))?;
            run_batch(predictor, reader, BufWriter::new(file))?
        }
        None => run_batch(predictor, reader, io::stdout().lock())?,
    };

    eprintln!(
        "✅ {}행 처리: 성공 {}, 실패 {}",
        report.total, report.succeeded, report.failed
    );
    Ok(())
}

fn handle_inspect(predictor: &FabricPredictor, json: bool) -> Result<()> {
    let summary = predictor.describe();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("pipeline:   {}", summary.pipeline_id);
    println!("model:      {}", summary.model_kind);
    println!("features:   {}", summary.feature_width);
    for name in &summary.feature_names {
        println!("  - {name}");
    }
    println!("weaves:     {}", summary.weave_vocabulary.join(", "));
    println!("bounds:     {:?}", summary.domain_policy);
    Ok(())
}
