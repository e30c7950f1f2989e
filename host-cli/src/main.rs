//! # turn-replay
//!
//! 回放回合时间线（或单个回合批次），以文本形式输出物品变更动画的每一帧。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p host-cli -- demos/turn.json
//! cargo run -p host-cli -- demos/turn.json --hold-ms 800 --realtime
//! cargo run -p host-cli -- demos/batch.json
//! cargo run -p host-cli -- demos/turn.json --config animator.json --log-level debug
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use host_cli::logging::{LogLevel, init_logging};
use host_cli::{Session, SessionOptions, Timeline};
use turn_animator::AnimatorConfig;

#[derive(Parser)]
#[command(name = "turn-replay")]
#[command(about = "回放回合时间线并以文本渲染物品变更动画")]
#[command(version)]
struct Cli {
    /// 时间线 JSON 文件（也可以是单个回合批次）
    timeline: PathBuf,

    /// 配置文件（不存在时使用默认配置）
    #[arg(short, long, default_value = "animator.json")]
    config: PathBuf,

    /// 覆盖出现 / 消失过渡时长（毫秒）
    #[arg(long)]
    transition_ms: Option<u64>,

    /// 覆盖停留时长（毫秒）
    #[arg(long)]
    hold_ms: Option<u64>,

    /// 每帧推进的虚拟时间（毫秒）
    #[arg(long, default_value = "16")]
    frame_ms: u64,

    /// 按真实时间节奏回放
    #[arg(long)]
    realtime: bool,

    /// 日志级别（默认读取 ANIMATOR_LOG）
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    if let Err(e) = real_main(cli) {
        eprintln!("turn-replay error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    let mut config = AnimatorConfig::load(&cli.config);
    if let Some(ms) = cli.transition_ms {
        config.transition_ms = ms;
    }
    if let Some(ms) = cli.hold_ms {
        config.hold_ms = ms;
    }
    config.validate().context("动画器配置无效")?;

    if cli.frame_ms == 0 {
        anyhow::bail!("--frame-ms 必须大于 0");
    }

    let timeline = Timeline::load(&cli.timeline)?;
    let options = SessionOptions {
        frame: Duration::from_millis(cli.frame_ms),
        realtime: cli.realtime,
    };

    let report = Session::new(&config, options).run(&timeline);

    for line in &report.frames {
        println!("{line}");
    }
    println!();
    println!(
        "elapsed={}ms waits={}ms completed={} dropped={} batches={} skipped={} interrupted={}",
        report.elapsed.as_millis(),
        timeline.total_wait_ms(),
        report.stats.entries_completed,
        report.stats.entries_dropped,
        report.stats.batches_completed,
        report.stats.batches_skipped,
        report.stats.batches_interrupted,
    );

    Ok(())
}
