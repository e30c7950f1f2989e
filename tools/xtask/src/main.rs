//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-animator`: 运行 turn-animator 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `timeline-check`: 检查回放时间线（JSON 格式、批次分类结果）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use clap::{Parser, Subcommand};
use host_cli::{Step, Timeline};
use turn_animator::{ClassifySummary, classify_with_summary};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 运行 turn-animator 覆盖率报告
    CovAnimator,
    /// 运行 workspace 覆盖率报告
    CovWorkspace,
    /// 检查时间线文件
    ///
    /// 不带参数：检查 demos/ 下所有 .json 文件
    TimelineCheck {
        /// 指定文件或目录
        path: Option<PathBuf>,
    },
}

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    match cmd.status() {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Task::CheckAll => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        Task::CovAnimator => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "turn-animator", "--html"]);
            run("cargo llvm-cov -p turn-animator --html", &mut cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Task::CovWorkspace => {
            ensure_cargo_llvm_cov_available()?;

            // 排除 xtask 以免稀释信号
            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "--workspace", "--exclude", "xtask", "--html"]);
            run(
                "cargo llvm-cov --workspace --exclude xtask --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Task::TimelineCheck { path } => timeline_check(path.as_deref())?,
    }

    Ok(())
}

//=============================================================================
// timeline-check 命令实现
//=============================================================================

/// 默认时间线目录（相对于 workspace root）
const DEFAULT_TIMELINE_DIR: &str = "demos";

/// 单个文件的检查结果
#[derive(Default)]
struct TimelineReport {
    turns: usize,
    empty_turns: usize,
    total: ClassifySummary,
}

fn timeline_check(path: Option<&Path>) -> anyhow::Result<()> {
    let root = path.unwrap_or(Path::new(DEFAULT_TIMELINE_DIR));
    if !root.exists() {
        anyhow::bail!(
            "路径不存在: {}\n请在 workspace 根目录运行，或指定时间线路径",
            root.display()
        );
    }

    let files = collect_timeline_files(root);
    if files.is_empty() {
        eprintln!("未找到时间线文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个时间线文件...\n", files.len());

    let mut failures = 0;
    for file in &files {
        match Timeline::load(file) {
            Ok(timeline) => print_report(file, &check_timeline(&timeline)),
            Err(e) => {
                eprintln!("[ERROR] {}: {e:#}", file.display());
                failures += 1;
            }
        }
    }

    eprintln!();
    if failures > 0 {
        anyhow::bail!("{failures} 个时间线文件无效");
    }
    eprintln!("✅ 检查通过，无错误");
    Ok(())
}

fn collect_timeline_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

fn check_timeline(timeline: &Timeline) -> TimelineReport {
    let mut report = TimelineReport::default();

    for step in &timeline.steps {
        let Step::Turn(changes) = step else {
            continue;
        };
        let (_, summary) = classify_with_summary(Some(changes), false);
        report.turns += 1;
        if summary.kept() == 0 {
            report.empty_turns += 1;
        }
        report.total.losses += summary.losses;
        report.total.gains += summary.gains;
        report.total.transforms += summary.transforms;
        report.total.dropped_malformed += summary.dropped_malformed;
        report.total.dropped_equivalent += summary.dropped_equivalent;
    }

    report
}

fn print_report(file: &Path, report: &TimelineReport) {
    let total = &report.total;
    eprintln!(
        "[OK] {}: {} 个回合（{} 个无动画），loss={} gain={} transform={}",
        file.display(),
        report.turns,
        report.empty_turns,
        total.losses,
        total.gains,
        total.transforms,
    );
    if total.dropped_malformed > 0 {
        eprintln!(
            "[WARN] {}: {} 条变更缺少载荷，将被丢弃",
            file.display(),
            total.dropped_malformed
        );
    }
    if total.dropped_equivalent > 0 {
        eprintln!(
            "[INFO] {}: {} 条 transform 无可见变化",
            file.display(),
            total.dropped_equivalent
        );
    }
}
