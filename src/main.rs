use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use slime_search::{
    search_with, DiscMask, Mask, RectMask, SearchArea, SearchOptions, SearchProgress,
    SearchResult, Section, WorldSeed, SECTION_SIZE,
};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::{Duration, Instant};

const DEFAULT_CONFIG: &str = r#"# slime-search 配置 / Configuration

[world]
# 世界种子 / World seed
seed = 0

[search]
# 搜索范围（区块，遮罩左上角）/ search rectangle in chunks (mask top-left corner)
x0 = -1000
z0 = -1000
x1 = 1000
z1 = 1000
# 遮罩内最少史莱姆区块数 / minimum slime chunks under the mask
threshold = 40
# 工作线程数（0 = 每个 CPU 一个）/ worker threads (0 = one per CPU)
workers = 0
# 打印结果条数 / number of results to print
limit = 20

[mask]
# "disc" 或 or "rect"
kind = "disc"
# disc: 半径与排除半径（0 = 不排除）/ radius and exclusion radius (0 = none)
radius = 8
exclusion_radius = 0
# rect: 宽高 / width and height
width = 16
height = 16

[output]
# 打印最佳结果周围的区域 / print the section around the best result
render_best = false
"#;

const BLOCKS_PER_CHUNK: i64 = 16;
const PROGRESS_REFRESH_MS: u64 = 350;

fn main() -> Result<()> {
    let args = CliArgs::parse()?;
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(io::stderr)
        .init();

    if !ensure_config_exists(&args.config_path)? {
        println!(
            "已生成默认配置文件，请编辑后重新运行。\nDefault config created at {}. Please edit it and rerun.",
            args.config_path.display()
        );
        return Ok(());
    }

    let config_text = fs::read_to_string(&args.config_path).with_context(|| {
        format!(
            "无法读取配置 / Failed to read {}",
            args.config_path.display()
        )
    })?;
    let config: AppConfig = toml::from_str(&config_text).with_context(|| {
        format!(
            "无法解析配置 / Failed to parse {}",
            args.config_path.display()
        )
    })?;
    run_search(&config)
}

fn run_search(config: &AppConfig) -> Result<()> {
    let seed = WorldSeed::new(config.world.seed);
    let area = SearchArea::new(
        config.search.x0,
        config.search.z0,
        config.search.x1,
        config.search.z1,
    );
    let mask = config.mask.build();
    let (mask_width, mask_height) = mask.bounds();
    println!(
        "搜索条件 / Criteria: mask {}x{}, threshold ≥ {}",
        mask_width, mask_height, config.search.threshold
    );

    let progress = Arc::new(SearchProgress::new());
    let mut options = SearchOptions::default().with_progress(Arc::clone(&progress));
    if config.search.workers > 0 {
        options = options.with_workers(config.search.workers);
    }

    let start = Instant::now();
    let done = Arc::new(AtomicBool::new(false));
    let progress_handle = {
        let progress = Arc::clone(&progress);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::Relaxed) {
                print!("\r{}", format_progress_line(&progress, start));
                let _ = io::stdout().flush();
                thread::sleep(Duration::from_millis(PROGRESS_REFRESH_MS));
            }
            println!("\r{}", format_progress_line(&progress, start));
        })
    };

    let outcome = search_with(
        seed,
        area,
        config.search.threshold,
        &*mask,
        &options,
    );
    done.store(true, Ordering::Relaxed);
    let _ = progress_handle.join();
    let results = outcome.context("搜索失败 / Search failed")?;

    println!("匹配结果 / Matches: {}", results.len());
    for (rank, result) in results.iter().take(config.search.limit).enumerate() {
        println!("{:>4}. {}", rank + 1, format_result(result));
    }

    if config.output.render_best {
        if let Some(best) = results.first() {
            let mut section = Section::new(
                best.x.wrapping_sub(SECTION_SIZE / 2),
                best.z.wrapping_sub(SECTION_SIZE / 2),
            );
            section.compute(seed);
            let (x, z) = section.origin();
            println!("区域 / Section at {},{}:", x, z);
            print!("{}", section);
        }
    }
    Ok(())
}

fn ensure_config_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(true);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建目录 / Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("无法写入配置 / Failed to write {}", path.display()))?;
    Ok(false)
}

#[derive(Debug)]
struct CliArgs {
    config_path: PathBuf,
    verbose: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut config_path = PathBuf::from("slime-search.toml");
        let mut verbose = false;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-c" | "--config" => {
                    let value = args.next().ok_or_else(|| {
                        anyhow!("--config 需要文件路径 / missing path after --config")
                    })?;
                    config_path = PathBuf::from(value);
                }
                "-v" | "--verbose" => verbose = true,
                "-h" | "--help" => {
                    print_usage();
                    process::exit(0);
                }
                unknown => {
                    return Err(anyhow!("未知参数 / Unknown argument: {}", unknown));
                }
            }
        }
        Ok(Self {
            config_path,
            verbose,
        })
    }
}

fn print_usage() {
    println!(
        "slime-search\n\
        用法 Usage:\n  slime-search [--config slime-search.toml] [--verbose]\n\n\
        --config, -c   指定配置文件 / specify config file\n\
        --verbose, -v  输出调试日志 / debug logging\n\
        --help, -h     显示帮助 / show help"
    );
}

#[derive(Debug, Deserialize)]
struct AppConfig {
    #[serde(default)]
    world: WorldConfig,
    #[serde(default)]
    search: SearchConfig,
    #[serde(default)]
    mask: MaskConfig,
    #[serde(default)]
    output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct WorldConfig {
    seed: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct SearchConfig {
    x0: i32,
    z0: i32,
    x1: i32,
    z1: i32,
    threshold: u32,
    workers: usize,
    limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            x0: -1000,
            z0: -1000,
            x1: 1000,
            z1: 1000,
            threshold: 40,
            workers: 0,
            limit: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MaskKind {
    Disc,
    Rect,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct MaskConfig {
    kind: MaskKind,
    radius: i32,
    exclusion_radius: i32,
    width: i32,
    height: i32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            kind: MaskKind::Disc,
            radius: 8,
            exclusion_radius: 0,
            width: 16,
            height: 16,
        }
    }
}

impl MaskConfig {
    fn build(&self) -> Box<dyn Mask> {
        match self.kind {
            MaskKind::Disc => {
                let disc = DiscMask::new(self.radius);
                if self.exclusion_radius > 0 {
                    Box::new(disc.with_exclusion(self.exclusion_radius))
                } else {
                    Box::new(disc)
                }
            }
            MaskKind::Rect => Box::new(RectMask::new(self.width, self.height)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct OutputConfig {
    render_best: bool,
}

fn format_result(result: &SearchResult) -> String {
    let block_x = i64::from(result.x) * BLOCKS_PER_CHUNK + BLOCKS_PER_CHUNK / 2;
    let block_z = i64::from(result.z) * BLOCKS_PER_CHUNK + BLOCKS_PER_CHUNK / 2;
    format!(
        "{} @ chunk {},{} (block {},{})",
        result.count, result.x, result.z, block_x, block_z
    )
}

fn format_progress_line(progress: &SearchProgress, start: Instant) -> String {
    let total = progress.sections_total();
    if total == 0 {
        return "尚未开始 / No work scheduled".to_string();
    }
    let completed = progress.sections_done().min(total);
    let elapsed = start.elapsed();
    let remaining = if completed > 0 {
        let secs_per = elapsed.as_secs_f64() / completed as f64;
        format_duration(Duration::from_secs_f64(
            (total - completed) as f64 * secs_per,
        ))
    } else {
        "--:--:--".to_string()
    };
    format!(
        "{:>6.2}% | 匹配 matches: {} | 区域 sections: {}/{} | 已用 elapsed: {} | 剩余 remaining: {}",
        progress.fraction() * 100.0,
        progress.matches(),
        completed,
        total,
        format_duration(elapsed),
        remaining
    )
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.world.seed, 0);
        assert_eq!(config.search.threshold, 40);
        assert_eq!(config.mask.kind, MaskKind::Disc);
        assert_eq!(config.mask.build().bounds(), (17, 17));
        assert!(!config.output.render_best);
    }

    #[test]
    fn missing_tables_use_defaults() {
        let config: AppConfig = toml::from_str("[mask]\nkind = \"rect\"\nwidth = 5\n").unwrap();
        assert_eq!(config.mask.build().bounds(), (5, 16));
        assert_eq!(config.search.limit, 20);
    }

    #[test]
    fn unknown_mask_kind_rejected() {
        assert!(toml::from_str::<AppConfig>("[mask]\nkind = \"star\"\n").is_err());
    }

    #[test]
    fn result_line_shows_block_centre() {
        let line = format_result(&SearchResult::new(12, -3, 4));
        assert_eq!(line, "12 @ chunk -3,4 (block -40,72)");
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::from_secs(3725)), "01:02:05");
    }
}
