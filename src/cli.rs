use crate::{
    adapters::ToolSpec,
    attachment::Attachment,
    config::Config,
    dispatch::Dispatcher,
    external,
    report::ConversionReport,
    util::{ensure_dir, now_rfc3339},
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_CONFIG: &str = "attachment-html.toml";

#[derive(Parser, Debug)]
#[command(name = "attachment-html")]
#[command(about = "Convert text, PDF and RTF attachments into wrapped HTML documents")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./attachment-html.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the external converters can be launched.
    Doctor {},
    /// List the content types the dispatcher accepts.
    Formats {},
    Convert {
        #[arg(long)]
        input: PathBuf,
        /// MIME type; guessed from the extension when omitted.
        #[arg(long)]
        content_type: Option<String>,
        /// Title of the generated page; defaults to the input file name.
        #[arg(long)]
        filename: Option<String>,
        /// Write HTML here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Doctor {} => doctor(&cfg),
        Command::Formats {} => formats(&cfg),
        Command::Convert {
            input,
            content_type,
            filename,
            out,
        } => convert(
            &cfg,
            input,
            content_type.as_deref(),
            filename.as_deref(),
            out.as_deref(),
        ),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from(DEFAULT_CONFIG);
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the converted HTML, so log lines go to stderr.
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = match resolve_log_path(cfg) {
        Some(path) => {
            let parent = path.parent().unwrap_or_else(|| Path::new("."));
            ensure_dir(parent)?;
            let file = std::fs::File::create(&path)
                .with_context(|| format!("create log file: {}", path.display()))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(PathBuf::from("attachment-html.log"))
}

#[derive(Debug, Serialize)]
struct ToolDiag {
    tool: &'static str,
    program: String,
    ok: bool,
    error: Option<String>,
}

fn doctor(cfg: &Config) -> Result<()> {
    let dispatcher = Dispatcher::from_config(cfg);
    let options = dispatcher.options();
    let probes = [
        ("pdftohtml", &options.pdftohtml, "-v"),
        ("unrtf", &options.unrtf, "--version"),
    ];

    let diags: Vec<ToolDiag> = probes
        .into_iter()
        .map(|(tool, spec, flag)| probe_tool(tool, spec, flag, &options.working_dir))
        .collect();
    println!("{}", serde_json::to_string_pretty(&diags)?);
    Ok(())
}

fn probe_tool(tool: &'static str, spec: &ToolSpec, flag: &str, work_dir: &Path) -> ToolDiag {
    let probe = ToolSpec::new(&spec.program, Duration::from_secs(10));
    let program = spec.program.display().to_string();
    match external::run_tool(&probe, &[OsStr::new(flag)], work_dir, false) {
        Ok(_) => ToolDiag {
            tool,
            program,
            ok: true,
            error: None,
        },
        Err(err) => ToolDiag {
            tool,
            program,
            ok: false,
            error: Some(err.to_string()),
        },
    }
}

fn formats(cfg: &Config) -> Result<()> {
    let dispatcher = Dispatcher::from_config(cfg);
    let types: Vec<&str> = dispatcher.formats().map(|f| f.mime()).collect();
    println!("{}", serde_json::to_string_pretty(&types)?);
    Ok(())
}

fn convert(
    cfg: &Config,
    input: &Path,
    content_type: Option<&str>,
    filename: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let mut attachment = Attachment::from_path(input, content_type)?;
    if let Some(name) = filename {
        attachment.display_filename = name.to_string();
    }

    let dispatcher = Dispatcher::from_config(cfg);
    let started = now_rfc3339();
    let clock = Instant::now();
    let result = dispatcher
        .convert(&attachment)
        .with_context(|| format!("converting {}", input.display()))?;
    let elapsed_ms = clock.elapsed().as_millis() as u64;

    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent)?;
            }
            std::fs::write(path, &result.html)
                .with_context(|| format!("writing html: {}", path.display()))?;
            info!("wrote {} ({} bytes)", path.display(), result.html.len());

            if cfg.output.write_report_json {
                let report = ConversionReport::new(
                    &input.display().to_string(),
                    &attachment,
                    &result,
                    started,
                    now_rfc3339(),
                    elapsed_ms,
                );
                let mut report_path = path.as_os_str().to_owned();
                report_path.push(&cfg.output.report_suffix);
                report.write_json(Path::new(&report_path))?;
            }
        }
        None => println!("{}", result.html),
    }

    if result.success == Some(false) {
        info!("conversion produced no text or images: {}", input.display());
    }

    Ok(())
}
