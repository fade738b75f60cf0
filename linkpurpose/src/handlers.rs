use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use linkpurpose_core::report::{
    generate_json_report, generate_summary_text, judgment_line, report_filename, save_report,
};
use linkpurpose_core::{
    AnthropicClient, CheckError, CheckEvent, CheckOutcome, CheckProgressCallback, CheckerConfig,
    CompletionConfig, Language, LinkChecker, TextCompletion,
};
use linkpurpose_scanner::{Judgment, LinkRecord, PageRenderer, RendererConfig, WebDriverRenderer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::warn;

/// Everything a check run needs, resolved from the command line
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// Target URL exactly as given on the command line
    pub url: String,
    pub output_dir: PathBuf,
    pub quiet: bool,
    pub checker: CheckerConfig,
    pub renderer: RendererConfig,
    pub model: String,
    pub max_tokens: u32,
}

pub fn parse_check_args(matches: &ArgMatches) -> Result<CheckArgs, String> {
    let url = matches
        .get_one::<String>("URL")
        .cloned()
        .ok_or_else(|| "A URL to check is required".to_string())?;

    let output_dir = matches
        .get_one::<String>("output-dir")
        .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref()))
        .unwrap_or_else(|| PathBuf::from("."));

    let lang = matches
        .get_one::<String>("lang")
        .map(String::as_str)
        .unwrap_or("ja");
    let language: Language = lang.parse().map_err(|e: CheckError| e.to_string())?;

    let retries = matches.get_one::<usize>("retries").copied().unwrap_or(0);
    let completion_timeout = Duration::from_secs(*matches.get_one::<u64>("timeout").unwrap_or(&120));

    let checker = CheckerConfig {
        batch_size: *matches.get_one::<usize>("batch-size").unwrap_or(&10),
        batch_delay: Duration::from_millis(*matches.get_one::<u64>("delay-ms").unwrap_or(&1000)),
        completion_timeout,
        max_attempts: retries + 1,
        language,
    };
    checker.validate().map_err(|e| e.to_string())?;

    let renderer = RendererConfig {
        webdriver_url: matches
            .get_one::<String>("webdriver")
            .cloned()
            .unwrap_or_else(|| RendererConfig::default().webdriver_url),
        headless: !matches.get_flag("headful"),
        browser_binary: matches.get_one::<String>("chrome-binary").cloned(),
        timeout: Duration::from_secs(*matches.get_one::<u64>("render-timeout").unwrap_or(&60)),
        ..Default::default()
    };

    Ok(CheckArgs {
        url,
        output_dir,
        quiet: matches.get_flag("quiet"),
        checker,
        renderer,
        model: matches
            .get_one::<String>("model")
            .cloned()
            .unwrap_or_else(|| linkpurpose_core::completion::DEFAULT_MODEL.to_string()),
        max_tokens: *matches.get_one::<u32>("max-tokens").unwrap_or(&8192),
    })
}

/// Where the report for `url` is written
pub fn report_path(output_dir: &Path, url: &str) -> PathBuf {
    output_dir.join(report_filename(url))
}

fn colored_judgment_line(record: &LinkRecord) -> String {
    let line = judgment_line(record);
    match record.analysis.as_ref().map(|a| &a.judgment) {
        Some(Judgment::Ok) => line.green().to_string(),
        Some(Judgment::Ng) => line.red().to_string(),
        _ => line.yellow().to_string(),
    }
}

fn progress_callback(pb: ProgressBar) -> CheckProgressCallback {
    Arc::new(move |event: &CheckEvent| match event {
        CheckEvent::Rendering { url } => {
            pb.set_message(format!("Rendering {}...", url));
        }
        CheckEvent::Extracted { links, batches } => {
            pb.println(format!(
                "{} Found {} links, split into {} batches",
                "✓".green().bold(),
                links,
                batches
            ));
        }
        CheckEvent::BatchStarted { index, total, size } => {
            pb.set_message(format!(
                "Judging batch {}/{} ({} links)...",
                index + 1,
                total,
                size
            ));
        }
        CheckEvent::BatchJudged { index, total, links } => {
            pb.println(format!("{} Batch {}/{} judged", "✓".green().bold(), index + 1, total));
            for record in links {
                pb.println(format!("  {}", colored_judgment_line(record)));
            }
        }
        CheckEvent::BatchFailed { index, total, error } => {
            pb.println(format!(
                "{} Batch {}/{} dropped: {}",
                "✗".red().bold(),
                index + 1,
                total,
                error
            ));
        }
        CheckEvent::Cancelled { remaining_batches } => {
            pb.println(format!(
                "{} Cancelled, {} batches not judged",
                "!".yellow().bold(),
                remaining_batches
            ));
        }
    })
}

/// Run a check with the given collaborators, print the report and save it.
/// Returns the outcome and the path the report was written to.
pub async fn run_check(
    args: &CheckArgs,
    renderer: &dyn PageRenderer,
    completion: Arc<dyn TextCompletion>,
    cancel_flag: Arc<AtomicBool>,
) -> anyhow::Result<(CheckOutcome, PathBuf)> {
    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .context("invalid progress template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let checker = LinkChecker::new(completion, args.checker.clone())?
        .with_progress_callback(progress_callback(pb.clone()))
        .with_cancel_flag(cancel_flag);

    let outcome = checker.check_page(renderer, &args.url).await;
    pb.finish_and_clear();
    let outcome = outcome.with_context(|| format!("Checking {} failed", args.url))?;

    let json = generate_json_report(&outcome.report)?;
    if !args.quiet {
        println!("{}", json);
    }

    let path = report_path(&args.output_dir, &args.url);
    save_report(&json, &path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    if !args.quiet {
        eprint!("{}", generate_summary_text(&outcome.summary, &outcome.report));
        eprintln!(
            "{} Report saved to {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        );
    }

    Ok((outcome, path))
}

/// Sets `cancel_flag` on the first interrupt and returns `true` on the
/// second, when the caller should exit immediately. Returns `false` if the
/// signal source fails.
pub async fn watch_interrupts<F, Fut>(mut next_signal: F, cancel_flag: Arc<AtomicBool>) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    let mut received = 0;
    while let Ok(()) = next_signal().await {
        received += 1;
        if received >= 2 {
            return true;
        }
        warn!("Interrupt received, stopping after the current batch (press Ctrl-C again to exit)");
        cancel_flag.store(true, Ordering::SeqCst);
    }
    false
}

pub async fn handle_check(matches: &ArgMatches) -> anyhow::Result<()> {
    let args = parse_check_args(matches).map_err(anyhow::Error::msg)?;

    let completion_config = CompletionConfig {
        model: args.model.clone(),
        max_tokens: args.max_tokens,
        request_timeout: args.checker.completion_timeout,
        ..CompletionConfig::from_env()?
    };
    let completion: Arc<dyn TextCompletion> = Arc::new(AnthropicClient::new(completion_config)?);
    let renderer = WebDriverRenderer::new(args.renderer.clone());

    let cancel_flag = Arc::new(AtomicBool::new(false));
    let flag = cancel_flag.clone();
    tokio::spawn(async move {
        if watch_interrupts(tokio::signal::ctrl_c, flag).await {
            eprintln!("{} Interrupted again, exiting", "✗".red().bold());
            std::process::exit(130);
        }
    });

    run_check(&args, &renderer, completion, cancel_flag).await?;
    Ok(())
}
