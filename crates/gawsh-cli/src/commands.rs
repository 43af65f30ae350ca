use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use gawsh_exec::{DryRunExecutor, ExecPlan, MakeExecutor, RuleExecutor};
use gawsh_render::{stylesheet, theme_names, ContentRenderer, HtmlTableRenderer};
use gawsh_rules::{
    ensure_parent_dir, escape_recipe, generate_into, shell_quote, GenerateConfig, GenerateReport,
    RuleSink,
};
use tracing::debug;

use crate::cli::*;

/// Rule file written by `gawsh build`, relative to the output root.
const BUILD_RULE_FILE: &str = "gawsh.mk";

/// Stylesheet written by `gawsh build`, relative to the output root.
const BUILD_STYLESHEET: &str = "gawsh.css";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Generate(args) => cmd_generate(cli.config.as_deref(), &cli.format, args),
        Command::Render(args) => cmd_render(args),
        Command::Build(args) => cmd_build(cli.config.as_deref(), &cli.format, args),
        Command::Stylesheet(args) => cmd_stylesheet(args),
    }
}

/// Layer defaults, the config file, and flags, in that order.
fn resolve_config(config_file: Option<&Path>, args: &RuleArgs) -> anyhow::Result<GenerateConfig> {
    let mut config = match config_file {
        Some(path) => GenerateConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GenerateConfig::default(),
    };
    if let Some(output) = &args.output {
        config.output_root = output.clone();
    }
    if let Some(len) = args.oid_length {
        config.oid_length = len;
    }
    if let Some(umbrella) = &args.umbrella {
        config.umbrella_target = umbrella.clone();
    }
    if let Some(repo) = &args.repository {
        let repo = escape_recipe(&shell_quote(&repo.display().to_string()));
        config.fetch_command = format!("git -C {repo} cat-file blob");
    }
    config.validate()?;
    debug!(?config, "resolved generation config");
    Ok(config)
}

fn open_listing(path: Option<&Path>) -> anyhow::Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening listing {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    })
}

fn generate_rules(
    config: &GenerateConfig,
    listing: Option<&Path>,
    sink: RuleSink,
) -> anyhow::Result<GenerateReport> {
    let input = open_listing(listing)?;
    let report = generate_into(input, sink, config).context("rule generation aborted")?;
    Ok(report)
}

fn cmd_generate(
    config_file: Option<&Path>,
    format: &OutputFormat,
    args: GenerateArgs,
) -> anyhow::Result<()> {
    let config = resolve_config(config_file, &args.rules)?;
    let sink = match &args.rule_file {
        Some(path) => {
            ensure_parent_dir(path)?;
            RuleSink::to_file(path)?
        }
        None => RuleSink::to_writer(Box::new(io::stdout())),
    };
    let report = generate_rules(&config, args.rules.listing.as_deref(), sink)?;
    print_report(format, &report, args.rule_file.as_deref())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut content = Vec::new();
    match &args.input {
        Some(path) => {
            File::open(path)
                .with_context(|| format!("opening {}", path.display()))?
                .read_to_end(&mut content)?;
        }
        None => {
            io::stdin().lock().read_to_end(&mut content)?;
        }
    }

    let mut renderer = HtmlTableRenderer::new();
    if let Some(limit) = args.max_bytes {
        renderer = renderer.with_max_bytes(limit);
    }
    let mut stdout = io::stdout().lock();
    renderer
        .render_to(&content, &args.filename, &mut stdout)
        .with_context(|| format!("rendering {}", args.filename))?;
    Ok(())
}

fn cmd_stylesheet(args: StylesheetArgs) -> anyhow::Result<()> {
    if args.list {
        let mut stdout = io::stdout().lock();
        for name in theme_names() {
            writeln!(stdout, "{name}")?;
        }
        return Ok(());
    }

    let css = stylesheet(&args.theme)?;
    match &args.output {
        Some(path) => {
            ensure_parent_dir(path)?;
            fs::write(path, css).with_context(|| format!("writing {}", path.display()))?;
        }
        None => io::stdout().lock().write_all(css.as_bytes())?,
    }
    Ok(())
}

fn cmd_build(
    config_file: Option<&Path>,
    format: &OutputFormat,
    args: BuildArgs,
) -> anyhow::Result<()> {
    let config = resolve_config(config_file, &args.rules)?;
    let rule_file = PathBuf::from(&config.output_root).join(BUILD_RULE_FILE);
    ensure_parent_dir(&rule_file)?;

    let css = stylesheet(&args.theme)?;

    let sink = RuleSink::to_file(&rule_file)?;
    let report = generate_rules(&config, args.rules.listing.as_deref(), sink)?;
    print_report(format, &report, Some(&rule_file))?;

    let css_file = PathBuf::from(&config.output_root).join(BUILD_STYLESHEET);
    fs::write(&css_file, css)
        .with_context(|| format!("writing {}", css_file.display()))?;
    debug!(path = %css_file.display(), theme = %args.theme, "stylesheet written");

    let plan = ExecPlan::new(&rule_file, config.umbrella_target.as_str(), args.jobs);
    let make = MakeExecutor::with_program(&args.runner);
    let executor: Box<dyn RuleExecutor> = if args.dry_run {
        let dry = DryRunExecutor::new(make);
        eprintln!("{}", dry.command_line(&plan).bold());
        Box::new(dry)
    } else {
        Box::new(make)
    };

    let outcome = executor.execute(&plan)?;
    if !args.dry_run {
        eprintln!(
            "{} Rendered into {} in {:.1}s",
            "✓".green().bold(),
            config.output_root.bold(),
            outcome.elapsed.as_secs_f64()
        );
    }
    Ok(())
}

/// Summary goes to stderr: stdout may be carrying the rule file.
fn print_report(
    format: &OutputFormat,
    report: &GenerateReport,
    rule_file: Option<&Path>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => eprintln!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => {
            let dest = rule_file.map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
            eprintln!(
                "{} {} rules written to {}",
                "✓".green().bold(),
                report.unique_blobs.to_string().bold(),
                dest.cyan()
            );
            eprintln!(
                "  {} lines read, {} duplicates dropped",
                report.lines_read,
                report.duplicates_dropped.to_string().dimmed()
            );
        }
    }
    Ok(())
}
