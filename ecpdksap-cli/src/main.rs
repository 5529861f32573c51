//! ECPDKSAP CLI
//!
//! Command-line interface for the pairing-based dual-key stealth address protocol.

use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ecpdksap_core::{ScanCandidate, ScanRequest, SendRequest, VariantId, ViewTagConfig};
use ecpdksap_crypto::{compute_view_tag, CurveContext, G1KeyPair, ViewTagStats, WireFormat};
use ecpdksap_scanner::{scan_request, ErrorPolicy, ScanProgress, ScanSummary, Scanner, ScannerConfig};
use ecpdksap_stealth::{send, send_request, KeyExport, ProtocolVariant, RecipientKeys, V0, V1, V2};

/// ECPDKSAP - Pairing-based dual-key stealth addresses
#[derive(Parser)]
#[command(name = "ecpdksap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print only machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate recipient keys for a protocol variant
    Keygen {
        /// Protocol variant (v0, v1, v2)
        #[arg(long, env = "ECPDKSAP_VARIANT", default_value = "v1")]
        variant: VariantId,
        /// Output file for keys (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a stealth payment from a send request
    Send {
        /// Request JSON, a path to a JSON file, or `-` for stdin
        request: String,
    },

    /// Scan candidates from a scan request
    Scan {
        /// Request JSON, a path to a JSON file, or `-` for stdin
        request: String,
        /// What to do with candidates that fail to decode (abort, skip)
        #[arg(long, env = "ECPDKSAP_ERROR_POLICY", default_value = "skip")]
        error_policy: ErrorPolicy,
        /// Candidates per batch
        #[arg(long, default_value_t = ecpdksap_core::DEFAULT_SCAN_BATCH_SIZE)]
        batch_size: usize,
        /// Stop dispatching batches after this many milliseconds
        #[arg(long)]
        time_budget_ms: Option<u64>,
        /// Stop at the first recovered candidate
        #[arg(long)]
        stop_on_first: bool,
        /// Evaluate batches on all cores
        #[arg(long)]
        parallel: bool,
    },

    /// Benchmark scanning of one genuine payment among random candidates
    Bench {
        /// Number of candidates to scan
        #[arg(short, long, default_value = "1000")]
        count: usize,
        /// Protocol variant (v0, v1, v2)
        #[arg(long, env = "ECPDKSAP_VARIANT", default_value = "v2")]
        variant: VariantId,
        /// View tag selector (none, v0-1byte, v0-2bytes, v1-1byte, v1-2bytes)
        #[arg(short = 't', long, env = "ECPDKSAP_VIEW_TAG", default_value = "v0-1byte")]
        view_tag: String,
        /// Evaluate batches on all cores
        #[arg(long)]
        parallel: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "ecpdksap_cli=debug,ecpdksap_stealth=debug,ecpdksap_scanner=debug,info"
    } else {
        "ecpdksap_cli=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = CurveContext::new();

    match cli.command {
        Commands::Keygen { variant, output } => cmd_keygen(&ctx, variant, output, cli.json),
        Commands::Send { request } => cmd_send(&ctx, &request, cli.json),
        Commands::Scan {
            request,
            error_policy,
            batch_size,
            time_budget_ms,
            stop_on_first,
            parallel,
        } => {
            let mut config = ScannerConfig::new()
                .error_policy(error_policy)
                .batch_size(batch_size)
                .parallel(parallel);
            if let Some(ms) = time_budget_ms {
                config = config.time_budget(Duration::from_millis(ms));
            }
            if stop_on_first {
                config = config.stop_on_first();
            }
            cmd_scan(&ctx, &request, config, cli.json)
        }
        Commands::Bench {
            count,
            variant,
            view_tag,
            parallel,
        } => {
            let tag = ViewTagConfig::from_selector(&view_tag).context("Invalid view tag selector")?;
            match variant {
                VariantId::V0 => cmd_bench::<V0>(&ctx, count, tag, parallel),
                VariantId::V1 => cmd_bench::<V1>(&ctx, count, tag, parallel),
                VariantId::V2 => cmd_bench::<V2>(&ctx, count, tag, parallel),
            }
        }
    }
}

/// Reads a request given inline, from a file, or from stdin.
fn read_request(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        return Ok(buf);
    }
    if input.trim_start().starts_with('{') {
        return Ok(input.to_string());
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read request file {input}"))
}

fn export_keys<V: ProtocolVariant>(ctx: &CurveContext) -> KeyExport {
    RecipientKeys::<V>::generate(ctx, &mut rand::thread_rng()).export()
}

/// Generate recipient keys
fn cmd_keygen(ctx: &CurveContext, variant: VariantId, output: Option<PathBuf>, json: bool) -> Result<()> {
    if !json {
        println!("{} {}", "🔑 Generating recipient keys for".cyan().bold(), variant);
    }

    let keys = match variant {
        VariantId::V0 => export_keys::<V0>(ctx),
        VariantId::V1 => export_keys::<V1>(ctx),
        VariantId::V2 => export_keys::<V2>(ctx),
    };
    let keys_json = serde_json::to_string_pretty(&keys)?;

    if let Some(path) = output {
        std::fs::write(&path, &keys_json)
            .with_context(|| format!("Failed to write keys to {}", path.display()))?;
        if !json {
            println!("{} {}", "✅ Keys saved to:".green(), path.display());
        }
    } else if json {
        println!("{keys_json}");
    } else {
        println!("\n{}", "Keys (JSON):".yellow().bold());
        println!("{keys_json}");
    }

    if !json {
        println!("\n{}", "⚠️  IMPORTANT: Keep your secret keys safe!".red().bold());
        println!("   k and v must never be shared. Senders need only K and V.");
    }

    Ok(())
}

/// Create a stealth payment
fn cmd_send(ctx: &CurveContext, input: &str, json: bool) -> Result<()> {
    let request = SendRequest::from_json(&read_request(input)?).context("Invalid send request")?;
    let record = send_request(ctx, &request, &mut rand::thread_rng()).context("Failed to create stealth payment")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{} {}", "💸 Stealth payment created with".cyan().bold(), record.variant);
    println!("   {} {}", "Identifier:".yellow(), record.identifier);
    println!("   {} {}", "Ephemeral key:".dimmed(), record.ephemeral_key);
    if let Some(tag) = record.view_tag {
        println!("   {} {}", "View tag:".dimmed(), tag);
    }

    println!("\n{}", "📋 Publication (JSON):".yellow().bold());
    println!("{}", serde_json::to_string_pretty(&record)?);

    println!("\n{}", "ℹ️  Next steps:".cyan());
    println!("   1. Send funds to the identifier above");
    println!("   2. Publish the ephemeral key and view tag");

    Ok(())
}

/// Scan for payments
fn cmd_scan(ctx: &CurveContext, input: &str, config: ScannerConfig, json: bool) -> Result<()> {
    let request = ScanRequest::from_json(&read_request(input)?).context("Invalid scan request")?;
    if !json {
        println!(
            "{} {} candidates",
            "🔎 Scanning".cyan().bold(),
            request.ephemeral_keys.len()
        );
    }

    let output = scan_request(ctx, &request, config).context("Scan failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("   {} {} / {}", "Variant / view tag:".dimmed(), output.variant, output.view_tag);
    for (index, reason) in &output.failures {
        println!("   {} candidate #{}: {}", "⚠️".yellow(), index, reason);
    }
    if output.truncated {
        println!("   {}", "⏱️  Time budget exhausted, scan incomplete".yellow());
    }

    if output.recovered.is_empty() {
        println!("\n{}", "No payments found.".yellow());
    } else {
        println!("\n{} {} payment(s) found:", "✅".green(), output.recovered.len());
        for record in &output.recovered {
            println!("   {} {}", "Identifier:".green(), record.identifier);
            println!("      Candidate #{}", record.index);
            if let Some(sk) = &record.private_key {
                println!("      {} {}", "One-time key:".dimmed(), sk);
            }
        }
    }

    println!("\n   {} {}", "📈".green(), summary_line(&output.summary));

    Ok(())
}

/// One-line scan summary. `filter_efficiency` is already a percentage.
fn summary_line(s: &ScanSummary) -> String {
    format!(
        "{} scanned in {} ms ({:.0}/s), {:.1}% filtered by view tag",
        s.total_scanned, s.duration_ms, s.rate, s.filter_efficiency
    )
}

fn progress_bar(len: u64, template: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(ProgressStyle::default_bar().template(template)?.progress_chars("#>-"));
    Ok(pb)
}

/// Run benchmarks
fn cmd_bench<V: ProtocolVariant>(
    ctx: &CurveContext,
    count: usize,
    view_tag: Option<ViewTagConfig>,
    parallel: bool,
) -> Result<()> {
    anyhow::ensure!(count > 0, "count must be positive");
    let selector = view_tag.map_or("none", |c| c.selector());
    println!(
        "{} {} candidates ({}, view tag {})",
        "📊 Benchmarking with".cyan().bold(),
        count,
        V::ID,
        selector
    );
    let mut rng = rand::thread_rng();

    // Generate keys
    println!("\n{}", "1. Generating keys...".dimmed());
    let start = Instant::now();
    let keys = RecipientKeys::<V>::generate(ctx, &mut rng);
    println!("   ✓ Key generation: {:?}", start.elapsed());

    // Build candidates
    println!("\n{}", "2. Building candidates...".dimmed());
    let pb = progress_bar(count as u64, "   [{bar:40.cyan/blue}] {pos}/{len}")?;
    let start = Instant::now();

    let genuine = send(ctx, keys.public_keys(), view_tag.as_ref(), &mut rng)?;
    let genuine_at = count / 2;
    let mut tag_stats = ViewTagStats::new();
    let mut candidates = Vec::with_capacity(count);

    for i in 0..count {
        if i == genuine_at {
            candidates.push(genuine.to_record().to_candidate());
        } else {
            // Random ephemeral point, tagged over an unrelated shared point
            let ephemeral = G1KeyPair::generate(ctx, &mut rng);
            let candidate = match &view_tag {
                Some(config) => {
                    let unrelated = G1KeyPair::generate(ctx, &mut rng);
                    let tag = compute_view_tag(config, unrelated.public())?;
                    tag_stats.add(&tag);
                    ScanCandidate::with_tag(ephemeral.public().to_wire(), tag)
                }
                None => ScanCandidate::new(ephemeral.public().to_wire()),
            };
            candidates.push(candidate);
        }
        pb.inc(1);
    }
    pb.finish();
    println!("   ✓ Built {} candidates: {:?}", count, start.elapsed());

    // Scan
    println!("\n{}", "3. Scanning...".dimmed());
    let config = ScannerConfig::new()
        .maybe_view_tag(view_tag)
        .batch_size(count.clamp(1, 100))
        .parallel(parallel);
    let scanner = Scanner::new(*ctx, keys, config)?;

    let pb = progress_bar(count as u64, "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?;
    let callback = |p: ScanProgress| pb.set_position(p.scanned);
    let report = scanner.scan_with_progress(&candidates, &callback)?;
    pb.finish_with_message("done");

    let stats = &report.stats;
    debug!(?stats, "Bench scan finished");

    println!("   ✓ Scanned {} candidates: {} ms", stats.total_scanned, stats.duration_ms);
    println!("   ✓ Found {} payments", report.discoveries.len());

    println!("\n{}", "📈 Results:".green().bold());
    println!("   Scan rate: {:.0} candidates/sec", stats.rate());
    println!(
        "   Time per candidate: {:.2}µs",
        stats.duration_ms as f64 * 1000.0 / stats.total_scanned.max(1) as f64
    );
    println!("   Filtered by view tag: {:.1}%", stats.filter_efficiency());
    println!("   Filter phase: {:.2} ms total, {:.4} ms avg", stats.filter_ms, stats.avg_filter_ms());
    println!(
        "   Recovery phase: {:.2} ms total, {:.4} ms avg",
        stats.recovery_ms,
        stats.avg_recovery_ms()
    );

    if let Some(config) = view_tag {
        println!(
            "   Tag passes: {} (expected false positives ≈ {:.2})",
            stats.view_tag_matches,
            stats.expected_false_positives(config.num_bytes())
        );
        println!("   Tag distribution χ²: {:.1} (255 degrees of freedom)", tag_stats.chi_squared());
    }

    let found = report
        .identifiers()
        .any(|id| *id == genuine.identifier);
    if found {
        println!("   {} Genuine payment found!", "✅".green());
    } else {
        println!("   {} Genuine payment missing", "❌".red());
    }

    Ok(())
}
