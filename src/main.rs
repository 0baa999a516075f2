use becas_common::{assess, comparison_records, cross_check, dedupe, reconcile, summarize, Record};
use becas_recon::{cli, config, error, export, ingest, loader, storage};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use ingest::{Catalog, Source, StatusHandle};
use std::path::{Path, PathBuf};
use storage::{RecordStore, SessionLog, SessionStatus};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;
    debug!(?config, "設定を読み込みました");

    match cli.command {
        Commands::Ingest { inputs, label, catalog, all_catalogs } => {
            println!("🎓 becas-recon - 取り込み\n");

            let sources = build_sources(&inputs, label, &catalog, all_catalogs)?;
            if sources.is_empty() {
                println!("取り込み対象がありません（ファイル/フォルダまたは --catalog を指定）");
                return Ok(());
            }
            println!("[1/2] {}件の取得元を取り込み中...", sources.len());

            let pb = ProgressBar::new(sources.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            let status = StatusHandle::with_progress(pb.clone());
            let outcomes = ingest::run_sources(sources, &status).await;
            pb.finish_and_clear();

            println!("[2/2] 保存中...");
            let mut store = storage::open_store(&config)?;
            for outcome in &outcomes {
                let mut log = SessionLog::new(
                    &outcome.label,
                    if outcome.is_ok() { SessionStatus::Success } else { SessionStatus::Error },
                );
                log.elapsed_secs = outcome.elapsed.as_secs_f64();
                log.found = outcome.records.len();

                match &outcome.error {
                    None => {
                        log.inserted = store.store_candidates(&outcome.label, &outcome.records)?;
                        if outcome.rejected > 0 {
                            log.status = SessionStatus::Partial;
                            log.errors = outcome.rejected;
                            log.details = format!("{}件が検証エラー", outcome.rejected);
                        }
                        println!(
                            "✔ {}: {}件取得 / {}件追加{}",
                            outcome.label,
                            log.found,
                            log.inserted,
                            if outcome.rejected > 0 { format!(" ({}件除外)", outcome.rejected) } else { String::new() }
                        );
                    }
                    Some(message) => {
                        log.errors = 1;
                        log.details = message.clone();
                        println!("✖ {}: {}", outcome.label, message);
                    }
                }
                store.log_session(log)?;
            }

            let snapshot = status.snapshot();
            println!(
                "\n✅ 取り込み完了: 合計{}件 / エラー{}件 ({:.1}秒)",
                snapshot.results.total_scraped,
                snapshot.errors.len(),
                snapshot.elapsed_secs.unwrap_or(0.0)
            );
        }

        Commands::LoadBaseline { path } => {
            println!("📗 becas-recon - ベースライン読み込み\n");

            let path = path
                .or_else(|| config.baseline_path.clone())
                .ok_or_else(|| error::BecasError::Config("ベースラインExcelを指定してください".into()))?;
            let records = loader::load_baseline(&path)?;

            let mut store = storage::open_store(&config)?;
            store.replace_baseline(&records)?;
            println!("✔ {}件のベースラインを保存: {}", records.len(), path.display());
        }

        Commands::Compare {
            baseline,
            candidates,
            source,
            output,
            format,
            title,
            partial,
            exact,
            show_matches,
        } => {
            println!("🔍 becas-recon - 突合\n");

            let thresholds = config.thresholds_with(partial, exact)?;
            let mut store = storage::open_store(&config)?;

            println!("[1/3] データを読み込み中...");
            let baseline = select_baseline(store.as_mut(), &config, baseline.as_deref())?;
            let candidates = loader::select_candidates(store.as_ref(), candidates.as_deref(), source.as_deref())?;
            println!("✔ 候補{}件 / ベースライン{}件\n", candidates.len(), baseline.len());

            println!("[2/3] 突合中... (部分一致 ≥ {:.2}, 完全一致 ≥ {:.2})", thresholds.partial, thresholds.exact);
            let result = reconcile(&candidates, &baseline, &thresholds);
            let report = summarize(&result);
            store.replace_comparisons(&comparison_records(&result))?;

            for (label, value) in report.rows() {
                if label == "Porcentaje Cobertura" {
                    println!("  {}: {:.1}%", label, value);
                } else {
                    println!("  {}: {}", label, value);
                }
            }
            if show_matches {
                for m in result.exact_matches.iter().chain(&result.partial_matches) {
                    println!(
                        "  [{}] {} ⇔ {} ({:.3})",
                        m.match_kind, m.candidate.name, m.baseline.name, m.score
                    );
                }
            }
            println!();

            println!("[3/3] 出力中...");
            if let Some(output) = output {
                for path in export::export_comparison(&result, &report, format, &output, &title)? {
                    println!("✔ 出力: {}", path.display());
                }
            } else {
                println!("- 出力先未指定のため保存のみ");
            }

            println!("\n✅ 突合完了");
        }

        Commands::CrossCheck { institution, baseline, candidates, source } => {
            println!("🔎 becas-recon - 機関別チェック ({})\n", institution);

            let mut store = storage::open_store(&config)?;
            let baseline = select_baseline(store.as_mut(), &config, baseline.as_deref())?;
            let candidates = loader::select_candidates(store.as_ref(), candidates.as_deref(), source.as_deref())?;

            let result = cross_check(&candidates, &baseline, &institution);
            println!("  候補: {}件", result.total_candidates);
            println!("  ベースライン（{}）: {}件", institution, result.total_baseline);
            println!("  一致: {}件", result.matches.len());
            for m in &result.matches {
                println!("    ✔ {} ⇔ {}", m.candidate_name, m.baseline_name);
            }
            println!("  新規: {}件", result.new_found.len());
            for r in &result.new_found {
                println!("    + {}", r.name);
            }
            println!("  欠落: {}件", result.missing.len());
            for r in &result.missing {
                println!("    - {}", r.name);
            }
        }

        Commands::Dedupe { input, output } => {
            let records = loader::load_candidates(&input)?;
            let unique = dedupe(&records);
            println!("✔ {}件 → {}件 (重複{}件)", records.len(), unique.len(), records.len() - unique.len());

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&unique)?;
                std::fs::write(&output, json)?;
                println!("✔ 結果を保存: {}", output.display());
            }
        }

        Commands::Validate { input, output } => {
            let records = match input {
                Some(path) => loader::load_candidates(&path)?,
                None => storage::open_store(&config)?.all_candidates(),
            };
            let quality = assess(&records);

            println!("データ品質:");
            println!("  総数: {}", quality.total);
            println!("  有効: {}", quality.valid);
            println!("  無効: {}", quality.invalid.len());
            println!("  最低平均点あり: {}", quality.with_average);
            for (category, count) in &quality.categories {
                println!("  {}: {}", category, count);
            }
            for invalid in &quality.invalid {
                println!("  ✖ {}: {}", invalid.name, invalid.reason);
            }

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&quality)?;
                std::fs::write(&output, json)?;
                println!("✔ レポートを保存: {}", output.display());
            }
        }

        Commands::Stats { json } => {
            let store = storage::open_store(&config)?;
            let stats = store.stats();

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("保存データ:");
                println!("  候補: {}件", stats.total_candidates);
                println!("  ベースライン: {}件", stats.total_baseline);
                println!("  比較結果: {}件", stats.total_comparisons);
                for (source, count) in &stats.by_source {
                    println!("    {}: {}件", source, count);
                }
                if !stats.recent_sessions.is_empty() {
                    println!("  直近のセッション:");
                    for s in &stats.recent_sessions {
                        println!(
                            "    {} {} {:?} 取得{} / 追加{} ({:.1}秒)",
                            s.executed_at, s.source, s.status, s.found, s.inserted, s.elapsed_secs
                        );
                    }
                }
            }
        }

        Commands::Config { show, set_storage, set_data_dir, set_baseline, set_partial, set_exact } => {
            let mut config = config;
            let mut changed = false;

            if let Some(storage) = set_storage {
                config.storage = storage;
                changed = true;
            }
            if let Some(dir) = set_data_dir {
                config.data_dir = dir;
                changed = true;
            }
            if let Some(path) = set_baseline {
                config.baseline_path = Some(path);
                changed = true;
            }
            if set_partial.is_some() || set_exact.is_some() {
                config.thresholds = config.thresholds_with(set_partial, set_exact)?;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  ストレージ: {}", config.storage);
                println!("  データディレクトリ: {}", config.data_dir.display());
                println!(
                    "  ベースライン: {}",
                    config.baseline_path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "未設定".into())
                );
                println!("  閾値: 部分一致 {:.2} / 完全一致 {:.2}", config.thresholds.partial, config.thresholds.exact);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// 引数から取得元の一覧を作る
fn build_sources(
    inputs: &[PathBuf],
    label: Option<String>,
    catalogs: &[String],
    all_catalogs: bool,
) -> Result<Vec<Source>> {
    let mut sources = Vec::new();

    let mut files = Vec::new();
    for input in inputs {
        files.extend(loader::candidate_files(input)?);
    }
    let single_file = files.len() == 1;
    for path in files {
        let label = match (&label, single_file) {
            (Some(label), true) => label.clone(),
            _ => loader::source_label_for(&path),
        };
        sources.push(Source::File { label, path });
    }

    let selected: Vec<Catalog> = if all_catalogs {
        Catalog::ALL.to_vec()
    } else {
        catalogs.iter().map(|c| c.parse::<Catalog>()).collect::<Result<_>>()?
    };
    sources.extend(selected.into_iter().map(Source::Catalog));

    Ok(sources)
}

/// 突合に使うベースライン
///
/// Excelを指定（または設定）していれば読み込んで保存し直す。なければ保存済みを使う。
fn select_baseline(store: &mut dyn RecordStore, config: &Config, path: Option<&Path>) -> Result<Vec<Record>> {
    match path.map(Path::to_path_buf).or_else(|| config.baseline_path.clone()) {
        Some(path) => {
            let records = loader::load_baseline(&path)?;
            store.replace_baseline(&records)?;
            Ok(records)
        }
        None => Ok(store.baseline()),
    }
}
