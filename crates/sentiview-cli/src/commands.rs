//! Command implementations: thin glue between the API client, the history
//! store and the terminal.

use std::path::{Path, PathBuf};

use anyhow::Context;

use sentiview_client::types::{AnalysisResponse, DashboardData, ExportFormat, ReportResponse};
use sentiview_client::ApiClient;

use crate::history::{HistoryEntry, HistoryStore};

pub async fn analyze(client: &ApiClient, history: &HistoryStore, text: &str, save: bool) -> anyhow::Result<()> {
    let response = client.analyze_single(text).await?;
    print_analysis(&response);
    if save {
        history.add(HistoryEntry::new(text.to_string(), response))?;
        println!("saved to history");
    }
    Ok(())
}

/// Analyzes every non-empty line of `file` as one batch.
pub async fn batch(client: &ApiClient, file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading comments from {}", file.display()))?;
    let texts: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    anyhow::ensure!(!texts.is_empty(), "{} contains no comments", file.display());

    let response = client.analyze_batch(&texts, None).await?;
    let dist = response.summary.sentiment_distribution;
    println!("analyzed {} comments", response.total_analyzed);
    println!(
        "  positive {}  neutral {}  negative {}",
        dist.positive, dist.neutral, dist.negative
    );
    println!("  average confidence {:.1}%", response.summary.avg_confidence * 100.0);
    Ok(())
}

pub async fn dashboard(client: &ApiClient) -> anyhow::Result<()> {
    let data = client.get_dashboard_data().await?;
    print_dashboard(&data);
    Ok(())
}

pub async fn statistics(client: &ApiClient) -> anyhow::Result<()> {
    let stats = client.get_statistics().await?;
    println!("total comments: {}", stats.total_comments);
    println!(
        "distribution: {} positive / {} neutral / {} negative",
        stats.distribution.positive, stats.distribution.neutral, stats.distribution.negative
    );
    println!("average comment length: {:.1} chars", stats.avg_comment_length);
    if !stats.most_common_words.is_empty() {
        println!("most common words:");
        for (word, count) in stats.most_common_words.iter().take(10) {
            println!("  {word} ({count})");
        }
    }
    if let Some(model) = &stats.model_info {
        println!(
            "model: accuracy {:.1}%, f1 {:.3}",
            model.accuracy * 100.0,
            model.f1_weighted
        );
    }
    Ok(())
}

pub async fn report(
    client: &ApiClient,
    period: &str,
    export: Option<ExportFormat>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let report = client.generate_report(period, "json").await?;
    print_report(&report);

    if let Some(format) = export {
        let bytes = client.export_report(format).await?;
        let out = out.unwrap_or_else(|| PathBuf::from(format!("sentiment-report.{format}")));
        std::fs::write(&out, bytes)
            .with_context(|| format!("writing export to {}", out.display()))?;
        println!("exported {} report to {}", format, out.display());
    }
    Ok(())
}

pub async fn dataset(client: &ApiClient) -> anyhow::Result<()> {
    let info = client.dataset_info().await?;
    println!("dataset: {} records", info.total_records);
    if let Some(name) = &info.file_name {
        println!("  file: {name}");
    }
    println!("  columns: {}", info.columns.join(", "));
    println!(
        "  distribution: {} positive / {} neutral / {} negative",
        info.sentiment_distribution.positive,
        info.sentiment_distribution.neutral,
        info.sentiment_distribution.negative
    );
    Ok(())
}

pub async fn upload(client: &ApiClient, file: &Path) -> anyhow::Result<()> {
    let contents = std::fs::read(file)
        .with_context(|| format!("reading dataset from {}", file.display()))?;
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("dataset.csv");
    let response = client.upload_dataset(name, contents).await?;
    println!("{}", response.message);
    println!(
        "  {} records loaded from {}",
        response.records, response.filename
    );
    Ok(())
}

pub async fn train(client: &ApiClient) -> anyhow::Result<()> {
    println!("training model, this can take a while...");
    let result = client.train_model().await?;
    println!("training {}", result.status);
    println!(
        "  accuracy {:.2}%  f1 {:.3}  ({} train / {} test, {} features)",
        result.accuracy * 100.0,
        result.f1_weighted,
        result.train_size,
        result.test_size,
        result.features
    );
    Ok(())
}

pub async fn health(client: &ApiClient) -> anyhow::Result<()> {
    let status = client.check_health().await;
    if status.is_healthy() {
        println!("backend is healthy");
    } else {
        println!("backend is {}", status.status);
        if let Some(detail) = &status.detail {
            println!("  {detail}");
        }
    }
    Ok(())
}

pub fn history_list(history: &HistoryStore) -> anyhow::Result<()> {
    let entries = history.load()?;
    if entries.is_empty() {
        println!("history is empty");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "[{i}] {} ({:.1}%) {} - {}",
            entry.result.sentiment,
            entry.result.confidence * 100.0,
            entry.saved_at.format("%Y-%m-%d %H:%M"),
            truncate(&entry.text, 60)
        );
    }
    Ok(())
}

pub fn history_delete(history: &HistoryStore, index: usize) -> anyhow::Result<()> {
    let removed = history.remove(index)?;
    println!("removed: {}", truncate(&removed.text, 60));
    Ok(())
}

pub fn history_clear(history: &HistoryStore) -> anyhow::Result<()> {
    history.clear()?;
    println!("history cleared");
    Ok(())
}

fn print_analysis(response: &AnalysisResponse) {
    println!(
        "{} ({:.1}% confidence)",
        response.sentiment,
        response.confidence * 100.0
    );
    let p = response.probabilities;
    println!(
        "  probabilities: positive {:.2}  neutral {:.2}  negative {:.2}",
        p.positive, p.neutral, p.negative
    );
    if let Some(level) = &response.confidence_level {
        println!("  confidence level: {level}");
    }
}

fn print_dashboard(data: &DashboardData) {
    let m = &data.metrics;
    println!("total comments: {} ({})", m.total_comments, m.changes.total_comments.change);
    println!(
        "sentiment: {:.1}% positive ({}) / {:.1}% neutral ({}) / {:.1}% negative ({})",
        m.sentiment_percentages.positive,
        m.changes.positive_sentiment.change,
        m.sentiment_percentages.neutral,
        m.changes.neutral_sentiment.change,
        m.sentiment_percentages.negative,
        m.changes.negative_sentiment.change,
    );
    if !data.topics_analysis.is_empty() {
        println!("topics:");
        for topic in &data.topics_analysis {
            println!(
                "  {}: {} comments ({} positive / {} neutral / {} negative)",
                topic.name, topic.total, topic.positive, topic.neutral, topic.negative
            );
        }
    }
    if !data.recent_comments.is_empty() {
        println!("recent comments:");
        for comment in &data.recent_comments {
            println!(
                "  [{}] {}",
                comment.sentiment,
                truncate(&comment.comment, 70)
            );
        }
    }
}

fn print_report(report: &ReportResponse) {
    println!("{} ({})", report.title, report.period);
    let s = &report.summary;
    println!(
        "  {} comments, {:.1}% positive / {:.1}% neutral / {:.1}% negative",
        s.total_comments, s.positive_percentage, s.neutral_percentage, s.negative_percentage
    );
    println!("  general perception: {}", s.general_perception);
    if !report.insights.is_empty() {
        println!("insights:");
        for insight in &report.insights {
            println!("  - {insight}");
        }
    }
    if !report.recommendations.is_empty() {
        println!("recommendations:");
        for rec in &report.recommendations {
            println!("  - {rec}");
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}
