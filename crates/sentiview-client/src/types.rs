//! Wire types for the inference API.
//!
//! Shapes are owned by the external service; these structs mirror its JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Three-way classification output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "Positive"),
            SentimentLabel::Neutral => write!(f, "Neutral"),
            SentimentLabel::Negative => write!(f, "Negative"),
        }
    }
}

/// Comment counts per sentiment label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl SentimentDistribution {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }
}

/// Percentage share per sentiment label, rounded to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentPercentages {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentPercentages {
    /// Derives percentages from raw counts.
    ///
    /// An empty distribution yields all zeros rather than NaN.
    #[must_use]
    pub fn from_distribution(distribution: &SentimentDistribution) -> Self {
        let total = distribution.total();
        if total == 0 {
            return Self::default();
        }
        let pct = |count: u64| {
            #[allow(clippy::cast_precision_loss)]
            let raw = (count as f64 / total as f64) * 100.0;
            (raw * 100.0).round() / 100.0
        };
        Self {
            positive: pct(distribution.positive),
            neutral: pct(distribution.neutral),
            negative: pct(distribution.negative),
        }
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }
}

// ---------------------------------------------------------------------------
// /analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub include_details: bool,
    pub include_suggestions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAnalyzeRequest {
    pub texts: Vec<String>,
    pub batch_size: usize,
    pub include_details: bool,
}

/// Probability vector over the three labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentProbabilities {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

/// Lexical feature breakdown the model optionally reports per comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentFeatures {
    pub emoji_score: f64,
    pub pos_word_score: f64,
    pub neg_word_score: f64,
    pub word_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_word_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_diff: Option<f64>,
}

/// Result of classifying a single comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub comment: String,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<String>,
    pub probabilities: SentimentProbabilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<CommentFeatures>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub sentiment_distribution: SentimentDistribution,
    pub avg_confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral_percentage: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAnalysisResponse {
    pub results: Vec<AnalysisResponse>,
    pub summary: BatchSummary,
    pub total_analyzed: u64,
    pub timestamp: DateTime<Utc>,
}

/// Health probe result; failures map to an offline status, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthStatus {
    #[must_use]
    pub fn offline(detail: String) -> Self {
        Self {
            status: "offline".to_string(),
            detail: Some(detail),
        }
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// ---------------------------------------------------------------------------
// /statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub accuracy: f64,
    pub f1_weighted: f64,
    #[serde(default)]
    pub train_size: u64,
    #[serde(default)]
    pub test_size: u64,
    #[serde(default)]
    pub features: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Aggregate statistics over the comment corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub total_comments: u64,
    pub distribution: SentimentDistribution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentages: Option<SentimentPercentages>,
    pub avg_comment_length: f64,
    /// `[word, count]` pairs, most frequent first.
    pub most_common_words: Vec<(String, u64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_sample_size: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

/// Sentiment split for one detected topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSentiment {
    pub name: String,
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentComment {
    pub comment: String,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentCommentsResponse {
    pub total_comments: u64,
    pub sample_size: u64,
    pub comments: Vec<RecentComment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Month-over-month delta shown on a dashboard KPI card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricChange {
    pub change: String,
    pub trend: TrendDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardChanges {
    pub total_comments: MetricChange,
    pub positive_sentiment: MetricChange,
    pub negative_sentiment: MetricChange,
    pub neutral_sentiment: MetricChange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_comments: u64,
    pub sentiment_distribution: SentimentDistribution,
    pub sentiment_percentages: SentimentPercentages,
    pub changes: DashboardChanges,
    pub avg_comment_length: f64,
    pub most_common_words: Vec<(String, u64)>,
}

/// Everything the dashboard view renders in one payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub metrics: DashboardMetrics,
    pub topics_analysis: Vec<TopicSentiment>,
    pub recent_comments: Vec<RecentComment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// /reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub period: String,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_comments: u64,
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub neutral_percentage: f64,
    pub general_perception: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStatistics {
    pub sentiment_distribution: SentimentDistribution,
    pub avg_comment_length: f64,
    pub most_common_words: Vec<(String, u64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub title: String,
    pub period: String,
    pub summary: ReportSummary,
    pub statistics: ReportStatistics,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Xlsx,
    Csv,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Pdf => write!(f, "pdf"),
            ExportFormat::Xlsx => write!(f, "xlsx"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

// ---------------------------------------------------------------------------
// /dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub total_records: u64,
    pub columns: Vec<String>,
    pub sentiment_distribution: SentimentDistribution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_loaded: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// Acknowledgement for a dataset CSV upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    pub records: u64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResponse {
    pub status: String,
    pub accuracy: f64,
    pub f1_weighted: f64,
    pub train_size: u64,
    pub test_size: u64,
    pub features: u64,
    pub training_date: String,
}
