//! `/statistics` endpoint group, including the dashboard fallback.
//!
//! The combined `/statistics/dashboard-data` endpoint is the fast path. When
//! it fails for any reason, [`ApiClient::get_dashboard_data`] recomposes the
//! same shape from the three underlying calls so the dashboard always gets a
//! payload instead of an error.

use rand::Rng;

use crate::client::ApiClient;
use crate::error::ApiClientError;
use crate::types::{
    DashboardChanges, DashboardData, DashboardMetrics, MetricChange, RecentComment,
    RecentCommentsResponse, SentimentPercentages, StatisticsResponse, TopicSentiment,
    TrendDirection,
};

const FALLBACK_RECENT_LIMIT: u64 = 5;

impl ApiClient {
    /// Fetches aggregate corpus statistics.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::Http`] on network failure or non-2xx status.
    /// - [`ApiClientError::Deserialize`] if the response shape is unexpected.
    pub async fn get_statistics(&self) -> Result<StatisticsResponse, ApiClientError> {
        self.get_typed("statistics/", self.default_timeout()).await
    }

    /// Fetches the per-topic sentiment split.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::get_statistics`].
    pub async fn get_topics(&self) -> Result<Vec<TopicSentiment>, ApiClientError> {
        self.get_typed("statistics/topics", self.default_timeout())
            .await
    }

    /// Fetches a sample of recent comments.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::get_statistics`].
    pub async fn get_recent_comments(
        &self,
        limit: u64,
    ) -> Result<RecentCommentsResponse, ApiClientError> {
        let path = format!("statistics/recent-comments?limit={limit}");
        self.get_typed(&path, self.default_timeout()).await
    }

    /// Fetches the combined dashboard aggregate.
    ///
    /// If the combined endpoint fails, the aggregate is recomposed from
    /// [`ApiClient::get_statistics`], [`ApiClient::get_topics`] and
    /// [`ApiClient::get_recent_comments`]; only when that composition also
    /// fails does an error surface.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::get_statistics`], but only after
    /// the fallback composition has failed too.
    pub async fn get_dashboard_data(&self) -> Result<DashboardData, ApiClientError> {
        match self
            .get_typed::<DashboardData>("statistics/dashboard-data", self.default_timeout())
            .await
        {
            Ok(data) => Ok(data),
            Err(err) => {
                tracing::warn!(error = %err, "dashboard-data failed, composing from parts");
                self.dashboard_from_parts().await
            }
        }
    }

    async fn dashboard_from_parts(&self) -> Result<DashboardData, ApiClientError> {
        let (stats, topics, recent) = futures::try_join!(
            self.get_statistics(),
            self.get_topics(),
            self.get_recent_comments(FALLBACK_RECENT_LIMIT),
        )?;
        Ok(compose_dashboard(stats, topics, recent.comments))
    }
}

/// Reshapes the three standalone payloads into the combined dashboard form.
///
/// Percentages are taken from the statistics payload when present and derived
/// from the raw distribution otherwise.
fn compose_dashboard(
    stats: StatisticsResponse,
    topics: Vec<TopicSentiment>,
    recent_comments: Vec<RecentComment>,
) -> DashboardData {
    let percentages = stats
        .percentages
        .unwrap_or_else(|| SentimentPercentages::from_distribution(&stats.distribution));

    DashboardData {
        metrics: DashboardMetrics {
            total_comments: stats.total_comments,
            sentiment_distribution: stats.distribution,
            sentiment_percentages: percentages,
            changes: synthesize_changes(),
            avg_comment_length: stats.avg_comment_length,
            most_common_words: stats.most_common_words,
        },
        topics_analysis: topics,
        recent_comments,
        model_info: stats.model_info,
        timestamp: chrono::Utc::now(),
    }
}

/// Month-over-month deltas for the KPI cards.
///
/// The corpus carries no historical snapshots, so these are synthesized with
/// small random magnitudes, matching what the combined endpoint reports.
fn synthesize_changes() -> DashboardChanges {
    let mut rng = rand::rng();
    DashboardChanges {
        total_comments: MetricChange {
            change: "+12%".to_string(),
            trend: TrendDirection::Up,
        },
        positive_sentiment: MetricChange {
            change: format!("+{}%", rng.random_range(2..=8)),
            trend: TrendDirection::Up,
        },
        negative_sentiment: MetricChange {
            change: format!("-{}%", rng.random_range(1..=5)),
            trend: TrendDirection::Down,
        },
        neutral_sentiment: MetricChange {
            change: format!("+{}%", rng.random_range(0..=3)),
            trend: TrendDirection::Stable,
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::{SentimentDistribution, SentimentLabel};

    fn sample_stats(percentages: Option<SentimentPercentages>) -> StatisticsResponse {
        StatisticsResponse {
            total_comments: 200,
            distribution: SentimentDistribution {
                positive: 120,
                neutral: 50,
                negative: 30,
            },
            percentages,
            avg_comment_length: 96.4,
            most_common_words: vec![("teachers".to_string(), 40)],
            model_info: None,
            dataset_sample_size: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn compose_derives_percentages_when_missing() {
        let data = compose_dashboard(sample_stats(None), vec![], vec![]);
        let pct = data.metrics.sentiment_percentages;
        assert!((pct.positive - 60.0).abs() < 0.01);
        assert!((pct.neutral - 25.0).abs() < 0.01);
        assert!((pct.negative - 15.0).abs() < 0.01);
        assert!((pct.sum() - 100.0).abs() < 0.05);
    }

    #[test]
    fn compose_prefers_server_reported_percentages() {
        let reported = SentimentPercentages {
            positive: 59.5,
            neutral: 25.5,
            negative: 15.0,
        };
        let data = compose_dashboard(sample_stats(Some(reported)), vec![], vec![]);
        assert_eq!(data.metrics.sentiment_percentages, reported);
    }

    #[test]
    fn compose_carries_parts_through() {
        let topics = vec![TopicSentiment {
            name: "Library".to_string(),
            positive: 10,
            neutral: 4,
            negative: 2,
            total: 16,
            percentage: Some(8.0),
        }];
        let comments = vec![RecentComment {
            comment: "great campus".to_string(),
            sentiment: SentimentLabel::Positive,
            confidence: 0.91,
        }];
        let data = compose_dashboard(sample_stats(None), topics, comments);
        assert_eq!(data.metrics.total_comments, 200);
        assert_eq!(data.topics_analysis.len(), 1);
        assert_eq!(data.recent_comments.len(), 1);
        assert_eq!(data.topics_analysis[0].name, "Library");
    }

    #[test]
    fn synthesized_changes_keep_fixed_trends() {
        let changes = synthesize_changes();
        assert_eq!(changes.positive_sentiment.trend, TrendDirection::Up);
        assert_eq!(changes.negative_sentiment.trend, TrendDirection::Down);
        assert_eq!(changes.neutral_sentiment.trend, TrendDirection::Stable);
        assert!(changes.positive_sentiment.change.starts_with('+'));
        assert!(changes.negative_sentiment.change.starts_with('-'));
    }
}
