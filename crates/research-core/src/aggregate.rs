//! Grouping of article samples into per-tag and per-author stats.
//!
//! Means are exact `sum / count`; rounding is left to whoever renders them.
//! Sorting is stable so ties keep first-seen order.

use crate::models::{Article, AuthorStats, TagStats};
use std::collections::HashMap;

/// Stats for each requested tag, best average reactions first.
///
/// Tags are considered in caller order. A tag with no matching articles is
/// left out rather than reported with zeros.
pub fn group_by_tag<S: AsRef<str>>(articles: &[Article], tags: &[S], limit: usize) -> Vec<TagStats> {
    let mut stats: Vec<TagStats> = tags
        .iter()
        .filter_map(|tag| tag_stats(articles, tag.as_ref()))
        .collect();

    stats.sort_by(|a, b| b.avg_reactions.total_cmp(&a.avg_reactions));
    stats.truncate(limit);
    stats
}

fn tag_stats(articles: &[Article], tag: &str) -> Option<TagStats> {
    let tagged: Vec<&Article> = articles.iter().filter(|a| a.has_tag(tag)).collect();
    if tagged.is_empty() {
        return None;
    }

    let count = tagged.len();
    let total_reactions: i64 = tagged.iter().map(|a| a.reactions).sum();
    let total_comments: i64 = tagged.iter().map(|a| a.comments).sum();
    let total_reading: i64 = tagged.iter().map(|a| a.reading_time).sum();

    Some(TagStats {
        name: tag.to_string(),
        article_count: count,
        total_reactions,
        total_comments,
        avg_reactions: total_reactions as f64 / count as f64,
        avg_comments: total_comments as f64 / count as f64,
        avg_reading_time: total_reading as f64 / count as f64,
    })
}

/// Stats per author, most total reactions first.
pub fn group_by_author(articles: &[Article], limit: usize) -> Vec<AuthorStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<AuthorStats> = Vec::new();

    for article in articles {
        let slot = *index.entry(article.author.as_str()).or_insert_with(|| {
            stats.push(AuthorStats {
                username: article.author.clone(),
                ..Default::default()
            });
            stats.len() - 1
        });

        let entry = &mut stats[slot];
        entry.article_count += 1;
        entry.total_reactions += article.reactions;
        entry.total_comments += article.comments;
        entry.articles.push(article.clone());
    }

    for entry in &mut stats {
        entry.avg_reactions = entry.total_reactions as f64 / entry.article_count as f64;
    }

    stats.sort_by(|a, b| b.total_reactions.cmp(&a.total_reactions));
    stats.truncate(limit);
    stats
}
