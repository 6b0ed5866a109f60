//! Topic and post validators.
//!
//! Both are pure: the topic check runs before any external call, the post
//! check only produces warnings.

use std::sync::LazyLock;

use regex::Regex;

use postcraft_shared::{PostStats, TopicError, ValidationReport};

pub const MIN_TOPIC_CHARS: usize = 3;
pub const MAX_TOPIC_CHARS: usize = 200;

const MIN_POST_CHARS: usize = 100;
const MAX_POST_CHARS: usize = 3000;
const MAX_HASHTAGS: usize = 10;
const MIN_PARAGRAPHS: usize = 3;

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("valid regex"));

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s").expect("valid regex"));

/// Check that a topic is usable before research starts.
pub fn validate_topic(topic: &str) -> Result<(), TopicError> {
    if topic.trim().is_empty() {
        return Err(TopicError::EmptyInput);
    }

    let len = topic.chars().count();
    if len < MIN_TOPIC_CHARS {
        return Err(TopicError::TooShort { len });
    }
    if len > MAX_TOPIC_CHARS {
        return Err(TopicError::TooLong { len });
    }

    Ok(())
}

/// Run every post check and collect the warnings.
///
/// `valid` is true only when no check produced a warning.
pub fn validate_post(post: &str) -> ValidationReport {
    let mut warnings = Vec::new();

    let length = post.chars().count();
    if length < MIN_POST_CHARS {
        warnings.push(format!("Post might be too short (< {MIN_POST_CHARS} chars)"));
    } else if length > MAX_POST_CHARS {
        warnings.push(format!(
            "Post exceeds recommended length (> {MAX_POST_CHARS} chars)"
        ));
    }

    let hashtag_count = HASHTAG_RE.find_iter(post).count();
    if hashtag_count == 0 {
        warnings.push("No hashtags found".to_string());
    } else if hashtag_count > MAX_HASHTAGS {
        warnings.push(format!(
            "Too many hashtags ({hashtag_count}), optimal is 3-5"
        ));
    }

    let paragraph_count = post.split("\n\n").count();
    if paragraph_count < MIN_PARAGRAPHS {
        warnings.push("Consider adding more line breaks for readability".to_string());
    }

    if HEADER_RE.is_match(post) {
        warnings.push(
            "Contains markdown headers (# ##) which won't render on LinkedIn".to_string(),
        );
    }

    ValidationReport {
        valid: warnings.is_empty(),
        warnings,
        stats: PostStats {
            length,
            paragraph_count,
            hashtag_count,
        },
    }
}
