//! Core domain types for a research-to-post run.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PostError;

/// Inclusive bounds on `key_points` and `hashtags` counts.
pub const MIN_LIST_ITEMS: usize = 3;
pub const MAX_LIST_ITEMS: usize = 5;

// ---------------------------------------------------------------------------
// SearchHit
// ---------------------------------------------------------------------------

/// A single result returned by the search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
}

// ---------------------------------------------------------------------------
// StructuredPost
// ---------------------------------------------------------------------------

/// Wire shape of a post as requested from the model.
///
/// This is what the JSON schema is generated from; it carries no invariants.
/// Convert into a [`StructuredPost`] to enforce the list bounds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "LinkedInPost")]
pub struct PostDraft {
    /// Attention-grabbing opening (1-2 sentences).
    pub hook: String,
    /// Why this matters now (2-3 sentences).
    pub context: String,
    /// 3-5 bullet points with insights.
    #[schemars(length(min = 3, max = 5))]
    pub key_points: Vec<String>,
    /// Practical "so what" conclusion (1-2 sentences).
    pub takeaway: String,
    /// Engagement question (1 sentence).
    pub call_to_action: String,
    /// 3-5 relevant hashtags.
    #[schemars(length(min = 3, max = 5))]
    pub hashtags: Vec<String>,
}

/// A post whose `key_points` and `hashtags` counts are both within [3, 5].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PostDraft", into = "PostDraft")]
pub struct StructuredPost {
    hook: String,
    context: String,
    key_points: Vec<String>,
    takeaway: String,
    call_to_action: String,
    hashtags: Vec<String>,
}

impl StructuredPost {
    /// Validate a draft and build the post.
    pub fn new(draft: PostDraft) -> Result<Self, PostError> {
        let count_ok = |n: usize| (MIN_LIST_ITEMS..=MAX_LIST_ITEMS).contains(&n);

        if !count_ok(draft.key_points.len()) {
            return Err(PostError::KeyPointCount(draft.key_points.len()));
        }
        if !count_ok(draft.hashtags.len()) {
            return Err(PostError::HashtagCount(draft.hashtags.len()));
        }

        Ok(Self {
            hook: draft.hook,
            context: draft.context,
            key_points: draft.key_points,
            takeaway: draft.takeaway,
            call_to_action: draft.call_to_action,
            hashtags: draft.hashtags,
        })
    }

    pub fn hook(&self) -> &str {
        &self.hook
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn key_points(&self) -> &[String] {
        &self.key_points
    }

    pub fn takeaway(&self) -> &str {
        &self.takeaway
    }

    pub fn call_to_action(&self) -> &str {
        &self.call_to_action
    }

    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    /// Render the publishable text.
    ///
    /// Every section is followed by a blank line; key points get a `•`
    /// marker; hashtags close the post, space-separated.
    pub fn format(&self) -> String {
        let mut post = String::new();
        post.push_str(&self.hook);
        post.push_str("\n\n");
        post.push_str(&self.context);
        post.push_str("\n\n");

        for point in &self.key_points {
            post.push_str("• ");
            post.push_str(point);
            post.push_str("\n\n");
        }

        post.push_str(&self.takeaway);
        post.push_str("\n\n");
        post.push_str(&self.call_to_action);
        post.push_str("\n\n");
        post.push_str(&self.hashtags.join(" "));
        post
    }

    /// JSON schema describing the post, as sent to the model.
    pub fn json_schema() -> serde_json::Value {
        let mut schema = serde_json::to_value(schemars::schema_for!(PostDraft))
            .unwrap_or_else(|_| serde_json::json!({ "type": "object" }));
        if let Some(obj) = schema.as_object_mut() {
            obj.remove("$schema");
        }
        schema
    }
}

impl TryFrom<PostDraft> for StructuredPost {
    type Error = PostError;

    fn try_from(draft: PostDraft) -> Result<Self, Self::Error> {
        Self::new(draft)
    }
}

impl From<StructuredPost> for PostDraft {
    fn from(post: StructuredPost) -> Self {
        Self {
            hook: post.hook,
            context: post.context,
            key_points: post.key_points,
            takeaway: post.takeaway,
            call_to_action: post.call_to_action,
            hashtags: post.hashtags,
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

/// Soft validation outcome for a formatted post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `true` iff `warnings` is empty.
    pub valid: bool,
    pub warnings: Vec<String>,
    pub stats: PostStats,
}

/// Measurements taken while validating a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStats {
    /// Length in characters.
    pub length: usize,
    #[serde(rename = "paragraphs")]
    pub paragraph_count: usize,
    #[serde(rename = "hashtags")]
    pub hashtag_count: usize,
}

// ---------------------------------------------------------------------------
// ExecutionResult
// ---------------------------------------------------------------------------

/// Everything a completed run hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub topic: String,
    pub research_report: String,
    pub linkedin_post: String,
    pub metadata: ExecutionMetadata,
}

/// Run metadata, persisted as `<slug>_<ts>_metadata.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Number of tool invocations made during research.
    pub research_steps: usize,
    /// Length of `linkedin_post` in characters.
    pub post_length: usize,
    pub validation: ValidationReport,
    pub model_used: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(points: usize, tags: usize) -> PostDraft {
        PostDraft {
            hook: "Hook?".into(),
            context: "Context.".into(),
            key_points: (1..=points).map(|i| format!("Point {i}")).collect(),
            takeaway: "Takeaway.".into(),
            call_to_action: "Thoughts?".into(),
            hashtags: (1..=tags).map(|i| format!("#Tag{i}")).collect(),
        }
    }

    #[test]
    fn post_rejects_out_of_range_counts() {
        assert_eq!(StructuredPost::new(draft(2, 3)), Err(PostError::KeyPointCount(2)));
        assert_eq!(StructuredPost::new(draft(6, 3)), Err(PostError::KeyPointCount(6)));
        assert_eq!(StructuredPost::new(draft(3, 0)), Err(PostError::HashtagCount(0)));
        assert_eq!(StructuredPost::new(draft(5, 6)), Err(PostError::HashtagCount(6)));
        assert!(StructuredPost::new(draft(5, 5)).is_ok());
    }

    #[test]
    fn post_format_layout() {
        let post = StructuredPost::new(draft(3, 3)).unwrap();
        assert_eq!(
            post.format(),
            "Hook?\n\nContext.\n\n• Point 1\n\n• Point 2\n\n• Point 3\n\n\
             Takeaway.\n\nThoughts?\n\n#Tag1 #Tag2 #Tag3"
        );
    }

    #[test]
    fn post_deserialization_enforces_invariant() {
        let json = r##"{
            "hook": "h", "context": "c",
            "key_points": ["a", "b"],
            "takeaway": "t", "call_to_action": "q",
            "hashtags": ["#a", "#b", "#c"]
        }"##;
        let err = serde_json::from_str::<StructuredPost>(json).unwrap_err();
        assert!(err.to_string().contains("key points"));
    }

    #[test]
    fn post_schema_lists_required_fields() {
        let schema = StructuredPost::json_schema();
        assert!(schema.get("$schema").is_none());
        let required = schema["required"].as_array().expect("required array");
        assert_eq!(required.len(), 6);
        assert_eq!(schema["properties"]["hashtags"]["minItems"], 3);
        assert_eq!(schema["properties"]["key_points"]["maxItems"], 5);
    }

    #[test]
    fn stats_serialize_with_short_keys() {
        let stats = PostStats {
            length: 10,
            paragraph_count: 2,
            hashtag_count: 1,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["paragraphs"], 2);
        assert_eq!(json["hashtags"], 1);
    }
}
