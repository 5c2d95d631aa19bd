//! # Heuristic Ranker
//!
//! A pure function over tools that scores each by how dangerous its name,
//! description, and parameter names look, then sorts descending by score.
//! Ties keep their original enumeration order — `sort_by` is used (not
//! `sort_unstable_by`) specifically to preserve that stability.

use once_cell::sync::Lazy;

use crate::mcp_client::Tool;

/// Keyword weights scored against a tool's name and description.
static NAME_DESC_KEYWORDS: Lazy<Vec<(&'static str, i32)>> = Lazy::new(|| {
    vec![
        ("exec", 5),
        ("run", 5),
        ("shell", 5),
        ("cmd", 5),
        ("eval", 5),
        ("fetch", 4),
        ("http", 4),
        ("url", 4),
        ("sql", 4),
        ("read", 3),
        ("write", 3),
        ("file", 3),
        ("query", 3),
        ("template", 2),
        ("regex", 2),
    ]
});

/// Keyword weights scored against each top-level input-schema property name.
static PARAM_KEYWORDS: Lazy<Vec<(&'static str, i32)>> = Lazy::new(|| {
    vec![
        ("cmd", 4),
        ("command", 4),
        ("url", 4),
        ("path", 3),
        ("query", 3),
        ("filename", 3),
        ("file", 3),
        ("headers", 2),
        ("template", 2),
        ("regex", 2),
    ]
});

/// A tool paired with its heuristic risk score.
#[derive(Debug, Clone)]
pub struct ToolRisk {
    pub tool: Tool,
    pub score: i32,
}

/// Extracts the top-level property names of a tool's `inputSchema.properties`.
pub fn extract_param_names(tool: &Tool) -> Vec<String> {
    tool.input_schema
        .get("properties")
        .and_then(|p| p.as_object())
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default()
}

fn score_tool(tool: &Tool) -> i32 {
    let lower_name = tool.name.to_lowercase();
    let lower_desc = tool.description.to_lowercase();

    let mut score = 0;
    for (keyword, weight) in NAME_DESC_KEYWORDS.iter() {
        if lower_name.contains(keyword) || lower_desc.contains(keyword) {
            score += weight;
        }
    }

    for param in extract_param_names(tool) {
        let lower_param = param.to_lowercase();
        for (keyword, weight) in PARAM_KEYWORDS.iter() {
            if lower_param.contains(keyword) {
                score += weight;
            }
        }
    }

    score
}

/// Scores and sorts `tools` by descending risk score, preserving original
/// order among ties.
pub fn rank_tools(tools: &[Tool]) -> Vec<ToolRisk> {
    let mut risks: Vec<ToolRisk> = tools
        .iter()
        .map(|tool| ToolRisk {
            tool: tool.clone(),
            score: score_tool(tool),
        })
        .collect();
    risks.sort_by(|a, b| b.score.cmp(&a.score));
    risks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool(name: &str, description: &str, props: serde_json::Value) -> Tool {
        Tool {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: json!({"type": "object", "properties": props}),
        }
    }

    #[test]
    fn exec_keyword_outranks_read() {
        let exec_tool = tool("run_shell", "", json!({}));
        let read_tool = tool("read_file", "", json!({}));
        let ranked = rank_tools(&[read_tool.clone(), exec_tool.clone()]);
        assert_eq!(ranked[0].tool.name, "run_shell");
        assert_eq!(ranked[1].tool.name, "read_file");
    }

    #[test]
    fn ties_preserve_enumeration_order() {
        let a = tool("alpha", "nothing interesting", json!({}));
        let b = tool("beta", "nothing interesting either", json!({}));
        let ranked = rank_tools(&[a.clone(), b.clone()]);
        assert_eq!(ranked[0].tool.name, "alpha");
        assert_eq!(ranked[1].tool.name, "beta");
    }

    #[test]
    fn param_keywords_contribute_to_score() {
        let t = tool("noop", "", json!({"cmd": {"type": "string"}}));
        let ranked = rank_tools(&[t]);
        assert_eq!(ranked[0].score, 4);
    }
}
