use serde::{Deserialize, Serialize};

use crate::error::{Result, ShortError};

/// One narrated beat of a short, paired with what should be on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Spoken narration for this beat
    pub voiceover: String,
    /// Prompt describing the visual for this beat
    pub visual_prompt: String,
}

impl Scene {
    pub fn new(voiceover: impl Into<String>, visual_prompt: impl Into<String>) -> Self {
        Self {
            voiceover: voiceover.into(),
            visual_prompt: visual_prompt.into(),
        }
    }
}

/// A complete generated short: title, full narration and ordered scenes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortScript {
    pub title: String,
    pub script: String,
    pub scenes: Vec<Scene>,
}

/// Body of `POST /api/short`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRequest {
    pub topic: String,
}

/// Body returned in place of a script when generation fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Removes every Markdown code-fence marker and the surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses raw model output into a [`ShortScript`].
///
/// The text is untrusted: it must deserialize into the full shape, with
/// string fields everywhere and at least one scene. Nothing is partially
/// accepted.
pub fn parse_script(raw: &str) -> Result<ShortScript> {
    let json_text = strip_code_fences(raw);

    let script: ShortScript = serde_json::from_str(&json_text)
        .map_err(|e| ShortError::ScriptError(format!("Failed to parse script JSON: {}", e)))?;

    if script.scenes.is_empty() {
        return Err(ShortError::ScriptError(
            "Script contains no scenes".to_string(),
        ));
    }

    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = r#"{"title":"T","script":"S","scenes":[{"voiceover":"v1","visual_prompt":"p1"},{"voiceover":"v2","visual_prompt":"p2"}]}"#;

    #[test]
    fn test_strip_is_noop_on_clean_text() {
        assert_eq!(strip_code_fences(PLAIN), PLAIN);
        let once = strip_code_fences(&format!("```json\n{}\n```", PLAIN));
        assert_eq!(strip_code_fences(&once), once);
    }

    #[test]
    fn test_strip_removes_both_fence_forms() {
        let tagged = format!("```json\n{}\n```", PLAIN);
        let bare = format!("  ```\n{}\n```  \n", PLAIN);
        assert_eq!(strip_code_fences(&tagged), PLAIN);
        assert_eq!(strip_code_fences(&bare), PLAIN);
        assert_eq!(parse_script(&tagged).unwrap(), parse_script(PLAIN).unwrap());
        assert_eq!(parse_script(&bare).unwrap(), parse_script(PLAIN).unwrap());
    }

    #[test]
    fn test_parse_preserves_scene_order() {
        let script = parse_script(PLAIN).unwrap();
        assert_eq!(script.title, "T");
        assert_eq!(
            script.scenes,
            vec![Scene::new("v1", "p1"), Scene::new("v2", "p2")]
        );
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let text = r#"{"title":"T","script":"S","mood":"calm","scenes":[{"voiceover":"v","visual_prompt":"p","seconds":3}]}"#;
        assert_eq!(parse_script(text).unwrap().scenes.len(), 1);
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        let cases = [
            "not json at all",
            r#"{"title":"T","script":"S"}"#,
            r#"{"title":7,"script":"S","scenes":[{"voiceover":"v","visual_prompt":"p"}]}"#,
            r#"{"title":"T","script":"S","scenes":[{"voiceover":"v"}]}"#,
            r#"{"title":"T","script":"S","scenes":[{"voice":"v","visual_prompt":"p"}]}"#,
            r#"{"title":"T","script":"S","scenes":"one"}"#,
            r#"[{"voiceover":"v","visual_prompt":"p"}]"#,
        ];
        for case in cases {
            assert!(
                matches!(parse_script(case), Err(ShortError::ScriptError(_))),
                "accepted: {}",
                case
            );
        }
    }

    #[test]
    fn test_parse_rejects_empty_scene_list() {
        let err = parse_script(r#"{"title":"T","script":"S","scenes":[]}"#).unwrap_err();
        assert!(err.to_string().contains("no scenes"));
    }

    #[test]
    fn test_error_result_omits_missing_message() {
        let json = serde_json::to_string(&ErrorResult::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
