use tracing::warn;

use crate::ai::client::CompletionClient;
use crate::ai::{extract, prompts};
use crate::generate::dto::{
    AnalyzeImageResponse, AnalyzePatternsResponse, AnalyzePerformanceResponse, CreatePageRequest,
    CreatePageResponse, FileReply, GeneratedPage, ImproveCodeResponse, ImproveReply, PageFile,
    PatternReport, PerformanceReport, VisionReply,
};
use crate::generate::fallback;

/// Bound on per-request completion calls during page generation.
const MAX_COMPONENT_FILES: usize = 3;

/// Analyze an uploaded screenshot: one vision call returning the structural
/// analysis and a code rendition. Degrades to the canned analysis.
pub async fn analyze_image(
    ai: &dyn CompletionClient,
    image: &[u8],
    mime: &str,
) -> AnalyzeImageResponse {
    let prompt = prompts::analyze_image_prompt();
    let reply = match ai.complete_vision(&prompt, image, mime).await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "image analysis call failed; using fallback");
            return fallback_analyze_image();
        }
    };

    match extract::extract_as::<VisionReply>(&reply) {
        Some(parsed) => AnalyzeImageResponse {
            success: true,
            generated_code: if parsed.code.is_empty() {
                fallback::generated_code()
            } else {
                parsed.code
            },
            analysis: parsed.analysis,
        },
        None => {
            warn!("image analysis reply unparsable; using fallback");
            fallback_analyze_image()
        }
    }
}

fn fallback_analyze_image() -> AnalyzeImageResponse {
    AnalyzeImageResponse {
        success: true,
        analysis: fallback::analysis(),
        generated_code: fallback::generated_code(),
    }
}

/// Scaffold a page: one call for the structure, then one per component file
/// (capped). Structure and file failures each degrade independently.
pub async fn create_page(ai: &dyn CompletionClient, req: &CreatePageRequest) -> CreatePageResponse {
    let template = {
        let t = req.template.trim();
        if t.is_empty() {
            "landing"
        } else {
            t
        }
    };
    let style = req.style.as_deref().unwrap_or("modern");

    let page: GeneratedPage = match ai
        .complete(&prompts::page_structure_prompt(
            template,
            &req.requirements,
            style,
        ))
        .await
    {
        Ok(reply) => extract::extract_as(&reply).unwrap_or_else(|| {
            warn!("page structure reply unparsable; using fallback");
            fallback::page(template, style)
        }),
        Err(e) => {
            warn!(error = %e, "page structure call failed; using fallback");
            fallback::page(template, style)
        }
    };

    let mut files = Vec::new();
    for component in page.components.iter().take(MAX_COMPONENT_FILES) {
        let file = match ai
            .complete(&prompts::component_file_prompt(
                &component.name,
                &component.props,
                template,
                style,
            ))
            .await
        {
            Ok(reply) => match extract::extract_as::<FileReply>(&reply) {
                Some(parsed) => PageFile {
                    name: parsed
                        .name
                        .unwrap_or_else(|| format!("{}.tsx", component.name)),
                    content: parsed.content,
                    file_type: "component".into(),
                },
                None => {
                    warn!(component = %component.name, "component reply unparsable; using stub");
                    fallback::component_file(&component.name)
                }
            },
            Err(e) => {
                warn!(error = %e, component = %component.name, "component call failed; using stub");
                fallback::component_file(&component.name)
            }
        };
        files.push(file);
    }

    CreatePageResponse {
        success: true,
        page,
        files,
    }
}

/// Code review: one call, fallback keeps the submitted code unchanged.
pub async fn improve_code(ai: &dyn CompletionClient, code: &str) -> ImproveCodeResponse {
    match ai.complete(&prompts::improve_code_prompt(code)).await {
        Ok(reply) => match extract::extract_as::<ImproveReply>(&reply) {
            Some(parsed) => ImproveCodeResponse {
                success: true,
                improvements: parsed.improvements,
                optimized_code: parsed.optimized_code.unwrap_or_else(|| code.to_string()),
            },
            None => {
                warn!("improve reply unparsable; using fallback");
                fallback_improve(code)
            }
        },
        Err(e) => {
            warn!(error = %e, "improve call failed; using fallback");
            fallback_improve(code)
        }
    }
}

fn fallback_improve(code: &str) -> ImproveCodeResponse {
    ImproveCodeResponse {
        success: true,
        improvements: fallback::improvements(),
        optimized_code: code.to_string(),
    }
}

pub async fn analyze_performance(
    ai: &dyn CompletionClient,
    code: &str,
) -> AnalyzePerformanceResponse {
    let performance: PerformanceReport = match ai.complete(&prompts::performance_prompt(code)).await
    {
        Ok(reply) => extract::extract_as(&reply).unwrap_or_else(|| {
            warn!("performance reply unparsable; using fallback");
            fallback::performance()
        }),
        Err(e) => {
            warn!(error = %e, "performance call failed; using fallback");
            fallback::performance()
        }
    };
    AnalyzePerformanceResponse {
        success: true,
        performance,
    }
}

pub async fn analyze_patterns(ai: &dyn CompletionClient, code: &str) -> AnalyzePatternsResponse {
    let patterns: PatternReport = match ai.complete(&prompts::patterns_prompt(code)).await {
        Ok(reply) => extract::extract_as(&reply).unwrap_or_else(|| {
            warn!("patterns reply unparsable; using fallback");
            fallback::patterns()
        }),
        Err(e) => {
            warn!(error = %e, "patterns call failed; using fallback");
            fallback::patterns()
        }
    };
    AnalyzePatternsResponse {
        success: true,
        patterns,
    }
}

#[cfg(test)]
mod orchestration_tests {
    use super::*;
    use crate::ai::client::CompletionError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FailingClient;

    #[async_trait]
    impl CompletionClient for FailingClient {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            Err(CompletionError::Api {
                status: 500,
                body: "boom".into(),
            })
        }
        async fn complete_vision(
            &self,
            _prompt: &str,
            _image: &[u8],
            _mime: &str,
        ) -> Result<String, CompletionError> {
            Err(CompletionError::Api {
                status: 500,
                body: "boom".into(),
            })
        }
    }

    /// Replays scripted replies in order; repeats the last one when the
    /// script runs out. Counts every call.
    struct ScriptedClient {
        replies: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|s| s.to_string()).collect()),
                calls: AtomicUsize::new(0),
            }
        }

        fn next_reply(&self) -> String {
            let mut replies = self.replies.lock().unwrap();
            if replies.len() > 1 {
                replies.pop().unwrap()
            } else {
                replies.last().cloned().unwrap_or_default()
            }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.next_reply())
        }
        async fn complete_vision(
            &self,
            _prompt: &str,
            _image: &[u8],
            _mime: &str,
        ) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.next_reply())
        }
    }

    #[tokio::test]
    async fn analyze_image_falls_back_on_call_failure() {
        let resp = analyze_image(&FailingClient, b"fake", "image/png").await;
        assert!(resp.success);
        assert_eq!(resp.analysis.components, fallback::analysis().components);
        assert!(!resp.generated_code.is_empty());
    }

    #[tokio::test]
    async fn analyze_image_falls_back_on_garbage_reply() {
        let client = ScriptedClient::new(&["sorry, I cannot help with that"]);
        let resp = analyze_image(&client, b"fake", "image/png").await;
        assert!(resp.success);
        assert_eq!(resp.analysis.layout, fallback::analysis().layout);
    }

    #[tokio::test]
    async fn analyze_image_parses_a_well_formed_reply() {
        let client = ScriptedClient::new(&[r##"Here you go:
{"components": ["Navbar", "Card"], "colorPalette": ["#112233"], "layout": "grid",
 "estimatedComplexity": "low", "code": "export default function X() { return null; }"}"##]);
        let resp = analyze_image(&client, b"fake", "image/png").await;
        assert!(resp.success);
        assert_eq!(resp.analysis.components, vec!["Navbar", "Card"]);
        assert_eq!(resp.analysis.estimated_complexity, "low");
        assert!(resp.generated_code.contains("export default"));
    }

    #[tokio::test]
    async fn create_page_caps_file_generation_calls() {
        let structure = r##"{"template": "dashboard",
            "components": [
                {"name": "Sidebar", "props": []},
                {"name": "StatCard", "props": ["label", "value"]},
                {"name": "Chart", "props": []},
                {"name": "Table", "props": []},
                {"name": "Footer", "props": []}
            ],
            "styles": {"theme": "dark", "colors": {"primary": "#000000",
                "secondary": "#111111", "accent": "#222222"},
                "spacing": "compact", "borderRadius": "0.25rem"},
            "routes": ["/", "/reports"]}"##;
        let file = r#"{"name": "Generated.tsx", "content": "export default function C() { return null; }"}"#;
        let client = ScriptedClient::new(&[structure, file]);

        let resp = create_page(
            &client,
            &CreatePageRequest {
                template: "dashboard".into(),
                requirements: "stats overview".into(),
                style: Some("dark".into()),
            },
        )
        .await;

        assert!(resp.success);
        assert_eq!(resp.page.components.len(), 5);
        // one structure call plus at most three file calls
        assert_eq!(client.calls.load(Ordering::SeqCst), 4);
        assert_eq!(resp.files.len(), 3);
        assert!(resp.files.iter().all(|f| f.file_type == "component"));
    }

    #[tokio::test]
    async fn create_page_degrades_to_fallback_page_and_stub_files() {
        let resp = create_page(
            &FailingClient,
            &CreatePageRequest {
                template: String::new(),
                requirements: "anything".into(),
                style: None,
            },
        )
        .await;

        assert!(resp.success);
        let expected = fallback::page("landing", "modern");
        assert_eq!(resp.page.template, expected.template);
        assert_eq!(resp.page.styles.theme, expected.styles.theme);
        assert_eq!(resp.files.len(), expected.components.len().min(3));
        // stub files carry the component names
        assert!(resp.files.iter().any(|f| f.name == "Header.tsx"));
    }

    #[tokio::test]
    async fn improve_code_keeps_input_code_in_fallback() {
        let code = "const answer = 42;";
        let resp = improve_code(&FailingClient, code).await;
        assert!(resp.success);
        assert_eq!(resp.optimized_code, code);
        assert!(!resp.improvements.is_empty());
    }

    #[tokio::test]
    async fn improve_code_parses_reply() {
        let client = ScriptedClient::new(&[r#"{"improvements": [
            {"type": "performance", "description": "memoize the list",
             "severity": "medium", "line": 12, "suggestion": "wrap in useMemo"}],
            "optimizedCode": "const memo = useMemo(() => list, [list]);"}"#]);
        let resp = improve_code(&client, "const list = build();").await;
        assert!(resp.success);
        assert_eq!(resp.improvements.len(), 1);
        assert_eq!(resp.improvements[0].kind, "performance");
        assert_eq!(resp.improvements[0].line, Some(12));
        assert!(resp.optimized_code.contains("useMemo"));
    }

    #[tokio::test]
    async fn performance_and_patterns_fall_back() {
        let perf = analyze_performance(&FailingClient, "let x = 1;").await;
        assert!(perf.success);
        assert_eq!(perf.performance.score, fallback::performance().score);

        let pat = analyze_patterns(&FailingClient, "let x = 1;").await;
        assert!(pat.success);
        assert_eq!(pat.patterns.detected.len(), 1);
    }

    #[tokio::test]
    async fn patterns_parses_reply() {
        let client = ScriptedClient::new(&[r#"```json
{"detected": [{"name": "observer", "description": "event emitter in store.ts"}],
 "antiPatterns": ["prop drilling"], "recommendations": ["introduce context"]}
```"#]);
        let resp = analyze_patterns(&client, "code").await;
        assert_eq!(resp.patterns.detected[0].name, "observer");
        assert_eq!(resp.patterns.anti_patterns, vec!["prop drilling"]);
    }
}
