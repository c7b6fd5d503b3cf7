use serde::{Deserialize, Serialize};

// --- screenshot analysis ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiAnalysis {
    pub components: Vec<String>,
    pub color_palette: Vec<String>,
    pub layout: String,
    pub estimated_complexity: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageResponse {
    pub success: bool,
    pub analysis: UiAnalysis,
    pub generated_code: String,
}

/// Reply shape the vision prompt asks for: the analysis plus the code body.
#[derive(Debug, Deserialize)]
pub(crate) struct VisionReply {
    #[serde(flatten)]
    pub analysis: UiAnalysis,
    #[serde(default)]
    pub code: String,
}

// --- page generation ---

#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    #[serde(default)]
    pub template: String,
    pub requirements: String,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageComponent {
    pub name: String,
    #[serde(default)]
    pub props: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStyles {
    pub theme: String,
    pub colors: PageColors,
    pub spacing: String,
    pub border_radius: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPage {
    pub template: String,
    pub components: Vec<PageComponent>,
    pub styles: PageStyles,
    #[serde(default)]
    pub routes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFile {
    pub name: String,
    pub content: String,
    #[serde(rename = "type")]
    pub file_type: String,
}

#[derive(Debug, Serialize)]
pub struct CreatePageResponse {
    pub success: bool,
    pub page: GeneratedPage,
    pub files: Vec<PageFile>,
}

/// Reply shape for a single generated component file.
#[derive(Debug, Deserialize)]
pub(crate) struct FileReply {
    #[serde(default)]
    pub name: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

// --- code review operations ---

#[derive(Debug, Deserialize)]
pub struct CodeRequest {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Improvement {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub severity: String,
    #[serde(default)]
    pub line: Option<u32>,
    pub suggestion: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveCodeResponse {
    pub success: bool,
    pub improvements: Vec<Improvement>,
    pub optimized_code: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImproveReply {
    #[serde(default)]
    pub improvements: Vec<Improvement>,
    #[serde(rename = "optimizedCode", default)]
    pub optimized_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub render_time: String,
    pub bundle_size: String,
    pub memory_usage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub score: u32,
    pub bottlenecks: Vec<String>,
    pub metrics: PerformanceMetrics,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzePerformanceResponse {
    pub success: bool,
    pub performance: PerformanceReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedPattern {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternReport {
    pub detected: Vec<DetectedPattern>,
    pub anti_patterns: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzePatternsResponse {
    pub success: bool,
    pub patterns: PatternReport,
}
