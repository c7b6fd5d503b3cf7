//! Prompt templates for the completion endpoint.
//!
//! Each prompt spells out the exact JSON object the reply must contain.
//! Replies are still free text; decoding stays best-effort (see `extract`).

pub fn analyze_image_prompt() -> String {
    r##"You are a senior front-end engineer. Analyze the attached UI screenshot
and produce React/TypeScript code that reproduces it.

Return EXACTLY ONE JSON object (no markdown, no prose, no code fences):

{
  "components": ["<detected component name>", ...],
  "colorPalette": ["#RRGGBB", ...],
  "layout": "<short layout description, e.g. single-column, sidebar-left, grid>",
  "estimatedComplexity": "low" | "medium" | "high",
  "code": "<complete .tsx source for the page as one React component>"
}

Rules:
- TypeScript with strict typing; functional components only.
- Tailwind CSS utility classes for styling.
- The code must be self-contained and compile as a single file."##
        .to_string()
}

pub fn page_structure_prompt(template: &str, requirements: &str, style: &str) -> String {
    format!(
        r##"You are a web page scaffolding planner. Design a React page from the
inputs below.

Template: {template}
Style: {style}
Requirements:
{requirements}

Return EXACTLY ONE JSON object (no markdown, no prose, no code fences):

{{
  "template": "{template}",
  "components": [ {{ "name": "<PascalCase component name>", "props": ["<prop name>", ...] }}, ... ],
  "styles": {{
    "theme": "<theme keyword>",
    "colors": {{ "primary": "#RRGGBB", "secondary": "#RRGGBB", "accent": "#RRGGBB" }},
    "spacing": "<compact|comfortable|spacious>",
    "borderRadius": "<css length>"
  }},
  "routes": ["/", ...]
}}

Keep the component list minimal and coherent for the template."##
    )
}

pub fn component_file_prompt(name: &str, props: &[String], template: &str, style: &str) -> String {
    let props = if props.is_empty() {
        "none".to_string()
    } else {
        props.join(", ")
    };
    format!(
        r#"Write the source file for the React component below. It belongs to a
"{template}" page with a "{style}" visual style.

Component: {name}
Props: {props}

Return EXACTLY ONE JSON object (no markdown, no prose, no code fences):

{{
  "name": "{name}.tsx",
  "content": "<complete TypeScript source for the component>"
}}

Rules:
- TypeScript with strict typing; a typed Props interface when props exist.
- Tailwind CSS utility classes for styling.
- Default export the component."#
    )
}

pub fn improve_code_prompt(code: &str) -> String {
    format!(
        r#"Review the code below as a strict senior reviewer. Identify concrete
improvements and produce an optimized version.

Return EXACTLY ONE JSON object (no markdown, no prose, no code fences):

{{
  "improvements": [
    {{
      "type": "<performance|readability|security|accessibility|bug>",
      "description": "<what is wrong>",
      "severity": "<low|medium|high>",
      "line": <line number or null>,
      "suggestion": "<how to fix it>"
    }}, ...
  ],
  "optimizedCode": "<the full improved source>"
}}

Code:
{code}"#
    )
}

pub fn performance_prompt(code: &str) -> String {
    format!(
        r#"Analyze the runtime performance characteristics of the code below.

Return EXACTLY ONE JSON object (no markdown, no prose, no code fences):

{{
  "score": <0-100 integer>,
  "bottlenecks": ["<specific bottleneck>", ...],
  "metrics": {{
    "renderTime": "<estimate>",
    "bundleSize": "<estimate>",
    "memoryUsage": "<estimate>"
  }},
  "recommendations": ["<actionable recommendation>", ...]
}}

Code:
{code}"#
    )
}

pub fn patterns_prompt(code: &str) -> String {
    format!(
        r#"Identify the design patterns and anti-patterns used in the code below.

Return EXACTLY ONE JSON object (no markdown, no prose, no code fences):

{{
  "detected": [ {{ "name": "<pattern name>", "description": "<where and how it is used>" }}, ... ],
  "antiPatterns": ["<anti-pattern with location>", ...],
  "recommendations": ["<refactoring recommendation>", ...]
}}

Code:
{code}"#
    )
}
