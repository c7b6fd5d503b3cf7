//! Placeholder values substituted when the completion endpoint cannot be
//! reached or its reply cannot be decoded. Each matches the shape of a
//! successful result exactly, so callers never surface an error.

use crate::generate::dto::{
    DetectedPattern, GeneratedPage, Improvement, PageColors, PageComponent, PageFile, PageStyles,
    PatternReport, PerformanceMetrics, PerformanceReport, UiAnalysis,
};

pub fn analysis() -> UiAnalysis {
    UiAnalysis {
        components: vec![
            "Header".into(),
            "Navigation".into(),
            "Content".into(),
            "Footer".into(),
        ],
        color_palette: vec!["#3B82F6".into(), "#1E40AF".into(), "#F8FAFC".into()],
        layout: "single-column".into(),
        estimated_complexity: "medium".into(),
    }
}

pub fn generated_code() -> String {
    r#"import React from 'react';

export default function GeneratedPage() {
  return (
    <div className="min-h-screen bg-slate-50">
      <header className="bg-blue-600 px-6 py-4 text-white">
        <h1 className="text-xl font-semibold">Generated Page</h1>
      </header>
      <main className="mx-auto max-w-4xl px-6 py-8">
        <p className="text-slate-700">
          Automatic analysis was unavailable; this is a starting layout.
        </p>
      </main>
      <footer className="px-6 py-4 text-sm text-slate-500">Generated by pageforge</footer>
    </div>
  );
}
"#
    .to_string()
}

pub fn page(template: &str, style: &str) -> GeneratedPage {
    GeneratedPage {
        template: template.to_string(),
        components: vec![
            PageComponent {
                name: "Header".into(),
                props: vec!["title".into()],
            },
            PageComponent {
                name: "Hero".into(),
                props: vec!["headline".into(), "subtext".into()],
            },
            PageComponent {
                name: "Footer".into(),
                props: vec![],
            },
        ],
        styles: PageStyles {
            theme: style.to_string(),
            colors: PageColors {
                primary: "#3B82F6".into(),
                secondary: "#1E40AF".into(),
                accent: "#F59E0B".into(),
            },
            spacing: "comfortable".into(),
            border_radius: "0.5rem".into(),
        },
        routes: vec!["/".into()],
    }
}

pub fn component_file(name: &str) -> PageFile {
    PageFile {
        name: format!("{name}.tsx"),
        content: format!(
            r#"import React from 'react';

export default function {name}() {{
  return (
    <section className="px-6 py-8">
      <h2 className="text-lg font-semibold">{name}</h2>
    </section>
  );
}}
"#
        ),
        file_type: "component".into(),
    }
}

pub fn improvements() -> Vec<Improvement> {
    vec![
        Improvement {
            kind: "readability".into(),
            description: "Automated review was unavailable for this submission".into(),
            severity: "low".into(),
            line: None,
            suggestion: "Re-run the analysis once the service is reachable".into(),
        },
    ]
}

pub fn performance() -> PerformanceReport {
    PerformanceReport {
        score: 70,
        bottlenecks: vec![],
        metrics: PerformanceMetrics {
            render_time: "unknown".into(),
            bundle_size: "unknown".into(),
            memory_usage: "unknown".into(),
        },
        recommendations: vec![
            "Automated analysis was unavailable; re-submit to get detailed metrics".into(),
        ],
    }
}

pub fn patterns() -> PatternReport {
    PatternReport {
        detected: vec![DetectedPattern {
            name: "unknown".into(),
            description: "Automated analysis was unavailable for this submission".into(),
        }],
        anti_patterns: vec![],
        recommendations: vec!["Re-run pattern detection once the service is reachable".into()],
    }
}
