use crate::generate::dto::TemplateInfo;

/// Fixed catalog of starting layouts. Served as-is; no completion call.
pub const TEMPLATES: [TemplateInfo; 5] = [
    TemplateInfo {
        id: "landing",
        name: "Landing Page",
        description: "Hero section, feature highlights and a call to action",
    },
    TemplateInfo {
        id: "dashboard",
        name: "Dashboard",
        description: "Sidebar navigation with stat cards and data tables",
    },
    TemplateInfo {
        id: "portfolio",
        name: "Portfolio",
        description: "Project gallery with an about section and contact form",
    },
    TemplateInfo {
        id: "blog",
        name: "Blog",
        description: "Article list, single-post layout and tag navigation",
    },
    TemplateInfo {
        id: "ecommerce",
        name: "E-commerce",
        description: "Product grid, product detail page and cart summary",
    },
];

pub fn catalog() -> &'static [TemplateInfo] {
    &TEMPLATES
}

pub fn is_known(id: &str) -> bool {
    TEMPLATES.iter().any(|t| t.id == id)
}

#[cfg(test)]
mod catalog_tests {
    use super::*;

    #[test]
    fn exactly_five_templates_in_fixed_order() {
        let ids: Vec<&str> = catalog().iter().map(|t| t.id).collect();
        assert_eq!(ids, ["landing", "dashboard", "portfolio", "blog", "ecommerce"]);
        for t in catalog() {
            assert!(!t.name.is_empty());
            assert!(!t.description.is_empty());
        }
    }

    #[test]
    fn known_ids_resolve() {
        assert!(is_known("blog"));
        assert!(!is_known("wiki"));
    }
}
