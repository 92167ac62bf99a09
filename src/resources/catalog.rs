use once_cell::sync::Lazy;

use crate::models::Resource;

/// Built-in learning resources, in display order.
pub static CATALOG: Lazy<Vec<Resource>> = Lazy::new(|| {
    vec![
        Resource::new(
            "Python Documentation",
            "Official Python documentation and tutorials.",
            "https://docs.python.org/3/",
            &["python", "documentation", "basics", "tutorial"],
        ),
        Resource::new(
            "Python Style Guide (PEP 8)",
            "Style guide for Python code - how to format your code for maximum readability.",
            "https://peps.python.org/pep-0008/",
            &["python", "style", "formatting", "best-practices"],
        ),
        Resource::new(
            "Real Python Tutorials",
            "In-depth Python tutorials for beginners and advanced developers.",
            "https://realpython.com/",
            &["python", "tutorial", "learning", "examples"],
        ),
        Resource::new(
            "MDN JavaScript Guide",
            "Comprehensive guide to JavaScript for all skill levels.",
            "https://developer.mozilla.org/en-US/docs/Web/JavaScript/Guide",
            &["javascript", "js", "web", "frontend"],
        ),
        Resource::new(
            "React Documentation",
            "Official React documentation with tutorials and API reference.",
            "https://react.dev/",
            &["react", "javascript", "frontend", "web"],
        ),
        Resource::new(
            "TypeScript Handbook",
            "Official TypeScript documentation and guides.",
            "https://www.typescriptlang.org/docs/",
            &["typescript", "ts", "javascript", "types"],
        ),
        Resource::new(
            "Next.js Documentation",
            "Learn about Next.js features and API.",
            "https://nextjs.org/docs",
            &["nextjs", "react", "frontend", "web"],
        ),
        Resource::new(
            "CSS Tricks",
            "Tips, tricks, and techniques on using CSS.",
            "https://css-tricks.com/",
            &["css", "frontend", "web", "styling"],
        ),
        Resource::new(
            "HTML MDN Web Docs",
            "HTML documentation with examples and tutorials.",
            "https://developer.mozilla.org/en-US/docs/Web/HTML",
            &["html", "web", "frontend", "basics"],
        ),
    ]
});

/// The built-in catalog as a slice.
pub fn builtin() -> &'static [Resource] {
    CATALOG.as_slice()
}
