use serde::{Deserialize, Serialize};

pub const UNKNOWN_TYPE: &str = "Unknown";

/// One cursor role and the filename keyword groups that identify it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRule {
    pub label: String,
    pub keywords: Vec<Vec<String>>,
}

impl TypeRule {
    fn new(label: &str, keywords: &[&[&str]]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords
                .iter()
                .map(|group| group.iter().map(|kw| kw.to_string()).collect())
                .collect(),
        }
    }
}

/// Ordered filename keyword lookup. Earlier rules win.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMap {
    #[serde(default = "default_rules")]
    pub rules: Vec<TypeRule>,
}

impl Default for TypeMap {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl TypeMap {
    /// Label for a file name, or [`UNKNOWN_TYPE`].
    ///
    /// First pass: a group of several keywords needs all of them, a
    /// single-keyword group needs that one. Second pass accepts any keyword
    /// of any group.
    pub fn classify(&self, file_name: &str) -> &str {
        let name = file_name.to_lowercase();
        let contains = |kw: &String| name.contains(&kw.to_lowercase());

        let strict = self.rules.iter().find(|rule| {
            rule.keywords
                .iter()
                .any(|group| !group.is_empty() && group.iter().all(contains))
        });
        if let Some(rule) = strict {
            return &rule.label;
        }

        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|group| group.iter().any(contains)))
            .map_or(UNKNOWN_TYPE, |rule| rule.label.as_str())
    }
}

fn default_rules() -> Vec<TypeRule> {
    vec![
        TypeRule::new(
            "Window NW-SE, Window NW, Window SE",
            &[&["斜め", "縮小1"], &["diagonal", "resize 1"]],
        ),
        TypeRule::new(
            "Window NE-SW, Window NE, Window SW",
            &[&["斜め", "縮小2"], &["diagonal", "resize 2"]],
        ),
        TypeRule::new(
            "Window E-W, Window E, Window W, Resize E-W, Resize E, Resize W",
            &[&["左右"], &["horizontal"]],
        ),
        TypeRule::new(
            "Window N-S, Window N, Window S, Resize N-S, Resize N, Resize S",
            &[&["上下"], &["vertical"]],
        ),
        TypeRule::new("Arrow", &[&["通常"], &["normal", "arrow"]]),
        TypeRule::new("Help", &[&["ヘルプ"], &["help"]]),
        TypeRule::new("Busy", &[&["バックグラウンド"], &["background"]]),
        TypeRule::new("Wait", &[&["待ち状態"], &["busy", "wait"]]),
        TypeRule::new("Cell", &[&["領域"], &["precision", "cross"]]),
        TypeRule::new("IBeam", &[&["テキスト"], &["text", "ibeam"]]),
        TypeRule::new("Forbidden", &[&["利用不可"], &["unavailable", "no"]]),
        TypeRule::new("Move, Resize Square", &[&["移動"], &["move"]]),
        TypeRule::new("Pointing", &[&["リンク"], &["link", "hand"]]),
    ]
}
