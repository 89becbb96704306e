//! Mermaid flowchart generation.
//!
//! Every pull request becomes one edge from its head branch to its base
//! branch plus a `click` binding that opens the pull request. No ordering
//! or dependency analysis happens here, so parallel edges and cycles are
//! drawn exactly as the branches describe them.

mod options;

pub use options::{DiagramOptions, Direction, LabelStyle};

use crate::pull_requests::ChangeRequest;
use std::collections::{HashMap, HashSet};

/// Characters that have meaning in Mermaid flowchart syntax.
const SIGNIFICANT_CHARS: &[char] = &[
    '\n', '\r', '[', ']', '(', ')', '{', '}', ':', '"', '|', '<', '>', ';',
];

/// Words Mermaid reads as statements when they start a line.
const RESERVED_WORDS: &[&str] = &[
    "end",
    "style",
    "class",
    "classDef",
    "click",
    "linkStyle",
    "subgraph",
    "graph",
    "flowchart",
    "direction",
    "default",
];

/// Replaces each syntax-significant character in `text` with a space.
#[must_use]
pub fn sanitize_label(text: &str) -> String {
    text.chars()
        .map(|c| if SIGNIFICANT_CHARS.contains(&c) { ' ' } else { c })
        .collect()
}

/// Builds the Mermaid description for `change_requests`.
#[must_use]
pub fn build_diagram(change_requests: &[ChangeRequest], options: &DiagramOptions) -> String {
    let mut nodes = NodeIds::default();
    let mut diagram = format!("graph {}\n", options.direction.keyword());

    for change_request in change_requests {
        let head = nodes.node_for(&change_request.source_branch);
        let base = nodes.node_for(&change_request.target_branch);
        let title = sanitize_label(&change_request.title);

        let edge = match options.labels {
            LabelStyle::Number => {
                let label = if title.trim().is_empty() {
                    format!("#{}", change_request.number)
                } else {
                    format!("#{} {}", change_request.number, title)
                };
                format!(
                    "  {} --> |{}| {}\n",
                    head.declaration(),
                    label,
                    base.declaration()
                )
            }
            LabelStyle::Status => {
                let node_label = if title.trim().is_empty() {
                    sanitize_label(&change_request.source_branch)
                } else {
                    title
                };
                let status = if change_request.is_draft { "Draft" } else { "Open" };
                format!(
                    "  {}(\"{}\") --> |{}| {}\n",
                    head.id,
                    node_label,
                    status,
                    base.declaration()
                )
            }
        };
        diagram.push_str(&edge);
        diagram.push_str(&format!(
            "  click {} href \"{}\" _blank\n",
            head.id,
            change_request.url.replace('"', "%22")
        ));
    }

    diagram
}

/// A branch as it appears in the diagram.
#[derive(Debug, Clone)]
struct Node {
    id: String,
    label: Option<String>,
}

impl Node {
    /// The node reference, with the branch name attached when the id differs.
    fn declaration(&self) -> String {
        match &self.label {
            Some(label) => format!("{}[\"{}\"]", self.id, label),
            None => self.id.clone(),
        }
    }
}

/// Assigns each branch a stable, unique Mermaid node id.
#[derive(Debug, Default)]
struct NodeIds {
    by_branch: HashMap<String, Node>,
    taken: HashSet<String>,
}

impl NodeIds {
    fn node_for(&mut self, branch: &str) -> Node {
        if let Some(node) = self.by_branch.get(branch) {
            return node.clone();
        }

        let base = if is_plain_identifier(branch) {
            branch.to_string()
        } else {
            identifier_for(branch)
        };
        let mut id = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&id) {
            id = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.taken.insert(id.clone());

        let node = Node {
            label: (id != branch).then(|| sanitize_label(branch)),
            id,
        };
        self.by_branch.insert(branch.to_string(), node.clone());
        node
    }
}

fn is_plain_identifier(branch: &str) -> bool {
    !branch.is_empty()
        && !is_reserved(branch)
        && !branch.starts_with('-')
        && !branch.contains("--")
        && branch
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn identifier_for(branch: &str) -> String {
    let id: String = branch
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    match id.as_str() {
        "" => "branch".to_string(),
        _ if is_reserved(&id) => format!("{id}_"),
        _ => id,
    }
}

fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change_request(
        number: u64,
        source: &str,
        target: &str,
        title: &str,
        is_draft: bool,
        url: &str,
    ) -> ChangeRequest {
        ChangeRequest {
            number,
            source_branch: source.to_string(),
            target_branch: target.to_string(),
            title: title.to_string(),
            is_draft,
            url: url.to_string(),
        }
    }

    fn sample() -> Vec<ChangeRequest> {
        vec![
            change_request(1, "feat", "main", "Add X", false, "https://x/1"),
            change_request(2, "fix", "main", "Fix Y", true, "https://x/2"),
        ]
    }

    fn edges(diagram: &str) -> Vec<&str> {
        diagram.lines().filter(|l| l.contains("-->")).collect()
    }

    fn clicks(diagram: &str) -> Vec<&str> {
        diagram
            .lines()
            .filter(|l| l.trim_start().starts_with("click "))
            .collect()
    }

    #[test]
    fn sanitize_replaces_each_significant_char_with_space() {
        assert_eq!(sanitize_label("A[B]:C(D)\nE"), "A B  C D  E");
        assert_eq!(sanitize_label(r#"say "hi" | {x}; <b>"#), "say  hi     x    b ");
        assert_eq!(sanitize_label("plain title #42"), "plain title #42");
    }

    #[test]
    fn can_build_one_edge_and_click_per_change_request() {
        let diagram = build_diagram(&sample(), &DiagramOptions::default());

        assert!(diagram.starts_with("graph LR\n"));
        assert_eq!(
            edges(&diagram),
            vec!["  feat --> |#1 Add X| main", "  fix --> |#2 Fix Y| main"]
        );
        assert_eq!(
            clicks(&diagram),
            vec![
                r#"  click feat href "https://x/1" _blank"#,
                r#"  click fix href "https://x/2" _blank"#,
            ]
        );
    }

    #[test]
    fn can_label_edges_with_status() {
        let options = DiagramOptions {
            direction: Direction::RightToLeft,
            labels: LabelStyle::Status,
        };
        let diagram = build_diagram(&sample(), &options);

        assert!(diagram.starts_with("graph RL\n"));
        assert_eq!(
            edges(&diagram),
            vec![
                r#"  feat("Add X") --> |Open| main"#,
                r#"  fix("Fix Y") --> |Draft| main"#,
            ]
        );
        assert_eq!(clicks(&diagram).len(), 2);
    }

    #[test]
    fn empty_list_is_header_only() {
        assert_eq!(build_diagram(&[], &DiagramOptions::default()), "graph LR\n");
    }

    #[test]
    fn adversarial_title_stays_on_its_line() {
        let prs = vec![
            change_request(
                3,
                "evil",
                "main",
                "A[B]:C(D)\nE\nclick main href \"javascript:alert(1)\"",
                false,
                "https://x/3",
            ),
            change_request(4, "next", "main", "After", false, "https://x/4"),
        ];
        let diagram = build_diagram(&prs, &DiagramOptions::default());

        assert_eq!(diagram.lines().count(), 5);
        assert_eq!(diagram.lines().next(), Some("graph LR"));
        assert_eq!(edges(&diagram).len(), 2);
        assert_eq!(clicks(&diagram).len(), 2);
        assert!(diagram.contains("  next --> |#4 After| main\n"));
    }

    #[test]
    fn branch_names_with_punctuation_get_labelled_ids() {
        let prs = vec![change_request(
            5,
            "feature/login-v2.1",
            "release/1.0",
            "Login",
            false,
            "https://x/5",
        )];
        let diagram = build_diagram(&prs, &DiagramOptions::default());

        assert_eq!(
            edges(&diagram),
            vec![r#"  feature_login_v2_1["feature/login-v2.1"] --> |#5 Login| release_1_0["release/1.0"]"#]
        );
        assert_eq!(
            clicks(&diagram),
            vec![r#"  click feature_login_v2_1 href "https://x/5" _blank"#]
        );
    }

    #[test]
    fn colliding_identifiers_are_disambiguated() {
        let prs = vec![
            change_request(6, "feat_x", "main", "One", false, "https://x/6"),
            change_request(7, "feat/x", "main", "Two", false, "https://x/7"),
            change_request(8, "end", "main", "Three", false, "https://x/8"),
        ];
        let diagram = build_diagram(&prs, &DiagramOptions::default());

        assert!(diagram.contains("  feat_x --> |#6 One| main\n"));
        assert!(diagram.contains(r#"  feat_x_2["feat/x"] --> |#7 Two| main"#));
        assert!(diagram.contains(r#"  end_["end"] --> |#8 Three| main"#));
    }

    #[test]
    fn keyword_branch_names_are_never_bare_ids() {
        let prs = vec![
            change_request(11, "style", "default", "One", false, "https://x/11"),
            change_request(12, "classDef", "subgraph", "Two", false, "https://x/12"),
            change_request(13, "Click", "graph", "Three", false, "https://x/13"),
        ];
        let diagram = build_diagram(&prs, &DiagramOptions::default());

        assert_eq!(
            edges(&diagram),
            vec![
                r#"  style_["style"] --> |#11 One| default_["default"]"#,
                r#"  classDef_["classDef"] --> |#12 Two| subgraph_["subgraph"]"#,
                r#"  Click_["Click"] --> |#13 Three| graph_["graph"]"#,
            ]
        );
        assert_eq!(
            clicks(&diagram),
            vec![
                r#"  click style_ href "https://x/11" _blank"#,
                r#"  click classDef_ href "https://x/12" _blank"#,
                r#"  click Click_ href "https://x/13" _blank"#,
            ]
        );
    }

    #[test]
    fn shared_branches_reuse_the_same_node() {
        let prs = vec![
            change_request(9, "feature/a", "main", "A", false, "https://x/9"),
            change_request(10, "feature/b", "feature/a", "B", false, "https://x/10"),
        ];
        let diagram = build_diagram(&prs, &DiagramOptions::default());

        assert!(diagram.contains(r#"--> |#10 B| feature_a["feature/a"]"#));
        assert!(diagram.contains(r#"  feature_a["feature/a"] --> |#9 A| main"#));
    }
}
