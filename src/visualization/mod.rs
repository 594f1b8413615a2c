use crate::graph::DependencyGraph;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, Default)]
pub enum DotTheme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default)]
pub enum RankDir {
    #[default]
    LR,
    TB,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DotOptions {
    pub theme: DotTheme,
    pub rankdir: RankDir,
}

#[derive(Debug, Default)]
pub struct DotGenerator;

impl DotGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }

    /// Generate DOT with default options.
    #[must_use]
    pub fn generate_dot(&self, graph: &DependencyGraph) -> String {
        self.generate_dot_with_options(graph, DotOptions::default())
    }

    /// Render the graph as a Graphviz digraph. Scanned libraries are filled
    /// boxes; dependencies that were never scanned are dashed. Node ids are the
    /// quoted library names, so distinct names never share a node.
    #[must_use]
    pub fn generate_dot_with_options(&self, graph: &DependencyGraph, opts: DotOptions) -> String {
        let mut s = String::new();
        s.push_str("digraph SoDependencies\n{");
        s.push('\n');
        let rank = match opts.rankdir {
            RankDir::LR => "LR",
            RankDir::TB => "TB",
        };
        let _ = write!(
            s,
            "  rankdir={rank};\n  graph [fontname=Helvetica] ;\n  node [shape=box, fontsize=10, style=\"filled,rounded\"] ;\n  edge [color=\"{}\"];\n",
            edge_color(opts.theme)
        );

        // BTreeMap keys: nodes come out sorted
        for (name, node) in &graph.libraries {
            let _ = writeln!(
                s,
                "  \"{id}\" [label=\"{id}\", fillcolor=\"{}\", tooltip=\"{}\"];",
                fill_for(opts.theme, true),
                escape(&node.path.display().to_string()),
                id = escape(name),
            );
        }
        for name in graph.dangling() {
            let _ = writeln!(
                s,
                "  \"{id}\" [label=\"{id}\", fillcolor=\"{}\", style=\"dashed,rounded\"];",
                fill_for(opts.theme, false),
                id = escape(name),
            );
        }

        for (name, node) in &graph.libraries {
            let from = escape(name);
            for dep in &node.needed {
                let _ = writeln!(s, "  \"{from}\" -> \"{}\";", escape(dep));
            }
        }

        s.push_str("}\n");
        s
    }
}

// Backslash first, or the quote escapes would be doubled.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn fill_for(theme: DotTheme, scanned: bool) -> &'static str {
    match (theme, scanned) {
        (DotTheme::Light, true) => "#e0f3ff",
        (DotTheme::Light, false) => "#f4f4f4",
        (DotTheme::Dark, true) => "#124559",
        (DotTheme::Dark, false) => "#3a3a3a",
    }
}

fn edge_color(theme: DotTheme) -> &'static str {
    match theme {
        DotTheme::Light => "#555555",
        DotTheme::Dark => "#bbbbbb",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_escape_quotes_and_backslashes() {
        assert_eq!(escape("a\"b"), "a\\\"b");
        assert_eq!(escape(r"C:\lib\a.dll"), r"C:\\lib\\a.dll");
        assert_eq!(escape(r#"x\"y"#), r#"x\\\"y"#);
    }

    #[test]
    fn dot_lists_scanned_and_dangling_nodes_and_edges() {
        let g = DependencyGraph::from_entries([("a.so", vec!["b.so", "libc.so.6"]), ("b.so", vec![])]);
        let dot = DotGenerator::new().generate_dot_with_options(
            &g,
            DotOptions { theme: DotTheme::Dark, rankdir: RankDir::TB },
        );
        assert!(dot.starts_with("digraph SoDependencies"));
        assert!(dot.contains("rankdir=TB"));
        assert!(dot.contains("\"a.so\" -> \"b.so\";"));
        assert!(dot.contains("\"a.so\" -> \"libc.so.6\";"));
        assert!(dot.contains("\"libc.so.6\" [label=\"libc.so.6\", fillcolor=\"#3a3a3a\", style=\"dashed,rounded\"]"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn names_differing_in_punctuation_stay_distinct() {
        let g = DependencyGraph::from_entries([
            ("libfoo-1.so", vec!["liba.so"]),
            ("libfoo_1.so", vec!["libb.so"]),
        ]);
        let dot = DotGenerator::new().generate_dot(&g);
        let node_lines = dot.lines().filter(|l| l.contains("[label=")).count();
        assert_eq!(node_lines, 4);
        assert!(dot.contains("\"libfoo-1.so\" -> \"liba.so\";"));
        assert!(dot.contains("\"libfoo_1.so\" -> \"libb.so\";"));
        assert!(!dot.contains("\"libfoo-1.so\" -> \"libb.so\";"));
        assert!(!dot.contains("\"libfoo_1.so\" -> \"liba.so\";"));
    }

    #[test]
    fn tooltip_escapes_backslashes_in_paths() {
        let mut g = DependencyGraph::from_entries([("a.dll", Vec::<String>::new())]);
        if let Some(node) = g.libraries.get_mut("a.dll") {
            node.path = PathBuf::from(r"C:\libs\a.dll");
        }
        let dot = DotGenerator::new().generate_dot(&g);
        assert!(dot.contains(r#"tooltip="C:\\libs\\a.dll""#));
    }
}
