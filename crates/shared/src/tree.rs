//! Materializes the flat entry collection into an ordered folder tree.
//!
//! The tree is a read-only projection that is rebuilt from scratch whenever a
//! hierarchical view is needed. Placement rules:
//! - an entry whose parent path resolves to a folder becomes that folder's child
//! - everything else (no `/`, missing parent, parent that is not a folder) is a root
//!
//! Nothing is ever dropped and nothing here can fail.

use crate::entry::Entry;
use std::cmp::Ordering;
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// An entry plus its ordered children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub entry: Entry,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn is_folder(&self) -> bool {
        self.entry.is_folder()
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// Build the ordered tree for a flat collection.
///
/// Duplicate ids are a caller bug; if they occur the last entry with that id
/// wins and only one node is produced for it.
pub fn build_tree(entries: &[Entry]) -> Vec<TreeNode> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(entries.len());
    for (pos, entry) in entries.iter().enumerate() {
        index.insert(entry.id.as_str(), pos);
    }

    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();

    for &pos in index.values() {
        let parent = entries[pos]
            .parent_id()
            .and_then(|parent_id| index.get(parent_id).copied())
            .filter(|&parent_pos| entries[parent_pos].is_folder());

        match parent {
            Some(parent_pos) => children.entry(parent_pos).or_default().push(pos),
            None => roots.push(pos),
        }
    }

    let mut nodes: Vec<TreeNode> = roots
        .into_iter()
        .map(|pos| assemble(pos, entries, &mut children))
        .collect();
    sort_level(&mut nodes);
    nodes
}

fn assemble(pos: usize, entries: &[Entry], children: &mut HashMap<usize, Vec<usize>>) -> TreeNode {
    let child_positions = children.remove(&pos).unwrap_or_default();
    let mut nodes: Vec<TreeNode> = child_positions
        .into_iter()
        .map(|child| assemble(child, entries, children))
        .collect();
    sort_level(&mut nodes);

    TreeNode {
        entry: entries[pos].clone(),
        children: nodes,
    }
}

/// Folders first, then names, then ids (orphans at the root can share a name).
fn sort_level(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| match (a.is_folder(), b.is_folder()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => compare_names(&a.entry.name, &b.entry.name)
            .then_with(|| a.entry.id.cmp(&b.entry.id)),
    });
}

/// ASCII punctuation and symbols in root collation order. They sort before
/// digits, and digits sort before letters.
const PUNCTUATION: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Locale-style name ordering, close to root collation.
///
/// Levels are compared in turn:
/// 1. base characters with accents and case folded away (`éclair` sorts with `eclair`)
/// 2. accents, unaccented first
/// 3. case, lowercase first
///
/// Byte order settles anything left.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    primary_weights(a)
        .cmp(primary_weights(b))
        .then_with(|| accent_weights(a).cmp(accent_weights(b)))
        .then_with(|| compare_case(a, b))
        .then_with(|| a.cmp(b))
}

fn primary_weights(name: &str) -> impl Iterator<Item = (u8, u32)> + '_ {
    name.nfd()
        .filter(|&c| !is_combining_mark(c))
        .flat_map(char::to_lowercase)
        .map(primary_weight)
}

fn primary_weight(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        (0, c as u32)
    } else if let Some(pos) = PUNCTUATION.find(c) {
        (1, pos as u32)
    } else if c.is_numeric() {
        (3, c.to_digit(10).unwrap_or(c as u32))
    } else if c.is_alphabetic() {
        (4, c as u32)
    } else {
        (2, c as u32)
    }
}

/// One weight per decomposed character: zero for base characters, the mark
/// itself for combining accents.
fn accent_weights(name: &str) -> impl Iterator<Item = u32> + '_ {
    name.nfd()
        .map(|c| if is_combining_mark(c) { c as u32 } else { 0 })
}

fn compare_case(a: &str, b: &str) -> Ordering {
    for (x, y) in a.nfd().zip(b.nfd()) {
        if x == y {
            continue;
        }
        match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

/// Pre-order walk over the tree.
pub fn flatten(nodes: &[TreeNode]) -> Vec<&Entry> {
    let mut out = Vec::new();
    for node in nodes {
        out.push(&node.entry);
        out.extend(flatten(&node.children));
    }
    out
}

/// Text outline of the tree, one entry per line. Folders get a trailing `/`.
pub fn render_outline(nodes: &[TreeNode]) -> String {
    let mut output = String::new();
    render_level(nodes, "", &mut output);
    output
}

fn render_level(nodes: &[TreeNode], prefix: &str, output: &mut String) {
    let total = nodes.len();
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i + 1 == total;
        let connector = if is_last { "└─ " } else { "├─ " };
        let suffix = if node.is_folder() { "/" } else { "" };
        output.push_str(&format!("{}{}{}{}\n", prefix, connector, node.entry.name, suffix));

        if !node.children.is_empty() {
            let child_prefix = if is_last {
                format!("{}    ", prefix)
            } else {
                format!("{}│   ", prefix)
            };
            render_level(&node.children, &child_prefix, output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn names(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.entry.name.as_str()).collect()
    }

    fn sample() -> Vec<Entry> {
        vec![
            Entry::file("readme.md", "# readme"),
            Entry::file("src/b.js", "b"),
            Entry::folder("src"),
            Entry::file("src/a.js", "a"),
        ]
    }

    #[test]
    fn test_folder_before_file_and_children_sorted() {
        let tree = build_tree(&sample());

        assert_eq!(names(&tree), vec!["src", "readme.md"]);
        assert_eq!(names(&tree[0].children), vec!["a.js", "b.js"]);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_orphan_is_kept_at_root() {
        let tree = build_tree(&[Entry::file("orphan/file.js", "x")]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].entry.id, "orphan/file.js");
        assert_eq!(tree[0].entry.name, "file.js");
    }

    #[test]
    fn test_parent_that_is_not_a_folder_means_root() {
        let entries = vec![
            Entry::file("notes", "plain file without extension"),
            Entry::file("notes/today.md", "# today"),
        ];
        let tree = build_tree(&entries);

        assert_eq!(tree.len(), 2);
        assert!(tree.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn test_nested_folders() {
        let entries = vec![
            Entry::file("src/components/Button.tsx", ""),
            Entry::folder("src/components"),
            Entry::folder("src"),
            Entry::file("src/main.tsx", ""),
        ];
        let tree = build_tree(&entries);

        assert_eq!(names(&tree), vec!["src"]);
        assert_eq!(names(&tree[0].children), vec!["components", "main.tsx"]);
        assert_eq!(names(&tree[0].children[0].children), vec!["Button.tsx"]);
        assert_eq!(tree[0].descendant_count(), 3);
    }

    #[test]
    fn test_flatten_keeps_every_id() {
        let entries = vec![
            Entry::folder("assets"),
            Entry::image("assets/logo.png", "data:image/png;base64,AA=="),
            Entry::file("lost/child.txt", ""),
            Entry::folder("src"),
            Entry::folder("src/util"),
            Entry::file("src/util/math.js", ""),
            Entry::file("welcome.js", ""),
        ];
        let tree = build_tree(&entries);

        let input: BTreeSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        let output: Vec<&str> = flatten(&tree).iter().map(|e| e.id.as_str()).collect();
        let output_set: BTreeSet<&str> = output.iter().copied().collect();

        assert_eq!(output.len(), entries.len());
        assert_eq!(input, output_set);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let entries = vec![
            Entry::folder("b"),
            Entry::file("b/z.txt", ""),
            Entry::file("b/Z.txt", ""),
            Entry::file("x/y.txt", ""),
            Entry::file("y.txt", ""),
            Entry::folder("a"),
            Entry::file("a/m.md", ""),
        ];
        let expected = build_tree(&entries);

        let mut reversed = entries.clone();
        reversed.reverse();
        assert_eq!(build_tree(&reversed), expected);

        let mut rotated = entries.clone();
        rotated.rotate_left(3);
        assert_eq!(build_tree(&rotated), expected);
    }

    #[test]
    fn test_same_name_orphans_order_by_id() {
        let entries = vec![Entry::file("y/x.txt", ""), Entry::file("x.txt", "")];
        let tree = build_tree(&entries);

        let ids: Vec<&str> = tree.iter().map(|n| n.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["x.txt", "y/x.txt"]);
    }

    #[test]
    fn test_every_level_is_ordered() {
        fn check(nodes: &[TreeNode]) {
            let first_file = nodes.iter().position(|n| !n.is_folder()).unwrap_or(nodes.len());
            assert!(nodes[first_file..].iter().all(|n| !n.is_folder()));
            for pair in nodes[..first_file].windows(2).chain(nodes[first_file..].windows(2)) {
                assert_ne!(
                    compare_names(&pair[0].entry.name, &pair[1].entry.name),
                    Ordering::Greater
                );
            }
            for node in nodes {
                check(&node.children);
            }
        }

        let entries = vec![
            Entry::folder("zeta"),
            Entry::folder("Alpha"),
            Entry::file("beta.js", ""),
            Entry::file("Beta.js", ""),
            Entry::file("alpha.js", ""),
            Entry::folder("zeta/inner"),
            Entry::file("zeta/c.txt", ""),
            Entry::file("zeta/A.txt", ""),
            Entry::file("zeta/inner/deep.txt", ""),
        ];
        check(&build_tree(&entries));
    }

    #[test]
    fn test_duplicate_ids_do_not_panic() {
        let entries = vec![Entry::file("a.js", "first"), Entry::file("a.js", "second")];
        let tree = build_tree(&entries);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].entry.content(), Some("second"));
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("a", "A"), Ordering::Less);
        assert_eq!(compare_names("B", "a"), Ordering::Greater);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
        assert_eq!(compare_names("a10", "a2"), Ordering::Less);
    }

    #[test]
    fn test_accented_names_sort_with_their_base_letter() {
        let entries = vec![
            Entry::file("zebra.md", ""),
            Entry::file("\u{e9}clair.md", ""),
            Entry::file("eclair.md", ""),
            Entry::file("apple.md", ""),
        ];
        let tree = build_tree(&entries);

        assert_eq!(
            names(&tree),
            vec!["apple.md", "eclair.md", "\u{e9}clair.md", "zebra.md"]
        );
        assert_eq!(compare_names("r\u{e9}sum\u{e9}", "resume"), Ordering::Greater);
        assert_eq!(compare_names("r\u{e9}sum\u{e9}", "resumes"), Ordering::Less);
    }

    #[test]
    fn test_punctuation_before_digits_before_letters() {
        let entries = vec![
            Entry::file("404.tsx", ""),
            Entry::file("_app.tsx", ""),
            Entry::file("index.tsx", ""),
            Entry::file("-draft.md", ""),
        ];
        let tree = build_tree(&entries);

        assert_eq!(
            names(&tree),
            vec!["_app.tsx", "-draft.md", "404.tsx", "index.tsx"]
        );
    }

    #[test]
    fn test_render_outline() {
        let outline = render_outline(&build_tree(&sample()));
        assert_eq!(outline, "├─ src/\n│   ├─ a.js\n│   └─ b.js\n└─ readme.md\n");
    }
}
