use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    ids::{Isbn, MemberId},
    loan_state::LoanState,
};

/// Loan state and waiting queue of one catalogued book
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShelfEntry {
    pub isbn: Isbn,
    pub title: String,
    pub state: LoanState,
    /// Head of the queue first
    pub queue: Vec<MemberId>,
}

/// Circulation overview of the whole catalog, ordered by ISBN
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShelfReport {
    pub entries: Vec<ShelfEntry>,
}

impl ShelfReport {
    /// Number of books currently checked out
    #[must_use]
    pub fn checked_out(&self) -> usize {
        self.entries.iter().filter(|entry| entry.state.holder().is_some()).count()
    }

    /// Generate a DOT graph with one node per book and member, an edge from
    /// each holder to their book and dashed edges for queued members
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph circulation {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box, style=filled, fillcolor=lightblue];\n");

        for entry in &self.entries {
            let node = escape_dot(entry.isbn.as_str());
            let label = escape_dot(&entry.title);
            let fill = match entry.state {
                LoanState::Available => "palegreen",
                LoanState::CheckedOut(_) => "lightsalmon",
            };
            dot.push_str(&format!("  \"{node}\" [label=\"{label}\", fillcolor={fill}];\n"));

            if let Some(holder) = entry.state.holder() {
                dot.push_str(&format!("  \"member {holder}\" -> \"{node}\" [label=\"holds\"];\n"));
            }
            for (place, member) in (1..).zip(&entry.queue) {
                dot.push_str(&format!(
                    "  \"member {member}\" -> \"{node}\" [label=\"#{place}\", style=dashed];\n"
                ));
            }
        }

        dot.push_str("}\n");
        dot
    }
}

/// Escape text for use inside a quoted DOT identifier
fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

impl fmt::Display for ShelfReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Shelf Status ===")?;
        if self.entries.is_empty() {
            return write!(f, "No books in the catalog.");
        }

        for entry in &self.entries {
            write!(f, "\n{} ({}): {}", entry.isbn, entry.title, entry.state.description())?;
            if !entry.queue.is_empty() {
                let waiting: Vec<String> = entry.queue.iter().map(ToString::to_string).collect();
                write!(f, "\n  Waiting: {}", waiting.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ShelfReport {
        ShelfReport {
            entries: vec![
                ShelfEntry {
                    isbn: Isbn::new("0987654321"),
                    title: "To Kill a Mockingbird".to_string(),
                    state: LoanState::Available,
                    queue: Vec::new(),
                },
                ShelfEntry {
                    isbn: Isbn::new("1234567890"),
                    title: "The Great Gatsby".to_string(),
                    state: LoanState::CheckedOut(MemberId::new(1)),
                    queue: vec![MemberId::new(2), MemberId::new(3)],
                },
            ],
        }
    }

    #[test]
    fn test_text_rendering() {
        let text = report().to_string();
        assert!(text.contains("1234567890 (The Great Gatsby): Book is checked out by member 1"));
        assert!(text.contains("Waiting: 2, 3"));
        assert!(text.contains("0987654321 (To Kill a Mockingbird): Book is available for checkout"));
    }

    #[test]
    fn test_dot_edges() {
        let dot = report().to_dot();
        assert!(dot.starts_with("digraph circulation {"));
        assert!(dot.contains("\"member 1\" -> \"1234567890\" [label=\"holds\"];"));
        assert!(dot.contains("\"member 3\" -> \"1234567890\" [label=\"#2\", style=dashed];"));
    }

    #[test]
    fn test_dot_escapes_identifiers_and_labels() {
        let report = ShelfReport {
            entries: vec![ShelfEntry {
                isbn: Isbn::new(r#"12"3\4"#),
                title: r#"The "Best" Book"#.to_string(),
                state: LoanState::CheckedOut(MemberId::new(7)),
                queue: Vec::new(),
            }],
        };

        let dot = report.to_dot();
        assert!(dot.contains(r#""12\"3\\4" [label="The \"Best\" Book", fillcolor=lightsalmon];"#));
        assert!(dot.contains(r#""member 7" -> "12\"3\\4" [label="holds"];"#));
    }

    #[test]
    fn test_checked_out_count() {
        assert_eq!(report().checked_out(), 1);
        assert_eq!(ShelfReport::default().checked_out(), 0);
    }
}
