//! Markdown documentation page builder

use std::fmt::Write as _;

/// Accumulates a Markdown page section by section
#[derive(Debug, Default)]
pub struct MarkdownPage {
    out: String,
}

impl MarkdownPage {
    /// Start a page with a level-one title
    pub fn new(title: &str) -> Self {
        let mut page = Self::default();
        let _ = writeln!(page.out, "# {}\n", title);
        page
    }

    /// Add a level-two heading
    pub fn heading(&mut self, text: &str) -> &mut Self {
        let _ = writeln!(self.out, "## {}\n", text);
        self
    }

    /// Add a paragraph
    pub fn paragraph(&mut self, text: &str) -> &mut Self {
        let _ = writeln!(self.out, "{}\n", text);
        self
    }

    /// Add a bullet list; empty lists render a placeholder line
    pub fn bullets<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut any = false;
        for item in items {
            any = true;
            let _ = writeln!(self.out, "- {}", item.as_ref());
        }
        if !any {
            self.out.push_str("_None._\n");
        }
        self.out.push('\n');
        self
    }

    /// Add an indented bullet at a nesting depth
    pub fn nested_bullet(&mut self, depth: usize, text: &str) -> &mut Self {
        let _ = writeln!(self.out, "{}- {}", "  ".repeat(depth), text);
        self
    }

    /// Close a run of nested bullets
    pub fn end_list(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    /// Add a table with a header row
    pub fn table(&mut self, header: &[&str], rows: &[Vec<String>]) -> &mut Self {
        if rows.is_empty() {
            self.out.push_str("_None._\n\n");
            return self;
        }
        let _ = writeln!(self.out, "| {} |", header.join(" | "));
        let _ = writeln!(
            self.out,
            "|{}|",
            header.iter().map(|_| "---").collect::<Vec<_>>().join("|")
        );
        for row in rows {
            let cells: Vec<String> = row.iter().map(|cell| escape_cell(cell)).collect();
            let _ = writeln!(self.out, "| {} |", cells.join(" | "));
        }
        self.out.push('\n');
        self
    }

    /// Finish the page
    pub fn finish(self) -> String {
        let mut out = self.out;
        while out.ends_with("\n\n") {
            out.pop();
        }
        out
    }
}

/// Escape pipe characters so a value stays inside its table cell
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
