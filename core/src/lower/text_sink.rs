use super::err::LowerError;
use crate::error::AnglResult;

/// Append-only output buffer with an indentation counter.
///
/// Fragments are collected as printed and joined once at the end. The
/// indentation level never goes negative: an `outdent` past zero is an
/// internal error rather than a silent clamp.
#[derive(Debug, Clone)]
pub struct TextSink {
    fragments: Vec<String>,
    level: usize,
    unit: String,
}

impl TextSink {
    pub fn new(unit: &str) -> Self {
        TextSink { fragments: Vec::new(), level: 0, unit: unit.to_string() }
    }

    pub fn print(&mut self, text: &str) {
        if !text.is_empty() {
            self.fragments.push(text.to_string());
        }
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn outdent(&mut self) -> AnglResult<()> {
        if self.level == 0 {
            return Err(Box::new(LowerError::indent_underflow("angl.lower.text_sink.outdent")));
        }
        self.level -= 1;
        Ok(())
    }

    /// Print the current indentation.
    pub fn print_indent(&mut self) {
        if self.level > 0 {
            self.fragments.push(self.unit.repeat(self.level));
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn finish(self) -> String {
        self.fragments.concat()
    }
}
