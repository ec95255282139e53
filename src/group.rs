/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Group nesting context.
//!
//! Tracks how many `group` events are currently open and turns that depth
//! into leading indentation. The context is mutated only by group events at
//! the moment they execute, so the indentation a printed line receives always
//! reflects its position in the ordered stream rather than its arrival time.

/// Indentation applied once per open group.
pub const INDENT_UNIT: &str = "  ";

/// Current group nesting depth.
///
/// # Examples
///
/// ```
/// use termlog_rs::group::GroupContext;
///
/// let mut group = GroupContext::new();
/// group.enter();
/// group.enter();
/// assert_eq!(group.indent("x"), "    x");
///
/// group.leave();
/// group.leave();
/// group.leave();
/// assert_eq!(group.depth(), 0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GroupContext {
    depth: usize,
}

impl GroupContext {
    /// Creates a context at depth zero.
    #[must_use]
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    /// Returns the current nesting depth.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Opens a group.
    #[inline]
    pub fn enter(&mut self) {
        self.depth = self.depth.saturating_add(1);
    }

    /// Closes a group. Closing at depth zero is a no-op.
    #[inline]
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Prefixes every line of `text` with one [`INDENT_UNIT`] per open group.
    ///
    /// At depth zero the text is returned unchanged. Line breaks are kept as
    /// they are; only the start of each line receives the prefix.
    #[must_use]
    pub fn indent(&self, text: &str) -> String {
        if self.depth == 0 {
            return text.to_string();
        }

        let prefix = INDENT_UNIT.repeat(self.depth);
        text.split('\n')
            .map(|line| format!("{prefix}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Left margin for a table printed at the current depth.
    ///
    /// One unit more than the group indentation, so the rows sit under the
    /// text of a line that starts with the `» ` marker.
    #[inline]
    #[must_use]
    pub fn table_indent(&self) -> usize {
        INDENT_UNIT.len() * (self.depth + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_at_depth_zero_is_identity() {
        let group = GroupContext::new();
        assert_eq!(group.indent("a\nb"), "a\nb");
    }

    #[test]
    fn test_two_enters_prefix_two_units() {
        let mut group = GroupContext::new();
        group.enter();
        group.enter();
        assert_eq!(group.depth(), 2);
        assert_eq!(group.indent("x"), format!("{INDENT_UNIT}{INDENT_UNIT}x"));
    }

    #[test]
    fn test_indent_applies_to_every_line() {
        let mut group = GroupContext::new();
        group.enter();
        assert_eq!(group.indent("first\nsecond\n"), "  first\n  second\n  ");
    }

    #[test]
    fn test_leave_clamps_at_zero() {
        let mut group = GroupContext::new();
        group.leave();
        group.leave();
        group.leave();
        assert_eq!(group.depth(), 0);

        group.enter();
        group.leave();
        group.leave();
        assert_eq!(group.depth(), 0);
    }

    #[test]
    fn test_table_indent_tracks_depth() {
        let mut group = GroupContext::new();
        assert_eq!(group.table_indent(), 2);
        group.enter();
        group.enter();
        assert_eq!(group.table_indent(), 6);
    }
}
