//! Message segmentation for display.
//!
//! Splits message text into alternating plain-text and fenced code-block
//! segments. A code block runs from one "```" fence to the next; an
//! unterminated fence is left as plain text.

const FENCE: &str = "```";

/// One displayable piece of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// Inner text of a fenced block, trimmed. A language tag on the opening
    /// fence stays part of the payload.
    Code(&'a str),
}

/// Lazily segment `text`. Empty text between blocks is skipped.
pub fn segments(text: &str) -> Segments<'_> {
    Segments { rest: text }
}

/// Iterator returned by [`segments`].
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let block = self.rest.find(FENCE).and_then(|open| {
            let body_start = open + FENCE.len();
            self.rest[body_start..]
                .find(FENCE)
                .map(|close| (open, body_start, body_start + close))
        });

        match block {
            Some((open, _, _)) if open > 0 => {
                let text = &self.rest[..open];
                self.rest = &self.rest[open..];
                Some(Segment::Text(text))
            }
            Some((_, body_start, body_end)) => {
                let code = self.rest[body_start..body_end].trim();
                self.rest = &self.rest[body_end + FENCE.len()..];
                Some(Segment::Code(code))
            }
            None => {
                let text = self.rest;
                self.rest = "";
                Some(Segment::Text(text))
            }
        }
    }
}
