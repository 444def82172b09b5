//! Prompt templates with `{variable}` substitution.
//!
//! The escape syntax is a single unambiguous rule: `{{` renders a literal
//! `{` and `}}` a literal `}`. Anything else between `{` and `}` is a
//! variable. Stray or unclosed delimiters are rejected at parse time, so no
//! un-escaped delimiter can survive into a rendered prompt unnoticed.
//!
//! Two ways to fill a variable:
//! - [`PromptTemplate::render`] inserts values **verbatim** — stage outputs
//!   and the user description go in this way, braces and all.
//! - [`PromptTemplate::partial`] embeds a value **as template source** — the
//!   inserted text is re-parsed, so its doubled braces collapse back to
//!   literals. Reference context (escaped by the assembler) goes in this way.

use appforge_core::error::TemplateError;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Var(String),
}

/// A parsed prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse template source, extracting its variable placeholders.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => {
                    if matches!(chars.peek(), Some((_, '{'))) {
                        chars.next();
                        literal.push('{');
                        continue;
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, vc) in chars.by_ref() {
                        if vc == '}' {
                            closed = true;
                            break;
                        }
                        name.push(vc);
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedDelimiter { position: pos });
                    }
                    let name = name.trim().to_string();
                    if name.is_empty() {
                        return Err(TemplateError::EmptyPlaceholder { position: pos });
                    }
                    segments.push(Segment::Var(name));
                }
                '}' => {
                    if matches!(chars.peek(), Some((_, '}'))) {
                        chars.next();
                        literal.push('}');
                    } else {
                        return Err(TemplateError::StrayDelimiter { position: pos });
                    }
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// The set of variables this template references, in sorted order.
    pub fn variables(&self) -> BTreeSet<String> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Var(name) => Some(name.clone()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Bind one variable by embedding its value as template source.
    ///
    /// The value is re-parsed: doubled braces collapse to literals and any
    /// un-doubled `{name}` inside it becomes a live variable of the result.
    pub fn partial(&self, name: &str, value: &str) -> Result<Self, TemplateError> {
        let embedded = Self::parse(value)?;
        let mut segments = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Var(v) if v == name => segments.extend(embedded.segments.iter().cloned()),
                other => segments.push(other.clone()),
            }
        }
        Ok(Self { segments })
    }

    /// Render the template, substituting every variable verbatim.
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Var(name) => {
                    let value = values
                        .get(name)
                        .ok_or_else(|| TemplateError::MissingValue { name: name.clone() })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}
