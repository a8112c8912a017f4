use std::collections::HashMap;

use ragdemo_core::Value;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("invalid template pattern: {0}")]
    InvalidPattern(String),
    #[error("missing template variable '{0}'")]
    MissingVariable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A prompt with `{name}` placeholders. `{{` and `}}` render as literal braces.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, PromptError> {
        let template = template.into();
        let pattern = Regex::new(r"\{\{|\}\}|\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}")
            .map_err(|e| PromptError::InvalidPattern(e.to_string()))?;

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;
        for caps in pattern.captures_iter(&template) {
            let Some(whole) = caps.get(0) else { continue };
            literal.push_str(&template[last..whole.start()]);
            last = whole.end();
            match caps.get(1) {
                Some(name) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(name.as_str().to_string()));
                }
                None => literal.push_str(&whole.as_str()[..1]),
            }
        }
        literal.push_str(&template[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { template, segments })
    }

    /// Distinct placeholder names, in order of first appearance.
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn render(&self, vars: &HashMap<String, Value>) -> Result<String, PromptError> {
        let mut rendered = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Variable(name) => {
                    let value = vars
                        .get(name)
                        .ok_or_else(|| PromptError::MissingVariable(name.clone()))?;
                    match value.as_str() {
                        Some(text) => rendered.push_str(text),
                        None => rendered.push_str(&value.to_string()),
                    }
                }
            }
        }
        Ok(rendered)
    }
}
