use crate::context::Context;
use crate::error::TemplateError;
use crate::expression::FilterExpression;
use crate::value::render_value;

/// A compiled piece of a template.
///
/// Compiled templates are shared between concurrent renders, so nodes must
/// not keep render-time state: everything derived from `context` stays local
/// to the `render` call.
pub trait TemplateNode: Send + Sync {
    fn render(&self, context: &Context) -> Result<String, TemplateError>;
}

#[derive(Default)]
pub struct NodeList {
    nodes: Vec<Box<dyn TemplateNode>>,
}

impl NodeList {
    pub fn push(&mut self, node: Box<dyn TemplateNode>) {
        self.nodes.push(node);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn TemplateNode> {
        self.nodes.iter().map(AsRef::as_ref)
    }

    /// Render every node in order and concatenate the output.
    pub fn render(&self, context: &Context) -> Result<String, TemplateError> {
        self.iter().map(|node| node.render(context)).collect()
    }
}

impl std::fmt::Debug for NodeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeList")
            .field("len", &self.nodes.len())
            .finish()
    }
}

#[derive(Debug)]
pub struct TextNode {
    text: String,
}

impl TextNode {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TemplateNode for TextNode {
    fn render(&self, _context: &Context) -> Result<String, TemplateError> {
        Ok(self.text.clone())
    }
}

/// `{{ expression }}`
#[derive(Debug)]
pub struct VariableNode {
    expression: FilterExpression,
}

impl VariableNode {
    #[must_use]
    pub fn new(expression: FilterExpression) -> Self {
        Self { expression }
    }
}

impl TemplateNode for VariableNode {
    fn render(&self, context: &Context) -> Result<String, TemplateError> {
        Ok(render_value(&self.expression.resolve(context)?))
    }
}
