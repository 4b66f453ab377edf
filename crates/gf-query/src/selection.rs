//! Field-selection trees.

use crate::case;

/// One node of a field selection: a leaf field or a nested selection.
///
/// Names are given in the host's snake_case and translated to the wire's
/// lowerCamelCase at render time. Sibling order is preserved in the rendered
/// query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A leaf field.
    Field(String),
    /// A field with a nested sub-selection.
    Nested {
        name: String,
        children: Vec<Selection>,
    },
}

impl Selection {
    /// A leaf field. The name must be non-empty.
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "selection field name must be non-empty");
        Selection::Field(name)
    }

    /// A nested selection. The name must be non-empty.
    pub fn nested(name: impl Into<String>, children: Vec<Selection>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "selection field name must be non-empty");
        Selection::Nested { name, children }
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Selection::Field(name) => out.push_str(&case::lower_camel(name)),
            Selection::Nested { name, children } => {
                out.push_str(&case::lower_camel(name));
                out.push_str(" { ");
                render_siblings(children, out);
                out.push_str(" }");
            }
        }
    }
}

impl From<&str> for Selection {
    fn from(name: &str) -> Self {
        Selection::field(name)
    }
}

/// Render a selection tree as the inside of a field block.
///
/// Siblings are joined by `, `; nested selections recurse.
pub(crate) fn render(nodes: &[Selection]) -> String {
    let mut out = String::new();
    render_siblings(nodes, &mut out);
    out
}

fn render_siblings(nodes: &[Selection], out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        node.render_into(out);
    }
}
