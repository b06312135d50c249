use std::sync::Arc;

use djedi_content::ContentStore;
use djedi_templates::is_truthy;
use djedi_templates::render_value;
use djedi_templates::Context;
use djedi_templates::Map;
use djedi_templates::RenderFn;
use djedi_templates::ResolvedArguments;
use djedi_templates::Signature;
use djedi_templates::TemplateError;

use crate::render::render_node;

pub(crate) const TAG: &str = "node";

/// `{% node key [default] [edit] %}`
pub(crate) fn signature() -> Signature {
    Signature::new(&["key", "default", "edit"]).with_defaults(2)
}

/// Look the node up once, while the template compiles; every render reuses
/// it.
pub(crate) fn compile(
    store: &Arc<dyn ContentStore>,
    args: &ResolvedArguments,
) -> Result<RenderFn, TemplateError> {
    let key = args.get("key").map(render_value).unwrap_or_default();
    let default = args
        .get("default")
        .filter(|value| is_truthy(value))
        .map(render_value)
        .unwrap_or_default();
    let edit = args.get("edit").is_none_or(is_truthy);

    let node = store.get_key(&key, &default).map_err(TemplateError::other)?;
    tracing::debug!(uri = %node.uri(), edit, "resolved node tag");

    Ok(Box::new(move |_context: &Context| {
        render_node(&node, &Map::new(), edit).map_err(TemplateError::other)
    }))
}
