use handlebars::{Handlebars, TemplateError};
use std::sync::Arc;

pub type Hbs = Arc<Handlebars<'static>>;

const TEMPLATES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");

// Partials are registered as ordinary templates and pulled in with `{{> name}}`.
const TEMPLATES: &[&str] = &[
    "layouts/base",
    "pages/trade_index",
    "pages/orders",
    "pages/explore",
    "pages/search",
    "pages/not_found",
    "partials/navbar",
    "partials/errors",
    "partials/orders_table",
    "partials/selected_stock",
    "partials/search_results",
];

pub fn build_handlebars() -> Result<Hbs, TemplateError> {
    let mut hb = Handlebars::new();

    for name in TEMPLATES {
        hb.register_template_file(name, format!("{TEMPLATES_DIR}/{name}.hbs"))?;
    }

    Ok(Arc::new(hb))
}
