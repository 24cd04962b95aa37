//! Page templates
//!
//! HTML templates are embedded in the binary and rendered with minijinja.
//! Auto-escaping is on for every `.html` template.

mod context;

pub use context::{BlogView, ErrorPageContext, FormContext};

use minijinja::{default_auto_escape_callback, Environment, Value};

const PAGES: [(&str, &str); 8] = [
    ("base.html", include_str!("pages/base.html")),
    ("index.html", include_str!("pages/index.html")),
    ("blog_list.html", include_str!("pages/blog_list.html")),
    ("blog.html", include_str!("pages/blog.html")),
    ("blog_form.html", include_str!("pages/blog_form.html")),
    ("new_blog.html", include_str!("pages/new_blog.html")),
    ("edit_blog.html", include_str!("pages/edit_blog.html")),
    ("error.html", include_str!("pages/error.html")),
];

pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        for (name, source) in PAGES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template_name)?;
        tmpl.render(context)
    }
}
