//! HTML for the feature grid.

use minijinja::{context, Environment};

use crate::grid::{BlockPart, FeatureGrid};

/// Template environment for the feature section.
///
/// Icon URLs are emitted unescaped: the base URL is validated by the
/// composer and keys name files that exist under the static directory.
pub struct GridTemplates {
    env: Environment<'static>,
}

impl GridTemplates {
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("features.html".to_string(), FEATURES_TEMPLATE.to_string())
            .expect("Failed to add features template");

        Self { env }
    }

    /// Render the grid as a `<section>`.
    pub fn render_grid(
        &self,
        grid: &FeatureGrid,
        base_url: &str,
        columns: usize,
    ) -> Result<String, minijinja::Error> {
        let columns = columns.max(1);
        let rows: Vec<Vec<[BlockPart<'_>; 3]>> = grid
            .rows(columns)
            .map(|row| row.iter().map(|block| block.parts()).collect())
            .collect();

        let tmpl = self.env.get_template("features.html")?;
        tmpl.render(context! {
            rows => rows,
            base_url => base_url,
            col_width => 12 / columns.min(12),
        })
    }
}

impl Default for GridTemplates {
    fn default() -> Self {
        Self::new()
    }
}

const FEATURES_TEMPLATE: &str = r##"<section class="features">
  <div class="container">
  {% for row in rows %}
    <div class="row">
    {% for parts in row %}
      <div class="col col--{{ col_width }}">
      {% for part in parts %}
        {% if part.kind == "icon" %}
        <div class="text--center">
          <img class="feature-svg" src="{{ base_url | safe }}{{ part.key | safe }}" alt="" role="img">
        </div>
        {% elif part.kind == "title" %}
        <h3 class="feature-title text--{{ part.align }} padding-horiz--md">{{ part.text }}</h3>
        {% elif part.kind == "description" %}
        {% if part.block %}
        <div class="text--{{ part.align }} padding-horiz--md">{{ part.html | safe }}</div>
        {% else %}
        <p class="text--{{ part.align }} padding-horiz--md">{{ part.html | safe }}</p>
        {% endif %}
        {% endif %}
      {% endfor %}
      </div>
    {% endfor %}
    </div>
  {% endfor %}
  </div>
</section>"##;
