//! Landing page templates.

use minijinja::Environment;
use serde::Serialize;

use auditum_site_config::route::join_route;
use auditum_site_config::theme::{AnnouncementBar, ColorScheme, FooterStyle, Position};
use auditum_site_config::{RouteKind, SiteConfig};

/// A rendered link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub href: String,
    /// Opens in a new tab
    pub external: bool,
}

/// A site-relative link declared in the theme configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalLink {
    /// Config field that declares the link
    pub field: String,
    /// Target with the base URL applied
    pub href: String,
}

/// A footer column.
#[derive(Debug, Clone, Serialize)]
pub struct FooterSection {
    pub title: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Logo {
    pub src: String,
    pub alt: String,
}

/// Everything the landing page template reads.
#[derive(Debug, Clone, Serialize)]
pub struct LandingContext {
    pub lang: String,
    pub title: String,
    pub tagline: String,
    pub base_url: String,
    pub canonical_url: String,
    pub favicon: Option<String>,
    pub image: Option<String>,
    pub color_mode: String,
    pub announcement: Option<AnnouncementBar>,
    pub navbar_title: Option<String>,
    pub logo: Option<Logo>,
    pub nav_left: Vec<Link>,
    pub nav_right: Vec<Link>,
    /// "Get started" button target
    pub cta: Option<Link>,
    /// Pre-rendered feature grid
    pub features: String,
    pub footer_style: String,
    pub footer: Vec<FooterSection>,
    pub copyright: Option<String>,
}

impl LandingContext {
    /// Collect the landing page data from the site configuration.
    ///
    /// `docSidebar` navbar items link to the first docs route. Sidebar ids
    /// are defined inside the sidebar file, which is not read here, so
    /// `sidebar_id` does not select between docs routes.
    pub fn from_config(config: &SiteConfig, features: String) -> Self {
        let theme = config.theme_config();
        let base_url = config.base_url();
        let docs_route = config
            .routes()
            .entries()
            .iter()
            .find(|r| matches!(r.kind, RouteKind::Docs { .. }))
            .map(|r| r.path.clone());

        let mut nav_left = Vec::new();
        let mut nav_right = Vec::new();
        for item in &theme.navbar.items {
            let link = match item.kind.as_deref() {
                // Route paths already carry the base URL.
                Some("docSidebar") => docs_route.clone().map(|href| Link {
                    label: item.label.clone(),
                    href,
                    external: false,
                }),
                _ => item.target().map(|t| resolve_link(base_url, &item.label, t)),
            };
            let Some(link) = link else {
                tracing::warn!("Navbar item `{}` has no target, skipping", item.label);
                continue;
            };
            match item.position {
                Position::Left => nav_left.push(link),
                Position::Right => nav_right.push(link),
            }
        }

        let footer = theme
            .footer
            .links
            .iter()
            .map(|column| FooterSection {
                title: column.title.clone(),
                links: column
                    .items
                    .iter()
                    .filter_map(|l| l.target().map(|t| resolve_link(base_url, &l.label, t)))
                    .collect(),
            })
            .collect();

        let default_locale = &config.i18n().default_locale;

        Self {
            lang: config.i18n().html_lang(default_locale).to_string(),
            title: config.title().to_string(),
            tagline: config.tagline().to_string(),
            base_url: base_url.to_string(),
            canonical_url: format!("{}{}", config.url().trim_end_matches('/'), base_url),
            favicon: config.favicon().map(|f| asset_url(base_url, f)),
            image: theme.image.as_deref().map(|i| asset_url(base_url, i)),
            color_mode: match theme.color_mode.default_mode {
                ColorScheme::Light => "light".to_string(),
                ColorScheme::Dark => "dark".to_string(),
            },
            announcement: theme.announcement_bar.clone(),
            navbar_title: theme.navbar.title.clone(),
            logo: theme.navbar.logo.as_ref().map(|l| Logo {
                src: asset_url(base_url, &l.src),
                alt: l.alt.clone(),
            }),
            nav_left,
            nav_right,
            cta: docs_route.map(|href| Link {
                label: "Get Started".to_string(),
                href,
                external: false,
            }),
            features,
            footer_style: match theme.footer.style {
                FooterStyle::Light => "light".to_string(),
                FooterStyle::Dark => "dark".to_string(),
            },
            footer,
            copyright: theme.footer.copyright.clone(),
        }
    }
}

/// Navbar and footer links that point into the site, in declaration order.
///
/// `docSidebar` items are excluded; they always point at a docs route.
pub fn internal_links(config: &SiteConfig) -> Vec<InternalLink> {
    let theme = config.theme_config();
    let base_url = config.base_url();
    let mut links = Vec::new();

    let mut push = |field: String, label: &str, target: &str| {
        let link = resolve_link(base_url, label, target);
        if !link.external && target.starts_with('/') {
            links.push(InternalLink {
                field,
                href: link.href,
            });
        }
    };

    for (i, item) in theme.navbar.items.iter().enumerate() {
        if item.kind.as_deref() == Some("docSidebar") {
            continue;
        }
        if let Some(target) = item.target() {
            push(format!("theme_config.navbar.items[{}]", i), &item.label, target);
        }
    }

    for (i, column) in theme.footer.links.iter().enumerate() {
        for (j, item) in column.items.iter().enumerate() {
            if let Some(target) = item.target() {
                push(
                    format!("theme_config.footer.links[{}].items[{}]", i, j),
                    &item.label,
                    target,
                );
            }
        }
    }

    links
}

/// Site-relative targets get the base URL, everything else is external.
fn resolve_link(base_url: &str, label: &str, target: &str) -> Link {
    let external = target.contains("://");
    let href = if !external && target.starts_with('/') {
        join_route(base_url, target)
    } else {
        target.to_string()
    };
    Link {
        label: label.to_string(),
        href,
        external,
    }
}

fn asset_url(base_url: &str, key: &str) -> String {
    let key = key
        .strip_prefix(auditum_site_features::assets::SITE_STATIC_PREFIX)
        .unwrap_or(key);
    join_route(base_url, key)
}

/// Template engine for site pages.
pub struct PageTemplates {
    env: Environment<'static>,
}

impl PageTemplates {
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("landing.html".to_string(), LANDING_TEMPLATE.to_string())
            .expect("Failed to add landing template");

        env.add_template_owned("navbar.html".to_string(), NAVBAR_TEMPLATE.to_string())
            .expect("Failed to add navbar template");

        env.add_template_owned("footer.html".to_string(), FOOTER_TEMPLATE.to_string())
            .expect("Failed to add footer template");

        Self { env }
    }

    /// Render the landing page.
    pub fn render_landing(&self, context: &LandingContext) -> Result<String, minijinja::Error> {
        self.env.get_template("landing.html")?.render(context)
    }
}

impl Default for PageTemplates {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}" data-theme="{{ color_mode }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}{% if tagline %} | {{ tagline }}{% endif %}</title>
  <meta name="description" content="{{ tagline }}">
  <link rel="canonical" href="{{ canonical_url | safe }}">
  {% if favicon %}<link rel="icon" href="{{ favicon | safe }}">{% endif %}
  {% if image %}<meta property="og:image" content="{{ image | safe }}">{% endif %}
</head>
<body>
  {% if announcement %}
  <div class="announcement-bar" data-id="{{ announcement.id }}"{% if announcement.background_color %} style="background-color: {{ announcement.background_color }}; color: {{ announcement.text_color }}"{% endif %}>
    {{ announcement.content | safe }}
    {% if announcement.is_closeable %}<button class="close" aria-label="Close">&times;</button>{% endif %}
  </div>
  {% endif %}
  {% include "navbar.html" %}
  <main>
    {% block content %}{% endblock %}
  </main>
  {% include "footer.html" %}
</body>
</html>"##;

const LANDING_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<header class="hero hero--primary">
  <div class="container">
    <h1 class="hero__title">{{ title }}</h1>
    <p class="hero__subtitle">{{ tagline }}</p>
    {% if cta %}
    <div class="buttons">
      <a class="button button--secondary button--lg" href="{{ cta.href | safe }}">{{ cta.label }}</a>
    </div>
    {% endif %}
  </div>
</header>
{{ features | safe }}
{% endblock %}"##;

const NAVBAR_TEMPLATE: &str = r##"<nav class="navbar">
  <div class="navbar__items">
    <a class="navbar__brand" href="{{ base_url | safe }}">
      {% if logo %}<img class="navbar__logo" src="{{ logo.src | safe }}" alt="{{ logo.alt }}">{% endif %}
      {% if navbar_title %}<b class="navbar__title">{{ navbar_title }}</b>{% endif %}
    </a>
    {% for link in nav_left %}
    <a class="navbar__item navbar__link" href="{{ link.href | safe }}"{% if link.external %} target="_blank" rel="noopener noreferrer"{% endif %}>{{ link.label }}</a>
    {% endfor %}
  </div>
  <div class="navbar__items navbar__items--right">
    {% for link in nav_right %}
    <a class="navbar__item navbar__link" href="{{ link.href | safe }}"{% if link.external %} target="_blank" rel="noopener noreferrer"{% endif %}>{{ link.label }}</a>
    {% endfor %}
  </div>
</nav>"##;

const FOOTER_TEMPLATE: &str = r##"<footer class="footer footer--{{ footer_style }}">
  <div class="container">
    <div class="row footer__links">
    {% for section in footer %}
      <div class="col footer__col">
        <div class="footer__title">{{ section.title }}</div>
        <ul class="footer__items">
        {% for link in section.links %}
          <li class="footer__item"><a class="footer__link-item" href="{{ link.href | safe }}"{% if link.external %} target="_blank" rel="noopener noreferrer"{% endif %}>{{ link.label }}</a></li>
        {% endfor %}
        </ul>
      </div>
    {% endfor %}
    </div>
    {% if copyright %}<div class="footer__copyright">{{ copyright | safe }}</div>{% endif %}
  </div>
</footer>"##;
