#![forbid(unsafe_code)]

//! Package and project catalogs, rendered to card markup.
//!
//! All user-visible strings and attribute values pass through
//! [`escape_into`]. Grids render into `#packages-grid` and `#projects-grid`;
//! a missing container is skipped with a warning.

use std::fmt::Write as _;

use folio_core::ops::{DomOp, Target};
use folio_core::page::PageSnapshot;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::html::{encode_uri_component, escape_into};

/// Container ids.
pub const PACKAGES_GRID: &str = "packages-grid";
pub const PROJECTS_GRID: &str = "projects-grid";

/// Features shown per package card.
pub const MAX_PACKAGE_FEATURES: usize = 5;

/// Placeholder background colors for projects without an image.
pub const PLACEHOLDER_PALETTE: [&str; 4] = ["4ecca3", "00d9ff", "9b6dff", "ff6b9d"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageStats {
    pub likes: String,
    pub points: String,
    pub popularity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageLinks {
    pub pub_dev: String,
    pub github: String,
}

/// A published package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub platform: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub stats: PackageStats,
    pub links: PackageLinks,
    #[serde(default)]
    pub is_new: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLinks {
    #[serde(default)]
    pub demo: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
}

/// A showcased project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub links: ProjectLinks,
    #[serde(default)]
    pub featured: bool,
}

/// Everything the site lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub packages: Vec<Package>,
    pub projects: Vec<Project>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            packages: vec![Package {
                id: "hydro-glass-nav-bar".into(),
                name: "hydro_glass_nav_bar".into(),
                version: "1.0.0-dev.3".into(),
                description: "A beautiful, Apple-style hydro glass floating navigation bar \
                              with advanced physics-based animations, draggable indicator, \
                              and expandable FAB support."
                    .into(),
                platform: "Flutter".into(),
                features: [
                    "Hydro Glass Morphism",
                    "Physics Animations",
                    "Draggable Indicator",
                    "Expandable FAB",
                    "Theme Adaptive",
                ]
                .map(String::from)
                .to_vec(),
                stats: PackageStats {
                    likes: "⭐ New".into(),
                    points: "140".into(),
                    popularity: "100%".into(),
                },
                links: PackageLinks {
                    pub_dev: "https://pub.dev/packages/hydro_glass_nav_bar".into(),
                    github: "https://github.com/kamal-ayman/hydro_glass_nav_bar".into(),
                },
                is_new: true,
            }],
            projects: vec![Project {
                id: "hydro-glass-nav-bar".into(),
                title: "Hydro Glass Nav Bar".into(),
                category: "Flutter Package".into(),
                description: "A beautiful, Apple-style hydro glass floating navigation bar \
                              with advanced physics-based animations and theme-adaptive design."
                    .into(),
                image: Some(
                    "https://raw.githubusercontent.com/kamal-ayman/hydro_glass_nav_bar/main/assets/preview.gif"
                        .into(),
                ),
                technologies: ["Flutter", "Dart", "Animation", "Physics"]
                    .map(String::from)
                    .to_vec(),
                links: ProjectLinks {
                    demo: Some("https://pub.dev/packages/hydro_glass_nav_bar".into()),
                    github: Some("https://github.com/kamal-ayman/hydro_glass_nav_bar".into()),
                },
                featured: false,
            }],
        }
    }
}

impl Catalog {
    /// Parse a catalog from JSON. Missing top-level lists are empty.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Ops filling whichever grids the page has.
    #[must_use]
    pub fn render_ops(&self, page: &PageSnapshot) -> Vec<DomOp> {
        let mut ops = Vec::with_capacity(2);
        if page.has(PACKAGES_GRID) {
            ops.push(DomOp::SetHtml {
                target: Target::id(PACKAGES_GRID),
                html: render_packages(&self.packages),
            });
        } else {
            folio_core::warn!("packages container not found");
        }
        if page.has(PROJECTS_GRID) {
            ops.push(DomOp::SetHtml {
                target: Target::id(PROJECTS_GRID),
                html: render_projects(&self.projects),
            });
        } else {
            folio_core::warn!("projects container not found");
        }
        ops
    }
}

// ---------------------------------------------------------------------------
// Packages
// ---------------------------------------------------------------------------

/// Markup for one package card.
#[must_use]
pub fn render_package_card(pkg: &Package) -> String {
    let mut out = String::with_capacity(2048);
    out.push_str("<article class=\"package-card\" data-package-id=\"");
    escape_into(&mut out, &pkg.id);
    out.push_str("\">");
    if pkg.is_new {
        out.push_str("<div class=\"package-coming-soon\">NEW</div>");
    }

    out.push_str(
        "<div class=\"package-card-header\"><div class=\"package-header-content\">\
         <div class=\"package-icon-wrapper\"><i class=\"fas fa-cubes\"></i></div>\
         <div class=\"package-badges\"><span class=\"package-version\">v",
    );
    escape_into(&mut out, &pkg.version);
    out.push_str(
        "</span><span class=\"package-platform\"><i class=\"fab fa-flutter\"></i> ",
    );
    escape_into(&mut out, &pkg.platform);
    out.push_str("</span></div></div></div>");

    out.push_str("<div class=\"package-card-body\"><h3 class=\"package-name\">");
    escape_into(&mut out, &pkg.name);
    out.push_str("</h3><p class=\"package-description\">");
    escape_into(&mut out, &pkg.description);
    out.push_str("</p><div class=\"package-features\">");
    for feature in pkg.features.iter().take(MAX_PACKAGE_FEATURES) {
        out.push_str(
            "<span class=\"package-feature\"><i class=\"fas fa-check-circle\"></i> ",
        );
        escape_into(&mut out, feature);
        out.push_str("</span>");
    }
    out.push_str("</div><div class=\"package-stats\">");
    push_stat(&mut out, "fa-thumbs-up", &pkg.stats.likes, None);
    push_stat(&mut out, "fa-chart-line", &pkg.stats.points, Some("points"));
    push_stat(&mut out, "fa-fire", &pkg.stats.popularity, Some("popular"));
    out.push_str("</div></div>");

    out.push_str("<div class=\"package-card-footer\">");
    push_link(
        &mut out,
        &pkg.links.pub_dev,
        "package-link primary",
        "fas fa-external-link-alt",
        "pub.dev",
    );
    push_link(
        &mut out,
        &pkg.links.github,
        "package-link secondary",
        "fab fa-github",
        "GitHub",
    );
    out.push_str("</div></article>");
    out
}

fn push_stat(out: &mut String, icon: &str, value: &str, label: Option<&str>) {
    let _ = write!(
        out,
        "<div class=\"package-stat\"><i class=\"fas {icon}\"></i><span class=\"package-stat-value\">"
    );
    escape_into(out, value);
    out.push_str("</span>");
    if let Some(label) = label {
        let _ = write!(out, "<span class=\"package-stat-label\">{label}</span>");
    }
    out.push_str("</div>");
}

fn push_link(out: &mut String, href: &str, class: &str, icon: &str, text: &str) {
    out.push_str("<a href=\"");
    escape_into(out, href);
    let _ = write!(
        out,
        "\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"{class}\"><i class=\"{icon}\"></i> {text}</a>"
    );
}

/// Markup for the packages grid, or the empty state.
#[must_use]
pub fn render_packages(packages: &[Package]) -> String {
    if packages.is_empty() {
        return "<div class=\"packages-empty\"><i class=\"fas fa-box-open\"></i>\
                <p>No packages published yet. Stay tuned!</p></div>"
            .to_owned();
    }
    packages.iter().map(render_package_card).collect()
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Placeholder image for a project without one.
///
/// The color is picked from [`PLACEHOLDER_PALETTE`] by a hash of the title,
/// so the same project always gets the same color.
#[must_use]
pub fn placeholder_image(title: &str) -> String {
    // FNV-1a
    let hash = title.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3)
    });
    let color = PLACEHOLDER_PALETTE[(hash % PLACEHOLDER_PALETTE.len() as u64) as usize];
    format!(
        "https://via.placeholder.com/600x400/{color}/0a0a0f?text={}",
        encode_uri_component(title)
    )
}

/// Markup for one project card.
#[must_use]
pub fn render_project_card(project: &Project) -> String {
    let mut out = String::with_capacity(1536);
    out.push_str("<article class=\"project-card");
    if project.featured {
        out.push_str(" featured");
    }
    out.push_str("\" data-project-id=\"");
    escape_into(&mut out, &project.id);
    out.push_str("\"><div class=\"project-image\"><img src=\"");
    match &project.image {
        Some(url) if !url.is_empty() => escape_into(&mut out, url),
        _ => escape_into(&mut out, &placeholder_image(&project.title)),
    }
    out.push_str("\" alt=\"");
    escape_into(&mut out, &project.title);
    out.push_str("\" loading=\"lazy\"><div class=\"project-overlay\">");
    if let Some(demo) = &project.links.demo {
        push_link(
            &mut out,
            demo,
            "btn btn-primary",
            "fas fa-external-link-alt",
            "View Live",
        );
    }
    if let Some(github) = &project.links.github {
        push_link(&mut out, github, "btn btn-ghost", "fab fa-github", "Code");
    }
    out.push_str("</div></div>");

    out.push_str(
        "<div class=\"project-content\"><span class=\"project-category\">\
         <i class=\"fas fa-folder\"></i> ",
    );
    escape_into(&mut out, &project.category);
    out.push_str("</span><h3 class=\"project-title\">");
    escape_into(&mut out, &project.title);
    out.push_str("</h3><p class=\"project-description\">");
    escape_into(&mut out, &project.description);
    out.push_str("</p><div class=\"project-tech\">");
    for tech in &project.technologies {
        out.push_str("<span class=\"tech-tag\">");
        escape_into(&mut out, tech);
        out.push_str("</span>");
    }
    out.push_str("</div></div></article>");
    out
}

/// Featured projects first, otherwise in catalog order.
#[must_use]
pub fn featured_first(projects: &[Project]) -> Vec<&Project> {
    let mut sorted: Vec<&Project> = projects.iter().collect();
    // Stable: ties keep catalog order.
    sorted.sort_by_key(|p| !p.featured);
    sorted
}

/// Markup for the projects grid, or the empty state.
#[must_use]
pub fn render_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "<div class=\"packages-empty\" style=\"grid-column: 1 / -1;\">\
                <i class=\"fas fa-rocket\"></i><p>Projects coming soon! Check back later.</p></div>"
            .to_owned();
    }
    featured_first(projects)
        .into_iter()
        .map(render_project_card)
        .collect()
}
