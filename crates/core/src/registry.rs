//! Registry of rendering families and the chart types each one provides.
//!
//! The registry is plain data handed to the validator at construction time;
//! nothing here is process-global.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Families whose assets every dashboard page loads.
pub const REQUIRED_FAMILIES: &[&str] = &["D3"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartType {
    /// Stable identifier stored in module `type` fields.
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFamily {
    pub charts: Vec<ChartType>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub js_urls: Vec<String>,
    #[serde(default)]
    pub css_urls: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub help_link: Option<String>,
}

fn default_enabled() -> bool {
    true
}

/// CSS and JS URLs a page needs, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assets {
    pub css: Vec<String>,
    pub js: Vec<String>,
}

impl Assets {
    fn extend_unique(&mut self, family: &ChartFamily) {
        for url in &family.css_urls {
            if !self.css.contains(url) {
                self.css.push(url.clone());
            }
        }
        for url in &family.js_urls {
            if !self.js.contains(url) {
                self.js.push(url.clone());
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartRegistry {
    families: BTreeMap<String, ChartFamily>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_family(mut self, name: impl Into<String>, family: ChartFamily) -> Self {
        self.families.insert(name.into(), family);
        self
    }

    pub fn family(&self, name: &str) -> Option<&ChartFamily> {
        self.families.get(name)
    }

    pub fn families(&self) -> impl Iterator<Item = (&str, &ChartFamily)> {
        self.families.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn family_names(&self) -> Vec<String> {
        self.families.keys().cloned().collect()
    }

    /// Every chart type name across all families.
    pub fn chart_types(&self) -> Vec<String> {
        let mut types = Vec::new();
        for family in self.families.values() {
            for chart in &family.charts {
                if !types.contains(&chart.name) {
                    types.push(chart.name.clone());
                }
            }
        }
        types
    }

    pub fn types_for(&self, family: &str) -> Vec<&str> {
        self.family(family)
            .map(|f| f.charts.iter().map(|c| c.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// The chart type belongs to the named family.
    pub fn is_valid_combination(&self, family: &str, chart_type: &str) -> bool {
        self.family(family)
            .is_some_and(|f| f.charts.iter().any(|c| c.name == chart_type))
    }

    /// Every asset URL declared by any family.
    pub fn all_assets(&self) -> Assets {
        let mut assets = Assets::default();
        for family in self.families.values() {
            assets.css.extend(family.css_urls.iter().cloned());
            assets.js.extend(family.js_urls.iter().cloned());
        }
        assets
    }

    /// Assets for the given families plus [`REQUIRED_FAMILIES`].
    ///
    /// A family's dependencies load before the family itself and no URL
    /// appears twice.
    pub fn active_assets<'a>(&self, families: impl IntoIterator<Item = &'a str>) -> Assets {
        let mut wanted: Vec<&str> = families.into_iter().collect();
        wanted.extend(REQUIRED_FAMILIES.iter().copied());

        let mut assets = Assets::default();
        for (name, family) in &self.families {
            if !wanted.contains(&name.as_str()) {
                continue;
            }
            for dep in &family.dependencies {
                if let Some(dep_family) = self.family(dep) {
                    assets.extend_unique(dep_family);
                }
            }
            assets.extend_unique(family);
        }
        assets
    }

    /// Rewrite remote CDN URLs to self-hosted paths: the file name is kept and
    /// prefixed with `js_path` or `css_path`.
    pub fn localized(&self, js_path: &str, css_path: &str) -> Self {
        let rewrite = |prefix: &str, url: &String| {
            let file = url.rsplit('/').next().unwrap_or(url);
            format!("{prefix}{file}")
        };
        let families = self
            .families
            .iter()
            .map(|(name, family)| {
                let mut family = family.clone();
                family.js_urls = family.js_urls.iter().map(|u| rewrite(js_path, u)).collect();
                family.css_urls = family.css_urls.iter().map(|u| rewrite(css_path, u)).collect();
                (name.clone(), family)
            })
            .collect();
        Self { families }
    }

    /// The families shipped by default.
    pub fn builtin() -> Self {
        fn family(
            charts: &[(&str, &str)],
            dependencies: &[&str],
            js: &[&str],
            css: &[&str],
            help: &str,
        ) -> ChartFamily {
            ChartFamily {
                charts: charts
                    .iter()
                    .map(|(name, label)| ChartType {
                        name: name.to_string(),
                        label: label.to_string(),
                    })
                    .collect(),
                dependencies: dependencies.iter().map(|s| s.to_string()).collect(),
                js_urls: js.iter().map(|s| s.to_string()).collect(),
                css_urls: css.iter().map(|s| s.to_string()).collect(),
                enabled: true,
                help_link: Some(help.to_string()),
            }
        }

        Self::new()
            .with_family(
                "C3",
                family(
                    &[
                        ("line", "Line chart"),
                        ("bar", "Bar chart"),
                        ("timeseries", "Timeseries chart"),
                        ("step", "Step chart"),
                        ("pie", "Pie chart"),
                        ("area", "Area chart"),
                        ("donut", "Donut chart"),
                        ("spline", "Spline chart"),
                        ("gauge", "Gauge chart"),
                        ("scatter", "Scatter chart"),
                        ("area-spline", "Area spline chart"),
                    ],
                    &["D3"],
                    &["//cdnjs.cloudflare.com/ajax/libs/c3/0.4.11/c3.min.js"],
                    &["//cdnjs.cloudflare.com/ajax/libs/c3/0.4.11/c3.min.css"],
                    "http://c3js.org/reference.html",
                ),
            )
            .with_family(
                "D3",
                family(
                    &[
                        ("radial-dendrogram", "Radial Dendrogram"),
                        ("dendrogram", "Dendrogram"),
                        ("treemap", "Treemap"),
                        ("voronoi", "Voronoi"),
                        ("circlepack", "Circle Pack"),
                    ],
                    &[],
                    &["//cdnjs.cloudflare.com/ajax/libs/d3/3.5.16/d3.min.js"],
                    &[],
                    "https://github.com/d3/d3/wiki",
                ),
            )
            .with_family(
                "WordCloud",
                family(
                    &[("wordcloud", "Word Cloud")],
                    &["D3"],
                    &["//cdnjs.cloudflare.com/ajax/libs/d3-cloud/1.2.4/d3.layout.cloud.min.js"],
                    &[],
                    "https://github.com/jasondavies/d3-cloud",
                ),
            )
            .with_family(
                "Basic",
                family(
                    &[
                        ("custom", "Custom direct loading of any arbitrary html."),
                        ("iframe", "Embedded iframe."),
                        ("image", "Image (inline embed)"),
                        ("number", "Single number (size autoscaled) representing some aggregate value."),
                        ("youtube", "YouTube video embedded as an iframe."),
                    ],
                    &[],
                    &[],
                    &[],
                    "https://github.com/christabor/flask_jsondash/blob/master/docs/schemas.md",
                ),
            )
            .with_family(
                "Vega",
                family(
                    &[("vega-lite", "vega-lite specification.")],
                    &["D3"],
                    &[
                        "//cdnjs.cloudflare.com/ajax/libs/vega/2.6.5/vega.min.js",
                        "//cdnjs.cloudflare.com/ajax/libs/vega-lite/1.3.1/vega-lite.min.js",
                        "//cdnjs.cloudflare.com/ajax/libs/vega-embed/2.2.0/vega-embed.min.js",
                    ],
                    &[],
                    "https://vega.github.io/vega-lite/docs",
                ),
            )
            .with_family(
                "DataTable",
                family(
                    &[("datatable", "A table of data, with sorting and filtering.")],
                    &[],
                    &[
                        "//cdnjs.cloudflare.com/ajax/libs/datatables/1.10.12/js/jquery.dataTables.min.js",
                        "//cdnjs.cloudflare.com/ajax/libs/datatables/1.10.10/js/dataTables.bootstrap.min.js",
                    ],
                    &["//cdnjs.cloudflare.com/ajax/libs/datatables/1.10.10/css/dataTables.bootstrap.min.css"],
                    "https://datatables.net/reference/index",
                ),
            )
            .with_family(
                "Timeline",
                family(
                    &[("timeline", "A timeline.js timeline")],
                    &[],
                    &["//cdn.knightlab.com/libs/timeline3/latest/js/timeline.js"],
                    &["//cdn.knightlab.com/libs/timeline3/latest/css/timeline.css"],
                    "https://timeline.knightlab.com/docs/",
                ),
            )
            .with_family(
                "Venn",
                family(
                    &[("venn", "A venn.js Venn or Euler diagram")],
                    &["D3"],
                    &["//cdn.rawgit.com/benfred/venn.js/master/venn.js"],
                    &[],
                    "https://github.com/benfred/venn.js/",
                ),
            )
            .with_family(
                "SigmaJS",
                family(
                    &[("sigma", "SigmaJS default json based graph")],
                    &[],
                    &["//cdnjs.cloudflare.com/ajax/libs/sigma.js/1.2.0/sigma.min.js"],
                    &[],
                    "http://sigmajs.org",
                ),
            )
            .with_family(
                "Cytoscape",
                family(
                    &[("cytoscape", "Cytoscape compatible json configuration (core layouts only).")],
                    &[],
                    &["//cdnjs.cloudflare.com/ajax/libs/cytoscape/3.1.0/cytoscape.min.js"],
                    &[],
                    "http://js.cytoscape.org/",
                ),
            )
            .with_family(
                "Graph",
                family(
                    &[("graph", "Graph using the graphviz .dot specification")],
                    &["D3"],
                    &[
                        "//cdnjs.cloudflare.com/ajax/libs/dagre-d3/0.4.17/dagre-d3.min.js",
                        "//raw.githubusercontent.com/cpettitt/graphlib-dot/master/dist/graphlib-dot.min.js",
                    ],
                    &[],
                    "https://github.com/cpettitt/dagre-d3/wiki",
                ),
            )
            .with_family(
                "Sparklines",
                family(
                    &[
                        ("sparklines-line", "Sparkline Line"),
                        ("sparklines-bar", "Sparkline Bar"),
                        ("sparklines-tristate", "Sparkline Tristate"),
                        ("sparklines-discrete", "Sparkline Discrete"),
                        ("sparklines-bullet", "Sparkline Bullet"),
                        ("sparklines-pie", "Sparkline Pie"),
                        ("sparklines-box", "Sparkline Box"),
                    ],
                    &[],
                    &["//cdnjs.cloudflare.com/ajax/libs/jquery-sparklines/2.1.2/jquery.sparkline.min.js"],
                    &[],
                    "http://omnipotent.net/jquery.sparkline/#s-docs",
                ),
            )
            .with_family(
                "PlotlyStandard",
                family(
                    &[("plotly-any", "Plotly serializable specification")],
                    &[],
                    &["//cdn.plot.ly/plotly-latest.min.js"],
                    &[],
                    "https://plot.ly/javascript/",
                ),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_types_are_known() {
        let registry = ChartRegistry::builtin();
        let types = registry.chart_types();
        assert!(types.contains(&"line".to_string()));
        assert!(types.contains(&"plotly-any".to_string()));
        assert_eq!(registry.types_for("Venn"), vec!["venn"]);
        assert!(registry.types_for("Nope").is_empty());
    }

    #[test]
    fn combination_requires_matching_family() {
        let registry = ChartRegistry::builtin();
        assert!(registry.is_valid_combination("C3", "line"));
        assert!(!registry.is_valid_combination("D3", "line"));
        assert!(!registry.is_valid_combination("Nope", "line"));
    }

    #[test]
    fn all_assets_have_matching_extensions() {
        let assets = ChartRegistry::builtin().all_assets();
        assert!(assets.js.iter().all(|u| u.ends_with(".js")));
        assert!(assets.css.iter().all(|u| u.ends_with(".css")));
    }

    #[test]
    fn active_assets_load_dependencies_first() {
        let assets = ChartRegistry::builtin().active_assets(["D3", "C3"]);
        assert!(assets.css[0].ends_with("c3.min.css"));
        assert!(assets.js[0].ends_with("d3.min.js"));
        assert!(assets.js[1].ends_with("c3.min.js"));
    }

    #[test]
    fn active_assets_have_no_duplicates() {
        let registry = ChartRegistry::builtin();
        let assets = registry.active_assets(["D3", "D3", "C3", "C3"]);
        assert_eq!(assets.js.len(), 2);
        assert_ne!(assets, registry.all_assets());
    }

    #[test]
    fn required_family_always_loads() {
        let assets = ChartRegistry::builtin().active_assets([]);
        assert_eq!(assets.js.len(), 1);
        assert!(assets.js[0].ends_with("d3.min.js"));
    }

    #[test]
    fn localized_keeps_file_names() {
        let local = ChartRegistry::builtin().localized("/static/js/vendor/", "/static/css/vendor/");
        let c3 = local.family("C3").unwrap();
        assert_eq!(c3.js_urls, vec!["/static/js/vendor/c3.min.js"]);
        assert_eq!(c3.css_urls, vec!["/static/css/vendor/c3.min.css"]);
    }
}
