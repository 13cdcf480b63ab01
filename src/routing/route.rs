//! Route definition.
//!
//! # Responsibilities
//! - Validate the page identifier at construction
//! - Lazily compile the pattern into a matcher and a reverser
//! - Carry user metadata through untouched
//!
//! # Design Decisions
//! - Each direction is compiled at most once per route (`OnceLock`)
//! - Explicit `matcher`/`reverser` overrides replace compilation entirely
//! - An uncompilable pattern never matches; reversing it is an error

use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routing::params::Params;
use crate::routing::pattern::{PathMatcher, PathReverser, Pattern, ReversalError};

/// Custom matcher: returns parameters on success, `None` otherwise.
pub type MatchFn = Arc<dyn Fn(&str) -> Option<Params> + Send + Sync>;

/// Custom reverser.
pub type ReverseFn = Arc<dyn Fn(&Params) -> Result<String, ReversalError> + Send + Sync>;

/// Arbitrary extra fields attached to a route.
pub type Metadata = IndexMap<String, serde_json::Value>;

/// Errors raised while constructing a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The page identifier is missing, not a string, or empty.
    #[error("expected 'page' to be a string, but got: {0}")]
    InvalidRoute(String),
}

/// A route as written in configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RouteDeclaration {
    /// Page identifier. Kept loosely typed so a wrong type is reported by
    /// route construction with the offending value.
    #[serde(default)]
    pub page: Option<serde_json::Value>,

    /// Path pattern; defaults to the page identifier.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Everything else.
    #[serde(flatten)]
    pub extra: Metadata,
}

/// Build a route from its declaration.
pub fn make_route(declaration: &RouteDeclaration) -> Result<Route, RouteError> {
    let page = match &declaration.page {
        Some(serde_json::Value::String(page)) => page.clone(),
        Some(other) => return Err(RouteError::InvalidRoute(other.to_string())),
        None => return Err(RouteError::InvalidRoute("nothing".to_string())),
    };

    let mut builder = Route::builder(page);
    if let Some(pattern) = &declaration.pattern {
        builder = builder.pattern(pattern.clone());
    }
    for (key, value) in &declaration.extra {
        builder = builder.meta(key.clone(), value.clone());
    }
    builder.build()
}

/// A page bound to a path pattern.
pub struct Route {
    page: String,
    pattern: String,
    meta: Metadata,
    match_override: Option<MatchFn>,
    reverse_override: Option<ReverseFn>,
    matcher: OnceLock<Option<PathMatcher>>,
    reverser: OnceLock<Result<PathReverser, String>>,
}

impl Route {
    /// Start building a route for `page`.
    pub fn builder(page: impl Into<String>) -> RouteBuilder {
        RouteBuilder {
            page: page.into(),
            pattern: None,
            meta: Metadata::new(),
            match_override: None,
            reverse_override: None,
        }
    }

    /// Page identifier rendered when this route matches.
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Path pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Extra fields.
    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// Match a literal (already decoded) path.
    pub fn matches(&self, path: &str) -> Option<Params> {
        if let Some(custom) = &self.match_override {
            return custom(path);
        }

        self.compiled_matcher()?.matches(path)
    }

    /// Parameter names the pattern declares, whether or not a given path
    /// supplies them. Empty for routes with a custom matcher.
    pub fn declared_keys(&self) -> Vec<String> {
        if self.match_override.is_some() {
            return Vec::new();
        }
        let mut keys: Vec<String> = Vec::new();
        if let Some(matcher) = self.compiled_matcher() {
            for name in matcher.key_names() {
                if !keys.iter().any(|k| k == name) {
                    keys.push(name.to_string());
                }
            }
        }
        keys
    }

    fn compiled_matcher(&self) -> Option<&PathMatcher> {
        self.matcher
            .get_or_init(|| match Pattern::parse(&self.pattern).to_matcher() {
                Ok(matcher) => Some(matcher),
                Err(e) => {
                    tracing::error!(page = %self.page, error = %e, "Route pattern failed to compile; route will never match");
                    None
                }
            })
            .as_ref()
    }

    /// Build a path from `params`.
    pub fn reverse(&self, params: Option<&Params>) -> Result<String, ReversalError> {
        if let Some(custom) = &self.reverse_override {
            let empty = Params::new();
            return custom(params.unwrap_or(&empty));
        }

        let reverser = self.reverser.get_or_init(|| {
            Pattern::parse(&self.pattern)
                .to_reverser()
                .map_err(|e| e.to_string())
        });

        match reverser {
            Ok(reverser) => reverser.reverse(params),
            Err(reason) => Err(ReversalError::Pattern {
                pattern: self.pattern.clone(),
                reason: reason.clone(),
            }),
        }
    }

    /// Whether the pattern has been compiled for matching.
    pub fn is_match_compiled(&self) -> bool {
        self.matcher.get().is_some()
    }

    /// Whether the pattern has been compiled for reversing.
    pub fn is_reverse_compiled(&self) -> bool {
        self.reverser.get().is_some()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("page", &self.page)
            .field("pattern", &self.pattern)
            .field("meta", &self.meta)
            .field("custom_match", &self.match_override.is_some())
            .field("custom_reverse", &self.reverse_override.is_some())
            .finish()
    }
}

/// Builder for [`Route`].
pub struct RouteBuilder {
    page: String,
    pattern: Option<String>,
    meta: Metadata,
    match_override: Option<MatchFn>,
    reverse_override: Option<ReverseFn>,
}

impl RouteBuilder {
    /// Set the path pattern.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Replace pattern matching with a custom function.
    pub fn matcher<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Option<Params> + Send + Sync + 'static,
    {
        self.match_override = Some(Arc::new(f));
        self
    }

    /// Replace pattern reversal with a custom function.
    pub fn reverser<F>(mut self, f: F) -> Self
    where
        F: Fn(&Params) -> Result<String, ReversalError> + Send + Sync + 'static,
    {
        self.reverse_override = Some(Arc::new(f));
        self
    }

    /// Attach an extra field.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<Route, RouteError> {
        if self.page.is_empty() {
            return Err(RouteError::InvalidRoute("\"\"".to_string()));
        }

        let pattern = self.pattern.unwrap_or_else(|| self.page.clone());
        Ok(Route {
            page: self.page,
            pattern,
            meta: self.meta,
            match_override: self.match_override,
            reverse_override: self.reverse_override,
            matcher: OnceLock::new(),
            reverser: OnceLock::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use crate::routing::params::ParamValue;

    fn route(page: &str, pattern: &str) -> Route {
        Route::builder(page).pattern(pattern).build().unwrap()
    }

    #[test]
    fn test_missing_page() {
        let err = make_route(&RouteDeclaration::default()).unwrap_err();
        assert_eq!(err.to_string(), "expected 'page' to be a string, but got: nothing");
    }

    #[test]
    fn test_page_wrong_type() {
        let declaration = RouteDeclaration {
            page: Some(serde_json::json!(42)),
            ..Default::default()
        };
        assert_eq!(
            make_route(&declaration).unwrap_err(),
            RouteError::InvalidRoute("42".to_string())
        );
    }

    #[test]
    fn test_empty_page() {
        assert!(Route::builder("").build().is_err());
    }

    #[test]
    fn test_pattern_defaults_to_page() {
        let route = Route::builder("/about").build().unwrap();
        assert_eq!(route.page(), "/about");
        assert_eq!(route.pattern(), "/about");
    }

    #[test]
    fn test_lazy_and_memoized() {
        let route = route("/product", "/product/:slug");
        assert!(!route.is_match_compiled());
        assert!(!route.is_reverse_compiled());

        let first = route.matches("/product/hammer");
        assert!(route.is_match_compiled());
        assert!(!route.is_reverse_compiled());
        assert_eq!(first, route.matches("/product/hammer"));
        assert_eq!(first, Some(params! { "slug" => "hammer" }));

        let path = route.reverse(first.as_ref()).unwrap();
        assert!(route.is_reverse_compiled());
        assert_eq!(path, "/product/hammer");
    }

    #[test]
    fn test_match_strictness() {
        let route = route("/product", "/product/:slug");
        assert!(route.matches("/product").is_none());
        assert!(route.matches("/product/").is_none());
        assert!(route.matches("/product/hammer/").is_none());
    }

    #[test]
    fn test_repeatable_params() {
        let route = route("/blog", "/blog/:parts*");
        assert_eq!(route.matches("/blog"), Some(Params::new()));
        assert_eq!(route.matches("/blog/one"), Some(params! { "parts" => vec!["one"] }));
        assert_eq!(
            route.matches("/blog/one/two"),
            Some(params! { "parts" => vec!["one", "two"] })
        );
    }

    #[test]
    fn test_reverse() {
        let about = Route::builder("/about").build().unwrap();
        assert_eq!(about.reverse(None).unwrap(), "/about");

        let product = route("/product", "/product/:slug");
        assert_eq!(product.reverse(Some(&params! { "slug" => "hammer" })).unwrap(), "/product/hammer");
        assert!(matches!(product.reverse(None), Err(ReversalError::Missing { .. })));
        assert!(matches!(
            product.reverse(Some(&params! { "slug" => "" })),
            Err(ReversalError::Mismatch { .. })
        ));
    }

    #[test]
    fn test_reverse_encoding() {
        let brand = route("/brand", "/brand/:slug");
        assert_eq!(
            brand.reverse(Some(&params! { "slug" => "black&decker" })).unwrap(),
            "/brand/black%26decker"
        );
        assert_eq!(
            brand.reverse(Some(&params! { "slug" => "Sandvik A/S" })).unwrap(),
            "/brand/Sandvik%20A%2FS"
        );
    }

    #[test]
    fn test_meta_preserved() {
        let route = Route::builder("/")
            .meta("sitemap", true)
            .meta("weight", 123)
            .build()
            .unwrap();
        assert_eq!(route.meta()["sitemap"], serde_json::json!(true));
        assert_eq!(route.meta()["weight"], serde_json::json!(123));
    }

    #[test]
    fn test_override_match() {
        let route = Route::builder("/legacy")
            .matcher(|path| {
                let name = match path.to_lowercase().as_str() {
                    "/en/about-us.php" => "about",
                    "/en-us/product.php" => "product",
                    _ => return None,
                };
                Some(params! { "name" => name })
            })
            .build()
            .unwrap();

        assert_eq!(route.matches("/en/about-us.php"), Some(params! { "name" => "about" }));
        assert_eq!(route.matches("/en-US/product.php"), Some(params! { "name" => "product" }));
        assert_eq!(route.matches("/legacy"), None);
        assert!(!route.is_match_compiled());
    }

    #[test]
    fn test_override_reverse() {
        let route = Route::builder("/file")
            .pattern("/file/:file")
            .reverser(|params| match params.get("file") {
                Some(ParamValue::One(file)) => Ok(format!("/file/{}", file.to_lowercase())),
                _ => Err(ReversalError::Custom("file is required".into())),
            })
            .build()
            .unwrap();

        assert_eq!(route.reverse(Some(&params! { "file" => "img.BMP" })).unwrap(), "/file/img.bmp");
        assert_eq!(route.reverse(None).unwrap_err().to_string(), "file is required");
    }

    #[test]
    fn test_bad_pattern_never_matches() {
        let route = route("/bad", "/bad/:x(?<=y)");
        assert!(route.matches("/bad/y").is_none());
        assert!(matches!(route.reverse(None), Err(ReversalError::Pattern { .. })));
    }

    #[test]
    fn test_from_declaration_keeps_extras() {
        let declaration: RouteDeclaration = toml::from_str(
            r#"
            page = "/product"
            pattern = "/products/:slug"
            sitemap = true
            "#,
        )
        .unwrap();
        let route = make_route(&declaration).unwrap();
        assert_eq!(route.pattern(), "/products/:slug");
        assert_eq!(route.meta()["sitemap"], serde_json::json!(true));
        assert!(!route.meta().contains_key("page"));
    }

    #[test]
    fn test_concurrent_first_use_converges() {
        let route = route("/product", "/products/:slug/:tab?");
        assert!(!route.is_match_compiled());
        let slug = params! { "slug" => "hammer" };

        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| (route.matches("/products/hammer"), route.reverse(Some(&slug)))))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(route.is_match_compiled());
        assert!(route.is_reverse_compiled());
        for (matched, reversed) in results {
            assert_eq!(matched, Some(slug.clone()));
            assert_eq!(reversed.unwrap(), "/products/hammer");
        }
    }
}
