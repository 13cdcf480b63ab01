//! Route matching and reversal through the public API.

use minimal_routes::params;
use minimal_routes::routing::{
    make_route, make_urls, match_route, ParamValue, Params, QueryMap, ReversalError, Route,
    RouteDeclaration,
};
use rstest::rstest;

fn route(page: &str, pattern: &str) -> Route {
    Route::builder(page).pattern(pattern).build().unwrap()
}

#[rstest]
#[case("/", "/", Some(params! {}))]
#[case("/about", "/about", Some(params! {}))]
#[case("/about", "/ABOUT", Some(params! {}))]
#[case("/about", "/about/", None)]
#[case("/about/", "/about", None)]
#[case("/products/:slug", "/products/Hammer", Some(params! { "slug" => "Hammer" }))]
#[case("/products/:slug", "/products/", None)]
#[case("/products/:slug", "/products/a/b", None)]
#[case("/blog/:parts*", "/blog", Some(params! {}))]
#[case("/blog/:parts*", "/blog/one/two", Some(params! { "parts" => vec!["one", "two"] }))]
#[case("/files/:path+", "/files", None)]
#[case("/files/:path+", "/files/a", Some(params! { "path" => vec!["a"] }))]
#[case("/posts/:year(\\d+)", "/posts/2024", Some(params! { "year" => "2024" }))]
#[case("/posts/:year(\\d+)", "/posts/latest", None)]
#[case("/img/:name.:ext", "/img/logo.png", Some(params! { "name" => "logo", "ext" => "png" }))]
#[case("/lang/:locale?", "/lang", Some(params! {}))]
#[case("/a/:x/:x", "/a/1/2", Some(params! { "x" => "2" }))]
fn test_matches(#[case] pattern: &str, #[case] path: &str, #[case] expected: Option<Params>) {
    assert_eq!(route("/page", pattern).matches(path), expected);
}

#[rstest]
#[case("/product/:slug", params! { "slug" => "hammer" }, "/product/hammer")]
#[case("/brand/:slug", params! { "slug" => "black&decker" }, "/brand/black%26decker")]
#[case("/brand/:slug", params! { "slug" => "a b/c" }, "/brand/a%20b%2Fc")]
#[case("/blog/:parts*", params! {}, "/blog")]
#[case("/blog/:parts*", params! { "parts" => vec!["x", "y"] }, "/blog/x/y")]
#[case("/lang/:locale?", params! {}, "/lang")]
fn test_reverses(#[case] pattern: &str, #[case] params: Params, #[case] expected: &str) {
    assert_eq!(route("/page", pattern).reverse(Some(&params)).unwrap(), expected);
}

#[test]
fn test_reverse_validation() {
    let product = route("/product", "/product/:slug");

    assert!(matches!(product.reverse(None), Err(ReversalError::Missing { .. })));
    assert!(matches!(
        product.reverse(Some(&params! { "slug" => "" })),
        Err(ReversalError::Mismatch { .. })
    ));

    let numeric = route("/post", "/posts/:id(\\d+)");
    assert!(matches!(
        numeric.reverse(Some(&params! { "id" => "abc" })),
        Err(ReversalError::Mismatch { .. })
    ));
}

#[rstest]
#[case("/product/:slug", params! { "slug" => "hammer" })]
#[case("/u/:user/repo/:name", params! { "user" => "Ann", "name" => "tools" })]
#[case("/v/:id(\\d+)", params! { "id" => "42" })]
fn test_round_trip(#[case] pattern: &str, #[case] params: Params) {
    let route = route("/page", pattern);
    let path = route.reverse(Some(&params)).unwrap();
    assert_eq!(route.matches(&path), Some(params));
}

#[test]
fn test_repeated_calls_are_stable() {
    let route = route("/product", "/products/:slug");
    assert!(!route.is_match_compiled());

    let first = route.matches("/products/x");
    assert!(route.is_match_compiled());
    assert_eq!(route.matches("/products/x"), first);

    let params = params! { "slug" => "x" };
    assert_eq!(route.reverse(Some(&params)), route.reverse(Some(&params)));
}

#[test]
fn test_first_match_wins() {
    let routes = vec![route("/one", "/"), route("/two", "/")];
    let found = match_route(&routes, "/").unwrap();
    assert_eq!(found.route.page(), "/one");

    assert!(match_route(&routes, "/missing").is_none());
    assert!(match_route(&Vec::<Route>::new(), "/").is_none());
}

#[test]
fn test_declaration_to_urls() {
    let declaration: RouteDeclaration = toml::from_str(
        r#"
        page = "/product"
        pattern = "/products/:slug"
        sitemap = true
        "#,
    )
    .unwrap();
    let product = make_route(&declaration).unwrap();
    assert_eq!(product.meta()["sitemap"], serde_json::json!(true));

    let mut query = QueryMap::new();
    query.insert("slug".into(), ParamValue::from("nails"));
    query.insert("sort".into(), ParamValue::from(vec!["price", "popularity"]));

    let urls = make_urls(&product, &params! { "slug" => "hammer" }, &query, "reviews").unwrap();
    assert_eq!(urls.internal.page, "/product");
    assert_eq!(urls.internal.query["slug"], ParamValue::from("hammer"));
    assert_eq!(urls.internal.query["sort"], ParamValue::from(vec!["price", "popularity"]));
    assert_eq!(urls.public.pathname, "/products/hammer");
    assert_eq!(urls.public.query, query);
    assert_eq!(urls.public.hash, "reviews");
}

#[test]
fn test_declaration_without_page_fails() {
    let declaration: RouteDeclaration = toml::from_str(r#"pattern = "/x""#).unwrap();
    let err = make_route(&declaration).unwrap_err();
    assert_eq!(err.to_string(), "expected 'page' to be a string, but got: nothing");

    let declaration: RouteDeclaration = toml::from_str("page = 5").unwrap();
    let err = make_route(&declaration).unwrap_err();
    assert_eq!(err.to_string(), "expected 'page' to be a string, but got: 5");
}
