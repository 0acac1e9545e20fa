//! End-to-end rendering of one small project, inline and split.

use docweave::{
    DocsBuilder, ProjectTree,
    config::{AppConfig, ExportFormat, SeparateUnits},
    element::ElementKind,
    identity::StableHash,
};

/// `namespace A { class Foo { void Bar(Baz b) {} } class Baz {} }`
const SOURCE: &str = r#"{
    "project": "Sample",
    "path": "src/Sample.cs",
    "nodes": [
        { "kind": "namespace", "name": "A", "members": [
            { "kind": "class", "name": "Foo", "symbol": { "qualified_name": "A.Foo" }, "members": [
                { "kind": "method", "name": "Bar",
                  "symbol": { "qualified_name": "A.Foo.Bar(A.Baz)", "containing_type": "A.Foo" },
                  "return_type": { "text": "void" },
                  "parameters": [ { "name": "b", "type": { "text": "Baz", "symbol": "A.Baz" } } ] }
            ] },
            { "kind": "class", "name": "Baz", "symbol": { "qualified_name": "A.Baz" } }
        ] }
    ]
}"#;

/// ```text
/// namespace A {
///     class Foo { Mode Size { get; } Foo count; void Bar(Mode m) {} void Bar(string s) {} }
///     enum Mode { On, Off }
///     delegate void Handler(Foo sender);
///     class Outer<T> { class Inner {} }
/// }
/// ```
const MEMBERS: &str = r#"{
    "project": "Sample",
    "path": "src/Members.cs",
    "nodes": [
        { "kind": "namespace", "name": "A", "members": [
            { "kind": "class", "name": "Foo", "symbol": { "qualified_name": "A.Foo" }, "members": [
                { "kind": "property", "name": "Size", "accessors": ["get"],
                  "type": { "text": "Mode", "symbol": "A.Mode" } },
                { "kind": "field", "variables": ["count"], "type": { "text": "Foo", "symbol": "A.Foo" } },
                { "kind": "method", "name": "Bar",
                  "symbol": { "qualified_name": "A.Foo.Bar(A.Mode)", "containing_type": "A.Foo" },
                  "return_type": { "text": "void" },
                  "parameters": [ { "name": "m", "type": { "text": "Mode", "symbol": "A.Mode" } } ] },
                { "kind": "method", "name": "Bar",
                  "symbol": { "qualified_name": "A.Foo.Bar(string)", "containing_type": "A.Foo" },
                  "return_type": { "text": "void" },
                  "parameters": [ { "name": "s", "type": { "text": "string" } } ] }
            ] },
            { "kind": "enum", "name": "Mode", "symbol": { "qualified_name": "A.Mode" },
              "enum_members": ["On", "Off"] },
            { "kind": "delegate", "name": "Handler", "symbol": { "qualified_name": "A.Handler" },
              "return_type": { "text": "void" },
              "parameters": [ { "name": "sender", "type": { "text": "Foo", "symbol": "A.Foo" } } ] },
            { "kind": "class", "name": "Outer", "type_parameters": ["T"],
              "symbol": { "qualified_name": "A.Outer<T>", "arity": 1 }, "members": [
                { "kind": "class", "name": "Inner", "symbol": { "qualified_name": "A.Outer<T>.Inner" } }
            ] }
        ] }
    ]
}"#;

fn build(config: AppConfig) -> (DocsBuilder, ProjectTree) {
    build_from(SOURCE, config)
}

fn build_from(source: &str, config: AppConfig) -> (DocsBuilder, ProjectTree) {
    let builder = DocsBuilder::new(config);
    let unit = builder.load(source).expect("Failed to load source unit");
    let tree = builder
        .build(&[unit])
        .expect("Failed to build project tree")
        .into_tree();
    (builder, tree)
}

fn hash(qualified_name: &str) -> String {
    StableHash::of(qualified_name).to_string()
}

fn split(kinds: &[ElementKind]) -> AppConfig {
    let separate = kinds
        .iter()
        .fold(SeparateUnits::default(), |separate, &kind| separate.with(kind, true));
    AppConfig::new(Vec::new(), vec![ExportFormat::Md], separate)
}

#[test]
fn test_inline_rendering_produces_one_document() {
    let (builder, tree) = build(AppConfig::default());

    let units = builder.render_markdown(&tree).expect("Failed to render");

    let names: Vec<_> = units.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["README.md", "style.css"]);

    let index = &units["README.md"];
    assert!(index.starts_with("<link rel=\"stylesheet\" href=\"style.css\">"));
    assert!(index.contains(&format!("╚═ [A](#{})", hash("A"))));
    assert!(index.contains(&format!("id=\"{}\">Foo</a>", hash("A.Foo"))));
    assert!(index.contains(&format!("id=\"{}\">Baz</a>", hash("A.Baz"))));
    assert!(index.contains("# Classes"));
    assert!(index.contains(&format!("[Baz](#{})", hash("A.Baz"))));
    assert!(index.contains("<span class=\"MethodParameterName\">b</span>"));
}

#[test]
fn test_split_rendering_writes_one_unit_per_class() {
    let separate = SeparateUnits::default().with(ElementKind::Class, true);
    let config = AppConfig::new(Vec::new(), vec![ExportFormat::Md], separate);
    let (builder, tree) = build(config);

    let units = builder.render_markdown(&tree).expect("Failed to render");

    let foo_file = format!("Foo{}.md", hash("A.Foo"));
    let baz_file = format!("Baz{}.md", hash("A.Baz"));
    assert_eq!(units.len(), 4);

    let index = &units["README.md"];
    assert!(index.contains("| Name | Description |"));
    assert!(index.contains(&format!("[Foo]({foo_file}#{})", hash("A.Foo"))));
    assert!(index.contains(&format!("[Baz]({baz_file}#{})", hash("A.Baz"))));
    assert!(!index.contains("MethodParameterName"));

    let back = format!("### [&#x21E6; Go Back](README.md#{})", hash("A"));
    let foo = &units[&foo_file];
    assert!(foo.contains(&back));
    assert!(foo.contains(&format!("id=\"{}\">Foo</a>", hash("A.Foo"))));
    assert!(foo.contains(&format!("[Baz]({baz_file}#{})", hash("A.Baz"))));

    let baz = &units[&baz_file];
    assert!(baz.contains(&back));
    assert!(baz.contains("This type has no content"));
}

#[test]
fn test_split_method_links_from_its_own_unit() {
    let (builder, tree) = build(split(&[ElementKind::Method]));

    let units = builder.render_markdown(&tree).expect("Failed to render");

    let bar = hash("A.Foo.Bar(A.Baz)");
    let bar_file = format!("Bar{bar}.md");
    assert_eq!(units.len(), 3);

    let index = &units["README.md"];
    assert!(index.contains(&format!("<span class=\"MethodDeclaration\">[Bar]({bar_file}#{bar})</span>")));
    assert!(!index.contains("MethodParameterName"));

    let unit = &units[&bar_file];
    assert!(unit.contains(&format!("### [&#x21E6; Go Back](README.md#{})", hash("A.Foo"))));
    assert!(unit.contains(&format!("<a name=\"{bar}\" id=\"{bar}\"></a>")));
    assert!(unit.contains(&format!("[Baz](README.md#{})", hash("A.Baz"))));
    assert!(unit.contains("<span class=\"MethodParameterName\">b</span>"));
}

#[test]
fn test_split_members_write_one_unit_each() {
    let kinds = [ElementKind::Property, ElementKind::Field, ElementKind::Method];
    let (builder, tree) = build_from(MEMBERS, split(&kinds));

    let units = builder.render_markdown(&tree).expect("Failed to render");

    let size = hash("A.Foo.Size");
    let count = hash("A.Foo.count");
    let by_mode = hash("A.Foo.Bar(A.Mode)");
    let by_name = hash("A.Foo.Bar(string)");
    assert_ne!(by_mode, by_name);
    assert_eq!(units.len(), 6);

    let index = &units["README.md"];
    assert!(index.contains(&format!("<span class=\"VariableName\">[Size](Size{size}.md#{size})</span>")));
    assert!(index.contains(&format!("<span class=\"VariableName\">[count](count{count}.md#{count})</span>")));
    assert!(index.contains(&format!("[Bar](Bar{by_mode}.md#{by_mode})")));
    assert!(index.contains(&format!("[Bar](Bar{by_name}.md#{by_name})")));

    let back = format!("### [&#x21E6; Go Back](README.md#{})", hash("A.Foo"));
    let size_unit = &units[&format!("Size{size}.md")];
    assert!(size_unit.contains(&back));
    assert!(size_unit.contains(&format!("[Mode](README.md#{})", hash("A.Mode"))));
    assert!(size_unit.contains("<span class=\"Keyword\">get</span>;"));

    let count_unit = &units[&format!("count{count}.md")];
    assert!(count_unit.contains(&back));
    assert!(count_unit.contains(&format!("[Foo](README.md#{})", hash("A.Foo"))));

    let mode_overload = &units[&format!("Bar{by_mode}.md")];
    assert!(mode_overload.contains(&format!("[Mode](README.md#{})", hash("A.Mode"))));
    assert!(mode_overload.contains("<span class=\"MethodParameterName\">m</span>"));
    let name_overload = &units[&format!("Bar{by_name}.md")];
    assert!(name_overload.contains("<span class=\"MethodParameterName\">s</span>"));
}

#[test]
fn test_split_enum_and_delegate() {
    let (builder, tree) = build_from(MEMBERS, split(&[ElementKind::Enum, ElementKind::Delegate]));

    let units = builder.render_markdown(&tree).expect("Failed to render");

    let mode = hash("A.Mode");
    let handler = hash("A.Handler");
    let mode_file = format!("Mode{mode}.md");
    let handler_file = format!("Handler{handler}.md");
    assert_eq!(units.len(), 4);

    let index = &units["README.md"];
    assert!(index.contains(&format!("[Mode]({mode_file}#{mode})")));
    assert!(index.contains(&format!("[Handler]({handler_file}#{handler})")));
    // The property typed by the enum follows it into its unit.
    assert!(index.matches(&format!("[Mode]({mode_file}#{mode})")).count() >= 2);

    let back = format!("### [&#x21E6; Go Back](README.md#{})", hash("A"));
    let mode_unit = &units[&mode_file];
    assert!(mode_unit.contains(&back));
    assert!(mode_unit.contains(&format!("id=\"{mode}\">Mode</a>")));
    assert!(mode_unit.contains("- On\n- Off\n"));

    let handler_unit = &units[&handler_file];
    assert!(handler_unit.contains(&back));
    assert!(handler_unit.contains(&format!("id=\"{handler}\">Handler</a>")));
    assert!(handler_unit.contains(&format!("[Foo](README.md#{})", hash("A.Foo"))));
}

#[test]
fn test_nested_separate_units_chain_their_file_names() {
    let (builder, tree) = build_from(MEMBERS, split(&[ElementKind::Class]));

    let units = builder.render_markdown(&tree).expect("Failed to render");

    let outer = hash("A.Outer<1>");
    let inner = hash("A.Outer<1>.Inner");
    let outer_file = format!("T1.Outer{outer}.md");
    let inner_file = format!("x1.Outer.Inner{inner}.md");
    assert_eq!(units.len(), 5);
    assert!(units.contains_key(&format!("Foo{}.md", hash("A.Foo"))));

    let index = &units["README.md"];
    assert!(index.contains(&format!("[Outer]({outer_file}#{outer})")));
    assert!(!index.contains(&inner_file));

    let outer_unit = &units[&outer_file];
    assert!(outer_unit.contains(&format!("id=\"{outer}\">Outer</a>")));
    assert!(outer_unit.contains(&format!("[Inner]({inner_file}#{inner})")));

    let inner_unit = &units[&inner_file];
    assert!(inner_unit.contains(&format!("### [&#x21E6; Go Back]({outer_file}#{outer})")));
    assert!(inner_unit.contains(&format!("id=\"{inner}\">Inner</a>")));
    assert!(inner_unit.contains("This type has no content"));
}

#[test]
fn test_xml_rendering_ignores_separate_units() {
    let separate = SeparateUnits::default().with(ElementKind::Class, true);
    let (builder, tree) = build(AppConfig::new(Vec::new(), vec![ExportFormat::Xml], separate));

    let xml = builder.render_xml(&tree).expect("Failed to render");

    assert!(xml.contains("<class>"));
    assert!(xml.contains("<regularDeclaration fullName=\"A.Foo\">Foo</regularDeclaration>"));
    assert!(xml.contains("<declaration type=\"returnType\" name=\"void\">"));
    assert!(xml.contains("<variable>b</variable>"));
}

#[tokio::test]
async fn test_generate_writes_every_format() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let separate = SeparateUnits::default().with(ElementKind::Class, true);
    let config = AppConfig::new(Vec::new(), vec![ExportFormat::Md, ExportFormat::Xml], separate);
    let (builder, tree) = build(config);

    let summaries = builder
        .generate(&tree, dir.path())
        .await
        .expect("Failed to generate documentation");

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].format(), ExportFormat::Md);
    assert_eq!(summaries[0].files(), 4);
    assert_eq!(summaries[1].files(), 1);

    let md = dir.path().join("md");
    assert!(md.join("README.md").is_file());
    assert!(md.join("style.css").is_file());
    assert!(md.join(format!("Foo{}.md", hash("A.Foo"))).is_file());
    let xml = std::fs::read_to_string(dir.path().join("xml").join("docs.xml")).expect("docs.xml exists");
    assert!(xml.contains("<documentation>"));
}
