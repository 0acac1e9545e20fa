use docweave_core::{
    ProjectTree,
    element::{ElementBody, ElementId, ElementKind},
};
use serde_json::json;

use crate::{
    BuildConfig, BuildOutput, EmbeddedSemantics, ErrorCode, GLOBAL_NAMESPACE, Origin, ParseError,
    TreeBuilder, syntax::SourceUnit,
};

fn unit(project: &str, path: &str, nodes: serde_json::Value) -> SourceUnit {
    serde_json::from_value(json!({ "project": project, "path": path, "nodes": nodes }))
        .expect("valid source unit")
}

fn build_with(config: BuildConfig, units: &[SourceUnit]) -> Result<BuildOutput, ParseError> {
    let mut builder = TreeBuilder::new(config);
    for unit in units {
        builder.add_unit(unit, &EmbeddedSemantics);
    }
    builder.finish()
}

fn build(units: &[SourceUnit]) -> BuildOutput {
    build_with(BuildConfig::default(), units).expect("build succeeds")
}

fn namespace(tree: &ProjectTree, path: &str) -> ElementId {
    let index = tree.index();
    let node = index.find(index.root(), path).expect("namespace node exists");
    index.node(node).namespace().expect("namespace element exists")
}

fn child(tree: &ProjectTree, parent: ElementId, name: &str) -> ElementId {
    let model = tree.model();
    model[parent]
        .children()
        .iter()
        .copied()
        .find(|&id| model[id].name() == name)
        .unwrap_or_else(|| panic!("child `{name}` exists"))
}

fn kinds(tree: &ProjectTree, parent: ElementId) -> Vec<ElementKind> {
    let model = tree.model();
    model[parent].children().iter().map(|&id| model[id].kind()).collect()
}

#[test]
fn test_forward_reference_across_units() {
    let first = unit(
        "Demo",
        "Foo.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [
            { "kind": "class", "name": "Foo", "symbol": { "qualified_name": "A.Foo" }, "members": [
                { "kind": "method", "name": "Bar",
                  "symbol": { "qualified_name": "A.Foo.Bar(A.Baz)", "containing_type": "A.Foo" },
                  "return_type": { "text": "Baz", "symbol": "A.Baz" },
                  "parameters": [ { "name": "b", "type": { "text": "Baz", "symbol": "A.Baz" } } ] }
            ] }
        ] }]),
    );
    let second = unit(
        "Demo",
        "Baz.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [
            { "kind": "class", "name": "Baz", "symbol": { "qualified_name": "A.Baz" } }
        ] }]),
    );

    let output = build(&[first, second]);
    let tree = output.tree();
    let model = tree.model();
    let a = namespace(tree, "A");
    let foo = child(tree, a, "Foo");
    let baz = child(tree, a, "Baz");
    let bar = child(tree, foo, "Bar");

    assert_eq!(model[bar].return_type().and_then(|t| t.resolved_target()), Some(baz));
    let parameter = model[bar].parameters()[0];
    assert_eq!(model[parameter].name(), "b");
    assert_eq!(model[parameter].parent(), Some(bar));
    assert_eq!(
        model[parameter].value_type().and_then(|t| t.resolved_target()),
        Some(baz)
    );
    assert_eq!(model[bar].declaration().qualified_name(), Some("A.Foo.Bar(A.Baz)"));
    assert_eq!(model[foo].declaration().resolved_target(), Some(foo));
    assert_eq!(output.stats().unresolved, 0);
}

#[test]
fn test_unknown_usage_stays_unresolved() {
    let source = unit(
        "Demo",
        "Foo.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [
            { "kind": "class", "name": "Foo", "symbol": { "qualified_name": "A.Foo" }, "members": [
                { "kind": "property", "name": "Name", "type": { "text": "string", "symbol": "string" } },
                { "kind": "field", "variables": ["count"], "type": { "text": "int" } }
            ] }
        ] }]),
    );

    let output = build(&[source]);
    let tree = output.tree();
    let foo = child(tree, namespace(tree, "A"), "Foo");
    let name = child(tree, foo, "Name");

    let value_type = tree.model()[name].value_type().expect("property type");
    assert_eq!(value_type.qualified_name(), Some("string"));
    assert!(value_type.resolved_target().is_none());
    assert_eq!(output.stats().unresolved, 1);
}

#[test]
fn test_partial_declarations_merge() {
    let first = unit(
        "Demo",
        "Foo.A.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [
            { "kind": "class", "name": "Foo", "modifiers": ["public", "partial"],
              "symbol": { "qualified_name": "A.Foo" },
              "members": [ { "kind": "property", "name": "Size", "type": { "text": "int" } } ] }
        ] }]),
    );
    let second = unit(
        "Demo",
        "Foo.B.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [
            { "kind": "class", "name": "Foo", "modifiers": ["public", "partial"],
              "symbol": { "qualified_name": "A.Foo" },
              "doc": [ { "node": "element", "name": "summary",
                         "children": [ { "node": "text", "text": "Merged." } ] } ],
              "members": [ { "kind": "method", "name": "Grow", "return_type": { "text": "void" } } ] }
        ] }]),
    );

    let output = build(&[first, second]);
    let tree = output.tree();
    let a = namespace(tree, "A");
    let foo = child(tree, a, "Foo");

    assert_eq!(tree.model()[a].children().len(), 1);
    assert_eq!(kinds(tree, foo), vec![ElementKind::Property, ElementKind::Method]);
    let summary = tree.model()[foo]
        .documentation()
        .and_then(|docs| docs.summary.as_ref())
        .expect("documentation merged");
    assert_eq!(summary.plain_text(), "Merged.");
}

#[test]
fn test_skip_removes_subtree() {
    let source = unit(
        "Demo",
        "Hidden.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [
            { "kind": "class", "name": "Hidden",
              "doc": [ { "node": "element", "name": "skip" } ],
              "members": [
                { "kind": "method", "name": "Run", "return_type": { "text": "Missing", "symbol": "A.Missing" } }
              ] },
            { "kind": "class", "name": "Visible" }
        ] }]),
    );

    let output = build(&[source]);
    let tree = output.tree();
    let a = namespace(tree, "A");

    assert_eq!(tree.model()[a].children().len(), 1);
    child(tree, a, "Visible");
    assert!(tree.model().iter().all(|(_, element)| element.name() != "Run"));
    assert_eq!(output.stats().unresolved, 0);
}

#[test]
fn test_global_namespace_is_lazy() {
    let namespaced = unit(
        "Demo",
        "A.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [ { "kind": "class", "name": "Foo" } ] }]),
    );
    let output = build(&[namespaced.clone()]);
    assert!(output.tree().index().node(output.tree().index().root()).namespace().is_none());

    let global = unit("Demo", "Program.cs", json!([{ "kind": "class", "name": "Program" }]));
    let output = build(&[namespaced, global]);
    let tree = output.tree();
    let root = tree.index().root();
    let global = tree.index().node(root).namespace().expect("global namespace");

    assert_eq!(tree.model()[global].name(), GLOBAL_NAMESPACE);
    assert!(tree.model()[global].declaration().qualified_name().is_none());
    let program = child(tree, global, "Program");
    assert_eq!(tree.model()[program].declaration().qualified_name(), Some("Program"));
}

#[test]
fn test_excluded_project_is_skipped() {
    let tests = unit(
        "Demo.Tests",
        "FooTests.cs",
        json!([{ "kind": "namespace", "name": "Tests", "members": [ { "kind": "class", "name": "FooTests" } ] }]),
    );
    let code = unit(
        "Demo",
        "Foo.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [ { "kind": "class", "name": "Foo" } ] }]),
    );

    let output = build_with(
        BuildConfig::new(vec!["Demo.Tests".to_string()]),
        &[tests, code],
    )
    .expect("build succeeds");
    let index = output.tree().index();

    assert!(index.find(index.root(), "Tests").is_none());
    assert!(index.find(index.root(), "A").is_some());
}

#[test]
fn test_nested_namespaces_share_index_nodes() {
    let dotted = unit(
        "Demo",
        "Circle.cs",
        json!([{ "kind": "namespace", "name": "Shapes.Round", "members": [ { "kind": "class", "name": "Circle" } ] }]),
    );
    let nested = unit(
        "Demo",
        "Square.cs",
        json!([{ "kind": "namespace", "name": "Shapes", "members": [
            { "kind": "namespace", "name": "Round", "members": [ { "kind": "class", "name": "Oval" } ] },
            { "kind": "class", "name": "Square" }
        ] }]),
    );

    let output = build(&[dotted, nested]);
    let tree = output.tree();
    let round = namespace(tree, "Shapes.Round");

    assert_eq!(tree.model()[round].name(), "Shapes.Round");
    assert_eq!(tree.model()[round].children().len(), 2);
    let square = child(tree, namespace(tree, "Shapes"), "Square");
    assert_eq!(
        tree.model()[square].declaration().qualified_name(),
        Some("Shapes.Square")
    );
}

#[test]
fn test_members_sorted_by_kind() {
    let source = unit(
        "Demo",
        "Foo.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [
            { "kind": "class", "name": "Foo", "members": [
                { "kind": "method", "name": "Run", "return_type": { "text": "void" } },
                { "kind": "field", "variables": ["a", "b"], "type": { "text": "int" } },
                { "kind": "constructor", "name": "Foo" },
                { "kind": "property", "name": "Size", "type": { "text": "int" } },
                { "kind": "method", "name": "Stop", "return_type": { "text": "void" } }
            ] },
            { "kind": "enum", "name": "Mode", "enum_members": ["On", "Off"] },
            { "kind": "interface", "name": "IFoo" }
        ] }]),
    );

    let output = build(&[source]);
    let tree = output.tree();
    let a = namespace(tree, "A");
    let foo = child(tree, a, "Foo");

    assert_eq!(
        kinds(tree, foo),
        vec![
            ElementKind::Property,
            ElementKind::Field,
            ElementKind::Constructor,
            ElementKind::Method,
            ElementKind::Method,
        ]
    );
    let methods: Vec<_> = tree.model()[foo].children()[3..]
        .iter()
        .map(|&id| tree.model()[id].name())
        .collect();
    assert_eq!(methods, vec!["Run", "Stop"]);
    assert_eq!(
        kinds(tree, a),
        vec![ElementKind::Interface, ElementKind::Class, ElementKind::Enum]
    );

    let field = child(tree, foo, "a, b");
    match tree.model()[field].body() {
        ElementBody::Field { names, .. } => assert_eq!(names, &["a", "b"]),
        other => panic!("expected field body, got {other:?}"),
    }
}

#[test]
fn test_record_parameters_become_fields() {
    let source = unit(
        "Demo",
        "Point.cs",
        json!([{ "kind": "namespace", "name": "Geo", "members": [
            { "kind": "record", "name": "Point", "parameters": [
                { "name": "X", "type": { "text": "double" } },
                { "name": "Y", "type": { "text": "double" } }
            ], "members": [
                { "kind": "method", "name": "Length", "return_type": { "text": "double" } }
            ] }
        ] }]),
    );

    let output = build(&[source]);
    let tree = output.tree();
    let point = child(tree, namespace(tree, "Geo"), "Point");

    assert_eq!(
        kinds(tree, point),
        vec![ElementKind::Field, ElementKind::Field, ElementKind::Method]
    );
    let x = child(tree, point, "X");
    assert_eq!(tree.model()[x].declaration().qualified_name(), Some("Geo.Point.X"));
}

#[test]
fn test_special_members() {
    let source = unit(
        "Demo",
        "Money.cs",
        json!([{ "kind": "namespace", "name": "Bank", "members": [
            { "kind": "struct", "name": "Money", "members": [
                { "kind": "destructor", "name": "Money", "modifiers": ["public"] },
                { "kind": "operator", "name": "operator +", "modifiers": ["public", "static"],
                  "return_type": { "text": "Money", "symbol": "Bank.Money" },
                  "parameters": [
                    { "name": "a", "type": { "text": "Money", "symbol": "Bank.Money" } },
                    { "name": "b", "type": { "text": "Money", "symbol": "Bank.Money" } }
                  ] },
                { "kind": "conversion_operator", "name": "implicit operator", "type": { "text": "decimal" },
                  "parameters": [ { "name": "m", "type": { "text": "Money" } } ] }
            ] }
        ] }]),
    );

    let output = build(&[source]);
    let tree = output.tree();
    let model = tree.model();
    let money = child(tree, namespace(tree, "Bank"), "Money");

    let destructor = child(tree, money, "~Money");
    assert!(model[destructor].modifiers().is_none());

    let plus = child(tree, money, "operator +");
    assert_eq!(model[plus].return_type().and_then(|t| t.resolved_target()), Some(money));
    assert_eq!(model[plus].modifiers(), Some("public static"));
    assert_eq!(model[plus].parameters().len(), 2);

    let conversion = child(tree, money, "decimal");
    assert!(model[conversion].return_type().is_none());
    assert_eq!(model[conversion].parameters().len(), 1);
}

#[test]
fn test_malformed_declarations_are_collected() {
    let source = unit(
        "Demo",
        "Broken.cs",
        json!([
            { "kind": "namespace", "name": "", "location": { "line": 1, "column": 1 } },
            { "kind": "namespace", "name": "A", "members": [
                { "kind": "class", "name": "Foo", "members": [
                    { "kind": "property", "name": "Size", "location": { "line": 4, "column": 9 } },
                    { "kind": "method", "name": "Run" }
                ] },
                { "kind": "event_field", "name": "Changed" }
            ] }
        ]),
    );

    let err = build_with(BuildConfig::default(), &[source]).unwrap_err();
    let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();

    assert_eq!(codes, vec![ErrorCode::E200, ErrorCode::E201, ErrorCode::E202]);
    let missing_type = &err.diagnostics()[1];
    assert_eq!(missing_type.origin().map(ToString::to_string).as_deref(), Some("Broken.cs:4:9"));
    assert_eq!(missing_type.help(), Some("export the declared `type` of the member"));
    assert!(missing_type.label().is_none());
    assert_eq!(err.diagnostics()[2].origin().map(Origin::path), Some("Broken.cs"));
}

#[test]
fn test_enum_items_and_method_bodies() {
    let source = unit(
        "Demo",
        "Mode.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [
            { "kind": "enum", "name": "Mode", "enum_members": ["On"], "members": [] }
        ] }]),
    );
    let output = build(&[source]);
    let tree = output.tree();
    let mode = child(tree, namespace(tree, "A"), "Mode");
    match tree.model()[mode].body() {
        ElementBody::Enum { items } => assert_eq!(items, &["On"]),
        other => panic!("expected enum body, got {other:?}"),
    }

    let nested = unit(
        "Demo",
        "Local.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [
            { "kind": "class", "name": "Foo", "members": [
                { "kind": "method", "name": "Run", "return_type": { "text": "void" }, "members": [
                    { "kind": "class", "name": "Local" }
                ] }
            ] }
        ] }]),
    );
    // Declarations inside method bodies are not part of the model.
    let output = build(&[nested]);
    assert!(output.tree().model().iter().all(|(_, element)| element.name() != "Local"));
}

#[test]
fn test_generic_type_identity() {
    let source = unit(
        "Demo",
        "Grid.cs",
        json!([{ "kind": "namespace", "name": "Shapes", "members": [
            { "kind": "class", "name": "Grid", "type_parameters": ["T"],
              "symbol": { "qualified_name": "Shapes.Grid<T>", "arity": 1 } },
            { "kind": "class", "name": "Board", "members": [
                { "kind": "property", "name": "Cells",
                  "type": { "text": "Grid<Cell>", "symbol": "Shapes.Grid<Shapes.Cell>",
                            "arguments": [ { "text": "Cell", "symbol": "Shapes.Cell" } ] } }
            ] },
            { "kind": "class", "name": "Cell" }
        ] }]),
    );

    let output = build(&[source]);
    let tree = output.tree();
    let model = tree.model();
    let shapes = namespace(tree, "Shapes");
    let grid = child(tree, shapes, "Grid");
    let cell = child(tree, shapes, "Cell");
    let cells = child(tree, child(tree, shapes, "Board"), "Cells");

    let value_type = model[cells].value_type().expect("property type");
    assert_eq!(value_type.to_string(), "Grid<Cell>");
    assert_eq!(value_type.resolved_target(), Some(grid));
    assert_eq!(value_type.sub_types()[0].resolved_target(), Some(cell));
    assert_eq!(model[grid].declaration().to_string(), "Grid<T>");
}

#[test]
fn test_types_nested_in_generic_type_stay_distinct() {
    let source = unit(
        "Demo",
        "Outer.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [
            { "kind": "class", "name": "Outer", "type_parameters": ["T"],
              "symbol": { "qualified_name": "A.Outer<T>", "arity": 1 }, "members": [
                { "kind": "class", "name": "X", "symbol": { "qualified_name": "A.Outer<T>.X" } },
                { "kind": "class", "name": "Y", "symbol": { "qualified_name": "A.Outer<T>.Y" } },
                { "kind": "property", "name": "Current",
                  "type": { "text": "Y", "symbol": "A.Outer<T>.Y" } }
            ] }
        ] }]),
    );

    let output = build(&[source]);
    let tree = output.tree();
    let model = tree.model();
    let outer = child(tree, namespace(tree, "A"), "Outer");
    let x = child(tree, outer, "X");
    let y = child(tree, outer, "Y");
    let current = child(tree, outer, "Current");

    assert_eq!(model[x].declaration().qualified_name(), Some("A.Outer<1>.X"));
    assert_ne!(model[x].declaration().hash(), model[y].declaration().hash());
    assert_eq!(model[y].declaration().resolved_target(), Some(y));
    assert_eq!(
        model[current].value_type().and_then(|t| t.resolved_target()),
        Some(y)
    );
}

#[test]
fn test_overloads_keep_their_own_keys() {
    let source = unit(
        "Demo",
        "Foo.cs",
        json!([{ "kind": "namespace", "name": "A", "members": [
            { "kind": "class", "name": "Foo", "symbol": { "qualified_name": "A.Foo" }, "members": [
                { "kind": "method", "name": "Bar", "return_type": { "text": "void" },
                  "symbol": { "qualified_name": "A.Foo.Bar(int)", "containing_type": "A.Foo" },
                  "parameters": [ { "name": "value", "type": { "text": "int" } } ] },
                { "kind": "method", "name": "Bar", "return_type": { "text": "void" },
                  "symbol": { "qualified_name": "A.Foo.Bar(string)", "containing_type": "A.Foo" },
                  "parameters": [ { "name": "value", "type": { "text": "string" } } ] }
            ] }
        ] }]),
    );

    let output = build(&[source]);
    let tree = output.tree();
    let model = tree.model();
    let foo = child(tree, namespace(tree, "A"), "Foo");
    let keys: Vec<_> = model[foo]
        .children()
        .iter()
        .map(|&id| model[id].declaration().qualified_name().map(str::to_string))
        .collect();

    assert_eq!(
        keys,
        vec![
            Some("A.Foo.Bar(int)".to_string()),
            Some("A.Foo.Bar(string)".to_string())
        ]
    );
}
