//! Full runs from Doxygen XML on disk to a written header.

use std::fs;
use std::path::{Path, PathBuf};

use angelscript_bindgen::symbols::{SymbolError, doxygen};
use angelscript_bindgen::{BindgenError, Config, run};
use tempfile::TempDir;

const REQUESTED: [&str; 7] = [
    "Vec2",
    "ui::Widget",
    "ui::Shape",
    "math::Axis",
    "math::real",
    "math::Name",
    "Missing",
];

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run_basic() -> (String, angelscript_bindgen::Outcome) {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("bindings.h");
    let config = Config::new(fixture("basic"), REQUESTED).with_output(&output);
    let outcome = run(&config).unwrap();
    (fs::read_to_string(&output).unwrap(), outcome)
}

#[test]
fn loader_reads_every_compound() {
    let table = doxygen::load_directory(&fixture("basic")).unwrap();
    for name in &REQUESTED[..6] {
        assert!(table.lookup(name).is_some(), "{name} not loaded");
    }
    assert!(table.lookup("Missing").is_none());
}

#[test]
fn writes_header_layout() {
    let (header, outcome) = run_basic();

    assert!(header.starts_with("#pragma once\n#include <angelscript.h>\n"));
    assert!(header.contains("#if defined(USE_ANGELSCRIPT_GENERIC_CALL_CONVENTION)"));
    assert!(
        header.contains("void RegisterAngelscriptObjects(asIScriptEngine *engine)\n{\n\tint r;\n")
    );
    assert!(header.ends_with("}\n"));

    let entry = header.find("void RegisterAngelscriptObjects").unwrap();
    assert!(header.find("static void Vec2_ctor(").unwrap() < entry);
    assert!(header.find("static ui::Widget *ui_Widget_Factory_int(").unwrap() < entry);

    let types = [
        "RegisterObjectType(\"Vec2\"",
        "RegisterObjectType(\"ui_Widget\"",
        "RegisterObjectType(\"ui_Shape\"",
        "RegisterEnum(\"math_Axis\")",
        "RegisterTypedef(\"math_real\", \"float\")",
        "// skipped typedef std::string math::Name",
    ];
    let positions: Vec<usize> = types.iter().map(|t| header.find(t).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(
        outcome.diagnostics.iter().next().unwrap().to_string(),
        "error: cannot generate bindings for 'Missing': it is not in the symbol table"
    );
    assert_eq!(outcome.report.requested, 7);
    assert_eq!(outcome.report.bound, 6);
}

#[test]
fn value_class_from_xml() {
    let (header, _) = run_basic();

    assert!(header.contains(
        "\tr = engine->RegisterObjectType(\"Vec2\", sizeof(Vec2), asOBJ_VALUE | asOBJ_POD | \
         asOBJ_APP_CLASS | asOBJ_APP_CLASS_CONSTRUCTOR | asOBJ_APP_CLASS_DESTRUCTOR); \
         assert(r >= 0);\n"
    ));
    assert!(header.contains(
        "static void Vec2_ctor_float_0sfloat(float a0, float a1, Vec2 *self)\n\
         {\n\tnew(self) Vec2(a0, a1);\n}\n"
    ));
    assert!(header.contains("static void Vec2_dtor(void *memory)"));
    assert!(header.contains(
        "RegisterObjectBehaviour(\"Vec2\", asBEHAVE_CONSTRUCT, \"void f(float, float)\", \
         AS_CONSTRUCTOR(Vec2_ctor_float_0sfloat, Vec2, (float, float)), AS_CTOR_CONVENTION)"
    ));
    assert!(header.contains("RegisterObjectProperty(\"Vec2\", \"float x\", asOFFSET(Vec2, x))"));
    assert!(header.contains("\"Vec2 opAdd(const Vec2 &in) const\""));
    assert!(header.contains("\"bool opEquals(const Vec2 &in) const\""));
    assert!(header.contains(
        "RegisterObjectMethod(\"Vec2\", \"float length() const\", \
         AS_METHOD_FUNCTION_PR(Vec2, length, () const, float), AS_MEMBER_CALL_CONVENTION)"
    ));
    assert!(header.contains(
        "// skipped bool Vec2::operator!=(const Vec2 &) const: \
         operator != is re-derivable from opEquals"
    ));
    assert!(header.contains("// skipped float * Vec2::data(): opted out with [noascript]"));
    assert!(header.contains("// skipped Vec2 Vec2::zero(): static members are not supported"));
}

#[test]
fn reference_class_from_xml() {
    let (header, _) = run_basic();

    assert!(header.contains("RegisterObjectType(\"ui_Widget\", 0, asOBJ_REF | asOBJ_NOCOUNT)"));
    assert!(header.contains(
        "static ui::Widget *ui_Widget_Factory_int(int a0)\n{\n\treturn new ui::Widget(a0);\n}\n"
    ));
    assert!(header.contains(
        "RegisterObjectBehaviour(\"ui_Widget\", asBEHAVE_FACTORY, \"ui_Widget@ f(int)\", \
         AS_FUNCTION(ui_Widget_Factory_int), AS_CALL_CONVENTION)"
    ));
    assert!(header.contains("\"void paint()\""));
    assert!(header.contains(
        "\"ui_Widget@ parent() const\", \
         AS_METHOD_FUNCTION_PR(ui::Widget, parent, () const, ui::Widget *)"
    ));
    assert!(header.contains("\"void bounds(int &out, int &out) const\""));
    assert!(header.contains(
        "// skipped void ui::Widget::swap(Widget &): \
         ambiguous direction for parameter 1 ('Widget &')"
    ));
    assert!(!header.contains("ui_Widget_dtor"));
    assert!(!header.contains("RegisterObjectBehaviour(\"ui_Widget\", asBEHAVE_DESTRUCT"));
}

#[test]
fn abstract_class_from_xml() {
    let (header, _) = run_basic();

    assert!(header.contains("RegisterObjectType(\"ui_Shape\", 0, asOBJ_REF | asOBJ_NOCOUNT)"));
    assert!(!header.contains("ui_Shape_Factory"));
    assert!(
        header.contains("// skipped ui::Shape::Shape(): abstract classes cannot be constructed")
    );
    assert!(header.contains("\"double area() const\""));
}

#[test]
fn enum_and_typedefs_from_xml() {
    let (header, _) = run_basic();

    assert!(header.contains("RegisterEnumValue(\"math_Axis\", \"X\", 0)"));
    assert!(header.contains("RegisterEnumValue(\"math_Axis\", \"Y\", (int)math::Axis::Y)"));
    assert!(header.contains("RegisterEnumValue(\"math_Axis\", \"Z\", 4)"));
    assert!(header.contains(
        "// skipped typedef std::string math::Name: typedef of 'string' is not a primitive type"
    ));
}

#[test]
fn output_is_opened_before_input_is_read() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("no-such-dir").join("bindings.h");
    let config = Config::new(fixture("does-not-exist"), ["Vec2"]).with_output(&output);

    match run(&config) {
        Err(BindgenError::Output { path, .. }) => assert_eq!(path, output),
        other => panic!("expected an output error, got {other:?}"),
    }
}

#[test]
fn missing_input_directory() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("bindings.h");
    let config = Config::new(fixture("does-not-exist"), ["Vec2"]).with_output(&output);

    let err = run(&config).unwrap_err();
    assert!(matches!(
        err,
        BindgenError::Symbols(SymbolError::NotADirectory { .. })
    ));
    assert!(err.to_string().ends_with("is not a directory"));
}

#[test]
fn malformed_xml_is_fatal() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("bindings.h");
    let config = Config::new(fixture("malformed"), ["Broken"]).with_output(&output);

    match run(&config) {
        Err(BindgenError::Symbols(SymbolError::Xml { path, .. })) => {
            assert!(path.ends_with("class_broken.xml"));
        }
        other => panic!("expected an XML error, got {other:?}"),
    }
}
