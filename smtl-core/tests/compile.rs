use smtl_core::{compile_file, Assignment, Compilation, CompileError, ErrorKind, Sort, Value};
use smtl_parse::parse_source;

fn compile(src: &str) -> Result<Compilation, CompileError> {
    let file = parse_source(src).expect("source should parse");
    compile_file(&file)
}

fn compile_main(body: &str) -> Result<Compilation, CompileError> {
    compile(&format!("package smtl\n\nfunc main() {{\n{body}\n}}\n"))
}

fn kind_of(body: &str) -> ErrorKind {
    compile_main(body).expect_err("expected compile error").kind()
}

const MAGIC_SQUARE: &str = r#"
package smtl

func main() {
    var c00, c01, c02 int
    var c10, c11, c12 int
    var c20, c21, c22 int

    assert(c00 >= 1 && c00 <= 9)
    assert(c01 >= 1 && c01 <= 9)
    assert(c02 >= 1 && c02 <= 9)
    assert(c10 >= 1 && c10 <= 9)
    assert(c11 >= 1 && c11 <= 9)
    assert(c12 >= 1 && c12 <= 9)
    assert(c20 >= 1 && c20 <= 9)
    assert(c21 >= 1 && c21 <= 9)
    assert(c22 >= 1 && c22 <= 9)

    assert(distinct(c00, c01, c02, c10, c11, c12, c20, c21, c22))

    assert(c00 == 4)
    assert(c12 == 7)

    assert(c00+c01+c02 == 15)
    assert(c10+c11+c12 == 15)
    assert(c20+c21+c22 == 15)
    assert(c00+c10+c20 == 15)
    assert(c01+c11+c21 == 15)
    assert(c02+c12+c22 == 15)
    assert(c00+c11+c22 == 15)
    assert(c02+c11+c20 == 15)
}
"#;

fn assignment(pairs: &[(&str, Value)]) -> Assignment {
    pairs.iter().map(|(n, v)| (n.to_string(), v.clone())).collect()
}

#[test]
fn two_equations_compile_in_order() {
    let c = compile_main("\tvar x, y int\n\tassert(x+y == 24)\n\tassert(x-y == 2)").unwrap();
    assert_eq!(c.symbols.names().collect::<Vec<_>>(), vec!["x", "y"]);
    let rendered: Vec<String> = c.constraints.iter().map(|t| t.to_string()).collect();
    assert_eq!(rendered, vec!["(= (+ x y) 24)", "(= (- x y) 2)"]);

    let solution = assignment(&[("x", Value::int(13)), ("y", Value::int(11))]);
    assert_eq!(c.first_violated(&solution), Ok(None));
    let wrong = assignment(&[("x", Value::int(12)), ("y", Value::int(12))]);
    assert_eq!(c.first_violated(&wrong), Ok(Some(1)));
}

#[test]
fn magic_square_reference_solution_satisfies_constraints() {
    let c = compile(MAGIC_SQUARE).unwrap();
    assert_eq!(c.symbols.len(), 9);
    assert_eq!(c.constraints.len(), 20);
    assert!(!c.is_nonlinear());

    let grid = [[4, 9, 2], [3, 5, 7], [8, 1, 6]];
    let mut env = Assignment::new();
    for (r, row) in grid.iter().enumerate() {
        for (col, v) in row.iter().enumerate() {
            env.insert(format!("c{r}{col}"), Value::int(*v));
        }
    }
    assert_eq!(c.first_violated(&env), Ok(None));

    env.insert("c11".to_string(), Value::int(4));
    assert!(c.first_violated(&env).unwrap().is_some());
}

#[test]
fn duplicate_declaration_is_reported_by_name() {
    let err = compile_main("\tvar x int\n\tvar x int").unwrap_err();
    assert!(matches!(err, CompileError::DuplicateDeclaration { ref name, .. } if name == "x"));

    let same_line = compile_main("\tvar a, a bool").unwrap_err();
    assert_eq!(same_line.kind(), ErrorKind::DuplicateDeclaration);
}

#[test]
fn undeclared_variable_is_reported_by_name() {
    let err = compile_main("\tvar x int\n\tassert(x+y == 3)").unwrap_err();
    assert!(matches!(err, CompileError::UnknownVariable { ref name, .. } if name == "y"));
}

#[test]
fn use_before_declaration_is_unknown() {
    assert_eq!(kind_of("\tassert(x > 0)\n\tvar x int"), ErrorKind::UnknownVariable);
}

#[test]
fn distinct_with_single_argument_is_arity_error() {
    assert_eq!(kind_of("\tvar x int\n\tassert(distinct(x))"), ErrorKind::ArityError);
}

#[test]
fn contradictory_bounds_still_compile() {
    let c = compile_main("\tvar x int\n\tassert(x > 10)\n\tassert(x < 5)").unwrap();
    assert_eq!(c.constraints.len(), 2);
}

#[test]
fn declarations_accept_only_int_and_bool() {
    assert_eq!(kind_of("\tvar s string"), ErrorKind::UnsupportedType);
    assert_eq!(kind_of("\tvar a [3]int"), ErrorKind::UnsupportedType);
    assert_eq!(kind_of("\tvar m map[int]bool"), ErrorKind::UnsupportedType);
    assert_eq!(kind_of("\tvar t big.Int"), ErrorKind::UnsupportedType);
    assert_eq!(kind_of("\tvar x = 1"), ErrorKind::UnsupportedType);
    assert_eq!(kind_of("\tvar x int = 1"), ErrorKind::UnsupportedStatement);
    assert_eq!(kind_of("\tvar _ int"), ErrorKind::UnsupportedStatement);
    assert_eq!(kind_of("\tconst k = 3"), ErrorKind::UnsupportedStatement);
    assert_eq!(kind_of("\tvar (\n\t\ta int\n\t\tb int\n\t)"), ErrorKind::UnsupportedStatement);

    let c = compile_main("\tvar (\n\t\tp bool\n\t)\n\tassert(p)").unwrap();
    assert_eq!(c.symbols.lookup("p").map(|s| s.sort), Some(Sort::Bool));
}

#[test]
fn only_declarations_and_assertions_are_statements() {
    assert_eq!(kind_of("\tvar x int\n\tx = 3"), ErrorKind::UnsupportedStatement);
    assert_eq!(kind_of("\tx := 3"), ErrorKind::UnsupportedStatement);
    assert_eq!(kind_of("\tvar x int\n\tx++"), ErrorKind::UnsupportedStatement);
    assert_eq!(kind_of("\tif true {\n\t}"), ErrorKind::UnsupportedStatement);
    assert_eq!(kind_of("\tfor {\n\t}"), ErrorKind::UnsupportedStatement);
    assert_eq!(kind_of("\treturn"), ErrorKind::UnsupportedStatement);
    assert_eq!(kind_of("\t{\n\t}"), ErrorKind::UnsupportedStatement);
    assert_eq!(kind_of("\tvar x int; ; assert(x > 0)"), ErrorKind::UnsupportedStatement);
    assert_eq!(kind_of("\tvar x int\n\tx"), ErrorKind::UnsupportedStatement);
    assert_eq!(kind_of("\t(assert(true))"), ErrorKind::UnsupportedStatement);
}

#[test]
fn assertions_need_exactly_one_boolean_argument() {
    assert_eq!(kind_of("\tcheck(true)"), ErrorKind::UnsupportedAssertion);
    assert_eq!(kind_of("\tassert()"), ErrorKind::UnsupportedAssertion);
    assert_eq!(kind_of("\tassert(true, false)"), ErrorKind::UnsupportedAssertion);
    assert_eq!(kind_of("\tvar x int\n\tassert(x + 1)"), ErrorKind::TypeMismatch);
}

#[test]
fn first_error_wins() {
    // Duplicate on line 2 precedes the unknown variable on line 3.
    let err = compile_main("\tvar x int\n\tvar x int\n\tassert(y > 0)").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateDeclaration);

    // Left operand is compiled before the right one.
    let err = compile_main("\tassert(a == 0x1)").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownVariable);
    let err = compile_main("\tassert(0x1 == a)").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedLiteral);
}

#[test]
fn module_contract() {
    let err = compile("package main\nfunc main() {\n}\n").unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedModule { ref name, .. } if name == "main"));

    let empty = compile("package smtl\n").unwrap();
    assert!(empty.symbols.is_empty());
    assert!(empty.constraints.is_empty());

    let bodyless = compile("package smtl\nfunc main()\n").unwrap();
    assert!(bodyless.constraints.is_empty());

    let with_helpers = compile(
        "package smtl\nimport \"fmt\"\nvar g int\nfunc helper() {}\nfunc main() {\n\tvar x int\n\tassert(x == 1)\n}\n",
    )
    .unwrap();
    assert_eq!(with_helpers.constraints.len(), 1);

    let err = compile("package smtl\nfunc main(x int) {\n}\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEntryPoint);
    let err = compile("package smtl\nfunc main() int {\n\treturn 0\n}\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEntryPoint);
    let err = compile("package smtl\nfunc main() {\n}\nfunc main() {\n}\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEntryPoint);
}

#[test]
fn products_of_variables_are_nonlinear() {
    let c = compile_main("\tvar x, y int\n\tassert(x*y == 12)").unwrap();
    assert!(c.is_nonlinear());
    let c = compile_main("\tvar x int\n\tassert(3*x == 12)").unwrap();
    assert!(!c.is_nonlinear());
}
