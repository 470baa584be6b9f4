#![forbid(unsafe_code)]

//! Reading z3's answer to a [`Script`](crate::Script): a verdict line followed, when
//! satisfiable, by the `get-value` response.

use num_bigint::BigInt;
use smtl_core::{Assignment, Value};

use crate::error::SolverError;
use crate::result::SolverResult;

pub fn parse_solver_output(stdout: &str, stderr: &str) -> Result<SolverResult, SolverError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        if stderr.contains("timeout") {
            return Ok(SolverResult::Unknown("timeout".to_string()));
        }
        return Err(SolverError::Parse(format!(
            "empty solver output; stderr: {}",
            stderr.trim()
        )));
    }

    let mut lines = trimmed.lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.next().unwrap_or_default();
    match first {
        "unsat" => Ok(SolverResult::Unsat),
        "sat" => {
            let rest: Vec<&str> = lines.collect();
            Ok(SolverResult::Sat(parse_values(&rest.join("\n"))?))
        }
        "unknown" => Ok(SolverResult::Unknown(unknown_reason(trimmed, stderr))),
        "timeout" => Ok(SolverResult::Unknown("timeout".to_string())),
        other => Err(SolverError::Parse(format!("unexpected solver output: {other}"))),
    }
}

/// z3 answers `get-value` after an unknown verdict with an error; a `(:reason-unknown ...)`
/// line or stderr text is the best available reason.
fn unknown_reason(stdout: &str, stderr: &str) -> String {
    let from_stdout = stdout
        .lines()
        .map(str::trim)
        .skip_while(|l| *l != "unknown")
        .skip(1)
        .find(|l| !l.is_empty() && !l.starts_with("(error"));
    if let Some(reason) = from_stdout {
        return reason
            .trim_start_matches('(')
            .trim_end_matches(')')
            .trim_start_matches(":reason-unknown")
            .trim()
            .trim_matches('"')
            .to_string();
    }
    if stderr.contains("timeout") {
        return "timeout".to_string();
    }
    match stderr.trim() {
        "" => "unknown".to_string(),
        s => s.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Sexp {
    Atom(String),
    List(Vec<Sexp>),
}

/// Parses `((x 13) (y (- 4)) (p true))` into an assignment. Empty input (no declared
/// constants) yields an empty assignment.
pub fn parse_values(text: &str) -> Result<Assignment, SolverError> {
    let mut assignment = Assignment::new();
    let text = text.trim();
    if text.is_empty() {
        return Ok(assignment);
    }

    let mut tokens = tokenize(text)?.into_iter().peekable();
    let sexp = read_sexp(&mut tokens)?;
    if let Some(extra) = tokens.next() {
        return Err(SolverError::Parse(format!("trailing output after values: {extra}")));
    }

    let Sexp::List(pairs) = sexp else {
        return Err(SolverError::Parse(format!("expected value list, found {text}")));
    };
    for pair in pairs {
        let Sexp::List(items) = pair else {
            return Err(SolverError::Parse("expected (name value) pair".to_string()));
        };
        let [Sexp::Atom(name), value] = items.as_slice() else {
            return Err(SolverError::Parse("expected (name value) pair".to_string()));
        };
        let name = name.trim_matches('|').to_string();
        let value = value_of(value)?;
        assignment.insert(name, value);
    }
    Ok(assignment)
}

fn value_of(sexp: &Sexp) -> Result<Value, SolverError> {
    match sexp {
        Sexp::Atom(a) if a == "true" => Ok(Value::Bool(true)),
        Sexp::Atom(a) if a == "false" => Ok(Value::Bool(false)),
        Sexp::Atom(a) => parse_int(a, false),
        Sexp::List(items) => match items.as_slice() {
            [Sexp::Atom(minus), Sexp::Atom(n)] if minus == "-" => parse_int(n, true),
            _ => Err(SolverError::Parse("unsupported value expression".to_string())),
        },
    }
}

fn parse_int(digits: &str, negative: bool) -> Result<Value, SolverError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SolverError::Parse(format!("value `{digits}` is not an integer")));
    }
    let text = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    text.parse::<BigInt>()
        .map(Value::Int)
        .map_err(|_| SolverError::Parse(format!("value `{text}` is not an integer")))
}

/// Reads one value term as z3 prints it: `13`, `(- 4)`, `true`.
#[cfg(feature = "z3")]
pub(crate) fn parse_value(text: &str) -> Result<Value, SolverError> {
    let mut tokens = tokenize(text)?.into_iter().peekable();
    let sexp = read_sexp(&mut tokens)?;
    if let Some(extra) = tokens.next() {
        return Err(SolverError::Parse(format!("trailing output after value: {extra}")));
    }
    value_of(&sexp)
}

fn tokenize(text: &str) -> Result<Vec<String>, SolverError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '(' | ')' => tokens.push(c.to_string()),
            c if c.is_whitespace() => {}
            '|' => {
                let mut sym = String::from('|');
                loop {
                    match chars.next() {
                        Some('|') => break,
                        Some(ch) => sym.push(ch),
                        None => return Err(SolverError::Parse("unterminated quoted symbol".to_string())),
                    }
                }
                sym.push('|');
                tokens.push(sym);
            }
            c => {
                let mut atom = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next == '(' || next == ')' || next.is_whitespace() {
                        break;
                    }
                    atom.push(next);
                    chars.next();
                }
                tokens.push(atom);
            }
        }
    }
    Ok(tokens)
}

fn read_sexp<I>(tokens: &mut std::iter::Peekable<I>) -> Result<Sexp, SolverError>
where
    I: Iterator<Item = String>,
{
    match tokens.next() {
        None => Err(SolverError::Parse("unexpected end of solver output".to_string())),
        Some(t) if t == ")" => Err(SolverError::Parse("unbalanced `)` in solver output".to_string())),
        Some(t) if t == "(" => {
            let mut items = Vec::new();
            loop {
                match tokens.peek() {
                    None => return Err(SolverError::Parse("unbalanced `(` in solver output".to_string())),
                    Some(t) if t == ")" => {
                        tokens.next();
                        return Ok(Sexp::List(items));
                    }
                    Some(_) => items.push(read_sexp(tokens)?),
                }
            }
        }
        Some(t) => Ok(Sexp::Atom(t)),
    }
}
