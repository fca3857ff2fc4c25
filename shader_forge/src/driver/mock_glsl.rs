/// GLSL front end backing MockDriver compile and link
///
/// Sources are parsed and validated with naga. naga only reads GLSL 440+,
/// so the `#version` line is checked here and rewritten to 450 in place
/// (line numbers in the log stay those of the caller's source). Logs use the
/// `0:<line>(<col>): error: ...` shape drivers commonly use.

use std::error::Error as _;
use naga::front::glsl::{Frontend, Options};
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, Expression, Function, Handle, Module, ScalarKind, ShaderStage, Statement, TypeInner};
use crate::shader::StageKind;

/// Versions naga reads as-is; anything else older is rewritten to 450
const NATIVE_VERSIONS: &[u32] = &[440, 450, 460];
const MAX_VERSION: u32 = 460;

fn error_at(line: usize, col: usize, message: &str) -> String {
    format!("0:{}({}): error: {}\n", line, col, message)
}

fn naga_stage(kind: StageKind) -> ShaderStage {
    match kind {
        StageKind::Vertex => ShaderStage::Vertex,
        StageKind::Fragment => ShaderStage::Fragment,
    }
}

// ===== VERSION DIRECTIVE =====

/// Remove `//` and `/* */` comments from one line, tracking open block comments
fn strip_comments(line: &str, in_block: &mut bool) -> String {
    let mut kept = String::new();
    let mut rest = line;

    loop {
        if *in_block {
            match rest.find("*/") {
                Some(end) => {
                    *in_block = false;
                    rest = &rest[end + 2..];
                }
                None => return kept,
            }
        } else {
            let line_comment = rest.find("//");
            let block_comment = rest.find("/*");
            match (line_comment, block_comment) {
                (Some(line_at), Some(block_at)) if line_at < block_at => {
                    kept.push_str(&rest[..line_at]);
                    return kept;
                }
                (Some(line_at), None) => {
                    kept.push_str(&rest[..line_at]);
                    return kept;
                }
                (_, Some(block_at)) => {
                    kept.push_str(&rest[..block_at]);
                    kept.push(' ');
                    *in_block = true;
                    rest = &rest[block_at + 2..];
                }
                (None, None) => {
                    kept.push_str(rest);
                    return kept;
                }
            }
        }
    }
}

/// Check the `#version` directive and rewrite it to one naga reads
///
/// The directive must be the first statement; blank lines and comments may
/// precede it.
fn normalize_version(text: &str) -> Result<String, String> {
    let mut in_block = false;
    let mut directive = None;

    for (index, line) in text.split('\n').enumerate() {
        let code = strip_comments(line, &mut in_block);
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        if !code.starts_with("#version") {
            return Err(error_at(index + 1, 1, "#version directive must be the first statement"));
        }
        directive = Some((index, code.to_string()));
        break;
    }

    let Some((index, code)) = directive else {
        return Err(error_at(1, 1, "missing #version directive"));
    };

    let mut words = code["#version".len()..].split_whitespace();
    let version = match words.next().map(str::parse::<u32>) {
        Some(Ok(version)) => version,
        _ => return Err(error_at(index + 1, 1, "invalid #version directive")),
    };
    if !(100..=MAX_VERSION).contains(&version) {
        return Err(error_at(index + 1, 1, &format!("GLSL {} is not supported", version)));
    }

    let target = if NATIVE_VERSIONS.contains(&version) { version } else { 450 };
    let rewritten: Vec<String> = text
        .split('\n')
        .enumerate()
        .map(|(line_index, line)| {
            if line_index == index {
                format!("#version {} core", target)
            } else {
                line.to_string()
            }
        })
        .collect();
    Ok(rewritten.join("\n"))
}

// ===== STAGE INTERFACE =====

/// One user-defined `in`/`out` of an entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Varying {
    pub ty: String,
    pub name: String,
    pub location: Option<u32>,
}

/// Inputs/outputs of a compiled stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StageInterface {
    pub inputs: Vec<Varying>,
    pub outputs: Vec<Varying>,
    pub has_main: bool,
}

/// GLSL spelling of a naga type (`vec3`, `ivec2`, `mat4x4`, ...)
fn type_name(module: &Module, ty: Handle<naga::Type>) -> String {
    let prefix = |kind: ScalarKind| match kind {
        ScalarKind::Sint => "i",
        ScalarKind::Uint => "u",
        ScalarKind::Bool => "b",
        _ => "",
    };

    match &module.types[ty].inner {
        TypeInner::Scalar(scalar) => match scalar.kind {
            ScalarKind::Sint => "int".to_string(),
            ScalarKind::Uint => "uint".to_string(),
            ScalarKind::Bool => "bool".to_string(),
            _ => "float".to_string(),
        },
        TypeInner::Vector { size, scalar } => format!("{}vec{}", prefix(scalar.kind), *size as u8),
        TypeInner::Matrix { columns, rows, .. } => format!("mat{}x{}", *columns as u8, *rows as u8),
        other => match &module.types[ty].name {
            Some(name) => name.clone(),
            None => format!("{:?}", other),
        },
    }
}

fn varying(module: &Module, name: Option<String>, ty: Handle<naga::Type>, binding: &Option<Binding>) -> Option<Varying> {
    match binding {
        Some(Binding::Location { location, .. }) => Some(Varying {
            ty: type_name(module, ty),
            name: name.unwrap_or_default(),
            location: Some(*location),
        }),
        // Built-ins (gl_Position, gl_FragCoord, ...) are not part of the user interface
        _ => None,
    }
}

/// Name of the global an expression points at
fn global_name(module: &Module, function: &Function, pointer: Handle<Expression>) -> Option<String> {
    match function.expressions[pointer] {
        Expression::GlobalVariable(global) => module.global_variables[global].name.clone(),
        _ => None,
    }
}

/// Entry point argument `index`, named after the `in` global it is stored into
fn input_name(module: &Module, function: &Function, index: usize) -> Option<String> {
    function.body.iter().find_map(|statement| match statement {
        Statement::Store { pointer, value } => match function.expressions[*value] {
            Expression::FunctionArgument(argument) if argument as usize == index => {
                global_name(module, function, *pointer)
            }
            _ => None,
        },
        _ => None,
    })
}

/// Output struct members, named after the `out` globals composed into the result
fn output_names(module: &Module, function: &Function) -> Vec<Option<String>> {
    let returned = function.body.iter().find_map(|statement| match statement {
        Statement::Return { value: Some(value) } => Some(*value),
        _ => None,
    });

    match returned.map(|value| &function.expressions[value]) {
        Some(Expression::Compose { components, .. }) => components
            .iter()
            .map(|component| match function.expressions[*component] {
                Expression::Load { pointer } => global_name(module, function, pointer),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn extract_interface(module: &Module, stage: ShaderStage) -> StageInterface {
    let Some(entry) = module.entry_points.iter().find(|entry| entry.stage == stage) else {
        return StageInterface::default();
    };
    let function = &entry.function;

    let inputs = function
        .arguments
        .iter()
        .enumerate()
        .filter_map(|(index, argument)| {
            let name = argument.name.clone().or_else(|| input_name(module, function, index));
            varying(module, name, argument.ty, &argument.binding)
        })
        .collect();

    let outputs = match &function.result {
        Some(result) if result.binding.is_some() => {
            let name = output_names(module, function).into_iter().next().flatten();
            varying(module, name, result.ty, &result.binding).into_iter().collect()
        }
        Some(result) => match &module.types[result.ty].inner {
            TypeInner::Struct { members, .. } => {
                let names = output_names(module, function);
                members
                    .iter()
                    .enumerate()
                    .filter_map(|(index, member)| {
                        let name = member.name.clone().or_else(|| names.get(index).cloned().flatten());
                        varying(module, name, member.ty, &member.binding)
                    })
                    .collect()
            }
            _ => Vec::new(),
        },
        None => Vec::new(),
    };

    StageInterface { inputs, outputs, has_main: true }
}

// ===== COMPILE =====

/// Parse and validate one stage
///
/// Returns the stage interface on success, the driver-style log on failure.
pub(crate) fn check_source(kind: StageKind, text: &str) -> Result<StageInterface, String> {
    let source = normalize_version(text)?;
    let stage = naga_stage(kind);

    let mut frontend = Frontend::default();
    let module = frontend.parse(&Options::from(stage), &source).map_err(|errors| {
        errors
            .errors
            .iter()
            .map(|error| {
                let location = error.meta.location(&source);
                error_at(location.line_number as usize, location.line_position as usize, &error.kind.to_string())
            })
            .collect::<String>()
    })?;

    // Locations and resource bindings are assigned by the GL linker
    let mut validator = Validator::new(ValidationFlags::all() & !ValidationFlags::BINDINGS, Capabilities::all());
    validator.validate(&module).map_err(|error| {
        let mut message = error.as_inner().to_string();
        let mut cause = error.as_inner().source();
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = inner.source();
        }
        error_at(1, 1, &message)
    })?;

    Ok(extract_interface(&module, stage))
}

// ===== LINK =====

/// Match fragment inputs against vertex outputs
///
/// Inputs are matched by name first, then by location.
pub(crate) fn check_interface(vertex: &StageInterface, fragment: &StageInterface) -> Result<(), String> {
    let mut log = String::new();

    if !vertex.has_main {
        log.push_str("error: vertex shader lacks `main'\n");
    }
    if !fragment.has_main {
        log.push_str("error: fragment shader lacks `main'\n");
    }

    for input in &fragment.inputs {
        let output = vertex
            .outputs
            .iter()
            .find(|output| !input.name.is_empty() && output.name == input.name)
            .or_else(|| {
                input.location.and_then(|location| {
                    vertex.outputs.iter().find(|output| output.location == Some(location))
                })
            });

        match output {
            None => log.push_str(&format!(
                "error: fragment shader input `{}' has no matching output in the previous stage\n",
                input.name
            )),
            Some(output) if output.ty != input.ty => log.push_str(&format!(
                "error: vertex shader output `{}' declared as type `{}', but fragment shader input `{}' declared as type `{}'\n",
                output.name, output.ty, input.name, input.ty
            )),
            Some(_) => {}
        }
    }

    if log.is_empty() { Ok(()) } else { Err(log) }
}

#[cfg(test)]
#[path = "mock_glsl_tests.rs"]
mod tests;
