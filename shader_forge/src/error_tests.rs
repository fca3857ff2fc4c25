//! Unit tests for error.rs
//!
//! Covers Display output of every variant and the logging error macros.

use crate::error::{Error, Result};
use crate::shader::StageKind;

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_compile_error_display_names_stage() {
    let err = Error::CompileError {
        stage: StageKind::Fragment,
        log: "0:3(13): error: `undefinedVar' undeclared".to_string(),
    };
    let display = format!("{}", err);
    assert!(display.starts_with("Fragment shader compilation failed"));
    assert!(display.contains("undefinedVar"));
}

#[test]
fn test_link_error_display() {
    let err = Error::LinkError { log: "type mismatch".to_string() };
    assert_eq!(format!("{}", err), "Program linking failed: type mismatch");
}

#[test]
fn test_invalid_source_display() {
    let err = Error::InvalidSource("empty vertex source".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid shader source"));
    assert!(display.contains("empty vertex source"));
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("program failed to link".to_string());
    assert!(format!("{}", err).contains("Invalid resource"));
}

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("context lost".to_string());
    assert_eq!(format!("{}", err), "Backend error: context lost");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::LinkError { log: String::new() };
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone_and_eq() {
    let err = Error::CompileError { stage: StageKind::Vertex, log: "bad".to_string() };
    assert_eq!(err.clone(), err);
    assert_ne!(err, Error::CompileError { stage: StageKind::Fragment, log: "bad".to_string() });
}

// ============================================================================
// MACRO TESTS
// ============================================================================

#[test]
fn test_forge_err_builds_backend_error() {
    let err = crate::forge_err!("forge::test", "allocation {} failed", 3);
    assert_eq!(err, Error::BackendError("allocation 3 failed".to_string()));
}

#[test]
fn test_forge_bail_returns_early() {
    fn fails(flag: bool) -> Result<u32> {
        if flag {
            crate::forge_bail!("forge::test", "flag was set");
        }
        Ok(7)
    }

    assert_eq!(fails(false), Ok(7));
    assert_eq!(fails(true), Err(Error::BackendError("flag was set".to_string())));
}
