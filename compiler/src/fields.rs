use crate::error::CompileError;

/// Maps a parameter's named field to its numbered register. An unknown
/// field name is a fatal semantic error.
///
/// Only the field name is checked here — the parameter identifier itself
/// is accepted unconditionally, regardless of which parameter the
/// enclosing function actually declared.
pub fn field_register(field: &str) -> Result<&'static str, CompileError> {
    match field {
        "monitor_type" => Ok("$0"),
        "port" => Ok("$1"),
        "group" => Ok("$2"),
        "label" => Ok("$3"),
        "hostname" => Ok("$4"),
        "family" => Ok("$5"),
        other => Err(CompileError::UnknownField(other.to_string())),
    }
}
